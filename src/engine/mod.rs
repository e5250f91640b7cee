pub mod bindings;
pub mod buffer;
pub mod input;
pub mod time;
#[cfg(feature = "window")]
pub mod window;
