pub mod dino;
pub mod physics;

pub use dino::dino_fsm;
