pub mod dino;
pub mod physics;

pub use dino::{Animation, DinoFsm, DinoState, DinoWorld, Stance};
pub use physics::{Body, Floor, Hitbox};
