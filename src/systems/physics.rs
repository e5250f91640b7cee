use crate::components::physics::{Body, Floor};

/// Semi-implicit Euler: apply the body's current gravity to its velocity,
/// then move by the new velocity.
pub fn integrate(body: &mut Body, dt: f32) {
    body.velocity.y += body.gravity * dt;
    body.position += body.velocity * dt;
}

/// Clamp the body onto `floor` if it moved through it while falling.
/// Returns whether the body is now resting on the floor.
pub fn slide_on_floor(body: &mut Body, floor: Floor) -> bool {
    if body.position.y >= floor.y && body.velocity.y >= 0.0 {
        body.position.y = floor.y;
        body.velocity.y = 0.0;
        true
    } else {
        false
    }
}
