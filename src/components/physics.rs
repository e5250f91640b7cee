use glam::Vec2;

/// Kinematic body of the dino. Screen coordinates: +y points down.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    /// Feet of the body; equal to the floor height while grounded.
    pub position: Vec2,
    pub velocity: Vec2,
    /// Downward acceleration currently applied while airborne.
    pub gravity: f32,
}

impl Body {
    pub fn at(position: Vec2, gravity: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            gravity,
        }
    }

    /// Moving upward on screen.
    pub fn is_rising(&self) -> bool {
        self.velocity.y < 0.0
    }
}

/// Horizontal ground line the body rests on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Floor {
    pub y: f32,
}

impl Default for Floor {
    fn default() -> Self {
        Self { y: 0.0 }
    }
}

/// Axis-aligned collision box, given by its half extents. Where it sits is
/// up to the owner: the dino's box stands on its feet, obstacles' boxes are
/// centred on their position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hitbox {
    pub half_extents: Vec2,
}

impl Hitbox {
    pub const STANDING: Hitbox = Hitbox {
        half_extents: Vec2::new(20.0, 22.0),
    };
    pub const DUCKING: Hitbox = Hitbox {
        half_extents: Vec2::new(28.0, 13.0),
    };

    pub const fn new(half_width: f32, half_height: f32) -> Self {
        Self {
            half_extents: Vec2::new(half_width, half_height),
        }
    }

    /// Centre of this box when its bottom edge rests at `feet`.
    pub fn centre_above(self, feet: Vec2) -> Vec2 {
        feet - Vec2::new(0.0, self.half_extents.y)
    }

    /// Whether the boxes centred at `centre` and `other_centre` overlap.
    /// Touching edges do not count.
    pub fn overlaps(self, centre: Vec2, other: Hitbox, other_centre: Vec2) -> bool {
        let gap = (centre - other_centre).abs();
        let reach = self.half_extents + other.half_extents;
        gap.x < reach.x && gap.y < reach.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxes_overlap_only_when_both_axes_do() {
        let small = Hitbox::new(10.0, 10.0);
        assert!(small.overlaps(Vec2::ZERO, small, Vec2::new(15.0, -5.0)));
        assert!(!small.overlaps(Vec2::ZERO, small, Vec2::new(15.0, -25.0)));
        assert!(!small.overlaps(Vec2::ZERO, small, Vec2::new(30.0, 0.0)));
        // Edge contact.
        assert!(!small.overlaps(Vec2::ZERO, small, Vec2::new(20.0, 0.0)));
    }

    #[test]
    fn standing_box_rises_from_the_feet() {
        let centre = Hitbox::STANDING.centre_above(Vec2::new(0.0, 0.0));
        assert_eq!(centre, Vec2::new(0.0, -22.0));
    }
}
