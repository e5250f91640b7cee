use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::components::Hitbox;
use crate::weighted::{random_bool, random_value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    Cactus,
    Clump,
    Baby,
    Pterodactyl,
}

/// Relative spawn odds.
pub const SPAWN_WEIGHTS: [(u16, ObstacleKind); 4] = [
    (2, ObstacleKind::Cactus),
    (1, ObstacleKind::Clump),
    (1, ObstacleKind::Baby),
    (2, ObstacleKind::Pterodactyl),
];

/// Pixels between consecutive obstacles, inclusive.
pub const MIN_GAP: u32 = 80;
pub const MAX_GAP: u32 = 400;

/// Pterodactyl altitudes: centre height above the floor (y points down).
/// The low one clears a ducking dino but not a standing one.
pub const HIGH_FLIGHT_Y: f32 = -160.0;
pub const LOW_FLIGHT_Y: f32 = -48.0;

/// Obstacles enter at the right edge and are dropped past the left one.
const SPAWN_X: f32 = 800.0;
const DESPAWN_X: f32 = -100.0;

impl ObstacleKind {
    pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *random_value(rng, &SPAWN_WEIGHTS)
    }

    pub fn hitbox(self) -> Hitbox {
        match self {
            Self::Cactus => Hitbox::new(9.0, 17.0),
            Self::Clump => Hitbox::new(25.0, 17.0),
            Self::Baby => Hitbox::new(6.0, 12.0),
            Self::Pterodactyl => Hitbox::new(21.0, 10.0),
        }
    }

    /// Height of the obstacle's centre relative to the floor. Ground
    /// obstacles stand on it; pterodactyls fly high or low with equal odds.
    pub fn spawn_y<R: Rng + ?Sized>(self, rng: &mut R) -> f32 {
        match self {
            Self::Pterodactyl if random_bool(rng) => HIGH_FLIGHT_Y,
            Self::Pterodactyl => LOW_FLIGHT_Y,
            _ => -self.hitbox().half_extents.y,
        }
    }
}

/// One obstacle on the track. `x` and `y` locate the centre of its hitbox,
/// with the dino at `x = 0` and the floor at `y = 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub x: f32,
    pub y: f32,
}

impl Obstacle {
    pub fn centre(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn hits(&self, hitbox: Hitbox, centre: Vec2) -> bool {
        self.kind.hitbox().overlaps(self.centre(), hitbox, centre)
    }
}

/// Scrolling ground: moves obstacles toward the dino at a slowly increasing
/// speed and keeps new ones coming.
pub struct Treadmill {
    initial_speed: f32,
    pub speed: f32,
    pub acceleration: f32,
    pub distance: f32,
    pub obstacles: Vec<Obstacle>,
    gap_remaining: f32,
    rng: StdRng,
}

impl Treadmill {
    pub fn new(speed: f32, acceleration: f32, seed: u64) -> Self {
        Self {
            initial_speed: speed,
            speed,
            acceleration,
            distance: 0.0,
            obstacles: Vec::new(),
            gap_remaining: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Advance by `dt` seconds. Returns how many obstacles were spawned.
    pub fn tick(&mut self, dt: f32) -> usize {
        let step = self.speed * dt;
        self.distance += step;
        for obstacle in &mut self.obstacles {
            obstacle.x -= step;
        }
        self.obstacles.retain(|o| o.x >= DESPAWN_X);

        let mut spawned = 0;
        self.gap_remaining -= step;
        while self.gap_remaining <= 0.0 {
            let kind = ObstacleKind::pick(&mut self.rng);
            let y = kind.spawn_y(&mut self.rng);
            let x = SPAWN_X + self.gap_remaining;
            tracing::debug!(?kind, x, y, "obstacle spawned");
            self.obstacles.push(Obstacle { kind, x, y });
            self.gap_remaining += self.rng.gen_range(MIN_GAP..=MAX_GAP) as f32;
            spawned += 1;
        }

        self.speed += self.acceleration * dt;
        spawned
    }

    /// First obstacle overlapping a box centred at `centre`.
    pub fn hit_by(&self, hitbox: Hitbox, centre: Vec2) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.hits(hitbox, centre))
    }

    /// Back to the starting speed with an empty track.
    pub fn reset(&mut self) {
        self.speed = self.initial_speed;
        self.distance = 0.0;
        self.obstacles.clear();
        self.gap_remaining = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_obstacles_sit_on_the_floor() {
        let mut rng = StdRng::seed_from_u64(5);
        for kind in [ObstacleKind::Cactus, ObstacleKind::Clump, ObstacleKind::Baby] {
            let bottom = kind.spawn_y(&mut rng) + kind.hitbox().half_extents.y;
            assert_eq!(bottom, 0.0);
        }
    }

    #[test]
    fn low_pterodactyl_only_hits_a_standing_dino() {
        let low = Obstacle {
            kind: ObstacleKind::Pterodactyl,
            x: 0.0,
            y: LOW_FLIGHT_Y,
        };
        let feet = Vec2::ZERO;
        assert!(low.hits(Hitbox::STANDING, Hitbox::STANDING.centre_above(feet)));
        assert!(!low.hits(Hitbox::DUCKING, Hitbox::DUCKING.centre_above(feet)));

        let high = Obstacle { y: HIGH_FLIGHT_Y, ..low };
        assert!(!high.hits(Hitbox::STANDING, Hitbox::STANDING.centre_above(feet)));
    }

    #[test]
    fn track_reports_the_obstacle_in_the_way() {
        let mut treadmill = Treadmill::new(600.0, 0.0, 4);
        let centre = Hitbox::STANDING.centre_above(Vec2::ZERO);
        assert!(treadmill.hit_by(Hitbox::STANDING, centre).is_none());

        treadmill.obstacles.push(Obstacle {
            kind: ObstacleKind::Cactus,
            x: 25.0,
            y: -17.0,
        });
        let hit = treadmill.hit_by(Hitbox::STANDING, centre).map(|o| o.kind);
        assert_eq!(hit, Some(ObstacleKind::Cactus));
    }

    #[test]
    fn pterodactyls_fly_at_two_heights() {
        let mut rng = StdRng::seed_from_u64(9);
        let heights: Vec<f32> = (0..200)
            .map(|_| ObstacleKind::Pterodactyl.spawn_y(&mut rng))
            .collect();
        assert!(heights.contains(&HIGH_FLIGHT_Y));
        assert!(heights.contains(&LOW_FLIGHT_Y));
        assert!(heights.iter().all(|y| *y == HIGH_FLIGHT_Y || *y == LOW_FLIGHT_Y));
    }

    #[test]
    fn treadmill_spaces_obstacles_within_gap_bounds() {
        let mut treadmill = Treadmill::new(600.0, 0.0, 42);
        for _ in 0..120 {
            treadmill.tick(1.0 / 60.0);
        }
        assert!(treadmill.obstacles.len() > 1);
        for pair in treadmill.obstacles.windows(2) {
            let gap = pair[1].x - pair[0].x;
            assert!(gap >= MIN_GAP as f32 - 0.01 && gap <= MAX_GAP as f32 + 0.01, "gap {gap}");
        }
    }

    #[test]
    fn treadmill_accelerates_and_resets() {
        let mut treadmill = Treadmill::new(100.0, 50.0, 1);
        treadmill.tick(1.0);
        assert_eq!(treadmill.speed, 150.0);
        assert_eq!(treadmill.distance, 100.0);

        treadmill.reset();
        assert_eq!(treadmill.speed, 100.0);
        assert!(treadmill.obstacles.is_empty());
    }

    #[test]
    fn passed_obstacles_are_dropped() {
        let mut treadmill = Treadmill::new(1_000.0, 0.0, 3);
        for _ in 0..300 {
            treadmill.tick(1.0 / 60.0);
        }
        assert!(treadmill.obstacles.iter().all(|o| o.x >= DESPAWN_X));
    }
}
