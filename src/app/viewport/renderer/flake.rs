use bytemuck::NoUninit;
use rand::{rngs::SmallRng, Rng};

use crate::settings::Settings;

/// Spawn height above the top edge of the screen.
pub const SPAWN_Y: f32 = -50.0;

/// Upper bound (exclusive) of the random addition to the base fall speed.
pub const SPEED_JITTER: f32 = 3.0;

/// A single falling disc; uploaded verbatim as one GPU instance record.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, NoUninit)]
#[repr(C)]
pub struct Snowflake {
    pub pos: [f32; 2],
    pub fall_speed: f32,
    pub fade_rate: f32,
    pub radius: f32,
    pub alpha: f32,
}

impl Snowflake {
    /// A fresh flake just above the screen, fully opaque, with speed, fade
    /// and radius randomized around the configured bases.
    pub fn spawn(
        rng: &mut SmallRng,
        settings: &Settings,
        width: f32,
    ) -> Self {
        Self {
            pos: [rng.gen_range(0.0..width), SPAWN_Y],
            fall_speed: settings.base_speed
                + rng.gen_range(0.0..SPEED_JITTER),
            fade_rate: settings.base_fade * rng.gen_range(1..=10) as f32,
            radius: 1.0 + rng.gen_range(0..settings.max_radius) as f32,
            alpha: 1.0,
        }
    }
}
