use rand::{rngs::SmallRng, Rng, SeedableRng};

use super::{flake::Snowflake, MAX_FLAKES};
use crate::settings::Settings;

/// The set of live snowflakes, owned exclusively by the render loop.
#[derive(Debug)]
pub struct Snowfield {
    flakes: Vec<Snowflake>,
    rng: SmallRng,
}

impl Snowfield {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    pub fn with_rng(rng: SmallRng) -> Self {
        Self {
            flakes: Vec::with_capacity(MAX_FLAKES),
            rng,
        }
    }

    pub fn flakes(&self) -> &[Snowflake] {
        &self.flakes
    }

    pub fn clear(&mut self) {
        self.flakes.clear();
    }

    /// One time step: integrate every flake, drop the expired ones, then
    /// spawn one new flake with probability `1 / spawn_density`.
    ///
    /// While inactive the field is emptied unconditionally, so switching
    /// the effect back on starts from a clean screen.
    pub fn advance(
        &mut self,
        settings: &Settings,
        width: f32,
        height: f32,
    ) {
        if !settings.active {
            self.flakes.clear();
            return;
        }

        for flake in self.flakes.iter_mut() {
            flake.pos[1] += flake.fall_speed;
            flake.alpha -= flake.fade_rate;
        }
        self.flakes
            .retain(|flake| flake.alpha > 0.0 && flake.pos[1] <= height);

        if self.flakes.len() < MAX_FLAKES
            && self.rng.gen_range(0..settings.spawn_density) == 0
        {
            self.flakes
                .push(Snowflake::spawn(&mut self.rng, settings, width));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::viewport::renderer::flake::{SPAWN_Y, SPEED_JITTER};

    const WIDTH: f32 = 1920.0;
    const HEIGHT: f32 = 1080.0;

    fn active_settings() -> Settings {
        Settings {
            active: true,
            ..Settings::default()
        }
    }

    /// Density high enough that no spawn happens within a test.
    fn no_spawn_settings() -> Settings {
        Settings {
            spawn_density: u32::MAX,
            ..active_settings()
        }
    }

    fn flake(y: f32, fall_speed: f32, fade_rate: f32, alpha: f32) -> Snowflake {
        Snowflake {
            pos: [100.0, y],
            fall_speed,
            fade_rate,
            radius: 2.0,
            alpha,
        }
    }

    fn field_with(flakes: Vec<Snowflake>) -> Snowfield {
        let mut field = Snowfield::with_rng(SmallRng::seed_from_u64(7));
        field.flakes = flakes;
        field
    }

    #[test]
    fn advance_applies_speed_and_fade_exactly() {
        let mut field = field_with(vec![
            flake(10.0, 2.5, 0.25, 1.0),
            flake(300.0, 0.5, 0.002, 0.8),
        ]);

        field.advance(&no_spawn_settings(), WIDTH, HEIGHT);

        let flakes = field.flakes();
        assert_eq!(flakes.len(), 2);
        assert_eq!(flakes[0].pos[1], 12.5);
        assert_eq!(flakes[0].alpha, 0.75);
        assert_eq!(flakes[1].pos[1], 300.5);
        assert_eq!(flakes[1].alpha, 0.8 - 0.002);
    }

    #[test]
    fn faded_out_flakes_are_removed() {
        let mut field = field_with(vec![
            flake(10.0, 1.0, 0.5, 0.4),
            flake(10.0, 1.0, 0.001, 0.4),
        ]);

        field.advance(&no_spawn_settings(), WIDTH, HEIGHT);

        let flakes = field.flakes();
        assert_eq!(flakes.len(), 1);
        assert_eq!(flakes[0].fade_rate, 0.001);
    }

    #[test]
    fn flakes_below_the_screen_are_removed() {
        let mut field = field_with(vec![
            flake(HEIGHT - 0.5, 1.0, 0.0001, 1.0),
            flake(HEIGHT - 10.0, 1.0, 0.0001, 1.0),
        ]);

        field.advance(&no_spawn_settings(), WIDTH, HEIGHT);

        let flakes = field.flakes();
        assert_eq!(flakes.len(), 1);
        assert_eq!(flakes[0].pos[1], HEIGHT - 9.0);
    }

    #[test]
    fn inactive_advance_empties_the_field() {
        let mut field = field_with(vec![
            flake(10.0, 1.0, 0.001, 1.0),
            flake(20.0, 1.0, 0.001, 1.0),
        ]);
        let settings = Settings {
            active: false,
            ..Settings::default()
        };

        field.advance(&settings, WIDTH, HEIGHT);

        assert!(field.flakes().is_empty());
    }

    #[test]
    fn spawned_flake_reflects_the_settings() {
        let mut field = Snowfield::with_rng(SmallRng::seed_from_u64(42));
        let settings = Settings {
            spawn_density: 1,
            base_speed: 5.0,
            base_fade: 0.004,
            max_radius: 2,
            ..active_settings()
        };

        field.advance(&settings, WIDTH, HEIGHT);

        let flakes = field.flakes();
        assert_eq!(flakes.len(), 1);
        let flake = flakes[0];
        assert_eq!(flake.pos[1], SPAWN_Y);
        assert!((0.0..WIDTH).contains(&flake.pos[0]));
        assert_eq!(flake.alpha, 1.0);
        assert!(flake.fall_speed >= 5.0);
        assert!(flake.fall_speed < 5.0 + SPEED_JITTER);
        let fade_multiplier = (flake.fade_rate / 0.004).round();
        assert!((1.0..=10.0).contains(&fade_multiplier));
        assert!((flake.fade_rate - 0.004 * fade_multiplier).abs() < 1e-6);
        assert!(flake.radius == 1.0 || flake.radius == 2.0);
    }

    #[test]
    fn spawn_rate_approximates_inverse_density() {
        let mut field = Snowfield::with_rng(SmallRng::seed_from_u64(1));
        let settings = Settings {
            spawn_density: 5,
            ..active_settings()
        };

        let steps = 20_000;
        let mut spawned = 0;
        for _ in 0..steps {
            field.advance(&settings, WIDTH, HEIGHT);
            spawned += field.flakes().len();
            field.clear();
        }

        let expected = steps / settings.spawn_density as usize;
        let tolerance = expected / 10;
        assert!(
            spawned.abs_diff(expected) < tolerance,
            "spawned {spawned}, expected about {expected}"
        );
    }

    #[test]
    fn spawning_stops_at_capacity() {
        let mut field = field_with(vec![
            flake(10.0, 0.0, 0.0, 1.0);
            MAX_FLAKES
        ]);
        let settings = Settings {
            spawn_density: 1,
            ..active_settings()
        };

        field.advance(&settings, WIDTH, HEIGHT);

        assert_eq!(field.flakes().len(), MAX_FLAKES);
    }
}
