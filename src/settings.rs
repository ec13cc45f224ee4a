use anyhow::bail;

/// Effect parameters shared between the menu thread and the render loop.
///
/// Shared as `Arc<Mutex<Settings>>`; the simulation copies one snapshot per
/// step, so it never observes a half-applied update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub active: bool,
    /// Inverse spawn probability: one flake per `spawn_density` steps on
    /// average. Larger value means rarer spawns.
    pub spawn_density: u32,
    /// Base vertical displacement per step, in pixels.
    pub base_speed: f32,
    /// Base opacity lost per step.
    pub base_fade: f32,
    /// Upper bound for the randomized flake radius, in pixels.
    pub max_radius: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            active: false,
            spawn_density: 8,
            base_speed: 1.0,
            base_fade: 0.002,
            max_radius: 3,
        }
    }
}

impl Settings {
    pub fn set_density(&mut self, value: u32) -> anyhow::Result<()> {
        if !(1..=30).contains(&value) {
            bail!("density must be between 1 and 30, got {value}");
        }
        self.spawn_density = value;
        Ok(())
    }

    /// Accepts 1..=100, stored in tenths of a pixel per step.
    pub fn set_speed(&mut self, value: u32) -> anyhow::Result<()> {
        if !(1..=100).contains(&value) {
            bail!("speed must be between 1 and 100, got {value}");
        }
        self.base_speed = value as f32 / 10.0;
        Ok(())
    }

    /// Accepts 1..=10, stored in thousandths of opacity per step.
    pub fn set_fade(&mut self, value: u32) -> anyhow::Result<()> {
        if !(1..=10).contains(&value) {
            bail!("fade must be between 1 and 10, got {value}");
        }
        self.base_fade = value as f32 / 1000.0;
        Ok(())
    }

    pub fn set_max_radius(&mut self, value: u32) -> anyhow::Result<()> {
        if !(1..=10).contains(&value) {
            bail!("radius must be between 1 and 10, got {value}");
        }
        self.max_radius = value;
        Ok(())
    }
}
