use rand::Rng;

use crate::config::SimulationConfig;
use crate::field::TrailField;
use crate::swarm::Swarm;

// Simulation state - contains all mutable state data
pub struct SimulationState {
    pub field: TrailField,
    pub swarm: Swarm,
    pub frame_index: u64,
}

// Simulation - owns state, config, and control flags; step() is the only
// mutating entry point
pub struct Simulation {
    pub state: SimulationState,
    pub config: SimulationConfig,
    pub paused: bool,
    pub agents_visible: bool,
    pub speed_multiplier: f32,
    pub speed_accumulator: f32,
    pub take_screenshot: bool,
    pub help_popup_visible: bool,
}

// Implement Deref for convenience - allows sim.field instead of sim.state.field
impl std::ops::Deref for Simulation {
    type Target = SimulationState;
    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl std::ops::DerefMut for Simulation {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.state
    }
}

impl Simulation {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        Self::with_config(rng, SimulationConfig::default())
    }

    pub fn with_config<R: Rng>(rng: &mut R, config: SimulationConfig) -> Self {
        let state = SimulationState {
            field: TrailField::new(config.width, config.height),
            swarm: Swarm::seeded(&config, rng),
            frame_index: 0,
        };
        Self {
            state,
            config,
            paused: false,
            agents_visible: false,
            speed_multiplier: 1.0,
            speed_accumulator: 0.0,
            take_screenshot: false,
            help_popup_visible: false,
        }
    }

    /// One frame: the field decays and diffuses first, then every agent (in
    /// order) deposits, senses, and moves against the updated field.
    pub fn step<R: Rng>(&mut self, rng: &mut R) {
        self.state.frame_index = self.state.frame_index.wrapping_add(1);

        self.state
            .field
            .decay_and_diffuse(self.config.diffuse_rate, self.config.blur_radius);
        self.state
            .swarm
            .update(&mut self.state.field, &self.config, rng);
    }

    /// Clear the field and reseed the swarm from the seed disk.
    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        self.state.field.clear();
        self.state.swarm = Swarm::seeded(&self.config, rng);
        self.state.frame_index = 0;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }
    pub fn toggle_agents_visibility(&mut self) {
        self.agents_visible = !self.agents_visible;
    }
    pub fn increase_speed(&mut self) {
        self.speed_multiplier = (self.speed_multiplier * 1.5).min(10.0);
    }
    pub fn decrease_speed(&mut self) {
        self.speed_multiplier = (self.speed_multiplier / 1.5).max(0.1);
    }
    pub fn reset_speed(&mut self) {
        self.speed_multiplier = 1.0;
    }

    /// (agent count, mean intensity, max intensity, frame index)
    pub fn stats(&self) -> (usize, f32, f32, u64) {
        (
            self.state.swarm.len(),
            self.state.field.mean_intensity(),
            self.state.field.max_intensity(),
            self.state.frame_index,
        )
    }
}
