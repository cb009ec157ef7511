use rand::Rng;

use crate::config::SimulationConfig;
use crate::field::{wrap, TrailField};

// A single mobile point with a position, a heading, and three probe points
// recomputed every frame. The heading is deliberately left unnormalized;
// only cos/sin of it are ever used.
#[derive(Clone, Debug)]
pub struct Agent {
    pub x: f32,
    pub y: f32,
    pub heading: f32,
}

impl Agent {
    pub fn new(x: f32, y: f32, heading: f32) -> Self {
        Self { x, y, heading }
    }

    /// The forward/left/right sensor positions: `sensor_distance` units out
    /// from the agent along heading, heading - sensor_angle and
    /// heading + sensor_angle, wrapped toroidally. Pure function of the
    /// agent's current state.
    pub fn sensors(&self, config: &SimulationConfig) -> [(f32, f32); 3] {
        let w = config.width as f32;
        let h = config.height as f32;
        let d = config.sensor_distance;
        let probe = |angle: f32| {
            (
                wrap(self.x + d * angle.cos(), w),
                wrap(self.y + d * angle.sin(), h),
            )
        };
        [
            probe(self.heading),
            probe(self.heading - config.sensor_angle),
            probe(self.heading + config.sensor_angle),
        ]
    }

    /// Read the three sensors and turn toward the strongest trail. Mutates
    /// heading only; the move is a separate step.
    pub fn sense_and_steer<R: Rng>(
        &mut self,
        field: &TrailField,
        config: &SimulationConfig,
        rng: &mut R,
    ) {
        let [(fx, fy), (lx, ly), (rx, ry)] = self.sensors(config);
        let f = field.sample(fx, fy);
        let l = field.sample(lx, ly);
        let r = field.sample(rx, ry);
        let rot = config.rotation_angle;

        if f > l && f > r {
            // Strongest signal dead ahead - keep going straight
        } else if f < l && f < r {
            // Forward is the worst option, break the symmetry at random
            if rng.gen_bool(0.5) {
                self.heading += rot;
            } else {
                self.heading -= rot;
            }
        } else if l > r {
            self.heading -= rot;
        } else if r > l {
            self.heading += rot;
        }
        // l == r with no dominant forward reading falls through unchanged.
        // That no-op is intended steady-state behavior, not a missing case.
    }

    /// Step the position along the current heading at fixed speed, wrapping
    /// both axes back into the field.
    pub fn advance(&mut self, config: &SimulationConfig) {
        let vx = config.agent_speed * self.heading.cos();
        let vy = config.agent_speed * self.heading.sin();
        self.x = wrap(self.x + vx, config.width as f32);
        self.y = wrap(self.y + vy, config.height as f32);
    }
}
