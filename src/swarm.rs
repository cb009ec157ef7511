use rand::Rng;

use crate::agent::Agent;
use crate::config::SimulationConfig;
use crate::field::{wrap, TrailField};

// Fixed-size ordered population of agents. No birth or death; the order is
// insertion order and only matters for update sequencing within a frame.
pub struct Swarm {
    pub agents: Vec<Agent>,
}

impl Swarm {
    /// Seed `agent_count` agents inside a disk of `seed_radius` around the
    /// field center, with headings uniform in `[0, 2pi)`.
    pub fn seeded<R: Rng>(config: &SimulationConfig, rng: &mut R) -> Self {
        let w = config.width as f32;
        let h = config.height as f32;
        let radius = config.seed_radius;

        let mut agents = Vec::with_capacity(config.agent_count);
        for _ in 0..config.agent_count {
            // Rejection-sample a uniform point in the seed disk
            let (dx, dy) = loop {
                let dx = rng.gen_range(-radius..radius);
                let dy = rng.gen_range(-radius..radius);
                if dx.hypot(dy) <= radius {
                    break (dx, dy);
                }
            };
            let x = wrap(w / 2.0 + dx, w);
            let y = wrap(h / 2.0 + dy, h);
            let heading = rng.gen_range(0.0..std::f32::consts::TAU);
            agents.push(Agent::new(x, y, heading));
        }
        Self { agents }
    }

    /// One frame of agent updates, in insertion order: deposit the agent's
    /// footprint at its current position, then steer, then move. An agent
    /// processed later in the frame sees earlier agents' fresh deposits;
    /// that read-after-write bias is part of the model, so the field is not
    /// double-buffered here.
    pub fn update<R: Rng>(
        &mut self,
        field: &mut TrailField,
        config: &SimulationConfig,
        rng: &mut R,
    ) {
        for agent in &mut self.agents {
            field.deposit(agent.x, agent.y, config.agent_radius);
            agent.sense_and_steer(field, config, rng);
            agent.advance(config);
        }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    fn test_config() -> SimulationConfig {
        SimulationConfig {
            width: 400,
            height: 400,
            agent_count: 500,
            seed_radius: 50.0,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn seeding_fills_the_disk() {
        let config = test_config();
        let swarm = Swarm::seeded(&config, &mut thread_rng());
        assert_eq!(swarm.len(), 500);

        for agent in &swarm.agents {
            let dx = agent.x - 200.0;
            let dy = agent.y - 200.0;
            assert!(dx.hypot(dy) <= 50.0 + 1e-3);
            assert!(agent.heading >= 0.0 && agent.heading < std::f32::consts::TAU);
        }
    }

    #[test]
    fn update_keeps_positions_in_range() {
        let config = test_config();
        let mut field = TrailField::new(400, 400);
        let mut swarm = Swarm::seeded(&config, &mut thread_rng());
        let mut rng = thread_rng();

        for _ in 0..20 {
            swarm.update(&mut field, &config, &mut rng);
        }
        for agent in &swarm.agents {
            assert!(agent.x >= 0.0 && agent.x < 400.0);
            assert!(agent.y >= 0.0 && agent.y < 400.0);
        }
    }

    #[test]
    fn update_deposits_every_footprint() {
        let config = SimulationConfig {
            width: 100,
            height: 100,
            ..SimulationConfig::default()
        };
        let mut field = TrailField::new(100, 100);
        let mut swarm = Swarm {
            agents: vec![Agent::new(20.0, 20.0, 0.0), Agent::new(80.0, 80.0, 0.0)],
        };
        swarm.update(&mut field, &config, &mut thread_rng());
        assert_eq!(field.sample(20.0, 20.0), crate::field::MAX_TRAIL);
        assert_eq!(field.sample(80.0, 80.0), crate::field::MAX_TRAIL);
    }

    #[test]
    fn earlier_deposits_are_visible_within_the_frame() {
        let config = SimulationConfig {
            width: 100,
            height: 100,
            ..SimulationConfig::default()
        };
        let mut field = TrailField::new(100, 100);

        // The first agent sits exactly on the second agent's left sensor
        // point, so its deposit is already there when the second one senses.
        let follower = Agent::new(40.0, 50.0, 0.0);
        let [_, (lx, ly), _] = follower.sensors(&config);
        let leader = Agent::new(lx, ly, 0.0);

        let mut swarm = Swarm {
            agents: vec![leader, follower],
        };
        swarm.update(&mut field, &config, &mut thread_rng());

        let follower = &swarm.agents[1];
        assert!((follower.heading - (-config.rotation_angle)).abs() < 1e-6);
    }
}
