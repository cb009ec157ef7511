// Global configuration - every reference constant from the original design,
// exposed as a tunable

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // Field/display
    pub width: usize,
    pub height: usize,

    // Population
    pub agent_count: usize,
    /// Radius of the disk around the field center agents are seeded in.
    pub seed_radius: f32,

    // Field evolution
    /// Fractional step toward black per frame (0.05 = 5% decay).
    pub diffuse_rate: f32,
    /// Box-blur radius of the diffusion pass, in pixels.
    pub blur_radius: usize,

    // Sensing and steering
    pub sensor_angle: f32,
    pub sensor_distance: f32,
    pub rotation_angle: f32,

    // Movement and footprint
    pub agent_speed: f32,
    pub agent_radius: f32,

    /// Stop the run after this many wall-clock minutes (None = run forever).
    pub run_minutes: Option<f32>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            agent_count: 4000,
            seed_radius: 200.0,
            diffuse_rate: 0.05,
            blur_radius: 2,
            sensor_angle: std::f32::consts::FRAC_PI_4,
            sensor_distance: 10.0,
            rotation_angle: std::f32::consts::FRAC_PI_4,
            agent_speed: 1.0,
            agent_radius: 1.0,
            run_minutes: None,
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a YAML or JSON file, chosen by extension.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        let config: Self = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&contents)?,
            "json" => serde_json::from_str(&contents)?,
            _ => return Err(format!("unsupported config format: {}", path).into()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Search the working directory for config.yaml, config.yml or
    /// config.json; fall back to defaults if none exists.
    pub fn from_default_paths() -> Self {
        for path in ["config.yaml", "config.yml", "config.json"] {
            if Path::new(path).exists() {
                match Self::from_file(path) {
                    Ok(config) => return config,
                    Err(e) => eprintln!("Ignoring {}: {}", path, e),
                }
            }
        }
        Self::default()
    }

    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.width == 0 || self.height == 0 {
            return Err("width and height must be positive".into());
        }
        if !(0.0..1.0).contains(&self.diffuse_rate) {
            return Err("diffuse_rate must be in [0, 1)".into());
        }
        if self.seed_radius <= 0.0 {
            return Err("seed_radius must be positive".into());
        }
        if self.sensor_distance < 0.0 || self.agent_speed < 0.0 || self.agent_radius < 0.0 {
            return Err("distances and speeds must be non-negative".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_constants() {
        let config = SimulationConfig::default();
        assert_eq!(config.agent_count, 4000);
        assert_eq!(config.seed_radius, 200.0);
        assert_eq!(config.diffuse_rate, 0.05);
        assert_eq!(config.sensor_distance, 10.0);
        assert_eq!(config.sensor_angle, std::f32::consts::FRAC_PI_4);
        assert_eq!(config.rotation_angle, std::f32::consts::FRAC_PI_4);
        assert_eq!(config.agent_speed, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let config: SimulationConfig =
            serde_yaml::from_str("agent_count: 1000\ndiffuse_rate: 0.1\n").unwrap();
        assert_eq!(config.agent_count, 1000);
        assert_eq!(config.diffuse_rate, 0.1);
        assert_eq!(config.sensor_distance, 10.0);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"width": 640, "height": 480}"#).unwrap();
        assert_eq!(config.width, 640);
        assert_eq!(config.agent_count, 4000);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let config = SimulationConfig {
            width: 0,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SimulationConfig {
            diffuse_rate: 1.0,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
