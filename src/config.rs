//! Arm parameters, loaded from a TOML file.

use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::control::FusionStrategy;
use crate::core::{ArmError, Joint, PidGains, PowerLimit};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot load the parameter file: {0}")]
    FileLoad(#[from] std::io::Error),

    #[error("Cannot read the parameter file: {0}")]
    Deserialise(#[from] toml::de::Error),
}

/// Per-joint constants.
#[derive(PartialEq, Clone, Debug, Serialize, Deserialize)]
pub struct JointConfig {
    /// Units: degrees per encoder pulse.
    pub degrees_per_pulse: f64,

    /// Units: degrees per volt. Unused on joints without a potentiometer.
    pub pot_degrees_per_volt: f64,

    /// Symmetric motor power bound, normalized units.
    pub max_power: f64,

    pub initial_target_deg: f64,

    pub gains: PidGains,
}

#[derive(PartialEq, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmConfig {
    /// Control loop period.
    ///
    /// Units: seconds
    pub period_s: f64,

    /// When false the software PID loops never run, whatever the mode.
    pub enable_software_pid: bool,

    pub fusion: FusionStrategy,

    /// Number of ticks the simulator binary runs for.
    pub sim_ticks: u32,

    pub turret: JointConfig,
    pub shoulder: JointConfig,
    pub elbow: JointConfig,
    pub wrist: JointConfig,
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self {
            period_s: 0.02,
            enable_software_pid: true,
            fusion: FusionStrategy::PotentiometerOnly,
            sim_ticks: 500,
            turret: JointConfig {
                degrees_per_pulse: 0.75,
                pot_degrees_per_volt: 72.0,
                max_power: 0.3,
                initial_target_deg: 0.0,
                gains: PidGains::new(0.02, 0.0, 0.0),
            },
            shoulder: JointConfig {
                degrees_per_pulse: 0.5,
                pot_degrees_per_volt: 54.0,
                max_power: 0.5,
                initial_target_deg: 0.0,
                gains: PidGains::new(0.03, 0.005, 0.0),
            },
            elbow: JointConfig {
                degrees_per_pulse: 0.5,
                pot_degrees_per_volt: 54.0,
                max_power: 0.5,
                initial_target_deg: 0.0,
                gains: PidGains::new(0.03, 0.005, 0.0),
            },
            wrist: JointConfig {
                degrees_per_pulse: 1.2,
                pot_degrees_per_volt: 0.0,
                max_power: 0.25,
                initial_target_deg: 0.0,
                gains: PidGains::new(0.015, 0.0, 0.0),
            },
        }
    }
}

impl ArmConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn joint(&self, joint: Joint) -> &JointConfig {
        match joint {
            Joint::Turret => &self.turret,
            Joint::Shoulder => &self.shoulder,
            Joint::Elbow => &self.elbow,
            Joint::Wrist => &self.wrist,
        }
    }

    pub fn validate(&self) -> Result<(), ArmError> {
        if !self.period_s.is_finite() || self.period_s <= 0.0 {
            return Err(ArmError::InvalidPeriod(self.period_s));
        }

        for joint in Joint::ALL {
            PowerLimit::new(self.joint(joint).max_power)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    const FULL: &str = r#"
period_s = 0.01
enable_software_pid = false
sim_ticks = 10

[fusion.bounded_disagreement]
tolerance_deg = 3.0

[turret]
degrees_per_pulse = 1.0
pot_degrees_per_volt = 60.0
max_power = 0.4
initial_target_deg = 15.0
gains = { p = 0.1, i = 0.0, d = 0.01 }
"#;

    #[test]
    fn parses_partial_file_over_defaults() {
        let config = ArmConfig::from_toml_str(FULL).unwrap();

        assert_eq!(config.period_s, 0.01);
        assert!(!config.enable_software_pid);
        assert_eq!(
            config.fusion,
            FusionStrategy::BoundedDisagreement { tolerance_deg: 3.0 }
        );
        assert_eq!(config.turret.initial_target_deg, 15.0);
        assert_eq!(config.turret.gains, PidGains::new(0.1, 0.0, 0.01));
        assert_eq!(config.wrist, ArmConfig::default().wrist, "missing joints keep defaults");
    }

    #[test]
    fn fusion_accepts_unit_variant() {
        let config = ArmConfig::from_toml_str("fusion = \"potentiometer_only\"").unwrap();

        assert_eq!(config.fusion, FusionStrategy::PotentiometerOnly);
    }

    #[test]
    fn malformed_file_is_a_deserialise_error() {
        let result = ArmConfig::from_toml_str("period_s = \"fast\"");

        assert!(matches!(result, Err(ConfigError::Deserialise(_))));
    }

    #[test]
    fn validate_rejects_bad_period_and_limits() {
        assert!(ArmConfig::default().validate().is_ok());

        let mut config = ArmConfig::default();
        config.period_s = 0.0;
        assert!(matches!(config.validate(), Err(ArmError::InvalidPeriod(_))));

        let mut config = ArmConfig::default();
        config.elbow.max_power = -0.5;
        assert!(matches!(config.validate(), Err(ArmError::InvalidPowerLimit(_))));
    }

    #[test]
    fn shipped_parameter_file_matches_defaults() {
        let config = ArmConfig::from_toml_str(include_str!("../params/arm.toml")).unwrap();

        assert_eq!(config, ArmConfig::default());
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let result = ArmConfig::load("/nonexistent/arm.toml");

        assert!(matches!(result, Err(ConfigError::FileLoad(_))));
    }
}
