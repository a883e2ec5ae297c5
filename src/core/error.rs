use thiserror::Error;

use crate::config::ConfigError;
use crate::core::state::Joint;

#[derive(Debug, Error)]
pub enum ArmError {
    #[error("{0} joint has no position sensor attached")]
    NoSensors(Joint),

    #[error("Invalid power limit {0}: expected a finite, non-negative bound")]
    InvalidPowerLimit(f64),

    #[error("Invalid control period {0}s: expected a finite, positive period")]
    InvalidPeriod(f64),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
