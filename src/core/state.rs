use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::error::ArmError;

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Joint {
    Turret,
    Shoulder,
    Elbow,
    Wrist,
}

impl Joint {
    /// Order in which joints are evaluated each tick.
    pub const ALL: [Joint; 4] = [Joint::Turret, Joint::Shoulder, Joint::Elbow, Joint::Wrist];

    pub fn index(&self) -> usize {
        match self {
            Joint::Turret => 0,
            Joint::Shoulder => 1,
            Joint::Elbow => 2,
            Joint::Wrist => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Joint::Turret => "Turret",
            Joint::Shoulder => "Shoulder",
            Joint::Elbow => "Elbow",
            Joint::Wrist => "Wrist",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mounting side of a paired encoder.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn name(&self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
        }
    }
}

#[derive(PartialEq, Clone, Copy, Debug, Default)]
pub struct JointState {
    pub measured_angle_deg: f64,
    pub target_angle_deg: f64,
}

#[derive(PartialEq, Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct PidGains {
    pub p: f64,
    pub i: f64,
    pub d: f64,
}

impl PidGains {
    pub fn new(p: f64, i: f64, d: f64) -> Self {
        Self { p, i, d }
    }
}

/// Symmetric saturation bound for a joint's motor power.
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct PowerLimit {
    max_magnitude: f64,
}

impl PowerLimit {
    pub fn new(max_magnitude: f64) -> Result<Self, ArmError> {
        if !max_magnitude.is_finite() || max_magnitude < 0.0 {
            return Err(ArmError::InvalidPowerLimit(max_magnitude));
        }

        Ok(Self { max_magnitude })
    }

    pub fn max_magnitude(&self) -> f64 {
        self.max_magnitude
    }

    /// Clamps `value` to `[-max, max]`. NaN maps to zero power.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            warn!("NaN power command, failing safe to 0");
            return 0.0;
        }

        value.clamp(-self.max_magnitude, self.max_magnitude)
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum ArmControlMode {
    #[default]
    Disabled,
    SoftwarePid,
}

impl ArmControlMode {
    pub fn dashboard_label(&self) -> &'static str {
        match self {
            ArmControlMode::Disabled => "Disabled",
            ArmControlMode::SoftwarePid => "Enabled",
        }
    }
}
