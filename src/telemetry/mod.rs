//! Tuning and telemetry store used by the arm.
//!
//! The arm never looks a dashboard up globally: it is handed a
//! [`ParameterStore`] and talks to it through typed [`DashboardKey`]s, which
//! render to the string names operators see (e.g. `TargetTurretP` in the
//! `TurretSoftwarePID` group).

mod dashboard;

pub use dashboard::*;

use std::fmt;

use crate::core::{Joint, Side};

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum GainTerm {
    P,
    I,
    D,
}

impl GainTerm {
    pub const ALL: [GainTerm; 3] = [GainTerm::P, GainTerm::I, GainTerm::D];

    fn letter(&self) -> &'static str {
        match self {
            GainTerm::P => "P",
            GainTerm::I => "I",
            GainTerm::D => "D",
        }
    }
}

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum DashboardKey {
    PotVoltage(Joint),
    EncoderPulses(Joint, Option<Side>),
    MotorPower(Joint),
    MeasuredAngle(Joint),
    PidEnable,
    TargetAngle(Joint),
    Gain(Joint, GainTerm),
}

impl DashboardKey {
    pub fn group(&self) -> String {
        match self {
            DashboardKey::PotVoltage(_) => "Potentiometers".to_string(),
            DashboardKey::EncoderPulses(_, _) => "Encoders".to_string(),
            DashboardKey::MotorPower(_) => "MotorInputs".to_string(),
            DashboardKey::MeasuredAngle(_) => "JointAngles".to_string(),
            DashboardKey::PidEnable => "PidMasterControl".to_string(),
            DashboardKey::TargetAngle(joint) | DashboardKey::Gain(joint, _) => {
                format!("{joint}SoftwarePID")
            }
        }
    }

    pub fn name(&self) -> String {
        match self {
            DashboardKey::PotVoltage(joint) => format!("{joint}PotVoltage"),
            DashboardKey::EncoderPulses(joint, Some(side)) => {
                format!("{joint}Encoder{}Pulses", side.name())
            }
            DashboardKey::EncoderPulses(joint, None) => format!("{joint}EncoderPulses"),
            DashboardKey::MotorPower(joint) => format!("{joint}MotorPower"),
            DashboardKey::MeasuredAngle(joint) => format!("{joint}Angle"),
            DashboardKey::PidEnable => "ArmSoftwarePidEnable".to_string(),
            DashboardKey::TargetAngle(joint) => format!("Target{joint}Angle"),
            DashboardKey::Gain(joint, term) => format!("Target{joint}{}", term.letter()),
        }
    }
}

impl fmt::Display for DashboardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Live key-value store for tuning parameters and telemetry.
///
/// `register_*` creates a key with a default and leaves an existing value
/// alone. `update_*` overwrites, creating the key if needed.
pub trait ParameterStore {
    fn register_number(&mut self, key: &DashboardKey, default: f64);
    fn register_string(&mut self, key: &DashboardKey, default: &str);

    fn get_number(&self, key: &DashboardKey) -> Option<f64>;
    fn get_string(&self, key: &DashboardKey) -> Option<String>;

    fn update_number(&mut self, key: &DashboardKey, value: f64);
    fn update_string(&mut self, key: &DashboardKey, value: &str);
}

#[cfg(test)]
mod key_tests {
    use super::*;

    #[test]
    fn keys_render_dashboard_names() {
        let cases = [
            (DashboardKey::Gain(Joint::Turret, GainTerm::P), "TurretSoftwarePID", "TargetTurretP"),
            (DashboardKey::Gain(Joint::Wrist, GainTerm::D), "WristSoftwarePID", "TargetWristD"),
            (DashboardKey::TargetAngle(Joint::Elbow), "ElbowSoftwarePID", "TargetElbowAngle"),
            (DashboardKey::PotVoltage(Joint::Shoulder), "Potentiometers", "ShoulderPotVoltage"),
            (
                DashboardKey::EncoderPulses(Joint::Elbow, Some(Side::Left)),
                "Encoders",
                "ElbowEncoderLeftPulses",
            ),
            (DashboardKey::EncoderPulses(Joint::Turret, None), "Encoders", "TurretEncoderPulses"),
            (DashboardKey::MotorPower(Joint::Wrist), "MotorInputs", "WristMotorPower"),
            (DashboardKey::PidEnable, "PidMasterControl", "ArmSoftwarePidEnable"),
        ];

        for (key, group, name) in cases {
            assert_eq!(key.group(), group, "group of {key:?}");
            assert_eq!(key.to_string(), name, "name of {key:?}");
        }
    }
}
