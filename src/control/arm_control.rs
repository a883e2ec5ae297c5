use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, trace, warn};

use crate::config::{ArmConfig, JointConfig};
use crate::control::fusion::JointReadings;
use crate::control::pid::JointPidController;
use crate::core::{
    ArmControlMode, ArmError, ArmHardware, Joint, JointHardware, JointState, PowerLimit,
};
use crate::telemetry::{DashboardKey, GainTerm, ParameterStore};

struct JointChannel<'a> {
    joint: Joint,
    hardware: JointHardware<'a>,
    degrees_per_pulse: f64,
    pot_degrees_per_volt: f64,
    controller: JointPidController,
    limit: PowerLimit,
    last_power: f64,
}

impl<'a> JointChannel<'a> {
    fn new(
        joint: Joint,
        hardware: JointHardware<'a>,
        config: &JointConfig,
        period: f64,
    ) -> Result<Self, ArmError> {
        let mut controller = JointPidController::new(config.gains, period);
        controller.set_target(config.initial_target_deg);

        Ok(Self {
            joint,
            hardware,
            degrees_per_pulse: config.degrees_per_pulse,
            pot_degrees_per_volt: config.pot_degrees_per_volt,
            controller,
            limit: PowerLimit::new(config.max_power)?,
            last_power: 0.0,
        })
    }

    fn readings(&self) -> JointReadings {
        let pot_angle = self
            .hardware
            .sensors
            .potentiometer_voltage()
            .map(|volts| volts * self.pot_degrees_per_volt);
        let mut encoder_angles = self
            .hardware
            .sensors
            .encoder_pulses()
            .map(|(_, pulses)| pulses * self.degrees_per_pulse);

        // JointSensors::new rejects joints with no sensor at all.
        match pot_angle {
            Some(primary) => JointReadings {
                primary,
                redundant: encoder_angles.collect(),
            },
            None => JointReadings {
                primary: encoder_angles.next().unwrap_or(f64::NAN),
                redundant: encoder_angles.collect(),
            },
        }
    }

    fn drive(&mut self, power: f64) {
        self.hardware.motors.set_power(power);
        self.last_power = power;
    }
}

/// The arm: four PID-driven joints, a control mode, and a tuning store.
///
/// Call [`ArmSubsystem::periodic`] once per scheduler cycle. Motor power can
/// also be commanded directly through [`ArmSubsystem::set_motor_power`] at
/// any time; while the mode is [`ArmControlMode::Disabled`] nothing else
/// writes to the motors.
pub struct ArmSubsystem<'a> {
    config: ArmConfig,
    channels: Vec<JointChannel<'a>>,
    store: Rc<RefCell<dyn ParameterStore + 'a>>,
    mode: ArmControlMode,
}

impl<'a> ArmSubsystem<'a> {
    pub fn new(
        config: ArmConfig,
        hardware: ArmHardware<'a>,
        store: Rc<RefCell<impl ParameterStore + 'a>>,
    ) -> Result<Self, ArmError> {
        config.validate()?;

        let channels = hardware
            .into_ordered()
            .into_iter()
            .map(|(joint, hardware)| {
                JointChannel::new(joint, hardware, config.joint(joint), config.period_s)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let arm = Self {
            config,
            channels,
            store,
            mode: ArmControlMode::Disabled,
        };
        arm.register_dashboard();

        info!(
            "arm ready: period {}s, software pid {}, fusion {:?}",
            arm.config.period_s,
            if arm.config.enable_software_pid { "available" } else { "unavailable" },
            arm.config.fusion
        );

        Ok(arm)
    }

    fn register_dashboard(&self) {
        let mut store = self.store.borrow_mut();

        for channel in &self.channels {
            let joint = channel.joint;
            let sensors = &channel.hardware.sensors;

            if sensors.potentiometer_voltage().is_some() {
                store.register_number(&DashboardKey::PotVoltage(joint), 0.0);
            }
            for (side, _) in sensors.encoder_pulses() {
                store.register_number(&DashboardKey::EncoderPulses(joint, side), 0.0);
            }
            store.register_number(&DashboardKey::MotorPower(joint), 0.0);
            store.register_number(&DashboardKey::MeasuredAngle(joint), 0.0);

            let gains = channel.controller.gains();
            store.register_number(&DashboardKey::TargetAngle(joint), channel.controller.target());
            store.register_number(&DashboardKey::Gain(joint, GainTerm::P), gains.p);
            store.register_number(&DashboardKey::Gain(joint, GainTerm::I), gains.i);
            store.register_number(&DashboardKey::Gain(joint, GainTerm::D), gains.d);
        }

        store.register_string(&DashboardKey::PidEnable, self.mode.dashboard_label());
    }

    fn channel(&self, joint: Joint) -> &JointChannel<'a> {
        &self.channels[joint.index()]
    }

    fn channel_mut(&mut self, joint: Joint) -> &mut JointChannel<'a> {
        &mut self.channels[joint.index()]
    }

    pub fn mode(&self) -> ArmControlMode {
        self.mode
    }

    pub fn config(&self) -> &ArmConfig {
        &self.config
    }

    /// Fused angle of `joint` in degrees.
    pub fn joint_angle(&self, joint: Joint) -> f64 {
        self.channel(joint).readings().fuse(self.config.fusion)
    }

    pub fn joint_state(&self, joint: Joint) -> JointState {
        JointState {
            measured_angle_deg: self.joint_angle(joint),
            target_angle_deg: self.channel(joint).controller.target(),
        }
    }

    /// Last power sent to `joint`'s motors, by the loop or directly.
    pub fn motor_power(&self, joint: Joint) -> f64 {
        self.channel(joint).last_power
    }

    pub fn integral(&self, joint: Joint) -> f64 {
        self.channel(joint).controller.get_integral()
    }

    /// Commands motor power directly, bypassing the PID loop and the clamp.
    pub fn set_motor_power(&mut self, joint: Joint, power: f64) {
        debug!("direct {joint} power {power:.3}");
        self.channel_mut(joint).drive(power);
    }

    /// Sets a joint target. Written through to the store so the next tuning
    /// refresh does not revert it.
    pub fn set_target_angle(&mut self, joint: Joint, angle_deg: f64) {
        self.channel_mut(joint).controller.set_target(angle_deg);
        self.store
            .borrow_mut()
            .update_number(&DashboardKey::TargetAngle(joint), angle_deg);
    }

    /// Switches to software PID. Controller history is cleared when coming
    /// out of `Disabled`.
    pub fn enable_arm_pid(&mut self) {
        if !self.config.enable_software_pid {
            warn!("software pid is unavailable in this configuration, staying disabled");
            return;
        }

        if self.mode == ArmControlMode::Disabled {
            for channel in &mut self.channels {
                channel.controller.reset();
            }
            info!("arm pid enabled");
        }
        self.mode = ArmControlMode::SoftwarePid;
    }

    pub fn disable_arm_pid(&mut self) {
        if self.mode != ArmControlMode::Disabled {
            info!("arm pid disabled");
        }
        self.mode = ArmControlMode::Disabled;
    }

    /// Pulls gains and targets for every joint from the store. Keys missing
    /// from the store keep their current value.
    fn refresh_tuning(&mut self) {
        let store = self.store.borrow();

        for channel in &mut self.channels {
            let joint = channel.joint;
            let current = channel.controller.gains();

            let p = store.get_number(&DashboardKey::Gain(joint, GainTerm::P)).unwrap_or(current.p);
            let i = store.get_number(&DashboardKey::Gain(joint, GainTerm::I)).unwrap_or(current.i);
            let d = store.get_number(&DashboardKey::Gain(joint, GainTerm::D)).unwrap_or(current.d);
            channel.controller.set_gains(p, i, d);

            if let Some(target) = store.get_number(&DashboardKey::TargetAngle(joint)) {
                channel.controller.set_target(target);
            }
        }
    }

    /// One control cycle in `mode`.
    pub fn tick(&mut self, mode: ArmControlMode) {
        match mode {
            ArmControlMode::Disabled => {}
            ArmControlMode::SoftwarePid => {
                self.refresh_tuning();

                let fusion = self.config.fusion;
                for channel in &mut self.channels {
                    let measured = channel.readings().fuse(fusion);
                    let raw = channel.controller.evaluate(measured);
                    let power = channel.limit.clamp(raw);

                    trace!(
                        "{} measured {measured:.2} target {:.2} raw {raw:.3} power {power:.3}",
                        channel.joint,
                        channel.controller.target()
                    );
                    channel.drive(power);
                }
            }
        }
    }

    fn publish_telemetry(&self) {
        let mut store = self.store.borrow_mut();

        for channel in &self.channels {
            let joint = channel.joint;
            let sensors = &channel.hardware.sensors;

            if let Some(volts) = sensors.potentiometer_voltage() {
                store.update_number(&DashboardKey::PotVoltage(joint), volts);
            }
            for (side, pulses) in sensors.encoder_pulses() {
                store.update_number(&DashboardKey::EncoderPulses(joint, side), pulses);
            }
            store.update_number(&DashboardKey::MotorPower(joint), channel.last_power);
            store.update_number(
                &DashboardKey::MeasuredAngle(joint),
                channel.readings().fuse(self.config.fusion),
            );
        }

        store.update_string(&DashboardKey::PidEnable, self.mode.dashboard_label());
    }

    /// Scheduler entry point: publish telemetry, then run the loop in the
    /// current mode.
    pub fn periodic(&mut self) {
        self.publish_telemetry();

        if self.config.enable_software_pid {
            self.tick(self.mode);
        }
    }
}
