use std::cell::RefCell;
use std::rc::Rc;

use crate::core::{
    ArmError, Encoder, Joint, JointHardware, JointSensors, MotorGroup, MountedEncoder,
    Potentiometer, Side,
};
use crate::simulation::{SimulatedEncoder, SimulatedMotor, SimulatedPotentiometer};

/// First-order model of a motor-driven rotary joint.
pub struct JointPhysics {
    // Physical parameters
    max_speed: f64,     // deg/s at full power
    time_constant: f64, // s

    // State variables
    angle: f64,    // deg
    velocity: f64, // deg/s

    // Input
    power: f64,
}

impl JointPhysics {
    pub fn new(max_speed: f64, time_constant: f64, angle: f64) -> Self {
        Self {
            max_speed,
            time_constant,
            angle,
            velocity: 0.0,
            power: 0.0,
        }
    }

    pub fn update(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }

        let commanded = self.power.clamp(-1.0, 1.0) * self.max_speed;
        let blend = (dt / self.time_constant).min(1.0);

        self.velocity += (commanded - self.velocity) * blend;
        self.angle += self.velocity * dt;
    }

    pub fn set_power(&mut self, power: f64) {
        self.power = power;
    }

    pub fn get_angle(&self) -> f64 {
        self.angle
    }

    pub fn get_velocity(&self) -> f64 {
        self.velocity
    }
}

/// A simulated joint: the motor it reads and the sensors it writes.
pub struct SimulatedJoint {
    pub physics: JointPhysics,
    pub motor: Rc<RefCell<SimulatedMotor>>,
    pub follower: Option<Rc<RefCell<SimulatedMotor>>>,
    pub encoders: Vec<Rc<RefCell<SimulatedEncoder>>>,
    pub potentiometer: Option<Rc<RefCell<SimulatedPotentiometer>>>,
    degrees_per_pulse: f64,
    pot_degrees_per_volt: f64,
}

impl SimulatedJoint {
    pub fn new(
        physics: JointPhysics,
        encoder_count: usize,
        with_potentiometer: bool,
        with_follower: bool,
        degrees_per_pulse: f64,
        pot_degrees_per_volt: f64,
    ) -> Self {
        let mut joint = Self {
            physics,
            motor: Rc::new(RefCell::new(SimulatedMotor::new())),
            follower: with_follower.then(|| Rc::new(RefCell::new(SimulatedMotor::new()))),
            encoders: (0..encoder_count)
                .map(|_| Rc::new(RefCell::new(SimulatedEncoder::new(0.0))))
                .collect(),
            potentiometer: with_potentiometer
                .then(|| Rc::new(RefCell::new(SimulatedPotentiometer::new(0.0)))),
            degrees_per_pulse,
            pot_degrees_per_volt,
        };
        joint.write_sensors();
        joint
    }

    fn write_sensors(&mut self) {
        let angle = self.physics.get_angle();

        for encoder in &self.encoders {
            encoder
                .borrow_mut()
                .set_position(angle / self.degrees_per_pulse);
        }
        if let Some(pot) = &self.potentiometer {
            pot.borrow_mut().set_voltage(angle / self.pot_degrees_per_volt);
        }
    }

    /// Wires this joint's devices the way the robot does: followers run
    /// inverted, paired encoders are mounted left then right.
    pub fn hardware(&self, joint: Joint) -> Result<JointHardware<'static>, ArmError> {
        let mut motors = MotorGroup::new(Rc::clone(&self.motor));
        if let Some(follower) = &self.follower {
            motors = motors.with_follower(Rc::clone(follower), true);
        }

        let paired = self.encoders.len() == 2;
        let encoders = self
            .encoders
            .iter()
            .enumerate()
            .map(|(n, encoder)| MountedEncoder {
                side: match (paired, n) {
                    (false, _) => None,
                    (true, 0) => Some(Side::Left),
                    (true, _) => Some(Side::Right),
                },
                encoder: Rc::clone(encoder) as Rc<RefCell<dyn Encoder>>,
            })
            .collect();

        let potentiometer = self
            .potentiometer
            .as_ref()
            .map(|pot| Rc::clone(pot) as Rc<RefCell<dyn Potentiometer>>);

        Ok(JointHardware {
            motors,
            sensors: JointSensors::new(joint, potentiometer, encoders)?,
        })
    }

    /// Advance by `dt` seconds using the leader motor's power.
    pub fn step(&mut self, dt: f64) {
        self.physics.set_power(self.motor.borrow().get_power());
        self.physics.update(dt);
        self.write_sensors();
    }
}

#[cfg(test)]
mod physics_tests {
    use super::*;
    use crate::core::Motor;

    #[test]
    fn full_power_approaches_max_speed() {
        let mut physics = JointPhysics::new(90.0, 0.1, 0.0);
        physics.set_power(1.0);

        for _ in 0..100 {
            physics.update(0.02);
        }

        assert!((physics.get_velocity() - 90.0).abs() < 1e-3);
        assert!(physics.get_angle() > 0.0);
    }

    #[test]
    fn non_positive_dt_is_ignored() {
        let mut physics = JointPhysics::new(90.0, 0.1, 5.0);
        physics.set_power(1.0);
        physics.update(0.0);
        physics.update(-1.0);

        assert_eq!(physics.get_angle(), 5.0);
    }

    #[test]
    fn step_writes_sensors_in_their_units() {
        let mut joint = SimulatedJoint::new(JointPhysics::new(90.0, 0.1, 30.0), 2, true, false, 0.5, 60.0);

        assert_eq!(joint.encoders[0].borrow().get_position(), 60.0, "30 deg / 0.5");
        assert_eq!(joint.potentiometer.as_ref().unwrap().borrow().get_voltage(), 0.5);

        joint.motor.borrow_mut().set_power(0.5);
        joint.step(0.02);

        assert!(joint.encoders[1].borrow().get_position() > 60.0, "moved forward");
    }

    #[test]
    fn hardware_requires_a_sensor() {
        let bare = SimulatedJoint::new(JointPhysics::new(90.0, 0.1, 0.0), 0, false, false, 1.0, 1.0);

        assert!(matches!(bare.hardware(Joint::Wrist), Err(ArmError::NoSensors(Joint::Wrist))));
    }

    #[test]
    fn hardware_drives_follower_inverted() {
        let joint = SimulatedJoint::new(JointPhysics::new(90.0, 0.1, 0.0), 2, true, true, 1.0, 1.0);
        let hardware = joint.hardware(Joint::Elbow).unwrap();

        hardware.motors.set_power(0.25);

        assert_eq!(joint.motor.borrow().get_power(), 0.25);
        assert_eq!(joint.follower.as_ref().unwrap().borrow().get_power(), -0.25);
        let sides: Vec<_> = hardware.sensors.encoder_pulses().map(|(side, _)| side).collect();
        assert_eq!(sides, vec![Some(Side::Left), Some(Side::Right)]);
    }
}
