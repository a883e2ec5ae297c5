use std::cell::RefCell;
use std::rc::Rc;

use crate::core::error::ArmError;
use crate::core::state::{Joint, Side};

pub trait Encoder {
    /// Position in encoder pulses since the last reset.
    fn get_position(&self) -> f64;
    fn set_position(&mut self, position: f64);
}

pub trait Potentiometer {
    fn get_voltage(&self) -> f64;
}

pub trait Motor {
    /// Normalized power in [-1, 1].
    fn set_power(&mut self, power: f64);
}

/// A leader motor plus any followers mirroring its output.
pub struct MotorGroup<'a> {
    leader: Rc<RefCell<dyn Motor + 'a>>,
    followers: Vec<(Rc<RefCell<dyn Motor + 'a>>, bool)>,
}

impl<'a> MotorGroup<'a> {
    pub fn new(leader: Rc<RefCell<impl Motor + 'a>>) -> Self {
        Self {
            leader,
            followers: Vec::new(),
        }
    }

    pub fn with_follower(mut self, follower: Rc<RefCell<impl Motor + 'a>>, inverted: bool) -> Self {
        let follower: Rc<RefCell<dyn Motor + 'a>> = follower;
        self.followers.push((follower, inverted));
        self
    }

    pub fn set_power(&self, power: f64) {
        self.leader.borrow_mut().set_power(power);

        for (follower, inverted) in &self.followers {
            let power = if *inverted { -power } else { power };
            follower.borrow_mut().set_power(power);
        }
    }
}

pub struct MountedEncoder<'a> {
    pub side: Option<Side>,
    pub encoder: Rc<RefCell<dyn Encoder + 'a>>,
}

/// Position sensors attached to one joint. At least one is always present.
pub struct JointSensors<'a> {
    potentiometer: Option<Rc<RefCell<dyn Potentiometer + 'a>>>,
    encoders: Vec<MountedEncoder<'a>>,
}

impl<'a> JointSensors<'a> {
    pub fn new(
        joint: Joint,
        potentiometer: Option<Rc<RefCell<dyn Potentiometer + 'a>>>,
        encoders: Vec<MountedEncoder<'a>>,
    ) -> Result<Self, ArmError> {
        if potentiometer.is_none() && encoders.is_empty() {
            return Err(ArmError::NoSensors(joint));
        }

        Ok(Self {
            potentiometer,
            encoders,
        })
    }

    pub fn potentiometer_voltage(&self) -> Option<f64> {
        self.potentiometer.as_ref().map(|pot| pot.borrow().get_voltage())
    }

    pub fn encoder_pulses(&self) -> impl Iterator<Item = (Option<Side>, f64)> + '_ {
        self.encoders
            .iter()
            .map(|mounted| (mounted.side, mounted.encoder.borrow().get_position()))
    }
}

pub struct JointHardware<'a> {
    pub motors: MotorGroup<'a>,
    pub sensors: JointSensors<'a>,
}

pub struct ArmHardware<'a> {
    pub turret: JointHardware<'a>,
    pub shoulder: JointHardware<'a>,
    pub elbow: JointHardware<'a>,
    pub wrist: JointHardware<'a>,
}

impl<'a> ArmHardware<'a> {
    pub(crate) fn into_ordered(self) -> [(Joint, JointHardware<'a>); 4] {
        [
            (Joint::Turret, self.turret),
            (Joint::Shoulder, self.shoulder),
            (Joint::Elbow, self.elbow),
            (Joint::Wrist, self.wrist),
        ]
    }
}
