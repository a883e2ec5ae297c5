use crate::core::{Encoder, Motor, Potentiometer};

pub struct SimulatedEncoder {
    position: f64,
}

impl SimulatedEncoder {
    pub fn new(initial_position: f64) -> Self {
        Self {
            position: initial_position,
        }
    }
}

impl Encoder for SimulatedEncoder {
    fn get_position(&self) -> f64 {
        self.position
    }

    fn set_position(&mut self, position: f64) {
        self.position = position;
    }
}

pub struct SimulatedPotentiometer {
    voltage: f64,
}

impl SimulatedPotentiometer {
    pub fn new(initial_voltage: f64) -> Self {
        Self {
            voltage: initial_voltage,
        }
    }

    pub fn set_voltage(&mut self, voltage: f64) {
        self.voltage = voltage;
    }
}

impl Potentiometer for SimulatedPotentiometer {
    fn get_voltage(&self) -> f64 {
        self.voltage
    }
}

#[derive(Default)]
pub struct SimulatedMotor {
    power: f64,
}

impl SimulatedMotor {
    pub fn new() -> Self {
        Self { power: 0.0 }
    }

    pub fn get_power(&self) -> f64 {
        self.power
    }
}

impl Motor for SimulatedMotor {
    fn set_power(&mut self, power: f64) {
        self.power = power;
    }
}
