use crate::{ArmControlMode, ArmSubsystem, Joint, SimulatedJoint};

pub struct JointRow {
    pub joint: Joint,
    pub target_angle: f64,
    pub measured_angle: f64,
    pub power: f64,
    pub integral: f64,

    pub sim_angle: f64,
    pub sim_velocity: f64,
}

pub struct DisplayData {
    pub tick: u32,
    pub mode: ArmControlMode,
    pub rows: Vec<JointRow>,
}

pub fn format_mode(mode: ArmControlMode) -> String {
    match mode {
        ArmControlMode::Disabled => "DISABLED".to_string(),
        ArmControlMode::SoftwarePid => "SOFTWARE PID".to_string(),
    }
}

pub fn format_row(row: &JointRow) -> String {
    format!(
        "{:<9} target {:>8.2}  measured {:>8.2}  power {:>6.3}  integral {:>8.3}",
        row.joint.name(),
        row.target_angle,
        row.measured_angle,
        row.power,
        row.integral
    )
}

pub fn collect_display_data(tick: u32, arm: &ArmSubsystem, sims: &[SimulatedJoint]) -> DisplayData {
    let rows = Joint::ALL
        .iter()
        .zip(sims)
        .map(|(&joint, sim)| {
            let state = arm.joint_state(joint);
            JointRow {
                joint,
                target_angle: state.target_angle_deg,
                measured_angle: state.measured_angle_deg,
                power: arm.motor_power(joint),
                integral: arm.integral(joint),
                sim_angle: sim.physics.get_angle(),
                sim_velocity: sim.physics.get_velocity(),
            }
        })
        .collect();

    DisplayData {
        tick,
        mode: arm.mode(),
        rows,
    }
}

pub fn log_to_terminal(display_data: &DisplayData) {
    print!("\x1B[2J\x1B[1;1H");

    println!("--- Arm Control ---");
    println!("Tick: {}", display_data.tick);
    println!("Mode: {}", format_mode(display_data.mode));

    println!("\n--- Joints ---");
    for row in &display_data.rows {
        println!("{}", format_row(row));
    }

    println!("\n--- Physics Engine ---");
    for row in &display_data.rows {
        println!(
            "{:<9} angle {:>8.2}deg  velocity {:>8.2}deg/s",
            row.joint.name(),
            row.sim_angle,
            row.sim_velocity
        );
    }
    println!("----------------------\n");
}
