use std::{cell::RefCell, env, rc::Rc, thread, time::Duration};

use arm_control::{
    ArmConfig, ArmHardware, ArmSubsystem, Joint, JointPhysics, SimulatedJoint, TuningDashboard,
    ui::terminal_ui,
};
use chrono::Local;
use fern::Dispatch;
use log::info;

fn setup_logger() -> Result<(), Box<dyn std::error::Error>> {
    Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(std::fs::File::create("arm.log")?)
        .apply()?;

    Ok(())
}

fn simulated_joint(config: &ArmConfig, joint: Joint) -> SimulatedJoint {
    let joint_config = config.joint(joint);
    let (encoders, potentiometer, follower) = match joint {
        Joint::Turret => (1, true, false),
        Joint::Shoulder | Joint::Elbow => (2, true, true),
        Joint::Wrist => (1, false, false),
    };

    SimulatedJoint::new(
        JointPhysics::new(120.0, 0.15, 0.0),
        encoders,
        potentiometer,
        follower,
        joint_config.degrees_per_pulse,
        joint_config.pot_degrees_per_volt,
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logger()?;

    println!("arm-control.");
    let config = match env::args().nth(1) {
        Some(path) => {
            info!("loading parameters from {path}");
            ArmConfig::load(path)?
        }
        None => ArmConfig::default(),
    };

    let mut sims: Vec<SimulatedJoint> = Joint::ALL
        .iter()
        .map(|&joint| simulated_joint(&config, joint))
        .collect();

    let hardware = ArmHardware {
        turret: sims[Joint::Turret.index()].hardware(Joint::Turret)?,
        shoulder: sims[Joint::Shoulder.index()].hardware(Joint::Shoulder)?,
        elbow: sims[Joint::Elbow.index()].hardware(Joint::Elbow)?,
        wrist: sims[Joint::Wrist.index()].hardware(Joint::Wrist)?,
    };

    let dashboard = Rc::new(RefCell::new(TuningDashboard::new()));
    let period = config.period_s;
    let ticks = config.sim_ticks;
    let mut arm = ArmSubsystem::new(config, hardware, Rc::clone(&dashboard))?;

    arm.set_target_angle(Joint::Turret, 45.0);
    arm.set_target_angle(Joint::Shoulder, 30.0);
    arm.set_target_angle(Joint::Elbow, -20.0);
    arm.set_target_angle(Joint::Wrist, 90.0);
    arm.enable_arm_pid();

    for tick in 0..ticks {
        // Control Loop - decide how to move -> outputs motor power
        arm.periodic();

        // Physics Loop - decide what happened -> outputs sensor readings
        for sim in &mut sims {
            sim.step(period);
        }

        terminal_ui::log_to_terminal(&terminal_ui::collect_display_data(tick, &arm, &sims));

        thread::sleep(Duration::from_secs_f64(period));
    }

    arm.disable_arm_pid();
    for joint in Joint::ALL {
        arm.set_motor_power(joint, 0.0);
    }
    info!("simulation finished after {ticks} ticks, {} dashboard entries", dashboard.borrow().len());

    Ok(())
}
