pub mod arm_control;
pub mod fusion;
pub mod pid;

pub use arm_control::*;
pub use fusion::*;
pub use pid::*;
