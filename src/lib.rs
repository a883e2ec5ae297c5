pub mod config;
pub mod control;
pub mod core;
pub mod simulation;
pub mod telemetry;
pub mod ui;

// Re-export key items
pub use self::core::*;
pub use config::*;
pub use control::*;
pub use simulation::*;
pub use telemetry::*;
