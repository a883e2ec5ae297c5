pub mod error;
pub mod hardware;
pub mod state;

pub use error::*;
pub use hardware::*;
pub use state::*;
