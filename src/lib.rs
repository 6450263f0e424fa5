pub mod aggregate;
pub mod chart;
pub mod delivery;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod output;
pub mod palette;
pub mod phase;
pub mod players;
pub mod report;
pub mod session;

pub use error::{CricError, Result};
pub use session::Match;
