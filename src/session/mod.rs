pub mod controller;
pub mod state;

pub use controller::{SessionController, SessionOutcome, SessionSnapshot};
pub use state::format_clock;
