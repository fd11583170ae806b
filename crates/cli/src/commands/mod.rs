//! Command implementations.

mod clean;
mod events;
mod info;
mod validate;

pub use clean::run_clean;
pub use events::run_events;
pub use info::run_info;
pub use validate::run_validate;
