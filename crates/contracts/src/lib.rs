//! # Contracts
//!
//! Shared interface contracts: the in-memory recording schema, configuration
//! types and the error taxonomy. Every other crate depends on this one;
//! reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Uniform sampling: `times[i + 1] - times[i] == 1 / sampling_rate`
//! - Times are seconds (f64); the origin is 0 or the tracker's clock
//! - Events reference samples by index

mod error;
mod interp_kind;
mod interval;
mod message;
mod pipeline_config;
mod recording;
mod signal;
mod window;

pub use error::*;
pub use interp_kind::{InterpKind, MAX_SPLINE_ORDER};
pub use interval::*;
pub use message::MessageEvent;
pub use pipeline_config::*;
pub use recording::Recording;
pub use signal::*;
pub use window::WindowSpec;
