//! Power-law per-area price curve
//!
//! Provides the closed-form log-log regression that turns anchor observations
//! into a continuous price-per-square-metre function, and the clamped curve
//! type evaluated for sizes without an exact anchor.

pub mod fit;
pub mod types;

pub use fit::*;
pub use types::*;
