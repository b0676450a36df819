//! Quote calculation
//!
//! Combines the per-area price, the resolved discount factor and the order
//! quantity into a [`Quote`], and builds price grids over catalog presets.

pub mod calculator;
pub mod grid;
pub mod types;

pub use calculator::*;
pub use grid::*;
pub use types::*;
