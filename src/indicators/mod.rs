//! Indicator library: pure transforms over price series.
//!
//! Every series function returns an empty `Vec` when the input is shorter than
//! its minimum window; the `calculate_*` helpers turn that into `None`.

pub mod momentum;
pub mod trend;

pub use momentum::*;
pub use trend::*;
