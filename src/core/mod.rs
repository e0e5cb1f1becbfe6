//! Core application primitives (orchestrator, cadence, scheduling, HTTP)

pub mod cadence;
pub mod http;
pub mod scanner;
pub mod scheduler;

pub use http::*;
pub use scanner::*;
pub use scheduler::*;
