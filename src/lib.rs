//! Two small demonstrations of behaviour that only shows up at run time:
//! binary floating-point rounding of decimal literals, and state written by
//! a synchronously delivered signal handler.

pub mod error;
pub mod float;
pub mod logger;
pub mod raw_cell;
pub mod signal;
