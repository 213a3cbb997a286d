//! fieldops-engine
//!
//! Field-operations optimization: agent-to-customer assignment, daily route
//! sequencing, and lending budget allocation. Every operation is a pure
//! function of the snapshot it is given.

pub mod assign;
pub mod budget;
pub mod config;
pub mod error;
pub mod geo;
pub mod ops;
pub mod optimize;
pub mod route;
pub mod traits;

pub use error::{EngineError, Result};
