//! Core types shared by every layer of release-agent.
//!
//! Currently this is the error system: [`DeployError`] for the failures the
//! release flow can name and [`ErrorContext`] / [`user_friendly_error`] for
//! presenting them to an operator.

pub mod error;

pub use error::{DeployError, ErrorContext, user_friendly_error};
