//! Integration test suite for release-agent
//!
//! End-to-end runs of the `do-release` binary against a local-directory
//! repository, with service commands that append to a log file instead of
//! touching a real service manager.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **cli**: argument validation and usage output
//! - **release_flow**: decide-and-apply runs, exit codes and the retry loop

#[path = "../common/mod.rs"]
mod common;

mod cli;
mod release_flow;
