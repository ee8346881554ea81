//! Integration test suite for BWC
//!
//! Drives the `bwc` binary end to end. Registry access always points at an
//! unreachable address, and the Claude CLI is a shell script that records
//! its arguments.
//!
//! ```bash
//! cargo test --test integration
//! ```

#[path = "../common/mod.rs"]
mod common;

mod init;
mod list;
mod mcp_lifecycle;
mod validation;
