//! BWC configuration: file format, location resolution and the store.
//!
//! Two tiers exist and exactly one is effective per invocation:
//!
//! - **Global**: `~/.bwc/config.json` (or `BWC_CONFIG_PATH`), written by `bwc init`
//! - **Project**: `bwc.config.json` or `.bwc/config.json` in the working directory
//!   or any ancestor, written by `bwc init --project`
//!
//! The project tier wins unless `--user` forces the global one.

pub mod locations;
pub mod model;
pub mod store;

pub use locations::{ConfigLocations, ProjectConfigPath};
pub use model::{BwcConfig, Installed, InstalledMcpServers, ResourcePaths};
pub use store::{ConfigStore, LoadedConfig};
