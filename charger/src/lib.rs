//! Offline charging UI
//!
//! Application layer shared by the `charger` and `charged` binaries:
//!
//! - Configuration loading (embedded charger.toml plus override file)
//! - Kernel log output
//! - Boot mode gate and startup retries
//! - Charge panel shared by the monitor threads
//! - Charge, power and input monitor loops
//! - Reboot and power-off
//! - Battery statistics daemon

pub mod boot;
pub mod config;
pub mod logging;
pub mod runtime;
pub mod stats;
pub mod system;
pub mod tasks;
