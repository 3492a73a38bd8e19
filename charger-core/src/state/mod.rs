//! Shared runtime state for the monitor threads
//!
//! The exit flag, last status and iteration counter are shared by all
//! three monitors without a lock. Readers may observe a value one
//! iteration stale; nothing depends on cross-thread ordering.

pub mod runtime;
pub mod status;

pub use runtime::RuntimeState;
pub use status::{Mode, ThreadStatus};
