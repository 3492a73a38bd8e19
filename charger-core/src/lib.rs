//! Board-agnostic core logic for the offline charging UI
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Collaborator traits (battery, lights, alarm, input, clock, renderer)
//! - Shared runtime state for the monitor threads
//! - Input state machine for the power key and alarm key
//! - LED, health and progress-bar decision logic
//! - Alarm window and miscdata record layout
//! - Timing constants

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod alarm;
pub mod charge;
pub mod input;
pub mod miscdata;
pub mod state;
pub mod system;
pub mod timing;
pub mod traits;
