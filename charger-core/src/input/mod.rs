//! Power key and alarm key handling
//!
//! The input monitor is an explicit state machine. Every arriving event
//! goes through `InputMachine::evaluate`, whether it arrived during the
//! nominal poll or during the screen-on countdown wait.

pub mod event;
pub mod machine;

pub use event::{InputEvent, KeyMap, EV_KEY, KEY_BRL_DOT8, KEY_POWER};
pub use machine::{InputMachine, InputOutcome, InputState};
