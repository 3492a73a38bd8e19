//! Monitor threads
//!
//! Each monitor runs its own loop on an OS thread until the shared exit
//! flag is set. Monitors share the charge panel and the runtime state.

pub mod charge;
pub mod input;
pub mod power;

pub use charge::ChargeMonitor;
pub use input::InputMonitor;
pub use power::PowerMonitor;

use charger_core::state::RuntimeState;
use charger_core::system::SystemAction;
use charger_core::traits::SystemControl;
use log::{error, info};

/// Perform a system action unless the operating mode restricts it
pub fn perform(system: &dyn SystemControl, state: &RuntimeState, action: SystemAction) {
    if action.is_none() {
        return;
    }

    let mode = state.operating_mode();
    if mode.is_restricted() {
        info!("{:?} suppressed in {:?} mode", action, mode);
        return;
    }

    if let Err(e) = system.perform(action) {
        error!("{:?} failed: {:?}", action, e);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Simulated clock and scripted collaborators for the monitor tests

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};

    use charger_core::charge::BatteryHealth;
    use charger_core::input::InputEvent;
    use charger_core::state::RuntimeState;
    use charger_core::system::SystemAction;
    use charger_core::traits::{
        AlarmSource, BatteryError, BatteryMonitor, Clock, InputError, InputSource, SystemControl,
        SystemError,
    };

    /// Clock that only moves when slept on or advanced
    #[derive(Default)]
    pub struct SimClock {
        now_us: AtomicU64,
    }

    impl SimClock {
        pub fn advance_ms(&self, ms: u64) {
            self.now_us.fetch_add(ms * 1000, Ordering::Relaxed);
        }

        pub fn now_ms(&self) -> u64 {
            self.now_us() / 1000
        }
    }

    impl Clock for SimClock {
        fn now_us(&self) -> u64 {
            self.now_us.load(Ordering::Relaxed)
        }

        fn sleep_ms(&self, ms: u32) {
            self.advance_ms(u64::from(ms));
        }
    }

    /// Input that delivers events after scripted delays
    ///
    /// Requests exit once the script runs out.
    pub struct ScriptedInput {
        clock: Arc<SimClock>,
        state: Arc<RuntimeState>,
        script: VecDeque<(u64, InputEvent)>,
    }

    impl ScriptedInput {
        pub fn new(
            clock: Arc<SimClock>,
            state: Arc<RuntimeState>,
            script: impl IntoIterator<Item = (u64, InputEvent)>,
        ) -> Self {
            Self {
                clock,
                state,
                script: script.into_iter().collect(),
            }
        }
    }

    impl InputSource for ScriptedInput {
        fn poll_event(&mut self, timeout_ms: u32) -> Result<Option<InputEvent>, InputError> {
            let timeout = u64::from(timeout_ms);
            match self.script.front().map(|(delay, _)| *delay) {
                Some(delay) if delay <= timeout => {
                    self.clock.advance_ms(delay);
                    Ok(self.script.pop_front().map(|(_, event)| event))
                }
                Some(_) => {
                    if let Some((delay, _)) = self.script.front_mut() {
                        *delay -= timeout;
                    }
                    self.clock.advance_ms(timeout);
                    Ok(None)
                }
                None => {
                    self.clock.advance_ms(timeout);
                    self.state.request_exit();
                    Ok(None)
                }
            }
        }
    }

    pub struct MockBattery {
        pub levels: Mutex<VecDeque<i32>>,
        pub ac: AtomicBool,
        pub usb: AtomicBool,
        pub health: Mutex<BatteryHealth>,
    }

    impl MockBattery {
        pub fn new(levels: impl IntoIterator<Item = i32>) -> Self {
            Self {
                levels: Mutex::new(levels.into_iter().collect()),
                ac: AtomicBool::new(false),
                usb: AtomicBool::new(true),
                health: Mutex::new(BatteryHealth::Good),
            }
        }

        pub fn set_health(&self, health: BatteryHealth) {
            *self.health.lock().unwrap() = health;
        }
    }

    impl BatteryMonitor for MockBattery {
        fn probe(&self) -> Result<(), BatteryError> {
            Ok(())
        }

        /// Repeats the last level once the sequence runs out
        fn capacity(&self) -> i32 {
            let mut levels = self.levels.lock().unwrap();
            if levels.len() > 1 {
                levels.pop_front().unwrap_or(-1)
            } else {
                levels.front().copied().unwrap_or(-1)
            }
        }

        fn ac_online(&self) -> bool {
            self.ac.load(Ordering::Relaxed)
        }

        fn usb_online(&self) -> bool {
            self.usb.load(Ordering::Relaxed)
        }

        fn health(&self) -> BatteryHealth {
            *self.health.lock().unwrap()
        }
    }

    pub struct FixedAlarm(pub bool);

    impl AlarmSource for FixedAlarm {
        fn alarm_imminent(&self) -> bool {
            self.0
        }
    }

    #[derive(Default)]
    pub struct RecordingSystem {
        pub performed: Mutex<Vec<SystemAction>>,
    }

    impl RecordingSystem {
        pub fn performed(&self) -> Vec<SystemAction> {
            self.performed.lock().unwrap().clone()
        }
    }

    impl SystemControl for RecordingSystem {
        fn perform(&self, action: SystemAction) -> Result<(), SystemError> {
            self.performed.lock().unwrap().push(action);
            Ok(())
        }
    }
}
