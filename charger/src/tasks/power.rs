//! Power monitor
//!
//! Powers the device off once both chargers are unplugged.

use std::sync::Arc;

use charger_core::state::{Mode, RuntimeState, ThreadStatus};
use charger_core::system::SystemAction;
use charger_core::timing::POWER_POLL_MS;
use charger_core::traits::{BatteryMonitor, Clock, SystemControl};
use log::{debug, info};

use super::perform;

pub struct PowerMonitor {
    battery: Arc<dyn BatteryMonitor>,
    state: Arc<RuntimeState>,
    clock: Arc<dyn Clock>,
}

impl PowerMonitor {
    pub fn new(
        battery: Arc<dyn BatteryMonitor>,
        state: Arc<RuntimeState>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            battery,
            state,
            clock,
        }
    }

    /// Check the chargers once
    pub fn step(&self) -> SystemAction {
        if self.battery.charger_present() {
            self.state.set_status(ThreadStatus::PowerOk);
            return SystemAction::None;
        }

        info!("charger unplugged");
        self.state.set_status(ThreadStatus::PowerUnplugged);
        self.state.request_exit();
        SystemAction::PowerOff
    }

    pub fn run(&self, system: &dyn SystemControl) {
        info!("power monitor started");

        while !self.state.is_exit_requested() {
            if self.state.count_iteration(Mode::PowerTest) {
                debug!("power test iterations done");
            }
            let action = self.step();
            perform(system, &self.state, action);
            self.clock.sleep_ms(POWER_POLL_MS);
        }

        info!("power monitor stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::testing::{MockBattery, RecordingSystem, SimClock};
    use std::sync::atomic::Ordering;

    fn monitor(state: &Arc<RuntimeState>) -> (PowerMonitor, Arc<MockBattery>, Arc<SimClock>) {
        let battery = Arc::new(MockBattery::new([80]));
        let clock = Arc::new(SimClock::default());
        let monitor = PowerMonitor::new(battery.clone(), state.clone(), clock.clone());
        (monitor, battery, clock)
    }

    #[test]
    fn test_either_charger_keeps_running() {
        let state = Arc::new(RuntimeState::default());
        let (monitor, battery, _) = monitor(&state);

        for (ac, usb) in [(true, false), (false, true), (true, true)] {
            battery.ac.store(ac, Ordering::Relaxed);
            battery.usb.store(usb, Ordering::Relaxed);
            assert_eq!(monitor.step(), SystemAction::None);
            assert_eq!(state.status(), Some(ThreadStatus::PowerOk));
        }
        assert!(!state.is_exit_requested());
    }

    #[test]
    fn test_unplugged_powers_off() {
        let state = Arc::new(RuntimeState::default());
        let (monitor, battery, _) = monitor(&state);
        battery.usb.store(false, Ordering::Relaxed);

        let system = RecordingSystem::default();
        monitor.run(&system);

        assert_eq!(state.status(), Some(ThreadStatus::PowerUnplugged));
        assert!(state.is_exit_requested());
        assert_eq!(system.performed(), vec![SystemAction::PowerOff]);
    }

    #[test]
    fn test_unplug_ignores_capacity() {
        for level in [-1, 0, 100] {
            let state = Arc::new(RuntimeState::default());
            let battery = Arc::new(MockBattery::new([level]));
            battery.usb.store(false, Ordering::Relaxed);
            let monitor =
                PowerMonitor::new(battery, state.clone(), Arc::new(SimClock::default()));

            assert_eq!(monitor.step(), SystemAction::PowerOff);
            assert!(state.is_exit_requested());
        }
    }

    #[test]
    fn test_power_test_mode() {
        let state = Arc::new(RuntimeState::new(Mode::PowerTest));
        let (monitor, _, clock) = monitor(&state);

        let system = RecordingSystem::default();
        monitor.run(&system);

        assert!(state.is_exit_requested());
        assert_eq!(clock.now_ms(), 6 * 500);
        assert_eq!(state.status(), Some(ThreadStatus::PowerOk));
        assert!(system.performed().is_empty());
    }

    #[test]
    fn test_unplug_suppressed_in_test_mode() {
        let state = Arc::new(RuntimeState::new(Mode::PowerTest));
        let (monitor, battery, _) = monitor(&state);
        battery.usb.store(false, Ordering::Relaxed);

        let system = RecordingSystem::default();
        monitor.run(&system);

        assert_eq!(state.status(), Some(ThreadStatus::PowerUnplugged));
        assert!(system.performed().is_empty());
    }
}
