//! Input monitor
//!
//! Drives the `InputMachine` from key events:
//!
//! - Power key press wakes the screen; a release within 1.5 s turns the
//!   backlight on, holding it reboots into a normal boot
//! - Alarm key reboots for an imminent alarm, otherwise blanks the screen
//! - Without input the screen blanks when the hold window runs out

use std::sync::Arc;

use charger_core::input::{InputEvent, InputMachine, InputOutcome};
use charger_core::state::{Mode, RuntimeState};
use charger_core::system::{RebootReason, SystemAction};
use charger_core::timing::{INPUT_POLL_MS, KEY_RELEASE_SETTLE_MS};
use charger_core::traits::{AlarmSource, Clock, InputSource, ProgressRenderer, SystemControl};
use log::{debug, info, warn};

use super::perform;
use crate::runtime::{lock_panel, SharedPanel};

pub struct InputMonitor<R, I> {
    panel: SharedPanel<R>,
    input: I,
    alarm: Arc<dyn AlarmSource>,
    machine: InputMachine,
    state: Arc<RuntimeState>,
    clock: Arc<dyn Clock>,
}

impl<R: ProgressRenderer, I: InputSource> InputMonitor<R, I> {
    pub fn new(
        panel: SharedPanel<R>,
        input: I,
        alarm: Arc<dyn AlarmSource>,
        machine: InputMachine,
        state: Arc<RuntimeState>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            panel,
            input,
            alarm,
            machine,
            state,
            clock,
        }
    }

    pub fn machine(&self) -> &InputMachine {
        &self.machine
    }

    fn poll(&mut self, timeout_ms: u32) -> Option<InputEvent> {
        match self.input.poll_event(timeout_ms) {
            Ok(event) => event,
            Err(e) => {
                warn!("input poll failed: {:?}", e);
                self.clock.sleep_ms(timeout_ms);
                None
            }
        }
    }

    /// Poll with the machine's remaining time, returning the event and the
    /// microseconds spent waiting
    fn timed_poll(&mut self) -> (Option<InputEvent>, u64) {
        let start = self.clock.now_us();
        let event = self.poll(self.machine.wait_timeout_ms());
        (event, self.clock.elapsed_us(start))
    }

    fn report(&self, outcome: InputOutcome) {
        if let Some(status) = outcome.status() {
            self.state.set_status(status);
        }
    }

    /// One outer poll and everything it leads to
    pub fn step(&mut self) -> SystemAction {
        match self.poll(INPUT_POLL_MS) {
            Some(event) => {
                debug!(
                    "event type {} code {} value {}",
                    event.kind, event.code, event.value
                );
                let outcome = self.machine.evaluate(&event);
                self.dispatch(outcome)
            }
            None => {
                let outcome = self.machine.poll_expired();
                self.report(outcome);
                if outcome == InputOutcome::Idle {
                    self.count_down()
                } else {
                    SystemAction::None
                }
            }
        }
    }

    fn dispatch(&mut self, outcome: InputOutcome) -> SystemAction {
        self.report(outcome);
        match outcome {
            InputOutcome::PowerKeyDown => {
                lock_panel(&self.panel).set_screen_state(true);
                self.await_release()
            }
            InputOutcome::AlarmKey => self.alarm_key(),
            _ => SystemAction::None,
        }
    }

    fn await_release(&mut self) -> SystemAction {
        loop {
            let (event, elapsed_us) = self.timed_poll();
            let outcome = self.machine.release_wait(event.as_ref(), elapsed_us);
            self.report(outcome);

            match outcome {
                InputOutcome::Waiting => continue,
                InputOutcome::PowerKeyUp => {
                    debug!("power key up");
                    self.clock.sleep_ms(KEY_RELEASE_SETTLE_MS);
                    lock_panel(&self.panel).backlight_on();
                    return SystemAction::None;
                }
                InputOutcome::PowerKeyTimeout => {
                    info!("power key held, rebooting");
                    self.state.request_exit();
                    return SystemAction::Reboot(RebootReason::Charger);
                }
                _ => return SystemAction::None,
            }
        }
    }

    fn alarm_key(&mut self) -> SystemAction {
        if self.alarm.alarm_imminent() {
            info!("alarm imminent, rebooting");
            lock_panel(&self.panel).set_screen_state(true);
            self.state.request_exit();
            return SystemAction::Reboot(RebootReason::Alarm);
        }

        debug!("alarm key without pending alarm");
        let mut panel = lock_panel(&self.panel);
        panel.backlight_off();
        panel.set_screen_state(false);
        drop(panel);
        self.machine.alarm_dismissed();
        SystemAction::None
    }

    /// Wait out the screen hold window
    ///
    /// An event during the wait is handled like one from the outer poll.
    fn count_down(&mut self) -> SystemAction {
        while !self.state.is_exit_requested() {
            let (event, elapsed_us) = self.timed_poll();
            let outcome = self.machine.countdown(event.as_ref(), elapsed_us);

            match outcome {
                InputOutcome::Waiting => continue,
                InputOutcome::IdleTimeout => {
                    self.report(outcome);
                    debug!("screen hold expired");
                    let mut panel = lock_panel(&self.panel);
                    panel.backlight_off();
                    panel.set_screen_state(false);
                    return SystemAction::None;
                }
                other => return self.dispatch(other),
            }
        }
        SystemAction::None
    }

    pub fn run(&mut self, system: &dyn SystemControl) {
        info!("input monitor started");

        while !self.state.is_exit_requested() {
            if self.state.count_iteration(Mode::InputTest) {
                debug!("input test iterations done");
            }
            let action = self.step();
            perform(system, &self.state, action);
        }

        info!("input monitor stopped");
    }
}
