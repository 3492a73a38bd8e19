//! Charge monitor
//!
//! Reads the battery level every animation frame, drives the charge LED,
//! checks battery health and redraws the charge screen while it is on.

use std::sync::Arc;

use charger_core::charge::ProgressFrame;
use charger_core::state::{Mode, RuntimeState, ThreadStatus};
use charger_core::timing::{CHARGE_SETTLE_MS, FRAME_PERIOD_MS};
use charger_core::traits::{BatteryMonitor, Clock, ProgressRenderer};
use log::{debug, info, warn};

use crate::runtime::{lock_panel, SharedPanel};

pub struct ChargeMonitor<R> {
    panel: SharedPanel<R>,
    battery: Arc<dyn BatteryMonitor>,
    state: Arc<RuntimeState>,
    clock: Arc<dyn Clock>,
}

impl<R: ProgressRenderer> ChargeMonitor<R> {
    pub fn new(
        panel: SharedPanel<R>,
        battery: Arc<dyn BatteryMonitor>,
        state: Arc<RuntimeState>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            panel,
            battery,
            state,
            clock,
        }
    }

    /// One iteration: read, decide, redraw
    pub fn step(&self) -> Option<ProgressFrame> {
        self.clock.sleep_ms(FRAME_PERIOD_MS);

        let level = self.battery.capacity();
        if level < 0 {
            warn!("capacity read failed");
            self.state.set_status(ThreadStatus::ChargeError);
        } else {
            self.state.set_status(ThreadStatus::ChargeOk);
        }

        let frame = {
            let mut panel = lock_panel(&self.panel);
            panel.update_led(level);
            let health = panel.check_health(self.battery.health());
            if health.is_error() {
                debug!("health error {}", health.raw());
            }
            panel.redraw(level)
        };

        self.clock.sleep_ms(CHARGE_SETTLE_MS);
        frame
    }

    pub fn run(&self) {
        info!("charge monitor started");

        while !self.state.is_exit_requested() {
            if self.state.count_iteration(Mode::ChargeTest) {
                debug!("charge test iterations done");
            }
            self.step();
        }

        info!("charge monitor stopped");
    }
}
