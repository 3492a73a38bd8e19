//! Charge screen state behind the charge-render lock
//!
//! The charge monitor and the input monitor share one `ChargePanel`. Any
//! call that reaches the renderer takes the framebuffer lock inside it, so
//! the lock order is always panel first, framebuffer second.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use charger_core::charge::{BatteryHealth, HealthIndex, LedController, ProgressFrame};
use charger_core::state::RuntimeState;
use charger_core::traits::{Brightness, Lights, ProgressRenderer};
use log::{debug, warn};

/// Charge-render lock
pub type SharedPanel<R> = Arc<Mutex<ChargePanel<R>>>;

/// Lock the panel, recovering from a poisoned lock
pub fn lock_panel<R>(panel: &Mutex<ChargePanel<R>>) -> MutexGuard<'_, ChargePanel<R>> {
    panel.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Screen, backlight and LED state of the charge screen
pub struct ChargePanel<R> {
    renderer: R,
    leds: LedController,
    lights: Arc<dyn Lights>,
    state: Arc<RuntimeState>,
    screen_on: bool,
}

impl<R: ProgressRenderer> ChargePanel<R> {
    /// The screen starts on
    pub fn new(renderer: R, lights: Arc<dyn Lights>, state: Arc<RuntimeState>) -> Self {
        Self {
            renderer,
            leds: LedController::new(),
            lights,
            state,
            screen_on: true,
        }
    }

    pub fn into_shared(self) -> SharedPanel<R> {
        Arc::new(Mutex::new(self))
    }

    pub fn is_screen_on(&self) -> bool {
        self.screen_on
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Turn the screen on or off
    ///
    /// The screen stays on while a health error is shown.
    pub fn set_screen_state(&mut self, on: bool) {
        if !on && self.state.health_error_active() {
            debug!("screen kept on for health error");
            return;
        }

        if let Err(e) = self.renderer.set_display_power(on) {
            warn!("display power {} failed: {:?}", on, e);
        }
        self.screen_on = on;
    }

    pub fn backlight_on(&self) {
        if let Err(e) = self.lights.set_backlight(Brightness::Half) {
            warn!("backlight on failed: {:?}", e);
        }
    }

    /// Turn the backlight off unless a health error is shown
    pub fn backlight_off(&self) {
        if self.state.health_error_active() {
            return;
        }
        if let Err(e) = self.lights.set_backlight(Brightness::Off) {
            warn!("backlight off failed: {:?}", e);
        }
    }

    /// Switch the charge LED for `level`
    pub fn update_led(&mut self, level: i32) {
        if let Some(color) = self.leds.update(level) {
            debug!("LED {:?} at {}%", color, level);
            if let Err(e) = self.lights.set_led(color) {
                warn!("LED {:?} failed: {:?}", color, e);
            }
        }
    }

    /// Record battery health
    ///
    /// A health error forces the backlight and the screen on.
    pub fn check_health(&mut self, health: BatteryHealth) -> HealthIndex {
        let index = HealthIndex::from(health);
        if index.is_error() {
            self.backlight_on();
            self.set_screen_state(true);
        }
        self.state.set_status_index(index.raw());
        index
    }

    /// Redraw the charge screen if it is on
    ///
    /// The LEDs go dark while the error icon is shown.
    pub fn redraw(&mut self, level: i32) -> Option<ProgressFrame> {
        if !self.screen_on {
            return None;
        }

        let health = HealthIndex::from_raw(self.state.status_index());
        match self.renderer.draw_progress(level, health) {
            Ok(frame) => {
                if matches!(frame, ProgressFrame::Error { .. }) {
                    if let Err(e) = self.lights.leds_off() {
                        warn!("LEDs off failed: {:?}", e);
                    }
                }
                Some(frame)
            }
            Err(e) => {
                warn!("redraw failed: {:?}", e);
                None
            }
        }
    }
}
