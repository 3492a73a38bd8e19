//! Battery statistics daemon
//!
//! Periodically stores the shutdown RTC time and the battery design data
//! in the miscdata partition, rewriting each statistic only when it
//! changed.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use charger_core::miscdata::StatsTracker;
use charger_core::traits::Clock;
use charger_drivers::{DriverError, MiscdataStore, SysfsBattery};
use log::{debug, error, info, warn};
use thiserror::Error;

use crate::config::StatsConfig;

pub const CYCLE_COUNT_ATTR: &str = "cycle_count";
pub const VOLTAGE_MAX_DESIGN_ATTR: &str = "voltage_max_design";
pub const CHARGE_FULL_DESIGN_ATTR: &str = "charge_full_design";

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("miscdata unavailable after {attempts} attempts")]
    Unavailable {
        attempts: u32,
        #[source]
        source: DriverError,
    },
}

/// Seconds since the Unix epoch
pub fn epoch_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0)
}

pub struct StatsDaemon {
    battery: SysfsBattery,
    config: StatsConfig,
    tracker: StatsTracker,
    clock: Arc<dyn Clock>,
}

impl StatsDaemon {
    pub fn new(battery: SysfsBattery, config: StatsConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            battery,
            config,
            tracker: StatsTracker::new(),
            clock,
        }
    }

    pub fn tracker(&self) -> &StatsTracker {
        &self.tracker
    }

    fn read(&self, name: &str) -> Option<i32> {
        match self.battery.battery_attribute(name) {
            Ok(value) => Some(value),
            Err(e) => {
                error!("{}", e);
                None
            }
        }
    }

    /// Write one round of statistics
    ///
    /// Failed reads and writes are logged; the statistic is retried on the
    /// next round.
    pub fn update(&mut self, store: &MiscdataStore, now_s: i64) {
        if let Err(e) = store.write_rtc_time(now_s) {
            error!("rtc time: {}", e);
        }

        if let Some(cycles) = self.read(CYCLE_COUNT_ATTR) {
            if cycles < 0 {
                error!("invalid charge cycle {}", cycles);
            } else if self.tracker.charge_cycle_changed(cycles) {
                match store.write_charge_cycle(cycles) {
                    Ok(()) => {
                        if self.tracker.charge_cycle_milestone(cycles) {
                            info!("stored charge cycle {}", cycles);
                        }
                        self.tracker.record_charge_cycle(cycles);
                    }
                    Err(e) => error!("charge cycle: {}", e),
                }
            }
        }

        if let Some(microvolts) = self.read(VOLTAGE_MAX_DESIGN_ATTR) {
            if microvolts < 0 {
                error!("invalid voltage max design {}", microvolts);
            } else if self.tracker.voltage_changed(microvolts) {
                match store.write_voltage_max_design(microvolts) {
                    Ok(()) => {
                        info!("stored voltage max design {}", microvolts);
                        self.tracker.record_voltage(microvolts);
                    }
                    Err(e) => error!("voltage max design: {}", e),
                }
            }
        }

        if let Some(mah) = self.read(CHARGE_FULL_DESIGN_ATTR) {
            if mah <= 0 {
                error!("invalid design capacity {}", mah);
            } else if self.tracker.capacity_changed(mah) {
                match store.write_capacity(mah as u32) {
                    Ok(()) => {
                        info!("stored design capacity {}", mah);
                        self.tracker.record_capacity(mah);
                    }
                    Err(e) => error!("design capacity: {}", e),
                }
            }
        }

        if let Err(e) = store.sync() {
            warn!("{}", e);
        }
    }

    /// Update every interval until the partition stays unavailable
    pub fn run(&mut self) -> Result<(), StatsError> {
        info!("charged start");
        let mut failures = 0;

        loop {
            let store = match MiscdataStore::open(&self.config.device) {
                Ok(store) => store,
                Err(e) => {
                    failures += 1;
                    debug!("open miscdata failed ({}): {}", failures, e);
                    self.clock.sleep_ms(self.config.retry_s.saturating_mul(1000));
                    if failures >= self.config.max_failures {
                        return Err(StatsError::Unavailable {
                            attempts: failures,
                            source: e,
                        });
                    }
                    continue;
                }
            };

            failures = 0;
            self.update(&store, epoch_seconds());
            drop(store);

            self.clock.sleep_ms(self.config.interval_s.saturating_mul(1000));
        }
    }
}
