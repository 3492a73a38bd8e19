//! Charged - battery statistics daemon
//!
//! Keeps the shutdown RTC time and the battery design data in the miscdata
//! partition up to date.

use std::process::ExitCode;
use std::sync::Arc;

use charger::config::load_config;
use charger::logging;
use charger::stats::StatsDaemon;
use charger_drivers::{SysfsBattery, SystemClock};
use log::{error, info};

fn main() -> ExitCode {
    logging::init("charged");

    let config = load_config();
    let battery = SysfsBattery::new(config.power.supply_root.clone());
    let mut daemon = StatsDaemon::new(battery, config.stats, Arc::new(SystemClock::new()));

    match daemon.run() {
        Ok(()) => {
            info!("charged exit");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
