//! Charger - offline charging UI
//!
//! Runs in the charger boot mode while the main OS is down. Validates the
//! RTC, brings up the framebuffer and input devices, then runs the charge,
//! power and input monitors until one of them asks to leave.

use std::io;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use charger::boot;
use charger::config::{load_config, ChargerConfig};
use charger::logging;
use charger::runtime::ChargePanel;
use charger::system::LinuxSystem;
use charger::tasks::{ChargeMonitor, InputMonitor, PowerMonitor};
use charger_core::input::InputMachine;
use charger_core::state::RuntimeState;
use charger_core::traits::{BatteryMonitor, Clock, RtcValidator, SystemControl};
use charger_display::{
    AssetNames, ChargeAssets, DisplayError, Graphics, RenderEngine, ResolutionClass,
};
use charger_drivers::{
    DriverError, EvdevInput, FbdevBackend, FlagFileAlarm, LocalTimeOfDay, PngAssetLoader,
    SysfsBattery, SysfsLights, SysfsRtc, SystemClock,
};
use log::{error, info, warn};
use thiserror::Error;

#[derive(Debug, Error)]
enum StartupError {
    #[error("display init failed: {0:?}")]
    Display(DisplayError),
    #[error("input init failed: {0}")]
    Input(#[from] DriverError),
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        name: &'static str,
        #[source]
        source: io::Error,
    },
}

fn main() -> ExitCode {
    logging::init("charge");
    info!("charger start");

    let config = load_config();

    let mode = boot::boot_mode();
    if !boot::is_charge_mode(mode.as_deref()) {
        info!("boot mode {:?}, nothing to do", mode.as_deref());
        return ExitCode::SUCCESS;
    }

    match run(&config) {
        Ok(()) => {
            info!("charger exit");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Open the framebuffer and the input devices
fn init_ui(config: &ChargerConfig) -> Result<(Graphics<FbdevBackend>, EvdevInput), StartupError> {
    let backend = FbdevBackend::new(config.display.device.clone());
    let graphics = Graphics::init(
        backend,
        config.display.flip_orientation(),
        config.display.overscan_percent,
    )
    .map_err(StartupError::Display)?;
    let input = EvdevInput::open(&config.input.device_dir)?;
    Ok((graphics, input))
}

/// Load the asset set matching the panel
///
/// Asset classes are portrait; landscape panels are classified by their
/// portrait dimensions.
fn load_assets(config: &ChargerConfig, graphics: &Graphics<FbdevBackend>) -> ChargeAssets {
    let (width, height) = (graphics.surface().width(), graphics.surface().height());
    let class = ResolutionClass::classify(width.min(height), width.max(height));
    let names = AssetNames::new(class, config.display.orientation().is_quarter_turn());
    info!("asset set {}", class.suffix());

    let loader = PngAssetLoader::new(config.display.assets_dir.clone());
    ChargeAssets::load(&loader, &names)
}

fn spawn<F>(name: &'static str, f: F) -> Result<(&'static str, JoinHandle<()>), StartupError>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(name.to_string())
        .spawn(f)
        .map(|handle| (name, handle))
        .map_err(|source| StartupError::Spawn { name, source })
}

fn run(config: &ChargerConfig) -> Result<(), StartupError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let state = Arc::new(RuntimeState::new(config.runtime.mode));

    let mut rtc = SysfsRtc::new(config.rtc.time_file.clone(), config.rtc.device.clone());
    if let Err(e) = boot::retry("rtc", clock.as_ref(), || rtc.validate()) {
        warn!("RTC unusable: {:?}", e);
    }

    let (graphics, input) = boot::retry("ui", clock.as_ref(), || init_ui(config))?;

    let battery = Arc::new(SysfsBattery::new(config.power.supply_root.clone()));
    if let Err(e) = boot::retry("battery", clock.as_ref(), || battery.probe()) {
        warn!("battery not ready: {:?}, continuing", e);
    }

    let assets = load_assets(config, &graphics);
    let renderer = RenderEngine::new(
        Arc::new(Mutex::new(graphics)),
        assets,
        config.display.render_options(),
    )
    .with_time(Box::new(LocalTimeOfDay));
    if let Err(e) = renderer.draw_background(None) {
        warn!("background failed: {:?}", e);
    }

    let lights = Arc::new(SysfsLights::new(&config.lights.paths()));
    let panel = ChargePanel::new(renderer, lights, state.clone()).into_shared();
    let alarm = Arc::new(FlagFileAlarm::new(
        config.alarm.alarm_flag.clone(),
        config.alarm.poweron_flag.clone(),
    ));
    let system: Arc<dyn SystemControl> = Arc::new(LinuxSystem);

    let charge = ChargeMonitor::new(panel.clone(), battery.clone(), state.clone(), clock.clone());
    let power = PowerMonitor::new(battery, state.clone(), clock.clone());
    let mut input = InputMonitor::new(
        panel,
        input,
        alarm,
        InputMachine::new(config.input.key_map()),
        state,
        clock,
    );

    let power_system = system.clone();
    let handles = [
        spawn("charge", move || charge.run())?,
        spawn("power", move || power.run(power_system.as_ref()))?,
        spawn("input", move || input.run(system.as_ref()))?,
    ];

    for (name, handle) in handles {
        if handle.join().is_err() {
            error!("{} thread panicked", name);
        }
    }
    Ok(())
}
