//! Alarm flag files
//!
//! The alarm service leaves the next alarm and the scheduled power-on time
//! in two flag files on the vendor partition.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use charger_core::alarm::{is_imminent, parse_flag_contents, FLAG_READ_LEN};
use charger_core::traits::AlarmSource;
use log::debug;

pub const ALARM_FLAG_PATH: &str = "/mnt/vendor/alarm_flag";
pub const POWERON_FLAG_PATH: &str = "/mnt/vendor/poweron_timeinmillis";

/// Alarm source backed by the two flag files
#[derive(Debug, Clone)]
pub struct FlagFileAlarm {
    alarm_flag: PathBuf,
    poweron_flag: PathBuf,
}

impl Default for FlagFileAlarm {
    fn default() -> Self {
        Self::new(ALARM_FLAG_PATH, POWERON_FLAG_PATH)
    }
}

fn read_flag(path: &Path) -> Option<i64> {
    let mut buf = [0u8; FLAG_READ_LEN];
    let len = File::open(path).and_then(|mut f| f.read(&mut buf)).ok()?;
    let timestamp = parse_flag_contents(&buf[..len]);
    debug!("{}: {:?}", path.display(), timestamp);
    timestamp
}

fn now_s() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs() as i64)
}

impl FlagFileAlarm {
    pub fn new(alarm_flag: impl Into<PathBuf>, poweron_flag: impl Into<PathBuf>) -> Self {
        Self {
            alarm_flag: alarm_flag.into(),
            poweron_flag: poweron_flag.into(),
        }
    }

    /// Check the flag files against `now_s` (epoch seconds)
    pub fn imminent_at(&self, now_s: i64) -> bool {
        let timestamps = [read_flag(&self.alarm_flag), read_flag(&self.poweron_flag)];
        is_imminent(&timestamps, now_s)
    }
}

impl AlarmSource for FlagFileAlarm {
    fn alarm_imminent(&self) -> bool {
        self.imminent_at(now_s())
    }
}
