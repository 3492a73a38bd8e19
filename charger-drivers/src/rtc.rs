//! RTC validation
//!
//! An RTC that lost power reads back empty. In that case a default time
//! (2019-01-01 00:00:00) is programmed through the RTC device and the time
//! is read again.

use std::fs::{File, OpenOptions};
use std::io::Read;
use std::os::fd::AsRawFd;
use std::path::PathBuf;

use charger_core::traits::{RtcError, RtcValidator};
use log::{debug, error};

pub const RTC_TIME_PATH: &str = "/sys/class/rtc/rtc0/time";
pub const RTC_DEVICE_PATH: &str = "/dev/rtc0";

/// `_IOW('p', 0x0a, struct rtc_time)`
const RTC_SET_TIME: u32 = 0x4024_700a;

/// Kernel `struct rtc_time`
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
struct RtcTime {
    tm_sec: libc::c_int,
    tm_min: libc::c_int,
    tm_hour: libc::c_int,
    tm_mday: libc::c_int,
    tm_mon: libc::c_int,
    tm_year: libc::c_int,
    tm_wday: libc::c_int,
    tm_yday: libc::c_int,
    tm_isdst: libc::c_int,
}

impl RtcTime {
    fn default_time() -> Self {
        Self {
            tm_mday: 1,
            tm_mon: 0,
            tm_year: 119,
            ..Self::default()
        }
    }
}

/// sysfs + ioctl RTC validator
#[derive(Debug, Clone)]
pub struct SysfsRtc {
    time_file: PathBuf,
    device: PathBuf,
}

impl Default for SysfsRtc {
    fn default() -> Self {
        Self::new(RTC_TIME_PATH, RTC_DEVICE_PATH)
    }
}

fn read_time(file: &mut File) -> Result<Option<String>, RtcError> {
    let mut buf = [0u8; 32];
    let len = file.read(&mut buf).map_err(|_| RtcError::Unreadable)?;
    if len == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&buf[..len]).trim().to_owned()))
}

impl SysfsRtc {
    pub fn new(time_file: impl Into<PathBuf>, device: impl Into<PathBuf>) -> Self {
        Self {
            time_file: time_file.into(),
            device: device.into(),
        }
    }

    fn set_default_time(&self) -> Result<(), RtcError> {
        let device = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.device)
            .map_err(|e| {
                error!("open {} failed: {}", self.device.display(), e);
                RtcError::SetFailed
            })?;

        let tm = RtcTime::default_time();
        // SAFETY: `tm` matches the kernel layout and outlives the call.
        let ret = unsafe { libc::ioctl(device.as_raw_fd(), RTC_SET_TIME as _, &tm as *const RtcTime) };
        if ret < 0 {
            error!(
                "RTC_SET_TIME failed: {}",
                std::io::Error::last_os_error()
            );
            return Err(RtcError::SetFailed);
        }
        Ok(())
    }
}

impl RtcValidator for SysfsRtc {
    fn validate(&mut self) -> Result<(), RtcError> {
        let mut time_file = File::open(&self.time_file).map_err(|e| {
            error!("open {} failed: {}", self.time_file.display(), e);
            RtcError::Unreadable
        })?;

        if let Some(time) = read_time(&mut time_file)? {
            debug!("rtc time {}", time);
            return Ok(());
        }

        self.set_default_time()?;

        // sysfs attributes must be reopened to read fresh contents
        let mut time_file = File::open(&self.time_file).map_err(|_| RtcError::Unreadable)?;
        match read_time(&mut time_file)? {
            Some(time) => {
                debug!("rtc time after default set {}", time);
                Ok(())
            }
            None => Err(RtcError::Unreadable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_readable_time() {
        let dir = tempfile::tempdir().unwrap();
        let time = dir.path().join("time");
        fs::write(&time, "12:34:56\n").unwrap();

        let mut rtc = SysfsRtc::new(&time, dir.path().join("rtc0"));
        assert_eq!(rtc.validate(), Ok(()));
    }

    #[test]
    fn test_missing_time_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut rtc = SysfsRtc::new(dir.path().join("time"), dir.path().join("rtc0"));
        assert_eq!(rtc.validate(), Err(RtcError::Unreadable));
    }

    #[test]
    fn test_empty_time_without_device() {
        let dir = tempfile::tempdir().unwrap();
        let time = dir.path().join("time");
        fs::write(&time, "").unwrap();

        let mut rtc = SysfsRtc::new(&time, dir.path().join("rtc0"));
        assert_eq!(rtc.validate(), Err(RtcError::SetFailed));
    }

    #[test]
    fn test_default_time_layout() {
        assert_eq!(core::mem::size_of::<RtcTime>(), 36);
        let tm = RtcTime::default_time();
        assert_eq!((tm.tm_year, tm.tm_mon, tm.tm_mday), (119, 0, 1));
    }
}
