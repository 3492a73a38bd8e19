//! evdev key input
//!
//! Opens every `event*` node under the input directory and waits on all of
//! them with `poll(2)`.

use std::fs::{self, File};
use std::io::{self, Read};
use std::mem::size_of;
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};

use charger_core::input::InputEvent;
use charger_core::traits::{InputError, InputSource};
use log::{debug, info, warn};

use crate::error::DriverError;

pub const INPUT_DIR: &str = "/dev/input";

/// Size of a kernel `struct input_event`
const EVENT_SIZE: usize = size_of::<libc::input_event>();

/// Decode the trailing type, code and value of a raw event
///
/// The leading timestamp varies in size between ABIs and is ignored.
pub fn decode_event(raw: &[u8; EVENT_SIZE]) -> InputEvent {
    let tail = &raw[EVENT_SIZE - 8..];
    InputEvent::new(
        u16::from_ne_bytes([tail[0], tail[1]]),
        u16::from_ne_bytes([tail[2], tail[3]]),
        i32::from_ne_bytes([tail[4], tail[5], tail[6], tail[7]]),
    )
}

/// Input devices polled together
#[derive(Debug)]
pub struct EvdevInput {
    devices: Vec<File>,
}

impl EvdevInput {
    /// Open every event device in `dir`
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, DriverError> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|e| DriverError::io(dir, e))?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with("event"))
            })
            .collect();
        paths.sort();

        let mut devices = Vec::with_capacity(paths.len());
        for path in paths {
            match File::open(&path) {
                Ok(file) => {
                    debug!("opened {}", path.display());
                    devices.push(file);
                }
                Err(e) => warn!("open {} failed: {}", path.display(), e),
            }
        }

        if devices.is_empty() {
            return Err(DriverError::NoInputDevices(dir.to_path_buf()));
        }
        info!("{} input devices", devices.len());
        Ok(Self { devices })
    }

    fn read_event(device: &mut File) -> io::Result<InputEvent> {
        let mut raw = [0u8; EVENT_SIZE];
        device.read_exact(&mut raw)?;
        Ok(decode_event(&raw))
    }
}

impl InputSource for EvdevInput {
    fn poll_event(&mut self, timeout_ms: u32) -> Result<Option<InputEvent>, InputError> {
        let mut fds: Vec<libc::pollfd> = self
            .devices
            .iter()
            .map(|device| libc::pollfd {
                fd: device.as_raw_fd(),
                events: libc::POLLIN,
                revents: 0,
            })
            .collect();

        let timeout = timeout_ms.min(i32::MAX as u32) as libc::c_int;
        // SAFETY: `fds` is a valid, exclusively borrowed array of
        // `fds.len()` entries for the whole call.
        let ready = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, timeout) };
        if ready < 0 {
            let e = io::Error::last_os_error();
            if e.kind() == io::ErrorKind::Interrupted {
                return Ok(None);
            }
            warn!("poll failed: {}", e);
            return Err(InputError::ReadFailed);
        }
        if ready == 0 {
            return Ok(None);
        }

        let index = fds
            .iter()
            .position(|fd| fd.revents & libc::POLLIN != 0);
        match index {
            Some(index) => Self::read_event(&mut self.devices[index])
                .map(Some)
                .map_err(|e| {
                    warn!("read failed: {}", e);
                    InputError::ReadFailed
                }),
            None => Ok(None),
        }
    }
}
