//! Kernel log output
//!
//! Records go to `/dev/kmsg` as `<priority>tag: message`. When the kernel
//! log cannot be opened they go to stderr in the same format.

use std::fs::OpenOptions;
use std::io::Write;

use env_logger::{Builder, Env, Target};
use log::{Level, LevelFilter};

pub const KMSG_PATH: &str = "/dev/kmsg";

/// Syslog priority for a log level
pub fn kmsg_level(level: Level) -> u8 {
    match level {
        Level::Error => 3,
        Level::Warn => 5,
        Level::Info | Level::Debug => 6,
        Level::Trace => 7,
    }
}

/// Install the logger for a program tag
///
/// The default filter is debug; `RUST_LOG` overrides it.
pub fn init(tag: &'static str) {
    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Debug)
        .parse_env(Env::default())
        .format(move |buf, record| {
            writeln!(
                buf,
                "<{}>{}: {}",
                kmsg_level(record.level()),
                tag,
                record.args()
            )
        });

    match OpenOptions::new().write(true).open(KMSG_PATH) {
        Ok(kmsg) => {
            builder.target(Target::Pipe(Box::new(kmsg)));
        }
        Err(_) => {
            builder.target(Target::Stderr);
        }
    }

    // Already installed in tests
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priorities() {
        assert_eq!(kmsg_level(Level::Error), 3);
        assert_eq!(kmsg_level(Level::Warn), 5);
        assert_eq!(kmsg_level(Level::Info), 6);
        assert_eq!(kmsg_level(Level::Debug), 6);
        assert_eq!(kmsg_level(Level::Trace), 7);
    }
}
