//! sysfs attribute helpers
//!
//! Every access opens the attribute, reads or writes once and closes it.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use charger_core::miscdata::parse_attribute;

use crate::error::DriverError;

/// Read an attribute with surrounding whitespace removed
pub fn read_trimmed(path: &Path) -> Result<String, DriverError> {
    let text = fs::read_to_string(path).map_err(|e| DriverError::io(path, e))?;
    Ok(text.trim().to_owned())
}

/// Read a decimal attribute
///
/// Parses like `atoi`; an empty attribute is an error.
pub fn read_int(path: &Path) -> Result<i32, DriverError> {
    let text = read_trimmed(path)?;
    if text.is_empty() {
        return Err(DriverError::Empty(path.to_path_buf()));
    }
    Ok(parse_attribute(&text))
}

/// Write a decimal attribute
pub fn write_int(path: &Path, value: u32) -> Result<(), DriverError> {
    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|e| DriverError::io(path, e))?;
    write!(file, "{}", value).map_err(|e| DriverError::io(path, e))
}
