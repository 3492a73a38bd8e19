//! Miscdata record store
//!
//! Writes statistics fields in place on the miscdata block device.

use std::fs::{File, OpenOptions};
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

use charger_core::miscdata::{encode_capacity, MiscField};
use log::trace;

use crate::error::DriverError;

pub const MISCDATA_PATH: &str = "/dev/block/by-name/miscdata";

/// Opened miscdata partition
#[derive(Debug)]
pub struct MiscdataStore {
    path: PathBuf,
    file: File,
}

impl MiscdataStore {
    /// Open the partition read-write
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DriverError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| DriverError::io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    fn write_field(&self, field: MiscField, bytes: &[u8]) -> Result<(), DriverError> {
        debug_assert_eq!(bytes.len(), field.size());
        trace!("{:?} at {}", field, field.position());
        self.file
            .write_all_at(bytes, field.position())
            .map_err(|e| DriverError::io(&self.path, e))
    }

    /// Store the RTC time in epoch seconds
    pub fn write_rtc_time(&self, seconds: i64) -> Result<(), DriverError> {
        self.write_field(MiscField::RtcTime, &seconds.to_le_bytes())
    }

    pub fn write_charge_cycle(&self, cycles: i32) -> Result<(), DriverError> {
        self.write_field(MiscField::ChargeCycle, &cycles.to_le_bytes())
    }

    pub fn write_voltage_max_design(&self, microvolts: i32) -> Result<(), DriverError> {
        self.write_field(MiscField::VoltageMaxDesign, &microvolts.to_le_bytes())
    }

    /// Store the design capacity as its obfuscated word pair
    pub fn write_capacity(&self, mah: u32) -> Result<(), DriverError> {
        let (capacity, check) = encode_capacity(mah);
        self.write_field(MiscField::Capacity, &capacity)?;
        self.write_field(MiscField::CapacityCheck, &check)
    }

    /// Flush written fields to the device
    pub fn sync(&self) -> Result<(), DriverError> {
        self.file
            .sync_data()
            .map_err(|e| DriverError::io(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charger_core::miscdata::{decode_capacity, MISCDATA_BASE, RECORD_SIZE};
    use std::fs;

    fn partition() -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), vec![0xAAu8; 16 * 1024]).unwrap();
        file
    }

    fn record(path: &Path) -> Vec<u8> {
        let bytes = fs::read(path).unwrap();
        let base = MISCDATA_BASE as usize;
        bytes[base..base + RECORD_SIZE].to_vec()
    }

    #[test]
    fn test_fields_land_at_offsets() {
        let file = partition();
        let store = MiscdataStore::open(file.path()).unwrap();

        store.write_rtc_time(0x0102_0304_0506_0708).unwrap();
        store.write_charge_cycle(321).unwrap();
        store.write_voltage_max_design(4_400_000).unwrap();
        store.write_capacity(5000).unwrap();
        store.sync().unwrap();

        let record = record(file.path());
        assert_eq!(&record[0..4], &[0xAA; 4]);
        assert_eq!(&record[4..12], &0x0102_0304_0506_0708i64.to_le_bytes());
        assert_eq!(&record[12..16], &321i32.to_le_bytes());
        assert_eq!(&record[16..20], &4_400_000i32.to_le_bytes());

        let capacity: [u8; 4] = record[20..24].try_into().unwrap();
        let check: [u8; 4] = record[24..28].try_into().unwrap();
        assert_eq!(decode_capacity(capacity, check), Some(5000));
    }

    #[test]
    fn test_surrounding_bytes_untouched() {
        let file = partition();
        let store = MiscdataStore::open(file.path()).unwrap();
        store.write_charge_cycle(1).unwrap();

        let bytes = fs::read(file.path()).unwrap();
        let base = MISCDATA_BASE as usize;
        assert!(bytes[..base].iter().all(|&b| b == 0xAA));
        assert!(bytes[base + RECORD_SIZE..].iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn test_open_missing_device() {
        let dir = tempfile::tempdir().unwrap();
        let err = MiscdataStore::open(dir.path().join("miscdata")).unwrap_err();
        assert!(err.is_not_found());
    }
}
