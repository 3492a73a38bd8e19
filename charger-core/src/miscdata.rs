//! Miscdata statistics record
//!
//! Record layout at `MISCDATA_BASE` of the miscdata partition:
//! - MAGIC (4 bytes): owned by the bootloader, never written here
//! - RTC_TIME (8 bytes): last RTC time seen, epoch seconds
//! - CHARGE_CYCLE (4 bytes): battery cycle count
//! - VOLTAGE_MAX_DESIGN (4 bytes): design maximum voltage
//! - CAPACITY (4 bytes): design capacity XOR `CAPACITY_KEY0`
//! - CAPACITY_CHECK (4 bytes): design capacity XOR `CAPACITY_KEY1`
//!
//! All integers are little-endian.

/// Byte offset of the record within the partition
pub const MISCDATA_BASE: u64 = 10 * 1024 + 256;

/// Total record size in bytes
pub const RECORD_SIZE: usize = 28;

/// XOR key for the stored capacity
pub const CAPACITY_KEY0: u32 = 0x2016_0726;

/// XOR key for the capacity check word
pub const CAPACITY_KEY1: u32 = 0x1521_1517;

/// Record fields written by the statistics daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiscField {
    Magic,
    RtcTime,
    ChargeCycle,
    VoltageMaxDesign,
    Capacity,
    CapacityCheck,
}

impl MiscField {
    /// Offset from `MISCDATA_BASE`
    pub const fn offset(&self) -> u64 {
        match self {
            MiscField::Magic => 0,
            MiscField::RtcTime => 4,
            MiscField::ChargeCycle => 12,
            MiscField::VoltageMaxDesign => 16,
            MiscField::Capacity => 20,
            MiscField::CapacityCheck => 24,
        }
    }

    pub const fn size(&self) -> usize {
        match self {
            MiscField::RtcTime => 8,
            _ => 4,
        }
    }

    /// Absolute byte position in the partition
    pub const fn position(&self) -> u64 {
        MISCDATA_BASE + self.offset()
    }
}

/// Encode the design capacity as the (capacity, check) word pair
pub fn encode_capacity(mah: u32) -> ([u8; 4], [u8; 4]) {
    (
        (mah ^ CAPACITY_KEY0).to_le_bytes(),
        (mah ^ CAPACITY_KEY1).to_le_bytes(),
    )
}

/// Decode a stored capacity pair
///
/// Returns `None` when the two words disagree.
pub fn decode_capacity(capacity: [u8; 4], check: [u8; 4]) -> Option<u32> {
    let mah = u32::from_le_bytes(capacity) ^ CAPACITY_KEY0;
    let verify = u32::from_le_bytes(check) ^ CAPACITY_KEY1;
    (mah == verify).then_some(mah)
}

/// Parse a decimal power supply attribute the way `atoi` does
///
/// Leading whitespace and an optional sign are accepted; parsing stops at
/// the first non-digit. Text without digits parses as zero.
pub fn parse_attribute(text: &str) -> i32 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let mut value: i32 = 0;
    for b in digits.bytes().take_while(|b| b.is_ascii_digit()) {
        value = value.wrapping_mul(10).wrapping_add(i32::from(b - b'0'));
    }

    if negative {
        value.wrapping_neg()
    } else {
        value
    }
}

/// Battery statistics tracked by the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatteryStats {
    pub charge_cycle: Option<i32>,
    pub voltage_max_design: Option<i32>,
    pub capacity_mah: Option<i32>,
}

/// Remembers the last value written for each statistic
///
/// A statistic is only rewritten when it changed. Invalid readings
/// (negative cycle count or voltage, non-positive capacity) are skipped.
#[derive(Debug, Clone, Default)]
pub struct StatsTracker {
    last: BatteryStats,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the cycle count must be written
    pub fn charge_cycle_changed(&self, value: i32) -> bool {
        value >= 0 && self.last.charge_cycle != Some(value)
    }

    /// Check if the design voltage must be written
    pub fn voltage_changed(&self, value: i32) -> bool {
        value >= 0 && self.last.voltage_max_design != Some(value)
    }

    /// Check if the design capacity must be written
    pub fn capacity_changed(&self, value: i32) -> bool {
        value > 0 && self.last.capacity_mah != Some(value)
    }

    /// Check if the cycle count crossed into a new hundred
    pub fn charge_cycle_milestone(&self, value: i32) -> bool {
        let last = self.last.charge_cycle.unwrap_or(-1);
        value / 100 == last / 100 + 1
    }

    pub fn record_charge_cycle(&mut self, value: i32) {
        self.last.charge_cycle = Some(value);
    }

    pub fn record_voltage(&mut self, value: i32) {
        self.last.voltage_max_design = Some(value);
    }

    pub fn record_capacity(&mut self, value: i32) {
        self.last.capacity_mah = Some(value);
    }

    /// Last values written
    pub fn last(&self) -> BatteryStats {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_positions() {
        assert_eq!(MISCDATA_BASE, 10496);
        assert_eq!(MiscField::RtcTime.position(), 10500);
        assert_eq!(MiscField::ChargeCycle.position(), 10508);
        assert_eq!(MiscField::VoltageMaxDesign.position(), 10512);
        assert_eq!(MiscField::Capacity.position(), 10516);
        assert_eq!(MiscField::CapacityCheck.position(), 10520);

        let end = MiscField::CapacityCheck.offset() as usize + MiscField::CapacityCheck.size();
        assert_eq!(end, RECORD_SIZE);
    }

    #[test]
    fn test_capacity_encoding() {
        let (capacity, check) = encode_capacity(4000);
        assert_eq!(u32::from_le_bytes(capacity), 4000 ^ 0x2016_0726);
        assert_eq!(u32::from_le_bytes(check), 4000 ^ 0x1521_1517);
        assert_eq!(decode_capacity(capacity, check), Some(4000));
        assert_eq!(decode_capacity(capacity, [0; 4]), None);
    }

    #[test]
    fn test_parse_attribute() {
        assert_eq!(parse_attribute("123\n"), 123);
        assert_eq!(parse_attribute("  -7"), -7);
        assert_eq!(parse_attribute("4400000uV"), 4_400_000);
        assert_eq!(parse_attribute("abc"), 0);
        assert_eq!(parse_attribute(""), 0);
    }

    #[test]
    fn test_tracker_debounce() {
        let mut tracker = StatsTracker::new();
        assert!(tracker.charge_cycle_changed(12));
        tracker.record_charge_cycle(12);
        assert!(!tracker.charge_cycle_changed(12));
        assert!(tracker.charge_cycle_changed(13));
        assert!(!tracker.charge_cycle_changed(-1));

        assert!(!tracker.capacity_changed(0));
        assert!(tracker.capacity_changed(4000));
        tracker.record_capacity(4000);
        assert!(!tracker.capacity_changed(4000));
    }

    #[test]
    fn test_cycle_milestone() {
        let mut tracker = StatsTracker::new();
        assert!(!tracker.charge_cycle_milestone(5));
        assert!(tracker.charge_cycle_milestone(100));
        tracker.record_charge_cycle(99);
        assert!(tracker.charge_cycle_milestone(100));
        assert!(!tracker.charge_cycle_milestone(99));
    }
}
