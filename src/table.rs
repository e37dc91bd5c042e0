use crate::bus::{self, RegisterBus};
use crate::controls::{Effect, WhiteBalance};
use crate::error::BusError;

/// One (address, value) pair of a register table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterEntry {
    pub address: u16,
    pub value: u16,
}

impl RegisterEntry {
    /// Sentinel closing every table. No real register uses this encoding.
    pub const END: RegisterEntry = RegisterEntry {
        address: 0xFFFF,
        value: 0xFFFF,
    };

    pub const fn new(address: u16, value: u16) -> Self {
        Self { address, value }
    }

    pub const fn is_end(&self) -> bool {
        self.address == Self::END.address && self.value == Self::END.value
    }
}

/// What a table configures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRole {
    Init,
    Mode,
    WhiteBalance(WhiteBalance),
    Effect(Effect),
}

/// Immutable, sentinel-terminated register sequence.
///
/// The constructor rejects a slice that does not end with
/// [`RegisterEntry::END`] or that carries the sentinel anywhere else, so
/// iteration never has to scan for the terminator. Declared as a `const` or
/// `static`, a malformed table fails to compile.
#[derive(Debug, Clone, Copy)]
pub struct RegisterTable {
    name: &'static str,
    role: TableRole,
    entries: &'static [RegisterEntry],
}

impl RegisterTable {
    pub const fn new(
        name: &'static str,
        role: TableRole,
        entries: &'static [RegisterEntry],
    ) -> Self {
        assert!(
            !entries.is_empty() && entries[entries.len() - 1].is_end(),
            "register table must end with the sentinel entry"
        );
        let mut i = 0;
        while i < entries.len() - 1 {
            assert!(
                !entries[i].is_end(),
                "sentinel entry inside a register table"
            );
            i += 1;
        }
        Self {
            name,
            role,
            entries,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn role(&self) -> TableRole {
        self.role
    }

    /// Entries in write order, sentinel excluded.
    pub fn entries(&self) -> &'static [RegisterEntry] {
        &self.entries[..self.entries.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.entries.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Write every entry of `table` in order, one bus write per entry.
///
/// Stops at the first failed write and returns it; later entries are never
/// attempted and entries already written are not rolled back.
pub fn apply<B: RegisterBus + ?Sized>(bus: &mut B, table: &RegisterTable) -> Result<(), BusError> {
    log::debug!("applying table {} ({} entries)", table.name(), table.len());
    for entry in table.entries() {
        bus::write_reg(bus, entry.address, entry.value)?;
    }
    Ok(())
}

/// A register whose current content differs from its table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    pub address: u16,
    pub expected: u16,
    pub actual: u16,
}

/// Read back every address of `table` and report the ones that differ.
///
/// Only the last entry for an address counts, since tables may write the
/// same register more than once.
pub fn verify<B: RegisterBus + ?Sized>(
    bus: &mut B,
    table: &RegisterTable,
) -> Result<Vec<Mismatch>, BusError> {
    let entries = table.entries();
    let mut mismatches = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        if entries[i + 1..].iter().any(|later| later.address == entry.address) {
            continue;
        }
        let actual = bus::read_reg(bus, entry.address)?;
        if actual != entry.value {
            mismatches.push(Mismatch {
                address: entry.address,
                expected: entry.value,
                actual,
            });
        }
    }
    Ok(mismatches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Access;
    use crate::sim::SimBus;

    static FIVE: RegisterTable = RegisterTable::new(
        "five",
        TableRole::Init,
        &[
            RegisterEntry::new(0x0031, 0x001F),
            RegisterEntry::new(0x0032, 0x001A),
            RegisterEntry::new(0x0033, 0x0012),
            RegisterEntry::new(0x00AF, 0x0000),
            RegisterEntry::new(0x002B, 0x0003),
            RegisterEntry::END,
        ],
    );

    static EMPTY: RegisterTable = RegisterTable::new("empty", TableRole::Mode, &[RegisterEntry::END]);

    #[test]
    fn test_entries_exclude_sentinel() {
        assert_eq!(FIVE.len(), 5);
        assert!(FIVE.entries().iter().all(|e| !e.is_end()));
        assert!(EMPTY.is_empty());
    }

    #[test]
    fn test_apply_writes_in_table_order() {
        let bus = SimBus::new();
        let mut handle = bus.clone();
        apply(&mut handle, &FIVE).unwrap();

        let expected: Vec<(u16, u16)> = FIVE.entries().iter().map(|e| (e.address, e.value)).collect();
        assert_eq!(bus.writes(), expected);
        assert_eq!(bus.write_attempts(), 5);
    }

    #[test]
    fn test_apply_stops_at_first_failure() {
        for k in 0..FIVE.len() {
            let bus = SimBus::new();
            let mut handle = bus.clone();
            bus.fail_write_at(k);

            let err = apply(&mut handle, &FIVE).unwrap_err();
            assert_eq!(err.address, FIVE.entries()[k].address);
            assert_eq!(err.access, Access::Write);
            assert_eq!(bus.writes().len(), k);
            // the failing write is the last one attempted
            assert_eq!(bus.write_attempts(), k + 1);
        }
    }

    #[test]
    fn test_apply_empty_table_issues_nothing() {
        let bus = SimBus::new();
        let mut handle = bus.clone();
        apply(&mut handle, &EMPTY).unwrap();
        assert_eq!(bus.write_attempts(), 0);
    }

    #[test]
    #[should_panic(expected = "must end with the sentinel")]
    fn test_table_without_sentinel_is_rejected() {
        static NO_END: [RegisterEntry; 1] = [RegisterEntry::new(0x0001, 0x0001)];
        let _ = RegisterTable::new("broken", TableRole::Init, &NO_END);
    }

    #[test]
    #[should_panic(expected = "sentinel entry inside")]
    fn test_interior_sentinel_is_rejected() {
        static EARLY_END: [RegisterEntry; 3] = [
            RegisterEntry::new(0x0001, 0x0001),
            RegisterEntry::END,
            RegisterEntry::END,
        ];
        let _ = RegisterTable::new("broken", TableRole::Init, &EARLY_END);
    }

    #[test]
    fn test_verify_reports_mismatches() {
        static TWICE: RegisterTable = RegisterTable::new(
            "twice",
            TableRole::Init,
            &[
                RegisterEntry::new(0x0020, 0x01D5),
                RegisterEntry::new(0x0010, 0x0040),
                RegisterEntry::new(0x0020, 0x03D5),
                RegisterEntry::END,
            ],
        );

        let bus = SimBus::new();
        let mut handle = bus.clone();
        apply(&mut handle, &TWICE).unwrap();
        assert!(verify(&mut handle, &TWICE).unwrap().is_empty());

        bus.set_register(0x0010, 0x0041);
        let mismatches = verify(&mut handle, &TWICE).unwrap();
        assert_eq!(
            mismatches,
            vec![Mismatch {
                address: 0x0010,
                expected: 0x0040,
                actual: 0x0041
            }]
        );
    }
}
