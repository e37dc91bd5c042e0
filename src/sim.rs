//! Simulated collaborators for tests, demos and bring-up without hardware.
//!
//! Both types are cheap handles over shared state: clone one, move the clone
//! into a [`Sensor`](crate::Sensor) or worker, and inspect the one you kept.

use crate::bus::RegisterBus;
use crate::error::TransportError;
use crate::power::PowerControl;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct BusState {
    registers: BTreeMap<u16, u16>,
    writes: Vec<(u16, u16)>,
    reads: Vec<u16>,
    write_attempts: usize,
    fail_write_in: Option<usize>,
    failing_writes: HashSet<u16>,
    failing_reads: HashSet<u16>,
    disconnected: bool,
}

/// In-memory register file that records every access.
#[derive(Debug, Clone, Default)]
pub struct SimBus {
    state: Arc<Mutex<BusState>>,
}

impl SimBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bus whose chip version register (0x0000) reads `chip_id`.
    pub fn with_chip_id(chip_id: u16) -> Self {
        let bus = Self::new();
        bus.set_register(crate::registers::REG_CHIP_VERSION, chip_id);
        bus
    }

    fn lock(&self) -> MutexGuard<'_, BusState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Preset a register without recording a write.
    pub fn set_register(&self, address: u16, value: u16) {
        self.lock().registers.insert(address, value);
    }

    /// Current content of a register, `None` if never written or preset.
    pub fn register(&self, address: u16) -> Option<u16> {
        self.lock().registers.get(&address).copied()
    }

    /// Successful writes in issue order.
    pub fn writes(&self) -> Vec<(u16, u16)> {
        self.lock().writes.clone()
    }

    /// Addresses of successful reads in issue order.
    pub fn reads(&self) -> Vec<u16> {
        self.lock().reads.clone()
    }

    /// Number of write attempts, failed ones included.
    pub fn write_attempts(&self) -> usize {
        self.lock().write_attempts
    }

    /// Forget recorded accesses. Register contents and faults are kept.
    pub fn clear_log(&self) {
        let mut state = self.lock();
        state.writes.clear();
        state.reads.clear();
        state.write_attempts = 0;
    }

    /// Fail the `n`-th write attempted from now on (zero-based), once.
    pub fn fail_write_at(&self, n: usize) {
        self.lock().fail_write_in = Some(n);
    }

    /// Fail every write to `address` until faults are cleared.
    pub fn fail_writes_to(&self, address: u16) {
        self.lock().failing_writes.insert(address);
    }

    /// Fail every read of `address` until faults are cleared.
    pub fn fail_reads_of(&self, address: u16) {
        self.lock().failing_reads.insert(address);
    }

    /// Make every access fail, as if the device dropped off the bus.
    pub fn disconnect(&self) {
        self.lock().disconnected = true;
    }

    pub fn clear_faults(&self) {
        let mut state = self.lock();
        state.fail_write_in = None;
        state.failing_writes.clear();
        state.failing_reads.clear();
        state.disconnected = false;
    }
}

impl RegisterBus for SimBus {
    fn read16(&mut self, address: u16) -> std::result::Result<u16, TransportError> {
        let mut state = self.lock();
        if state.disconnected {
            return Err(TransportError::new("no acknowledge"));
        }
        if state.failing_reads.contains(&address) {
            return Err(TransportError::new("injected read fault"));
        }
        state.reads.push(address);
        Ok(state.registers.get(&address).copied().unwrap_or(0))
    }

    fn write16(&mut self, address: u16, value: u16) -> std::result::Result<(), TransportError> {
        let mut state = self.lock();
        state.write_attempts += 1;
        if state.disconnected {
            return Err(TransportError::new("no acknowledge"));
        }
        if let Some(remaining) = state.fail_write_in {
            if remaining == 0 {
                state.fail_write_in = None;
                return Err(TransportError::new("injected write fault"));
            }
            state.fail_write_in = Some(remaining - 1);
        }
        if state.failing_writes.contains(&address) {
            return Err(TransportError::new("injected write fault"));
        }
        state.writes.push((address, value));
        state.registers.insert(address, value);
        Ok(())
    }
}

/// Calls made on a [`SimPower`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerEvent {
    Power(bool),
    AssertReset,
    ReleaseReset,
}

/// Power/reset collaborator that only records what it was asked to do.
#[derive(Debug, Clone, Default)]
pub struct SimPower {
    events: Arc<Mutex<Vec<PowerEvent>>>,
}

impl SimPower {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PowerEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn push(&self, event: PowerEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl PowerControl for SimPower {
    fn set_power(&mut self, on: bool) {
        self.push(PowerEvent::Power(on));
    }

    fn assert_reset(&mut self) {
        self.push(PowerEvent::AssertReset);
    }

    fn release_reset(&mut self) {
        self.push(PowerEvent::ReleaseReset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_register_file() {
        let bus = SimBus::new();
        let mut handle = bus.clone();
        handle.write16(0x0031, 0x001F).unwrap();
        assert_eq!(bus.register(0x0031), Some(0x001F));
        assert_eq!(bus.writes(), vec![(0x0031, 0x001F)]);
    }

    #[test]
    fn test_fail_write_at_is_one_shot() {
        let bus = SimBus::new();
        let mut handle = bus.clone();
        bus.fail_write_at(1);

        assert!(handle.write16(0x01, 1).is_ok());
        assert!(handle.write16(0x02, 2).is_err());
        assert!(handle.write16(0x03, 3).is_ok());
        assert_eq!(bus.writes(), vec![(0x01, 1), (0x03, 3)]);
        assert_eq!(bus.write_attempts(), 3);
        assert_eq!(bus.register(0x02), None);
    }

    #[test]
    fn test_unset_register_reads_zero() {
        let mut bus = SimBus::new();
        assert_eq!(bus.read16(0x00AA).unwrap(), 0);
    }

    #[test]
    fn test_disconnect_fails_everything() {
        let bus = SimBus::with_chip_id(0x1313);
        let mut handle = bus.clone();
        bus.disconnect();
        assert!(handle.read16(0x0000).is_err());
        assert!(handle.write16(0x000C, 1).is_err());
        bus.clear_faults();
        assert_eq!(handle.read16(0x0000).unwrap(), 0x1313);
    }

    #[test]
    fn test_sim_power_records_events() {
        let power = SimPower::new();
        let mut handle = power.clone();
        handle.assert_reset();
        handle.set_power(true);
        handle.release_reset();
        assert_eq!(
            power.events(),
            vec![
                PowerEvent::AssertReset,
                PowerEvent::Power(true),
                PowerEvent::ReleaseReset
            ]
        );
    }
}
