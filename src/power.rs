use crate::bus::{self, RegisterBus};
use crate::error::{BusError, IdentityError};
use crate::registers;
use crate::types::ChipId;
use std::fmt;

/// Supply rails and reset line of the sensor, driven by the board.
///
/// Fire-and-forget: whether the sensor actually came up is judged by the
/// identity read that follows power-on.
pub trait PowerControl {
    fn set_power(&mut self, on: bool);

    fn assert_reset(&mut self);

    fn release_reset(&mut self);
}

impl<P: PowerControl + ?Sized> PowerControl for &mut P {
    fn set_power(&mut self, on: bool) {
        (**self).set_power(on)
    }

    fn assert_reset(&mut self) {
        (**self).assert_reset()
    }

    fn release_reset(&mut self) {
        (**self).release_reset()
    }
}

/// For boards where the sensor is always powered and has no reset line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPowerControl;

impl PowerControl for NoPowerControl {
    fn set_power(&mut self, _on: bool) {}

    fn assert_reset(&mut self) {}

    fn release_reset(&mut self) {}
}

/// Power/identity sequence state.
///
/// `Off -> Powering -> IdentityCheck -> Ready` on success,
/// `Off -> Powering -> Failed` (or `IdentityCheck -> Failed`) otherwise.
/// Power-off returns to `Off` from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerState {
    #[default]
    Off,
    Powering,
    IdentityCheck,
    Ready(ChipId),
    Failed,
}

impl PowerState {
    pub fn is_ready(&self) -> bool {
        matches!(self, PowerState::Ready(_))
    }

    pub fn chip(&self) -> Option<ChipId> {
        match self {
            PowerState::Ready(chip) => Some(*chip),
            _ => None,
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerState::Off => f.write_str("off"),
            PowerState::Powering => f.write_str("powering"),
            PowerState::IdentityCheck => f.write_str("identity-check"),
            PowerState::Ready(chip) => write!(f, "ready (0x{:04x})", chip.raw()),
            PowerState::Failed => f.write_str("failed"),
        }
    }
}

/// Read the chip version register and match it against the known ids.
pub fn identify<B: RegisterBus + ?Sized>(bus: &mut B) -> Result<ChipId, IdentityError> {
    let value = bus::read_reg(bus, registers::REG_CHIP_VERSION).map_err(|e| {
        log::warn!("No MT9V022 found, chip version unreadable: {}", e);
        IdentityError::Unreadable(e)
    })?;

    match ChipId::from_raw(value) {
        Some(chip) => {
            log::info!("Detected MT9V022 chip ID 0x{:04x}", value);
            Ok(chip)
        }
        None => {
            log::warn!("No MT9V022 found, chip version register 0x{:04x}", value);
            Err(IdentityError::DeviceNotFound(value))
        }
    }
}

/// Issue the soft reset write.
pub fn soft_reset<B: RegisterBus + ?Sized>(bus: &mut B) -> Result<(), BusError> {
    bus::write_reg(bus, registers::REG_RESET, registers::RESET_SOFT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimBus;

    #[test]
    fn test_known_ids_are_accepted() {
        for (raw, chip) in [
            (0x1311, ChipId::Mt9v022Rev1),
            (0x1313, ChipId::Mt9v022Rev3),
            (0x1324, ChipId::Mt9v024),
        ] {
            let mut bus = SimBus::with_chip_id(raw);
            assert_eq!(identify(&mut bus).unwrap(), chip);
        }
    }

    #[test]
    fn test_unknown_ids_carry_observed_value() {
        for raw in [0x0000, 0x1310, 0x1312, 0x1314, 0x1323, 0x1325, 0x5640, 0xFFFF] {
            let mut bus = SimBus::with_chip_id(raw);
            assert_eq!(identify(&mut bus), Err(IdentityError::DeviceNotFound(raw)));
        }
    }

    #[test]
    fn test_every_other_value_is_rejected() {
        let bus = SimBus::new();
        let mut handle = bus.clone();
        for raw in 0..=u16::MAX {
            bus.set_register(registers::REG_CHIP_VERSION, raw);
            let accepted = identify(&mut handle).is_ok();
            assert_eq!(accepted, matches!(raw, 0x1311 | 0x1313 | 0x1324), "0x{raw:04x}");
        }
    }

    #[test]
    fn test_bus_error_is_device_not_found() {
        let bus = SimBus::with_chip_id(0x1313);
        bus.fail_reads_of(registers::REG_CHIP_VERSION);
        let mut handle = bus.clone();
        let err = identify(&mut handle).unwrap_err();
        assert!(err.is_device_not_found());
        assert!(matches!(err, IdentityError::Unreadable(BusError { address: 0x0000, .. })));
    }

    #[test]
    fn test_soft_reset_write() {
        let bus = SimBus::new();
        let mut handle = bus.clone();
        soft_reset(&mut handle).unwrap();
        assert_eq!(bus.writes(), vec![(0x000C, 0x0001)]);
    }

    #[test]
    fn test_power_state_helpers() {
        assert!(!PowerState::Off.is_ready());
        assert_eq!(PowerState::Failed.chip(), None);
        let ready = PowerState::Ready(ChipId::Mt9v024);
        assert!(ready.is_ready());
        assert_eq!(ready.chip(), Some(ChipId::Mt9v024));
        assert_eq!(ready.to_string(), "ready (0x1324)");
    }
}
