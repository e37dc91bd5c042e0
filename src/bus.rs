use crate::error::{BusError, TransportError};

/// Serial control bus access to the sensor's 16-bit registers.
///
/// Implemented by the host transport (I2C adapter, simulator, FFI callbacks).
/// Calls are synchronous and may block. The core never retries a failed
/// access; it wraps the failure with the register address and returns it.
pub trait RegisterBus {
    fn read16(&mut self, address: u16) -> std::result::Result<u16, TransportError>;

    fn write16(&mut self, address: u16, value: u16) -> std::result::Result<(), TransportError>;
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    fn read16(&mut self, address: u16) -> std::result::Result<u16, TransportError> {
        (**self).read16(address)
    }

    fn write16(&mut self, address: u16, value: u16) -> std::result::Result<(), TransportError> {
        (**self).write16(address, value)
    }
}

impl<B: RegisterBus + ?Sized> RegisterBus for Box<B> {
    fn read16(&mut self, address: u16) -> std::result::Result<u16, TransportError> {
        (**self).read16(address)
    }

    fn write16(&mut self, address: u16, value: u16) -> std::result::Result<(), TransportError> {
        (**self).write16(address, value)
    }
}

/// Read one register.
pub fn read_reg<B: RegisterBus + ?Sized>(bus: &mut B, address: u16) -> Result<u16, BusError> {
    let value = bus
        .read16(address)
        .map_err(|e| BusError::read(address, e))?;
    log::trace!("read  0x{:04x} -> 0x{:04x}", address, value);
    Ok(value)
}

/// Write one register.
pub fn write_reg<B: RegisterBus + ?Sized>(
    bus: &mut B,
    address: u16,
    value: u16,
) -> Result<(), BusError> {
    log::trace!("write 0x{:04x} <- 0x{:04x}", address, value);
    bus.write16(address, value)
        .map_err(|e| BusError::write(address, e))
}

/// Read-modify-write: clear `mask` in the register, then OR in `set & mask`.
///
/// A failed read issues no write.
pub fn mask_set<B: RegisterBus + ?Sized>(
    bus: &mut B,
    address: u16,
    mask: u16,
    set: u16,
) -> Result<(), BusError> {
    let current = read_reg(bus, address)?;
    let value = (current & !mask) | (set & mask);
    write_reg(bus, address, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Access;
    use crate::sim::SimBus;

    #[test]
    fn test_mask_set_touches_only_masked_bits() {
        let bus = SimBus::new();
        bus.set_register(0x000D, 0x0304);
        let mut handle = bus.clone();

        mask_set(&mut handle, 0x000D, 0x0010, 0x0010).unwrap();
        assert_eq!(bus.register(0x000D), Some(0x0314));

        mask_set(&mut handle, 0x000D, 0x0010, 0x0000).unwrap();
        assert_eq!(bus.register(0x000D), Some(0x0304));
        assert_eq!(bus.writes(), vec![(0x000D, 0x0314), (0x000D, 0x0304)]);
    }

    #[test]
    fn test_mask_set_ignores_bits_outside_mask() {
        let bus = SimBus::new();
        bus.set_register(0x000D, 0x0300);
        let mut handle = bus.clone();

        mask_set(&mut handle, 0x000D, 0x0020, 0xFFFF).unwrap();
        assert_eq!(bus.register(0x000D), Some(0x0320));
    }

    #[test]
    fn test_mask_set_read_failure_skips_write() {
        let bus = SimBus::new();
        bus.fail_reads_of(0x000D);
        let mut handle = bus.clone();

        let err = mask_set(&mut handle, 0x000D, 0x0010, 0x0010).unwrap_err();
        assert_eq!(err.address, 0x000D);
        assert_eq!(err.access, Access::Read);
        assert!(bus.writes().is_empty());
    }

    #[test]
    fn test_write_failure_is_tagged_with_address() {
        let bus = SimBus::new();
        bus.fail_write_at(0);
        let mut handle = bus.clone();

        let err = write_reg(&mut handle, 0x0042, 1).unwrap_err();
        assert_eq!(err.address, 0x0042);
        assert_eq!(err.access, Access::Write);
    }
}
