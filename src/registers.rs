//! MT9V022 register map: the addresses and bits the control logic touches.
//! Bulk configuration values live in [`crate::tables`].

// -- Identity --
pub const REG_CHIP_VERSION: u16 = 0x0000;

/// Chip version values accepted by the identity check.
pub const CHIP_ID_REV1: u16 = 0x1311;
pub const CHIP_ID_REV3: u16 = 0x1313;
pub const CHIP_ID_MT9V024: u16 = 0x1324;

// -- Reset --
pub const REG_RESET: u16 = 0x000C;
pub const RESET_SOFT: u16 = 0x0001;

// -- Read mode (binning and flips) --
pub const REG_READ_MODE: u16 = 0x000D;
pub const READ_MODE_ROW_FLIP: u16 = 0x0010;
pub const READ_MODE_COLUMN_FLIP: u16 = 0x0020;

/// Highest address of the sensor's 8-bit register space.
pub const MAX_REGISTER: u16 = 0x00FF;

// -- Default output window --
pub const DEFAULT_WIDTH: u32 = 320;
pub const DEFAULT_HEIGHT: u32 = 240;

// -- Control identifiers (V4L2 numbering) --
pub const CID_HFLIP: u32 = 0x0098_0914;
pub const CID_VFLIP: u32 = 0x0098_0915;
pub const CID_PRIVATE_BASE: u32 = 0x0800_0000;
pub const CID_WHITE_BALANCE: u32 = CID_PRIVATE_BASE;
pub const CID_EFFECT: u32 = CID_PRIVATE_BASE + 1;

// -- Media bus codes --
pub const MEDIA_BUS_FMT_Y8_1X8: u32 = 0x2001;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_bits_are_distinct_single_bits() {
        assert_eq!(READ_MODE_ROW_FLIP.count_ones(), 1);
        assert_eq!(READ_MODE_COLUMN_FLIP.count_ones(), 1);
        assert_eq!(READ_MODE_ROW_FLIP & READ_MODE_COLUMN_FLIP, 0);
    }

    #[test]
    fn test_control_registers_in_register_space() {
        for reg in [REG_CHIP_VERSION, REG_RESET, REG_READ_MODE] {
            assert!(reg <= MAX_REGISTER);
        }
    }
}
