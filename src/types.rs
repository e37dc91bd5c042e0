use crate::registers;

/// Chip revisions accepted by the identity check.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChipId {
    /// MT9V022 revision 1.
    Mt9v022Rev1 = registers::CHIP_ID_REV1,
    /// MT9V022 revision 3.
    Mt9v022Rev3 = registers::CHIP_ID_REV3,
    /// MT9V024, register compatible.
    Mt9v024 = registers::CHIP_ID_MT9V024,
}

impl ChipId {
    pub const ALL: [ChipId; 3] = [ChipId::Mt9v022Rev1, ChipId::Mt9v022Rev3, ChipId::Mt9v024];

    /// Match a chip version register value against the known ids.
    pub fn from_raw(value: u16) -> Option<ChipId> {
        Self::ALL.into_iter().find(|id| id.raw() == value)
    }

    pub fn raw(self) -> u16 {
        self as u16
    }
}

/// Pixel dimensions of a frame.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when this size fits inside `other` in both dimensions.
    pub fn fits_within(&self, other: FrameSize) -> bool {
        self.width <= other.width && self.height <= other.height
    }
}

/// Pixel encoding on the parallel bus.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaBusCode {
    /// 8-bit greyscale, one sample per clock.
    Y8 = registers::MEDIA_BUS_FMT_Y8_1X8,
}

impl MediaBusCode {
    pub fn from_raw(code: u32) -> Option<MediaBusCode> {
        match code {
            registers::MEDIA_BUS_FMT_Y8_1X8 => Some(MediaBusCode::Y8),
            _ => None,
        }
    }

    pub fn raw(self) -> u32 {
        self as u32
    }
}

/// Output format: size plus pixel code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameFormat {
    pub size: FrameSize,
    pub code: MediaBusCode,
}

/// One entry of the frame size enumeration. Modes are fixed sizes, so
/// `min == max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSizeRange {
    pub code: MediaBusCode,
    pub min: FrameSize,
    pub max: FrameSize,
}

/// Rectangle in sensor pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

/// Cropping capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropCap {
    pub bounds: CropRect,
    pub default_rect: CropRect,
    /// Pixel aspect as (numerator, denominator).
    pub pixel_aspect: (u32, u32),
}

/// Physical bus the pixel data leaves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusType {
    Parallel,
}

bitflags::bitflags! {
    /// Signal polarities and roles on the parallel pixel bus.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[repr(C)]
    pub struct BusFlags: u32 {
        const MASTER              = 1 << 0;
        const HSYNC_ACTIVE_HIGH   = 1 << 2;
        const HSYNC_ACTIVE_LOW    = 1 << 3;
        const VSYNC_ACTIVE_HIGH   = 1 << 4;
        const VSYNC_ACTIVE_LOW    = 1 << 5;
        const PCLK_SAMPLE_RISING  = 1 << 6;
        const PCLK_SAMPLE_FALLING = 1 << 7;
        const DATA_ACTIVE_HIGH    = 1 << 8;
        const DATA_ACTIVE_LOW     = 1 << 9;
    }
}

/// Pixel bus configuration the sensor drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    pub bus_type: BusType,
    pub flags: BusFlags,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chip_id_from_raw() {
        assert_eq!(ChipId::from_raw(0x1311), Some(ChipId::Mt9v022Rev1));
        assert_eq!(ChipId::from_raw(0x1313), Some(ChipId::Mt9v022Rev3));
        assert_eq!(ChipId::from_raw(0x1324), Some(ChipId::Mt9v024));
        assert_eq!(ChipId::from_raw(0x1312), None);
        assert_eq!(ChipId::from_raw(0x0000), None);
        assert_eq!(ChipId::Mt9v022Rev3.raw(), 0x1313);
    }

    #[test]
    fn test_fits_within() {
        let qvga = FrameSize::new(320, 240);
        assert!(qvga.fits_within(FrameSize::new(320, 240)));
        assert!(qvga.fits_within(FrameSize::new(640, 480)));
        assert!(!qvga.fits_within(FrameSize::new(640, 200)));
        assert!(!qvga.fits_within(FrameSize::new(300, 480)));
    }

    #[test]
    fn test_media_bus_code_round_trip() {
        assert_eq!(MediaBusCode::from_raw(0x2001), Some(MediaBusCode::Y8));
        assert_eq!(MediaBusCode::from_raw(0x2002), None);
    }
}
