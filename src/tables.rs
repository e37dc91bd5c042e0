//! Register tables and the MT9V022 sensor profile. Pure data.

use crate::controls::{Effect, MenuVariant, WhiteBalance};
use crate::modes::{Mode, ModeTable};
use crate::registers;
use crate::table::{RegisterEntry, RegisterTable, TableRole};
use crate::types::MediaBusCode;

/// Everything the core needs to drive one sensor type.
#[derive(Debug, Clone, Copy)]
pub struct SensorProfile {
    pub name: &'static str,
    /// Written first by every full configuration.
    pub init: RegisterTable,
    pub modes: ModeTable,
    /// Indexed by [`WhiteBalance`] menu order.
    pub white_balance: [RegisterTable; WhiteBalance::COUNT],
    /// Indexed by [`Effect`] menu order.
    pub effects: [RegisterTable; Effect::COUNT],
    /// Supported pixel codes, preferred first.
    pub codes: &'static [MediaBusCode],
}

impl SensorProfile {
    pub fn white_balance_table(&self, preset: WhiteBalance) -> &RegisterTable {
        &self.white_balance[preset.index()]
    }

    pub fn effect_table(&self, preset: Effect) -> &RegisterTable {
        &self.effects[preset.index()]
    }

    pub fn default_code(&self) -> MediaBusCode {
        self.codes.first().copied().unwrap_or(MediaBusCode::Y8)
    }
}

/// Power-up defaults (snapshot capture variant).
pub const INIT: RegisterTable = RegisterTable::new(
    "init",
    TableRole::Init,
    &[
        // analog tuning and pixel mode, ahead of the full register set
        RegisterEntry::new(0x0031, 0x001F),
        RegisterEntry::new(0x0032, 0x001A),
        RegisterEntry::new(0x0033, 0x0012),
        RegisterEntry::new(0x00AF, 0x0000),
        RegisterEntry::new(0x002B, 0x0003),
        RegisterEntry::new(0x0010, 0x0040),
        RegisterEntry::new(0x000F, 0x0051),
        RegisterEntry::new(0x0010, 0x0040),
        RegisterEntry::new(0x0015, 0x7F32),
        RegisterEntry::new(0x001C, 0x0003),
        RegisterEntry::new(0x0020, 0x03D5),
        RegisterEntry::new(0x002B, 0x0000),
        RegisterEntry::new(0x0048, 0x0000),
        RegisterEntry::new(0x0070, 0x0004),
        RegisterEntry::new(0x0073, 0x02F7),
        RegisterEntry::new(0x00AB, 0x0000),
        RegisterEntry::new(0x00BF, 0x0014),
        RegisterEntry::new(0x00C2, 0x0940),
        RegisterEntry::new(0x000F, 0x0011),
        RegisterEntry::new(0x0015, 0x7F32),
        RegisterEntry::new(0x001C, 0x0002),
        RegisterEntry::new(0x0020, 0x03D5),
        RegisterEntry::new(0x00C2, 0x0840),
        // window, blanking, shutter
        RegisterEntry::new(0x0001, 0x0001),
        RegisterEntry::new(0x0002, 0x0004),
        RegisterEntry::new(0x0003, 0x01E0),
        RegisterEntry::new(0x0004, 0x0280),
        RegisterEntry::new(0x0005, 0x005E),
        RegisterEntry::new(0x0006, 0x002D),
        RegisterEntry::new(0x0007, 0x0398),
        RegisterEntry::new(0x0008, 0x01BB),
        RegisterEntry::new(0x0009, 0x01D9),
        RegisterEntry::new(0x000A, 0x0164),
        RegisterEntry::new(0x000B, 0x01E0),
        RegisterEntry::new(0x000C, 0x0000),
        RegisterEntry::new(0x000D, 0x0304),
        RegisterEntry::new(0x000E, 0x0000),
        RegisterEntry::new(0x000F, 0x0015),
        RegisterEntry::new(0x0010, 0x0040),
        RegisterEntry::new(0x0011, 0x8042),
        RegisterEntry::new(0x0012, 0x0022),
        RegisterEntry::new(0x0013, 0x2D32),
        RegisterEntry::new(0x0014, 0x0E02),
        RegisterEntry::new(0x0015, 0x7F32),
        RegisterEntry::new(0x0016, 0x2802),
        RegisterEntry::new(0x0017, 0x3E38),
        RegisterEntry::new(0x0018, 0x3E38),
        RegisterEntry::new(0x0019, 0x2802),
        RegisterEntry::new(0x001A, 0x0428),
        RegisterEntry::new(0x001B, 0x0000),
        RegisterEntry::new(0x001C, 0x0002),
        RegisterEntry::new(0x001D, 0x0000),
        RegisterEntry::new(0x001E, 0x0000),
        RegisterEntry::new(0x001F, 0x0000),
        RegisterEntry::new(0x0020, 0x03D5),
        RegisterEntry::new(0x0021, 0x0020),
        RegisterEntry::new(0x0022, 0x0020),
        RegisterEntry::new(0x0023, 0x0010),
        RegisterEntry::new(0x0024, 0x0010),
        RegisterEntry::new(0x0025, 0x0020),
        RegisterEntry::new(0x0026, 0x0010),
        RegisterEntry::new(0x0027, 0x0010),
        RegisterEntry::new(0x0028, 0x0010),
        RegisterEntry::new(0x0029, 0x0010),
        RegisterEntry::new(0x002A, 0x0020),
        RegisterEntry::new(0x002B, 0x0004),
        RegisterEntry::new(0x002C, 0x0004),
        RegisterEntry::new(0x002D, 0x0004),
        RegisterEntry::new(0x002E, 0x0007),
        RegisterEntry::new(0x002F, 0x0004),
        RegisterEntry::new(0x0030, 0x0003),
        RegisterEntry::new(0x0031, 0x001D),
        RegisterEntry::new(0x0032, 0x0018),
        RegisterEntry::new(0x0033, 0x0015),
        RegisterEntry::new(0x0034, 0x0004),
        RegisterEntry::new(0x0035, 0x0010),
        RegisterEntry::new(0x0036, 0x0040),
        RegisterEntry::new(0x0037, 0x0000),
        RegisterEntry::new(0x0038, 0x0000),
        RegisterEntry::new(0x0046, 0x231D),
        RegisterEntry::new(0x0047, 0x8080),
        RegisterEntry::new(0x004C, 0x0002),
        RegisterEntry::new(0x0060, 0x0000),
        RegisterEntry::new(0x0061, 0x0000),
        RegisterEntry::new(0x0062, 0x0000),
        RegisterEntry::new(0x0063, 0x0000),
        RegisterEntry::new(0x0064, 0x0000),
        RegisterEntry::new(0x0065, 0x0000),
        RegisterEntry::new(0x0066, 0x0000),
        RegisterEntry::new(0x0067, 0x0000),
        RegisterEntry::new(0x006C, 0x0000),
        RegisterEntry::new(0x0070, 0x0034),
        RegisterEntry::new(0x0071, 0x0000),
        RegisterEntry::new(0x0072, 0x002A),
        RegisterEntry::new(0x0073, 0x02F7),
        RegisterEntry::new(0x0074, 0x0012),
        RegisterEntry::new(0x007F, 0x0000),
        // AEC/AGC tile weights and slash coordinates
        RegisterEntry::new(0x0080, 0x00F4),
        RegisterEntry::new(0x0081, 0x00F4),
        RegisterEntry::new(0x0082, 0x00F4),
        RegisterEntry::new(0x0083, 0x00F4),
        RegisterEntry::new(0x0084, 0x00F4),
        RegisterEntry::new(0x0085, 0x00F4),
        RegisterEntry::new(0x0086, 0x00F4),
        RegisterEntry::new(0x0087, 0x00F4),
        RegisterEntry::new(0x0088, 0x00F4),
        RegisterEntry::new(0x0089, 0x00F4),
        RegisterEntry::new(0x008A, 0x00F4),
        RegisterEntry::new(0x008B, 0x00F4),
        RegisterEntry::new(0x008C, 0x00F4),
        RegisterEntry::new(0x008D, 0x00F4),
        RegisterEntry::new(0x008E, 0x00F4),
        RegisterEntry::new(0x008F, 0x00F4),
        RegisterEntry::new(0x0090, 0x00F4),
        RegisterEntry::new(0x0091, 0x00F4),
        RegisterEntry::new(0x0092, 0x00F4),
        RegisterEntry::new(0x0093, 0x00F4),
        RegisterEntry::new(0x0094, 0x00F4),
        RegisterEntry::new(0x0095, 0x00F4),
        RegisterEntry::new(0x0096, 0x00F4),
        RegisterEntry::new(0x0097, 0x00F4),
        RegisterEntry::new(0x0098, 0x00F4),
        RegisterEntry::new(0x0099, 0x0000),
        RegisterEntry::new(0x009A, 0x0096),
        RegisterEntry::new(0x009B, 0x012C),
        RegisterEntry::new(0x009C, 0x01C2),
        RegisterEntry::new(0x009D, 0x0258),
        RegisterEntry::new(0x009E, 0x02F0),
        RegisterEntry::new(0x009F, 0x0000),
        RegisterEntry::new(0x00A0, 0x0060),
        RegisterEntry::new(0x00A1, 0x00C0),
        RegisterEntry::new(0x00A2, 0x0120),
        RegisterEntry::new(0x00A3, 0x0180),
        RegisterEntry::new(0x00A4, 0x01E0),
        // exposure and gain loop
        RegisterEntry::new(0x00A5, 0x003A),
        RegisterEntry::new(0x00A6, 0x0002),
        RegisterEntry::new(0x00A7, 0x0000),
        RegisterEntry::new(0x00A8, 0x0000),
        RegisterEntry::new(0x00A9, 0x0002),
        RegisterEntry::new(0x00AA, 0x0000),
        RegisterEntry::new(0x00AB, 0x0002),
        RegisterEntry::new(0x00AF, 0x0000),
        RegisterEntry::new(0x00B0, 0xABE0),
        // LVDS disabled, parallel output timing
        RegisterEntry::new(0x00B1, 0x0002),
        RegisterEntry::new(0x00B2, 0x0010),
        RegisterEntry::new(0x00B3, 0x0010),
        RegisterEntry::new(0x00B4, 0x0000),
        RegisterEntry::new(0x00B5, 0x0000),
        RegisterEntry::new(0x00B6, 0x0000),
        RegisterEntry::new(0x00B7, 0x0000),
        RegisterEntry::new(0x00BD, 0x01E0),
        RegisterEntry::new(0x00BE, 0x0014),
        RegisterEntry::new(0x00BF, 0x0016),
        RegisterEntry::new(0x00C0, 0x000A),
        RegisterEntry::new(0x00C2, 0x0840),
        RegisterEntry::new(0x00C3, 0x0000),
        RegisterEntry::new(0x00C4, 0x4416),
        RegisterEntry::new(0x00C5, 0x4421),
        RegisterEntry::new(0x00F1, 0x0000),
        RegisterEntry::new(0x00FE, 0xBEEF),
        RegisterEntry::END,
    ],
);

// The monochrome part has no colour pipeline: presets and the mode carry no
// registers beyond what INIT already sets.
pub const WB_AUTO: RegisterTable = RegisterTable::new(
    "wb_auto",
    TableRole::WhiteBalance(WhiteBalance::Auto),
    &[RegisterEntry::END],
);
pub const WB_INCANDESCENT: RegisterTable = RegisterTable::new(
    "wb_incandescent",
    TableRole::WhiteBalance(WhiteBalance::Incandescent),
    &[RegisterEntry::END],
);
pub const WB_DAYLIGHT: RegisterTable = RegisterTable::new(
    "wb_daylight",
    TableRole::WhiteBalance(WhiteBalance::Daylight),
    &[RegisterEntry::END],
);
pub const WB_FLUORESCENT: RegisterTable = RegisterTable::new(
    "wb_fluorescent",
    TableRole::WhiteBalance(WhiteBalance::Fluorescent),
    &[RegisterEntry::END],
);
pub const WB_CLOUDY: RegisterTable = RegisterTable::new(
    "wb_cloudy",
    TableRole::WhiteBalance(WhiteBalance::Cloudy),
    &[RegisterEntry::END],
);

pub const EFFECT_NONE: RegisterTable = RegisterTable::new(
    "effect_none",
    TableRole::Effect(Effect::None),
    &[RegisterEntry::END],
);
pub const EFFECT_MONO: RegisterTable = RegisterTable::new(
    "effect_mono",
    TableRole::Effect(Effect::Mono),
    &[RegisterEntry::END],
);
pub const EFFECT_SEPIA: RegisterTable = RegisterTable::new(
    "effect_sepia",
    TableRole::Effect(Effect::Sepia),
    &[RegisterEntry::END],
);
pub const EFFECT_NEGATIVE: RegisterTable = RegisterTable::new(
    "effect_negative",
    TableRole::Effect(Effect::Negative),
    &[RegisterEntry::END],
);
pub const EFFECT_AQUA: RegisterTable = RegisterTable::new(
    "effect_aqua",
    TableRole::Effect(Effect::Aqua),
    &[RegisterEntry::END],
);

pub const MODE_720P: RegisterTable = RegisterTable::new("720p", TableRole::Mode, &[RegisterEntry::END]);

pub const MODES: ModeTable = ModeTable::new(&[Mode::new(
    "720P",
    registers::DEFAULT_WIDTH,
    registers::DEFAULT_HEIGHT,
    MODE_720P,
)]);

pub const MT9V022: SensorProfile = SensorProfile {
    name: "mt9v022",
    init: INIT,
    modes: MODES,
    white_balance: [WB_AUTO, WB_INCANDESCENT, WB_DAYLIGHT, WB_FLUORESCENT, WB_CLOUDY],
    effects: [EFFECT_NONE, EFFECT_MONO, EFFECT_SEPIA, EFFECT_NEGATIVE, EFFECT_AQUA],
    codes: &[MediaBusCode::Y8],
};
