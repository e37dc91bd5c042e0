use crate::bus::{self, RegisterBus};
use crate::error::{BusError, ControlError};
use crate::registers;
use crate::table;
use crate::tables::SensorProfile;
use std::fmt;

/// User-adjustable sensor controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    /// Horizontal mirror (column flip).
    FlipX,
    /// Vertical flip (row flip).
    FlipY,
    WhiteBalance,
    Effect,
}

impl ControlId {
    pub const ALL: [ControlId; 4] = [
        ControlId::FlipX,
        ControlId::FlipY,
        ControlId::WhiteBalance,
        ControlId::Effect,
    ];

    pub fn from_raw(id: u32) -> Option<ControlId> {
        match id {
            registers::CID_HFLIP => Some(ControlId::FlipX),
            registers::CID_VFLIP => Some(ControlId::FlipY),
            registers::CID_WHITE_BALANCE => Some(ControlId::WhiteBalance),
            registers::CID_EFFECT => Some(ControlId::Effect),
            _ => None,
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            ControlId::FlipX => registers::CID_HFLIP,
            ControlId::FlipY => registers::CID_VFLIP,
            ControlId::WhiteBalance => registers::CID_WHITE_BALANCE,
            ControlId::Effect => registers::CID_EFFECT,
        }
    }

    /// Range, step and default of the control.
    pub fn info(self) -> ControlInfo {
        match self {
            ControlId::FlipX | ControlId::FlipY => ControlInfo {
                id: self,
                kind: ControlKind::Boolean,
                min: 0,
                max: 1,
                step: 1,
                default: 0,
            },
            ControlId::WhiteBalance => ControlInfo::menu::<WhiteBalance>(self),
            ControlId::Effect => ControlInfo::menu::<Effect>(self),
        }
    }

    /// Name of menu entry `index`, for the menu controls.
    pub fn menu_name(self, index: i64) -> Result<&'static str, ControlError> {
        let name = match self {
            ControlId::WhiteBalance => WhiteBalance::from_index(index).map(|v| v.name()),
            ControlId::Effect => Effect::from_index(index).map(|v| v.name()),
            ControlId::FlipX | ControlId::FlipY => return Err(ControlError::UnknownControl(self.raw())),
        };
        name.ok_or_else(|| self.out_of_range(index))
    }

    fn out_of_range(self, value: i64) -> ControlError {
        let info = self.info();
        ControlError::OutOfRange {
            control: self,
            value,
            min: info.min,
            max: info.max,
        }
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlId::FlipX => f.write_str("horizontal flip"),
            ControlId::FlipY => f.write_str("vertical flip"),
            ControlId::WhiteBalance => f.write_str("white balance"),
            ControlId::Effect => f.write_str("effect"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Boolean,
    Menu,
}

/// Control descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlInfo {
    pub id: ControlId,
    pub kind: ControlKind,
    pub min: i64,
    pub max: i64,
    pub step: i64,
    pub default: i64,
}

impl ControlInfo {
    fn menu<V: MenuVariant>(id: ControlId) -> Self {
        Self {
            id,
            kind: ControlKind::Menu,
            min: 0,
            max: V::COUNT as i64 - 1,
            step: 1,
            default: V::default().index() as i64,
        }
    }
}

/// A fixed, ordered set of named variants selected by index.
pub trait MenuVariant: Copy + Default + Sized + 'static {
    const COUNT: usize;
    const ALL: &'static [Self];

    fn index(self) -> usize;

    fn name(self) -> &'static str;

    /// `None` unless `0 <= index < COUNT`.
    fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }
}

/// White-balance presets, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WhiteBalance {
    #[default]
    Auto,
    Incandescent,
    Daylight,
    Fluorescent,
    Cloudy,
}

impl MenuVariant for WhiteBalance {
    const COUNT: usize = 5;
    const ALL: &'static [Self] = &[
        WhiteBalance::Auto,
        WhiteBalance::Incandescent,
        WhiteBalance::Daylight,
        WhiteBalance::Fluorescent,
        WhiteBalance::Cloudy,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            WhiteBalance::Auto => "auto",
            WhiteBalance::Incandescent => "incandescent",
            WhiteBalance::Daylight => "daylight",
            WhiteBalance::Fluorescent => "fluorescent",
            WhiteBalance::Cloudy => "cloudy",
        }
    }
}

/// Image effect presets, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Effect {
    #[default]
    None,
    Mono,
    Sepia,
    Negative,
    Aqua,
}

impl MenuVariant for Effect {
    const COUNT: usize = 5;
    const ALL: &'static [Self] = &[
        Effect::None,
        Effect::Mono,
        Effect::Sepia,
        Effect::Negative,
        Effect::Aqua,
    ];

    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Effect::None => "none",
            Effect::Mono => "mono",
            Effect::Sepia => "sepia",
            Effect::Negative => "negative",
            Effect::Aqua => "aqua",
        }
    }
}

/// Last committed value of every control.
///
/// A field only changes after its register writes succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlState {
    pub flip_x: bool,
    pub flip_y: bool,
    pub white_balance: WhiteBalance,
    pub effect: Effect,
}

impl ControlState {
    pub fn get(&self, id: ControlId) -> i64 {
        match id {
            ControlId::FlipX => self.flip_x as i64,
            ControlId::FlipY => self.flip_y as i64,
            ControlId::WhiteBalance => self.white_balance.index() as i64,
            ControlId::Effect => self.effect.index() as i64,
        }
    }

    /// Validate `value`, write it to the sensor, and commit it on success.
    pub fn set<B: RegisterBus + ?Sized>(
        &mut self,
        bus: &mut B,
        profile: &SensorProfile,
        id: ControlId,
        value: i64,
    ) -> Result<(), ControlError> {
        let bus_err = |source: BusError| ControlError::Bus {
            control: id,
            value,
            source,
        };

        match id {
            ControlId::WhiteBalance => {
                let preset = WhiteBalance::from_index(value).ok_or_else(|| id.out_of_range(value))?;
                table::apply(bus, profile.white_balance_table(preset)).map_err(bus_err)?;
                self.white_balance = preset;
            }
            ControlId::Effect => {
                let preset = Effect::from_index(value).ok_or_else(|| id.out_of_range(value))?;
                table::apply(bus, profile.effect_table(preset)).map_err(bus_err)?;
                self.effect = preset;
            }
            ControlId::FlipX | ControlId::FlipY => {
                let on = match value {
                    0 => false,
                    1 => true,
                    _ => return Err(id.out_of_range(value)),
                };
                write_flip(bus, id, on).map_err(bus_err)?;
                if id == ControlId::FlipX {
                    self.flip_x = on;
                } else {
                    self.flip_y = on;
                }
            }
        }

        log::debug!("{} set to {}", id, value);
        Ok(())
    }

    /// Re-issue the writes of every committed value, e.g. after a power cycle.
    pub fn resync<B: RegisterBus + ?Sized>(
        &self,
        bus: &mut B,
        profile: &SensorProfile,
    ) -> Result<(), ControlError> {
        let mut shadow = *self;
        for id in [
            ControlId::WhiteBalance,
            ControlId::Effect,
            ControlId::FlipX,
            ControlId::FlipY,
        ] {
            shadow.set(bus, profile, id, self.get(id))?;
        }
        Ok(())
    }

    /// Flips after the init table rewrote READ_MODE.
    pub(crate) fn clear_flips(&mut self) {
        self.flip_x = false;
        self.flip_y = false;
    }
}

fn write_flip<B: RegisterBus + ?Sized>(bus: &mut B, id: ControlId, on: bool) -> Result<(), BusError> {
    let mask = match id {
        ControlId::FlipX => registers::READ_MODE_COLUMN_FLIP,
        _ => registers::READ_MODE_ROW_FLIP,
    };
    bus::mask_set(bus, registers::REG_READ_MODE, mask, if on { mask } else { 0 })
}
