//! # mt9v022 - control core for the MT9V022 CMOS image sensor
//!
//! Drives the sensor over any 16-bit register bus. Provides:
//! - Power-on sequencing with chip identity check and soft reset
//! - Sentinel-terminated register tables applied in a fixed order
//!   (init, white balance, effect, mode)
//! - Mode resolution from a requested frame size
//! - Flip, white-balance and effect controls that survive power cycles
//! - A worker thread that serializes access from many callers
//! - C FFI with host-supplied bus callbacks
//!
//! ## Quick Start
//! ```
//! use mt9v022::sim::{SimBus, SimPower};
//! use mt9v022::{registers, Sensor, SensorConfig};
//!
//! let bus = SimBus::with_chip_id(registers::CHIP_ID_REV3);
//! let mut sensor = Sensor::with_config(bus, SimPower::new(), SensorConfig::immediate());
//!
//! sensor.power(true).unwrap();
//! let applied = sensor.configure(640, 480).unwrap();
//! println!("mode {} ({}x{})", applied.mode.label, applied.size.width, applied.size.height);
//!
//! sensor.set_control(registers::CID_VFLIP, 1).unwrap();
//! assert_eq!(sensor.get_control(registers::CID_VFLIP).unwrap(), 1);
//! ```

pub mod error;
pub mod types;
pub mod registers;
pub mod bus;
pub mod table;
pub mod modes;
pub mod controls;
pub mod tables;
pub mod power;
pub mod config;
pub mod sensor;
pub mod worker;
pub mod sim;
pub mod ffi;

pub use bus::RegisterBus;
pub use config::SensorConfig;
pub use controls::{ControlId, ControlInfo, ControlKind, ControlState, Effect, MenuVariant, WhiteBalance};
pub use error::{
    Access, BusError, ConfigError, ConfigStage, ControlError, FormatError, IdentityError,
    Mt9v022Error, PowerError, RegisterError, TransportError,
};
pub use modes::{Mode, ModeTable};
pub use power::{NoPowerControl, PowerControl, PowerState};
pub use sensor::{AppliedMode, Sensor, SensorState};
pub use table::{Mismatch, RegisterEntry, RegisterTable, TableRole};
pub use tables::{SensorProfile, MT9V022};
pub use types::*;
pub use worker::SensorWorker;

/// Result type alias for mt9v022 operations.
pub type Result<T> = std::result::Result<T, Mt9v022Error>;
