use crate::controls::ControlId;
use std::fmt;

/// Failure reported by a bus adapter for a single register access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Direction of a register access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Read => f.write_str("read"),
            Access::Write => f.write_str("write"),
        }
    }
}

/// Transport failure on one register, tagged with the register it hit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("bus {access} of register 0x{address:04x} failed: {cause}")]
pub struct BusError {
    pub address: u16,
    pub access: Access,
    #[source]
    pub cause: TransportError,
}

impl BusError {
    pub fn read(address: u16, cause: TransportError) -> Self {
        Self {
            address,
            access: Access::Read,
            cause,
        }
    }

    pub fn write(address: u16, cause: TransportError) -> Self {
        Self {
            address,
            access: Access::Write,
            cause,
        }
    }
}

/// Errors from the chip identity check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("sensor is not ready (power it on first)")]
    NotReady,

    #[error("device not found: chip version register reads 0x{0:04x}")]
    DeviceNotFound(u16),

    #[error("device not found: chip version register unreadable ({0})")]
    Unreadable(#[source] BusError),
}

impl IdentityError {
    /// The value read from the chip version register, if the read succeeded.
    pub fn observed(&self) -> Option<u16> {
        match self {
            IdentityError::DeviceNotFound(value) => Some(*value),
            _ => None,
        }
    }

    /// True for both an unknown chip id and an unreadable id register.
    pub fn is_device_not_found(&self) -> bool {
        matches!(
            self,
            IdentityError::DeviceNotFound(_) | IdentityError::Unreadable(_)
        )
    }
}

/// Errors from `get_control` / `set_control` and the control queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    #[error("unknown control id 0x{0:08x}")]
    UnknownControl(u32),

    #[error("{control}: value {value} outside {min}..={max}")]
    OutOfRange {
        control: ControlId,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("sensor is not ready")]
    NotReady,

    #[error("{control}: writing value {value} failed: {source}")]
    Bus {
        control: ControlId,
        value: i64,
        source: BusError,
    },
}

/// Stage of the full configuration sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigStage {
    Init,
    WhiteBalance,
    Effect,
    Mode,
}

impl fmt::Display for ConfigStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigStage::Init => f.write_str("init"),
            ConfigStage::WhiteBalance => f.write_str("white balance"),
            ConfigStage::Effect => f.write_str("effect"),
            ConfigStage::Mode => f.write_str("mode"),
        }
    }
}

/// Errors from `configure`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("sensor is not ready")]
    NotReady,

    #[error("{stage} stage (table {table}) failed: {source}")]
    Stage {
        stage: ConfigStage,
        table: &'static str,
        source: BusError,
    },
}

impl ConfigError {
    pub fn stage(&self) -> Option<ConfigStage> {
        match self {
            ConfigError::Stage { stage, .. } => Some(*stage),
            ConfigError::NotReady => None,
        }
    }
}

/// Errors from the power-on sequence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PowerError {
    #[error("identity check failed: {0}")]
    Identity(#[from] IdentityError),

    #[error("soft reset failed: {0}")]
    Reset(#[source] BusError),

    #[error("control resync failed: {0}")]
    Resync(#[source] ControlError),
}

/// Errors from format and frame size enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("no entry at index {0}")]
    InvalidIndex(u32),

    #[error("media bus code 0x{0:04x} is not supported")]
    UnsupportedCode(u32),
}

/// Errors from raw debug register access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegisterError {
    #[error("register 0x{0:04x} is outside the sensor register space")]
    AddressOutOfRange(u16),

    #[error(transparent)]
    Bus(#[from] BusError),
}

/// Any error produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Mt9v022Error {
    #[error(transparent)]
    Bus(#[from] BusError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Control(#[from] ControlError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Power(#[from] PowerError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Register(#[from] RegisterError),

    #[error("sensor worker stopped")]
    WorkerStopped,

    #[error("failed to spawn sensor worker: {0}")]
    WorkerSpawn(String),
}

/// Thread-safe last-error storage for the C FFI layer.
pub(crate) struct LastError {
    message: std::sync::Mutex<String>,
}

impl LastError {
    pub const fn new() -> Self {
        Self {
            message: std::sync::Mutex::new(String::new()),
        }
    }

    pub fn set(&self, err: &Mt9v022Error) {
        if let Ok(mut msg) = self.message.lock() {
            *msg = format!("{}\0", err);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut msg) = self.message.lock() {
            msg.clear();
        }
    }

    pub fn as_ptr(&self) -> *const std::ffi::c_char {
        match self.message.lock() {
            Ok(msg) if !msg.is_empty() => msg.as_ptr() as *const std::ffi::c_char,
            _ => std::ptr::null(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_error_names_register() {
        let err = BusError::write(0x0020, TransportError::new("nack"));
        assert_eq!(
            err.to_string(),
            "bus write of register 0x0020 failed: nack"
        );
    }

    #[test]
    fn test_identity_error_observed() {
        assert_eq!(IdentityError::DeviceNotFound(0x5640).observed(), Some(0x5640));
        let unreadable =
            IdentityError::Unreadable(BusError::read(0x0000, TransportError::new("timeout")));
        assert_eq!(unreadable.observed(), None);
        assert!(unreadable.is_device_not_found());
        assert!(!IdentityError::NotReady.is_device_not_found());
    }

    #[test]
    fn test_umbrella_conversion() {
        let err: Mt9v022Error = ControlError::UnknownControl(7).into();
        assert!(matches!(err, Mt9v022Error::Control(ControlError::UnknownControl(7))));
        assert_eq!(err.to_string(), "unknown control id 0x00000007");
    }
}
