//! C FFI layer for the MT9V022 core.
//!
//! The host supplies register access and power/reset lines as callbacks and
//! gets back an opaque sensor handle. The generated C header is written to
//! `include/mt9v022.h` by cbindgen.

use crate::bus::RegisterBus;
use crate::config::SensorConfig;
use crate::error::{LastError, TransportError};
use crate::power::PowerControl;
use crate::sensor::Sensor;
use crate::Mt9v022Error;
use std::ffi::{c_char, c_int, c_void};

/// Last error message for C consumers.
static LAST_ERROR: LastError = LastError::new();

/// Host callbacks. `read16` and `write16` are required, the power and reset
/// hooks may be NULL on boards without those lines.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct MtSensorCallbacks {
    /// Passed back unchanged as the first argument of every callback.
    pub ctx: *mut c_void,
    /// Read a 16-bit register into `*value`. Returns 0 on success.
    pub read16: Option<unsafe extern "C" fn(ctx: *mut c_void, address: u16, value: *mut u16) -> c_int>,
    /// Write a 16-bit register. Returns 0 on success.
    pub write16: Option<unsafe extern "C" fn(ctx: *mut c_void, address: u16, value: u16) -> c_int>,
    pub set_power: Option<unsafe extern "C" fn(ctx: *mut c_void, on: bool)>,
    /// `asserted` is true while the sensor is held in reset.
    pub set_reset: Option<unsafe extern "C" fn(ctx: *mut c_void, asserted: bool)>,
}

pub struct CallbackBus(MtSensorCallbacks);

impl RegisterBus for CallbackBus {
    fn read16(&mut self, address: u16) -> std::result::Result<u16, TransportError> {
        let read16 = self.0.read16.ok_or_else(|| TransportError::new("no read callback"))?;
        let mut value = 0u16;
        // SAFETY: the host promised in mt_sensor_new that ctx and the callbacks stay valid.
        let rc = unsafe { read16(self.0.ctx, address, &mut value) };
        if rc != 0 {
            return Err(TransportError::new(format!("read callback returned {}", rc)));
        }
        Ok(value)
    }

    fn write16(&mut self, address: u16, value: u16) -> std::result::Result<(), TransportError> {
        let write16 = self.0.write16.ok_or_else(|| TransportError::new("no write callback"))?;
        // SAFETY: see read16.
        let rc = unsafe { write16(self.0.ctx, address, value) };
        if rc != 0 {
            return Err(TransportError::new(format!("write callback returned {}", rc)));
        }
        Ok(())
    }
}

pub struct CallbackPower(MtSensorCallbacks);

impl CallbackPower {
    fn reset(&mut self, asserted: bool) {
        if let Some(set_reset) = self.0.set_reset {
            // SAFETY: see CallbackBus::read16.
            unsafe { set_reset(self.0.ctx, asserted) }
        }
    }
}

impl PowerControl for CallbackPower {
    fn set_power(&mut self, on: bool) {
        if let Some(set_power) = self.0.set_power {
            // SAFETY: see CallbackBus::read16.
            unsafe { set_power(self.0.ctx, on) }
        }
    }

    fn assert_reset(&mut self) {
        self.reset(true);
    }

    fn release_reset(&mut self) {
        self.reset(false);
    }
}

/// Opaque sensor handle for C consumers.
pub struct MtSensor(Sensor<CallbackBus, CallbackPower>);

/// Record the outcome for `mt_last_error` and map it to 0 / -1.
fn report<T, E: Into<Mt9v022Error>>(result: Result<T, E>) -> Result<T, c_int> {
    match result {
        Ok(value) => {
            LAST_ERROR.clear();
            Ok(value)
        }
        Err(e) => {
            let e = e.into();
            log::debug!("FFI call failed: {}", e);
            LAST_ERROR.set(&e);
            Err(-1)
        }
    }
}

/// Create a sensor handle. Timings come from the `MT9V022_*` environment
/// variables. Returns NULL if `callbacks` is NULL or lacks `read16`/`write16`.
///
/// # Safety
/// `callbacks` must point to a valid `MtSensorCallbacks`, or be null. The
/// callbacks and `ctx` must stay valid until `mt_sensor_free`.
#[no_mangle]
pub unsafe extern "C" fn mt_sensor_new(callbacks: *const MtSensorCallbacks) -> *mut MtSensor {
    if callbacks.is_null() {
        return std::ptr::null_mut();
    }
    let callbacks = *callbacks;
    if callbacks.read16.is_none() || callbacks.write16.is_none() {
        return std::ptr::null_mut();
    }
    let sensor = Sensor::with_config(
        CallbackBus(callbacks),
        CallbackPower(callbacks),
        SensorConfig::from_env(),
    );
    Box::into_raw(Box::new(MtSensor(sensor)))
}

/// Free a sensor handle. Does not power the sensor off.
///
/// # Safety
/// `sensor` must be a pointer returned by `mt_sensor_new`, or null.
#[no_mangle]
pub unsafe extern "C" fn mt_sensor_free(sensor: *mut MtSensor) {
    if !sensor.is_null() {
        drop(Box::from_raw(sensor));
    }
}

/// Power the sensor on (identity check included) or off.
/// Returns 0 on success, -1 on error.
///
/// # Safety
/// `sensor` must be a valid sensor pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn mt_sensor_power(sensor: *mut MtSensor, on: bool) -> c_int {
    if sensor.is_null() {
        return -1;
    }
    let sensor = &mut *sensor;
    match report(sensor.0.power(on)) {
        Ok(()) => 0,
        Err(rc) => rc,
    }
}

/// Re-read the chip version. On success writes it to `*chip_id` (if non-null).
///
/// # Safety
/// `sensor` must be a valid sensor pointer, or null. `chip_id` must be valid
/// for writes, or null.
#[no_mangle]
pub unsafe extern "C" fn mt_sensor_probe_identity(sensor: *mut MtSensor, chip_id: *mut u16) -> c_int {
    if sensor.is_null() {
        return -1;
    }
    let sensor = &mut *sensor;
    match report(sensor.0.probe_identity()) {
        Ok(chip) => {
            if !chip_id.is_null() {
                chip_id.write(chip.raw());
            }
            0
        }
        Err(rc) => rc,
    }
}

/// Apply the full configuration for the requested size. `width` and
/// `height` are replaced with the size of the selected mode.
///
/// # Safety
/// `sensor`, `width` and `height` must be valid pointers, or null.
#[no_mangle]
pub unsafe extern "C" fn mt_sensor_configure(
    sensor: *mut MtSensor,
    width: *mut u32,
    height: *mut u32,
) -> c_int {
    if sensor.is_null() || width.is_null() || height.is_null() {
        return -1;
    }
    let sensor = &mut *sensor;
    match report(sensor.0.configure(*width, *height)) {
        Ok(applied) => {
            width.write(applied.size.width);
            height.write(applied.size.height);
            0
        }
        Err(rc) => rc,
    }
}

/// Read the stored value of control `id` into `*value`.
///
/// # Safety
/// `sensor` and `value` must be valid pointers, or null.
#[no_mangle]
pub unsafe extern "C" fn mt_sensor_get_control(
    sensor: *const MtSensor,
    id: u32,
    value: *mut i64,
) -> c_int {
    if sensor.is_null() || value.is_null() {
        return -1;
    }
    let sensor = &*sensor;
    match report(sensor.0.get_control(id)) {
        Ok(v) => {
            value.write(v);
            0
        }
        Err(rc) => rc,
    }
}

/// Set control `id`. Returns 0 on success, -1 on error.
///
/// # Safety
/// `sensor` must be a valid sensor pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn mt_sensor_set_control(sensor: *mut MtSensor, id: u32, value: i64) -> c_int {
    if sensor.is_null() {
        return -1;
    }
    let sensor = &mut *sensor;
    match report(sensor.0.set_control(id, value)) {
        Ok(()) => 0,
        Err(rc) => rc,
    }
}

/// Debug read of a register in 0x00..=0xFF.
///
/// # Safety
/// `sensor` and `value` must be valid pointers, or null.
#[no_mangle]
pub unsafe extern "C" fn mt_sensor_read_register(
    sensor: *mut MtSensor,
    address: u16,
    value: *mut u16,
) -> c_int {
    if sensor.is_null() || value.is_null() {
        return -1;
    }
    let sensor = &mut *sensor;
    match report(sensor.0.read_register(address)) {
        Ok(v) => {
            value.write(v);
            0
        }
        Err(rc) => rc,
    }
}

/// Debug write of a register in 0x00..=0xFF.
///
/// # Safety
/// `sensor` must be a valid sensor pointer, or null.
#[no_mangle]
pub unsafe extern "C" fn mt_sensor_write_register(sensor: *mut MtSensor, address: u16, value: u16) -> c_int {
    if sensor.is_null() {
        return -1;
    }
    let sensor = &mut *sensor;
    match report(sensor.0.write_register(address, value)) {
        Ok(()) => 0,
        Err(rc) => rc,
    }
}

/// Get the last error message. Returns NULL if the last call succeeded.
/// The returned pointer is valid until the next mt9v022 API call.
#[no_mangle]
pub extern "C" fn mt_last_error() -> *const c_char {
    LAST_ERROR.as_ptr()
}
