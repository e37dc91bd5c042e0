use crate::bus::{self, RegisterBus};
use crate::config::SensorConfig;
use crate::controls::{ControlId, ControlInfo, ControlState};
use crate::error::{
    BusError, ConfigError, ConfigStage, ControlError, FormatError, IdentityError, PowerError,
    RegisterError,
};
use crate::modes::Mode;
use crate::power::{self, NoPowerControl, PowerControl, PowerState};
use crate::registers;
use crate::table::{self, Mismatch, RegisterTable};
use crate::tables::{SensorProfile, MT9V022};
use crate::types::{
    BusConfig, BusFlags, BusType, ChipId, CropCap, CropRect, FrameFormat, FrameSize,
    FrameSizeRange, MediaBusCode,
};

/// The mode most recently written by a successful [`Sensor::configure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMode {
    pub mode: &'static Mode,
    pub size: FrameSize,
    pub code: MediaBusCode,
}

/// Everything the driver remembers about one sensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorState {
    pub power: PowerState,
    /// Cleared on power-off and on any failed configuration.
    pub applied: Option<AppliedMode>,
    /// Survives power cycles.
    pub controls: ControlState,
}

impl SensorState {
    pub fn identity_verified(&self) -> bool {
        self.power.is_ready()
    }
}

/// One MT9V022 on a register bus.
///
/// Owns the bus and the board's power/reset lines and serializes every
/// operation through `&mut self`. Wrap it in a
/// [`SensorWorker`](crate::SensorWorker) to share it between threads.
pub struct Sensor<B: RegisterBus, P: PowerControl = NoPowerControl> {
    bus: B,
    power: P,
    profile: &'static SensorProfile,
    config: SensorConfig,
    state: SensorState,
}

impl<B: RegisterBus> Sensor<B, NoPowerControl> {
    /// Sensor on an always-powered board, default timings.
    pub fn on_bus(bus: B) -> Self {
        Self::new(bus, NoPowerControl)
    }
}

impl<B: RegisterBus, P: PowerControl> Sensor<B, P> {
    pub fn new(bus: B, power: P) -> Self {
        Self::with_config(bus, power, SensorConfig::default())
    }

    pub fn with_config(bus: B, power: P, config: SensorConfig) -> Self {
        Self::with_profile(bus, power, &MT9V022, config)
    }

    /// Drive a sensor with a different set of register tables.
    pub fn with_profile(
        bus: B,
        power: P,
        profile: &'static SensorProfile,
        config: SensorConfig,
    ) -> Self {
        Self {
            bus,
            power,
            profile,
            config,
            state: SensorState::default(),
        }
    }

    pub fn state(&self) -> &SensorState {
        &self.state
    }

    pub fn profile(&self) -> &'static SensorProfile {
        self.profile
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn power_control(&self) -> &P {
        &self.power
    }

    pub fn into_parts(self) -> (B, P) {
        (self.bus, self.power)
    }

    /// Power the sensor on or off.
    ///
    /// Power-on asserts reset, enables the rails, waits, releases reset,
    /// verifies the chip id, soft-resets the sensor and rewrites the stored
    /// controls. Powering on a sensor that is already ready does nothing.
    /// Power-off always succeeds; controls are kept, the applied mode is not.
    pub fn power(&mut self, on: bool) -> Result<(), PowerError> {
        if on {
            self.power_on()
        } else {
            self.power_off();
            Ok(())
        }
    }

    fn power_on(&mut self) -> Result<(), PowerError> {
        if let PowerState::Ready(chip) = self.state.power {
            log::debug!("Sensor already powered (0x{:04x})", chip.raw());
            return Ok(());
        }

        self.transition(PowerState::Powering);
        self.state.applied = None;
        self.power.assert_reset();
        self.power.set_power(true);
        std::thread::sleep(self.config.power_settle);
        self.power.release_reset();
        std::thread::sleep(self.config.reset_settle);

        self.transition(PowerState::IdentityCheck);
        let chip = match power::identify(&mut self.bus) {
            Ok(chip) => chip,
            Err(e) => {
                self.transition(PowerState::Failed);
                return Err(e.into());
            }
        };
        self.transition(PowerState::Ready(chip));

        if let Err(e) = power::soft_reset(&mut self.bus) {
            log::warn!("Soft reset failed: {}", e);
            self.transition(PowerState::Failed);
            return Err(PowerError::Reset(e));
        }

        let profile = self.profile;
        if let Err(e) = self.state.controls.resync(&mut self.bus, profile) {
            log::warn!("Restoring controls after power-on failed: {}", e);
            self.transition(PowerState::Failed);
            return Err(PowerError::Resync(e));
        }

        log::info!("Sensor ready: chip ID 0x{:04x}", chip.raw());
        Ok(())
    }

    fn power_off(&mut self) {
        self.power.set_power(false);
        self.state.applied = None;
        self.transition(PowerState::Off);
    }

    fn transition(&mut self, next: PowerState) {
        if self.state.power != next {
            log::debug!("Power state {} -> {}", self.state.power, next);
        }
        self.state.power = next;
    }

    /// Re-read the chip version register of a ready sensor.
    ///
    /// A mismatch marks the sensor failed.
    pub fn probe_identity(&mut self) -> Result<ChipId, IdentityError> {
        if !self.state.power.is_ready() {
            return Err(IdentityError::NotReady);
        }
        match power::identify(&mut self.bus) {
            Ok(chip) => {
                self.state.power = PowerState::Ready(chip);
                Ok(chip)
            }
            Err(e) => {
                self.state.applied = None;
                self.transition(PowerState::Failed);
                Err(e)
            }
        }
    }

    /// Power on, identify, power off again.
    pub fn detect(&mut self) -> Result<ChipId, PowerError> {
        let result = self.power(true).map(|()| self.state.power.chip());
        self.power_off();
        match result? {
            Some(chip) => Ok(chip),
            None => Err(IdentityError::NotReady.into()),
        }
    }

    /// Write init, white balance, effect and mode tables, in that order.
    ///
    /// The request resolves to the first mode that fits inside it, or the
    /// default mode; the returned [`AppliedMode`] carries the effective size.
    /// The first failing write aborts and clears the applied mode. The stored
    /// white balance and effect are the ones written; flips end up cleared
    /// because the init table rewrites READ_MODE.
    pub fn configure(&mut self, width: u32, height: u32) -> Result<AppliedMode, ConfigError> {
        if !self.state.power.is_ready() {
            return Err(ConfigError::NotReady);
        }

        let profile = self.profile;
        let mode = profile.modes.resolve(FrameSize::new(width, height));
        let controls = self.state.controls;
        self.state.applied = None;

        let stages: [(ConfigStage, &RegisterTable); 4] = [
            (ConfigStage::Init, &profile.init),
            (
                ConfigStage::WhiteBalance,
                profile.white_balance_table(controls.white_balance),
            ),
            (ConfigStage::Effect, profile.effect_table(controls.effect)),
            (ConfigStage::Mode, &mode.table),
        ];
        for (stage, table) in stages {
            table::apply(&mut self.bus, table).map_err(|source| {
                log::warn!("Configuration failed in {} stage: {}", stage, source);
                ConfigError::Stage {
                    stage,
                    table: table.name(),
                    source,
                }
            })?;
        }

        let applied = AppliedMode {
            mode,
            size: mode.size,
            code: profile.default_code(),
        };
        self.state.controls.clear_flips();
        self.state.applied = Some(applied);
        log::info!(
            "Applied mode {} ({}x{}) for request {}x{}",
            mode.label,
            mode.size.width,
            mode.size.height,
            width,
            height
        );
        Ok(applied)
    }

    /// The format `configure(width, height)` would produce. No bus access.
    pub fn try_format(&self, width: u32, height: u32) -> FrameFormat {
        let mode = self.profile.modes.resolve(FrameSize::new(width, height));
        FrameFormat {
            size: mode.size,
            code: self.profile.default_code(),
        }
    }

    /// The applied format, or the default mode's before any configuration.
    pub fn format(&self) -> FrameFormat {
        match self.state.applied {
            Some(applied) => FrameFormat {
                size: applied.size,
                code: applied.code,
            },
            None => FrameFormat {
                size: self.profile.modes.default_mode().size,
                code: self.profile.default_code(),
            },
        }
    }

    pub fn enum_mbus_code(&self, index: u32) -> Result<MediaBusCode, FormatError> {
        self.profile
            .codes
            .get(index as usize)
            .copied()
            .ok_or(FormatError::InvalidIndex(index))
    }

    /// Frame size `index` for pixel code `code`.
    pub fn enum_frame_size(&self, index: u32, code: u32) -> Result<FrameSizeRange, FormatError> {
        let code = MediaBusCode::from_raw(code)
            .filter(|c| self.profile.codes.contains(c))
            .ok_or(FormatError::UnsupportedCode(code))?;
        let mode = self
            .profile
            .modes
            .get(index as usize)
            .ok_or(FormatError::InvalidIndex(index))?;
        Ok(FrameSizeRange {
            code,
            min: mode.size,
            max: mode.size,
        })
    }

    pub fn crop_cap(&self) -> CropCap {
        let rect = default_crop();
        CropCap {
            bounds: rect,
            default_rect: rect,
            pixel_aspect: (1, 1),
        }
    }

    /// Cropping is fixed to the full default window.
    pub fn crop(&self) -> CropRect {
        default_crop()
    }

    pub fn bus_config(&self) -> BusConfig {
        BusConfig {
            bus_type: BusType::Parallel,
            flags: BusFlags::PCLK_SAMPLE_FALLING
                | BusFlags::MASTER
                | BusFlags::VSYNC_ACTIVE_LOW
                | BusFlags::HSYNC_ACTIVE_HIGH
                | BusFlags::DATA_ACTIVE_HIGH,
        }
    }

    /// Last committed value. Works in any power state.
    pub fn get_control(&self, id: u32) -> Result<i64, ControlError> {
        let id = ControlId::from_raw(id).ok_or(ControlError::UnknownControl(id))?;
        Ok(self.control(id))
    }

    pub fn control(&self, id: ControlId) -> i64 {
        self.state.controls.get(id)
    }

    /// Validate, write and commit one control. Needs a ready sensor.
    pub fn set_control(&mut self, id: u32, value: i64) -> Result<(), ControlError> {
        let id = ControlId::from_raw(id).ok_or(ControlError::UnknownControl(id))?;
        if !self.state.power.is_ready() {
            return Err(ControlError::NotReady);
        }
        let profile = self.profile;
        self.state
            .controls
            .set(&mut self.bus, profile, id, value)
            .inspect_err(|e| log::warn!("Setting {} to {} failed: {}", id, value, e))?;
        log::debug!("{} = {}", id, value);
        Ok(())
    }

    pub fn query_control(&self, id: u32) -> Result<ControlInfo, ControlError> {
        ControlId::from_raw(id)
            .map(ControlId::info)
            .ok_or(ControlError::UnknownControl(id))
    }

    pub fn query_menu(&self, id: u32, index: i64) -> Result<&'static str, ControlError> {
        ControlId::from_raw(id)
            .ok_or(ControlError::UnknownControl(id))?
            .menu_name(index)
    }

    pub fn read_register(&mut self, address: u16) -> Result<u16, RegisterError> {
        check_register(address)?;
        Ok(bus::read_reg(&mut self.bus, address)?)
    }

    /// Raw write; bypasses the control state.
    pub fn write_register(&mut self, address: u16, value: u16) -> Result<(), RegisterError> {
        check_register(address)?;
        Ok(bus::write_reg(&mut self.bus, address, value)?)
    }

    /// Compare the sensor's registers against `table`.
    pub fn verify_table(&mut self, table: &RegisterTable) -> Result<Vec<Mismatch>, BusError> {
        let mismatches = table::verify(&mut self.bus, table)?;
        for m in &mismatches {
            log::warn!(
                "{}: register 0x{:04x} reads 0x{:04x}, expected 0x{:04x}",
                table.name(),
                m.address,
                m.actual,
                m.expected
            );
        }
        Ok(mismatches)
    }

    /// [`verify_table`](Self::verify_table) against the init table.
    pub fn verify_init(&mut self) -> Result<Vec<Mismatch>, BusError> {
        let profile = self.profile;
        self.verify_table(&profile.init)
    }
}

fn check_register(address: u16) -> Result<(), RegisterError> {
    if address > registers::MAX_REGISTER {
        return Err(RegisterError::AddressOutOfRange(address));
    }
    Ok(())
}

fn default_crop() -> CropRect {
    CropRect {
        left: 0,
        top: 0,
        width: registers::DEFAULT_WIDTH,
        height: registers::DEFAULT_HEIGHT,
    }
}
