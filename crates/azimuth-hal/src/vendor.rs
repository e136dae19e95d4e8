//! Register conventions of the supported motor-controller families.
//!
//! Two families are fielded: TalonFX (CTRE, driving Kraken X60 motors) and
//! SparkMax (REV, driving NEOs). Both are expressed against the
//! [`DeviceBus`][crate::bus::DeviceBus] seam, but they differ in which
//! registers carry a reading (a TalonFX reports output voltage directly,
//! a SparkMax reports duty cycle and bus voltage separately) and in what
//! configuration gets pushed at bind time.
//!
//! The set of families is closed: construction goes through
//! [`HardwareProfile`], and [`VendorPair`] enumerates every implementation.

use azimuth_types::{AzimuthError, BusId, NeutralMode};
use tracing::debug;

use crate::bus::{BusHandle, NEUTRAL_BRAKE, NEUTRAL_COAST, Register};
use crate::motor::MotorSpec;

// ────────────────────────────────────────────────────────────────────────────
// Contract
// ────────────────────────────────────────────────────────────────────────────

/// Hardware-path operations on one bound drive/steer controller pair.
///
/// Implementations translate each operation into that family's register
/// traffic. They never hold fallback state; a pair only exists when physical
/// hardware is attached.
///
/// # Errors
///
/// Every method propagates [`AzimuthError::HardwareFault`] from the bus
/// unmodified.
pub trait VendorIo {
    /// Switch the DRIVE controller's neutral behavior. The steer controller
    /// keeps its bind-time setting.
    fn apply_neutral_mode(&mut self, mode: NeutralMode) -> Result<(), AzimuthError>;

    /// Drive motor shaft position, rotations.
    fn drive_rotations(&mut self) -> Result<f64, AzimuthError>;

    /// Overwrite the drive motor's position register.
    fn set_drive_rotations(&mut self, rotations: f64) -> Result<(), AzimuthError>;

    /// Voltage currently applied to the drive motor.
    fn drive_voltage(&mut self) -> Result<f64, AzimuthError>;

    /// Command an open-loop drive output voltage.
    fn set_drive_voltage(&mut self, volts: f64) -> Result<(), AzimuthError>;

    /// Voltage currently applied to the steer motor.
    fn steer_voltage(&mut self) -> Result<f64, AzimuthError>;

    /// Command an open-loop steer output voltage.
    fn set_steer_voltage(&mut self, volts: f64) -> Result<(), AzimuthError>;

    /// Instantaneous drive stator current, amps.
    fn drive_current(&mut self) -> Result<f64, AzimuthError>;

    /// Instantaneous steer stator current, amps.
    fn steer_current(&mut self) -> Result<f64, AzimuthError>;
}

fn neutral_code(mode: NeutralMode) -> f64 {
    match mode {
        NeutralMode::Coast => NEUTRAL_COAST,
        NeutralMode::Brake => NEUTRAL_BRAKE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// TalonFX family
// ────────────────────────────────────────────────────────────────────────────

/// A bound TalonFX drive/steer pair.
///
/// Binding pushes the drivetrain's device configuration to both controllers:
/// brake neutral, current limits sized against brownout on the drive side and
/// gearbox wear on the steer side, and a 0.1 s voltage ramp on both loops.
pub struct TalonFxPair {
    bus: BusHandle,
    drive: BusId,
    steer: BusId,
}

impl TalonFxPair {
    const RAMP_PERIOD_S: f64 = 0.1;
    const DRIVE_SUPPLY_LIMIT_A: f64 = 45.0;
    const DRIVE_STATOR_LIMIT_A: f64 = 80.0;
    const STEER_SUPPLY_LIMIT_A: f64 = 75.0;
    const STEER_STATOR_LIMIT_A: f64 = 60.0;

    /// Bind both controllers and push the device configuration.
    pub fn new(bus: BusHandle, drive: BusId, steer: BusId) -> Result<Self, AzimuthError> {
        let pair = Self { bus, drive, steer };
        pair.push_config(drive, Self::DRIVE_SUPPLY_LIMIT_A, Self::DRIVE_STATOR_LIMIT_A)?;
        pair.push_config(steer, Self::STEER_SUPPLY_LIMIT_A, Self::STEER_STATOR_LIMIT_A)?;
        debug!(%drive, %steer, "TalonFX pair configured");
        Ok(pair)
    }

    fn push_config(
        &self,
        device: BusId,
        supply_limit: f64,
        stator_limit: f64,
    ) -> Result<(), AzimuthError> {
        let mut bus = self.bus.borrow_mut();
        bus.write(device, Register::NeutralMode, NEUTRAL_BRAKE)?;
        bus.write(device, Register::SupplyCurrentLimit, supply_limit)?;
        bus.write(device, Register::StatorCurrentLimit, stator_limit)?;
        bus.write(device, Register::OpenLoopRampPeriod, Self::RAMP_PERIOD_S)?;
        bus.write(device, Register::ClosedLoopRampPeriod, Self::RAMP_PERIOD_S)?;
        Ok(())
    }
}

impl VendorIo for TalonFxPair {
    fn apply_neutral_mode(&mut self, mode: NeutralMode) -> Result<(), AzimuthError> {
        self.bus
            .borrow_mut()
            .write(self.drive, Register::NeutralMode, neutral_code(mode))
    }

    fn drive_rotations(&mut self) -> Result<f64, AzimuthError> {
        self.bus.borrow_mut().read(self.drive, Register::Position)
    }

    fn set_drive_rotations(&mut self, rotations: f64) -> Result<(), AzimuthError> {
        self.bus
            .borrow_mut()
            .write(self.drive, Register::Position, rotations)
    }

    fn drive_voltage(&mut self) -> Result<f64, AzimuthError> {
        self.bus
            .borrow_mut()
            .read(self.drive, Register::OutputVoltage)
    }

    fn set_drive_voltage(&mut self, volts: f64) -> Result<(), AzimuthError> {
        self.bus
            .borrow_mut()
            .write(self.drive, Register::OutputVoltage, volts)
    }

    fn steer_voltage(&mut self) -> Result<f64, AzimuthError> {
        self.bus
            .borrow_mut()
            .read(self.steer, Register::OutputVoltage)
    }

    fn set_steer_voltage(&mut self, volts: f64) -> Result<(), AzimuthError> {
        self.bus
            .borrow_mut()
            .write(self.steer, Register::OutputVoltage, volts)
    }

    fn drive_current(&mut self) -> Result<f64, AzimuthError> {
        self.bus
            .borrow_mut()
            .read(self.drive, Register::StatorCurrent)
    }

    fn steer_current(&mut self) -> Result<f64, AzimuthError> {
        self.bus
            .borrow_mut()
            .read(self.steer, Register::StatorCurrent)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SparkMax family
// ────────────────────────────────────────────────────────────────────────────

/// A bound SparkMax drive/steer pair.
///
/// Binding carries no configuration push; the controllers run their stored
/// settings. Applied voltage is not a register on this family and is
/// reconstructed as duty cycle times bus voltage.
pub struct SparkMaxPair {
    bus: BusHandle,
    drive: BusId,
    steer: BusId,
}

impl SparkMaxPair {
    /// Bind both controllers.
    pub fn new(bus: BusHandle, drive: BusId, steer: BusId) -> Self {
        debug!(%drive, %steer, "SparkMax pair configured");
        Self { bus, drive, steer }
    }

    fn output_voltage(&mut self, device: BusId) -> Result<f64, AzimuthError> {
        let duty = self.bus.borrow_mut().read(device, Register::AppliedOutput)?;
        let bus_voltage = self.bus.borrow_mut().read(device, Register::BusVoltage)?;
        Ok(duty * bus_voltage)
    }
}

impl VendorIo for SparkMaxPair {
    fn apply_neutral_mode(&mut self, mode: NeutralMode) -> Result<(), AzimuthError> {
        self.bus
            .borrow_mut()
            .write(self.drive, Register::NeutralMode, neutral_code(mode))
    }

    fn drive_rotations(&mut self) -> Result<f64, AzimuthError> {
        self.bus.borrow_mut().read(self.drive, Register::Position)
    }

    fn set_drive_rotations(&mut self, rotations: f64) -> Result<(), AzimuthError> {
        self.bus
            .borrow_mut()
            .write(self.drive, Register::Position, rotations)
    }

    fn drive_voltage(&mut self) -> Result<f64, AzimuthError> {
        self.output_voltage(self.drive)
    }

    fn set_drive_voltage(&mut self, volts: f64) -> Result<(), AzimuthError> {
        self.bus
            .borrow_mut()
            .write(self.drive, Register::OutputVoltage, volts)
    }

    fn steer_voltage(&mut self) -> Result<f64, AzimuthError> {
        self.output_voltage(self.steer)
    }

    fn set_steer_voltage(&mut self, volts: f64) -> Result<(), AzimuthError> {
        self.bus
            .borrow_mut()
            .write(self.steer, Register::OutputVoltage, volts)
    }

    fn drive_current(&mut self) -> Result<f64, AzimuthError> {
        self.bus
            .borrow_mut()
            .read(self.drive, Register::OutputCurrent)
    }

    fn steer_current(&mut self) -> Result<f64, AzimuthError> {
        self.bus
            .borrow_mut()
            .read(self.steer, Register::OutputCurrent)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Closed selection
// ────────────────────────────────────────────────────────────────────────────

/// Every vendor implementation the drivetrain can be built with.
pub enum VendorPair {
    TalonFx(TalonFxPair),
    SparkMax(SparkMaxPair),
}

impl VendorPair {
    pub(crate) fn io(&mut self) -> &mut dyn VendorIo {
        match self {
            VendorPair::TalonFx(pair) => pair,
            VendorPair::SparkMax(pair) => pair,
        }
    }
}

/// Which controller family a chassis carries. Two chassis may share one
/// profile; the profile owns the family's motor constants and constructs its
/// [`VendorPair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardwareProfile {
    TalonFx,
    SparkMax,
}

impl HardwareProfile {
    /// Characteristic constants of the drive motor on this profile.
    pub fn drive_motor(self) -> MotorSpec {
        match self {
            HardwareProfile::TalonFx => MotorSpec::kraken_x60(1),
            HardwareProfile::SparkMax => MotorSpec::neo(1),
        }
    }

    /// Characteristic constants of the steer motor on this profile.
    pub fn steer_motor(self) -> MotorSpec {
        match self {
            HardwareProfile::TalonFx => MotorSpec::kraken_x60(1),
            HardwareProfile::SparkMax => MotorSpec::neo(1),
        }
    }

    pub(crate) fn pair(
        self,
        bus: BusHandle,
        drive: BusId,
        steer: BusId,
    ) -> Result<VendorPair, AzimuthError> {
        match self {
            HardwareProfile::TalonFx => {
                Ok(VendorPair::TalonFx(TalonFxPair::new(bus, drive, steer)?))
            }
            HardwareProfile::SparkMax => {
                Ok(VendorPair::SparkMax(SparkMaxPair::new(bus, drive, steer)))
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
