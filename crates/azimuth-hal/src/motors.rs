//! Motor backend for one swerve module.
//!
//! A [`ModuleMotors`] value owns the drive/steer controller pair of a single
//! corner. It is built unbound and must be bound to device ids exactly once
//! with [`ModuleMotors::configure`]; every accessor before that point returns
//! [`AzimuthError::NotConfigured`], and a second bind returns
//! [`AzimuthError::AlreadyConfigured`].
//!
//! Whether the backend talks to hardware or to an in-memory image is decided
//! by the [`Attachment`] chosen at construction, not per call. Detached
//! backends store commanded voltages and positions and read them back, so a
//! control loop runs unchanged on the bench; only the stator-current
//! accessors give up and report 0.0 without hardware.

use std::rc::Rc;

use azimuth_types::{AzimuthError, BusId, NeutralMode};
use tracing::debug;

use crate::bus::Attachment;
use crate::motor::MotorSpec;
use crate::vendor::{HardwareProfile, VendorPair};

/// Last commanded state, stood in for the controllers when detached.
#[derive(Debug, Default)]
struct MotorImage {
    drive_voltage: f64,
    steer_voltage: f64,
    drive_rotations: f64,
}

enum Io {
    Hardware(VendorPair),
    Detached(MotorImage),
}

/// Drive and steer motor pair of one module corner.
pub struct ModuleMotors {
    profile: HardwareProfile,
    attachment: Attachment,
    io: Option<Io>,
}

impl ModuleMotors {
    /// An unbound backend. Call [`configure`][Self::configure] before use.
    pub fn new(profile: HardwareProfile, attachment: Attachment) -> Self {
        Self {
            profile,
            attachment,
            io: None,
        }
    }

    /// Bind the backend to its two device ids.
    ///
    /// On an attached backend this constructs the vendor pair and pushes any
    /// bind-time device configuration; detached backends start from an
    /// all-zero image.
    ///
    /// # Errors
    ///
    /// [`AzimuthError::AlreadyConfigured`] if called twice, and any
    /// [`AzimuthError::HardwareFault`] raised while pushing configuration.
    pub fn configure(&mut self, drive: BusId, steer: BusId) -> Result<(), AzimuthError> {
        if self.io.is_some() {
            return Err(AzimuthError::AlreadyConfigured);
        }
        let io = match &self.attachment {
            Attachment::Can(handle) => {
                Io::Hardware(self.profile.pair(Rc::clone(handle), drive, steer)?)
            }
            Attachment::Detached => {
                debug!(%drive, %steer, "no hardware attached; motors run against an image");
                Io::Detached(MotorImage::default())
            }
        };
        self.io = Some(io);
        Ok(())
    }

    fn io(&mut self) -> Result<&mut Io, AzimuthError> {
        self.io.as_mut().ok_or(AzimuthError::NotConfigured)
    }

    /// Whether this backend runs against an image instead of hardware.
    pub fn is_detached(&self) -> bool {
        self.attachment.is_detached()
    }

    /// Characteristic constants of the drive gearbox's motor.
    pub fn drive_motor(&self) -> MotorSpec {
        self.profile.drive_motor()
    }

    /// Characteristic constants of the steer gearbox's motor.
    pub fn steer_motor(&self) -> MotorSpec {
        self.profile.steer_motor()
    }

    /// Let the drive motor spin freely when idle. Safe to repeat.
    pub fn enable_coast(&mut self) -> Result<(), AzimuthError> {
        self.apply_neutral_mode(NeutralMode::Coast)
    }

    /// Short the drive motor windings when idle. Safe to repeat.
    pub fn enable_brake(&mut self) -> Result<(), AzimuthError> {
        self.apply_neutral_mode(NeutralMode::Brake)
    }

    fn apply_neutral_mode(&mut self, mode: NeutralMode) -> Result<(), AzimuthError> {
        match self.io()? {
            Io::Hardware(pair) => pair.io().apply_neutral_mode(mode),
            Io::Detached(_) => Ok(()),
        }
    }

    /// Drive motor shaft position, rotations before any gear reduction.
    pub fn drive_rotations(&mut self) -> Result<f64, AzimuthError> {
        match self.io()? {
            Io::Hardware(pair) => pair.io().drive_rotations(),
            Io::Detached(image) => Ok(image.drive_rotations),
        }
    }

    /// Overwrite the drive position register, e.g. from a simulation model.
    pub fn set_drive_rotations(&mut self, rotations: f64) -> Result<(), AzimuthError> {
        match self.io()? {
            Io::Hardware(pair) => pair.io().set_drive_rotations(rotations),
            Io::Detached(image) => {
                image.drive_rotations = rotations;
                Ok(())
            }
        }
    }

    /// Zero the drive position register.
    pub fn reset_drive_rotations(&mut self) -> Result<(), AzimuthError> {
        self.set_drive_rotations(0.0)
    }

    /// Voltage currently applied to the drive motor.
    pub fn drive_voltage(&mut self) -> Result<f64, AzimuthError> {
        match self.io()? {
            Io::Hardware(pair) => pair.io().drive_voltage(),
            Io::Detached(image) => Ok(image.drive_voltage),
        }
    }

    /// Command an open-loop drive voltage.
    pub fn set_drive_voltage(&mut self, volts: f64) -> Result<(), AzimuthError> {
        match self.io()? {
            Io::Hardware(pair) => pair.io().set_drive_voltage(volts),
            Io::Detached(image) => {
                image.drive_voltage = volts;
                Ok(())
            }
        }
    }

    /// Voltage currently applied to the steer motor.
    pub fn steer_voltage(&mut self) -> Result<f64, AzimuthError> {
        match self.io()? {
            Io::Hardware(pair) => pair.io().steer_voltage(),
            Io::Detached(image) => Ok(image.steer_voltage),
        }
    }

    /// Command an open-loop steer voltage.
    pub fn set_steer_voltage(&mut self, volts: f64) -> Result<(), AzimuthError> {
        match self.io()? {
            Io::Hardware(pair) => pair.io().set_steer_voltage(volts),
            Io::Detached(image) => {
                image.steer_voltage = volts;
                Ok(())
            }
        }
    }

    /// Drive stator current. Reads 0.0 when detached; only hardware measures
    /// current.
    pub fn drive_current(&mut self) -> Result<f64, AzimuthError> {
        match self.io()? {
            Io::Hardware(pair) => pair.io().drive_current(),
            Io::Detached(_) => Ok(0.0),
        }
    }

    /// Steer stator current. Reads 0.0 when detached.
    pub fn steer_current(&mut self) -> Result<f64, AzimuthError> {
        match self.io()? {
            Io::Hardware(pair) => pair.io().steer_current(),
            Io::Detached(_) => Ok(0.0),
        }
    }
}
