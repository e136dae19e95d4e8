//! One corner of the drivetrain, closed-loop.
//!
//! A [`SwerveModule`] owns the three devices of one corner and runs the
//! per-tick control law: the drive motor is driven open-loop with the
//! commanded voltage, and the steer motor runs a PID on the absolute
//! heading with continuous input over `[0, 360)`, so the wheel always takes
//! the short arc to a new heading.
//!
//! By fleet convention the `speed` field of a commanded [`ModuleState`]
//! carries volts, not meters per second; the kinematics layer upstream
//! scales stick input straight into the calibrated drive voltages.
//!
//! A module built detached carries a first-order model per motor and
//! advances it one fixed period per command tick, writing modeled rotations
//! back into the same registers the hardware would update. Callers cannot
//! tell the two apart except through the stator-current accessors.

use std::sync::Arc;

use azimuth_hal::bus::Attachment;
use azimuth_hal::encoder::AngleEncoder;
use azimuth_hal::motors::ModuleMotors;
use azimuth_hal::pid::PidController;
use azimuth_hal::sim::MotorSim;
use azimuth_types::{
    AzimuthError, ChassisId, ModulePosition, ModuleSlot, ModuleState, NeutralMode,
};
use tracing::{debug, warn};

use crate::calibration::{CalibrationBundle, Tuning};
use crate::layout::ModuleAddresses;
use crate::selector::ChassisSelector;

/// Fixed robot loop period, seconds.
pub const CONTROL_PERIOD_S: f64 = 0.02;

struct ModuleSim {
    drive: MotorSim,
    steer: MotorSim,
}

/// One independently steered drivetrain corner.
pub struct SwerveModule {
    slot: ModuleSlot,
    motors: ModuleMotors,
    encoder: AngleEncoder,
    steer_pid: PidController,
    calibration: Arc<CalibrationBundle>,
    sim: Option<ModuleSim>,
}

impl SwerveModule {
    /// Build and bind one corner of a chassis.
    ///
    /// `addresses` names the corner's three devices; a stock chassis takes
    /// them from the fleet wiring table
    /// ([`module_addresses`][crate::layout::module_addresses]). Detached
    /// modules get a motor model per gearbox in place of hardware.
    ///
    /// # Errors
    ///
    /// Propagates bind-time faults from the underlying backend.
    pub fn new(
        chassis: ChassisId,
        slot: ModuleSlot,
        addresses: ModuleAddresses,
        selector: &ChassisSelector,
        tuning: &Tuning,
        attachment: Attachment,
    ) -> Result<Self, AzimuthError> {
        let calibration = selector.calibration(chassis);

        let encoder = AngleEncoder::new(addresses.encoder, &attachment);
        let mut motors = selector.module_motors(chassis, attachment);
        motors.configure(addresses.drive, addresses.steer)?;

        let gains = tuning.steer_gains;
        let mut steer_pid = PidController::new(gains.kp, gains.ki, gains.kd, CONTROL_PERIOD_S);
        steer_pid.enable_continuous_input(0.0, 360.0);

        let sim = motors.is_detached().then(|| ModuleSim {
            drive: MotorSim::for_motor(&motors.drive_motor(), tuning.motor_time_constant_s),
            steer: MotorSim::for_motor(&motors.steer_motor(), tuning.motor_time_constant_s),
        });

        debug!(?chassis, ?slot, detached = sim.is_some(), "swerve module bound");

        Ok(Self {
            slot,
            motors,
            encoder,
            steer_pid,
            calibration,
            sim,
        })
    }

    /// Which corner this module occupies.
    pub fn slot(&self) -> ModuleSlot {
        self.slot
    }

    /// Whether this module runs against motor models instead of hardware.
    pub fn is_detached(&self) -> bool {
        self.sim.is_some()
    }

    /// Absolute steering heading, degrees in `[0, 360)`.
    pub fn module_angle(&self) -> Result<f64, AzimuthError> {
        self.encoder.angle_degrees()
    }

    /// Odometry sample: ground distance traveled and current heading.
    pub fn module_position(&mut self) -> Result<ModulePosition, AzimuthError> {
        let rotations = self.motors.drive_rotations()?;
        Ok(ModulePosition {
            distance_meters: rotations * self.calibration.meters_per_drive_rotation(),
            angle_degrees: self.encoder.angle_degrees()?,
        })
    }

    /// Currently applied drive voltage and heading.
    pub fn module_state(&mut self) -> Result<ModuleState, AzimuthError> {
        Ok(ModuleState {
            speed: self.motors.drive_voltage()?,
            angle_degrees: self.encoder.angle_degrees()?,
        })
    }

    /// Run one control tick toward `target`.
    ///
    /// Applies the commanded drive voltage open-loop, steps the steering
    /// loop against the measured heading, and on a detached module advances
    /// the motor models by one period.
    pub fn set_module_state(&mut self, target: ModuleState) -> Result<(), AzimuthError> {
        self.motors.set_drive_voltage(target.speed)?;

        let measured = self.encoder.angle_degrees()?;
        let steer_volts = self.steer_pid.calculate(measured, target.angle_degrees);
        self.motors.set_steer_voltage(steer_volts)?;

        self.advance_sim()
    }

    /// Zero the odometry distance. Heading is absolute and unaffected.
    pub fn reset_drive_encoder(&mut self) -> Result<(), AzimuthError> {
        self.motors.reset_drive_rotations()
    }

    /// Switch the drive motor's idle behavior.
    pub fn set_neutral_mode(&mut self, mode: NeutralMode) -> Result<(), AzimuthError> {
        match mode {
            NeutralMode::Coast => self.motors.enable_coast(),
            NeutralMode::Brake => self.motors.enable_brake(),
        }
    }

    /// Voltage currently applied to the drive motor.
    pub fn drive_voltage(&mut self) -> Result<f64, AzimuthError> {
        self.motors.drive_voltage()
    }

    /// Voltage currently applied to the steer motor.
    pub fn steer_voltage(&mut self) -> Result<f64, AzimuthError> {
        self.motors.steer_voltage()
    }

    /// Drive stator current, amps. Zero when detached.
    pub fn drive_current(&mut self) -> Result<f64, AzimuthError> {
        self.motors.drive_current()
    }

    /// Steer stator current, amps. Zero when detached.
    pub fn steer_current(&mut self) -> Result<f64, AzimuthError> {
        self.motors.steer_current()
    }

    fn advance_sim(&mut self) -> Result<(), AzimuthError> {
        let Some(sim) = &mut self.sim else {
            return Ok(());
        };

        let drive_volts = self.motors.drive_voltage()?;
        let steer_volts = self.motors.steer_voltage()?;
        sim.drive.step(drive_volts, CONTROL_PERIOD_S);
        sim.steer.step(steer_volts, CONTROL_PERIOD_S);

        self.motors.set_drive_rotations(sim.drive.position_rotations())?;

        // The angle sensor sits past the steering reduction.
        let ratio = self.calibration.steer_gear_ratio();
        if let Some(image) = self.encoder.image_mut() {
            image.set_raw_rotations(sim.steer.position_rotations() / ratio);
            image.set_velocity_rps(sim.steer.velocity_rps() / ratio);
        }
        Ok(())
    }
}

impl Drop for SwerveModule {
    fn drop(&mut self) {
        let drive = self.motors.set_drive_voltage(0.0);
        let steer = self.motors.set_steer_voltage(0.0);
        if drive.is_err() || steer.is_err() {
            warn!(slot = ?self.slot, "could not zero module outputs on drop");
        }
    }
}
