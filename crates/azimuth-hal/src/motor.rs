//! Static DC-motor characteristic constants.
//!
//! A [`MotorSpec`] describes a motor the way its datasheet does: stall and
//! free-running figures at nominal voltage. The physics models in
//! [`sim`][crate::sim] are built from these constants, so a simulated module
//! converges to the free speed the real motor would reach.

use std::f64::consts::TAU;

/// Characteristic constants of one motor (or several ganged on one shaft).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorSpec {
    /// Voltage the datasheet figures are quoted at, volts.
    pub nominal_voltage: f64,
    /// Torque at stall, newton-meters.
    pub stall_torque_nm: f64,
    /// Current draw at stall, amps.
    pub stall_current_amps: f64,
    /// Current draw spinning free, amps.
    pub free_current_amps: f64,
    /// No-load speed at nominal voltage, radians per second.
    pub free_speed_rad_per_s: f64,
    /// Motors ganged on the shaft.
    pub count: u32,
}

impl MotorSpec {
    /// Build a spec from datasheet figures, free speed given in RPM.
    ///
    /// Torque and current figures scale with `count`; free speed does not.
    pub fn from_datasheet(
        nominal_voltage: f64,
        stall_torque_nm: f64,
        stall_current_amps: f64,
        free_current_amps: f64,
        free_speed_rpm: f64,
        count: u32,
    ) -> Self {
        let n = f64::from(count);
        Self {
            nominal_voltage,
            stall_torque_nm: stall_torque_nm * n,
            stall_current_amps: stall_current_amps * n,
            free_current_amps: free_current_amps * n,
            free_speed_rad_per_s: free_speed_rpm * TAU / 60.0,
            count,
        }
    }

    /// Kraken X60: the motor on both axes of the TalonFX-family modules.
    pub fn kraken_x60(count: u32) -> Self {
        Self::from_datasheet(12.0, 7.09, 366.0, 2.0, 6000.0, count)
    }

    /// NEO v1.1: the motor on both axes of the SparkMax-family modules.
    pub fn neo(count: u32) -> Self {
        Self::from_datasheet(12.0, 2.6, 105.0, 1.8, 5676.0, count)
    }

    /// Winding resistance implied by the stall figures, ohms.
    pub fn internal_resistance(&self) -> f64 {
        self.nominal_voltage / self.stall_current_amps
    }

    /// Torque per amp of stator current, newton-meters per amp.
    pub fn torque_constant(&self) -> f64 {
        self.stall_torque_nm / self.stall_current_amps
    }

    /// No-load speed constant: volts per radian-per-second. Steady-state
    /// speed of an unloaded motor is `volts / kv()`.
    pub fn kv(&self) -> f64 {
        self.nominal_voltage / self.free_speed_rad_per_s
    }

    /// No-load speed at nominal voltage, RPM.
    pub fn free_speed_rpm(&self) -> f64 {
        self.free_speed_rad_per_s * 60.0 / TAU
    }
}
