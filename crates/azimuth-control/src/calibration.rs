//! Drivetrain calibration, resolved once at startup.
//!
//! Measured values are authored on a [`CalibrationSheet`], where every field
//! is either a committed number or an explicit [`Calibrated::Pending`] entry
//! holding the reason it has not been measured yet. Resolving a sheet
//! converts it into an immutable [`CalibrationBundle`] and fails loudly on
//! any pending or non-physical field, so a half-calibrated chassis refuses
//! to build instead of driving with placeholder numbers.
//!
//! The [`CalibrationRegistry`] holds one resolved bundle per chassis. It is
//! complete by construction; looking a chassis up cannot fail.

use std::f64::consts::PI;
use std::sync::Arc;

use azimuth_types::{AzimuthError, ChassisId};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Convert a tape-measure value to meters.
pub fn inches_to_meters(inches: f64) -> f64 {
    inches * 0.0254
}

/// A calibration field that has either been measured or is still owed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Calibrated<T> {
    /// A committed measurement.
    Value(T),
    /// Not measured yet; `reason` names what is missing.
    Pending { reason: String },
}

impl<T> Calibrated<T> {
    /// An unmeasured field with the reason it is outstanding.
    pub fn pending(reason: impl Into<String>) -> Self {
        Calibrated::Pending {
            reason: reason.into(),
        }
    }

    /// Extract the measurement or fail with the field's name and reason.
    pub fn resolve(self, field: &str) -> Result<T, AzimuthError> {
        match self {
            Calibrated::Value(value) => Ok(value),
            Calibrated::Pending { reason } => Err(AzimuthError::IncompleteCalibration {
                field: field.to_string(),
                reason,
            }),
        }
    }
}

/// Authoring surface for one chassis' drivetrain measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSheet {
    /// Ceiling for the drive motors in teleop.
    pub teleop_drive_voltage: Calibrated<f64>,
    /// Ceiling for the steer motors in teleop.
    pub teleop_steer_voltage: Calibrated<f64>,
    /// Motor rotations per wheel rotation.
    pub drive_gear_ratio: Calibrated<f64>,
    /// Motor rotations per steering rotation.
    pub steer_gear_ratio: Calibrated<f64>,
    /// Wheel diameter, meters.
    pub wheel_diameter_meters: Calibrated<f64>,
}

impl CalibrationSheet {
    /// Measurements taken on the fielded drivetrains.
    pub fn fielded() -> Self {
        Self {
            teleop_drive_voltage: Calibrated::Value(12.0),
            teleop_steer_voltage: Calibrated::Value(7.2),
            drive_gear_ratio: Calibrated::Value(6.75),
            steer_gear_ratio: Calibrated::Value(150.0 / 7.0),
            wheel_diameter_meters: Calibrated::Value(inches_to_meters(4.0)),
        }
    }

    /// Resolve every field into an immutable bundle.
    ///
    /// # Errors
    ///
    /// [`AzimuthError::IncompleteCalibration`] for the first pending field,
    /// or [`AzimuthError::InvalidCalibration`] for a value that is not
    /// strictly positive.
    pub fn resolve(self) -> Result<CalibrationBundle, AzimuthError> {
        CalibrationBundle::new(
            self.teleop_drive_voltage.resolve("teleop_drive_voltage")?,
            self.teleop_steer_voltage
                .resolve("teleop_steer_voltage")?,
            self.drive_gear_ratio.resolve("drive_gear_ratio")?,
            self.steer_gear_ratio.resolve("steer_gear_ratio")?,
            self.wheel_diameter_meters.resolve("wheel_diameter_meters")?,
        )
    }
}

/// Fully resolved drivetrain calibration. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationBundle {
    teleop_drive_voltage: f64,
    teleop_steer_voltage: f64,
    drive_gear_ratio: f64,
    steer_gear_ratio: f64,
    wheel_diameter_meters: f64,
}

impl CalibrationBundle {
    fn new(
        teleop_drive_voltage: f64,
        teleop_steer_voltage: f64,
        drive_gear_ratio: f64,
        steer_gear_ratio: f64,
        wheel_diameter_meters: f64,
    ) -> Result<Self, AzimuthError> {
        Self::positive("teleop_drive_voltage", teleop_drive_voltage)?;
        Self::positive("teleop_steer_voltage", teleop_steer_voltage)?;
        Self::positive("drive_gear_ratio", drive_gear_ratio)?;
        Self::positive("steer_gear_ratio", steer_gear_ratio)?;
        Self::positive("wheel_diameter_meters", wheel_diameter_meters)?;
        Ok(Self {
            teleop_drive_voltage,
            teleop_steer_voltage,
            drive_gear_ratio,
            steer_gear_ratio,
            wheel_diameter_meters,
        })
    }

    fn positive(field: &str, value: f64) -> Result<(), AzimuthError> {
        if value > 0.0 {
            Ok(())
        } else {
            Err(AzimuthError::InvalidCalibration {
                field: field.to_string(),
                value,
            })
        }
    }

    pub fn teleop_drive_voltage(&self) -> f64 {
        self.teleop_drive_voltage
    }

    pub fn teleop_steer_voltage(&self) -> f64 {
        self.teleop_steer_voltage
    }

    pub fn drive_gear_ratio(&self) -> f64 {
        self.drive_gear_ratio
    }

    pub fn steer_gear_ratio(&self) -> f64 {
        self.steer_gear_ratio
    }

    pub fn wheel_diameter_meters(&self) -> f64 {
        self.wheel_diameter_meters
    }

    /// Distance the wheel rim travels per wheel rotation, meters.
    pub fn wheel_circumference_meters(&self) -> f64 {
        self.wheel_diameter_meters * PI
    }

    /// Ground distance per drive motor rotation, meters.
    pub fn meters_per_drive_rotation(&self) -> f64 {
        self.wheel_circumference_meters() / self.drive_gear_ratio
    }
}

/// Steering loop gains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteerGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

/// Authoring surface for controller tuning, gated like the calibration
/// sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningSheet {
    pub steer_gains: Calibrated<SteerGains>,
    /// Mechanical time constant used by the bench motor model, seconds.
    pub motor_time_constant_s: Calibrated<f64>,
}

impl TuningSheet {
    /// Gains tuned on the fielded drivetrains.
    pub fn fielded() -> Self {
        Self {
            steer_gains: Calibrated::Value(SteerGains {
                kp: 0.09,
                ki: 0.0,
                kd: 0.001,
            }),
            motor_time_constant_s: Calibrated::Value(0.075),
        }
    }

    /// Resolve into usable tuning.
    ///
    /// # Errors
    ///
    /// [`AzimuthError::IncompleteCalibration`] for a pending field;
    /// [`AzimuthError::InvalidCalibration`] for a non-positive time
    /// constant.
    pub fn resolve(self) -> Result<Tuning, AzimuthError> {
        let steer_gains = self.steer_gains.resolve("steer_gains")?;
        let motor_time_constant_s = self.motor_time_constant_s.resolve("motor_time_constant_s")?;
        if motor_time_constant_s <= 0.0 {
            return Err(AzimuthError::InvalidCalibration {
                field: "motor_time_constant_s".to_string(),
                value: motor_time_constant_s,
            });
        }
        Ok(Tuning {
            steer_gains,
            motor_time_constant_s,
        })
    }
}

/// Resolved controller tuning, shared by all four modules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub steer_gains: SteerGains,
    pub motor_time_constant_s: f64,
}

/// One resolved calibration bundle per chassis.
pub struct CalibrationRegistry {
    bundles: [Arc<CalibrationBundle>; 3],
}

impl CalibrationRegistry {
    /// Build the registry from the fielded sheets.
    pub fn bootstrap() -> Result<Self, AzimuthError> {
        Self::from_sheets(|_| CalibrationSheet::fielded())
    }

    /// Build the registry from one sheet per chassis. Fails on the first
    /// sheet that does not resolve, so a registry always covers every
    /// chassis.
    pub fn from_sheets(
        mut sheet_for: impl FnMut(ChassisId) -> CalibrationSheet,
    ) -> Result<Self, AzimuthError> {
        let mut resolve = |chassis: ChassisId| -> Result<Arc<CalibrationBundle>, AzimuthError> {
            let bundle = sheet_for(chassis).resolve()?;
            info!(
                ?chassis,
                meters_per_drive_rotation = bundle.meters_per_drive_rotation(),
                "calibration resolved"
            );
            Ok(Arc::new(bundle))
        };
        Ok(Self {
            bundles: [
                resolve(ChassisId::Competition)?,
                resolve(ChassisId::Practice)?,
                resolve(ChassisId::Mule)?,
            ],
        })
    }

    /// The resolved calibration of one chassis.
    pub fn bundle(&self, chassis: ChassisId) -> Arc<CalibrationBundle> {
        Arc::clone(&self.bundles[Self::index(chassis)])
    }

    fn index(chassis: ChassisId) -> usize {
        match chassis {
            ChassisId::Competition => 0,
            ChassisId::Practice => 1,
            ChassisId::Mule => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fielded_sheet_resolves_to_the_measured_values() {
        let bundle = CalibrationSheet::fielded().resolve().unwrap();
        assert_eq!(bundle.teleop_drive_voltage(), 12.0);
        assert_eq!(bundle.teleop_steer_voltage(), 7.2);
        assert_eq!(bundle.drive_gear_ratio(), 6.75);
        assert!((bundle.steer_gear_ratio() - 150.0 / 7.0).abs() < 1e-12);
        assert!((bundle.wheel_diameter_meters() - 0.1016).abs() < 1e-12);
    }

    #[test]
    fn meters_per_drive_rotation_matches_the_drivetrain_geometry() {
        let bundle = CalibrationSheet::fielded().resolve().unwrap();
        let expected = 0.1016 * PI / 6.75;
        assert!((bundle.meters_per_drive_rotation() - expected).abs() < 1e-12);
        // Roughly 4.7 cm of travel per motor rotation.
        assert!((bundle.meters_per_drive_rotation() - 0.0473).abs() < 1e-4);
    }

    #[test]
    fn pending_field_fails_with_its_name_and_reason() {
        let mut sheet = CalibrationSheet::fielded();
        sheet.wheel_diameter_meters = Calibrated::pending("new wheels not yet measured");
        let err = sheet.resolve().unwrap_err();
        assert_eq!(
            err,
            AzimuthError::IncompleteCalibration {
                field: "wheel_diameter_meters".to_string(),
                reason: "new wheels not yet measured".to_string(),
            }
        );
    }

    #[test]
    fn non_positive_measurement_is_rejected() {
        let mut sheet = CalibrationSheet::fielded();
        sheet.drive_gear_ratio = Calibrated::Value(0.0);
        let err = sheet.resolve().unwrap_err();
        assert!(matches!(
            err,
            AzimuthError::InvalidCalibration { field, value: _ } if field == "drive_gear_ratio"
        ));
    }

    #[test]
    fn registry_serves_every_chassis() {
        let registry = CalibrationRegistry::bootstrap().unwrap();
        for chassis in ChassisId::ALL {
            let bundle = registry.bundle(chassis);
            assert!(bundle.meters_per_drive_rotation() > 0.0);
        }
    }

    #[test]
    fn registry_refuses_a_chassis_with_an_unresolved_sheet() {
        let result = CalibrationRegistry::from_sheets(|chassis| {
            let mut sheet = CalibrationSheet::fielded();
            if chassis == ChassisId::Mule {
                sheet.steer_gear_ratio = Calibrated::pending("mule gearboxes being rebuilt");
            }
            sheet
        });
        assert!(matches!(
            result,
            Err(AzimuthError::IncompleteCalibration { ref field, .. }) if field == "steer_gear_ratio"
        ));
    }

    #[test]
    fn sheet_survives_a_serialization_roundtrip() {
        let sheet = CalibrationSheet::fielded();
        let json = serde_json::to_string(&sheet).unwrap();
        let back: CalibrationSheet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sheet);
    }

    #[test]
    fn tuning_sheet_resolves_the_fielded_gains() {
        let tuning = TuningSheet::fielded().resolve().unwrap();
        assert_eq!(tuning.steer_gains.kp, 0.09);
        assert_eq!(tuning.steer_gains.ki, 0.0);
        assert_eq!(tuning.steer_gains.kd, 0.001);
        assert_eq!(tuning.motor_time_constant_s, 0.075);
    }

    #[test]
    fn zero_time_constant_is_rejected() {
        let mut sheet = TuningSheet::fielded();
        sheet.motor_time_constant_s = Calibrated::Value(0.0);
        assert!(matches!(
            sheet.resolve(),
            Err(AzimuthError::InvalidCalibration { ref field, .. })
                if field == "motor_time_constant_s"
        ));
    }
}
