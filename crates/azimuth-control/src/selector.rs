//! Chassis selection.
//!
//! Three chassis are fielded: the competition and practice robots carry
//! TalonFX controllers and are meant to behave identically, and the mule (an
//! older drivetrain kept for driver practice) carries SparkMax controllers.
//! The selector maps a [`ChassisId`] to its hardware profile and resolved
//! calibration, so the rest of the stack never branches on chassis identity
//! itself.

use std::sync::Arc;

use azimuth_hal::bus::Attachment;
use azimuth_hal::motors::ModuleMotors;
use azimuth_hal::vendor::HardwareProfile;
use azimuth_types::{AzimuthError, ChassisId};
use tracing::info;

use crate::calibration::{CalibrationBundle, CalibrationRegistry};

/// Maps chassis identity to hardware and calibration.
pub struct ChassisSelector {
    registry: CalibrationRegistry,
}

impl ChassisSelector {
    /// Selector over an already-built registry.
    pub fn new(registry: CalibrationRegistry) -> Self {
        Self { registry }
    }

    /// Selector over the fielded calibration sheets.
    pub fn bootstrap() -> Result<Self, AzimuthError> {
        Ok(Self::new(CalibrationRegistry::bootstrap()?))
    }

    /// The motor-controller family a chassis carries.
    pub fn profile(&self, chassis: ChassisId) -> HardwareProfile {
        match chassis {
            ChassisId::Competition | ChassisId::Practice => HardwareProfile::TalonFx,
            ChassisId::Mule => HardwareProfile::SparkMax,
        }
    }

    /// An unbound motor backend for one corner of a chassis.
    pub fn module_motors(&self, chassis: ChassisId, attachment: Attachment) -> ModuleMotors {
        let profile = self.profile(chassis);
        info!(?chassis, ?profile, detached = attachment.is_detached(), "selected module hardware");
        ModuleMotors::new(profile, attachment)
    }

    /// The resolved calibration of a chassis.
    pub fn calibration(&self, chassis: ChassisId) -> Arc<CalibrationBundle> {
        self.registry.bundle(chassis)
    }
}
