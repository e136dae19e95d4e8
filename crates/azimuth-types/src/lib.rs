use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The physical robots this code can run on. Exactly one identity is active
/// per process, chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChassisId {
    /// The competition chassis (TalonFX controllers, Kraken X60 motors).
    Competition,
    /// The practice chassis. Mechanically interchangeable with
    /// [`Competition`][ChassisId::Competition] and shares its hardware profile.
    Practice,
    /// The development mule (SparkMax controllers, NEO motors).
    Mule,
}

impl ChassisId {
    /// Every supported identity, in registry order.
    pub const ALL: [ChassisId; 3] = [
        ChassisId::Competition,
        ChassisId::Practice,
        ChassisId::Mule,
    ];
}

/// One corner of the drivetrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleSlot {
    FrontLeft,
    FrontRight,
    BackLeft,
    BackRight,
}

impl ModuleSlot {
    /// Every corner, in wiring-table order.
    pub const ALL: [ModuleSlot; 4] = [
        ModuleSlot::FrontLeft,
        ModuleSlot::FrontRight,
        ModuleSlot::BackLeft,
        ModuleSlot::BackRight,
    ];
}

/// CAN device number of one motor controller or encoder. Opaque to this
/// core; the platform's bus implementation gives it meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusId(pub u8);

impl fmt::Display for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CAN {}", self.0)
    }
}

/// Motor controller behavior when commanded zero output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeutralMode {
    /// Free-spin to a stop.
    Coast,
    /// Actively resist rotation.
    Brake,
}

/// Commanded or observed state of one module.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModuleState {
    /// Open-loop drive output in VOLTS. The field keeps the conventional
    /// "speed" name from the drivetrain layer above, but no voltage-to-speed
    /// conversion happens anywhere in this core.
    pub speed: f64,
    /// Wheel heading in degrees, [0, 360).
    pub angle_degrees: f64,
}

/// Accumulated odometry reading of one module. Derived on every read, never
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModulePosition {
    /// Distance rolled by the wheel since the last encoder reset, meters.
    pub distance_meters: f64,
    /// Wheel heading in degrees, [0, 360).
    pub angle_degrees: f64,
}

/// Error type spanning bus faults, backend lifecycle misuse, and calibration
/// resolution failures.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AzimuthError {
    #[error("hardware fault on {device}: {details}")]
    HardwareFault { device: String, details: String },

    #[error("backend command issued before configure() bound its bus addresses")]
    NotConfigured,

    #[error("configure() called more than once on a module backend")]
    AlreadyConfigured,

    #[error("calibration field `{field}` is unresolved: {reason}")]
    IncompleteCalibration { field: String, reason: String },

    #[error("calibration field `{field}` must be strictly positive, got {value}")]
    InvalidCalibration { field: String, value: f64 },
}
