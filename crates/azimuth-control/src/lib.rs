//! `azimuth-control` – Drivetrain Control
//!
//! Closed-loop control of a four-corner swerve drivetrain on top of
//! [`azimuth_hal`]. A robot program resolves calibration once at startup,
//! builds a [`SwerveModule`] per corner, and ticks each module at the fixed
//! robot loop period; the same code path runs against hardware or against
//! the bench motor models.
//!
//! # Modules
//! - [`calibration`] – measured drivetrain values, resolved and validated at startup
//! - [`selector`] – chassis identity to hardware profile and calibration
//! - [`layout`] – CAN wiring of the fleet
//! - [`module`] – per-corner closed-loop controller
//! - [`logging`] – tracing subscriber setup
//!
//! # Example
//!
//! ```
//! use azimuth_control::calibration::TuningSheet;
//! use azimuth_control::layout::module_addresses;
//! use azimuth_control::module::SwerveModule;
//! use azimuth_control::selector::ChassisSelector;
//! use azimuth_hal::bus::Attachment;
//! use azimuth_types::{ChassisId, ModuleSlot, ModuleState};
//!
//! # fn main() -> Result<(), azimuth_types::AzimuthError> {
//! let selector = ChassisSelector::bootstrap()?;
//! let tuning = TuningSheet::fielded().resolve()?;
//! let mut module = SwerveModule::new(
//!     ChassisId::Practice,
//!     ModuleSlot::FrontLeft,
//!     module_addresses(ModuleSlot::FrontLeft),
//!     &selector,
//!     &tuning,
//!     Attachment::Detached,
//! )?;
//!
//! // One tick: 7.2 V on the drive motor, wheel pointed at 90°.
//! module.set_module_state(ModuleState {
//!     speed: 7.2,
//!     angle_degrees: 90.0,
//! })?;
//! # Ok(())
//! # }
//! ```

pub mod calibration;
pub mod layout;
pub mod logging;
pub mod module;
pub mod selector;

pub use calibration::{
    Calibrated, CalibrationBundle, CalibrationRegistry, CalibrationSheet, SteerGains, Tuning,
    TuningSheet,
};
pub use layout::{ModuleAddresses, module_addresses};
pub use module::{CONTROL_PERIOD_S, SwerveModule};
pub use selector::ChassisSelector;
