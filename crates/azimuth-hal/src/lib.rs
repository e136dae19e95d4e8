//! `azimuth-hal` – Hardware Abstraction
//!
//! Device-level building blocks for a swerve drivetrain: the register bus
//! seam the rest of the stack talks through, the two fielded
//! motor-controller families, the per-corner motor and sensor frontends,
//! and the loop controller and motor model the control layer ticks.
//!
//! Everything here is synchronous and single-threaded; one robot loop owns
//! the hardware and ticks it at a fixed period.
//!
//! # Modules
//! - [`bus`] – register-level device bus seam and attachment selection
//! - [`vendor`] – TalonFX and SparkMax register conventions
//! - [`motors`] – configure-once drive/steer backend of one corner
//! - [`encoder`] – absolute steering angle sensor
//! - [`motor`] – datasheet constants of the fielded motors
//! - [`pid`] – fixed-period PID controller with continuous input
//! - [`sim`] – first-order motor model for bench runs

pub mod bus;
pub mod encoder;
pub mod motor;
pub mod motors;
pub mod pid;
pub mod sim;
pub mod vendor;

pub use bus::{Attachment, BusHandle, DeviceBus, Register};
pub use encoder::{AngleEncoder, EncoderImage};
pub use motor::MotorSpec;
pub use motors::ModuleMotors;
pub use pid::PidController;
pub use sim::MotorSim;
pub use vendor::{HardwareProfile, VendorIo, VendorPair};
