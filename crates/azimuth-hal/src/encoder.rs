//! Absolute angle sensor of one swerve module.
//!
//! The sensor sits on the steering output shaft and reports a fraction of a
//! turn, so a module's heading survives power cycles without homing. Readings
//! are normalized into `[0, 1)` turns regardless of how far the raw register
//! has accumulated, which keeps the simulated path (where the register counts
//! freely) and the hardware path (where the device wraps on its own)
//! indistinguishable to callers.

use azimuth_types::{AzimuthError, BusId};

use crate::bus::{Attachment, BusHandle, Register};

/// Sensor state stood in for the device when detached.
///
/// A simulation writes into this image; the encoder reads from it exactly as
/// it would read device registers.
#[derive(Debug, Default)]
pub struct EncoderImage {
    raw_rotations: f64,
    velocity_rps: f64,
}

impl EncoderImage {
    /// Set the accumulated sensor position, rotations of the output shaft.
    pub fn set_raw_rotations(&mut self, rotations: f64) {
        self.raw_rotations = rotations;
    }

    /// Set the sensor velocity, rotations per second of the output shaft.
    pub fn set_velocity_rps(&mut self, rps: f64) {
        self.velocity_rps = rps;
    }
}

enum EncoderIo {
    Hardware { bus: BusHandle, device: BusId },
    Detached(EncoderImage),
}

/// Absolute steering encoder, one per module corner.
pub struct AngleEncoder {
    io: EncoderIo,
}

impl AngleEncoder {
    /// Bind the sensor. Detached attachments get an all-zero image.
    pub fn new(device: BusId, attachment: &Attachment) -> Self {
        let io = match attachment {
            Attachment::Can(handle) => EncoderIo::Hardware {
                bus: handle.clone(),
                device,
            },
            Attachment::Detached => EncoderIo::Detached(EncoderImage::default()),
        };
        Self { io }
    }

    /// Absolute position, turns in `[0, 1)`.
    pub fn absolute_rotations(&self) -> Result<f64, AzimuthError> {
        let raw = match &self.io {
            EncoderIo::Hardware { bus, device } => {
                bus.borrow_mut().read(*device, Register::AbsolutePosition)?
            }
            EncoderIo::Detached(image) => image.raw_rotations,
        };
        // rem_euclid rounds a tiny negative input up to exactly one turn.
        let turns = raw.rem_euclid(1.0);
        Ok(if turns >= 1.0 { 0.0 } else { turns })
    }

    /// Absolute position, degrees in `[0, 360)`.
    pub fn angle_degrees(&self) -> Result<f64, AzimuthError> {
        Ok(self.absolute_rotations()? * 360.0)
    }

    /// Signed rotational velocity of the output shaft, rotations per second.
    pub fn velocity_rps(&self) -> Result<f64, AzimuthError> {
        match &self.io {
            EncoderIo::Hardware { bus, device } => {
                bus.borrow_mut().read(*device, Register::Velocity)
            }
            EncoderIo::Detached(image) => Ok(image.velocity_rps),
        }
    }

    /// The detached image, for a simulation to drive. `None` on hardware.
    pub fn image_mut(&mut self) -> Option<&mut EncoderImage> {
        match &mut self.io {
            EncoderIo::Hardware { .. } => None,
            EncoderIo::Detached(image) => Some(image),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use super::*;
    use crate::bus::DeviceBus;

    #[derive(Default)]
    struct MapBus {
        cells: HashMap<(BusId, Register), f64>,
    }

    impl DeviceBus for MapBus {
        fn read(&mut self, device: BusId, register: Register) -> Result<f64, AzimuthError> {
            Ok(*self.cells.get(&(device, register)).unwrap_or(&0.0))
        }

        fn write(
            &mut self,
            device: BusId,
            register: Register,
            value: f64,
        ) -> Result<(), AzimuthError> {
            self.cells.insert((device, register), value);
            Ok(())
        }
    }

    #[test]
    fn accumulated_rotations_wrap_into_one_turn() {
        let mut encoder = AngleEncoder::new(BusId(12), &Attachment::Detached);
        encoder.image_mut().unwrap().set_raw_rotations(2.25);
        assert!((encoder.absolute_rotations().unwrap() - 0.25).abs() < 1e-12);
        assert!((encoder.angle_degrees().unwrap() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn negative_rotations_wrap_upward() {
        let mut encoder = AngleEncoder::new(BusId(12), &Attachment::Detached);
        encoder.image_mut().unwrap().set_raw_rotations(-0.25);
        assert!((encoder.angle_degrees().unwrap() - 270.0).abs() < 1e-9);
    }

    #[test]
    fn tiny_negative_rotations_read_as_zero_not_a_full_turn() {
        let mut encoder = AngleEncoder::new(BusId(12), &Attachment::Detached);
        // Small enough that adding a full turn rounds back to 1.0 exactly.
        encoder.image_mut().unwrap().set_raw_rotations(-1e-18);
        let angle = encoder.angle_degrees().unwrap();
        assert!(angle < 360.0, "angle {angle} left [0, 360)");
        assert_eq!(angle, 0.0);
    }

    #[test]
    fn velocity_keeps_its_sign() {
        let mut encoder = AngleEncoder::new(BusId(12), &Attachment::Detached);
        encoder.image_mut().unwrap().set_velocity_rps(-0.8);
        assert_eq!(encoder.velocity_rps().unwrap(), -0.8);
    }

    #[test]
    fn hardware_path_reads_the_absolute_position_register() {
        let bus = Rc::new(RefCell::new(MapBus::default()));
        bus.borrow_mut()
            .cells
            .insert((BusId(12), Register::AbsolutePosition), 0.5);
        let handle: BusHandle = bus.clone();

        let mut encoder = AngleEncoder::new(BusId(12), &Attachment::Can(handle));
        assert!((encoder.angle_degrees().unwrap() - 180.0).abs() < 1e-9);
        assert!(encoder.image_mut().is_none());
    }
}
