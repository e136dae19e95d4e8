//! Register-level seam to the CAN bus.
//!
//! Everything this crate knows about a motor controller or encoder is a set
//! of f64-valued registers at a device address. The platform layer that owns
//! the physical socket implements [`DeviceBus`]; tests implement it with an
//! in-memory map. The devices of one module (drive controller, steer
//! controller, angle encoder) share a single [`BusHandle`].

use std::cell::RefCell;
use std::rc::Rc;

use azimuth_types::{AzimuthError, BusId};

/// The registers this layer reads and writes. Both supported controller
/// families are expressed in this vocabulary; a family only ever touches the
/// subset its firmware actually exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    /// Relative encoder position, motor-shaft rotations.
    Position,
    /// Velocity, rotations per second.
    Velocity,
    /// Output voltage, volts. Written as a command, read as the applied value.
    OutputVoltage,
    /// Duty-cycle output in [-1, 1]. REV controllers report this instead of
    /// an output voltage.
    AppliedOutput,
    /// Input bus voltage, volts.
    BusVoltage,
    /// Stator current, amps (CTRE naming).
    StatorCurrent,
    /// Output current, amps (REV naming for the same reading).
    OutputCurrent,
    /// Neutral behavior at zero output; [`NEUTRAL_COAST`] or [`NEUTRAL_BRAKE`].
    NeutralMode,
    /// Open-loop voltage ramp period, seconds.
    OpenLoopRampPeriod,
    /// Closed-loop voltage ramp period, seconds.
    ClosedLoopRampPeriod,
    /// Supply-side current limit, amps.
    SupplyCurrentLimit,
    /// Stator-side current limit, amps.
    StatorCurrentLimit,
    /// Absolute magnet position, rotations in [0, 1).
    AbsolutePosition,
}

/// Encoding of [`Register::NeutralMode`] values on the wire.
pub const NEUTRAL_COAST: f64 = 0.0;
pub const NEUTRAL_BRAKE: f64 = 1.0;

/// Transport to the devices on one CAN bus.
///
/// Real implementations live in the embedding platform layer and move actual
/// frames; this crate never constructs one. Single-threaded by design: the
/// control loop is the only caller, so no `Send` bound is required.
///
/// # Errors
///
/// Implementations return [`AzimuthError::HardwareFault`] when a device does
/// not answer (bus timeout, disconnected controller). This crate propagates
/// those errors unmodified; it never retries.
pub trait DeviceBus {
    /// Read one register from the device at `device`.
    fn read(&mut self, device: BusId, register: Register) -> Result<f64, AzimuthError>;

    /// Write one register on the device at `device`.
    fn write(
        &mut self,
        device: BusId,
        register: Register,
        value: f64,
    ) -> Result<(), AzimuthError>;
}

/// Shared handle to one bus, cloned per device that talks on it.
pub type BusHandle = Rc<RefCell<dyn DeviceBus>>;

/// How a module reaches its hardware: live CAN traffic, or nothing at all.
///
/// Chosen once at startup and injected into every backend and encoder at
/// construction, so no component ever re-checks a process-global flag.
#[derive(Clone)]
pub enum Attachment {
    /// Physical controllers are present; traffic goes through the handle.
    Can(BusHandle),
    /// No hardware attached. Actuator and sensor state lives in in-memory
    /// images fed by the physics models.
    Detached,
}

impl Attachment {
    /// True when no physical hardware is attached.
    pub fn is_detached(&self) -> bool {
        matches!(self, Attachment::Detached)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

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
    fn handle_is_shareable_across_devices() {
        let bus: BusHandle = Rc::new(RefCell::new(MapBus {
            cells: HashMap::new(),
        }));
        let for_drive = Rc::clone(&bus);
        let for_steer = Rc::clone(&bus);

        for_drive
            .borrow_mut()
            .write(BusId(10), Register::OutputVoltage, 6.0)
            .unwrap();
        let read = for_steer
            .borrow_mut()
            .read(BusId(10), Register::OutputVoltage)
            .unwrap();
        assert!((read - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn attachment_reports_detached() {
        assert!(Attachment::Detached.is_detached());

        let bus: BusHandle = Rc::new(RefCell::new(MapBus {
            cells: HashMap::new(),
        }));
        assert!(!Attachment::Can(bus).is_detached());
    }
}
