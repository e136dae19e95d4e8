//! First-order motor model for bench runs.
//!
//! A voltage commands a target speed through the motor's velocity constant,
//! and the shaft approaches that target exponentially with a fixed time
//! constant. Each step uses the closed-form solution of the first-order
//! response rather than an Euler update, so the model is exact for any step
//! size: an idle motor at zero volts stays at exactly zero, and integrated
//! position carries no accumulation error.

use std::f64::consts::TAU;

use crate::motor::MotorSpec;

/// Motor shaft responding to applied voltage.
#[derive(Debug, Clone)]
pub struct MotorSim {
    kv: f64,
    time_constant: f64,
    position_rad: f64,
    velocity_rad_per_s: f64,
}

impl MotorSim {
    /// Model from a velocity constant (volts per rad/s) and a mechanical
    /// time constant (seconds).
    ///
    /// # Panics
    ///
    /// Panics unless both constants are positive.
    pub fn new(kv: f64, time_constant: f64) -> Self {
        assert!(kv > 0.0, "velocity constant must be positive");
        assert!(time_constant > 0.0, "time constant must be positive");
        Self {
            kv,
            time_constant,
            position_rad: 0.0,
            velocity_rad_per_s: 0.0,
        }
    }

    /// Model whose steady state at nominal voltage is the motor's datasheet
    /// free speed.
    pub fn for_motor(spec: &MotorSpec, time_constant: f64) -> Self {
        Self::new(spec.kv(), time_constant)
    }

    /// Advance the model by `dt` seconds under a constant applied voltage.
    pub fn step(&mut self, volts: f64, dt: f64) {
        assert!(dt > 0.0, "step must advance time");
        let target = volts / self.kv;
        let decay = (-dt / self.time_constant).exp();
        let offset = self.velocity_rad_per_s - target;
        self.position_rad += target * dt + offset * self.time_constant * (1.0 - decay);
        self.velocity_rad_per_s = target + offset * decay;
    }

    /// Accumulated shaft position, rotations.
    pub fn position_rotations(&self) -> f64 {
        self.position_rad / TAU
    }

    /// Shaft velocity, radians per second.
    pub fn velocity_rad_per_s(&self) -> f64 {
        self.velocity_rad_per_s
    }

    /// Shaft velocity, rotations per second.
    pub fn velocity_rps(&self) -> f64 {
        self.velocity_rad_per_s / TAU
    }

    /// Shaft velocity, revolutions per minute.
    pub fn velocity_rpm(&self) -> f64 {
        self.velocity_rps() * 60.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: f64 = 0.02;

    fn kraken_sim() -> MotorSim {
        MotorSim::for_motor(&MotorSpec::kraken_x60(1), 0.075)
    }

    #[test]
    fn idle_motor_at_zero_volts_never_drifts() {
        let mut sim = kraken_sim();
        for _ in 0..1000 {
            sim.step(0.0, TICK);
        }
        assert_eq!(sim.position_rotations(), 0.0);
        assert_eq!(sim.velocity_rad_per_s(), 0.0);
    }

    #[test]
    fn constant_voltage_converges_monotonically_to_free_speed() {
        let spec = MotorSpec::kraken_x60(1);
        let mut sim = MotorSim::for_motor(&spec, 0.075);
        let mut previous = 0.0;
        for _ in 0..100 {
            sim.step(spec.nominal_voltage, TICK);
            assert!(sim.velocity_rad_per_s() > previous);
            previous = sim.velocity_rad_per_s();
        }
        let error = (sim.velocity_rad_per_s() - spec.free_speed_rad_per_s).abs();
        assert!(error / spec.free_speed_rad_per_s < 0.01);
    }

    #[test]
    fn steady_state_position_advances_linearly() {
        let spec = MotorSpec::kraken_x60(1);
        let mut sim = MotorSim::for_motor(&spec, 0.075);
        for _ in 0..500 {
            sim.step(6.0, TICK);
        }
        let before = sim.position_rotations();
        sim.step(6.0, TICK);
        let advanced = sim.position_rotations() - before;
        let expected = (6.0 / spec.kv()) * TICK / TAU;
        assert!((advanced - expected).abs() < 1e-9);
    }

    #[test]
    fn reversed_voltage_pulls_velocity_back_down() {
        let mut sim = kraken_sim();
        for _ in 0..100 {
            sim.step(12.0, TICK);
        }
        let peak = sim.velocity_rad_per_s();
        sim.step(-12.0, TICK);
        assert!(sim.velocity_rad_per_s() < peak);
    }

    #[test]
    fn half_voltage_halves_the_steady_state() {
        let spec = MotorSpec::neo(1);
        let mut sim = MotorSim::for_motor(&spec, 0.075);
        for _ in 0..500 {
            sim.step(spec.nominal_voltage / 2.0, TICK);
        }
        let expected = spec.free_speed_rad_per_s / 2.0;
        assert!((sim.velocity_rad_per_s() - expected).abs() / expected < 0.01);
        let expected_rpm = spec.free_speed_rpm() / 2.0;
        assert!((sim.velocity_rpm() - expected_rpm).abs() / expected_rpm < 0.01);
    }
}
