//! Fixed-period PID controller with optional continuous input.
//!
//! Built for steering loops that measure a circular quantity: with
//! continuous input enabled over `[0, 360)`, the error always takes the
//! short arc, so a module at 350 degrees commanded to 10 degrees turns 20
//! degrees through zero instead of 340 degrees the long way round.
//!
//! # Example
//!
//! ```
//! use azimuth_hal::pid::PidController;
//!
//! let mut pid = PidController::new(0.09, 0.0, 0.001, 0.02);
//! pid.enable_continuous_input(0.0, 360.0);
//!
//! // Measured 10 degrees, target 350 degrees: turn negative through zero.
//! let output = pid.calculate(10.0, 350.0);
//! assert!(output < 0.0);
//! ```

/// PID controller ticked at a fixed period.
#[derive(Debug, Clone)]
pub struct PidController {
    kp: f64,
    ki: f64,
    kd: f64,
    period: f64,
    continuous_span: Option<f64>,
    integral: f64,
    last_error: Option<f64>,
    output_min: f64,
    output_max: f64,
}

impl PidController {
    /// Gains plus the fixed tick period in seconds.
    ///
    /// # Panics
    ///
    /// Panics if `period` is not positive.
    pub fn new(kp: f64, ki: f64, kd: f64, period: f64) -> Self {
        assert!(period > 0.0, "controller period must be positive");
        Self {
            kp,
            ki,
            kd,
            period,
            continuous_span: None,
            integral: 0.0,
            last_error: None,
            output_min: f64::MIN,
            output_max: f64::MAX,
        }
    }

    /// Treat the input as circular over `[min, max)`.
    ///
    /// Errors are folded into half the span either side of zero; an error of
    /// exactly half a span resolves to the positive direction.
    ///
    /// # Panics
    ///
    /// Panics if `max` is not greater than `min`.
    pub fn enable_continuous_input(&mut self, min: f64, max: f64) {
        assert!(max > min, "continuous input range must be non-empty");
        self.continuous_span = Some(max - min);
    }

    /// Clamp controller output to `[min, max]`.
    ///
    /// While the output sits on a limit the integral is rewound each tick so
    /// it cannot wind up behind the saturation.
    ///
    /// # Panics
    ///
    /// Panics if `min` is not below `max`.
    pub fn set_output_limits(&mut self, min: f64, max: f64) {
        assert!(min < max, "output limits must be ordered");
        self.output_min = min;
        self.output_max = max;
    }

    /// Advance the loop by one period and return the control output.
    pub fn calculate(&mut self, measurement: f64, setpoint: f64) -> f64 {
        let error = self.wrap_error(setpoint - measurement);
        self.integral += error * self.period;
        let derivative = match self.last_error {
            Some(previous) => (error - previous) / self.period,
            None => 0.0,
        };
        self.last_error = Some(error);

        let raw = self.kp * error + self.ki * self.integral + self.kd * derivative;
        let output = raw.clamp(self.output_min, self.output_max);
        if self.ki != 0.0 && raw != output {
            self.integral -= (raw - output) / self.ki;
        }
        output
    }

    /// Forget accumulated integral and error history.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.last_error = None;
    }

    fn wrap_error(&self, error: f64) -> f64 {
        match self.continuous_span {
            Some(span) => {
                let wrapped = error.rem_euclid(span);
                if wrapped > span / 2.0 {
                    wrapped - span
                } else {
                    wrapped
                }
            }
            None => error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proportional_output_scales_with_error() {
        let mut pid = PidController::new(0.5, 0.0, 0.0, 0.02);
        assert!((pid.calculate(0.0, 10.0) - 5.0).abs() < 1e-12);
        assert!((pid.calculate(10.0, 0.0) + 5.0).abs() < 1e-12);
    }

    #[test]
    fn continuous_error_takes_the_short_arc_through_zero() {
        let mut pid = PidController::new(1.0, 0.0, 0.0, 0.02);
        pid.enable_continuous_input(0.0, 360.0);
        // 350 -> 10 is +20 through the wrap, not -340.
        assert!((pid.calculate(350.0, 10.0) - 20.0).abs() < 1e-9);
        pid.reset();
        // 10 -> 350 is -20.
        assert!((pid.calculate(10.0, 350.0) + 20.0).abs() < 1e-9);
    }

    #[test]
    fn half_span_error_resolves_positive() {
        let mut pid = PidController::new(1.0, 0.0, 0.0, 0.02);
        pid.enable_continuous_input(0.0, 360.0);
        assert!((pid.calculate(0.0, 180.0) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn integral_accumulates_across_ticks() {
        let mut pid = PidController::new(0.0, 1.0, 0.0, 0.5);
        let first = pid.calculate(0.0, 2.0);
        let second = pid.calculate(0.0, 2.0);
        assert!((first - 1.0).abs() < 1e-12);
        assert!((second - 2.0).abs() < 1e-12);
    }

    #[test]
    fn saturated_integral_is_rewound() {
        let mut pid = PidController::new(0.0, 1.0, 0.0, 1.0);
        pid.set_output_limits(-1.0, 1.0);
        assert_eq!(pid.calculate(0.0, 10.0), 1.0);
        // Without the rewind the wound-up integral would pin the output at
        // the limit for nine more ticks of opposing error.
        assert_eq!(pid.calculate(11.0, 10.0), 0.0);
    }

    #[test]
    fn derivative_waits_for_a_second_sample() {
        let mut pid = PidController::new(0.0, 0.0, 0.1, 0.02);
        assert_eq!(pid.calculate(0.0, 5.0), 0.0);
        assert!(pid.calculate(1.0, 5.0).abs() > 0.0);
    }

    #[test]
    fn reset_clears_history() {
        let mut pid = PidController::new(0.0, 1.0, 0.1, 0.02);
        pid.calculate(0.0, 5.0);
        pid.calculate(1.0, 5.0);
        pid.reset();
        // First tick after reset: no derivative kick, integral restarts.
        let output = pid.calculate(0.0, 5.0);
        assert!((output - 1.0 * 5.0 * 0.02).abs() < 1e-12);
    }

    #[test]
    fn output_limits_clamp_large_errors() {
        let mut pid = PidController::new(10.0, 0.0, 0.0, 0.02);
        pid.set_output_limits(-3.0, 3.0);
        assert_eq!(pid.calculate(0.0, 100.0), 3.0);
        assert_eq!(pid.calculate(100.0, 0.0), -3.0);
    }
}
