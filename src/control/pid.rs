use crate::core::PidGains;

/// PID loop for a single joint, evaluated once per fixed control period.
///
/// The output is unbounded; callers clamp it with the joint's
/// [`PowerLimit`](crate::core::PowerLimit). Gains can be swapped between
/// evaluations without touching the accumulated integral or the derivative
/// history; use [`JointPidController::reset`] to clear them.
pub struct JointPidController {
    gains: PidGains,
    target: f64,
    integral: f64,
    previous_error: f64,
    period: f64,
}

impl JointPidController {
    /// `period` is the control loop period in seconds and must be positive.
    pub fn new(gains: PidGains, period: f64) -> Self {
        Self {
            gains,
            target: 0.0,
            integral: 0.0,
            previous_error: 0.0,
            period,
        }
    }

    pub fn set_gains(&mut self, p: f64, i: f64, d: f64) {
        self.gains = PidGains { p, i, d };
    }

    pub fn set_target(&mut self, angle_deg: f64) {
        self.target = angle_deg;
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.previous_error = 0.0;
    }

    pub fn gains(&self) -> PidGains {
        self.gains
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn get_integral(&self) -> f64 {
        self.integral
    }

    pub fn evaluate(&mut self, measured_deg: f64) -> f64 {
        let error = self.target - measured_deg;

        self.integral += error * self.period;
        let derivative = (error - self.previous_error) / self.period;
        self.previous_error = error;

        self.gains.p * error + self.gains.i * self.integral + self.gains.d * derivative
    }
}

#[cfg(test)]
mod pid_tests {
    use super::*;

    const DT: f64 = 0.02;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn proportional_only_is_scaled_error() {
        for (p, target, measured) in [(1.0, 90.0, 30.0), (0.3, -12.5, 7.0), (-2.0, 0.0, 45.0)] {
            let mut pid = JointPidController::new(PidGains::new(p, 0.0, 0.0), DT);
            pid.set_target(target);

            assert_eq!(
                pid.evaluate(measured),
                p * (target - measured),
                "p={p} target={target} measured={measured}"
            );
        }
    }

    #[test]
    fn raw_output_is_unbounded() {
        let mut pid = JointPidController::new(PidGains::new(1.0, 0.0, 0.0), DT);
        pid.set_target(90.0);

        assert_eq!(pid.evaluate(30.0), 60.0, "raw output is not clamped");
    }

    #[test]
    fn pure_integral_accumulates_over_ticks() {
        let mut pid = JointPidController::new(PidGains::new(0.0, 0.1, 0.0), DT);
        pid.set_target(10.0);

        let mut output = 0.0;
        for _ in 0..5 {
            output = pid.evaluate(0.0);
        }

        assert!(close(pid.get_integral(), 1.0), "integral = 10 * 0.02 * 5");
        assert!(close(output, 0.1), "output = 0.1 * 1.0, got {output}");
    }

    #[test]
    fn integral_grows_in_sign_of_error() {
        for error in [10.0, -4.0] {
            let mut pid = JointPidController::new(PidGains::new(0.0, 1.0, 0.0), DT);
            pid.set_target(error);

            let mut previous = pid.evaluate(0.0);
            for _ in 0..20 {
                let next = pid.evaluate(0.0);
                if error > 0.0 {
                    assert!(next > previous, "integral term keeps growing");
                } else {
                    assert!(next < previous, "integral term keeps shrinking");
                }
                previous = next;
            }
        }
    }

    #[test]
    fn derivative_uses_previous_error() {
        let mut pid = JointPidController::new(PidGains::new(0.0, 0.0, 1.0), DT);
        pid.set_target(10.0);

        assert!(close(pid.evaluate(0.0), 10.0 / DT), "first call kicks from zero");
        assert!(close(pid.evaluate(0.0), 0.0), "constant error has no slope");
        assert!(close(pid.evaluate(5.0), -5.0 / DT), "error shrank by 5");
    }

    #[test]
    fn zero_error_gives_zero_output() {
        let mut pid = JointPidController::new(PidGains::new(0.7, 0.2, 0.05), DT);
        pid.set_target(42.0);

        assert_eq!(pid.evaluate(42.0), 0.0);
    }

    #[test]
    fn gain_change_keeps_accumulators() {
        let mut pid = JointPidController::new(PidGains::new(0.0, 1.0, 0.0), DT);
        pid.set_target(10.0);
        pid.evaluate(0.0);
        let integral = pid.get_integral();

        pid.set_gains(0.0, 2.0, 0.0);

        assert_eq!(pid.get_integral(), integral, "gains do not reset history");
        assert!(close(pid.evaluate(0.0), 2.0 * (integral + 10.0 * DT)));
    }

    #[test]
    fn reset_clears_history_but_not_setpoint() {
        let mut pid = JointPidController::new(PidGains::new(0.0, 1.0, 1.0), DT);
        pid.set_target(10.0);
        pid.evaluate(0.0);
        pid.evaluate(3.0);

        pid.reset();

        assert_eq!(pid.get_integral(), 0.0);
        assert_eq!(pid.target(), 10.0);
        assert_eq!(pid.gains(), PidGains::new(0.0, 1.0, 1.0));
        assert_eq!(pid.evaluate(10.0), 0.0, "no derivative kick from stale error");
    }

    #[test]
    fn nan_measurement_propagates() {
        let mut pid = JointPidController::new(PidGains::new(1.0, 0.0, 0.0), DT);

        assert!(pid.evaluate(f64::NAN).is_nan());
    }
}
