//! Container length change filter.
//!
//! Hosts forward whatever their resize source reports (a `ResizeObserver`,
//! a window event, a terminal `SIGWINCH`). [`ContainerObserver`] turns that
//! stream into "re-solve needed" signals: unusable lengths are dropped and
//! repeats within epsilon are swallowed.

/// Latest accepted container length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerObserver {
    last: Option<f64>,
    epsilon: f64,
}

impl Default for ContainerObserver {
    fn default() -> Self {
        Self::new(crate::solver::SIZE_EPSILON)
    }
}

impl ContainerObserver {
    #[must_use]
    pub fn new(epsilon: f64) -> Self {
        Self {
            last: None,
            epsilon: epsilon.abs(),
        }
    }

    /// Feed a reported length. Returns it if it should trigger a re-solve.
    pub fn observe(&mut self, length: f64) -> Option<f64> {
        if !length.is_finite() || length < 0.0 {
            return None;
        }
        if let Some(last) = self.last
            && (last - length).abs() <= self.epsilon
        {
            return None;
        }
        self.last = Some(length);
        Some(length)
    }

    #[must_use]
    pub const fn last_length(&self) -> Option<f64> {
        self.last
    }

    /// Forget the last length so the next report always passes.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_report_passes() {
        let mut obs = ContainerObserver::new(0.5);
        assert_eq!(obs.observe(0.0), Some(0.0));
        assert_eq!(obs.last_length(), Some(0.0));
    }

    #[test]
    fn repeats_within_epsilon_are_swallowed() {
        let mut obs = ContainerObserver::new(0.5);
        assert_eq!(obs.observe(800.0), Some(800.0));
        assert_eq!(obs.observe(800.3), None);
        assert_eq!(obs.observe(801.0), Some(801.0));
        assert_eq!(obs.last_length(), Some(801.0));
    }

    #[test]
    fn unusable_lengths_are_dropped() {
        let mut obs = ContainerObserver::default();
        for bad in [f64::NAN, f64::INFINITY, -1.0] {
            assert_eq!(obs.observe(bad), None);
        }
        assert_eq!(obs.last_length(), None);
    }

    #[test]
    fn reset_lets_repeat_through() {
        let mut obs = ContainerObserver::default();
        obs.observe(10.0);
        obs.reset();
        assert_eq!(obs.observe(10.0), Some(10.0));
    }
}
