use crate::{Error, Result};

/// Position of the wizard within its steps.
///
/// `current_step` is always below `step_count`; navigation clamps at both
/// ends instead of leaving the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardState {
    current_step: usize,
    step_count: usize,
}

impl WizardState {
    pub fn new(step_count: usize) -> Result<Self> {
        if step_count == 0 {
            return Err(Error::MissingElement("form steps".into()));
        }
        Ok(Self {
            current_step: 0,
            step_count,
        })
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step + 1 == self.step_count
    }

    /// Moves forward one step. Returns false at the last step.
    pub fn step_forward(&mut self) -> bool {
        if self.is_last_step() {
            return false;
        }
        self.current_step += 1;
        true
    }

    /// Moves back one step. Returns false at the first step.
    pub fn step_back(&mut self) -> bool {
        if self.current_step == 0 {
            return false;
        }
        self.current_step -= 1;
        true
    }

    pub fn reset(&mut self) {
        self.current_step = 0;
    }

    pub fn progress_fraction(&self) -> f64 {
        (self.current_step + 1) as f64 / self.step_count as f64
    }

    pub fn progress_percent(&self) -> f64 {
        self.progress_fraction() * 100.0
    }

    pub fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.step_count {
            return Err(Error::StepOutOfRange {
                index,
                count: self.step_count,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_steps_is_a_structure_error() {
        let err = WizardState::new(0).expect_err("no steps");
        assert_eq!(err, Error::MissingElement("form steps".into()));
    }

    #[test]
    fn navigation_clamps_at_both_ends() -> Result<()> {
        let mut state = WizardState::new(3)?;
        assert!(!state.step_back());
        assert_eq!(state.current_step(), 0);

        assert!(state.step_forward());
        assert!(state.step_forward());
        assert!(state.is_last_step());
        assert!(!state.step_forward());
        assert_eq!(state.current_step(), 2);

        state.reset();
        assert_eq!(state.current_step(), 0);
        Ok(())
    }

    #[test]
    fn progress_matches_position() -> Result<()> {
        let mut state = WizardState::new(3)?;
        assert_eq!(state.progress_percent(), (1.0 / 3.0) * 100.0);
        state.step_forward();
        assert_eq!(state.progress_percent(), (2.0 / 3.0) * 100.0);
        state.step_forward();
        assert_eq!(state.progress_percent(), 100.0);
        Ok(())
    }

    #[test]
    fn check_index_reports_range() -> Result<()> {
        let state = WizardState::new(2)?;
        state.check_index(1)?;
        assert_eq!(
            state.check_index(2),
            Err(Error::StepOutOfRange { index: 2, count: 2 })
        );
        Ok(())
    }
}
