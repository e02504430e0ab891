//! Single-slot guard against overlapping renders.
use parking_lot::Mutex;

use crate::common::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Running,
}

/// Allows at most one render at a time.
#[derive(Debug)]
pub struct RenderJob {
    state: Mutex<JobState>,
}

impl RenderJob {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(JobState::Idle),
        }
    }

    pub fn state(&self) -> JobState {
        *self.state.lock()
    }

    /// Claim the slot; the returned guard frees it when dropped.
    pub fn try_start(&self) -> Result<JobGuard<'_>> {
        let mut state = self.state.lock();
        if *state == JobState::Running {
            return Err(Error::Busy);
        }
        *state = JobState::Running;
        Ok(JobGuard { job: self })
    }
}

impl Default for RenderJob {
    fn default() -> Self {
        Self::new()
    }
}

/// Holds the render slot.
#[derive(Debug)]
pub struct JobGuard<'a> {
    job: &'a RenderJob,
}

impl Drop for JobGuard<'_> {
    fn drop(&mut self) {
        *self.job.state.lock() = JobState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_start_is_busy() {
        let job = RenderJob::new();
        let guard = job.try_start().unwrap();
        assert_eq!(job.state(), JobState::Running);
        assert!(matches!(job.try_start(), Err(Error::Busy)));
        drop(guard);
        assert_eq!(job.state(), JobState::Idle);
        assert!(job.try_start().is_ok());
    }
}
