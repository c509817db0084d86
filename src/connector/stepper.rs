use crate::config::StepperConfig;

/// What one frame did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// Nothing to animate yet: the page has not loaded.
    Idle,
    /// Reduced motion is on. The scene is drawn once and then held still.
    Frozen,
    /// The page is hidden. Only the timestamp moved.
    Hidden,
    /// Advance the simulation by `dt` seconds; write visuals only when `commit` is set.
    Advanced { dt: f64, commit: bool },
}

/// Turns host timestamps into clamped delta times and decides which ticks write visuals.
///
/// The last timestamp is updated on every tick, hidden or not, so returning to a visible page
/// never produces a catch-up jump.
#[derive(Clone, Debug)]
pub struct FrameStepper {
    max_dt: f64,
    alternate_commits: bool,
    last_ms: Option<f64>,
    hidden: bool,
    commit_toggle: bool,
    ticks: u64,
    commits: u64,
}

impl FrameStepper {
    pub fn new(cfg: &StepperConfig) -> Self {
        Self {
            max_dt: cfg.max_dt_secs,
            alternate_commits: cfg.alternate_commits,
            last_ms: None,
            hidden: false,
            commit_toggle: false,
            ticks: 0,
            commits: 0,
        }
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Ticks that advanced the simulation (hidden ticks excluded).
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Ticks that wrote visuals.
    pub fn commits(&self) -> u64 {
        self.commits
    }

    pub fn last_ms(&self) -> Option<f64> {
        self.last_ms
    }

    /// Seconds since the previous tick, clamped to `[0, max_dt]`. The first tick yields 0.
    fn delta_secs(&mut self, now_ms: f64) -> f64 {
        let dt = match self.last_ms {
            Some(last) => (now_ms - last) / 1000.0,
            None => 0.0,
        };
        if now_ms.is_finite() {
            self.last_ms = Some(now_ms);
        }
        if dt.is_nan() {
            return 0.0;
        }
        dt.clamp(0.0, self.max_dt)
    }

    /// Record `now_ms` without advancing or counting a tick.
    pub fn skip(&mut self, now_ms: f64) {
        self.delta_secs(now_ms);
    }

    pub fn begin(&mut self, now_ms: f64) -> TickOutcome {
        let dt = self.delta_secs(now_ms);
        if self.hidden {
            return TickOutcome::Hidden;
        }
        self.ticks = self.ticks.saturating_add(1);

        let commit = if self.alternate_commits {
            self.commit_toggle = !self.commit_toggle;
            self.commit_toggle
        } else {
            true
        };
        if commit {
            self.commits = self.commits.saturating_add(1);
        }
        TickOutcome::Advanced { dt, commit }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/connector/stepper.rs"]
mod tests;
