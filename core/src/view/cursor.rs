use serde::{Deserialize, Serialize};

use crate::select::StepRange;

/// Bounded cursor over the steps of one open series view.
///
/// Each series view owns its cursor; forward/back handlers receive it
/// explicitly, so several open views never interfere with each other. The
/// cursor only tracks position, it never triggers a fetch or render itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCursor {
    current: usize,
    lo: usize,
    hi: usize,
}

impl StepCursor {
    /// Starts at the first step of the range.
    pub fn new(steps: StepRange) -> Self {
        Self {
            current: steps.start,
            lo: steps.start,
            hi: steps.last(),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn lo(&self) -> usize {
        self.lo
    }

    pub fn hi(&self) -> usize {
        self.hi
    }

    pub fn can_advance(&self) -> bool {
        self.current < self.hi
    }

    pub fn can_retreat(&self) -> bool {
        self.current > self.lo
    }

    /// Moves one step forward; a silent no-op at the upper bound. Returns
    /// whether the cursor moved, so the caller knows to re-fetch.
    pub fn advance(&mut self) -> bool {
        if self.can_advance() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Moves one step back; a silent no-op at the lower bound.
    pub fn retreat(&mut self) -> bool {
        if self.can_retreat() {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Jumps to an absolute step, rejecting positions outside the bounds.
    pub fn seek(&mut self, position: usize) -> bool {
        if (self.lo..=self.hi).contains(&position) {
            self.current = position;
            true
        } else {
            false
        }
    }

    /// All steps the cursor can visit, in order.
    pub fn steps(&self) -> impl Iterator<Item = usize> {
        self.lo..=self.hi
    }
}
