use thiserror::Error;

use crate::select::axes::AxisPartition;
use crate::select::StepRange;

use super::cursor::StepCursor;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DualError {
    #[error("{side} selection has {free_rank} free axes, comparison plots need exactly 1")]
    NotLineLike {
        side: &'static str,
        free_rank: usize,
    },
}

/// Checks that both selections of a comparison plot reduce to one free axis
/// and returns the plot's `(x, y)` axis labels.
///
/// The primary selection supplies the Y series, the secondary the X series;
/// the two value sequences are plotted element-for-element by position.
pub fn align(
    primary: &AxisPartition,
    secondary: &AxisPartition,
) -> Result<(String, String), DualError> {
    if primary.free_rank() != 1 {
        return Err(DualError::NotLineLike {
            side: "primary",
            free_rank: primary.free_rank(),
        });
    }
    if secondary.free_rank() != 1 {
        return Err(DualError::NotLineLike {
            side: "secondary",
            free_rank: secondary.free_rank(),
        });
    }
    Ok((
        format!("axis-{}", secondary.free[0]),
        format!("axis-{}", primary.free[0]),
    ))
}

/// Lock-step paging for a comparison of two series.
///
/// The two selections keep independent step starts but share one step
/// count, so a single forward/back control advances both sides together and
/// both hit their bounds on the same transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DualCursor {
    primary: StepCursor,
    secondary: StepCursor,
}

impl DualCursor {
    pub fn new(primary: StepRange, secondary_start: usize) -> Self {
        Self {
            primary: StepCursor::new(primary),
            secondary: StepCursor::new(StepRange::new(secondary_start, primary.count)),
        }
    }

    pub fn current(&self) -> (usize, usize) {
        (self.primary.current(), self.secondary.current())
    }

    pub fn can_advance(&self) -> bool {
        self.primary.can_advance()
    }

    pub fn can_retreat(&self) -> bool {
        self.primary.can_retreat()
    }

    pub fn advance(&mut self) -> bool {
        self.primary.advance() && self.secondary.advance()
    }

    pub fn retreat(&mut self) -> bool {
        self.primary.retreat() && self.secondary.retreat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_from_free_axes() {
        let primary = AxisPartition::classify(&[1, 8, 1]);
        let secondary = AxisPartition::classify(&[4, 1]);
        let (x, y) = align(&primary, &secondary).unwrap();
        assert_eq!(x, "axis-0");
        assert_eq!(y, "axis-1");
    }

    #[test]
    fn rejects_non_line_selections() {
        let line = AxisPartition::classify(&[5, 1]);
        let image = AxisPartition::classify(&[5, 5]);
        let scalar = AxisPartition::classify(&[1, 1]);

        assert_eq!(
            align(&image, &line),
            Err(DualError::NotLineLike {
                side: "primary",
                free_rank: 2
            })
        );
        assert_eq!(
            align(&line, &scalar),
            Err(DualError::NotLineLike {
                side: "secondary",
                free_rank: 0
            })
        );
    }

    #[test]
    fn lock_step_paging() {
        let mut cursor = DualCursor::new(StepRange::new(3, 3), 10);
        assert_eq!(cursor.current(), (3, 10));
        assert!(!cursor.can_retreat());

        assert!(cursor.advance());
        assert_eq!(cursor.current(), (4, 11));

        assert!(cursor.advance());
        assert!(!cursor.advance());
        assert_eq!(cursor.current(), (5, 12));
        assert!(!cursor.can_advance());

        assert!(cursor.retreat());
        assert_eq!(cursor.current(), (4, 11));
    }
}
