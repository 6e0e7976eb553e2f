//! Duration entry and caller-side validation

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_HOURS: u32 = 23;
pub const MAX_MINUTES: u32 = 59;
pub const MAX_SECONDS: u32 = 59;

/// Longest countdown a caller may request, 23:59:59
pub const MAX_DURATION_SECONDS: u64 =
    MAX_HOURS as u64 * 3600 + MAX_MINUTES as u64 * 60 + MAX_SECONDS as u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("duration must be greater than zero")]
    ZeroDuration,

    #[error("{unit} must be between 0 and {max}, got {value}")]
    OutOfRange {
        unit: &'static str,
        value: u32,
        max: u32,
    },

    #[error("duration must be at most {max} seconds, got {seconds}")]
    TooLong { seconds: u64, max: u64 },
}

/// Reject zero and over-long durations before they reach the engine
pub fn validate_duration(seconds: u64) -> Result<u64, InputError> {
    if seconds == 0 {
        return Err(InputError::ZeroDuration);
    }
    if seconds > MAX_DURATION_SECONDS {
        return Err(InputError::TooLong {
            seconds,
            max: MAX_DURATION_SECONDS,
        });
    }
    Ok(seconds)
}

/// Hours / minutes / seconds as picked on a time picker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSelection {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl TimeSelection {
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Result<Self, InputError> {
        let selection = Self { hours, minutes, seconds };
        selection.check_ranges()?;
        Ok(selection)
    }

    fn check_ranges(&self) -> Result<(), InputError> {
        for (unit, value, max) in [
            ("hours", self.hours, MAX_HOURS),
            ("minutes", self.minutes, MAX_MINUTES),
            ("seconds", self.seconds, MAX_SECONDS),
        ] {
            if value > max {
                return Err(InputError::OutOfRange { unit, value, max });
            }
        }
        Ok(())
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    /// Total seconds, or why this selection cannot start a countdown
    pub fn to_duration(&self) -> Result<u64, InputError> {
        self.check_ranges()?;
        validate_duration(self.total_seconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combines_units_into_seconds() {
        let selection = TimeSelection::new(1, 2, 3).unwrap();
        assert_eq!(selection.to_duration(), Ok(3723));
    }

    #[test]
    fn zero_selection_is_rejected() {
        let err = TimeSelection::default().to_duration().unwrap_err();
        assert_eq!(err, InputError::ZeroDuration);
        assert_eq!(err.to_string(), "duration must be greater than zero");
    }

    #[test]
    fn raw_duration_is_capped_at_picker_maximum() {
        assert_eq!(MAX_DURATION_SECONDS, 86_399);
        assert_eq!(validate_duration(86_399), Ok(86_399));
        assert_eq!(
            validate_duration(u64::MAX),
            Err(InputError::TooLong {
                seconds: u64::MAX,
                max: 86_399
            })
        );
        assert_eq!(TimeSelection::new(23, 59, 59).unwrap().to_duration(), Ok(86_399));
    }

    #[test]
    fn out_of_range_units_are_rejected() {
        assert_eq!(
            TimeSelection::new(24, 0, 0),
            Err(InputError::OutOfRange {
                unit: "hours",
                value: 24,
                max: 23
            })
        );
        let deserialized = TimeSelection {
            hours: 0,
            minutes: 0,
            seconds: 75,
        };
        assert!(matches!(
            deserialized.to_duration(),
            Err(InputError::OutOfRange { unit: "seconds", .. })
        ));
    }
}
