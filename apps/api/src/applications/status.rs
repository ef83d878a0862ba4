use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Saved,
    Applied,
    Interviewing,
    Offer,
    Hired,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 7] = [
        Self::Saved,
        Self::Applied,
        Self::Interviewing,
        Self::Offer,
        Self::Hired,
        Self::Rejected,
        Self::Withdrawn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::Applied => "applied",
            Self::Interviewing => "interviewing",
            Self::Offer => "offer",
            Self::Hired => "hired",
            Self::Rejected => "rejected",
            Self::Withdrawn => "withdrawn",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Hired | Self::Rejected | Self::Withdrawn)
    }

    /// Statuses that count as a response from the employer.
    pub fn is_response(self) -> bool {
        matches!(self, Self::Interviewing | Self::Offer | Self::Hired)
    }

    pub fn can_transition_to(self, next: Self) -> bool {
        use ApplicationStatus::*;
        matches!(
            (self, next),
            (Saved, Applied | Withdrawn)
                | (Applied, Interviewing | Offer | Rejected | Withdrawn)
                | (Interviewing, Interviewing | Offer | Rejected | Withdrawn)
                | (Offer, Hired | Rejected | Withdrawn)
        )
    }

    /// Conflict when `next` is not reachable from `self`.
    pub fn transition(self, next: Self) -> Result<Self, AppError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppError::Conflict(format!(
                "cannot move application from {self} to {next}"
            )))
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| AppError::Validation(format!("unknown application status '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ApplicationStatus::*;

    #[test]
    fn test_allowed_transitions() {
        assert!(Saved.can_transition_to(Applied));
        assert!(Applied.can_transition_to(Offer));
        assert!(Interviewing.can_transition_to(Interviewing));
        assert!(Offer.can_transition_to(Hired));
    }

    #[test]
    fn test_rejected_transitions() {
        assert!(!Saved.can_transition_to(Interviewing));
        assert!(!Applied.can_transition_to(Saved));
        assert!(!Offer.can_transition_to(Interviewing));
    }

    #[test]
    fn test_terminal_states_are_final() {
        for from in [Hired, Rejected, Withdrawn] {
            assert!(from.is_terminal());
            for to in ApplicationStatus::ALL {
                assert!(!from.can_transition_to(to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_transition_conflict() {
        let err = Hired.transition(Applied).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(Saved.transition(Applied).unwrap(), Applied);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("Interviewing".parse::<ApplicationStatus>().unwrap(), Interviewing);
        assert!("ghosted".parse::<ApplicationStatus>().is_err());
        assert_eq!(Withdrawn.to_string(), "withdrawn");
    }
}
