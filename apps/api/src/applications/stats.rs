use std::collections::BTreeMap;

use serde::Serialize;

use crate::applications::status::ApplicationStatus;

/// What the stats need to know about one application.
#[derive(Debug, Clone, Copy)]
pub struct StatusSummary {
    pub status: ApplicationStatus,
    /// The application left `saved` for `applied` at some point.
    pub submitted: bool,
    /// The history reached interviewing, offer or hired.
    pub reached_interview: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ApplicationStats {
    pub counts: BTreeMap<&'static str, u64>,
    pub total: u64,
    pub active: u64,
    pub submitted: u64,
    /// Share (0.0–1.0) of submitted applications that got a response.
    pub response_rate: f64,
}

pub fn compute_stats(apps: &[StatusSummary]) -> ApplicationStats {
    let mut counts: BTreeMap<&'static str, u64> = ApplicationStatus::ALL
        .iter()
        .map(|s| (s.as_str(), 0))
        .collect();
    let mut active = 0;
    let mut submitted = 0;
    let mut responded = 0;

    for app in apps {
        *counts.entry(app.status.as_str()).or_default() += 1;
        if !app.status.is_terminal() {
            active += 1;
        }
        if app.submitted {
            submitted += 1;
            // A rejection only counts when it came after an interview.
            if app.status.is_response() || app.reached_interview {
                responded += 1;
            }
        }
    }

    let response_rate = if submitted == 0 {
        0.0
    } else {
        responded as f64 / submitted as f64
    };

    ApplicationStats {
        counts,
        total: apps.len() as u64,
        active,
        submitted,
        response_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ApplicationStatus::*;

    fn app(status: ApplicationStatus, submitted: bool, reached_interview: bool) -> StatusSummary {
        StatusSummary {
            status,
            submitted,
            reached_interview,
        }
    }

    #[test]
    fn test_empty_stats() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.response_rate, 0.0);
        assert_eq!(stats.counts.len(), 7);
        assert!(stats.counts.values().all(|c| *c == 0));
    }

    #[test]
    fn test_counts_and_response_rate() {
        let apps = [
            app(Saved, false, false),
            app(Applied, true, false),
            app(Interviewing, true, true),
            app(Rejected, true, true),  // rejected after interview
            app(Rejected, true, false), // rejected straight away
            app(Withdrawn, false, false),
        ];
        let stats = compute_stats(&apps);
        assert_eq!(stats.total, 6);
        assert_eq!(stats.active, 3);
        assert_eq!(stats.submitted, 4);
        assert_eq!(stats.counts["rejected"], 2);
        assert!((stats.response_rate - 0.5).abs() < 1e-9);
    }
}
