//! Write-time moderation gate.
//!
//! Decides whether a new submission is published immediately or held for an
//! operator. The decision is a pure function of the submission metadata and
//! the full set of existing entries.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::models::{Entry, Submission};

/// Why a submission was held back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldReason {
    /// Some entry is already waiting for approval
    PendingBacklog,
    /// Too many entries inside the trailing velocity window
    HighVelocity,
    /// Same address already posted on this UTC calendar day
    RepeatSubmitter,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModerationDecision {
    pub reasons: Vec<HoldReason>,
}

impl ModerationDecision {
    pub fn needs_approval(&self) -> bool {
        !self.reasons.is_empty()
    }
}

/// Tunables for the velocity check
#[derive(Debug, Clone, Copy)]
pub struct ModerationPolicy {
    pub velocity_window: Duration,
    /// Inclusive: this many entries in the window triggers a hold
    pub velocity_threshold: usize,
}

impl Default for ModerationPolicy {
    fn default() -> Self {
        Self {
            velocity_window: Duration::hours(12),
            velocity_threshold: 5,
        }
    }
}

impl ModerationPolicy {
    /// Run every check and collect the ones that fired
    pub fn evaluate(&self, submission: &Submission<'_>, existing: &[Entry]) -> ModerationDecision {
        let mut reasons = Vec::new();

        if existing.iter().any(|e| e.needs_approval) {
            reasons.push(HoldReason::PendingBacklog);
        }

        if self.recent_count(submission.timestamp, existing) >= self.velocity_threshold {
            reasons.push(HoldReason::HighVelocity);
        }

        if posted_same_day(submission, existing) {
            reasons.push(HoldReason::RepeatSubmitter);
        }

        ModerationDecision { reasons }
    }

    pub fn decide(&self, submission: &Submission<'_>, existing: &[Entry]) -> bool {
        self.evaluate(submission, existing).needs_approval()
    }

    /// Entries created in `[now - window, now]`. Unparseable timestamps never count.
    /// A window reaching past the representable range has no lower bound.
    fn recent_count(&self, now: DateTime<Utc>, existing: &[Entry]) -> usize {
        let window_start = now.checked_sub_signed(self.velocity_window);
        existing
            .iter()
            .filter_map(Entry::created_at)
            .filter(|ts| window_start.map_or(true, |start| *ts >= start) && *ts <= now)
            .count()
    }
}

// Calendar-date equality in UTC, deliberately not a rolling 24h window.
fn posted_same_day(submission: &Submission<'_>, existing: &[Entry]) -> bool {
    let today = submission.timestamp.date_naive();
    existing.iter().any(|e| {
        e.ip == submission.ip
            && e.created_at()
                .map(|ts| ts.date_naive() == today)
                .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guestbook::models::format_timestamp;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, h, m, 0).unwrap()
    }

    fn entry(ip: &str, ts: DateTime<Utc>) -> Entry {
        Entry::new("n".into(), "r".into(), ip.into(), ts)
    }

    fn submission(ip: &str, ts: DateTime<Utc>) -> Submission<'_> {
        Submission { ip, timestamp: ts }
    }

    #[test]
    fn empty_set_publishes() {
        let policy = ModerationPolicy::default();
        let decision = policy.evaluate(&submission("1.1.1.1", at(12, 0)), &[]);
        assert!(!decision.needs_approval());
        assert!(decision.reasons.is_empty());
    }

    #[test]
    fn pending_backlog_holds_regardless_of_age() {
        let policy = ModerationPolicy::default();
        let mut old = entry("9.9.9.9", Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
        old.needs_approval = true;

        let decision = policy.evaluate(&submission("1.1.1.1", at(12, 0)), &[old]);
        assert_eq!(decision.reasons, vec![HoldReason::PendingBacklog]);
    }

    #[test]
    fn five_recent_entries_trigger_velocity() {
        let policy = ModerationPolicy::default();
        let existing: Vec<Entry> = (0..5)
            .map(|i| entry(&format!("10.0.0.{}", i), at(11, i)))
            .collect();

        assert!(policy.decide(&submission("1.1.1.1", at(12, 0)), &existing));
        assert!(!policy.decide(&submission("1.1.1.1", at(12, 0)), &existing[..4]));
    }

    #[test]
    fn velocity_window_is_trailing_twelve_hours() {
        let policy = ModerationPolicy::default();
        let now = at(23, 0);
        let mut existing: Vec<Entry> = (0..4).map(|i| entry(&format!("10.0.0.{}", i), at(20, i))).collect();

        // Exactly at the window start still counts
        existing.push(entry("10.0.0.9", now - Duration::hours(12)));
        assert!(policy.decide(&submission("1.1.1.1", now), &existing));

        existing.pop();
        existing.push(entry("10.0.0.9", now - Duration::hours(12) - Duration::seconds(1)));
        assert!(!policy.decide(&submission("1.1.1.1", now), &existing));
    }

    #[test]
    fn unparseable_timestamps_do_not_count() {
        let policy = ModerationPolicy::default();
        let mut existing: Vec<Entry> = (0..4).map(|i| entry(&format!("10.0.0.{}", i), at(11, i))).collect();
        existing.push(Entry {
            timestamp: "not a date".into(),
            ip: "1.1.1.1".into(),
            ..Default::default()
        });
        existing.push(Entry {
            ip: "1.1.1.1".into(),
            ..Default::default()
        });

        assert!(!policy.decide(&submission("1.1.1.1", at(12, 0)), &existing));
    }

    #[test]
    fn same_ip_same_utc_day_holds() {
        let policy = ModerationPolicy::default();
        let existing = vec![entry("127.0.0.1", at(0, 5))];

        let decision = policy.evaluate(&submission("127.0.0.1", at(23, 55)), &existing);
        assert_eq!(decision.reasons, vec![HoldReason::RepeatSubmitter]);
    }

    #[test]
    fn same_ip_previous_day_publishes_even_within_24h() {
        let policy = ModerationPolicy::default();
        let yesterday_late = Utc.with_ymd_and_hms(2024, 3, 14, 23, 50, 0).unwrap();
        let existing = vec![entry("127.0.0.1", yesterday_late)];

        assert!(!policy.decide(&submission("127.0.0.1", at(0, 10)), &existing));
    }

    #[test]
    fn other_ip_same_day_publishes() {
        let policy = ModerationPolicy::default();
        let existing = vec![entry("10.1.1.1", at(8, 0))];
        assert!(!policy.decide(&submission("127.0.0.1", at(9, 0)), &existing));
    }

    #[test]
    fn collects_every_triggered_reason() {
        let policy = ModerationPolicy::default();
        let mut existing: Vec<Entry> = (0..5).map(|i| entry("127.0.0.1", at(10, i))).collect();
        existing[0].needs_approval = true;

        let decision = policy.evaluate(&submission("127.0.0.1", at(12, 0)), &existing);
        assert_eq!(
            decision.reasons,
            vec![
                HoldReason::PendingBacklog,
                HoldReason::HighVelocity,
                HoldReason::RepeatSubmitter
            ]
        );
    }

    #[test]
    fn custom_threshold_is_respected() {
        let policy = ModerationPolicy {
            velocity_window: Duration::hours(1),
            velocity_threshold: 2,
        };
        let existing = vec![entry("10.0.0.1", at(11, 30)), entry("10.0.0.2", at(11, 45))];
        assert!(policy.decide(&submission("1.1.1.1", at(12, 0)), &existing));
        assert_eq!(format_timestamp(at(11, 30)), "2024-03-15T11:30:00.000Z");
    }

    #[test]
    fn window_past_representable_range_counts_everything_before_now() {
        let policy = ModerationPolicy {
            velocity_window: Duration::hours(2_500_000_000),
            velocity_threshold: 2,
        };
        let existing = vec![
            entry("10.0.0.1", Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap()),
            entry("10.0.0.2", Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()),
        ];

        assert!(policy.decide(&submission("1.1.1.1", at(12, 0)), &existing));
        assert!(!policy.decide(&submission("1.1.1.1", at(12, 0)), &existing[..1]));
    }
}
