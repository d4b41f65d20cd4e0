//! Aggregate presence metrics for one session.

use serde::Serialize;
use std::collections::HashSet;

use super::{ActivityAction, ActivityRecord};
use crate::domain::foundation::{Timestamp, UserId};

/// One join or leave in the presence timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub user_id: UserId,
    pub action: ActivityAction,
    pub at: Timestamp,
}

/// Presence metrics derived from the activity log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresenceMetrics {
    pub unique_participants: usize,
    pub total_joins: usize,
    pub total_leaves: usize,
    /// Mean over leave records that carry a duration.
    pub average_duration_seconds: Option<f64>,
    pub max_duration_seconds: Option<i64>,
    /// Joins and leaves in chronological order.
    pub timeline: Vec<TimelineEntry>,
}

impl PresenceMetrics {
    /// Aggregates records given in insertion order.
    pub fn from_records(records: &[ActivityRecord]) -> Self {
        let unique: HashSet<&UserId> = records.iter().map(|r| &r.user_id).collect();
        let total_joins = records
            .iter()
            .filter(|r| r.action == ActivityAction::Join)
            .count();
        let durations: Vec<i64> = records
            .iter()
            .filter(|r| r.action == ActivityAction::Leave)
            .filter_map(|r| r.duration_seconds)
            .collect();
        let total_leaves = records
            .iter()
            .filter(|r| r.action == ActivityAction::Leave)
            .count();

        let average_duration_seconds = (!durations.is_empty())
            .then(|| durations.iter().sum::<i64>() as f64 / durations.len() as f64);

        let mut timeline: Vec<TimelineEntry> = records
            .iter()
            .filter(|r| matches!(r.action, ActivityAction::Join | ActivityAction::Leave))
            .map(|r| TimelineEntry {
                user_id: r.user_id.clone(),
                action: r.action,
                at: r.occurred_at,
            })
            .collect();
        // stable: equal timestamps keep insertion order
        timeline.sort_by_key(|entry| entry.at);

        Self {
            unique_participants: unique.len(),
            total_joins,
            total_leaves,
            average_duration_seconds,
            max_duration_seconds: durations.iter().copied().max(),
            timeline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::domain::presence::NewActivity;

    fn record(user: &str, action: ActivityAction, last_join: Option<Timestamp>, at: Timestamp) -> ActivityRecord {
        ActivityRecord::record(
            NewActivity {
                session_id: SessionId::new(),
                user_id: UserId::new(user).unwrap(),
                action,
                action_value: None,
                device_info: None,
                ip_address: None,
            },
            last_join,
            at,
        )
    }

    #[test]
    fn empty_log_has_zero_counts() {
        let metrics = PresenceMetrics::from_records(&[]);
        assert_eq!(metrics.unique_participants, 0);
        assert_eq!(metrics.average_duration_seconds, None);
        assert_eq!(metrics.max_duration_seconds, None);
        assert!(metrics.timeline.is_empty());
    }

    #[test]
    fn aggregates_counts_and_durations() {
        let t = Timestamp::now();
        let log = vec![
            record("ana", ActivityAction::Join, None, t),
            record("bob", ActivityAction::Join, None, t.plus_secs(10)),
            record("ana", ActivityAction::Chat, None, t.plus_secs(20)),
            record("ana", ActivityAction::Leave, Some(t), t.plus_secs(60)),
            record("bob", ActivityAction::Leave, Some(t.plus_secs(10)), t.plus_secs(130)),
            record("cal", ActivityAction::Leave, None, t.plus_secs(140)),
        ];
        let metrics = PresenceMetrics::from_records(&log);

        assert_eq!(metrics.unique_participants, 3);
        assert_eq!(metrics.total_joins, 2);
        assert_eq!(metrics.total_leaves, 3);
        assert_eq!(metrics.average_duration_seconds, Some(90.0));
        assert_eq!(metrics.max_duration_seconds, Some(120));
    }

    #[test]
    fn timeline_is_chronological_and_excludes_other_actions() {
        let t = Timestamp::now();
        let log = vec![
            record("bob", ActivityAction::Leave, None, t.plus_secs(30)),
            record("ana", ActivityAction::Join, None, t),
            record("ana", ActivityAction::HandRaise, None, t.plus_secs(5)),
            record("bob", ActivityAction::Join, None, t.plus_secs(10)),
        ];
        let metrics = PresenceMetrics::from_records(&log);
        let order: Vec<_> = metrics
            .timeline
            .iter()
            .map(|e| (e.user_id.as_str().to_string(), e.action))
            .collect();
        assert_eq!(
            order,
            vec![
                ("ana".to_string(), ActivityAction::Join),
                ("bob".to_string(), ActivityAction::Join),
                ("bob".to_string(), ActivityAction::Leave),
            ]
        );
    }
}
