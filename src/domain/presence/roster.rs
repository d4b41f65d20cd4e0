//! Active-participant derivation.
//!
//! A user is active when they have joined at least once and their most
//! recent record is anything other than `leave`. Records sharing a
//! timestamp are ordered by insertion, so the later write wins.

use std::collections::HashMap;

use super::{ActivityAction, ActivityRecord};
use crate::domain::foundation::{Timestamp, UserId};

/// Per-user summary of the activity log, as produced by the log port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantActivity {
    pub user_id: UserId,
    /// Earliest `join`, absent if the user never joined.
    pub first_joined_at: Option<Timestamp>,
    pub latest_action: ActivityAction,
    pub latest_at: Timestamp,
}

impl ParticipantActivity {
    pub fn is_active(&self) -> bool {
        self.first_joined_at.is_some() && self.latest_action != ActivityAction::Leave
    }
}

/// Summarizes records given in insertion order.
pub fn derive_roster(records: &[ActivityRecord]) -> Vec<ParticipantActivity> {
    let mut by_user: HashMap<&UserId, ParticipantActivity> = HashMap::new();

    for record in records {
        let joined_at = (record.action == ActivityAction::Join).then_some(record.occurred_at);
        by_user
            .entry(&record.user_id)
            .and_modify(|summary| {
                if let Some(at) = joined_at {
                    summary.first_joined_at = Some(summary.first_joined_at.map_or(at, |f| f.min(at)));
                }
                if !record.occurred_at.is_before(&summary.latest_at) {
                    summary.latest_action = record.action;
                    summary.latest_at = record.occurred_at;
                }
            })
            .or_insert_with(|| ParticipantActivity {
                user_id: record.user_id.clone(),
                first_joined_at: joined_at,
                latest_action: record.action,
                latest_at: record.occurred_at,
            });
    }

    by_user.into_values().collect()
}

/// Active users ordered by first join, then user id.
///
/// The order is what breakout auto-assignment iterates, so it must be
/// stable across calls.
pub fn active_participants(summaries: Vec<ParticipantActivity>) -> Vec<UserId> {
    let mut active: Vec<_> = summaries.into_iter().filter(|s| s.is_active()).collect();
    active.sort_by(|a, b| {
        a.first_joined_at
            .cmp(&b.first_joined_at)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    active.into_iter().map(|s| s.user_id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::domain::presence::NewActivity;
    use proptest::prelude::*;

    fn record(user: &str, action: ActivityAction, at: Timestamp) -> ActivityRecord {
        ActivityRecord::record(
            NewActivity {
                session_id: SessionId::new(),
                user_id: UserId::new(user).unwrap(),
                action,
                action_value: None,
                device_info: None,
                ip_address: None,
            },
            None,
            at,
        )
    }

    fn active_ids(records: &[ActivityRecord]) -> Vec<String> {
        active_participants(derive_roster(records))
            .into_iter()
            .map(|u| u.to_string())
            .collect()
    }

    #[test]
    fn latest_leave_makes_user_inactive() {
        let t = Timestamp::now();
        let log = vec![
            record("ana", ActivityAction::Join, t),
            record("ana", ActivityAction::Chat, t.plus_secs(5)),
            record("ana", ActivityAction::Leave, t.plus_secs(10)),
        ];
        assert!(active_ids(&log).is_empty());
    }

    #[test]
    fn rejoin_after_leave_is_active_again() {
        let t = Timestamp::now();
        let log = vec![
            record("ana", ActivityAction::Join, t),
            record("ana", ActivityAction::Leave, t.plus_secs(10)),
            record("ana", ActivityAction::Join, t.plus_secs(20)),
        ];
        assert_eq!(active_ids(&log), vec!["ana"]);
    }

    #[test]
    fn users_who_never_joined_are_not_active() {
        let t = Timestamp::now();
        let log = vec![record("lurker", ActivityAction::Chat, t)];
        assert!(active_ids(&log).is_empty());
    }

    #[test]
    fn out_of_order_inserts_use_timestamps() {
        let t = Timestamp::now();
        let log = vec![
            record("ana", ActivityAction::Join, t.plus_secs(20)),
            record("ana", ActivityAction::Leave, t.plus_secs(10)),
        ];
        assert_eq!(active_ids(&log), vec!["ana"]);
    }

    #[test]
    fn same_timestamp_later_insert_wins() {
        let t = Timestamp::now();
        let log = vec![
            record("ana", ActivityAction::Join, t),
            record("ana", ActivityAction::Leave, t),
        ];
        assert!(active_ids(&log).is_empty());
    }

    #[test]
    fn ordered_by_first_join_then_id() {
        let t = Timestamp::now();
        let log = vec![
            record("zed", ActivityAction::Join, t),
            record("bob", ActivityAction::Join, t.plus_secs(1)),
            record("amy", ActivityAction::Join, t.plus_secs(1)),
            record("zed", ActivityAction::Camera, t.plus_secs(30)),
        ];
        assert_eq!(active_ids(&log), vec!["zed", "amy", "bob"]);
    }

    fn action_strategy() -> impl Strategy<Value = ActivityAction> {
        prop_oneof![
            Just(ActivityAction::Join),
            Just(ActivityAction::Leave),
            Just(ActivityAction::Chat),
            Just(ActivityAction::Microphone),
        ]
    }

    proptest! {
        #[test]
        fn latest_record_decides_presence(
            events in prop::collection::vec((0usize..4, action_strategy(), 0i64..50), 0..40)
        ) {
            let base = Timestamp::now();
            let users = ["u0", "u1", "u2", "u3"];
            let log: Vec<_> = events
                .iter()
                .map(|(u, action, offset)| record(users[*u], *action, base.plus_secs(*offset)))
                .collect();

            let derived: std::collections::BTreeSet<String> = active_ids(&log).into_iter().collect();

            let mut expected = std::collections::BTreeSet::new();
            for user in users {
                let mine: Vec<_> = log.iter().enumerate().filter(|(_, r)| r.user_id.as_str() == user).collect();
                let joined = mine.iter().any(|(_, r)| r.action == ActivityAction::Join);
                let latest = mine.iter().max_by_key(|(i, r)| (r.occurred_at, *i));
                if let Some((_, latest)) = latest {
                    if joined && latest.action != ActivityAction::Leave {
                        expected.insert(user.to_string());
                    }
                }
            }

            prop_assert_eq!(derived, expected);
        }
    }
}
