//! Planning a breakout round: room creation and participant assignment.

use std::collections::{BTreeMap, HashSet};

use super::{BreakoutParticipant, BreakoutRoom};
use crate::domain::foundation::{ClassroomError, SessionId, Timestamp, UserId};

/// Upper bound on rooms in one round.
pub const MAX_ROOMS_PER_ROUND: usize = 50;

/// How participants are placed into the new rooms.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AssignmentMode {
    /// Rooms start empty; participants join on their own.
    #[default]
    None,
    /// Round-robin over the active participants.
    Auto,
    /// Explicit user lists keyed by room index.
    Manual(BTreeMap<usize, Vec<UserId>>),
}

/// Instructor request to open a round.
#[derive(Debug, Clone, Default)]
pub struct RoundRequest {
    pub room_count: usize,
    pub names: Vec<String>,
    pub mode: AssignmentMode,
}

/// Rooms and initial participant rows for a new round.
#[derive(Debug, Clone)]
pub struct BreakoutRound {
    pub rooms: Vec<BreakoutRoom>,
    pub participants: Vec<BreakoutParticipant>,
}

/// Builds a round from a request and the current active participants.
///
/// `active` must already be in a stable order; auto-assignment deals users
/// out in that order. Manual lists are filtered to active users, room
/// indexes outside the round are ignored, and a user listed in several
/// rooms lands in the lowest-indexed one.
pub fn plan_round(
    session_id: SessionId,
    request: RoundRequest,
    active: &[UserId],
    now: Timestamp,
) -> Result<BreakoutRound, ClassroomError> {
    if request.room_count == 0 || request.room_count > MAX_ROOMS_PER_ROUND {
        return Err(ClassroomError::validation(
            "room_count",
            format!("Room count must be between 1 and {}", MAX_ROOMS_PER_ROUND),
        ));
    }

    let rooms: Vec<BreakoutRoom> = (0..request.room_count)
        .map(|i| {
            let name = request
                .names
                .get(i)
                .map(|n| n.trim())
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Breakout Room {}", i + 1));
            BreakoutRoom::open(session_id, i as i32, name, now)
        })
        .collect();

    let participants = match request.mode {
        AssignmentMode::None => Vec::new(),
        AssignmentMode::Auto => active
            .iter()
            .enumerate()
            .map(|(i, user)| BreakoutParticipant::enter(&rooms[i % rooms.len()], user.clone(), now))
            .collect(),
        AssignmentMode::Manual(assignments) => {
            let active: HashSet<&UserId> = active.iter().collect();
            let mut placed: HashSet<UserId> = HashSet::new();
            let mut rows = Vec::new();
            for (index, users) in assignments {
                let Some(room) = rooms.get(index) else {
                    continue;
                };
                for user in users {
                    if active.contains(&user) && placed.insert(user.clone()) {
                        rows.push(BreakoutParticipant::enter(room, user, now));
                    }
                }
            }
            rows
        }
    };

    Ok(BreakoutRound { rooms, participants })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn users(ids: &[&str]) -> Vec<UserId> {
        ids.iter().map(|id| UserId::new(*id).unwrap()).collect()
    }

    fn occupants(round: &BreakoutRound, room: usize) -> Vec<String> {
        round
            .participants
            .iter()
            .filter(|p| p.room_id == round.rooms[room].id)
            .map(|p| p.user_id.to_string())
            .collect()
    }

    #[test]
    fn five_users_in_two_rooms_split_three_and_two() {
        let round = plan_round(
            SessionId::new(),
            RoundRequest {
                room_count: 2,
                mode: AssignmentMode::Auto,
                ..Default::default()
            },
            &users(&["a", "b", "c", "d", "e"]),
            Timestamp::now(),
        )
        .unwrap();

        assert_eq!(occupants(&round, 0), vec!["a", "c", "e"]);
        assert_eq!(occupants(&round, 1), vec!["b", "d"]);
    }

    #[test]
    fn default_names_are_numbered_from_one() {
        let round = plan_round(
            SessionId::new(),
            RoundRequest {
                room_count: 3,
                names: vec!["Debate".to_string(), "  ".to_string()],
                mode: AssignmentMode::None,
            },
            &[],
            Timestamp::now(),
        )
        .unwrap();

        let names: Vec<_> = round.rooms.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Debate", "Breakout Room 2", "Breakout Room 3"]);
        assert!(round.participants.is_empty());
    }

    #[test]
    fn room_count_must_be_in_range() {
        for count in [0, MAX_ROOMS_PER_ROUND + 1] {
            let result = plan_round(
                SessionId::new(),
                RoundRequest {
                    room_count: count,
                    ..Default::default()
                },
                &[],
                Timestamp::now(),
            );
            assert!(matches!(result, Err(ClassroomError::ValidationFailed { .. })));
        }
    }

    #[test]
    fn manual_assignment_drops_inactive_and_out_of_range() {
        let mut assignments = BTreeMap::new();
        assignments.insert(0, users(&["a", "ghost"]));
        assignments.insert(1, users(&["b"]));
        assignments.insert(7, users(&["c"]));

        let round = plan_round(
            SessionId::new(),
            RoundRequest {
                room_count: 2,
                names: vec![],
                mode: AssignmentMode::Manual(assignments),
            },
            &users(&["a", "b", "c"]),
            Timestamp::now(),
        )
        .unwrap();

        assert_eq!(occupants(&round, 0), vec!["a"]);
        assert_eq!(occupants(&round, 1), vec!["b"]);
        assert_eq!(round.participants.len(), 2);
    }

    #[test]
    fn manual_assignment_places_duplicates_in_first_room() {
        let mut assignments = BTreeMap::new();
        assignments.insert(1, users(&["a"]));
        assignments.insert(0, users(&["a", "a"]));

        let round = plan_round(
            SessionId::new(),
            RoundRequest {
                room_count: 2,
                names: vec![],
                mode: AssignmentMode::Manual(assignments),
            },
            &users(&["a"]),
            Timestamp::now(),
        )
        .unwrap();

        assert_eq!(occupants(&round, 0), vec!["a"]);
        assert!(occupants(&round, 1).is_empty());
    }

    proptest! {
        #[test]
        fn auto_assignment_is_balanced(user_count in 0usize..60, room_count in 1usize..=MAX_ROOMS_PER_ROUND) {
            let active: Vec<UserId> = (0..user_count)
                .map(|i| UserId::new(format!("user-{:02}", i)).unwrap())
                .collect();
            let round = plan_round(
                SessionId::new(),
                RoundRequest { room_count, names: vec![], mode: AssignmentMode::Auto },
                &active,
                Timestamp::now(),
            ).unwrap();

            prop_assert_eq!(round.rooms.len(), room_count);
            prop_assert_eq!(round.participants.len(), user_count);

            let sizes: Vec<usize> = round.rooms.iter()
                .map(|room| round.participants.iter().filter(|p| p.room_id == room.id).count())
                .collect();
            let max = sizes.iter().copied().max().unwrap_or(0);
            let min = sizes.iter().copied().min().unwrap_or(0);
            prop_assert!(max - min <= 1);
        }
    }
}
