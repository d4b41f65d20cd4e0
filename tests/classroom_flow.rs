//! End-to-end classroom flows over the in-memory adapters.
//!
//! Verifies:
//! 1. A scheduled session is started by reconciliation once its start time passes
//! 2. Reconciliation is idempotent
//! 3. Registration is idempotent and promoted to attended on join
//! 4. Leave records carry the time since the matching join
//! 5. Auto-assigned breakout rounds deal participants round-robin
//! 6. Single and multiple choice poll response rules
//! 7. Ending a session that never started is rejected

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use live_classroom::adapters::events::InMemoryEventBus;
use live_classroom::adapters::http::{ApiHandlers, ClassroomPorts};
use live_classroom::adapters::memory::{InMemoryStore, ManualClock};
use live_classroom::adapters::security::{Argon2Cost, Argon2PasswordHasher};
use live_classroom::application::{
    CreatePollCommand, CreateSessionCommand, EndSessionCommand, GetSessionQuery, JoinRoomCommand,
    OpenRoundCommand, RecordActivityCommand, RecordOutcome, RegisterCommand,
    RespondToPollCommand,
};
use live_classroom::domain::breakout::{AssignmentMode, RoundRequest};
use live_classroom::domain::foundation::{
    ClassroomError, CommandMetadata, CourseId, Role, SessionId, SessionStatus, Timestamp, UserId,
};
use live_classroom::domain::poll::{OptionDraft, Poll};
use live_classroom::domain::presence::ActivityAction;
use live_classroom::domain::registration::RegistrationStatus;
use live_classroom::domain::session::Session;

// =============================================================================
// Test Infrastructure
// =============================================================================

const INSTRUCTOR: &str = "inst-1";

struct Classroom {
    store: Arc<InMemoryStore>,
    clock: Arc<ManualClock>,
    bus: Arc<InMemoryEventBus>,
    ports: ClassroomPorts,
    api: ApiHandlers,
    course: CourseId,
}

/// 2024-06-01 at the given wall-clock time, UTC.
fn at(hour: u32, minute: u32) -> Timestamp {
    Timestamp::from_date_time(
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
    )
}

fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

fn instructor() -> CommandMetadata {
    CommandMetadata::new(user(INSTRUCTOR), Role::Instructor)
}

fn student(id: &str) -> CommandMetadata {
    CommandMetadata::new(user(id), Role::Student)
}

impl Classroom {
    fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(ManualClock::new(at(12, 0)));
        let bus = Arc::new(InMemoryEventBus::new());
        let hasher = Arc::new(
            Argon2PasswordHasher::new(Argon2Cost {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            })
            .unwrap(),
        );
        let ports = ClassroomPorts::in_memory(store.clone(), hasher, bus.clone(), clock.clone());
        let api = ApiHandlers::new(&ports);

        let course = CourseId::new();
        store.add_course(course, [user(INSTRUCTOR)]);
        store.add_user(user(INSTRUCTOR), "Dr. Ines");
        for (id, name) in [("ana", "Ana"), ("bob", "Bob"), ("cal", "Cal"), ("dee", "Dee"), ("eve", "Eve")] {
            store.add_user(user(id), name);
        }

        Self {
            store,
            clock,
            bus,
            ports,
            api,
            course,
        }
    }

    async fn start_now(&self) -> Session {
        self.api
            .sessions
            .create
            .handle(
                CreateSessionCommand {
                    course_id: self.course,
                    title: "Live lecture".to_string(),
                    start_now: true,
                    ..Default::default()
                },
                instructor(),
            )
            .await
            .unwrap()
            .session
    }

    async fn register(&self, session_id: SessionId, id: &str) {
        self.api
            .sessions
            .register
            .handle(
                RegisterCommand {
                    session_id,
                    password: None,
                },
                student(id),
            )
            .await
            .unwrap();
    }

    async fn record(&self, session_id: SessionId, id: &str, action: &str) -> RecordOutcome {
        self.api
            .presence
            .record
            .handle(RecordActivityCommand {
                session_id,
                user_id: Some(user(id)),
                action: action.to_string(),
                action_value: None,
                device_info: None,
                ip_address: None,
            })
            .await
    }

    async fn create_poll(&self, session_id: SessionId, multiple: bool) -> Poll {
        self.api
            .polls
            .create
            .handle(
                CreatePollCommand {
                    session_id,
                    question: "Which topic next?".to_string(),
                    options: ["Graphs", "Trees", "Heaps"]
                        .iter()
                        .map(|text| OptionDraft {
                            text: text.to_string(),
                            order_index: None,
                        })
                        .collect(),
                    is_anonymous: false,
                    is_multiple_choice: multiple,
                },
                instructor(),
            )
            .await
            .unwrap()
    }

    async fn respond(
        &self,
        poll: &Poll,
        option: usize,
        id: &str,
    ) -> Result<(), ClassroomError> {
        self.api
            .polls
            .respond
            .handle(
                RespondToPollCommand {
                    session_id: poll.session_id,
                    poll_id: poll.id,
                    option_id: poll.options[option].id,
                },
                student(id),
            )
            .await
            .map(|_| ())
    }

    async fn status_of(&self, session_id: SessionId) -> Session {
        self.api
            .sessions
            .get
            .handle(GetSessionQuery { session_id }, instructor())
            .await
            .unwrap()
            .session
    }
}

// =============================================================================
// Session lifecycle
// =============================================================================

#[tokio::test]
async fn reconciliation_starts_session_whose_start_time_just_passed() {
    let room = Classroom::new();
    let created = room
        .api
        .sessions
        .create
        .handle(
            CreateSessionCommand {
                course_id: room.course,
                title: "Office hours".to_string(),
                session_date: Some("2024-06-01".to_string()),
                start_time: Some("11:59".to_string()),
                end_time: Some("13:00".to_string()),
                ..Default::default()
            },
            instructor(),
        )
        .await
        .unwrap()
        .session;
    assert_eq!(created.status(), SessionStatus::Scheduled);
    assert!(created.actual_start_time().is_none());

    let report = room.ports.reconciler(24).handle().await.unwrap();
    assert_eq!(report.started, 1);

    let session = room.status_of(*created.id()).await;
    assert_eq!(session.status(), SessionStatus::Active);
    assert_eq!(session.actual_start_time(), Some(at(12, 0)));
    assert!(session.actual_end_time().is_none());
}

#[tokio::test]
async fn reconciliation_twice_matches_once() {
    let room = Classroom::new();
    let session = room.start_now().await;
    room.api
        .sessions
        .create
        .handle(
            CreateSessionCommand {
                course_id: room.course,
                title: "Already over".to_string(),
                session_date: Some("2024-06-01".to_string()),
                start_time: Some("09:00".to_string()),
                end_time: Some("10:00".to_string()),
                ..Default::default()
            },
            instructor(),
        )
        .await
        .unwrap();

    let reconciler = room.ports.reconciler(24);
    let first = reconciler.handle().await.unwrap();
    assert_eq!(first.started, 1);
    assert_eq!(first.completed, 1);

    let second = reconciler.handle().await.unwrap();
    assert_eq!(second.changed(), 0);
    assert_eq!(room.status_of(*session.id()).await.status(), SessionStatus::Active);
}

#[tokio::test]
async fn ending_scheduled_session_is_invalid_transition() {
    let room = Classroom::new();
    let session = room
        .api
        .sessions
        .create
        .handle(
            CreateSessionCommand {
                course_id: room.course,
                title: "Tomorrow".to_string(),
                session_date: Some("2024-06-02".to_string()),
                start_time: Some("10:00".to_string()),
                ..Default::default()
            },
            instructor(),
        )
        .await
        .unwrap()
        .session;

    let result = room
        .api
        .sessions
        .end
        .handle(
            EndSessionCommand {
                session_id: *session.id(),
            },
            instructor(),
        )
        .await;

    assert!(matches!(result, Err(ClassroomError::InvalidTransition(_))));
    assert_eq!(room.status_of(*session.id()).await.status(), SessionStatus::Scheduled);
}

#[tokio::test]
async fn manual_end_sets_end_time_and_publishes() {
    let room = Classroom::new();
    let session = room.start_now().await;
    room.clock.advance_secs(1800);

    let ended = room
        .api
        .sessions
        .end
        .handle(
            EndSessionCommand {
                session_id: *session.id(),
            },
            instructor(),
        )
        .await
        .unwrap();

    assert_eq!(ended.status(), SessionStatus::Completed);
    assert_eq!(ended.actual_end_time(), Some(at(12, 30)));
    assert!(room.bus.has_event("session.completed.v1"));
}

// =============================================================================
// Registration and presence
// =============================================================================

#[tokio::test]
async fn registering_twice_keeps_one_registration() {
    let room = Classroom::new();
    let session = room.start_now().await;
    let cmd = RegisterCommand {
        session_id: *session.id(),
        password: None,
    };

    let first = room
        .api
        .sessions
        .register
        .handle(cmd.clone(), student("ana"))
        .await
        .unwrap();
    let second = room
        .api
        .sessions
        .register
        .handle(cmd, student("ana"))
        .await
        .unwrap();

    assert!(!first.already_registered);
    assert!(second.already_registered);
    assert_eq!(first.registration.id, second.registration.id);

    let count = room
        .api
        .sessions
        .get
        .handle(
            GetSessionQuery {
                session_id: *session.id(),
            },
            instructor(),
        )
        .await
        .unwrap()
        .participant_count;
    assert_eq!(count, 1);
}

#[tokio::test]
async fn padded_password_registers_with_the_same_padding() {
    let room = Classroom::new();
    let session = room
        .api
        .sessions
        .create
        .handle(
            CreateSessionCommand {
                course_id: room.course,
                title: "Office hours".to_string(),
                start_now: true,
                password: Some(" pw ".to_string()),
                ..Default::default()
            },
            instructor(),
        )
        .await
        .unwrap()
        .session;
    let register = |password: &str| RegisterCommand {
        session_id: *session.id(),
        password: Some(password.to_string()),
    };

    let trimmed = room
        .api
        .sessions
        .register
        .handle(register("pw"), student("bob"))
        .await;
    assert!(matches!(trimmed, Err(ClassroomError::PermissionDenied(_))));

    let result = room
        .api
        .sessions
        .register
        .handle(register(" pw "), student("ana"))
        .await
        .unwrap();
    assert!(!result.already_registered);
}

#[tokio::test]
async fn join_marks_attended_and_leave_records_duration() {
    let room = Classroom::new();
    let session = room.start_now().await;
    room.register(*session.id(), "ana").await;

    assert!(matches!(
        room.record(*session.id(), "ana", "join").await,
        RecordOutcome::Recorded(_)
    ));
    room.clock.advance_secs(90);
    let RecordOutcome::Recorded(leave) = room.record(*session.id(), "ana", "leave").await else {
        panic!("leave was dropped");
    };

    assert_eq!(leave.action, ActivityAction::Leave);
    assert_eq!(leave.duration_seconds, Some(90));

    let details = room
        .api
        .sessions
        .get
        .handle(
            GetSessionQuery {
                session_id: *session.id(),
            },
            student("ana"),
        )
        .await
        .unwrap();
    assert_eq!(details.viewer_registration, Some(RegistrationStatus::Attended));
}

#[tokio::test]
async fn unknown_action_is_dropped_silently() {
    let room = Classroom::new();
    let session = room.start_now().await;

    assert_eq!(
        room.record(*session.id(), "ana", "teleport").await,
        RecordOutcome::Dropped
    );
}

// =============================================================================
// Breakout rooms
// =============================================================================

#[tokio::test]
async fn auto_round_deals_five_participants_into_three_and_two() {
    let room = Classroom::new();
    let session = room.start_now().await;
    for id in ["ana", "bob", "cal", "dee", "eve"] {
        room.register(*session.id(), id).await;
        room.record(*session.id(), id, "join").await;
        room.clock.advance_secs(1);
    }

    let open = || OpenRoundCommand {
        session_id: *session.id(),
        request: RoundRequest {
            room_count: 2,
            names: vec![],
            mode: AssignmentMode::Auto,
        },
    };
    let rooms = room
        .api
        .breakout
        .open
        .handle(open(), instructor())
        .await
        .unwrap();

    let occupants: Vec<Vec<&str>> = rooms
        .iter()
        .map(|r| r.participants.iter().map(|p| p.user_id.as_str()).collect())
        .collect();
    assert_eq!(occupants, vec![vec!["ana", "cal", "eve"], vec!["bob", "dee"]]);

    let again = room.api.breakout.open.handle(open(), instructor()).await;
    assert!(matches!(again, Err(ClassroomError::InvalidTransition(_))));
}

#[tokio::test]
async fn joining_many_rooms_leaves_one_open_row() {
    let room = Classroom::new();
    let session = room.start_now().await;
    room.register(*session.id(), "ana").await;

    let rooms = room
        .api
        .breakout
        .open
        .handle(
            OpenRoundCommand {
                session_id: *session.id(),
                request: RoundRequest {
                    room_count: 3,
                    ..Default::default()
                },
            },
            instructor(),
        )
        .await
        .unwrap();

    for target in [0, 1, 2, 1, 1, 0] {
        room.api
            .breakout
            .join
            .handle(
                JoinRoomCommand {
                    session_id: *session.id(),
                    room_id: rooms[target].room.id,
                },
                student("ana"),
            )
            .await
            .unwrap();
        room.clock.advance_secs(5);
    }

    let open_rows: usize = {
        use live_classroom::ports::BreakoutRepository;
        let mut total = 0;
        for r in &rooms {
            total += BreakoutRepository::open_participants(room.store.as_ref(), &r.room.id)
                .await
                .unwrap()
                .len();
        }
        total
    };
    assert_eq!(open_rows, 1);
}

// =============================================================================
// Polls
// =============================================================================

#[tokio::test]
async fn single_choice_poll_rejects_second_answer() {
    let room = Classroom::new();
    let session = room.start_now().await;
    room.register(*session.id(), "ana").await;
    let poll = room.create_poll(*session.id(), false).await;

    room.respond(&poll, 0, "ana").await.unwrap();
    let second = room.respond(&poll, 1, "ana").await;

    assert!(matches!(second, Err(ClassroomError::DuplicateResponse)));
}

#[tokio::test]
async fn multiple_choice_poll_allows_distinct_options_only() {
    let room = Classroom::new();
    let session = room.start_now().await;
    room.register(*session.id(), "ana").await;
    let poll = room.create_poll(*session.id(), true).await;

    room.respond(&poll, 0, "ana").await.unwrap();
    room.respond(&poll, 2, "ana").await.unwrap();
    let repeat = room.respond(&poll, 0, "ana").await;

    assert!(matches!(repeat, Err(ClassroomError::DuplicateResponse)));
}

#[tokio::test]
async fn unregistered_student_cannot_respond() {
    let room = Classroom::new();
    let session = room.start_now().await;
    let poll = room.create_poll(*session.id(), false).await;

    let result = room.respond(&poll, 0, "bob").await;

    assert!(matches!(result, Err(ClassroomError::PermissionDenied(_))));
}
