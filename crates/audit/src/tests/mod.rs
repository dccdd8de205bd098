// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::*;

#[test]
fn test_actor_creation_requires_all_fields() {
    let actor: Actor = Actor::new(String::from("pilot-12"), ActorKind::Pilot);

    assert_eq!(actor.id, "pilot-12");
    assert_eq!(actor.kind, ActorKind::Pilot);
}

#[test]
fn test_system_actor_uses_fixed_name() {
    let actor: Actor = Actor::system("bid-reaper");

    assert_eq!(actor.id, "bid-reaper");
    assert_eq!(actor.kind, ActorKind::System);
}

#[test]
fn test_actor_kind_string_representation() {
    assert_eq!(ActorKind::Pilot.as_str(), "pilot");
    assert_eq!(ActorKind::Admin.as_str(), "admin");
    assert_eq!(ActorKind::Acars.as_str(), "acars");
    assert_eq!(ActorKind::System.as_str(), "system");
}

#[test]
fn test_cause_creation_requires_all_fields() {
    let cause: Cause = Cause::new(String::from("req-456"), String::from("Pilot request"));

    assert_eq!(cause.id, "req-456");
    assert_eq!(cause.description, "Pilot request");
}

#[test]
fn test_action_creation_with_details() {
    let action: Action = Action::new(
        String::from("SettleReport"),
        Some(String::from("net profit 4200")),
    );

    assert_eq!(action.name, "SettleReport");
    assert_eq!(action.details, Some(String::from("net profit 4200")));
}

#[test]
fn test_audit_event_captures_subject_and_snapshots() {
    let event: AuditEvent = AuditEvent::new(
        Actor::new(String::from("pilot-3"), ActorKind::Pilot),
        Cause::new(String::from("req-1"), String::from("Bid creation")),
        Action::new(String::from("CreateBid"), None),
        String::from("bid:7"),
        StateSnapshot::new(String::from("none")),
        StateSnapshot::new(String::from("bid:7 status=active")),
    );

    assert_eq!(event.subject, "bid:7");
    assert_eq!(event.before.data, "none");
    assert_eq!(event.after.data, "bid:7 status=active");
}

#[test]
fn test_audit_event_round_trips_through_json() {
    let event: AuditEvent = AuditEvent::new(
        Actor::new(String::from("acars"), ActorKind::Acars),
        Cause::new(String::from("sample-9"), String::from("Landing detected")),
        Action::new(String::from("FileReport"), None),
        String::from("report:42"),
        StateSnapshot::new(String::from("session:5 phase=in_flight")),
        StateSnapshot::new(String::from("report:42 status=pending")),
    );

    let json = serde_json::to_string(&event).unwrap();
    let parsed: AuditEvent = serde_json::from_str(&json).unwrap();

    assert_eq!(event, parsed);
}

#[test]
fn test_annotation_carries_actor_and_note() {
    let annotation: Annotation = Annotation::new(
        Actor::new(String::from("admin-1"), ActorKind::Admin),
        String::from("Confirmed duplicate of report 41, keeping both"),
    );

    assert_eq!(annotation.actor.kind, ActorKind::Admin);
    assert!(annotation.note.contains("report 41"));
}
