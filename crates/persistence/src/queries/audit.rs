// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit queries.

use crate::data_models::AuditEventRow;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;
use diesel::prelude::*;
use skyops_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};

fn row_to_event(row: AuditEventRow) -> Result<AuditEvent, PersistenceError> {
    let (_event_id, subject, actor_json, cause_json, action_json, before_json, after_json) = row;
    let actor: Actor = serde_json::from_str(&actor_json)?;
    let cause: Cause = serde_json::from_str(&cause_json)?;
    let action: Action = serde_json::from_str(&action_json)?;
    let before: StateSnapshot = serde_json::from_str(&before_json)?;
    let after: StateSnapshot = serde_json::from_str(&after_json)?;
    Ok(AuditEvent::new(actor, cause, action, subject, before, after))
}

/// Retrieves the ordered audit timeline for a subject
/// (e.g. `"report:42"`, `"aircraft:OD-LVA"`).
///
/// # Errors
///
/// Returns an error if events cannot be retrieved or deserialized.
pub fn get_timeline(
    conn: &mut SqliteConnection,
    subject: &str,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let rows = audit_events::table
        .filter(audit_events::subject.eq(subject))
        .order(audit_events::event_id.asc())
        .select((
            audit_events::event_id,
            audit_events::subject,
            audit_events::actor_json,
            audit_events::cause_json,
            audit_events::action_json,
            audit_events::before_snapshot_json,
            audit_events::after_snapshot_json,
        ))
        .load::<AuditEventRow>(conn)?;
    rows.into_iter().map(row_to_event).collect()
}
