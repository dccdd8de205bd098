// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit mutations.

use crate::data_models::{NewAnnotation, NewAuditEvent};
use crate::diesel_schema::{audit_events, report_annotations};
use crate::error::PersistenceError;
use diesel::prelude::*;
use skyops_audit::{Annotation, AuditEvent};

/// Persists an audit event and returns its id.
///
/// # Errors
///
/// Returns an error if serialization or the insert fails.
pub fn insert_audit_event(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    let row = NewAuditEvent {
        subject: event.subject.clone(),
        actor_json: serde_json::to_string(&event.actor)?,
        cause_json: serde_json::to_string(&event.cause)?,
        action_json: serde_json::to_string(&event.action)?,
        before_snapshot_json: serde_json::to_string(&event.before)?,
        after_snapshot_json: serde_json::to_string(&event.after)?,
        created_at: created_at.to_owned(),
    };
    let event_id = diesel::insert_into(audit_events::table)
        .values(&row)
        .returning(audit_events::event_id)
        .get_result::<i64>(conn)?;
    Ok(event_id)
}

/// Attaches an annotation to a (typically terminal) report.
///
/// # Errors
///
/// Returns an error if serialization or the insert fails.
pub fn insert_annotation(
    conn: &mut SqliteConnection,
    report_id: i64,
    annotation: &Annotation,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    let row = NewAnnotation {
        report_id,
        actor_json: serde_json::to_string(&annotation.actor)?,
        note: annotation.note.clone(),
        created_at: created_at.to_owned(),
    };
    let annotation_id = diesel::insert_into(report_annotations::table)
        .values(&row)
        .returning(report_annotations::annotation_id)
        .get_result::<i64>(conn)?;
    Ok(annotation_id)
}
