// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit types for the flight lifecycle pipeline.
//!
//! Every successful state transition (bid created, session advanced, report
//! adjudicated, settlement applied, aircraft repaired) produces exactly one
//! audit event. Audit events are immutable once created. Terminal reports
//! accept annotations only; annotations never change the decision they
//! describe.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use serde::{Deserialize, Serialize};

/// The kind of entity performing an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    /// A pilot acting on their own bids and reports.
    Pilot,
    /// A staff member with review and fleet authority.
    Admin,
    /// The tracking client submitting telemetry and automatic reports.
    Acars,
    /// Internal machinery: the expiry sweep, the idle-session reaper.
    System,
}

impl ActorKind {
    /// Returns the string representation of this actor kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pilot => "pilot",
            Self::Admin => "admin",
            Self::Acars => "acars",
            Self::System => "system",
        }
    }
}

/// The entity that initiated a state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The unique identifier for this actor (pilot id, admin id, or a
    /// fixed name for system actors such as `"bid-reaper"`).
    pub id: String,
    /// The kind of actor.
    pub kind: ActorKind,
}

impl Actor {
    /// Creates a new `Actor`.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `kind` - The kind of actor
    #[must_use]
    pub const fn new(id: String, kind: ActorKind) -> Self {
        Self { id, kind }
    }

    /// Creates the system actor used by background sweeps.
    ///
    /// # Arguments
    ///
    /// * `name` - A fixed name identifying the subsystem (e.g. `"bid-reaper"`)
    #[must_use]
    pub fn system(name: &str) -> Self {
        Self {
            id: name.to_owned(),
            kind: ActorKind::System,
        }
    }
}

/// The reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    /// A unique identifier for this cause (request id, sweep tick id).
    pub id: String,
    /// A description of what triggered the action.
    pub description: String,
}

impl Cause {
    /// Creates a new `Cause`.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// The specific action performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The name of the action (e.g. `"CreateBid"`, `"SettleReport"`).
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new `Action`.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A snapshot of the affected entity at a point in time.
///
/// Snapshots are compact textual summaries (`"bid:7 status=active"`), not
/// full serialisations; reconstruction happens from canonical tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// A string representation of the entity state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    ///
    /// # Arguments
    ///
    /// * `data` - A string representation of the state
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// An immutable audit event recording one state transition.
///
/// Captures who performed the action (actor), why (cause), what happened
/// (action), which entity it happened to (subject), and the entity state
/// before and after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The entity the action applied to (e.g. `"bid:7"`, `"report:42"`,
    /// `"aircraft:OD-LVA"`, `"vault"`).
    pub subject: String,
    /// The entity state before the transition.
    pub before: StateSnapshot,
    /// The entity state after the transition.
    pub after: StateSnapshot,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// Once created, an audit event is immutable.
    ///
    /// # Arguments
    ///
    /// * `actor` - The actor who initiated the change
    /// * `cause` - The reason for the change
    /// * `action` - The action that was performed
    /// * `subject` - The entity the action applied to
    /// * `before` - The entity state before the transition
    /// * `after` - The entity state after the transition
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        subject: String,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            actor,
            cause,
            action,
            subject,
            before,
            after,
        }
    }
}

/// An annotation attached to a terminal report.
///
/// Annotations are the only mutation permitted on a report after it reaches
/// a terminal approval status. They carry commentary (reviewer notes,
/// duplicate-resolution outcomes), never decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// The actor who wrote the annotation.
    pub actor: Actor,
    /// The annotation text.
    pub note: String,
}

impl Annotation {
    /// Creates a new `Annotation`.
    ///
    /// # Arguments
    ///
    /// * `actor` - The actor writing the annotation
    /// * `note` - The annotation text
    #[must_use]
    pub const fn new(actor: Actor, note: String) -> Self {
        Self { actor, note }
    }
}

#[cfg(test)]
mod tests;
