// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Trusted-session actor types.
//!
//! Credential validation and session issuance happen outside the core
//! pipeline; what arrives here is already verified. The only authorization
//! decision this crate makes is the admin gate on staff operations.

use crate::error::ApiError;
use skyops_audit::{Actor, ActorKind};

/// A verified pilot session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PilotSession {
    /// The authenticated pilot.
    pub pilot_id: i64,
    /// Whether the pilot holds staff authority.
    pub is_admin: bool,
}

impl PilotSession {
    /// Creates a session from externally verified fields.
    ///
    /// # Arguments
    ///
    /// * `pilot_id` - The authenticated pilot
    /// * `is_admin` - Whether the pilot holds staff authority
    #[must_use]
    pub const fn new(pilot_id: i64, is_admin: bool) -> Self {
        Self { pilot_id, is_admin }
    }

    /// Converts this session into an audit actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        let kind = if self.is_admin {
            ActorKind::Admin
        } else {
            ActorKind::Pilot
        };
        Actor::new(format!("pilot-{}", self.pilot_id), kind)
    }
}

/// Gates an operation on staff authority.
///
/// # Arguments
///
/// * `session` - The verified session
/// * `action` - The operation being attempted, for the rejection message
///
/// # Errors
///
/// Returns `ApiError::Unauthorized` if the session is not an admin.
pub fn require_admin(session: &PilotSession, action: &str) -> Result<(), ApiError> {
    if session.is_admin {
        Ok(())
    } else {
        Err(ApiError::Unauthorized {
            action: action.to_owned(),
        })
    }
}
