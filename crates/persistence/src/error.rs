// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// A uniqueness constraint was violated (e.g. the single-active-bid
    /// partial index, a duplicate registration).
    ConstraintViolation(String),
    /// An optimistic-concurrency check lost the race, after internal
    /// retries were exhausted.
    ConcurrentModification {
        /// The contended entity (e.g. `"aircraft:OD-LVA"`).
        entity: String,
    },
    /// A conditional vault debit found insufficient balance.
    InsufficientFunds {
        /// The required amount in credits.
        required: i64,
        /// The balance at the time of the attempt.
        available: i64,
    },
    /// A row was not in the state the mutation requires (e.g. resolving a
    /// report that is no longer Pending).
    InvalidState(String),
    /// The requested row was not found.
    NotFound(String),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// A stored value failed to convert back into a domain value.
    ReconstructionError(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::ConstraintViolation(msg) => write!(f, "Constraint violation: {msg}"),
            Self::ConcurrentModification { entity } => {
                write!(f, "Concurrent modification detected on {entity}")
            }
            Self::InsufficientFunds {
                required,
                available,
            } => {
                write!(
                    f,
                    "Insufficient funds: {required} credits required, {available} available"
                )
            }
            Self::InvalidState(msg) => write!(f, "Invalid state: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::ReconstructionError(msg) => {
                write!(f, "State reconstruction error: {msg}")
            }
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                info,
            ) => Self::ConstraintViolation(info.message().to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<skyops_domain::DomainError> for PersistenceError {
    fn from(err: skyops_domain::DomainError) -> Self {
        Self::ReconstructionError(err.to_string())
    }
}
