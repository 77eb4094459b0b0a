use thiserror::Error;

/// Errors surfaced by the maintenance core above the ORM layer.
///
/// ORM functions return plain `diesel::result::Error`; everything that adds
/// authorization, validation or job control on top converts into this type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Database connection error: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("Migration error: {0}")]
    Migration(String),

    /// Uniform access-denied outcome. Deliberately carries no detail so a
    /// denial never reveals whether the resource exists in another tenant.
    #[error("Forbidden")]
    Forbidden,

    #[error("{entity} with ID {id} does not exist")]
    NotFound { entity: &'static str, id: i32 },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Cannot move {entity} from '{from}' to '{to}'")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error("Job '{job}' is already running (held by {owner})")]
    JobLocked { job: String, owner: String },

    #[error("Job cancelled before completion")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Notification dispatch failed: {0}")]
    Notification(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Error::NotFound { entity, id }
    }

    /// True when the error came from a uniqueness constraint in the database.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            Error::Database(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _
            ))
        )
    }
}
