use thiserror::Error;

/// Errors surfaced by the recipe and meal-plan store.
///
/// Initialization failures (`Connection`, `Schema`) are recoverable with at
/// most one [`reset`](crate::db::Database::reset) attempt; everything else is
/// reported to the caller as-is.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Opening the database failed, or another connection holds it locked.
    #[error("failed to open database: {0}")]
    Connection(String),

    /// A required table is missing even though initialization succeeded.
    #[error("required table '{0}' is missing; re-initialize the database")]
    Schema(String),

    /// An operation was invoked before `init()` succeeded or after `close()`.
    #[error("database not initialized")]
    NotInitialized,

    /// The engine rejected a read/write/delete inside an otherwise-valid call.
    #[error("storage operation failed: {0}")]
    Operation(#[from] rusqlite::Error),

    /// The persisted meals document could not be encoded or decoded.
    #[error("meal plan document error: {0}")]
    Codec(#[from] serde_json::Error),

    /// Deleting the database file during recovery was rejected.
    #[error("database reset failed: {0}")]
    Reset(#[source] std::io::Error),

    /// Caller-supplied data failed validation.
    #[error("{0}")]
    Invalid(String),

    /// A recipe referenced by id does not exist.
    #[error("recipe {0} not found")]
    RecipeNotFound(i64),
}

pub type Result<T> = std::result::Result<T, StoreError>;
