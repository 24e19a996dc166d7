use thiserror::Error;

use crate::db::DatabaseError;

/// Errors surfaced to the calling layer (HTTP router, CLI, tests).
///
/// `Validation` and `NotFound` map to 4xx-equivalent conditions and are
/// never retried; `Storage` maps to 5xx and is only raised after the
/// underlying transaction has rolled back. A storage-layer lookup miss
/// converts to `NotFound`, not `Storage`. The classifiers themselves are
/// total functions and do not produce errors — low confidence is a
/// successful result.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {entity} '{key}'")]
    NotFound { entity: String, key: String },

    #[error("Storage error: {0}")]
    Storage(#[source] DatabaseError),
}

impl ServiceError {
    pub fn not_found(entity: impl Into<String>, key: impl Into<String>) -> Self {
        ServiceError::NotFound {
            entity: entity.into(),
            key: key.into(),
        }
    }
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity_type, id } => ServiceError::NotFound {
                entity: entity_type,
                key: id,
            },
            other => ServiceError::Storage(other),
        }
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(err: rusqlite::Error) -> Self {
        ServiceError::Storage(DatabaseError::Sqlite(err))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_misses_surface_as_not_found() {
        let err: ServiceError = DatabaseError::NotFound {
            entity_type: "Question".into(),
            id: "q-1".into(),
        }
        .into();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[test]
    fn other_database_errors_stay_storage() {
        let err: ServiceError = DatabaseError::ConstraintViolation("bad uuid".into()).into();
        assert!(matches!(err, ServiceError::Storage(_)));
    }
}
