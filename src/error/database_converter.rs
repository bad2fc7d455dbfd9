use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

use crate::error::{AppError, ConstraintParser};

/// Utility for converting database errors to structured AppError variants.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a Diesel error to an appropriate AppError variant.
    ///
    /// # Arguments
    /// * `error` - The Diesel error to convert
    /// * `operation` - Description of the database operation that failed
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        let text = match info.details() {
            Some(details) => format!("{}\n{}", info.message(), details),
            None => info.message().to_string(),
        };
        let constraint_name = info.constraint_name();

        let structured = match kind {
            DatabaseErrorKind::UniqueViolation => {
                ConstraintParser::parse_unique_violation(&text, constraint_name).map(
                    |(entity, field, value)| AppError::Duplicate {
                        entity,
                        field,
                        value,
                    },
                )
            }
            DatabaseErrorKind::NotNullViolation => {
                ConstraintParser::parse_not_null_violation(&text, constraint_name).map(
                    |(entity, field)| AppError::Validation {
                        field,
                        reason: format!("Field is required for {}", entity),
                    },
                )
            }
            DatabaseErrorKind::ForeignKeyViolation => {
                ConstraintParser::parse_foreign_key_violation(&text, constraint_name).map(
                    |(entity, field, value)| AppError::Validation {
                        field,
                        reason: format!("Invalid reference to {} with value '{}'", entity, value),
                    },
                )
            }
            DatabaseErrorKind::CheckViolation => {
                ConstraintParser::parse_check_violation(&text, constraint_name).map(
                    |(entity, field)| AppError::Validation {
                        field,
                        reason: format!("Check constraint failed for {} field", entity),
                    },
                )
            }
            _ => None,
        };

        structured.unwrap_or_else(|| AppError::Database {
            operation: operation.to_string(),
            source: anyhow::Error::msg(format!("{:?}: {}", kind, text)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeInfo {
        message: &'static str,
        details: Option<&'static str>,
        constraint: Option<&'static str>,
    }

    impl DatabaseErrorInformation for FakeInfo {
        fn message(&self) -> &str {
            self.message
        }
        fn details(&self) -> Option<&str> {
            self.details
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn db_error(kind: DatabaseErrorKind, info: FakeInfo) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(info))
    }

    #[test]
    fn test_unique_violation_becomes_duplicate() {
        let error = db_error(
            DatabaseErrorKind::UniqueViolation,
            FakeInfo {
                message: "duplicate key value violates unique constraint \"jobs_pkey\"",
                details: Some("Key (id)=(42) already exists."),
                constraint: Some("jobs_pkey"),
            },
        );

        match DatabaseErrorConverter::convert_diesel_error(error, "insert job") {
            AppError::Duplicate {
                entity,
                field,
                value,
            } => {
                assert_eq!(entity, "jobs");
                assert_eq!(field, "id");
                assert_eq!(value, "42");
            }
            other => panic!("Expected Duplicate, got {:?}", other),
        }
    }

    #[test]
    fn test_check_violation_becomes_validation() {
        let error = db_error(
            DatabaseErrorKind::CheckViolation,
            FakeInfo {
                message: "new row for relation \"jobs\" violates check constraint \"jobs_salary_check\"",
                details: None,
                constraint: Some("jobs_salary_check"),
            },
        );

        match DatabaseErrorConverter::convert_diesel_error(error, "update job") {
            AppError::Validation { field, .. } => assert_eq!(field, "salary"),
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_violation_falls_back_to_database_error() {
        let error = db_error(
            DatabaseErrorKind::UniqueViolation,
            FakeInfo {
                message: "duplicate key",
                details: None,
                constraint: None,
            },
        );

        match DatabaseErrorConverter::convert_diesel_error(error, "insert job") {
            AppError::Database { operation, .. } => assert_eq!(operation, "insert job"),
            other => panic!("Expected Database, got {:?}", other),
        }
    }

    #[test]
    fn test_not_found_maps_to_not_found() {
        let err = DatabaseErrorConverter::convert_diesel_error(DieselError::NotFound, "find job");
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
