use sea_orm::{DbErr, SqlErr};

/// returns `true` if the error is a unique constraint violation involving
/// the given column or constraint name
///
/// violation messages differ between databases:
///
/// - postgres: `duplicate key value violates unique constraint "taxi_vehicle_identifier_key"`
/// - sqlite: `UNIQUE constraint failed: taxi_vehicle.identifier`
///
/// both carry the column or constraint name, so a substring check is enough
/// to tell which column collided
pub fn is_unique_violation_on(err: &DbErr, column: &str) -> bool {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => msg.contains(column),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::RuntimeErr;

    #[test]
    fn non_sql_errors_are_not_unique_violations() {
        let err = DbErr::Query(RuntimeErr::Internal(String::from("boom")));

        assert!(!is_unique_violation_on(&err, "identifier"));
    }
}
