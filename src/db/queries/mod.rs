pub mod assets;
pub mod expenses;
pub mod goals;
pub mod incomes;
pub mod liabilities;
pub mod users;

use rusqlite::ErrorCode;

/// True when `err` is a UNIQUE / PRIMARY KEY / CHECK violation.
pub fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}
