use proposal_core::RepositoryError;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, TypeInfo, ValueRef};

/// Read a money column.
///
/// Amounts are written as TEXT so every digit survives. A bare INTEGER is
/// accepted for rows edited by hand; REAL is refused since it cannot hold
/// cents exactly.
pub fn get_decimal(
    row: &SqliteRow,
    column: &str,
) -> Result<Decimal, RepositoryError> {
    let raw = row
        .try_get_raw(column)
        .map_err(|e| RepositoryError::Database(format!("Column '{}' not found: {}", column, e)))?;

    if raw.is_null() {
        return Err(RepositoryError::Database(format!(
            "Money column '{}' is NULL",
            column
        )));
    }

    let kind = raw.type_info().name().to_string();
    let text = match kind.as_str() {
        "TEXT" => row.try_get::<String, _>(column),
        "INTEGER" => row.try_get::<i64, _>(column).map(|n| n.to_string()),
        other => {
            return Err(RepositoryError::Database(format!(
                "Money column '{}' holds {}, expected TEXT",
                column, other
            )));
        }
    }
    .map_err(|e| RepositoryError::Database(format!("Failed to read '{}': {}", column, e)))?;

    text.trim().parse::<Decimal>().map_err(|e| {
        RepositoryError::Database(format!(
            "Failed to parse amount '{}' in '{}': {}",
            text, column, e
        ))
    })
}

/// Shortest exact text for a stored amount: `1100.00` is written as `1100`.
pub fn decimal_to_text(amount: Decimal) -> String {
    amount.normalize().to_string()
}
