use crate::models::{Frequency, Income, IncomeCategory, IncomeType};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

const SELECT_INCOME: &str = "SELECT id, user_id, source, category, amount, income_type, frequency, notes
     FROM incomes";

fn row_to_income(row: &Row) -> rusqlite::Result<Income> {
    let category: String = row.get(3)?;
    let income_type: String = row.get(5)?;
    let frequency: String = row.get(6)?;
    Ok(Income {
        id: row.get(0)?,
        user_id: row.get(1)?,
        source: row.get(2)?,
        category: IncomeCategory::parse(&category).unwrap_or(IncomeCategory::Other),
        amount: row.get(4)?,
        income_type: IncomeType::parse(&income_type).unwrap_or(IncomeType::Active),
        frequency: Frequency::parse(&frequency).unwrap_or(Frequency::Monthly),
        notes: row.get(7)?,
    })
}

pub fn list_incomes(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<Income>> {
    let mut stmt = conn.prepare(&format!("{SELECT_INCOME} WHERE user_id = ? ORDER BY rowid"))?;
    let incomes = stmt
        .query_map([user_id], row_to_income)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(incomes)
}

pub fn get_income(conn: &Connection, user_id: i64, id: &str) -> rusqlite::Result<Option<Income>> {
    conn.query_row(
        &format!("{SELECT_INCOME} WHERE id = ? AND user_id = ?"),
        params![id, user_id],
        row_to_income,
    )
    .optional()
}

pub fn create_income(conn: &Connection, user_id: i64, income: &Income) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO incomes (id, user_id, source, category, amount, income_type, frequency, notes)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            income.id,
            user_id,
            income.source,
            income.category.as_str(),
            income.amount,
            income.income_type.as_str(),
            income.frequency.as_str(),
            income.notes,
        ],
    )?;
    info!(income_id = %income.id, user_id, source = %income.source, "Created income");
    Ok(())
}

pub fn update_income(conn: &Connection, user_id: i64, income: &Income) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE incomes
         SET source = ?, category = ?, amount = ?, income_type = ?, frequency = ?, notes = ?,
             updated_at = datetime('now')
         WHERE id = ? AND user_id = ?",
        params![
            income.source,
            income.category.as_str(),
            income.amount,
            income.income_type.as_str(),
            income.frequency.as_str(),
            income.notes,
            income.id,
            user_id,
        ],
    )?;
    if rows > 0 {
        info!(income_id = %income.id, user_id, "Updated income");
    }
    Ok(rows > 0)
}

/// Insert or replace an income. Returns false when the id belongs to
/// another user.
pub fn upsert_income(conn: &Connection, user_id: i64, income: &Income) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "INSERT INTO incomes (id, user_id, source, category, amount, income_type, frequency, notes)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
             source = excluded.source,
             category = excluded.category,
             amount = excluded.amount,
             income_type = excluded.income_type,
             frequency = excluded.frequency,
             notes = excluded.notes,
             updated_at = datetime('now')
         WHERE incomes.user_id = excluded.user_id",
        params![
            income.id,
            user_id,
            income.source,
            income.category.as_str(),
            income.amount,
            income.income_type.as_str(),
            income.frequency.as_str(),
            income.notes,
        ],
    )?;
    Ok(rows > 0)
}

pub fn delete_income(conn: &Connection, user_id: i64, id: &str) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "DELETE FROM incomes WHERE id = ? AND user_id = ?",
        params![id, user_id],
    )?;
    if rows > 0 {
        info!(income_id = %id, user_id, "Deleted income");
    }
    Ok(rows > 0)
}
