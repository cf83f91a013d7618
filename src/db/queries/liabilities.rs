use crate::models::{Liability, LiabilityType};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

const SELECT_LIABILITY: &str =
    "SELECT id, user_id, description, liability_type, amount, interest_rate, notes FROM liabilities";

fn row_to_liability(row: &Row) -> rusqlite::Result<Liability> {
    let liability_type: String = row.get(3)?;
    Ok(Liability {
        id: row.get(0)?,
        user_id: row.get(1)?,
        description: row.get(2)?,
        liability_type: LiabilityType::parse(&liability_type).unwrap_or(LiabilityType::Other),
        amount: row.get(4)?,
        interest_rate: row.get(5)?,
        notes: row.get(6)?,
    })
}

pub fn list_liabilities(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<Liability>> {
    let mut stmt =
        conn.prepare(&format!("{SELECT_LIABILITY} WHERE user_id = ? ORDER BY rowid"))?;
    let liabilities = stmt
        .query_map([user_id], row_to_liability)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(liabilities)
}

pub fn get_liability(
    conn: &Connection,
    user_id: i64,
    id: &str,
) -> rusqlite::Result<Option<Liability>> {
    conn.query_row(
        &format!("{SELECT_LIABILITY} WHERE id = ? AND user_id = ?"),
        params![id, user_id],
        row_to_liability,
    )
    .optional()
}

pub fn create_liability(
    conn: &Connection,
    user_id: i64,
    liability: &Liability,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO liabilities (id, user_id, description, liability_type, amount, interest_rate, notes)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        params![
            liability.id,
            user_id,
            liability.description,
            liability.liability_type.as_str(),
            liability.amount,
            liability.interest_rate,
            liability.notes,
        ],
    )?;
    info!(liability_id = %liability.id, user_id, "Created liability");
    Ok(())
}

pub fn update_liability(
    conn: &Connection,
    user_id: i64,
    liability: &Liability,
) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE liabilities
         SET description = ?, liability_type = ?, amount = ?, interest_rate = ?, notes = ?,
             updated_at = datetime('now')
         WHERE id = ? AND user_id = ?",
        params![
            liability.description,
            liability.liability_type.as_str(),
            liability.amount,
            liability.interest_rate,
            liability.notes,
            liability.id,
            user_id,
        ],
    )?;
    if rows > 0 {
        info!(liability_id = %liability.id, user_id, "Updated liability");
    }
    Ok(rows > 0)
}

pub fn upsert_liability(
    conn: &Connection,
    user_id: i64,
    liability: &Liability,
) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "INSERT INTO liabilities (id, user_id, description, liability_type, amount, interest_rate, notes)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
             description = excluded.description,
             liability_type = excluded.liability_type,
             amount = excluded.amount,
             interest_rate = excluded.interest_rate,
             notes = excluded.notes,
             updated_at = datetime('now')
         WHERE liabilities.user_id = excluded.user_id",
        params![
            liability.id,
            user_id,
            liability.description,
            liability.liability_type.as_str(),
            liability.amount,
            liability.interest_rate,
            liability.notes,
        ],
    )?;
    Ok(rows > 0)
}

pub fn delete_liability(conn: &Connection, user_id: i64, id: &str) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "DELETE FROM liabilities WHERE id = ? AND user_id = ?",
        params![id, user_id],
    )?;
    if rows > 0 {
        info!(liability_id = %id, user_id, "Deleted liability");
    }
    Ok(rows > 0)
}
