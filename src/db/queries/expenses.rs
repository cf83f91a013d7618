use crate::models::{Expense, ExpenseCategory};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

const SELECT_EXPENSE: &str = "SELECT id, user_id, description, category, amount, date FROM expenses";

fn row_to_expense(row: &Row) -> rusqlite::Result<Expense> {
    let category: String = row.get(3)?;
    Ok(Expense {
        id: row.get(0)?,
        user_id: row.get(1)?,
        description: row.get(2)?,
        category: ExpenseCategory::parse(&category).unwrap_or(ExpenseCategory::Other),
        amount: row.get(4)?,
        date: row.get(5)?,
    })
}

pub fn list_expenses(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<Expense>> {
    let mut stmt = conn.prepare(&format!("{SELECT_EXPENSE} WHERE user_id = ? ORDER BY rowid"))?;
    let expenses = stmt
        .query_map([user_id], row_to_expense)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(expenses)
}

pub fn get_expense(
    conn: &Connection,
    user_id: i64,
    id: &str,
) -> rusqlite::Result<Option<Expense>> {
    conn.query_row(
        &format!("{SELECT_EXPENSE} WHERE id = ? AND user_id = ?"),
        params![id, user_id],
        row_to_expense,
    )
    .optional()
}

pub fn create_expense(conn: &Connection, user_id: i64, expense: &Expense) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO expenses (id, user_id, description, category, amount, date)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            expense.id,
            user_id,
            expense.description,
            expense.category.as_str(),
            expense.amount,
            expense.date,
        ],
    )?;
    info!(expense_id = %expense.id, user_id, amount = expense.amount, "Created expense");
    Ok(())
}

pub fn update_expense(
    conn: &Connection,
    user_id: i64,
    expense: &Expense,
) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE expenses
         SET description = ?, category = ?, amount = ?, date = ?, updated_at = datetime('now')
         WHERE id = ? AND user_id = ?",
        params![
            expense.description,
            expense.category.as_str(),
            expense.amount,
            expense.date,
            expense.id,
            user_id,
        ],
    )?;
    if rows > 0 {
        info!(expense_id = %expense.id, user_id, "Updated expense");
    }
    Ok(rows > 0)
}

pub fn upsert_expense(
    conn: &Connection,
    user_id: i64,
    expense: &Expense,
) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "INSERT INTO expenses (id, user_id, description, category, amount, date)
         VALUES (?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
             description = excluded.description,
             category = excluded.category,
             amount = excluded.amount,
             date = excluded.date,
             updated_at = datetime('now')
         WHERE expenses.user_id = excluded.user_id",
        params![
            expense.id,
            user_id,
            expense.description,
            expense.category.as_str(),
            expense.amount,
            expense.date,
        ],
    )?;
    Ok(rows > 0)
}

pub fn delete_expense(conn: &Connection, user_id: i64, id: &str) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "DELETE FROM expenses WHERE id = ? AND user_id = ?",
        params![id, user_id],
    )?;
    if rows > 0 {
        info!(expense_id = %id, user_id, "Deleted expense");
    }
    Ok(rows > 0)
}
