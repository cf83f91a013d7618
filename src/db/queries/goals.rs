use crate::models::Goal;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

const SELECT_GOAL: &str =
    "SELECT id, user_id, description, target_amount, current_amount, target_date FROM goals";

fn row_to_goal(row: &Row) -> rusqlite::Result<Goal> {
    Ok(Goal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        description: row.get(2)?,
        target_amount: row.get(3)?,
        current_amount: row.get(4)?,
        target_date: row.get(5)?,
    })
}

pub fn list_goals(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<Goal>> {
    let mut stmt = conn.prepare(&format!("{SELECT_GOAL} WHERE user_id = ? ORDER BY rowid"))?;
    let goals = stmt
        .query_map([user_id], row_to_goal)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(goals)
}

pub fn get_goal(conn: &Connection, user_id: i64, id: &str) -> rusqlite::Result<Option<Goal>> {
    conn.query_row(
        &format!("{SELECT_GOAL} WHERE id = ? AND user_id = ?"),
        params![id, user_id],
        row_to_goal,
    )
    .optional()
}

pub fn create_goal(conn: &Connection, user_id: i64, goal: &Goal) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO goals (id, user_id, description, target_amount, current_amount, target_date)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            goal.id,
            user_id,
            goal.description,
            goal.target_amount,
            goal.current_amount,
            goal.target_date,
        ],
    )?;
    info!(goal_id = %goal.id, user_id, "Created goal");
    Ok(())
}

pub fn update_goal(conn: &Connection, user_id: i64, goal: &Goal) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE goals
         SET description = ?, target_amount = ?, current_amount = ?, target_date = ?,
             updated_at = datetime('now')
         WHERE id = ? AND user_id = ?",
        params![
            goal.description,
            goal.target_amount,
            goal.current_amount,
            goal.target_date,
            goal.id,
            user_id,
        ],
    )?;
    if rows > 0 {
        info!(goal_id = %goal.id, user_id, progress = goal.progress(), "Updated goal");
    }
    Ok(rows > 0)
}

pub fn upsert_goal(conn: &Connection, user_id: i64, goal: &Goal) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "INSERT INTO goals (id, user_id, description, target_amount, current_amount, target_date)
         VALUES (?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
             description = excluded.description,
             target_amount = excluded.target_amount,
             current_amount = excluded.current_amount,
             target_date = excluded.target_date,
             updated_at = datetime('now')
         WHERE goals.user_id = excluded.user_id",
        params![
            goal.id,
            user_id,
            goal.description,
            goal.target_amount,
            goal.current_amount,
            goal.target_date,
        ],
    )?;
    Ok(rows > 0)
}

pub fn delete_goal(conn: &Connection, user_id: i64, id: &str) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "DELETE FROM goals WHERE id = ? AND user_id = ?",
        params![id, user_id],
    )?;
    if rows > 0 {
        info!(goal_id = %id, user_id, "Deleted goal");
    }
    Ok(rows > 0)
}
