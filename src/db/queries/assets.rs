use crate::models::{Asset, AssetCategory};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

const SELECT_ASSET: &str =
    "SELECT id, user_id, name, category, value, income_generated, notes FROM assets";

fn row_to_asset(row: &Row) -> rusqlite::Result<Asset> {
    let category: String = row.get(3)?;
    Ok(Asset {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        category: AssetCategory::parse(&category).unwrap_or(AssetCategory::Other),
        value: row.get(4)?,
        income_generated: row.get(5)?,
        notes: row.get(6)?,
    })
}

pub fn list_assets(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<Asset>> {
    let mut stmt = conn.prepare(&format!("{SELECT_ASSET} WHERE user_id = ? ORDER BY rowid"))?;
    let assets = stmt
        .query_map([user_id], row_to_asset)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(assets)
}

pub fn get_asset(conn: &Connection, user_id: i64, id: &str) -> rusqlite::Result<Option<Asset>> {
    conn.query_row(
        &format!("{SELECT_ASSET} WHERE id = ? AND user_id = ?"),
        params![id, user_id],
        row_to_asset,
    )
    .optional()
}

pub fn create_asset(conn: &Connection, user_id: i64, asset: &Asset) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO assets (id, user_id, name, category, value, income_generated, notes)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        params![
            asset.id,
            user_id,
            asset.name,
            asset.category.as_str(),
            asset.value,
            asset.income_generated,
            asset.notes,
        ],
    )?;
    info!(asset_id = %asset.id, user_id, name = %asset.name, "Created asset");
    Ok(())
}

pub fn update_asset(conn: &Connection, user_id: i64, asset: &Asset) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE assets
         SET name = ?, category = ?, value = ?, income_generated = ?, notes = ?,
             updated_at = datetime('now')
         WHERE id = ? AND user_id = ?",
        params![
            asset.name,
            asset.category.as_str(),
            asset.value,
            asset.income_generated,
            asset.notes,
            asset.id,
            user_id,
        ],
    )?;
    if rows > 0 {
        info!(asset_id = %asset.id, user_id, "Updated asset");
    }
    Ok(rows > 0)
}

pub fn upsert_asset(conn: &Connection, user_id: i64, asset: &Asset) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "INSERT INTO assets (id, user_id, name, category, value, income_generated, notes)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
             name = excluded.name,
             category = excluded.category,
             value = excluded.value,
             income_generated = excluded.income_generated,
             notes = excluded.notes,
             updated_at = datetime('now')
         WHERE assets.user_id = excluded.user_id",
        params![
            asset.id,
            user_id,
            asset.name,
            asset.category.as_str(),
            asset.value,
            asset.income_generated,
            asset.notes,
        ],
    )?;
    Ok(rows > 0)
}

pub fn delete_asset(conn: &Connection, user_id: i64, id: &str) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "DELETE FROM assets WHERE id = ? AND user_id = ?",
        params![id, user_id],
    )?;
    if rows > 0 {
        info!(asset_id = %id, user_id, "Deleted asset");
    }
    Ok(rows > 0)
}
