use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::database::models::CatalogRow;
use crate::services::matcher::models::types::{CatalogEntry, MatchField};

const CATALOG_COLUMNS: &str =
    "id, name, synonyms, variation, material, condition, home_category, recycling_category";

/// Escape LIKE wildcards so a term only ever matches literally.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Substring search on one column, case-insensitive, ordered by id.
///
/// SQLite's `LOWER()` only folds ASCII, so non-ASCII text must already
/// match in case.
pub async fn query_by_field(
    pool: &SqlitePool,
    field: MatchField,
    term: &str,
    limit: usize,
) -> Result<Vec<CatalogRow>, sqlx::Error> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() || limit == 0 {
        return Ok(Vec::new());
    }

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {CATALOG_COLUMNS} FROM catalog_entries WHERE LOWER({}) LIKE ",
        field.column()
    ));
    qb.push_bind(format!("%{}%", escape_like(&needle)));
    qb.push(r" ESCAPE '\' ORDER BY id LIMIT ");
    qb.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));

    qb.build_query_as::<CatalogRow>().fetch_all(pool).await
}

pub async fn get_entry_by_id(pool: &SqlitePool, id: i64) -> Result<Option<CatalogRow>, sqlx::Error> {
    let sql = format!("SELECT {CATALOG_COLUMNS} FROM catalog_entries WHERE id = ?");
    sqlx::query_as::<_, CatalogRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_entries(pool: &SqlitePool) -> Result<Vec<CatalogRow>, sqlx::Error> {
    let sql = format!("SELECT {CATALOG_COLUMNS} FROM catalog_entries ORDER BY id");
    sqlx::query_as::<_, CatalogRow>(&sql).fetch_all(pool).await
}

pub async fn count_entries(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM catalog_entries")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn insert_entry(pool: &SqlitePool, entry: &CatalogEntry) -> Result<(), sqlx::Error> {
    upsert_query(entry).execute(pool).await?;
    Ok(())
}

/// Upsert many entries in a single transaction. Returns the number written.
pub async fn insert_entries(pool: &SqlitePool, entries: &[CatalogEntry]) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut written = 0;
    for entry in entries {
        written += upsert_query(entry).execute(&mut *tx).await?.rows_affected();
    }
    tx.commit().await?;
    Ok(written)
}

pub async fn clear_entries(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM catalog_entries")
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

fn upsert_query(
    entry: &CatalogEntry,
) -> sqlx::query::Query<'_, Sqlite, sqlx::sqlite::SqliteArguments<'_>> {
    sqlx::query(
        "INSERT OR REPLACE INTO catalog_entries
         (id, name, synonyms, variation, material, condition, home_category, recycling_category)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(entry.id)
    .bind(&entry.name)
    .bind(&entry.synonyms)
    .bind(&entry.variation)
    .bind(&entry.material)
    .bind(&entry.condition)
    .bind(&entry.home_category)
    .bind(&entry.recycling_category)
}

#[cfg(test)]
#[path = "tests/catalog_repo_tests.rs"]
mod tests;
