use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use super::filter::{self, Operand, Predicate};

#[derive(Debug, Default, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: i64,
    pub title: Option<String>,
    pub cuisine: Option<String>,
    pub rating: Option<f64>,
    pub prep_time: Option<i64>,
    pub cook_time: Option<i64>,
    pub total_time: Option<i64>,
    pub description: Option<String>,
    pub nutrients: Option<String>,
    pub serves: Option<String>,
}

const COLUMNS: &str = "id, title, cuisine, rating, prep_time, cook_time, \
                       total_time, description, nutrients, serves";

pub async fn count_all(db: &SqlitePool) -> anyhow::Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes")
        .fetch_one(db)
        .await?;
    Ok(count)
}

/// One page of recipes, best-rated first. SQLite sorts NULL ratings last
/// under DESC and clamps a negative offset to zero.
pub async fn list_page(db: &SqlitePool, limit: i64, offset: i64) -> anyhow::Result<Vec<Recipe>> {
    let rows = sqlx::query_as::<_, Recipe>(&format!(
        "SELECT {COLUMNS} FROM recipes ORDER BY rating DESC LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// All rows matching every predicate, in storage order. An empty predicate
/// list returns the whole table; results are not paginated.
pub async fn search(db: &SqlitePool, predicates: &[Predicate]) -> anyhow::Result<Vec<Recipe>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM recipes{}",
        filter::where_clause(predicates)
    );
    let mut query = sqlx::query_as::<_, Recipe>(&sql);
    for predicate in predicates {
        query = match predicate.value() {
            Operand::Text(s) => query.bind(s.clone()),
            Operand::Int(i) => query.bind(*i),
            Operand::Real(r) => query.bind(*r),
        };
    }
    let rows = query.fetch_all(db).await?;
    Ok(rows)
}
