//! One-off dataset ingestion: cleans the scraped recipe JSON and bulk-inserts
//! it into the `recipes` table. Run via the `ingest` binary.

use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use sqlx::SqlitePool;

lazy_static! {
    static ref NAN_TOKEN: Regex = Regex::new(r"\bNaN\b").unwrap();
}

/// A recipe as it appears in the scraped dataset. Numeric fields arrive as
/// numbers or numeric strings and are normalized at insert time.
#[derive(Debug, Deserialize)]
pub struct RawRecipe {
    pub title: Option<String>,
    pub cuisine: Option<String>,
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub prep_time: Option<Value>,
    #[serde(default)]
    pub cook_time: Option<Value>,
    #[serde(default)]
    pub total_time: Option<Value>,
    pub description: Option<String>,
    #[serde(default)]
    pub nutrients: Option<Value>,
    #[serde(default)]
    pub serves: Option<Value>,
}

/// The scraped dataset contains bare `NaN` tokens, which are not valid JSON.
/// Replace each standalone token with `null` before parsing.
pub fn clean_raw_json(raw: &str) -> String {
    NAN_TOKEN.replace_all(raw, "null").into_owned()
}

/// Decodes the dataset, which is either a JSON array of recipes or an object
/// keyed by row number.
pub fn parse_recipes(cleaned: &str) -> anyhow::Result<Vec<RawRecipe>> {
    let value: Value = serde_json::from_str(cleaned).context("parse recipe dataset")?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => map.into_values().collect(),
        other => anyhow::bail!("unexpected top-level JSON value: {}", other),
    };
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).context("decode recipe record"))
        .collect()
}

/// Numbers and numeric strings pass through; anything else becomes NULL.
pub fn clean_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Inserts every recipe as one parameterized statement. Returns the number of
/// rows written.
pub async fn insert_recipes(db: &SqlitePool, recipes: &[RawRecipe]) -> anyhow::Result<u64> {
    let mut inserted = 0;
    for recipe in recipes {
        let rating = recipe.rating.as_ref().and_then(clean_number);
        let prep_time = recipe.prep_time.as_ref().and_then(clean_number).map(|n| n as i64);
        let cook_time = recipe.cook_time.as_ref().and_then(clean_number).map(|n| n as i64);
        let total_time = recipe.total_time.as_ref().and_then(clean_number).map(|n| n as i64);
        let nutrients = recipe
            .nutrients
            .as_ref()
            .map(|v| serde_json::to_string(v))
            .transpose()?;
        let serves = recipe.serves.as_ref().and_then(as_text);

        sqlx::query(
            "INSERT INTO recipes \
             (title, cuisine, rating, prep_time, cook_time, total_time, description, nutrients, serves) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&recipe.title)
        .bind(&recipe.cuisine)
        .bind(rating)
        .bind(prep_time)
        .bind(cook_time)
        .bind(total_time)
        .bind(&recipe.description)
        .bind(nutrients)
        .bind(serves)
        .execute(db)
        .await
        .context("insert recipe row")?;
        inserted += 1;
    }
    Ok(inserted)
}
