use serde::{Deserialize, Serialize};

use super::repo::Recipe;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;

/// Raw pagination query parameters. Kept as strings so that a non-numeric
/// value coerces to the default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageParams {
    pub fn page(&self) -> i64 {
        parse_or(&self.page, DEFAULT_PAGE)
    }

    pub fn limit(&self) -> i64 {
        parse_or(&self.limit, DEFAULT_LIMIT)
    }

    /// No lower bound: `page <= 0` yields a negative offset, which SQLite
    /// treats as zero.
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

fn parse_or(value: &Option<String>, default: i64) -> i64 {
    value
        .as_deref()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(default)
}

/// The five optional search parameters, all raw strings.
#[derive(Debug, Default, Deserialize)]
pub struct SearchFilters {
    pub title: Option<String>,
    pub cuisine: Option<String>,
    pub rating: Option<String>,
    pub total_time: Option<String>,
    pub calories: Option<String>,
}

/// A recipe as it appears on the wire. `nutrients` is stored as JSON text
/// and re-parsed into a real object here; unparseable text becomes `null`.
#[derive(Debug, Serialize)]
pub struct RecipeJson {
    pub id: i64,
    pub title: Option<String>,
    pub cuisine: Option<String>,
    pub rating: Option<f64>,
    pub prep_time: Option<i64>,
    pub cook_time: Option<i64>,
    pub total_time: Option<i64>,
    pub description: Option<String>,
    pub nutrients: Option<serde_json::Value>,
    pub serves: Option<String>,
}

impl From<Recipe> for RecipeJson {
    fn from(row: Recipe) -> Self {
        let nutrients = row
            .nutrients
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok());
        Self {
            id: row.id,
            title: row.title,
            cuisine: row.cuisine,
            rating: row.rating,
            prep_time: row.prep_time,
            cook_time: row.cook_time,
            total_time: row.total_time,
            description: row.description,
            nutrients,
            serves: row.serves,
        }
    }
}

/// Envelope for `GET /recipes`.
#[derive(Debug, Serialize)]
pub struct RecipePage {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub data: Vec<RecipeJson>,
}

/// Envelope for `GET /recipes/search`.
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub data: Vec<RecipeJson>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_when_absent() {
        let params = PageParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn pagination_defaults_when_non_numeric() {
        let params = PageParams {
            page: Some("abc".into()),
            limit: Some("ten".into()),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 10);
    }

    #[test]
    fn pagination_computes_offset() {
        let params = PageParams {
            page: Some("3".into()),
            limit: Some("25".into()),
        };
        assert_eq!(params.offset(), 50);
    }

    #[test]
    fn page_zero_yields_negative_offset() {
        let params = PageParams {
            page: Some("0".into()),
            limit: None,
        };
        assert_eq!(params.offset(), -10);
    }

    #[test]
    fn nutrients_text_reparses_into_object() {
        let row = Recipe {
            id: 1,
            nutrients: Some(r#"{"calories": "389 kcal", "proteinContent": "5 g"}"#.into()),
            ..Recipe::default()
        };
        let json = RecipeJson::from(row);
        let nutrients = json.nutrients.expect("should parse");
        assert_eq!(nutrients["calories"], "389 kcal");
    }

    #[test]
    fn malformed_nutrients_become_null() {
        let row = Recipe {
            id: 1,
            nutrients: Some("{not json".into()),
            ..Recipe::default()
        };
        assert!(RecipeJson::from(row).nutrients.is_none());
    }
}
