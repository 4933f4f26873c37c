use axum::{
    extract::{Query, State},
    Json,
};
use tracing::{debug, instrument};

use crate::error::AppError;
use crate::state::AppState;

use super::dto::{PageParams, RecipePage, SearchFilters, SearchResults};
use super::{filter, repo};

/// GET /recipes — one page of recipes, best-rated first, plus the unfiltered
/// row count.
#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<RecipePage>, AppError> {
    let page = params.page();
    let limit = params.limit();

    let total = repo::count_all(&state.db).await?;
    let rows = repo::list_page(&state.db, limit, params.offset()).await?;

    Ok(Json(RecipePage {
        page,
        limit,
        total,
        data: rows.into_iter().map(Into::into).collect(),
    }))
}

/// GET /recipes/search — every row matching the given filters, unpaginated.
#[instrument(skip(state))]
pub async fn search_recipes(
    State(state): State<AppState>,
    Query(filters): Query<SearchFilters>,
) -> Result<Json<SearchResults>, AppError> {
    let predicates = filter::build(&filters);
    debug!(predicates = predicates.len(), "executing search");

    let rows = repo::search(&state.db, &predicates).await?;

    Ok(Json(SearchResults {
        data: rows.into_iter().map(Into::into).collect(),
    }))
}
