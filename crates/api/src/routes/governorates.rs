//! Governorate listing, detail, and autocomplete.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use domain::governorates::{self, Governorate};
use domain::models::{CandidateListQuery, CandidateWithStats, GovernorateSort, GovernorateStats};
use persistence::repositories::{CandidateRepository, ReportsRepository};
use shared::pagination::{PageQuery, Paginated};

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernorateListParams {
    pub search: Option<String>,
    #[serde(default)]
    pub sort: GovernorateSort,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernorateListResponse {
    pub data: Vec<GovernorateStats>,
    pub total_governorates: usize,
}

/// Governorates with per-governorate statistics, searchable and sortable.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<GovernorateListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let reports = ReportsRepository::new(state.pool.clone());
    let data = reports
        .governorate_stats(params.search.as_deref(), params.sort)
        .await?;

    Ok(Json(GovernorateListResponse {
        total_governorates: data.len(),
        data,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernorateDetailResponse {
    pub governorate: Governorate,
    pub candidates: Paginated<CandidateWithStats>,
}

/// A governorate by slug, with its candidates under the same
/// search/sort/page contract as the main candidate list.
pub async fn detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(mut query): Query<CandidateListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let governorate = governorates::by_slug(&slug)
        .ok_or_else(|| ApiError::NotFound("المحافظة المطلوبة غير موجودة".to_string()))?;

    query.governorate_id = Some(governorate.id);

    let repo = CandidateRepository::new(state.pool.clone());
    let (rows, total) = repo.list_with_stats(&query).await?;
    let window = PageQuery { page: query.page, per_page: query.per_page }
        .resolve(domain::models::CANDIDATES_PER_PAGE);

    Ok(Json(GovernorateDetailResponse {
        governorate: *governorate,
        candidates: Paginated::new(
            rows.into_iter().map(CandidateWithStats::from).collect(),
            window,
            total,
        ),
    }))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernorateHit {
    pub id: i32,
    pub name: &'static str,
    pub name_en: &'static str,
    pub slug: &'static str,
}

/// Autocomplete over governorate names; at least two characters, at most
/// ten results.
pub async fn search(Query(params): Query<SearchParams>) -> Json<serde_json::Value> {
    let query = params.q.unwrap_or_default();
    let results: Vec<GovernorateHit> = if query.trim().chars().count() < 2 {
        Vec::new()
    } else {
        governorates::search(&query)
            .into_iter()
            .take(10)
            .map(|g| GovernorateHit {
                id: g.id,
                name: g.name_ar,
                name_en: g.name_en,
                slug: g.slug,
            })
            .collect()
    };

    Json(serde_json::json!({ "results": results }))
}
