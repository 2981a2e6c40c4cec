use super::page::render_page;
use super::DashboardState;
use crate::analysis::{rank, RankDirection, RankedEntry};
use crate::charts::{render_ranking, render_scatter};
use crate::error::AppError;
use crate::pipeline::{RegionRecord, SchoolKind, TablePreview};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;

const SVG_CONTENT_TYPE: &str = "image/svg+xml; charset=utf-8";

/// User-selected view parameters shared by the page, the charts and the
/// ranking API. `dataset` and `direction` accept the same spellings as the
/// path parameter and the CLI; an empty `limit` falls back to the default.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ViewQuery {
    #[serde(default, deserialize_with = "deserialize_parsed")]
    pub dataset: SchoolKind,
    #[serde(default, deserialize_with = "deserialize_parsed")]
    pub direction: RankDirection,
    #[serde(default, deserialize_with = "deserialize_optional_limit")]
    pub limit: Option<usize>,
    #[serde(default)]
    pub previews: bool,
}

fn deserialize_parsed<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

fn deserialize_optional_limit<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| {
            serde::de::Error::custom(format!("limit '{value}' is not a positive integer"))
        }),
    }
}

/// Query parameters as extracted, with rejections reported through [`AppError`]
/// so every failure carries the JSON error body.
type ViewParams = Result<Query<ViewQuery>, QueryRejection>;

fn view_query(params: ViewParams) -> Result<ViewQuery, AppError> {
    params
        .map(|Query(query)| query)
        .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))
}

impl ViewQuery {
    pub(crate) fn resolved_limit(&self, state: &DashboardState) -> Result<usize, AppError> {
        match self.limit {
            Some(0) => Err(AppError::InvalidRequest("limit must be at least 1".to_string())),
            Some(limit) => Ok(limit),
            None => Ok(state.default_limit()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DatasetView {
    pub dataset: SchoolKind,
    pub label: &'static str,
    pub rows: Vec<RegionRecord>,
}

#[derive(Debug, Serialize)]
pub struct RankingView {
    pub dataset: SchoolKind,
    pub direction: RankDirection,
    pub limit: usize,
    pub entries: Vec<RankedEntry>,
}

pub(crate) async fn page_handler(
    State(state): State<DashboardState>,
    params: ViewParams,
) -> Result<Html<String>, AppError> {
    let query = view_query(params)?;
    let limit = query.resolved_limit(&state)?;
    let table = state.datasets().joined(query.dataset);
    let entries = rank(table, query.direction, limit);
    let html = render_page(state.datasets(), &query, limit, &entries)?;
    Ok(Html(html))
}

pub(crate) async fn scatter_chart_handler(
    State(state): State<DashboardState>,
    params: ViewParams,
) -> Result<impl IntoResponse, AppError> {
    let query = view_query(params)?;
    let svg = render_scatter(state.datasets().joined(query.dataset))?;
    Ok(([(header::CONTENT_TYPE, SVG_CONTENT_TYPE)], svg))
}

pub(crate) async fn ranking_chart_handler(
    State(state): State<DashboardState>,
    params: ViewParams,
) -> Result<impl IntoResponse, AppError> {
    let query = view_query(params)?;
    let limit = query.resolved_limit(&state)?;
    let entries = rank(state.datasets().joined(query.dataset), query.direction, limit);
    let svg = render_ranking(&entries, query.dataset, query.direction)?;
    Ok(([(header::CONTENT_TYPE, SVG_CONTENT_TYPE)], svg))
}

pub(crate) async fn dataset_handler(
    State(state): State<DashboardState>,
    Path(dataset): Path<String>,
) -> Result<Json<DatasetView>, AppError> {
    let kind: SchoolKind = dataset.parse().map_err(AppError::InvalidRequest)?;
    let table = state.datasets().joined(kind);
    Ok(Json(DatasetView {
        dataset: kind,
        label: kind.label(),
        rows: table.records().to_vec(),
    }))
}

pub(crate) async fn ranking_handler(
    State(state): State<DashboardState>,
    params: ViewParams,
) -> Result<Json<RankingView>, AppError> {
    let query = view_query(params)?;
    let limit = query.resolved_limit(&state)?;
    let entries = rank(state.datasets().joined(query.dataset), query.direction, limit);
    Ok(Json(RankingView {
        dataset: query.dataset,
        direction: query.direction,
        limit,
        entries,
    }))
}

pub(crate) async fn previews_handler(
    State(state): State<DashboardState>,
) -> Json<Vec<TablePreview>> {
    Json(state.datasets().previews().to_vec())
}
