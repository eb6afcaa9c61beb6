use crate::cache::Cache;
use crate::db::{Database, Faq, Language};
use crate::error::ApiError;
use crate::faq::{self, FaqItem};
use crate::translator::Translator;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub cache: Arc<Cache>,
    pub translator: Translator,
    pub source_lang: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/faqs/", get(list_faqs).post(create_faq))
        .route("/api/faqs/:id", put(update_faq))
        .route("/api/languages/", post(create_language))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Deserialize)]
struct ListParams {
    lang: Option<String>,
}

/// `GET /api/faqs/?lang=<code>`
///
/// Always 200; an unrecognized code falls back to the source language.
async fn list_faqs(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<FaqItem>>, ApiError> {
    let lang_code = params.lang.unwrap_or_else(|| state.source_lang.clone());

    let items = faq::list_faqs_for_language(
        &state.db,
        &state.cache,
        &state.translator,
        &state.source_lang,
        &lang_code,
    )
    .await?;

    Ok(Json(items))
}

#[derive(Debug, Deserialize)]
struct FaqPayload {
    question: String,
    answer: String,
}

async fn create_faq(
    State(state): State<AppState>,
    Json(payload): Json<FaqPayload>,
) -> Result<(StatusCode, Json<Faq>), ApiError> {
    let faq = faq::create_faq(
        &state.db,
        &state.cache,
        &state.translator,
        &state.source_lang,
        &payload.question,
        &payload.answer,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(faq)))
}

async fn update_faq(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<FaqPayload>,
) -> Result<Json<Faq>, ApiError> {
    let faq = faq::update_faq(
        &state.db,
        &state.cache,
        &state.translator,
        &state.source_lang,
        id,
        &payload.question,
        &payload.answer,
    )
    .await?
    .ok_or(ApiError::NotFound("FAQ"))?;

    Ok(Json(faq))
}

#[derive(Debug, Deserialize)]
struct LanguagePayload {
    code: String,
}

async fn create_language(
    State(state): State<AppState>,
    Json(payload): Json<LanguagePayload>,
) -> Result<(StatusCode, Json<Language>), ApiError> {
    let language = faq::create_language(
        &state.db,
        &state.translator,
        &state.source_lang,
        &payload.code,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(language)))
}
