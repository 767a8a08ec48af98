/// Moderation workflow surface
///
/// JSON endpoints for operators: the blocking ledger, the rule store, the
/// dashboard counts, and the learning-data view. Rendering is left to the
/// admin UI layer outside this crate.
use crate::app_config;
use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::moderation::{self, ModerationError};
use crate::orm::blocked_posts::BlockStatus;
use crate::orm::filter_keywords::KeywordMode;
use crate::orm::filter_patterns::PatternScope;
use crate::orm::filter_words::WordCategory;
use actix_web::{error, get, post, web, Error, HttpResponse};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_stats)
        // Blocking ledger
        .service(view_blocked_posts)
        .service(restore_blocked_post)
        .service(view_blocked_comments)
        .service(restore_blocked_comment)
        // Rule store management
        .service(view_filter_words)
        .service(create_filter_word)
        .service(delete_filter_word)
        .service(view_filter_keywords)
        .service(create_filter_keyword)
        .service(delete_filter_keyword)
        .service(view_filter_patterns)
        .service(create_filter_pattern)
        .service(delete_filter_pattern)
        // Learning data
        .service(view_learning_data);
}

#[derive(Deserialize)]
struct LedgerQuery {
    #[serde(default)]
    page: u64,
    size: Option<u64>,
    status: Option<String>,
}

#[derive(Deserialize)]
struct LearningQuery {
    #[serde(default)]
    page: u64,
    size: Option<u64>,
    #[serde(default)]
    min_frequency: i32,
}

#[derive(Deserialize)]
struct WordForm {
    word: String,
    category: Option<String>,
}

#[derive(Deserialize)]
struct KeywordForm {
    keyword: String,
    mode: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct PatternForm {
    name: String,
    regex: String,
    scope: Option<String>,
    description: Option<String>,
}

fn moderation_error(err: ModerationError) -> Error {
    match err {
        ModerationError::Validation(msg) => error::ErrorBadRequest(msg),
        ModerationError::NotFound(_) => error::ErrorNotFound(err.to_string()),
        ModerationError::Db(e) => {
            log::error!("Moderation query failed: {}", e);
            error::ErrorInternalServerError("Database error")
        }
    }
}

fn page_size(requested: Option<u64>) -> u64 {
    let limits = app_config::moderation();
    requested
        .unwrap_or(limits.default_page_size)
        .clamp(1, limits.max_page_size)
}

fn parse_status(raw: &Option<String>) -> Result<Option<BlockStatus>, Error> {
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => match s.to_uppercase().as_str() {
            "BLOCKED" => Ok(Some(BlockStatus::Blocked)),
            "RESTORED" => Ok(Some(BlockStatus::Restored)),
            "PENDING" => Ok(Some(BlockStatus::Pending)),
            _ => Err(error::ErrorBadRequest("Invalid status filter")),
        },
    }
}

fn parse_category(raw: &Option<String>) -> Result<WordCategory, Error> {
    match raw.as_deref() {
        None | Some("") => Ok(WordCategory::Custom),
        Some(s) => match s.to_uppercase().as_str() {
            "PROFANITY" => Ok(WordCategory::Profanity),
            "SPAM" => Ok(WordCategory::Spam),
            "AD" => Ok(WordCategory::Ad),
            "CUSTOM" => Ok(WordCategory::Custom),
            _ => Err(error::ErrorBadRequest("Invalid word category")),
        },
    }
}

fn parse_mode(raw: &Option<String>) -> Result<KeywordMode, Error> {
    match raw.as_deref() {
        None | Some("") => Ok(KeywordMode::Partial),
        Some(s) => match s.to_uppercase().as_str() {
            "EXACT" => Ok(KeywordMode::Exact),
            "PARTIAL" => Ok(KeywordMode::Partial),
            "REGEX" => Ok(KeywordMode::Regex),
            _ => Err(error::ErrorBadRequest("Invalid keyword mode")),
        },
    }
}

fn parse_scope(raw: &Option<String>) -> Result<PatternScope, Error> {
    match raw.as_deref() {
        None | Some("") => Ok(PatternScope::Both),
        Some(s) => match s.to_uppercase().as_str() {
            "TITLE" => Ok(PatternScope::Title),
            "CONTENT" => Ok(PatternScope::Content),
            "BOTH" => Ok(PatternScope::Both),
            _ => Err(error::ErrorBadRequest("Invalid pattern scope")),
        },
    }
}

// =============================================================================
// Dashboard
// =============================================================================

/// GET /admin/stats - Moderation dashboard counts
#[get("/admin/stats")]
async fn view_stats(client: ClientCtx) -> Result<HttpResponse, Error> {
    client.require_operator()?;

    let stats = moderation::get_stats(get_db_pool()).await;
    Ok(HttpResponse::Ok().json(stats))
}

// =============================================================================
// Blocking ledger
// =============================================================================

/// GET /admin/blocked-posts - Paginated ledger of blocked posts
#[get("/admin/blocked-posts")]
async fn view_blocked_posts(
    client: ClientCtx,
    query: web::Query<LedgerQuery>,
) -> Result<HttpResponse, Error> {
    client.require_operator()?;

    let status = parse_status(&query.status)?;
    let page = moderation::list_blocked_posts(
        get_db_pool(),
        query.page,
        page_size(query.size),
        status,
    )
    .await
    .map_err(moderation_error)?;

    Ok(HttpResponse::Ok().json(page))
}

/// POST /admin/blocked-posts/{id}/restore - Return a wrongly blocked post
#[post("/admin/blocked-posts/{id}/restore")]
async fn restore_blocked_post(
    client: ClientCtx,
    path: web::Path<i64>,
) -> Result<HttpResponse, Error> {
    let operator_id = client.require_operator()?;

    moderation::restore_post(get_db_pool(), path.into_inner(), operator_id)
        .await
        .map_err(moderation_error)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

/// GET /admin/blocked-comments - Paginated ledger of blocked comments
#[get("/admin/blocked-comments")]
async fn view_blocked_comments(
    client: ClientCtx,
    query: web::Query<LedgerQuery>,
) -> Result<HttpResponse, Error> {
    client.require_operator()?;

    let status = parse_status(&query.status)?;
    let page = moderation::list_blocked_comments(
        get_db_pool(),
        query.page,
        page_size(query.size),
        status,
    )
    .await
    .map_err(moderation_error)?;

    Ok(HttpResponse::Ok().json(page))
}

/// POST /admin/blocked-comments/{id}/restore - Return a wrongly blocked comment
#[post("/admin/blocked-comments/{id}/restore")]
async fn restore_blocked_comment(
    client: ClientCtx,
    path: web::Path<i64>,
) -> Result<HttpResponse, Error> {
    let operator_id = client.require_operator()?;

    moderation::restore_comment(get_db_pool(), path.into_inner(), operator_id)
        .await
        .map_err(moderation_error)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

// =============================================================================
// Rule store management
// =============================================================================

/// GET /admin/filter-words - View all banned words
#[get("/admin/filter-words")]
async fn view_filter_words(client: ClientCtx) -> Result<HttpResponse, Error> {
    client.require_operator()?;

    let words = moderation::list_words(get_db_pool())
        .await
        .map_err(moderation_error)?;
    Ok(HttpResponse::Ok().json(words))
}

/// POST /admin/filter-words - Add a banned word (reactivates if it exists)
#[post("/admin/filter-words")]
async fn create_filter_word(
    client: ClientCtx,
    form: web::Form<WordForm>,
) -> Result<HttpResponse, Error> {
    let operator_id = client.require_operator()?;

    let category = parse_category(&form.category)?;
    let word = moderation::add_word(get_db_pool(), &form.word, category, Some(operator_id))
        .await
        .map_err(moderation_error)?;

    Ok(HttpResponse::Ok().json(word))
}

/// POST /admin/filter-words/{id}/delete - Delete a banned word
#[post("/admin/filter-words/{id}/delete")]
async fn delete_filter_word(client: ClientCtx, path: web::Path<i64>) -> Result<HttpResponse, Error> {
    client.require_operator()?;

    moderation::delete_word(get_db_pool(), path.into_inner())
        .await
        .map_err(moderation_error)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

/// GET /admin/filter-keywords - View all keyword rules
#[get("/admin/filter-keywords")]
async fn view_filter_keywords(client: ClientCtx) -> Result<HttpResponse, Error> {
    client.require_operator()?;

    let keywords = moderation::list_keywords(get_db_pool())
        .await
        .map_err(moderation_error)?;
    Ok(HttpResponse::Ok().json(keywords))
}

/// POST /admin/filter-keywords - Add a keyword rule (reactivates if it exists)
#[post("/admin/filter-keywords")]
async fn create_filter_keyword(
    client: ClientCtx,
    form: web::Form<KeywordForm>,
) -> Result<HttpResponse, Error> {
    let operator_id = client.require_operator()?;

    let mode = parse_mode(&form.mode)?;
    let keyword = moderation::add_keyword(
        get_db_pool(),
        &form.keyword,
        mode,
        form.description.as_deref(),
        Some(operator_id),
    )
    .await
    .map_err(moderation_error)?;

    Ok(HttpResponse::Ok().json(keyword))
}

/// POST /admin/filter-keywords/{id}/delete - Delete a keyword rule
#[post("/admin/filter-keywords/{id}/delete")]
async fn delete_filter_keyword(
    client: ClientCtx,
    path: web::Path<i64>,
) -> Result<HttpResponse, Error> {
    client.require_operator()?;

    moderation::delete_keyword(get_db_pool(), path.into_inner())
        .await
        .map_err(moderation_error)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

/// GET /admin/filter-patterns - View all pattern rules
#[get("/admin/filter-patterns")]
async fn view_filter_patterns(client: ClientCtx) -> Result<HttpResponse, Error> {
    client.require_operator()?;

    let patterns = moderation::list_patterns(get_db_pool())
        .await
        .map_err(moderation_error)?;
    Ok(HttpResponse::Ok().json(patterns))
}

/// POST /admin/filter-patterns - Add a pattern rule
#[post("/admin/filter-patterns")]
async fn create_filter_pattern(
    client: ClientCtx,
    form: web::Form<PatternForm>,
) -> Result<HttpResponse, Error> {
    let operator_id = client.require_operator()?;

    let scope = parse_scope(&form.scope)?;
    let pattern = moderation::add_pattern(
        get_db_pool(),
        &form.name,
        &form.regex,
        scope,
        form.description.as_deref(),
        Some(operator_id),
    )
    .await
    .map_err(moderation_error)?;

    Ok(HttpResponse::Ok().json(pattern))
}

/// POST /admin/filter-patterns/{id}/delete - Delete a pattern rule
#[post("/admin/filter-patterns/{id}/delete")]
async fn delete_filter_pattern(
    client: ClientCtx,
    path: web::Path<i64>,
) -> Result<HttpResponse, Error> {
    client.require_operator()?;

    moderation::delete_pattern(get_db_pool(), path.into_inner())
        .await
        .map_err(moderation_error)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

// =============================================================================
// Learning data
// =============================================================================

/// GET /admin/ai-learning - Accumulated learning samples, frequency descending
#[get("/admin/ai-learning")]
async fn view_learning_data(
    client: ClientCtx,
    query: web::Query<LearningQuery>,
) -> Result<HttpResponse, Error> {
    client.require_operator()?;

    let page = moderation::list_learning_data(
        get_db_pool(),
        query.page,
        page_size(query.size),
        query.min_frequency,
    )
    .await
    .map_err(moderation_error)?;

    Ok(HttpResponse::Ok().json(page))
}
