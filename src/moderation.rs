//! Moderation workflow: the blocking ledger, rule store management, and the
//! aggregate views operators act on.
//!
//! Ledger writes happen on the submission path (see [`crate::submission`]);
//! everything else here backs the operator surface in [`crate::web::admin`].
//! Lookups that find nothing report a not-found error as-is; operator
//! actions are idempotent and safe to retry manually.

use crate::content_filter::BlockVerdict;
use crate::orm::blocked_posts::BlockStatus;
use crate::orm::filter_keywords::KeywordMode;
use crate::orm::filter_patterns::PatternScope;
use crate::orm::filter_words::WordCategory;
use crate::orm::{
    ai_learning_data, blocked_comments, blocked_posts, filter_keywords, filter_patterns,
    filter_words,
};
use chrono::Utc;
use sea_orm::{
    entity::*, query::*, ActiveValue::Set, ConnectionTrait, DatabaseConnection, DbErr,
    FromQueryResult,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// One page of a listing.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

async fn to_page<E>(
    db: &DatabaseConnection,
    query: Select<E>,
    page: u64,
    page_size: u64,
) -> Result<Page<E::Model>, DbErr>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Send + Sync + 'static,
{
    let page_size = page_size.max(1);
    let paginator = query.paginate(db, page_size as usize);
    let total_items = paginator.num_items().await? as u64;
    let total_pages = paginator.num_pages().await? as u64;
    let items = paginator.fetch_page(page as usize).await?;

    Ok(Page {
        items,
        page,
        page_size,
        total_items,
        total_pages,
    })
}

// =============================================================================
// Blocking ledger
// =============================================================================

/// Write or refresh the ledger entry for a blocked post.
///
/// `post_id` is unique in the ledger; blocking the same post again updates
/// the existing entry and puts it back in `BLOCKED` instead of tripping the
/// constraint.
pub async fn record_post_block<C: ConnectionTrait>(
    db: &C,
    post_id: i64,
    user_id: i32,
    title: &str,
    content: &str,
    verdict: &BlockVerdict,
) -> Result<blocked_posts::Model, DbErr> {
    let detected = detected_keywords_json(verdict);

    if let Some(existing) = blocked_posts::Entity::find()
        .filter(blocked_posts::Column::PostId.eq(post_id))
        .one(db)
        .await?
    {
        let mut entry: blocked_posts::ActiveModel = existing.into();
        entry.block_reason = Set(verdict.reason.clone());
        entry.block_type = Set(verdict.block_type.clone());
        entry.detected_keywords = Set(detected);
        entry.status = Set(BlockStatus::Blocked);
        return entry.update(db).await;
    }

    blocked_posts::ActiveModel {
        post_id: Set(post_id),
        user_id: Set(user_id),
        title: Set(title.to_string()),
        content: Set(content.to_string()),
        block_reason: Set(verdict.reason.clone()),
        block_type: Set(verdict.block_type.clone()),
        detected_keywords: Set(detected),
        ai_confidence: Set(None),
        is_reviewed: Set(false),
        reviewed_by: Set(None),
        reviewed_at: Set(None),
        status: Set(BlockStatus::Blocked),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Comment counterpart of [`record_post_block`], keyed by `comment_id`.
pub async fn record_comment_block<C: ConnectionTrait>(
    db: &C,
    comment_id: i64,
    post_id: i64,
    user_id: i32,
    content: &str,
    verdict: &BlockVerdict,
) -> Result<blocked_comments::Model, DbErr> {
    let detected = detected_keywords_json(verdict);

    if let Some(existing) = blocked_comments::Entity::find()
        .filter(blocked_comments::Column::CommentId.eq(comment_id))
        .one(db)
        .await?
    {
        let mut entry: blocked_comments::ActiveModel = existing.into();
        entry.block_reason = Set(verdict.reason.clone());
        entry.block_type = Set(verdict.block_type.clone());
        entry.detected_keywords = Set(detected);
        entry.status = Set(BlockStatus::Blocked);
        return entry.update(db).await;
    }

    blocked_comments::ActiveModel {
        comment_id: Set(comment_id),
        post_id: Set(post_id),
        user_id: Set(user_id),
        content: Set(content.to_string()),
        block_reason: Set(verdict.reason.clone()),
        block_type: Set(verdict.block_type.clone()),
        detected_keywords: Set(detected),
        ai_confidence: Set(None),
        is_reviewed: Set(false),
        reviewed_by: Set(None),
        reviewed_at: Set(None),
        status: Set(BlockStatus::Blocked),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
}

fn detected_keywords_json(verdict: &BlockVerdict) -> Option<String> {
    verdict
        .matched_term
        .as_ref()
        .map(|term| serde_json::to_string(&[term]).unwrap_or_default())
}

/// Mark a blocked post as wrongly blocked.
///
/// Re-restoring an already restored entry is not an error; it re-stamps the
/// reviewer and timestamp. There is no transition back to `BLOCKED`.
pub async fn restore_post(
    db: &DatabaseConnection,
    blocked_post_id: i64,
    operator_id: i32,
) -> Result<(), ModerationError> {
    let entry = blocked_posts::Entity::find_by_id(blocked_post_id)
        .one(db)
        .await?
        .ok_or(ModerationError::NotFound("Blocked post"))?;

    let mut entry: blocked_posts::ActiveModel = entry.into();
    entry.status = Set(BlockStatus::Restored);
    entry.is_reviewed = Set(true);
    entry.reviewed_by = Set(Some(operator_id));
    entry.reviewed_at = Set(Some(Utc::now().naive_utc()));
    entry.update(db).await?;

    log::info!(
        "Blocked post {} restored by operator {}",
        blocked_post_id,
        operator_id
    );
    Ok(())
}

/// Comment counterpart of [`restore_post`].
pub async fn restore_comment(
    db: &DatabaseConnection,
    blocked_comment_id: i64,
    operator_id: i32,
) -> Result<(), ModerationError> {
    let entry = blocked_comments::Entity::find_by_id(blocked_comment_id)
        .one(db)
        .await?
        .ok_or(ModerationError::NotFound("Blocked comment"))?;

    let mut entry: blocked_comments::ActiveModel = entry.into();
    entry.status = Set(BlockStatus::Restored);
    entry.is_reviewed = Set(true);
    entry.reviewed_by = Set(Some(operator_id));
    entry.reviewed_at = Set(Some(Utc::now().naive_utc()));
    entry.update(db).await?;

    log::info!(
        "Blocked comment {} restored by operator {}",
        blocked_comment_id,
        operator_id
    );
    Ok(())
}

/// Ledger of blocked posts, newest first, optionally filtered by status.
pub async fn list_blocked_posts(
    db: &DatabaseConnection,
    page: u64,
    page_size: u64,
    status: Option<BlockStatus>,
) -> Result<Page<blocked_posts::Model>, ModerationError> {
    let mut query =
        blocked_posts::Entity::find().order_by_desc(blocked_posts::Column::CreatedAt);
    if let Some(status) = status {
        query = query.filter(blocked_posts::Column::Status.eq(status));
    }
    Ok(to_page(db, query, page, page_size).await?)
}

/// Ledger of blocked comments, newest first, optionally filtered by status.
pub async fn list_blocked_comments(
    db: &DatabaseConnection,
    page: u64,
    page_size: u64,
    status: Option<BlockStatus>,
) -> Result<Page<blocked_comments::Model>, ModerationError> {
    let mut query =
        blocked_comments::Entity::find().order_by_desc(blocked_comments::Column::CreatedAt);
    if let Some(status) = status {
        query = query.filter(blocked_comments::Column::Status.eq(status));
    }
    Ok(to_page(db, query, page, page_size).await?)
}

// =============================================================================
// Rule store management
// =============================================================================

/// Add a banned word, or reactivate it if it already exists.
///
/// Words are stored lower-cased so the unique constraint is case-folded too.
pub async fn add_word(
    db: &DatabaseConnection,
    word: &str,
    category: WordCategory,
    operator_id: Option<i32>,
) -> Result<filter_words::Model, ModerationError> {
    let word = word.trim().to_lowercase();
    if word.is_empty() {
        return Err(ModerationError::Validation(
            "Word must not be empty".to_string(),
        ));
    }

    let now = Utc::now().naive_utc();

    if let Some(existing) = filter_words::Entity::find()
        .filter(filter_words::Column::Word.eq(word.clone()))
        .one(db)
        .await?
    {
        let mut row: filter_words::ActiveModel = existing.into();
        row.category = Set(category);
        row.is_active = Set(true);
        row.updated_at = Set(now);
        let row = row.update(db).await?;
        log::info!("Filter word '{}' reactivated", row.word);
        return Ok(row);
    }

    let row = filter_words::ActiveModel {
        word: Set(word),
        category: Set(category),
        is_active: Set(true),
        created_by: Set(operator_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    log::info!("Filter word '{}' added", row.word);
    Ok(row)
}

pub async fn delete_word(db: &DatabaseConnection, id: i64) -> Result<(), ModerationError> {
    let result = filter_words::Entity::delete_many()
        .filter(filter_words::Column::Id.eq(id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(ModerationError::NotFound("Filter word"));
    }
    log::info!("Filter word {} deleted", id);
    Ok(())
}

/// Add a keyword rule, or reactivate it if it already exists, updating its
/// mode and description either way.
pub async fn add_keyword(
    db: &DatabaseConnection,
    keyword: &str,
    mode: KeywordMode,
    description: Option<&str>,
    operator_id: Option<i32>,
) -> Result<filter_keywords::Model, ModerationError> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Err(ModerationError::Validation(
            "Keyword must not be empty".to_string(),
        ));
    }
    if mode == KeywordMode::Regex {
        if let Err(e) = regex::Regex::new(keyword) {
            return Err(ModerationError::Validation(format!(
                "Invalid regex pattern: {}",
                e
            )));
        }
    }

    let now = Utc::now().naive_utc();
    let description = description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty());

    if let Some(existing) = filter_keywords::Entity::find()
        .filter(filter_keywords::Column::Keyword.eq(keyword))
        .one(db)
        .await?
    {
        let mut row: filter_keywords::ActiveModel = existing.into();
        row.mode = Set(mode);
        row.description = Set(description);
        row.is_active = Set(true);
        row.updated_at = Set(now);
        let row = row.update(db).await?;
        log::info!("Filter keyword '{}' reactivated", row.keyword);
        return Ok(row);
    }

    let row = filter_keywords::ActiveModel {
        keyword: Set(keyword.to_string()),
        mode: Set(mode),
        description: Set(description),
        is_active: Set(true),
        block_count: Set(0),
        created_by: Set(operator_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    log::info!("Filter keyword '{}' added", row.keyword);
    Ok(row)
}

pub async fn delete_keyword(db: &DatabaseConnection, id: i64) -> Result<(), ModerationError> {
    let result = filter_keywords::Entity::delete_many()
        .filter(filter_keywords::Column::Id.eq(id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(ModerationError::NotFound("Filter keyword"));
    }
    log::info!("Filter keyword {} deleted", id);
    Ok(())
}

/// Add a pattern rule. The regex must compile; evaluation still tolerates
/// rows that went bad after the fact.
pub async fn add_pattern(
    db: &DatabaseConnection,
    name: &str,
    pattern_regex: &str,
    scope: PatternScope,
    description: Option<&str>,
    operator_id: Option<i32>,
) -> Result<filter_patterns::Model, ModerationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ModerationError::Validation(
            "Pattern name must not be empty".to_string(),
        ));
    }
    if let Err(e) = regex::Regex::new(pattern_regex) {
        return Err(ModerationError::Validation(format!(
            "Invalid regex pattern: {}",
            e
        )));
    }

    let now = Utc::now().naive_utc();
    let description = description.map(|d| d.trim().to_string()).filter(|d| !d.is_empty());

    let row = filter_patterns::ActiveModel {
        name: Set(name.to_string()),
        regex: Set(pattern_regex.to_string()),
        scope: Set(scope),
        description: Set(description),
        is_active: Set(true),
        block_count: Set(0),
        created_by: Set(operator_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    log::info!("Filter pattern '{}' added", row.name);
    Ok(row)
}

pub async fn delete_pattern(db: &DatabaseConnection, id: i64) -> Result<(), ModerationError> {
    let result = filter_patterns::Entity::delete_many()
        .filter(filter_patterns::Column::Id.eq(id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(ModerationError::NotFound("Filter pattern"));
    }
    log::info!("Filter pattern {} deleted", id);
    Ok(())
}

pub async fn list_words(
    db: &DatabaseConnection,
) -> Result<Vec<filter_words::Model>, ModerationError> {
    Ok(filter_words::Entity::find()
        .order_by_asc(filter_words::Column::Word)
        .all(db)
        .await?)
}

pub async fn list_keywords(
    db: &DatabaseConnection,
) -> Result<Vec<filter_keywords::Model>, ModerationError> {
    Ok(filter_keywords::Entity::find()
        .order_by_asc(filter_keywords::Column::Keyword)
        .all(db)
        .await?)
}

pub async fn list_patterns(
    db: &DatabaseConnection,
) -> Result<Vec<filter_patterns::Model>, ModerationError> {
    Ok(filter_patterns::Entity::find()
        .order_by_asc(filter_patterns::Column::Name)
        .all(db)
        .await?)
}

// =============================================================================
// Aggregates
// =============================================================================

/// Counts shown on the moderation dashboard.
#[derive(Debug, Default, Serialize)]
pub struct ModerationStats {
    pub blocked_posts: i64,
    pub blocked_comments: i64,
    pub filter_words: i64,
    pub filter_keywords: i64,
    pub filter_patterns: i64,
}

/// Gather dashboard counts. Each count degrades to zero on failure so one
/// bad query cannot blank the whole panel.
pub async fn get_stats(db: &DatabaseConnection) -> ModerationStats {
    ModerationStats {
        blocked_posts: blocked_posts::Entity::find()
            .filter(blocked_posts::Column::Status.eq(BlockStatus::Blocked))
            .count(db)
            .await
            .unwrap_or(0) as i64,
        blocked_comments: blocked_comments::Entity::find()
            .filter(blocked_comments::Column::Status.eq(BlockStatus::Blocked))
            .count(db)
            .await
            .unwrap_or(0) as i64,
        filter_words: filter_words::Entity::find().count(db).await.unwrap_or(0) as i64,
        filter_keywords: filter_keywords::Entity::find().count(db).await.unwrap_or(0) as i64,
        filter_patterns: filter_patterns::Entity::find().count(db).await.unwrap_or(0) as i64,
    }
}

/// Learning samples ordered by frequency descending, then newest first.
///
/// Every sample is written with frequency 1 today, so the order degrades to
/// creation order; the knob stays for tooling that merges samples offline.
pub async fn list_learning_data(
    db: &DatabaseConnection,
    page: u64,
    page_size: u64,
    min_frequency: i32,
) -> Result<Page<ai_learning_data::Model>, ModerationError> {
    let mut query = ai_learning_data::Entity::find()
        .order_by_desc(ai_learning_data::Column::Frequency)
        .order_by_desc(ai_learning_data::Column::CreatedAt);
    if min_frequency > 0 {
        query = query.filter(ai_learning_data::Column::Frequency.gte(min_frequency));
    }
    Ok(to_page(db, query, page, page_size).await?)
}
