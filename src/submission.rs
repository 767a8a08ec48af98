//! Submission-time integration between the content CRUD flow and the filter.
//!
//! Content is stored first so the ledger snapshot can reference a real row
//! id, then screened. A blocked post is deleted and a blocked comment is
//! soft-deleted, in the same transaction as the ledger write so neither can
//! land without the other. The wasted write per blocked submission is
//! accepted; blocking is rare.

use crate::content_filter::{self, FilterError, Verdict};
use crate::moderation;
use crate::orm::blocked_posts::BlockType;
use crate::orm::{comments, posts};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    entity::*, query::*, ActiveValue::Set, DatabaseConnection, DbErr, TransactionTrait,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The expected outcome of a block verdict; carries the reason shown to
    /// the submitter.
    #[error("{reason}")]
    Blocked {
        reason: String,
        block_type: BlockType,
    },
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Create a post, screening it through the filter engine.
///
/// On a block verdict the ledger entry is written and the just-created post
/// row deleted atomically, and the verdict is returned as
/// [`SubmissionError::Blocked`].
pub async fn submit_post(
    db: &DatabaseConnection,
    user_id: i32,
    title: &str,
    content: &str,
) -> Result<posts::Model, SubmissionError> {
    if content.trim().is_empty() {
        return Err(FilterError::Validation("Content must not be empty".to_string()).into());
    }

    let post = posts::ActiveModel {
        user_id: Set(user_id),
        title: Set(title.to_string()),
        content: Set(content.to_string()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let verdict = match content_filter::evaluate(db, Some(title), content).await {
        Ok(verdict) => verdict,
        Err(e) => {
            // Fail closed: a row that could not be screened does not survive.
            let _ = posts::Entity::delete_many()
                .filter(posts::Column::Id.eq(post.id))
                .exec(db)
                .await;
            return Err(e.into());
        }
    };

    match verdict {
        Verdict::Pass => Ok(post),
        Verdict::Block(verdict) => {
            let txn = db.begin().await?;
            moderation::record_post_block(&txn, post.id, user_id, title, content, &verdict)
                .await?;
            posts::Entity::delete_many()
                .filter(posts::Column::Id.eq(post.id))
                .exec(&txn)
                .await?;
            txn.commit().await?;

            log::info!("Post {} blocked: {}", post.id, verdict.reason);
            Err(SubmissionError::Blocked {
                reason: verdict.reason,
                block_type: verdict.block_type,
            })
        }
    }
}

/// Create a comment under `post_id`, screening it through the filter engine.
///
/// Blocked comments stay in the table soft-deleted, unlike posts.
pub async fn submit_comment(
    db: &DatabaseConnection,
    post_id: i64,
    user_id: i32,
    content: &str,
) -> Result<comments::Model, SubmissionError> {
    if content.trim().is_empty() {
        return Err(FilterError::Validation("Content must not be empty".to_string()).into());
    }

    posts::Entity::find_by_id(post_id)
        .one(db)
        .await?
        .ok_or(SubmissionError::NotFound("Post"))?;

    let comment = comments::ActiveModel {
        post_id: Set(post_id),
        user_id: Set(user_id),
        content: Set(content.to_string()),
        is_deleted: Set(false),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let verdict = match content_filter::evaluate(db, None, content).await {
        Ok(verdict) => verdict,
        Err(e) => {
            // Fail closed: a row that could not be screened does not survive.
            let _ = comments::Entity::delete_many()
                .filter(comments::Column::Id.eq(comment.id))
                .exec(db)
                .await;
            return Err(e.into());
        }
    };

    match verdict {
        Verdict::Pass => Ok(comment),
        Verdict::Block(verdict) => {
            let txn = db.begin().await?;
            moderation::record_comment_block(
                &txn, comment.id, post_id, user_id, content, &verdict,
            )
            .await?;
            comments::Entity::update_many()
                .col_expr(comments::Column::IsDeleted, Expr::value(true))
                .filter(comments::Column::Id.eq(comment.id))
                .exec(&txn)
                .await?;
            txn.commit().await?;

            log::info!("Comment {} blocked: {}", comment.id, verdict.reason);
            Err(SubmissionError::Blocked {
                reason: verdict.reason,
                block_type: verdict.block_type,
            })
        }
    }
}
