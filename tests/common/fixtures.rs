//! Test fixtures for creating test data
#![allow(dead_code)]

use chrono::Utc;
use sea_orm::{entity::*, ActiveValue::Set, DatabaseConnection, DbErr};
use studyhall::orm::filter_keywords::KeywordMode;
use studyhall::orm::filter_patterns::PatternScope;
use studyhall::orm::filter_words::WordCategory;
use studyhall::orm::{filter_keywords, filter_patterns, filter_words, posts, users};

/// Create a test user
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
    is_admin: bool,
) -> Result<users::Model, DbErr> {
    users::ActiveModel {
        username: Set(username.to_string()),
        is_admin: Set(is_admin),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Create a post row directly, bypassing the filter
pub async fn create_test_post(
    db: &DatabaseConnection,
    user_id: i32,
    title: &str,
    content: &str,
) -> Result<posts::Model, DbErr> {
    posts::ActiveModel {
        user_id: Set(user_id),
        title: Set(title.to_string()),
        content: Set(content.to_string()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Create a banned word rule
pub async fn create_filter_word(
    db: &DatabaseConnection,
    word: &str,
    category: WordCategory,
    active: bool,
) -> Result<filter_words::Model, DbErr> {
    let now = Utc::now().naive_utc();
    filter_words::ActiveModel {
        word: Set(word.to_string()),
        category: Set(category),
        is_active: Set(active),
        created_by: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Create a keyword rule
pub async fn create_filter_keyword(
    db: &DatabaseConnection,
    keyword: &str,
    mode: KeywordMode,
    active: bool,
) -> Result<filter_keywords::Model, DbErr> {
    let now = Utc::now().naive_utc();
    filter_keywords::ActiveModel {
        keyword: Set(keyword.to_string()),
        mode: Set(mode),
        description: Set(None),
        is_active: Set(active),
        block_count: Set(0),
        created_by: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Create a pattern rule
pub async fn create_filter_pattern(
    db: &DatabaseConnection,
    name: &str,
    regex: &str,
    scope: PatternScope,
    active: bool,
) -> Result<filter_patterns::Model, DbErr> {
    let now = Utc::now().naive_utc();
    filter_patterns::ActiveModel {
        name: Set(name.to_string()),
        regex: Set(regex.to_string()),
        scope: Set(scope),
        description: Set(None),
        is_active: Set(active),
        block_count: Set(0),
        created_by: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}
