//! SeaORM entities, one module per table.
//!
//! `users`, `posts`, and `comments` are minimal stand-ins for platform tables
//! owned by collaborators outside this crate; moderation records reference
//! them but never manage them.

pub mod ai_learning_data;
pub mod blocked_comments;
pub mod blocked_posts;
pub mod comments;
pub mod filter_keywords;
pub mod filter_patterns;
pub mod filter_words;
pub mod posts;
pub mod users;
