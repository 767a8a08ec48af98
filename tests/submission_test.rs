//! Submission flow integration tests
//!
//! The create-then-filter-then-undo contract: clean content survives, blocked
//! posts vanish into the ledger, blocked comments are soft-deleted.

mod common;

use common::database::{cleanup_test_data, setup_test_database};
use common::fixtures::{create_filter_word, create_test_user};
use sea_orm::{entity::*, query::*};
use serial_test::serial;
use studyhall::content_filter::FilterError;
use studyhall::orm::blocked_posts::BlockStatus;
use studyhall::orm::filter_words::WordCategory;
use studyhall::orm::{blocked_comments, blocked_posts, comments, posts};
use studyhall::submission::{self, SubmissionError};

#[actix_rt::test]
#[serial]
async fn test_clean_post_is_persisted() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to clean up");

    let user = create_test_user(&db, "author", false).await.unwrap();
    create_filter_word(&db, "spamword", WordCategory::Spam, true)
        .await
        .unwrap();

    let post = submission::submit_post(&db, user.id, "Study group", "weekly algebra sessions")
        .await
        .expect("Clean post should pass");

    let stored = posts::Entity::find_by_id(post.id)
        .one(&db)
        .await
        .unwrap()
        .expect("Post row should survive");
    assert_eq!(stored.title, "Study group");

    let ledger = blocked_posts::Entity::find().count(&db).await.unwrap();
    assert_eq!(ledger, 0);
}

#[actix_rt::test]
#[serial]
async fn test_blocked_post_is_deleted_and_ledgered() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to clean up");

    let user = create_test_user(&db, "author", false).await.unwrap();
    create_filter_word(&db, "spamword", WordCategory::Spam, true)
        .await
        .unwrap();

    let result =
        submission::submit_post(&db, user.id, "Totally fine", "this has spamword inside").await;
    match result {
        Err(SubmissionError::Blocked { reason, .. }) => {
            assert!(reason.contains("spamword"), "Reason must name the match")
        }
        other => panic!("Expected a blocked submission, got {:?}", other.map(|p| p.id)),
    }

    // The content row is gone; the snapshot lives in the ledger.
    let surviving = posts::Entity::find().count(&db).await.unwrap();
    assert_eq!(surviving, 0);

    let entry = blocked_posts::Entity::find()
        .one(&db)
        .await
        .unwrap()
        .expect("Ledger entry should exist");
    assert_eq!(entry.user_id, user.id);
    assert_eq!(entry.title, "Totally fine");
    assert_eq!(entry.content, "this has spamword inside");
    assert_eq!(entry.status, BlockStatus::Blocked);
    assert!(!entry.is_reviewed);
    assert_eq!(
        entry.detected_keywords.as_deref(),
        Some("[\"spamword\"]"),
        "Matched terms are stored as a JSON list"
    );
}

#[actix_rt::test]
#[serial]
async fn test_blocked_comment_is_soft_deleted() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to clean up");

    let user = create_test_user(&db, "author", false).await.unwrap();
    let post = submission::submit_post(&db, user.id, "Clean", "clean body")
        .await
        .expect("Clean post should pass");

    create_filter_word(&db, "spamword", WordCategory::Spam, true)
        .await
        .unwrap();

    let result = submission::submit_comment(&db, post.id, user.id, "reply with spamword").await;
    assert!(matches!(result, Err(SubmissionError::Blocked { .. })));

    let comment = comments::Entity::find()
        .one(&db)
        .await
        .unwrap()
        .expect("Comment row stays behind");
    assert!(comment.is_deleted, "Blocked comments are soft-deleted");

    let entry = blocked_comments::Entity::find()
        .one(&db)
        .await
        .unwrap()
        .expect("Ledger entry should exist");
    assert_eq!(entry.comment_id, comment.id);
    assert_eq!(entry.post_id, post.id);
    assert_eq!(entry.content, "reply with spamword");
}

#[actix_rt::test]
#[serial]
async fn test_comment_under_missing_post_is_not_found() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to clean up");

    let user = create_test_user(&db, "author", false).await.unwrap();

    let result = submission::submit_comment(&db, 424242, user.id, "hello").await;
    assert!(matches!(result, Err(SubmissionError::NotFound(_))));
}

#[actix_rt::test]
#[serial]
async fn test_empty_submission_is_rejected_without_a_row() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to clean up");

    let user = create_test_user(&db, "author", false).await.unwrap();

    let result = submission::submit_post(&db, user.id, "Title", "   ").await;
    assert!(matches!(
        result,
        Err(SubmissionError::Filter(FilterError::Validation(_)))
    ));

    let surviving = posts::Entity::find().count(&db).await.unwrap();
    assert_eq!(surviving, 0, "Validation failures must not leave rows behind");
}

#[actix_rt::test]
#[serial]
async fn test_update_screening_reblocks_via_upsert() {
    let db = setup_test_database()
        .await
        .expect("Failed to connect to test database");
    cleanup_test_data(&db).await.expect("Failed to clean up");

    let user = create_test_user(&db, "author", false).await.unwrap();
    create_filter_word(&db, "spamword", WordCategory::Spam, true)
        .await
        .unwrap();

    submission::submit_post(&db, user.id, "One", "first spamword try")
        .await
        .expect_err("Should block");

    // The same content id coming around again (an edit path re-screening)
    // updates the ledger entry rather than violating the unique key.
    let entry = blocked_posts::Entity::find().one(&db).await.unwrap().unwrap();
    let verdict = studyhall::content_filter::BlockVerdict {
        reason: "Banned keyword detected: retry".to_string(),
        block_type: studyhall::orm::blocked_posts::BlockType::Keyword,
        matched_term: Some("retry".to_string()),
        matched_pattern: None,
    };
    let updated = studyhall::moderation::record_post_block(
        &db,
        entry.post_id,
        user.id,
        "One",
        "first spamword try",
        &verdict,
    )
    .await
    .unwrap();
    assert_eq!(updated.id, entry.id);

    let total = blocked_posts::Entity::find().count(&db).await.unwrap();
    assert_eq!(total, 1);
}
