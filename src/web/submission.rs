/// Inbound submission endpoints
///
/// The thin HTTP face of the create-then-filter contract. A block verdict is
/// surfaced to the submitter as 422 with the human-readable reason; storage
/// failures abort the request so nothing lands unscreened.
use crate::content_filter::FilterError;
use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::submission::{self, SubmissionError};
use actix_web::{error, post, web, Error, HttpResponse};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(create_post).service(create_comment);
}

#[derive(Deserialize)]
struct NewPostFormData {
    title: String,
    content: String,
}

#[derive(Deserialize)]
struct NewCommentFormData {
    content: String,
}

fn submission_rejection(err: SubmissionError) -> Result<HttpResponse, Error> {
    match err {
        SubmissionError::Blocked { reason, block_type } => {
            Ok(HttpResponse::UnprocessableEntity().json(serde_json::json!({
                "blocked": true,
                "reason": reason,
                "block_type": block_type,
            })))
        }
        SubmissionError::NotFound(what) => Err(error::ErrorNotFound(format!("{} not found", what))),
        SubmissionError::Filter(FilterError::Validation(msg)) => Err(error::ErrorBadRequest(msg)),
        SubmissionError::Filter(FilterError::Db(e)) | SubmissionError::Db(e) => {
            log::error!("Submission failed: {}", e);
            Err(error::ErrorInternalServerError("Database error"))
        }
    }
}

/// POST /posts - Create a post, screened through the content filter
#[post("/posts")]
async fn create_post(
    client: ClientCtx,
    form: web::Form<NewPostFormData>,
) -> Result<HttpResponse, Error> {
    let user_id = client.require_login()?;

    match submission::submit_post(get_db_pool(), user_id, &form.title, &form.content).await {
        Ok(post) => Ok(HttpResponse::Created().json(post)),
        Err(err) => submission_rejection(err),
    }
}

/// POST /posts/{post_id}/comments - Create a comment, screened through the
/// content filter
#[post("/posts/{post_id}/comments")]
async fn create_comment(
    client: ClientCtx,
    path: web::Path<i64>,
    form: web::Form<NewCommentFormData>,
) -> Result<HttpResponse, Error> {
    let user_id = client.require_login()?;

    match submission::submit_comment(get_db_pool(), path.into_inner(), user_id, &form.content).await
    {
        Ok(comment) => Ok(HttpResponse::Created().json(comment)),
        Err(err) => submission_rejection(err),
    }
}
