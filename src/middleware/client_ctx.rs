//! Request-scoped client context.
//!
//! Resolves the session's user id against the user table once per request.
//! Login itself happens outside this crate; the `user_id` session key is the
//! contract.

use crate::db::get_db_pool;
use crate::orm::users;
use actix_session::SessionExt;
use actix_web::dev::Payload;
use actix_web::{error, Error, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use sea_orm::entity::*;

/// Client context passed to routes. A `None` user is a guest.
#[derive(Clone, Debug, Default)]
pub struct ClientCtx {
    user: Option<users::Model>,
}

impl ClientCtx {
    pub fn get_id(&self) -> Option<i32> {
        self.user.as_ref().map(|u| u.id)
    }

    /// Returns the user id or ErrorUnauthorized.
    pub fn require_login(&self) -> Result<i32, Error> {
        self.get_id()
            .ok_or_else(|| error::ErrorUnauthorized("Login required"))
    }

    /// Returns the operator id or an error. Moderation surfaces are
    /// restricted to administrator accounts.
    pub fn require_operator(&self) -> Result<i32, Error> {
        let user = self
            .user
            .as_ref()
            .ok_or_else(|| error::ErrorUnauthorized("Login required"))?;
        if !user.is_admin {
            return Err(error::ErrorForbidden("Insufficient permissions"));
        }
        Ok(user.id)
    }
}

impl FromRequest for ClientCtx {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let session = req.get_session();

        Box::pin(async move {
            let user_id = session.get::<i32>("user_id").unwrap_or(None);
            let user = match user_id {
                Some(id) => users::Entity::find_by_id(id)
                    .one(get_db_pool())
                    .await
                    .map_err(|e| {
                        log::error!("Failed to load session user {}: {}", id, e);
                        error::ErrorInternalServerError("Database error")
                    })?,
                None => None,
            };

            Ok(ClientCtx { user })
        })
    }
}
