pub mod password;
pub mod token;

use actix_web::{
    dev::{ServiceRequest, ServiceResponse},
    http::header::{self, HeaderValue},
    middleware::ErrorHandlerResponse,
    web::Data,
    HttpMessage,
};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use serde_json::json;

use crate::app::AppError;
use token::TokenService;

/// Identity of the caller, resolved from a verified bearer token.
/// Lives in the request extensions for the duration of that request only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub i32);

/// Validator for `HttpAuthentication::bearer`, wraps every route that needs a logged in user.
/// On success the user id is made available to the handler through `ReqData<AuthUser>`.
pub async fn bearer_auth_validator(
    req: ServiceRequest,
    creds: BearerAuth,
) -> Result<ServiceRequest, (actix_web::Error, ServiceRequest)> {
    let tokens = match req.app_data::<Data<TokenService>>() {
        Some(tokens) => tokens.clone(),
        None => {
            return Err((
                AppError::internal("token service not registered").into(),
                req,
            ))
        }
    };

    match tokens.verify(creds.token()) {
        Ok(user_id) => {
            req.extensions_mut().insert(AuthUser(user_id));
            Ok(req)
        }
        Err(err) => {
            log::debug!("rejected bearer token for {}: {}", req.path(), err);
            Err((AppError::from(err).into(), req))
        }
    }
}

/// `ErrorHandlers` hook for 401s. The bearer extractor answers a missing or
/// malformed `Authorization` header with an empty body, give it the usual error shape.
pub fn missing_token_body<B>(
    res: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    if res.headers().contains_key(header::CONTENT_TYPE) {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let (req, res) = res.into_parts();
    let mut res = res.set_body(json!({ "error": "Missing bearer token" }).to_string());
    res.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, res)
            .map_into_boxed_body()
            .map_into_right_body(),
    ))
}
