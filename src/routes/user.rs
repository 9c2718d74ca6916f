use actix_web::{
    web::{self, Data, Json, ReqData},
    HttpResponse,
};
use serde_json::{json, Value};

use crate::{
    app::{AppError, AppState},
    auth::{token::TokenService, AuthUser},
    database::Database,
    services::user,
    validation::{parse_body, CreateUserRequest, LoginRequest, UpdateUserRequest},
};

/// Pipe for creating an user
/// - url: `{domain}/users/`
///
/// # HTTP request requirements
/// ## body
/// - json with `name`, `username`, `email` and `password`
///
/// # Example
/// ```
/// let request = actix_web::test::TestRequest::post()
///     .uri("/users/")
///     .set_json(json!({
///         "name": "John Doe",
///         "username": "jdoe2020",
///         "email": "jdoe@test.com",
///         "password": "test"
///     }))
///     .to_request();
/// ```
///
/// # Response
/// ## Created
/// - the new user, without the password
/// ## Error
/// - Bad request
/// - Conflict, when the email or username is taken
pub async fn create_new_user<D: Database>(
    app_state: Data<AppState<D>>,
    payload: Json<Value>,
) -> Result<HttpResponse, AppError> {
    let request = parse_body::<CreateUserRequest>(payload.into_inner())?;

    let created = web::block(move || {
        user::register_user(&app_state.db, app_state.bcrypt_cost, request)
    })
    .await??;

    Ok(HttpResponse::Created().json(created))
}

/// Pipe for logging in as user
/// - url: `{domain}/users/login`
///
/// # HTTP request requirements
/// ## body
/// - json with `email` and `password`
///
/// # Response
/// ## Ok
/// ```
/// { "token": "eyJ0eXAiOiJKV1QiLCJhbGciOiJIUzI1NiJ9..." }
/// ```
/// ## Error
/// - Bad request, when either field is missing
/// - Unauthorized
pub async fn login<D: Database>(
    app_state: Data<AppState<D>>,
    tokens: Data<TokenService>,
    payload: Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let request = payload.into_inner();

    let token = web::block(move || user::login(&app_state.db, &tokens, request)).await??;

    Ok(HttpResponse::Ok().json(json!({ "token": token })))
}

pub async fn get_me<D: Database>(
    caller: ReqData<AuthUser>,
    app_state: Data<AppState<D>>,
) -> Result<HttpResponse, AppError> {
    let AuthUser(user_id) = caller.into_inner();

    let me = web::block(move || user::get_me(&app_state.db, user_id)).await??;

    Ok(HttpResponse::Ok().json(me))
}

/// Pipe for updating the caller's profile: `name`, `username` and `email`.
/// The password can't be changed here, it is ignored like any other unknown key.
pub async fn update_me<D: Database>(
    caller: ReqData<AuthUser>,
    app_state: Data<AppState<D>>,
    payload: Json<Value>,
) -> Result<HttpResponse, AppError> {
    let AuthUser(user_id) = caller.into_inner();
    let request = parse_body::<UpdateUserRequest>(payload.into_inner())?;

    let updated = web::block(move || user::update_me(&app_state.db, user_id, request)).await??;

    Ok(HttpResponse::Ok().json(updated))
}

/// Pipe for deleting the caller's account, their blogs, comments and likes go with it.
pub async fn delete_me<D: Database>(
    caller: ReqData<AuthUser>,
    app_state: Data<AppState<D>>,
) -> Result<HttpResponse, AppError> {
    let AuthUser(user_id) = caller.into_inner();

    web::block(move || user::delete_me(&app_state.db, user_id)).await??;

    Ok(HttpResponse::Ok().json(json!({ "message": "User deleted" })))
}
