use actix_web::{
    web::{self, Data, Json, Path, ReqData},
    HttpResponse,
};
use serde_json::Value;

use crate::{
    app::{AppError, AppState},
    auth::AuthUser,
    database::Database,
    services::{blog, like},
    validation::{parse_body, CreateBlogRequest, UpdateBlogRequest},
};

/// Pipe for creating a new blog
/// - url: `{domain}/blogs/`
///
/// # HTTP request requirements
/// ## header
/// - `Authorization: Bearer {token}`
/// ## body
/// - json with `title` (3 to 100 characters) and `body` (10 to 5000 characters)
///
/// # Response
/// ## Created
/// - the stored [blog](crate::database::models::blog::Blog), `author_id` is always the caller
/// ## Error
/// - Bad request, with a per field report
/// - Unauthorized
/// - Not found, when the caller's account no longer exists
pub async fn create_new_blog<D: Database>(
    user: ReqData<AuthUser>,
    app_state: Data<AppState<D>>,
    payload: Json<Value>,
) -> Result<HttpResponse, AppError> {
    let AuthUser(user_id) = user.into_inner();
    let request = parse_body::<CreateBlogRequest>(payload.into_inner())?;

    let blog = web::block(move || blog::create_blog(&app_state.db, user_id, request)).await??;

    Ok(HttpResponse::Created().json(blog))
}

/// Pipe for getting every blog
/// - url: `{domain}/blogs/`
///
/// # Response
/// ## Ok
/// - json array of blogs, each with its `author` and `likes` count
/// ```
/// [
///     {
///         "id": 1,
///         "title": "Test Title",
///         "body": "test test test",
///         "created_at": "2024-01-01T10:00:00Z",
///         "updated_at": "2024-01-01T10:00:00Z",
///         "is_archived": false,
///         "author_id": 1,
///         "author": { "id": 1, "username": "testing", "name": "test_user" },
///         "likes": 0
///     }
/// ]
/// ```
/// ## Error
/// - Not found, when there are no blogs at all
pub async fn get_blogs<D: Database>(app_state: Data<AppState<D>>) -> Result<HttpResponse, AppError> {
    let blogs = web::block(move || blog::list_blogs(&app_state.db)).await??;

    Ok(HttpResponse::Ok().json(blogs))
}

/// Pipe for getting a single blog
/// - url: `{domain}/blogs/{blog_id}`
pub async fn get_blog<D: Database>(
    path: Path<i32>,
    app_state: Data<AppState<D>>,
) -> Result<HttpResponse, AppError> {
    let blog_id = path.into_inner();
    let blog = web::block(move || blog::get_blog(&app_state.db, blog_id)).await??;

    Ok(HttpResponse::Ok().json(blog))
}

/// Pipe for editing a blog, only its author may do so
/// - url: `{domain}/blogs/{blog_id}`
///
/// # HTTP request requirements
/// ## header
/// - `Authorization: Bearer {token}`
/// ## body
/// - json with the fields being changed: `title` and/or `body`. Anything else is ignored.
///
/// # Example
/// ```
/// let request = actix_web::test::TestRequest::patch()
///     .uri("/blogs/1")
///     .insert_header((AUTHORIZATION, "Bearer test_token"))
///     .set_json(json!({ "title": "TestTest" }))
///     .to_request();
/// ```
///
/// # Response
/// ## Ok
/// - the updated blog
/// ## Error
/// - Bad request
/// - Unauthorized
/// - Forbidden
/// - Not found
pub async fn edit_blog<D: Database>(
    path: Path<i32>,
    user: ReqData<AuthUser>,
    app_state: Data<AppState<D>>,
    payload: Json<Value>,
) -> Result<HttpResponse, AppError> {
    let blog_id = path.into_inner();
    let AuthUser(user_id) = user.into_inner();
    let request = parse_body::<UpdateBlogRequest>(payload.into_inner())?;

    let blog =
        web::block(move || blog::update_blog(&app_state.db, blog_id, user_id, request)).await??;

    Ok(HttpResponse::Ok().json(blog))
}

/// Pipe for archiving a blog, or unarchiving it when it already is
/// - url: `{domain}/blogs/{blog_id}/archive`
///
/// # Response
/// ## Ok
/// ```
/// { "message": "Blog has been archived", "is_archived": true }
/// ```
/// ## Error
/// - Unauthorized
/// - Forbidden
/// - Not found
pub async fn toggle_archive<D: Database>(
    path: Path<i32>,
    user: ReqData<AuthUser>,
    app_state: Data<AppState<D>>,
) -> Result<HttpResponse, AppError> {
    let blog_id = path.into_inner();
    let AuthUser(user_id) = user.into_inner();

    let outcome =
        web::block(move || blog::toggle_blog_archive(&app_state.db, blog_id, user_id)).await??;

    Ok(HttpResponse::Ok().json(outcome))
}

/// Pipe for liking a blog. A user can like a given blog only once.
/// - url: `{domain}/blogs/{blog_id}/like`
///
/// # Response
/// ## Created
/// ```
/// { "message": "Liked", "likes": 1 }
/// ```
/// ## Error
/// - Unauthorized
/// - Not found
/// - Conflict, when the blog was already liked by the caller
pub async fn like_a_blog<D: Database>(
    path: Path<i32>,
    user: ReqData<AuthUser>,
    app_state: Data<AppState<D>>,
) -> Result<HttpResponse, AppError> {
    let blog_id = path.into_inner();
    let AuthUser(user_id) = user.into_inner();

    let outcome = web::block(move || like::like_post(&app_state.db, blog_id, user_id)).await??;

    Ok(HttpResponse::Created().json(outcome))
}
