use actix_web::{
    web::{self, Data, Json, Path, ReqData},
    HttpResponse,
};
use serde_json::Value;

use crate::{
    app::{AppError, AppState},
    auth::AuthUser,
    database::Database,
    services::comment,
    validation::{parse_body, CreateCommentRequest, UpdateCommentRequest},
};

/// Pipe for creating a comment
/// - url: `{domain}/blogs/{blog_id}/comments`
///
/// # HTTP request requires
/// - `{blog_id}` as a parameter
///
/// ## header
/// - `Authorization: Bearer {token}`
///
/// ## body
/// - json with the comment `content`, 1 to 250 characters
///
/// # Response
/// ## Created
/// - the stored comment
/// ## Error
/// - Unauthorized
/// - Bad request
/// - Not found
pub async fn create_comment<D: Database>(
    path: Path<i32>,
    user: ReqData<AuthUser>,
    app_state: Data<AppState<D>>,
    payload: Json<Value>,
) -> Result<HttpResponse, AppError> {
    let blog_id = path.into_inner();
    let AuthUser(user_id) = user.into_inner();
    let request = parse_body::<CreateCommentRequest>(payload.into_inner())?;

    let comment =
        web::block(move || comment::create_comment(&app_state.db, blog_id, user_id, request))
            .await??;

    Ok(HttpResponse::Created().json(comment))
}

/// Pipe for getting comments from blog
/// - url: `{domain}/blogs/{blog_id}/comments`
///
/// # Response
/// ## Ok
/// - json array of the blog's comments, oldest first
/// ```
/// [
///     {
///         "id": 1,
///         "content": "blah blah blah",
///         "is_updated": false,
///         "is_archived": false,
///         "created_at": "2024-01-01T10:00:00Z",
///         "updated_at": "2024-01-01T10:00:00Z",
///         "user_id": 1,
///         "post_id": 1
///     }
/// ]
/// ```
/// ## Error
/// - Not found, for a missing blog or a blog without comments
pub async fn get_comments<D: Database>(
    path: Path<i32>,
    app_state: Data<AppState<D>>,
) -> Result<HttpResponse, AppError> {
    let blog_id = path.into_inner();

    let comments =
        web::block(move || comment::list_comments_for_blog(&app_state.db, blog_id)).await??;

    Ok(HttpResponse::Ok().json(comments))
}

/// Pipe for editing a comment, only its author may do so.
/// - url: `{domain}/blogs/{blog_id}/comments/{comment_id}`
///
/// The comment is flagged `is_updated` from then on.
pub async fn edit_comment<D: Database>(
    path: Path<(i32, i32)>,
    user: ReqData<AuthUser>,
    app_state: Data<AppState<D>>,
    payload: Json<Value>,
) -> Result<HttpResponse, AppError> {
    let (blog_id, comment_id) = path.into_inner();
    let AuthUser(user_id) = user.into_inner();
    let request = parse_body::<UpdateCommentRequest>(payload.into_inner())?;

    let comment = web::block(move || {
        comment::update_comment(&app_state.db, blog_id, comment_id, user_id, request)
    })
    .await??;

    Ok(HttpResponse::Ok().json(comment))
}

pub async fn toggle_comment_archive<D: Database>(
    path: Path<(i32, i32)>,
    user: ReqData<AuthUser>,
    app_state: Data<AppState<D>>,
) -> Result<HttpResponse, AppError> {
    let (blog_id, comment_id) = path.into_inner();
    let AuthUser(user_id) = user.into_inner();

    let outcome = web::block(move || {
        comment::toggle_comment_archive(&app_state.db, blog_id, comment_id, user_id)
    })
    .await??;

    Ok(HttpResponse::Ok().json(outcome))
}

#[cfg(test)]
mod tests {
    use actix_web::{
        http::StatusCode,
        test::{self, call_service, read_body_json},
    };
    use serde_json::{json, Value};

    use crate::{
        database::memory::MemoryDatabase,
        routes::test_support::{bearer, tokens},
        services::fixtures,
    };

    #[actix_rt::test]
    async fn test_new_comment() {
        let db = MemoryDatabase::new();
        let tokens = tokens();
        let app = test_app!(db, tokens);
        let user = fixtures::user(&db, "testing", "test@test.com", "test");
        let blog = fixtures::blog(&db, &user);

        let req = test::TestRequest::post()
            .uri(format!("/blogs/{}/comments", blog.id).as_str())
            .insert_header(bearer(&tokens, user.id))
            .set_json(json!({ "content": "test test", "user_id": 77, "post_id": 77 }))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = read_body_json(resp).await;
        pretty_assertions::assert_eq!(body["content"], "test test");
        pretty_assertions::assert_eq!(body["user_id"], user.id);
        pretty_assertions::assert_eq!(body["post_id"], blog.id);
    }

    #[actix_rt::test]
    async fn test_new_comment_requires_token() {
        let db = MemoryDatabase::new();
        let tokens = tokens();
        let app = test_app!(db, tokens);
        let user = fixtures::user(&db, "testing", "test@test.com", "test");
        let blog = fixtures::blog(&db, &user);

        let req = test::TestRequest::post()
            .uri(format!("/blogs/{}/comments", blog.id).as_str())
            .set_json(json!({ "content": "test" }))
            .to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_get_comments() {
        let db = MemoryDatabase::new();
        let tokens = tokens();
        let app = test_app!(db, tokens);
        let user = fixtures::user(&db, "testing", "test@test.com", "test");
        let blog = fixtures::blog(&db, &user);
        fixtures::comment(&db, &blog, &user);

        let req = test::TestRequest::get()
            .uri(format!("/blogs/{}/comments", blog.id).as_str())
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = read_body_json(resp).await;
        pretty_assertions::assert_eq!(body[0]["content"], "blah blah blah");
    }

    #[actix_rt::test]
    async fn test_edit_comment() {
        let db = MemoryDatabase::new();
        let tokens = tokens();
        let app = test_app!(db, tokens);
        let user = fixtures::user(&db, "testing", "test@test.com", "test");
        let blog = fixtures::blog(&db, &user);
        let comment = fixtures::comment(&db, &blog, &user);

        let req = test::TestRequest::patch()
            .uri(format!("/blogs/{}/comments/{}", blog.id, comment.id).as_str())
            .insert_header(bearer(&tokens, user.id))
            .set_json(json!({ "content": "tessssssst", "is_updated": false }))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = read_body_json(resp).await;
        pretty_assertions::assert_eq!(body["content"], "tessssssst");
        pretty_assertions::assert_eq!(body["is_updated"], true);

        let req = test::TestRequest::patch()
            .uri(format!("/blogs/{}/comments/{}", blog.id, comment.id).as_str())
            .set_json(json!({ "content": "tessst" }))
            .to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_toggle_comment_archive() {
        let db = MemoryDatabase::new();
        let tokens = tokens();
        let app = test_app!(db, tokens);
        let user = fixtures::user(&db, "testing", "test@test.com", "test");
        let other = fixtures::user(&db, "other", "other@test.com", "test");
        let blog = fixtures::blog(&db, &user);
        let comment = fixtures::comment(&db, &blog, &user);
        let uri = format!("/blogs/{}/comments/{}/archive", blog.id, comment.id);

        let req = test::TestRequest::patch()
            .uri(uri.as_str())
            .insert_header(bearer(&tokens, user.id))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = read_body_json(resp).await;
        pretty_assertions::assert_eq!(body["message"], "Comment archived");

        let req = test::TestRequest::patch()
            .uri(uri.as_str())
            .insert_header(bearer(&tokens, other.id))
            .to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
    }
}
