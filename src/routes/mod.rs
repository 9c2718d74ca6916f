use actix_web::{http::StatusCode, middleware::ErrorHandlers, web};
use actix_web_httpauth::middleware::HttpAuthentication;

use crate::{
    app::{json_error_handler, path_error_handler},
    auth::{bearer_auth_validator, missing_token_body},
    database::Database,
};

/// Builds an actix test service over an in-memory store.
#[cfg(test)]
macro_rules! test_app {
    ($db:expr, $tokens:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($crate::app::AppState {
                    db: $db.clone(),
                    bcrypt_cost: $crate::services::fixtures::TEST_BCRYPT_COST,
                }))
                .app_data(actix_web::web::Data::new($tokens.clone()))
                .configure(
                    $crate::routes::configure::<$crate::database::memory::MemoryDatabase>,
                ),
        )
        .await
    };
}

pub mod blog;
pub mod comment;
pub mod user;

/// Registers every route. Public reads, registration and login are open,
/// everything else sits behind the bearer token check.
pub fn configure<D: Database>(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        //User routes
        .service(
            web::scope("/users")
                .wrap(ErrorHandlers::new().handler(StatusCode::UNAUTHORIZED, missing_token_body))
                .service(
                    web::resource(vec!["", "/"])
                        .route(web::post().to(user::create_new_user::<D>)),
                )
                .service(web::resource("/login").route(web::post().to(user::login::<D>)))
                .service(
                    web::resource("/me")
                        .route(web::get().to(user::get_me::<D>))
                        .route(web::patch().to(user::update_me::<D>))
                        .route(web::delete().to(user::delete_me::<D>))
                        .wrap(HttpAuthentication::bearer(bearer_auth_validator)),
                ),
        )
        //Blog routes
        .service(
            web::scope("/blogs")
                .wrap(ErrorHandlers::new().handler(StatusCode::UNAUTHORIZED, missing_token_body))
                .service(
                    web::resource(vec!["", "/"])
                        .route(web::get().to(blog::get_blogs::<D>))
                        .route(
                            web::post()
                                .to(blog::create_new_blog::<D>)
                                .wrap(HttpAuthentication::bearer(bearer_auth_validator)),
                        ),
                )
                .service(
                    web::resource("/{blog_id}")
                        .route(web::get().to(blog::get_blog::<D>))
                        .route(
                            web::patch()
                                .to(blog::edit_blog::<D>)
                                .wrap(HttpAuthentication::bearer(bearer_auth_validator)),
                        ),
                )
                .service(
                    web::resource("/{blog_id}/archive")
                        .route(web::patch().to(blog::toggle_archive::<D>))
                        .wrap(HttpAuthentication::bearer(bearer_auth_validator)),
                )
                .service(
                    web::resource("/{blog_id}/like")
                        .route(web::post().to(blog::like_a_blog::<D>))
                        .wrap(HttpAuthentication::bearer(bearer_auth_validator)),
                )
                //Comment routes
                .service(
                    web::resource("/{blog_id}/comments")
                        .route(web::get().to(comment::get_comments::<D>))
                        .route(
                            web::post()
                                .to(comment::create_comment::<D>)
                                .wrap(HttpAuthentication::bearer(bearer_auth_validator)),
                        ),
                )
                .service(
                    web::resource("/{blog_id}/comments/{comment_id}")
                        .route(web::patch().to(comment::edit_comment::<D>))
                        .wrap(HttpAuthentication::bearer(bearer_auth_validator)),
                )
                .service(
                    web::resource("/{blog_id}/comments/{comment_id}/archive")
                        .route(web::patch().to(comment::toggle_comment_archive::<D>))
                        .wrap(HttpAuthentication::bearer(bearer_auth_validator)),
                ),
        );
}
