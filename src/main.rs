#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;

pub mod app;
pub mod database;
pub mod schema;
pub mod services;
pub mod validation;

mod auth;
mod routes;

use actix_web::{middleware::Logger, web::Data, App, HttpServer};

use crate::{
    app::{config::Config, AppState},
    auth::token::TokenService,
    database::{
        db_utils::{psql_connect_to_db, run_migrations},
        postgres::PgDatabase,
    },
};

fn startup_error<E: std::fmt::Display>(err: E) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(startup_error)?;

    let pool = psql_connect_to_db(&config.database_url, config.database_pool_size)
        .map_err(startup_error)?;
    run_migrations(&pool).map_err(startup_error)?;

    let app_state = AppState {
        db: PgDatabase::new(pool),
        bcrypt_cost: config.bcrypt_cost,
    };
    let tokens = TokenService::new(&config.secret_key, config.token_ttl_secs);

    log::info!(
        "Server running on {}:{}",
        config.bind_address,
        config.port
    );
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(Data::new(app_state.clone()))
            .app_data(Data::new(tokens.clone()))
            .configure(routes::configure::<PgDatabase>)
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run()
    .await
}
