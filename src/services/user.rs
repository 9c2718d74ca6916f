use chrono::Utc;

use crate::{
    app::AppError,
    auth::{
        password::{hash_password, verify_password},
        token::TokenService,
    },
    database::{
        models::user::{NewUser, User},
        Database, Repository,
    },
    validation::{CreateUserRequest, LoginRequest, UpdateUserRequest},
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

fn no_user() -> AppError {
    AppError::NotFound("No user found".into())
}

pub fn register_user<D: Database>(
    db: &D,
    bcrypt_cost: u32,
    request: CreateUserRequest,
) -> Result<User, AppError> {
    let input = request.into_valid()?;
    let password = hash_password(&input.password, bcrypt_cost)?;

    let user = db.transaction(|repo| {
        repo.insert_user(NewUser {
            name: input.name,
            username: input.username,
            email: input.email,
            password,
            created_at: Utc::now(),
        })
    })?;
    log::info!("registered user {}", user.id);

    Ok(user)
}

/// Checks the credentials and hands out a bearer token for the user.
/// Unknown emails and wrong passwords are indistinguishable to the caller.
pub fn login<D: Database>(
    db: &D,
    tokens: &TokenService,
    request: LoginRequest,
) -> Result<String, AppError> {
    let (email, password) = match (request.email, request.password) {
        (Some(email), Some(password)) => (email, password),
        _ => return Err(AppError::BadRequest("Email and password are required".into())),
    };

    let user = db
        .transaction(|repo| repo.find_user_by_email(email.trim()))?
        .ok_or_else(|| AppError::UnauthorizedError(INVALID_CREDENTIALS.into()))?;
    if !verify_password(&password, &user.password) {
        log::debug!("failed login for user {}", user.id);
        return Err(AppError::UnauthorizedError(INVALID_CREDENTIALS.into()));
    }

    Ok(tokens.issue(user.id)?)
}

pub fn get_me<D: Database>(db: &D, actor_id: i32) -> Result<User, AppError> {
    db.transaction(|repo| repo.find_user(actor_id))?
        .ok_or_else(no_user)
}

pub fn update_me<D: Database>(
    db: &D,
    actor_id: i32,
    request: UpdateUserRequest,
) -> Result<User, AppError> {
    let changes = request.into_valid()?;

    db.transaction(|repo| repo.update_user(actor_id, &changes))?
        .ok_or_else(no_user)
}

/** Deletes the caller's account along with everything they wrote or liked */
pub fn delete_me<D: Database>(db: &D, actor_id: i32) -> Result<(), AppError> {
    if !db.transaction(|repo| repo.delete_user(actor_id))? {
        return Err(no_user());
    }
    log::info!("deleted user {}", actor_id);

    Ok(())
}
