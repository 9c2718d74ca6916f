//! Request bodies as clients send them, and the checks that turn them into typed input.
//!
//! Only the fields listed on each struct are read: ids, owners, timestamps and flags
//! sent by a client are dropped during deserialization.

use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    app::{AppError, FieldErrors},
    database::models::{blog::BlogPatch, user::UserChanges},
};

pub const MISSING_FIELD: &str = "Missing data for required field.";
pub const NOT_A_STRING: &str = "Not a valid string.";

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(field_messages(&errors))
    }
}

fn field_messages(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| (field.to_string(), errs.iter().map(message_of).collect()))
        .collect()
}

fn message_of(err: &ValidationError) -> String {
    match &err.message {
        Some(message) => message.to_string(),
        None if err.code == "required" => MISSING_FIELD.to_string(),
        None => format!("Invalid value ({}).", err.code),
    }
}

/// A request body made only of optional text fields.
pub trait RequestBody: DeserializeOwned + Validate {
    const FIELDS: &'static [&'static str];
}

/// Reads a JSON body into `T`. A known field holding anything but a string is
/// reported under its own name, together with whatever else is wrong with the body.
pub fn parse_body<T: RequestBody>(body: Value) -> Result<T, AppError> {
    let mut fields = match body {
        Value::Object(fields) => fields,
        _ => return Err(AppError::BadRequest("Expected a JSON object".into())),
    };

    let mut mistyped = FieldErrors::new();
    for name in T::FIELDS {
        let wrong_type =
            matches!(fields.get(*name), Some(value) if !value.is_string() && !value.is_null());
        if wrong_type {
            fields.remove(*name);
            mistyped.insert(name.to_string(), vec![NOT_A_STRING.to_string()]);
        }
    }

    let request: T = serde_json::from_value(Value::Object(fields))
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))?;
    if mistyped.is_empty() {
        return Ok(request);
    }

    let mut errors = match request.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => field_messages(&e),
    };
    // a mistyped field was dropped above, its type error replaces "missing"
    errors.extend(mistyped);

    Err(AppError::Validation(errors))
}

fn missing(field: &str) -> AppError {
    let mut fields = FieldErrors::new();
    fields.insert(field.to_string(), vec![MISSING_FIELD.to_string()]);
    AppError::Validation(fields)
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateBlogRequest {
    #[validate(
        required,
        length(min = 3, max = 100, message = "Length must be between 3 and 100.")
    )]
    pub title: Option<String>,
    #[validate(
        required,
        length(min = 10, max = 5000, message = "Length must be between 10 and 5000.")
    )]
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlogInput {
    pub title: String,
    pub body: String,
}

impl RequestBody for CreateBlogRequest {
    const FIELDS: &'static [&'static str] = &["title", "body"];
}

impl CreateBlogRequest {
    pub fn into_valid(self) -> Result<BlogInput, AppError> {
        self.validate()?;

        match (self.title, self.body) {
            (Some(title), Some(body)) => Ok(BlogInput { title, body }),
            (None, _) => Err(missing("title")),
            (_, None) => Err(missing("body")),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateBlogRequest {
    #[validate(length(min = 3, max = 100, message = "Length must be between 3 and 100."))]
    pub title: Option<String>,
    #[validate(length(min = 10, max = 5000, message = "Length must be between 10 and 5000."))]
    pub body: Option<String>,
}

impl RequestBody for UpdateBlogRequest {
    const FIELDS: &'static [&'static str] = &["title", "body"];
}

impl UpdateBlogRequest {
    pub fn into_valid(self) -> Result<BlogPatch, AppError> {
        self.validate()?;

        Ok(BlogPatch {
            title: self.title,
            body: self.body,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(
        required,
        length(min = 1, max = 250, message = "Length must be between 1 and 250.")
    )]
    pub content: Option<String>,
}

impl RequestBody for CreateCommentRequest {
    const FIELDS: &'static [&'static str] = &["content"];
}

impl CreateCommentRequest {
    pub fn into_valid(self) -> Result<String, AppError> {
        self.validate()?;

        self.content.ok_or_else(|| missing("content"))
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 250, message = "Length must be between 1 and 250."))]
    pub content: Option<String>,
}

impl RequestBody for UpdateCommentRequest {
    const FIELDS: &'static [&'static str] = &["content"];
}

impl UpdateCommentRequest {
    pub fn into_valid(self) -> Result<Option<String>, AppError> {
        self.validate()?;

        Ok(self.content)
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        required,
        length(min = 1, max = 150, message = "Length must be between 1 and 150.")
    )]
    pub name: Option<String>,
    #[validate(
        required,
        length(min = 1, max = 150, message = "Length must be between 1 and 150.")
    )]
    pub username: Option<String>,
    #[validate(
        required,
        email(message = "Not a valid email address."),
        length(max = 150, message = "Longer than maximum length 150.")
    )]
    pub email: Option<String>,
    #[validate(
        required,
        length(min = 1, message = "Shorter than minimum length 1.")
    )]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserInput {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RequestBody for CreateUserRequest {
    const FIELDS: &'static [&'static str] = &["name", "username", "email", "password"];
}

impl CreateUserRequest {
    pub fn into_valid(self) -> Result<UserInput, AppError> {
        let request = CreateUserRequest {
            name: trimmed(self.name),
            username: trimmed(self.username),
            email: trimmed(self.email),
            password: self.password,
        };
        request.validate()?;

        Ok(UserInput {
            name: request.name.ok_or_else(|| missing("name"))?,
            username: request.username.ok_or_else(|| missing("username"))?,
            email: request.email.ok_or_else(|| missing("email"))?,
            password: request.password.ok_or_else(|| missing("password"))?,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 150, message = "Length must be between 1 and 150."))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 150, message = "Length must be between 1 and 150."))]
    pub username: Option<String>,
    #[validate(
        email(message = "Not a valid email address."),
        length(max = 150, message = "Longer than maximum length 150.")
    )]
    pub email: Option<String>,
}

impl RequestBody for UpdateUserRequest {
    const FIELDS: &'static [&'static str] = &["name", "username", "email"];
}

impl UpdateUserRequest {
    pub fn into_valid(self) -> Result<UserChanges, AppError> {
        let request = UpdateUserRequest {
            name: trimmed(self.name),
            username: trimmed(self.username),
            email: trimmed(self.email),
        };
        request.validate()?;

        Ok(UserChanges {
            name: request.name,
            username: request.username,
            email: request.email,
        })
    }
}

/// Login is checked by hand: a missing field is a plain bad request, not a field report.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}
