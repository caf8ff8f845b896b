use std::sync::OnceLock;

use regex::Regex;

use crate::dtos::auth::RegisterIn;
use crate::dtos::comment::CommentIn;
use crate::dtos::post::PostIn;
use crate::error::FieldError;

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"))
}

pub fn validate_post(input: &PostIn) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if input.title.trim().is_empty() {
        errors.push(FieldError {
            field: "title",
            message: "Title is required",
        });
    }
    if input.content.trim().is_empty() {
        errors.push(FieldError {
            field: "content",
            message: "Content is required",
        });
    }
    if input.category.trim().is_empty() {
        errors.push(FieldError {
            field: "category",
            message: "Category is required",
        });
    }
    errors
}

pub fn validate_comment(input: &CommentIn) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if input.content.trim().is_empty() {
        errors.push(FieldError {
            field: "content",
            message: "Content is required",
        });
    }
    errors
}

pub fn validate_category_name(name: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if name.trim().is_empty() {
        errors.push(FieldError {
            field: "name",
            message: "Name is required",
        });
    }
    errors
}

pub fn validate_register(input: &RegisterIn) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if input.username.trim().is_empty() {
        errors.push(FieldError {
            field: "username",
            message: "Username is required",
        });
    }
    if input.email.trim().is_empty() {
        errors.push(FieldError {
            field: "email",
            message: "Email is required",
        });
    } else if !email_re().is_match(input.email.trim()) {
        errors.push(FieldError {
            field: "email",
            message: "Email is invalid",
        });
    }
    if input.password.is_empty() {
        errors.push(FieldError {
            field: "password",
            message: "Password is required",
        });
    } else if input.password.len() < 8 {
        errors.push(FieldError {
            field: "password",
            message: "Password must be at least 8 characters",
        });
    }
    errors
}
