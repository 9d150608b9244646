//! Request bodies and their validation rules.
//!
//! Each `validate` collects every violated rule so clients see all problems
//! at once. A non-empty list becomes `Failure::validation`.

use std::sync::LazyLock;

use catalog_core::{Failure, Outcome};
use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 1000;
pub const MAX_CATEGORY_LEN: usize = 100;
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PERSON_NAME_LEN: usize = 100;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid email regex")
});

fn finish(errors: Vec<String>) -> Outcome<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Failure::validation(errors))
    }
}

fn check_email(email: &str, errors: &mut Vec<String>) {
    if email.trim().is_empty() {
        errors.push("Email is required".into());
    } else if !EMAIL_REGEX.is_match(email.trim()) {
        errors.push("Email is not valid".into());
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Outcome<()> {
        let mut errors = Vec::new();
        check_email(&self.email, &mut errors);
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            ));
        }
        if self.first_name.chars().count() > MAX_PERSON_NAME_LEN {
            errors.push(format!(
                "First name cannot exceed {MAX_PERSON_NAME_LEN} characters"
            ));
        }
        if self.last_name.chars().count() > MAX_PERSON_NAME_LEN {
            errors.push(format!(
                "Last name cannot exceed {MAX_PERSON_NAME_LEN} characters"
            ));
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Outcome<()> {
        let mut errors = Vec::new();
        if self.email.trim().is_empty() {
            errors.push("Email is required".into());
        }
        if self.password.is_empty() {
            errors.push("Password is required".into());
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub category: String,
}

impl CreateProductRequest {
    pub fn validate(&self) -> Outcome<()> {
        let mut errors = Vec::new();
        check_product_fields(
            &self.name,
            &self.description,
            self.price,
            self.stock,
            &self.category,
            &mut errors,
        );
        finish(errors)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl UpdateProductRequest {
    pub fn validate(&self) -> Outcome<()> {
        let mut errors = Vec::new();
        check_product_fields(
            &self.name,
            &self.description,
            self.price,
            self.stock,
            &self.category,
            &mut errors,
        );
        finish(errors)
    }
}

fn check_product_fields(
    name: &str,
    description: &str,
    price: Decimal,
    stock: i32,
    category: &str,
    errors: &mut Vec<String>,
) {
    if name.trim().is_empty() {
        errors.push("Product name is required".into());
    } else if name.chars().count() > MAX_NAME_LEN {
        errors.push(format!(
            "Product name cannot exceed {MAX_NAME_LEN} characters"
        ));
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        errors.push(format!(
            "Description cannot exceed {MAX_DESCRIPTION_LEN} characters"
        ));
    }
    if price <= Decimal::ZERO {
        errors.push("Price must be greater than 0".into());
    }
    if stock < 0 {
        errors.push("Stock cannot be negative".into());
    }
    if category.trim().is_empty() {
        errors.push("Category is required".into());
    } else if category.chars().count() > MAX_CATEGORY_LEN {
        errors.push(format!(
            "Category cannot exceed {MAX_CATEGORY_LEN} characters"
        ));
    }
}
