//! Axum route handler for career applications.
//!
//! Validates and acknowledges an application. Storage and follow-up happen
//! outside this service; the application is only logged here.

use axum::{extract::rejection::JsonRejection, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub cover_letter: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationReceipt {
    pub success: bool,
    pub application_id: Uuid,
    pub message: String,
}

/// A validated application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub full_name: String,
    pub email: String,
    pub position: String,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub cover_letter: Option<String>,
}

impl ApplicationRequest {
    pub fn validate(self) -> Result<Application, AppError> {
        let full_name = required(self.full_name, "fullName")?;
        let email = required(self.email, "email")?;
        let position = required(self.position, "position")?;

        if !email.contains('@') {
            return Err(AppError::Validation(
                "email must be a valid address".to_string(),
            ));
        }

        Ok(Application {
            full_name,
            email,
            position,
            phone: optional(self.phone),
            linkedin_url: optional(self.linkedin_url),
            cover_letter: optional(self.cover_letter),
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    optional(value).ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// POST /api/apply
pub async fn handle_apply(
    body: Result<Json<ApplicationRequest>, JsonRejection>,
) -> Result<Json<ApplicationReceipt>, AppError> {
    let Json(request) =
        body.map_err(|e| AppError::Validation(format!("invalid request body: {e}")))?;
    let application = request.validate()?;
    let application_id = Uuid::new_v4();

    info!(
        %application_id,
        position = %application.position,
        has_cover_letter = application.cover_letter.is_some(),
        "application received"
    );

    Ok(Json(ApplicationReceipt {
        success: true,
        application_id,
        message: "Thanks for applying. We'll be in touch.".to_string(),
    }))
}
