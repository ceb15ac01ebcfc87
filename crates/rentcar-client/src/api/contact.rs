use serde::Serialize;
use serde_json::json;

use crate::api::{decode_data, decode_page, ApiClient};
use crate::error::ClientResult;
use crate::models::{ContactMessage, Page};
use crate::services::validation::{self, ValidationError};

/// Message sent from the public contact form.
#[derive(Debug, Clone, Serialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ContactRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::require("name", &self.name)?;
        validation::validate_email(&self.email)?;
        if let Some(phone) = self.phone.as_deref().filter(|p| !p.is_empty()) {
            validation::validate_phone(phone)?;
        }
        validation::require("message", &self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MessageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ApiClient {
    pub async fn submit_contact(&self, request: &ContactRequest) -> ClientResult<()> {
        request.validate()?;
        self.post("/contact", request).await?;
        Ok(())
    }

    /// Inbox of contact messages (admin).
    pub async fn list_messages(&self, query: &MessageQuery) -> ClientResult<Page<ContactMessage>> {
        let body = self.get_with("/contact", query).await?;
        decode_page(body)
    }

    pub async fn update_message_status(&self, id: &str, status: &str) -> ClientResult<ContactMessage> {
        let body = self
            .patch(&format!("/contact/{id}/status"), &json!({ "status": status }))
            .await?;
        decode_data(body)
    }
}
