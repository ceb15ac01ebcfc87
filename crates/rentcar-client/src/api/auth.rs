use serde::Serialize;
use serde_json::{json, Value};

use crate::api::{decode_page, ApiClient};
use crate::auth::normalizer::normalize_session_response;
use crate::error::ClientResult;
use crate::models::{Page, Role, User, UserStatus};
use crate::services::validation::{self, ValidationError};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_email(&self.email)?;
        validation::require("password", &self.password)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::require("name", &self.name)?;
        validation::validate_email(&self.email)?;
        validation::validate_password(&self.password)?;
        if let Some(phone) = self.phone.as_deref().filter(|p| !p.is_empty()) {
            validation::validate_phone(phone)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            validation::require("name", name)?;
        }
        if let Some(phone) = &self.phone {
            validation::validate_phone(phone)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ApiClient {
    /// Raw login payload; see [`crate::auth::normalize_auth_response`].
    pub async fn login(&self, request: &LoginRequest) -> ClientResult<Value> {
        self.post("/auth/login", request).await
    }

    /// Raw registration payload; see [`crate::auth::normalize_auth_response`].
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<Value> {
        self.post("/auth/register", request).await
    }

    /// Raw `/auth/me` payload for session restoration.
    pub async fn current_user(&self) -> ClientResult<Value> {
        self.get("/auth/me").await
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.post("/auth/logout", &json!({})).await?;
        Ok(())
    }

    pub async fn forgot_password(&self, email: &str) -> ClientResult<()> {
        validation::validate_email(email)?;
        self.post("/auth/forgot-password", &json!({ "email": email }))
            .await?;
        Ok(())
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> ClientResult<()> {
        validation::validate_password(password)?;
        self.post(
            "/auth/reset-password",
            &json!({ "token": token, "password": password }),
        )
        .await?;
        Ok(())
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<User> {
        update.validate()?;
        let body = self.put("/auth/profile", update).await?;
        normalize_session_response(&body)
    }

    pub async fn list_users(&self, query: &UserQuery) -> ClientResult<Page<User>> {
        let body = self.get_with("/admin/users", query).await?;
        decode_page(body)
    }

    pub async fn update_user_status(&self, id: &str, status: UserStatus) -> ClientResult<User> {
        let body = self
            .patch(&format!("/admin/users/{id}/status"), &json!({ "status": status }))
            .await?;
        normalize_session_response(&body)
    }

    pub async fn update_user_role(&self, id: &str, role: Role) -> ClientResult<User> {
        let body = self
            .patch(&format!("/admin/users/{id}/role"), &json!({ "role": role }))
            .await?;
        normalize_session_response(&body)
    }
}
