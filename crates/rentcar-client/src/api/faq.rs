use serde::Serialize;

use crate::api::{decode_data, decode_page, ApiClient};
use crate::error::ClientResult;
use crate::models::{FaqEntry, FaqStatus};
use crate::services::validation::{self, ValidationError};

#[derive(Debug, Clone, Serialize)]
pub struct FaqInput {
    pub question: String,
    pub answer: String,
    pub status: FaqStatus,
}

impl FaqInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::require("question", &self.question)?;
        validation::require("answer", &self.answer)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FaqQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FaqStatus>,
}

impl ApiClient {
    pub async fn list_faqs(&self, query: &FaqQuery) -> ClientResult<Vec<FaqEntry>> {
        let body = self.get_with("/faq", query).await?;
        Ok(decode_page(body)?.items)
    }

    pub async fn create_faq(&self, input: &FaqInput) -> ClientResult<FaqEntry> {
        input.validate()?;
        let body = self.post("/faq", input).await?;
        decode_data(body)
    }

    pub async fn update_faq(&self, id: &str, input: &FaqInput) -> ClientResult<FaqEntry> {
        input.validate()?;
        let body = self.put(&format!("/faq/{id}"), input).await?;
        decode_data(body)
    }

    pub async fn delete_faq(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("/faq/{id}")).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_and_answer_required() {
        let mut input = FaqInput {
            question: " ".into(),
            answer: "Yes".into(),
            status: FaqStatus::Active,
        };
        assert_eq!(
            input.validate(),
            Err(ValidationError::Required { field: "question" })
        );
        input.question = "Can I return the car late?".into();
        assert_eq!(input.validate(), Ok(()));
    }

    #[test]
    fn hidden_filter_serializes() {
        let q = FaqQuery {
            status: Some(FaqStatus::Hidden),
        };
        assert_eq!(
            serde_json::to_value(&q).unwrap(),
            serde_json::json!({ "status": "hidden" })
        );
    }
}
