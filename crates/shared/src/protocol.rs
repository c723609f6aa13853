use serde::{Deserialize, Serialize};

use crate::domain::{FormInput, ProjectId};

pub const GENERATE_EMAIL_PATH: &str = "api/generate-email";
pub const HEALTH_PATH: &str = "api/health";
pub const PROJECTS_PATH: &str = "api/projects";

/// Body of `POST /api/generate-email`.
pub type GenerateEmailRequest = FormInput;

/// Body of a successful `POST /api/generate-email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub email: String,
    pub selected_project: String,
    pub relevance_score: i64,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

impl GenerationResult {
    /// Status annotation, present only for results the service flagged as successful.
    pub fn status_message(&self) -> Option<&str> {
        self.success.then_some(self.message.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub email_generator_ready: bool,
    #[serde(default)]
    pub vector_db_loaded: bool,
}

impl HealthStatus {
    pub fn is_ready(&self) -> bool {
        self.status == "healthy" && self.email_generator_ready
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCatalog {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub projects: Vec<ProjectSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generation_result_from_service_body() {
        let body = r#"{
            "email": "Dear Professor Chen,\n...",
            "selected_project": "HireFlow",
            "relevance_score": 8,
            "success": true,
            "message": "Email generated successfully"
        }"#;

        let result: GenerationResult = serde_json::from_str(body).expect("parse");
        assert_eq!(result.selected_project, "HireFlow");
        assert_eq!(result.relevance_score, 8);
        assert_eq!(result.status_message(), Some("Email generated successfully"));
    }

    #[test]
    fn status_message_hidden_when_not_successful() {
        let body = r#"{"email":"x","selected_project":"p","relevance_score":2,"success":false,"message":"partial"}"#;
        let result: GenerationResult = serde_json::from_str(body).expect("parse");
        assert_eq!(result.status_message(), None);
    }

    #[test]
    fn rejects_result_missing_email() {
        let body = r#"{"selected_project":"p","relevance_score":2}"#;
        assert!(serde_json::from_str::<GenerationResult>(body).is_err());
    }

    #[test]
    fn project_catalog_tolerates_missing_optional_fields() {
        let body = r#"{"success":true,"projects":[{"id":1,"title":"HireFlow"}]}"#;
        let catalog: ProjectCatalog = serde_json::from_str(body).expect("parse");
        assert_eq!(catalog.projects.len(), 1);
        assert_eq!(catalog.projects[0].id, ProjectId::Number(1));
        assert!(catalog.projects[0].domain.is_empty());
    }
}
