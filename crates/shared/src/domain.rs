use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    ProfessorName,
    UniversityName,
    ResearchDomain,
    PaperTitle,
    PaperSummary,
    ForceProject,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::ProfessorName,
        FormField::UniversityName,
        FormField::ResearchDomain,
        FormField::PaperTitle,
        FormField::PaperSummary,
        FormField::ForceProject,
    ];

    pub const REQUIRED: [FormField; 3] = [
        FormField::ProfessorName,
        FormField::UniversityName,
        FormField::ResearchDomain,
    ];

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }

    /// Wire key used in the generation request body.
    pub fn key(self) -> &'static str {
        match self {
            FormField::ProfessorName => "professor_name",
            FormField::UniversityName => "university_name",
            FormField::ResearchDomain => "research_domain",
            FormField::PaperTitle => "paper_title",
            FormField::PaperSummary => "paper_summary",
            FormField::ForceProject => "force_project",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::ProfessorName => "Professor Name",
            FormField::UniversityName => "University Name",
            FormField::ResearchDomain => "Research Domain",
            FormField::PaperTitle => "Recent Paper Title",
            FormField::PaperSummary => "Paper Summary",
            FormField::ForceProject => "Force Specific Project",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// User-entered professor metadata. Serializes directly as the generation
/// request body; optional fields travel as empty strings when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    pub professor_name: String,
    pub university_name: String,
    pub research_domain: String,
    #[serde(default)]
    pub paper_title: String,
    #[serde(default)]
    pub paper_summary: String,
    #[serde(default)]
    pub force_project: String,
}

impl FormInput {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::ProfessorName => &self.professor_name,
            FormField::UniversityName => &self.university_name,
            FormField::ResearchDomain => &self.research_domain,
            FormField::PaperTitle => &self.paper_title,
            FormField::PaperSummary => &self.paper_summary,
            FormField::ForceProject => &self.force_project,
        }
    }

    pub fn get_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::ProfessorName => &mut self.professor_name,
            FormField::UniversityName => &mut self.university_name,
            FormField::ResearchDomain => &mut self.research_domain,
            FormField::PaperTitle => &mut self.paper_title,
            FormField::PaperSummary => &mut self.paper_summary,
            FormField::ForceProject => &mut self.force_project,
        }
    }

    /// Required fields that are empty or whitespace-only, in form order.
    pub fn missing_required(&self) -> Vec<FormField> {
        FormField::REQUIRED
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjectId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectId::Number(id) => write!(f, "{id}"),
            ProjectId::Text(id) => f.write_str(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_every_field_including_empty_optionals() {
        let input = FormInput {
            professor_name: "Dr. Michael Chen".into(),
            university_name: "MIT".into(),
            research_domain: "multi-agent systems".into(),
            ..FormInput::default()
        };

        let body = serde_json::to_value(&input).expect("serialize");
        assert_eq!(
            body,
            serde_json::json!({
                "professor_name": "Dr. Michael Chen",
                "university_name": "MIT",
                "research_domain": "multi-agent systems",
                "paper_title": "",
                "paper_summary": "",
                "force_project": "",
            })
        );
    }

    #[test]
    fn whitespace_only_required_fields_count_as_missing() {
        let input = FormInput {
            professor_name: "  ".into(),
            university_name: "MIT".into(),
            research_domain: "\t\n".into(),
            paper_title: "Optional".into(),
            ..FormInput::default()
        };

        assert_eq!(
            input.missing_required(),
            vec![FormField::ProfessorName, FormField::ResearchDomain]
        );
    }

    #[test]
    fn field_keys_match_wire_names() {
        let input = FormInput::default();
        let body = serde_json::to_value(&input).expect("serialize");
        let object = body.as_object().expect("object body");
        for field in FormField::ALL {
            assert!(object.contains_key(field.key()), "missing {field}");
        }
        assert_eq!(object.len(), FormField::ALL.len());
    }

    #[test]
    fn project_ids_accept_numbers_and_strings() {
        let numeric: ProjectId = serde_json::from_str("3").expect("numeric id");
        let text: ProjectId = serde_json::from_str("\"hireflow\"").expect("text id");
        assert_eq!(numeric.to_string(), "3");
        assert_eq!(text, ProjectId::Text("hireflow".into()));
    }
}
