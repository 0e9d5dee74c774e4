use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_WEIGHT: f64 = 1.0;
pub const MAX_WEIGHT: f64 = 100.0;

/// A selected parameter as sent to the scoring backend. `weight` is a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedParameter {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub weight: f64,
}

impl WeightedParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            weight: weight.clamp(MIN_WEIGHT, MAX_WEIGHT),
        }
    }
}

/// What the LLM gets to read for one submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionContent {
    pub submission_id: Uuid,
    pub description: Option<String>,
    pub tags: Vec<String>,
    /// `(format, url)` pairs.
    pub files: Vec<(String, String)>,
}

impl SubmissionContent {
    pub fn text(&self) -> String {
        let mut sections = Vec::new();

        if let Some(description) = self.description.as_deref().map(str::trim)
            && !description.is_empty()
        {
            sections.push(description.to_string());
        }
        if !self.tags.is_empty() {
            sections.push(format!("Tags: {}", self.tags.join(", ")));
        }
        if !self.files.is_empty() {
            let files: Vec<String> = self
                .files
                .iter()
                .map(|(format, url)| format!("- {format}: {url}"))
                .collect();
            sections.push(format!("Attached files:\n{}", files.join("\n")));
        }

        sections.join("\n\n")
    }
}

/// Payload of one evaluation run. Serialized in camelCase for remote services.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    pub hackathon_id: Uuid,
    pub submission_ids: Vec<Uuid>,
    pub parameters: Vec<WeightedParameter>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hackathon_title: Option<String>,
    /// Local content for in-process scoring; never sent over the wire.
    #[serde(skip)]
    pub submissions: Vec<SubmissionContent>,
}

impl EvaluationRequest {
    pub fn new(
        hackathon_id: Uuid,
        submission_ids: Vec<Uuid>,
        parameters: Vec<WeightedParameter>,
    ) -> Self {
        let parameters = parameters
            .into_iter()
            .map(|p| WeightedParameter::new(p.name, p.description, p.weight))
            .collect();

        Self {
            hackathon_id,
            submission_ids,
            parameters,
            hackathon_title: None,
            submissions: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.hackathon_title = Some(title.into());
        self
    }

    pub fn with_submissions(mut self, submissions: Vec<SubmissionContent>) -> Self {
        self.submissions = submissions;
        self
    }

    pub fn content_for(&self, submission_id: Uuid) -> Option<&SubmissionContent> {
        self.submissions
            .iter()
            .find(|s| s.submission_id == submission_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionResult {
    pub parameter: String,
    pub score: f64,
    pub weight: f64,
    #[serde(alias = "weighted_score")]
    pub weighted_score: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    #[serde(alias = "submission_id", alias = "_id")]
    pub submission_id: Uuid,
    #[serde(default)]
    pub scores: Vec<CriterionResult>,
    #[serde(alias = "total_score", alias = "totalAiScore", default)]
    pub total_score: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl EvaluationResult {
    pub fn failed(submission_id: Uuid, error: impl Into<String>) -> Self {
        Self {
            submission_id,
            scores: Vec::new(),
            total_score: 0.0,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_clamps_weights() {
        let request = EvaluationRequest::new(
            Uuid::new_v4(),
            vec![],
            vec![
                WeightedParameter {
                    name: "Innovation".to_string(),
                    description: String::new(),
                    weight: 0.0,
                },
                WeightedParameter {
                    name: "Impact".to_string(),
                    description: String::new(),
                    weight: 140.0,
                },
            ],
        );
        let weights: Vec<f64> = request.parameters.iter().map(|p| p.weight).collect();
        assert_eq!(weights, vec![1.0, 100.0]);
    }

    #[test]
    fn test_request_serializes_camel_case_without_content() {
        let id = Uuid::new_v4();
        let request = EvaluationRequest::new(id, vec![id], vec![])
            .with_submissions(vec![SubmissionContent::default()]);
        let json = serde_json::to_value(&request).unwrap();

        assert!(json.get("hackathonId").is_some());
        assert!(json.get("submissionIds").is_some());
        assert!(json.get("submissions").is_none());
        assert!(json.get("hackathonTitle").is_none());
    }

    #[test]
    fn test_content_text_joins_sections() {
        let content = SubmissionContent {
            submission_id: Uuid::new_v4(),
            description: Some("  A solar-powered drone  ".to_string()),
            tags: vec!["energy".to_string(), "hardware".to_string()],
            files: vec![("Video".to_string(), "https://cdn.example/demo.mp4".to_string())],
        };
        assert_eq!(
            content.text(),
            "A solar-powered drone\n\nTags: energy, hardware\n\nAttached files:\n- Video: https://cdn.example/demo.mp4"
        );
    }

    #[test]
    fn test_result_accepts_snake_case_fields() {
        let id = Uuid::new_v4();
        let json = format!(
            r#"{{"submission_id":"{id}","total_score":72.0,"scores":[{{"parameter":"UX","score":80,"weight":90,"weighted_score":72}}]}}"#
        );
        let result: EvaluationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result.submission_id, id);
        assert_eq!(result.total_score, 72.0);
        assert_eq!(result.scores[0].weighted_score, 72.0);
        assert!(result.is_success());
    }
}
