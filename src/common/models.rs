// Wire models for the analysis backend and the render model built from them
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `GET /api/databricks/setup`. Fields other than `success` are kept verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetupResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /api/pdf/upload-and-analyze`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadAnalyzeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub analysis: Option<AnalysisResult>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptResponse {
    pub prompt: String,
    pub answer: String,
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisResult {
    pub responses: Vec<PromptResponse>,
    pub merged_summary: String,
}

/// One displayable unit of an analysis: a card per prompt, then the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultBlock {
    Response {
        index: usize,
        prompt: String,
        answer: String,
        error: Option<String>,
    },
    MergedSummary(String),
}

impl AnalysisResult {
    pub fn blocks(&self) -> Vec<ResultBlock> {
        let mut blocks: Vec<ResultBlock> = self
            .responses
            .iter()
            .enumerate()
            .map(|(idx, res)| ResultBlock::Response {
                index: idx + 1,
                prompt: res.prompt.clone(),
                answer: res.answer.clone(),
                error: if res.success { None } else { res.error.clone() },
            })
            .collect();
        blocks.push(ResultBlock::MergedSummary(self.merged_summary.clone()));
        blocks
    }

    pub fn failed_prompts(&self) -> usize {
        self.responses.iter().filter(|r| !r.success).count()
    }
}

impl std::fmt::Display for ResultBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultBlock::Response { index, prompt, answer, error } => {
                writeln!(f, "Prompt {}", index)?;
                writeln!(f, "Prompt: {}", prompt)?;
                writeln!(f, "Answer:")?;
                write!(f, "{}", answer)?;
                if let Some(err) = error {
                    write!(f, "\n(error: {})", err)?;
                }
                Ok(())
            }
            ResultBlock::MergedSummary(summary) => {
                writeln!(f, "Merged Summary")?;
                write!(f, "{}", summary)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "success": true,
        "notebook_url": "https://workspace/notebooks/42",
        "analysis": {
            "responses": [
                {"prompt": "Summarize", "answer": "A short report.", "success": true, "error": null},
                {"prompt": "List risks", "answer": "", "success": false, "error": "model timeout"}
            ],
            "merged_summary": "Overall fine."
        }
    }"#;

    #[test]
    fn decodes_upload_response_and_keeps_unknown_fields() {
        let resp: UploadAnalyzeResponse = serde_json::from_str(SAMPLE).unwrap();
        assert!(resp.success);
        assert_eq!(resp.extra.get("notebook_url").and_then(|v| v.as_str()), Some("https://workspace/notebooks/42"));
        let analysis = resp.analysis.unwrap();
        assert_eq!(analysis.responses.len(), 2);
        assert_eq!(analysis.responses[1].error.as_deref(), Some("model timeout"));
        assert_eq!(analysis.failed_prompts(), 1);
    }

    #[test]
    fn two_responses_render_as_two_cards_and_a_summary() {
        let resp: UploadAnalyzeResponse = serde_json::from_str(SAMPLE).unwrap();
        let blocks = resp.analysis.unwrap().blocks();
        assert_eq!(blocks.len(), 3);
        assert!(matches!(&blocks[0], ResultBlock::Response { index: 1, error: None, .. }));
        assert!(matches!(&blocks[1], ResultBlock::Response { index: 2, error: Some(_), .. }));
        assert_eq!(blocks[2], ResultBlock::MergedSummary("Overall fine.".to_string()));
    }

    #[test]
    fn setup_response_without_success_field_is_unsuccessful() {
        let resp: SetupResponse = serde_json::from_str(r#"{"message": "warehouse asleep"}"#).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.extra.len(), 1);
    }

    #[test]
    fn card_text_layout() {
        let block = ResultBlock::Response {
            index: 3,
            prompt: "Q".into(),
            answer: "A".into(),
            error: None,
        };
        assert_eq!(block.to_string(), "Prompt 3\nPrompt: Q\nAnswer:\nA");
    }
}
