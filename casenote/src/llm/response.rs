use serde::Deserialize;

/// Wire shapes observed across summarization providers.
///
/// Extractive-summarization endpoints (Hugging Face inference) return an
/// array of objects carrying `generated_text` or `summary_text`; chat
/// completion endpoints return a `choices` envelope. Deserialization
/// dispatches on structure: an object with `choices` is a chat completion,
/// a bare array is extractive.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProviderResponse {
    Chat(ChatCompletion),
    Extractive(Vec<ExtractiveItem>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractiveItem {
    pub generated_text: Option<String>,
    pub summary_text: Option<String>,
}

impl ProviderResponse {
    /// The generated text, if any recognized field holds a non-empty value.
    ///
    /// Extraction priority: `generated_text`, then `summary_text`, then
    /// `choices[0].message.content`.
    pub fn text(&self) -> Option<&str> {
        match self {
            ProviderResponse::Extractive(items) => {
                let item = items.first()?;
                non_empty(item.generated_text.as_deref())
                    .or_else(|| non_empty(item.summary_text.as_deref()))
            }
            ProviderResponse::Chat(completion) => {
                non_empty(completion.choices.first()?.message.content.as_deref())
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extractive_summary_text() {
        let body = json!([{"summary_text": "patient recovered"}]);
        let parsed: ProviderResponse = serde_json::from_value(body).expect("parse");
        assert_eq!(parsed.text(), Some("patient recovered"));
    }

    #[test]
    fn test_extractive_prefers_generated_text() {
        let body = json!([{"generated_text": "primary", "summary_text": "secondary"}]);
        let parsed: ProviderResponse = serde_json::from_value(body).expect("parse");
        assert_eq!(parsed.text(), Some("primary"));
    }

    #[test]
    fn test_chat_completion_content() {
        let body = json!({
            "choices": [{"message": {"role": "assistant", "content": "the summary"}}]
        });
        let parsed: ProviderResponse = serde_json::from_value(body).expect("parse");
        assert_eq!(parsed.text(), Some("the summary"));
    }

    #[test]
    fn test_unrecognized_array_has_no_text() {
        let body = json!([{"score": 0.3}]);
        let parsed: ProviderResponse = serde_json::from_value(body).expect("parse");
        assert_eq!(parsed.text(), None);
    }

    #[test]
    fn test_empty_strings_do_not_count() {
        let body = json!([{"generated_text": "  ", "summary_text": ""}]);
        let parsed: ProviderResponse = serde_json::from_value(body).expect("parse");
        assert_eq!(parsed.text(), None);
    }

    #[test]
    fn test_empty_choices_has_no_text() {
        let body = json!({"choices": []});
        let parsed: ProviderResponse = serde_json::from_value(body).expect("parse");
        assert_eq!(parsed.text(), None);
    }
}
