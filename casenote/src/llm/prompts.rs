use crate::models::{Case, Note};

/// System prompt used with chat completion providers.
pub const SUMMARY_SYSTEM_PROMPT: &str = "You are a medical professional writing \
    concise case summaries. Focus on the clinical picture: presenting complaint, \
    course of treatment, and patient outcome. Write a single short paragraph.";

/// Prompt material for one summary request, pre-rendered for both
/// request styles so the API client only has to pick one.
#[derive(Debug, Clone)]
pub struct SummaryInput {
    /// `summarize: ...` task prefix for extractive models.
    pub extractive: String,
    /// Conversational prompt with patient context for chat models.
    pub chat: String,
}

impl SummaryInput {
    pub fn for_case(case: &Case, notes: &[Note]) -> Self {
        let narrative = build_visit_narrative(notes);
        Self {
            extractive: format!("summarize: {narrative}"),
            chat: format!(
                "Patient: {}, age {}, {}. Reason for admission: {}.\n\n\
                 Visit notes:\n\n{}\n\n\
                 Summarize this case in one short paragraph.",
                case.name, case.age, case.gender, case.reason_for_admission, narrative
            ),
        }
    }
}

/// Join note contents into a numbered visit timeline.
pub fn build_visit_narrative(notes: &[Note]) -> String {
    notes
        .iter()
        .enumerate()
        .map(|(i, note)| format!("Visit {}: {}", i + 1, note.content.trim()))
        .collect::<Vec<_>>()
        .join("\n\n")
}
