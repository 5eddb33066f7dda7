/// What the response parser extracted from one generated document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    pub narrative_text: String,
    pub choices: Vec<String>,
    pub image_prompt: Option<String>,
    pub alignment_delta: Option<i64>,
    pub karma_delta: Option<i64>,
    pub inventory: Option<Vec<String>>,
}

impl ParsedDocument {
    /// The degraded result: the whole text is prose and nothing else is set.
    pub fn prose_only(text: &str) -> Self {
        Self {
            narrative_text: text.to_string(),
            ..Default::default()
        }
    }
}
