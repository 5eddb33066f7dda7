use serde::{Deserialize, Serialize};

use crate::model::parsed_document::ParsedDocument;

pub const ALIGNMENT_MIN: i64 = -100;
pub const ALIGNMENT_MAX: i64 = 100;

/// Cumulative role-playing counters carried across a story.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeStats {
    /// Dharma, always within [ALIGNMENT_MIN, ALIGNMENT_MAX]
    pub alignment: i64,
    pub karma: i64,
    pub inventory: Vec<String>,
}

impl NarrativeStats {
    /// Fold one parsed document into the counters.
    ///
    /// Alignment is clamped after the addition, karma is not, and a
    /// supplied inventory replaces the previous one outright.
    pub fn apply(&self, document: &ParsedDocument) -> Self {
        let alignment = self
            .alignment
            .saturating_add(document.alignment_delta.unwrap_or(0))
            .clamp(ALIGNMENT_MIN, ALIGNMENT_MAX);

        let karma = self.karma.saturating_add(document.karma_delta.unwrap_or(0));

        let inventory = match &document.inventory {
            Some(items) => items.clone(),
            None => self.inventory.clone(),
        };

        Self {
            alignment,
            karma,
            inventory,
        }
    }

    pub fn alignment_label(&self) -> &'static str {
        if self.alignment > 30 {
            "Dharmic (Order)"
        } else if self.alignment < -30 {
            "Adharmic (Chaos)"
        } else {
            "Neutral"
        }
    }
}
