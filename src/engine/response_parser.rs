use serde::de::{Deserialize, Deserializer};
use serde_json::Value;

use crate::model::parsed_document::ParsedDocument;

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Location of the first fenced `json` block inside a document.
struct FencedBlock<'a> {
    start: usize,
    end: usize,
    body: &'a str,
}

fn find_fenced_block(text: &str) -> Option<FencedBlock<'_>> {
    let start = text.find(FENCE_OPEN)?;
    let body_start = start + FENCE_OPEN.len();
    let close = text[body_start..].find(FENCE_CLOSE)?;
    let body_end = body_start + close;

    Some(FencedBlock {
        start,
        end: body_end + FENCE_CLOSE.len(),
        body: text[body_start..body_end].trim(),
    })
}

/// Typed view of the structured block. Every field is optional on its own;
/// a value of the wrong shape reads as "not provided".
#[derive(Debug, Default, PartialEq, serde::Deserialize)]
struct StructuredBlock {
    #[serde(default, deserialize_with = "lenient_strings")]
    choices: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string")]
    image_prompt: Option<String>,
    #[serde(default, deserialize_with = "lenient_integer")]
    dharma: Option<i64>,
    #[serde(default, deserialize_with = "lenient_integer")]
    karma: Option<i64>,
    #[serde(default, deserialize_with = "lenient_strings")]
    inventory: Option<Vec<String>>,
}

impl StructuredBlock {
    fn from_value(value: Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        // Field decoders are infallible, so only a non-object could fail here.
        serde_json::from_value(value).unwrap_or_default()
    }
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64)),
        _ => None,
    })
}

/// Split a generated document into prose and its trailing structured data.
///
/// Never fails: a missing or undecodable block yields the whole text as
/// prose with no choices.
pub fn parse_story_content(full_text: &str) -> ParsedDocument {
    let Some(block) = find_fenced_block(full_text) else {
        return ParsedDocument::prose_only(full_text);
    };

    let value: Value = match serde_json::from_str(block.body) {
        Ok(Value::Null) => {
            log::warn!("Choices JSON block is null; keeping the block in the prose");
            return ParsedDocument::prose_only(full_text);
        }
        Ok(value) => value,
        Err(e) => {
            log::warn!("Failed to parse choices JSON: {e}");
            return ParsedDocument::prose_only(full_text);
        }
    };

    let data = StructuredBlock::from_value(value);

    let mut narrative = String::with_capacity(full_text.len());
    narrative.push_str(&full_text[..block.start]);
    narrative.push_str(&full_text[block.end..]);

    ParsedDocument {
        narrative_text: narrative.trim().to_string(),
        choices: data.choices.unwrap_or_default(),
        image_prompt: data.image_prompt,
        alignment_delta: data.dharma,
        karma_delta: data.karma,
        inventory: data.inventory,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_block_is_all_prose() {
        let text = "  The chariot wheels sink into the mud.\n";
        let parsed = parse_story_content(text);

        assert_eq!(parsed, ParsedDocument::prose_only(text));
        assert!(parsed.choices.is_empty());
    }

    #[test]
    fn valid_block_is_removed_and_decoded() {
        let text = "Arjuna hesitates.\n\n```json\n{\"choices\": [\"A\",\"B\"], \"dharma\": 5}\n```\n";
        let parsed = parse_story_content(text);

        assert_eq!(parsed.narrative_text, "Arjuna hesitates.");
        assert_eq!(parsed.choices, vec!["A", "B"]);
        assert_eq!(parsed.alignment_delta, Some(5));
        assert_eq!(parsed.image_prompt, None);
        assert_eq!(parsed.karma_delta, None);
        assert_eq!(parsed.inventory, None);
    }

    #[test]
    fn all_fields_are_read() {
        let text = r#"The network hums.
```json
{
    "image_prompt": "A cybernetic warrior on a neon rooftop",
    "dharma": -12,
    "karma": 3,
    "inventory": ["Plasma Katana", "Council Access Code"],
    "choices": ["Shut it down", "Negotiate", "Flee"]
}
```"#;
        let parsed = parse_story_content(text);

        assert_eq!(parsed.narrative_text, "The network hums.");
        assert_eq!(
            parsed.image_prompt.as_deref(),
            Some("A cybernetic warrior on a neon rooftop")
        );
        assert_eq!(parsed.alignment_delta, Some(-12));
        assert_eq!(parsed.karma_delta, Some(3));
        assert_eq!(
            parsed.inventory,
            Some(vec!["Plasma Katana".to_string(), "Council Access Code".to_string()])
        );
        assert_eq!(parsed.choices.len(), 3);
    }

    #[test]
    fn malformed_block_falls_back_to_whole_text() {
        let text = "Smoke rises.\n```json\n{\"choices\": [\"A\",}\n```";
        let parsed = parse_story_content(text);

        assert_eq!(parsed.narrative_text, text);
        assert!(parsed.choices.is_empty());
        assert_eq!(parsed.alignment_delta, None);
    }

    #[test]
    fn unterminated_fence_is_prose() {
        let text = "Smoke rises.\n```json\n{\"choices\": [\"A\"]}";
        assert_eq!(parse_story_content(text), ParsedDocument::prose_only(text));
    }

    #[test]
    fn wrong_types_read_as_absent() {
        let text = "x\n```json\n{\"choices\": \"A\", \"dharma\": \"high\", \"karma\": true, \"image_prompt\": 4, \"inventory\": {}}\n```";
        let parsed = parse_story_content(text);

        assert_eq!(parsed.narrative_text, "x");
        assert!(parsed.choices.is_empty());
        assert_eq!(parsed.alignment_delta, None);
        assert_eq!(parsed.karma_delta, None);
        assert_eq!(parsed.image_prompt, None);
        assert_eq!(parsed.inventory, None);
    }

    #[test]
    fn non_string_choices_are_dropped() {
        let text = "x\n```json\n{\"choices\": [\"Go\", 2, null, \"Stay\"]}\n```";
        assert_eq!(parse_story_content(text).choices, vec!["Go", "Stay"]);
    }

    #[test]
    fn fractional_scores_are_rounded() {
        let text = "x\n```json\n{\"dharma\": 4.6, \"karma\": -1.4}\n```";
        let parsed = parse_story_content(text);

        assert_eq!(parsed.alignment_delta, Some(5));
        assert_eq!(parsed.karma_delta, Some(-1));
    }

    #[test]
    fn non_object_body_strips_block_without_fields() {
        let text = "Prelude\n```json\n[1, 2, 3]\n```\nCoda";
        let parsed = parse_story_content(text);

        assert_eq!(parsed.narrative_text, "Prelude\n\nCoda");
        assert!(parsed.choices.is_empty());
        assert_eq!(parsed.inventory, None);
    }

    #[test]
    fn null_body_falls_back_to_whole_text() {
        let text = "Prelude\n```json\nnull\n```\nCoda";
        let parsed = parse_story_content(text);

        assert_eq!(parsed.narrative_text, text);
        assert!(parsed.choices.is_empty());
        assert_eq!(parsed.image_prompt, None);
        assert_eq!(parsed.inventory, None);
    }

    #[test]
    fn only_the_first_block_is_consumed() {
        let text = "One\n```json\n{\"choices\": [\"A\"]}\n```\nTwo\n```json\n{\"choices\": [\"B\"]}\n```";
        let parsed = parse_story_content(text);

        assert_eq!(parsed.choices, vec!["A"]);
        assert!(parsed.narrative_text.starts_with("One"));
        assert!(parsed.narrative_text.contains("```json\n{\"choices\": [\"B\"]}"));
    }

    #[test]
    fn plain_code_fences_are_ignored() {
        let text = "Look:\n```\nnot data\n```";
        assert_eq!(parse_story_content(text), ParsedDocument::prose_only(text));
    }
}
