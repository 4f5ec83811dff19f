//! Token shapes shared by the tokenizer, suggester, and compiler.

use serde::{Deserialize, Serialize};

/// Grammatical role of a word in a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Verb,
    Object,
    Modifier,
    Chainer,
    Value,
    /// Unclassified word in a hand-built sequence. The tokenizer itself
    /// reads every unmatched word as a bare [`TokenType::Value`].
    Unknown,
}

/// What a value token resolved to. A value is never more than one kind of
/// entity at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueMeta {
    /// A tag category, or the synthetic "team" grouping (`id: None`,
    /// `name: "team"`) used by `filter by team` and `group by team`.
    Category {
        id: Option<String>,
        name: String,
        display_name: Option<String>,
        color: Option<String>,
    },
    Tag {
        category_id: Option<String>,
        category_name: Option<String>,
        category_display_name: Option<String>,
        category_color: Option<String>,
        tag_id: String,
        tag_name: String,
        tag_display_name: String,
    },
    TeamMember {
        id: String,
        name: String,
        avatar_url: Option<String>,
    },
}

/// One word of a command, with its span in the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: TokenType,
    /// Canonical word for grammar tokens, raw word for values/unknowns.
    pub value: String,
    /// Character offset of the word in the original input.
    pub position: usize,
    /// Length of the word as typed.
    pub length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ValueMeta>,
}

impl Token {
    pub fn new(kind: TokenType, value: impl Into<String>, position: usize, length: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            position,
            length,
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: ValueMeta) -> Self {
        self.meta = Some(meta);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_meta_serializes_tagged() {
        let meta = ValueMeta::Category {
            id: None,
            name: "team".to_string(),
            display_name: Some("Team".to_string()),
            color: None,
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["kind"], "category");
        assert_eq!(json["name"], "team");

        let back: ValueMeta = serde_json::from_value(json).unwrap();
        assert_eq!(back, meta);
    }

    #[test]
    fn token_type_uses_lowercase_names() {
        assert_eq!(
            serde_json::to_string(&TokenType::Modifier).unwrap(),
            "\"modifier\""
        );
    }
}
