//! Tokenization and structural validation.
//!
//! Every word gets a grammar lookup first; a word the tables do not know is
//! a bare value token. The tokenizer is context-sensitive in exactly one
//! place: a value that follows a value-requiring modifier is resolved
//! against the workspace context scoped by that modifier ("by" looks at
//! categories, "as"/"with" at tags, "to" at team members).

use tracing::trace;

use crate::context::ContextData;
use crate::error::{CommandError, ValidationResult};
use crate::grammar::token::{Token, TokenType, ValueMeta};
use crate::grammar::find_grammar_rule;

/// Split a command string into classified tokens with exact character
/// offsets.
pub fn tokenize(input: &str, ctx: &ContextData) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();

    for (position, word) in words_with_positions(input) {
        let length = word.chars().count();

        if let Some((kind, rule)) = find_grammar_rule(word) {
            tokens.push(Token::new(kind, rule.word, position, length));
            continue;
        }

        // Anything the tables do not know is a bare value. One that follows
        // a value-requiring modifier is resolved in that modifier's domain.
        let mut token = Token::new(TokenType::Value, word, position, length);
        let pending_modifier = tokens
            .last()
            .filter(|t| t.kind == TokenType::Modifier)
            .map(|t| t.value.clone());
        if let Some(modifier) = pending_modifier {
            if let Some(meta) = resolve_value(&modifier, word, ctx) {
                token = token.with_meta(meta);
            }
        }
        tokens.push(token);
    }

    trace!(input, count = tokens.len(), "tokenized command");
    tokens
}

/// Resolve a value word against the context, scoped by the modifier that
/// introduced it.
fn resolve_value(modifier: &str, word: &str, ctx: &ContextData) -> Option<ValueMeta> {
    let w = word.to_lowercase();

    match modifier {
        "by" => {
            if let Some(category) = ctx
                .tag_categories
                .iter()
                .find(|c| c.name.to_lowercase() == w || c.display_name.to_lowercase() == w)
            {
                return Some(ValueMeta::Category {
                    id: Some(category.id.clone()),
                    name: category.name.clone(),
                    display_name: Some(category.display_name.clone()),
                    color: category.color.clone(),
                });
            }
            // Grouping and filtering by assignee share a synthetic
            // "team" category.
            if w == "team" {
                return Some(ValueMeta::Category {
                    id: None,
                    name: "team".to_string(),
                    display_name: Some("Team".to_string()),
                    color: None,
                });
            }
            // "filter by portrait" names a tag, not a category.
            find_tag(&w, ctx).or_else(|| find_member(&w, ctx))
        }
        "as" | "with" => find_tag(&w, ctx).or_else(|| find_member(&w, ctx)),
        "to" => find_member(&w, ctx).or_else(|| find_tag(&w, ctx)),
        _ => None,
    }
}

fn find_tag(w: &str, ctx: &ContextData) -> Option<ValueMeta> {
    for category in &ctx.tag_categories {
        for tag in &category.tags {
            if tag.name.to_lowercase() == w || tag.display_name.to_lowercase() == w {
                return Some(ValueMeta::Tag {
                    category_id: Some(category.id.clone()),
                    category_name: Some(category.name.clone()),
                    category_display_name: Some(category.display_name.clone()),
                    category_color: category.color.clone(),
                    tag_id: tag.id.clone(),
                    tag_name: tag.name.clone(),
                    tag_display_name: tag.display_name.clone(),
                });
            }
        }
    }
    None
}

fn find_member(w: &str, ctx: &ContextData) -> Option<ValueMeta> {
    ctx.team_members
        .iter()
        .find(|m| {
            let name = m.name.to_lowercase();
            name == w || name.split_whitespace().next() == Some(w)
        })
        .map(|m| ValueMeta::TeamMember {
            id: m.id.clone(),
            name: m.name.clone(),
            avatar_url: m.avatar_url.clone(),
        })
}

/// Check that a token sequence obeys the grammar's ordering rules.
pub fn validate_command_sequence(tokens: &[Token]) -> ValidationResult {
    let Some(first) = tokens.first() else {
        return Err(CommandError::EmptyCommand);
    };
    if first.kind != TokenType::Verb {
        return Err(CommandError::MissingVerb {
            found: first.value.clone(),
        });
    }

    // Ordering: a word whose rule names a non-empty valid_after set must
    // follow one of those kinds. Bare values have no rule and are never
    // position-checked.
    for pair in tokens.windows(2) {
        let (prev, token) = (&pair[0], &pair[1]);
        if let Some((_, rule)) = find_grammar_rule(&token.value) {
            if !rule.valid_after.is_empty() && !rule.valid_after.contains(&prev.kind) {
                return Err(CommandError::InvalidSequence {
                    word: token.value.clone(),
                    previous: prev.value.clone(),
                });
            }
        }
    }

    // Every value-requiring modifier must be directly followed by a value.
    for (index, token) in tokens.iter().enumerate() {
        if token.kind != TokenType::Modifier {
            continue;
        }
        let requires_value =
            find_grammar_rule(&token.value).is_some_and(|(_, rule)| rule.requires_value);
        if requires_value && tokens.get(index + 1).map(|t| t.kind) != Some(TokenType::Value) {
            return Err(CommandError::MissingValue {
                modifier: token.value.clone(),
            });
        }
    }

    Ok(())
}

/// Whether the sequence is valid and ends on something executable. Used by
/// front-ends to decide when to light up the run affordance.
pub fn is_command_complete(tokens: &[Token]) -> bool {
    validate_command_sequence(tokens).is_ok()
        && matches!(
            tokens.last().map(|t| t.kind),
            Some(TokenType::Object) | Some(TokenType::Value)
        )
}

fn words_with_positions(input: &str) -> Vec<(usize, &str)> {
    let mut words = Vec::new();
    let mut start_byte = None;
    let mut start_char = 0usize;

    for (char_idx, (byte_idx, ch)) in input.char_indices().enumerate() {
        if ch.is_whitespace() {
            if let Some(sb) = start_byte.take() {
                words.push((start_char, &input[sb..byte_idx]));
            }
        } else if start_byte.is_none() {
            start_byte = Some(byte_idx);
            start_char = char_idx;
        }
    }
    if let Some(sb) = start_byte {
        words.push((start_char, &input[sb..]));
    }
    words
}
