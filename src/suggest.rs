//! Ranked completions for the command palette.
//!
//! Suggestions come in three bands: verbs at priority 100 (fresh input or
//! right after a chainer), grammar-valid next words at 90, and
//! modifier-scoped values at 85 (categories and the synthetic team grouping
//! after "by", tags after "as"/"with", team members after "to"). Within a
//! band, display text sorts ascending.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::ContextData;
use crate::error::CommandError;
use crate::grammar::token::{Token, TokenType, ValueMeta};
use crate::grammar::{VERB_RULES, tokenize, valid_next_tokens, validate_command_sequence};

const PRIORITY_VERB: i32 = 100;
const PRIORITY_GRAMMAR: i32 = 90;
const PRIORITY_VALUE: i32 = 85;

/// One completion candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub kind: TokenType,
    /// Text inserted into the input on acceptance.
    pub value: String,
    /// Text rendered in the suggestion list.
    pub display_text: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ValueMeta>,
    pub priority: i32,
}

/// Live parse state for a palette input, recomputed per keystroke.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub tokens: Vec<Token>,
    pub is_valid: bool,
    pub error: Option<CommandError>,
    pub suggestions: Vec<Suggestion>,
    pub cursor_position: usize,
    /// The word currently being typed under the cursor, if any.
    pub partial_token: Option<String>,
}

/// Rank completions for the text before `cursor` (a byte offset).
pub fn generate_suggestions(input: &str, cursor: usize, ctx: &ContextData) -> Vec<Suggestion> {
    let before = input.get(..cursor).unwrap_or(input);
    let partial = partial_word(before);
    let completed = match partial {
        Some(p) => &before[..before.len() - p.len()],
        None => before,
    };

    let tokens = tokenize(completed, ctx);
    let last = tokens.last();

    let mut suggestions = Vec::new();

    match last {
        None => suggest_verbs(&mut suggestions),
        Some(token) if token.kind == TokenType::Chainer => suggest_verbs(&mut suggestions),
        Some(token) => {
            for (kind, rule) in valid_next_tokens(Some(token.kind)) {
                suggestions.push(Suggestion {
                    id: format!("next-{}", rule.word),
                    kind,
                    value: rule.word.to_string(),
                    display_text: rule.word.to_string(),
                    description: rule.description.to_string(),
                    metadata: None,
                    priority: PRIORITY_GRAMMAR,
                });
            }
            if token.kind == TokenType::Modifier {
                suggest_values(&token.value, ctx, &mut suggestions);
            }
        }
    }

    if let Some(p) = partial {
        let p = p.to_lowercase();
        suggestions.retain(|s| {
            let value = s.value.to_lowercase();
            let display = s.display_text.to_lowercase();
            if s.priority == PRIORITY_VALUE {
                // Context values match anywhere in the name or display text;
                // only grammar words complete by prefix.
                value.contains(&p) || display.contains(&p)
            } else {
                value.starts_with(&p) || display.starts_with(&p)
            }
        });
    }

    suggestions.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.display_text.cmp(&b.display_text))
    });

    debug!(
        input,
        cursor,
        count = suggestions.len(),
        "generated suggestions"
    );
    suggestions
}

fn suggest_verbs(out: &mut Vec<Suggestion>) {
    for rule in VERB_RULES {
        out.push(Suggestion {
            id: format!("verb-{}", rule.word),
            kind: TokenType::Verb,
            value: rule.word.to_string(),
            display_text: rule.word.to_string(),
            description: rule.description.to_string(),
            metadata: None,
            priority: PRIORITY_VERB,
        });
    }
}

fn suggest_values(modifier: &str, ctx: &ContextData, out: &mut Vec<Suggestion>) {
    match modifier {
        "by" => {
            for category in &ctx.tag_categories {
                out.push(Suggestion {
                    id: format!("category-{}", category.id),
                    kind: TokenType::Value,
                    value: category.name.clone(),
                    display_text: category.display_name.clone(),
                    description: format!("By {}", category.display_name),
                    metadata: Some(ValueMeta::Category {
                        id: Some(category.id.clone()),
                        name: category.name.clone(),
                        display_name: Some(category.display_name.clone()),
                        color: category.color.clone(),
                    }),
                    priority: PRIORITY_VALUE,
                });
            }
            out.push(Suggestion {
                id: "category-team".to_string(),
                kind: TokenType::Value,
                value: "team".to_string(),
                display_text: "Team".to_string(),
                description: "By team assignment".to_string(),
                metadata: Some(ValueMeta::Category {
                    id: None,
                    name: "team".to_string(),
                    display_name: Some("Team".to_string()),
                    color: None,
                }),
                priority: PRIORITY_VALUE,
            });
        }
        "as" | "with" => {
            for tag in ctx.flatten_tags() {
                let display = match &tag.category_display_name {
                    Some(category) => format!("{category} › {}", tag.display_name),
                    None => tag.display_name.clone(),
                };
                out.push(Suggestion {
                    id: format!("tag-{}", tag.id),
                    kind: TokenType::Value,
                    value: tag.name.clone(),
                    display_text: display,
                    description: format!("Tag as {}", tag.display_name),
                    metadata: Some(ValueMeta::Tag {
                        category_id: tag.category_id.clone(),
                        category_name: tag.category_name.clone(),
                        category_display_name: tag.category_display_name.clone(),
                        category_color: tag.category_color.clone(),
                        tag_id: tag.id.clone(),
                        tag_name: tag.name.clone(),
                        tag_display_name: tag.display_name.clone(),
                    }),
                    priority: PRIORITY_VALUE,
                });
            }
        }
        "to" => {
            for member in &ctx.team_members {
                let first = member
                    .name
                    .split_whitespace()
                    .next()
                    .unwrap_or(&member.name)
                    .to_lowercase();
                out.push(Suggestion {
                    id: format!("member-{}", member.id),
                    kind: TokenType::Value,
                    value: first,
                    display_text: member.name.clone(),
                    description: format!("Assign to {}", member.name),
                    metadata: Some(ValueMeta::TeamMember {
                        id: member.id.clone(),
                        name: member.name.clone(),
                        avatar_url: member.avatar_url.clone(),
                    }),
                    priority: PRIORITY_VALUE,
                });
            }
        }
        _ => {}
    }
}

/// Apply a suggestion to the input: the word being typed before `cursor` is
/// replaced by the suggestion's value plus a trailing space. Returns the new
/// text and cursor position.
pub fn autocomplete(input: &str, cursor: usize, suggestion: &Suggestion) -> (String, usize) {
    let before = input.get(..cursor).unwrap_or(input);
    let after = input.get(cursor..).unwrap_or("");

    let word_start = match partial_word(before) {
        Some(p) => before.len() - p.len(),
        None => before.len(),
    };

    let mut text = String::with_capacity(input.len() + suggestion.value.len() + 1);
    text.push_str(&before[..word_start]);
    text.push_str(&suggestion.value);
    text.push(' ');
    let new_cursor = text.len();
    text.push_str(after.trim_start());

    (text, new_cursor)
}

/// Full per-keystroke parse: tokens, validity, diagnostics, and ranked
/// suggestions in one call.
pub fn parse_command(input: &str, cursor: usize, ctx: &ContextData) -> ParseResult {
    let tokens = tokenize(input, ctx);
    let validation = validate_command_sequence(&tokens);
    let suggestions = generate_suggestions(input, cursor, ctx);
    let partial = partial_word(input.get(..cursor).unwrap_or(input)).map(str::to_string);

    ParseResult {
        is_valid: validation.is_ok(),
        error: validation.err(),
        tokens,
        suggestions,
        cursor_position: cursor,
        partial_token: partial,
    }
}

/// Render a token sequence with resolved display names, e.g.
/// "Filter by Style › Portrait".
pub fn command_preview(tokens: &[Token]) -> String {
    let parts: Vec<String> = tokens
        .iter()
        .map(|token| match &token.meta {
            Some(ValueMeta::Tag {
                category_display_name,
                tag_display_name,
                ..
            }) => match category_display_name {
                Some(category) => format!("{category} › {tag_display_name}"),
                None => tag_display_name.clone(),
            },
            Some(ValueMeta::Category {
                display_name, name, ..
            }) => display_name.clone().unwrap_or_else(|| name.clone()),
            Some(ValueMeta::TeamMember { name, .. }) => name.clone(),
            None => token.value.clone(),
        })
        .collect();

    let mut preview = parts.join(" ");
    if let Some(first) = preview.get(..1) {
        let upper = first.to_uppercase();
        preview.replace_range(..1, &upper);
    }
    preview
}

/// The trailing non-whitespace run of `before`, i.e. the word still being
/// typed.
fn partial_word(before: &str) -> Option<&str> {
    if before.is_empty() || before.ends_with(char::is_whitespace) {
        return None;
    }
    before.split_whitespace().last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::fixtures::studio_context;

    #[test]
    fn fresh_input_offers_all_verbs_at_top_priority() {
        let ctx = studio_context();
        let suggestions = generate_suggestions("", 0, &ctx);
        assert_eq!(suggestions.len(), 8);
        assert!(suggestions.iter().all(|s| s.priority == 100));
        // Alphabetical within the band.
        assert_eq!(suggestions[0].value, "assign");
        assert_eq!(suggestions[7].value, "untag");
    }

    #[test]
    fn partial_word_filters_candidates() {
        let ctx = studio_context();
        let suggestions = generate_suggestions("se", 2, &ctx);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].value, "select");
    }

    #[test]
    fn after_a_verb_grammar_words_rank_at_ninety() {
        let ctx = studio_context();
        let suggestions = generate_suggestions("select ", 7, &ctx);
        assert!(suggestions.iter().all(|s| s.priority == 90));
        assert!(suggestions.iter().any(|s| s.value == "untagged"));
        assert!(suggestions.iter().any(|s| s.value == "by"));
        assert!(!suggestions.iter().any(|s| s.value == "select"));
    }

    #[test]
    fn after_by_categories_and_team_rank_at_eighty_five() {
        let ctx = studio_context();
        let suggestions = generate_suggestions("filter by ", 10, &ctx);
        let values: Vec<&str> = suggestions.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, vec!["mood", "style", "team"]);
        assert!(suggestions.iter().all(|s| s.priority == 85));
    }

    #[test]
    fn after_as_tags_show_their_category_path() {
        let ctx = studio_context();
        let suggestions = generate_suggestions("tag selected as ", 16, &ctx);
        assert!(
            suggestions
                .iter()
                .any(|s| s.display_text == "Mood › Bridal" && s.value == "bridal")
        );
        assert!(suggestions.iter().any(|s| s.display_text == "Style › Portrait"));
    }

    #[test]
    fn value_suggestions_match_on_substrings() {
        let ctx = studio_context();
        // A mid-word fragment still surfaces the tag it sits inside.
        let suggestions = generate_suggestions("tag as rida", 11, &ctx);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].value, "bridal");

        // Verbs stay prefix-only.
        assert!(generate_suggestions("lect", 4, &ctx).is_empty());
    }

    #[test]
    fn after_a_chainer_verbs_return() {
        let ctx = studio_context();
        let suggestions = generate_suggestions("select untagged and ", 20, &ctx);
        assert!(suggestions.iter().all(|s| s.priority == 100));
        assert!(suggestions.iter().any(|s| s.value == "tag"));
    }

    #[test]
    fn autocomplete_replaces_the_partial_word() {
        let ctx = studio_context();
        let suggestions = generate_suggestions("fil", 3, &ctx);
        let (text, cursor) = autocomplete("fil", 3, &suggestions[0]);
        assert_eq!(text, "filter ");
        assert_eq!(cursor, 7);

        let suggestion = &generate_suggestions("filter by sty", 13, &ctx)[0];
        let (text, cursor) = autocomplete("filter by sty", 13, suggestion);
        assert_eq!(text, "filter by style ");
        assert_eq!(cursor, 16);
    }

    #[test]
    fn parse_command_bundles_the_live_state() {
        let ctx = studio_context();
        let result = parse_command("filter by", 9, &ctx);
        assert!(!result.is_valid);
        assert_eq!(
            result.error,
            Some(CommandError::MissingValue {
                modifier: "by".to_string()
            })
        );
        assert_eq!(result.partial_token.as_deref(), Some("by"));

        let result = parse_command("filter by style", 15, &ctx);
        assert!(result.is_valid);
        assert!(result.error.is_none());
        assert_eq!(result.tokens.len(), 3);
    }

    #[test]
    fn preview_renders_resolved_display_names() {
        let ctx = studio_context();
        let tokens = tokenize("filter by portrait", &ctx);
        assert_eq!(command_preview(&tokens), "Filter by Style › Portrait");

        let tokens = tokenize("assign to alice", &ctx);
        assert_eq!(command_preview(&tokens), "Assign to Alice Smith");
    }
}
