//! The command grammar: closed word classes and ordering rules.
//!
//! Commands follow a small fixed grammar: a verb, optionally an object,
//! optionally modifier+value pairs, optionally chained onto another command.
//! The word tables here are the single source of truth for which words exist,
//! what they may follow, and which modifiers demand a value. Everything else
//! (tokenizer, suggester, compiler) derives its behavior from these tables.

pub mod token;
pub mod tokenizer;

pub use token::{Token, TokenType, ValueMeta};
pub use tokenizer::{is_command_complete, tokenize, validate_command_sequence};

/// One entry in a word-class table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarRule {
    /// Canonical spelling.
    pub word: &'static str,
    /// Accepted synonyms. Aliases may collide across tables; lookup resolves
    /// canonical words first, then aliases in table order.
    pub aliases: &'static [&'static str],
    /// Short description shown in suggestion lists.
    pub description: &'static str,
    /// Whether the word must be followed by a value token.
    pub requires_value: bool,
    /// Token kinds this word may directly follow. Empty means the validator
    /// never position-checks the word; verbs are anchored by the
    /// must-start-with-a-verb rule and the suggester's chainer handling
    /// instead.
    pub valid_after: &'static [TokenType],
}

// ── Word tables ─────────────────────────────────────────────────────────

pub const VERB_RULES: &[GrammarRule] = &[
    GrammarRule {
        word: "select",
        aliases: &["choose", "pick"],
        description: "Select assets",
        requires_value: false,
        valid_after: &[],
    },
    GrammarRule {
        word: "filter",
        aliases: &["show", "find", "search"],
        description: "Filter the current view",
        requires_value: false,
        valid_after: &[],
    },
    GrammarRule {
        word: "tag",
        aliases: &["label", "mark"],
        description: "Apply a tag to assets",
        requires_value: false,
        valid_after: &[],
    },
    GrammarRule {
        word: "untag",
        aliases: &["remove", "clear"],
        description: "Remove a tag from assets",
        requires_value: false,
        valid_after: &[],
    },
    GrammarRule {
        word: "delete",
        aliases: &["remove", "trash"],
        description: "Delete assets",
        requires_value: false,
        valid_after: &[],
    },
    GrammarRule {
        word: "group",
        aliases: &["organize"],
        description: "Group assets",
        requires_value: false,
        valid_after: &[],
    },
    GrammarRule {
        word: "clear",
        aliases: &["reset", "remove"],
        description: "Clear the selection or filters",
        requires_value: false,
        valid_after: &[],
    },
    GrammarRule {
        word: "assign",
        aliases: &["set"],
        description: "Assign assets to a team member",
        requires_value: false,
        valid_after: &[],
    },
];

pub const OBJECT_RULES: &[GrammarRule] = &[
    GrammarRule {
        word: "all",
        aliases: &["everything"],
        description: "All assets",
        requires_value: false,
        valid_after: &[TokenType::Verb],
    },
    GrammarRule {
        word: "untagged",
        aliases: &["without tags", "bare"],
        description: "Assets without any tags",
        requires_value: false,
        valid_after: &[TokenType::Verb],
    },
    GrammarRule {
        word: "selected",
        aliases: &["selection", "current"],
        description: "The currently selected assets",
        requires_value: false,
        valid_after: &[TokenType::Verb],
    },
    GrammarRule {
        word: "filters",
        aliases: &["filter"],
        description: "The active filters",
        requires_value: false,
        valid_after: &[TokenType::Verb],
    },
    GrammarRule {
        word: "selection",
        aliases: &["selected"],
        description: "The current selection",
        requires_value: false,
        valid_after: &[TokenType::Verb],
    },
    GrammarRule {
        word: "tags",
        aliases: &["labels"],
        description: "All tags",
        requires_value: false,
        valid_after: &[TokenType::Verb],
    },
];

pub const MODIFIER_RULES: &[GrammarRule] = &[
    GrammarRule {
        word: "as",
        aliases: &[],
        description: "Specify a tag",
        requires_value: true,
        valid_after: &[TokenType::Verb, TokenType::Object],
    },
    GrammarRule {
        word: "by",
        aliases: &[],
        description: "Specify a category or team",
        requires_value: true,
        valid_after: &[TokenType::Verb, TokenType::Object],
    },
    GrammarRule {
        word: "with",
        aliases: &[],
        description: "Specify a value",
        requires_value: true,
        valid_after: &[TokenType::Verb, TokenType::Object],
    },
    GrammarRule {
        word: "to",
        aliases: &[],
        description: "Specify a team member",
        requires_value: true,
        valid_after: &[TokenType::Verb, TokenType::Object],
    },
];

pub const CHAINER_RULES: &[GrammarRule] = &[
    GrammarRule {
        word: "and",
        aliases: &[],
        description: "Chain another command",
        requires_value: false,
        valid_after: &[TokenType::Value, TokenType::Object],
    },
    GrammarRule {
        word: "then",
        aliases: &[],
        description: "Chain another command",
        requires_value: false,
        valid_after: &[TokenType::Value, TokenType::Object],
    },
];

const TABLES: [(TokenType, &[GrammarRule]); 4] = [
    (TokenType::Verb, VERB_RULES),
    (TokenType::Object, OBJECT_RULES),
    (TokenType::Modifier, MODIFIER_RULES),
    (TokenType::Chainer, CHAINER_RULES),
];

// ── Lookup ──────────────────────────────────────────────────────────────

/// Resolve a word to its word class and rule.
///
/// Canonical spellings are matched across all four tables before any alias
/// is considered. This keeps canonical verbs reachable even when another
/// table lists the same word as an alias ("clear" is both the clear verb
/// and an alias of untag). Alias collisions resolve in table order
/// (verbs, objects, modifiers, chainers).
pub fn find_grammar_rule(word: &str) -> Option<(TokenType, &'static GrammarRule)> {
    let w = word.trim().to_lowercase();

    for (kind, rules) in TABLES {
        if let Some(rule) = rules.iter().find(|r| r.word == w) {
            return Some((kind, rule));
        }
    }
    for (kind, rules) in TABLES {
        if let Some(rule) = rules.iter().find(|r| r.aliases.contains(&w.as_str())) {
            return Some((kind, rule));
        }
    }
    None
}

/// All rules that may legally follow a token of kind `last`. `None` means
/// the start of a command, where only verbs are valid.
pub fn valid_next_tokens(last: Option<TokenType>) -> Vec<(TokenType, &'static GrammarRule)> {
    match last {
        None => VERB_RULES.iter().map(|r| (TokenType::Verb, r)).collect(),
        Some(prev) => TABLES
            .iter()
            .flat_map(|(kind, rules)| rules.iter().map(move |r| (*kind, r)))
            .filter(|(_, rule)| rule.valid_after.contains(&prev))
            .collect(),
    }
}

/// The eight command verbs, as a closed enum for exhaustive compiler
/// dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Select,
    Filter,
    Tag,
    Untag,
    Delete,
    Group,
    Clear,
    Assign,
}

impl Verb {
    /// Map a canonical verb word (as produced by the tokenizer) to its
    /// variant.
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "select" => Some(Self::Select),
            "filter" => Some(Self::Filter),
            "tag" => Some(Self::Tag),
            "untag" => Some(Self::Untag),
            "delete" => Some(Self::Delete),
            "group" => Some(Self::Group),
            "clear" => Some(Self::Clear),
            "assign" => Some(Self::Assign),
            _ => None,
        }
    }
}
