//! Intent classification for free-form queries.
//!
//! One flat rule table, scanned top to bottom: each row is a regex, the
//! intent it signals, and the confidence it carries. Row order encodes the
//! priority between overlapping intents (e.g. "remove tag x" is UNTAG, not
//! DELETE, because the UNTAG rows sit above DELETE's "remove ..." row would
//! if it matched). The first row whose pattern matches and whose confidence
//! clears 0.5 wins; anything else falls through to SEARCH at 0.3.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// What the user wants to do, independent of any concrete entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    Select,
    Filter,
    Tag,
    Untag,
    SetTag,
    AssignTeam,
    RemoveTeam,
    Collection,
    View,
    Sort,
    Group,
    Clear,
    Download,
    Delete,
    /// Generic search, the fallback for anything unrecognized.
    Search,
    Unknown,
}

impl Intent {
    /// Short human label used in explanations and hints.
    pub fn description(self) -> &'static str {
        match self {
            Self::Select => "Select assets",
            Self::Filter => "Filter assets",
            Self::Tag => "Add tags",
            Self::Untag => "Remove tags",
            Self::SetTag => "Replace tags",
            Self::AssignTeam => "Assign team member",
            Self::RemoveTeam => "Remove team member",
            Self::Collection => "Manage collections",
            Self::View => "Change view",
            Self::Sort => "Sort assets",
            Self::Group => "Group assets",
            Self::Clear => "Clear filters/selections",
            Self::Download => "Download assets",
            Self::Delete => "Delete assets",
            Self::Search => "Search assets",
            Self::Unknown => "Unknown action",
        }
    }

    /// Whether a parse of this intent is incomplete without at least one
    /// extracted entity (a tag, team member, collection, or criteria).
    pub fn requires_entities(self) -> bool {
        matches!(
            self,
            Self::Tag
                | Self::Untag
                | Self::SetTag
                | Self::AssignTeam
                | Self::Filter
                | Self::Collection
                | Self::Sort
                | Self::Group
        )
    }
}

/// Coarse keyword flags extracted alongside the intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentModifiers {
    /// Add to the existing state rather than replace it.
    pub additive: bool,
    /// Apply to the current selection only.
    pub selective: bool,
    /// Apply to all assets.
    pub all: bool,
    /// Negative phrasing ("not tagged", "without").
    pub negation: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntentClassification {
    pub intent: Intent,
    pub confidence: f32,
    pub modifiers: IntentModifiers,
}

struct IntentRule {
    pattern: &'static str,
    intent: Intent,
    confidence: f32,
}

/// Priority-ordered rule rows. CLEAR through SELECT, high-specificity
/// phrasings first so e.g. "clear all filters" never reads as SELECT's
/// "all".
static RULE_ROWS: &[IntentRule] = &[
    // CLEAR
    IntentRule { pattern: r"^clear\s+(all|everything|filters?|selections?)", intent: Intent::Clear, confidence: 0.95 },
    IntentRule { pattern: r"^reset\s+(all|everything|filters?|selections?)", intent: Intent::Clear, confidence: 0.95 },
    IntentRule { pattern: r"^remove\s+all\s+(filters?|selections?)", intent: Intent::Clear, confidence: 0.95 },
    IntentRule { pattern: r"^deselect\s+all", intent: Intent::Clear, confidence: 0.95 },
    // DELETE
    IntentRule { pattern: r"^delete\s+(selected|all|these|photos?)", intent: Intent::Delete, confidence: 0.9 },
    IntentRule { pattern: r"^remove\s+(selected|all|these|photos?)", intent: Intent::Delete, confidence: 0.9 },
    IntentRule { pattern: r"^trash\b", intent: Intent::Delete, confidence: 0.9 },
    // DOWNLOAD
    IntentRule { pattern: r"^download\b", intent: Intent::Download, confidence: 0.95 },
    IntentRule { pattern: r"^export\b", intent: Intent::Download, confidence: 0.95 },
    IntentRule { pattern: r"^save\s+(as|to)\b", intent: Intent::Download, confidence: 0.95 },
    // SET_TAG
    IntentRule { pattern: r"^set\s+(the\s+)?tag\s+(to|as)", intent: Intent::SetTag, confidence: 0.95 },
    IntentRule { pattern: r"^replace\s+(the\s+)?tag\s+(with|to)", intent: Intent::SetTag, confidence: 0.95 },
    IntentRule { pattern: r"^change\s+(the\s+)?tag\s+(to|as)", intent: Intent::SetTag, confidence: 0.95 },
    // UNTAG
    IntentRule { pattern: r"^untag\b", intent: Intent::Untag, confidence: 0.95 },
    IntentRule { pattern: r"^remove\s+(the\s+)?tag", intent: Intent::Untag, confidence: 0.95 },
    IntentRule { pattern: r"^delete\s+(the\s+)?tag", intent: Intent::Untag, confidence: 0.95 },
    IntentRule { pattern: r"^clear\s+(the\s+)?tags?", intent: Intent::Untag, confidence: 0.95 },
    IntentRule { pattern: r"^(strip|drop)\s+(the\s+)?tag", intent: Intent::Untag, confidence: 0.95 },
    // TAG
    IntentRule { pattern: r"^tag\s+(as|with|selected|all|these)", intent: Intent::Tag, confidence: 0.95 },
    IntentRule { pattern: r"^add\s+(the\s+)?tag", intent: Intent::Tag, confidence: 0.95 },
    IntentRule { pattern: r"^(apply|attach)\s+(the\s+)?tag", intent: Intent::Tag, confidence: 0.95 },
    IntentRule { pattern: r"^label\s+(as|with)", intent: Intent::Tag, confidence: 0.95 },
    IntentRule { pattern: r"^mark\s+(as|with)", intent: Intent::Tag, confidence: 0.95 },
    // REMOVE_TEAM
    IntentRule { pattern: r"^remove\s+(team|artist|photographer)", intent: Intent::RemoveTeam, confidence: 0.95 },
    IntentRule { pattern: r"^unassign\b", intent: Intent::RemoveTeam, confidence: 0.95 },
    IntentRule { pattern: r"^clear\s+(team|artist|photographer)", intent: Intent::RemoveTeam, confidence: 0.95 },
    // ASSIGN_TEAM
    IntentRule { pattern: r"^assign\s+(to|team)", intent: Intent::AssignTeam, confidence: 0.9 },
    IntentRule { pattern: r"^set\s+(artist|photographer|team\s*member|creator|owner)\s+(to|as)", intent: Intent::AssignTeam, confidence: 0.9 },
    IntentRule { pattern: r"^(photos?\s+)?(by|from|of)\s+[a-z]", intent: Intent::AssignTeam, confidence: 0.9 },
    IntentRule { pattern: r"^give\s+to\b", intent: Intent::AssignTeam, confidence: 0.9 },
    IntentRule { pattern: r"^(photos?\s+)?taken\s+by\b", intent: Intent::AssignTeam, confidence: 0.9 },
    IntentRule { pattern: r"^(photos?\s+)?shot\s+by\b", intent: Intent::AssignTeam, confidence: 0.9 },
    // COLLECTION
    IntentRule { pattern: r"^add\s+to\s+(collection|set|album)", intent: Intent::Collection, confidence: 0.95 },
    IntentRule { pattern: r"^(create|make|new)\s+(collection|set|album)", intent: Intent::Collection, confidence: 0.95 },
    IntentRule { pattern: r"^(move|put)\s+in(to)?\s+(collection|set|album)", intent: Intent::Collection, confidence: 0.95 },
    IntentRule { pattern: r"^remove\s+from\s+(collection|set|album)", intent: Intent::Collection, confidence: 0.95 },
    // GROUP
    IntentRule { pattern: r"^group\s+by\b", intent: Intent::Group, confidence: 0.9 },
    IntentRule { pattern: r"^cluster\s+by\b", intent: Intent::Group, confidence: 0.9 },
    IntentRule { pattern: r"^organize\s+by\b", intent: Intent::Group, confidence: 0.9 },
    IntentRule { pattern: r"^categorize\s+by\b", intent: Intent::Group, confidence: 0.9 },
    // SORT
    IntentRule { pattern: r"^sort\s+by\b", intent: Intent::Sort, confidence: 0.9 },
    IntentRule { pattern: r"^order\s+by\b", intent: Intent::Sort, confidence: 0.9 },
    IntentRule { pattern: r"^arrange\s+by\b", intent: Intent::Sort, confidence: 0.9 },
    IntentRule { pattern: r"^(show\s+)?(oldest|newest|latest)\s+(first|photos)", intent: Intent::Sort, confidence: 0.9 },
    // VIEW
    IntentRule { pattern: r"^(show|display|switch\s+to)\s+(grid|list|thumbnail|detail)", intent: Intent::View, confidence: 0.9 },
    IntentRule { pattern: r"^change\s+(view|layout|display)", intent: Intent::View, confidence: 0.9 },
    IntentRule { pattern: r"^view\s+(as|in)", intent: Intent::View, confidence: 0.9 },
    IntentRule { pattern: r"^(compact|comfortable|spacious)\s+(view|mode)", intent: Intent::View, confidence: 0.9 },
    // FILTER
    IntentRule { pattern: r"^filter\b", intent: Intent::Filter, confidence: 0.9 },
    IntentRule { pattern: r"^(show\s+)?only\b", intent: Intent::Filter, confidence: 0.9 },
    IntentRule { pattern: r"^narrow\b", intent: Intent::Filter, confidence: 0.9 },
    IntentRule { pattern: r"\b(with|having|that\s+have)\s+(the\s+)?tag", intent: Intent::Filter, confidence: 0.9 },
    IntentRule { pattern: r"^photos?\s+tagged\s+(as|with)", intent: Intent::Filter, confidence: 0.9 },
    // SELECT
    IntentRule { pattern: r"^(select|choose|pick)\b", intent: Intent::Select, confidence: 0.9 },
    IntentRule { pattern: r"^(show|display|view)\s+(me\s+)?(all\s+)?", intent: Intent::Select, confidence: 0.9 },
    IntentRule { pattern: r"^(find|get|fetch|locate)\b", intent: Intent::Select, confidence: 0.9 },
    IntentRule { pattern: r"^(photos?|images?|assets?)\s+(of|with|by|from)", intent: Intent::Select, confidence: 0.9 },
    IntentRule { pattern: r"^(what|which|where)\b", intent: Intent::Select, confidence: 0.6 },
];

static COMPILED_RULES: LazyLock<Vec<(Regex, Intent, f32)>> = LazyLock::new(|| {
    RULE_ROWS
        .iter()
        .map(|row| (Regex::new(row.pattern).unwrap(), row.intent, row.confidence))
        .collect()
});

static RE_ADDITIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(also|add|plus|and|additionally)\b").unwrap());
static RE_SELECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(selected|selection|these|chosen)\b").unwrap());
static RE_ALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(all|everything|every)\b").unwrap());
static RE_NEGATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(not|remove|without|exclude|clear)\b").unwrap());

/// Classify a free-form query. Never fails: unmatched queries are SEARCH at
/// 0.3, empty queries UNKNOWN at 0.
pub fn classify_intent(query: &str) -> IntentClassification {
    let q = query.to_lowercase();
    let q = q.trim();

    if q.is_empty() {
        return IntentClassification {
            intent: Intent::Unknown,
            confidence: 0.0,
            modifiers: IntentModifiers::default(),
        };
    }

    for (pattern, intent, confidence) in COMPILED_RULES.iter() {
        if *confidence > 0.5 && pattern.is_match(q) {
            trace!(query = q, ?intent, confidence, "intent rule matched");
            return IntentClassification {
                intent: *intent,
                confidence: *confidence,
                modifiers: extract_modifiers(q),
            };
        }
    }

    IntentClassification {
        intent: Intent::Search,
        confidence: 0.3,
        modifiers: IntentModifiers::default(),
    }
}

fn extract_modifiers(q: &str) -> IntentModifiers {
    IntentModifiers {
        additive: RE_ADDITIVE.is_match(q),
        selective: RE_SELECTIVE.is_match(q),
        all: RE_ALL.is_match(q),
        negation: RE_NEGATION.is_match(q),
    }
}
