//! Entity extraction from free-form queries.
//!
//! The extractor is a fold over five stages, each taking the working query
//! and returning it with any consumed text removed: date range, selection
//! modifiers, team members, collections, and tags (last, since tag names
//! are the most generic). A stage strips its lead-in phrases ("tagged as",
//! "in the collection", possessives) only when it actually matched an
//! entity, so a failed stage cannot eat text a later stage needs.

use std::sync::LazyLock;

use chrono::{Local, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::{Collection, EntityContext, Tag, TeamMember};
use crate::dates::{DateRange, extract_date_from_query};
use crate::text::{fuzzy_match_objects, match_name, remove_case_insensitive};

// ── Stage patterns ──────────────────────────────────────────────────────

static RE_TEAM_LEADIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(assign\s+to|give\s+to|taken\s+by|shot\s+by|team\s*member|photographer|artist|by|from|of)\s+",
    )
    .unwrap()
});

static RE_POSSESSIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\w+)'s\s+(photos?|images?|work|shots?)").unwrap());

static RE_COLLECTION_LEADIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^((add|move|put)\s+(to|in(to)?)\s+|in(to)?\s+|to\s+|from\s+|of\s+)?(the\s+)?(collection|set|album)\s+")
        .unwrap()
});

static RE_COLLECTION_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+(collection|set|album)$").unwrap());

static RE_TAG_LEADIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^((the\s+)?(un)?tag(ged)?\s+((selected|all|these)\s+)?((as|with|by)\s+)?|(add|apply|attach|remove|delete|strip|drop)\s+(the\s+)?tags?\s+|(set|replace|change)\s+(the\s+)?tag\s+(to|as|with)\s+|label(led)?\s+((as|with)\s+)?|mark(ed)?\s+((as|with)\s+)?|filter\s+by\s+)",
    )
    .unwrap()
});

static RE_TAG_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+(tags?|labels?|category)$").unwrap());

static RE_QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]+)""#).unwrap());

static RE_SELECT_ALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(select\s+)?all\b").unwrap());
static RE_SELECT_NONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(select\s+)?none|deselect\s+all|clear\s+selection\b").unwrap());
static RE_SELECT_INVERSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\binvert\s+selection|select\s+inverse|reverse\s+selection\b").unwrap()
});
static RE_ADDITIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(also|add|plus|additionally|too)\b").unwrap());

static MODIFIER_STRIPS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(also|add|plus|additionally|too)\b",
        r"(?i)\binvert\s+selection\b",
        r"(?i)\bselect\s+inverse\b",
        r"(?i)\breverse\s+selection\b",
        r"(?i)\bselect\s+none\b",
        r"(?i)\bdeselect\s+all\b",
        r"(?i)\bclear\s+selection\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static RE_LEADING_CONNECTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(and|or|with|by|from|in|to|as|the|a|an)(\s+|$)").unwrap());

static RE_NEGATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(not|without|exclude|excluding|except)\b").unwrap());

static RE_FIRST_N: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bfirst\s+(\d+)\b").unwrap());
static RE_LAST_N: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\blast\s+(\d+)\b").unwrap());
static RE_N_RANDOM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s+random\b").unwrap());

// ── Types ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTag {
    pub tag: Tag,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMember {
    pub member: TeamMember,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCollection {
    pub collection: Collection,
    pub confidence: f32,
}

/// Selection-level keyword flags found during extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionModifiers {
    pub select_all: bool,
    pub select_none: bool,
    pub select_inverse: bool,
    pub additive: bool,
}

/// Everything the extractor pulled out of a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    pub tags: Vec<ScoredTag>,
    pub team_members: Vec<ScoredMember>,
    pub collections: Vec<ScoredCollection>,
    pub date_range: Option<DateRange>,
    pub modifiers: ExtractionModifiers,
    /// The query with every extracted entity and its lead-in removed.
    pub clean_query: String,
}

impl ExtractedEntities {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
            && self.team_members.is_empty()
            && self.collections.is_empty()
            && self.date_range.is_none()
    }

    /// Human-readable digest for explanations and logging.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        if !self.tags.is_empty() {
            let names: Vec<String> = self
                .tags
                .iter()
                .map(|t| format!("{} ({:.0}%)", t.tag.label(), t.confidence * 100.0))
                .collect();
            parts.push(format!("Tags: {}", names.join(", ")));
        }
        if !self.team_members.is_empty() {
            let names: Vec<String> = self
                .team_members
                .iter()
                .map(|m| format!("{} ({:.0}%)", m.member.name, m.confidence * 100.0))
                .collect();
            parts.push(format!("Team: {}", names.join(", ")));
        }
        if !self.collections.is_empty() {
            let names: Vec<String> = self
                .collections
                .iter()
                .map(|c| format!("{} ({:.0}%)", c.collection.label(), c.confidence * 100.0))
                .collect();
            parts.push(format!("Collections: {}", names.join(", ")));
        }
        if let Some(range) = &self.date_range {
            parts.push(format!("Date: {}", range.description));
        }
        if !self.clean_query.is_empty() {
            parts.push(format!("Remaining: \"{}\"", self.clean_query));
        }

        if parts.is_empty() {
            "No entities extracted".to_string()
        } else {
            parts.join(" | ")
        }
    }
}

// ── Extraction ──────────────────────────────────────────────────────────

/// Extract all entities from a query against an explicit reference instant.
pub fn extract_entities_at(
    query: &str,
    ctx: &EntityContext,
    reference: NaiveDateTime,
) -> ExtractedEntities {
    let working = query.trim().to_string();

    // Dates first, since they usually trail the query.
    let (working, date_range) = extract_date_from_query(&working, reference);

    let modifiers = scan_modifiers(&working);
    let working = strip_modifier_keywords(&working);

    let (team_members, working) = extract_team_members(&working, &ctx.team_members);
    let (collections, working) = extract_collections(&working, &ctx.collections);
    let (tags, working) = extract_tags(&working, &ctx.tags);

    let clean_query = final_cleanup(&working);

    let entities = ExtractedEntities {
        tags,
        team_members,
        collections,
        date_range,
        modifiers,
        clean_query,
    };
    debug!(query, summary = entities.summary(), "extracted entities");
    entities
}

/// [`extract_entities_at`] against the current local time.
pub fn extract_entities(query: &str, ctx: &EntityContext) -> ExtractedEntities {
    extract_entities_at(query, ctx, Local::now().naive_local())
}

fn extract_team_members(
    working: &str,
    members: &[TeamMember],
) -> (Vec<ScoredMember>, String) {
    let probe = RE_TEAM_LEADIN.replace(working.trim(), "");
    let probe = RE_POSSESSIVE.replace(&probe, "");
    let probe = probe.trim();

    let mut found: Vec<ScoredMember> = Vec::new();
    let mut clean = working.to_string();

    for member in members {
        if let Some(score) = match_name(probe, &member.name, 0.7) {
            found.push(ScoredMember {
                member: member.clone(),
                confidence: score,
            });
            clean = remove_case_insensitive(&clean, &member.name);
            if let Some(first) = member.name.split_whitespace().next() {
                clean = remove_case_insensitive(&clean, first);
            }
        }
    }
    found.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    // Possessive form: "alice's photos".
    if let Some(caps) = RE_POSSESSIVE.captures(working) {
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        for member in members {
            if let Some(score) = match_name(name, &member.name, 0.7) {
                if !found.iter().any(|m| m.member.id == member.id) {
                    found.push(ScoredMember {
                        member: member.clone(),
                        confidence: score,
                    });
                }
            }
        }
        if let Some(whole) = caps.get(0) {
            clean = clean.replace(whole.as_str(), "");
        }
    }

    if found.is_empty() {
        (found, working.to_string())
    } else {
        let clean = RE_TEAM_LEADIN.replace(clean.trim(), "").into_owned();
        (found, clean)
    }
}

fn extract_collections(
    working: &str,
    collections: &[Collection],
) -> (Vec<ScoredCollection>, String) {
    let probe = RE_COLLECTION_LEADIN.replace(working.trim(), "");
    let probe = RE_COLLECTION_SUFFIX.replace(&probe, "");

    let matches = fuzzy_match_objects(probe.trim(), collections, 0.7);
    if matches.is_empty() {
        return (Vec::new(), working.to_string());
    }

    let mut found = Vec::new();
    let mut clean = RE_COLLECTION_LEADIN.replace(working.trim(), "").into_owned();
    clean = RE_COLLECTION_SUFFIX.replace(&clean, "").into_owned();

    for m in matches.iter().take(2) {
        found.push(ScoredCollection {
            collection: m.item.clone(),
            confidence: m.score,
        });
        clean = remove_case_insensitive(&clean, m.item.label());
        clean = remove_case_insensitive(&clean, &m.item.name);
    }

    (found, clean)
}

fn extract_tags(working: &str, tags: &[Tag]) -> (Vec<ScoredTag>, String) {
    let probe = RE_TAG_LEADIN.replace(working.trim(), "");
    let probe = RE_TAG_SUFFIX.replace(&probe, "");

    let matches = fuzzy_match_objects(probe.trim(), tags, 0.6);

    let mut found: Vec<ScoredTag> = Vec::new();
    let mut clean = working.to_string();
    let mut consumed = false;

    for m in matches.iter().take(3) {
        found.push(ScoredTag {
            tag: m.item.clone(),
            confidence: m.score,
        });
        consumed = true;
    }

    // Quoted substrings are exact tag references at full confidence.
    for caps in RE_QUOTED.captures_iter(working) {
        let quoted = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let q = quoted.to_lowercase();
        for tag in tags {
            if tag.name.to_lowercase() == q || tag.display_name.to_lowercase() == q {
                if !found.iter().any(|t| t.tag.id == tag.id) {
                    found.push(ScoredTag {
                        tag: tag.clone(),
                        confidence: 1.0,
                    });
                }
                if let Some(whole) = caps.get(0) {
                    clean = clean.replace(whole.as_str(), "");
                }
            }
        }
    }

    if !consumed && found.is_empty() {
        return (found, working.to_string());
    }

    if consumed {
        clean = RE_TAG_LEADIN.replace(clean.trim(), "").into_owned();
        clean = RE_TAG_SUFFIX.replace(&clean, "").into_owned();
    }
    for t in &found {
        clean = remove_case_insensitive(&clean, t.tag.label());
        clean = remove_case_insensitive(&clean, &t.tag.name);
    }

    (found, clean)
}

fn scan_modifiers(q: &str) -> ExtractionModifiers {
    let q = q.to_lowercase();
    ExtractionModifiers {
        select_all: RE_SELECT_ALL.is_match(&q),
        select_none: RE_SELECT_NONE.is_match(&q),
        select_inverse: RE_SELECT_INVERSE.is_match(&q),
        additive: RE_ADDITIVE.is_match(&q),
    }
}

fn strip_modifier_keywords(q: &str) -> String {
    let mut out = q.to_string();
    for re in MODIFIER_STRIPS.iter() {
        out = re.replace_all(&out, "").into_owned();
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn final_cleanup(q: &str) -> String {
    let mut out = q.split_whitespace().collect::<Vec<_>>().join(" ");
    loop {
        let next = RE_LEADING_CONNECTOR.replace(&out, "").into_owned();
        if next == out {
            break;
        }
        out = next;
    }
    out.trim().to_string()
}

// ── Criteria scans ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Date,
    Name,
    Size,
    Team,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SortCriteria {
    pub field: SortField,
    pub direction: SortDirection,
    pub confidence: f32,
}

/// Sorting criteria, when the query names a sortable dimension.
pub fn extract_sort_criteria(query: &str) -> Option<SortCriteria> {
    static RE_DATE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\b(date|time|uploaded|created|newest|latest|oldest|recent)\b").unwrap()
    });
    static RE_DATE_ASC: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\b(oldest|ascending|asc)\b").unwrap());
    static RE_NAME: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\b(name|title|alphabetic(al)?|a-z|z-a)\b").unwrap());
    static RE_NAME_DESC: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\b(z-a|descending|desc|reverse)\b").unwrap());
    static RE_SIZE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\b(size|filesize|largest|smallest|biggest|tiniest)\b").unwrap()
    });
    static RE_SIZE_ASC: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\b(smallest|tiniest|ascending|asc)\b").unwrap());
    static RE_TEAM: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\b(team|artist|photographer|creator)\b").unwrap());

    let q = query.to_lowercase();

    if RE_DATE.is_match(&q) {
        let direction = if RE_DATE_ASC.is_match(&q) {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        };
        return Some(SortCriteria {
            field: SortField::Date,
            direction,
            confidence: 0.9,
        });
    }
    if RE_NAME.is_match(&q) {
        let direction = if RE_NAME_DESC.is_match(&q) {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        return Some(SortCriteria {
            field: SortField::Name,
            direction,
            confidence: 0.9,
        });
    }
    if RE_SIZE.is_match(&q) {
        let direction = if RE_SIZE_ASC.is_match(&q) {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        };
        return Some(SortCriteria {
            field: SortField::Size,
            direction,
            confidence: 0.9,
        });
    }
    if RE_TEAM.is_match(&q) {
        return Some(SortCriteria {
            field: SortField::Team,
            direction: SortDirection::Asc,
            confidence: 0.8,
        });
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupField {
    Date,
    Tag,
    Team,
    Collection,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupCriteria {
    pub field: GroupField,
    pub confidence: f32,
}

/// Grouping criteria, when the query names a groupable dimension.
pub fn extract_group_criteria(query: &str) -> Option<GroupCriteria> {
    static RE_DATE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\b(date|time|day|week|month|year)\b").unwrap());
    static RE_TAG: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\b(tag|label|category)\b").unwrap());
    static RE_TEAM: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\b(team|artist|photographer|creator)\b").unwrap());
    static RE_COLLECTION: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\b(collection|set|album)\b").unwrap());

    let q = query.to_lowercase();

    if RE_DATE.is_match(&q) {
        return Some(GroupCriteria {
            field: GroupField::Date,
            confidence: 0.9,
        });
    }
    if RE_TAG.is_match(&q) {
        return Some(GroupCriteria {
            field: GroupField::Tag,
            confidence: 0.9,
        });
    }
    if RE_TEAM.is_match(&q) {
        return Some(GroupCriteria {
            field: GroupField::Team,
            confidence: 0.9,
        });
    }
    if RE_COLLECTION.is_match(&q) {
        return Some(GroupCriteria {
            field: GroupField::Collection,
            confidence: 0.9,
        });
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityPosition {
    First,
    Last,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub count: usize,
    pub position: QuantityPosition,
    pub confidence: f32,
}

/// "first 10", "last 5", "3 random".
pub fn extract_quantity(query: &str) -> Option<Quantity> {
    let q = query.to_lowercase();

    if let Some(caps) = RE_FIRST_N.captures(&q) {
        let count = caps.get(1)?.as_str().parse().ok()?;
        return Some(Quantity {
            count,
            position: QuantityPosition::First,
            confidence: 0.95,
        });
    }
    if let Some(caps) = RE_LAST_N.captures(&q) {
        let count = caps.get(1)?.as_str().parse().ok()?;
        return Some(Quantity {
            count,
            position: QuantityPosition::Last,
            confidence: 0.95,
        });
    }
    if let Some(caps) = RE_N_RANDOM.captures(&q) {
        let count = caps.get(1)?.as_str().parse().ok()?;
        return Some(Quantity {
            count,
            position: QuantityPosition::Random,
            confidence: 0.9,
        });
    }
    None
}

/// Whether the query is negated ("not tagged", "without bridal").
pub fn has_negation(query: &str) -> bool {
    RE_NEGATION.is_match(&query.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::fixtures::studio_context;
    use chrono::NaiveDate;

    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 19)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap()
    }

    fn extract(query: &str) -> ExtractedEntities {
        let ctx = studio_context().entity_context();
        extract_entities_at(query, &ctx, reference())
    }

    #[test]
    fn tag_phrase_is_fully_consumed() {
        let e = extract("tag selected as sunset");
        assert_eq!(e.tags.len(), 1);
        assert_eq!(e.tags[0].tag.id, "tag-sunset");
        assert_eq!(e.tags[0].confidence, 1.0);
        assert_eq!(e.clean_query, "");
    }

    #[test]
    fn tag_lead_in_variants_resolve() {
        for query in ["tagged as bridal", "label as bridal", "filter by bridal", "untag bridal"] {
            let e = extract(query);
            assert_eq!(e.tags.first().map(|t| t.tag.id.as_str()), Some("tag-bridal"), "{query}");
        }
    }

    #[test]
    fn quoted_tags_match_exactly_at_full_confidence() {
        let e = extract("photos \"Landscape\" from the shoot");
        assert!(e.tags.iter().any(|t| t.tag.id == "tag-landscape" && t.confidence == 1.0));
        assert!(!e.clean_query.contains("Landscape"));
    }

    #[test]
    fn fuzzy_tag_matches_clear_the_threshold() {
        let e = extract("tag as portrat");
        assert_eq!(e.tags.first().map(|t| t.tag.id.as_str()), Some("tag-portrait"));
        let confidence = e.tags[0].confidence;
        assert!(confidence >= 0.6 && confidence < 1.0);
    }

    #[test]
    fn team_members_match_by_first_name_and_possessive() {
        let e = extract("by alice");
        assert_eq!(e.team_members.len(), 1);
        assert_eq!(e.team_members[0].member.id, "tm-alice");
        assert_eq!(e.team_members[0].confidence, 0.95);
        assert_eq!(e.clean_query, "");

        let e = extract("bob's photos");
        assert_eq!(e.team_members.first().map(|m| m.member.id.as_str()), Some("tm-bob"));
        assert!(!e.clean_query.contains("bob"));
    }

    #[test]
    fn failed_team_stage_leaves_the_query_for_later_stages() {
        // No member matches, so the tag stage still sees the full text.
        let e = extract("tagged as landscape");
        assert!(e.team_members.is_empty());
        assert_eq!(e.tags.first().map(|t| t.tag.id.as_str()), Some("tag-landscape"));
    }

    #[test]
    fn collections_match_with_top_two_cap() {
        let e = extract("collection summer-2026");
        assert_eq!(e.collections.len(), 1);
        assert_eq!(e.collections[0].collection.id, "col-summer");
        assert!(e.collections.len() <= 2);
    }

    #[test]
    fn date_ranges_are_extracted_first() {
        let e = extract("tagged as bridal last week");
        let range = e.date_range.as_ref().unwrap();
        assert_eq!(range.description, "Last week");
        assert_eq!(e.tags.first().map(|t| t.tag.id.as_str()), Some("tag-bridal"));
        assert_eq!(e.clean_query, "");
    }

    #[test]
    fn modifier_keywords_are_scanned_and_stripped() {
        let e = extract("also tag as sunset");
        assert!(e.modifiers.additive);
        assert!(!e.modifiers.select_all);
        assert_eq!(e.clean_query, "");

        let e = extract("select all");
        assert!(e.modifiers.select_all);
    }

    #[test]
    fn additive_keyword_is_stripped_from_the_clean_query() {
        let e = extract("add sunset");
        assert!(e.modifiers.additive);
        assert_eq!(e.tags.first().map(|t| t.tag.id.as_str()), Some("tag-sunset"));
        assert_eq!(e.clean_query, "");

        // Stripping "add" must not strand the tag or collection lead-ins.
        let e = extract("add the tag portrait");
        assert_eq!(e.tags.first().map(|t| t.tag.id.as_str()), Some("tag-portrait"));
        assert_eq!(e.clean_query, "");

        let e = extract("add to collection summer-2026");
        assert_eq!(
            e.collections.first().map(|c| c.collection.id.as_str()),
            Some("col-summer")
        );
    }

    #[test]
    fn empty_extraction_reports_itself() {
        let e = extract("completely unrelated words");
        assert!(e.is_empty());
        assert_eq!(e.summary(), "Remaining: \"completely unrelated words\"");

        let e = extract("tag as sunset");
        assert!(e.summary().contains("Tags: Sunset (100%)"));
    }

    #[test]
    fn sort_criteria_cover_the_four_fields() {
        let c = extract_sort_criteria("sort by date").unwrap();
        assert_eq!(c.field, SortField::Date);
        assert_eq!(c.direction, SortDirection::Desc);

        let c = extract_sort_criteria("oldest first").unwrap();
        assert_eq!((c.field, c.direction), (SortField::Date, SortDirection::Asc));

        let c = extract_sort_criteria("sort by name z-a").unwrap();
        assert_eq!((c.field, c.direction), (SortField::Name, SortDirection::Desc));

        let c = extract_sort_criteria("largest files").unwrap();
        assert_eq!((c.field, c.direction), (SortField::Size, SortDirection::Desc));

        let c = extract_sort_criteria("sort by photographer").unwrap();
        assert_eq!(c.field, SortField::Team);
        assert_eq!(c.confidence, 0.8);

        assert!(extract_sort_criteria("sort by mood").is_none());
    }

    #[test]
    fn group_criteria_cover_the_four_fields() {
        assert_eq!(extract_group_criteria("group by month").unwrap().field, GroupField::Date);
        assert_eq!(extract_group_criteria("group by category").unwrap().field, GroupField::Tag);
        assert_eq!(extract_group_criteria("group by artist").unwrap().field, GroupField::Team);
        assert_eq!(extract_group_criteria("group by album").unwrap().field, GroupField::Collection);
        assert!(extract_group_criteria("group somehow").is_none());
    }

    #[test]
    fn quantities_parse_with_position() {
        let q = extract_quantity("select first 10 photos").unwrap();
        assert_eq!((q.count, q.position), (10, QuantityPosition::First));
        assert_eq!(q.confidence, 0.95);

        let q = extract_quantity("last 5").unwrap();
        assert_eq!((q.count, q.position), (5, QuantityPosition::Last));

        let q = extract_quantity("pick 3 random").unwrap();
        assert_eq!((q.count, q.position), (3, QuantityPosition::Random));
        assert_eq!(q.confidence, 0.9);

        assert!(extract_quantity("select some photos").is_none());
    }

    #[test]
    fn negation_scan() {
        assert!(has_negation("photos not tagged"));
        assert!(has_negation("everything except bridal"));
        assert!(!has_negation("tag as bridal"));
    }
}
