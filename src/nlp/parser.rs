//! Orchestration of the probabilistic path.
//!
//! Combines intent classification, entity extraction, and the criteria
//! scans into one [`ParsedCommand`] with a blended overall confidence.
//!
//! The confidence blend is weighted: intent 50%, entities 30%, date 10%,
//! sort-or-group 10%. Each non-entity component contributes its full weight
//! when absent (absence is not evidence against the parse), but an intent
//! that requires entities and found none halves the accumulated total
//! instead of just zeroing the entity term. That asymmetric penalty is
//! deliberate: "tag as" with no recognizable tag is a much worse parse than
//! "select all" with no tag.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::EntityContext;
use crate::nlp::entities::{
    ExtractedEntities, ExtractionModifiers, GroupCriteria, Quantity, SortCriteria,
    extract_entities_at, extract_group_criteria, extract_quantity, extract_sort_criteria,
    has_negation,
};
use crate::nlp::intent::{Intent, IntentClassification, classify_intent};

/// A fully interpreted free-form query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedCommand {
    pub query: String,
    pub intent: Intent,
    pub intent_confidence: f32,
    pub intent_description: String,
    pub entities: ExtractedEntities,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortCriteria>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupCriteria>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Quantity>,
    pub has_negation: bool,
    pub overall_confidence: f32,
    /// Guidance for the user, populated when overall confidence is low.
    pub hints: Vec<String>,
}

/// Outcome of [`validate_command`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Interpret a query against an explicit reference instant.
pub fn parse_natural_language_query_at(
    query: &str,
    ctx: &EntityContext,
    reference: NaiveDateTime,
) -> ParsedCommand {
    let classification = classify_intent(query);

    // Entity extraction only pays off for entity-driven intents; for the
    // rest the clean query is the query itself.
    let entities = if classification.intent.requires_entities() {
        extract_entities_at(query, ctx, reference)
    } else {
        empty_entities(query)
    };

    let sort = (classification.intent == Intent::Sort)
        .then(|| extract_sort_criteria(query))
        .flatten();
    let group = (classification.intent == Intent::Group)
        .then(|| extract_group_criteria(query))
        .flatten();
    let quantity = extract_quantity(query);
    let negation = has_negation(query);

    let overall_confidence =
        calculate_overall_confidence(&classification, &entities, sort.as_ref(), group.as_ref());

    let hints = if overall_confidence < 0.6 {
        low_confidence_hints(&classification, &entities, ctx)
    } else {
        Vec::new()
    };

    debug!(
        query,
        intent = ?classification.intent,
        overall_confidence,
        "parsed natural language query"
    );

    ParsedCommand {
        query: query.to_string(),
        intent: classification.intent,
        intent_confidence: classification.confidence,
        intent_description: classification.intent.description().to_string(),
        entities,
        sort,
        group,
        quantity,
        has_negation: negation,
        overall_confidence,
        hints,
    }
}

/// [`parse_natural_language_query_at`] against the current local time.
pub fn parse_natural_language_query(query: &str, ctx: &EntityContext) -> ParsedCommand {
    parse_natural_language_query_at(query, ctx, Local::now().naive_local())
}

fn empty_entities(query: &str) -> ExtractedEntities {
    ExtractedEntities {
        tags: Vec::new(),
        team_members: Vec::new(),
        collections: Vec::new(),
        date_range: None,
        modifiers: ExtractionModifiers::default(),
        clean_query: query.to_string(),
    }
}

fn calculate_overall_confidence(
    classification: &IntentClassification,
    entities: &ExtractedEntities,
    sort: Option<&SortCriteria>,
    group: Option<&GroupCriteria>,
) -> f32 {
    let mut confidence = classification.confidence * 0.5;

    let entity_scores: Vec<f32> = entities
        .tags
        .iter()
        .map(|t| t.confidence)
        .chain(entities.team_members.iter().map(|m| m.confidence))
        .chain(entities.collections.iter().map(|c| c.confidence))
        .collect();

    if !entity_scores.is_empty() {
        let avg = entity_scores.iter().sum::<f32>() / entity_scores.len() as f32;
        confidence += avg * 0.3;
    } else if classification.intent.requires_entities() {
        // Required entities missing: halve everything accumulated so far.
        confidence *= 0.5;
    } else {
        confidence += 0.3;
    }

    match &entities.date_range {
        Some(range) => confidence += range.confidence * 0.1,
        None => confidence += 0.1,
    }

    if let Some(sort) = sort {
        confidence += sort.confidence * 0.1;
    } else if let Some(group) = group {
        confidence += group.confidence * 0.1;
    } else {
        confidence += 0.1;
    }

    confidence.clamp(0.0, 1.0)
}

fn low_confidence_hints(
    classification: &IntentClassification,
    entities: &ExtractedEntities,
    ctx: &EntityContext,
) -> Vec<String> {
    let mut hints = Vec::new();

    if classification.confidence < 0.6 {
        hints.push(
            "Try starting with a clear action word like \"show\", \"filter\", \"tag\", or \"assign\""
                .to_string(),
        );
    }

    let no_entities = entities.tags.is_empty()
        && entities.team_members.is_empty()
        && entities.collections.is_empty();

    if classification.intent.requires_entities() && no_entities {
        match classification.intent {
            Intent::Tag | Intent::Filter => {
                let names: Vec<&str> = ctx.tags.iter().take(5).map(|t| t.label()).collect();
                hints.push(format!("Specify a tag name. Available tags: {}", names.join(", ")));
            }
            Intent::AssignTeam => {
                let names: Vec<&str> = ctx
                    .team_members
                    .iter()
                    .take(5)
                    .map(|m| m.name.as_str())
                    .collect();
                hints.push(format!(
                    "Specify a team member name. Available: {}",
                    names.join(", ")
                ));
            }
            _ => {}
        }
    }

    let shaky_entities = entities.tags.iter().any(|t| t.confidence < 0.7)
        || entities.team_members.iter().any(|m| m.confidence < 0.7);
    if shaky_entities {
        hints.push("Did you mean one of these? Use quotes for exact matches.".to_string());
    }

    hints
}

/// Whether a parsed command carries enough information to execute.
///
/// For SORT and GROUP the extracted criteria counts as the required entity;
/// "sort by date" names no tag or member but is complete.
pub fn validate_command(parsed: &ParsedCommand) -> CommandValidation {
    let mut errors = Vec::new();

    if parsed.overall_confidence < 0.4 {
        errors.push("Command confidence is too low. Please be more specific.".to_string());
    }

    if parsed.intent.requires_entities() {
        let has_entities = !parsed.entities.tags.is_empty()
            || !parsed.entities.team_members.is_empty()
            || !parsed.entities.collections.is_empty();
        let satisfied_by_criteria = (parsed.intent == Intent::Sort && parsed.sort.is_some())
            || (parsed.intent == Intent::Group && parsed.group.is_some());

        if !has_entities && !satisfied_by_criteria {
            errors.push(format!(
                "{} requires specifying tags, team members, or collections.",
                parsed.intent_description
            ));
        }
    }

    if parsed.intent == Intent::Sort && parsed.sort.is_none() {
        errors.push(
            "Sort command requires specifying what to sort by (e.g., date, name).".to_string(),
        );
    }
    if parsed.intent == Intent::Group && parsed.group.is_none() {
        errors.push(
            "Group command requires specifying how to group (e.g., by tag, by date).".to_string(),
        );
    }

    CommandValidation {
        valid: errors.is_empty(),
        errors,
    }
}

impl ParsedCommand {
    /// Multi-line human-readable explanation of the parse.
    pub fn explain(&self) -> String {
        let mut parts = vec![
            format!("Intent: {}", self.intent_description),
            format!("Confidence: {:.0}%", self.overall_confidence * 100.0),
        ];

        if !self.entities.tags.is_empty() {
            let names: Vec<&str> = self.entities.tags.iter().map(|t| t.tag.label()).collect();
            parts.push(format!("Tags: {}", names.join(", ")));
        }
        if !self.entities.team_members.is_empty() {
            let names: Vec<&str> = self
                .entities
                .team_members
                .iter()
                .map(|m| m.member.name.as_str())
                .collect();
            parts.push(format!("Team Members: {}", names.join(", ")));
        }
        if !self.entities.collections.is_empty() {
            let names: Vec<&str> = self
                .entities
                .collections
                .iter()
                .map(|c| c.collection.label())
                .collect();
            parts.push(format!("Collections: {}", names.join(", ")));
        }
        if let Some(range) = &self.entities.date_range {
            parts.push(format!("Date Range: {}", range.description));
        }
        if let Some(sort) = &self.sort {
            parts.push(format!("Sort: {:?} {:?}", sort.field, sort.direction));
        }
        if let Some(group) = &self.group {
            parts.push(format!("Group: {:?}", group.field));
        }
        if let Some(quantity) = &self.quantity {
            parts.push(format!("Quantity: {:?} {}", quantity.position, quantity.count));
        }

        let mut modifiers = Vec::new();
        if self.entities.modifiers.select_all {
            modifiers.push("select all");
        }
        if self.entities.modifiers.select_none {
            modifiers.push("select none");
        }
        if self.entities.modifiers.select_inverse {
            modifiers.push("invert selection");
        }
        if self.entities.modifiers.additive {
            modifiers.push("additive");
        }
        if !modifiers.is_empty() {
            parts.push(format!("Modifiers: {}", modifiers.join(", ")));
        }

        if self.has_negation {
            parts.push("Negation: true".to_string());
        }

        parts.join("\n")
    }
}

/// Intent-only fast path: tells the caller whether a full parse (with
/// entity extraction) is worth running.
pub fn quick_parse(query: &str) -> (Intent, f32, bool) {
    let classification = classify_intent(query);
    let needs_full_parse =
        classification.intent.requires_entities() || classification.confidence < 0.8;
    (classification.intent, classification.confidence, needs_full_parse)
}
