//! Probabilistic interpretation of free-form queries.
//!
//! Where the grammar path rejects anything off-pattern, this layer always
//! produces an answer with an honest confidence score: intent
//! classification, entity extraction, and an orchestrator that blends the
//! two and explains itself.

pub mod entities;
pub mod intent;
pub mod parser;

pub use entities::{
    ExtractedEntities, ExtractionModifiers, GroupCriteria, GroupField, Quantity,
    QuantityPosition, ScoredCollection,
    ScoredMember, ScoredTag, SortCriteria, SortDirection, SortField, extract_entities,
    extract_entities_at, extract_group_criteria, extract_quantity, extract_sort_criteria,
    has_negation,
};
pub use intent::{Intent, IntentClassification, IntentModifiers, classify_intent};
pub use parser::{
    CommandValidation, ParsedCommand, parse_natural_language_query,
    parse_natural_language_query_at, quick_parse, validate_command,
};
