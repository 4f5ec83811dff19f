//! Command interpretation engine for media-asset command palettes.
//!
//! Two complementary interpretation strategies over the same workspace
//! context:
//!
//! - **Grammar path** (deterministic): [`grammar::tokenize`] splits input
//!   into classified tokens, [`grammar::validate_command_sequence`] checks
//!   word order, [`suggest::generate_suggestions`] ranks completions, and
//!   [`compile::compile_command`] turns valid sequences into executable
//!   actions. Strict and predictable; wrong input is rejected with a
//!   diagnostic.
//! - **NLP path** (probabilistic): [`nlp::classify_intent`] maps free-form
//!   text to one of sixteen intents, [`nlp::extract_entities`] pulls out
//!   tags, team members, collections, and date ranges, and
//!   [`nlp::parse_natural_language_query`] blends everything into a scored,
//!   explainable [`nlp::ParsedCommand`]. Never rejects; low confidence comes
//!   with hints instead.
//!
//! The crate is pure and synchronous: callers pass a [`ContextData`]
//! snapshot of their workspace per call, and nothing here performs I/O or
//! holds state. All date parsing has `*_at` variants taking an explicit
//! reference instant so results are reproducible.
//!
//! ```
//! use damlex::{ContextData, compile_command, tokenize};
//!
//! let ctx = ContextData::default();
//! let tokens = tokenize("select all", &ctx);
//! let command = compile_command(&tokens, &ctx).unwrap();
//! assert_eq!(command.description, "Select all assets");
//! ```

pub mod compile;
pub mod context;
pub mod dates;
pub mod error;
pub mod grammar;
pub mod nlp;
pub mod suggest;
pub mod text;

pub use compile::{CommandAction, CommandKind, CompiledCommand, compile_command};
pub use context::{
    Collection, ContextData, EntityContext, Tag, TagCategory, TagDef, TeamMember,
};
pub use dates::{
    DateRange, ParsedDate, extract_date_from_query, extract_date_from_query_now,
    format_date_range, is_date_in_range, parse_natural_date, parse_natural_date_range,
    parse_natural_date_range_now,
};
pub use error::{CommandError, ValidationResult};
pub use grammar::{
    Token, TokenType, ValueMeta, is_command_complete, tokenize, validate_command_sequence,
};
pub use nlp::{
    ExtractedEntities, Intent, ParsedCommand, classify_intent, extract_entities,
    extract_entities_at, parse_natural_language_query, parse_natural_language_query_at,
    validate_command,
};
pub use suggest::{ParseResult, Suggestion, autocomplete, generate_suggestions, parse_command};
