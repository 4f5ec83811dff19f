//! Caller-supplied workspace context.
//!
//! Both interpretation paths resolve value words against the same read-only
//! snapshot of the workspace: tag categories with their nested tags, team
//! members, collections, and the current selection/filter state. The crate
//! never mutates this data; callers rebuild it when the workspace changes.

use serde::{Deserialize, Serialize};

use crate::text::FuzzyFields;

/// A tag as it lives inside its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDef {
    pub id: String,
    pub name: String,
    pub display_name: String,
}

/// A named grouping of tags, e.g. "Style" or "Mood".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCategory {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub color: Option<String>,
    pub tags: Vec<TagDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    pub display_name: Option<String>,
}

/// A tag flattened out of its category, carrying the category identity
/// alongside so previews can render "Category › Tag" without a re-lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub category_id: Option<String>,
    pub category_name: Option<String>,
    pub category_display_name: Option<String>,
    pub category_color: Option<String>,
}

impl Tag {
    /// Preferred human label.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }
}

impl Collection {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// Snapshot of the workspace handed to every tokenize/suggest/compile/parse
/// call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextData {
    pub tag_categories: Vec<TagCategory>,
    pub team_members: Vec<TeamMember>,
    pub collections: Vec<Collection>,
    pub has_selection: bool,
    pub has_filters: bool,
    pub selected_count: usize,
}

/// The entity extractor's view of the context: tags flattened out of their
/// categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityContext {
    pub tags: Vec<Tag>,
    pub team_members: Vec<TeamMember>,
    pub collections: Vec<Collection>,
}

impl ContextData {
    /// Flatten every category's tags, stamping each with its category
    /// identity.
    pub fn flatten_tags(&self) -> Vec<Tag> {
        self.tag_categories
            .iter()
            .flat_map(|category| {
                category.tags.iter().map(|tag| Tag {
                    id: tag.id.clone(),
                    name: tag.name.clone(),
                    display_name: tag.display_name.clone(),
                    category_id: Some(category.id.clone()),
                    category_name: Some(category.name.clone()),
                    category_display_name: Some(category.display_name.clone()),
                    category_color: category.color.clone(),
                })
            })
            .collect()
    }

    /// Derive the flattened view the NLP layer consumes.
    pub fn entity_context(&self) -> EntityContext {
        EntityContext {
            tags: self.flatten_tags(),
            team_members: self.team_members.clone(),
            collections: self.collections.clone(),
        }
    }
}

impl FuzzyFields for Tag {
    fn fuzzy_fields(&self) -> Vec<(&'static str, Option<&str>)> {
        vec![
            ("name", Some(self.name.as_str())),
            ("display_name", Some(self.display_name.as_str())),
            ("category_name", self.category_name.as_deref()),
            ("category_display_name", self.category_display_name.as_deref()),
        ]
    }
}

impl FuzzyFields for Collection {
    fn fuzzy_fields(&self) -> Vec<(&'static str, Option<&str>)> {
        vec![
            ("name", Some(self.name.as_str())),
            ("display_name", self.display_name.as_deref()),
        ]
    }
}
