//! Token sequences → executable commands.
//!
//! Compilation is per-verb dispatch over the closed [`Verb`] enum, so adding
//! a verb without a compiler is a compile error. Chains split at the first
//! chainer token and compile each side independently; one failed segment
//! fails the whole chain. Failure is `None`, not an error: an incomplete
//! command is a normal palette state, not a fault.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::ContextData;
use crate::grammar::token::{Token, TokenType, ValueMeta};
use crate::grammar::Verb;
use crate::suggest::command_preview;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Select,
    Filter,
    Tag,
    Untag,
    Delete,
    Group,
    Clear,
    Assign,
    /// Two or more commands joined by "and"/"then".
    Chain,
}

/// One concrete operation for the host application to execute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CommandAction {
    SelectAll,
    SelectUntagged,
    FilterByTag {
        tag_id: String,
        tag_name: String,
        tag_display_name: String,
        category_display_name: Option<String>,
    },
    /// Filter by team assignment; member fields are `None` when the filter
    /// targets the whole team dimension rather than one person.
    FilterByTeam {
        member_id: Option<String>,
        member_name: Option<String>,
    },
    Tag {
        tag_id: String,
        tag_name: String,
        tag_display_name: String,
        /// Apply to the current selection rather than the visible set.
        target_selection: bool,
    },
    Untag {
        tag_id: String,
        tag_display_name: String,
    },
    Delete {
        confirmation_required: bool,
    },
    Group {
        category_name: String,
        category_display_name: String,
    },
    ClearSelection,
    ClearFilters,
    AssignTeam {
        member_id: String,
        member_name: String,
    },
}

/// A fully resolved command ready for execution and preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledCommand {
    pub kind: CommandKind,
    pub description: String,
    pub actions: Vec<CommandAction>,
    pub preview: String,
}

/// Compile a token sequence. Returns `None` when the tokens do not form an
/// executable command; a returned command always has at least one action.
pub fn compile_command(tokens: &[Token], ctx: &ContextData) -> Option<CompiledCommand> {
    if tokens.is_empty() {
        return None;
    }

    // Split at the first chainer; the tail may chain further.
    if let Some(split) = tokens.iter().position(|t| t.kind == TokenType::Chainer) {
        let head = compile_segment(&tokens[..split], ctx)?;
        let tail = compile_command(&tokens[split + 1..], ctx)?;
        let mut actions = head.actions;
        actions.extend(tail.actions);
        return Some(CompiledCommand {
            kind: CommandKind::Chain,
            description: format!("{}, then {}", head.description, tail.description),
            actions,
            preview: format!("{} → {}", head.preview, tail.preview),
        });
    }

    compile_segment(tokens, ctx)
}

fn compile_segment(tokens: &[Token], ctx: &ContextData) -> Option<CompiledCommand> {
    let first = tokens.first()?;
    if first.kind != TokenType::Verb {
        return None;
    }
    let verb = Verb::from_word(&first.value)?;

    let compiled = match verb {
        Verb::Select => compile_select(tokens),
        Verb::Filter => compile_filter(tokens),
        Verb::Tag => compile_tag(tokens, ctx),
        Verb::Untag => compile_untag(tokens, ctx),
        Verb::Delete => Some(compile_delete(tokens, ctx)),
        Verb::Group => compile_group(tokens),
        Verb::Clear => compile_clear(tokens),
        Verb::Assign => compile_assign(tokens),
    };

    debug!(verb = first.value, ok = compiled.is_some(), "compiled segment");

    compiled.map(|(kind, description, action)| CompiledCommand {
        kind,
        description,
        actions: vec![action],
        preview: command_preview(tokens),
    })
}

type Segment = (CommandKind, String, CommandAction);

fn compile_select(tokens: &[Token]) -> Option<Segment> {
    let object = tokens
        .iter()
        .find(|t| t.kind == TokenType::Object)
        .map(|t| t.value.as_str())?;
    match object {
        "all" => Some((
            CommandKind::Select,
            "Select all assets".to_string(),
            CommandAction::SelectAll,
        )),
        "untagged" => Some((
            CommandKind::Select,
            "Select untagged assets".to_string(),
            CommandAction::SelectUntagged,
        )),
        _ => None,
    }
}

fn compile_filter(tokens: &[Token]) -> Option<Segment> {
    let meta = value_meta(tokens)?;
    match meta {
        ValueMeta::Tag {
            tag_id,
            tag_name,
            tag_display_name,
            category_display_name,
            ..
        } => {
            let description = match &category_display_name {
                Some(category) => format!("Filter by {category} › {tag_display_name}"),
                None => format!("Filter by {tag_display_name}"),
            };
            Some((
                CommandKind::Filter,
                description,
                CommandAction::FilterByTag {
                    tag_id: tag_id.clone(),
                    tag_name: tag_name.clone(),
                    tag_display_name: tag_display_name.clone(),
                    category_display_name: category_display_name.clone(),
                },
            ))
        }
        ValueMeta::Category { name, .. } if name == "team" => Some((
            CommandKind::Filter,
            "Filter by team assignment".to_string(),
            CommandAction::FilterByTeam {
                member_id: None,
                member_name: None,
            },
        )),
        ValueMeta::TeamMember { id, name, .. } => Some((
            CommandKind::Filter,
            format!("Filter by assets assigned to {name}"),
            CommandAction::FilterByTeam {
                member_id: Some(id.clone()),
                member_name: Some(name.clone()),
            },
        )),
        _ => None,
    }
}

fn compile_tag(tokens: &[Token], ctx: &ContextData) -> Option<Segment> {
    // The tag must come through the "as" modifier.
    let as_index = tokens
        .iter()
        .position(|t| t.kind == TokenType::Modifier && t.value == "as")?;
    let value = tokens.get(as_index + 1)?;
    let Some(ValueMeta::Tag {
        tag_id,
        tag_name,
        tag_display_name,
        ..
    }) = &value.meta
    else {
        return None;
    };

    let target_selection = tokens
        .iter()
        .any(|t| t.kind == TokenType::Object && t.value == "selected")
        || ctx.has_selection;
    let target = if target_selection {
        "selected assets"
    } else {
        "assets"
    };

    Some((
        CommandKind::Tag,
        format!("Tag {target} as {tag_display_name}"),
        CommandAction::Tag {
            tag_id: tag_id.clone(),
            tag_name: tag_name.clone(),
            tag_display_name: tag_display_name.clone(),
            target_selection,
        },
    ))
}

fn compile_untag(tokens: &[Token], ctx: &ContextData) -> Option<Segment> {
    // "untag bridal": the tag word follows the verb directly, so it reaches
    // us unresolved and is looked up here.
    let word = tokens.get(1)?;
    let tag = match &word.meta {
        Some(ValueMeta::Tag {
            tag_id,
            tag_display_name,
            ..
        }) => Some((tag_id.clone(), tag_display_name.clone())),
        _ => {
            let w = word.value.to_lowercase();
            ctx.flatten_tags()
                .into_iter()
                .find(|t| t.name.to_lowercase() == w || t.display_name.to_lowercase() == w)
                .map(|t| (t.id, t.display_name))
        }
    };
    let (tag_id, tag_display_name) = tag?;

    Some((
        CommandKind::Untag,
        format!("Remove tag {tag_display_name}"),
        CommandAction::Untag {
            tag_id,
            tag_display_name,
        },
    ))
}

fn compile_delete(tokens: &[Token], ctx: &ContextData) -> Segment {
    // "delete selected" targets the selection even before one exists.
    let target_selection = tokens
        .iter()
        .any(|t| t.kind == TokenType::Object && t.value == "selected")
        || ctx.has_selection;
    let description = if target_selection && ctx.selected_count > 0 {
        let n = ctx.selected_count;
        format!(
            "Delete {n} selected asset{}",
            if n == 1 { "" } else { "s" }
        )
    } else if target_selection {
        "Delete selected assets".to_string()
    } else {
        "Delete assets".to_string()
    };
    (
        CommandKind::Delete,
        description,
        CommandAction::Delete {
            confirmation_required: true,
        },
    )
}

fn compile_group(tokens: &[Token]) -> Option<Segment> {
    let meta = value_meta(tokens)?;
    let ValueMeta::Category {
        name, display_name, ..
    } = meta
    else {
        return None;
    };
    let display = display_name.clone().unwrap_or_else(|| name.clone());

    Some((
        CommandKind::Group,
        format!("Group by {display}"),
        CommandAction::Group {
            category_name: name.clone(),
            category_display_name: display,
        },
    ))
}

fn compile_clear(tokens: &[Token]) -> Option<Segment> {
    let target = tokens.get(1)?;
    match target.value.as_str() {
        "selection" => Some((
            CommandKind::Clear,
            "Clear the selection".to_string(),
            CommandAction::ClearSelection,
        )),
        "filters" => Some((
            CommandKind::Clear,
            "Clear all filters".to_string(),
            CommandAction::ClearFilters,
        )),
        _ => None,
    }
}

fn compile_assign(tokens: &[Token]) -> Option<Segment> {
    let to_index = tokens
        .iter()
        .position(|t| t.kind == TokenType::Modifier && t.value == "to")?;
    let value = tokens.get(to_index + 1)?;
    let Some(ValueMeta::TeamMember { id, name, .. }) = &value.meta else {
        return None;
    };

    Some((
        CommandKind::Assign,
        format!("Assign selected assets to {name}"),
        CommandAction::AssignTeam {
            member_id: id.clone(),
            member_name: name.clone(),
        },
    ))
}

/// First resolved value token's metadata, if any.
fn value_meta(tokens: &[Token]) -> Option<&ValueMeta> {
    tokens
        .iter()
        .find(|t| t.kind == TokenType::Value && t.meta.is_some())
        .and_then(|t| t.meta.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::fixtures::studio_context;
    use crate::grammar::tokenize;

    fn compile(input: &str, ctx: &ContextData) -> Option<CompiledCommand> {
        compile_command(&tokenize(input, ctx), ctx)
    }

    #[test]
    fn select_compiles_for_all_and_untagged_only() {
        let ctx = studio_context();

        let cmd = compile("select all", &ctx).unwrap();
        assert_eq!(cmd.kind, CommandKind::Select);
        assert_eq!(cmd.actions, vec![CommandAction::SelectAll]);

        let cmd = compile("pick untagged", &ctx).unwrap();
        assert_eq!(cmd.actions, vec![CommandAction::SelectUntagged]);
        assert_eq!(cmd.description, "Select untagged assets");

        assert!(compile("select tags", &ctx).is_none());
        assert!(compile("select", &ctx).is_none());
    }

    #[test]
    fn filter_by_tag_renders_the_category_path() {
        let ctx = studio_context();
        let cmd = compile("filter by portrait", &ctx).unwrap();
        assert_eq!(cmd.kind, CommandKind::Filter);
        assert_eq!(cmd.description, "Filter by Style › Portrait");
        assert_eq!(cmd.preview, "Filter by Style › Portrait");
        match &cmd.actions[0] {
            CommandAction::FilterByTag {
                tag_id,
                category_display_name,
                ..
            } => {
                assert_eq!(tag_id, "tag-portrait");
                assert_eq!(category_display_name.as_deref(), Some("Style"));
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn filter_by_team_uses_the_synthetic_grouping() {
        let ctx = studio_context();
        let cmd = compile("filter by team", &ctx).unwrap();
        assert_eq!(
            cmd.actions,
            vec![CommandAction::FilterByTeam {
                member_id: None,
                member_name: None
            }]
        );

        let cmd = compile("filter by alice", &ctx).unwrap();
        match &cmd.actions[0] {
            CommandAction::FilterByTeam { member_id, .. } => {
                assert_eq!(member_id.as_deref(), Some("tm-alice"));
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn tag_targets_the_selection_when_named_or_active() {
        let ctx = studio_context();

        let cmd = compile("tag selected as bridal", &ctx).unwrap();
        assert_eq!(cmd.description, "Tag selected assets as Bridal");
        match &cmd.actions[0] {
            CommandAction::Tag {
                tag_id,
                target_selection,
                ..
            } => {
                assert_eq!(tag_id, "tag-bridal");
                assert!(target_selection);
            }
            other => panic!("unexpected action {other:?}"),
        }

        // No "selected" token and no live selection.
        let cmd = compile("tag as sunset", &ctx).unwrap();
        match &cmd.actions[0] {
            CommandAction::Tag {
                target_selection, ..
            } => assert!(!target_selection),
            other => panic!("unexpected action {other:?}"),
        }

        // A live selection flips the target even without the word.
        let mut selected = studio_context();
        selected.has_selection = true;
        let cmd = compile("tag as sunset", &selected).unwrap();
        match &cmd.actions[0] {
            CommandAction::Tag {
                target_selection, ..
            } => assert!(target_selection),
            other => panic!("unexpected action {other:?}"),
        }

        // Unresolvable tag fails compilation.
        assert!(compile("tag selected as dusk", &ctx).is_none());
    }

    #[test]
    fn untag_resolves_the_bare_tag_word() {
        let ctx = studio_context();
        let cmd = compile("untag bridal", &ctx).unwrap();
        assert_eq!(
            cmd.actions,
            vec![CommandAction::Untag {
                tag_id: "tag-bridal".to_string(),
                tag_display_name: "Bridal".to_string()
            }]
        );
        assert!(compile("untag dusk", &ctx).is_none());
    }

    #[test]
    fn delete_always_compiles_and_counts_the_selection() {
        let mut ctx = studio_context();
        let cmd = compile("delete", &ctx).unwrap();
        assert_eq!(cmd.description, "Delete assets");
        assert_eq!(
            cmd.actions,
            vec![CommandAction::Delete {
                confirmation_required: true
            }]
        );

        // The "selected" object targets the selection without a live one.
        let cmd = compile("delete selected", &ctx).unwrap();
        assert_eq!(cmd.description, "Delete selected assets");

        ctx.has_selection = true;
        ctx.selected_count = 1;
        assert_eq!(
            compile("delete", &ctx).unwrap().description,
            "Delete 1 selected asset"
        );

        ctx.selected_count = 7;
        assert_eq!(
            compile("delete", &ctx).unwrap().description,
            "Delete 7 selected assets"
        );
    }

    #[test]
    fn group_requires_a_category() {
        let ctx = studio_context();
        let cmd = compile("group by mood", &ctx).unwrap();
        assert_eq!(
            cmd.actions,
            vec![CommandAction::Group {
                category_name: "mood".to_string(),
                category_display_name: "Mood".to_string()
            }]
        );

        let cmd = compile("group by team", &ctx).unwrap();
        assert_eq!(cmd.description, "Group by Team");

        assert!(compile("group by dusk", &ctx).is_none());
    }

    #[test]
    fn clear_reaches_its_own_compiler() {
        let ctx = studio_context();
        // "clear" is also an alias of untag; canonical lookup keeps this
        // verb reachable.
        let cmd = compile("clear selection", &ctx).unwrap();
        assert_eq!(cmd.kind, CommandKind::Clear);
        assert_eq!(cmd.actions, vec![CommandAction::ClearSelection]);

        let cmd = compile("clear filters", &ctx).unwrap();
        assert_eq!(cmd.actions, vec![CommandAction::ClearFilters]);

        assert!(compile("clear tags", &ctx).is_none());
        assert!(compile("clear", &ctx).is_none());
    }

    #[test]
    fn assign_needs_a_resolved_member() {
        let ctx = studio_context();
        let cmd = compile("assign to bob", &ctx).unwrap();
        assert_eq!(
            cmd.actions,
            vec![CommandAction::AssignTeam {
                member_id: "tm-bob".to_string(),
                member_name: "Bob Jones".to_string()
            }]
        );
        assert!(compile("assign to nobody", &ctx).is_none());
        assert!(compile("assign", &ctx).is_none());
    }

    #[test]
    fn chains_concatenate_actions_and_previews() {
        let ctx = studio_context();
        let cmd = compile("select untagged and tag as bridal", &ctx).unwrap();
        assert_eq!(cmd.kind, CommandKind::Chain);
        assert_eq!(cmd.actions.len(), 2);
        assert_eq!(cmd.actions[0], CommandAction::SelectUntagged);
        assert!(matches!(cmd.actions[1], CommandAction::Tag { .. }));
        assert_eq!(
            cmd.description,
            "Select untagged assets, then Tag assets as Bridal"
        );
        assert!(cmd.preview.contains(" → "));

        // Three segments chain recursively.
        let cmd = compile("select all then filter by sunset and group by mood", &ctx).unwrap();
        assert_eq!(cmd.actions.len(), 3);

        // One broken segment fails the whole chain.
        assert!(compile("select untagged and tag as dusk", &ctx).is_none());
    }

    #[test]
    fn compiled_commands_round_trip_through_json() {
        let ctx = studio_context();
        let cmd = compile("filter by portrait and assign to alice", &ctx).unwrap();
        let json = serde_json::to_string(&cmd).unwrap();
        let back: CompiledCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }
}
