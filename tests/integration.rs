//! End-to-end scenarios across both interpretation paths.

use chrono::{NaiveDate, NaiveDateTime};

use damlex::compile::CommandAction;
use damlex::grammar::TokenType;
use damlex::nlp::{Intent, validate_command};
use damlex::{
    Collection, CommandKind, ContextData, TagCategory, TagDef, TeamMember, compile_command,
    generate_suggestions, is_command_complete, parse_natural_language_query_at, tokenize,
    validate_command_sequence,
};

fn studio() -> ContextData {
    ContextData {
        tag_categories: vec![
            TagCategory {
                id: "cat-style".to_string(),
                name: "style".to_string(),
                display_name: "Style".to_string(),
                color: Some("#A19781".to_string()),
                tags: vec![
                    TagDef {
                        id: "tag-portrait".to_string(),
                        name: "portrait".to_string(),
                        display_name: "Portrait".to_string(),
                    },
                    TagDef {
                        id: "tag-landscape".to_string(),
                        name: "landscape".to_string(),
                        display_name: "Landscape".to_string(),
                    },
                ],
            },
            TagCategory {
                id: "cat-mood".to_string(),
                name: "mood".to_string(),
                display_name: "Mood".to_string(),
                color: Some("#BD8878".to_string()),
                tags: vec![
                    TagDef {
                        id: "tag-bridal".to_string(),
                        name: "bridal".to_string(),
                        display_name: "Bridal".to_string(),
                    },
                    TagDef {
                        id: "tag-sunset".to_string(),
                        name: "sunset".to_string(),
                        display_name: "Sunset".to_string(),
                    },
                ],
            },
        ],
        team_members: vec![
            TeamMember {
                id: "tm-alice".to_string(),
                name: "Alice Smith".to_string(),
                avatar_url: None,
            },
            TeamMember {
                id: "tm-bob".to_string(),
                name: "Bob Jones".to_string(),
                avatar_url: None,
            },
        ],
        collections: vec![Collection {
            id: "col-summer".to_string(),
            name: "summer-2026".to_string(),
            display_name: Some("Summer 2026".to_string()),
        }],
        has_selection: false,
        has_filters: false,
        selected_count: 0,
    }
}

fn reference() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 8, 19)
        .unwrap()
        .and_hms_opt(12, 30, 0)
        .unwrap()
}

#[test]
fn chained_command_compiles_to_two_actions() {
    let ctx = studio();
    let tokens = tokenize("select untagged and tag as bridal", &ctx);
    assert!(validate_command_sequence(&tokens).is_ok());

    let command = compile_command(&tokens, &ctx).expect("chain should compile");
    assert_eq!(command.kind, CommandKind::Chain);
    assert_eq!(command.actions.len(), 2);
    assert_eq!(command.actions[0], CommandAction::SelectUntagged);
    assert!(matches!(
        &command.actions[1],
        CommandAction::Tag { tag_id, .. } if tag_id == "tag-bridal"
    ));
}

#[test]
fn untag_without_a_modifier_is_valid_complete_and_compilable() {
    let ctx = studio();
    let tokens = tokenize("untag bridal", &ctx);
    assert_eq!(tokens[1].kind, TokenType::Value);

    // The validator, completeness check, and compiler must agree.
    assert!(validate_command_sequence(&tokens).is_ok());
    assert!(is_command_complete(&tokens));
    let command = compile_command(&tokens, &ctx).expect("bare untag should compile");
    assert_eq!(command.kind, CommandKind::Untag);
}

#[test]
fn filter_preview_shows_the_category_path() {
    let ctx = studio();
    let tokens = tokenize("filter by portrait", &ctx);
    let command = compile_command(&tokens, &ctx).unwrap();
    assert_eq!(command.preview, "Filter by Style › Portrait");
}

#[test]
fn tag_query_parses_with_full_consumption() {
    let ctx = studio();
    let parsed = parse_natural_language_query_at(
        "tag selected as sunset",
        &ctx.entity_context(),
        reference(),
    );
    assert_eq!(parsed.intent, Intent::Tag);
    assert_eq!(parsed.entities.tags.len(), 1);
    assert_eq!(parsed.entities.tags[0].tag.id, "tag-sunset");
    assert_eq!(parsed.entities.clean_query, "");
    assert!(parsed.overall_confidence > 0.9);
    assert!(validate_command(&parsed).valid);
}

#[test]
fn date_scoped_member_query_resolves_both_entities() {
    let ctx = studio();
    let parsed =
        parse_natural_language_query_at("by alice last week", &ctx.entity_context(), reference());
    assert_eq!(parsed.intent, Intent::AssignTeam);
    assert_eq!(parsed.entities.team_members[0].member.id, "tm-alice");
    let range = parsed.entities.date_range.as_ref().unwrap();
    assert_eq!(range.description, "Last week");
    assert_eq!(range.start.date(), NaiveDate::from_ymd_opt(2026, 8, 9).unwrap());
}

#[test]
fn confidence_is_bounded_for_arbitrary_input() {
    let ctx = studio().entity_context();
    let queries = [
        "",
        "   ",
        "tag",
        "qwertyuiop asdfghjkl",
        "select all and everything always",
        "\"\"\"\"",
        "first 999999 random not without",
        "tag selected as sunset last 3 days by alice",
    ];
    for query in queries {
        let parsed = parse_natural_language_query_at(query, &ctx, reference());
        assert!(
            (0.0..=1.0).contains(&parsed.overall_confidence),
            "{query:?} -> {}",
            parsed.overall_confidence
        );
    }
}

#[test]
fn tokenization_is_idempotent_over_its_own_output() {
    let ctx = studio();
    for input in [
        "select all",
        "filter by portrait",
        "tag selected as bridal and clear filters",
        "assign to alice",
    ] {
        let tokens = tokenize(input, &ctx);
        let rendered: Vec<String> = tokens.iter().map(|t| t.value.clone()).collect();
        let retokenized = tokenize(&rendered.join(" "), &ctx);
        assert_eq!(tokens.len(), retokenized.len(), "{input}");
        for (a, b) in tokens.iter().zip(&retokenized) {
            assert_eq!(a.kind, b.kind, "{input}");
            assert_eq!(a.value, b.value, "{input}");
            assert_eq!(a.meta, b.meta, "{input}");
        }
    }
}

#[test]
fn suggestion_flow_builds_a_full_command() {
    let ctx = studio();

    // Fresh palette: verbs only.
    let verbs = generate_suggestions("", 0, &ctx);
    assert!(verbs.iter().any(|s| s.value == "filter" && s.priority == 100));

    // After the modifier, context values appear and carry metadata.
    let values = generate_suggestions("filter by ", 10, &ctx);
    assert!(values.iter().all(|s| s.kind == TokenType::Value));
    let style = values.iter().find(|s| s.value == "style").unwrap();
    assert!(style.metadata.is_some());

    // Accepting the suggestion yields a compilable command.
    let tokens = tokenize("group by style", &ctx);
    assert!(compile_command(&tokens, &ctx).is_some());
}

#[test]
fn grammar_and_nlp_paths_agree_on_the_same_request() {
    let ctx = studio();

    let tokens = tokenize("tag selected as bridal", &ctx);
    let compiled = compile_command(&tokens, &ctx).unwrap();
    let CommandAction::Tag { tag_id, .. } = &compiled.actions[0] else {
        panic!("expected tag action");
    };

    let parsed = parse_natural_language_query_at(
        "tag selected as bridal",
        &ctx.entity_context(),
        reference(),
    );

    assert_eq!(tag_id, &parsed.entities.tags[0].tag.id);
    assert_eq!(parsed.intent, Intent::Tag);
}
