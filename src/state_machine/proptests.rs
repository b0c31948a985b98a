//! Property-based tests for the dialogue state machine
//!
//! These tests verify key invariants hold across arbitrary event sequences.

use super::*;
use crate::navigation::{render, SearchMode};
use crate::tree::{NextDirective, NodeStore, DEFAULT_ROOT};
use proptest::prelude::*;
use std::sync::{Arc, OnceLock};

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> &'static DialogueContext {
    static CONTEXT: OnceLock<DialogueContext> = OnceLock::new();
    CONTEXT.get_or_init(|| {
        let store = NodeStore::bundled(DEFAULT_ROOT).expect("bundled tree loads");
        DialogueContext::new(Arc::new(store))
    })
}

/// Ids of nodes whose answers are positional, so numeric input picks a child
fn positional_nodes() -> Vec<String> {
    test_context()
        .store
        .iter()
        .filter(|node| node.is_decision() && node.next == NextDirective::ResolveByPosition)
        .map(|node| node.id.to_string())
        .collect()
}

fn known_names() -> Vec<String> {
    test_context()
        .store
        .iter()
        .map(|node| node.id.to_string())
        .collect()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        4 => Just(Direction::Next),
        3 => Just(Direction::Previous),
        1 => Just(Direction::Up),
        1 => Just(Direction::Menu),
    ]
}

fn arb_tag_answer() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => prop::sample::select(known_names()),
        1 => "[a-zA-Z ]{0,8}",
        1 => "[0-9]{1,3}",
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        1 => Just(Event::Launch),
        3 => Just(Event::StartConfirm),
        1 => Just(Event::StartDecline),
        6 => "[1-6]".prop_map(|number| Event::NumericAnswer { number }),
        1 => "[a-z]{1,4}".prop_map(|number| Event::NumericAnswer { number }),
        3 => arb_tag_answer().prop_map(|tag| Event::TagAnswer { tag }),
        4 => arb_direction().prop_map(|direction| Event::Paginate { direction }),
        1 => Just(Event::Help),
        1 => Just(Event::Stop),
        1 => Just(Event::Cancel),
        1 => Just(Event::Repeat),
        1 => Just(Event::StartOver),
        2 => prop_oneof![
            Just("tell me more".to_string()),
            Just("play again".to_string()),
            "[a-z ]{0,10}",
        ]
        .prop_map(|text| Event::DescriptionChoice { text }),
        1 => "[A-Z][a-z]{3,10}".prop_map(|intent| Event::Unrecognized { intent }),
    ]
}

/// A session mid-traversal on a positional menu, with its page rendered
fn arb_positional_session() -> impl Strategy<Value = Session> {
    (prop::sample::select(positional_nodes()), 0usize..40).prop_map(|(id, cursor)| {
        let ctx = test_context();
        let node = ctx.store.find(&id).expect("selected from store");
        let rendered = render(node, cursor, ctx.page_size);
        let page = rendered.page.expect("decision nodes have a page");
        Session {
            phase: Phase::AwaitingAnswer,
            current_node: node.id.clone(),
            search_mode: None,
            cursor: page.cursor,
            page: page.child_ids(),
            last_prompt: rendered.text,
        }
    })
}

fn arb_live_session() -> impl Strategy<Value = Session> {
    proptest::collection::vec(arb_event(), 0..12).prop_map(|events| {
        let ctx = test_context();
        let mut session = ctx.new_session();
        for event in events {
            match transition(&session, ctx, event) {
                Ok(result) if !result.new_state.phase.is_terminal() => {
                    session = result.new_state;
                }
                _ => break,
            }
        }
        session
    })
}

// ============================================================================
// Invariant Checkers
// ============================================================================

fn is_valid_session(session: &Session, ctx: &DialogueContext) -> bool {
    let Some(node) = ctx.store.find(session.current_node.as_str()) else {
        return false;
    };

    if session.page.len() > ctx.page_size || session.cursor % ctx.page_size != 0 {
        return false;
    }
    if session.cursor > node.children.len() {
        return false;
    }
    if session.last_prompt.is_empty() {
        return false;
    }

    match session.phase {
        Phase::AwaitingAnswer => session
            .page
            .iter()
            .all(|child| node.children.contains(child)),
        Phase::Describing => ctx.store.is_leaf(session.current_node.as_str()),
        Phase::Idle | Phase::Ended => true,
    }
}

fn speech_count(effects: &[Effect]) -> usize {
    effects.iter().filter(|e| e.is_speech()).count()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: Valid session after any transition
    #[test]
    fn prop_transitions_preserve_validity(events in proptest::collection::vec(arb_event(), 0..25)) {
        let ctx = test_context();
        let mut session = ctx.new_session();

        for event in events {
            match transition(&session, ctx, event) {
                Ok(result) => {
                    session = result.new_state;
                    prop_assert!(is_valid_session(&session, ctx), "Invalid session: {:?}", session);
                }
                Err(TransitionError::SessionEnded) => {
                    prop_assert!(session.phase.is_terminal());
                }
            }
        }
    }

    // Invariant 2: Every accepted event says exactly one thing
    #[test]
    fn prop_exactly_one_utterance(session in arb_live_session(), event in arb_event()) {
        let result = transition(&session, test_context(), event).unwrap();
        prop_assert_eq!(speech_count(&result.effects), 1, "effects: {:?}", result.effects);
    }

    // Invariant 3: An ended conversation rejects everything
    #[test]
    fn prop_ended_rejects_all_events(session in arb_live_session(), event in arb_event()) {
        let mut ended = session;
        ended.phase = Phase::Ended;
        let result = transition(&ended, test_context(), event);
        prop_assert_eq!(result.unwrap_err(), TransitionError::SessionEnded);
    }

    // Invariant 4: Input the dialogue cannot interpret never moves the session
    #[test]
    fn prop_unrecognized_changes_nothing(
        session in arb_live_session(),
        intent in "[A-Z][a-z]{3,10}"
    ) {
        let result = transition(&session, test_context(), Event::Unrecognized { intent }).unwrap();
        prop_assert_eq!(&result.new_state, &session);
        prop_assert!(!result.effects.contains(&Effect::PersistSession));
    }

    // Invariant 5: Position k on the visible page resolves to its k-th entry
    #[test]
    fn prop_numeric_answer_picks_page_entry(
        session in arb_positional_session(),
        pick in any::<prop::sample::Index>()
    ) {
        prop_assume!(!session.page.is_empty());
        let pick = pick.index(session.page.len());
        let expected = session.page[pick].clone();

        let event = Event::NumericAnswer { number: (pick + 1).to_string() };
        let result = transition(&session, test_context(), event).unwrap();
        prop_assert_eq!(&result.new_state.current_node, &expected);
        prop_assert_eq!(result.new_state.cursor, 0);
    }

    // Invariant 6: Positions past the visible page end the conversation
    #[test]
    fn prop_numeric_answer_past_page_is_fatal(
        session in arb_positional_session(),
        extra in 1usize..10
    ) {
        let event = Event::NumericAnswer { number: (session.page.len() + extra).to_string() };
        let result = transition(&session, test_context(), event).unwrap();
        prop_assert!(result.new_state.phase.is_terminal());
        let faulted = result.effects.iter().any(|e| matches!(e, Effect::Fault { .. }));
        prop_assert!(faulted);
    }

    // Invariant 7: Next then Previous returns to the same window
    #[test]
    fn prop_next_then_previous_round_trips(session in arb_positional_session()) {
        let ctx = test_context();
        let next = Event::Paginate { direction: Direction::Next };
        let previous = Event::Paginate { direction: Direction::Previous };

        let forward = transition(&session, ctx, next).unwrap().new_state;
        if forward.cursor > session.cursor {
            let back = transition(&forward, ctx, previous).unwrap().new_state;
            prop_assert_eq!(back.cursor, session.cursor);
            prop_assert_eq!(&back.page, &session.page);
        } else {
            // past the last page the window wraps to the start
            prop_assert_eq!(forward.cursor, 0);
        }
    }

    // Invariant 8: Tag mode is sticky for the rest of the traversal
    #[test]
    fn prop_tag_mode_is_sticky(session in arb_live_session(), event in arb_event()) {
        let was_tag = session.search_mode == Some(SearchMode::ByTag);
        let result = transition(&session, test_context(), event).unwrap();
        if was_tag && matches!(result.new_state.phase, Phase::AwaitingAnswer | Phase::Describing) {
            prop_assert_eq!(result.new_state.search_mode, Some(SearchMode::ByTag));
        }
    }

    // Invariant 9: Sessions survive the attribute map unchanged
    #[test]
    fn prop_attributes_preserve_session(session in arb_live_session()) {
        let attributes = session.to_attributes().unwrap();
        prop_assert_eq!(Session::from_attributes(&attributes).unwrap(), session);
    }
}
