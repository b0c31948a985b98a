//! Pure state transition function
//!
//! Given the same session, context and event this always produces the same
//! new session and effects. Nothing here performs I/O.

use super::event::DescriptionChoice;
use super::{Card, DialogueContext, Direction, Effect, Event, Phase, Session};
use crate::navigation::page::{advance, retreat};
use crate::navigation::resolver::sticky_mode;
use crate::navigation::{normalize_answer, render, NavigationError, Navigator, SearchMode};
use crate::tree::NodeId;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: Session,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: Session) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Conversation has ended, no further input accepted")]
    SessionEnded,
}

/// Pure transition function
pub fn transition(
    session: &Session,
    ctx: &DialogueContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    let messages = &ctx.messages;

    let result = match (session.phase, event) {
        (Phase::Ended, _) => return Err(TransitionError::SessionEnded),

        // ============================================================
        // Any phase
        // ============================================================
        (_, Event::Stop | Event::Cancel) => end(session, &messages.goodbye),

        (_, Event::Launch) => welcome(ctx),

        (_, Event::Repeat) => stay(session, Effect::ask_again(session.last_prompt.clone())),

        // ============================================================
        // Idle: waiting for the game to start
        // ============================================================
        (Phase::Idle, Event::StartConfirm) => start_game(ctx),

        (Phase::Idle, Event::StartDecline) => end(session, &messages.goodbye),

        (Phase::Idle, Event::Help) => stay(session, Effect::ask_again(messages.help.clone())),

        (Phase::Idle, Event::StartOver) => {
            stay(session, Effect::ask_again(messages.prompt_to_start.clone()))
        }

        // One-shot lookup straight from the launch phrase
        (Phase::Idle, Event::TagAnswer { tag: answer } | Event::NumericAnswer { number: answer })
            if !normalize_answer(&answer).is_empty() =>
        {
            let mut lookup = ctx.new_session();
            lookup.phase = Phase::AwaitingAnswer;
            lookup.search_mode = Some(SearchMode::ByTag);
            process_answer(&lookup, ctx, SearchMode::ByTag, &answer)
        }

        (Phase::Idle, _) => stay(
            session,
            Effect::ask(
                messages.not_understood(&session.last_prompt),
                messages.prompt_to_start.clone(),
            ),
        ),

        // ============================================================
        // AwaitingAnswer: mid-traversal
        // ============================================================
        (Phase::AwaitingAnswer, Event::NumericAnswer { number }) => {
            let mode = session.search_mode.unwrap_or(SearchMode::ByPosition);
            process_answer(session, ctx, mode, &number)
        }

        (Phase::AwaitingAnswer, Event::TagAnswer { tag }) => {
            process_answer(session, ctx, SearchMode::ByTag, &tag)
        }

        (Phase::AwaitingAnswer, Event::Paginate { direction }) => {
            paginate(session, ctx, direction)
        }

        (Phase::AwaitingAnswer, Event::StartOver) => welcome(ctx),

        (Phase::AwaitingAnswer, _) => not_understood(session, ctx),

        // ============================================================
        // Describing: a leaf was reached
        // ============================================================
        (Phase::Describing, Event::DescriptionChoice { text }) => {
            match DescriptionChoice::parse(&text) {
                DescriptionChoice::TellMeMore => describe(session, ctx),
                DescriptionChoice::PlayAgain => welcome(ctx),
                DescriptionChoice::Other => {
                    stay(session, Effect::ask_again(messages.play_again.clone()))
                }
            }
        }

        (Phase::Describing, Event::StartConfirm | Event::StartOver) => welcome(ctx),

        (Phase::Describing, Event::StartDecline) => end(session, &messages.goodbye),

        (Phase::Describing, _) => stay(
            session,
            Effect::ask_again(messages.prompt_to_answer.clone()),
        ),
    };

    Ok(result)
}

// ============================================================
// Helpers
// ============================================================

/// Same session, one spoken effect
fn stay(session: &Session, effect: Effect) -> TransitionResult {
    TransitionResult::new(session.clone()).with_effect(effect)
}

fn end(session: &Session, goodbye: &str) -> TransitionResult {
    let mut ended = session.clone();
    ended.phase = Phase::Ended;
    TransitionResult::new(ended)
        .with_effect(Effect::PersistSession)
        .with_effect(Effect::tell(goodbye))
}

/// Fresh idle session and the welcome question
fn welcome(ctx: &DialogueContext) -> TransitionResult {
    TransitionResult::new(ctx.new_session())
        .with_effect(Effect::PersistSession)
        .with_effect(Effect::ask(
            ctx.messages.welcome.clone(),
            ctx.messages.repeat_welcome.clone(),
        ))
}

/// Reset to the root and ask its question
fn start_game(ctx: &DialogueContext) -> TransitionResult {
    let session = ctx.new_session();
    let root = session.current_node.clone();
    arrive(session, ctx, root, 0)
}

/// Clarifying prefix plus the last question; nothing else changes
fn not_understood(session: &Session, ctx: &DialogueContext) -> TransitionResult {
    stay(
        session,
        Effect::ask(
            ctx.messages.not_understood(&session.last_prompt),
            ctx.messages.prompt_to_answer.clone(),
        ),
    )
}

/// Data error: end the conversation with the fixed error message
fn fatal(session: &Session, ctx: &DialogueContext, error: &NavigationError) -> TransitionResult {
    let mut ended = session.clone();
    ended.phase = Phase::Ended;
    TransitionResult::new(ended)
        .with_effect(Effect::Fault {
            reason: error.to_string(),
        })
        .with_effect(Effect::PersistSession)
        .with_effect(Effect::tell(ctx.messages.node_not_found.clone()))
}

fn process_answer(
    session: &Session,
    ctx: &DialogueContext,
    mode: SearchMode,
    answer: &str,
) -> TransitionResult {
    let navigator = Navigator::new(&ctx.store);
    match navigator.resolve(&session.current_node, mode, &session.page, answer) {
        Ok(resolution) => {
            let mut next = session.clone();
            if let Some(sticky) = resolution.sticky_mode {
                next.search_mode = Some(sticky);
            }
            arrive(next, ctx, resolution.next, 0)
        }
        Err(error) if error.is_recoverable() => not_understood(session, ctx),
        Err(error) => fatal(session, ctx, &error),
    }
}

/// Position the session on `node_id`, render its page from `cursor` and ask
/// its question. Leaves switch to `Describing`.
fn arrive(
    mut session: Session,
    ctx: &DialogueContext,
    node_id: NodeId,
    cursor: usize,
) -> TransitionResult {
    let Some(node) = ctx.store.find(node_id.as_str()) else {
        return fatal(&session, ctx, &NavigationError::NodeNotFound(node_id));
    };

    if let Some(sticky) = sticky_mode(node) {
        session.search_mode = Some(sticky);
    }

    let rendered = render(node, cursor, ctx.page_size);
    let (cursor, page) = rendered
        .page
        .map(|page| (page.cursor, page.child_ids()))
        .unwrap_or_default();

    let prompt = if ctx.store.is_leaf(node_id.as_str()) {
        session.phase = Phase::Describing;
        ctx.messages.leaf_reached(&rendered.text)
    } else {
        session.phase = Phase::AwaitingAnswer;
        rendered.text
    };

    session.current_node = node_id;
    session.cursor = cursor;
    session.page = page;
    session.last_prompt.clone_from(&prompt);

    TransitionResult::new(session)
        .with_effect(Effect::PersistSession)
        .with_effect(Effect::ask_again(prompt))
}

fn paginate(session: &Session, ctx: &DialogueContext, direction: Direction) -> TransitionResult {
    match direction {
        Direction::Next => arrive(
            session.clone(),
            ctx,
            session.current_node.clone(),
            advance(session.cursor, ctx.page_size),
        ),
        Direction::Previous => arrive(
            session.clone(),
            ctx,
            session.current_node.clone(),
            retreat(session.cursor, ctx.page_size),
        ),
        Direction::Up => arrive(session.clone(), ctx, ctx.store.root().clone(), 0),
        Direction::Menu => welcome(ctx),
    }
}

/// Leaf description with its display card; the session does not move
fn describe(session: &Session, ctx: &DialogueContext) -> TransitionResult {
    let node = &session.current_node;
    let description = ctx
        .store
        .find(node.as_str())
        .and_then(|n| n.description.clone())
        .unwrap_or_else(|| ctx.messages.missing_description(node.as_str()));
    let prompt = ctx.messages.description(&description);

    TransitionResult::new(session.clone()).with_effect(Effect::AskWithCard {
        reprompt: prompt.clone(),
        prompt,
        card: Card {
            title: node.to_string(),
            content: description,
            image_url: ctx.card_image_url(node),
        },
    })
}
