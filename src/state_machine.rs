//! Dialogue state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! the runtime feeds events in and interprets the effects that come out.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Card, Effect};
pub use event::{DescriptionChoice, Direction, Event, InboundEvent};
pub use state::{Attributes, DialogueContext, Phase, Session};
pub use transition::{transition, TransitionError, TransitionResult};
