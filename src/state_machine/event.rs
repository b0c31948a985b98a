//! Events that can occur in a conversation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

const TELL_ME_MORE: &str = "tell me more";
const PLAY_AGAIN: &str = "play again";

/// Structured input delivered by the voice platform: an intent name plus
/// already-recognized slot values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEvent {
    pub intent_name: String,
    #[serde(default)]
    pub slots: HashMap<String, String>,
}

impl InboundEvent {
    pub fn new(intent_name: impl Into<String>) -> Self {
        Self {
            intent_name: intent_name.into(),
            slots: HashMap::new(),
        }
    }

    pub fn with_slot(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.insert(name.into(), value.into());
        self
    }

    /// Slot value by case-insensitive name; blank values count as missing
    pub fn slot(&self, name: &str) -> Option<&str> {
        self.slots
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
    }
}

/// Scroll direction for paginated menus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Next,
    Previous,
    /// Back to the parent level. Parents are not tracked, so this returns to
    /// the root menu.
    Up,
    /// Leave the menu and go back to the welcome prompt
    Menu,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "next" => Ok(Self::Next),
            "previous" => Ok(Self::Previous),
            "up" => Ok(Self::Up),
            "menu" => Ok(Self::Menu),
            other => Err(format!("unknown direction: {other}")),
        }
    }
}

/// What the user picked after hearing a leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionChoice {
    TellMeMore,
    PlayAgain,
    Other,
}

impl DescriptionChoice {
    pub fn parse(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            TELL_ME_MORE => Self::TellMeMore,
            PLAY_AGAIN => Self::PlayAgain,
            _ => Self::Other,
        }
    }
}

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Session opened without an intent
    Launch,
    StartConfirm,
    StartDecline,
    NumericAnswer { number: String },
    TagAnswer { tag: String },
    Paginate { direction: Direction },
    Help,
    Stop,
    Cancel,
    Repeat,
    StartOver,
    DescriptionChoice { text: String },
    /// Unknown intent, or a known intent missing its slot
    Unrecognized { intent: String },
}

impl Event {
    pub fn name(&self) -> &str {
        match self {
            Event::Launch => "Launch",
            Event::StartConfirm => "StartConfirm",
            Event::StartDecline => "StartDecline",
            Event::NumericAnswer { .. } => "NumericAnswer",
            Event::TagAnswer { .. } => "TagAnswer",
            Event::Paginate { .. } => "Paginate",
            Event::Help => "Help",
            Event::Stop => "Stop",
            Event::Cancel => "Cancel",
            Event::Repeat => "Repeat",
            Event::StartOver => "StartOver",
            Event::DescriptionChoice { .. } => "DescriptionChoice",
            Event::Unrecognized { intent } => intent,
        }
    }
}

impl From<&InboundEvent> for Event {
    fn from(inbound: &InboundEvent) -> Self {
        let unrecognized = || Event::Unrecognized {
            intent: inbound.intent_name.clone(),
        };

        match inbound.intent_name.as_str() {
            "Launch" => Event::Launch,
            "StartConfirm" => Event::StartConfirm,
            "StartDecline" => Event::StartDecline,
            "NumericAnswer" => inbound.slot("number").map_or_else(unrecognized, |number| {
                Event::NumericAnswer {
                    number: number.to_string(),
                }
            }),
            "TagAnswer" => inbound
                .slot("tag")
                .map_or_else(unrecognized, |tag| Event::TagAnswer { tag: tag.to_string() }),
            "Paginate" => inbound
                .slot("direction")
                .and_then(|direction| direction.parse().ok())
                .map_or_else(unrecognized, |direction| Event::Paginate { direction }),
            "Help" => Event::Help,
            "Stop" => Event::Stop,
            "Cancel" => Event::Cancel,
            "Repeat" => Event::Repeat,
            "StartOver" => Event::StartOver,
            "DescriptionChoice" => inbound
                .slot("text")
                .or_else(|| inbound.slot("description"))
                .map_or_else(unrecognized, |text| Event::DescriptionChoice {
                    text: text.to_string(),
                }),
            _ => unrecognized(),
        }
    }
}

impl From<InboundEvent> for Event {
    fn from(inbound: InboundEvent) -> Self {
        Event::from(&inbound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_intents_with_slots() {
        let event = Event::from(InboundEvent::new("NumericAnswer").with_slot("number", "3"));
        assert_eq!(
            event,
            Event::NumericAnswer {
                number: "3".to_string()
            }
        );

        let event = Event::from(InboundEvent::new("TagAnswer").with_slot("Tag", " Pikachū "));
        assert_eq!(
            event,
            Event::TagAnswer {
                tag: "Pikachū".to_string()
            }
        );

        let event = Event::from(InboundEvent::new("Paginate").with_slot("Direction", "Next"));
        assert_eq!(
            event,
            Event::Paginate {
                direction: Direction::Next
            }
        );
    }

    #[test]
    fn test_missing_or_bad_slot_is_unrecognized() {
        assert!(matches!(
            Event::from(InboundEvent::new("NumericAnswer")),
            Event::Unrecognized { .. }
        ));
        assert!(matches!(
            Event::from(InboundEvent::new("TagAnswer").with_slot("tag", "  ")),
            Event::Unrecognized { .. }
        ));
        assert!(matches!(
            Event::from(InboundEvent::new("Paginate").with_slot("direction", "sideways")),
            Event::Unrecognized { .. }
        ));
        assert_eq!(
            Event::from(InboundEvent::new("OrderPizza")).name(),
            "OrderPizza"
        );
    }

    #[test]
    fn test_inbound_wire_format() {
        let inbound: InboundEvent = serde_json::from_str(
            r#"{"intentName":"DescriptionChoice","slots":{"Description":"Tell me more"}}"#,
        )
        .unwrap();
        assert_eq!(
            Event::from(inbound),
            Event::DescriptionChoice {
                text: "Tell me more".to_string()
            }
        );

        let bare: InboundEvent = serde_json::from_str(r#"{"intentName":"Help"}"#).unwrap();
        assert_eq!(Event::from(bare), Event::Help);
    }

    #[test]
    fn test_description_choice_matching() {
        assert_eq!(
            DescriptionChoice::parse(" Tell Me More"),
            DescriptionChoice::TellMeMore
        );
        assert_eq!(
            DescriptionChoice::parse("play again"),
            DescriptionChoice::PlayAgain
        );
        assert_eq!(DescriptionChoice::parse("maybe"), DescriptionChoice::Other);
    }
}
