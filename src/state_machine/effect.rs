//! Effects produced by state transitions

use serde::{Deserialize, Serialize};

/// Display card attached to leaf descriptions. Opaque to the dialogue core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Persist the new session state
    PersistSession,

    /// Speak and wait for the next answer
    Ask { prompt: String, reprompt: String },

    /// Speak, show a card, and wait for the next answer
    AskWithCard {
        prompt: String,
        reprompt: String,
        card: Card,
    },

    /// Speak and end the conversation
    Tell { prompt: String },

    /// A data error ended the conversation
    Fault { reason: String },
}

impl Effect {
    pub fn ask(prompt: impl Into<String>, reprompt: impl Into<String>) -> Self {
        Effect::Ask {
            prompt: prompt.into(),
            reprompt: reprompt.into(),
        }
    }

    /// Ask, repeating the same text as reprompt
    pub fn ask_again(prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        Effect::Ask {
            reprompt: prompt.clone(),
            prompt,
        }
    }

    pub fn tell(prompt: impl Into<String>) -> Self {
        Effect::Tell {
            prompt: prompt.into(),
        }
    }

    /// Whether this effect speaks to the user
    pub fn is_speech(&self) -> bool {
        matches!(
            self,
            Effect::Ask { .. } | Effect::AskWithCard { .. } | Effect::Tell { .. }
        )
    }
}
