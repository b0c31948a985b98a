//! Fixed dialogue texts

/// Everything the agent says that does not come from the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    pub welcome: String,
    /// Reprompt when the welcome is not answered
    pub repeat_welcome: String,
    pub prompt_to_start: String,
    /// Prefix for re-prompting after input that was not understood
    pub prompt_to_answer: String,
    pub play_again: String,
    pub help: String,
    pub goodbye: String,
    pub node_not_found: String,
    pub description_not_found: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            welcome: "Welcome to vox bot, I can give you information about Pokemon GO. Are you ready to play?".to_string(),
            repeat_welcome: "Say yes to start the game or no to quit.".to_string(),
            prompt_to_start: "Say yes to continue, or no to end the game.".to_string(),
            prompt_to_answer: "Please answer to the question. Either a number or maybe a potential tag like name".to_string(),
            play_again: "Say 'tell me more' to hear a short description for this item, or do you want to play again?".to_string(),
            help: "I will ask you some questions that will help identify what is the Pokemon item. You can search either by type, by tag or name. You can also browse node children using next/previous range. Want to start now?".to_string(),
            goodbye: "Ok, see you next time!".to_string(),
            node_not_found: "In nodes array could not find node".to_string(),
            description_not_found: "Could not find description for node".to_string(),
        }
    }
}

impl Messages {
    /// Clarifying re-prompt that repeats the last question
    pub fn not_understood(&self, last_prompt: &str) -> String {
        format!("{}. {}", self.prompt_to_answer, last_prompt)
    }

    /// Leaf prompt followed by the "tell me more / play again" question
    pub fn leaf_reached(&self, leaf_prompt: &str) -> String {
        format!("{leaf_prompt} ,{}", self.play_again)
    }

    /// Description followed by the restart question
    pub fn description(&self, description: &str) -> String {
        format!("{description}, {}", self.repeat_welcome)
    }

    pub fn missing_description(&self, node: &str) -> String {
        format!("{} {node}", self.description_not_found)
    }
}
