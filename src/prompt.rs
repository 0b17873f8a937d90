//! System prompt assembly for the sommelier persona.

use crate::{
    experiences::has_experiences,
    history::ChatHistory,
    types::ChatMessage,
};

/// Fixed persona and style rules placed at the top of every system prompt.
pub const PERSONA: &str = "You're Kristene, the AI Sommelier from Free the Cork.\n\
You offer personalized wine advice, pairings, tasting notes, and menu details.\n\
Keep answers short, warm and conversational, as if speaking to a guest at the bar.\n\
Do not use numbered lists or bullet points; answer in flowing sentences.\n\
Only recommend wines and dishes that appear on the menu below. \
If something is not on the menu, say so and suggest the closest option.";

/// Fully assembled prompt for one chat request.
#[derive(Debug, Clone)]
pub struct SystemPrompt {
    pub persona: String,
    pub menu: String,
    pub experiences: String,
    pub conversation: String,
}

impl SystemPrompt {
    /// Assemble the prompt from the menu, scraped experiences and recent turns.
    pub fn new(menu: &str, experiences: &str, history: &ChatHistory) -> Self {
        let experiences = if has_experiences(experiences) {
            experiences.trim().to_string()
        } else {
            String::new()
        };

        let conversation = history
            .recent()
            .map(|turn| format!("User: {}\nKristene: {}", turn.user, turn.reply))
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            persona: PERSONA.to_string(),
            menu: menu.trim().to_string(),
            experiences,
            conversation,
        }
    }

    /// Render the system prompt text.
    ///
    /// Blocks are appended after the persona so the model reads the
    /// behavioural rules first. Empty blocks are omitted.
    pub fn render(&self) -> String {
        let mut out = self.persona.clone();

        out.push_str(&format!("\n\nMenu Info:\n{}", self.menu));

        if !self.experiences.is_empty() {
            out.push_str(&format!("\n\nUpcoming Experiences:\n{}", self.experiences));
        }

        if !self.conversation.is_empty() {
            out.push_str(&format!("\n\nRecent Conversation:\n{}", self.conversation));
        }

        out
    }

    /// Messages for the chat-completion API: the system prompt then the guest's text.
    pub fn messages(&self, user_text: &str) -> Vec<ChatMessage> {
        vec![ChatMessage::system(self.render()), ChatMessage::user(user_text)]
    }
}

/// Convenience wrapper around [`SystemPrompt::new`] + [`SystemPrompt::render`].
pub fn build_system_prompt(menu: &str, experiences: &str, history: &ChatHistory) -> String {
    SystemPrompt::new(menu, experiences, history).render()
}
