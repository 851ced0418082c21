/// Fixed framing for one kind of completion call: who the assistant is, how the
/// user content is introduced, how long the answer may be and how failures are
/// worded for the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompletionTemplate {
    pub name: &'static str,
    pub system_role: &'static str,
    pub prompt_prefix: &'static str,
    pub max_tokens: u32,
    pub failure_prefix: &'static str,
}

impl CompletionTemplate {
    pub fn render_prompt(&self, content: &str) -> String {
        format!("{}{}", self.prompt_prefix, content)
    }

    pub fn render_failure(&self, message: &str) -> String {
        format!("{}{}", self.failure_prefix, message)
    }

    pub fn request(&self, content: &str) -> CompletionRequest {
        CompletionRequest {
            system_role: self.system_role.to_string(),
            user_prompt: self.render_prompt(content),
            max_tokens: self.max_tokens,
        }
    }
}

/// A single system + user message pair sent to the completion service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system_role: String,
    pub user_prompt: String,
    pub max_tokens: u32,
}
