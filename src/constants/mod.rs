pub mod messages;
pub mod prompts;

pub use prompts::{QUIZ_GENERATOR_TEMPLATE, TOPIC_SUMMARISER_TEMPLATE};
