use crate::models::domain::completion::CompletionTemplate;

pub const QUIZ_GENERATOR_TEMPLATE: CompletionTemplate = CompletionTemplate {
    name: "quiz_generation",
    system_role: "You are a helpful assistant that generates quizzes.",
    prompt_prefix: "Generate a multiple-choice quiz with answers based on the following content:\n",
    max_tokens: 500,
    failure_prefix: "An error occurred while generating the quiz: ",
};

pub const TOPIC_SUMMARISER_TEMPLATE: CompletionTemplate = CompletionTemplate {
    name: "topic_summary",
    system_role: "You are a helpful assistant that summarizes topics.",
    prompt_prefix: "Summarize the key points about the following topic:\n",
    max_tokens: 300,
    failure_prefix: "An error occurred while summarizing the topic: ",
};
