pub mod telegram_handler;

pub use telegram_handler::{run, TelegramDocument, TelegramOutbound};
