use quizbot::{app_state::AppState, config::Config, handlers};
use secrecy::ExposeSecret;
use teloxide::Bot;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    log::info!("Using completion model {}", config.openai_model);
    let bot = Bot::new(config.telegram_bot_token.expose_secret());
    let state = AppState::new(&config);

    log::info!("Bot is running...");
    handlers::run(bot, state).await;
}
