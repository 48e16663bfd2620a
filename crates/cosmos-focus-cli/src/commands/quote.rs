use cosmos_focus_core::quote::{GeminiQuoteSource, QuotePanel};
use cosmos_focus_core::Config;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let source = GeminiQuoteSource::from_config(&config.quote)?;
    let panel = QuotePanel::mount(source, config.quote.temperature).await;
    println!("{}", panel.quote());
    Ok(())
}
