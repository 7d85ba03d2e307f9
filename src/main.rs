use log::{error, info};
use quickpoll::config::Config;
use quickpoll::discovery::{FeedQuery, FeedTab};
use quickpoll::seed;
use quickpoll::service::PollService;
use quickpoll::store::MemoryStore;
use std::sync::Arc;

async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;
    let service = PollService::new(Arc::new(MemoryStore::new()), config.clone());

    if let Some(path) = &config.seed_path {
        let seeds = seed::load(path)?;
        seed::apply(&service, seeds).await;
    } else {
        info!("QUICKPOLL_SEED not set, starting with an empty store");
    }

    let mut feeds = serde_json::Map::new();
    for (name, tab) in [
        ("trending", FeedTab::Trending),
        ("recent", FeedTab::Recent),
        ("popular", FeedTab::MostVoted),
    ] {
        let query = FeedQuery {
            tab,
            ..Default::default()
        };
        let cards = service.discover(&query, None).await?;
        feeds.insert(name.to_string(), serde_json::to_value(cards)?);
    }

    println!("{}", serde_json::to_string_pretty(&serde_json::Value::Object(feeds))?);
    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    if let Err(e) = run().await {
        error!("quickpoll failed: {}", e);
        std::process::exit(1);
    }
}
