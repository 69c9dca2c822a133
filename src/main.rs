use std::env;
use std::fs;
use std::path::Path;

use veer::{
    logger::{self, LoggerConfig},
    ClothingState, ClothingType, FitStyle, GeminiConfig, GenerationRequest, StyleOptions,
    TryOnClient,
};

const USAGE: &str =
    "usage: veer <person-image> <clothing-image> [clothing-type] [fit-style] [open|closed] [output]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(LoggerConfig::development())?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 2 {
        log::error!("{}", USAGE);
        return Err(USAGE.into());
    }

    let clothing_type: ClothingType = match args.get(2) {
        Some(s) => s.parse()?,
        None => ClothingType::TShirt,
    };
    let fit_style: FitStyle = match args.get(3) {
        Some(s) => s.parse()?,
        None => FitStyle::Regular,
    };
    let clothing_state: ClothingState = match args.get(4) {
        Some(s) => s.parse()?,
        None => ClothingState::Closed,
    };
    let style = StyleOptions::new(clothing_type, fit_style, clothing_state);

    let person = fs::read(&args[0])?;
    let clothing = fs::read(&args[1])?;
    log::info!(
        "📷 Person: {} ({} KB), clothing: {} ({} KB)",
        args[0],
        person.len() / 1024,
        args[1],
        clothing.len() / 1024
    );

    let config = GeminiConfig::from_env();
    logger::log_config_info(&config);

    let client = match TryOnClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            log::error!("❌ Failed to initialize try-on client: {}", e);
            return Err(e.into());
        }
    };

    let request = GenerationRequest::new(&person, &clothing, style);
    let result = {
        let _timer = logger::timer("try-on composition");
        client.compose(&request).await
    };

    match result {
        Ok(image) => {
            let output = args.get(5).cloned().unwrap_or_else(|| {
                format!(
                    "tryon_{}_{}.{}",
                    clothing_type.display_name().to_lowercase(),
                    chrono::Utc::now().timestamp(),
                    image.extension()
                )
            });
            fs::write(Path::new(&output), &image.data)?;
            log::info!(
                "💾 Saved {}x{} composite to {}",
                image.width,
                image.height,
                output
            );
            Ok(())
        }
        Err(e) => {
            if let Some(message) = e.user_message() {
                log::error!("❌ {}", message);
            }
            if let Some(suggestion) = e.recovery_suggestion() {
                log::warn!("💡 {}", suggestion);
            }
            Err(e.into())
        }
    }
}
