use medscan::logger::{self, LogLevel, LoggerConfig};
use medscan::{Config, ImageOrigin, MedicineAnalyzer, SourceImage};
use std::env;
use std::process::ExitCode;

const USAGE: &str = "usage: medscan <image-path> [upload|camera|example] [preview-out.png]";

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };

    let level = config
        .log_level
        .as_deref()
        .and_then(|raw| raw.parse::<LogLevel>().ok())
        .unwrap_or(LogLevel::Info);
    if let Err(e) = logger::init_with_config(LoggerConfig::new().with_level(level)) {
        eprintln!("{}", e);
    }

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    logger::log_config_info(&config);

    match run(config, env::args().skip(1).collect()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config, args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let image_path = args.first().ok_or(USAGE)?;
    let origin = match args.get(1) {
        Some(raw) => raw.parse::<ImageOrigin>()?,
        None => ImageOrigin::Upload,
    };

    let analyzer = MedicineAnalyzer::from_config(&config)?;
    let image = SourceImage::from_path(image_path, origin)?;

    let preview = analyzer.preview(&image)?;
    log::info!("🖼️  Preview ready: {}x{}", preview.width, preview.height);
    if let Some(out) = args.get(2) {
        std::fs::write(out, &preview.bytes)?;
        log::info!("💾 Preview saved to: {}", out);
    }

    log::info!("🔬 Analyzing ingredients...");
    let result = analyzer.analyze(&image).await?;
    println!("{}", result.content);

    Ok(())
}
