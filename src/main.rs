use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use library_desk::infrastructure::AppState;
use library_desk::{config, db, seed, server};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "library_desk=debug,client=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    // Check for --profile CLI argument
    let args: Vec<String> = std::env::args().collect();
    let profile = args
        .iter()
        .position(|arg| arg == "--profile")
        .and_then(|pos| args.get(pos + 1))
        .cloned();

    let config = config::Config::with_profile(profile);

    // Initialize database
    let db = db::init_db(&config.database_url)
        .await
        .expect("Failed to initialize database");

    if config.seed_demo {
        tracing::info!("Seeding demo data...");
        if let Err(e) = seed::seed_demo_data(&db).await {
            tracing::error!("Failed to seed data: {}", e);
        } else {
            tracing::info!("Demo data seeded successfully.");
        }
    }

    let state = AppState::new(db)
        .with_loan_period_days(config.loan_period_days)
        .with_log_dir(config.log_dir.clone());

    if let Err(e) = state.log_sink.ensure_dir().await {
        tracing::error!(
            "Error creating logs directory {}: {}",
            config.log_dir.display(),
            e
        );
    }

    if let Err(e) = server::serve(state, config.port, &config.cors_allowed_origins).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
