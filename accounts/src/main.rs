//! Heiwa accounts - runs process-start initialization of the user directory.

use std::env;

use heiwa_accounts::{logging, Config, SessionBalance, UserDirectory};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    println!("heiwa-accounts {}", VERSION);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle --version / -V
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        print_version();
        return Ok(());
    }

    // Load configuration
    let config = Config::load()
        .map_err(|e| format!("Failed to load configuration: {}", e))?;

    logging::init(&config.logging.level);
    tracing::info!("Starting heiwa-accounts");

    let store = config.storage.open_store()?;
    let directory = UserDirectory::new(store);
    directory.initialize()?;

    let stats = directory.stats()?;
    tracing::info!(
        users = stats.count,
        admins = stats.admin_count,
        total_coins = stats.total_coins,
        "Directory ready"
    );

    let session = SessionBalance::new(directory);
    match session.get_session()? {
        Some(user) => tracing::info!(
            "Current session: {} ({} coins)",
            user.username,
            session.current_balance()?
        ),
        None => tracing::info!("No active session, browsing anonymously"),
    }

    Ok(())
}
