use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tokio::time::interval;

use markaz::cli::{Cli, Commands};
use markaz::core::{config, init_logger, log_startup_configuration};
use markaz::registration::{Committer, Conversation, Region, SessionStore, SystemClock};
use markaz::storage::db::{count_registrations, list_registrations};
use markaz::storage::{create_pool, get_connection, SqliteRegistrationStore};
use markaz::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the registration bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, database, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present, before any config is read
    let _ = dotenv();

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Run) | None => run_bot().await,
        Some(Commands::Migrate) => run_migrate(),
        Some(Commands::Registrations { limit, json }) => run_list_registrations(limit, json),
        Some(Commands::Regions) => {
            print_regions();
            Ok(())
        }
    }
}

fn run_migrate() -> Result<()> {
    let pool = create_pool(&config::DATABASE_PATH)?;
    let conn = get_connection(&pool)?;
    let total = count_registrations(&conn)?;
    log::info!("Database {} is up to date ({} registrations)", *config::DATABASE_PATH, total);
    Ok(())
}

fn run_list_registrations(limit: usize, json: bool) -> Result<()> {
    let pool = create_pool(&config::DATABASE_PATH)?;
    let conn = get_connection(&pool)?;
    let registrations = list_registrations(&conn, limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&registrations)?);
        return Ok(());
    }

    if registrations.is_empty() {
        println!("No registrations yet.");
        return Ok(());
    }

    for r in &registrations {
        println!(
            "#{:<5} {:<25} {:>3}  {:<14} {} / {}  [{}]  {}",
            r.id,
            r.name,
            r.age,
            r.phone,
            r.region_name(),
            r.district_name(),
            r.channels.join(", "),
            r.created_at.format("%Y-%m-%d %H:%M"),
        );
    }
    println!("{} of {} registrations", registrations.len(), count_registrations(&conn)?);
    Ok(())
}

fn print_regions() {
    for region in Region::all() {
        println!("{} ({})", region.name(), region.id());
        for district in region.districts() {
            println!("    {:<20} {}", district.id, district.name);
        }
    }
}

async fn run_bot() -> Result<()> {
    log::info!("Starting bot...");

    // Fail fast on a missing token before touching the database
    let token = config::bot_token()?;
    log_startup_configuration();

    let db_pool = Arc::new(create_pool(&config::DATABASE_PATH)?);
    let store = Arc::new(SqliteRegistrationStore::new(Arc::clone(&db_pool)));
    let committer = Committer::new(store, config::commit::timeout());
    let sessions = Arc::new(SessionStore::new(config::session::ttl(), Arc::new(SystemClock)));
    let conversation = Arc::new(Conversation::new(Arc::clone(&sessions), committer));

    start_session_sweeper(Arc::clone(&sessions));

    let bot = create_bot(&token)?;

    let bot_info = bot.get_me().await?;
    log::info!("Bot username: {:?}, Bot ID: {}", bot_info.username.as_deref(), bot_info.id);

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    {
        let conn = get_connection(&db_pool)?;
        log::info!("{} registrations in the database", count_registrations(&conn)?);
    }

    let handler = schema(HandlerDeps::new(conversation));
    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}

/// Drops idle sessions in the background.
fn start_session_sweeper(sessions: Arc<SessionStore>) {
    tokio::spawn(async move {
        let mut ticker = interval(config::session::sweep_interval());
        loop {
            ticker.tick().await;
            let evicted = sessions.evict_expired();
            if evicted > 0 {
                log::info!("Evicted {} idle sessions, {} active", evicted, sessions.len());
            }
        }
    });
}
