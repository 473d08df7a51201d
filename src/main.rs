mod cli;

use actionforge::{
    actions::{CreatePost, CreateUser, ImportPosts},
    config::{self, Config},
    notify::Notifier,
};
use actionforge_action::Command;
use actionforge_common::UserId;
use actionforge_db::{migrations, queries, Database};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::load_config_or_default(cli.config.as_deref())?;
    if let Some(path) = cli.database.clone() {
        config.database.path = path;
    }

    // RUST_LOG wins, then the config file, then defaults based on the verbose flag
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .or_else(|| config.logging.filter.clone())
        .unwrap_or_else(|| {
            if cli.verbose {
                "actionforge=trace,actionforge_action=trace,actionforge_db=debug,actionforge_common=debug"
                    .to_string()
            } else {
                "actionforge=info,actionforge_action=warn,actionforge_db=warn".to_string()
            }
        });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Migrate => migrate(&config),
        Commands::CreateUser { name } => create_user(&config, name),
        Commands::CreatePost { user_id, title } => create_post(&config, user_id, title),
        Commands::ImportPosts { user_id, titles } => import_posts(&config, user_id, titles),
        Commands::ShowUser { id, json } => show_user(&config, id, json),
        Commands::Validate => validate_config(cli.config.as_deref(), &config),
        Commands::Version => {
            println!("actionforge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn open_database(config: &Config) -> Result<Database> {
    let path = &config.database.path;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
    }

    let path_str = path.to_string_lossy();
    tracing::debug!("Opening database at {}", path_str);
    let db = Database::open_with(&path_str, &config.database.pool_options())
        .with_context(|| format!("Failed to open database: {:?}", path))?;
    Ok(db)
}

fn migrate(config: &Config) -> Result<()> {
    // Opening the database applies any pending migrations.
    let db = open_database(config)?;
    let conn = db.conn()?;
    let version = migrations::current_version(&conn)?;
    println!(
        "Database {} is at schema version {} (latest {})",
        config.database.path.display(),
        version,
        migrations::latest_version()
    );
    Ok(())
}

fn create_user(config: &Config, name: Option<String>) -> Result<()> {
    let db = open_database(config)?;
    let mut action = CreateUser::default().with_notifier(Arc::new(Notifier::log()));
    action.name = name;

    let mut cmd = Command::new(action);
    cmd.save(&db)?;

    if let Some(user) = cmd.user() {
        println!("{}", user.id);
    }
    Ok(())
}

fn create_post(config: &Config, user_id: UserId, title: Option<String>) -> Result<()> {
    let db = open_database(config)?;
    let action = CreatePost::new(user_id, title).with_notifier(Arc::new(Notifier::log()));

    let mut cmd = Command::new(action);
    cmd.save(&db)?;

    if let Some(post) = cmd.post() {
        println!("{}", post.id);
    }
    Ok(())
}

fn import_posts(config: &Config, user_id: UserId, titles: Vec<String>) -> Result<()> {
    let db = open_database(config)?;
    let action = ImportPosts::new(user_id, titles).with_notifier(Arc::new(Notifier::log()));

    let mut cmd = Command::new(action);
    cmd.save(&db)?;

    for post in cmd.posts() {
        println!("{}", post.id);
    }
    Ok(())
}

fn show_user(config: &Config, id: UserId, json: bool) -> Result<()> {
    let db = open_database(config)?;
    let conn = db.conn()?;
    let user = queries::users::find_user(&conn, id)?;
    let posts = queries::posts::list_posts_for_user(&conn, id)?;

    if json {
        let value = serde_json::json!({ "user": user, "posts": posts });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("User: {} ({})", user.name, user.id);
    println!("Posts: {}", user.posts_count);
    for post in &posts {
        println!("  - {} ({})", post.title, post.id);
    }
    Ok(())
}

fn validate_config(path: Option<&Path>, config: &Config) -> Result<()> {
    match path {
        Some(p) => println!("Validating config: {:?}", p),
        None => println!("No config file specified, using default locations"),
    }

    // Loading already ran validation; re-check after CLI overrides.
    config::validate_config(config)?;

    println!("✓ Configuration is valid");
    println!("  Database: {}", config.database.path.display());
    println!("  Pool size: {}", config.database.pool_size);
    println!("  Busy timeout: {}ms", config.database.busy_timeout_ms);
    println!(
        "  Log filter: {}",
        config.logging.filter.as_deref().unwrap_or("(default)")
    );
    Ok(())
}
