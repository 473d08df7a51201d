use actionforge_common::UserId;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "actionforge")]
#[command(author, version, about = "Run validated, transactional actions against a SQLite database")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database file (overrides the config file)
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// Create a user
    CreateUser {
        /// Display name of the user
        #[arg(long)]
        name: Option<String>,
    },

    /// Create a post for a user and bump their post count
    CreatePost {
        /// Owning user ID
        #[arg(long = "user")]
        user_id: UserId,

        /// Post title
        #[arg(long)]
        title: Option<String>,
    },

    /// Create several posts for a user in one transaction
    ImportPosts {
        /// Owning user ID
        #[arg(long = "user")]
        user_id: UserId,

        /// Post titles
        #[arg(required = true)]
        titles: Vec<String>,
    },

    /// Show a user and their posts
    ShowUser {
        /// User ID
        id: UserId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate,

    /// Display version information
    Version,
}
