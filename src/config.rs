use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "foodle", about = "A terminal client for the Foodle course feed")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base URL of the Foodle backend
    #[arg(long)]
    pub api_url: Option<String>,

    /// Path to data directory
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and persist the session token
    Login { username: String, password: String },
    /// Create an account and sign in
    Register { username: String, password: String },
    /// Clear the persisted session
    Logout,
    /// Show the current identity
    Whoami,
    /// Show the home feed (posts from enrolled courses)
    Feed,
    /// List courses (your enrollments by default)
    Courses {
        /// List the whole catalog instead of your enrollments
        #[arg(long)]
        all: bool,
    },
    /// Show one course: info plus its posts
    Course { course_id: String },
    /// Enroll in a course
    Join { course_id: String },
    /// Leave a course
    Leave { course_id: String },
    /// Create a post in a course
    Post {
        course_id: String,
        content: String,
        /// Attach an image file
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete one of your posts
    DeletePost { post_id: String },
    /// Toggle a like on a post
    Like { post_id: String },
    /// Comment on a post
    Comment { post_id: String, content: String },
    /// Delete one of your comments
    DeleteComment { comment_id: String },
    /// Show a user's profile, posts and courses
    Profile { user_id: Option<String> },
    /// List your chats
    Chats,
    /// Show a conversation
    Chat { chat_id: String },
    /// Send a message in a chat
    Send { chat_id: String, content: String },
    /// Start a chat with another user
    StartChat { participant_id: String },
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub token_path: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
        }
    }
}

impl Config {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let data_dir = Self::data_dir(cli);
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| data_dir.join("config.toml"));

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        // CLI overrides
        if let Some(ref api_url) = cli.api_url {
            config.api.base_url = api_url.clone();
        }

        // Resolve paths relative to data dir
        if config.storage.token_path.is_none() {
            config.storage.token_path = Some(data_dir.join("token"));
        }

        Ok(config)
    }

    pub fn data_dir(cli: &Cli) -> PathBuf {
        cli.data_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .expect("Could not determine home directory")
                .join(".foodle")
        })
    }

    pub fn token_path(&self) -> &PathBuf {
        self.storage.token_path.as_ref().unwrap()
    }
}
