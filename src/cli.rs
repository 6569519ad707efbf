use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vitalcoach",
    version,
    about = "Personal health tracking backend with an AI coach"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as human-readable text instead of JSON
    #[arg(long = "human", short = 'H', global = true)]
    pub human: bool,

    /// Override date (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub date: Option<NaiveDate>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize config and data directory
    Init {
        /// Skip interactive setup, use defaults
        #[arg(long)]
        skip: bool,
    },

    /// Run the HTTP API
    Serve {
        /// Listen address, e.g. 0.0.0.0:8080
        #[arg(long)]
        bind: Option<String>,
    },

    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Log a health record
    Log(LogArgs),

    /// Show health records
    Show {
        /// User email
        #[arg(long)]
        user: String,

        /// Number of most recent records
        #[arg(long)]
        last: Option<u32>,

        /// Records from this date
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Records up to and including this date
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Trend insights over the last weeks
    Insights {
        /// User email
        #[arg(long)]
        user: String,
    },

    /// Alert history, or evaluate thresholds now
    Alerts {
        /// User email
        #[arg(long)]
        user: String,

        /// Evaluate the last 7 days and store new alerts
        #[arg(long)]
        generate: bool,

        /// Only alerts not yet acknowledged
        #[arg(long)]
        unacknowledged: bool,
    },

    /// Manage the AI response cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Register a user
    Add(UserArgs),
    /// List registered users
    List,
}

#[derive(Args)]
pub struct UserArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub password: String,

    /// sedentary/light/moderate/active/very_active
    #[arg(long)]
    pub activity: Option<String>,

    /// lose_weight/maintain/gain_muscle/improve_fitness
    #[arg(long)]
    pub goal: Option<String>,

    #[arg(long)]
    pub height: Option<f64>,

    #[arg(long)]
    pub birth_year: Option<u16>,
}

#[derive(Args)]
pub struct LogArgs {
    /// User email
    #[arg(long)]
    pub user: String,

    /// Full record as JSON, same shape as POST /api/health
    #[arg(long, conflicts_with = "bp")]
    pub json: Option<String>,

    #[arg(long)]
    pub steps: Option<f64>,

    #[arg(long)]
    pub heart_rate: Option<f64>,

    #[arg(long)]
    pub sleep_hours: Option<f64>,

    /// 1-10
    #[arg(long)]
    pub sleep_quality: Option<f64>,

    /// kg
    #[arg(long)]
    pub weight: Option<f64>,

    #[arg(long)]
    pub calories: Option<f64>,

    /// Blood pressure as SYSTOLIC/DIASTOLIC, e.g. 120/80
    #[arg(long)]
    pub bp: Option<String>,

    #[arg(long)]
    pub spo2: Option<f64>,

    #[arg(long)]
    pub body_fat: Option<f64>,

    #[arg(long)]
    pub muscle_mass: Option<f64>,

    /// Liters
    #[arg(long)]
    pub water: Option<f64>,

    #[arg(long)]
    pub exercise_minutes: Option<f64>,

    /// mg/dL
    #[arg(long)]
    pub glucose: Option<f64>,

    /// °C
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 1-10
    #[arg(long)]
    pub mood: Option<f64>,

    /// 1-10
    #[arg(long)]
    pub stress: Option<f64>,

    #[arg(long)]
    pub medications: Option<String>,

    /// breakfast/lunch/dinner/snack
    #[arg(long)]
    pub meal: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// Delete expired cache entries and sessions
    Purge,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set a configuration value by dotted key
    Set {
        /// Key such as openai.chat_model or limits.ai_requests
        key: String,
        value: String,
    },
}
