pub mod alerts;
pub mod cache;
pub mod config;
pub mod init;
pub mod insights;
pub mod log;
pub mod serve;
pub mod show;
pub mod user;

use anyhow::Result;

use vitalcoach::db::Database;
use vitalcoach::models::config::Config;
use vitalcoach::models::user::User;

fn open_db() -> Result<Database> {
    Database::open(&Config::db_path())
}

fn find_user(db: &Database, email: &str) -> Result<User> {
    db.get_user_by_email(email)?
        .ok_or_else(|| anyhow::anyhow!("no user with email '{}'", email))
}

fn print_json(out: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string(out)?);
    Ok(())
}
