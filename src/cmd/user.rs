use anyhow::Result;
use serde_json::json;

use vitalcoach::core::auth::{self, RegisterError};
use vitalcoach::core::profile;
use vitalcoach::models::user::{ProfileUpdate, Registration};
use vitalcoach::output;

use crate::cli::UserArgs;

pub fn run_add(args: UserArgs, human: bool) -> Result<()> {
    let db = super::open_db()?;
    let reg = Registration {
        email: args.email,
        name: args.name,
        password: args.password,
    };
    let user = auth::register(&db, &reg).map_err(|e| match e {
        RegisterError::Other(e) => e,
        other => anyhow::anyhow!(other.to_string()),
    })?;

    let update = ProfileUpdate {
        height_cm: args.height,
        birth_year: args.birth_year,
        activity_level: args.activity.as_deref().map(str::parse).transpose()?,
        goal: args.goal.as_deref().map(str::parse).transpose()?,
        ..Default::default()
    };
    let user = profile::update(&db, user, update).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    if human {
        println!("Created user {} <{}> ({})", user.name, user.email, user.id);
    } else {
        super::print_json(&output::success("user", json!({ "user": user })))?;
    }
    Ok(())
}

pub fn run_list(human: bool) -> Result<()> {
    let db = super::open_db()?;
    let users = db.list_users()?;
    if human {
        if users.is_empty() {
            println!("No users registered");
        }
        for u in &users {
            println!(
                "{}  {:<30} {} ({}, {})",
                u.created_at.format("%Y-%m-%d"),
                u.email,
                u.name,
                u.activity_level,
                u.goal
            );
        }
    } else {
        super::print_json(&output::success("user", json!({ "users": users })))?;
    }
    Ok(())
}
