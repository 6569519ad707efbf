use anyhow::Result;
use std::io::{self, Write};

use vitalcoach::db::Database;
use vitalcoach::models::config::Config;

pub fn run(skip: bool) -> Result<()> {
    let mut config = Config::load_file().unwrap_or_default();

    if !skip {
        println!("VitalCoach - Ersteinrichtung\n");

        let bind = prompt_string(&format!("Listen address [{}]", config.server.bind))?;
        if !bind.is_empty() {
            config.server.bind = bind;
        }
        let key = prompt_string("OpenAI API key (leer lassen für später)")?;
        if !key.is_empty() {
            config.openai.api_key = Some(key);
        }
        let model = prompt_string(&format!("Chat model [{}]", config.openai.chat_model))?;
        if !model.is_empty() {
            config.openai.chat_model = model;
        }
    }

    config.save()?;
    Database::open(&Config::db_path())?;

    if skip {
        println!("Config initialized with defaults at {:?}", Config::path());
    } else {
        println!("\nSetup complete. Data stored in {:?}", Config::data_dir());
    }
    Ok(())
}

fn prompt_string(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf)?;
    Ok(buf.trim().to_string())
}
