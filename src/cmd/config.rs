use anyhow::Result;
use serde_json::json;

use vitalcoach::ai::openai::validate_base_url;
use vitalcoach::models::config::Config;
use vitalcoach::output;

pub fn run_show(human: bool) -> Result<()> {
    let config = Config::load()?;
    let redacted = config.redacted();
    if human {
        let as_toml: toml::Value = serde_json::from_value(redacted)?;
        println!("{}", toml::to_string_pretty(&as_toml)?);
    } else {
        super::print_json(&output::success("config", json!({ "config": redacted })))?;
    }
    Ok(())
}

pub fn run_set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_file()?;
    if key == "openai.base_url" {
        validate_base_url(value).map_err(anyhow::Error::msg)?;
    }
    config.set(key, value)?;
    config.save()?;

    let shown = if key == "openai.api_key" { "***" } else { value };
    super::print_json(&output::success("config", json!({ "key": key, "value": shown })))
}
