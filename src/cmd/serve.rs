use anyhow::Result;

use vitalcoach::models::config::Config;
use vitalcoach::server;

pub fn run(bind: Option<String>) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    let db = super::open_db()?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::run_server(config, db))
}
