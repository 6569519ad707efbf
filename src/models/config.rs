use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub openai: OpenAi,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub cache: Cache,
    #[serde(default)]
    pub auth: Auth,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAi {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_vision_model")]
    pub vision_model: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_embedding_dimensions")]
    pub embedding_dimensions: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_vision_model() -> String {
    "gpt-4o".to_string()
}
fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}
fn default_embedding_dimensions() -> usize {
    1536
}
fn default_timeout_secs() -> u64 {
    60
}

impl Default for OpenAi {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            chat_model: default_chat_model(),
            vision_model: default_vision_model(),
            embedding_model: default_embedding_model(),
            embedding_dimensions: default_embedding_dimensions(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum AI requests per user and endpoint inside one window.
    pub ai_requests: u32,
    pub window_secs: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            ai_requests: 10,
            window_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Cache {
    pub plan_ttl_secs: i64,
    pub coach_ttl_secs: i64,
}

impl Default for Cache {
    fn default() -> Self {
        Self {
            plan_ttl_secs: 24 * 3600,
            coach_ttl_secs: 6 * 3600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Auth {
    pub session_ttl_hours: i64,
    #[serde(default)]
    pub allow_test_login: bool,
}

impl Default for Auth {
    fn default() -> Self {
        Self {
            session_ttl_hours: 24,
            allow_test_login: false,
        }
    }
}

impl Config {
    /// Load config from the standard path, or return defaults.
    /// Environment overrides are applied on top of either.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_env();
        Ok(config)
    }

    /// The config file alone, without environment overrides. Use this when
    /// the result will be saved back.
    pub fn load_file() -> anyhow::Result<Self> {
        let path = Self::path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the standard path.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o700))?;
            }
        }
        let contents = toml::to_string_pretty(self)?;

        #[cfg(unix)]
        {
            use std::fs::{self, OpenOptions};
            use std::io::Write;
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&path)?;
            file.write_all(contents.as_bytes())?;

            // An existing file keeps its old mode through open().
            let mut perms = file.metadata()?.permissions();
            if perms.mode() & 0o777 != 0o600 {
                perms.set_mode(0o600);
                fs::set_permissions(&path, perms)?;
            }
        }
        #[cfg(not(unix))]
        {
            std::fs::write(&path, contents)?;
        }

        Ok(())
    }

    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY")
            && !key.trim().is_empty()
        {
            self.openai.api_key = Some(key.trim().to_string());
        }
        if let Ok(url) = std::env::var("OPENAI_BASE_URL")
            && !url.trim().is_empty()
        {
            self.openai.base_url = url.trim().to_string();
        }
        if let Ok(bind) = std::env::var("VITALCOACH_BIND")
            && !bind.trim().is_empty()
        {
            self.server.bind = bind.trim().to_string();
        }
        if matches!(
            std::env::var("VITALCOACH_TEST_LOGIN").as_deref(),
            Ok("1") | Ok("true")
        ) {
            self.auth.allow_test_login = true;
        }
    }

    /// Set a value by dotted key, e.g. `openai.chat_model` or `limits.ai_requests`.
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "server.bind" => self.server.bind = value.to_string(),
            "openai.base_url" => self.openai.base_url = value.to_string(),
            "openai.api_key" => self.openai.api_key = Some(value.to_string()),
            "openai.chat_model" => self.openai.chat_model = value.to_string(),
            "openai.vision_model" => self.openai.vision_model = value.to_string(),
            "openai.embedding_model" => self.openai.embedding_model = value.to_string(),
            "openai.embedding_dimensions" => self.openai.embedding_dimensions = value.parse()?,
            "openai.timeout_secs" => self.openai.timeout_secs = value.parse()?,
            "limits.ai_requests" => self.limits.ai_requests = value.parse()?,
            "limits.window_secs" => self.limits.window_secs = value.parse()?,
            "cache.plan_ttl_secs" => self.cache.plan_ttl_secs = value.parse()?,
            "cache.coach_ttl_secs" => self.cache.coach_ttl_secs = value.parse()?,
            "auth.session_ttl_hours" => self.auth.session_ttl_hours = value.parse()?,
            "auth.allow_test_login" => self.auth.allow_test_login = value.parse()?,
            _ => anyhow::bail!("unknown config key: {}", key),
        }
        Ok(())
    }

    /// Config as JSON with the API key masked.
    pub fn redacted(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if self.openai.api_key.is_some() {
            value["openai"]["api_key"] = serde_json::Value::String("***".to_string());
        }
        value
    }

    pub fn data_dir() -> PathBuf {
        if let Ok(home) = std::env::var("VITALCOACH_HOME") {
            return PathBuf::from(home);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".vitalcoach")
    }

    pub fn path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    pub fn db_path() -> PathBuf {
        Self::data_dir().join("data.db")
    }
}
