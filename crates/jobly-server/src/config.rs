use crate::cli::ConfigArgs;
use serde::Deserialize;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::Path;

pub const DEFAULT_BIND: &str = "127.0.0.1:3001";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            run_migrations: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directives; `RUST_LOG` wins when set.
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenConfig {
    pub token: String,
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_max_connections() -> usize {
    jobly::DEFAULT_MAX_CONNECTIONS
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Resolve the effective configuration for a command.
    ///
    /// Order: config file (optional unless `--config` was given), then
    /// `--database`, then `DATABASE_URL` if the url is still empty.
    pub fn resolve(args: &ConfigArgs) -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = if args.explicit || args.config.exists() {
            Self::load(&args.config)?
        } else {
            Self::default()
        };

        if let Some(url) = &args.database {
            config.database.url = url.clone();
        }
        if config.database.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                config.database.url = url;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;
        Self::from_toml(&raw)
            .map_err(|e| anyhow::anyhow!("failed to parse config file {}: {e:#}", path.display()))
    }

    /// Parse a config document and expand `${VAR}` references.
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let mut config: Config = toml::from_str(raw)?;
        config.expand_env()?;
        Ok(config)
    }

    fn expand_env(&mut self) -> anyhow::Result<()> {
        self.server.bind = expand_env_vars(&self.server.bind)?;
        self.database.url = expand_env_vars(&self.database.url)?;

        if let Some(filter) = self.logging.filter.as_mut() {
            *filter = expand_env_vars(filter)?;
        }

        for t in &mut self.auth.tokens {
            t.token = expand_env_vars(&t.token)?;
            t.username = expand_env_vars(&t.username)?;
        }

        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database.url.trim().is_empty() {
            anyhow::bail!("database.url must not be empty (set it in the config, pass --database, or export DATABASE_URL)");
        }
        if self.database.max_connections == 0 {
            anyhow::bail!("database.max_connections must be at least 1");
        }
        if self.server.bind.parse::<SocketAddr>().is_err() {
            anyhow::bail!("server.bind is not a socket address: {}", self.server.bind);
        }

        let mut seen = HashSet::<&str>::new();
        for t in &self.auth.tokens {
            if t.token.trim().is_empty() {
                anyhow::bail!("auth.tokens.token must not be empty (user: {})", t.username);
            }
            if t.username.trim().is_empty() {
                anyhow::bail!("auth.tokens.username must not be empty");
            }
            if !seen.insert(t.token.as_str()) {
                anyhow::bail!("duplicate auth token for user: {}", t.username);
            }
        }

        Ok(())
    }
}

fn expand_env_vars(input: &str) -> anyhow::Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next();

            let mut key = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                key.push(ch);
            }

            if !closed {
                anyhow::bail!("unterminated env var reference: ${{{key}}}");
            }
            if key.is_empty() {
                anyhow::bail!("invalid env var reference: ${{}}");
            }

            let v = std::env::var(&key)
                .map_err(|_| anyhow::anyhow!("missing env var for config expansion: {key}"))?;
            out.push_str(&v);
            continue;
        }

        out.push(c);
    }

    Ok(out)
}
