use {
    std::fs::read_to_string,
    tracing::warn,
    serde::Deserialize,
    anyhow::Result,
    crate::youtube::DEFAULT_ENDPOINT,
};

pub const MIN_COMMENT_LIMIT: usize = 5;
pub const MAX_COMMENT_LIMIT: usize = 100;
pub const DEFAULT_COMMENT_LIMIT: usize = 20;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:7860";

#[derive(Deserialize, Debug, Default)]
pub struct Config {
    youtube: Option<YoutubeConfig>,
    server: Option<ServerConfig>,
    form: Option<FormConfig>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct YoutubeConfig {
    #[serde(default)]
    api_key: String,
    endpoint: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct ServerConfig {
    bind: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct FormConfig {
    default_limit: Option<usize>,
}

impl Config {
    pub fn load() -> Self {
        read_to_string("./config.toml")
            .or_else(|_| read_to_string("/config/config.toml"))
            .map_err(|err| err.to_string())
            .and_then(|v| Self::from_toml(&v).map_err(|err| err.to_string()))
            .unwrap_or_else(|err| {
                warn!("failed to read config: {}", err);
                Config::default()
            })
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn youtube(&self) -> YoutubeConfig {
        self.youtube.as_ref().cloned().unwrap_or_default()
    }

    pub fn server(&self) -> ServerConfig {
        self.server.as_ref().cloned().unwrap_or_default()
    }

    pub fn form(&self) -> FormConfig {
        self.form.as_ref().cloned().unwrap_or_default()
    }
}

impl YoutubeConfig {
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: Some(endpoint.into()),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn endpoint(&self) -> String {
        self.endpoint.as_ref().cloned().unwrap_or(DEFAULT_ENDPOINT.to_owned())
    }
}

impl ServerConfig {
    pub fn bind(&self) -> String {
        self.bind.as_ref().cloned().unwrap_or(DEFAULT_BIND_ADDRESS.to_owned())
    }
}

impl FormConfig {
    pub fn default_limit(&self) -> usize {
        clamp_comment_limit(self.default_limit.unwrap_or(DEFAULT_COMMENT_LIMIT))
    }
}

/// Keeps a requested comment count inside the range the form offers.
pub fn clamp_comment_limit(limit: usize) -> usize {
    limit.clamp(MIN_COMMENT_LIMIT, MAX_COMMENT_LIMIT)
}
