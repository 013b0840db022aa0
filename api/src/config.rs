use config::{ConfigBuilder, builder::DefaultState};
use eyre::{Context as _, Result, bail};
use serde::{Deserialize, Serialize};
use workflow::format::Locale;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub env: Environment,

    /// Root URL of the clinic backend, e.g. `https://klinik.example/`.
    pub base_url: String,

    /// Per-request timeout. Requests wait indefinitely when unset.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Language of dates, times and status labels in the CLI output.
    #[serde(default)]
    pub locale: Locale,
}

impl Configuration {
    /// Loads the configuration from `CLINIC_*` environment variables, and
    /// the file named by `CLINIC_CONFIG_FILE` if set.
    pub fn load() -> Result<Self> {
        let mut cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix("CLINIC").try_parsing(true));

        if let Ok(file) = std::env::var("CLINIC_CONFIG_FILE") {
            cfg = cfg.add_source(config::File::with_name(&file));
        }

        Self::from_builder(cfg)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let cfg = builder
            .build()
            .wrap_err("failed to build config")?
            .try_deserialize::<Self>()
            .wrap_err("failed to deserialize config")?;

        cfg.check()
    }

    /// Rejects settings the client cannot work with.
    fn check(self) -> Result<Self> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            bail!("base_url must be an http(s) URL, got '{}'", self.base_url);
        }

        if self.request_timeout_secs == Some(0) {
            bail!("request_timeout_secs must be at least 1");
        }

        Ok(self)
    }

    #[inline]
    pub fn is_production(&self) -> bool {
        self.env == Environment::Production
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Environment {
    #[serde(rename = "development")]
    Development,

    #[serde(rename = "production")]
    #[default]
    Production,
}
