use std::{sync::Arc, time::Duration};

use eyre::{Context as _, Result};
use reqwest::Client;

use crate::config::Configuration;

pub mod config;
pub mod console;
pub mod endpoints;
pub mod error;


/// Central client state that is shared across all calls to the clinic
/// backend.
#[derive(Clone)]
pub struct ApiClient {
    /// The config data.
    pub config: Arc<Configuration>,

    /// The pooled HTTP client.
    http: Client,
}

impl ApiClient {
    pub fn new(config: Configuration) -> Result<Self> {
        let mut builder =
            Client::builder().user_agent(concat!("clinic-desk/", env!("CARGO_PKG_VERSION")));

        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http = builder.build().wrap_err("could not build HTTP client")?;

        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }

    /// Joins `path` onto the configured base URL.
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }
}
