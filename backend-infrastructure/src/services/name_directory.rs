use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use backend_domain::ports::NameDirectory;

#[derive(Debug, Deserialize)]
struct DirectoryProfile {
    #[serde(default)]
    id: Option<String>,
}

/// Player-name directory reached over HTTP as `GET <base>/<name>`,
/// answering `{"id": "<32 hex>"}` for known names.
pub struct HttpNameDirectory {
    client: Client,
    base_url: Url,
}

impl HttpNameDirectory {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(anyhow!("directory url '{}' is not an http(s) base", base_url));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn profile_url(&self, name: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("directory url cannot be a base"))?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }
}

#[async_trait]
impl NameDirectory for HttpNameDirectory {
    async fn lookup_id(&self, name: &str) -> Result<Option<String>> {
        let url = self.profile_url(name)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(name = %name, status = %status, "directory has no profile");
            return Ok(None);
        }
        let profile = match response.json::<DirectoryProfile>().await {
            Ok(profile) => profile,
            Err(err) => {
                warn!(name = %name, "directory returned unreadable profile: {}", err);
                return Ok(None);
            }
        };
        Ok(profile.id.filter(|id| !id.trim().is_empty()))
    }
}
