use crate::error::DirectoryError;
use fedigraph_scanner::Instance;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// The instances.social listing, uncapped.
pub const DIRECTORY_URL: &str = "https://instances.social/api/1.0/instances/list?count=0";

#[derive(Debug, Deserialize)]
struct DirectoryResponse {
    instances: Vec<DirectoryInstance>,
}

/// One directory row. The API reports user counts as decimal strings and
/// carries many more fields than we keep.
#[derive(Debug, Deserialize)]
struct DirectoryInstance {
    name: String,
    #[serde(default)]
    users: Option<String>,
}

/// Client for the instances.social directory API.
pub struct DirectoryClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl DirectoryClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent(concat!(
                "fedigraph/",
                env!("CARGO_PKG_VERSION"),
                " (https://github.com/mkoell/fedigraph)"
            ))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: DIRECTORY_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Fetch the full instance listing.
    ///
    /// Duplicate names are rejected here so every downstream consumer can
    /// treat instance names as unique keys; the first occurrence wins and
    /// each duplicate is logged. Unparseable user counts map to 0.
    pub async fn fetch_instances(&self) -> Result<Vec<Instance>, DirectoryError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(DirectoryError::Status(response.status().as_u16()));
        }

        let listing: DirectoryResponse = response.json().await?;

        let mut seen = HashSet::new();
        let mut instances = Vec::with_capacity(listing.instances.len());
        for row in listing.instances {
            if !seen.insert(row.name.clone()) {
                warn!(
                    "Duplicate instance {} in directory response; keeping the first entry",
                    row.name
                );
                continue;
            }
            let users = row
                .users
                .as_deref()
                .and_then(|u| u.parse().ok())
                .unwrap_or(0);
            instances.push(Instance::new(row.name, users));
        }

        info!("Directory returned {} instances", instances.len());
        Ok(instances)
    }

    /// Return the cached listing when `cache_path` holds one, otherwise
    /// fetch, write the cache, and return the fresh listing.
    ///
    /// A corrupt cache file is refreshed, never fatal.
    pub async fn load_or_fetch(&self, cache_path: &Path) -> Result<Vec<Instance>, DirectoryError> {
        if let Ok(contents) = fs::read_to_string(cache_path) {
            match serde_json::from_str::<Vec<Instance>>(&contents) {
                Ok(instances) => {
                    info!(
                        "Loaded {} instances from cache {}",
                        instances.len(),
                        cache_path.display()
                    );
                    return Ok(instances);
                }
                Err(e) => warn!(
                    "Cache {} did not parse ({}); refetching",
                    cache_path.display(),
                    e
                ),
            }
        }

        let instances = self.fetch_instances().await?;

        if let Some(parent) = cache_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(cache_path, serde_json::to_string(&instances)?)?;

        Ok(instances)
    }
}
