// src/source.rs

use std::time::Duration;
use futures::future::BoxFuture;
use reqwest::{Client, Url};
use tracing::debug;
//
use crate::{error::{Result, ViewError}, supplier::Supplier};

/// Where supplier lists come from.
pub trait SupplierSource: Send + Sync {
    fn fetch<'a>(&'a self, framework: &'a str) -> BoxFuture<'a, Result<Vec<Supplier>>>;
}

/// Fetches `GET {base}/suppliers/{framework}`.
#[derive(Clone, Debug)]
pub struct HttpSource {
    client: Client,
    base: Url,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|e| ViewError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ViewError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "not a hierarchical url".to_string(),
            });
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base })
    }

    /// Url for `framework`, inserted as one percent-encoded path segment.
    pub fn url_for(&self, framework: &str) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ViewError::InvalidBaseUrl {
                url: self.base.to_string(),
                reason: "not a hierarchical url".to_string(),
            })?
            .pop_if_empty()
            .push("suppliers")
            .push(framework);

        Ok(url)
    }

    async fn get_suppliers(&self, framework: &str) -> Result<Vec<Supplier>> {
        let url = self.url_for(framework)?;
        debug!(%url, "fetching suppliers");

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ViewError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        let suppliers: Vec<Supplier> = serde_json::from_slice(&body)?;

        debug!(%url, count = suppliers.len(), "received suppliers");

        Ok(suppliers)
    }
}

impl SupplierSource for HttpSource {
    fn fetch<'a>(&'a self, framework: &'a str) -> BoxFuture<'a, Result<Vec<Supplier>>> {
        Box::pin(self.get_suppliers(framework))
    }
}
