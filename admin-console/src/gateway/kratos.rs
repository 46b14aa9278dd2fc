// Kratos admin API client
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, LINK};
use reqwest::{Response, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{GatewayError, IdentityGateway, Result};
use crate::config::KratosConfig;
use crate::models::{RecoveryLink, UpstreamIdentity};

/// Upper bound on followed pages, guards against a looping `next` link
const MAX_PAGES: usize = 10_000;

#[derive(Clone)]
pub struct KratosClient {
    http: reqwest::Client,
    admin_url: Url,
    page_size: u32,
}

#[derive(Debug, Serialize)]
struct CreateRecoveryLinkBody<'a> {
    identity_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    reason: Option<String>,
}

impl KratosClient {
    pub fn new(config: &KratosConfig) -> Result<Self> {
        let admin_url = Url::parse(&config.admin_url)
            .map_err(|e| GatewayError::InvalidUrl(format!("{}: {}", config.admin_url, e)))?;
        if admin_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidUrl(config.admin_url.clone()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            admin_url,
            page_size: config.page_size,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.admin_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidUrl(self.admin_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn list_page(&self, page_token: Option<&str>) -> Result<(Vec<UpstreamIdentity>, Option<String>)> {
        let mut url = self.endpoint(&["admin", "identities"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page_size", &self.page_size.to_string());
            if let Some(token) = page_token {
                query.append_pair("page_token", token);
            }
        }

        let response = check(self.http.get(url).send().await?).await?;
        let next = next_page_token(&self.admin_url, response.headers());
        let identities = response.json::<Vec<UpstreamIdentity>>().await?;
        Ok((identities, next))
    }
}

#[async_trait]
impl IdentityGateway for KratosClient {
    async fn list_identities(&self) -> Result<Vec<UpstreamIdentity>> {
        let mut identities = Vec::new();
        let mut page_token: Option<String> = None;

        for page in 0..MAX_PAGES {
            let (batch, next) = self.list_page(page_token.as_deref()).await?;
            debug!(page, count = batch.len(), "fetched identities page");
            let exhausted = batch.is_empty();
            identities.extend(batch);

            match next {
                Some(token) if !exhausted && page_token.as_deref() != Some(token.as_str()) => {
                    page_token = Some(token);
                }
                _ => return Ok(identities),
            }
        }

        warn!(max_pages = MAX_PAGES, "identity listing truncated");
        Ok(identities)
    }

    async fn get_identity(&self, id: &str) -> Result<UpstreamIdentity> {
        let url = self.endpoint(&["admin", "identities", id])?;
        let response = check(self.http.get(url).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn delete_identity(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&["admin", "identities", id])?;
        check(self.http.delete(url).send().await?).await?;
        Ok(())
    }

    async fn create_recovery_link(&self, id: &str) -> Result<RecoveryLink> {
        let url = self.endpoint(&["admin", "recovery", "link"])?;
        let response = check(
            self.http
                .post(url)
                .json(&CreateRecoveryLinkBody { identity_id: id })
                .send()
                .await?,
        )
        .await?;
        Ok(response.json().await?)
    }
}

/// Turn non-2xx responses into `GatewayError::Http`
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => match envelope.error.reason {
            Some(reason) => format!("{} ({})", envelope.error.message, reason),
            None => envelope.error.message,
        },
        Err(_) if body.is_empty() => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
        Err(_) => body,
    };

    Err(GatewayError::Http {
        status: status.as_u16(),
        message,
    })
}

/// Extract the `page_token` of the `rel="next"` entry of a Link header
fn next_page_token(base: &Url, headers: &HeaderMap) -> Option<String> {
    let header = headers.get(LINK)?.to_str().ok()?;

    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim().strip_prefix('<')?.strip_suffix('>')?;
        let is_next = parts.any(|param| {
            let param = param.trim();
            param == "rel=\"next\"" || param == "rel=next"
        });
        if !is_next {
            return None;
        }

        let url = base.join(target).ok()?;
        let token = url
            .query_pairs()
            .find(|(key, _)| key == "page_token")
            .map(|(_, value)| value.into_owned());
        token
    })
}
