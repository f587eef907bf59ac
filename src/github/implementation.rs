use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Method, Url};
use serde_json::Value;

use super::dto::ApiResponse;
use super::helpers::{build_url, next_link};
use crate::auth::Token;
use crate::config::{ClientConfig, PlaygroundConfig};
use crate::error::{PlaygroundError, Result};
use crate::logging::LogSink;

const API_VERSION_HEADER: &str = "x-github-api-version";
const GITHUB_JSON: &str = "application/vnd.github+json";
const PER_PAGE: &str = "100";
const MAX_PAGES: usize = 100;

/// The GitHub operations plugins are allowed to perform.
///
/// Non-2xx answers come back as `Ok` with their status so callers decide what
/// is fatal; `Err` is reserved for transport and decoding failures.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    fn log(&self) -> &dyn LogSink;

    async fn list_user_packages(&self, username: &str, package_type: &str) -> Result<ApiResponse>;

    async fn list_package_versions(
        &self,
        username: &str,
        package_type: &str,
        package_name: &str,
    ) -> Result<ApiResponse>;

    async fn delete_package_version(
        &self,
        username: &str,
        package_type: &str,
        package_name: &str,
        version_id: u64,
    ) -> Result<ApiResponse>;
}

#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
    origin: Url,
    log: Arc<dyn LogSink>,
}

impl GitHubClient {
    pub fn new(token: &Token, settings: &ClientConfig, log: Arc<dyn LogSink>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, token.authorization_header()?);
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON));
        headers.insert(
            HeaderName::from_static(API_VERSION_HEADER),
            HeaderValue::from_str(&settings.api_version).map_err(|_| {
                PlaygroundError::config_error(format!(
                    "Invalid API version: {}",
                    settings.api_version
                ))
            })?,
        );

        let origin = Url::parse(&settings.base_url).map_err(|e| {
            PlaygroundError::config_error(format!(
                "Invalid base URL {}: {}",
                settings.base_url, e
            ))
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        log.debug(&format!("GitHub client ready for {}", settings.base_url));

        Ok(Self {
            http,
            base_url: settings.base_url.clone(),
            origin,
            log,
        })
    }

    pub fn from_config(config: &PlaygroundConfig, log: Arc<dyn LogSink>) -> Result<Self> {
        Self::new(&config.token, &config.client, log)
    }

    async fn send(&self, method: Method, url: &str, query: &[(&str, &str)]) -> Result<ApiResponse> {
        self.log.debug(&format!("{} {}", method, url));

        let mut request = self.http.request(method.clone(), url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();

        let body = response.text().await?;
        let data = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body).unwrap_or(Value::String(body))
        };

        if !(200..300).contains(&status) {
            self.log
                .warn(&format!("{} {} returned {}", method, final_url, status));
        }

        Ok(ApiResponse {
            url: final_url,
            status,
            headers,
            data,
        })
    }

    /// Follows `Link: rel="next"` until the listing is exhausted and returns
    /// the first page with every later page's items appended. Links must stay
    /// on the configured host, may not revisit a page and are capped at
    /// `MAX_PAGES`.
    async fn get_all(&self, operation: &str, url: &str, query: &[(&str, &str)]) -> Result<ApiResponse> {
        let mut response = self.send(Method::GET, url, query).await?;
        if !response.is_success() {
            return Ok(response);
        }

        let mut visited = HashSet::from([response.url.clone()]);
        let mut next = response.header("link").and_then(next_link);
        while let Some(link) = next {
            let next_url = self.same_origin(operation, &link)?;
            if !visited.insert(next_url.to_string()) {
                return Err(PlaygroundError::api_error(format!(
                    "{} pagination revisited {}",
                    operation, next_url
                )));
            }
            if visited.len() > MAX_PAGES {
                return Err(PlaygroundError::api_error(format!(
                    "{} exceeded {} pages",
                    operation, MAX_PAGES
                )));
            }

            let page = self.send(Method::GET, next_url.as_str(), &[]).await?;
            if !page.is_success() {
                return Ok(page);
            }
            let following = page.header("link").and_then(next_link);
            match (&mut response.data, page.data) {
                (Value::Array(items), Value::Array(more)) => items.extend(more),
                _ => {
                    return Err(PlaygroundError::api_error(format!(
                        "{} returned a page that is not a JSON array",
                        operation
                    )))
                }
            }
            next = following;
        }

        Ok(response)
    }

    /// Parses a pagination link and refuses it unless scheme, host and port
    /// match the base URL, so the token never leaves the configured API.
    fn same_origin(&self, operation: &str, link: &str) -> Result<Url> {
        let target = Url::parse(link).map_err(|e| {
            PlaygroundError::api_error(format!(
                "{} returned an invalid next link {}: {}",
                operation, link, e
            ))
        })?;

        if target.scheme() != self.origin.scheme()
            || target.host_str() != self.origin.host_str()
            || target.port_or_known_default() != self.origin.port_or_known_default()
        {
            return Err(PlaygroundError::api_error(format!(
                "{} pagination points outside {}: {}",
                operation, self.base_url, target
            )));
        }

        Ok(target)
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    fn log(&self) -> &dyn LogSink {
        self.log.as_ref()
    }

    async fn list_user_packages(&self, username: &str, package_type: &str) -> Result<ApiResponse> {
        let url = build_url(&self.base_url, &["users", username, "packages"]);
        self.get_all(
            "list packages",
            &url,
            &[("package_type", package_type), ("per_page", PER_PAGE)],
        )
        .await
    }

    async fn list_package_versions(
        &self,
        username: &str,
        package_type: &str,
        package_name: &str,
    ) -> Result<ApiResponse> {
        let url = build_url(
            &self.base_url,
            &[
                "users",
                username,
                "packages",
                package_type,
                package_name,
                "versions",
            ],
        );
        self.get_all("list package versions", &url, &[("per_page", PER_PAGE)])
            .await
    }

    async fn delete_package_version(
        &self,
        username: &str,
        package_type: &str,
        package_name: &str,
        version_id: u64,
    ) -> Result<ApiResponse> {
        let version_id = version_id.to_string();
        let url = build_url(
            &self.base_url,
            &[
                "users",
                username,
                "packages",
                package_type,
                package_name,
                "versions",
                &version_id,
            ],
        );
        self.send(Method::DELETE, &url, &[]).await
    }
}
