//! GitHub platform service implementation

use crate::config::GitHubOptions;
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{CreatePullRequest, PullRequest};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("pr-lander/", env!("CARGO_PKG_VERSION"));

/// GitHub REST service using reqwest
pub struct GitHubService {
    client: Client,
    api_url: String,
    token: Option<String>,
    project: String,
}

#[derive(Deserialize)]
struct GhPullRequest {
    number: u64,
    #[serde(default)]
    state: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    head: Option<GhRef>,
    #[serde(default)]
    base: Option<GhRef>,
}

#[derive(Deserialize)]
struct GhRef {
    #[serde(rename = "ref")]
    ref_field: String,
}

#[derive(Deserialize)]
struct GhUser {
    login: String,
}

impl From<GhPullRequest> for PullRequest {
    fn from(pr: GhPullRequest) -> Self {
        Self {
            number: pr.number,
            state: pr.state,
            title: pr.title.unwrap_or_default(),
            body: pr.body.unwrap_or_default(),
            head_ref: pr.head.map(|h| h.ref_field),
            base_ref: pr.base.map(|b| b.ref_field),
        }
    }
}

impl GitHubService {
    /// Create a new GitHub service for a project
    pub fn new(options: &GitHubOptions, project: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            api_url: options.api_url.trim_end_matches('/').to_string(),
            token: options.token.clone(),
            project: project.into(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("Accept", "application/vnd.github+json");
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Login of the user owning the token
    pub async fn current_user(&self) -> Result<String> {
        let response = self
            .authorized(self.client.get(self.api_url("/user")))
            .send()
            .await?;
        let user: GhUser = decode(response).await?;
        Ok(user.login)
    }
}

/// Fail on non-2xx, otherwise decode the JSON body
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(Error::GitHubApi {
            status: status.as_u16(),
            message: text,
        });
    }
    serde_json::from_str(&text).map_err(|e| Error::GitHubApi {
        status: status.as_u16(),
        message: format!("malformed response: {e}"),
    })
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn find_existing_pr(&self, head: &str, base: &str) -> Result<Option<PullRequest>> {
        let url = self.api_url(&format!("/repos/{}/pulls", self.project));

        let response = self
            .authorized(self.client.get(&url))
            .query(&[("head", head), ("base", base), ("state", "open")])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("No pull requests endpoint for {}", self.project);
            return Ok(None);
        }

        let prs: Vec<GhPullRequest> = decode(response).await?;

        Ok(prs
            .into_iter()
            .map(PullRequest::from)
            .find(|pr| pr.head_ref.as_deref().is_none_or(|h| h == head)))
    }

    async fn create_pr(&self, request: &CreatePullRequest) -> Result<PullRequest> {
        let url = self.api_url(&format!("/repos/{}/pulls", self.project));

        let response = self
            .authorized(self.client.post(&url))
            .json(request)
            .send()
            .await?;

        let pr: GhPullRequest = decode(response).await?;
        Ok(pr.into())
    }

    fn project(&self) -> &str {
        &self.project
    }
}
