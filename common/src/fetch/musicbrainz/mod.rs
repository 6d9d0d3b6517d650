mod structures;

pub use structures::*;

use async_trait::async_trait;
use base::setting::MusicBrainz as MusicBrainzSettings;
use const_format::formatcp;
use governor::{clock::DefaultClock, middleware::NoOpMiddleware, state::*, Quota, RateLimiter};
use itertools::Itertools;
use reqwest::{header::USER_AGENT, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const MB_USER_AGENT: &str = formatcp!("{}/{} ( {} )", base::CLI_NAME, base::VERSION, base::GITHUB);

/// Artist id MusicBrainz reserves for compilations.
pub const VARIOUS_ARTISTS_ID: &str = "89ad4ac3-39f7-470e-963a-56509c546377";

pub const RELEASE_INCLUDES: &[&str] = &[
    "artists",
    "media",
    "recordings",
    "release-groups",
    "labels",
    "artist-credits",
    "aliases",
    "recording-level-rels",
    "work-rels",
    "work-level-rels",
    "artist-rels",
    "isrcs",
    "genres",
];

pub const BROWSE_INCLUDES: &[&str] = &[
    "artist-credits",
    "work-rels",
    "artist-rels",
    "recording-rels",
    "release-rels",
    "work-level-rels",
];

pub const TRACK_INCLUDES: &[&str] = &[
    "artists",
    "aliases",
    "isrcs",
    "work-rels",
    "work-level-rels",
    "artist-rels",
];

/// Search fields, sorted by key, as sent in the Lucene `query` parameter.
pub type Criteria = BTreeMap<&'static str, String>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("entity not found")]
    NotFound,
    #[error("MusicBrainz request returned non-success status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("MusicBrainz not reachable")]
    Http(#[from] reqwest::Error),
    #[error("error while decoding JSON at path {path}: {message}")]
    Decode { path: String, message: String },
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

/// The outbound calls the tagger makes against the MusicBrainz web service.
#[async_trait]
pub trait Api: Send + Sync {
    async fn search_releases(&self, criteria: &Criteria, limit: u32)
        -> Result<ReleaseSearch, ApiError>;

    async fn search_recordings(
        &self,
        criteria: &Criteria,
        limit: u32,
    ) -> Result<RecordingSearch, ApiError>;

    async fn get_release_by_id(&self, id: &str, includes: &[&str]) -> Result<Release, ApiError>;

    async fn get_recording_by_id(&self, id: &str, includes: &[&str])
        -> Result<Recording, ApiError>;

    async fn browse_recordings(
        &self,
        release: &str,
        includes: &[&str],
        limit: u32,
        offset: usize,
    ) -> Result<RecordingBrowse, ApiError>;
}

type Limiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

pub struct Client {
    http: reqwest::Client,
    base: Url,
    limiter: Option<Limiter>,
}

impl Client {
    pub fn new(settings: &MusicBrainzSettings) -> Result<Self, ApiError> {
        let scheme = if settings.https { "https" } else { "http" };
        let base = Url::parse(format!("{}://{}/ws/2/", scheme, settings.host).as_str())?;
        let http = reqwest::Client::builder().build()?;
        Ok(Client {
            http,
            base,
            limiter: limiter(settings.ratelimit, settings.ratelimit_interval),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let mut url = self.base.join(path)?;
        url.query_pairs_mut()
            .extend_pairs(params)
            .append_pair("fmt", "json");
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
        tracing::trace! {%url, "Sending MusicBrainz request"};
        let res = self
            .http
            .get(url)
            .header(USER_AGENT, MB_USER_AGENT)
            .send()
            .await?;
        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        if !status.is_success() {
            let body = res.text().await?;
            return Err(ApiError::Status { status, body });
        }
        let text = res.text().await?;
        decode(text.as_str())
    }
}

/// Requests are let through at most `count` every `interval` seconds.
/// A zero count or interval disables the limiter.
fn limiter(count: u32, interval: f64) -> Option<Limiter> {
    let burst = NonZeroU32::new(count)?;
    if !interval.is_finite() || interval <= 0.0 {
        return None;
    }
    let period = Duration::from_secs_f64(interval / count as f64);
    Quota::with_period(period).map(|q| RateLimiter::direct(q.allow_burst(burst)))
}

pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_path_to_error::deserialize(&mut serde_json::Deserializer::from_str(text)).map_err(|e| {
        ApiError::Decode {
            path: e.path().to_string(),
            message: e.inner().to_string(),
        }
    })
}

/// Escapes the characters Lucene treats as syntax.
pub fn lucene_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(
            c,
            '+' | '-' | '&' | '|' | '!' | '(' | ')' | '{' | '}' | '[' | ']' | '^' | '"' | '~'
                | '*' | '?' | ':' | '\\' | '/'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Builds `key:(value)` pairs in key order, skipping empty values.
pub fn lucene_query(criteria: &Criteria) -> String {
    criteria
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{}:({})", k, lucene_escape(v)))
        .join(" ")
}

#[async_trait]
impl Api for Client {
    async fn search_releases(
        &self,
        criteria: &Criteria,
        limit: u32,
    ) -> Result<ReleaseSearch, ApiError> {
        let query = lucene_query(criteria);
        tracing::debug! {%query, limit, "Searching for releases on MusicBrainz"};
        self.get(
            "release/",
            &[("query", query), ("limit", limit.to_string())],
        )
        .await
    }

    async fn search_recordings(
        &self,
        criteria: &Criteria,
        limit: u32,
    ) -> Result<RecordingSearch, ApiError> {
        let query = lucene_query(criteria);
        tracing::debug! {%query, limit, "Searching for recordings on MusicBrainz"};
        self.get(
            "recording/",
            &[("query", query), ("limit", limit.to_string())],
        )
        .await
    }

    async fn get_release_by_id(&self, id: &str, includes: &[&str]) -> Result<Release, ApiError> {
        self.get(
            format!("release/{}", id).as_str(),
            &[("inc", includes.join(" "))],
        )
        .await
    }

    async fn get_recording_by_id(
        &self,
        id: &str,
        includes: &[&str],
    ) -> Result<Recording, ApiError> {
        self.get(
            format!("recording/{}", id).as_str(),
            &[("inc", includes.join(" "))],
        )
        .await
    }

    async fn browse_recordings(
        &self,
        release: &str,
        includes: &[&str],
        limit: u32,
        offset: usize,
    ) -> Result<RecordingBrowse, ApiError> {
        self.get(
            "recording",
            &[
                ("release", release.to_string()),
                ("inc", includes.join(" ")),
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
            ],
        )
        .await
    }
}
