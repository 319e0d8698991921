// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Single-request access to the GitHub REST API.
///
/// [`Fetcher`] is the seam between the aggregation code and the network.
/// [`GithubFetcher`] implements it on top of `octocrab` with the built-in
/// retry layer switched off: every failure is reported to the caller as-is.
/// The error kind follows the HTTP status; the body of a failed response only
/// contributes its message.
use std::future::Future;

use http::{
    StatusCode, Uri,
    header::{ACCEPT, AUTHORIZATION},
};
use octocrab::{Octocrab, service::middleware::retry::RetryConfig};
use serde_json::Value;
use tracing::debug;
use url::form_urlencoded;

use crate::{
    config::ClientConfig,
    error::{Error, status_error},
};

/// Media type requested from the API.
pub const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";

/// Query string parameters attached to a request.
pub type Query = [(&'static str, String,)];

/// Issues one GET request and returns the decoded JSON body.
///
/// `route` is either an absolute URL (as found in `languages_url`) or a path
/// relative to the configured API base.
pub trait Fetcher
{
    fn get_json(&self, route: &str, query: &Query,)
    -> impl Future<Output = Result<Value, Error,>,> + Send;
}

/// [`Fetcher`] backed by an authenticated [`Octocrab`] client.
#[derive(Clone,)]
pub struct GithubFetcher
{
    client:   Octocrab,
    identity: Option<String,>,
}

impl GithubFetcher
{
    /// Builds a fetcher from the resolved client configuration.
    ///
    /// `identity` is the username requests are made for; a 404 is reported as
    /// [`Error::NotFound`] for it. Without an identity a 404 is a plain
    /// [`Error::RemoteApi`].
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an unusable `api_url` and
    /// [`Error::Network`] when the HTTP stack cannot be initialized.
    pub fn new(config: &ClientConfig, identity: Option<&str,>,) -> Result<Self, Error,>
    {
        let mut builder = Octocrab::builder()
            .base_uri(config.api_url.as_str(),)
            .map_err(|e| Error::validation(format!("invalid api_url '{}': {e}", config.api_url),),)?
            .add_header(ACCEPT, ACCEPT_HEADER.to_owned(),)
            .add_retry_config(RetryConfig::None,)
            .set_connect_timeout(Some(config.timeout,),)
            .set_read_timeout(Some(config.timeout,),);

        if let Some(token,) = config.token.as_deref() {
            builder = builder.add_header(AUTHORIZATION, format!("token {token}"),);
        }

        let client = builder.build().map_err(Error::network,)?;

        Ok(Self {
            client,
            identity: identity.map(str::to_owned,),
        },)
    }

    /// Maps a non-success status to an error; `body` only supplies the
    /// message and may be empty or not JSON at all.
    fn status_failure(&self, status: StatusCode, body: &str,) -> Error
    {
        let message = serde_json::from_str::<Value,>(body,)
            .ok()
            .and_then(|payload| payload.get("message",)?.as_str().map(str::to_owned,),)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unexpected status",).to_owned(),);

        let status = status.as_u16();
        match self.identity.as_deref() {
            Some(identity,) => status_error(status, &message, identity,),
            None if status == 403 => Error::QuotaExceeded,
            None => Error::remote_api(status, message,),
        }
    }
}

/// Appends `query` to `route` as an urlencoded query string.
fn request_uri(route: &str, query: &Query,) -> Result<Uri, Error,>
{
    let mut uri = route.to_owned();
    if !query.is_empty() {
        let encoded = form_urlencoded::Serializer::new(String::new(),)
            .extend_pairs(query.iter().map(|(name, value,)| (*name, value.as_str(),),),)
            .finish();
        uri.push(if uri.contains('?',) { '&' } else { '?' },);
        uri.push_str(&encoded,);
    }
    Uri::try_from(uri.as_str(),)
        .map_err(|e| Error::validation(format!("invalid request URI '{uri}': {e}"),),)
}

fn transport_error(error: octocrab::Error,) -> Error
{
    match error {
        octocrab::Error::InvalidUtf8 {
            source, ..
        } => Error::decode(source,),
        other => Error::network(other,),
    }
}

impl Fetcher for GithubFetcher
{
    async fn get_json(&self, route: &str, query: &Query,) -> Result<Value, Error,>
    {
        debug!(route, params = query.len(), "GET");

        let uri = request_uri(route, query,)?;
        let response = self.client._get(uri,).await.map_err(transport_error,)?;
        let status = response.status();
        let body = self.client.body_to_string(response,).await;

        if !status.is_success() {
            debug!(route, status = status.as_u16(), "request failed");
            return Err(self.status_failure(status, body.as_deref().unwrap_or("",),),);
        }

        let body = body.map_err(transport_error,)?;
        serde_json::from_str(&body,).map_err(Error::decode,)
    }
}
