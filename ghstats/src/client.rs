// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Statistics client bound to a single GitHub user.
///
/// Each query method performs its own full collection fetch. Callers that
/// need several statistics should take a [`RepositorySnapshot`] once and
/// derive from it instead.
use tracing::info;

use crate::{
    aggregate::{LanguageStats, RepoStats, RepositorySnapshot, SortKey},
    config::{ClientConfig, normalize_identity},
    error::Error,
    http::{Fetcher, GithubFetcher},
    models::{RateLimitSnapshot, RepositoryRecord, UserProfile},
    pagination::{fetch_all_repositories, user_repos_route},
    rate_limit::fetch_rate_limit,
};

/// Queries the profile and repositories of one user.
///
/// # Example
///
/// ```no_run
/// use ghstats::{ClientConfig, StatsClient};
///
/// # async fn example() -> Result<(), ghstats::Error> {
/// let client = StatsClient::connect(&ClientConfig::default(), "octocat",)?;
/// let totals = client.repo_stats(false,).await?;
/// println!("{} stars across {} repositories", totals.total_stars, totals.total_repos);
/// # Ok(())
/// # }
/// ```
pub struct StatsClient<F = GithubFetcher,>
{
    fetcher:  F,
    identity: String,
}

impl StatsClient<GithubFetcher,>
{
    /// Validates `identity` and builds a client talking to the configured API.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a malformed username or API URL and
    /// [`Error::Network`] when the HTTP client cannot be initialized.
    pub fn connect(config: &ClientConfig, identity: &str,) -> Result<Self, Error,>
    {
        let identity = normalize_identity(identity,)?;
        let fetcher = GithubFetcher::new(config, Some(&identity,),)?;
        Ok(Self {
            fetcher,
            identity,
        },)
    }
}

impl<F,> StatsClient<F,>
where
    F: Fetcher,
{
    /// Wraps an existing fetcher; `identity` is validated like in
    /// [`StatsClient::connect`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a malformed username.
    pub fn with_fetcher(fetcher: F, identity: &str,) -> Result<Self, Error,>
    {
        Ok(Self {
            fetcher,
            identity: normalize_identity(identity,)?,
        },)
    }

    pub fn identity(&self,) -> &str
    {
        &self.identity
    }

    pub fn fetcher(&self,) -> &F
    {
        &self.fetcher
    }

    /// Fetches the user's public profile.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for unknown users and propagates any other
    /// fetch or decode failure.
    pub async fn user_profile(&self,) -> Result<UserProfile, Error,>
    {
        let body = self.fetcher.get_json(&format!("/users/{}", self.identity), &[],).await?;
        serde_json::from_value(body,).map_err(Error::decode,)
    }

    /// Fetches every repository of the user, filtered by the fork policy.
    ///
    /// # Errors
    ///
    /// Propagates the first failing page request.
    pub async fn repositories(&self, include_forks: bool,) -> Result<Vec<RepositoryRecord,>, Error,>
    {
        fetch_all_repositories(&self.fetcher, &user_repos_route(&self.identity,), include_forks,)
            .await
    }

    /// Fetches the repository collection once for later derivations.
    ///
    /// # Errors
    ///
    /// Propagates the first failing page request.
    pub async fn snapshot(&self, include_forks: bool,) -> Result<RepositorySnapshot, Error,>
    {
        let repositories = self.repositories(include_forks,).await?;
        info!(user = %self.identity, repositories = repositories.len(), "took repository snapshot");
        Ok(RepositorySnapshot::new(repositories, include_forks,),)
    }

    /// Language usage by bytes across the user's repositories.
    ///
    /// # Errors
    ///
    /// Propagates collection and per-repository language fetch failures.
    pub async fn language_stats(&self, include_forks: bool,) -> Result<LanguageStats, Error,>
    {
        self.snapshot(include_forks,).await?.language_stats(&self.fetcher,).await
    }

    /// Star, fork, watcher and size totals.
    ///
    /// # Errors
    ///
    /// Propagates collection failures.
    pub async fn repo_stats(&self, include_forks: bool,) -> Result<RepoStats, Error,>
    {
        Ok(self.snapshot(include_forks,).await?.repo_stats(),)
    }

    /// The `limit` highest ranked repositories for `key`.
    ///
    /// # Errors
    ///
    /// Propagates collection failures.
    pub async fn top_repositories(
        &self,
        limit: usize,
        key: SortKey,
        include_forks: bool,
    ) -> Result<Vec<RepositoryRecord,>, Error,>
    {
        Ok(self.snapshot(include_forks,).await?.top(key, limit,),)
    }

    /// Current quota of the credential the client was built with.
    ///
    /// # Errors
    ///
    /// Propagates the fetch failure.
    pub async fn rate_limit(&self,) -> Result<RateLimitSnapshot, Error,>
    {
        fetch_rate_limit(&self.fetcher,).await
    }
}
