// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Client and aggregation helpers for GitHub user statistics.
//!
//! The library fetches a user's public profile and repositories from the
//! GitHub REST API, follows pagination to completion and derives language
//! usage, repository totals and top-N rankings from the collected records.
//! All network access goes through the [`Fetcher`] trait so aggregation can
//! be exercised against canned responses.

mod aggregate;
mod client;
mod config;
mod error;
mod http;
mod models;
mod pagination;
mod rate_limit;
mod render;

pub use aggregate::{
    LanguageAccumulator, LanguageShare, LanguageStats, RepoStats, RepositorySnapshot, SortKey,
    collect_language_stats, language_stats_from_breakdowns, top_repositories,
};
pub use client::StatsClient;
pub use config::{
    ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, Settings, load_settings,
    normalize_identity, parse_settings,
};
pub use error::{Error, io_error, output_error, status_error};
pub use http::{ACCEPT_HEADER, Fetcher, GithubFetcher, Query};
pub use models::{
    LanguageBreakdown, RateLimitSnapshot, RepositoryRecord, UserProfile, decode_language_breakdown,
};
pub use pagination::{PAGE_SIZE, apply_fork_policy, fetch_all_repositories, user_repos_route};
pub use rate_limit::{RATE_LIMIT_ROUTE, fetch_rate_limit};
pub use render::{TextRenderer, language_color, write_json};
