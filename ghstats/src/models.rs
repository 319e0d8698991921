// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Records decoded from the GitHub REST API.
///
/// Field names follow the API payloads so the records can be decoded verbatim
/// and serialized back unchanged for JSON output.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// Metadata of a single repository as returned by `/users/{user}/repos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct RepositoryRecord
{
    pub name:             String,
    #[serde(default)]
    pub description:      Option<String,>,
    #[serde(default)]
    pub language:         Option<String,>,
    pub stargazers_count: u64,
    pub forks_count:      u64,
    pub watchers_count:   u64,
    /// Repository size in kilobytes.
    pub size:             u64,
    pub fork:             bool,
    pub updated_at:       DateTime<Utc,>,
    /// Endpoint returning the per-language byte breakdown.
    pub languages_url:    String,
    #[serde(default)]
    pub html_url:         Option<String,>,
}

/// Public profile returned by `/users/{user}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
pub struct UserProfile
{
    #[serde(default)]
    pub name:         Option<String,>,
    pub login:        String,
    #[serde(default)]
    pub bio:          Option<String,>,
    #[serde(default)]
    pub location:     Option<String,>,
    #[serde(default)]
    pub company:      Option<String,>,
    #[serde(default)]
    pub blog:         Option<String,>,
    pub followers:    u64,
    pub following:    u64,
    pub public_repos: u64,
    pub created_at:   DateTime<Utc,>,
}

impl UserProfile
{
    /// Calendar date the account was created on.
    pub fn created_date(&self,) -> NaiveDate
    {
        self.created_at.date_naive()
    }
}

/// Per-language byte counts of one repository, in the order the API listed
/// them.
pub type LanguageBreakdown = Vec<(String, u64,),>;

/// Decodes a languages payload (`{"Rust": 1200, "Shell": 40}`) preserving key
/// order.
///
/// # Errors
///
/// Returns [`Error::Decode`] when the payload is not an object of unsigned
/// integers.
pub fn decode_language_breakdown(value: Value,) -> Result<LanguageBreakdown, Error,>
{
    let Value::Object(entries,) = value else {
        return Err(Error::decode("languages payload is not an object",),);
    };

    entries
        .into_iter()
        .map(|(language, bytes,)| {
            bytes
                .as_u64()
                .map(|count| (language.clone(), count,),)
                .ok_or_else(|| Error::decode(format!("byte count for '{language}' is not a number"),),)
        },)
        .collect()
}

/// Quota state as of the moment `/rate_limit` was queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize,)]
pub struct RateLimitSnapshot
{
    pub remaining: u64,
    pub limit:     u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_at:  Option<DateTime<Utc,>,>,
}

impl RateLimitSnapshot
{
    /// Share of the quota already consumed, in percent. A zero limit reports
    /// `0.0`.
    pub fn used_percent(&self,) -> f64
    {
        if self.limit == 0 {
            return 0.0;
        }
        let used = self.limit.saturating_sub(self.remaining,);
        used as f64 / self.limit as f64 * 100.0
    }

    /// Share of the quota still available, in percent. A zero limit reports
    /// `0.0`.
    pub fn remaining_percent(&self,) -> f64
    {
        if self.limit == 0 {
            return 0.0;
        }
        self.remaining as f64 / self.limit as f64 * 100.0
    }
}
