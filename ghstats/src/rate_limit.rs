// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Remaining-quota lookups against `/rate_limit`.
///
/// Snapshots are never cached; every display re-queries the endpoint.
use chrono::DateTime;
use serde::Deserialize;
use tracing::debug;

use crate::{error::Error, http::Fetcher, models::RateLimitSnapshot};

/// Route reporting the caller's quota.
pub const RATE_LIMIT_ROUTE: &str = "/rate_limit";

#[derive(Debug, Deserialize,)]
struct RateLimitResponse
{
    rate: RateLimitBody,
}

#[derive(Debug, Deserialize,)]
struct RateLimitBody
{
    limit:     u64,
    remaining: u64,
    #[serde(default)]
    reset:     Option<i64,>,
}

/// Fetches the current quota snapshot.
///
/// # Errors
///
/// Propagates the [`Fetcher`] error and returns [`Error::Decode`] when the
/// payload lacks the `rate` object.
pub async fn fetch_rate_limit<F,>(fetcher: &F,) -> Result<RateLimitSnapshot, Error,>
where
    F: Fetcher,
{
    let body = fetcher.get_json(RATE_LIMIT_ROUTE, &[],).await?;
    let response: RateLimitResponse = serde_json::from_value(body,).map_err(Error::decode,)?;

    let snapshot = RateLimitSnapshot {
        remaining: response.rate.remaining,
        limit:     response.rate.limit,
        reset_at:  response.rate.reset.and_then(|seconds| DateTime::from_timestamp(seconds, 0,),),
    };
    debug!(remaining = snapshot.remaining, limit = snapshot.limit, "fetched rate limit");

    Ok(snapshot,)
}
