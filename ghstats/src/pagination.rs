// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Collection of complete list resources page by page.
///
/// Pages are requested sequentially, most recently updated first, until the
/// API returns a page shorter than [`PAGE_SIZE`]. The first failing request
/// aborts the whole collection; already fetched pages are discarded.
use tracing::{debug, info};

use crate::{error::Error, http::Fetcher, models::RepositoryRecord};

/// Number of records requested per page, the API maximum.
pub const PAGE_SIZE: usize = 100;

/// Route listing the public repositories of `identity`.
pub fn user_repos_route(identity: &str,) -> String
{
    format!("/users/{identity}/repos")
}

fn page_query(page: u32,) -> [(&'static str, String,); 4]
{
    [
        ("page", page.to_string(),),
        ("per_page", PAGE_SIZE.to_string(),),
        ("sort", "updated".to_owned(),),
        ("direction", "desc".to_owned(),),
    ]
}

/// Applies the fork-inclusion policy to a batch of records.
///
/// With `include_forks == false` every record flagged as a fork is dropped.
/// Applying the policy twice yields the same records.
pub fn apply_fork_policy(
    records: Vec<RepositoryRecord,>,
    include_forks: bool,
) -> Vec<RepositoryRecord,>
{
    if include_forks {
        return records;
    }
    records.into_iter().filter(|record| !record.fork,).collect()
}

/// Fetches every page of the repository collection at `route`.
///
/// The fork policy is applied to each page before it is accumulated, while
/// termination is judged on the unfiltered page length so a page thinned out
/// by the filter does not end the collection early.
///
/// # Errors
///
/// Propagates the first [`Fetcher`] error unchanged and returns
/// [`Error::Decode`] when a page is not an array of repository records.
pub async fn fetch_all_repositories<F,>(
    fetcher: &F,
    route: &str,
    include_forks: bool,
) -> Result<Vec<RepositoryRecord,>, Error,>
where
    F: Fetcher,
{
    let mut repositories = Vec::new();
    let mut page = 1u32;

    loop {
        let body = fetcher.get_json(route, &page_query(page,),).await?;
        let records: Vec<RepositoryRecord,> = serde_json::from_value(body,).map_err(Error::decode,)?;
        let fetched = records.len();
        debug!(route, page, fetched, "fetched repository page");

        if fetched == 0 {
            break;
        }

        repositories.extend(apply_fork_policy(records, include_forks,),);

        if fetched < PAGE_SIZE {
            break;
        }
        page += 1;
    }

    info!(route, pages = page, kept = repositories.len(), include_forks, "collected repositories");
    Ok(repositories,)
}
