// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Statistics derived from a repository collection.
///
/// All reductions operate on an already filtered set. [`RepositorySnapshot`]
/// holds such a set so several statistics can be derived from a single
/// collection fetch.
use std::{cmp::Ordering, collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::Error,
    http::Fetcher,
    models::{LanguageBreakdown, RepositoryRecord, decode_language_breakdown},
};

/// Metric used to rank repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SortKey
{
    #[default]
    Stars,
    Forks,
    Watchers,
    Size,
    Updated,
}

impl SortKey
{
    /// Every key, in display order.
    pub const ALL: [SortKey; 5] =
        [SortKey::Stars, SortKey::Forks, SortKey::Watchers, SortKey::Size, SortKey::Updated,];

    /// Resolves a key by name; unrecognized names fall back to
    /// [`SortKey::Stars`].
    pub fn from_name(name: &str,) -> Self
    {
        match name.trim().to_ascii_lowercase().as_str() {
            "forks" => Self::Forks,
            "watchers" => Self::Watchers,
            "size" => Self::Size,
            "updated" => Self::Updated,
            _ => Self::Stars,
        }
    }

    /// Lowercase name of the key.
    pub fn as_str(self,) -> &'static str
    {
        match self {
            Self::Stars => "stars",
            Self::Forks => "forks",
            Self::Watchers => "watchers",
            Self::Size => "size",
            Self::Updated => "updated",
        }
    }

    /// Orders `a` before `b` when `a` ranks higher for this metric.
    fn compare_descending(self, a: &RepositoryRecord, b: &RepositoryRecord,) -> Ordering
    {
        match self {
            Self::Stars => b.stargazers_count.cmp(&a.stargazers_count,),
            Self::Forks => b.forks_count.cmp(&a.forks_count,),
            Self::Watchers => b.watchers_count.cmp(&a.watchers_count,),
            Self::Size => b.size.cmp(&a.size,),
            Self::Updated => b.updated_at.cmp(&a.updated_at,),
        }
    }
}

impl From<String,> for SortKey
{
    fn from(name: String,) -> Self
    {
        Self::from_name(&name,)
    }
}

impl FromStr for SortKey
{
    type Err = std::convert::Infallible;

    fn from_str(name: &str,) -> Result<Self, Self::Err,>
    {
        Ok(Self::from_name(name,),)
    }
}

impl fmt::Display for SortKey
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.write_str(self.as_str(),)
    }
}

/// Totals over a repository set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize,)]
pub struct RepoStats
{
    pub total_repos:    usize,
    pub total_stars:    u64,
    pub total_forks:    u64,
    pub total_watchers: u64,
    pub total_size_kb:  u64,
}

impl RepoStats
{
    /// Sums the counters of `repositories`; an empty set yields zeros.
    pub fn from_repositories(repositories: &[RepositoryRecord],) -> Self
    {
        repositories.iter().fold(
            Self {
                total_repos: repositories.len(), ..Self::default()
            },
            |mut totals, record| {
                totals.total_stars += record.stargazers_count;
                totals.total_forks += record.forks_count;
                totals.total_watchers += record.watchers_count;
                totals.total_size_kb += record.size;
                totals
            },
        )
    }
}

/// One language's share of the aggregated byte count.
#[derive(Debug, Clone, PartialEq, Serialize,)]
pub struct LanguageShare
{
    pub language:   String,
    pub bytes:      u64,
    pub percentage: f64,
}

/// Language usage across a repository set, largest share first.
#[derive(Debug, Clone, Default, PartialEq, Serialize,)]
pub struct LanguageStats
{
    pub total_bytes: u64,
    pub languages:   Vec<LanguageShare,>,
}

impl LanguageStats
{
    pub fn is_empty(&self,) -> bool
    {
        self.languages.is_empty()
    }

    /// The `limit` largest shares.
    pub fn top(&self, limit: usize,) -> &[LanguageShare]
    {
        &self.languages[..limit.min(self.languages.len(),)]
    }

    /// Percentage recorded for `language`, if present.
    pub fn percentage_of(&self, language: &str,) -> Option<f64,>
    {
        self.languages
            .iter()
            .find(|share| share.language == language,)
            .map(|share| share.percentage,)
    }
}

/// Running per-language byte totals that remember first-seen order.
#[derive(Debug, Default,)]
pub struct LanguageAccumulator
{
    order:  Vec<(String, u64,),>,
    lookup: HashMap<String, usize,>,
}

impl LanguageAccumulator
{
    /// Adds one repository's breakdown to the running totals.
    pub fn add(&mut self, breakdown: LanguageBreakdown,)
    {
        for (language, bytes,) in breakdown {
            match self.lookup.get(&language,) {
                Some(&index,) => self.order[index].1 += bytes,
                None => {
                    self.lookup.insert(language.clone(), self.order.len(),);
                    self.order.push((language, bytes,),);
                }
            }
        }
    }

    /// Converts the totals into percentages ordered by descending bytes.
    ///
    /// Ties keep first-seen order. A zero grand total yields an empty result.
    pub fn finish(self,) -> LanguageStats
    {
        let total_bytes: u64 = self.order.iter().map(|(_, bytes,)| bytes,).sum();
        if total_bytes == 0 {
            return LanguageStats::default();
        }

        let mut order = self.order;
        order.sort_by(|a, b| b.1.cmp(&a.1,),);

        let languages = order
            .into_iter()
            .map(|(language, bytes,)| LanguageShare {
                percentage: bytes as f64 / total_bytes as f64 * 100.0,
                language,
                bytes,
            },)
            .collect();

        LanguageStats {
            total_bytes,
            languages,
        }
    }
}

/// Reduces in-memory breakdowns into language statistics.
pub fn language_stats_from_breakdowns<I,>(breakdowns: I,) -> LanguageStats
where
    I: IntoIterator<Item = LanguageBreakdown,>,
{
    let mut accumulator = LanguageAccumulator::default();
    for breakdown in breakdowns {
        accumulator.add(breakdown,);
    }
    accumulator.finish()
}

/// Fetches the language breakdown of every repository, one request each, and
/// reduces them into language statistics.
///
/// # Errors
///
/// Propagates the first fetch or decode failure.
pub async fn collect_language_stats<F,>(
    fetcher: &F,
    repositories: &[RepositoryRecord],
) -> Result<LanguageStats, Error,>
where
    F: Fetcher,
{
    let mut accumulator = LanguageAccumulator::default();
    for record in repositories {
        let body = fetcher.get_json(&record.languages_url, &[],).await?;
        accumulator.add(decode_language_breakdown(body,)?,);
    }

    let stats = accumulator.finish();
    debug!(
        repositories = repositories.len(),
        languages = stats.languages.len(),
        total_bytes = stats.total_bytes,
        "aggregated language usage"
    );
    Ok(stats,)
}

/// Returns at most `limit` repositories ranked by `key`, highest first.
///
/// The sort is stable, so ties keep their input order.
pub fn top_repositories(
    repositories: &[RepositoryRecord],
    key: SortKey,
    limit: usize,
) -> Vec<RepositoryRecord,>
{
    let mut ranked = repositories.to_vec();
    ranked.sort_by(|a, b| key.compare_descending(a, b,),);
    ranked.truncate(limit,);
    ranked
}

/// A filtered repository set fetched once and reused for every derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct RepositorySnapshot
{
    include_forks: bool,
    repositories:  Vec<RepositoryRecord,>,
}

impl RepositorySnapshot
{
    /// Wraps an already filtered set; `include_forks` records the policy it
    /// was filtered with.
    pub fn new(repositories: Vec<RepositoryRecord,>, include_forks: bool,) -> Self
    {
        Self {
            include_forks,
            repositories,
        }
    }

    pub fn include_forks(&self,) -> bool
    {
        self.include_forks
    }

    pub fn repositories(&self,) -> &[RepositoryRecord]
    {
        &self.repositories
    }

    pub fn repo_stats(&self,) -> RepoStats
    {
        RepoStats::from_repositories(&self.repositories,)
    }

    pub fn top(&self, key: SortKey, limit: usize,) -> Vec<RepositoryRecord,>
    {
        top_repositories(&self.repositories, key, limit,)
    }

    /// Fetches per-repository language data for the snapshot's set.
    ///
    /// # Errors
    ///
    /// Propagates the first fetch or decode failure.
    pub async fn language_stats<F,>(&self, fetcher: &F,) -> Result<LanguageStats, Error,>
    where
        F: Fetcher,
    {
        collect_language_stats(fetcher, &self.repositories,).await
    }
}

#[cfg(test)]
mod tests
{
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::{http::tests::FakeFetcher, models::tests::repo};

    fn breakdown(entries: &[(&str, u64,)],) -> LanguageBreakdown
    {
        entries.iter().map(|(name, bytes,)| ((*name).to_owned(), *bytes,),).collect()
    }

    #[test]
    fn language_percentages_follow_byte_share()
    {
        let stats = language_stats_from_breakdowns([breakdown(&[("Python", 300,), ("Go", 100,)],)],);

        assert_eq!(stats.total_bytes, 400);
        assert_eq!(stats.languages[0].language, "Python");
        assert_eq!(stats.percentage_of("Python"), Some(75.0));
        assert_eq!(stats.percentage_of("Go"), Some(25.0));
    }

    #[test]
    fn languages_are_summed_across_repositories()
    {
        let stats = language_stats_from_breakdowns([
            breakdown(&[("Rust", 100,), ("Shell", 50,)],),
            breakdown(&[("Shell", 100,), ("C", 50,)],),
        ],);

        let order: Vec<_,> = stats.languages.iter().map(|share| share.language.as_str(),).collect();
        assert_eq!(order, ["Shell", "Rust", "C"]);
        assert_eq!(stats.languages[0].bytes, 150);
    }

    #[test]
    fn ties_keep_first_seen_order()
    {
        let stats = language_stats_from_breakdowns([
            breakdown(&[("Zig", 10,)],),
            breakdown(&[("Ada", 10,), ("Zig", 0,)],),
        ],);

        let order: Vec<_,> = stats.languages.iter().map(|share| share.language.as_str(),).collect();
        assert_eq!(order, ["Zig", "Ada"]);
    }

    #[test]
    fn zero_bytes_yield_empty_stats()
    {
        assert!(language_stats_from_breakdowns(Vec::<LanguageBreakdown,>::new()).is_empty());
        let stats = language_stats_from_breakdowns([breakdown(&[("Rust", 0,)],)],);
        assert!(stats.is_empty());
        assert_eq!(stats.total_bytes, 0);
    }

    #[test]
    fn top_slice_never_exceeds_available_languages()
    {
        let stats = language_stats_from_breakdowns([breakdown(&[("Rust", 2,), ("C", 1,)],)],);
        assert_eq!(stats.top(1,).len(), 1);
        assert_eq!(stats.top(10,).len(), 2);
    }

    #[test]
    fn repo_stats_sum_counters()
    {
        let mut first = repo("a", 10, false,);
        first.forks_count = 2;
        first.size = 100;
        let mut second = repo("b", 5, false,);
        second.forks_count = 1;
        second.size = 50;

        let stats = RepoStats::from_repositories(&[first, second,],);
        assert_eq!(stats, RepoStats {
            total_repos:    2,
            total_stars:    15,
            total_forks:    3,
            total_watchers: 15,
            total_size_kb:  150,
        });
    }

    #[test]
    fn repo_stats_of_empty_set_are_zero()
    {
        assert_eq!(RepoStats::from_repositories(&[],), RepoStats::default());
    }

    #[test]
    fn top_one_by_stars_after_excluding_forks()
    {
        let repositories = crate::pagination::apply_fork_policy(
            vec![repo("ten", 10, false,), repo("fifty", 50, true,), repo("five", 5, false,)],
            false,
        );

        let top = top_repositories(&repositories, SortKey::Stars, 1,);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].name, "ten");
        assert_eq!(top[0].stargazers_count, 10);
    }

    #[test]
    fn top_handles_limits_beyond_set_size()
    {
        let repositories = vec![repo("a", 1, false,), repo("b", 2, false,)];
        let top = top_repositories(&repositories, SortKey::Stars, 50,);
        let names: Vec<_,> = top.iter().map(|record| record.name.as_str(),).collect();
        assert_eq!(names, ["b", "a"]);
        assert!(top_repositories(&repositories, SortKey::Stars, 0,).is_empty());
    }

    #[test]
    fn top_sort_is_stable_for_ties()
    {
        let repositories = vec![repo("first", 3, false,), repo("second", 3, false,), repo("third", 9, false,)];
        let top = top_repositories(&repositories, SortKey::Stars, 3,);
        let names: Vec<_,> = top.iter().map(|record| record.name.as_str(),).collect();
        assert_eq!(names, ["third", "first", "second"]);
    }

    #[test]
    fn updated_key_compares_instants()
    {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0,).unwrap();
        let mut old = repo("old", 0, false,);
        old.updated_at = base - Duration::days(30,);
        let mut new = repo("new", 0, false,);
        new.updated_at = base;

        let top = top_repositories(&[old, new,], SortKey::Updated, 2,);
        assert_eq!(top[0].name, "new");
    }

    #[test]
    fn each_key_ranks_by_its_own_field()
    {
        let mut small = repo("small", 100, false,);
        small.forks_count = 1;
        small.watchers_count = 1;
        small.size = 1;
        let mut large = repo("large", 1, false,);
        large.forks_count = 9;
        large.watchers_count = 9;
        large.size = 9;
        let repositories = [small, large,];

        for key in [SortKey::Forks, SortKey::Watchers, SortKey::Size,] {
            assert_eq!(top_repositories(&repositories, key, 1,)[0].name, "large", "{key}");
        }
        assert_eq!(top_repositories(&repositories, SortKey::Stars, 1,)[0].name, "small");
    }

    #[test]
    fn unknown_sort_key_falls_back_to_stars()
    {
        assert_eq!(SortKey::from_name("popularity"), SortKey::Stars);
        assert_eq!(SortKey::from_name(""), SortKey::Stars);
        assert_eq!(SortKey::from_name(" Forks "), SortKey::Forks);
        assert_eq!("updated".parse::<SortKey>(), Ok(SortKey::Updated));

        let key: SortKey = serde_yaml::from_str("nonsense",).expect("lenient decode",);
        assert_eq!(key, SortKey::Stars);
        assert_eq!(serde_json::to_string(&SortKey::Watchers,).expect("serialize",), "\"watchers\"");
    }

    #[tokio::test]
    async fn collects_languages_with_one_request_per_repository()
    {
        let repositories = vec![repo("a", 1, false,), repo("b", 1, false,)];
        let fetcher = FakeFetcher::default()
            .respond(&repositories[0].languages_url, None, json!({"Python": 200, "Go": 100}),)
            .respond(&repositories[1].languages_url, None, json!({"Python": 100}),);

        let stats = collect_language_stats(&fetcher, &repositories,).await.expect("stats",);

        assert_eq!(fetcher.calls().len(), 2);
        assert_eq!(stats.percentage_of("Python"), Some(75.0));
        assert_eq!(stats.percentage_of("Go"), Some(25.0));
    }

    #[tokio::test]
    async fn language_fetch_failure_propagates()
    {
        let repositories = vec![repo("a", 1, false,)];
        let fetcher = FakeFetcher::default().fail(&repositories[0].languages_url, None, 500,);

        let error = collect_language_stats(&fetcher, &repositories,).await.expect_err("failure",);
        assert!(matches!(error, Error::RemoteApi { status: 500, .. }));
    }

    #[tokio::test]
    async fn snapshot_derivations_match_direct_reductions()
    {
        let repositories = vec![repo("a", 4, false,), repo("b", 8, false,)];
        let fetcher = FakeFetcher::default()
            .respond(&repositories[0].languages_url, None, json!({"Rust": 1}),)
            .respond(&repositories[1].languages_url, None, json!({"Rust": 3}),);
        let snapshot = RepositorySnapshot::new(repositories.clone(), false,);

        assert!(!snapshot.include_forks());
        assert_eq!(snapshot.repo_stats(), RepoStats::from_repositories(&repositories,));
        assert_eq!(snapshot.top(SortKey::Stars, 1,), top_repositories(&repositories, SortKey::Stars, 1,));
        let stats = snapshot.language_stats(&fetcher,).await.expect("stats",);
        assert_eq!(stats.percentage_of("Rust"), Some(100.0));
    }

    proptest! {
        #[test]
        fn percentages_sum_to_one_hundred(counts in proptest::collection::vec(
            proptest::collection::vec(0u64..1_000_000, 0..6), 0..8,
        )) {
            let breakdowns: Vec<LanguageBreakdown> = counts
                .iter()
                .map(|repository| repository
                    .iter()
                    .enumerate()
                    .map(|(index, bytes)| (format!("lang{index}"), *bytes))
                    .collect())
                .collect();
            let total: u64 = counts.iter().flatten().sum();

            let stats = language_stats_from_breakdowns(breakdowns);
            let sum: f64 = stats.languages.iter().map(|share| share.percentage).sum();

            if total == 0 {
                prop_assert!(stats.is_empty());
            } else {
                prop_assert!((sum - 100.0).abs() <= 0.01, "sum was {}", sum);
                prop_assert!(stats.languages.windows(2).all(|pair| pair[0].bytes >= pair[1].bytes));
            }
        }

        #[test]
        fn top_returns_min_of_limit_and_set_size(
            stars in proptest::collection::vec(0u64..1000, 0..30),
            limit in 0usize..40,
            key_index in 0usize..5,
        ) {
            let repositories: Vec<_> = stars
                .iter()
                .enumerate()
                .map(|(index, count)| repo(&format!("r{index}"), *count, false))
                .collect();
            let key = SortKey::ALL[key_index];

            let top = top_repositories(&repositories, key, limit);

            prop_assert_eq!(top.len(), limit.min(repositories.len()));
            prop_assert!(top.windows(2).all(|pair| key.compare_descending(&pair[0], &pair[1]) != Ordering::Greater));
        }
    }
}
