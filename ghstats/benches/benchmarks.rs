// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

use chrono::{Duration, TimeZone, Utc};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ghstats::{
    LanguageBreakdown, RepoStats, RepositoryRecord, SortKey, language_stats_from_breakdowns,
    top_repositories,
};

const LANGUAGES: [&str; 8] = ["Rust", "Python", "Go", "C", "TypeScript", "Shell", "HTML", "Ruby",];

fn repositories(count: usize,) -> Vec<RepositoryRecord,>
{
    let epoch = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0,).unwrap();
    (0..count)
        .map(|index| RepositoryRecord {
            name:             format!("repo-{index}"),
            description:      Some(format!("Repository number {index}"),),
            language:         Some(LANGUAGES[index % LANGUAGES.len()].to_owned(),),
            stargazers_count: (index * 37 % 1000) as u64,
            forks_count:      (index * 13 % 200) as u64,
            watchers_count:   (index * 37 % 1000) as u64,
            size:             (index * 101 % 50_000) as u64,
            fork:             index % 5 == 0,
            updated_at:       epoch + Duration::hours((index * 7 % 10_000) as i64,),
            languages_url:    format!("https://api.github.com/repos/bench/repo-{index}/languages"),
            html_url:         None,
        },)
        .collect()
}

fn breakdowns(count: usize,) -> Vec<LanguageBreakdown,>
{
    (0..count)
        .map(|index| {
            (0..3)
                .map(|offset| {
                    let language = LANGUAGES[(index + offset) % LANGUAGES.len()];
                    (language.to_owned(), ((index + 1) * (offset + 1) * 1024) as u64,)
                },)
                .collect()
        },)
        .collect()
}

fn benchmark_language_stats(c: &mut Criterion,)
{
    let input = breakdowns(500,);

    c.bench_function("language_stats_500_repos", |b| {
        b.iter(|| {
            let stats = language_stats_from_breakdowns(black_box(input.clone(),),);
            black_box(stats.languages.len(),)
        },)
    },);
}

fn benchmark_top_repositories(c: &mut Criterion,)
{
    let records = repositories(1000,);

    c.bench_function("top_10_by_stars_1000_repos", |b| {
        b.iter(|| top_repositories(black_box(&records,), SortKey::Stars, 10,),)
    },);

    c.bench_function("top_10_by_updated_1000_repos", |b| {
        b.iter(|| top_repositories(black_box(&records,), SortKey::Updated, 10,),)
    },);
}

fn benchmark_repo_stats(c: &mut Criterion,)
{
    let records = repositories(1000,);

    c.bench_function("repo_stats_1000_repos", |b| {
        b.iter(|| RepoStats::from_repositories(black_box(&records,),),)
    },);
}

criterion_group!(
    benches,
    benchmark_language_stats,
    benchmark_top_repositories,
    benchmark_repo_stats
);
criterion_main!(benches);
