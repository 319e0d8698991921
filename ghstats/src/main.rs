// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Command-line interface for the ghstats binary.
//!
//! Each subcommand fetches what it needs for one user, renders it as text or
//! JSON on stdout and finishes with the current API quota.

use std::{
    io::{self, Write},
    path::PathBuf,
    process,
};

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use ghstats::{
    ClientConfig, Error, GithubFetcher, LanguageShare, LanguageStats, RateLimitSnapshot,
    RepoStats, RepositoryRecord, Settings, SortKey, StatsClient, TextRenderer, UserProfile,
    fetch_rate_limit, load_settings, output_error, write_json,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Repositories listed by `overview` unless `--top-repos` is given.
const OVERVIEW_TOP_REPOS: usize = 5;

/// Command line interface for inspecting GitHub user statistics.
#[derive(Debug, Parser,)]
#[command(name = "ghstats", version, about = "Fetch and display GitHub user and repository statistics")]
struct Cli
{
    #[command(subcommand)]
    command: Command,

    /// GitHub personal access token.
    #[arg(long = "token", short = 't', env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    token: Option<String,>,

    /// Path to a YAML settings file.
    #[arg(long = "config", value_name = "PATH", global = true)]
    config: Option<PathBuf,>,

    /// Output format written to stdout.
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Disable ANSI colors in text output.
    #[arg(long = "no-color", action = ArgAction::SetTrue, global = true)]
    no_color: bool,

    /// Enable debug logging on stderr.
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue, global = true)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum,)]
enum OutputFormat
{
    Text,
    Json,
}

#[derive(Debug, Subcommand,)]
/// Supported commands exposed by the CLI.
enum Command
{
    /// Display user profile information.
    User(UserArgs,),
    /// Display language usage across the user's repositories.
    Languages(LanguagesArgs,),
    /// Display repository totals.
    Repos(ReposArgs,),
    /// Display the highest ranked repositories.
    Top(TopArgs,),
    /// Display profile, totals, languages and top repositories together.
    Overview(OverviewArgs,),
    /// Check the current API rate limit.
    #[command(name = "rate-limit")]
    RateLimit,
}

#[derive(Debug, Args,)]
struct UserArgs
{
    /// GitHub username.
    username: String,
}

#[derive(Debug, Args, Default,)]
struct ForkArgs
{
    /// Include forked repositories.
    #[arg(long = "forks", action = ArgAction::SetTrue)]
    forks: bool,
}

#[derive(Debug, Args,)]
struct LanguagesArgs
{
    /// GitHub username.
    username: String,

    /// Number of languages to display.
    #[arg(long = "limit", short = 'l', value_name = "N")]
    limit: Option<usize,>,

    #[command(flatten)]
    forks: ForkArgs,
}

#[derive(Debug, Args,)]
struct ReposArgs
{
    /// GitHub username.
    username: String,

    #[command(flatten)]
    forks: ForkArgs,
}

#[derive(Debug, Args,)]
struct TopArgs
{
    /// GitHub username.
    username: String,

    /// Number of repositories to display.
    #[arg(long = "limit", short = 'l', value_name = "N")]
    limit: Option<usize,>,

    /// Ranking metric: stars, forks, watchers, size or updated.
    #[arg(long = "sort", short = 's', value_name = "KEY")]
    sort: Option<SortKey,>,

    #[command(flatten)]
    forks: ForkArgs,
}

#[derive(Debug, Args,)]
struct OverviewArgs
{
    /// GitHub username.
    username: String,

    /// Number of top repositories to show [default: 5].
    #[arg(long = "top-repos", short = 'r', value_name = "N")]
    top_repos: Option<usize,>,

    /// Number of top languages to show.
    #[arg(long = "top-langs", short = 'l', value_name = "N")]
    top_langs: Option<usize,>,

    #[command(flatten)]
    forks: ForkArgs,
}

#[derive(Debug, Serialize,)]
struct ProfileReport<'a,>
{
    profile:    &'a UserProfile,
    rate_limit: &'a RateLimitSnapshot,
}

#[derive(Debug, Serialize,)]
struct LanguageReport<'a,>
{
    total_bytes: u64,
    languages:   &'a [LanguageShare],
    rate_limit:  &'a RateLimitSnapshot,
}

#[derive(Debug, Serialize,)]
struct TotalsReport<'a,>
{
    repo_stats: &'a RepoStats,
    rate_limit: &'a RateLimitSnapshot,
}

#[derive(Debug, Serialize,)]
struct TopReport<'a,>
{
    sort:         SortKey,
    repositories: &'a [RepositoryRecord],
    rate_limit:   &'a RateLimitSnapshot,
}

#[derive(Debug, Serialize,)]
struct OverviewReport<'a,>
{
    profile:          &'a UserProfile,
    repo_stats:       &'a RepoStats,
    languages:        &'a [LanguageShare],
    top_repositories: &'a [RepositoryRecord],
    rate_limit:       &'a RateLimitSnapshot,
}

#[derive(Debug, Serialize,)]
struct QuotaReport<'a,>
{
    #[serde(flatten)]
    rate_limit:    &'a RateLimitSnapshot,
    used_percent:  f64,
    authenticated: bool,
}

/// Rendering choices shared by every command.
#[derive(Debug, Clone, Copy,)]
struct Output
{
    format:   OutputFormat,
    renderer: TextRenderer,
}

impl Output
{
    fn new(format: OutputFormat, colors: bool,) -> Self
    {
        Self {
            format,
            renderer: TextRenderer::new(colors && format == OutputFormat::Text,),
        }
    }

    /// Writes `report` as JSON or the text produced by `text`.
    fn emit<W, T, R,>(&self, writer: &mut W, report: &T, text: R,) -> Result<(), Error,>
    where
        W: Write,
        T: Serialize,
        R: FnOnce(&TextRenderer,) -> String,
    {
        match self.format {
            OutputFormat::Json => write_json(writer, report,),
            OutputFormat::Text => writeln!(writer, "{}", text(&self.renderer)).map_err(output_error,),
        }
    }

    /// Runs `task` behind a stderr spinner in text mode.
    async fn track<T, Fut,>(&self, message: String, task: Fut,) -> Result<T, Error,>
    where
        Fut: Future<Output = Result<T, Error,>,>,
    {
        if self.format != OutputFormat::Text {
            return task.await;
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner(),);
        spinner.enable_steady_tick(std::time::Duration::from_millis(100,),);
        spinner.set_message(message,);

        let result = task.await;
        spinner.finish_and_clear();
        result
    }
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main]
async fn main()
{
    let cli = Cli::parse();
    setup_logging(cli.verbose,);

    let output = Output::new(cli.format, !cli.no_color,);
    if let Err(error,) = run(cli, output,).await {
        eprintln!("{}", output.renderer.error(&error));
        process::exit(1,);
    }
}

fn setup_logging(verbose: bool,)
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose { EnvFilter::new("ghstats=debug",) } else { EnvFilter::new("ghstats=warn",) }
    },);

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false,).without_time().with_writer(io::stderr,),)
        .with(filter,)
        .init();
}

/// Resolves settings with CLI overrides applied on top.
///
/// # Errors
///
/// Propagates settings loading failures.
fn resolve_settings(cli: &Cli,) -> Result<Settings, Error,>
{
    match cli.config.as_deref() {
        Some(path,) => load_settings(path,),
        None => Ok(Settings::default(),),
    }
}

/// Executes the parsed command.
///
/// # Errors
///
/// Propagates settings, validation, API and output errors.
async fn run(cli: Cli, output: Output,) -> Result<(), Error,>
{
    let settings = resolve_settings(&cli,)?;
    let config = settings.client_config(cli.token.clone(),);

    match cli.command {
        Command::User(args,) => run_user(&config, &args, output,).await,
        Command::Languages(args,) => run_languages(&config, &settings, &args, output,).await,
        Command::Repos(args,) => run_repos(&config, &settings, &args, output,).await,
        Command::Top(args,) => run_top(&config, &settings, &args, output,).await,
        Command::Overview(args,) => run_overview(&config, &settings, &args, output,).await,
        Command::RateLimit => run_rate_limit(&config, output,).await,
    }
}

async fn run_user(config: &ClientConfig, args: &UserArgs, output: Output,) -> Result<(), Error,>
{
    let client = StatsClient::connect(config, &args.username,)?;
    let profile = output
        .track(format!("Fetching profile for {}...", client.identity()), client.user_profile(),)
        .await?;
    let quota = client.rate_limit().await?;

    let report = ProfileReport {
        profile:    &profile,
        rate_limit: &quota,
    };
    output.emit(&mut io::stdout().lock(), &report, |renderer| {
        format!("{}\n\n{}", renderer.profile(&profile,), renderer.rate_limit(&quota,))
    },)
}

async fn run_languages(
    config: &ClientConfig,
    settings: &Settings,
    args: &LanguagesArgs,
    output: Output,
) -> Result<(), Error,>
{
    let client = StatsClient::connect(config, &args.username,)?;
    let include_forks = args.forks.forks || settings.include_forks;
    let limit = args.limit.unwrap_or(settings.top_languages,);

    let stats: LanguageStats = output
        .track(
            format!("Analyzing languages for {}...", client.identity()),
            client.language_stats(include_forks,),
        )
        .await?;
    let quota = client.rate_limit().await?;

    let report = LanguageReport {
        total_bytes: stats.total_bytes,
        languages:   stats.top(limit,),
        rate_limit:  &quota,
    };
    output.emit(&mut io::stdout().lock(), &report, |renderer| {
        format!("{}\n\n{}", renderer.language_stats(&stats, limit,), renderer.rate_limit(&quota,))
    },)
}

async fn run_repos(
    config: &ClientConfig,
    settings: &Settings,
    args: &ReposArgs,
    output: Output,
) -> Result<(), Error,>
{
    let client = StatsClient::connect(config, &args.username,)?;
    let include_forks = args.forks.forks || settings.include_forks;

    let stats = output
        .track(
            format!("Fetching repository statistics for {}...", client.identity()),
            client.repo_stats(include_forks,),
        )
        .await?;
    let quota = client.rate_limit().await?;

    let report = TotalsReport {
        repo_stats: &stats,
        rate_limit: &quota,
    };
    output.emit(&mut io::stdout().lock(), &report, |renderer| {
        format!("{}\n\n{}", renderer.repo_stats(&stats,), renderer.rate_limit(&quota,))
    },)
}

async fn run_top(
    config: &ClientConfig,
    settings: &Settings,
    args: &TopArgs,
    output: Output,
) -> Result<(), Error,>
{
    let client = StatsClient::connect(config, &args.username,)?;
    let include_forks = args.forks.forks || settings.include_forks;
    let limit = args.limit.unwrap_or(settings.top_repos,);
    let key = args.sort.unwrap_or(settings.sort,);

    let repositories = output
        .track(
            format!("Finding top repositories for {}...", client.identity()),
            client.top_repositories(limit, key, include_forks,),
        )
        .await?;
    let quota = client.rate_limit().await?;

    let report = TopReport {
        sort:         key,
        repositories: &repositories,
        rate_limit:   &quota,
    };
    output.emit(&mut io::stdout().lock(), &report, |renderer| {
        format!("{}\n\n{}", renderer.top_repositories(&repositories, key,), renderer.rate_limit(&quota,))
    },)
}

async fn run_overview(
    config: &ClientConfig,
    settings: &Settings,
    args: &OverviewArgs,
    output: Output,
) -> Result<(), Error,>
{
    let client = StatsClient::connect(config, &args.username,)?;
    let include_forks = args.forks.forks || settings.include_forks;
    let (top_repos, top_langs,) = overview_limits(args, settings,);

    let (profile, snapshot, stats,) = output
        .track(format!("Fetching complete overview for {}...", client.identity()), async {
            let profile = client.user_profile().await?;
            let snapshot = client.snapshot(include_forks,).await?;
            let stats = snapshot.language_stats(client.fetcher(),).await?;
            Ok((profile, snapshot, stats,),)
        },)
        .await?;
    let quota = client.rate_limit().await?;

    let totals = snapshot.repo_stats();
    let top = snapshot.top(SortKey::Stars, top_repos,);

    let report = OverviewReport {
        profile:          &profile,
        repo_stats:       &totals,
        languages:        stats.top(top_langs,),
        top_repositories: &top,
        rate_limit:       &quota,
    };
    output.emit(&mut io::stdout().lock(), &report, |renderer| {
        [
            renderer.profile(&profile,),
            renderer.repo_stats(&totals,),
            renderer.language_stats(&stats, top_langs,),
            renderer.top_repositories(&top, SortKey::Stars,),
            renderer.rate_limit(&quota,),
        ]
        .join("\n\n",)
    },)
}

/// Section sizes for `overview`; the repository list is shorter than the
/// `top` command's by default.
fn overview_limits(args: &OverviewArgs, settings: &Settings,) -> (usize, usize,)
{
    (
        args.top_repos.unwrap_or(OVERVIEW_TOP_REPOS,),
        args.top_langs.unwrap_or(settings.top_languages,),
    )
}

async fn run_rate_limit(config: &ClientConfig, output: Output,) -> Result<(), Error,>
{
    let fetcher = GithubFetcher::new(config, None,)?;
    let quota = output.track("Checking rate limit...".to_owned(), fetch_rate_limit(&fetcher,),).await?;
    let authenticated = config.token.is_some();

    let report = QuotaReport {
        rate_limit: &quota,
        used_percent: quota.used_percent(),
        authenticated,
    };
    output.emit(&mut io::stdout().lock(), &report, |renderer| {
        renderer.rate_limit_status(&quota, authenticated,)
    },)
}
