// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Terminal and JSON presentation of fetched statistics.
///
/// [`TextRenderer`] produces human-readable blocks with optional ANSI colors;
/// [`write_json`] emits the same values as pretty-printed JSON.
use std::io::Write;

use serde::Serialize;

use crate::{
    aggregate::{LanguageStats, RepoStats, SortKey},
    error::{Error, output_error},
    models::{RateLimitSnapshot, RepositoryRecord, UserProfile},
};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

const BAR_WIDTH: usize = 40;
const BAR_CHAR: char = '█';
const DESCRIPTION_WIDTH: usize = 50;

/// Formats statistics as plain or colored text blocks.
#[derive(Debug, Clone, Copy,)]
pub struct TextRenderer
{
    colors: bool,
}

impl TextRenderer
{
    pub fn new(colors: bool,) -> Self
    {
        Self {
            colors,
        }
    }

    fn paint(&self, color: &str, text: &str,) -> String
    {
        if self.colors { format!("{color}{text}{RESET}") } else { text.to_owned() }
    }

    fn label(&self, text: &str,) -> String
    {
        if self.colors { format!("{BOLD}{CYAN}{text}{RESET}") } else { text.to_owned() }
    }

    fn heading(&self, text: &str,) -> String
    {
        if self.colors { format!("{BOLD}{GREEN}{text}{RESET}") } else { text.to_owned() }
    }

    /// Profile panel.
    pub fn profile(&self, profile: &UserProfile,) -> String
    {
        let or_na = |value: &Option<String,>| {
            value.as_deref().filter(|text| !text.is_empty(),).unwrap_or("N/A",).to_owned()
        };
        let bio = profile
            .bio
            .as_deref()
            .filter(|text| !text.is_empty(),)
            .unwrap_or("No bio available",);

        let rows = [
            ("Name:", or_na(&profile.name,),),
            ("Username:", profile.login.clone(),),
            ("Bio:", bio.to_owned(),),
            ("Location:", or_na(&profile.location,),),
            ("Company:", or_na(&profile.company,),),
            ("Website:", or_na(&profile.blog,),),
            ("Followers:", format!("{} | Following: {}", profile.followers, profile.following),),
            ("Public Repositories:", profile.public_repos.to_string(),),
            ("Account Created:", profile.created_date().format("%Y-%m-%d",).to_string(),),
        ];

        let mut lines = vec![self.heading("User Profile",)];
        for (label, value,) in rows {
            lines.push(format!("{} {value}", self.label(label,)),);
        }
        lines.join("\n",)
    }

    /// Language bars for the `limit` largest shares, scaled to the largest.
    pub fn language_stats(&self, stats: &LanguageStats, limit: usize,) -> String
    {
        if stats.is_empty() {
            return self.paint(YELLOW, "No language data available",);
        }

        let shares = stats.top(limit,);
        let max = shares.iter().map(|share| share.percentage,).fold(0.0_f64, f64::max,);

        let mut lines = vec![self.heading(&format!("Language Breakdown (Top {limit})"),)];
        for share in shares {
            let length = if max > 0.0 { (share.percentage / max * BAR_WIDTH as f64) as usize } else { 0 };
            let bar: String = std::iter::repeat_n(BAR_CHAR, length,).collect();
            let color = language_color(&share.language,);
            lines.push(format!(
                "{} {} {:5.1}%",
                self.paint(color, &format!("{:15}", share.language),),
                self.paint(color, &bar,),
                share.percentage
            ),);
        }
        lines.join("\n",)
    }

    /// Totals block.
    pub fn repo_stats(&self, stats: &RepoStats,) -> String
    {
        let rows = [
            ("Total Repositories", stats.total_repos.to_string(),),
            ("Total Stars", stats.total_stars.to_string(),),
            ("Total Forks", stats.total_forks.to_string(),),
            ("Total Watchers", stats.total_watchers.to_string(),),
            ("Total Size", format!("{} KB", group_thousands(stats.total_size_kb)),),
        ];

        let mut lines = vec![self.heading("Repository Statistics",)];
        for (label, value,) in rows {
            lines.push(format!("{} {}", self.label(&format!("{label:<20}"),), self.paint(MAGENTA, &value,)),);
        }
        lines.join("\n",)
    }

    /// Ranked repository table.
    pub fn top_repositories(&self, repositories: &[RepositoryRecord], key: SortKey,) -> String
    {
        if repositories.is_empty() {
            return self.paint(YELLOW, "No repositories found",);
        }

        let header = ["Repository", "Description", "Language", "Stars", "Forks", "Size (KB)",];
        let rows: Vec<[String; 6],> = repositories
            .iter()
            .map(|record| {
                [
                    record.name.clone(),
                    truncate(record.description.as_deref().unwrap_or("No description",), DESCRIPTION_WIDTH,),
                    record.language.clone().unwrap_or_else(|| "N/A".to_owned(),),
                    record.stargazers_count.to_string(),
                    record.forks_count.to_string(),
                    group_thousands(record.size,),
                ]
            },)
            .collect();

        let mut widths = header.map(|title| title.chars().count(),);
        for row in &rows {
            for (width, cell,) in widths.iter_mut().zip(row,) {
                *width = (*width).max(cell.chars().count(),);
            }
        }

        let mut lines = vec![self.heading(&format!("Top Repositories (by {key})"),)];
        let header_cells: Vec<String,> =
            header.iter().zip(widths,).map(|(title, width,)| format!("{title:<width$}"),).collect();
        lines.push(self.label(&header_cells.join("  ",),),);

        for row in rows {
            let cells: Vec<String,> = row
                .iter()
                .zip(widths,)
                .enumerate()
                .map(|(column, (cell, width,),)| {
                    let padded = if column >= 3 { format!("{cell:>width$}") } else { format!("{cell:<width$}") };
                    match column {
                        0 => self.paint(CYAN, &padded,),
                        2 => self.paint(YELLOW, &padded,),
                        3 => self.paint(GREEN, &padded,),
                        4 => self.paint(BLUE, &padded,),
                        5 => self.paint(MAGENTA, &padded,),
                        _ => padded,
                    }
                },)
                .collect();
            lines.push(cells.join("  ",).trim_end().to_owned(),);
        }
        lines.join("\n",)
    }

    /// One-line quota summary colored by the remaining share.
    pub fn rate_limit(&self, snapshot: &RateLimitSnapshot,) -> String
    {
        let percentage = snapshot.remaining_percent();
        let color = if percentage > 50.0 {
            GREEN
        } else if percentage > 20.0 {
            YELLOW
        } else {
            RED
        };
        self.paint(
            color,
            &format!(
                "API Rate Limit: {}/{} requests remaining ({percentage:.1}%)",
                snapshot.remaining, snapshot.limit
            ),
        )
    }

    /// Detailed quota report for the `rate-limit` command.
    pub fn rate_limit_status(&self, snapshot: &RateLimitSnapshot, authenticated: bool,) -> String
    {
        let mut lines = vec![
            self.heading("GitHub API Rate Limit Status",),
            format!("Remaining requests: {}", self.paint(GREEN, &snapshot.remaining.to_string(),)),
            format!("Total limit: {}", self.paint(BLUE, &snapshot.limit.to_string(),)),
            format!("Percentage used: {}", self.paint(YELLOW, &format!("{:.1}%", snapshot.used_percent()),)),
        ];
        if let Some(reset_at,) = snapshot.reset_at {
            lines.push(format!("Resets at: {}", reset_at.format("%Y-%m-%d %H:%M:%S UTC",)),);
        }
        if !authenticated {
            lines.push(self.info(
                "Tip: use a GitHub token (--token or GITHUB_TOKEN) for 5000 requests/hour instead of 60",
            ),);
        }
        lines.join("\n",)
    }

    /// Informational message.
    pub fn info(&self, message: &str,) -> String
    {
        self.paint(BLUE, message,)
    }

    /// Error message as printed before a non-zero exit.
    pub fn error(&self, error: &Error,) -> String
    {
        format!("{} {}", self.paint(RED, "Error:",), error.to_display_string())
    }
}

/// Writes `value` as pretty-printed JSON followed by a newline.
///
/// # Errors
///
/// Returns [`Error::Serialize`] when encoding fails and [`Error::Output`]
/// when the writer rejects the bytes.
pub fn write_json<W, T,>(writer: &mut W, value: &T,) -> Result<(), Error,>
where
    W: Write,
    T: Serialize + ?Sized,
{
    let mut encoded = serde_json::to_vec_pretty(value,)?;
    encoded.push(b'\n',);
    writer.write_all(&encoded,).map_err(output_error,)
}

/// Terminal color associated with a language name.
pub fn language_color(language: &str,) -> &'static str
{
    match language {
        "Python" | "C" | "CSS" => BLUE,
        "JavaScript" => YELLOW,
        "TypeScript" | "Go" => CYAN,
        "Java" | "Rust" | "Ruby" | "HTML" => RED,
        "C++" | "PHP" | "Kotlin" | "C#" => MAGENTA,
        "Swift" => YELLOW,
        "Shell" => GREEN,
        _ => WHITE,
    }
}

fn group_thousands(value: u64,) -> String
{
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3,);
    for (index, digit,) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',',);
        }
        grouped.push(digit,);
    }
    grouped
}

fn truncate(text: &str, width: usize,) -> String
{
    if text.chars().count() <= width {
        return text.to_owned();
    }
    let mut shortened: String = text.chars().take(width.saturating_sub(1,),).collect();
    shortened.push('…',);
    shortened
}
