//! CLI entry point for `maillog`.

use std::fmt::Write as _;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use clap::{Args, CommandFactory, FromArgMatches, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use unicode_width::UnicodeWidthChar;

use maillog::client::LogsClient;
use maillog::config::Config;
use maillog::export::{self, ExportFormat};
use maillog::filter::LogFilter;
use maillog::i18n;
use maillog::model::log::Log;
use maillog::stats::LogStats;

#[derive(Parser)]
#[command(name = "maillog", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL (overrides the config file)
    #[arg(long, env = "MAILLOG_API_URL", global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Language (en, it). Defaults to config, then system locale.
    #[arg(long, value_name = "LANG", global = true)]
    lang: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List logs
    List {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long)]
        json: bool,
    },
    /// Show one log in full
    Show {
        id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Render the summary digest for a log
    Digest {
        id: i64,
    },
    /// Show statistics
    Stats {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long)]
        json: bool,
    },
    /// Export logs (csv, json, txt)
    Export {
        #[arg(short, long)]
        format: Option<String>,
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

/// Client-side filters shared by list, stats and export.
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Only logs the backend has not processed yet
    #[arg(long, conflicts_with = "processed")]
    unprocessed: bool,
    /// Only processed logs
    #[arg(long)]
    processed: bool,
    /// Sender contains (case-insensitive)
    #[arg(long)]
    sender: Option<String>,
    /// Subject contains (case-insensitive)
    #[arg(long)]
    subject: Option<String>,
    /// Only logs with attachments
    #[arg(long)]
    with_attachments: bool,
    /// Subject, body or summary contains (case-insensitive)
    #[arg(long)]
    text: Option<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> LogFilter {
        let processed = match (self.processed, self.unprocessed) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        LogFilter {
            processed,
            sender: self.sender.clone(),
            subject: self.subject.clone(),
            has_attachments: self.with_attachments.then_some(true),
            text: self.text.clone(),
        }
    }
}

/// Pick up `--lang` from raw args so `--help` is already localized.
fn detect_lang_early(config: &Config) -> i18n::Lang {
    let args: Vec<String> = std::env::args().collect();
    let from_args = args.iter().enumerate().find_map(|(i, arg)| {
        if arg == "--lang" {
            args.get(i + 1).and_then(|c| i18n::Lang::from_code(c))
        } else {
            arg.strip_prefix("--lang=").and_then(i18n::Lang::from_code)
        }
    });

    from_args
        .or_else(|| config.general.lang.as_deref().and_then(i18n::Lang::from_code))
        .unwrap_or_else(i18n::detect_system_lang)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = maillog::config::load_config();
    i18n::set_lang(detect_lang_early(&config));

    let matches = Cli::command().about(i18n::app_about()).get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    match cli.command {
        Commands::List { filter, json } => cmd_list(&config, &filter.to_filter(), json).await,
        Commands::Show { id, json } => cmd_show(&config, id, json).await,
        Commands::Digest { id } => cmd_digest(&config, id).await,
        Commands::Stats { filter, json } => cmd_stats(&config, &filter.to_filter(), json).await,
        Commands::Export {
            format,
            output,
            filter,
        } => cmd_export(&config, format.as_deref(), &output, &filter.to_filter()).await,
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = maillog::config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "maillog.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Fetch all logs, with a spinner on interactive terminals.
async fn fetch(config: &Config) -> anyhow::Result<Vec<Log>> {
    let client = LogsClient::from_config(&config.api)?;

    let pb = if std::io::stderr().is_terminal() {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .expect("valid template"),
        );
        pb.set_message(i18n::msg_fetching());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    } else {
        ProgressBar::hidden()
    };

    let result = client.fetch_logs().await;
    pb.finish_and_clear();
    Ok(result?)
}

async fn cmd_list(config: &Config, filter: &LogFilter, json: bool) -> anyhow::Result<()> {
    let logs = fetch(config).await?;
    let selected = filter.apply(&logs);

    if json {
        println!("{}", serde_json::to_string_pretty(&selected)?);
    } else {
        print_logs_table(&selected, &config.general.date_format);
    }
    Ok(())
}

async fn cmd_show(config: &Config, id: i64, json: bool) -> anyhow::Result<()> {
    let client = LogsClient::from_config(&config.api)?;
    let log = client.fetch_log(id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&log)?);
    } else {
        print!("{}", export::text::render_text(&log));
    }
    Ok(())
}

async fn cmd_digest(config: &Config, id: i64) -> anyhow::Result<()> {
    let client = LogsClient::from_config(&config.api)?;
    let log = client.fetch_log(id).await?;
    let digest = maillog::digest::render(&log, i18n::lang());

    println!("{}: {}", i18n::col_subject(), digest.subject);
    println!();
    println!("{}", digest.body);
    Ok(())
}

async fn cmd_stats(config: &Config, filter: &LogFilter, json: bool) -> anyhow::Result<()> {
    let logs = fetch(config).await?;
    let selected: Vec<Log> = filter.apply(&logs).into_iter().cloned().collect();
    let stats = LogStats::compute(&selected, 10);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_stats_table(&stats, &config.general.date_format);
    }
    Ok(())
}

async fn cmd_export(
    config: &Config,
    format: Option<&str>,
    output: &Path,
    filter: &LogFilter,
) -> anyhow::Result<()> {
    let format: ExportFormat = format
        .unwrap_or(config.export.default_format.as_str())
        .parse()?;

    let logs = fetch(config).await?;
    let selected = filter.apply(&logs);

    match format {
        ExportFormat::Csv => {
            let path = file_target(output, "logs.csv")?;
            export::csv::export_csv(&selected, &path, config.export.csv_separator)?;
            println!("  {} {} -> {}", i18n::msg_exported(), selected.len(), path.display());
        }
        ExportFormat::Json => {
            let path = file_target(output, "logs.json")?;
            export::json::export_json(&selected, &path)?;
            println!("  {} {} -> {}", i18n::msg_exported(), selected.len(), path.display());
        }
        ExportFormat::Text => {
            let pb = ProgressBar::new(selected.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} Exporting [{bar:40.cyan/blue}] {pos}/{len}")
                    .expect("valid template")
                    .progress_chars("#>-"),
            );
            let paths = export::text::export_multiple_text(&selected, output, &|current, _| {
                pb.set_position(current as u64);
            })?;
            pb.finish_and_clear();
            println!("  {} {} -> {}", i18n::msg_exported(), paths.len(), output.display());
        }
    }

    Ok(())
}

/// Resolve a single-file export target: a path with an extension is used as-is,
/// anything else is treated as a directory.
fn file_target(output: &Path, default_name: &str) -> anyhow::Result<PathBuf> {
    let path = if output.extension().is_some() {
        output.to_path_buf()
    } else {
        output.join(default_name)
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(path)
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "maillog", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command().about(i18n::app_about());
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

/// Truncate to `width` terminal columns and pad with spaces.
fn fit(s: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0;
    for ch in s.chars().map(|c| if c.is_control() { ' ' } else { c }) {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(&" ".repeat(width - used));
    out
}

/// Format a timestamp, or `None` if `date_format` has an invalid specifier.
fn format_timestamp(dt: &DateTime<Utc>, date_format: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", dt.format(date_format)).ok()?;
    Some(out)
}

/// `received_at` in the configured format, or verbatim if it cannot be formatted.
fn format_received(log: &Log, date_format: &str) -> String {
    log.received_at_utc()
        .and_then(|dt| format_timestamp(&dt, date_format))
        .unwrap_or_else(|| log.received_at.clone())
}

/// Print logs as a human-readable table.
fn print_logs_table(logs: &[&Log], date_format: &str) {
    println!();
    println!("  {} {}", logs.len(), i18n::msg_results());
    println!();

    if logs.is_empty() {
        return;
    }

    println!(
        "  {:<4} {:>6} {} {} {} {:>3} {}",
        "#",
        "Id",
        fit(i18n::col_received(), 17),
        fit(i18n::col_sender(), 25),
        fit(i18n::col_subject(), 40),
        i18n::col_attachments(),
        i18n::col_processed()
    );
    println!("  {}", "-".repeat(104));

    for (i, log) in logs.iter().enumerate() {
        let sender = log.sender_address();
        println!(
            "  {:<4} {:>6} {} {} {} {:>3} {}",
            i + 1,
            log.id,
            fit(&format_received(log, date_format), 17),
            fit(sender.short(), 25),
            fit(&log.subject, 40),
            log.attachment_count(),
            if log.processed { "\u{2713}" } else { "" }
        );
    }
    println!();
}

/// Print statistics in a human-readable table.
fn print_stats_table(stats: &LogStats, date_format: &str) {
    println!();
    if stats.total == 0 {
        println!("  {}", i18n::msg_no_logs());
        println!();
        return;
    }

    println!("  {:<20} {}", i18n::msg_total(), stats.total);
    println!(
        "  {:<20} {} ({:.1}%)",
        i18n::msg_processed(),
        stats.processed,
        stats.processed_pct()
    );
    println!("  {:<20} {}", i18n::msg_with_attachments(), stats.with_attachments);
    println!("  {:<20} {}", i18n::msg_attachment_files(), stats.attachments);
    println!("  {:<20} {}", i18n::msg_summarized(), stats.summarized);

    if let (Some(min), Some(max)) = (stats.oldest, stats.newest) {
        let min = format_timestamp(&min, date_format).unwrap_or_else(|| min.to_rfc3339());
        let max = format_timestamp(&max, date_format).unwrap_or_else(|| max.to_rfc3339());
        println!("  {:<20} {} \u{2014} {}", i18n::msg_date_range(), min, max);
    }

    if !stats.top_senders.is_empty() {
        println!();
        println!("  {}:", i18n::msg_top_senders());
        for (sender, count) in &stats.top_senders {
            println!("    {count:>6}  {sender}");
        }
    }
    println!();
}
