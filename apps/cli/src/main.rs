//! `stamplog` command-line tool

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stamplog::{Clock, Level, LoggerBuilder, ManualClock, Settings, SystemClock, TimestampFormat};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Debug, Parser)]
#[command(name = "stamplog", version, about = "Render timestamp templates and emit log lines")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a timestamp rendered from a template
    Stamp {
        /// Template, e.g. "Date: [YYYY-MM-DD]"
        template: String,
        /// Literal text before the timestamp
        #[arg(long, default_value = "")]
        prefix: String,
        /// Literal text after the timestamp
        #[arg(long, default_value = "")]
        suffix: String,
        /// Render this RFC 3339 instant instead of now
        #[arg(long, value_parser = parse_instant)]
        at: Option<OffsetDateTime>,
    },
    /// Log a message, or every line of stdin when no message is given
    Emit {
        /// JSON settings file; environment variables are used when absent
        #[arg(long, env = "STAMPLOG_SETTINGS")]
        settings: Option<PathBuf>,
        /// Level filter directive, e.g. "info"
        #[arg(long)]
        level: Option<String>,
        /// Severity of the emitted lines
        #[arg(long, default_value = "log")]
        severity: Level,
        /// Use this RFC 3339 instant for every timestamp
        #[arg(long, value_parser = parse_instant)]
        at: Option<OffsetDateTime>,
        /// Message words
        message: Vec<String>,
    },
}

fn parse_instant(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(value, &Rfc3339)
}

fn clock(at: Option<OffsetDateTime>) -> Box<dyn Clock> {
    match at {
        Some(at) => Box::new(ManualClock::new(at)),
        None => Box::new(SystemClock),
    }
}

fn stamp(template: &str, prefix: String, suffix: String, at: Option<OffsetDateTime>) {
    let format = TimestampFormat::new(template.into())
        .with_prefix(prefix)
        .with_suffix(suffix);
    println!("{}", format.render(&clock(at).now()));
}

fn load_settings(path: Option<PathBuf>, level: Option<String>) -> Result<Settings> {
    let mut settings = match path {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            Settings::from_json(&json)
                .with_context(|| format!("Invalid settings in {}", path.display()))?
        }
        None => Settings::from_env(),
    };
    if level.is_some() {
        settings.level = level;
    }
    Ok(settings)
}

fn emit(
    settings: Settings,
    severity: Level,
    at: Option<OffsetDateTime>,
    message: &[String],
) -> Result<()> {
    let mut builder = LoggerBuilder::from_settings(settings);
    if let Some(at) = at {
        builder = builder.clock(ManualClock::new(at));
    }
    let logger = builder.build().context("Failed to configure logger")?;

    if message.is_empty() {
        for line in io::stdin().lock().lines() {
            logger.emit(severity, &line.context("Failed to read stdin")?);
        }
    } else {
        logger.emit(severity, &message.join(" "));
    }
    Ok(())
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Command::Stamp {
            template,
            prefix,
            suffix,
            at,
        } => stamp(&template, prefix, suffix, at),
        Command::Emit {
            settings,
            level,
            severity,
            at,
            message,
        } => emit(load_settings(settings, level)?, severity, at, &message)?,
    }
    Ok(())
}
