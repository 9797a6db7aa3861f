use std::{
    fs::{read_to_string, write},
    io::{stdout, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::info;
use sheetcal_core::{
    config_check,
    event::EventDescriptor,
    ical::generator::Emitter,
    ical_export, sheet_client,
    sheet_client::EventKindBitmask,
};

#[derive(Debug, Parser)]
#[command(version, about = "Turn a published spreadsheet into calendar events")]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// convert a local CSV export
    Convert {
        /// the CSV file
        file: PathBuf,
        #[command(flatten)]
        output_args: OutputArgs,
    },
    /// fetch and convert a published CSV export
    Fetch {
        /// the CSV export URL
        url: String,
        #[command(flatten)]
        output_args: OutputArgs,
    },
    /// check the CSV_URL constant of the widget page
    CheckConfig {
        /// the widget page
        #[arg(default_value = config_check::DEFAULT_PAGE)]
        page: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Ics,
}

#[derive(Debug, Args)]
pub struct OutputArgs {
    /// the output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    pub format: Format,
    /// write to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
    /// the current local time, e.g. 2024-03-05T12:00:00
    #[arg(long)]
    pub now: Option<NaiveDateTime>,
    /// exclude events without start and end time
    #[arg(long)]
    pub exclude_tba: bool,
    /// exclude tasks
    #[arg(long)]
    pub exclude_task: bool,
    /// exclude events with start and end time
    #[arg(long)]
    pub exclude_timed: bool,
    /// exclude events with only a start time
    #[arg(long)]
    pub exclude_start_only: bool,
    /// exclude canceled events
    #[arg(long)]
    pub exclude_canceled: bool,
    /// exclude past events
    #[arg(long)]
    pub exclude_past: bool,
}

impl From<&OutputArgs> for EventKindBitmask {
    fn from(value: &OutputArgs) -> Self {
        let mut event_kind_bitmask = EventKindBitmask::none();
        if value.exclude_tba {
            event_kind_bitmask |= EventKindBitmask::Tba;
        }
        if value.exclude_task {
            event_kind_bitmask |= EventKindBitmask::Task;
        }
        if value.exclude_timed {
            event_kind_bitmask |= EventKindBitmask::Timed;
        }
        if value.exclude_start_only {
            event_kind_bitmask |= EventKindBitmask::StartOnly;
        }
        if value.exclude_canceled {
            event_kind_bitmask |= EventKindBitmask::Canceled;
        }
        if value.exclude_past {
            event_kind_bitmask |= EventKindBitmask::Past;
        }
        event_kind_bitmask
    }
}

impl OutputArgs {
    fn now(&self) -> NaiveDateTime {
        self.now
            .unwrap_or_else(|| chrono::Local::now().naive_local())
    }
}

pub async fn run(command: Command) -> Result<()> {
    match command {
        Command::Convert { file, output_args } => {
            let csv = read_to_string(&file)
                .with_context(|| format!("Could not read {}", file.display()))?;
            let events = sheet_client::events_from_csv(&csv, output_args.now())?;
            write_events(events, &output_args)?;
        }
        Command::Fetch { url, output_args } => {
            let events = sheet_client::get(&url, output_args.now()).await?;
            write_events(events, &output_args)?;
        }
        Command::CheckConfig { page } => {
            config_check::check_file(&page).context("Config check failed")?;
            println!("Config check passed: CSV_URL looks valid.");
        }
    };
    Ok(())
}

fn render(events: &[EventDescriptor], output_args: &OutputArgs) -> Result<String> {
    let rendered = match output_args.format {
        Format::Json => serde_json::to_string_pretty(events)?,
        Format::Ics => ical_export::to_ical(events, output_args.now()).generate(),
    };
    Ok(rendered)
}

fn write_events(events: Vec<EventDescriptor>, output_args: &OutputArgs) -> Result<()> {
    let events = sheet_client::filter(events, EventKindBitmask::from(output_args));
    let rendered = render(&events, output_args)?;
    match &output_args.output {
        Some(path) => {
            write(path, rendered)?;
            info!("Wrote {} events to {}", events.len(), path.display());
        }
        None => writeln!(stdout(), "{rendered}")?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Arguments::parse();
    run(args.command).await
}
