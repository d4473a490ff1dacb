//! teamdraw CLI
//!
//! Manage a list of names, run a prize draw, and split people into
//! random groups. Opens the terminal UI by default.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::warn;

use teamdraw::config::resolve_settings;
use teamdraw::draw::DrawEngine;
use teamdraw::export::{format_groups, to_csv_bytes};
use teamdraw::grouping::GroupingSession;
use teamdraw::ingest::{read_csv_file, split_bulk_text};
use teamdraw::logging::{LogSink, init_tracing};
use teamdraw::roster::Roster;
use teamdraw::schedule::Ticker;
use teamdraw::tui::run::run;
use teamdraw::tui::state::App;
use teamdraw::types::{ExportFormat, Settings};

#[derive(Parser)]
#[command(name = "teamdraw")]
#[command(about = "Prize draws and random groups from a list of names")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Settings file (default: <config dir>/teamdraw/settings.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, global = true)]
    log: Option<PathBuf>,

    /// Log debug detail
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive terminal UI (the default)
    Ui {
        /// CSV files to preload, every non-empty cell is a name
        files: Vec<PathBuf>,

        /// Initial group size
        #[arg(long)]
        group_size: Option<usize>,

        /// Let previous winners be drawn again
        #[arg(long)]
        allow_repeat: bool,
    },

    /// Split names into random groups and print them
    Group {
        /// CSV files to read names from
        files: Vec<PathBuf>,

        /// Extra names, separated by commas or newlines
        #[arg(long)]
        names: Option<String>,

        /// Members per group
        #[arg(long)]
        size: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: ExportFormatArg,

        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Draw winners and print them in draw order
    Draw {
        /// CSV files to read names from
        files: Vec<PathBuf>,

        /// Extra names, separated by commas or newlines
        #[arg(long)]
        names: Option<String>,

        /// Number of winners to draw
        #[arg(long, default_value_t = 1)]
        count: usize,

        /// Let a name win more than once
        #[arg(long)]
        allow_repeat: bool,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ExportFormatArg {
    Text,
    Csv,
    Json,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Text => ExportFormat::Text,
            ExportFormatArg::Csv => ExportFormat::Csv,
            ExportFormatArg::Json => ExportFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // The UI owns the screen, so it only logs to a file
    let sink = match cli.command {
        None | Some(Commands::Ui { .. }) => LogSink::Off,
        Some(_) => LogSink::Stderr,
    };
    init_tracing(cli.log.as_deref(), sink, cli.verbose);

    let result = resolve_settings(cli.config.as_deref())
        .map_err(|e| e.to_string())
        .and_then(|settings| match cli.command {
            None => cmd_ui(settings, &[], None, false),
            Some(Commands::Ui {
                files,
                group_size,
                allow_repeat,
            }) => cmd_ui(settings, &files, group_size, allow_repeat),
            Some(Commands::Group {
                files,
                names,
                size,
                format,
                output,
            }) => cmd_group(settings, &files, names.as_deref(), size, format.into(), output.as_deref()),
            Some(Commands::Draw {
                files,
                names,
                count,
                allow_repeat,
            }) => cmd_draw(settings, &files, names.as_deref(), count, allow_repeat),
        });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// INPUT
// ============================================================================

/// Build a roster from CSV files, then inline text, in argument order.
fn collect_names(files: &[PathBuf], text: Option<&str>) -> Result<Roster, String> {
    let mut roster = Roster::new();
    for path in files {
        let entries = read_csv_file(path).map_err(|e| e.to_string())?;
        roster.add(entries);
    }
    if let Some(text) = text {
        roster.add(split_bulk_text(text));
    }
    Ok(roster)
}

// ============================================================================
// COMMANDS
// ============================================================================

fn cmd_ui(
    mut settings: Settings,
    files: &[PathBuf],
    group_size: Option<usize>,
    allow_repeat: bool,
) -> Result<(), String> {
    if let Some(size) = group_size {
        settings.group_size = size;
    }
    settings.allow_repeat |= allow_repeat;

    let roster = collect_names(files, None)?;
    let mut app = App::new(settings);
    app.roster = roster;
    if !files.is_empty() {
        app.info(format!("Loaded {} names", app.roster.len()));
    }

    run(app).map_err(|e| format!("Terminal error: {}", e))
}

fn cmd_group(
    settings: Settings,
    files: &[PathBuf],
    names: Option<&str>,
    size: Option<usize>,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<(), String> {
    let roster = collect_names(files, names)?;
    if roster.is_empty() {
        return Err("No names given. Pass CSV files or --names.".to_string());
    }

    let mut session = GroupingSession::new(size.unwrap_or(settings.group_size));
    session.generate_now(roster.names(), &mut rand::rng());
    let groups = session.groups();

    match output {
        Some(path) => {
            // CSV keeps its BOM on disk; stdout gets plain text
            let bytes = match format {
                ExportFormat::Csv => to_csv_bytes(groups).map_err(|e| e.to_string())?,
                _ => format_groups(groups, format)
                    .map_err(|e| e.to_string())?
                    .into_bytes(),
            };
            fs::write(path, bytes)
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
            eprintln!("Wrote {} groups to {}", groups.len(), path.display());
        }
        None => {
            let text = format_groups(groups, format).map_err(|e| e.to_string())?;
            println!("{}", text.trim_start_matches('\u{feff}').trim_end());
        }
    }

    Ok(())
}

fn cmd_draw(
    settings: Settings,
    files: &[PathBuf],
    names: Option<&str>,
    count: usize,
    allow_repeat: bool,
) -> Result<(), String> {
    let roster = collect_names(files, names)?;
    let mut engine = DrawEngine::new(settings.allow_repeat || allow_repeat);
    let mut rng = rand::rng();

    if engine.eligible(roster.names()).is_empty() {
        return Err("No names given. Pass CSV files or --names.".to_string());
    }

    // No animation headless: each draw is an immediate start/stop
    let mut drawn = 0;
    while drawn < count {
        if !engine.start(roster.names(), Ticker::inert) {
            warn!(drawn, requested = count, "eligible names exhausted");
            eprintln!("Note: only {} of {} winners could be drawn", drawn, count);
            break;
        }
        match engine.stop(roster.names(), &mut rng) {
            Some(winner) => {
                drawn += 1;
                println!("{}. {}", drawn, winner);
            }
            None => break,
        }
    }

    engine.shutdown();
    Ok(())
}
