mod commands;
mod config;
mod effects;
mod render;
mod session;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use labeler_core::{Label, Msg, SaveStatusView};
use labeler_logging::{labeler_error, labeler_info, LogDestination};
use log::LevelFilter;

use crate::commands::Command;
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::effects::EffectRunner;
use crate::session::Session;

#[derive(Debug, Parser)]
#[command(name = "labeler", about = "Label issue reports as standard or not standard", version)]
struct Cli {
    /// RON configuration file.
    #[arg(long, short = 'c', default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Dataset name from the configuration.
    #[arg(long, short = 'd')]
    dataset: Option<String>,

    /// CSV file to label, bypassing the configured datasets.
    #[arg(long)]
    csv: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogTarget::Terminal)]
    log: LogTarget,

    #[arg(long, short = 'v', action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Print the rows with their current labels.
    List,
    /// Interactive review loop (default).
    Review,
    /// Set one row's label and save immediately.
    Label {
        /// 1-based row number.
        row: usize,
        #[arg(value_enum)]
        verdict: Verdict,
        #[arg(long)]
        reason: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Verdict {
    Standard,
    NotStandard,
    Unset,
}

impl From<Verdict> for Label {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Standard => Label::Standard,
            Verdict::NotStandard => Label::NotStandard,
            Verdict::Unset => Label::Unset,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = Config::read(&cli.config)?;
    let found = loaded.is_some();
    let config = loaded.unwrap_or_default();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    labeler_logging::initialize(cli.log.into(), level, &config.log_file);
    if !found {
        labeler_info!("No config at {:?}, using defaults", cli.config);
    }

    let choice = config.resolve_dataset(cli.dataset.as_deref(), cli.csv.as_deref())?;
    let runner =
        EffectRunner::from_config(&config, &choice).context("failed to start the reconciler")?;
    let mut session = Session::new(config.row_limit, runner, choice.path.clone());
    session
        .reload()
        .with_context(|| format!("failed to load {}", session.save_target()))?;
    labeler_info!(
        "Dataset {} loaded from {:?}, saving to {}",
        choice.name,
        session.dataset_path(),
        session.save_target()
    );

    match cli.command.unwrap_or(CliCommand::Review) {
        CliCommand::List => {
            println!("{}", render::render(&session.view()));
            Ok(())
        }
        CliCommand::Label {
            row,
            verdict,
            reason,
        } => label_once(&mut session, row, verdict.into(), reason),
        CliCommand::Review => review(&mut session, &choice.name),
    }
}

fn label_once(
    session: &mut Session,
    row: usize,
    label: Label,
    reason: Option<String>,
) -> anyhow::Result<()> {
    let index = row.checked_sub(1).context("rows are numbered from 1")?;
    if index >= session.view().rows.len() {
        bail!("row {row} is not editable in this dataset");
    }
    session.dispatch(Msg::LabelSet { row: index, label });
    if let Some(text) = reason {
        session.dispatch(Msg::ReasonChanged { row: index, text });
    }
    session.dispatch(Msg::SaveClicked);

    let view = session.view();
    println!("{}", render::render_status(&view));
    match view.save {
        SaveStatusView::Failed { message, .. } => bail!(message),
        _ => Ok(()),
    }
}

fn review(session: &mut Session, dataset_name: &str) -> anyhow::Result<()> {
    println!("Labeling {dataset_name} -> {}", session.save_target());
    println!("{}", render::render(&session.view()));
    println!("{}", commands::HELP);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match commands::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        let msg = match &command {
            Command::Quit => break,
            Command::Help => {
                println!("{}", commands::HELP);
                continue;
            }
            Command::List => {
                println!("{}", render::render(&session.view()));
                continue;
            }
            Command::Show(_) => {
                show_row(session, command.row());
                continue;
            }
            Command::Reload => {
                match session.reload() {
                    Ok(()) => println!("{}", render::render_status(&session.view())),
                    Err(err) => {
                        labeler_error!("Reload failed: {}", err);
                        println!("reload failed, edits kept: {err}");
                    }
                }
                continue;
            }
            Command::Save => Msg::SaveClicked,
            Command::Standard(_) => toggle(session, command.row(), Label::Standard),
            Command::NotStandard(_) => toggle(session, command.row(), Label::NotStandard),
            Command::Unset(_) => Msg::LabelSet {
                row: command.row().unwrap_or_default(),
                label: Label::Unset,
            },
            Command::Reason(_, text) => Msg::ReasonChanged {
                row: command.row().unwrap_or_default(),
                text: text.clone(),
            },
        };

        let row = command.row();
        if session.dispatch(msg) {
            match row {
                Some(_) => show_row(session, row),
                None => println!("{}", render::render_status(&session.view())),
            }
        } else if row.is_some_and(|index| index >= session.view().rows.len()) {
            println!("row {} is out of range", row.map_or(0, |index| index + 1));
        }
    }

    let pending = session.view().pending_edits;
    if pending > 0 {
        println!("{pending} edited rows were not saved");
    }
    Ok(())
}

/// Paired-checkbox semantics: toggling the selected control clears it.
fn toggle(session: &Session, row: Option<usize>, control: Label) -> Msg {
    let row = row.unwrap_or_default();
    let checked = session.label_of(row) != control;
    match control {
        Label::NotStandard => Msg::NotStandardToggled { row, checked },
        _ => Msg::StandardToggled { row, checked },
    }
}

fn show_row(session: &Session, row: Option<usize>) {
    let view = session.view();
    match row.and_then(|index| view.rows.get(index)) {
        Some(row) => println!("{}", render::render_row(row)),
        None => println!("no such row"),
    }
}
