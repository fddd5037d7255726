//! Dispatch of parsed commands onto a [`Session`]

use crate::prompt;
use anyhow::Result;
use clap::ArgMatches;
use projectv_core::identity::{HashedRecord, NameDigest};
use projectv_core::logs::LogView;
use projectv_core::prelude::*;
use serde::Serialize;

/// How project state is obtained before an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Fresh process: locate the project first
    OneShot,
    /// Shell: use whatever the session already holds
    Shell,
}

/// Whether the shell keeps reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

pub(crate) fn dispatch<R: ProcessRunner>(
    session: &mut Session<R>,
    matches: &ArgMatches,
    mode: Mode,
) -> Result<Flow> {
    let Some((name, args)) = matches.subcommand() else {
        return Ok(Flow::Continue);
    };

    if mode == Mode::OneShot && !matches!(name, "reload" | "get" | "hash") {
        session.reload()?;
    }

    match name {
        "reload" => {
            session.reload()?;
            print_project(session, args.get_flag("json"))?;
        }
        "get" => get_project(session, args)?,
        "run-gui" => print_log(&session.run_gui()?),
        "log" => print_log(&session.show_log()?),
        "wave" => {
            session.show_waveform()?;
            println!("Waveform viewer started.");
        }
        "golden" => golden(session, args)?,
        "select" => {
            let item = required(args, "item");
            session.select_golden(item)?;
            println!("Selected {item}");
        }
        "status" => print_project(session, false)?,
        "spec" => {
            let url = session.open_spec()?;
            println!("Opening {url}");
        }
        "code" => {
            let count = session.open_code()?;
            println!("Editor started with {count} design sources.");
        }
        "hash" => hash(session.settings(), args)?,
        "quit" => return Ok(Flow::Quit),
        other => anyhow::bail!("unknown command: {other}"),
    }
    Ok(Flow::Continue)
}

fn required<'a>(args: &'a ArgMatches, id: &str) -> &'a str {
    args.get_one::<String>(id).map_or("", String::as_str)
}

fn words(args: &ArgMatches, id: &str) -> String {
    args.get_many::<String>(id)
        .map(|values| values.map(String::as_str).collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

fn get_project<R: ProcessRunner>(session: &mut Session<R>, args: &ArgMatches) -> Result<()> {
    let name = words(args, "name");
    let assume_yes = args.get_flag("yes");
    let mut confirm = |headline: &str, detail: &str| assume_yes || prompt::ask(headline, detail);

    match session.get_project(&name, &mut confirm)? {
        GetProjectOutcome::Cancelled(resolution) => {
            println!("Cancelled; {} was not reset.", resolution.project_group);
        }
        GetProjectOutcome::Reset { resolution, report } => {
            match &report.pull {
                PullOutcome::Updated => {}
                PullOutcome::Failed(status) => eprintln!("warning: git pull failed ({status})"),
                PullOutcome::NotRun(reason) => eprintln!("warning: git pull not run: {reason}"),
            }
            for removed in &report.removed {
                println!("Removed {}", removed.display());
            }
            println!(
                "Copied {} files for student {} into {}",
                report.files_copied,
                resolution.student_id,
                report.copied_to.display()
            );
            print_project(session, false)?;
        }
    }
    Ok(())
}

fn golden<R: ProcessRunner>(session: &mut Session<R>, args: &ArgMatches) -> Result<()> {
    let Some((action, sub)) = args.subcommand() else {
        return Ok(());
    };
    if let Some(item) = sub.try_get_one::<String>("item").ok().flatten() {
        session.select_golden(item)?;
    }

    match action {
        "list" => print_catalog(session.catalog(), sub.get_flag("json"))?,
        "log" => print_log(&session.show_golden_log()?),
        "wave" => {
            session.show_golden_waveform()?;
            println!("Waveform viewer started.");
        }
        other => anyhow::bail!("unknown golden command: {other}"),
    }
    Ok(())
}

fn hash(settings: &Settings, args: &ArgMatches) -> Result<()> {
    let name = words(args, "name");
    let salt = args
        .get_one::<String>("salt")
        .map_or(settings.identity.salt.as_str(), String::as_str);
    let digest = NameDigest::of_name(&name, salt);

    match (args.get_one::<String>("id"), args.get_one::<String>("group")) {
        (Some(id), Some(group)) => {
            let record = HashedRecord {
                id: id.clone(),
                digest,
                group: group.clone(),
            };
            println!("{}", record.to_line());
        }
        _ => println!("{digest}"),
    }
    Ok(())
}

fn print_log(view: &LogView) {
    if let Some(header) = view.header() {
        eprintln!("== {header}");
    }
    let text = view.text();
    if text.ends_with('\n') {
        print!("{text}");
    } else {
        println!("{text}");
    }
}

/// `reload --json` output; paths are rendered lossily
#[derive(Serialize)]
struct ProjectSummary<'a> {
    project: String,
    name: String,
    golden: &'a GoldenCatalog,
}

fn print_project<R: ProcessRunner>(session: &Session<R>, json: bool) -> Result<()> {
    let Some(project) = session.project() else {
        println!("No project loaded.");
        return Ok(());
    };
    if json {
        let summary = ProjectSummary {
            project: project.path().to_string_lossy().into_owned(),
            name: project.name(),
            golden: session.catalog(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    println!("Project: {}", project.path().display());
    print_catalog(session.catalog(), false)
}

fn print_catalog(catalog: &GoldenCatalog, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(catalog)?);
        return Ok(());
    }
    if catalog.is_empty() {
        println!("No golden items.");
        return Ok(());
    }
    println!("Golden items:");
    for (index, item) in catalog.items().iter().enumerate() {
        let marker = if catalog.selected_index() == Some(index) { '*' } else { ' ' };
        println!("  {marker} {item}");
    }
    Ok(())
}
