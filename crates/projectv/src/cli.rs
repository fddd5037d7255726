//! Command definitions shared by the one-shot CLI and the interactive shell

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

/// Top-level parser for `projectv`
pub(crate) fn build() -> Command {
    Command::new("projectv")
        .version(projectv_core::VERSION)
        .about("dlab project manager: reset, golden references and tool launching")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Settings file (TOML); defaults to $PROJECTV_CONFIG"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Raise log verbosity (-v info, -vv debug)"),
        )
        .subcommand(Command::new("shell").about("Interactive session (default)"))
        .subcommands(actions())
        .subcommand(
            Command::new("hash")
                .about("Print the digest of a student name for hashed records")
                .arg(
                    Arg::new("name")
                        .required(true)
                        .num_args(1..)
                        .help("Student name (words are joined with spaces)"),
                )
                .arg(
                    Arg::new("salt")
                        .long("salt")
                        .help("Salt to use instead of the configured one"),
                )
                .arg(
                    Arg::new("id")
                        .long("id")
                        .requires("group")
                        .help("Print a full id@hash@group record with this id"),
                )
                .arg(
                    Arg::new("group")
                        .long("group")
                        .requires("id")
                        .help("Project group for the full record"),
                ),
        )
}

/// Parser for one shell line
pub(crate) fn shell() -> Command {
    Command::new("projectv")
        .no_binary_name(true)
        .subcommand_required(true)
        .disable_version_flag(true)
        .subcommands(actions())
        .subcommand(
            Command::new("select")
                .about("Select a golden item")
                .arg(Arg::new("item").required(true)),
        )
        .subcommand(Command::new("status").about("Show the loaded project and selection"))
        .subcommand(Command::new("quit").visible_alias("exit").about("Leave the shell"))
}

/// User actions available in both modes
fn actions() -> Vec<Command> {
    let json = || {
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Output as JSON")
    };
    let item = || Arg::new("item").help("Golden item (defaults to the current selection)");

    vec![
        Command::new("reload")
            .about("Locate the dlab* project in PROJECT_PUBLIC_ROOT")
            .arg(json()),
        Command::new("get")
            .about("Reset the public project for a student (destructive)")
            .arg(
                Arg::new("name")
                    .required(true)
                    .num_args(1..)
                    .help("Student name (words are joined with spaces)"),
            )
            .arg(
                Arg::new("yes")
                    .short('y')
                    .long("yes")
                    .action(ArgAction::SetTrue)
                    .help("Do not ask for confirmation"),
            ),
        Command::new("run-gui").about("Run `make run-gui` in the project, then show the latest log"),
        Command::new("log").about("Show the latest sim_result/*.log"),
        Command::new("wave").about("Open sim_result/wave.vcd in the waveform viewer"),
        Command::new("golden")
            .about("Golden reference artifacts")
            .subcommand_required(true)
            .subcommand(Command::new("list").about("List golden items").arg(json()))
            .subcommand(Command::new("log").about("Show golden/<item>.log").arg(item()))
            .subcommand(Command::new("wave").about("Open golden/<item>.vcd").arg(item())),
        Command::new("spec").about("Open the URL in ref/spec.url"),
        Command::new("code").about("Open design_src/*.v in the editor"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definitions_are_consistent() {
        build().debug_assert();
        shell().debug_assert();
    }

    #[test]
    fn get_joins_name_words() {
        let matches = build().try_get_matches_from(["projectv", "get", "Ada", "Lovelace", "--yes"]).unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "get");
        let words: Vec<&String> = args.get_many::<String>("name").unwrap().collect();
        assert_eq!(words, ["Ada", "Lovelace"]);
        assert!(args.get_flag("yes"));
    }

    #[test]
    fn shell_line_without_binary_name() {
        let matches = shell().try_get_matches_from(["golden", "log", "t2"]).unwrap();
        let (_, golden) = matches.subcommand().unwrap();
        let (sub, args) = golden.subcommand().unwrap();
        assert_eq!(sub, "log");
        assert_eq!(args.get_one::<String>("item").map(String::as_str), Some("t2"));
    }

    #[test]
    fn hash_record_needs_id_and_group() {
        assert!(build().try_get_matches_from(["projectv", "hash", "x", "--id", "s1"]).is_err());
        assert!(build()
            .try_get_matches_from(["projectv", "hash", "x", "--id", "s1", "--group", "dlab1"])
            .is_ok());
    }
}
