//! CLI command definitions using `clap`

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command as ClapCommand};

pub fn after_help_text(examples: &[&str]) -> String {
    let mut text = String::from("EXAMPLES:\n");
    for example in examples {
        text.push_str("  ");
        text.push_str(example);
        text.push('\n');
    }
    text
}

pub fn cmd_status() -> ClapCommand {
    ClapCommand::new("status")
        .about("Show the wave currently being collected")
        .long_about(
            "Reads the session state under the lock and prints the registered paths, \
             the age of the last registration and whether a leader flag is present.\n\n\
             Nothing is modified.",
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Output as JSON"),
        )
        .after_help(after_help_text(&[
            "fanin status                    Human-readable summary",
            "fanin status --json             Machine-readable summary",
        ]))
}

pub fn cmd_reset() -> ClapCommand {
    ClapCommand::new("reset")
        .about("Discard a stuck wave")
        .long_about(
            "Removes the collection, timestamp and leader flag files under the lock. \
             Use this when a crashed invocation left a wave behind.",
        )
        .after_help(after_help_text(&["fanin reset --state-dir /tmp/merge"]))
}

pub fn build_cli() -> ClapCommand {
    ClapCommand::new("fanin")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Fanin Contributors")
        .about("Fold a multi-file selection into one merge-engine launch")
        .long_about(
            "Register one selected file and, if this invocation ends up leading its \
             wave, start the merge engine with every file of the selection.\n\n\
             Configure the file manager to run `fanin <PATH>` once per selected file. \
             The invocations agree on a single leader through a lock in the state \
             directory; the others exit silently.",
        )
        .disable_help_subcommand(true)
        .args_conflicts_with_subcommands(true)
        .subcommand_negates_reqs(true)
        .arg(
            Arg::new("path")
                .value_name("PATH")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Selected file to register"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Merged document destination, passed to the engine if this invocation leads"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Config file to use instead of the global one"),
        )
        .arg(
            Arg::new("state-dir")
                .long("state-dir")
                .global(true)
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .help("Directory holding the shared session state"),
        )
        .subcommand(cmd_status())
        .subcommand(cmd_reset())
        .after_help(after_help_text(&[
            "fanin /home/me/scans/page1.pdf            Register one file of a selection",
            "fanin page1.pdf -o /home/me/merged.pdf    Name the output if this one leads",
            "fanin status --state-dir /tmp/merge       Inspect a session",
        ]))
}
