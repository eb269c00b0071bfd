//! CLI command handlers that bridge between `clap` and `fanin-core`

use std::{
    ffi::OsString,
    fmt,
    path::PathBuf,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{error::ErrorKind, ArgMatches};
use fanin_core::{
    config::{load_config, load_config_from},
    diagnostics::Diagnostics,
    Clock, Config, Coordinator, EngineLauncher, LastUpdate, Locked, Phase, SessionPaths,
    SessionStore, SystemClock,
};
use serde::Serialize;

use crate::cli::build_cli;

/// Session lock stayed contended past the configured timeout.
#[derive(Debug)]
pub struct LockBusy {
    lock: PathBuf,
    timeout: Duration,
}

impl fmt::Display for LockBusy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "session lock {} still held after {}ms; a wave may be in progress",
            self.lock.display(),
            self.timeout.as_millis()
        )
    }
}

impl std::error::Error for LockBusy {}

impl LockBusy {
    pub const EXIT_CODE: i32 = 3;

    fn for_store(store: &SessionStore, config: &Config) -> Self {
        Self {
            lock: store.paths().lock.clone(),
            timeout: config.timing.lock_timeout(),
        }
    }
}

/// Format an error for user display (no stack traces)
pub fn format_error(err: &anyhow::Error) -> String {
    let msg = err.to_string();
    if let Some(source) = err.source() {
        let source_msg = source.to_string();
        if !msg.contains(&source_msg) && !source_msg.is_empty() {
            return format!("{msg}\nCause: {source_msg}");
        }
    }
    msg
}

/// Layered configuration with the CLI flags found in `matches` applied last.
fn resolve_config(matches: &ArgMatches) -> fanin_core::Result<Config> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    if let Some(dir) = matches.get_one::<PathBuf>("state-dir") {
        config.state_dir = Some(dir.clone());
        config.validate()?;
    }
    Ok(config)
}

/// Register one path and take part in its wave.
///
/// Never fails: every problem ends up in the diagnostic log and the process
/// exits successfully, since the invoking file manager shows nothing anyway.
pub fn handle_coordinate(matches: &ArgMatches) -> Result<()> {
    let path = matches
        .get_one::<PathBuf>("path")
        .ok_or_else(|| anyhow::anyhow!("PATH is required"))?;

    let config = match resolve_config(matches) {
        Ok(config) => config,
        Err(e) => {
            let dir = matches
                .get_one::<PathBuf>("state-dir")
                .cloned()
                .unwrap_or_else(std::env::temp_dir);
            Diagnostics::new(SessionPaths::in_dir(dir).error_log).record(Phase::Register, &e);
            return Ok(());
        }
    };

    let launcher = match matches.get_one::<PathBuf>("output") {
        Some(output) => EngineLauncher::new(&config.engine)
            .with_destination(config.engine.output_flag.clone(), output.clone()),
        None => EngineLauncher::new(&config.engine),
    };

    match Coordinator::from_config(&config, launcher) {
        Ok(coordinator) => {
            let outcome = coordinator.run(path);
            tracing::info!("{}: {outcome}", path.display());
        }
        Err(e) => Diagnostics::new(SessionPaths::in_dir(config.session_dir()).error_log)
            .record(Phase::Register, &e),
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct StatusReport {
    state_dir: PathBuf,
    leader_present: bool,
    last_update: LastUpdateReport,
    entries: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
enum LastUpdateReport {
    Absent,
    Unreadable { reason: String },
    At { timestamp: String, age_ms: u64 },
}

impl LastUpdateReport {
    fn describe(&self) -> String {
        match self {
            Self::Absent => "none (no wave in progress)".to_string(),
            Self::Unreadable { reason } => format!("unreadable ({reason})"),
            Self::At { timestamp, age_ms } => format!("{age_ms}ms ago ({timestamp})"),
        }
    }
}

/// Read the session under the lock. Ages are measured once the lock is held.
fn read_status(
    store: &SessionStore,
    clock: &impl Clock,
) -> fanin_core::Result<Locked<StatusReport>> {
    store.locked(|state| {
        let now = clock.now();
        let last_update = match state.last_update() {
            Ok(LastUpdate::Absent) => LastUpdateReport::Absent,
            Ok(LastUpdate::At(at)) => LastUpdateReport::At {
                timestamp: at.to_string(),
                age_ms: u64::try_from(now.saturating_since(at).as_millis()).unwrap_or(u64::MAX),
            },
            Err(e) => LastUpdateReport::Unreadable {
                reason: e.to_string(),
            },
        };
        Ok(StatusReport {
            state_dir: store.paths().dir.clone(),
            leader_present: state.leader_present(),
            last_update,
            entries: state.snapshot()?,
        })
    })
}

pub fn handle_status(sub_m: &ArgMatches) -> Result<()> {
    let config = resolve_config(sub_m).context("Failed to load configuration")?;
    let store = SessionStore::from_config(&config)?;

    let Locked::Held(report) = read_status(&store, &SystemClock)? else {
        return Err(LockBusy::for_store(&store, &config).into());
    };

    if sub_m.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_status(&report);
    }
    Ok(())
}

fn print_status(report: &StatusReport) {
    println!("State directory: {}", report.state_dir.display());
    println!("Last update:     {}", report.last_update.describe());
    println!(
        "Leader flag:     {}",
        if report.leader_present { "present" } else { "absent" }
    );
    println!("Registered ({}):", report.entries.len());
    for entry in &report.entries {
        println!("  {entry}");
    }
}

pub fn handle_reset(sub_m: &ArgMatches) -> Result<()> {
    let config = resolve_config(sub_m).context("Failed to load configuration")?;
    let store = SessionStore::from_config(&config)?;

    match store.locked(|state| state.clear())? {
        Locked::Held(()) => {
            println!("Cleared session state in {}", store.paths().dir.display());
            Ok(())
        }
        Locked::TimedOut => Err(LockBusy::for_store(&store, &config).into()),
    }
}

/// Help, version and mistakes in a maintenance command belong on the terminal.
/// Any other parse failure is a malformed call from the file manager.
fn reports_to_terminal(err: &clap::Error, args: &[OsString]) -> bool {
    matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
        || args
            .get(1)
            .is_some_and(|first| first == "status" || first == "reset")
}

/// Log a malformed coordinate invocation where its session would have.
fn record_usage_error(err: &clap::Error) {
    let dir = load_config().map_or_else(|_| std::env::temp_dir(), |config| config.session_dir());
    let rendered = err.render().to_string();
    let message = rendered
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ");
    Diagnostics::new(SessionPaths::in_dir(dir).error_log)
        .record(Phase::Register, &fanin_core::Error::Usage(message.to_string()));
}

pub fn run_cli() -> Result<()> {
    let args: Vec<OsString> = std::env::args_os().collect();
    let matches = match build_cli().try_get_matches_from(&args) {
        Ok(matches) => matches,
        Err(err) if reports_to_terminal(&err, &args) => err.exit(),
        Err(err) => {
            record_usage_error(&err);
            return Ok(());
        }
    };

    match matches.subcommand() {
        Some(("status", sub_m)) => handle_status(sub_m),
        Some(("reset", sub_m)) => handle_reset(sub_m),
        _ => handle_coordinate(&matches),
    }
}

/// Process exit code for a failed maintenance command.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<LockBusy>().is_some() {
        return LockBusy::EXIT_CODE;
    }
    err.chain()
        .find_map(|cause| cause.downcast_ref::<fanin_core::Error>())
        .map_or(1, fanin_core::Error::exit_code)
}
