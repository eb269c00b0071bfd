//! Starting the external merge engine.
//!
//! The engine runs detached: no inherited stdio, its own process group on Unix,
//! no console window on Windows. The child is never waited on.

use std::{
    ffi::OsString,
    path::PathBuf,
    process::{Command, Stdio},
};

use crate::{config::EngineConfig, Error, Result};

/// Hands a resolved input list to whatever produces the merged document.
pub trait Launcher {
    /// Start the merge for `inputs`. Returns once the start has been issued.
    fn launch(&self, inputs: &[PathBuf]) -> Result<()>;
}

impl<L: Launcher + ?Sized> Launcher for &L {
    fn launch(&self, inputs: &[PathBuf]) -> Result<()> {
        (**self).launch(inputs)
    }
}

/// Launches the configured engine executable as a detached process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineLauncher {
    program: String,
    leading_args: Vec<String>,
    destination: Option<(String, PathBuf)>,
}

impl EngineLauncher {
    pub fn new(engine: &EngineConfig) -> Self {
        Self {
            program: engine.program.clone(),
            leading_args: engine.args.clone(),
            destination: None,
        }
    }

    /// Pass an explicit output path to the engine as `<output_flag> <path>`.
    pub fn with_destination(mut self, flag: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.destination = Some((flag.into(), path.into()));
        self
    }

    /// Full argument vector handed to the engine, program excluded.
    ///
    /// Paths are passed through as OS strings, byte for byte.
    pub fn arguments(&self, inputs: &[PathBuf]) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.leading_args.iter().map(OsString::from).collect();
        args.extend(inputs.iter().map(|p| p.as_os_str().to_owned()));
        if let Some((flag, path)) = &self.destination {
            args.push(flag.into());
            args.push(path.as_os_str().to_owned());
        }
        args
    }

    fn command(&self, inputs: &[PathBuf]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.arguments(inputs))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        detach(&mut cmd);
        cmd
    }
}

impl Launcher for EngineLauncher {
    // The engine outlives us; it is reparented and reaped once we exit.
    #[allow(clippy::zombie_processes)]
    fn launch(&self, inputs: &[PathBuf]) -> Result<()> {
        let child = self.command(inputs).spawn().map_err(|e| Error::Launch {
            program: self.program.clone(),
            reason: e.to_string(),
        })?;
        tracing::debug!(
            "started merge engine {} (pid {}) with {} input(s)",
            self.program,
            child.id(),
            inputs.len()
        );
        Ok(())
    }
}

#[cfg(unix)]
fn detach(cmd: &mut Command) {
    use std::os::unix::process::CommandExt;

    // New process group so terminal signals aimed at us skip the engine
    cmd.process_group(0);
}

#[cfg(windows)]
fn detach(cmd: &mut Command) {
    use std::os::windows::process::CommandExt;

    const DETACHED_PROCESS: u32 = 0x0000_0008;
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    cmd.creation_flags(DETACHED_PROCESS | CREATE_NO_WINDOW);
}

#[cfg(not(any(unix, windows)))]
const fn detach(_cmd: &mut Command) {}
