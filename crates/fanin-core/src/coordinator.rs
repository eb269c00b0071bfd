//! One coordinator per invocation.
//!
//! The host starts one process per selected file, all within a few tens of
//! milliseconds. Each process:
//!
//! 1. **registers** its path: append to the collection, stamp the last-update
//!    time, drop any stale leader flag (one critical section)
//! 2. **debounces**: sleeps outside the lock so siblings can register
//! 3. **elects**: under the lock, claims leadership only if no leader exists
//!    and nothing registered for at least the quiescence threshold. The leader
//!    reads the snapshot and clears the session in that same critical section.
//! 4. **leads** (leader only): resolves the snapshot and starts the engine
//!
//! Every phase ends in a tagged [`Outcome`]; nothing is propagated to the
//! invoker.

use std::{
    fmt,
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use crate::{
    clock::{Clock, SystemClock},
    config::{Config, TimingConfig},
    diagnostics::Diagnostics,
    launcher::Launcher,
    lock::Locked,
    resolve::resolve_inputs,
    state::{LastUpdate, SessionStore},
    Error, Result,
};

/// Protocol phase an outcome refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    Register,
    Elect,
    Launch,
}

/// Why an instance did not become leader.
#[derive(Debug, Clone, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum AbstainReason {
    /// Another instance already claimed this wave
    LeaderPresent,
    /// The wave is still receiving registrations
    StillArriving { elapsed: Duration },
    /// No timestamp file: a leader already finished this wave
    WaveClosed,
    /// Timestamp or collection exists but cannot be read
    StateUnreadable(Error),
}

/// Result of the leadership check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Election {
    /// This instance leads; carries the collection read before clearing
    Leader(Vec<String>),
    Abstain(AbstainReason),
}

/// Final, tagged result of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Leader started the engine with these inputs
    Launched { inputs: Vec<PathBuf> },
    /// Leader found no surviving inputs; state was still cleared
    LeaderWithoutInputs,
    Abstained(AbstainReason),
    /// The session lock stayed contended for the whole timeout
    TimedOut(Phase),
    Failed { phase: Phase, error: Error },
}

impl Outcome {
    pub const fn is_leader(&self) -> bool {
        matches!(
            self,
            Self::Launched { .. }
                | Self::LeaderWithoutInputs
                | Self::Failed {
                    phase: Phase::Launch,
                    ..
                }
        )
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Launched { inputs } => write!(f, "launched with {} input(s)", inputs.len()),
            Self::LeaderWithoutInputs => write!(f, "led an empty wave"),
            Self::Abstained(AbstainReason::StillArriving { elapsed }) => {
                write!(f, "abstained: still arriving ({}ms)", elapsed.as_millis())
            }
            Self::Abstained(reason) => write!(f, "abstained: {reason}"),
            Self::TimedOut(phase) => write!(f, "timed out waiting for the lock in {phase}"),
            Self::Failed { phase, error } => write!(f, "{phase} failed: {error}"),
        }
    }
}

/// Drives one invocation through register → debounce → elect → lead.
#[derive(Debug)]
pub struct Coordinator<C, L> {
    store: SessionStore,
    debounce: Duration,
    quiescence: Duration,
    clock: C,
    launcher: L,
    diagnostics: Diagnostics,
}

impl<L: Launcher> Coordinator<SystemClock, L> {
    /// Coordinator over the session described by `config`, on the wall clock.
    pub fn from_config(config: &Config, launcher: L) -> Result<Self> {
        let store = SessionStore::from_config(config)?;
        Ok(Self::new(store, &config.timing, SystemClock, launcher))
    }
}

impl<C: Clock, L: Launcher> Coordinator<C, L> {
    pub fn new(store: SessionStore, timing: &TimingConfig, clock: C, launcher: L) -> Self {
        let diagnostics = Diagnostics::new(store.paths().error_log.clone());
        Self {
            store,
            debounce: timing.debounce(),
            quiescence: timing.quiescence(),
            clock,
            launcher,
            diagnostics,
        }
    }

    pub const fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Run the whole protocol for one selected path.
    pub fn run(&self, path: &Path) -> Outcome {
        match self.register(path) {
            Ok(Locked::Held(())) => {}
            Ok(Locked::TimedOut) => return Self::settle(Outcome::TimedOut(Phase::Register)),
            Err(error) => return self.fail(Phase::Register, error),
        }

        thread::sleep(self.debounce);

        let outcome = match self.elect() {
            Ok(Locked::Held(Election::Leader(snapshot))) => self.lead(&snapshot),
            Ok(Locked::Held(Election::Abstain(reason))) => {
                if let AbstainReason::StateUnreadable(error) = &reason {
                    self.diagnostics.record(Phase::Elect, error);
                }
                Outcome::Abstained(reason)
            }
            Ok(Locked::TimedOut) => Outcome::TimedOut(Phase::Elect),
            Err(error) => return self.fail(Phase::Elect, error),
        };
        Self::settle(outcome)
    }

    /// Add `path` to the current wave, or start a new wave with it.
    ///
    /// The path is stored absolute. Paths that are not valid UTF-8 or contain
    /// a line break cannot be recorded in the collection and are refused.
    pub fn register(&self, path: &Path) -> Result<Locked<()>> {
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let entry = absolute
            .to_str()
            .ok_or_else(|| Error::invalid_path(&absolute, "not valid UTF-8"))?;
        if entry.contains(['\n', '\r']) {
            return Err(Error::invalid_path(&absolute, "contains a line break"));
        }

        let registered = self.store.locked(|state| {
            let now = self.clock.now();
            state.append(entry)?;
            state.touch(now)?;
            state.clear_leader()?;
            Ok(now)
        })?;

        Ok(registered.map(|at| {
            tracing::debug!("registered {entry} at {at}");
        }))
    }

    /// Check-and-claim leadership in one critical section.
    ///
    /// The collection is read before the claim, so an unreadable wave is
    /// abstained from without leaving a leader flag behind. A successful claim
    /// clears every wave file before the lock is released. Cleanup is
    /// best-effort: a failure is logged and the leader keeps its snapshot.
    pub fn elect(&self) -> Result<Locked<Election>> {
        self.store.locked(|state| {
            if state.leader_present() {
                return Ok(Election::Abstain(AbstainReason::LeaderPresent));
            }

            let last = match state.last_update() {
                Ok(LastUpdate::At(at)) => at,
                Ok(LastUpdate::Absent) => return Ok(Election::Abstain(AbstainReason::WaveClosed)),
                Err(error) => return Ok(Election::Abstain(AbstainReason::StateUnreadable(error))),
            };
            let snapshot = match state.snapshot() {
                Ok(snapshot) => snapshot,
                Err(error) => return Ok(Election::Abstain(AbstainReason::StateUnreadable(error))),
            };

            let elapsed = self.clock.now().saturating_since(last);
            if elapsed < self.quiescence {
                return Ok(Election::Abstain(AbstainReason::StillArriving { elapsed }));
            }

            state.set_leader()?;
            if let Err(error) = state.clear() {
                self.diagnostics.record(Phase::Elect, &error);
            }
            tracing::debug!(
                "elected leader after {}ms of quiet, {} registration(s)",
                elapsed.as_millis(),
                snapshot.len()
            );
            Ok(Election::Leader(snapshot))
        })
    }

    /// Resolve the snapshot and hand it to the launcher.
    pub fn lead<S: AsRef<str>>(&self, snapshot: &[S]) -> Outcome {
        let inputs = resolve_inputs(snapshot);
        if inputs.is_empty() {
            return Outcome::LeaderWithoutInputs;
        }

        match self.launcher.launch(&inputs) {
            Ok(()) => Outcome::Launched { inputs },
            Err(error) => self.fail(Phase::Launch, error),
        }
    }

    fn fail(&self, phase: Phase, error: Error) -> Outcome {
        self.diagnostics.record(phase, &error);
        Self::settle(Outcome::Failed { phase, error })
    }

    fn settle(outcome: Outcome) -> Outcome {
        tracing::debug!("{outcome}");
        outcome
    }
}
