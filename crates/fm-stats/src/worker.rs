//! Background statistics worker
//!
//! Runs simulations on a dedicated thread so the host never blocks on a long
//! run. Commands arrive over an unbounded channel and are drained between
//! batches; events leave over a bounded channel sized by
//! [`SimConfig::event_capacity`].

use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{
    Receiver, SendTimeoutError, Sender, TryRecvError, bounded, unbounded,
};
use fm_slot::MachineConfig;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::error::{StatsError, StatsResult};
use crate::protocol::{DriverEvent, HostCommand};
use crate::run::{RunOutcome, SimulationRun};

/// How often a worker blocked on a full event channel checks for shutdown
const EMIT_POLL: Duration = Duration::from_millis(50);

/// Worker lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl RunState {
    pub fn is_running(self) -> bool {
        self == Self::Running
    }
}

/// Handle to the background worker thread
pub struct StatisticsWorker {
    commands: Option<Sender<HostCommand>>,
    events: Receiver<DriverEvent>,
    state: Arc<Mutex<RunState>>,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl StatisticsWorker {
    /// Spawn the worker thread
    pub fn spawn(sim: SimConfig) -> StatsResult<Self> {
        let (command_tx, command_rx) = unbounded();
        let (event_tx, event_rx) = bounded(sim.event_capacity.max(1));
        let state = Arc::new(Mutex::new(RunState::Idle));
        let shutdown = Arc::new(AtomicBool::new(false));

        let driver = Driver {
            commands: command_rx,
            events: event_tx,
            state: Arc::clone(&state),
            shutdown: Arc::clone(&shutdown),
            sim,
        };
        let handle = thread::Builder::new()
            .name("fm-stats-worker".into())
            .spawn(move || driver.run_loop())?;

        log::debug!("Statistics worker started");

        Ok(Self {
            commands: Some(command_tx),
            events: event_rx,
            state,
            shutdown,
            handle: Some(handle),
        })
    }

    /// Start a run. Rejected while another run is in progress.
    pub fn start(&self, config: MachineConfig, iterations: u64) -> StatsResult<()> {
        if iterations == 0 {
            return Err(StatsError::InvalidIterations(iterations));
        }
        {
            let mut state = self.state.lock();
            if state.is_running() {
                return Err(StatsError::AlreadyRunning);
            }
            *state = RunState::Running;
        }
        self.send(HostCommand::start(config, iterations))
    }

    /// Request cancellation at the next batch boundary
    pub fn stop(&self) -> StatsResult<()> {
        self.send(HostCommand::Stop)
    }

    /// Forward a raw protocol command
    pub fn send(&self, command: HostCommand) -> StatsResult<()> {
        self.commands
            .as_ref()
            .ok_or(StatsError::WorkerDisconnected)?
            .send(command)
            .map_err(|_| StatsError::WorkerDisconnected)
    }

    /// Progress, result and error events, in emission order
    pub fn events(&self) -> &Receiver<DriverEvent> {
        &self.events
    }

    pub fn state(&self) -> RunState {
        *self.state.lock()
    }

    /// Cancel any run, stop the thread and wait for it
    pub fn shutdown(mut self) -> StatsResult<()> {
        self.close()
    }

    fn close(&mut self) -> StatsResult<()> {
        self.shutdown.store(true, Ordering::Release);
        // Disconnecting the command channel wakes an idle worker
        self.commands.take();

        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| {
                log::error!("Statistics worker panicked");
                StatsError::WorkerDisconnected
            }),
            None => Ok(()),
        }
    }
}

impl Drop for StatisticsWorker {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// What the worker should do after looking at pending commands
enum Pending {
    Continue,
    Stop,
    Exit,
}

/// Worker-thread side
struct Driver {
    commands: Receiver<HostCommand>,
    events: Sender<DriverEvent>,
    state: Arc<Mutex<RunState>>,
    shutdown: Arc<AtomicBool>,
    sim: SimConfig,
}

impl Driver {
    fn run_loop(self) {
        while let Ok(command) = self.commands.recv() {
            match command {
                HostCommand::Start { config, iterations } => {
                    if !self.execute(*config, iterations) {
                        break;
                    }
                }
                HostCommand::Stop => log::debug!("Stop ignored: no simulation running"),
            }
        }
        log::debug!("Statistics worker exiting");
    }

    /// Run one simulation. Returns false when the worker should exit.
    fn execute(&self, config: MachineConfig, iterations: u64) -> bool {
        self.set_state(RunState::Running);

        let run = match SimulationRun::new(config, iterations, self.sim.clone()) {
            Ok(run) => run,
            Err(e) => return self.fail(e),
        };

        let mut exit = false;
        let outcome = run.run(|progress| {
            if !self.emit(DriverEvent::Progress(progress)) {
                exit = true;
                return ControlFlow::Break(());
            }
            match self.drain_commands() {
                Pending::Continue => {
                    thread::yield_now();
                    ControlFlow::Continue(())
                }
                Pending::Stop => ControlFlow::Break(()),
                Pending::Exit => {
                    exit = true;
                    ControlFlow::Break(())
                }
            }
        });

        match outcome {
            Ok(RunOutcome::Completed(result)) => {
                self.set_state(RunState::Completed);
                self.emit(DriverEvent::Result(result))
            }
            Ok(RunOutcome::Cancelled) => {
                self.set_state(RunState::Cancelled);
                !exit
            }
            Err(e) => self.fail(e),
        }
    }

    fn drain_commands(&self) -> Pending {
        loop {
            match self.commands.try_recv() {
                Ok(HostCommand::Stop) => return Pending::Stop,
                Ok(HostCommand::Start { .. }) => {
                    log::warn!("Start ignored: a simulation is already running");
                }
                Err(TryRecvError::Empty) => return Pending::Continue,
                Err(TryRecvError::Disconnected) => return Pending::Exit,
            }
        }
    }

    fn fail(&self, error: StatsError) -> bool {
        log::error!("Simulation aborted: {error}");
        self.set_state(RunState::Failed);
        self.emit(DriverEvent::Error {
            message: error.to_string(),
        })
    }

    /// Blocking send that gives up on shutdown. Returns false if the host is gone.
    fn emit(&self, event: DriverEvent) -> bool {
        let mut event = event;
        loop {
            match self.events.send_timeout(event, EMIT_POLL) {
                Ok(()) => return true,
                Err(SendTimeoutError::Timeout(pending)) => {
                    if self.shutdown.load(Ordering::Acquire) {
                        return false;
                    }
                    event = pending;
                }
                Err(SendTimeoutError::Disconnected(_)) => return false,
            }
        }
    }

    fn set_state(&self, state: RunState) {
        *self.state.lock() = state;
    }
}
