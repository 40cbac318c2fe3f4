//! Async machine loop with player controls.
//!
//! This module provides [`run_machine`], the top-level async function that
//! drives a [`Session`] with support for:
//!
//! - **Fixed-period ticks**: the first tick fires as soon as the clock
//!   starts, then one per cycle while it runs; the period is latched when a
//!   cycle begins, so interval changes apply from the next cycle
//! - **Player commands**: start, stop, interval, actions, reset, and status
//!   requests arrive on an `mpsc` channel and are applied between ticks
//! - **Bounded runs**: stop after `max_ticks` or `max_real_time_seconds`
//! - **Clean shutdown**: on request, or once input is gone and the clock
//!   has stopped
//!
//! Ticks and commands are handled on the same task, so nothing in the
//! simulation state needs a lock.

use std::time::Duration;

use machine_types::{Action, ActionOutcome, MachineSnapshot};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::clock::ClockError;
use crate::countdown::{CountdownSender, CycleWindow};
use crate::math::ArithmeticError;
use crate::session::{Session, StartOutcome};
use crate::tick::{TickError, TickSummary};

/// Errors that can occur during a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },

    /// An action could not be applied.
    #[error("action error: {source}")]
    Action {
        /// The underlying arithmetic error.
        #[from]
        source: ArithmeticError,
    },

    /// The session could not be rebuilt on reset.
    #[error("reset failed: {source}")]
    Reset {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// A request sent to the running machine.
#[derive(Debug)]
pub enum Command {
    /// Start the clock.
    Start,
    /// Stop the clock.
    Stop,
    /// Change the tick period (milliseconds) from the next cycle on.
    SetInterval(u64),
    /// Dispatch a player action.
    Execute(Action),
    /// Start a fresh session from configuration.
    Reset,
    /// Reply with the current snapshot.
    Status(oneshot::Sender<MachineSnapshot>),
    /// End the run.
    Shutdown,
}

/// Outcome of a clock control command, reported to the callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    /// A start was requested.
    Start(StartOutcome),
    /// A stop was requested; `was_running` is false when it was a no-op.
    Stop {
        /// Whether the clock was running before.
        was_running: bool,
    },
    /// The tick period changed.
    IntervalChanged {
        /// Period before the change.
        previous_ms: u64,
        /// Period from the next cycle on.
        interval_ms: u64,
    },
    /// The requested tick period was refused.
    IntervalRejected(ClockError),
    /// The session was rebuilt from configuration.
    Reset,
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEndReason {
    /// A [`Command::Shutdown`] was received.
    Shutdown,
    /// The command channel closed and the clock is stopped.
    InputClosed,
    /// `simulation.max_ticks` ticks ran.
    MaxTicksReached,
    /// `simulation.max_real_time_seconds` elapsed.
    MaxRealTimeReached,
}

/// Result of a run.
#[derive(Debug)]
pub struct RunResult {
    /// The reason the run ended.
    pub end_reason: RunEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed during this run.
    pub total_ticks: u64,
    /// The machine as it was when the run ended.
    pub final_snapshot: MachineSnapshot,
}

/// Callback invoked with a fresh snapshot after every tick and action.
///
/// Implementations render the snapshot, forward it to a UI, record it for
/// tests, etc.
pub trait MachineCallback: Send {
    /// Called after a tick completes.
    fn on_tick(&mut self, summary: &TickSummary, snapshot: &MachineSnapshot);

    /// Called after an action was dispatched, whether it ran or not.
    fn on_action(&mut self, outcome: &ActionOutcome, snapshot: &MachineSnapshot);

    /// Called after a clock control command was handled.
    fn on_control(&mut self, _event: &ControlEvent, _snapshot: &MachineSnapshot) {}
}

/// A callback that ignores everything.
pub struct NoOpCallback;

impl MachineCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _snapshot: &MachineSnapshot) {}

    fn on_action(&mut self, _outcome: &ActionOutcome, _snapshot: &MachineSnapshot) {}
}

/// Run the machine until a termination condition is met.
///
/// # Arguments
///
/// * `session` - The game being played
/// * `commands` - Player commands; closing the channel ends the run once the
///   clock stops
/// * `countdown` - Receives the cycle in flight, `None` while stopped
/// * `callback` - Called with a snapshot after every tick and command
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick, action, or reset fails unrecoverably.
pub async fn run_machine(
    session: &mut Session,
    commands: &mut mpsc::Receiver<Command>,
    countdown: &CountdownSender,
    callback: &mut dyn MachineCallback,
) -> Result<RunResult, RunnerError> {
    let bounds = session.config().simulation.clone();
    let time_limit = (bounds.max_real_time_seconds > 0)
        .then(|| Instant::now().checked_add(Duration::from_secs(bounds.max_real_time_seconds)))
        .flatten();

    let mut window: Option<CycleWindow> = None;
    let mut input_open = true;
    let mut progress = RunProgress::default();

    info!(
        session_id = %session.id(),
        running = session.is_running(),
        tick_interval_ms = session.interval_ms(),
        max_ticks = bounds.max_ticks,
        max_real_time_seconds = bounds.max_real_time_seconds,
        "Machine loop starting"
    );

    loop {
        // --- Fire on start, or disarm on stop ---
        if session.is_running() {
            if window.is_none() {
                if fire(session, callback, &mut progress, bounds.max_ticks)? {
                    return Ok(finish(session, countdown, RunEndReason::MaxTicksReached, progress));
                }
                window = arm_next_cycle(session, countdown);
                continue;
            }
        } else if window.take().is_some() {
            countdown.send_replace(None);
        }

        // --- Nothing left to drive the machine ---
        if !input_open && !session.is_running() {
            info!("Input closed and clock stopped");
            return Ok(finish(session, countdown, RunEndReason::InputClosed, progress));
        }

        let tick_at = window.as_ref().map(CycleWindow::deadline);

        tokio::select! {
            biased;

            received = commands.recv(), if input_open => {
                match received {
                    None => {
                        input_open = false;
                        debug!("Command channel closed");
                    }
                    Some(Command::Shutdown) => {
                        info!("Shutdown requested");
                        return Ok(finish(session, countdown, RunEndReason::Shutdown, progress));
                    }
                    Some(command) => {
                        if handle_command(session, command, callback)? {
                            window = None;
                        }
                    }
                }
            }

            () = sleep_until_opt(tick_at) => {
                if fire(session, callback, &mut progress, bounds.max_ticks)? {
                    return Ok(finish(session, countdown, RunEndReason::MaxTicksReached, progress));
                }
                window = arm_next_cycle(session, countdown);
            }

            () = sleep_until_opt(time_limit) => {
                info!(max_seconds = bounds.max_real_time_seconds, "Real-time limit reached");
                return Ok(finish(session, countdown, RunEndReason::MaxRealTimeReached, progress));
            }
        }
    }
}

/// Ticks completed so far in this run.
#[derive(Default)]
struct RunProgress {
    last_summary: Option<TickSummary>,
    total_ticks: u64,
}

/// Run one tick and report it. Returns `true` once `max_ticks` is reached.
fn fire(
    session: &mut Session,
    callback: &mut dyn MachineCallback,
    progress: &mut RunProgress,
    max_ticks: u64,
) -> Result<bool, RunnerError> {
    let summary = session.tick()?;
    progress.total_ticks = progress.total_ticks.saturating_add(1);
    callback.on_tick(&summary, &session.snapshot());

    let limit_reached = max_ticks > 0 && progress.total_ticks >= max_ticks;
    if limit_reached {
        info!(tick = summary.tick, max_ticks, "Tick limit reached");
    }
    progress.last_summary = Some(summary);
    Ok(limit_reached)
}

/// Open the next cycle with the current period, or none if the tick
/// stopped the clock.
fn arm_next_cycle(session: &Session, countdown: &CountdownSender) -> Option<CycleWindow> {
    let next = session
        .is_running()
        .then(|| CycleWindow::starting_now(Duration::from_millis(session.interval_ms())));
    countdown.send_replace(next);
    next
}

/// Apply one command. Returns `true` when the cycle in flight must be
/// discarded.
fn handle_command(
    session: &mut Session,
    command: Command,
    callback: &mut dyn MachineCallback,
) -> Result<bool, RunnerError> {
    let event = match command {
        Command::Start => ControlEvent::Start(session.start()),
        Command::Stop => ControlEvent::Stop {
            was_running: session.stop(),
        },
        Command::SetInterval(ms) => match session.set_interval_ms(ms) {
            Ok(previous_ms) => ControlEvent::IntervalChanged {
                previous_ms,
                interval_ms: ms,
            },
            Err(e) => {
                warn!(requested_ms = ms, error = %e, "Interval change refused");
                ControlEvent::IntervalRejected(e)
            }
        },
        Command::Execute(action) => {
            let outcome = session.execute(&action)?;
            callback.on_action(&outcome, &session.snapshot());
            return Ok(false);
        }
        Command::Reset => {
            session.reset()?;
            callback.on_control(&ControlEvent::Reset, &session.snapshot());
            return Ok(true);
        }
        Command::Status(reply) => {
            if reply.send(session.snapshot()).is_err() {
                debug!("Status requester went away");
            }
            return Ok(false);
        }
        Command::Shutdown => return Ok(false),
    };
    callback.on_control(&event, &session.snapshot());
    Ok(false)
}

/// Sleep until `deadline`, or forever when there is none.
async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}

fn finish(
    session: &Session,
    countdown: &CountdownSender,
    end_reason: RunEndReason,
    progress: RunProgress,
) -> RunResult {
    countdown.send_replace(None);
    RunResult {
        end_reason,
        final_summary: progress.last_summary,
        total_ticks: progress.total_ticks,
        final_snapshot: session.snapshot(),
    }
}

/// Log the end of a run.
///
/// Call this after [`run_machine`] returns.
pub fn log_run_end(result: &RunResult) {
    let snapshot = &result.final_snapshot;
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        halted = ?snapshot.halted,
        "Machine loop ended"
    );

    if result.final_summary.is_some() {
        info!(
            session_id = %snapshot.session_id,
            tick = snapshot.tick,
            energy = %snapshot.energy.current,
            output = %snapshot.output.current,
            wear = %snapshot.wear.current,
            "Final machine state"
        );
    } else {
        warn!("Machine loop ended with no ticks executed");
    }
}
