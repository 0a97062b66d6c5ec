//! Session runner
//!
//! Single writer for the session: every mutation, user action or automatic,
//! arrives as a [`SessionCommand`] on one queue and is applied in arrival
//! order. A ticker task feeds `Tick` once a second and a forwarder drains
//! monitor violations into the same queue, so countdown, strikes, and user
//! input can never interleave mid-update.

use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant};
use tracing::{debug, info, warn};
use violation_classifier::ViolationEvent;

use crate::controller::ExamController;
use crate::exam::Exam;
use crate::session::{format_remaining, is_low_time, ExamSession, SessionPhase, Warning};
use crate::{PolicyConfig, SessionError};

const COMMAND_CAPACITY: usize = 32;

/// A session mutation, applied in queue order
#[derive(Debug)]
pub enum SessionCommand {
    /// One countdown second
    Tick,
    Violation(ViolationEvent),
    Answer { question_id: u32, choice: String },
    Resume,
    Submit,
    Navigate(NavigateTo),
}

#[derive(Debug, Clone, Copy)]
pub enum NavigateTo {
    Next,
    Prev,
    Index(usize),
}

/// Read model published after every applied command
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub remaining_seconds: u32,
    pub is_paused: bool,
    pub warning_count: u32,
    pub pending_warning: Option<Warning>,
    pub current_question_index: usize,
    pub answers: HashMap<u32, String>,
    pub answered_count: usize,
    /// Auto-submit notice, present only after a strike-limit submission
    pub notice: Option<String>,
}

impl SessionSnapshot {
    fn of(controller: &ExamController) -> Self {
        let session = controller.session();
        Self {
            phase: session.phase,
            remaining_seconds: session.remaining_seconds,
            is_paused: session.phase == SessionPhase::Paused,
            warning_count: session.warning_count,
            pending_warning: controller.pending_warning().cloned(),
            current_question_index: session.current_question_index,
            answers: session.answers.clone(),
            answered_count: session.answers.len(),
            notice: controller.submit_notice().map(str::to_string),
        }
    }

    /// Countdown as `MM:SS`
    pub fn format_remaining(&self) -> String {
        format_remaining(self.remaining_seconds)
    }

    /// Under five minutes left
    pub fn is_low_time(&self) -> bool {
        is_low_time(self.remaining_seconds)
    }
}

/// Drives one exam attempt to completion
pub struct SessionRunner {
    commands: mpsc::Sender<SessionCommand>,
    snapshot: watch::Receiver<SessionSnapshot>,
    join: JoinHandle<ExamSession>,
}

impl SessionRunner {
    /// Start the attempt and the tasks that drive it.
    ///
    /// `violations` is the monitor's event stream; it is drained into the
    /// command queue for as long as the session lives.
    pub fn start(
        exam: Exam,
        policy: PolicyConfig,
        violations: mpsc::Receiver<ViolationEvent>,
    ) -> Result<Self, SessionError> {
        let mut controller = ExamController::new(exam, policy);
        controller.start()?;

        let (command_tx, mut command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(SessionSnapshot::of(&controller));

        // 1 Hz countdown feed. Ends when the queue closes.
        let ticker_tx = command_tx.clone();
        tokio::spawn(async move {
            let period = Duration::from_secs(1);
            let mut ticker = time::interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                if ticker_tx.send(SessionCommand::Tick).await.is_err() {
                    break;
                }
            }
        });

        // Monitor violations join the same queue as everything else.
        let forward_tx = command_tx.clone();
        tokio::spawn(async move {
            let mut violations = violations;
            while let Some(event) = violations.recv().await {
                if forward_tx
                    .send(SessionCommand::Violation(event))
                    .await
                    .is_err()
                {
                    break;
                }
            }
            debug!("violation stream ended");
        });

        let join = tokio::spawn(async move {
            while let Some(command) = command_rx.recv().await {
                apply(&mut controller, command);
                let snapshot = SessionSnapshot::of(&controller);
                let terminal = snapshot.phase.is_terminal();
                if terminal {
                    // Close before publishing so no command can slip in
                    // after observers see the terminal snapshot.
                    command_rx.close();
                }
                snapshot_tx.send_replace(snapshot);
                if terminal {
                    break;
                }
            }
            info!("session runner finished");
            controller.session().clone()
        });

        Ok(Self {
            commands: command_tx,
            snapshot: snapshot_rx,
            join,
        })
    }

    /// Send a user action. Returns false once the session is over.
    pub async fn command(&self, command: SessionCommand) -> bool {
        match self.commands.send(command).await {
            Ok(()) => true,
            Err(_) => {
                debug!("session over, command dropped");
                false
            }
        }
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Watch snapshots as they are published
    pub fn snapshot_stream(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.clone()
    }

    /// Wait for submission; yields the final session record
    pub async fn wait(self) -> Option<ExamSession> {
        drop(self.commands);
        match self.join.await {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("session task ended abnormally: {}", e);
                None
            }
        }
    }
}

fn apply(controller: &mut ExamController, command: SessionCommand) {
    let result = match command {
        SessionCommand::Tick => {
            controller.tick();
            Ok(())
        }
        SessionCommand::Violation(event) => {
            if let Some(warning) = controller.on_violation(&event) {
                info!("exam paused: {}", warning.violation);
            }
            Ok(())
        }
        SessionCommand::Answer {
            question_id,
            choice,
        } => controller.select_answer(question_id, choice),
        SessionCommand::Resume => controller.resume(),
        SessionCommand::Submit => controller.submit(),
        SessionCommand::Navigate(NavigateTo::Next) => controller.next_question(),
        SessionCommand::Navigate(NavigateTo::Prev) => controller.prev_question(),
        SessionCommand::Navigate(NavigateTo::Index(index)) => controller.goto_question(index),
    };
    if let Err(e) = result {
        // Ticks and violations can land after the phase already moved on.
        debug!("command rejected: {}", e);
    }
}
