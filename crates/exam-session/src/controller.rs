//! Session state machine
//!
//! Pure and synchronous. Time arrives as `tick()` calls and violations as
//! values, so every policy rule is testable with plain method calls. The
//! async runner owns clocks and channels.

use chrono::Utc;
use tracing::{debug, info};
use violation_classifier::ViolationEvent;

use crate::exam::Exam;
use crate::session::{
    format_remaining, ExamSession, SessionPhase, SubmitKind, Warning, AUTO_SUBMIT_NOTICE,
    FINAL_WARNING, FIRST_WARNING,
};
use crate::{PolicyConfig, SessionError};

/// One exam attempt under the proctoring policy
pub struct ExamController {
    exam: Exam,
    policy: PolicyConfig,
    session: ExamSession,
    pending_warning: Option<Warning>,
}

impl ExamController {
    pub fn new(exam: Exam, policy: PolicyConfig) -> Self {
        let session = ExamSession::new(exam.id.clone(), exam.duration_seconds());
        Self {
            exam,
            policy,
            session,
            pending_warning: None,
        }
    }

    pub fn session(&self) -> &ExamSession {
        &self.session
    }

    pub fn exam(&self) -> &Exam {
        &self.exam
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase
    }

    /// Warning awaiting acknowledgement, while paused
    pub fn pending_warning(&self) -> Option<&Warning> {
        self.pending_warning.as_ref()
    }

    /// Begin the attempt. Valid only from `Idle`.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.session.phase != SessionPhase::Idle {
            return Err(self.invalid("start"));
        }
        self.session.phase = SessionPhase::Running;
        self.session.started_at = Some(Utc::now());
        info!(
            "exam {} started with {} on the clock",
            self.exam.id,
            format_remaining(self.session.remaining_seconds)
        );
        Ok(())
    }

    /// One countdown second.
    ///
    /// Decrements only while running; reaching zero submits with `Timeout`
    /// on exactly that tick. Silent in every other phase, including after
    /// submission.
    pub fn tick(&mut self) -> Option<SubmitKind> {
        if self.session.phase != SessionPhase::Running {
            return None;
        }
        self.session.remaining_seconds = self.session.remaining_seconds.saturating_sub(1);
        if self.session.remaining_seconds == 0 {
            self.conclude(SubmitKind::Timeout);
            return Some(SubmitKind::Timeout);
        }
        None
    }

    /// Apply one proctoring violation.
    ///
    /// Below the strike limit the session pauses and the escalation warning
    /// is returned for display. At the limit the exam auto-submits and
    /// nothing is returned. Ignored before start and after submission.
    pub fn on_violation(&mut self, event: &ViolationEvent) -> Option<Warning> {
        match self.session.phase {
            SessionPhase::Running | SessionPhase::Paused => {}
            _ => {
                debug!("ignoring violation while {}", self.session.phase.name());
                return None;
            }
        }

        self.session.warning_count += 1;
        info!(
            "strike {} of {}: {}",
            self.session.warning_count, self.policy.max_strikes, event.message
        );

        if self.session.warning_count >= self.policy.max_strikes {
            self.conclude(SubmitKind::Auto);
            return None;
        }

        let message = if self.session.warning_count == 1 {
            FIRST_WARNING
        } else {
            FINAL_WARNING
        };
        let warning = Warning {
            violation: event.message.clone(),
            message: message.to_string(),
            is_final: self.session.warning_count + 1 >= self.policy.max_strikes,
        };
        self.session.phase = SessionPhase::Paused;
        self.pending_warning = Some(warning.clone());
        Some(warning)
    }

    /// Acknowledge the warning and continue. Valid only from `Paused`.
    pub fn resume(&mut self) -> Result<(), SessionError> {
        if self.session.phase != SessionPhase::Paused {
            return Err(self.invalid("resume"));
        }
        self.session.phase = SessionPhase::Running;
        self.pending_warning = None;
        Ok(())
    }

    /// Record an answer. Valid only while running; re-answering overwrites.
    pub fn select_answer(&mut self, question_id: u32, choice: String) -> Result<(), SessionError> {
        if self.session.phase != SessionPhase::Running {
            return Err(self.invalid("answer"));
        }
        if self.exam.question(question_id).is_none() {
            return Err(SessionError::UnknownQuestion(question_id));
        }
        self.session.answers.insert(question_id, choice);
        Ok(())
    }

    /// Step to the next question, staying on the last one at the end
    pub fn next_question(&mut self) -> Result<(), SessionError> {
        if self.session.phase != SessionPhase::Running {
            return Err(self.invalid("navigate"));
        }
        if self.session.current_question_index + 1 < self.exam.questions.len() {
            self.session.current_question_index += 1;
        }
        Ok(())
    }

    /// Step back, staying on the first question at the start
    pub fn prev_question(&mut self) -> Result<(), SessionError> {
        if self.session.phase != SessionPhase::Running {
            return Err(self.invalid("navigate"));
        }
        self.session.current_question_index = self.session.current_question_index.saturating_sub(1);
        Ok(())
    }

    /// Jump straight to a question by index
    pub fn goto_question(&mut self, index: usize) -> Result<(), SessionError> {
        if self.session.phase != SessionPhase::Running {
            return Err(self.invalid("navigate"));
        }
        if index >= self.exam.questions.len() {
            return Err(SessionError::IndexOutOfRange(index));
        }
        self.session.current_question_index = index;
        Ok(())
    }

    /// Submit manually. Valid from `Running` or `Paused`.
    pub fn submit(&mut self) -> Result<(), SessionError> {
        match self.session.phase {
            SessionPhase::Running | SessionPhase::Paused => {
                self.conclude(SubmitKind::Manual);
                Ok(())
            }
            _ => Err(self.invalid("submit")),
        }
    }

    /// The auto-submit notice, once the strike limit ended the exam
    pub fn submit_notice(&self) -> Option<&'static str> {
        match self.session.phase {
            SessionPhase::Submitted(SubmitKind::Auto) => Some(AUTO_SUBMIT_NOTICE),
            _ => None,
        }
    }

    pub fn answered_count(&self) -> usize {
        self.session.answers.len()
    }

    /// `(correct, graded)` over questions that carry an answer key
    pub fn score(&self) -> Option<(usize, usize)> {
        self.exam.score(&self.session.answers)
    }

    fn conclude(&mut self, kind: SubmitKind) {
        self.session.phase = SessionPhase::Submitted(kind);
        self.session.submitted_at = Some(Utc::now());
        self.pending_warning = None;
        info!(
            "exam {} submitted ({:?}) with {}/{} answered",
            self.exam.id,
            kind,
            self.session.answers.len(),
            self.exam.questions.len()
        );
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            phase: self.session.phase.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exam::Question;
    use violation_classifier::ViolationKind;

    fn timed_exam(duration_minutes: u32) -> Exam {
        Exam {
            id: "t".into(),
            title: "Timed".into(),
            subject: "Test".into(),
            duration_minutes,
            questions: vec![Question {
                id: 1,
                prompt: "?".into(),
                options: vec!["a".into(), "b".into()],
                correct_answer: None,
            }],
        }
    }

    fn violation() -> ViolationEvent {
        ViolationEvent::now(ViolationKind::LookingAway)
    }

    fn running_controller() -> ExamController {
        let mut c = ExamController::new(Exam::sample(), PolicyConfig::default());
        c.start().unwrap();
        c
    }

    #[test]
    fn test_start_only_from_idle() {
        let mut c = ExamController::new(Exam::sample(), PolicyConfig::default());
        assert_eq!(c.phase(), SessionPhase::Idle);
        c.start().unwrap();
        assert_eq!(c.phase(), SessionPhase::Running);
        assert!(matches!(
            c.start(),
            Err(SessionError::InvalidTransition { action: "start", .. })
        ));
    }

    #[test]
    fn test_timeout_submits_on_the_final_tick() {
        let mut c = ExamController::new(timed_exam(1), PolicyConfig::default());
        c.start().unwrap();

        for _ in 0..59 {
            assert!(c.tick().is_none());
        }
        assert_eq!(c.session().remaining_seconds, 1);
        assert_eq!(c.phase(), SessionPhase::Running);

        assert_eq!(c.tick(), Some(SubmitKind::Timeout));
        assert_eq!(c.phase(), SessionPhase::Submitted(SubmitKind::Timeout));
        assert_eq!(c.session().remaining_seconds, 0);

        // Late ticks change nothing.
        assert!(c.tick().is_none());
        assert_eq!(c.session().remaining_seconds, 0);
    }

    #[test]
    fn test_pause_freezes_the_countdown() {
        let mut c = ExamController::new(timed_exam(2), PolicyConfig::default());
        c.start().unwrap();

        for _ in 0..10 {
            c.tick();
        }
        assert_eq!(c.session().remaining_seconds, 110);

        let warning = c.on_violation(&violation()).expect("first strike warns");
        assert_eq!(c.phase(), SessionPhase::Paused);
        assert_eq!(warning.violation, "LOOKING AWAY! ALERT!");
        assert_eq!(warning.message, FIRST_WARNING);
        assert!(warning.is_final);
        assert_eq!(c.pending_warning(), Some(&warning));

        // Wall time passes, exam time does not.
        for _ in 0..5 {
            assert!(c.tick().is_none());
        }
        assert_eq!(c.session().remaining_seconds, 110);

        c.resume().unwrap();
        assert!(c.pending_warning().is_none());
        c.tick();
        assert_eq!(c.session().remaining_seconds, 109);
    }

    #[test]
    fn test_second_strike_auto_submits() {
        let mut c = running_controller();

        assert!(c.on_violation(&violation()).is_some());
        c.resume().unwrap();

        assert!(c.on_violation(&violation()).is_none());
        assert_eq!(c.phase(), SessionPhase::Submitted(SubmitKind::Auto));
        assert_eq!(c.session().warning_count, 2);
        assert_eq!(c.submit_notice(), Some(AUTO_SUBMIT_NOTICE));
    }

    #[test]
    fn test_second_strike_fires_even_while_paused() {
        let mut c = running_controller();
        assert!(c.on_violation(&violation()).is_some());
        assert_eq!(c.phase(), SessionPhase::Paused);

        // No acknowledgement yet; the next strike still ends the exam.
        assert!(c.on_violation(&violation()).is_none());
        assert_eq!(c.phase(), SessionPhase::Submitted(SubmitKind::Auto));
    }

    #[test]
    fn test_three_strike_policy_wording() {
        let mut c = ExamController::new(Exam::sample(), PolicyConfig { max_strikes: 3 });
        c.start().unwrap();

        let first = c.on_violation(&violation()).unwrap();
        assert_eq!(first.message, FIRST_WARNING);
        assert!(!first.is_final);
        c.resume().unwrap();

        let second = c.on_violation(&violation()).unwrap();
        assert_eq!(second.message, FINAL_WARNING);
        assert!(second.is_final);
        c.resume().unwrap();

        assert!(c.on_violation(&violation()).is_none());
        assert_eq!(c.phase(), SessionPhase::Submitted(SubmitKind::Auto));
    }

    #[test]
    fn test_pause_resume_walkthrough_keeps_remaining_consistent() {
        let mut c = ExamController::new(timed_exam(2), PolicyConfig::default());
        c.start().unwrap();

        // Ten running seconds, then a strike pauses at t=10.
        for _ in 0..10 {
            c.tick();
        }
        c.on_violation(&violation()).unwrap();

        // Five wall seconds pass while paused.
        for _ in 0..5 {
            c.tick();
        }
        c.resume().unwrap();

        // Fifteen more running seconds, then the second strike ends it.
        for _ in 0..15 {
            c.tick();
        }
        c.on_violation(&violation());

        assert_eq!(c.phase(), SessionPhase::Submitted(SubmitKind::Auto));
        // 25 running seconds elapsed out of 120.
        assert_eq!(c.session().remaining_seconds, 95);
    }

    #[test]
    fn test_answers_record_and_overwrite() {
        let mut c = running_controller();

        c.select_answer(1, "O(1)".into()).unwrap();
        c.select_answer(1, "O(log n)".into()).unwrap();
        c.select_answer(2, "Stack".into()).unwrap();
        assert_eq!(c.answered_count(), 2);
        assert_eq!(c.session().answers[&1], "O(log n)");

        assert_eq!(
            c.select_answer(99, "x".into()),
            Err(SessionError::UnknownQuestion(99))
        );
    }

    #[test]
    fn test_navigation_bounds() {
        let mut c = running_controller();

        c.prev_question().unwrap();
        assert_eq!(c.session().current_question_index, 0);

        c.goto_question(4).unwrap();
        c.next_question().unwrap();
        assert_eq!(c.session().current_question_index, 4);

        assert_eq!(c.goto_question(5), Err(SessionError::IndexOutOfRange(5)));
    }

    #[test]
    fn test_terminal_phase_is_inert() {
        let mut c = running_controller();
        c.submit().unwrap();
        assert_eq!(c.phase(), SessionPhase::Submitted(SubmitKind::Manual));
        assert!(c.submit_notice().is_none());

        assert!(c.tick().is_none());
        assert!(c.on_violation(&violation()).is_none());
        assert!(c.resume().is_err());
        assert!(c.select_answer(1, "a".into()).is_err());
        assert!(c.submit().is_err());
        assert!(c.next_question().is_err());
    }

    #[test]
    fn test_score_against_answer_key() {
        let mut c = running_controller();
        c.select_answer(1, "O(log n)".into()).unwrap();
        c.select_answer(2, "Queue".into()).unwrap();
        assert_eq!(c.score(), Some((1, 5)));

        let unkeyed = ExamController::new(timed_exam(1), PolicyConfig::default());
        assert_eq!(unkeyed.score(), None);
    }
}
