use chrono::{DateTime, Duration, Utc};
use std::fmt;

use prep_core::model::{
    AnswerSheet, Finish, OptionLabel, Question, QuestionId, SessionConfig, SessionId,
    SessionReport, TimerPolicy, Topic,
};

use super::plan::SessionPlan;
use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── STATES ────────────────────────────────────────────────────────────────────
//

/// Lifecycle of one assessment run.
///
/// `Empty` and `Submitted` are terminal. `Empty` is entered from `start`
/// when the plan matched no questions; it exists so a too-narrow difficulty
/// filter fails visibly instead of quietly widening the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    Running,
    Submitted,
    Empty,
}

/// What a timer tick observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session is not running; nothing to do.
    Idle,
    Running {
        remaining: Option<Duration>,
    },
    /// This tick crossed the deadline and performed the one automatic
    /// submission.
    AutoSubmitted,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory assessment session over a planned question list.
///
/// All transitions are synchronous; the only autonomous input is `tick`,
/// driven by whoever owns the session. Once submitted, the report and the
/// answer sheet are frozen.
pub struct AssessmentSession {
    id: SessionId,
    topic: Topic,
    config: SessionConfig,
    questions: Vec<Question>,
    sheet: AnswerSheet,
    current: usize,
    state: SessionState,
    started_at: Option<DateTime<Utc>>,
    deadline: Option<DateTime<Utc>>,
    report: Option<SessionReport>,
}

impl AssessmentSession {
    /// Create a session from a finalized plan. The session starts in
    /// `NotStarted`; call `start` to begin.
    #[must_use]
    pub fn new(topic: Topic, config: SessionConfig, plan: SessionPlan) -> Self {
        Self {
            id: SessionId::generate(),
            topic,
            config,
            questions: plan.questions,
            sheet: AnswerSheet::new(),
            current: 0,
            state: SessionState::NotStarted,
            started_at: None,
            deadline: None,
            report: None,
        }
    }

    /// Begin the run. An empty plan transitions to the `Empty` terminal
    /// state; otherwise the countdown deadline (if any) is fixed here.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyStarted` unless the session is in
    /// `NotStarted`.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<SessionState, SessionError> {
        if self.state != SessionState::NotStarted {
            return Err(SessionError::AlreadyStarted);
        }

        if self.questions.is_empty() {
            self.state = SessionState::Empty;
            return Ok(self.state);
        }

        self.started_at = Some(now);
        if let TimerPolicy::Countdown { total } = self.config.timer() {
            self.deadline = Some(now + total);
        }
        self.state = SessionState::Running;
        Ok(self.state)
    }

    /// Record the pick for a question; re-selecting overwrites.
    ///
    /// # Errors
    ///
    /// Rejected unless the session is running and the countdown has not
    /// expired; unknown questions and labels are errors.
    pub fn select_answer(
        &mut self,
        question: QuestionId,
        label: OptionLabel,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        self.ensure_running()?;
        if self.expired(now) {
            return Err(SessionError::TimeExpired);
        }

        let Some(target) = self.questions.iter().find(|q| q.id() == question) else {
            return Err(SessionError::UnknownQuestion(question));
        };
        if !target.has_option(&label) {
            return Err(SessionError::UnknownOption { question, label });
        }

        self.sheet.select(question, label);
        Ok(())
    }

    /// Move to the next question, clamped at the last index.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotRunning`/`AlreadySubmitted` outside the
    /// running state.
    pub fn next(&mut self) -> Result<usize, SessionError> {
        self.ensure_running()?;
        if self.current + 1 < self.questions.len() {
            self.current += 1;
        }
        Ok(self.current)
    }

    /// Move to the previous question, clamped at index zero.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotRunning`/`AlreadySubmitted` outside the
    /// running state.
    pub fn previous(&mut self) -> Result<usize, SessionError> {
        self.ensure_running()?;
        self.current = self.current.saturating_sub(1);
        Ok(self.current)
    }

    /// Observe the countdown. Crossing the deadline performs exactly one
    /// automatic submission; every later tick reports `Idle`.
    ///
    /// # Errors
    ///
    /// Propagates report construction failures.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<TickOutcome, SessionError> {
        if self.state != SessionState::Running {
            return Ok(TickOutcome::Idle);
        }
        if self.expired(now) {
            self.finalize(now, Finish::TimeExpired)?;
            return Ok(TickOutcome::AutoSubmitted);
        }
        Ok(TickOutcome::Running {
            remaining: self.remaining_time(now),
        })
    }

    /// Submit the session and compute the report.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadySubmitted` on a second submit and
    /// `SessionError::NotRunning` before `start`.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<&SessionReport, SessionError> {
        self.ensure_running()?;
        let finish = if self.expired(now) {
            Finish::TimeExpired
        } else {
            Finish::Manual
        };
        self.finalize(now, finish)?;
        self.report.as_ref().ok_or(SessionError::NotRunning)
    }

    /// Back to `NotStarted` with a cleared sheet, ready for a retake of the
    /// same planned questions.
    pub fn reset(&mut self) {
        self.sheet.clear();
        self.current = 0;
        self.state = SessionState::NotStarted;
        self.started_at = None;
        self.deadline = None;
        self.report = None;
    }

    fn finalize(&mut self, now: DateTime<Utc>, finish: Finish) -> Result<(), SessionError> {
        let started_at = self.started_at.ok_or(SessionError::NotRunning)?;
        // An auto-submission is dated at the deadline, not at whenever the
        // tick happened to observe it.
        let submitted_at = match finish {
            Finish::TimeExpired => self.deadline.map_or(now, |d| d.min(now)),
            Finish::Manual => now,
        };
        let report =
            SessionReport::from_answers(&self.questions, &self.sheet, started_at, submitted_at, finish)?;
        self.report = Some(report);
        self.state = SessionState::Submitted;
        Ok(())
    }

    fn ensure_running(&self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Running => Ok(()),
            SessionState::Submitted => Err(SessionError::AlreadySubmitted),
            SessionState::NotStarted | SessionState::Empty => Err(SessionError::NotRunning),
        }
    }

    fn expired(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn selected_for(&self, question: QuestionId) -> Option<&OptionLabel> {
        self.sheet.selected(question)
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.sheet.answered()
    }

    /// Time left on the countdown, floored at zero; `None` when untimed.
    #[must_use]
    pub fn remaining_time(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.deadline
            .map(|deadline| (deadline - now).max(Duration::zero()))
    }

    /// True in either terminal state (`Submitted` or `Empty`).
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.state, SessionState::Submitted | SessionState::Empty)
    }

    #[must_use]
    pub fn report(&self) -> Option<&SessionReport> {
        self.report.as_ref()
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total_questions(),
            answered: self.answered_count(),
            remaining: self.total_questions().saturating_sub(self.answered_count()),
            is_complete: self.is_complete(),
        }
    }
}

impl fmt::Debug for AssessmentSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssessmentSession")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("state", &self.state)
            .field("answered", &self.sheet.answered())
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use prep_core::model::{
        AnswerOption, Content, DifficultyFilter, QuestionDraft,
    };
    use prep_core::time::fixed_now;

    fn label(s: &str) -> OptionLabel {
        OptionLabel::new(s).unwrap()
    }

    fn build_question(id: u64) -> Question {
        QuestionDraft {
            prompt: Content::plain(format!("Q{id}")).unwrap(),
            options: vec![
                AnswerOption {
                    label: label("A"),
                    content: Content::plain("yes").unwrap(),
                },
                AnswerOption {
                    label: label("B"),
                    content: Content::plain("no").unwrap(),
                },
            ],
            correct: label("A"),
            explanation: None,
            difficulty: None,
        }
        .validate()
        .unwrap()
        .assign_id(QuestionId::new(id))
    }

    fn plan_of(count: u64) -> SessionPlan {
        let questions: Vec<Question> = (1..=count).map(build_question).collect();
        SessionPlan {
            matched: questions.len(),
            requested: u32::try_from(count.max(1)).unwrap(),
            questions,
        }
    }

    fn config(timer: TimerPolicy) -> SessionConfig {
        SessionConfig::new(10, DifficultyFilter::Mixed, false, timer).unwrap()
    }

    fn running_session(count: u64, timer: TimerPolicy) -> AssessmentSession {
        let mut session = AssessmentSession::new(
            Topic::new("t").unwrap(),
            config(timer),
            plan_of(count),
        );
        session.start(fixed_now()).unwrap();
        session
    }

    #[test]
    fn empty_plan_enters_empty_state() {
        let mut session = AssessmentSession::new(
            Topic::new("t").unwrap(),
            config(TimerPolicy::Off),
            plan_of(0),
        );
        let state = session.start(fixed_now()).unwrap();
        assert_eq!(state, SessionState::Empty);
        assert!(session.is_complete());
        assert_eq!(session.total_questions(), 0);
        assert!(matches!(
            session.select_answer(QuestionId::new(1), label("A"), fixed_now()),
            Err(SessionError::NotRunning)
        ));
    }

    #[test]
    fn cannot_start_twice() {
        let mut session = running_session(2, TimerPolicy::Off);
        assert!(matches!(
            session.start(fixed_now()),
            Err(SessionError::AlreadyStarted)
        ));
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut session = running_session(3, TimerPolicy::Off);
        assert_eq!(session.previous().unwrap(), 0);
        assert_eq!(session.next().unwrap(), 1);
        assert_eq!(session.next().unwrap(), 2);
        assert_eq!(session.next().unwrap(), 2);
        assert_eq!(session.previous().unwrap(), 1);
    }

    #[test]
    fn selection_validates_question_and_label() {
        let mut session = running_session(2, TimerPolicy::Off);
        let now = fixed_now();

        session
            .select_answer(QuestionId::new(1), label("B"), now)
            .unwrap();
        // overwrite is allowed
        session
            .select_answer(QuestionId::new(1), label("A"), now)
            .unwrap();
        assert_eq!(session.answered_count(), 1);

        assert!(matches!(
            session.select_answer(QuestionId::new(99), label("A"), now),
            Err(SessionError::UnknownQuestion(_))
        ));
        assert!(matches!(
            session.select_answer(QuestionId::new(2), label("C"), now),
            Err(SessionError::UnknownOption { .. })
        ));
    }

    #[test]
    fn submit_freezes_score_and_blocks_mutation() {
        let mut session = running_session(2, TimerPolicy::Off);
        let now = fixed_now();
        session
            .select_answer(QuestionId::new(1), label("A"), now)
            .unwrap();

        let score = session.submit(now).unwrap().score();
        assert_eq!(score, 1);
        assert_eq!(session.state(), SessionState::Submitted);

        assert!(matches!(
            session.select_answer(QuestionId::new(2), label("A"), now),
            Err(SessionError::AlreadySubmitted)
        ));
        assert!(matches!(
            session.submit(now),
            Err(SessionError::AlreadySubmitted)
        ));
        // the stored report did not change
        assert_eq!(session.report().unwrap().score(), 1);
    }

    #[test]
    fn countdown_expiry_auto_submits_exactly_once() {
        let mut session = running_session(2, TimerPolicy::countdown_secs(60).unwrap());
        let start = fixed_now();
        session
            .select_answer(QuestionId::new(1), label("A"), start)
            .unwrap();

        let before = session.tick(start + Duration::seconds(30)).unwrap();
        assert!(matches!(before, TickOutcome::Running { remaining: Some(r) } if r == Duration::seconds(30)));

        let expiry = session.tick(start + Duration::seconds(61)).unwrap();
        assert_eq!(expiry, TickOutcome::AutoSubmitted);
        assert_eq!(session.state(), SessionState::Submitted);

        let report = session.report().unwrap();
        assert_eq!(report.finish(), Finish::TimeExpired);
        assert_eq!(report.score(), 1);
        // dated at the deadline, not at the observing tick
        assert_eq!(report.submitted_at(), start + Duration::seconds(60));

        assert_eq!(
            session.tick(start + Duration::seconds(62)).unwrap(),
            TickOutcome::Idle
        );
        assert!(matches!(
            session.select_answer(QuestionId::new(2), label("A"), start + Duration::seconds(62)),
            Err(SessionError::AlreadySubmitted)
        ));
    }

    #[test]
    fn selection_rejected_after_expiry_even_before_tick() {
        let mut session = running_session(1, TimerPolicy::countdown_secs(10).unwrap());
        let late = fixed_now() + Duration::seconds(11);
        assert!(matches!(
            session.select_answer(QuestionId::new(1), label("A"), late),
            Err(SessionError::TimeExpired)
        ));
    }

    #[test]
    fn untimed_session_never_expires() {
        let mut session = running_session(1, TimerPolicy::Off);
        let much_later = fixed_now() + Duration::days(2);
        assert!(matches!(
            session.tick(much_later).unwrap(),
            TickOutcome::Running { remaining: None }
        ));
        session
            .select_answer(QuestionId::new(1), label("A"), much_later)
            .unwrap();
    }

    #[test]
    fn reset_clears_sheet_and_report() {
        let mut session = running_session(2, TimerPolicy::Off);
        let now = fixed_now();
        session
            .select_answer(QuestionId::new(1), label("A"), now)
            .unwrap();
        session.submit(now).unwrap();

        session.reset();
        assert_eq!(session.state(), SessionState::NotStarted);
        assert_eq!(session.answered_count(), 0);
        assert!(session.report().is_none());
        assert_eq!(session.current_index(), 0);

        // a reset session can run again
        session.start(now).unwrap();
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn progress_tracks_answers() {
        let mut session = running_session(3, TimerPolicy::Off);
        let now = fixed_now();
        session
            .select_answer(QuestionId::new(2), label("B"), now)
            .unwrap();

        let progress = session.progress();
        assert_eq!(progress.total, 3);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 2);
        assert!(!progress.is_complete);
    }
}
