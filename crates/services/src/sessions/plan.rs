use rand::rng;
use rand::seq::SliceRandom;

use prep_core::model::{Question, SessionConfig};

/// Selection result for a session build.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub questions: Vec<Question>,
    /// Pool size after difficulty filtering, before count clamping.
    pub matched: usize,
    pub requested: u32,
}

impl SessionPlan {
    /// Total number of questions in this plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// True when the difficulty filter matched nothing.
    ///
    /// A session built from an empty plan lands in its explicit empty state;
    /// the unfiltered pool is never substituted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Builds the finalized ordered question list for one session.
pub struct PlanBuilder<'a> {
    config: &'a SessionConfig,
}

impl<'a> PlanBuilder<'a> {
    #[must_use]
    pub fn new(config: &'a SessionConfig) -> Self {
        Self { config }
    }

    /// Filter, optionally shuffle, then clamp the pool to the requested
    /// count. The finalized length is always `min(requested, matched)`.
    pub fn build(self, pool: impl IntoIterator<Item = Question>) -> SessionPlan {
        let filter = self.config.filter();
        let mut matched_pool: Vec<Question> = pool
            .into_iter()
            .filter(|q| filter.matches(q.difficulty()))
            .collect();
        let matched = matched_pool.len();

        if self.config.shuffle() {
            let mut rng = rng();
            matched_pool.as_mut_slice().shuffle(&mut rng);
        }

        let take = usize::try_from(self.config.requested()).unwrap_or(usize::MAX);
        matched_pool.truncate(take);

        SessionPlan {
            questions: matched_pool,
            matched,
            requested: self.config.requested(),
        }
    }
}
