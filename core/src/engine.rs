//! The simulation store: the only public surface views talk to.
//!
//! RUN STATE MACHINE:
//!   Idle ──start_run──▶ Active ──finish_run──▶ Finalized ──start_run──▶ Active
//!   start_run while Active restarts the tally.
//!
//! RULES:
//!   - The store is the single writer of the tally and the history log.
//!   - record_answer / finish_run outside Active return RunNotActive and
//!     change nothing. A second finish_run is therefore rejected.
//!   - finish_run = pure finalize step, then an explicit persist step.
//!     A persistence failure still leaves the result in get_results()
//!     and queues it; retry_persist() appends queued results in order.

use std::collections::VecDeque;

use crate::{
    clock::{Clock, SystemClock},
    config::SimConfig,
    error::{SimError, SimResult},
    history::{HistoryLog, HistoryStore},
    score::{self, ResultRecord},
    snapshot::HistorySnapshot,
    stats::{self, OverallStats},
    tally::AnswerTally,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Active,
    Finalized,
}

pub struct SimulationStore {
    state:       RunState,
    tally:       AnswerTally,
    last_result: Option<ResultRecord>,
    pending:     VecDeque<ResultRecord>, // finalized but not yet durable
    history:     HistoryLog,
    clock:       Box<dyn Clock>,
}

impl SimulationStore {
    /// Construct without touching storage. Call restore() before use,
    /// or use init() which does both.
    pub fn new(config: &SimConfig, store: Box<dyn HistoryStore>, clock: Box<dyn Clock>) -> Self {
        Self {
            state:       RunState::Idle,
            tally:       AnswerTally::new(),
            last_result: None,
            pending:     VecDeque::new(),
            history:     HistoryLog::new(config.feature_key.clone(), config.history_limit, store),
            clock,
        }
    }

    /// Construct and restore persisted history. Call once at process start.
    pub fn init(config: &SimConfig, store: Box<dyn HistoryStore>) -> SimResult<Self> {
        Self::init_with_clock(config, store, Box::new(SystemClock))
    }

    pub fn init_with_clock(
        config: &SimConfig,
        store:  Box<dyn HistoryStore>,
        clock:  Box<dyn Clock>,
    ) -> SimResult<Self> {
        let mut sim = Self::new(config, store, clock);
        sim.restore()?;
        Ok(sim)
    }

    /// Load previously persisted history. Returns the number of entries.
    pub fn restore(&mut self) -> SimResult<usize> {
        self.history.restore()
    }

    // ── Run lifecycle ──────────────────────────────────────────

    pub fn start_run(&mut self) {
        if self.state == RunState::Active {
            log::info!(
                "Restarting active run, discarding {} answer(s)",
                self.tally.total_count()
            );
        } else {
            log::info!("Run started");
        }
        self.tally.reset();
        self.state = RunState::Active;
    }

    pub fn record_answer(&mut self, was_correct: bool) -> SimResult<()> {
        if self.state != RunState::Active {
            log::warn!("record_answer() called with no active run");
            return Err(SimError::RunNotActive);
        }
        self.tally.record_answer(was_correct);
        Ok(())
    }

    /// Finalize the active run and append it to the history log.
    pub fn finish_run(&mut self) -> SimResult<()> {
        if !self.history.is_restored() {
            log::warn!("finish_run() called before restore()");
            return Err(SimError::HistoryNotRestored);
        }
        let record = self.finalize_active()?;
        self.pending.push_back(record);
        self.flush_pending()
    }

    /// Re-attempt appending results whose earlier write failed.
    /// Returns how many were persisted; Ok(0) when nothing is queued.
    pub fn retry_persist(&mut self) -> SimResult<usize> {
        let queued = self.pending.len();
        self.flush_pending()?;
        Ok(queued)
    }

    /// Results finalized this session that are not yet in the history log.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Pure step: score the tally and move to Finalized.
    fn finalize_active(&mut self) -> SimResult<ResultRecord> {
        if self.state != RunState::Active {
            log::warn!("finish_run() called with no active run");
            return Err(SimError::RunNotActive);
        }
        let record = score::finalize(&self.tally, self.clock.now());
        self.tally.reset();
        self.state = RunState::Finalized;
        self.last_result = Some(record.clone());
        log::info!(
            "Run finished: {}/{} ({}%)",
            record.score, record.total_answered, record.percentage
        );
        Ok(record)
    }

    /// I/O step: durable append of every queued result, oldest first.
    /// Stops at the first failure, leaving it and later results queued.
    fn flush_pending(&mut self) -> SimResult<()> {
        while let Some(record) = self.pending.front() {
            self.history.append(record.clone())?;
            self.pending.pop_front();
        }
        Ok(())
    }

    // ── Read accessors ─────────────────────────────────────────

    /// The most recently finalized result. NoCompletedRun if none yet,
    /// which is distinct from a real result of 0%.
    pub fn get_results(&self) -> SimResult<&ResultRecord> {
        self.last_result.as_ref().ok_or(SimError::NoCompletedRun)
    }

    pub fn get_overall_stats(&self) -> SimResult<OverallStats> {
        Ok(stats::aggregate(self.history.entries()?))
    }

    pub fn get_history(&self) -> SimResult<Vec<ResultRecord>> {
        self.history.all()
    }

    pub fn snapshot(&self) -> SimResult<HistorySnapshot> {
        Ok(HistorySnapshot {
            feature_key: self.history.feature_key().to_string(),
            records:     self.history.all()?,
        })
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Counters of the active run, if one is in progress.
    pub fn current_tally(&self) -> Option<AnswerTally> {
        (self.state == RunState::Active).then_some(self.tally)
    }

    pub fn feature_key(&self) -> &str {
        self.history.feature_key()
    }
}
