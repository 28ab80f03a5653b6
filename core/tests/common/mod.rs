//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use phishsim_core::{
    clock::FixedClock,
    config::SimConfig,
    engine::SimulationStore,
    error::{SimError, SimResult},
    history::HistoryStore,
    score::ResultRecord,
    store::HistoryDb,
};
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

pub fn fixed_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 10, 0, 0).unwrap()
}

pub fn migrated_db() -> HistoryDb {
    let db = HistoryDb::in_memory().expect("in-memory db");
    db.migrate().expect("migration");
    db
}

pub fn build(config: &SimConfig) -> SimulationStore {
    SimulationStore::init_with_clock(
        config,
        Box::new(migrated_db()),
        Box::new(FixedClock(fixed_instant())),
    )
    .expect("init simulation store")
}

pub fn build_default() -> SimulationStore {
    build(&SimConfig::default_test())
}

/// Play one run: `correct` right answers out of `total`.
pub fn play(sim: &mut SimulationStore, correct: u64, total: u64) -> SimResult<()> {
    sim.start_run();
    for i in 0..total {
        sim.record_answer(i < correct)?;
    }
    sim.finish_run()
}

/// In-memory backend whose writes can be made to fail on demand.
#[derive(Clone, Default)]
pub struct FlakyStore {
    pub rows: Rc<RefCell<Vec<ResultRecord>>>,
    pub fail: Rc<Cell<bool>>,
}

impl HistoryStore for FlakyStore {
    fn load(&self, _feature_key: &str) -> SimResult<Vec<ResultRecord>> {
        Ok(self.rows.borrow().clone())
    }

    fn append(&self, _feature_key: &str, record: &ResultRecord) -> SimResult<()> {
        if self.fail.get() {
            return Err(SimError::Other(anyhow::anyhow!("disk full")));
        }
        self.rows.borrow_mut().push(record.clone());
        Ok(())
    }
}
