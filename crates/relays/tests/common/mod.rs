#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use relays::{MoveConfirmation, MovePrompt, RunSession, RunStore};
use storage::dto::competitor::{CreateCompetitorRequest, CreatedCompetitor};
use storage::error::{Result, StorageError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemRun {
    pub competitor_id: i64,
    pub relay_id: Option<i64>,
    pub leg: Option<i64>,
    pub si_id: Option<i64>,
    pub is_running: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemCompetitor {
    pub class_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub si_id: Option<i64>,
}

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    competitors: BTreeMap<i64, MemCompetitor>,
    runs: BTreeMap<i64, MemRun>,
    class_updates: usize,
    commits: usize,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug, Clone)]
enum Write {
    CreateRun(i64, MemRun),
    UpdateRun {
        run_id: i64,
        relay_id: i64,
        leg: i64,
        is_running: bool,
    },
    UpdateClass {
        competitor_id: i64,
        class_id: i64,
    },
    CreateCompetitor(i64, MemCompetitor, Vec<i64>),
}

/// In-memory store with read-committed sessions: reads see committed data
/// plus the session's own pending writes. Nothing serializes two sessions,
/// so duplicate legs only stay out when the caller serializes them.
#[derive(Clone, Default)]
pub struct MemoryRunStore {
    state: Arc<Mutex<State>>,
    runs_per_competitor: Arc<AtomicUsize>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MemoryRunStore {
    pub fn new() -> Self {
        let store = Self::default();
        store.runs_per_competitor.store(1, Ordering::SeqCst);
        store
    }

    /// Number of runs generated by `create_competitor`.
    pub fn set_runs_per_competitor(&self, count: usize) {
        self.runs_per_competitor.store(count, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    pub fn add_competitor(&self, class_id: i64, si_id: Option<i64>) -> i64 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.competitors.insert(
            id,
            MemCompetitor {
                class_id,
                first_name: "Test".to_string(),
                last_name: format!("Competitor{}", id),
                si_id,
            },
        );
        id
    }

    pub fn add_run(&self, competitor_id: i64, relay_id: Option<i64>, leg: Option<i64>) -> i64 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.runs.insert(
            id,
            MemRun {
                competitor_id,
                relay_id,
                leg,
                si_id: None,
                is_running: false,
            },
        );
        id
    }

    pub fn run(&self, run_id: i64) -> Option<MemRun> {
        self.state.lock().unwrap().runs.get(&run_id).cloned()
    }

    pub fn runs(&self) -> BTreeMap<i64, MemRun> {
        self.state.lock().unwrap().runs.clone()
    }

    pub fn runs_of(&self, competitor_id: i64) -> Vec<(i64, MemRun)> {
        self.runs()
            .into_iter()
            .filter(|(_, run)| run.competitor_id == competitor_id)
            .collect()
    }

    pub fn competitor(&self, competitor_id: i64) -> Option<MemCompetitor> {
        self.state
            .lock()
            .unwrap()
            .competitors
            .get(&competitor_id)
            .cloned()
    }

    pub fn competitor_count(&self) -> usize {
        self.state.lock().unwrap().competitors.len()
    }

    pub fn legs_of(&self, relay_id: i64) -> Vec<i64> {
        let mut legs: Vec<i64> = self
            .runs()
            .values()
            .filter(|run| run.relay_id == Some(relay_id))
            .filter_map(|run| run.leg)
            .collect();
        legs.sort_unstable();
        legs
    }

    pub fn class_updates(&self) -> usize {
        self.state.lock().unwrap().class_updates
    }

    pub fn commits(&self) -> usize {
        self.state.lock().unwrap().commits
    }
}

#[async_trait]
impl RunStore for MemoryRunStore {
    async fn begin(&self) -> Result<Box<dyn RunSession>> {
        Ok(Box::new(MemorySession {
            store: self.clone(),
            pending: Vec::new(),
        }))
    }
}

struct MemorySession {
    store: MemoryRunStore,
    pending: Vec<Write>,
}

impl MemorySession {
    fn check_writable(&self) -> Result<()> {
        if *self.store.fail_writes.lock().unwrap() {
            return Err(StorageError::ConstraintViolation(
                "store rejected the write".to_string(),
            ));
        }
        Ok(())
    }

    fn next_id(&self) -> i64 {
        self.store.state.lock().unwrap().next_id()
    }
}

#[async_trait]
impl RunSession for MemorySession {
    async fn list_legs(&mut self, relay_id: i64) -> Result<Vec<i64>> {
        let mut runs = self.store.runs();
        for write in &self.pending {
            match write {
                Write::CreateRun(id, run) => {
                    runs.insert(*id, run.clone());
                }
                Write::UpdateRun {
                    run_id,
                    relay_id,
                    leg,
                    ..
                } => {
                    if let Some(run) = runs.get_mut(run_id) {
                        run.relay_id = Some(*relay_id);
                        run.leg = Some(*leg);
                    }
                }
                Write::CreateCompetitor(..) | Write::UpdateClass { .. } => {}
            }
        }
        // Let concurrent sessions interleave between the read and the write.
        tokio::task::yield_now().await;

        let mut legs: Vec<i64> = runs
            .values()
            .filter(|run| run.relay_id == Some(relay_id))
            .filter_map(|run| run.leg)
            .collect();
        legs.sort_unstable();
        Ok(legs)
    }

    async fn create_run(
        &mut self,
        competitor_id: i64,
        relay_id: i64,
        leg: i64,
        si_id: Option<i64>,
    ) -> Result<i64> {
        self.check_writable()?;
        let id = self.next_id();
        self.pending.push(Write::CreateRun(
            id,
            MemRun {
                competitor_id,
                relay_id: Some(relay_id),
                leg: Some(leg),
                si_id,
                is_running: true,
            },
        ));
        Ok(id)
    }

    async fn update_run_relay_leg(
        &mut self,
        run_id: i64,
        relay_id: i64,
        leg: i64,
        is_running: bool,
    ) -> Result<()> {
        self.check_writable()?;
        let exists = self.store.run(run_id).is_some()
            || self.pending.iter().any(|write| match write {
                Write::CreateRun(id, _) => *id == run_id,
                Write::CreateCompetitor(_, _, run_ids) => run_ids.contains(&run_id),
                _ => false,
            });
        if !exists {
            return Err(StorageError::NotFound);
        }
        self.pending.push(Write::UpdateRun {
            run_id,
            relay_id,
            leg,
            is_running,
        });
        Ok(())
    }

    async fn update_competitor_class(&mut self, competitor_id: i64, class_id: i64) -> Result<()> {
        self.check_writable()?;
        if self.store.competitor(competitor_id).is_none() {
            return Err(StorageError::NotFound);
        }
        self.pending.push(Write::UpdateClass {
            competitor_id,
            class_id,
        });
        Ok(())
    }

    async fn create_competitor(
        &mut self,
        request: &CreateCompetitorRequest,
    ) -> Result<CreatedCompetitor> {
        self.check_writable()?;
        let competitor_id = self.next_id();
        let count = self.store.runs_per_competitor.load(Ordering::SeqCst);
        let run_ids: Vec<i64> = (0..count).map(|_| self.next_id()).collect();
        self.pending.push(Write::CreateCompetitor(
            competitor_id,
            MemCompetitor {
                class_id: request.class_id,
                first_name: request.first_name.clone(),
                last_name: request.last_name.clone(),
                si_id: request.si_id,
            },
            run_ids.clone(),
        ));
        Ok(CreatedCompetitor {
            competitor_id,
            run_ids,
        })
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let session = *self;
        let mut state = session.store.state.lock().unwrap();
        for write in session.pending {
            match write {
                Write::CreateRun(id, run) => {
                    state.runs.insert(id, run);
                }
                Write::UpdateRun {
                    run_id,
                    relay_id,
                    leg,
                    is_running,
                } => {
                    if let Some(run) = state.runs.get_mut(&run_id) {
                        run.relay_id = Some(relay_id);
                        run.leg = Some(leg);
                        run.is_running = is_running;
                    }
                }
                Write::UpdateClass {
                    competitor_id,
                    class_id,
                } => {
                    if let Some(competitor) = state.competitors.get_mut(&competitor_id) {
                        competitor.class_id = class_id;
                    }
                    state.class_updates += 1;
                }
                Write::CreateCompetitor(id, competitor, run_ids) => {
                    let si_id = competitor.si_id;
                    state.competitors.insert(id, competitor);
                    for run_id in run_ids {
                        state.runs.insert(
                            run_id,
                            MemRun {
                                competitor_id: id,
                                relay_id: None,
                                leg: None,
                                si_id,
                                is_running: true,
                            },
                        );
                    }
                }
            }
        }
        state.commits += 1;
        Ok(())
    }
}

/// Confirmation double that answers with a fixed value and records prompts.
#[derive(Default)]
pub struct ScriptedConfirmation {
    answer: bool,
    prompts: Mutex<Vec<MovePrompt>>,
}

impl ScriptedConfirmation {
    pub fn answering(answer: bool) -> Arc<Self> {
        Arc::new(Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<MovePrompt> {
        self.prompts.lock().unwrap().clone()
    }
}

impl MoveConfirmation for ScriptedConfirmation {
    fn confirm_move(&self, prompt: &MovePrompt) -> bool {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.answer
    }
}
