/// Per-shell session: the current class and the current selections.
///
/// Nothing here is process-wide. Each command receives the session
/// explicitly, and every store call gets the class passed in from it.
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use selection::{SelectionEngine, SelectionError, Spinner};
use store::{GroupRecord, RosterEntry, RosterStore, StatusEvent, StoreError};
use tracing::{debug, info};

type Shared<T> = Arc<Mutex<SelectionEngine<T>>>;

/// What a spin is drawing from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinTarget {
    Groups,
    Students,
    Members,
}

enum ActiveSpin {
    Groups(Spinner<String, rand::rngs::StdRng>),
    Students(Spinner<RosterEntry, rand::rngs::StdRng>),
}

/// Result of settling a spin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    Group(String),
    Student(RosterEntry),
}

impl fmt::Display for Settled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Settled::Group(g) => write!(f, "group {}", g),
            Settled::Student(s) => write!(f, "student {}", s),
        }
    }
}

pub struct Session {
    store: RosterStore,
    tick_interval: Duration,
    class: Option<String>,
    groups: Shared<String>,
    students: Shared<RosterEntry>,
    spin: Option<ActiveSpin>,
    selected_group: Option<String>,
    selected_student: Option<RosterEntry>,
}

impl Session {
    pub fn new(store: RosterStore, tick_interval: Duration) -> Self {
        Self::with_engines(store, tick_interval, SelectionEngine::new(), SelectionEngine::new())
    }

    /// Builds a session around pre-configured engines (seeded RNGs in tests).
    pub fn with_engines(
        store: RosterStore,
        tick_interval: Duration,
        groups: SelectionEngine<String>,
        students: SelectionEngine<RosterEntry>,
    ) -> Self {
        Self {
            store,
            tick_interval,
            class: None,
            groups: Arc::new(Mutex::new(groups)),
            students: Arc::new(Mutex::new(students)),
            spin: None,
            selected_group: None,
            selected_student: None,
        }
    }

    /// Registers `sink` for every candidate published by either engine.
    pub fn on_tick<F>(&self, sink: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let sink = Arc::new(sink);
        let group_sink = Arc::clone(&sink);
        self.groups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .subscribe(move |g: &String| group_sink(g.as_str()));
        self.students
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .subscribe(move |s: &RosterEntry| sink(&s.to_string()));
    }

    pub fn store(&self) -> &RosterStore {
        &self.store
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    /// The current class, or an error telling the user to pick one.
    pub fn require_class(&self) -> Result<&str> {
        self.class
            .as_deref()
            .ok_or_else(|| anyhow!("no class selected (USE <class>)"))
    }

    pub fn selected_group(&self) -> Option<&str> {
        self.selected_group.as_deref()
    }

    pub fn selected_student(&self) -> Option<&RosterEntry> {
        self.selected_student.as_ref()
    }

    pub fn is_spinning(&self) -> bool {
        self.spin.is_some()
    }

    /// Switches the current class. Any spin and selection is dropped.
    pub fn use_class(&mut self, name: &str) -> Result<()> {
        if !self.store.class_exists(name) {
            return Err(StoreError::ClassNotFound(name.to_string()).into());
        }
        self.abandon_spin();
        self.selected_group = None;
        self.selected_student = None;
        self.class = Some(name.to_string());
        info!(class = name, "class selected");
        Ok(())
    }

    /// Forgets the current class if it no longer exists or was renamed away.
    pub fn forget_class(&mut self, name: &str) {
        if self.class.as_deref() == Some(name) {
            self.abandon_spin();
            self.class = None;
            self.selected_group = None;
            self.selected_student = None;
        }
    }

    pub fn spin(&mut self, target: SpinTarget) -> Result<()> {
        match target {
            SpinTarget::Groups => self.spin_groups(),
            SpinTarget::Students => self.spin_students(),
            SpinTarget::Members => self.spin_members(),
        }
    }

    /// Spins over every group of the current class.
    pub fn spin_groups(&mut self) -> Result<()> {
        let class = self.require_class()?.to_string();
        let pool: Vec<String> = self
            .store
            .index()
            .list_groups(&class)?
            .into_iter()
            .map(|g| g.name)
            .collect();
        let empty_msg = format!("no groups in class {}", class);
        if pool.is_empty() {
            return Err(empty_pool(SelectionError::EmptyPool, &empty_msg));
        }

        self.abandon_spin();
        self.selected_group = None;
        self.selected_student = None;
        let spinner = Spinner::start(Arc::clone(&self.groups), pool, self.tick_interval)
            .map_err(|e| empty_pool(e, &empty_msg))?;
        self.spin = Some(ActiveSpin::Groups(spinner));
        Ok(())
    }

    /// Spins over every student of the current class.
    pub fn spin_students(&mut self) -> Result<()> {
        let class = self.require_class()?.to_string();
        let pool: Vec<RosterEntry> = self
            .store
            .index()
            .list_students(&class)?
            .iter()
            .map(RosterEntry::from)
            .collect();
        self.start_student_spin(pool, &format!("no students in class {}", class))
    }

    /// Spins over the members of the settled group.
    pub fn spin_members(&mut self) -> Result<()> {
        let class = self.require_class()?.to_string();
        let group = self
            .selected_group
            .clone()
            .ok_or_else(|| anyhow!("no group selected (SPIN GROUPS, then STOP)"))?;
        let pool = self.store.index().list_group_members(&class, &group)?;
        self.start_student_spin(pool, &format!("group {} has no members", group))
    }

    /// A failed start on an empty pool leaves the running spin and the
    /// current selections untouched.
    fn start_student_spin(&mut self, pool: Vec<RosterEntry>, empty_msg: &str) -> Result<()> {
        if pool.is_empty() {
            return Err(empty_pool(SelectionError::EmptyPool, empty_msg));
        }
        self.abandon_spin();
        self.selected_student = None;
        let spinner = Spinner::start(Arc::clone(&self.students), pool, self.tick_interval)
            .map_err(|e| empty_pool(e, empty_msg))?;
        self.spin = Some(ActiveSpin::Students(spinner));
        Ok(())
    }

    /// Settles the active spin and remembers the result.
    pub fn stop(&mut self) -> Result<Settled> {
        let spin = self.spin.take().ok_or_else(|| anyhow!("no spin in progress"))?;
        let settled = match spin {
            ActiveSpin::Groups(s) => {
                let group = s.stop().ok_or_else(pool_emptied)?;
                self.selected_group = Some(group.clone());
                Settled::Group(group)
            }
            ActiveSpin::Students(s) => {
                let student = s.stop().ok_or_else(pool_emptied)?;
                self.selected_student = Some(student.clone());
                Settled::Student(student)
            }
        };
        info!(selection = %settled, "spin settled");
        Ok(settled)
    }

    /// Writes `raw` as the score of the settled group.
    pub fn score(&self, raw: &str) -> Result<GroupRecord> {
        let class = self.require_class()?;
        let group = self
            .selected_group
            .as_deref()
            .ok_or_else(|| anyhow!("no group selected"))?;
        let record = self.store.ledger().update_score(class, group, raw)?;
        Ok(record)
    }

    /// Records `status` for the settled student, then clears that selection
    /// so the next roll call starts fresh.
    pub fn record(&mut self, status: &str) -> Result<StatusEvent> {
        let class = self.require_class()?.to_string();
        let student = self
            .selected_student
            .as_ref()
            .ok_or_else(|| anyhow!("no student selected"))?;
        let event = self
            .store
            .recorder()
            .record_status_str(&class, &student.name, status)
            .with_context(|| format!("recording status for {}", student))?;

        self.selected_student = None;
        self.students
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reset();
        Ok(event)
    }

    /// Settles and discards any running spin.
    fn abandon_spin(&mut self) {
        if let Some(spin) = self.spin.take() {
            debug!("abandoning running spin");
            match spin {
                ActiveSpin::Groups(s) => drop(s.stop()),
                ActiveSpin::Students(s) => drop(s.stop()),
            }
        }
    }
}

fn empty_pool(err: SelectionError, msg: &str) -> anyhow::Error {
    anyhow::Error::new(err).context(msg.to_string())
}

fn pool_emptied() -> anyhow::Error {
    anyhow::Error::new(SelectionError::EmptyPool).context("spin stopped: candidate pool emptied")
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("root", &self.store.root())
            .field("class", &self.class)
            .field("spinning", &self.spin.is_some())
            .field("selected_group", &self.selected_group)
            .field("selected_student", &self.selected_student)
            .field("tick_interval", &self.tick_interval)
            .finish()
    }
}
