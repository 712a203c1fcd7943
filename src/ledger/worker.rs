use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

use super::{load_month, Ledger, MonthSnapshot};
use crate::db::{StoreError, StoreResult};
use crate::models::{Expense, Income};

/// What a job did before its month was reloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Loaded,
    /// Id assigned to the inserted row.
    Inserted(i64),
    /// Rows changed by an update or delete; 0 when the id did not exist.
    Affected(usize),
}

/// Answer to a job that got past its mutation.
///
/// `effect` has already been committed. A failed reload only affects
/// `snapshot`, so callers must not retry the mutation on a snapshot error.
#[derive(Debug)]
pub struct Update {
    pub effect: Effect,
    pub snapshot: StoreResult<MonthSnapshot>,
}

enum Job {
    Load(String),
    AddExpense(Expense, String),
    AddIncome(Income, String),
    UpdateExpense(Expense, String),
    UpdateIncome(Income, String),
    RemoveExpense(i64, String),
    RemoveIncome(i64, String),
}

impl Job {
    fn apply<L: Ledger + ?Sized>(self, ledger: &L) -> StoreResult<Update> {
        let (effect, month) = match self {
            Job::Load(month) => (Effect::Loaded, month),
            Job::AddExpense(e, month) => (Effect::Inserted(ledger.add_expense(&e)?), month),
            Job::AddIncome(i, month) => (Effect::Inserted(ledger.add_income(&i)?), month),
            Job::UpdateExpense(e, month) => (Effect::Affected(ledger.update_expense(&e)?), month),
            Job::UpdateIncome(i, month) => (Effect::Affected(ledger.update_income(&i)?), month),
            Job::RemoveExpense(id, month) => (Effect::Affected(ledger.remove_expense(id)?), month),
            Job::RemoveIncome(id, month) => (Effect::Affected(ledger.remove_income(id)?), month),
        };
        match (effect, load_month(ledger, &month)) {
            (Effect::Loaded, Err(e)) => Err(e),
            (effect, snapshot) => {
                if let Err(e) = &snapshot {
                    warn!(?effect, month = %month, error = %e, "reload after mutation failed");
                }
                Ok(Update { effect, snapshot })
            }
        }
    }
}

struct Request {
    job: Job,
    reply: Sender<StoreResult<Update>>,
}

/// Result of a submitted job, delivered from the worker thread.
pub struct Pending {
    rx: Receiver<StoreResult<Update>>,
}

impl Pending {
    /// Block until the worker answers.
    pub fn wait(self) -> StoreResult<Update> {
        self.rx.recv().unwrap_or(Err(StoreError::WorkerGone))
    }

    /// Non-blocking poll; `None` while the job is still queued or running.
    pub fn try_take(&self) -> Option<StoreResult<Update>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(StoreError::WorkerGone)),
        }
    }
}

/// Owns a [`Ledger`] on a dedicated thread so blocking SQLite calls never
/// run on the caller's thread.
///
/// Every job, mutation or not, answers with a fresh snapshot of the month
/// it names. An `Err` from [`Pending::wait`] means nothing was written. Jobs run in submission order; nothing is cancelled, so a
/// caller juggling several months keeps whichever result it applies last.
pub struct LedgerWorker {
    tx: Option<Sender<Request>>,
    handle: Option<JoinHandle<()>>,
}

impl LedgerWorker {
    pub fn spawn<L>(ledger: L) -> std::io::Result<Self>
    where
        L: Ledger + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Request>();
        let handle = thread::Builder::new()
            .name("ledger-worker".into())
            .spawn(move || run(ledger, rx))?;
        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    pub fn load_month(&self, month: impl Into<String>) -> Pending {
        self.submit(Job::Load(month.into()))
    }

    pub fn add_expense(&self, expense: Expense, reload: impl Into<String>) -> Pending {
        self.submit(Job::AddExpense(expense, reload.into()))
    }

    pub fn add_income(&self, income: Income, reload: impl Into<String>) -> Pending {
        self.submit(Job::AddIncome(income, reload.into()))
    }

    pub fn update_expense(&self, expense: Expense, reload: impl Into<String>) -> Pending {
        self.submit(Job::UpdateExpense(expense, reload.into()))
    }

    pub fn update_income(&self, income: Income, reload: impl Into<String>) -> Pending {
        self.submit(Job::UpdateIncome(income, reload.into()))
    }

    pub fn remove_expense(&self, id: i64, reload: impl Into<String>) -> Pending {
        self.submit(Job::RemoveExpense(id, reload.into()))
    }

    pub fn remove_income(&self, id: i64, reload: impl Into<String>) -> Pending {
        self.submit(Job::RemoveIncome(id, reload.into()))
    }

    fn submit(&self, job: Job) -> Pending {
        let (reply, rx) = mpsc::channel();
        let request = Request { job, reply };
        let sent = match &self.tx {
            Some(tx) => tx.send(request),
            None => Err(mpsc::SendError(request)),
        };
        if let Err(mpsc::SendError(request)) = sent {
            // Answer locally so `wait` reports the dead worker instead of hanging.
            let _ = request.reply.send(Err(StoreError::WorkerGone));
        }
        Pending { rx }
    }
}

impl Drop for LedgerWorker {
    fn drop(&mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                debug!("ledger worker panicked");
            }
        }
    }
}

fn run<L: Ledger>(ledger: L, rx: Receiver<Request>) {
    for Request { job, reply } in rx {
        if reply.send(job.apply(&ledger)).is_err() {
            debug!("caller dropped its pending result");
        }
    }
    debug!("ledger worker stopped");
}
