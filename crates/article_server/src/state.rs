//! Shared handler state: the process-wide store handle.
//!
//! # Invariants
//! - One engine call holds the connection at a time.
//! - A caller that goes away interrupts only its own statement: the
//!   interrupt is issued while the call is known to own the connection.
//! - A panic inside an engine call does not take the store down with it.

use crate::error::ApiError;
use article_core::{
    ArticleService, ArticleServiceError, SqliteArticleRepository, SystemClock,
};
use log::warn;
use rusqlite::{Connection, InterruptHandle};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Service type every request is served by.
pub type ConnService<'conn> = ArticleService<SqliteArticleRepository<'conn>, SystemClock>;

/// Cloneable handle to the single SQLite connection opened at startup.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
    interrupt: Arc<InterruptHandle>,
}

impl AppState {
    /// Takes ownership of a connection from `open_db`/`open_db_in_memory`.
    pub fn new(conn: Connection) -> Self {
        let interrupt = Arc::new(conn.get_interrupt_handle());
        Self {
            conn: Arc::new(Mutex::new(conn)),
            interrupt,
        }
    }

    /// Runs `f` against the lifecycle engine on the blocking thread pool.
    ///
    /// The outer `ApiError` covers worker failures only; engine outcomes are
    /// returned untouched for the caller to map.
    ///
    /// Dropping the returned future cancels the call: a queued call never
    /// runs, and a running one has its statement interrupted, which the
    /// engine reports as a storage error.
    pub async fn with_service<T, F>(&self, f: F) -> Result<Result<T, ArticleServiceError>, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&ConnService<'_>) -> Result<T, ArticleServiceError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let phase = Arc::new(Mutex::new(CallPhase::Queued));
        let mut cancel = CancelOnDrop {
            phase: Arc::clone(&phase),
            interrupt: Arc::clone(&self.interrupt),
            armed: true,
        };

        let joined = tokio::task::spawn_blocking(move || {
            let guard = lock_connection(&conn);
            if !enter_phase(&phase, CallPhase::Queued, CallPhase::Running) {
                return None;
            }
            let service = ArticleService::new(SqliteArticleRepository::new(&guard), SystemClock);
            let outcome = f(&service);
            // Leave `Running` before the connection is released so a late
            // interrupt can never land on the next caller's statement.
            *lock_phase(&phase) = CallPhase::Done;
            drop(guard);
            Some(outcome)
        })
        .await;
        cancel.armed = false;

        match joined {
            Ok(Some(outcome)) => Ok(outcome),
            Ok(None) => Err(ApiError::internal("article call cancelled")),
            Err(err) => Err(ApiError::internal(format!("article worker failed: {err}"))),
        }
    }
}

/// Lifecycle of one `with_service` call, shared with its cancel guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallPhase {
    Queued,
    Running,
    Done,
    Cancelled,
}

/// Cancels the call it belongs to unless disarmed after completion.
struct CancelOnDrop {
    phase: Arc<Mutex<CallPhase>>,
    interrupt: Arc<InterruptHandle>,
    armed: bool,
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut phase = lock_phase(&self.phase);
        match *phase {
            CallPhase::Queued => *phase = CallPhase::Cancelled,
            CallPhase::Running => self.interrupt.interrupt(),
            CallPhase::Done | CallPhase::Cancelled => {}
        }
    }
}

fn lock_connection(conn: &Mutex<Connection>) -> MutexGuard<'_, Connection> {
    conn.lock().unwrap_or_else(|poisoned| {
        warn!("event=store_lock module=api status=recovered reason=poisoned");
        conn.clear_poison();
        poisoned.into_inner()
    })
}

fn lock_phase(phase: &Mutex<CallPhase>) -> MutexGuard<'_, CallPhase> {
    phase.lock().unwrap_or_else(PoisonError::into_inner)
}

fn enter_phase(phase: &Mutex<CallPhase>, from: CallPhase, to: CallPhase) -> bool {
    let mut current = lock_phase(phase);
    if *current != from {
        return false;
    }
    *current = to;
    true
}

#[cfg(test)]
mod tests {
    use super::AppState;
    use article_core::db::open_db_in_memory;
    use article_core::ArticleServiceError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn state_is_clone_and_send() {
        fn assert_bounds<T: Clone + Send + Sync + 'static>() {}
        assert_bounds::<AppState>();
    }

    #[tokio::test]
    async fn panicking_call_does_not_poison_later_calls() {
        let state = AppState::new(open_db_in_memory().unwrap());

        let failed = state
            .with_service(|_| -> Result<(), ArticleServiceError> { panic!("engine blew up") })
            .await;
        assert!(failed.is_err());

        let listed = state
            .with_service(|service| service.list(10, 0))
            .await
            .unwrap()
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn dropped_call_waiting_for_the_store_never_runs() {
        let state = AppState::new(open_db_in_memory().unwrap());
        let ran = Arc::new(AtomicBool::new(false));

        let held = state.conn.lock().unwrap();
        let ran_in_call = Arc::clone(&ran);
        let call = state.with_service(move |_| {
            ran_in_call.store(true, Ordering::SeqCst);
            Ok(())
        });
        assert!(tokio::time::timeout(Duration::from_millis(50), call)
            .await
            .is_err());
        drop(held);

        // Any later call queues behind the cancelled one on the same lock.
        state
            .with_service(|service| service.list(1, 0))
            .await
            .unwrap()
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!ran.load(Ordering::SeqCst));
    }
}
