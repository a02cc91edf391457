//! Background dataset loading with cancellation.
//!
//! A [`LoadTask`] runs one load on a worker thread and is polled from the UI
//! thread every frame. Cancelling (explicitly or by dropping the task, which
//! is what happens when a view is torn down) guarantees the result is never
//! observed: the worker skips sending and [`LoadTask::poll`] reports
//! [`LoadPoll::Cancelled`] even if the result already reached the channel.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver, TryRecvError};

use super::error::LoadError;
use super::loader;
use super::model::{Dataset, Schema};

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of one poll.
#[derive(Debug)]
pub enum LoadPoll {
    Pending,
    Ready(Result<Dataset, LoadError>),
    Cancelled,
}

/// Handle on an in-flight load.
#[derive(Debug)]
pub struct LoadTask {
    token: CancelToken,
    rx: Receiver<Result<Dataset, LoadError>>,
    done: bool,
}

impl LoadTask {
    /// Load a CSV file against `schema` on a worker thread.
    pub fn spawn(path: PathBuf, schema: Schema) -> Self {
        Self::spawn_with(move || loader::load_file(&path, &schema))
    }

    /// Run an arbitrary load function on a worker thread.
    pub fn spawn_with<F>(load: F) -> Self
    where
        F: FnOnce() -> Result<Dataset, LoadError> + Send + 'static,
    {
        let token = CancelToken::new();
        let (tx, rx) = bounded(1);
        let worker_token = token.clone();

        thread::spawn(move || {
            let result = load();
            if worker_token.is_cancelled() {
                log::debug!("load finished after cancellation; result discarded");
                return;
            }
            // The receiver may already be gone if the task was dropped.
            let _ = tx.send(result);
        });

        LoadTask {
            token,
            rx,
            done: false,
        }
    }

    /// Non-blocking check for the result. Yields `Ready` at most once.
    pub fn poll(&mut self) -> LoadPoll {
        if self.token.is_cancelled() {
            return LoadPoll::Cancelled;
        }
        if self.done {
            return LoadPoll::Pending;
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.done = true;
                LoadPoll::Ready(result)
            }
            Err(TryRecvError::Empty) => LoadPoll::Pending,
            Err(TryRecvError::Disconnected) => {
                self.done = true;
                LoadPoll::Cancelled
            }
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A clone of the cancellation token, for wiring into other owners.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }
}

impl Drop for LoadTask {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{FieldType, Row};
    use std::time::{Duration, Instant};

    fn tiny_dataset() -> Dataset {
        let schema = Schema::new([("gender", FieldType::Text), ("count", FieldType::Number)]);
        Dataset::new(
            "gender_counts.csv",
            schema,
            vec![Row::new().with("gender", "female").with("count", 3.0)],
        )
    }

    fn poll_until_settled(task: &mut LoadTask) -> LoadPoll {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            match task.poll() {
                LoadPoll::Pending if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(5))
                }
                other => return other,
            }
        }
    }

    #[test]
    fn test_completed_load_is_ready() {
        let mut task = LoadTask::spawn_with(|| Ok(tiny_dataset()));
        match poll_until_settled(&mut task) {
            LoadPoll::Ready(Ok(ds)) => assert_eq!(ds.len(), 1),
            other => panic!("unexpected poll: {other:?}"),
        }
        // result is handed out once
        assert!(matches!(task.poll(), LoadPoll::Pending));
    }

    #[test]
    fn test_load_error_is_surfaced() {
        let mut task = LoadTask::spawn(PathBuf::from("/nonexistent/gender_counts.csv"), tiny_dataset().schema().clone());
        match poll_until_settled(&mut task) {
            LoadPoll::Ready(Err(LoadError::Io { .. })) => {}
            other => panic!("unexpected poll: {other:?}"),
        }
    }

    #[test]
    fn test_cancel_before_resolution_discards_result() {
        let (release_tx, release_rx) = bounded::<()>(0);
        let (finished_tx, finished_rx) = bounded::<()>(1);

        let mut task = LoadTask::spawn_with(move || {
            let _ = release_rx.recv();
            let _ = finished_tx.send(());
            Ok(tiny_dataset())
        });
        assert!(matches!(task.poll(), LoadPoll::Pending));

        task.cancel();
        release_tx.send(()).unwrap();
        finished_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        thread::sleep(Duration::from_millis(20));

        assert!(matches!(task.poll(), LoadPoll::Cancelled));
        assert!(task.rx.try_recv().is_err());
    }

    #[test]
    fn test_cancel_after_result_arrives_discards_it() {
        let mut task = LoadTask::spawn_with(|| Ok(tiny_dataset()));
        let deadline = Instant::now() + Duration::from_secs(5);
        while task.rx.is_empty() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(task.rx.len(), 1, "worker never delivered its result");

        task.cancel();
        assert!(matches!(task.poll(), LoadPoll::Cancelled));
        // still undelivered: the guard ran before the channel was read
        assert_eq!(task.rx.len(), 1);
        assert!(matches!(task.poll(), LoadPoll::Cancelled));
    }

    #[test]
    fn test_dropping_task_cancels_token() {
        let (release_tx, release_rx) = bounded::<()>(0);
        let task = LoadTask::spawn_with(move || {
            let _ = release_rx.recv();
            Ok(tiny_dataset())
        });
        let token = task.token();
        drop(task);
        assert!(token.is_cancelled());
        // worker sees the cancellation and exits without panicking
        let _ = release_tx.send(());
    }
}
