//! One-shot background jobs polled from the GUI thread

use anyhow::{anyhow, Result};
use std::future::Future;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use tokio::runtime::Handle;

/// Result slot for a future running on the app runtime
pub struct AsyncJob<T> {
    receiver: Option<Receiver<Result<T>>>,
}

impl<T: Send + 'static> AsyncJob<T> {
    /// Run `fut` on the given runtime and report its result through the job
    pub fn spawn<Fut>(handle: &Handle, fut: Fut) -> Self
    where
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        handle.spawn(async move {
            let _ = tx.send(fut.await);
        });
        Self::new(rx)
    }
}

impl<T> AsyncJob<T> {
    pub fn new(receiver: Receiver<Result<T>>) -> Self {
        Self {
            receiver: Some(receiver),
        }
    }

    /// Returns Some(result) once the job has completed, None while it is still running
    pub fn poll(&mut self) -> Option<Result<T>> {
        let rx = self.receiver.as_ref()?;
        match rx.try_recv() {
            Ok(res) => {
                self.receiver = None;
                Some(res)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.receiver = None;
                Some(Err(anyhow!("Worker task disconnected")))
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.receiver.is_some()
    }
}
