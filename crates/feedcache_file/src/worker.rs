// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! A single background thread that runs submitted jobs one at a time.

use std::{
    io,
    panic::{self, AssertUnwindSafe},
    sync::mpsc::{self, Sender},
    thread,
};

use futures::channel::oneshot;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// The worker thread is gone, so the job never ran or its outcome was lost.
#[ohno::error]
#[display("store worker has stopped")]
pub(crate) struct WorkerStopped;

/// Handle to a FIFO job queue drained by one dedicated thread.
///
/// Jobs are enqueued when [`submit`](Self::submit) is called, not when the
/// returned future is first polled, so issue order is call order. Clones
/// share the queue. The thread exits once every handle is dropped and the
/// queue is drained.
///
/// A job that panics does not take the thread down. The panic is caught on
/// the worker and re-raised on the task awaiting that job's future, and the
/// jobs queued behind it still run.
#[derive(Clone, Debug)]
pub(crate) struct SerialWorker {
    jobs: Sender<Job>,
}

impl SerialWorker {
    pub(crate) fn spawn(name: &str) -> io::Result<Self> {
        let (jobs, queue) = mpsc::channel::<Job>();
        thread::Builder::new().name(name.to_owned()).spawn(move || {
            for job in queue {
                job();
            }
        })?;
        Ok(Self { jobs })
    }

    /// Enqueues `job` and returns a future resolving to its outcome.
    ///
    /// Dropping the future does not cancel the job.
    ///
    /// # Panics
    ///
    /// Awaiting the future re-raises the job's panic, if it had one.
    pub(crate) fn submit<F, R>(&self, job: F) -> impl Future<Output = Result<R, WorkerStopped>> + Send + 'static
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply, outcome) = oneshot::channel();
        let enqueued = self
            .jobs
            .send(Box::new(move || {
                // The caller may have stopped waiting; the job ran regardless.
                let _ = reply.send(panic::catch_unwind(AssertUnwindSafe(job)));
            }))
            .is_ok();

        async move {
            if !enqueued {
                return Err(WorkerStopped::new());
            }
            match outcome.await {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(payload)) => panic::resume_unwind(payload),
                Err(_canceled) => Err(WorkerStopped::new()),
            }
        }
    }
}
