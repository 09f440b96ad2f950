//! Thread Scheduler

use crate::error::*;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::io;
use std::mem;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

/// A unit of work executed on a pool thread.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// A fixed-size pool of named worker threads fed from a task channel.
pub struct ThreadScheduler {
    /// Number of pool threads.
    thread_count: usize,

    /// Sends tasks to the pool. `None` once the scheduler is shutting down.
    task_tx: Option<Sender<Task>>,

    /// Receives tasks; cloned into every pool thread.
    task_rx: Receiver<Task>,

    /// Pool threads report `true` for each completed task and `false` for each
    /// task that panicked.
    done_tx: Sender<bool>,

    /// Receives task completion reports.
    done_rx: Receiver<bool>,

    /// Number of tasks added but not yet joined.
    pending: usize,

    /// The pool threads.
    threads: Vec<JoinHandle<()>>,
}

impl ThreadScheduler {
    /// Create a new scheduler for `thread_count` threads. The threads are not
    /// started until `init_and_launch_threads()`.
    ///
    /// * `thread_count` - Number of threads; must be non-zero.
    pub fn new(thread_count: usize) -> Result<Self, RenderError> {
        if thread_count == 0 {
            return Err(RenderError::InvalidThreadCount);
        }

        let (task_tx, task_rx) = unbounded();
        let (done_tx, done_rx) = unbounded();
        Ok(Self {
            thread_count,
            task_tx: Some(task_tx),
            task_rx,
            done_tx,
            done_rx,
            pending: 0,
            threads: Vec::with_capacity(thread_count),
        })
    }

    /// Create a new scheduler with one thread per logical CPU.
    pub fn with_hardware_concurrency() -> Result<Self, RenderError> {
        Self::new(num_cpus::get().max(1))
    }

    /// Start the pool threads. They block on the task channel until work is
    /// added. Calling this again on a running pool does nothing. If a thread
    /// fails to spawn, the threads already started are stopped and the pool
    /// is left unlaunched so a later call can retry.
    pub fn init_and_launch_threads(&mut self) -> Result<(), RenderError> {
        self.launch_threads(|name, worker| thread::Builder::new().name(name).spawn(worker))
    }

    /// Start the pool threads using `spawn` to create each one.
    ///
    /// * `spawn` - Spawns a named thread running the given worker loop.
    fn launch_threads<S>(&mut self, mut spawn: S) -> Result<(), RenderError>
    where
        S: FnMut(String, Task) -> io::Result<JoinHandle<()>>,
    {
        if !self.threads.is_empty() {
            return Ok(());
        }

        for i in 0..self.thread_count {
            let task_rx = self.task_rx.clone();
            let done_tx = self.done_tx.clone();
            let worker: Task = Box::new(move || {
                for task in task_rx.iter() {
                    let completed = catch_unwind(AssertUnwindSafe(task)).is_ok();
                    if done_tx.send(completed).is_err() {
                        break;
                    }
                }
            });

            match spawn(format!("render-worker-{}", i), worker) {
                Ok(handle) => self.threads.push(handle),
                Err(e) => {
                    error!("Failed to spawn worker thread {}: {}", i, e);
                    self.stop_threads();
                    return Err(RenderError::ThreadSpawn(e));
                }
            }
        }

        info!("Launched {} worker threads", self.thread_count);
        Ok(())
    }

    /// Stop and join the pool threads. Tasks still queued move to a fresh
    /// channel so the next launch runs them.
    fn stop_threads(&mut self) {
        let (task_tx, task_rx) = unbounded();
        let old_rx = mem::replace(&mut self.task_rx, task_rx);
        drop(self.task_tx.replace(task_tx));

        if let Some(task_tx) = &self.task_tx {
            for task in old_rx.try_iter() {
                let _ = task_tx.send(task);
            }
        }

        for handle in self.threads.drain(..) {
            if handle.join().is_err() {
                error!("Worker thread panicked outside of a task");
            }
        }
    }

    /// Enqueue a task for the pool.
    ///
    /// * `task` - The work to run.
    pub fn add_task<F>(&mut self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Some(task_tx) = &self.task_tx {
            if task_tx.send(Box::new(task)).is_ok() {
                self.pending += 1;
            }
        }
    }

    /// Block until every added task finished. Returns
    /// `RenderError::TaskFailed` if any of them panicked.
    pub fn join_all_tasks(&mut self) -> Result<(), RenderError> {
        if self.pending > 0 && self.threads.is_empty() {
            warn!("Joining {} tasks on a pool that was never launched", self.pending);
            self.init_and_launch_threads()?;
        }

        let mut failed = 0;
        while self.pending > 0 {
            match self.done_rx.recv() {
                Ok(completed) => {
                    self.pending -= 1;
                    if !completed {
                        failed += 1;
                    }
                }
                Err(_) => break,
            }
        }
        self.pending = 0;

        if failed > 0 {
            error!("{} task(s) panicked", failed);
            Err(RenderError::TaskFailed { failed })
        } else {
            Ok(())
        }
    }

    /// Returns the number of pool threads.
    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// Returns the number of tasks added but not yet joined.
    pub fn pending_tasks(&self) -> usize {
        self.pending
    }
}

impl Drop for ThreadScheduler {
    fn drop(&mut self) {
        // Closing the channel ends every pool thread's receive loop.
        self.task_tx = None;
        for handle in self.threads.drain(..) {
            if handle.join().is_err() {
                error!("Worker thread panicked outside of a task");
            }
        }
    }
}
