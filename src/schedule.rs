//! Minimal task queues for the two cooperating thread contexts.
//!
//! The decode side is a dedicated worker thread draining a FIFO queue; the
//! result side is a queue drained by whichever thread owns it (typically a
//! UI or event-loop thread that must not block on pixel work).

use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use std::time::Duration;

type Task = Box<dyn FnOnce() + Send + 'static>;

enum Message {
    Task(Task),
    Terminate,
}

/// Cloneable handle for posting tasks to a [`TaskQueue`] or [`DecodeWorker`].
#[derive(Clone)]
pub struct TaskSender {
    tx: Sender<Message>,
}

impl TaskSender {
    /// Post a task. Returns `false` if the receiving side is gone, in which
    /// case the task is dropped (releasing whatever it captured).
    pub fn post<F>(&self, task: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.tx.send(Message::Task(Box::new(task))).is_ok()
    }
}

/// A queue drained manually by its owning thread.
///
/// The pipeline posts completions here; the owner calls
/// [`run_pending`](Self::run_pending) (or [`run_next`](Self::run_next)) from
/// its own loop to deliver them.
pub struct TaskQueue {
    tx: Sender<Message>,
    rx: Receiver<Message>,
}

impl TaskQueue {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self { tx, rx }
    }

    pub fn sender(&self) -> TaskSender {
        TaskSender { tx: self.tx.clone() }
    }

    /// Run every task currently queued; returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Ok(Message::Task(task)) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        ran
    }

    /// Block up to `timeout` for one task and run it.
    pub fn run_next(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(Message::Task(task)) => {
                task();
                true
            }
            _ => false,
        }
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// A dedicated decode thread running posted tasks in submission order.
///
/// One worker is meant to be shared by every animated image instance, which
/// is what guarantees per-instance FIFO processing. Dropping the worker
/// finishes tasks already queued, then joins the thread.
pub struct DecodeWorker {
    tx: Sender<Message>,
    handle: Option<thread::JoinHandle<()>>,
}

impl DecodeWorker {
    pub fn spawn() -> Self {
        let (tx, rx) = channel::<Message>();
        let handle = thread::spawn(move || {
            while let Ok(message) = rx.recv() {
                match message {
                    Message::Task(task) => task(),
                    Message::Terminate => break,
                }
            }
        });
        Self { tx, handle: Some(handle) }
    }

    pub fn sender(&self) -> TaskSender {
        TaskSender { tx: self.tx.clone() }
    }
}

impl Drop for DecodeWorker {
    fn drop(&mut self) {
        let _ = self.tx.send(Message::Terminate);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
