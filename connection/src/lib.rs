//! Single-producer-group, single-consumer hand-off between a worker thread and
//! the thread that owns UI state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TryRecvError, TrySendError};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    /// No limit on queued messages; senders never wait.
    Unbounded,
    /// At most `queue_capacity` queued messages; senders wait for room.
    Blocking,
    /// At most `queue_capacity` queued messages; messages that do not fit are discarded.
    DropNewest,
}

#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub kind: ConnectionKind,
    pub queue_capacity: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            kind: ConnectionKind::Unbounded,
            queue_capacity: 65_536,
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("send failed: receiver disconnected")]
    SendFailed,
    #[error("receive failed: all senders disconnected")]
    RecvFailed,
}

/// What happened to a message handed to [`ConnectionSender::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Queued,
    Dropped,
}

#[derive(Debug)]
enum SenderKind<T> {
    Unbounded(Sender<T>),
    Blocking(SyncSender<T>),
    DropNewest(SyncSender<T>),
}

impl<T> Clone for SenderKind<T> {
    fn clone(&self) -> Self {
        match self {
            SenderKind::Unbounded(tx) => SenderKind::Unbounded(tx.clone()),
            SenderKind::Blocking(tx) => SenderKind::Blocking(tx.clone()),
            SenderKind::DropNewest(tx) => SenderKind::DropNewest(tx.clone()),
        }
    }
}

#[derive(Debug)]
pub struct ConnectionSender<T> {
    inner: SenderKind<T>,
    dropped: Arc<AtomicU64>,
}

impl<T> Clone for ConnectionSender<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            dropped: Arc::clone(&self.dropped),
        }
    }
}

#[derive(Debug)]
pub struct ConnectionReceiver<T> {
    receiver: Receiver<T>,
    dropped: Arc<AtomicU64>,
}

/// Creates a connected sender/receiver pair following `config`.
///
/// Messages are delivered in the order they were sent by any one sender.
pub fn connect<T: Send>(config: &ConnectionConfig) -> (ConnectionSender<T>, ConnectionReceiver<T>) {
    let dropped = Arc::new(AtomicU64::new(0));
    let capacity = config.queue_capacity.max(1);
    let (inner, receiver) = match config.kind {
        ConnectionKind::Unbounded => {
            let (tx, rx) = mpsc::channel();
            (SenderKind::Unbounded(tx), rx)
        }
        ConnectionKind::Blocking => {
            let (tx, rx) = mpsc::sync_channel(capacity);
            (SenderKind::Blocking(tx), rx)
        }
        ConnectionKind::DropNewest => {
            let (tx, rx) = mpsc::sync_channel(capacity);
            (SenderKind::DropNewest(tx), rx)
        }
    };
    (
        ConnectionSender {
            inner,
            dropped: Arc::clone(&dropped),
        },
        ConnectionReceiver { receiver, dropped },
    )
}

impl<T> ConnectionSender<T> {
    pub fn send(&self, value: T) -> Result<SendOutcome, ConnectionError> {
        match &self.inner {
            SenderKind::Unbounded(tx) => tx
                .send(value)
                .map(|_| SendOutcome::Queued)
                .map_err(|_| ConnectionError::SendFailed),
            SenderKind::Blocking(tx) => tx
                .send(value)
                .map(|_| SendOutcome::Queued)
                .map_err(|_| ConnectionError::SendFailed),
            SenderKind::DropNewest(tx) => match tx.try_send(value) {
                Ok(()) => Ok(SendOutcome::Queued),
                Err(TrySendError::Full(_)) => {
                    let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                    if dropped == 1 || dropped % 1000 == 0 {
                        log::warn!("dispatch queue full, {dropped} message(s) dropped so far");
                    }
                    Ok(SendOutcome::Dropped)
                }
                Err(TrySendError::Disconnected(_)) => Err(ConnectionError::SendFailed),
            },
        }
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<T> ConnectionReceiver<T> {
    /// Returns the next queued message without waiting.
    ///
    /// `Ok(None)` means the queue is momentarily empty; an error means every
    /// sender is gone and nothing is left to read.
    pub fn try_recv(&self) -> Result<Option<T>, ConnectionError> {
        match self.receiver.try_recv() {
            Ok(value) => Ok(Some(value)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(ConnectionError::RecvFailed),
        }
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
