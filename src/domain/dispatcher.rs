//! In-process asynchronous event dispatcher.
//!
//! A single background task owns the receiving end of a bounded queue. For each
//! event it calls every registered [`Listener`] in registration order and only
//! then takes the next event, so delivery is totally ordered across the whole
//! process.
//!
//! # Flow
//!
//! 1. A use case calls [`EventDispatcher::dispatch`], which waits only for a
//!    free slot in the queue
//! 2. The dispatch loop takes the event and fans it out sequentially
//! 3. Each listener call runs behind a panic boundary and an optional timeout
//! 4. [`EventDispatcher::shutdown`] closes the queue, drains what is already
//!    queued and joins the task
//!
//! A slow listener stalls every later delivery. The per-listener timeout bounds
//! that stall without breaking ordering.

use futures::FutureExt;
use metrics::counter;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::entities::Event;
use crate::domain::listener::Listener;

/// Default number of events buffered between `dispatch` and the loop.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Default upper bound for a single listener call.
pub const DEFAULT_LISTENER_TIMEOUT: Duration = Duration::from_secs(5);

type Listeners = Arc<RwLock<Vec<Arc<dyn Listener>>>>;

/// Tuning knobs for the dispatch loop.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Queue slots between callers and the loop (minimum 1).
    pub queue_capacity: usize,
    /// Maximum time a single listener may take per event; `None` waits forever.
    pub listener_timeout: Option<Duration>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            listener_timeout: Some(DEFAULT_LISTENER_TIMEOUT),
        }
    }
}

/// Fans lifecycle events out to registered listeners on a dedicated task.
pub struct EventDispatcher {
    sender: mpsc::Sender<Event>,
    listeners: Listeners,
    shutdown_tx: watch::Sender<bool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl EventDispatcher {
    /// Spawns the dispatch loop with an initial set of listeners.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(config: DispatcherConfig, listeners: Vec<Arc<dyn Listener>>) -> Self {
        let capacity = config.queue_capacity.max(1);
        let (sender, receiver) = mpsc::channel(capacity);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let names: Vec<&'static str> = listeners.iter().map(|l| l.name()).collect();
        let listeners: Listeners = Arc::new(RwLock::new(listeners));

        let worker = tokio::spawn(run_dispatch_loop(
            receiver,
            listeners.clone(),
            shutdown_rx,
            config.listener_timeout,
        ));

        info!(capacity, listeners = ?names, "Event dispatcher started");

        Self {
            sender,
            listeners,
            shutdown_tx,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Appends a listener to the fan-out list.
    ///
    /// The loop snapshots the list once per event, so a listener registered
    /// while an event is being delivered starts with the next event.
    pub async fn register(&self, listener: Arc<dyn Listener>) {
        let mut listeners = self.listeners.write().await;
        debug!(
            listener = listener.name(),
            position = listeners.len(),
            "Listener registered"
        );
        listeners.push(listener);
    }

    /// Number of registered listeners.
    pub async fn listener_count(&self) -> usize {
        self.listeners.read().await.len()
    }

    /// Hands an event to the dispatch loop.
    ///
    /// Returns once the queue accepted the event; listener completion is not
    /// awaited. After [`Self::shutdown`] the event is dropped with a warning.
    pub async fn dispatch(&self, event: Event) {
        let event_type = event.event_type().as_str();

        match self.sender.send(event).await {
            Ok(()) => {
                counter!("redirector_events_dispatched_total", "type" => event_type).increment(1);
            }
            Err(mpsc::error::SendError(event)) => {
                warn!(
                    key = event.subject_key(),
                    event_type, "Dispatcher is shut down, event dropped"
                );
                counter!("redirector_events_dropped_total", "type" => event_type).increment(1);
            }
        }
    }

    /// Returns `true` until the dispatcher starts shutting down.
    pub fn is_running(&self) -> bool {
        !self.sender.is_closed() && !*self.shutdown_tx.borrow()
    }

    /// Stops accepting events, drains the queue and waits for the loop to exit.
    ///
    /// Idempotent: later calls return immediately.
    pub async fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);

        let handle = self.worker.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "Dispatch loop ended abnormally");
            }
            info!("Event dispatcher stopped");
        }
    }
}

async fn run_dispatch_loop(
    mut receiver: mpsc::Receiver<Event>,
    listeners: Listeners,
    mut shutdown_rx: watch::Receiver<bool>,
    listener_timeout: Option<Duration>,
) {
    loop {
        tokio::select! {
            biased;

            received = receiver.recv() => match received {
                Some(event) => deliver(&listeners, &event, listener_timeout).await,
                None => break,
            },

            _ = shutdown_rx.changed() => {
                receiver.close();
                let mut drained = 0usize;
                while let Some(event) = receiver.recv().await {
                    deliver(&listeners, &event, listener_timeout).await;
                    drained += 1;
                }
                debug!(drained, "Dispatch queue drained");
                break;
            }
        }
    }
}

/// Delivers one event to every listener, isolating each call.
async fn deliver(listeners: &Listeners, event: &Event, listener_timeout: Option<Duration>) {
    let snapshot: Vec<Arc<dyn Listener>> = listeners.read().await.clone();

    for listener in snapshot {
        let name = listener.name();
        let call = AssertUnwindSafe(listener.consume(event)).catch_unwind();

        let outcome = match listener_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(
                        listener = name,
                        key = event.subject_key(),
                        event_type = %event.event_type(),
                        timeout_ms = limit.as_millis() as u64,
                        "Listener timed out"
                    );
                    counter!("redirector_listener_failures_total", "listener" => name, "reason" => "timeout")
                        .increment(1);
                    continue;
                }
            },
            None => call.await,
        };

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(
                    listener = name,
                    key = event.subject_key(),
                    event_type = %event.event_type(),
                    error = %e,
                    "Listener failed"
                );
                counter!("redirector_listener_failures_total", "listener" => name, "reason" => "error")
                    .increment(1);
            }
            Err(_) => {
                warn!(
                    listener = name,
                    key = event.subject_key(),
                    event_type = %event.event_type(),
                    "Listener panicked"
                );
                counter!("redirector_listener_failures_total", "listener" => name, "reason" => "panic")
                    .increment(1);
            }
        }
    }
}
