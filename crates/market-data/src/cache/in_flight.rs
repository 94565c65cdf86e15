use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::{debug, warn};

use super::CacheKey;
use crate::errors::MarketDataError;

type FlightResult<V> = Result<V, MarketDataError>;
type Slot<V> = watch::Receiver<Option<FlightResult<V>>>;

/// Outcome of [`InFlightRegistry::acquire_or_join`].
pub enum Flight<V> {
    /// No fetch was running; the caller must resolve this one.
    Owner(FlightGuard<V>),
    /// A fetch is already running; await its result.
    Joiner(FlightHandle<V>),
}

/// Registry of pending upstream fetches, one per key.
///
/// The check-then-insert in [`acquire_or_join`](Self::acquire_or_join) runs
/// under a single lock acquisition, and the lock is never held across an
/// await point.
pub struct InFlightRegistry<V> {
    flights: Arc<Mutex<HashMap<CacheKey, Slot<V>>>>,
}

impl<V> Clone for InFlightRegistry<V> {
    fn clone(&self) -> Self {
        Self {
            flights: Arc::clone(&self.flights),
        }
    }
}

impl<V> Default for InFlightRegistry<V> {
    fn default() -> Self {
        Self {
            flights: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

fn lock_flights<V>(
    flights: &Mutex<HashMap<CacheKey, Slot<V>>>,
) -> MutexGuard<'_, HashMap<CacheKey, Slot<V>>> {
    flights.lock().unwrap_or_else(|poisoned| {
        warn!("In-flight registry mutex was poisoned, recovering");
        poisoned.into_inner()
    })
}

impl<V: Clone> InFlightRegistry<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins the running fetch for `key`, or registers the caller as its owner.
    pub fn acquire_or_join(&self, key: &CacheKey) -> Flight<V> {
        let mut flights = lock_flights(&self.flights);
        if let Some(rx) = flights.get(key) {
            debug!("Joining in-flight request for {}", key);
            return Flight::Joiner(FlightHandle { rx: rx.clone() });
        }

        let (tx, rx) = watch::channel(None);
        flights.insert(key.clone(), rx);
        Flight::Owner(FlightGuard {
            key: key.clone(),
            tx: Some(tx),
            flights: Arc::clone(&self.flights),
        })
    }

    pub fn is_in_flight(&self, key: &CacheKey) -> bool {
        lock_flights(&self.flights).contains_key(key)
    }

    pub fn len(&self) -> usize {
        lock_flights(&self.flights).len()
    }

    pub fn is_empty(&self) -> bool {
        lock_flights(&self.flights).is_empty()
    }
}

/// Owner side of a pending fetch.
///
/// Dropping the guard without calling [`complete`](Self::complete) still
/// releases the key; waiters then receive [`MarketDataError::Abandoned`].
pub struct FlightGuard<V> {
    key: CacheKey,
    tx: Option<watch::Sender<Option<FlightResult<V>>>>,
    flights: Arc<Mutex<HashMap<CacheKey, Slot<V>>>>,
}

impl<V> FlightGuard<V> {
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// A handle the owner can await like any joiner.
    pub fn handle(&self) -> FlightHandle<V> {
        let rx = match &self.tx {
            Some(tx) => tx.subscribe(),
            None => watch::channel(None).1,
        };
        FlightHandle { rx }
    }

    /// Releases the key and publishes the result to every waiter.
    pub fn complete(mut self, result: FlightResult<V>) {
        self.release();
        if let Some(tx) = self.tx.take() {
            tx.send_replace(Some(result));
        }
    }

    fn release(&self) {
        lock_flights(&self.flights).remove(&self.key);
    }
}

impl<V> Drop for FlightGuard<V> {
    fn drop(&mut self) {
        if self.tx.is_some() {
            warn!("In-flight request for {} dropped without a result", self.key);
            self.release();
        }
    }
}

/// Waiter side of a pending fetch.
pub struct FlightHandle<V> {
    rx: watch::Receiver<Option<FlightResult<V>>>,
}

impl<V: Clone> FlightHandle<V> {
    /// Waits for the owner's result.
    pub async fn wait(mut self) -> FlightResult<V> {
        loop {
            let current = self.rx.borrow_and_update().clone();
            if let Some(result) = current {
                return result;
            }
            if self.rx.changed().await.is_err() {
                // Sender gone. It may still have published before dropping.
                let last = self.rx.borrow().clone();
                return last.unwrap_or_else(|| {
                    Err(MarketDataError::Abandoned(String::from(
                        "owner dropped without a result",
                    )))
                });
            }
        }
    }
}
