//! Lazily-established, memoized database connection.
//!
//! ```text
//!            get()                      attempt resolves
//!  Empty ───────────► Connecting(gen) ──────────────────► Ready(conn)
//!    ▲                     │   ▲                              │
//!    │     Err(e)          │   │ concurrent get() awaits      │
//!    └─────────────────────┘   └── the same shared attempt    │
//!    ▲                                                        │
//!    └──────────────────────────── reset() ───────────────────┘
//! ```

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::error::DatabaseResult;

/// Establishes a single connection to a backing store.
///
/// Implementations should verify the connection (e.g. with a ping) before
/// returning it, so a cached connection is known to have worked once.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Handle shared by every caller once connected (cheap to clone)
    type Connection: Clone + Send + Sync + 'static;

    async fn connect(&self) -> DatabaseResult<Self::Connection>;
}

type Attempt<C> = Shared<BoxFuture<'static, DatabaseResult<C>>>;

enum Slot<C> {
    Empty,
    Connecting { generation: u64, attempt: Attempt<C> },
    Ready(C),
}

/// Process-wide connection gate.
///
/// The first call to [`get`](Self::get) starts one connection attempt; callers
/// arriving while it is in flight await that same attempt instead of opening
/// their own. A failed attempt is handed to every waiter and then forgotten,
/// so the next call starts a fresh one. A successful attempt is cached and
/// returned to all future callers without reconnecting.
pub struct ConnectionManager<K: Connector> {
    connector: Arc<K>,
    slot: Mutex<Slot<K::Connection>>,
    generation: AtomicU64,
}

impl<K: Connector> ConnectionManager<K> {
    pub fn new(connector: K) -> Self {
        Self {
            connector: Arc::new(connector),
            slot: Mutex::new(Slot::Empty),
            generation: AtomicU64::new(0),
        }
    }

    /// Returns the cached connection, connecting on first use.
    pub async fn get(&self) -> DatabaseResult<K::Connection> {
        let (generation, attempt) = {
            let mut slot = self.slot.lock().await;
            match &*slot {
                Slot::Ready(connection) => return Ok(connection.clone()),
                Slot::Connecting {
                    generation,
                    attempt,
                } => (*generation, attempt.clone()),
                Slot::Empty => {
                    let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
                    let connector = Arc::clone(&self.connector);
                    let attempt = async move { connector.connect().await }
                        .boxed()
                        .shared();

                    debug!(generation, "Starting database connection attempt");
                    *slot = Slot::Connecting {
                        generation,
                        attempt: attempt.clone(),
                    };
                    (generation, attempt)
                }
            }
        };

        let result = attempt.await;

        // Only the attempt that is still current may settle the slot; a reset
        // or a newer attempt must not be overwritten by a stale one.
        let mut slot = self.slot.lock().await;
        let current = matches!(
            &*slot,
            Slot::Connecting { generation: g, .. } if *g == generation
        );

        if current {
            match &result {
                Ok(connection) => {
                    info!(generation, "Database connection established");
                    *slot = Slot::Ready(connection.clone());
                }
                Err(e) => {
                    warn!(generation, error = %e, "Database connection attempt failed");
                    *slot = Slot::Empty;
                }
            }
        }

        result
    }

    /// Whether a connection has been established and cached.
    pub async fn is_connected(&self) -> bool {
        matches!(&*self.slot.lock().await, Slot::Ready(_))
    }

    /// Drops the cached connection (or in-flight attempt).
    ///
    /// The next [`get`](Self::get) starts over as if the process had just
    /// started. Intended for test isolation and for recovering after the
    /// backing store has been replaced.
    pub async fn reset(&self) {
        let mut slot = self.slot.lock().await;
        *slot = Slot::Empty;
        debug!("Database connection manager reset");
    }

    pub fn connector(&self) -> &K {
        &self.connector
    }
}
