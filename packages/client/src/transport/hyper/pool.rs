//! Bounded pool of HTTP/1 connections
//!
//! A semaphore holds one permit per allowed connection. A request keeps its
//! permit for the whole exchange, so at most `max_total` connections exist
//! at any time. Finished connections are parked in the idle list and picked
//! up by the next lease.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use bytes::Bytes;
use http_body_util::Full;
use hyper::client::conn::http1::SendRequest;
use tokio::sync::{Semaphore, SemaphorePermit};

use crate::config::ConnectionStrategy;
use crate::transport::TransportError;

pub(crate) type Sender = SendRequest<Full<Bytes>>;

#[derive(Debug)]
pub(crate) struct ConnectionPool {
    permits: Semaphore,
    idle: Mutex<Vec<Sender>>,
    max_total: usize,
    acquire_timeout: Option<Duration>,
}

impl ConnectionPool {
    pub(crate) fn new(strategy: &ConnectionStrategy) -> Self {
        let max_total = strategy.max_connections();
        Self {
            permits: Semaphore::new(max_total.min(Semaphore::MAX_PERMITS)),
            idle: Mutex::new(Vec::new()),
            max_total,
            acquire_timeout: strategy.acquire_timeout(),
        }
    }

    /// Waits for a free slot, bounded by the acquire timeout.
    pub(crate) async fn acquire(&self) -> Result<Lease<'_>, TransportError> {
        let permit = match self.acquire_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.permits.acquire())
                .await
                .map_err(|_| {
                    tracing::debug!(
                        target: "mgmt_client::pool",
                        ?timeout,
                        max_total = self.max_total,
                        "timed out waiting for a connection"
                    );
                    TransportError::PoolTimeout {
                        timeout,
                        max_total: self.max_total,
                    }
                })?,
            None => self.permits.acquire().await,
        }
        .map_err(|_| TransportError::Init("connection pool is closed".to_owned()))?;

        Ok(Lease {
            sender: self.take_idle(),
            pool: self,
            _permit: permit,
        })
    }

    /// Connections currently parked, not counting leased ones.
    pub(crate) fn idle_count(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn take_idle(&self) -> Option<Sender> {
        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        while let Some(sender) = idle.pop() {
            if !sender.is_closed() {
                return Some(sender);
            }
        }
        None
    }

    fn park(&self, sender: Sender) {
        if sender.is_closed() {
            return;
        }
        self.idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
    }
}

/// A pool slot, optionally holding a reusable connection.
///
/// Dropping the lease parks its connection before the slot is released.
#[derive(Debug)]
pub(crate) struct Lease<'a> {
    sender: Option<Sender>,
    pool: &'a ConnectionPool,
    _permit: SemaphorePermit<'a>,
}

impl Lease<'_> {
    /// The connection a previous request left behind, if any.
    pub(crate) fn take(&mut self) -> Option<Sender> {
        self.sender.take()
    }

    /// Returns a connection for reuse once this lease ends.
    pub(crate) fn put(&mut self, sender: Sender) {
        self.sender = Some(sender);
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        if let Some(sender) = self.sender.take() {
            self.pool.park(sender);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn single_strategy_has_one_slot() {
        let pool = ConnectionPool::new(&ConnectionStrategy::Single);
        let lease = pool.acquire().await.expect("first slot");
        assert!(pool.permits.try_acquire().is_err());
        drop(lease);
        assert!(pool.permits.try_acquire().is_ok());
    }

    #[tokio::test]
    async fn exhausted_pool_times_out() {
        let pool = ConnectionPool::new(&ConnectionStrategy::Pooled {
            max_total: 1,
            acquire_timeout: Some(Duration::from_millis(20)),
        });
        let _held = pool.acquire().await.expect("first slot");

        let err = pool.acquire().await.expect_err("pool is exhausted");
        assert!(matches!(
            err,
            TransportError::PoolTimeout { max_total: 1, .. }
        ));
        assert!(err.is_connect_failure());
    }

    #[tokio::test]
    async fn fresh_lease_has_no_connection() {
        let pool = ConnectionPool::new(&ConnectionStrategy::Pooled {
            max_total: 2,
            acquire_timeout: None,
        });
        let mut lease = pool.acquire().await.expect("slot");
        assert!(lease.take().is_none());
        drop(lease);
        assert_eq!(pool.idle_count(), 0);
    }
}
