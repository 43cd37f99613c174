//! In-flight request sharing
//!
//! Concurrent GETs for the same URL await one upstream request instead of
//! each issuing their own. Entries live only while the request is pending;
//! nothing is cached after it settles.

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::PulsedResult;

type SharedBody = Shared<BoxFuture<'static, PulsedResult<Arc<str>>>>;

#[derive(Default)]
pub(crate) struct InFlight {
    pending: Mutex<HashMap<String, SharedBody>>,
}

impl InFlight {
    /// Join the pending request for `key`, or start one with `start`
    pub(crate) async fn run<F>(&self, key: &str, start: F) -> PulsedResult<Arc<str>>
    where
        F: FnOnce() -> BoxFuture<'static, PulsedResult<Arc<str>>>,
    {
        let fut = {
            let mut pending = self.pending.lock();
            match pending.get(key) {
                Some(existing) => {
                    tracing::trace!("Joining in-flight request for {}", key);
                    existing.clone()
                }
                None => {
                    let fut = start().shared();
                    pending.insert(key.to_string(), fut.clone());
                    fut
                }
            }
        };

        let result = fut.clone().await;

        let mut pending = self.pending.lock();
        if pending.get(key).is_some_and(|f| f.ptr_eq(&fut)) {
            pending.remove(key);
        }

        result
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.pending.lock().len()
    }
}
