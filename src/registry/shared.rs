// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use parking_lot::Mutex;

use crate::Registry;

/// A registry that can be shared between threads. Each call to `with` holds
/// a single exclusive lock for the whole operation.
#[derive(Clone, Debug, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl SharedRegistry {
    pub fn new(registry: Registry) -> Self {
        SharedRegistry {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Runs `f` with exclusive access to the registry.
    pub fn with<T>(&self, f: impl FnOnce(&mut Registry) -> T) -> T {
        let mut registry = self.inner.lock();
        f(&mut registry)
    }

    /// Returns a copy of the registry as it is now.
    pub fn snapshot(&self) -> Registry {
        self.inner.lock().clone()
    }

    /// Swaps in a new registry, returning the old one. Used after a project
    /// has been opened successfully.
    pub fn replace(&self, registry: Registry) -> Registry {
        std::mem::replace(&mut *self.inner.lock(), registry)
    }
}
