use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex},
};

use crate::{
    errors::ResolveError,
    types::{Provider, ServiceInstance, ServiceKey},
};

/// The single mapping from normalized keys to providers.
///
/// At most one provider per key; registering again overwrites silently.
pub struct ServiceRegistry {
    services: HashMap<ServiceKey, Provider>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        ServiceRegistry {
            services: HashMap::new(),
        }
    }

    /// Stores `provider` under `key`, replacing any prior entry.
    pub fn register(&mut self, key: ServiceKey, provider: Provider) {
        tracing::debug!(key = %key, kind = provider.kind(), "registering provider");
        self.services.insert(key, provider);
    }

    /// Resolves `name` to a materialized value.
    ///
    /// A factory provider produces a fresh value on every call; an instance
    /// provider returns the same shared value on every call.
    pub fn get(&self, name: &str) -> Result<ServiceInstance, ResolveError> {
        let key = ServiceKey::from_name(name);
        match self.services.get(&key) {
            Some(provider) => Ok(provider.produce()),
            None => Err(ResolveError::NotFound(key)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(&ServiceKey::from_name(name))
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn clear(&mut self) {
        self.services.clear();
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_struct("ServiceRegistry");
        for (key, provider) in &self.services {
            map.field(key.as_str(), &provider.kind());
        }
        map.finish()
    }
}

/// Cloneable handle to a registry shared between components.
///
/// The inner mutex serializes concurrent `register` and `get` calls. That is
/// a strengthening over the design contract, which only assumes registration
/// at configuration time; callers should still not treat the registry as a
/// concurrent data structure.
#[derive(Clone)]
pub struct SharedRegistry(Arc<Mutex<ServiceRegistry>>);

impl SharedRegistry {
    pub fn new() -> Self {
        SharedRegistry(Arc::new(Mutex::new(ServiceRegistry::new())))
    }

    pub fn register(&self, key: ServiceKey, provider: Provider) {
        self.lock().register(key, provider);
    }

    pub fn get(&self, name: &str) -> Result<ServiceInstance, ResolveError> {
        self.lock().get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains(name)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Runs `f` with the underlying registry locked.
    pub fn with<R>(&self, f: impl FnOnce(&ServiceRegistry) -> R) -> R {
        f(&self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ServiceRegistry> {
        self.0.lock().expect("registry lock poisoned")
    }

    /// The process-wide registry, created on first access.
    ///
    /// Repeated calls return handles to the same underlying registry until
    /// [`SharedRegistry::reset_global`] is called.
    pub fn global() -> SharedRegistry {
        let mut slot = GLOBAL.lock().expect("global registry slot poisoned");
        slot.get_or_insert_with(SharedRegistry::new).clone()
    }

    /// Drops the process-wide registry reference.
    ///
    /// The next [`SharedRegistry::global`] call creates a fresh empty
    /// registry. Handles obtained earlier keep pointing at the old one.
    pub fn reset_global() {
        let mut slot = GLOBAL.lock().expect("global registry slot poisoned");
        *slot = None;
    }
}

impl Default for SharedRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SharedRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.lock(), f)
    }
}

static GLOBAL: Mutex<Option<SharedRegistry>> = Mutex::new(None);
