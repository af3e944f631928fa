use std::{
    any::{type_name, Any},
    fmt,
    sync::Arc,
};

/// We assume that we are using a multithreaded host
/// So anything injectable needs to be Send + Sync + 'static
pub trait Injectable: Send + Sync + 'static {}
impl<T: Send + Sync + 'static> Injectable for T {}

/// Normalized registry key, derived from a type's name.
///
/// The module path and generic arguments are dropped and the bare name is
/// lower-cased, so `crate::services::Database` and the name `"Database"`
/// produce the same key. Two distinct types sharing a bare name collide;
/// the last registration wins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceKey(String);

impl ServiceKey {
    /// Key for the type `T`.
    pub fn of<T: ?Sized>() -> ServiceKey {
        ServiceKey::from_name(type_name::<T>())
    }

    /// Normalizes an arbitrary name into a key.
    pub fn from_name(name: &str) -> ServiceKey {
        let bare = name.split('<').next().unwrap_or(name);
        let bare = bare.rsplit("::").next().unwrap_or(bare);
        ServiceKey(bare.trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceKey {
    fn from(name: &str) -> Self {
        ServiceKey::from_name(name)
    }
}

/// A materialized service value.
#[derive(Clone)]
pub struct ServiceInstance {
    key: ServiceKey,
    object: Arc<dyn Any + Send + Sync>,
}

impl ServiceInstance {
    pub fn new<T: Injectable>(value: T) -> Self {
        ServiceInstance {
            key: ServiceKey::of::<T>(),
            object: Arc::new(value),
        }
    }

    /// Wraps an already shared value without copying it.
    pub fn from_shared<T: Injectable>(value: Arc<T>) -> Self {
        ServiceInstance {
            key: ServiceKey::of::<T>(),
            object: value,
        }
    }

    /// Key of the concrete type the value was produced from.
    pub fn key(&self) -> &ServiceKey {
        &self.key
    }

    /// Recover the concrete type, returning the actual key on a mismatch.
    pub fn downcast<T: Injectable>(&self) -> Result<Arc<T>, ServiceKey> {
        self.object
            .clone()
            .downcast::<T>()
            .map_err(|_| self.key.clone())
    }

    /// True when both values are the same shared object.
    pub fn ptr_eq(&self, other: &ServiceInstance) -> bool {
        Arc::ptr_eq(&self.object, &other.object)
    }
}

impl fmt::Debug for ServiceInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ServiceInstance").field(&self.key).finish()
    }
}

/// The stored recipe for producing a service value.
///
/// Cloning a provider shares the underlying factory or instance, so the same
/// provider registered under two keys resolves equivalently through both.
#[derive(Clone)]
pub enum Provider {
    /// Zero-argument constructor, produces a fresh value per resolution.
    Factory(Arc<dyn Fn() -> ServiceInstance + Send + Sync>),
    /// Pre-built value, every resolution returns the same shared object.
    Instance(ServiceInstance),
}

impl Provider {
    pub fn factory<T, F>(make: F) -> Provider
    where
        T: Injectable,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Provider::Factory(Arc::new(move || ServiceInstance::new(make())))
    }

    pub fn instance<T: Injectable>(value: T) -> Provider {
        Provider::Instance(ServiceInstance::new(value))
    }

    /// Materializes a value from this provider.
    pub(crate) fn produce(&self) -> ServiceInstance {
        match self {
            Provider::Factory(make) => make(),
            Provider::Instance(instance) => instance.clone(),
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Provider::Factory(_) => "factory",
            Provider::Instance(_) => "instance",
        }
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}
