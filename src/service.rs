use crate::{
    registry::SharedRegistry,
    types::{Injectable, Provider, ServiceKey},
};

/// A type that can be registered and later resolved by key.
///
/// `parent_key` names the single immediate supertype the service should also
/// be resolvable as. Returning `None` means the type declares no meaningful
/// ancestor. Only this one key is aliased; ancestor chains and further
/// supertypes are deliberately not walked.
pub trait Service: Injectable {
    /// Key the concrete type is registered under.
    fn service_key() -> ServiceKey
    where
        Self: Sized,
    {
        ServiceKey::of::<Self>()
    }

    /// Key of the immediate supertype, if the type declares one.
    fn parent_key() -> Option<ServiceKey>
    where
        Self: Sized,
    {
        None
    }
}

/// Registers `S` with a fresh value produced per resolution via `Default`.
pub fn register<S: Service + Default>(registry: &SharedRegistry) {
    register_factory(registry, S::default);
}

/// Registers `S` with an explicit zero-argument constructor.
pub fn register_factory<S, F>(registry: &SharedRegistry, make: F)
where
    S: Service,
    F: Fn() -> S + Send + Sync + 'static,
{
    register_provider::<S>(registry, Provider::factory(make));
}

/// Registers a pre-built value, shared between all resolutions.
pub fn register_instance<S: Service>(registry: &SharedRegistry, service: S) {
    register_provider::<S>(registry, Provider::instance(service));
}

/// Stores the provider under the concrete key, and under the parent key when
/// the type declares one. Both keys map to the same provider.
fn register_provider<S: Service>(registry: &SharedRegistry, provider: Provider) {
    if let Some(parent) = S::parent_key() {
        registry.register(parent, provider.clone());
    }
    registry.register(S::service_key(), provider);
}
