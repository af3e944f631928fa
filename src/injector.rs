use std::{collections::HashMap, future::Future, sync::Arc};

use crate::{
    errors::{InjectError, ResolveError},
    registry::SharedRegistry,
    service::Service,
    types::{Injectable, ServiceInstance, ServiceKey},
};

/// Declared type of a parameter, possibly wrapped in an optional qualifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeHint {
    /// A plain declared type.
    Plain(ServiceKey),
    /// The optional qualifier around a base type.
    Optional(ServiceKey),
}

impl TypeHint {
    pub fn of<T: Injectable>() -> TypeHint {
        TypeHint::Plain(ServiceKey::of::<T>())
    }

    pub fn optional_of<T: Injectable>() -> TypeHint {
        TypeHint::Optional(ServiceKey::of::<T>())
    }

    /// Whether the declared type carries the optional qualifier.
    pub fn is_optional(&self) -> bool {
        matches!(self, TypeHint::Optional(_))
    }

    /// The declared type with the optional qualifier unwrapped.
    pub fn base_type(&self) -> &ServiceKey {
        match self {
            TypeHint::Plain(key) | TypeHint::Optional(key) => key,
        }
    }
}

/// Declared default of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamDefault {
    /// No default declared.
    Absent,
    /// The default is the null sentinel.
    Null,
    /// A non-null default the callable applies itself.
    Provided,
}

/// Resolution request for one declared parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    name: &'static str,
    hint: Option<TypeHint>,
    default: ParamDefault,
}

impl ParamSpec {
    /// Parameter with a plain declared type.
    pub fn typed<T: Injectable>(name: &'static str) -> ParamSpec {
        ParamSpec {
            name,
            hint: Some(TypeHint::of::<T>()),
            default: ParamDefault::Absent,
        }
    }

    /// Parameter declared with the optional qualifier.
    pub fn optional<T: Injectable>(name: &'static str) -> ParamSpec {
        ParamSpec {
            name,
            hint: Some(TypeHint::optional_of::<T>()),
            default: ParamDefault::Absent,
        }
    }

    /// Parameter with no declared type.
    pub fn untyped(name: &'static str) -> ParamSpec {
        ParamSpec {
            name,
            hint: None,
            default: ParamDefault::Absent,
        }
    }

    /// Marks the parameter as defaulting to the null sentinel.
    pub fn default_null(mut self) -> ParamSpec {
        self.default = ParamDefault::Null;
        self
    }

    /// Marks the parameter as carrying its own non-null default.
    pub fn default_provided(mut self) -> ParamSpec {
        self.default = ParamDefault::Provided;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_hint(&self) -> Option<&TypeHint> {
        self.hint.as_ref()
    }

    pub fn default(&self) -> ParamDefault {
        self.default
    }

    /// Nullable when declared optional or defaulted to the null sentinel.
    pub fn is_nullable(&self) -> bool {
        self.hint.as_ref().is_some_and(TypeHint::is_optional) || self.default == ParamDefault::Null
    }
}

/// Argument set handed to a wrapped callable.
///
/// A name bound to the null sentinel stays observable as bound-but-null; that
/// is how an unregistered nullable parameter reaches the callable.
#[derive(Debug, Default, Clone)]
pub struct Arguments {
    values: HashMap<&'static str, Option<ServiceInstance>>,
}

impl Arguments {
    pub fn new() -> Arguments {
        Arguments::default()
    }

    /// Binds a caller-supplied value.
    pub fn with<T: Injectable>(self, name: &'static str, value: T) -> Arguments {
        self.with_shared(name, Arc::new(value))
    }

    /// Binds an already shared caller-supplied value without copying it.
    pub fn with_shared<T: Injectable>(mut self, name: &'static str, value: Arc<T>) -> Arguments {
        self.values
            .insert(name, Some(ServiceInstance::from_shared(value)));
        self
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// True when the name is bound to the null sentinel.
    pub fn is_null(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(None))
    }

    /// Typed access; `None` for the null sentinel, unbound names and type
    /// mismatches.
    pub fn get<T: Injectable>(&self, name: &str) -> Option<Arc<T>> {
        match self.values.get(name) {
            Some(Some(instance)) => instance.downcast().ok(),
            _ => None,
        }
    }

    /// The bound value itself, if the name is bound non-null.
    pub fn instance(&self, name: &str) -> Option<&ServiceInstance> {
        self.values.get(name).and_then(Option::as_ref)
    }

    pub(crate) fn bind_resolved(&mut self, name: &'static str, instance: ServiceInstance) {
        self.values.insert(name, Some(instance));
    }

    pub(crate) fn bind_null(&mut self, name: &'static str) {
        self.values.insert(name, None);
    }
}

/// Wraps callables, resolving their unbound parameters against a registry.
///
/// Parameters are declared up front as [`ParamSpec`]s; at call time every
/// spec not covered by a supplied argument is resolved by its declared type.
pub struct Injector {
    registry: SharedRegistry,
    params: Vec<ParamSpec>,
}

impl Injector {
    pub fn new(registry: SharedRegistry) -> Injector {
        Injector {
            registry,
            params: Vec::new(),
        }
    }

    /// Injector resolving against the process-wide registry.
    pub fn global() -> Injector {
        Injector::new(SharedRegistry::global())
    }

    /// Declares the next parameter.
    ///
    /// Declaration order decides which failure surfaces first when several
    /// parameters are unresolvable.
    pub fn param(mut self, spec: ParamSpec) -> Injector {
        self.params.push(spec);
        self
    }

    /// Completes `supplied` against the declared parameter list.
    ///
    /// Supplied bindings always win and are never looked up. An unbound
    /// parameter without a type fails with [`InjectError::MissingAnnotation`]
    /// unless it has a default, in which case the callable's own default
    /// applies. An unbound typed parameter is resolved by its base type;
    /// when the lookup misses, a nullable parameter is bound to the null
    /// sentinel and a required one fails the whole call.
    pub fn resolve(&self, supplied: Arguments) -> Result<Arguments, InjectError> {
        let mut bound = supplied;
        for spec in &self.params {
            if bound.is_bound(spec.name()) {
                continue;
            }

            let Some(hint) = spec.type_hint() else {
                if spec.default() != ParamDefault::Absent {
                    continue;
                }
                return Err(InjectError::MissingAnnotation(spec.name()));
            };

            let base = hint.base_type();
            match self.registry.get(base.as_str()) {
                Ok(instance) => bound.bind_resolved(spec.name(), instance),
                Err(ResolveError::NotFound(_)) if spec.is_nullable() => {
                    tracing::debug!(
                        param = spec.name(),
                        key = %base,
                        "nullable parameter not registered, binding null"
                    );
                    bound.bind_null(spec.name());
                }
                Err(source) => {
                    tracing::error!(param = spec.name(), key = %base, "required service missing");
                    return Err(InjectError::RequiredServiceMissing {
                        key: base.clone(),
                        source,
                    });
                }
            }
        }
        Ok(bound)
    }

    /// Wraps a callable into one with the same surface.
    ///
    /// Resolution runs on every call, before delegation. When the callable
    /// returns a future, the wrapper hands that pending result back unchanged;
    /// resolution never happens inside a suspension.
    pub fn wrap<R, F>(self, call: F) -> impl Fn(Arguments) -> Result<R, InjectError>
    where
        F: Fn(Arguments) -> R,
    {
        move |supplied| Ok(call(self.resolve(supplied)?))
    }

    /// Resolves and invokes in one step.
    pub fn invoke<R>(
        &self,
        supplied: Arguments,
        call: impl FnOnce(Arguments) -> R,
    ) -> Result<R, InjectError> {
        Ok(call(self.resolve(supplied)?))
    }

    /// Resolves synchronously, then awaits the callable's future.
    pub async fn invoke_async<F, Fut>(
        &self,
        supplied: Arguments,
        call: F,
    ) -> Result<Fut::Output, InjectError>
    where
        F: FnOnce(Arguments) -> Fut,
        Fut: Future,
    {
        let complete = self.resolve(supplied)?;
        Ok(call(complete).await)
    }
}
