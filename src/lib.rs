//! Minject is a minimal dependency-injection facility: a registry mapping a
//! normalized service key to a provider, plus an injector that completes a
//! callable's argument set by resolving unbound parameters against that
//! registry by their declared type.
//!
//! Minject is split into two major parts:
//! 1. [`ServiceRegistry`] / [`SharedRegistry`]: the mapping from keys to
//!    providers, with a process-wide instance available on demand
//! 2. [`Injector`]: wraps a callable and resolves its declared parameters at
//!    call time, honoring optional qualifiers and defaults
//!
//! Keys are derived from a type's bare name, lower-cased, so a service
//! registered as `Database` resolves for any parameter declared with that
//! type. A provider is either a factory (fresh value per resolution) or a
//! pre-built instance (shared value, identity-preserving).
//!
//! # Examples
//!
//! ```rust
//! use minject::{register_instance, Arguments, Injector, ParamSpec, Service, SharedRegistry};
//!
//! struct Greeter {
//!     msg: &'static str,
//! }
//!
//! impl Service for Greeter {}
//!
//! let registry = SharedRegistry::new();
//! register_instance(&registry, Greeter { msg: "hello" });
//!
//! let greet = Injector::new(registry)
//!     .param(ParamSpec::typed::<Greeter>("greeter"))
//!     .wrap(|args: Arguments| args.get::<Greeter>("greeter").unwrap().msg);
//!
//! assert_eq!(greet(Arguments::new()).unwrap(), "hello");
//! ```
//!
//! Minject consists of the following components:
//!
//! 1. Types - keys, materialized instances and providers
//! 2. Registry - storing and resolving providers, process-wide access
//! 3. Service - declaring a type registrable, parent-key aliasing
//! 4. Injector - parameter specs and the call-time resolution algorithm
//! 5. Errors - resolution and injection errors

pub mod errors;
pub mod injector;
pub mod registry;
pub mod service;
pub mod types;

pub use errors::{InjectError, ResolveError};
pub use injector::{Arguments, Injector, ParamDefault, ParamSpec, TypeHint};
pub use registry::{ServiceRegistry, SharedRegistry};
pub use service::{register, register_factory, register_instance, Service};
pub use types::{Injectable, Provider, ServiceInstance, ServiceKey};
