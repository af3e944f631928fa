use std::sync::{Arc, Mutex};

use futures::executor::block_on;
use minject::{
    register, register_instance, Arguments, InjectError, Injector, ParamSpec, Service, ServiceKey,
    SharedRegistry,
};

// The process-wide registry is shared between tests, which the harness runs
// concurrently.
static GLOBAL_LOCK: Mutex<()> = Mutex::new(());

struct Meta;

struct GreetService {
    msg: String,
}

impl GreetService {
    fn greet(&self) -> &str {
        &self.msg
    }
}

impl Default for GreetService {
    fn default() -> Self {
        GreetService {
            msg: "hello".to_string(),
        }
    }
}

impl Service for GreetService {
    fn parent_key() -> Option<ServiceKey> {
        Some(ServiceKey::of::<Meta>())
    }
}

struct AnotherService {
    msg: String,
}

impl AnotherService {
    fn greet(&self) -> &str {
        &self.msg
    }
}

impl Default for AnotherService {
    fn default() -> Self {
        AnotherService {
            msg: "world".to_string(),
        }
    }
}

impl Service for AnotherService {}

struct AsyncService {
    msg: String,
}

impl AsyncService {
    async fn greet(&self) -> String {
        self.msg.clone()
    }
}

impl Default for AsyncService {
    fn default() -> Self {
        AsyncService {
            msg: "async".to_string(),
        }
    }
}

impl Service for AsyncService {}

#[test]
fn resolves_by_parent_key_through_the_global_registry() {
    let _guard = GLOBAL_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    SharedRegistry::reset_global();

    register::<GreetService>(&SharedRegistry::global());

    let by_parent = SharedRegistry::global().get("meta").unwrap();
    let by_name = SharedRegistry::global().get("greetservice").unwrap();
    assert_eq!(by_parent.downcast::<GreetService>().unwrap().greet(), "hello");
    assert_eq!(by_name.downcast::<GreetService>().unwrap().greet(), "hello");

    let greet = Injector::global()
        .param(ParamSpec::typed::<Meta>("service"))
        .wrap(|args: Arguments| {
            args.get::<GreetService>("service")
                .unwrap()
                .greet()
                .to_string()
        });

    assert_eq!(greet(Arguments::new()).unwrap(), "hello");
}

#[test]
fn injects_multiple_registered_services() {
    let registry = SharedRegistry::new();
    register::<GreetService>(&registry);
    register::<AnotherService>(&registry);

    let injector = Injector::new(registry)
        .param(ParamSpec::typed::<GreetService>("service"))
        .param(ParamSpec::typed::<AnotherService>("another"));

    let (first, second) = injector
        .invoke(Arguments::new(), |args| {
            (
                args.get::<GreetService>("service")
                    .unwrap()
                    .greet()
                    .to_string(),
                args.get::<AnotherService>("another")
                    .unwrap()
                    .greet()
                    .to_string(),
            )
        })
        .unwrap();

    assert_eq!(first, "hello");
    assert_eq!(second, "world");
}

#[test]
fn explicitly_supplied_instance_is_passed_through() {
    let registry = SharedRegistry::new();
    register::<GreetService>(&registry);

    let mine = Arc::new(GreetService {
        msg: "mine".to_string(),
    });
    let injector = Injector::new(registry).param(ParamSpec::typed::<GreetService>("service"));
    let args = injector
        .resolve(Arguments::new().with_shared("service", mine.clone()))
        .unwrap();

    assert!(Arc::ptr_eq(&mine, &args.get::<GreetService>("service").unwrap()));
}

#[test]
fn nullable_parameter_falls_back_to_null_after_reset() {
    let _guard = GLOBAL_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    SharedRegistry::reset_global();

    let greet = Injector::global()
        .param(ParamSpec::optional::<GreetService>("service"))
        .wrap(|args: Arguments| match args.get::<GreetService>("service") {
            Some(service) => service.greet().to_string(),
            None => "nobody".to_string(),
        });

    assert_eq!(greet(Arguments::new()).unwrap(), "nobody");
}

#[test]
fn required_service_is_reported_missing_after_reset() {
    let _guard = GLOBAL_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    SharedRegistry::reset_global();

    let greet = Injector::global()
        .param(ParamSpec::typed::<Meta>("service"))
        .wrap(|args: Arguments| args.get::<GreetService>("service").map(|s| s.greet().to_string()));

    let err = greet(Arguments::new()).unwrap_err();
    match err {
        InjectError::RequiredServiceMissing { key, .. } => assert_eq!(key.as_str(), "meta"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn injects_into_async_callables() {
    let registry = SharedRegistry::new();
    register::<AsyncService>(&registry);

    let injector = Injector::new(registry).param(ParamSpec::typed::<AsyncService>("service"));
    let res = block_on(injector.invoke_async(Arguments::new(), |args| async move {
        args.get::<AsyncService>("service").unwrap().greet().await
    }))
    .unwrap();

    assert_eq!(res, "async");
}

#[test]
fn instance_registration_preserves_identity_through_injection() {
    let registry = SharedRegistry::new();
    register_instance(&registry, GreetService::default());

    let from_registry = registry.get("greetservice").unwrap();
    let injector = Injector::new(registry).param(ParamSpec::typed::<GreetService>("service"));
    let args = injector.resolve(Arguments::new()).unwrap();

    assert!(args.instance("service").unwrap().ptr_eq(&from_registry));
}

#[test]
fn factory_registration_produces_a_fresh_value_per_call() {
    let registry = SharedRegistry::new();
    register::<GreetService>(&registry);

    let injector = Injector::new(registry).param(ParamSpec::typed::<GreetService>("service"));
    let first = injector.resolve(Arguments::new()).unwrap();
    let second = injector.resolve(Arguments::new()).unwrap();

    assert!(!first
        .instance("service")
        .unwrap()
        .ptr_eq(second.instance("service").unwrap()));
}
