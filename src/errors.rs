use thiserror::Error;

use crate::types::ServiceKey;

/// Errors when resolving a key against the registry
#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    /// The requested key has no registered provider
    #[error("service '{0}' not found")]
    NotFound(ServiceKey),
}

/// Errors raised by an injected call before the wrapped callable runs
#[derive(Error, Debug, Clone)]
pub enum InjectError {
    /// A parameter needs resolution but declares no type and no default
    #[error("missing type annotation for parameter '{0}'")]
    MissingAnnotation(&'static str),
    /// A required parameter's type has no registered provider
    #[error("required service '{key}' is not registered")]
    RequiredServiceMissing {
        key: ServiceKey,
        #[source]
        source: ResolveError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_key() {
        let err = ResolveError::NotFound(ServiceKey::from_name("Database"));
        assert_eq!(err.to_string(), "service 'database' not found");
    }

    #[test]
    fn missing_annotation_names_the_parameter() {
        let err = InjectError::MissingAnnotation("service");
        assert_eq!(
            err.to_string(),
            "missing type annotation for parameter 'service'"
        );
    }

    #[test]
    fn required_missing_wraps_the_lookup_failure() {
        let key = ServiceKey::from_name("Database");
        let err = InjectError::RequiredServiceMissing {
            key: key.clone(),
            source: ResolveError::NotFound(key),
        };
        assert_eq!(err.to_string(), "required service 'database' is not registered");
        assert!(std::error::Error::source(&err).is_some());
    }
}
