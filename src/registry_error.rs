use thiserror::Error;

/// Errors returned by registry lookups.
///
/// Construction failures are not represented here: they are returned to the caller as
/// the constructor's own error type.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum RegistryError {
    /// No instance of the type has been constructed yet.
    #[error("Type not found in registry: {type_name}")]
    TypeNotFound { type_name: &'static str },

    /// The slot stored under the type's key holds a different type.
    #[error("Type mismatch in registry: {type_name}")]
    TypeMismatch { type_name: &'static str },
}
