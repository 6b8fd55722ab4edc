/// Events emitted by a registry during operations.
///
/// These events are passed to the tracing callback set via
/// [`Registry::set_trace_callback`](crate::Registry::set_trace_callback).
///
/// # Examples
///
/// ```rust
/// use lazy_singleton_registry::RegistryEvent;
///
/// let event = RegistryEvent::Construct { type_name: "i32" };
/// assert_eq!(event.to_string(), "construct { type_name: i32 }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// An instance was constructed and stored.
    Construct {
        /// The type name of the constructed value (e.g., "i32", "alloc::string::String")
        type_name: &'static str,
    },

    /// A constructor returned an error; the type stays uninitialized.
    ConstructFailed { type_name: &'static str },

    /// An existing instance was returned by a `get_or_*` call.
    Reuse { type_name: &'static str },

    /// A value was requested with `get`.
    Get {
        type_name: &'static str,
        /// Whether an instance was found
        found: bool,
    },

    /// A `contains` check was performed.
    Contains { type_name: &'static str, found: bool },
}

impl RegistryEvent {
    /// The type name the event refers to.
    pub fn type_name(&self) -> &'static str {
        match self {
            RegistryEvent::Construct { type_name }
            | RegistryEvent::ConstructFailed { type_name }
            | RegistryEvent::Reuse { type_name }
            | RegistryEvent::Get { type_name, .. }
            | RegistryEvent::Contains { type_name, .. } => *type_name,
        }
    }
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Construct { type_name } => {
                write!(f, "construct {{ type_name: {type_name} }}")
            }
            RegistryEvent::ConstructFailed { type_name } => {
                write!(f, "construct_failed {{ type_name: {type_name} }}")
            }
            RegistryEvent::Reuse { type_name } => write!(f, "reuse {{ type_name: {type_name} }}"),
            RegistryEvent::Get { type_name, found } => {
                write!(f, "get {{ type_name: {type_name}, found: {found} }}")
            }
            RegistryEvent::Contains { type_name, found } => {
                write!(f, "contains {{ type_name: {type_name}, found: {found} }}")
            }
        }
    }
}
