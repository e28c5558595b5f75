use thiserror::Error;

/// Boxed error returned by hook bodies and dynamic-method handlers.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("attribute method pattern '{pattern}' overlaps with '{existing}'")]
    OverlappingAttributeMethodPattern { pattern: String, existing: String },

    #[error("attribute name '{0}' is reserved")]
    ReservedAttributeName(String),

    #[error("callbacks for '{0}' have not been defined")]
    UndefinedCallback(String),

    #[error("undefined method: {0}")]
    NoSuchMethod(String),

    #[error("wrong number of arguments for {method} (given {given}, expected {expected})")]
    WrongArguments {
        method: String,
        expected: usize,
        given: usize,
    },

    #[error("callback {hook} failed during {action}: {source}")]
    Callback {
        action: String,
        hook: String,
        #[source]
        source: HookError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ModelError {
    pub(crate) fn callback(action: &str, hook: impl Into<String>, source: HookError) -> Self {
        ModelError::Callback {
            action: action.to_string(),
            hook: hook.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
