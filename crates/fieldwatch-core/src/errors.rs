use thiserror::Error;

/// Result type alias using the canonical `ExError`
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on
/// programmatically and that tests assert against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input shape
    /// The construction source is not a structured record
    InvalidSourceKind,
    /// The change-report input is not a structured record
    InvalidCurrentKind,

    // Lifecycle
    /// The tracker never completed construction
    NotInitialized,

    // Integration
    Serialization,
    InvalidConfig,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidSourceKind => "ERR_INVALID_SOURCE_KIND",
            ExErrorKind::InvalidCurrentKind => "ERR_INVALID_CURRENT_KIND",
            ExErrorKind::NotInitialized => "ERR_NOT_INITIALIZED",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus optional
/// context (operation, offending value kind, field name) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    value_kind: Option<String>,
    field: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            value_kind: None,
            field: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the kind of value that was rejected (e.g. `number`, `array`)
    pub fn with_value_kind(mut self, value_kind: impl Into<String>) -> Self {
        self.value_kind = Some(value_kind.into());
        self
    }

    /// Add field name context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation name, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the rejected value kind, if any
    pub fn value_kind(&self) -> Option<&str> {
        self.value_kind.as_deref()
    }

    /// Get the field name, if any
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(value_kind) = &self.value_kind {
            write!(f, " (value_kind: {})", value_kind)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for tracker operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackerError {
    /// Construction source does not serialize to a map of named fields
    #[error("Source must be a struct or a reference to one, got {kind}")]
    InvalidSourceKind { kind: String },

    /// Change-report input does not serialize to a map of named fields
    #[error("Current must be a struct or a reference to one, got {kind}")]
    InvalidCurrentKind { kind: String },

    /// Change report requested before construction completed
    #[error("Tracker not initialized: construct it with ChangeTracker::new first")]
    NotInitialized,

    /// The record's `Serialize` implementation failed
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Tracker configuration could not be parsed
    #[error("Invalid tracker config: {reason}")]
    InvalidConfig { reason: String },
}

impl From<TrackerError> for ExError {
    fn from(err: TrackerError) -> Self {
        let message = err.to_string();
        match err {
            TrackerError::InvalidSourceKind { kind } => {
                ExError::new(ExErrorKind::InvalidSourceKind)
                    .with_value_kind(kind)
                    .with_message(message)
            }
            TrackerError::InvalidCurrentKind { kind } => {
                ExError::new(ExErrorKind::InvalidCurrentKind)
                    .with_value_kind(kind)
                    .with_message(message)
            }
            TrackerError::NotInitialized => {
                ExError::new(ExErrorKind::NotInitialized).with_message(message)
            }
            TrackerError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
            TrackerError::InvalidConfig { .. } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(message)
            }
        }
    }
}
