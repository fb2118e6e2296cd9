use crate::version::Version;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Version marker
    /// The current version could not be determined
    VersionRead,
    /// A new version value could not be persisted
    VersionWrite,

    // Migration chain
    /// A migration step's own logic failed
    StepExecution,
    /// The chain ended below the latest version with no usable step
    NoMigrationPath,

    // Context
    Cancelled,
    DeadlineExceeded,

    // Input
    InvalidInput,

    // Integration/IO
    Persistence,
    Io,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::VersionRead => "ERR_VERSION_READ",
            ExErrorKind::VersionWrite => "ERR_VERSION_WRITE",
            ExErrorKind::StepExecution => "ERR_STEP_EXECUTION",
            ExErrorKind::NoMigrationPath => "ERR_NO_MIGRATION_PATH",
            ExErrorKind::Cancelled => "ERR_CANCELLED",
            ExErrorKind::DeadlineExceeded => "ERR_DEADLINE_EXCEEDED",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a kind for programmatic handling plus the context needed to
/// diagnose a failed run: the operation, the versions involved, the step
/// name and the underlying cause.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    from_version: Option<Version>,
    to_version: Option<Version>,
    step_name: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            from_version: None,
            to_version: None,
            step_name: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the source version of the transition involved
    pub fn with_from_version(mut self, version: Version) -> Self {
        self.from_version = Some(version);
        self
    }

    /// Add the target version of the transition involved
    pub fn with_to_version(mut self, version: Version) -> Self {
        self.to_version = Some(version);
        self
    }

    /// Add both ends of a transition
    pub fn with_versions(self, from: Version, to: Version) -> Self {
        self.with_from_version(from).with_to_version(to)
    }

    /// Add the name of the step involved
    pub fn with_step_name(mut self, name: impl Into<String>) -> Self {
        self.step_name = Some(name.into());
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

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn from_version(&self) -> Option<Version> {
        self.from_version
    }

    pub fn to_version(&self) -> Option<Version> {
        self.to_version
    }

    pub fn step_name(&self) -> Option<&str> {
        self.step_name.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// Walk the source chain down to the innermost error
    pub fn root_cause(&self) -> &ExError {
        let mut current = self;
        while let Some(next) = current.source_error() {
            current = next;
        }
        current
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
        match (self.from_version, self.to_version) {
            (Some(from), Some(to)) => write!(f, " (from: {}, to: {})", from, to)?,
            (Some(from), None) => write!(f, " (from: {})", from)?,
            (None, Some(to)) => write!(f, " (to: {})", to)?,
            (None, None) => {}
        }
        if let Some(name) = &self.step_name {
            write!(f, " (step: {})", name)?;
        }
        if let Some(source) = &self.source {
            write!(f, ": caused by {}", source)?;
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

/// Create a persistence error from rusqlite::Error
#[cfg(feature = "sqlite")]
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

// ========== End Error Facility ==========
