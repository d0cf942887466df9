use {
    std::path::PathBuf,
    thiserror::Error,
};


/// Everything that can go wrong below the CLI surface.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A hidden-sizes literal that the strict tuple grammar rejects.
    #[error("cannot parse hidden sizes {literal:?}: {reason}")]
    Parse { literal: String, reason: String },

    /// A progress file that exists but cannot be trusted.
    #[error("cannot read progress data at {path:?}: {reason}")]
    Read { path: PathBuf, reason: String },

    /// A configuration the harness does not recognize.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The external trainer could not be started or exited non-zero.
    #[error("trainer {program:?} failed: {reason}")]
    Trainer { program: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    pub fn read(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Read {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Process exit code: 1 for configuration mistakes the user can fix by
    /// editing the command line, 2 for filesystem and trainer failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Parse { .. } | Self::Config(_) => 1,
            Self::Read { .. } | Self::Trainer { .. } | Self::Io(_) => 2,
        }
    }
}
