//! Stage failure types.

use std::path::PathBuf;

use thiserror::Error;

/// Why a pipeline stage failed.
///
/// The `Display` text is the diagnostic shown to the operator.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A file the stage depends on is absent.
    #[error("{what} not found: {}", .path.display())]
    MissingArtifact { what: &'static str, path: PathBuf },

    /// An external command exited unsuccessfully.
    #[error("failed to {step}:\n{output}")]
    CommandFailed { step: String, output: String },

    /// No C compiler installation could be located.
    #[error("could not find a {tool} installation (searched known MinGW locations and PATH)")]
    ToolchainNotFound { tool: String },

    /// Not a single runtime library could be bundled.
    #[error("no runtime libraries were copied to {}", .dir.display())]
    NoRuntimeLibraries { dir: PathBuf },

    /// The operator interrupted the run.
    #[error("build interrupted")]
    Interrupted,

    /// Filesystem failure inside a stage.
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl BuildError {
    pub fn command_failed(step: impl Into<String>, output: impl Into<String>) -> Self {
        BuildError::CommandFailed {
            step: step.into(),
            output: output.into(),
        }
    }

    /// Wrap a filesystem error with what the stage was doing.
    pub fn io(context: impl Into<String>) -> impl FnOnce(anyhow::Error) -> Self {
        let context = context.into();
        move |source| BuildError::Io {
            context,
            source: source.into(),
        }
    }
}

/// Result of a single stage.
pub type StageOutcome<T = ()> = Result<T, BuildError>;
