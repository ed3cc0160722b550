use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while setting up the renderer.
///
/// Rendering a frame never fails, apart from calling it out of order (see
/// [`Error::NotInitialized`]).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("couldn't read shader `{id}` from `{path}`")]
    ShaderNotFound {
        id: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("shader `{id}` is invalid: {message}")]
    ShaderInvalid { id: String, message: String },

    #[error("couldn't create pipeline for stage `{stage}`: {message}")]
    PipelineCreation { stage: &'static str, message: String },

    #[error("stage `{stage}` has invalid bindings: {reason}")]
    InvalidStageLayout { stage: &'static str, reason: String },

    #[error("{width}x{height} image cannot hold {len} bytes of RGBA8")]
    InvalidImage { width: u32, height: u32, len: usize },

    #[error("invalid resolution: {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("renderer is not initialized")]
    NotInitialized,

    #[error("renderer is already initialized")]
    AlreadyInitialized,
}
