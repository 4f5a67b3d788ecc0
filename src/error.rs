use thiserror::Error;

/// Failures while loading a scene description. Rendering itself cannot fail.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scene parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid setting `{field}`: {reason}")]
    InvalidSetting { field: String, reason: String },
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("could not start render workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
