// Copyright @yucwang 2026

use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Failures of the mesh pipeline and its renderer setup.
///
/// Shader errors abort setup. Every other variant is terminal for the
/// triggering operation only: the caller keeps whatever state was last valid.
#[derive(Debug)]
pub enum MeshError {
    InvalidParameter(String),
    ShaderCompile { stage: ShaderStage, log: String },
    ShaderLink(String),
    ResourceLoad { path: PathBuf, reason: String },
}

impl MeshError {
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        MeshError::InvalidParameter(message.into())
    }

    pub fn resource<P: AsRef<Path>, S: ToString>(path: P, reason: S) -> Self {
        MeshError::ResourceLoad {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, MeshError::ShaderCompile { .. } | MeshError::ShaderLink(_))
    }
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::InvalidParameter(msg) => write!(f, "invalid parameter: {}", msg),
            MeshError::ShaderCompile { stage, log } => {
                write!(f, "{} shader compilation failed: {}", stage, log)
            }
            MeshError::ShaderLink(log) => write!(f, "shader linking failed: {}", log),
            MeshError::ResourceLoad { path, reason } => {
                write!(f, "failed to load {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for MeshError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_and_fatality() {
        let err = MeshError::invalid("grid size 300 is out of bounds");
        assert_eq!(err.to_string(), "invalid parameter: grid size 300 is out of bounds");
        assert!(!err.is_fatal());

        let err = MeshError::ShaderCompile { stage: ShaderStage::Fragment, log: "no main".into() };
        assert!(err.to_string().starts_with("fragment shader"));
        assert!(err.is_fatal());

        let err = MeshError::resource("cow.obj", "not found");
        assert_eq!(err.to_string(), "failed to load cow.obj: not found");
    }
}
