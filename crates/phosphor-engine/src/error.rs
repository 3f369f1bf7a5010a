use std::fmt;

/// Shader stage a compile failure originated from.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Errors surfaced by the CRT render engine.
///
/// Every failure is terminal for the operation that produced it: the engine
/// never retries, and never falls back to another variant on its own.
/// Recovery policy (for example dropping back to the passthrough variant)
/// belongs to the caller.
#[derive(Debug)]
pub enum EngineError {
    /// The platform could not provide a GPU adapter or logical device.
    ContextUnavailable(String),

    /// A shader stage failed to compile. Carries the compiler diagnostic.
    ShaderCompile {
        variant: String,
        stage: ShaderStage,
        log: String,
    },

    /// Pipeline creation failed after both stages compiled individually.
    ProgramLink { variant: String, log: String },

    /// A variant name with no entry in the catalogue.
    VariantNotFound(String),

    /// Copying the output surface back to host memory failed.
    Readback(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::ContextUnavailable(msg) => {
                write!(f, "GPU context unavailable: {msg}")
            }
            EngineError::ShaderCompile { variant, stage, log } => {
                write!(f, "{stage} stage of shader variant {variant:?} failed to compile: {log}")
            }
            EngineError::ProgramLink { variant, log } => {
                write!(f, "shader variant {variant:?} failed to link: {log}")
            }
            EngineError::VariantNotFound(name) => {
                write!(f, "shader variant {name:?} not found in the catalogue")
            }
            EngineError::Readback(msg) => {
                write!(f, "output readback failed: {msg}")
            }
        }
    }
}

impl std::error::Error for EngineError {}
