use thiserror::Error;

/// Failures reported by a [`Platform`](crate::Platform) implementation.
#[derive(Debug, Error)]
pub enum Error {
    /// A subsystem was used before it was initialized (or after it was shut
    /// down).
    #[error("the {0} subsystem is not initialized")]
    NotInitialized(&'static str),

    /// A driver was requested by a name the platform does not know.
    #[error("no {kind} driver named '{name}'")]
    NoSuchDriver { kind: &'static str, name: String },

    /// The platform was built without support for the requested feature.
    #[error("{0} is not supported by this platform")]
    Unsupported(&'static str),

    /// An index did not name an enumerated display or driver.
    #[error("{kind} index {index} is out of range")]
    OutOfRange { kind: &'static str, index: usize },

    #[error("no display is available")]
    NoDisplay,

    /// None of the display's fullscreen modes satisfies the request.
    #[error("no fullscreen mode matches {width}x{height}")]
    NoMatchingMode { width: u32, height: u32 },

    /// The operating system refused to create or modify a window.
    #[error("window system error: {0}")]
    Os(String),

    #[error("no graphics adapter can present to this window")]
    NoAdapter,

    #[error("could not create a rendering surface: {0}")]
    Surface(String),

    #[error("graphics device error: {0}")]
    Device(String),

    #[error("audio error: {0}")]
    Audio(String),
}

pub type Result<T> = std::result::Result<T, Error>;
