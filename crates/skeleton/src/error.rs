use thiserror::Error;

/// Why [`Session::load`](crate::Session::load) stopped.
///
/// Whatever was acquired before the failure stays with the session and is
/// released by [`Session::unload`](crate::Session::unload).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("couldn't initialize the video subsystem")]
    VideoInit(#[source] shell::Error),

    #[error("couldn't allocate storage for {count} windows")]
    Allocation {
        count: usize,
        #[source]
        source: std::collections::TryReserveError,
    },

    #[error("couldn't create window {index}")]
    CreateWindow {
        index: usize,
        #[source]
        source: shell::Error,
    },

    #[error("couldn't set the fullscreen display mode of window {index}")]
    DisplayMode {
        index: usize,
        #[source]
        source: shell::Error,
    },

    #[error("couldn't find render driver '{0}'")]
    RenderDriverNotFound(String),

    #[error("couldn't create a renderer for window {index}")]
    CreateRenderer {
        index: usize,
        #[source]
        source: shell::Error,
    },

    #[error("couldn't initialize the audio subsystem")]
    AudioInit(#[source] shell::Error),

    #[error("couldn't open the audio device")]
    AudioOpen(#[source] shell::Error),
}

/// A failure while running a frame.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("couldn't clear window {index}")]
    Clear {
        index: usize,
        #[source]
        source: shell::Error,
    },

    #[error("couldn't present window {index}")]
    Present {
        index: usize,
        #[source]
        source: shell::Error,
    },
}
