//! A minimal windowed application: configure the platform, open windows with
//! renderers, clear them to gray every frame until the user closes one, then
//! release everything.
//!
//! ```no_run
//! use skeleton::{driver, Config, Session};
//!
//! let mut session = Session::new(shell::NativePlatform::new(), Config::default(), Vec::new());
//! session.load()?;
//! driver::run(&mut session)?;
//! session.unload();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod context;
pub mod driver;
mod error;
mod session;

pub use self::{
    config::{
        AudioConfig, ClosePolicy, Config, GlAttributes, RenderConfig, Subsystems, Verbose,
        WindowConfig,
    },
    context::WindowContext,
    driver::RunState,
    error::{FrameError, LoadError},
    session::Session,
};
