//! The frame loop: drain the platform's events, then clear and present every
//! window that has a renderer.

use shell::{Color, Event, Platform};
use tracing::info;

use crate::{ClosePolicy, FrameError, Session, Verbose};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// Terminal. Nothing is rendered once this is reached.
    Done,
}

/// Runs one frame. The frame in which the loop finishes renders nothing.
pub fn run_frame<P: Platform>(session: &mut Session<P>) -> Result<RunState, FrameError> {
    let policy = session.config().close_policy;
    let log_events = session.config().verbose.contains(Verbose::EVENT);

    let mut state = RunState::Running;

    // Drain the queue even after finishing so nothing carries over.
    loop {
        let (platform, _) = session.parts_mut();
        let Some(event) = platform.poll_event() else {
            break;
        };

        if log_events {
            info!("{event:?}");
        }

        if let Event::WindowClose { window } = event {
            match policy {
                ClosePolicy::ExitOnAnyClose => state = RunState::Done,
                ClosePolicy::CloseWindow => {
                    session.close_window(window);
                }
            }
        }
    }

    if state == RunState::Done || session.windows().is_empty() {
        return Ok(RunState::Done);
    }

    let (platform, contexts) = session.parts_mut();
    for (index, context) in contexts.iter_mut().enumerate() {
        let Some(renderer) = context.renderer_mut() else {
            continue;
        };

        platform.set_draw_color(renderer, Color::GRAY);
        platform
            .clear(renderer)
            .map_err(|source| FrameError::Clear { index, source })?;
        platform
            .present(renderer)
            .map_err(|source| FrameError::Present { index, source })?;
    }

    Ok(RunState::Running)
}

/// Runs frames until the session is done.
pub fn run<P: Platform>(session: &mut Session<P>) -> Result<(), FrameError> {
    let mut frames: u64 = 0;
    while run_frame(session)? == RunState::Running {
        frames += 1;
    }
    tracing::debug!("finished after {frames} frames");
    Ok(())
}
