use geometry::{Extent, ScreenPx};

use crate::WindowId;

/// Events delivered by [`Platform::poll_event`](crate::Platform::poll_event).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// The user asked for the window to be closed, either by clicking the X,
    /// by pressing Alt-F4, etc.
    WindowClose { window: WindowId },
    /// The window's inner size changed.
    WindowResized {
        window: WindowId,
        extent: Extent<u32, ScreenPx>,
    },
    /// The window gained or lost keyboard focus.
    WindowFocus { window: WindowId, focused: bool },
}
