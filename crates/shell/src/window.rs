use geometry::{Extent, Point, ScreenPx};

/// A unique identifier assigned to a window by the platform that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

bitflags::bitflags! {
    pub struct WindowFlags: u32 {
        /// Enter the window's fullscreen display mode on creation.
        const FULLSCREEN = 0x1;
        /// The window is meant for an OpenGL context rather than a renderer.
        const OPENGL = 0x2;
        /// The window is meant for a Vulkan surface rather than a renderer.
        const VULKAN = 0x4;
        const BORDERLESS = 0x8;
        const RESIZABLE = 0x10;
        const MAXIMIZED = 0x20;
        const ALWAYS_ON_TOP = 0x40;
        const TRANSPARENT = 0x80;
    }
}

impl Default for WindowFlags {
    fn default() -> Self {
        WindowFlags::empty()
    }
}

/// Where a new window should be placed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WindowPosition {
    /// Let the window system decide.
    #[default]
    Undefined,
    /// Center the window on the given display.
    Centered { display: usize },
    /// Place the window's top-left corner at the given screen position.
    At(Point<i32, ScreenPx>),
}

/// A description of a window to be created.
#[derive(Clone, Debug)]
pub struct WindowDesc {
    pub title: String,
    pub position: WindowPosition,
    pub size: Extent<u32, ScreenPx>,
    pub flags: WindowFlags,
}
