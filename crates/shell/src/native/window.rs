use std::rc::Rc;

use geometry::{Extent, Point, Rect, ScreenPx};
use winit::{
    dpi::{LogicalPosition, LogicalSize},
    event_loop::EventLoopWindowTarget,
    monitor::{MonitorHandle, VideoMode},
    window::{Fullscreen, WindowBuilder},
};

use crate::{
    DisplayInfo, DisplayMode, Error, PixelFormat, Result, WindowDesc, WindowFlags, WindowId,
    WindowPosition,
};

/// The DPI that corresponds to a scale factor of 1.0.
const BASE_DPI: f64 = 96.0;

/// An operating system window.
pub struct NativeWindow {
    pub(super) id: WindowId,
    pub(super) flags: WindowFlags,
    /// The fullscreen mode chosen for this window, once one has been set.
    pub(super) fullscreen_mode: Option<VideoMode>,
    // Shared with the renderer, whose surface must not outlive the window.
    pub(super) inner: Rc<winit::window::Window>,
}

impl NativeWindow {
    pub(super) fn build(
        target: &EventLoopWindowTarget<()>,
        id: WindowId,
        desc: &WindowDesc,
    ) -> Result<Self> {
        let mut builder = WindowBuilder::new()
            .with_title(desc.title.as_str())
            .with_inner_size(as_logical_size(desc.size))
            .with_resizable(desc.flags.contains(WindowFlags::RESIZABLE))
            .with_decorations(!desc.flags.contains(WindowFlags::BORDERLESS))
            .with_maximized(desc.flags.contains(WindowFlags::MAXIMIZED))
            .with_transparent(desc.flags.contains(WindowFlags::TRANSPARENT))
            .with_always_on_top(desc.flags.contains(WindowFlags::ALWAYS_ON_TOP))
            // Shown once it has been fully configured.
            .with_visible(false);

        match desc.position {
            WindowPosition::Undefined => {}
            WindowPosition::At(at) => {
                builder = builder.with_position(LogicalPosition::new(at.x, at.y));
            }
            WindowPosition::Centered { display } => {
                let monitor = target
                    .available_monitors()
                    .nth(display)
                    .or_else(|| target.primary_monitor())
                    .ok_or(Error::NoDisplay)?;
                let at = logical_bounds(&monitor).centered(Extent::new(
                    saturating_i32(desc.size.width),
                    saturating_i32(desc.size.height),
                ));
                builder = builder.with_position(LogicalPosition::new(at.x, at.y));
            }
        }

        let window = builder
            .build(target)
            .map_err(|err| Error::Os(err.to_string()))?;

        Ok(Self {
            id,
            flags: desc.flags,
            fullscreen_mode: None,
            inner: Rc::new(window),
        })
    }

    /// Makes the window visible, switching to its fullscreen mode first if it
    /// has one.
    pub(super) fn show(&self) {
        if self.flags.contains(WindowFlags::FULLSCREEN) {
            if let Some(mode) = &self.fullscreen_mode {
                self.inner
                    .set_fullscreen(Some(Fullscreen::Exclusive(mode.clone())));
            }
        }
        self.inner.set_visible(true);
    }

    /// The inner size in logical pixels.
    pub(super) fn logical_size(&self) -> Extent<u32, ScreenPx> {
        let size: LogicalSize<u32> = self.inner.inner_size().to_logical(self.inner.scale_factor());
        Extent::new(size.width, size.height)
    }

    /// Picks the video mode closest to `request` on the window's monitor and
    /// remembers it for when the window is shown.
    pub(super) fn set_display_mode(&mut self, request: &DisplayMode) -> Result<()> {
        // A hidden window may not be on any output yet.
        let Some(monitor) = self
            .inner
            .current_monitor()
            .or_else(|| self.inner.primary_monitor())
        else {
            tracing::debug!(window = self.id.0, "no monitor for display mode");
            self.fullscreen_mode = None;
            return defer_unless_fullscreen(self.flags, Error::NoDisplay);
        };

        let mut request = *request;
        if request.size.width == 0 || request.size.height == 0 {
            let size = self.inner.inner_size();
            request.size = Extent::new(size.width, size.height);
        }

        let video_modes = sorted_video_modes(&monitor);
        let modes: Vec<DisplayMode> = video_modes.iter().map(as_display_mode).collect();
        let desktop = desktop_mode(&monitor, &modes);

        match crate::closest_mode(&request, &desktop, &modes) {
            Some(index) => {
                self.fullscreen_mode = Some(video_modes[index].clone());
                Ok(())
            }
            None => {
                tracing::debug!(
                    window = self.id.0,
                    "no fullscreen mode matches {}x{}",
                    request.size.width,
                    request.size.height
                );
                self.fullscreen_mode = None;
                defer_unless_fullscreen(
                    self.flags,
                    Error::NoMatchingMode {
                        width: request.size.width,
                        height: request.size.height,
                    },
                )
            }
        }
    }
}

/// The mode only has to exist once the window goes fullscreen.
fn defer_unless_fullscreen(flags: WindowFlags, err: Error) -> Result<()> {
    if flags.contains(WindowFlags::FULLSCREEN) {
        Err(err)
    } else {
        Ok(())
    }
}

pub(super) fn display_info(monitor: &MonitorHandle) -> DisplayInfo {
    let bounds = logical_bounds(monitor);
    let dpi = (monitor.scale_factor() * BASE_DPI) as f32;
    let modes: Vec<DisplayMode> = sorted_video_modes(monitor)
        .iter()
        .map(as_display_mode)
        .collect();

    DisplayInfo {
        name: monitor
            .name()
            .unwrap_or_else(|| String::from("unknown display")),
        bounds,
        // The window system doesn't report reserved areas.
        usable_bounds: bounds,
        horizontal_dpi: dpi,
        vertical_dpi: dpi,
        desktop_mode: desktop_mode(monitor, &modes),
        modes,
    }
}

/// Video modes, largest first. Sizes are in physical pixels.
fn sorted_video_modes(monitor: &MonitorHandle) -> Vec<VideoMode> {
    let mut modes: Vec<VideoMode> = monitor.video_modes().collect();
    modes.sort_by(|a, b| {
        let key = |m: &VideoMode| {
            (
                m.size().width,
                m.size().height,
                m.bit_depth(),
                m.refresh_rate_millihertz(),
            )
        };
        key(b).cmp(&key(a))
    });
    modes
}

fn desktop_mode(monitor: &MonitorHandle, modes: &[DisplayMode]) -> DisplayMode {
    let size = monitor.size();
    let refresh_rate = monitor
        .refresh_rate_millihertz()
        .map_or(0, millihertz_to_hertz);

    let format = modes
        .iter()
        .find(|mode| mode.size.width == size.width && mode.size.height == size.height)
        .map_or(PixelFormat::Rgb888, |mode| mode.format);

    DisplayMode {
        format,
        size: Extent::new(size.width, size.height),
        refresh_rate,
    }
}

fn as_display_mode(mode: &VideoMode) -> DisplayMode {
    let size = mode.size();
    DisplayMode {
        format: PixelFormat::from_bit_depth(mode.bit_depth()),
        size: Extent::new(size.width, size.height),
        refresh_rate: millihertz_to_hertz(mode.refresh_rate_millihertz()),
    }
}

fn logical_bounds(monitor: &MonitorHandle) -> Rect<i32, ScreenPx> {
    let scale = monitor.scale_factor();
    let position: LogicalPosition<i32> = monitor.position().to_logical(scale);
    let size: LogicalSize<i32> = monitor.size().to_logical(scale);
    Rect::new(
        Point::new(position.x, position.y),
        Extent::new(size.width, size.height),
    )
}

fn millihertz_to_hertz(millihertz: u32) -> u32 {
    millihertz.saturating_add(500) / 1000
}

fn saturating_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[allow(clippy::needless_pass_by_value)]
fn as_logical_size(size: Extent<u32, ScreenPx>) -> LogicalSize<u32> {
    LogicalSize::new(size.width, size.height)
}
