//! The platform backed by the operating system: winit for windows and
//! events, wgpu for rendering, cpal for audio.

mod audio;
mod gpu;
mod window;

use std::{
    collections::{HashMap, VecDeque},
    rc::{Rc, Weak},
};

use geometry::{Extent, ScreenPx};
use smallvec::SmallVec;
use winit::{
    dpi::LogicalSize,
    event::{Event as WinitEvent, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopBuilder},
    platform::run_return::EventLoopExtRunReturn,
};

pub use self::{
    audio::NativeAudioDevice,
    gpu::{NativeRenderer, NativeTexture},
    window::NativeWindow,
};

use self::os::{current_video_driver, select_video_driver, VIDEO_DRIVERS};
use crate::{
    AudioSpec, BlendMode, Color, DisplayInfo, DisplayMode, Error, Event, GlAttr, Platform,
    RendererFlags, RendererInfo, Result, WindowDesc, WindowId,
};

/// Windows known to the event pump, by winit id.
type WindowMap = HashMap<winit::window::WindowId, (WindowId, Weak<winit::window::Window>)>;

/// The operating system's windowing, graphics and audio services.
///
/// The winit event loop can only be created once per process. It is created
/// by the first successful [`Platform::init_video`] and kept until this value
/// is dropped, so video can be shut down and brought back up again.
#[derive(Default)]
pub struct NativePlatform {
    event_loop: Option<EventLoop<()>>,
    instance: Option<wgpu::Instance>,
    video_initialized: bool,

    windows: WindowMap,
    next_window_id: u64,

    pending: VecDeque<Event>,
    /// Set once the queue has been refilled and cleared once it drains.
    pumped: bool,

    gl_attributes: SmallVec<[(GlAttr, i32); 21]>,

    audio: audio::AudioHost,
}

impl NativePlatform {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn video(&self) -> Result<(&EventLoop<()>, &wgpu::Instance)> {
        match (&self.event_loop, &self.instance) {
            (Some(event_loop), Some(instance)) if self.video_initialized => {
                Ok((event_loop, instance))
            }
            _ => Err(Error::NotInitialized("video")),
        }
    }

    /// Runs the window system's event loop until it has nothing left to
    /// deliver, translating window events into the pending queue.
    fn pump(&mut self) {
        let Some(event_loop) = self.event_loop.as_mut() else {
            return;
        };

        let windows = &self.windows;
        let pending = &mut self.pending;

        event_loop.run_return(|event, _, control_flow| {
            *control_flow = ControlFlow::Poll;

            match event {
                WinitEvent::WindowEvent { window_id, event } => {
                    let Some((id, inner)) = windows.get(&window_id) else {
                        return;
                    };

                    match event {
                        WindowEvent::CloseRequested => {
                            pending.push_back(Event::WindowClose { window: *id });
                        }
                        WindowEvent::Resized(size) => {
                            let scale = inner.upgrade().map_or(1.0, |w| w.scale_factor());
                            let size: LogicalSize<u32> = size.to_logical(scale);
                            pending.push_back(Event::WindowResized {
                                window: *id,
                                extent: Extent::new(size.width, size.height),
                            });
                        }
                        WindowEvent::Focused(focused) => {
                            pending.push_back(Event::WindowFocus {
                                window: *id,
                                focused,
                            });
                        }
                        _ => {}
                    }
                }
                WinitEvent::MainEventsCleared => {
                    *control_flow = ControlFlow::Exit;
                }
                _ => {}
            }
        });
    }
}

impl Platform for NativePlatform {
    type Window = NativeWindow;
    type Renderer = NativeRenderer;
    type Texture = NativeTexture;
    type AudioDevice = NativeAudioDevice;

    fn video_drivers(&self) -> Vec<String> {
        VIDEO_DRIVERS.iter().copied().map(String::from).collect()
    }

    fn init_video(&mut self, driver: Option<&str>) -> Result<()> {
        if self.video_initialized {
            return Ok(());
        }

        if let Some(name) = driver {
            if !VIDEO_DRIVERS.iter().any(|d| d.eq_ignore_ascii_case(name)) {
                return Err(Error::NoSuchDriver {
                    kind: "video",
                    name: String::from(name),
                });
            }
        }

        if self.event_loop.is_none() {
            let mut builder = EventLoopBuilder::new();
            if let Some(name) = driver {
                select_video_driver(&mut builder, name);
            }
            self.event_loop = Some(builder.build());
        } else if driver.is_some() {
            tracing::warn!("the event loop already exists; ignoring video driver request");
        }

        self.instance = Some(wgpu::Instance::new(wgpu::InstanceDescriptor::default()));
        self.video_initialized = true;

        tracing::debug!(
            "video initialized with driver {}",
            self.current_video_driver().unwrap_or_default()
        );
        Ok(())
    }

    fn current_video_driver(&self) -> Option<String> {
        let event_loop = self.event_loop.as_ref().filter(|_| self.video_initialized)?;
        Some(String::from(current_video_driver(event_loop)))
    }

    fn quit_video(&mut self) {
        if !self.video_initialized {
            return;
        }

        self.instance = None;
        self.windows.clear();
        self.pending.clear();
        self.pumped = false;
        self.video_initialized = false;
        tracing::debug!("video shut down");
    }

    fn set_gl_attribute(&mut self, attr: GlAttr, value: i32) -> Result<()> {
        // wgpu creates its own GL context when it uses the GL backend, so the
        // attributes are only recorded.
        match self.gl_attributes.iter_mut().find(|(a, _)| *a == attr) {
            Some(entry) => entry.1 = value,
            None => self.gl_attributes.push((attr, value)),
        }
        tracing::debug!("gl attribute {attr:?} = {value}");
        Ok(())
    }

    fn displays(&self) -> Vec<DisplayInfo> {
        self.event_loop
            .as_ref()
            .filter(|_| self.video_initialized)
            .map(|event_loop| {
                event_loop
                    .available_monitors()
                    .map(|monitor| window::display_info(&monitor))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn render_drivers(&self) -> Vec<RendererInfo> {
        self.instance
            .as_ref()
            .map(|instance| {
                gpu::render_drivers(instance)
                    .into_iter()
                    .map(|(_, info)| info)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn create_window(&mut self, desc: &WindowDesc) -> Result<Self::Window> {
        let (event_loop, _) = self.video()?;

        let id = WindowId(self.next_window_id);
        let window = NativeWindow::build(event_loop, id, desc)?;
        self.next_window_id += 1;

        self.windows
            .insert(window.inner.id(), (id, Rc::downgrade(&window.inner)));
        tracing::debug!(window = id.0, "created window '{}'", desc.title);
        Ok(window)
    }

    fn window_id(&self, window: &Self::Window) -> WindowId {
        window.id
    }

    fn set_window_min_size(&mut self, window: &mut Self::Window, size: Extent<u32, ScreenPx>) {
        window
            .inner
            .set_min_inner_size(Some(LogicalSize::new(size.width, size.height)));
    }

    fn set_window_max_size(&mut self, window: &mut Self::Window, size: Extent<u32, ScreenPx>) {
        // A zero dimension leaves that axis unbounded.
        let width = if size.width == 0 { u32::MAX } else { size.width };
        let height = if size.height == 0 { u32::MAX } else { size.height };
        window
            .inner
            .set_max_inner_size(Some(LogicalSize::new(width, height)));
    }

    fn window_size(&self, window: &Self::Window) -> Extent<u32, ScreenPx> {
        window.logical_size()
    }

    fn set_window_display_mode(
        &mut self,
        window: &mut Self::Window,
        mode: &DisplayMode,
    ) -> Result<()> {
        window.set_display_mode(mode)
    }

    fn show_window(&mut self, window: &mut Self::Window) {
        window.show();
    }

    fn destroy_window(&mut self, window: Self::Window) {
        self.windows.remove(&window.inner.id());
        self.pending.retain(|event| event_window(event) != window.id);
        tracing::debug!(window = window.id.0, "destroyed window");
    }

    fn create_renderer(
        &mut self,
        window: &Self::Window,
        driver: Option<usize>,
        flags: RendererFlags,
    ) -> Result<Self::Renderer> {
        let (_, instance) = self.video()?;

        let backend = match driver {
            Some(index) => {
                let drivers = gpu::render_drivers(instance);
                let (backend, _) = drivers.get(index).ok_or(Error::OutOfRange {
                    kind: "render driver",
                    index,
                })?;
                Some(*backend)
            }
            None => None,
        };

        NativeRenderer::new(instance, Rc::clone(&window.inner), backend, flags)
    }

    fn renderer_info(&self, renderer: &Self::Renderer) -> RendererInfo {
        renderer.info.clone()
    }

    fn set_logical_size(&mut self, renderer: &mut Self::Renderer, size: Extent<u32, ScreenPx>) {
        renderer.logical_size = Some(size);
    }

    // Nothing but clears is drawn, so scale and blending have nothing to
    // act on.
    fn set_scale(&mut self, renderer: &mut Self::Renderer, x: f32, y: f32) {
        tracing::trace!("{} renderer scale {x}x{y}", renderer.info.name);
    }

    fn set_blend_mode(&mut self, renderer: &mut Self::Renderer, mode: BlendMode) {
        tracing::trace!("{} renderer blend mode {mode:?}", renderer.info.name);
    }

    fn set_draw_color(&mut self, renderer: &mut Self::Renderer, color: Color) {
        renderer.draw_color = color;
    }

    fn clear(&mut self, renderer: &mut Self::Renderer) -> Result<()> {
        renderer.clear();
        Ok(())
    }

    fn present(&mut self, renderer: &mut Self::Renderer) -> Result<()> {
        renderer.present()
    }

    fn destroy_renderer(&mut self, renderer: Self::Renderer) {
        tracing::trace!("destroyed {} renderer", renderer.info.name);
        drop(renderer);
    }

    fn create_render_target(
        &mut self,
        renderer: &Self::Renderer,
        size: Extent<u32, ScreenPx>,
    ) -> Result<Self::Texture> {
        renderer.create_render_target(size)
    }

    fn destroy_texture(&mut self, texture: Self::Texture) {
        texture.destroy();
    }

    fn audio_drivers(&self) -> Vec<String> {
        audio::AudioHost::drivers()
    }

    fn init_audio(&mut self, driver: Option<&str>) -> Result<()> {
        self.audio.init(driver)
    }

    fn current_audio_driver(&self) -> Option<String> {
        self.audio.current()
    }

    fn open_audio(&mut self, spec: &AudioSpec) -> Result<Self::AudioDevice> {
        self.audio.open(spec)
    }

    fn close_audio(&mut self, device: Self::AudioDevice) {
        drop(device);
    }

    fn quit_audio(&mut self) {
        self.audio.quit();
    }

    fn poll_event(&mut self) -> Option<Event> {
        if !self.video_initialized {
            return None;
        }

        if self.pending.is_empty() {
            if self.pumped {
                self.pumped = false;
                return None;
            }
            self.pump();
            self.pumped = true;
        }

        match self.pending.pop_front() {
            Some(event) => Some(event),
            None => {
                self.pumped = false;
                None
            }
        }
    }

    fn quit(&mut self) {
        self.audio.quit();
        self.quit_video();
        self.gl_attributes.clear();
    }
}

fn event_window(event: &Event) -> WindowId {
    match *event {
        Event::WindowClose { window }
        | Event::WindowResized { window, .. }
        | Event::WindowFocus { window, .. } => window,
    }
}

#[cfg(any(
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
mod os {
    use winit::{
        event_loop::{EventLoop, EventLoopBuilder},
        platform::unix::{EventLoopBuilderExtUnix, EventLoopWindowTargetExtUnix},
    };

    pub const VIDEO_DRIVERS: &[&str] = &["x11", "wayland"];

    pub fn select_video_driver(builder: &mut EventLoopBuilder<()>, name: &str) {
        if name.eq_ignore_ascii_case("wayland") {
            builder.with_wayland();
        } else {
            builder.with_x11();
        }
    }

    pub fn current_video_driver(event_loop: &EventLoop<()>) -> &'static str {
        if event_loop.is_wayland() {
            "wayland"
        } else {
            "x11"
        }
    }
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
)))]
mod os {
    use winit::event_loop::{EventLoop, EventLoopBuilder};

    #[cfg(target_os = "windows")]
    pub const VIDEO_DRIVERS: &[&str] = &["windows"];

    #[cfg(target_os = "macos")]
    pub const VIDEO_DRIVERS: &[&str] = &["cocoa"];

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    pub const VIDEO_DRIVERS: &[&str] = &["default"];

    pub fn select_video_driver(_builder: &mut EventLoopBuilder<()>, _name: &str) {}

    pub fn current_video_driver(_event_loop: &EventLoop<()>) -> &'static str {
        VIDEO_DRIVERS[0]
    }
}
