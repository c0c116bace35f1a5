//! The multimedia platform layer: windows, accelerated renderers, displays,
//! audio output and the event queue.
//!
//! Everything above this crate talks to the platform through the [`Platform`]
//! trait. Subsystem state (is video up? is audio up?) lives on the value that
//! implements it rather than in process globals, so two platform values never
//! observe each other's initialization.
//!
//! Two implementations are provided:
//!
//! - [`NativePlatform`]: winit windows and event pump, wgpu surfaces as
//!   renderers, and (with the `audio` feature) cpal output streams.
//! - `mock::MockPlatform` (with the `mock` feature, or under `cfg(test)`):
//!   a scripted stand-in that records every call for inspection.
//!
//! Handles returned by a platform are move-only. Destroying one consumes it,
//! so a handle can't be destroyed twice.

pub mod audio;
pub mod display;
pub mod error;
pub mod event;
pub mod gl;
pub mod render;
pub mod window;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

mod native;

use geometry::{Extent, ScreenPx};

pub use self::{
    audio::{AudioFormat, AudioSpec},
    display::{closest_mode, ChannelMasks, DisplayInfo, DisplayMode, PixelFormat},
    error::{Error, Result},
    event::Event,
    gl::{GlAttr, GL_CONTEXT_DEBUG_FLAG},
    native::{NativeAudioDevice, NativePlatform, NativeRenderer, NativeTexture, NativeWindow},
    render::{BlendMode, Color, RendererFlags, RendererInfo},
    window::{WindowDesc, WindowFlags, WindowId, WindowPosition},
};

pub trait Platform {
    type Window;
    type Renderer;
    type Texture;
    type AudioDevice;

    // Video subsystem.

    /// Names of the video drivers compiled into the platform.
    fn video_drivers(&self) -> Vec<String>;

    /// Initializes the video subsystem. `None` selects the default driver.
    fn init_video(&mut self, driver: Option<&str>) -> Result<()>;

    /// The driver in use, if video is initialized.
    fn current_video_driver(&self) -> Option<String>;

    fn quit_video(&mut self);

    /// Sets an OpenGL context attribute for windows created afterwards.
    fn set_gl_attribute(&mut self, attr: GlAttr, value: i32) -> Result<()>;

    fn displays(&self) -> Vec<DisplayInfo>;

    /// Render drivers in enumeration order. The position of a driver in this
    /// list is the index accepted by [`Platform::create_renderer`].
    fn render_drivers(&self) -> Vec<RendererInfo>;

    // Windows.

    fn create_window(&mut self, desc: &WindowDesc) -> Result<Self::Window>;

    fn window_id(&self, window: &Self::Window) -> WindowId;

    fn set_window_min_size(&mut self, window: &mut Self::Window, size: Extent<u32, ScreenPx>);

    fn set_window_max_size(&mut self, window: &mut Self::Window, size: Extent<u32, ScreenPx>);

    /// The window's current inner size. This may differ from the size it was
    /// created with if the window system overrode the request.
    fn window_size(&self, window: &Self::Window) -> Extent<u32, ScreenPx>;

    /// Sets the mode used when the window is fullscreen. A zero size in
    /// `mode` means "the window's size". Fails if the window is fullscreen
    /// and no display mode satisfies the request.
    fn set_window_display_mode(&mut self, window: &mut Self::Window, mode: &DisplayMode)
        -> Result<()>;

    fn show_window(&mut self, window: &mut Self::Window);

    fn destroy_window(&mut self, window: Self::Window);

    // Renderers.

    /// Creates a renderer for `window`. `driver` indexes
    /// [`Platform::render_drivers`]; `None` picks the first driver that
    /// supports `flags`.
    fn create_renderer(
        &mut self,
        window: &Self::Window,
        driver: Option<usize>,
        flags: RendererFlags,
    ) -> Result<Self::Renderer>;

    fn renderer_info(&self, renderer: &Self::Renderer) -> RendererInfo;

    /// Sets a device-independent resolution for rendering.
    fn set_logical_size(&mut self, renderer: &mut Self::Renderer, size: Extent<u32, ScreenPx>);

    fn set_scale(&mut self, renderer: &mut Self::Renderer, x: f32, y: f32);

    fn set_blend_mode(&mut self, renderer: &mut Self::Renderer, mode: BlendMode);

    fn set_draw_color(&mut self, renderer: &mut Self::Renderer, color: Color);

    /// Clears the current target with the draw color.
    fn clear(&mut self, renderer: &mut Self::Renderer) -> Result<()>;

    /// Shows everything rendered since the previous present.
    fn present(&mut self, renderer: &mut Self::Renderer) -> Result<()>;

    fn destroy_renderer(&mut self, renderer: Self::Renderer);

    /// Creates a texture that `renderer` can render into.
    fn create_render_target(
        &mut self,
        renderer: &Self::Renderer,
        size: Extent<u32, ScreenPx>,
    ) -> Result<Self::Texture>;

    fn destroy_texture(&mut self, texture: Self::Texture);

    // Audio subsystem.

    fn audio_drivers(&self) -> Vec<String>;

    fn init_audio(&mut self, driver: Option<&str>) -> Result<()>;

    fn current_audio_driver(&self) -> Option<String>;

    fn open_audio(&mut self, spec: &AudioSpec) -> Result<Self::AudioDevice>;

    fn close_audio(&mut self, device: Self::AudioDevice);

    fn quit_audio(&mut self);

    // Events.

    /// Returns the next pending event, or `None` once the queue is drained.
    /// The queue is refilled from the window system when `poll_event` is
    /// called on an empty queue, so a `None` marks the end of one pump.
    fn poll_event(&mut self) -> Option<Event>;

    /// Shuts down anything still running. Called once, after every subsystem
    /// has been quit.
    fn quit(&mut self);
}
