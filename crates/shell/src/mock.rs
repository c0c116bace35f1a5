//! A scripted platform for tests.
//!
//! [`MockPlatform`] never touches the operating system. What it reports (and
//! which calls fail) is decided up front by a [`Script`], and every call that
//! changes state is appended to a shared [`Journal`] that outlives the
//! platform, so tests can inspect what happened even after whatever owned the
//! platform has been dropped.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use geometry::{Extent, Rect, ScreenPx};

use crate::{
    AudioSpec, BlendMode, Color, DisplayInfo, DisplayMode, Error, Event, GlAttr, PixelFormat,
    Platform, RendererFlags, RendererInfo, Result, WindowDesc, WindowFlags, WindowId,
};

/// What the mock platform reports and where it fails.
#[derive(Clone, Debug)]
pub struct Script {
    pub video_drivers: Vec<String>,
    pub fail_video_init: bool,
    /// Fail the n-th call to `create_window` (counting from zero).
    pub fail_window_at: Option<usize>,
    /// The size every window ends up with, regardless of what was asked for.
    pub window_size: Option<Extent<u32, ScreenPx>>,
    pub fail_display_mode: bool,
    pub render_drivers: Vec<RendererInfo>,
    pub fail_renderer: bool,
    pub fail_render_target: bool,
    pub fail_present: bool,
    pub displays: Vec<DisplayInfo>,
    pub audio_drivers: Vec<String>,
    pub fail_audio_init: bool,
    pub fail_audio_open: bool,
    /// Events handed out by `poll_event`. A `None` entry ends the current
    /// batch, the same way an exhausted window system queue does.
    pub events: VecDeque<Option<Event>>,
}

impl Default for Script {
    fn default() -> Self {
        let desktop = DisplayMode {
            format: PixelFormat::Rgb888,
            size: Extent::new(1920, 1080),
            refresh_rate: 60,
        };

        Self {
            video_drivers: vec![String::from("mock")],
            fail_video_init: false,
            fail_window_at: None,
            window_size: None,
            fail_display_mode: false,
            render_drivers: vec![
                RendererInfo {
                    name: String::from("mock-gpu"),
                    flags: RendererFlags::ACCELERATED | RendererFlags::TARGET_TEXTURE,
                    max_texture_size: Extent::new(8192, 8192),
                },
                RendererInfo {
                    name: String::from("mock-software"),
                    flags: RendererFlags::SOFTWARE | RendererFlags::TARGET_TEXTURE,
                    max_texture_size: Extent::new(4096, 4096),
                },
            ],
            fail_renderer: false,
            fail_render_target: false,
            fail_present: false,
            displays: vec![DisplayInfo {
                name: String::from("mock display"),
                bounds: Rect::new(geometry::Point::new(0, 0), Extent::new(1920, 1080)),
                usable_bounds: Rect::new(geometry::Point::new(0, 40), Extent::new(1920, 1040)),
                horizontal_dpi: 96.0,
                vertical_dpi: 96.0,
                desktop_mode: desktop,
                modes: vec![
                    desktop,
                    DisplayMode {
                        size: Extent::new(1280, 720),
                        ..desktop
                    },
                    DisplayMode {
                        size: Extent::new(640, 480),
                        ..desktop
                    },
                ],
            }],
            audio_drivers: vec![String::from("mock-audio")],
            fail_audio_init: false,
            fail_audio_open: false,
            events: VecDeque::new(),
        }
    }
}

/// A state-changing call made on a [`MockPlatform`]. Renderer and texture
/// calls are identified by the window the renderer was created for.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    InitVideo(Option<String>),
    QuitVideo,
    SetGlAttribute(GlAttr, i32),
    CreateWindow(WindowId, String),
    SetMinSize(WindowId, Extent<u32, ScreenPx>),
    SetMaxSize(WindowId, Extent<u32, ScreenPx>),
    SetDisplayMode(WindowId, DisplayMode),
    ShowWindow(WindowId),
    DestroyWindow(WindowId),
    CreateRenderer(WindowId, usize),
    SetLogicalSize(WindowId, Extent<u32, ScreenPx>),
    SetScale(WindowId, f32, f32),
    SetBlendMode(WindowId, BlendMode),
    SetDrawColor(WindowId, Color),
    Clear(WindowId),
    Present(WindowId),
    DestroyRenderer(WindowId),
    CreateTexture(WindowId),
    DestroyTexture(WindowId),
    InitAudio(Option<String>),
    OpenAudio(AudioSpec),
    CloseAudio,
    QuitAudio,
    Quit,
}

/// Everything a [`MockPlatform`] was asked to do, in order.
#[derive(Debug, Default)]
pub struct Journal {
    pub calls: Vec<Call>,
}

impl Journal {
    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    /// Position of the first call matching `predicate`.
    pub fn position(&self, predicate: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls.iter().position(predicate)
    }

    pub fn created_windows(&self) -> Vec<WindowId> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::CreateWindow(id, _) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn destroyed_windows(&self) -> Vec<WindowId> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::DestroyWindow(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn presents(&self, window: WindowId) -> usize {
        self.count(|call| *call == Call::Present(window))
    }
}

pub struct MockWindow {
    id: WindowId,
    size: Extent<u32, ScreenPx>,
}

pub struct MockRenderer {
    window: WindowId,
    info: RendererInfo,
}

pub struct MockTexture {
    window: WindowId,
}

pub struct MockAudioDevice {
    pub spec: AudioSpec,
}

pub struct MockPlatform {
    pub script: Script,
    journal: Rc<RefCell<Journal>>,
    video_driver: Option<String>,
    audio_driver: Option<String>,
    windows_created: usize,
}

impl MockPlatform {
    #[must_use]
    pub fn new(script: Script) -> Self {
        Self {
            script,
            journal: Rc::default(),
            video_driver: None,
            audio_driver: None,
            windows_created: 0,
        }
    }

    /// A handle to the call journal that stays valid after the platform is
    /// dropped.
    #[must_use]
    pub fn journal(&self) -> Rc<RefCell<Journal>> {
        Rc::clone(&self.journal)
    }

    fn record(&self, call: Call) {
        self.journal.borrow_mut().calls.push(call);
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new(Script::default())
    }
}

fn find_driver(drivers: &[String], kind: &'static str, name: Option<&str>) -> Result<String> {
    match name {
        Some(name) => drivers
            .iter()
            .find(|driver| driver.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| Error::NoSuchDriver {
                kind,
                name: String::from(name),
            }),
        None => drivers.first().cloned().ok_or(Error::Unsupported(kind)),
    }
}

impl Platform for MockPlatform {
    type Window = MockWindow;
    type Renderer = MockRenderer;
    type Texture = MockTexture;
    type AudioDevice = MockAudioDevice;

    fn video_drivers(&self) -> Vec<String> {
        self.script.video_drivers.clone()
    }

    fn init_video(&mut self, driver: Option<&str>) -> Result<()> {
        self.record(Call::InitVideo(driver.map(String::from)));
        if self.script.fail_video_init {
            return Err(Error::Os(String::from("scripted video failure")));
        }
        self.video_driver = Some(find_driver(&self.script.video_drivers, "video", driver)?);
        Ok(())
    }

    fn current_video_driver(&self) -> Option<String> {
        self.video_driver.clone()
    }

    fn quit_video(&mut self) {
        self.record(Call::QuitVideo);
        self.video_driver = None;
    }

    fn set_gl_attribute(&mut self, attr: GlAttr, value: i32) -> Result<()> {
        self.record(Call::SetGlAttribute(attr, value));
        Ok(())
    }

    fn displays(&self) -> Vec<DisplayInfo> {
        if self.video_driver.is_some() {
            self.script.displays.clone()
        } else {
            Vec::new()
        }
    }

    fn render_drivers(&self) -> Vec<RendererInfo> {
        self.script.render_drivers.clone()
    }

    fn create_window(&mut self, desc: &WindowDesc) -> Result<Self::Window> {
        if self.video_driver.is_none() {
            return Err(Error::NotInitialized("video"));
        }

        let index = self.windows_created;
        self.windows_created += 1;
        if self.script.fail_window_at == Some(index) {
            return Err(Error::Os(format!("scripted failure creating window {index}")));
        }

        let id = WindowId(index as u64);
        self.record(Call::CreateWindow(id, desc.title.clone()));

        // Resizable windows get what they asked for.
        let size = match self.script.window_size {
            Some(size) if !desc.flags.contains(WindowFlags::RESIZABLE) => size,
            _ => desc.size,
        };

        Ok(MockWindow { id, size })
    }

    fn window_id(&self, window: &Self::Window) -> WindowId {
        window.id
    }

    fn set_window_min_size(&mut self, window: &mut Self::Window, size: Extent<u32, ScreenPx>) {
        self.record(Call::SetMinSize(window.id, size));
    }

    fn set_window_max_size(&mut self, window: &mut Self::Window, size: Extent<u32, ScreenPx>) {
        self.record(Call::SetMaxSize(window.id, size));
    }

    fn window_size(&self, window: &Self::Window) -> Extent<u32, ScreenPx> {
        window.size
    }

    fn set_window_display_mode(
        &mut self,
        window: &mut Self::Window,
        mode: &DisplayMode,
    ) -> Result<()> {
        self.record(Call::SetDisplayMode(window.id, *mode));
        if self.script.fail_display_mode {
            return Err(Error::NoMatchingMode {
                width: mode.size.width,
                height: mode.size.height,
            });
        }
        Ok(())
    }

    fn show_window(&mut self, window: &mut Self::Window) {
        self.record(Call::ShowWindow(window.id));
    }

    fn destroy_window(&mut self, window: Self::Window) {
        self.record(Call::DestroyWindow(window.id));
    }

    fn create_renderer(
        &mut self,
        window: &Self::Window,
        driver: Option<usize>,
        flags: RendererFlags,
    ) -> Result<Self::Renderer> {
        if self.script.fail_renderer {
            return Err(Error::NoAdapter);
        }

        let index = match driver {
            Some(index) if index < self.script.render_drivers.len() => index,
            Some(index) => {
                return Err(Error::OutOfRange {
                    kind: "render driver",
                    index,
                })
            }
            None => self
                .script
                .render_drivers
                .iter()
                .position(|info| info.flags.contains(flags & !RendererFlags::PRESENT_VSYNC))
                .ok_or(Error::NoAdapter)?,
        };

        self.record(Call::CreateRenderer(window.id, index));

        let mut info = self.script.render_drivers[index].clone();
        info.flags |= flags & RendererFlags::PRESENT_VSYNC;

        Ok(MockRenderer {
            window: window.id,
            info,
        })
    }

    fn renderer_info(&self, renderer: &Self::Renderer) -> RendererInfo {
        renderer.info.clone()
    }

    fn set_logical_size(&mut self, renderer: &mut Self::Renderer, size: Extent<u32, ScreenPx>) {
        self.record(Call::SetLogicalSize(renderer.window, size));
    }

    fn set_scale(&mut self, renderer: &mut Self::Renderer, x: f32, y: f32) {
        self.record(Call::SetScale(renderer.window, x, y));
    }

    fn set_blend_mode(&mut self, renderer: &mut Self::Renderer, mode: BlendMode) {
        self.record(Call::SetBlendMode(renderer.window, mode));
    }

    fn set_draw_color(&mut self, renderer: &mut Self::Renderer, color: Color) {
        self.record(Call::SetDrawColor(renderer.window, color));
    }

    fn clear(&mut self, renderer: &mut Self::Renderer) -> Result<()> {
        self.record(Call::Clear(renderer.window));
        Ok(())
    }

    fn present(&mut self, renderer: &mut Self::Renderer) -> Result<()> {
        if self.script.fail_present {
            return Err(Error::Device(String::from("scripted present failure")));
        }
        self.record(Call::Present(renderer.window));
        Ok(())
    }

    fn destroy_renderer(&mut self, renderer: Self::Renderer) {
        self.record(Call::DestroyRenderer(renderer.window));
    }

    fn create_render_target(
        &mut self,
        renderer: &Self::Renderer,
        _size: Extent<u32, ScreenPx>,
    ) -> Result<Self::Texture> {
        if self.script.fail_render_target {
            return Err(Error::Device(String::from("scripted render target failure")));
        }
        self.record(Call::CreateTexture(renderer.window));
        Ok(MockTexture {
            window: renderer.window,
        })
    }

    fn destroy_texture(&mut self, texture: Self::Texture) {
        self.record(Call::DestroyTexture(texture.window));
    }

    fn audio_drivers(&self) -> Vec<String> {
        self.script.audio_drivers.clone()
    }

    fn init_audio(&mut self, driver: Option<&str>) -> Result<()> {
        self.record(Call::InitAudio(driver.map(String::from)));
        if self.script.fail_audio_init {
            return Err(Error::Audio(String::from("scripted audio init failure")));
        }
        self.audio_driver = Some(find_driver(&self.script.audio_drivers, "audio", driver)?);
        Ok(())
    }

    fn current_audio_driver(&self) -> Option<String> {
        self.audio_driver.clone()
    }

    fn open_audio(&mut self, spec: &AudioSpec) -> Result<Self::AudioDevice> {
        if self.audio_driver.is_none() {
            return Err(Error::NotInitialized("audio"));
        }
        if self.script.fail_audio_open {
            return Err(Error::Audio(String::from("scripted audio failure")));
        }
        self.record(Call::OpenAudio(*spec));
        Ok(MockAudioDevice { spec: *spec })
    }

    fn close_audio(&mut self, _device: Self::AudioDevice) {
        self.record(Call::CloseAudio);
    }

    fn quit_audio(&mut self) {
        self.record(Call::QuitAudio);
        self.audio_driver = None;
    }

    fn poll_event(&mut self) -> Option<Event> {
        self.script.events.pop_front().flatten()
    }

    fn quit(&mut self) {
        self.record(Call::Quit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(title: &str) -> WindowDesc {
        WindowDesc {
            title: String::from(title),
            position: crate::WindowPosition::Undefined,
            size: Extent::new(640, 480),
            flags: WindowFlags::empty(),
        }
    }

    #[test]
    fn windows_need_video() {
        let mut platform = MockPlatform::default();
        assert!(matches!(
            platform.create_window(&desc("early")),
            Err(Error::NotInitialized("video"))
        ));

        platform.init_video(None).unwrap();
        let window = platform.create_window(&desc("late")).unwrap();
        assert_eq!(platform.window_size(&window), Extent::new(640, 480));
        platform.destroy_window(window);

        let journal = platform.journal();
        let journal = journal.borrow();
        assert_eq!(journal.created_windows(), journal.destroyed_windows());
    }

    #[test]
    fn unknown_driver() {
        let mut platform = MockPlatform::default();
        assert!(matches!(
            platform.init_video(Some("nope")),
            Err(Error::NoSuchDriver { kind: "video", .. })
        ));
        assert!(platform.init_video(Some("MOCK")).is_ok());
        assert_eq!(platform.current_video_driver().as_deref(), Some("mock"));
    }

    #[test]
    fn events_batch_on_none() {
        let window = WindowId(0);
        let mut platform = MockPlatform::new(Script {
            events: VecDeque::from([
                Some(Event::WindowFocus {
                    window,
                    focused: true,
                }),
                None,
                Some(Event::WindowClose { window }),
            ]),
            ..Script::default()
        });

        assert!(matches!(platform.poll_event(), Some(Event::WindowFocus { .. })));
        assert_eq!(platform.poll_event(), None);
        assert_eq!(platform.poll_event(), Some(Event::WindowClose { window }));
        assert_eq!(platform.poll_event(), None);
        assert_eq!(platform.poll_event(), None);
    }

    #[test]
    fn software_renderer_by_flags() {
        let mut platform = MockPlatform::default();
        platform.init_video(None).unwrap();
        let window = platform.create_window(&desc("w")).unwrap();

        let renderer = platform
            .create_renderer(&window, None, RendererFlags::SOFTWARE | RendererFlags::PRESENT_VSYNC)
            .unwrap();
        let info = platform.renderer_info(&renderer);
        assert_eq!(info.name, "mock-software");
        assert!(info.flags.contains(RendererFlags::PRESENT_VSYNC));
    }
}
