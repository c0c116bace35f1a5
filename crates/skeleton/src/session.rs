use geometry::{Extent, ScreenPx};
use shell::{
    BlendMode, Color, DisplayInfo, DisplayMode, PixelFormat, Platform, WindowDesc, WindowFlags,
    WindowId,
};
use tracing::{debug, info};

use crate::{Config, LoadError, Subsystems, Verbose, WindowContext};

/// A configured platform and everything acquired from it.
///
/// `load` brings the configured subsystems up and opens the windows; `unload`
/// (or dropping the session) releases all of it again in reverse order.
pub struct Session<P: Platform> {
    config: Config,
    argv: Vec<String>,
    platform: P,
    contexts: Vec<WindowContext<P>>,
    audio: Option<P::AudioDevice>,
    video_initialized: bool,
    audio_initialized: bool,
    /// Set once the platform has been shut down.
    finished: bool,
}

impl<P: Platform> Session<P> {
    pub fn new(platform: P, config: Config, argv: Vec<String>) -> Self {
        debug!("session arguments: {argv:?}");
        Self {
            config,
            argv,
            platform,
            contexts: Vec::new(),
            audio: None,
            video_initialized: false,
            audio_initialized: false,
            finished: false,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    #[must_use]
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// The open windows, in creation order.
    #[must_use]
    pub fn windows(&self) -> &[WindowContext<P>] {
        &self.contexts
    }

    #[must_use]
    pub fn audio_device(&self) -> Option<&P::AudioDevice> {
        self.audio.as_ref()
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut P, &mut [WindowContext<P>]) {
        (&mut self.platform, &mut self.contexts)
    }

    /// Creates a render target for window `index`.
    pub fn attach_render_target(
        &mut self,
        index: usize,
        size: Extent<u32, ScreenPx>,
    ) -> shell::Result<()> {
        let context = self.contexts.get_mut(index).ok_or(shell::Error::OutOfRange {
            kind: "window",
            index,
        })?;
        context.attach_render_target(&mut self.platform, size)
    }

    /// Releases a single window along with its renderer and target. Returns
    /// `false` if no open window has that id.
    pub fn close_window(&mut self, id: WindowId) -> bool {
        match self.contexts.iter().position(|context| context.id() == id) {
            Some(index) => {
                let context = self.contexts.remove(index);
                context.release(&mut self.platform);
                debug!(window = id.0, "window closed");
                true
            }
            None => false,
        }
    }

    /// Applies the configuration: initializes video and audio as requested,
    /// opens every window with its renderer, and clears each renderer once.
    ///
    /// On failure, anything acquired so far is kept and released by
    /// [`Session::unload`].
    pub fn load(&mut self) -> Result<(), LoadError> {
        if self.config.subsystems.contains(Subsystems::VIDEO) {
            self.load_video()?;
        }

        if self.config.subsystems.contains(Subsystems::AUDIO) {
            self.load_audio()?;
        }

        for context in &mut self.contexts {
            if let Some(renderer) = context.renderer_mut() {
                self.platform.set_blend_mode(renderer, BlendMode::None);
                self.platform.set_draw_color(renderer, Color::GRAY);
                if let Err(err) = self.platform.clear(renderer) {
                    tracing::warn!(window = context.id().0, "initial clear failed: {err}");
                }
            }
        }

        Ok(())
    }

    fn load_video(&mut self) -> Result<(), LoadError> {
        let verbose = self.config.verbose;

        if verbose.contains(Verbose::VIDEO) {
            let drivers = self.platform.video_drivers();
            if drivers.is_empty() {
                info!("No built-in video drivers");
            } else {
                info!("Built-in video drivers: {}", drivers.join(", "));
            }
        }

        self.platform
            .init_video(self.config.video_driver.as_deref())
            .map_err(LoadError::VideoInit)?;
        self.video_initialized = true;

        if verbose.contains(Verbose::VIDEO) {
            info!(
                "Video driver: {}",
                self.platform.current_video_driver().unwrap_or_default()
            );
        }

        for (attr, value) in self.config.gl.uploads() {
            if let Err(err) = self.platform.set_gl_attribute(attr, value) {
                debug!("gl attribute {attr:?} rejected: {err}");
            }
        }

        if verbose.contains(Verbose::MODES) {
            log_displays(&self.platform.displays());
        }

        if verbose.contains(Verbose::RENDER) {
            let drivers = self.platform.render_drivers();
            if drivers.is_empty() {
                info!("No built-in render drivers");
            } else {
                info!("Built-in render drivers:");
                for (index, driver) in drivers.iter().enumerate() {
                    info!("  Renderer {index}: {driver}");
                }
            }
        }

        let fullscreen_mode = DisplayMode {
            format: PixelFormat::from_depth(self.config.depth),
            size: Extent::zero(),
            refresh_rate: self.config.refresh_rate,
        };

        let count = self.config.num_windows;
        self.contexts
            .try_reserve_exact(count)
            .map_err(|source| LoadError::Allocation { count, source })?;

        for index in 0..count {
            self.open_window(index, &fullscreen_mode)?;
        }

        Ok(())
    }

    fn open_window(&mut self, index: usize, fullscreen_mode: &DisplayMode) -> Result<(), LoadError> {
        let desc = WindowDesc {
            title: self.config.window_title(index),
            position: self.config.window.position,
            size: self.config.window.size,
            flags: self.config.window.flags,
        };

        let window = self
            .platform
            .create_window(&desc)
            .map_err(|source| LoadError::CreateWindow { index, source })?;
        let id = self.platform.window_id(&window);

        // The window is kept even if configuring it fails, so unload can
        // release it.
        let mut context = WindowContext::new(id, window);
        let configured = self.configure_window(index, &mut context, fullscreen_mode);
        self.contexts.push(context);
        configured
    }

    fn configure_window(
        &mut self,
        index: usize,
        context: &mut WindowContext<P>,
        fullscreen_mode: &DisplayMode,
    ) -> Result<(), LoadError> {
        let Self { config, platform, .. } = self;

        let min_size = config.window.min_size;
        if min_size.width != 0 || min_size.height != 0 {
            platform.set_window_min_size(context.window_mut(), min_size);
        }

        let max_size = config.window.max_size;
        if max_size.width != 0 || max_size.height != 0 {
            platform.set_window_max_size(context.window_mut(), max_size);
        }

        let actual = platform.window_size(context.window());
        if !config.window.flags.contains(WindowFlags::RESIZABLE) && actual != config.window.size {
            // Part of the program's output rather than a diagnostic.
            println!(
                "Window requested size {}x{}, got {}x{}",
                config.window.size.width, config.window.size.height, actual.width, actual.height
            );
            config.window.size = actual;
        }

        platform
            .set_window_display_mode(context.window_mut(), fullscreen_mode)
            .map_err(|source| LoadError::DisplayMode { index, source })?;

        platform.show_window(context.window_mut());

        let wants_renderer = config.render.driver.is_some()
            || !config
                .window
                .flags
                .intersects(WindowFlags::OPENGL | WindowFlags::VULKAN);

        if config.render.skip_renderer || !wants_renderer {
            return Ok(());
        }

        let driver = match config.render.driver.as_deref() {
            Some(name) => Some(
                platform
                    .render_drivers()
                    .iter()
                    .position(|driver| driver.name.eq_ignore_ascii_case(name))
                    .ok_or_else(|| LoadError::RenderDriverNotFound(String::from(name)))?,
            ),
            None => None,
        };

        let mut renderer = platform
            .create_renderer(context.window(), driver, config.render.flags)
            .map_err(|source| LoadError::CreateRenderer { index, source })?;

        let logical_size = config.window.logical_size;
        if logical_size.width != 0 && logical_size.height != 0 {
            platform.set_logical_size(&mut renderer, logical_size);
        } else if config.window.scale != 0.0 {
            platform.set_scale(&mut renderer, config.window.scale, config.window.scale);
        }

        if config.verbose.contains(Verbose::RENDER) {
            info!("Current renderer: {}", platform.renderer_info(&renderer));
        }

        context.set_renderer(renderer);
        Ok(())
    }

    fn load_audio(&mut self) -> Result<(), LoadError> {
        let verbose = self.config.verbose;

        if verbose.contains(Verbose::AUDIO) {
            let drivers = self.platform.audio_drivers();
            if drivers.is_empty() {
                info!("No built-in audio drivers");
            } else {
                info!("Built-in audio drivers: {}", drivers.join(", "));
            }
        }

        self.platform
            .init_audio(self.config.audio.driver.as_deref())
            .map_err(LoadError::AudioInit)?;
        self.audio_initialized = true;

        if verbose.contains(Verbose::VIDEO) {
            info!(
                "Audio driver: {}",
                self.platform.current_audio_driver().unwrap_or_default()
            );
        }

        let device = self
            .platform
            .open_audio(&self.config.audio.spec)
            .map_err(LoadError::AudioOpen)?;
        self.audio = Some(device);

        Ok(())
    }

    /// Releases everything `load` acquired and shuts the platform down.
    /// Calling it again, or without a prior `load`, is harmless.
    pub fn unload(&mut self) {
        if self.finished {
            return;
        }

        for context in self.contexts.drain(..) {
            context.release(&mut self.platform);
        }

        if let Some(device) = self.audio.take() {
            self.platform.close_audio(device);
        }

        if self.video_initialized {
            self.platform.quit_video();
            self.video_initialized = false;
        }

        if self.audio_initialized {
            self.platform.quit_audio();
            self.audio_initialized = false;
        }

        self.platform.quit();
        self.finished = true;
        debug!("session unloaded");
    }
}

impl<P: Platform> Drop for Session<P> {
    fn drop(&mut self) {
        self.unload();
    }
}

fn log_displays(displays: &[DisplayInfo]) {
    info!("Number of displays: {}", displays.len());

    for (index, info) in displays.iter().enumerate() {
        let bounds = info.bounds;
        let usable = info.usable_bounds;

        info!("Display {index}: {}", info.name);
        info!(
            "Bounds: {}x{} at {},{}",
            bounds.extent().width,
            bounds.extent().height,
            bounds.top_left().x,
            bounds.top_left().y
        );
        info!(
            "Usable bounds: {}x{} at {},{}",
            usable.extent().width,
            usable.extent().height,
            usable.top_left().x,
            usable.top_left().y
        );
        info!(
            "DPI: {:.2}x{:.2}",
            info.horizontal_dpi, info.vertical_dpi
        );

        log_mode("  Current mode", &info.desktop_mode);

        if info.modes.is_empty() {
            info!("No available fullscreen video modes");
        } else {
            info!("  Fullscreen video modes:");
            for (mode_index, mode) in info.modes.iter().enumerate() {
                log_mode(&format!("    Mode {mode_index}"), mode);
            }
        }
    }
}

fn log_mode(label: &str, mode: &DisplayMode) {
    let masks = mode.format.masks();
    info!(
        "{label}: {}x{}@{}Hz, {} bits-per-pixel ({})",
        mode.size.width,
        mode.size.height,
        mode.refresh_rate,
        masks.bits_per_pixel,
        mode.format.name()
    );

    if masks.red != 0 || masks.green != 0 || masks.blue != 0 {
        info!("      Red Mask   = 0x{:08x}", masks.red);
        info!("      Green Mask = 0x{:08x}", masks.green);
        info!("      Blue Mask  = 0x{:08x}", masks.blue);
        if masks.alpha != 0 {
            info!("      Alpha Mask = 0x{:08x}", masks.alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use shell::{
        mock::{Call, Journal, MockPlatform, Script},
        AudioFormat, GlAttr, RendererFlags,
    };
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    fn session(script: Script, config: Config) -> (Session<MockPlatform>, Rc<RefCell<Journal>>) {
        let platform = MockPlatform::new(script);
        let journal = platform.journal();
        (Session::new(platform, config, vec![String::from("skeleton")]), journal)
    }

    #[test]
    fn one_context_per_window() {
        let config = Config {
            num_windows: 3,
            ..Config::default()
        };
        let (mut session, journal) = session(Script::default(), config);
        session.load().unwrap();

        assert_eq!(session.windows().len(), 3);
        for context in session.windows() {
            assert!(context.renderer().is_some());
            assert!(context.target().is_none());
        }

        let journal = journal.borrow();
        assert_eq!(journal.count(|c| matches!(c, Call::CreateRenderer(..))), 3);
        assert_eq!(journal.count(|c| matches!(c, Call::ShowWindow(_))), 3);
    }

    #[test]
    fn unload_destroys_everything_once() {
        let config = Config {
            num_windows: 2,
            ..Config::default()
        };
        let (mut session, journal) = session(Script::default(), config);
        session.load().unwrap();
        session.attach_render_target(1, Extent::new(64, 64)).unwrap();

        session.unload();
        session.unload();
        drop(session);

        let journal = journal.borrow();
        assert_eq!(journal.destroyed_windows(), vec![WindowId(0), WindowId(1)]);
        assert_eq!(journal.count(|c| matches!(c, Call::DestroyRenderer(_))), 2);
        assert_eq!(journal.count(|c| *c == Call::DestroyTexture(WindowId(1))), 1);
        assert_eq!(journal.count(|c| *c == Call::QuitVideo), 1);
        assert_eq!(journal.count(|c| *c == Call::Quit), 1);

        // Target, then renderer, then window.
        let texture = journal.position(|c| *c == Call::DestroyTexture(WindowId(1)));
        let renderer = journal.position(|c| *c == Call::DestroyRenderer(WindowId(1)));
        let window = journal.position(|c| *c == Call::DestroyWindow(WindowId(1)));
        assert!(texture < renderer && renderer < window);
    }

    #[test]
    fn unload_without_load() {
        let (mut session, journal) = session(Script::default(), Config::default());
        session.unload();
        drop(session);

        let journal = journal.borrow();
        assert_eq!(journal.calls, vec![Call::Quit]);
    }

    #[test]
    fn drop_unloads() {
        let (mut session, journal) = session(Script::default(), Config::default());
        session.load().unwrap();
        drop(session);

        let journal = journal.borrow();
        assert_eq!(journal.destroyed_windows(), vec![WindowId(0)]);
        assert_eq!(journal.count(|c| *c == Call::Quit), 1);
    }

    #[test]
    fn unknown_render_driver() {
        let config = Config {
            render: crate::RenderConfig {
                driver: Some(String::from("imaginary")),
                ..Default::default()
            },
            ..Config::default()
        };
        let (mut session, journal) = session(Script::default(), config);

        let err = session.load().unwrap_err();
        assert!(matches!(err, LoadError::RenderDriverNotFound(ref name) if name == "imaginary"));

        // The window exists but has no renderer, and is still released.
        assert_eq!(session.windows().len(), 1);
        assert!(session.windows()[0].renderer().is_none());
        assert_eq!(
            journal.borrow().count(|c| matches!(c, Call::CreateRenderer(..))),
            0
        );

        session.unload();
        assert_eq!(journal.borrow().destroyed_windows(), vec![WindowId(0)]);
    }

    #[test]
    fn render_driver_matched_ignoring_case() {
        let config = Config {
            render: crate::RenderConfig {
                driver: Some(String::from("MOCK-SOFTWARE")),
                ..Default::default()
            },
            ..Config::default()
        };
        let (mut session, journal) = session(Script::default(), config);
        session.load().unwrap();

        assert_eq!(
            journal.borrow().count(|c| *c == Call::CreateRenderer(WindowId(0), 1)),
            1
        );
    }

    #[test]
    fn denied_size_is_adopted() {
        let script = Script {
            window_size: Some(Extent::new(800, 600)),
            ..Script::default()
        };
        let (mut session, _) = session(script, Config::default());
        session.load().unwrap();

        assert_eq!(session.config().window.size, Extent::new(800, 600));
    }

    #[test]
    fn resizable_window_keeps_requested_size() {
        let mut config = Config::default();
        config.window.flags = WindowFlags::RESIZABLE;
        let script = Script {
            window_size: Some(Extent::new(800, 600)),
            ..Script::default()
        };
        let (mut session, _) = session(script, config);
        session.load().unwrap();

        assert_eq!(session.config().window.size, Extent::new(640, 480));
    }

    #[test]
    fn partial_window_failure_keeps_created_windows() {
        let config = Config {
            num_windows: 4,
            ..Config::default()
        };
        let script = Script {
            fail_window_at: Some(2),
            ..Script::default()
        };
        let (mut session, journal) = session(script, config);

        let err = session.load().unwrap_err();
        assert!(matches!(err, LoadError::CreateWindow { index: 2, .. }));
        assert_eq!(session.windows().len(), 2);

        session.unload();
        let journal = journal.borrow();
        assert_eq!(journal.created_windows(), journal.destroyed_windows());
        assert_eq!(journal.count(|c| matches!(c, Call::DestroyRenderer(_))), 2);
    }

    #[test]
    fn display_mode_failure() {
        let script = Script {
            fail_display_mode: true,
            ..Script::default()
        };
        let (mut session, journal) = session(script, Config::default());

        let err = session.load().unwrap_err();
        assert!(matches!(err, LoadError::DisplayMode { index: 0, .. }));
        assert_eq!(journal.borrow().count(|c| matches!(c, Call::ShowWindow(_))), 0);
    }

    #[test]
    fn fullscreen_mode_from_depth_and_refresh() {
        let config = Config {
            depth: 16,
            refresh_rate: 75,
            ..Config::default()
        };
        let (mut session, journal) = session(Script::default(), config);
        session.load().unwrap();

        let expected = DisplayMode {
            format: PixelFormat::Rgb565,
            size: Extent::zero(),
            refresh_rate: 75,
        };
        assert_eq!(
            journal
                .borrow()
                .count(|c| *c == Call::SetDisplayMode(WindowId(0), expected)),
            1
        );
    }

    #[test]
    fn titles_are_numbered() {
        let mut config = Config {
            num_windows: 2,
            ..Config::default()
        };
        config.window.title = String::from("demo");
        let (mut session, journal) = session(Script::default(), config);
        session.load().unwrap();

        let journal = journal.borrow();
        assert!(journal
            .calls
            .contains(&Call::CreateWindow(WindowId(0), String::from("demo 1"))));
        assert!(journal
            .calls
            .contains(&Call::CreateWindow(WindowId(1), String::from("demo 2"))));
    }

    #[test]
    fn gl_attributes_uploaded_before_windows() {
        let (mut session, journal) = session(Script::default(), Config::default());
        session.load().unwrap();

        let journal = journal.borrow();
        let last_attr = journal
            .calls
            .iter()
            .rposition(|c| matches!(c, Call::SetGlAttribute(..)));
        let first_window = journal.position(|c| matches!(c, Call::CreateWindow(..)));
        assert!(last_attr < first_window);
        assert!(journal.calls.contains(&Call::SetGlAttribute(GlAttr::DepthSize, 16)));
        assert_eq!(
            journal.count(|c| matches!(c, Call::SetGlAttribute(GlAttr::AcceleratedVisual, _))),
            0
        );
    }

    #[test]
    fn gl_windows_skip_renderer() {
        let mut config = Config::default();
        config.window.flags = WindowFlags::OPENGL;
        let (mut session, journal) = session(Script::default(), config);
        session.load().unwrap();

        assert!(session.windows()[0].renderer().is_none());
        assert_eq!(
            journal.borrow().count(|c| matches!(c, Call::CreateRenderer(..))),
            0
        );
    }

    #[test]
    fn skip_renderer() {
        let mut config = Config::default();
        config.render.skip_renderer = true;
        let (mut session, _) = session(Script::default(), config);
        session.load().unwrap();

        assert!(session.windows()[0].renderer().is_none());
    }

    #[test]
    fn logical_size_wins_over_scale() {
        let mut config = Config::default();
        config.window.logical_size = Extent::new(320, 240);
        config.window.scale = 2.0;
        let (mut session, journal) = session(Script::default(), config);
        session.load().unwrap();

        let journal = journal.borrow();
        assert_eq!(journal.count(|c| matches!(c, Call::SetLogicalSize(..))), 1);
        assert_eq!(journal.count(|c| matches!(c, Call::SetScale(..))), 0);
    }

    #[test]
    fn scale_when_no_logical_size() {
        let mut config = Config::default();
        config.window.logical_size = Extent::new(320, 0);
        config.window.scale = 2.0;
        let (mut session, journal) = session(Script::default(), config);
        session.load().unwrap();

        assert!(journal
            .borrow()
            .calls
            .contains(&Call::SetScale(WindowId(0), 2.0, 2.0)));
    }

    #[test]
    fn renderers_cleared_to_gray_after_load() {
        let (mut session, journal) = session(Script::default(), Config::default());
        session.load().unwrap();

        let journal = journal.borrow();
        let tail = &journal.calls[journal.calls.len() - 3..];
        assert_eq!(
            tail,
            &[
                Call::SetBlendMode(WindowId(0), BlendMode::None),
                Call::SetDrawColor(WindowId(0), Color::GRAY),
                Call::Clear(WindowId(0)),
            ]
        );
    }

    #[test]
    fn audio_opened_and_closed() {
        let mut config = Config {
            subsystems: Subsystems::VIDEO | Subsystems::AUDIO,
            ..Config::default()
        };
        config.audio.spec.format = AudioFormat::F32;
        let (mut session, journal) = session(Script::default(), config);
        session.load().unwrap();

        let device = session.audio_device().unwrap();
        assert_eq!(device.spec.format, AudioFormat::F32);

        session.unload();
        let journal = journal.borrow();
        let close = journal.position(|c| *c == Call::CloseAudio).unwrap();
        let quit_audio = journal.position(|c| *c == Call::QuitAudio).unwrap();
        let quit_video = journal.position(|c| *c == Call::QuitVideo).unwrap();
        let destroy = journal.position(|c| matches!(c, Call::DestroyWindow(_))).unwrap();
        assert!(destroy < close && close < quit_video && quit_video < quit_audio);
    }

    #[test]
    fn audio_open_failure_still_quits_audio() {
        let config = Config {
            subsystems: Subsystems::AUDIO,
            ..Config::default()
        };
        let script = Script {
            fail_audio_open: true,
            ..Script::default()
        };
        let (mut session, journal) = session(script, config);

        assert!(matches!(session.load(), Err(LoadError::AudioOpen(_))));
        session.unload();

        let journal = journal.borrow();
        assert_eq!(journal.count(|c| *c == Call::QuitAudio), 1);
        assert_eq!(journal.count(|c| *c == Call::QuitVideo), 0);
        assert_eq!(journal.count(|c| *c == Call::CloseAudio), 0);
    }

    #[test]
    fn video_init_failure() {
        let script = Script {
            fail_video_init: true,
            ..Script::default()
        };
        let (mut session, journal) = session(script, Config::default());

        assert!(matches!(session.load(), Err(LoadError::VideoInit(_))));
        session.unload();
        assert_eq!(journal.borrow().count(|c| *c == Call::QuitVideo), 0);
    }

    #[test]
    fn render_target_requires_renderer() {
        let mut config = Config::default();
        config.render.skip_renderer = true;
        let (mut session, _) = session(Script::default(), config);
        session.load().unwrap();

        assert!(session.attach_render_target(0, Extent::new(16, 16)).is_err());
        assert!(session.attach_render_target(5, Extent::new(16, 16)).is_err());
    }

    #[test]
    fn replacing_render_target_destroys_old() {
        let (mut session, journal) = session(Script::default(), Config::default());
        session.load().unwrap();
        session.attach_render_target(0, Extent::new(16, 16)).unwrap();
        session.attach_render_target(0, Extent::new(32, 32)).unwrap();
        assert_eq!(
            journal.borrow().count(|c| *c == Call::DestroyTexture(WindowId(0))),
            1
        );

        session.unload();
        assert_eq!(
            journal.borrow().count(|c| *c == Call::DestroyTexture(WindowId(0))),
            2
        );
    }

    #[test]
    fn renderer_flags_forwarded() {
        let mut config = Config::default();
        config.render.flags = RendererFlags::PRESENT_VSYNC;
        let (mut session, _) = session(Script::default(), config);
        session.load().unwrap();

        let renderer = session.windows()[0].renderer().unwrap();
        let info = session.platform().renderer_info(renderer);
        assert!(info.flags.contains(RendererFlags::PRESENT_VSYNC));
    }

    #[test]
    fn renderer_failure_keeps_the_window() {
        let config = Config {
            num_windows: 2,
            ..Config::default()
        };
        let script = Script {
            fail_renderer: true,
            ..Script::default()
        };
        let (mut session, journal) = session(script, config);

        assert!(matches!(
            session.load(),
            Err(LoadError::CreateRenderer { index: 0, .. })
        ));
        assert_eq!(session.windows().len(), 1);
        assert!(session.windows()[0].renderer().is_none());

        session.unload();
        let journal = journal.borrow();
        assert_eq!(journal.created_windows(), vec![WindowId(0)]);
        assert_eq!(journal.destroyed_windows(), vec![WindowId(0)]);
        assert_eq!(journal.count(|c| matches!(c, Call::DestroyRenderer(_))), 0);
    }

    #[test]
    fn audio_init_failure() {
        let config = Config {
            subsystems: Subsystems::VIDEO | Subsystems::AUDIO,
            ..Config::default()
        };
        let script = Script {
            fail_audio_init: true,
            ..Script::default()
        };
        let (mut session, journal) = session(script, config);

        assert!(matches!(session.load(), Err(LoadError::AudioInit(_))));
        assert!(session.audio_device().is_none());
        session.unload();

        let journal = journal.borrow();
        assert_eq!(journal.count(|c| matches!(c, Call::InitAudio(_))), 1);
        assert_eq!(journal.count(|c| matches!(c, Call::OpenAudio(_))), 0);
        assert_eq!(journal.count(|c| *c == Call::QuitAudio), 0);
        assert_eq!(journal.count(|c| *c == Call::QuitVideo), 1);
        assert_eq!(journal.destroyed_windows(), vec![WindowId(0)]);
    }

    #[test]
    fn render_target_failure_leaves_no_texture() {
        let script = Script {
            fail_render_target: true,
            ..Script::default()
        };
        let (mut session, journal) = session(script, Config::default());
        session.load().unwrap();

        assert!(session.attach_render_target(0, Extent::new(64, 64)).is_err());
        assert!(session.windows()[0].target().is_none());

        session.unload();
        let journal = journal.borrow();
        assert_eq!(journal.count(|c| matches!(c, Call::CreateTexture(_))), 0);
        assert_eq!(journal.count(|c| matches!(c, Call::DestroyTexture(_))), 0);
        assert_eq!(journal.destroyed_windows(), vec![WindowId(0)]);
    }

    #[test]
    fn min_and_max_size_applied_when_set() {
        let mut config = Config::default();
        config.window.min_size = Extent::new(320, 0);
        config.window.max_size = Extent::new(1024, 768);
        let (mut session, journal) = session(Script::default(), config);
        session.load().unwrap();

        let journal = journal.borrow();
        let create = journal.position(|c| matches!(c, Call::CreateWindow(..))).unwrap();
        let min = journal
            .position(|c| *c == Call::SetMinSize(WindowId(0), Extent::new(320, 0)))
            .unwrap();
        let max = journal
            .position(|c| *c == Call::SetMaxSize(WindowId(0), Extent::new(1024, 768)))
            .unwrap();
        let show = journal.position(|c| matches!(c, Call::ShowWindow(_))).unwrap();
        assert!(create < min && min < max && max < show);
    }

    #[test]
    fn min_and_max_size_skipped_by_default() {
        let (mut session, journal) = session(Script::default(), Config::default());
        session.load().unwrap();

        let journal = journal.borrow();
        assert_eq!(journal.count(|c| matches!(c, Call::SetMinSize(..))), 0);
        assert_eq!(journal.count(|c| matches!(c, Call::SetMaxSize(..))), 0);
    }

    #[test]
    fn verbose_load_and_unload() {
        let config = Config {
            num_windows: 2,
            subsystems: Subsystems::VIDEO | Subsystems::AUDIO,
            verbose: Verbose::all(),
            ..Config::default()
        };
        let (mut session, journal) = session(Script::default(), config);
        session.load().unwrap();

        assert_eq!(session.windows().len(), 2);
        assert!(session.audio_device().is_some());

        session.unload();
        assert_eq!(journal.borrow().count(|c| *c == Call::Quit), 1);
    }

    #[test]
    fn verbose_without_modes() {
        let mut script = Script::default();
        for display in &mut script.displays {
            display.modes.clear();
        }
        let config = Config {
            verbose: Verbose::all(),
            ..Config::default()
        };
        let (mut session, _) = session(script, config);
        session.load().unwrap();
        assert_eq!(session.windows().len(), 1);
    }
}
