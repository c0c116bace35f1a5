use geometry::{Extent, ScreenPx};
use shell::{AudioSpec, GlAttr, RendererFlags, WindowFlags, WindowPosition, GL_CONTEXT_DEBUG_FLAG};
use smallvec::{smallvec, SmallVec};

bitflags::bitflags! {
    /// Platform subsystems a session brings up.
    pub struct Subsystems: u32 {
        const VIDEO = 0x1;
        const AUDIO = 0x2;
    }
}

bitflags::bitflags! {
    /// Which parts of loading and running are logged at `info` level.
    pub struct Verbose: u32 {
        const VIDEO = 0x01;
        const MODES = 0x02;
        const RENDER = 0x04;
        const EVENT = 0x08;
        const AUDIO = 0x10;
    }
}

impl Default for Subsystems {
    fn default() -> Self {
        Subsystems::VIDEO
    }
}

impl Default for Verbose {
    fn default() -> Self {
        Verbose::empty()
    }
}

/// What happens when the user asks to close a window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClosePolicy {
    /// Closing any window ends the program.
    #[default]
    ExitOnAnyClose,
    /// Closing a window releases just that window. The program ends when the
    /// last one is gone.
    CloseWindow,
}

#[derive(Clone, Debug)]
pub struct WindowConfig {
    /// Base title. With more than one window, each gets its 1-based index
    /// appended.
    pub title: String,
    pub flags: WindowFlags,
    pub position: WindowPosition,
    /// Requested size. Replaced with the actual size if the platform denies
    /// it for a window that can't be resized.
    pub size: Extent<u32, ScreenPx>,
    /// Applied when either dimension is non-zero.
    pub min_size: Extent<u32, ScreenPx>,
    pub max_size: Extent<u32, ScreenPx>,
    /// Renderer logical size, applied when both dimensions are non-zero.
    pub logical_size: Extent<u32, ScreenPx>,
    /// Renderer scale, applied when non-zero and no logical size is set.
    pub scale: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: String::from("title"),
            flags: WindowFlags::empty(),
            position: WindowPosition::Undefined,
            size: Extent::new(640, 480),
            min_size: Extent::zero(),
            max_size: Extent::zero(),
            logical_size: Extent::zero(),
            scale: 0.0,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RenderConfig {
    /// Render driver to use, matched case-insensitively. `None` lets the
    /// platform choose.
    pub driver: Option<String>,
    pub flags: RendererFlags,
    /// Create windows without renderers.
    pub skip_renderer: bool,
}

#[derive(Clone, Debug, Default)]
pub struct AudioConfig {
    pub driver: Option<String>,
    pub spec: AudioSpec,
}

/// OpenGL context attributes requested for new windows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlAttributes {
    pub red_size: i32,
    pub green_size: i32,
    pub blue_size: i32,
    pub alpha_size: i32,
    pub double_buffer: i32,
    pub buffer_size: i32,
    pub depth_size: i32,
    pub stencil_size: i32,
    pub accum_red_size: i32,
    pub accum_green_size: i32,
    pub accum_blue_size: i32,
    pub accum_alpha_size: i32,
    pub stereo: i32,
    pub multisample_buffers: i32,
    pub multisample_samples: i32,
    /// Negative leaves the choice to the platform.
    pub accelerated: i32,
    pub retained_backing: i32,
    /// Zero leaves the context version to the platform.
    pub major_version: i32,
    pub minor_version: i32,
    pub debug: bool,
    pub profile_mask: i32,
}

impl Default for GlAttributes {
    fn default() -> Self {
        Self {
            red_size: 3,
            green_size: 3,
            blue_size: 2,
            alpha_size: 0,
            double_buffer: 1,
            buffer_size: 0,
            depth_size: 16,
            stencil_size: 0,
            accum_red_size: 0,
            accum_green_size: 0,
            accum_blue_size: 0,
            accum_alpha_size: 0,
            stereo: 0,
            multisample_buffers: 0,
            multisample_samples: 0,
            accelerated: -1,
            retained_backing: 1,
            major_version: 0,
            minor_version: 0,
            debug: false,
            profile_mask: 0,
        }
    }
}

impl GlAttributes {
    /// The attributes to hand to the platform, in upload order. Attributes
    /// left at their "platform decides" value are omitted.
    #[must_use]
    pub fn uploads(&self) -> SmallVec<[(GlAttr, i32); 21]> {
        let mut uploads: SmallVec<[(GlAttr, i32); 21]> = smallvec![
            (GlAttr::RedSize, self.red_size),
            (GlAttr::GreenSize, self.green_size),
            (GlAttr::BlueSize, self.blue_size),
            (GlAttr::AlphaSize, self.alpha_size),
            (GlAttr::DoubleBuffer, self.double_buffer),
            (GlAttr::BufferSize, self.buffer_size),
            (GlAttr::DepthSize, self.depth_size),
            (GlAttr::StencilSize, self.stencil_size),
            (GlAttr::AccumRedSize, self.accum_red_size),
            (GlAttr::AccumGreenSize, self.accum_green_size),
            (GlAttr::AccumBlueSize, self.accum_blue_size),
            (GlAttr::AccumAlphaSize, self.accum_alpha_size),
            (GlAttr::Stereo, self.stereo),
            (GlAttr::MultisampleBuffers, self.multisample_buffers),
            (GlAttr::MultisampleSamples, self.multisample_samples),
        ];

        if self.accelerated >= 0 {
            uploads.push((GlAttr::AcceleratedVisual, self.accelerated));
        }

        uploads.push((GlAttr::RetainedBacking, self.retained_backing));

        if self.major_version != 0 {
            uploads.push((GlAttr::ContextMajorVersion, self.major_version));
            uploads.push((GlAttr::ContextMinorVersion, self.minor_version));
        }

        if self.debug {
            uploads.push((GlAttr::ContextFlags, GL_CONTEXT_DEBUG_FLAG));
        }

        if self.profile_mask != 0 {
            uploads.push((GlAttr::ContextProfileMask, self.profile_mask));
        }

        uploads
    }
}

/// Everything a session needs to know before loading. Read once; the only
/// later change is the window size correction made during loading.
#[derive(Clone, Debug)]
pub struct Config {
    pub subsystems: Subsystems,
    pub verbose: Verbose,
    /// Video driver to initialize. `None` uses the platform default.
    pub video_driver: Option<String>,
    pub window: WindowConfig,
    /// Bits per pixel of the fullscreen display mode. Zero selects 24-bit
    /// RGB.
    pub depth: u32,
    /// Refresh rate of the fullscreen display mode. Zero accepts any.
    pub refresh_rate: u32,
    pub num_windows: usize,
    pub render: RenderConfig,
    pub audio: AudioConfig,
    pub gl: GlAttributes,
    pub close_policy: ClosePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            subsystems: Subsystems::default(),
            verbose: Verbose::default(),
            video_driver: None,
            window: WindowConfig::default(),
            depth: 0,
            refresh_rate: 0,
            num_windows: 1,
            render: RenderConfig::default(),
            audio: AudioConfig::default(),
            gl: GlAttributes::default(),
            close_policy: ClosePolicy::default(),
        }
    }
}

impl Config {
    /// The title of window `index` (counting from zero).
    #[must_use]
    pub fn window_title(&self, index: usize) -> String {
        if self.num_windows > 1 {
            format!("{} {}", self.window.title, index + 1)
        } else {
            self.window.title.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.subsystems, Subsystems::VIDEO);
        assert!(config.verbose.is_empty());
        assert_eq!(config.num_windows, 1);
        assert_eq!(config.window.size, Extent::new(640, 480));
        assert_eq!(config.window.title, "title");
        assert_eq!(config.audio.spec.frequency, 22050);
        assert_eq!(config.close_policy, ClosePolicy::ExitOnAnyClose);
        assert_eq!(config.depth, 0);
    }

    #[test]
    fn default_gl_uploads_skip_unset() {
        let uploads = GlAttributes::default().uploads();
        let attrs: Vec<GlAttr> = uploads.iter().map(|(attr, _)| *attr).collect();

        // 15 unconditional attributes plus retained backing.
        assert_eq!(uploads.len(), 16);
        assert_eq!(uploads[0], (GlAttr::RedSize, 3));
        assert_eq!(uploads[6], (GlAttr::DepthSize, 16));
        assert_eq!(uploads[15], (GlAttr::RetainedBacking, 1));
        assert!(!attrs.contains(&GlAttr::AcceleratedVisual));
        assert!(!attrs.contains(&GlAttr::ContextMajorVersion));
        assert!(!attrs.contains(&GlAttr::ContextMinorVersion));
        assert!(!attrs.contains(&GlAttr::ContextFlags));
        assert!(!attrs.contains(&GlAttr::ContextProfileMask));
    }

    #[test]
    fn gl_uploads_when_set() {
        let gl = GlAttributes {
            accelerated: 1,
            major_version: 3,
            minor_version: 2,
            debug: true,
            profile_mask: 0x1,
            ..GlAttributes::default()
        };
        let uploads = gl.uploads();

        assert_eq!(uploads.len(), 21);
        assert_eq!(
            &uploads[15..],
            &[
                (GlAttr::AcceleratedVisual, 1),
                (GlAttr::RetainedBacking, 1),
                (GlAttr::ContextMajorVersion, 3),
                (GlAttr::ContextMinorVersion, 2),
                (GlAttr::ContextFlags, GL_CONTEXT_DEBUG_FLAG),
                (GlAttr::ContextProfileMask, 0x1),
            ]
        );
    }

    #[test]
    fn minor_version_needs_major() {
        let gl = GlAttributes {
            minor_version: 5,
            ..GlAttributes::default()
        };
        assert!(gl
            .uploads()
            .iter()
            .all(|(attr, _)| *attr != GlAttr::ContextMinorVersion));
    }

    #[test]
    fn accelerated_zero_is_uploaded() {
        let gl = GlAttributes {
            accelerated: 0,
            ..GlAttributes::default()
        };
        assert!(gl.uploads().contains(&(GlAttr::AcceleratedVisual, 0)));
    }

    #[test]
    fn titles() {
        let mut config = Config::default();
        assert_eq!(config.window_title(0), "title");

        config.num_windows = 3;
        assert_eq!(config.window_title(0), "title 1");
        assert_eq!(config.window_title(2), "title 3");
    }
}
