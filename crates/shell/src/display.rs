use geometry::{Extent, Rect, ScreenPx};

/// Pixel layouts a display mode can report or request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    #[default]
    Unknown,
    Index8,
    Rgb555,
    Rgb565,
    /// Packed 3-byte RGB.
    Rgb24,
    /// 32-bit XRGB.
    Rgb888,
    Argb8888,
}

/// Channel layout of a pixel format. Masks are zero for formats that have no
/// direct RGB channels (e.g. indexed formats).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelMasks {
    pub bits_per_pixel: u32,
    pub red: u32,
    pub green: u32,
    pub blue: u32,
    pub alpha: u32,
}

impl PixelFormat {
    /// The format requested for a fullscreen mode of the given color depth.
    /// Unrecognized depths (including 0) select 32-bit XRGB.
    #[must_use]
    pub fn from_depth(depth: u32) -> Self {
        match depth {
            8 => Self::Index8,
            15 => Self::Rgb555,
            16 => Self::Rgb565,
            24 => Self::Rgb24,
            _ => Self::Rgb888,
        }
    }

    /// The format of a display mode as reported by the window system, which
    /// only exposes the bit depth.
    #[must_use]
    pub fn from_bit_depth(bits: u16) -> Self {
        match bits {
            8 => Self::Index8,
            15 => Self::Rgb555,
            16 => Self::Rgb565,
            24 => Self::Rgb888,
            32 => Self::Argb8888,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Index8 => "INDEX8",
            Self::Rgb555 => "RGB555",
            Self::Rgb565 => "RGB565",
            Self::Rgb24 => "RGB24",
            Self::Rgb888 => "RGB888",
            Self::Argb8888 => "ARGB8888",
        }
    }

    #[must_use]
    pub fn masks(self) -> ChannelMasks {
        let (bits_per_pixel, red, green, blue, alpha) = match self {
            Self::Unknown => (0, 0, 0, 0, 0),
            Self::Index8 => (8, 0, 0, 0, 0),
            Self::Rgb555 => (15, 0x7c00, 0x03e0, 0x001f, 0),
            Self::Rgb565 => (16, 0xf800, 0x07e0, 0x001f, 0),
            // Byte order, so red is the lowest byte on little-endian hosts.
            Self::Rgb24 => (24, 0x0000_00ff, 0x0000_ff00, 0x00ff_0000, 0),
            Self::Rgb888 => (24, 0x00ff_0000, 0x0000_ff00, 0x0000_00ff, 0),
            Self::Argb8888 => (32, 0x00ff_0000, 0x0000_ff00, 0x0000_00ff, 0xff00_0000),
        };

        ChannelMasks {
            bits_per_pixel,
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub fn bits_per_pixel(self) -> u32 {
        self.masks().bits_per_pixel
    }
}

/// A resolution, format and refresh rate that a display can be switched to.
///
/// A zero size or refresh rate in a *requested* mode means "don't care".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayMode {
    pub format: PixelFormat,
    pub size: Extent<u32, ScreenPx>,
    pub refresh_rate: u32,
}

impl Default for DisplayMode {
    fn default() -> Self {
        Self {
            format: PixelFormat::Unknown,
            size: Extent::new(0, 0),
            refresh_rate: 0,
        }
    }
}

/// Everything the platform knows about one connected display.
#[derive(Clone, Debug)]
pub struct DisplayInfo {
    pub name: String,
    pub bounds: Rect<i32, ScreenPx>,
    /// The part of `bounds` not covered by task bars, docks and the like.
    pub usable_bounds: Rect<i32, ScreenPx>,
    pub horizontal_dpi: f32,
    pub vertical_dpi: f32,
    pub desktop_mode: DisplayMode,
    /// Fullscreen modes, largest first.
    pub modes: Vec<DisplayMode>,
}

/// Picks the mode from `modes` that best satisfies `request`, returning its
/// index.
///
/// A candidate must be at least as large as the requested size. Among those,
/// the smallest wins; ties are broken by format (exact match, then same bit
/// depth) and then by refresh rate (exact match, then the closest rate at or
/// above the target, then the closest below). An unknown requested format or
/// a zero refresh rate defers to the desktop mode's.
#[must_use]
pub fn closest_mode(
    request: &DisplayMode,
    desktop: &DisplayMode,
    modes: &[DisplayMode],
) -> Option<usize> {
    let target_format = match request.format {
        PixelFormat::Unknown => desktop.format,
        format => format,
    };

    let target_refresh = match request.refresh_rate {
        0 => desktop.refresh_rate,
        rate => rate,
    };

    let format_rank = |format: PixelFormat| {
        if format == target_format {
            0
        } else if format.bits_per_pixel() == target_format.bits_per_pixel() {
            1
        } else {
            2
        }
    };

    let refresh_rank = |rate: u32| {
        if target_refresh == 0 || rate == target_refresh {
            0
        } else if rate > target_refresh {
            1
        } else {
            2
        }
    };

    modes
        .iter()
        .enumerate()
        .filter(|(_, mode)| {
            mode.size.width >= request.size.width && mode.size.height >= request.size.height
        })
        .min_by_key(|(_, mode)| {
            (
                u64::from(mode.size.width) * u64::from(mode.size.height),
                format_rank(mode.format),
                refresh_rank(mode.refresh_rate),
                mode.refresh_rate.abs_diff(target_refresh),
            )
        })
        .map(|(index, _)| index)
}
