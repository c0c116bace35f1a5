use geometry::{Extent, ScreenPx};

/// An 8-bit-per-channel RGBA draw color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgba(0x00, 0x00, 0x00, 0xff);

    pub const GRAY: Self = Self::rgba(0xa0, 0xa0, 0xa0, 0xff);

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Color> for wgpu::Color {
    fn from(color: Color) -> Self {
        wgpu::Color {
            r: f64::from(color.r) / 255.0,
            g: f64::from(color.g) / 255.0,
            b: f64::from(color.b) / 255.0,
            a: f64::from(color.a) / 255.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    #[default]
    None,
    Blend,
    Add,
    Modulate,
}

bitflags::bitflags! {
    pub struct RendererFlags: u32 {
        /// The renderer is a software fallback.
        const SOFTWARE = 0x1;
        /// The renderer uses hardware acceleration.
        const ACCELERATED = 0x2;
        /// Present is synchronized with the display's refresh.
        const PRESENT_VSYNC = 0x4;
        /// The renderer can draw into textures.
        const TARGET_TEXTURE = 0x8;
    }
}

impl Default for RendererFlags {
    fn default() -> Self {
        RendererFlags::empty()
    }
}

/// Describes a render driver, or a renderer created from one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RendererInfo {
    pub name: String,
    pub flags: RendererFlags,
    pub max_texture_size: Extent<u32, ScreenPx>,
}

impl std::fmt::Display for RendererInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (flags: {:?}, max texture: {}x{})",
            self.name, self.flags, self.max_texture_size.width, self.max_texture_size.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_to_wgpu() {
        let color = wgpu::Color::from(Color::GRAY);
        assert!((color.r - 160.0 / 255.0).abs() < f64::EPSILON);
        assert_eq!(color.r, color.g);
        assert_eq!(color.g, color.b);
        assert!((color.a - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn info_display() {
        let info = RendererInfo {
            name: String::from("vulkan"),
            flags: RendererFlags::ACCELERATED,
            max_texture_size: Extent::new(8192, 8192),
        };
        let text = info.to_string();
        assert!(text.starts_with("vulkan"));
        assert!(text.ends_with("8192x8192)"));
    }
}
