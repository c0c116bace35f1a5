//! Renderers backed by wgpu surfaces.
//!
//! A render driver is a wgpu backend (Vulkan, Metal, Direct3D, OpenGL) that
//! has at least one adapter on this machine. Each renderer owns its own device
//! and queue, so renderers on different windows share nothing.

use std::rc::Rc;

use geometry::{Extent, ScreenPx};

use crate::{Color, Error, RendererFlags, RendererInfo, Result};

/// A wgpu surface bound to one window, plus the device that draws into it.
pub struct NativeRenderer {
    // Dropped before `window`, which the surface refers to.
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pub(super) info: RendererInfo,
    pub(super) draw_color: Color,
    /// Device-independent resolution, letterboxed into the surface.
    pub(super) logical_size: Option<Extent<u32, ScreenPx>>,
    /// Color to clear to on the next present, if a clear was requested.
    pending_clear: Option<Color>,
    window: Rc<winit::window::Window>,
}

/// An offscreen texture a renderer can draw into.
pub struct NativeTexture {
    texture: wgpu::Texture,
}

/// Enumerates render drivers: one per backend that has an adapter, in
/// backend order.
pub(super) fn render_drivers(instance: &wgpu::Instance) -> Vec<(wgpu::Backend, RendererInfo)> {
    let mut drivers: Vec<(wgpu::Backend, RendererInfo)> = Vec::new();

    for adapter in instance.enumerate_adapters(wgpu::Backends::all()) {
        let adapter_info = adapter.get_info();
        if drivers.iter().any(|(backend, _)| *backend == adapter_info.backend) {
            continue;
        }

        let limits = adapter.limits();
        drivers.push((
            adapter_info.backend,
            RendererInfo {
                name: String::from(backend_name(adapter_info.backend)),
                flags: adapter_flags(adapter_info.device_type),
                max_texture_size: Extent::new(
                    limits.max_texture_dimension_2d,
                    limits.max_texture_dimension_2d,
                ),
            },
        ));
    }

    drivers.sort_by_key(|(backend, _)| *backend as u32);
    drivers
}

impl NativeRenderer {
    pub(super) fn new(
        instance: &wgpu::Instance,
        window: Rc<winit::window::Window>,
        backend: Option<wgpu::Backend>,
        flags: RendererFlags,
    ) -> Result<Self> {
        // SAFETY: The renderer holds a strong reference to the window, and
        // the surface is declared before it so it is dropped first.
        let surface = unsafe { instance.create_surface(window.as_ref()) }
            .map_err(|err| Error::Surface(err.to_string()))?;

        let software = flags.contains(RendererFlags::SOFTWARE);

        let adapter = match backend {
            Some(backend) => instance
                .enumerate_adapters(wgpu::Backends::from(backend))
                .filter(|adapter| adapter.is_surface_supported(&surface))
                .find(|adapter| {
                    !software || adapter.get_info().device_type == wgpu::DeviceType::Cpu
                }),
            None => pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                force_fallback_adapter: software,
                compatible_surface: Some(&surface),
            })),
        }
        .ok_or(Error::NoAdapter)?;

        let adapter_info = adapter.get_info();
        tracing::debug!(
            "renderer adapter: {} ({:?})",
            adapter_info.name,
            adapter_info.backend
        );

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("skeleton-renderer"),
                features: wgpu::Features::empty(),
                limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
            },
            None,
        ))
        .map_err(|err| Error::Device(err.to_string()))?;

        let capabilities = surface.get_capabilities(&adapter);
        let format = capabilities
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| capabilities.formats.first().copied())
            .ok_or(Error::NoAdapter)?;

        let size = window.inner_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if flags.contains(RendererFlags::PRESENT_VSYNC) {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let limits = device.limits();
        let mut renderer_flags = adapter_flags(adapter_info.device_type) | RendererFlags::TARGET_TEXTURE;
        if flags.contains(RendererFlags::PRESENT_VSYNC) {
            renderer_flags |= RendererFlags::PRESENT_VSYNC;
        }

        Ok(Self {
            surface,
            device,
            queue,
            config,
            info: RendererInfo {
                name: String::from(backend_name(adapter_info.backend)),
                flags: renderer_flags,
                max_texture_size: Extent::new(
                    limits.max_texture_dimension_2d,
                    limits.max_texture_dimension_2d,
                ),
            },
            draw_color: Color::BLACK,
            logical_size: None,
            pending_clear: None,
            window,
        })
    }

    pub(super) fn clear(&mut self) {
        self.pending_clear = Some(self.draw_color);
    }

    /// Acquires the next swapchain image, applies any pending clear, and
    /// presents it.
    pub(super) fn present(&mut self) -> Result<()> {
        let size = self.window.inner_size();
        if size.width == 0 || size.height == 0 {
            // Minimized; nothing to present to.
            return Ok(());
        }

        if size.width != self.config.width || size.height != self.config.height {
            self.config.width = size.width;
            self.config.height = size.height;
            self.surface.configure(&self.device, &self.config);
        }

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(Error::Device(String::from("out of memory")));
            }
            Err(err) => {
                tracing::warn!("skipping frame: {err}");
                return Ok(());
            }
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let load = match self.pending_clear.take() {
            Some(color) => wgpu::LoadOp::Clear(color.into()),
            None => wgpu::LoadOp::Load,
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("clear-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations { load, store: true },
                })],
                depth_stencil_attachment: None,
            });

            let (x, y, width, height) = self.viewport();
            pass.set_viewport(x, y, width, height, 0.0, 1.0);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        Ok(())
    }

    /// The area of the surface that drawing maps to: all of it, or the
    /// largest centered rectangle with the logical size's aspect ratio.
    fn viewport(&self) -> (f32, f32, f32, f32) {
        let surface_width = self.config.width as f32;
        let surface_height = self.config.height as f32;

        match self.logical_size {
            Some(logical) if logical.width > 0 && logical.height > 0 => {
                let scale = (surface_width / logical.width as f32)
                    .min(surface_height / logical.height as f32);
                let width = logical.width as f32 * scale;
                let height = logical.height as f32 * scale;
                (
                    ((surface_width - width) / 2.0).floor(),
                    ((surface_height - height) / 2.0).floor(),
                    width,
                    height,
                )
            }
            _ => (0.0, 0.0, surface_width, surface_height),
        }
    }

    pub(super) fn create_render_target(&self, size: Extent<u32, ScreenPx>) -> Result<NativeTexture> {
        let max = self.info.max_texture_size;
        if size.width == 0 || size.height == 0 || size.width > max.width || size.height > max.height
        {
            return Err(Error::Device(format!(
                "render target size {}x{} is outside 1x1..{}x{}",
                size.width, size.height, max.width, max.height
            )));
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("render-target"),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.config.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        Ok(NativeTexture { texture })
    }
}

impl NativeTexture {
    pub(super) fn destroy(self) {
        self.texture.destroy();
    }
}

fn adapter_flags(device_type: wgpu::DeviceType) -> RendererFlags {
    match device_type {
        wgpu::DeviceType::Cpu => RendererFlags::SOFTWARE,
        _ => RendererFlags::ACCELERATED,
    }
}

fn backend_name(backend: wgpu::Backend) -> &'static str {
    match backend {
        wgpu::Backend::Empty => "empty",
        wgpu::Backend::Vulkan => "vulkan",
        wgpu::Backend::Metal => "metal",
        wgpu::Backend::Dx12 => "direct3d12",
        wgpu::Backend::Dx11 => "direct3d11",
        wgpu::Backend::Gl => "opengl",
        wgpu::Backend::BrowserWebGpu => "webgpu",
    }
}
