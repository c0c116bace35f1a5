use geometry::{Extent, ScreenPx};
use shell::{Platform, WindowId};

/// One window together with the renderer drawing into it and an optional
/// offscreen render target.
pub struct WindowContext<P: Platform> {
    id: WindowId,
    window: P::Window,
    renderer: Option<P::Renderer>,
    target: Option<P::Texture>,
}

impl<P: Platform> WindowContext<P> {
    pub(crate) fn new(id: WindowId, window: P::Window) -> Self {
        Self {
            id,
            window,
            renderer: None,
            target: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> WindowId {
        self.id
    }

    #[must_use]
    pub fn window(&self) -> &P::Window {
        &self.window
    }

    pub(crate) fn window_mut(&mut self) -> &mut P::Window {
        &mut self.window
    }

    #[must_use]
    pub fn renderer(&self) -> Option<&P::Renderer> {
        self.renderer.as_ref()
    }

    pub(crate) fn renderer_mut(&mut self) -> Option<&mut P::Renderer> {
        self.renderer.as_mut()
    }

    pub(crate) fn set_renderer(&mut self, renderer: P::Renderer) {
        self.renderer = Some(renderer);
    }

    #[must_use]
    pub fn target(&self) -> Option<&P::Texture> {
        self.target.as_ref()
    }

    /// Creates a render target for this window's renderer, replacing (and
    /// destroying) any previous one. Fails if the window has no renderer.
    pub fn attach_render_target(
        &mut self,
        platform: &mut P,
        size: Extent<u32, ScreenPx>,
    ) -> shell::Result<()> {
        let renderer = self
            .renderer
            .as_ref()
            .ok_or(shell::Error::NotInitialized("renderer"))?;

        let texture = platform.create_render_target(renderer, size)?;
        if let Some(old) = self.target.replace(texture) {
            platform.destroy_texture(old);
        }
        Ok(())
    }

    /// Destroys the target, then the renderer, then the window.
    pub(crate) fn release(self, platform: &mut P) {
        if let Some(target) = self.target {
            platform.destroy_texture(target);
        }
        if let Some(renderer) = self.renderer {
            platform.destroy_renderer(renderer);
        }
        platform.destroy_window(self.window);
    }
}
