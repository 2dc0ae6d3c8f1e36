//! Sub-renderer registry.

use crate::backend::Frame;
use crate::context::RenderContext;
use crate::traits::SubRenderer;

/// Ordered set of sub-renderers drawn into one pass.
///
/// Sub-renderers are kept sorted by priority (background first) and
/// addressed by name.
#[derive(Default)]
pub struct RendererRegistry {
    sub_renderers: Vec<Box<dyn SubRenderer>>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sub-renderer, replacing any with the same name
    pub fn register<R: SubRenderer + 'static>(&mut self, renderer: R) {
        tracing::debug!("Registering sub-renderer '{}'", renderer.name());
        if let Some(mut old) = self.unregister(renderer.name()) {
            old.on_destroy();
        }

        let at = self
            .sub_renderers
            .partition_point(|r| r.priority() <= renderer.priority());
        self.sub_renderers.insert(at, Box::new(renderer));
    }

    pub fn unregister(&mut self, name: &str) -> Option<Box<dyn SubRenderer>> {
        let pos = self.sub_renderers.iter().position(|r| r.name() == name)?;
        Some(self.sub_renderers.remove(pos))
    }

    /// Toggle a sub-renderer by name; false if there is none
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.sub_renderers.iter_mut().find(|r| r.name() == name) {
            Some(renderer) => {
                renderer.set_enabled(enabled);
                true
            }
            None => false,
        }
    }

    /// Names in draw order
    pub fn names(&self) -> Vec<&str> {
        self.sub_renderers.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.sub_renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sub_renderers.is_empty()
    }

    pub fn init_all(&mut self, ctx: &RenderContext) {
        for renderer in &mut self.sub_renderers {
            renderer.on_init(ctx);
        }
    }

    pub fn resize_all(&mut self, ctx: &RenderContext, width: u32, height: u32) {
        for renderer in &mut self.sub_renderers {
            renderer.on_resize(ctx, width, height);
        }
    }

    /// Upload per-frame data for every enabled sub-renderer
    pub fn prepare_all(&mut self, ctx: &RenderContext, frame: &Frame<'_>) {
        for renderer in self.sub_renderers.iter_mut().filter(|r| r.is_enabled()) {
            renderer.prepare(ctx, frame);
        }
    }

    pub fn render_all<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, ctx: &'a RenderContext) {
        for renderer in self.sub_renderers.iter().filter(|r| r.is_enabled()) {
            renderer.render(pass, ctx);
        }
    }

    pub fn destroy_all(&mut self) {
        for renderer in &mut self.sub_renderers {
            renderer.on_destroy();
        }
        self.sub_renderers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sub_renderers::priorities;

    struct Stub {
        name: &'static str,
        priority: i32,
        enabled: bool,
    }

    impl Stub {
        fn new(name: &'static str, priority: i32) -> Self {
            Self {
                name,
                priority,
                enabled: true,
            }
        }
    }

    impl SubRenderer for Stub {
        fn name(&self) -> &str {
            self.name
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn is_enabled(&self) -> bool {
            self.enabled
        }

        fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }

        fn on_init(&mut self, _ctx: &RenderContext) {}
        fn prepare(&mut self, _ctx: &RenderContext, _frame: &Frame<'_>) {}
        fn render<'a>(&'a self, _pass: &mut wgpu::RenderPass<'a>, _ctx: &'a RenderContext) {}
    }

    #[test]
    fn test_draw_order_follows_priority() {
        let mut registry = RendererRegistry::new();
        registry.register(Stub::new("mesh", priorities::MESH));
        registry.register(Stub::new("highlight", priorities::MESH + 10));
        registry.register(Stub::new("sky", priorities::SKY));

        assert_eq!(registry.names(), vec!["sky", "mesh", "highlight"]);
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = RendererRegistry::new();
        registry.register(Stub::new("sky", priorities::SKY));
        registry.register(Stub::new("sky", priorities::SKY));
        assert_eq!(registry.len(), 1);

        assert!(registry.unregister("sky").is_some());
        assert!(registry.unregister("sky").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_toggle_by_name() {
        let mut registry = RendererRegistry::new();
        registry.register(Stub::new("sky", priorities::SKY));

        assert!(registry.set_enabled("sky", false));
        assert!(!registry.set_enabled("grid", false));
        assert!(!registry.sub_renderers[0].is_enabled());
    }
}
