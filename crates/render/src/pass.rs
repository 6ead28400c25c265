use crate::backend::RenderBackend;

/// Paired notifications around one camera's render pass.
pub trait PassHooks {
    fn begin_camera_pass(&mut self, backend: &mut dyn RenderBackend);
    fn end_camera_pass(&mut self, backend: &mut dyn RenderBackend);
}

/// A camera pass in progress. Beginning happens on construction, ending on
/// drop, so the end hook runs on every exit path.
pub struct PassScope<'a, H: PassHooks + ?Sized, B: RenderBackend> {
    hooks: &'a mut H,
    backend: &'a mut B,
}

impl<'a, H: PassHooks + ?Sized, B: RenderBackend> PassScope<'a, H, B> {
    pub fn begin(hooks: &'a mut H, backend: &'a mut B) -> Self {
        hooks.begin_camera_pass(backend);
        Self { hooks, backend }
    }

    /// Backend to submit this pass's draws to.
    pub fn backend(&mut self) -> &mut B {
        self.backend
    }
}

impl<H: PassHooks + ?Sized, B: RenderBackend> Drop for PassScope<'_, H, B> {
    fn drop(&mut self) {
        self.hooks.end_camera_pass(self.backend);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{RecordingBackend, RenderCommand};
    use glam::Mat4;

    struct Widen;

    impl PassHooks for Widen {
        fn begin_camera_pass(&mut self, backend: &mut dyn RenderBackend) {
            backend.set_culling_matrix(Mat4::from_scale(glam::Vec3::splat(2.0)));
        }

        fn end_camera_pass(&mut self, backend: &mut dyn RenderBackend) {
            backend.reset_culling_matrix();
        }
    }

    #[test]
    fn scope_pairs_begin_and_end() {
        let mut hooks = Widen;
        let mut backend = RecordingBackend::new();
        {
            let mut pass = PassScope::begin(&mut hooks, &mut backend);
            assert!(pass.backend().culling_override().is_some());
        }
        assert!(backend.culling_override().is_none());
        assert!(matches!(
            backend.commands().last(),
            Some(RenderCommand::ResetCulling)
        ));
    }

    #[test]
    fn end_runs_on_early_return() {
        fn render(hooks: &mut Widen, backend: &mut RecordingBackend, bail: bool) -> Option<()> {
            let _pass = PassScope::begin(hooks, backend);
            if bail {
                return None;
            }
            Some(())
        }

        let mut backend = RecordingBackend::new();
        assert!(render(&mut Widen, &mut backend, true).is_none());
        assert!(backend.culling_override().is_none());
    }
}
