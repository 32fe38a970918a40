use crate::view::Scene;

/// A GPU (or test) backend able to present a `Scene`.
pub trait RenderBackend {
    /// Physical pixel size of the target; called on resize.
    fn configure_surface(&mut self, width: u32, height: u32);
    fn frame(&mut self, scene: &Scene);
}
