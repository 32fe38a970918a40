use crate::ViewId;

/// Failures raised while turning a `View` tree into a frame.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("layout engine failed: {0}")]
    Engine(#[from] taffy::TaffyError),
    #[error("view {0} has no layout node")]
    MissingNode(ViewId),
}
