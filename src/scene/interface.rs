use crate::scene::anchor::Anchor;

/// Scene mutation primitives. Only the rendering thread calls these.
pub trait RenderSurface {
    fn clear_anchors(&mut self);
    fn add_anchor(&mut self, anchor: Anchor);
    fn anchors(&self) -> &[Anchor];
}
