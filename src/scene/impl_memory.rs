use crate::scene::anchor::Anchor;
use crate::scene::interface::RenderSurface;

/// Scene graph kept in memory; the GUI draws it every repaint.
#[derive(Debug, Default)]
pub struct Scene {
    anchors: Vec<Anchor>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderSurface for Scene {
    fn clear_anchors(&mut self) {
        self.anchors.clear();
    }

    fn add_anchor(&mut self, anchor: Anchor) {
        self.anchors.push(anchor);
    }

    fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::anchor::{label_anchor, LabelStyle};

    #[test]
    fn test_clear_then_add_leaves_one_anchor() {
        let style = LabelStyle::default();
        let mut scene = Scene::new();
        scene.add_anchor(label_anchor("whale", &style));

        scene.clear_anchors();
        scene.add_anchor(label_anchor("banana", &style));

        assert_eq!(scene.anchors().len(), 1);
        assert_eq!(scene.anchors()[0].texts().collect::<Vec<_>>(), vec!["banana"]);
    }
}
