#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneAlignment {
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorTarget {
    Plane(PlaneAlignment),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlignment {
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum LineBreakMode {
    WordWrap,
    TruncatingTail,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: [u8; 3],
    pub roughness: f32,
    pub metallic: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    pub extrusion_depth: f32,
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub alignment: TextAlignment,
    pub line_break: LineBreakMode,
    pub max_chars: usize,
    /// Moves the text toward the viewer so it does not z-fight with the plane.
    pub depth_offset: f32,
    pub material: Material,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            extrusion_depth: 0.002,
            font_size: 0.03,
            font_weight: FontWeight::Bold,
            alignment: TextAlignment::Center,
            line_break: LineBreakMode::TruncatingTail,
            max_chars: 24,
            depth_offset: -0.01,
            material: Material {
                color: [255, 255, 255],
                roughness: 1.0,
                metallic: true,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextMesh {
    pub text: String,
    pub extrusion_depth: f32,
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub alignment: TextAlignment,
    pub line_break: LineBreakMode,
}

impl TextMesh {
    pub fn generate(text: &str, style: &LabelStyle) -> Self {
        let text = match style.line_break {
            LineBreakMode::TruncatingTail => truncate_tail(text, style.max_chars),
            LineBreakMode::WordWrap => text.to_string(),
        };

        Self {
            text,
            extrusion_depth: style.extrusion_depth,
            font_size: style.font_size,
            font_weight: style.font_weight,
            alignment: style.alignment,
            line_break: style.line_break,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextEntity {
    pub mesh: TextMesh,
    pub material: Material,
    pub position: [f32; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    pub target: AnchorTarget,
    pub children: Vec<TextEntity>,
}

impl Anchor {
    pub fn new(target: AnchorTarget) -> Self {
        Self {
            target,
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, child: TextEntity) {
        self.children.push(child);
    }

    /// Text of every child, in insertion order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|child| child.mesh.text.as_str())
    }
}

/// Anchor on a horizontal plane holding one text entity for `label`.
pub fn label_anchor(label: &str, style: &LabelStyle) -> Anchor {
    let mut position = [0.0, 0.0, 0.0];
    position[2] += style.depth_offset;

    let mut anchor = Anchor::new(AnchorTarget::Plane(PlaneAlignment::Horizontal));
    anchor.add_child(TextEntity {
        mesh: TextMesh::generate(label, style),
        material: style.material.clone(),
        position,
    });
    anchor
}

pub fn truncate_tail(text: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let mut truncated: String = text.chars().take(max_chars - 1).collect();
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_anchor_shape() {
        let style = LabelStyle::default();
        let anchor = label_anchor("golden retriever", &style);

        assert_eq!(
            anchor.target,
            AnchorTarget::Plane(PlaneAlignment::Horizontal)
        );
        assert_eq!(anchor.children.len(), 1);

        let text = &anchor.children[0];
        assert_eq!(text.mesh.text, "golden retriever");
        assert_eq!(text.mesh.extrusion_depth, 0.002);
        assert_eq!(text.mesh.font_size, 0.03);
        assert_eq!(text.mesh.font_weight, FontWeight::Bold);
        assert_eq!(text.mesh.alignment, TextAlignment::Center);
        assert_eq!(text.mesh.line_break, LineBreakMode::TruncatingTail);
        assert_eq!(text.position, [0.0, 0.0, -0.01]);
    }

    #[test]
    fn test_long_label_is_tail_truncated() {
        let style = LabelStyle {
            max_chars: 8,
            ..LabelStyle::default()
        };
        let anchor = label_anchor("sunglasses dark glasses", &style);

        assert_eq!(anchor.texts().collect::<Vec<_>>(), vec!["sunglas…"]);
    }

    #[test]
    fn test_truncate_tail_edges() {
        assert_eq!(truncate_tail("whale", 5), "whale");
        assert_eq!(truncate_tail("whales", 5), "whal…");
        assert_eq!(truncate_tail("whale", 0), "");
        assert_eq!(truncate_tail("crème brûlée", 6), "crème…");
    }

    #[test]
    fn test_word_wrap_keeps_text() {
        let style = LabelStyle {
            max_chars: 3,
            line_break: LineBreakMode::WordWrap,
            ..LabelStyle::default()
        };
        assert_eq!(TextMesh::generate("whale", &style).text, "whale");
    }
}
