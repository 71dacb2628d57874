//! The drawing-surface seam and the built-in scene-tree surface.
//!
//! Renderers only talk to a [`DrawingSurface`]: they create primitives, set presentation
//! attributes on them and append them to groups. [`SceneSurface`] records these calls into an
//! owned [`SceneNode`] tree which `crate::svg` serializes.

use diagraphe_core::geom::{Point, Rect, Transform};
use diagraphe_core::{Classes, TextAnchor};
use serde::Serialize;

/// SVG `dominant-baseline`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Baseline {
    #[default]
    Middle,
    Hanging,
}

impl Baseline {
    pub fn as_str(self) -> &'static str {
        match self {
            Baseline::Middle => "middle",
            Baseline::Hanging => "hanging",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub font_size: f64,
    pub anchor: TextAnchor,
    pub baseline: Option<Baseline>,
}

impl TextStyle {
    pub fn new(font_size: f64, anchor: TextAnchor) -> Self {
        Self {
            font_size,
            anchor,
            baseline: None,
        }
    }

    pub fn with_baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = Some(baseline);
        self
    }
}

/// An embedded HTML region (SVG `foreignObject`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RichContentRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Lets the content overflow a 1x1 anchor and centres it on `(x, y)`.
    pub centered: bool,
    pub content_classes: Classes,
}

/// An arrowhead marker definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerDef {
    pub id: String,
    pub width: f64,
    pub height: f64,
    pub ref_x: f64,
    pub ref_y: f64,
    pub path: String,
    pub fill: String,
}

impl MarkerDef {
    /// A filled triangular arrowhead of side `size`, anchored near its tip.
    pub fn arrow(id: impl Into<String>, size: f64) -> Self {
        Self {
            id: id.into(),
            width: size,
            height: size,
            ref_x: size - 1.0,
            ref_y: size / 2.0,
            path: format!(
                "M 0 0 L {} {} L 0 {} Z",
                crate::svg::fmt(size),
                crate::svg::fmt(size / 2.0),
                crate::svg::fmt(size)
            ),
            fill: "black".to_string(),
        }
    }
}

/// Drawing operations the renderers need.
///
/// Primitive constructors return detached handles; nothing is visible until it is appended
/// (directly or through its ancestors) to the root handed to the composer.
pub trait DrawingSurface {
    type Handle: Clone;

    fn group(&mut self) -> Self::Handle;
    fn rect(&mut self, bounds: Rect, corner_radius: f64) -> Self::Handle;
    fn circle(&mut self, center: Point, radius: f64) -> Self::Handle;
    fn line(&mut self, from: Point, to: Point) -> Self::Handle;
    fn path(&mut self, d: &str) -> Self::Handle;
    fn text(&mut self, at: Point, content: &str, style: &TextStyle) -> Self::Handle;
    /// `html` is already processed by the rich-content renderer and is embedded verbatim.
    fn rich_content(&mut self, region: &RichContentRegion, html: &str) -> Self::Handle;
    fn marker(&mut self, marker: &MarkerDef) -> Self::Handle;

    fn set_classes(&mut self, node: &Self::Handle, classes: &Classes);
    fn set_opacity(&mut self, node: &Self::Handle, opacity: f64);
    fn set_stroke(&mut self, node: &Self::Handle, stroke: &str);
    fn set_stroke_width(&mut self, node: &Self::Handle, width: f64);
    fn set_fill(&mut self, node: &Self::Handle, fill: &str);
    fn set_marker_end(&mut self, node: &Self::Handle, marker_id: &str);
    fn set_transform(&mut self, node: &Self::Handle, transform: &Transform);

    fn append_child(&mut self, parent: &Self::Handle, child: Self::Handle);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Group,
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rx: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Path {
        d: String,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        style: TextStyle,
    },
    RichContent {
        region: RichContentRegion,
        html: String,
    },
    Marker(MarkerDef),
}

/// A 2D affine transform in SVG's `matrix(a b c d e f)` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub fn is_translation(&self) -> bool {
        self.a == 1.0 && self.b == 0.0 && self.c == 0.0 && self.d == 1.0
    }
}

impl From<&Transform> for Affine {
    fn from(t: &Transform) -> Self {
        Self {
            a: t.m11,
            b: t.m12,
            c: t.m21,
            d: t.m22,
            e: t.m31,
            f: t.m32,
        }
    }
}

/// Presentation attributes set through the `set_*` operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Attributes {
    #[serde(skip_serializing_if = "Classes::is_empty")]
    pub classes: Classes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<Affine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneNode {
    #[serde(flatten)]
    pub primitive: Primitive,
    #[serde(skip_serializing_if = "is_default_attrs")]
    pub attrs: Attributes,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneNode>,
}

fn is_default_attrs(a: &Attributes) -> bool {
    *a == Attributes::default()
}

impl SceneNode {
    pub fn new(primitive: Primitive) -> Self {
        Self {
            primitive,
            attrs: Attributes::default(),
            children: Vec::new(),
        }
    }

    /// Pre-order walk over this node and its descendants.
    pub fn walk(&self, f: &mut impl FnMut(&SceneNode)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }

    /// Mutable post-order walk; children are visited before their parent.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut SceneNode)) {
        for child in &mut self.children {
            child.walk_mut(f);
        }
        f(self);
    }

    pub fn count(&self) -> usize {
        let mut n = 0;
        self.walk(&mut |_| n += 1);
        n
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

struct Slot {
    node: SceneNode,
    children: Vec<NodeId>,
}

/// Arena-backed [`DrawingSurface`] producing an owned [`SceneNode`] tree.
#[derive(Default)]
pub struct SceneSurface {
    slots: Vec<Slot>,
}

impl SceneSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, primitive: Primitive) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Slot {
            node: SceneNode::new(primitive),
            children: Vec::new(),
        });
        id
    }

    fn attrs(&mut self, id: &NodeId) -> &mut Attributes {
        &mut self.slots[id.0].node.attrs
    }

    /// Detaches the tree rooted at `root`. Nodes never appended under it are dropped.
    pub fn finish(mut self, root: NodeId) -> SceneNode {
        let mut taken: Vec<Option<Slot>> = self.slots.drain(..).map(Some).collect();
        build(&mut taken, root)
    }
}

fn build(slots: &mut [Option<Slot>], id: NodeId) -> SceneNode {
    let Some(Slot { mut node, children }) = slots.get_mut(id.0).and_then(Option::take) else {
        return SceneNode::new(Primitive::Group);
    };
    node.children = children.into_iter().map(|c| build(slots, c)).collect();
    node
}

impl DrawingSurface for SceneSurface {
    type Handle = NodeId;

    fn group(&mut self) -> NodeId {
        self.push(Primitive::Group)
    }

    fn rect(&mut self, bounds: Rect, corner_radius: f64) -> NodeId {
        self.push(Primitive::Rect {
            x: bounds.origin.x,
            y: bounds.origin.y,
            width: bounds.size.width,
            height: bounds.size.height,
            rx: corner_radius,
        })
    }

    fn circle(&mut self, center: Point, radius: f64) -> NodeId {
        self.push(Primitive::Circle {
            cx: center.x,
            cy: center.y,
            r: radius,
        })
    }

    fn line(&mut self, from: Point, to: Point) -> NodeId {
        self.push(Primitive::Line {
            x1: from.x,
            y1: from.y,
            x2: to.x,
            y2: to.y,
        })
    }

    fn path(&mut self, d: &str) -> NodeId {
        self.push(Primitive::Path { d: d.to_string() })
    }

    fn text(&mut self, at: Point, content: &str, style: &TextStyle) -> NodeId {
        self.push(Primitive::Text {
            x: at.x,
            y: at.y,
            content: content.to_string(),
            style: style.clone(),
        })
    }

    fn rich_content(&mut self, region: &RichContentRegion, html: &str) -> NodeId {
        self.push(Primitive::RichContent {
            region: region.clone(),
            html: html.to_string(),
        })
    }

    fn marker(&mut self, marker: &MarkerDef) -> NodeId {
        self.push(Primitive::Marker(marker.clone()))
    }

    fn set_classes(&mut self, node: &NodeId, classes: &Classes) {
        self.attrs(node).classes = classes.clone();
    }

    fn set_opacity(&mut self, node: &NodeId, opacity: f64) {
        self.attrs(node).opacity = Some(opacity);
    }

    fn set_stroke(&mut self, node: &NodeId, stroke: &str) {
        self.attrs(node).stroke = Some(stroke.to_string());
    }

    fn set_stroke_width(&mut self, node: &NodeId, width: f64) {
        self.attrs(node).stroke_width = Some(width);
    }

    fn set_fill(&mut self, node: &NodeId, fill: &str) {
        self.attrs(node).fill = Some(fill.to_string());
    }

    fn set_marker_end(&mut self, node: &NodeId, marker_id: &str) {
        self.attrs(node).marker_end = Some(marker_id.to_string());
    }

    fn set_transform(&mut self, node: &NodeId, transform: &Transform) {
        self.attrs(node).transform = Some(Affine::from(transform));
    }

    fn append_child(&mut self, parent: &NodeId, child: NodeId) {
        self.slots[parent.0].children.push(child);
    }
}
