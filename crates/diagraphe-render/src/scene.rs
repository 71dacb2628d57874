//! Scene composition: frame resolution, element dispatch and draw-order assembly.

use crate::Result;
use crate::elements;
use crate::frame::{ContentFrame, FrameOptions};
use crate::rich::{PassthroughRichContent, RichContentRenderer};
use crate::surface::{DrawingSurface, SceneNode, SceneSurface};
use diagraphe_core::geom::Transform;
use diagraphe_core::{Classes, DiagramConfig, DisplaySize, ElementCommon};
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone)]
pub struct RenderOptions {
    pub frame: FrameOptions,
    /// Makes generated ids (arrow markers) deterministic: `<id>-arrow-<n>`.
    pub diagram_id: Option<String>,
    pub rich_content: Arc<dyn RichContentRenderer + Send + Sync>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            frame: FrameOptions::default(),
            diagram_id: None,
            rich_content: Arc::new(PassthroughRichContent),
        }
    }
}

impl std::fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderOptions")
            .field("frame", &self.frame)
            .field("diagram_id", &self.diagram_id)
            .finish_non_exhaustive()
    }
}

impl RenderOptions {
    pub fn with_diagram_id(mut self, id: impl Into<String>) -> Self {
        self.diagram_id = Some(id.into());
        self
    }

    pub fn with_rich_content(
        mut self,
        renderer: Arc<dyn RichContentRenderer + Send + Sync>,
    ) -> Self {
        self.rich_content = renderer;
        self
    }
}

/// Pixel size assigned to one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementGeometry {
    pub width: f64,
    pub height: f64,
}

/// Fills in an element's missing width/height from the content frame.
pub fn resolve_geometry(common: &ElementCommon, frame: &ContentFrame) -> ElementGeometry {
    ElementGeometry {
        width: common.width.unwrap_or(frame.content_width),
        height: common.height.unwrap_or(frame.content_height),
    }
}

/// Per-render state shared by the element renderers.
pub struct RenderContext<'a> {
    pub frame: &'a ContentFrame,
    pub options: &'a RenderOptions,
    marker_seq: usize,
}

impl<'a> RenderContext<'a> {
    pub fn new(frame: &'a ContentFrame, options: &'a RenderOptions) -> Self {
        Self {
            frame,
            options,
            marker_seq: 0,
        }
    }

    /// A fresh arrow-marker id, random unless a diagram id is configured.
    pub fn next_marker_id(&mut self) -> String {
        let n = self.marker_seq;
        self.marker_seq += 1;
        match &self.options.diagram_id {
            Some(id) => format!("{id}-arrow-{n}"),
            None => {
                let uuid = uuid::Uuid::new_v4().simple().to_string();
                format!("arrow-{}", &uuid[..9])
            }
        }
    }
}

/// Renders every element of `config`, in document order, into `surface`.
///
/// Returns the content group: a group translated by the frame margins that holds one child per
/// element.
pub fn render_scene<S: DrawingSurface>(
    config: &DiagramConfig,
    options: &RenderOptions,
    surface: &mut S,
) -> Result<S::Handle> {
    let frame = ContentFrame::resolve(config, &options.frame)?;
    render_in_frame(config, &frame, options, surface)
}

fn render_in_frame<S: DrawingSurface>(
    config: &DiagramConfig,
    frame: &ContentFrame,
    options: &RenderOptions,
    surface: &mut S,
) -> Result<S::Handle> {
    let content = surface.group();
    let t = frame.translation();
    surface.set_transform(&content, &Transform::translation(t.x, t.y));

    let mut ctx = RenderContext::new(frame, options);
    for (index, element) in config.elements.iter().enumerate() {
        let geometry = resolve_geometry(&element.common, frame);
        tracing::debug!(
            index,
            nature = element.nature(),
            width = geometry.width,
            height = geometry.height,
            "rendering element"
        );
        let node = elements::render_element(surface, &mut ctx, element, geometry)
            .map_err(|e| e.in_element(index, element.nature()))?;
        surface.append_child(&content, node);
    }
    Ok(content)
}

/// A composed scene: root `<svg>` attributes plus the content tree.
#[derive(Debug, Clone, Serialize)]
pub struct Scene {
    pub width: DisplaySize,
    pub height: DisplaySize,
    pub responsive: bool,
    pub classes: Classes,
    pub frame: ContentFrame,
    pub root: SceneNode,
}

impl Scene {
    /// Pins fill-parent sizes to the resolved pixel size (rasterizers need absolute sizes).
    pub fn with_resolved_size(mut self) -> Self {
        self.width = DisplaySize::Pixels(self.frame.display_width);
        self.height = DisplaySize::Pixels(self.frame.display_height);
        self.responsive = false;
        self
    }
}

/// [`render_scene`] into a fresh [`SceneSurface`].
pub fn compose_scene(config: &DiagramConfig, options: &RenderOptions) -> Result<Scene> {
    let frame = ContentFrame::resolve(config, &options.frame)?;
    let mut surface = SceneSurface::new();
    let content = render_in_frame(config, &frame, options, &mut surface)?;
    Ok(Scene {
        width: config.width,
        height: config.height,
        responsive: config.responsive,
        classes: config.svg.classes.clone(),
        frame,
        root: surface.finish(content),
    })
}
