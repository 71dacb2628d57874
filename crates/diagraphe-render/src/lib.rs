#![forbid(unsafe_code)]

//! Headless layout and rendering for diagraphe scenes.
//!
//! A validated [`DiagramConfig`] goes through the [`frame`] resolution, then every element is
//! drawn in document order onto a [`surface::DrawingSurface`] by [`render_scene`].
//! [`compose_scene`] records the result into an owned [`Scene`] which [`svg::render_scene_svg`]
//! serializes.

pub mod elements;
pub mod frame;
pub mod mapper;
pub mod rich;
pub mod sample;
pub mod scene;
pub mod surface;
pub mod svg;
pub mod tree;

pub use frame::{ContentFrame, FrameOptions, ViewBox};
pub use mapper::CoordinateMapper;
pub use rich::{PassthroughRichContent, RichContentRenderer};
pub use sample::{MAX_CURVE_SAMPLES, SampleRange, polyline_path, sample};
pub use scene::{
    ElementGeometry, RenderContext, RenderOptions, Scene, compose_scene, render_scene,
    resolve_geometry,
};
pub use surface::{DrawingSurface, Primitive, SceneNode, SceneSurface};
pub use svg::render_scene_svg;
pub use tree::{TreeLayout, TreeLayoutOptions, layout_tree};

use diagraphe_core::DiagramConfig;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] diagraphe_core::Error),
    #[error("scene JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Attributes a configuration error to the element at `index`.
    pub fn in_element(self, index: usize, nature: &str) -> Self {
        match self {
            Error::Config(e) => Error::Config(e.in_element(index, nature)),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Composes `config` and serializes it as an SVG document.
pub fn render_svg(config: &DiagramConfig, options: &RenderOptions) -> Result<String> {
    let scene = compose_scene(config, options)?;
    Ok(render_scene_svg(&scene))
}

/// The composed scene as JSON, for debugging layouts.
pub fn scene_json(scene: &Scene, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(scene)?
    } else {
        serde_json::to_string(scene)?
    })
}

#[cfg(test)]
mod tests;
