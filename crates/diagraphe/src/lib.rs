#![forbid(unsafe_code)]

//! `diagraphe` renders declarative 2D scene descriptions (shapes, axes and curves, probability
//! trees, heatmaps, embedded HTML) to SVG, headlessly.
//!
//! # Features
//!
//! - `render`: enable layout + SVG rendering (`diagraphe::render`)
//! - `raster`: enable PNG/JPG/PDF output via pure-Rust SVG rasterization/conversion

pub use diagraphe_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use diagraphe_render::surface::{
        Baseline, DrawingSurface, MarkerDef, Primitive, RichContentRegion, SceneNode,
        SceneSurface, TextStyle,
    };
    pub use diagraphe_render::{
        ContentFrame, CoordinateMapper, FrameOptions, PassthroughRichContent, RenderOptions,
        RichContentRenderer, Scene, TreeLayout, TreeLayoutOptions, compose_scene, layout_tree,
        render_scene, render_scene_svg, scene_json,
    };

    mod readable;
    pub use readable::{html_to_text, rich_content_as_text};

    #[cfg(feature = "raster")]
    pub mod raster;

    use diagraphe_core::{ConfigFormat, DiagramConfig};
    use std::sync::Arc;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Parse(#[from] diagraphe_core::Error),
        #[error(transparent)]
        Render(#[from] diagraphe_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Converts an arbitrary string into a conservative SVG `id` token suitable for embedding
    /// multiple scenes in the same document.
    ///
    /// The id prefixes generated marker ids (`<id>-arrow-<n>`), so two inlined scenes with the
    /// same id would collide.
    ///
    /// This helper:
    /// - trims whitespace
    /// - replaces unsupported characters with `-`
    /// - ensures the id starts with an ASCII letter by prefixing `d-` when needed
    pub fn sanitize_svg_id(raw: &str) -> String {
        let raw = raw.trim();
        if raw.is_empty() {
            return "d-untitled".to_string();
        }

        let mut out = String::with_capacity(raw.len() + 4);
        for ch in raw.chars() {
            let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.';
            out.push(if ok { ch } else { '-' });
        }

        if !out.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            out.insert_str(0, "d-");
        }

        while out.contains("--") {
            out = out.replace("--", "-");
        }
        let out = out.trim_matches('-');
        if out.is_empty() || out == "d" {
            return "d-untitled".to_string();
        }
        out.to_string()
    }

    pub fn parse_config(text: &str, format: ConfigFormat) -> Result<DiagramConfig> {
        Ok(DiagramConfig::from_str_with_format(text, format)?)
    }

    /// Parses `text` and composes it into a [`Scene`].
    pub fn compose(text: &str, format: ConfigFormat, options: &RenderOptions) -> Result<Scene> {
        let config = parse_config(text, format)?;
        Ok(compose_scene(&config, options)?)
    }

    /// Parses `text` and renders it to an SVG document.
    pub fn render_svg(text: &str, format: ConfigFormat, options: &RenderOptions) -> Result<String> {
        let scene = compose(text, format, options)?;
        Ok(render_scene_svg(&scene))
    }

    /// Bundles the input format and render options for repeated headless renders.
    ///
    /// All work is CPU-bound and synchronous; nothing here performs I/O.
    #[derive(Debug, Clone, Default)]
    pub struct HeadlessRenderer {
        pub format: ConfigFormat,
        pub options: RenderOptions,
    }

    impl HeadlessRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_format(mut self, format: ConfigFormat) -> Self {
            self.format = format;
            self
        }

        /// Pins generated ids to `diagram_id` (sanitized), making output deterministic.
        pub fn with_diagram_id(mut self, diagram_id: &str) -> Self {
            self.options.diagram_id = Some(sanitize_svg_id(diagram_id));
            self
        }

        pub fn with_fill_fallback(mut self, px: f64) -> Self {
            self.options.frame.fill_fallback = px;
            self
        }

        pub fn with_rich_content(
            mut self,
            renderer: Arc<dyn RichContentRenderer + Send + Sync>,
        ) -> Self {
            self.options.rich_content = renderer;
            self
        }

        pub fn parse_sync(&self, text: &str) -> Result<DiagramConfig> {
            parse_config(text, self.format)
        }

        pub fn compose_sync(&self, text: &str) -> Result<Scene> {
            compose(text, self.format, &self.options)
        }

        pub fn render_svg_sync(&self, text: &str) -> Result<String> {
            render_svg(text, self.format, &self.options)
        }

        /// Renders SVG with rich-content regions replaced by plain text labels.
        ///
        /// Many headless SVG renderers and rasterizers do not support HTML inside
        /// `<foreignObject>`; this keeps the content readable there.
        pub fn render_svg_readable_sync(&self, text: &str) -> Result<String> {
            let scene = self.compose_readable(text)?;
            Ok(render_scene_svg(&scene))
        }

        fn compose_readable(&self, text: &str) -> Result<Scene> {
            let mut scene = self.compose_sync(text)?;
            rich_content_as_text(&mut scene.root);
            Ok(scene)
        }

        #[cfg(feature = "raster")]
        pub fn render_png_sync(
            &self,
            text: &str,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            raster::scene_to_png(self.compose_readable(text)?, raster)
        }

        #[cfg(feature = "raster")]
        pub fn render_jpeg_sync(
            &self,
            text: &str,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            raster::scene_to_jpeg(self.compose_readable(text)?, raster)
        }

        #[cfg(feature = "raster")]
        pub fn render_pdf_sync(&self, text: &str) -> raster::Result<Vec<u8>> {
            raster::scene_to_pdf(self.compose_readable(text)?)
        }
    }

}
