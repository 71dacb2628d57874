use super::{apply_common, with_label};
use crate::scene::RenderContext;
use crate::surface::{DrawingSurface, RichContentRegion};
use diagraphe_core::geom::{Transform, point};
use diagraphe_core::{ElementCommon, RichContentPosition, RichContentSpec};

pub(super) fn render_rich_content<S: DrawingSurface>(
    surface: &mut S,
    ctx: &RenderContext<'_>,
    common: &ElementCommon,
    spec: &RichContentSpec,
) -> S::Handle {
    let (width, height) = spec.region_size();
    let region = RichContentRegion {
        x: spec.x,
        y: spec.y,
        width,
        height,
        centered: spec.centered,
        content_classes: spec.content_classes.clone(),
    };
    let html = ctx.options.rich_content.render(&spec.html);
    let shape = surface.rich_content(&region, &html);
    apply_common(surface, &shape, common);

    let offset = common.label_offset;
    let label_at = if spec.centered {
        point(spec.x + offset, spec.y - offset)
    } else {
        point(spec.x + spec.fo_width + offset, spec.y - offset)
    };
    let node = with_label(surface, common, shape, label_at);

    match spec.position {
        RichContentPosition::Frame => node,
        RichContentPosition::Canvas => {
            // Undo the content-group translation so (x, y) are canvas coordinates.
            let t = ctx.frame.translation();
            let wrapper = surface.group();
            surface.set_transform(&wrapper, &Transform::translation(-t.x, -t.y));
            surface.append_child(&wrapper, node);
            wrapper
        }
    }
}
