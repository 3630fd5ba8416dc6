//! CPU rasterization of a [`PracticeSnapshot`] for previews and debugging.
//!
//! Output is premultiplied RGBA8. The background is opaque, so the bytes can be written out
//! as straight-alpha PNG unchanged.

use std::path::Path;

use kurbo::{Cap, Circle, Join, Shape, Stroke, StrokeOpts};

use crate::foundation::core::{BezPath, GridSize, PathEl, Point};
use crate::foundation::error::{TracerError, TracerResult};
use crate::glyph::model::CharacterGlyph;
use crate::glyph::normalize::glyph_to_surface_affine;
use crate::practice::engine::PracticeSnapshot;

/// Rendered pixels of one snapshot.
#[derive(Clone, Debug)]
pub struct SnapshotImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major.
    pub data: Vec<u8>,
}

impl SnapshotImage {
    /// RGBA at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data
            .get(i..i + 4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }
}

type Rgba = (u8, u8, u8, u8);

const BACKGROUND: Rgba = (255, 255, 255, 255);
const GUIDE: Rgba = (230, 170, 170, 255);
const REFERENCE: Rgba = (225, 225, 225, 255);
const DEMONSTRATED: Rgba = (90, 90, 90, 255);
const COMMITTED: Rgba = (20, 20, 20, 255);
const LIVE: Rgba = (30, 60, 160, 255);
const REJECTED: Rgba = (200, 40, 40, 160);
const FROZEN: Rgba = (150, 110, 110, 255);
const HINT: Rgba = (240, 140, 0, 255);

/// Draw the guides, reference outlines, strokes and hint of `snapshot` on a `grid`-sized
/// square.
#[tracing::instrument(skip(snapshot, glyph))]
pub fn render_snapshot(
    snapshot: &PracticeSnapshot,
    glyph: Option<&CharacterGlyph>,
    grid: GridSize,
) -> TracerResult<SnapshotImage> {
    let side = grid.px().round();
    if !(1.0..=f64::from(u16::MAX)).contains(&side) {
        return Err(TracerError::validation(format!(
            "cannot rasterize a {side}px grid"
        )));
    }
    let side_px = side as u16;
    let mut ctx = vello_cpu::RenderContext::new(side_px, side_px);
    let ink = grid.fraction(0.035).max(1.0);

    set_color(&mut ctx, BACKGROUND);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, side, side));

    draw_guides(&mut ctx, side);

    if let Some(g) = glyph {
        let to_surface = glyph_to_surface_affine(grid);
        let shown = snapshot.demonstration_cursor.unwrap_or(0);
        for (i, outline) in g.strokes.iter().enumerate() {
            let color = if i < shown { DEMONSTRATED } else { REFERENCE };
            set_color(&mut ctx, color);
            ctx.fill_path(&bezpath_to_cpu(&(to_surface * outline.clone())));
        }
    }

    for s in &snapshot.frozen {
        stroke_polyline(&mut ctx, s.points(), ink, FROZEN);
    }
    for s in &snapshot.committed {
        stroke_polyline(&mut ctx, s.points(), ink, COMMITTED);
    }
    stroke_polyline(&mut ctx, &snapshot.last_rejected, ink, REJECTED);
    stroke_polyline(&mut ctx, &snapshot.live, ink, LIVE);

    if let Some(hint) = snapshot.hint {
        let ring = Circle::new(hint.center(), hint.radius);
        let outline = stroke_outline(ring.path_elements(0.1), (ink * 0.5).max(1.0));
        set_color(&mut ctx, HINT);
        ctx.fill_path(&bezpath_to_cpu(&outline));
    }

    let mut pixmap = vello_cpu::Pixmap::new(side_px, side_px);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    Ok(SnapshotImage {
        width: u32::from(side_px),
        height: u32::from(side_px),
        data: pixmap.data_as_u8_slice().to_vec(),
    })
}

/// Write `image` as PNG, creating parent directories.
pub fn save_png(image: &SnapshotImage, path: impl AsRef<Path>) -> TracerResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            TracerError::validation(format!("create output dir '{}': {e}", parent.display()))
        })?;
    }
    image::save_buffer_with_format(
        path,
        &image.data,
        image.width,
        image.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| {
        TracerError::Other(anyhow::Error::new(e).context(format!("write png '{}'", path.display())))
    })
}

fn set_color(ctx: &mut vello_cpu::RenderContext, (r, g, b, a): Rgba) {
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
}

/// Border, midlines and diagonals of the practice square.
fn draw_guides(ctx: &mut vello_cpu::RenderContext, side: f64) {
    let mid = side / 2.0;
    let mut guides = BezPath::new();
    guides.move_to((0.5, 0.5));
    guides.line_to((side - 0.5, 0.5));
    guides.line_to((side - 0.5, side - 0.5));
    guides.line_to((0.5, side - 0.5));
    guides.close_path();
    for (a, b) in [
        ((mid, 0.0), (mid, side)),
        ((0.0, mid), (side, mid)),
        ((0.0, 0.0), (side, side)),
        ((side, 0.0), (0.0, side)),
    ] {
        guides.move_to(a);
        guides.line_to(b);
    }
    set_color(ctx, GUIDE);
    ctx.fill_path(&bezpath_to_cpu(&stroke_outline(guides.iter(), 1.0)));
}

fn stroke_polyline(ctx: &mut vello_cpu::RenderContext, points: &[Point], width: f64, color: Rgba) {
    let outline = match points {
        [] => return,
        [only] => Circle::new(*only, width / 2.0).to_path(0.1),
        [first, rest @ ..] => {
            let mut line = BezPath::new();
            line.move_to(*first);
            for p in rest {
                line.line_to(*p);
            }
            stroke_outline(line.iter(), width)
        }
    };
    set_color(ctx, color);
    ctx.fill_path(&bezpath_to_cpu(&outline));
}

fn stroke_outline(path: impl IntoIterator<Item = PathEl>, width: f64) -> BezPath {
    let style = Stroke::new(width)
        .with_caps(Cap::Round)
        .with_join(Join::Round);
    kurbo::stroke(path, &style, &StrokeOpts::default(), 0.1)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(cpu_point(p)),
            PathEl::LineTo(p) => out.line_to(cpu_point(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(cpu_point(p1), cpu_point(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(cpu_point(p1), cpu_point(p2), cpu_point(p3))
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn cpu_point(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/snapshot.rs"]
mod tests;
