use crate::hats::color::{Color, Palette};
use crate::hats::resolver::{
    EditorDocument, PositionResolver, ResolutionFailure, ResolvePosition, ScreenPoint,
};
use crate::hats::snapshot::Snapshot;

/// Size and placement of a hat relative to the resolved caret origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    pub diameter: u32,
    /// Gap between the caret origin and the left edge of the dot.
    pub offset_x: i32,
    /// Vertical shift of the dot's center.
    pub offset_y: i32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            diameter: 4,
            offset_x: 4,
            offset_y: 0,
        }
    }
}

impl MarkerStyle {
    pub fn center_for(&self, origin: ScreenPoint) -> Option<ScreenPoint> {
        let half = i32::try_from(self.diameter / 2).ok()?;
        origin.checked_offset(self.offset_x.checked_add(half)?, self.offset_y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Marker {
    pub center: ScreenPoint,
    pub diameter: u32,
    pub color: Color,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerPlan {
    pub markers: Vec<Marker>,
    /// Ranges whose start the host could not map to the screen.
    pub skipped: usize,
}

/// Drawing primitives the host surface must provide.
pub trait MarkerSurface {
    fn set_color(&mut self, color: Color);
    fn fill_circle(&mut self, center: ScreenPoint, diameter: u32);
}

/// Computes the hats to draw for the document at `canonical_path` without
/// touching any surface.
pub fn compute_markers<R: ResolvePosition + ?Sized>(
    snapshot: &Snapshot,
    canonical_path: &str,
    resolver: &R,
    palette: &Palette,
    style: MarkerStyle,
) -> MarkerPlan {
    let mut plan = MarkerPlan::default();
    let Some(groups) = snapshot.groups_for(canonical_path) else {
        return plan;
    };

    for (color_name, ranges) in groups {
        let color = palette.resolve(color_name);
        for range in ranges {
            let resolved = resolver.resolve(range.start).and_then(|origin| {
                style
                    .center_for(origin)
                    .ok_or(ResolutionFailure::Unplaceable {
                        x: origin.x,
                        y: origin.y,
                    })
            });
            match resolved {
                Ok(center) => plan.markers.push(Marker {
                    center,
                    diameter: style.diameter,
                    color,
                }),
                Err(err) => {
                    tracing::debug!(
                        color = %color_name,
                        line = range.start.line,
                        character = range.start.character,
                        error = %err,
                        "skipping hat that could not be resolved"
                    );
                    plan.skipped += 1;
                }
            }
        }
    }
    plan
}

/// Issues draw calls for `markers`, switching color only when it changes.
pub fn paint_markers<S: MarkerSurface + ?Sized>(surface: &mut S, markers: &[Marker]) {
    let mut current: Option<Color> = None;
    for marker in markers {
        if current != Some(marker.color) {
            surface.set_color(marker.color);
            current = Some(marker.color);
        }
        surface.fill_circle(marker.center, marker.diameter);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerPainter {
    palette: Palette,
    style: MarkerStyle,
}

impl MarkerPainter {
    pub fn new(palette: Palette, style: MarkerStyle) -> Self {
        Self { palette, style }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    pub fn style(&self) -> MarkerStyle {
        self.style
    }

    /// Paints the hats for `document`. Documents without a path draw nothing.
    pub fn paint<D, S>(&self, surface: &mut S, document: &D, snapshot: &Snapshot) -> MarkerPlan
    where
        D: EditorDocument + ?Sized,
        S: MarkerSurface + ?Sized,
    {
        let Some(path) = document.canonical_path() else {
            return MarkerPlan::default();
        };
        let resolver = PositionResolver::new(document);
        let plan = compute_markers(snapshot, &path, &resolver, &self.palette, self.style);
        paint_markers(surface, &plan.markers);
        plan
    }
}
