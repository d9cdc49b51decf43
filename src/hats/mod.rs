pub mod color;
pub mod monitor;
pub mod overlay;
pub mod painter;
pub mod raster;
pub mod resolver;
pub mod snapshot;

pub use color::{Color, HatColor, Palette};
pub use monitor::SnapshotMonitor;
pub use overlay::{HatOverlayRenderer, OverlayLifecycle, PaintOutcome};
pub use painter::{
    compute_markers, paint_markers, Marker, MarkerPainter, MarkerPlan, MarkerStyle, MarkerSurface,
};
pub use raster::RasterSurface;
pub use resolver::{
    EditorDocument, PositionResolver, ResolutionFailure, ResolvePosition, ScreenPoint,
};
pub use snapshot::{ColorGroups, HatRange, LoadError, Position, Snapshot, SnapshotLoader};
