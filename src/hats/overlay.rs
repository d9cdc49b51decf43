use crate::hats::color::{load_color_overrides, Palette};
use crate::hats::painter::{MarkerPainter, MarkerStyle, MarkerSurface};
use crate::hats::resolver::EditorDocument;
use crate::hats::snapshot::SnapshotLoader;
use crate::settings::{Settings, ThemeMode};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayLifecycle {
    Idle,
    Painting,
}

impl OverlayLifecycle {
    pub fn is_painting(self) -> bool {
        matches!(self, Self::Painting)
    }
}

pub fn can_transition(from: OverlayLifecycle, to: OverlayLifecycle) -> bool {
    matches!(
        (from, to),
        (OverlayLifecycle::Idle, OverlayLifecycle::Painting)
            | (OverlayLifecycle::Painting, OverlayLifecycle::Idle)
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaintOutcome {
    Painted { markers: usize, skipped: usize },
    /// The hats file does not exist yet.
    NoSnapshot,
    /// The document has no canonical path.
    NoDocument,
    /// The document matches an ignored path fragment.
    Ignored,
    /// A cycle was already in progress.
    Busy,
    /// Loading or drawing failed; nothing more was drawn this cycle.
    Failed,
}

impl PaintOutcome {
    pub fn markers(&self) -> usize {
        match self {
            PaintOutcome::Painted { markers, .. } => *markers,
            _ => 0,
        }
    }
}

/// Renders hats for one editor. Every redraw reloads the snapshot, filters it
/// to the current document and paints whatever resolves.
#[derive(Debug)]
pub struct HatOverlayRenderer {
    loader: SnapshotLoader,
    painter: MarkerPainter,
    colors: Option<(PathBuf, ThemeMode)>,
    ignored_path_fragments: Vec<String>,
    lifecycle: OverlayLifecycle,
}

impl HatOverlayRenderer {
    pub fn new(loader: SnapshotLoader, painter: MarkerPainter) -> Self {
        Self {
            loader,
            painter,
            colors: None,
            ignored_path_fragments: Vec::new(),
            lifecycle: OverlayLifecycle::Idle,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let style = MarkerStyle {
            diameter: settings.marker_diameter.max(1),
            offset_x: settings.marker_offset.0,
            offset_y: settings.marker_offset.1,
        };
        let mut renderer = Self::new(
            SnapshotLoader::new(settings.hats_path()),
            MarkerPainter::new(Palette::standard(), style),
        )
        .with_ignored_path_fragments(settings.ignored_path_fragments.clone());
        renderer.colors = Some((settings.colors_path(), settings.theme));
        renderer.reload_colors();
        tracing::info!(
            hats = %renderer.loader.path().display(),
            "hat overlay renderer initialised"
        );
        renderer
    }

    pub fn with_ignored_path_fragments(mut self, fragments: Vec<String>) -> Self {
        self.ignored_path_fragments = fragments;
        self
    }

    pub fn lifecycle(&self) -> OverlayLifecycle {
        self.lifecycle
    }

    pub fn loader(&self) -> &SnapshotLoader {
        &self.loader
    }

    /// Re-reads the colors file. On failure the previous palette is kept.
    pub fn reload_colors(&mut self) {
        let Some((path, theme)) = &self.colors else {
            return;
        };
        match load_color_overrides(path, *theme) {
            Ok(overrides) => {
                tracing::debug!(
                    path = %path.display(),
                    count = overrides.len(),
                    "hat colors loaded"
                );
                self.painter.set_palette(Palette::with_overrides(&overrides));
            }
            Err(err) => {
                tracing::warn!(error = ?err, "failed to load hat colors; keeping previous palette");
            }
        }
    }

    /// Runs one full load-filter-resolve-draw cycle. Never panics and never
    /// returns an error to the host.
    pub fn on_redraw_requested<D, S>(&mut self, document: &D, surface: &mut S) -> PaintOutcome
    where
        D: EditorDocument + ?Sized,
        S: MarkerSurface + ?Sized,
    {
        if !self.transition(OverlayLifecycle::Painting) {
            tracing::debug!("hat paint requested while a cycle is in progress");
            return PaintOutcome::Busy;
        }

        let cycle = AssertUnwindSafe(|| self.paint_cycle(document, surface));
        let outcome = match panic::catch_unwind(cycle) {
            Ok(outcome) => outcome,
            Err(payload) => {
                let panic_message = if let Some(message) = payload.downcast_ref::<&str>() {
                    (*message).to_string()
                } else if let Some(message) = payload.downcast_ref::<String>() {
                    message.clone()
                } else {
                    "unknown panic payload".to_string()
                };
                tracing::error!(panic_message, "hat paint cycle panicked");
                PaintOutcome::Failed
            }
        };

        self.transition(OverlayLifecycle::Idle);
        outcome
    }

    fn paint_cycle<D, S>(&self, document: &D, surface: &mut S) -> PaintOutcome
    where
        D: EditorDocument + ?Sized,
        S: MarkerSurface + ?Sized,
    {
        let Some(path) = document.canonical_path() else {
            return PaintOutcome::NoDocument;
        };

        if self
            .ignored_path_fragments
            .iter()
            .any(|fragment| !fragment.is_empty() && path.contains(fragment.as_str()))
        {
            return PaintOutcome::Ignored;
        }

        let snapshot = match self.loader.load() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                tracing::debug!(
                    path = %self.loader.path().display(),
                    "hats file does not exist; nothing to draw"
                );
                return PaintOutcome::NoSnapshot;
            }
            Err(err) => {
                tracing::warn!(error = ?err, "skipping hat paint cycle");
                return PaintOutcome::Failed;
            }
        };

        let plan = self.painter.paint(surface, document, &snapshot);
        PaintOutcome::Painted {
            markers: plan.markers.len(),
            skipped: plan.skipped,
        }
    }

    fn transition(&mut self, to: OverlayLifecycle) -> bool {
        if !can_transition(self.lifecycle, to) {
            return false;
        }
        self.lifecycle = to;
        true
    }
}
