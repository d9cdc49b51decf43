use crate::hats::snapshot::Position;
use thiserror::Error;

/// Pixel coordinate where a logical position currently renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// `None` when the shifted point leaves the `i32` range.
    pub fn checked_offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionFailure {
    #[error("line {line} is outside the document")]
    LineOutOfRange { line: u32 },
    #[error("position {line}:{character} is not mapped to the screen")]
    Unmapped { line: u32, character: u32 },
    #[error("hat at ({x}, {y}) cannot be placed on screen")]
    Unplaceable { x: i32, y: i32 },
    #[error("host coordinate mapping failed: {0}")]
    Host(String),
}

/// The editor document the overlay is attached to. Implemented by the host.
pub trait EditorDocument {
    /// Canonical absolute path used as the snapshot key, if the document is
    /// backed by a file.
    fn canonical_path(&self) -> Option<String>;

    /// Converts a logical position using the current viewport, scroll
    /// offset, font metrics and wrapping state.
    fn logical_to_screen(
        &self,
        line: u32,
        character: u32,
    ) -> Result<ScreenPoint, ResolutionFailure>;
}

pub trait ResolvePosition {
    fn resolve(&self, position: Position) -> Result<ScreenPoint, ResolutionFailure>;
}

impl<F> ResolvePosition for F
where
    F: Fn(Position) -> Result<ScreenPoint, ResolutionFailure>,
{
    fn resolve(&self, position: Position) -> Result<ScreenPoint, ResolutionFailure> {
        self(position)
    }
}

/// Passes positions straight through to the host document. Results are only
/// valid for the paint cycle they were produced in.
pub struct PositionResolver<'a, D: ?Sized> {
    document: &'a D,
}

impl<'a, D: EditorDocument + ?Sized> PositionResolver<'a, D> {
    pub fn new(document: &'a D) -> Self {
        Self { document }
    }
}

impl<D: EditorDocument + ?Sized> ResolvePosition for PositionResolver<'_, D> {
    fn resolve(&self, position: Position) -> Result<ScreenPoint, ResolutionFailure> {
        self.document
            .logical_to_screen(position.line, position.character)
    }
}
