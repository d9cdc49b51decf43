use crate::settings::ThemeMode;
use anyhow::Context;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Parses `#rrggbb` or `#rgb`; the leading `#` is optional.
    pub fn from_hex(input: &str) -> Option<Self> {
        let s = input.trim().trim_start_matches('#');
        if !s.is_ascii() {
            return None;
        }
        let (r, g, b) = match s.len() {
            6 => (
                u8::from_str_radix(&s[0..2], 16).ok()?,
                u8::from_str_radix(&s[2..4], 16).ok()?,
                u8::from_str_radix(&s[4..6], 16).ok()?,
            ),
            3 => (
                u8::from_str_radix(&s[0..1], 16).ok()? * 17,
                u8::from_str_radix(&s[1..2], 16).ok()? * 17,
                u8::from_str_radix(&s[2..3], 16).ok()? * 17,
            ),
            _ => return None,
        };
        Some(Self::rgb(r, g, b))
    }
}

pub const RED: Color = Color::rgb(255, 0, 0);
/// HSB(332/336, 0.54, 0.96).
pub const PINK: Color = Color::rgb(245, 113, 122);
pub const ORANGE: Color = Color::rgb(255, 200, 0);
pub const GREEN: Color = Color::rgb(0, 255, 0);
pub const BLUE: Color = Color::rgb(0, 0, 255);
pub const GRAY: Color = Color::rgb(128, 128, 128);
pub const WHITE: Color = Color::rgb(255, 255, 255);

/// Hat color names known to the renderer. Anything else is carried in
/// `Other` and drawn in the fallback color.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HatColor {
    Red,
    Pink,
    Yellow,
    Green,
    Blue,
    Default,
    Other(String),
}

impl HatColor {
    /// Case-sensitive: `"Red"` is not `red`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "red" => HatColor::Red,
            "pink" => HatColor::Pink,
            "yellow" => HatColor::Yellow,
            "green" => HatColor::Green,
            "blue" => HatColor::Blue,
            "default" => HatColor::Default,
            other => HatColor::Other(other.to_string()),
        }
    }

    pub fn render_color(&self) -> Color {
        match self {
            HatColor::Red => RED,
            HatColor::Pink => PINK,
            HatColor::Yellow => ORANGE,
            HatColor::Green => GREEN,
            HatColor::Blue => BLUE,
            HatColor::Default => GRAY,
            HatColor::Other(_) => WHITE,
        }
    }
}

/// Maps hat color names to render colors: user overrides first, then the
/// built-in table, then white.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    overrides: HashMap<String, Color>,
}

impl Palette {
    pub fn standard() -> Self {
        Self::default()
    }

    /// Builds a palette from `name -> hex` pairs, skipping invalid hex values.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let overrides = overrides
            .iter()
            .filter_map(|(name, hex)| match Color::from_hex(hex) {
                Some(color) => Some((name.clone(), color)),
                None => {
                    tracing::warn!(name = %name, hex = %hex, "ignoring invalid hat color override");
                    None
                }
            })
            .collect();
        Self { overrides }
    }

    pub fn resolve(&self, name: &str) -> Color {
        if let Some(color) = self.overrides.get(name) {
            return *color;
        }
        HatColor::from_name(name).render_color()
    }
}

type ColorsFile = HashMap<String, HashMap<String, String>>;

/// Reads the `theme` section of a colors file. A missing file yields no
/// overrides.
pub fn load_color_overrides(
    path: &Path,
    theme: ThemeMode,
) -> anyhow::Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read colors file {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(HashMap::new());
    }

    let mut colors: ColorsFile = serde_json::from_str(&content)
        .with_context(|| format!("deserialize colors file {}", path.display()))?;
    Ok(colors.remove(theme.key()).unwrap_or_default())
}
