//! Rotating color palette for connections.

use super::value_object::PresentationColor;

/// Colors handed out to connections, in assignment order
pub const DEFAULT_COLORS: [&str; 10] = [
    "#3366cc", "#dc3912", "#ff9900", "#109618", "#990099", "#0099c6", "#dd4477", "#66aa00",
    "#b82e2e", "#316395",
];

/// Fixed color for file notices created by the upload endpoint
pub const UPLOAD_COLOR: &str = DEFAULT_COLORS[0];

/// A non-empty, fixed list of presentation colors.
///
/// Colors are picked by registry size, so two concurrent connections can
/// share a color once more connections exist than colors.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    colors: Vec<PresentationColor>,
}

impl ColorPalette {
    /// Color for the connection registered while `registered` others are live
    pub fn pick(&self, registered: usize) -> PresentationColor {
        self.colors[registered % self.colors.len()].clone()
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS
                .iter()
                .filter_map(|c| PresentationColor::new(*c).ok())
                .collect(),
        }
    }
}

/// Color stamped on messages created by the upload endpoint
pub fn upload_color() -> PresentationColor {
    ColorPalette::default().pick(0)
}
