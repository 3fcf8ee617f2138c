use bevy::math::{Vec2, Vec3};
use constants::label::{
    LABEL_BACKGROUND, LABEL_HEIGHT_PX, LABEL_MAX_CHARS, LABEL_OFFSET_FACTOR, LABEL_SCREEN_SCALE,
    LABEL_WIDTH_PX, LABEL_WORLD_SIZE,
};

/// Text surface drawn above an object, always facing the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSpec {
    pub text: String,
    pub width_px: u32,
    pub height_px: u32,
    pub background: [f32; 4],
    /// Extent of the camera-facing quad in world units.
    pub world_size: Vec2,
}

impl LabelSpec {
    pub fn new(title: &str) -> Self {
        Self {
            text: truncate_label(title),
            width_px: LABEL_WIDTH_PX,
            height_px: LABEL_HEIGHT_PX,
            background: LABEL_BACKGROUND,
            world_size: Vec2::from(LABEL_WORLD_SIZE),
        }
    }

    /// Size of the label panel in logical pixels.
    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.width_px as f32, self.height_px as f32) * LABEL_SCREEN_SCALE
    }
}

/// Offset of the label from its object's centre.
pub fn label_offset(size: f32) -> Vec3 {
    Vec3::Y * LABEL_OFFSET_FACTOR * size
}

/// Cut to the label's character budget, counting chars rather than bytes.
pub fn truncate_label(title: &str) -> String {
    title.trim().chars().take(LABEL_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_titles_are_cut() {
        let spec = LabelSpec::new("A remarkably long project title");
        assert_eq!(spec.text.chars().count(), LABEL_MAX_CHARS);
        assert_eq!(spec.text, "A remarkably long pr");
        assert_eq!((spec.width_px, spec.height_px), (512, 128));
    }

    #[test]
    fn screen_size_keeps_raster_aspect() {
        let size = LabelSpec::new("Rust").screen_size();
        assert!((size.x / size.y - 4.0).abs() < 1e-5);
        assert!((size.x - 512.0 * LABEL_SCREEN_SCALE).abs() < 1e-4);
    }

    #[test]
    fn multibyte_titles_cut_on_char_boundary() {
        let title = "ünïcødé ✨".repeat(4);
        let cut = truncate_label(&title);
        assert_eq!(cut.chars().count(), LABEL_MAX_CHARS);
    }

    #[test]
    fn offset_scales_with_size() {
        assert_eq!(label_offset(1.4), Vec3::new(0.0, 2.8, 0.0));
    }
}
