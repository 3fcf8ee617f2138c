/// Raster size of an item label surface in pixels.
pub const LABEL_WIDTH_PX: u32 = 512;
pub const LABEL_HEIGHT_PX: u32 = 128;

/// On-screen label size relative to its raster size.
pub const LABEL_SCREEN_SCALE: f32 = 0.3;

/// Label text is cut to this many characters.
pub const LABEL_MAX_CHARS: usize = 20;

/// RGBA background of the label surface.
pub const LABEL_BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 0.8];

/// World-space extent of the camera-facing label quad.
pub const LABEL_WORLD_SIZE: [f32; 2] = [3.0, 0.75];

/// Label height above the object centre, multiplied by the item size.
pub const LABEL_OFFSET_FACTOR: f32 = 2.0;

pub const LABEL_FONT_SIZE: f32 = 16.0;
