pub const VERTEX_SHADER: &str = include_str!("shaders/position.vert");
pub const FRAGMENT_SHADER: &str = include_str!("shaders/flat.frag");

pub const POSITION_ATTRIBUTE: &str = "a_position";
pub const RESOLUTION_UNIFORM: &str = "u_resolution";

/// Two triangles in pixel coordinates, forming a 70x10 rectangle.
#[rustfmt::skip]
pub const POSITIONS: [f32; 12] = [
    10.0, 20.0,
    80.0, 20.0,
    10.0, 30.0,
    10.0, 30.0,
    80.0, 20.0,
    80.0, 30.0,
];

/// Pixel size of the drawing surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for SurfaceSize {
    fn default() -> Self {
        Self::new(640, 480)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_use_builtin_outputs() {
        assert!(VERTEX_SHADER.contains("gl_Position ="));
        assert!(FRAGMENT_SHADER.contains("gl_FragColor = vec4(1, 0, 0.5, 1)"));
        assert!(VERTEX_SHADER.contains(POSITION_ATTRIBUTE));
        assert!(VERTEX_SHADER.contains(RESOLUTION_UNIFORM));
    }

    #[test]
    fn default_surface() {
        assert_eq!(SurfaceSize::default(), SurfaceSize::new(640, 480));
    }
}
