/// Straight-alpha clear color for the frame's render pass.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClearColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ClearColor {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Load-op color with rgb scaled by alpha.
    pub fn premultiplied(self) -> wgpu::Color {
        let a = f64::from(self.a);
        wgpu::Color {
            r: f64::from(self.r) * a,
            g: f64::from(self.g) * a,
            b: f64::from(self.b) * a,
            a,
        }
    }
}

impl Default for ClearColor {
    fn default() -> Self {
        Self::new(0.45, 0.55, 0.60, 1.00)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_color_is_unchanged() {
        let c = ClearColor::default().premultiplied();
        assert!((c.r - 0.45).abs() < 1e-6);
        assert!((c.a - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rgb_is_scaled_by_alpha() {
        let c = ClearColor::new(1.0, 0.5, 0.25, 0.5).premultiplied();
        assert!((c.r - 0.5).abs() < 1e-6);
        assert!((c.g - 0.25).abs() < 1e-6);
        assert!((c.b - 0.125).abs() < 1e-6);
        assert!((c.a - 0.5).abs() < 1e-6);
    }
}
