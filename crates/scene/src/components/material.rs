/// 24-bit sRGB color, `0xRRGGBB`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0x000000);
    pub const WHITE: Rgb = Rgb(0xffffff);

    pub fn to_f32(self) -> [f32; 3] {
        let r = ((self.0 >> 16) & 0xff) as f32 / 255.0;
        let g = ((self.0 >> 8) & 0xff) as f32 / 255.0;
        let b = (self.0 & 0xff) as f32 / 255.0;
        [r, g, b]
    }
}

/// Phong-style surface material of a region solid.
///
/// The emissive term is read-only outside this crate; only the selection
/// state machine changes it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MeshMaterial {
    pub color: Rgb,
    pub shininess: f32,
    emissive: Rgb,
    emissive_intensity: f32,
}

impl MeshMaterial {
    pub fn phong(color: Rgb, shininess: f32) -> Self {
        Self {
            color,
            shininess,
            emissive: Rgb::BLACK,
            emissive_intensity: 0.0,
        }
    }

    pub fn emissive(&self) -> Rgb {
        self.emissive
    }

    pub fn emissive_intensity(&self) -> f32 {
        self.emissive_intensity
    }

    pub fn is_emissive(&self) -> bool {
        self.emissive_intensity > 0.0 && self.emissive != Rgb::BLACK
    }

    pub(crate) fn set_emissive(&mut self, color: Rgb, intensity: f32) {
        self.emissive = color;
        self.emissive_intensity = intensity;
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineMaterial {
    pub color: Rgb,
    pub depth_test: bool,
}

impl LineMaterial {
    /// Black lines drawn over everything else.
    pub fn overlay() -> Self {
        Self {
            color: Rgb::BLACK,
            depth_test: false,
        }
    }
}
