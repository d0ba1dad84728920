//! Materials: render state flags handed to the driver before a draw call.

/// How the colour of a draw call is combined with what is already on screen.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MaterialType {
    /// Opaque geometry; overwrites the frame buffer.
    #[default]
    Solid,
    /// Blends using the alpha channel of the vertex colours.
    TransparentVertexAlpha,
}

/// Render state of a draw call.
///
/// Nodes usually start from [`Material::default`] and only flip the flags they
/// care about. Lighting is accepted for compatibility with node code written
/// against the flag but the drivers shade with vertex colours only.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub material_type: MaterialType,
    pub wireframe: bool,
    pub lighting: bool,
    pub backface_culling: bool,
    pub z_buffer: bool,
    pub z_write: bool,
}

impl Material {
    /// The engine defaults: solid, filled, lit, back faces culled, depth tested and written.
    pub const DEFAULT: Material = Material {
        material_type: MaterialType::Solid,
        wireframe: false,
        lighting: true,
        backface_culling: true,
        z_buffer: true,
        z_write: true,
    };

    pub fn is_transparent(&self) -> bool {
        !matches!(self.material_type, MaterialType::Solid)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::DEFAULT
    }
}
