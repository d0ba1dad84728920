//! 8-bit RGBA colours.

/// A colour with 8 bits per channel.
///
/// The memory layout is `r, g, b, a` so that a `Colour` can be uploaded as a
/// `Unorm8x4` vertex attribute. Constructors following the engine-wide
/// alpha-first convention are available through [`Colour::from_argb`].
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    pub const WHITE: Colour = Colour::new(255, 255, 255, 255);
    pub const BLACK: Colour = Colour::new(0, 0, 0, 255);
    pub const TRANSPARENT: Colour = Colour::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a colour from alpha, red, green and blue, in that order.
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Linear-space channels in `0.0..=1.0`, decoding the sRGB-encoded RGB channels.
    ///
    /// Alpha is stored linearly and is only rescaled.
    pub fn to_linear(self) -> [f64; 4] {
        [
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
            self.a as f64 / 255.0,
        ]
    }
}

impl From<Colour> for wgpu::Color {
    fn from(colour: Colour) -> Self {
        let [r, g, b, a] = colour.to_linear();
        wgpu::Color { r, g, b, a }
    }
}

fn srgb_to_linear(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
