//! CPU rasterization of a particle snapshot into an RGBA8 buffer.
//!
//! Always available (no feature gate) so consumers that blit raw pixels can
//! share the same drawing code as the PNG snapshot path.
//!
//! The picture follows the live view: a dashed ring at the boundary radius,
//! normal particles as cyan discs that glow as they approach the ring, and
//! flipped particles as smaller rose discs.

use flipfield_core::{EngineError, ParticleStore, Regime};
use std::f64::consts::TAU;

/// Dash and gap length along the boundary ring, in pixels.
const DASH_LENGTH: f64 = 5.0;
/// Disc radius for normal particles, in pixels.
const NORMAL_DOT_RADIUS: i64 = 3;
/// Disc radius for flipped particles, in pixels.
const FLIPPED_DOT_RADIUS: i64 = 2;
/// Distance outside the boundary over which the glow fades to nothing.
const GLOW_FALLOFF: f64 = 100.0;
/// Extra halo radius at full proximity, in pixels.
const GLOW_EXTENT: f64 = 5.0;
/// Halo opacity at full proximity.
const GLOW_ALPHA: f64 = 0.35;

/// An opaque 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `"#rrggbb"` or `"rrggbb"`.
    pub fn from_hex(hex: &str) -> Result<Self, EngineError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(EngineError::invalid_param(
                "color",
                format!("expected 6 hex digits, got '{hex}'"),
            ));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| EngineError::invalid_param("color", e.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// Colors used when drawing a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub background: Rgb,
    pub boundary: Rgb,
    pub normal: Rgb,
    pub flipped: Rgb,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            background: Rgb::new(0x02, 0x06, 0x17),
            boundary: Rgb::new(0x64, 0x74, 0x8b),
            normal: Rgb::new(0x0e, 0xa5, 0xe9),
            flipped: Rgb::new(0xf4, 0x3f, 0x5e),
        }
    }
}

/// Square canvas centred on the domain center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width and height in pixels.
    pub size: usize,
    /// Pixels per radius unit.
    pub scale: f64,
}

impl Default for Viewport {
    /// 600×600 at one pixel per unit, so the default respawn radius sits at
    /// the canvas edge.
    fn default() -> Self {
        Self {
            size: 600,
            scale: 1.0,
        }
    }
}

impl Viewport {
    fn center(&self) -> f64 {
        self.size as f64 / 2.0
    }
}

/// An RGBA8 pixel buffer, row-major, alpha always 255.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Frame {
    /// Creates a frame filled with `background`.
    ///
    /// Returns `EngineError::InvalidDimensions` if either dimension is zero
    /// or the byte length overflows.
    pub fn new(width: usize, height: usize, background: Rgb) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(EngineError::InvalidDimensions)?;
        let mut data = Vec::with_capacity(len);
        for _ in 0..width * height {
            data.extend_from_slice(&[background.r, background.g, background.b, 255]);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// The color at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some(Rgb::new(self.data[i], self.data[i + 1], self.data[i + 2]))
    }

    /// Blends `color` over the pixel at `(x, y)` with opacity `alpha`.
    /// Coordinates outside the frame are ignored.
    fn blend(&mut self, x: i64, y: i64, color: Rgb, alpha: f64) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        let i = (y as usize * self.width + x as usize) * 4;
        for (offset, src) in [color.r, color.g, color.b].into_iter().enumerate() {
            let dst = self.data[i + offset] as f64;
            self.data[i + offset] = (src as f64 * a + dst * (1.0 - a)).round() as u8;
        }
    }

    fn fill_disc(&mut self, cx: f64, cy: f64, radius: i64, color: Rgb, alpha: f64) {
        let (px, py) = (cx.round() as i64, cy.round() as i64);
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.blend(px + dx, py + dy, color, alpha);
                }
            }
        }
    }

    /// Two-pixel dashed circle, dashes measured along the arc.
    fn dashed_ring(&mut self, cx: f64, cy: f64, radius: f64, color: Rgb) {
        if radius <= 0.0 {
            return;
        }
        let circumference = TAU * radius;
        let steps = (circumference * 2.0).ceil() as usize;
        for i in 0..steps {
            let arc = i as f64 * 0.5;
            if arc % (2.0 * DASH_LENGTH) >= DASH_LENGTH {
                continue;
            }
            let (sin, cos) = (arc / radius).sin_cos();
            for r in [radius - 0.5, radius + 0.5] {
                let x = (cx + r * cos).round() as i64;
                let y = (cy + r * sin).round() as i64;
                self.blend(x, y, color, 1.0);
            }
        }
    }
}

/// Glow strength in [0, 1] for a normal particle at `radius`.
///
/// Zero at `GLOW_FALLOFF` units or more outside the boundary, rising to one
/// at the boundary.
pub fn proximity(radius: f64, boundary_radius: f64) -> f64 {
    (1.0 - (radius - boundary_radius) / GLOW_FALLOFF).clamp(0.0, 1.0)
}

/// Draws one snapshot: boundary ring first, then particles in store order.
pub fn render_frame(
    store: &ParticleStore,
    boundary_radius: f64,
    viewport: &Viewport,
    style: &Style,
) -> Result<Frame, EngineError> {
    let mut frame = Frame::new(viewport.size, viewport.size, style.background)?;
    let c = viewport.center();

    frame.dashed_ring(c, c, boundary_radius * viewport.scale, style.boundary);

    for p in store {
        let (ox, oy) = p.offset();
        let (x, y) = (c + ox * viewport.scale, c + oy * viewport.scale);
        match p.regime {
            Regime::Normal => {
                let glow = proximity(p.radius, boundary_radius);
                if glow > 0.0 {
                    let halo = NORMAL_DOT_RADIUS + (glow * GLOW_EXTENT).round() as i64;
                    frame.fill_disc(x, y, halo, style.normal, glow * GLOW_ALPHA);
                }
                frame.fill_disc(x, y, NORMAL_DOT_RADIUS, style.normal, 1.0);
            }
            Regime::Flipped => frame.fill_disc(x, y, FLIPPED_DOT_RADIUS, style.flipped, 1.0),
        }
    }

    Ok(frame)
}
