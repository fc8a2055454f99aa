//! PNG output of a rendered [`Frame`].
//!
//! Feature-gated behind `png` (default on) so embedders that only need raw
//! pixels do not pull in the `image` crate.

use flipfield_core::EngineError;
use std::path::Path;

use crate::pixel::Frame;

/// Writes a frame as a PNG file.
///
/// Returns `EngineError::InvalidDimensions` if the frame is wider or taller
/// than `u32::MAX`, or `EngineError::Io` on encode/write failure.
pub fn write_png(frame: &Frame, path: &Path) -> Result<(), EngineError> {
    let w = u32::try_from(frame.width()).map_err(|_| EngineError::InvalidDimensions)?;
    let h = u32::try_from(frame.height()).map_err(|_| EngineError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, frame.data().to_vec())
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| EngineError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::{render_frame, Style, Viewport};
    use flipfield_core::{Particle, ParticleStore};

    #[test]
    fn write_png_round_trip() {
        let store = ParticleStore::new(vec![Particle::new(0, 150.0, 0.5, 0.5)]);
        let viewport = Viewport {
            size: 64,
            scale: 0.2,
        };
        let frame = render_frame(&store, 100.0, &viewport, &Style::default()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field.png");

        write_png(&frame, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 64);
        assert_eq!(img.height(), 64);
        assert_eq!(img.into_raw(), frame.into_data());
    }

    #[test]
    fn write_png_to_missing_directory_is_io_error() {
        let frame = Frame::new(4, 4, Style::default().background).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("field.png");
        assert!(matches!(write_png(&frame, &path), Err(EngineError::Io(_))));
    }
}
