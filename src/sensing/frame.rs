use chrono::{DateTime, Utc};
use image::{imageops::FilterType, DynamicImage, RgbImage};

/// Fixed-size RGB buffer the detectors run on.
#[derive(Debug, Clone)]
pub struct WorkingFrame {
    pub image: RgbImage,
    pub captured_at: DateTime<Utc>,
}

impl WorkingFrame {
    /// Scale a captured frame into a `width`×`height` working buffer.
    /// Aspect ratio is not preserved.
    pub fn from_capture(
        raw: DynamicImage,
        width: u32,
        height: u32,
        captured_at: DateTime<Utc>,
    ) -> Self {
        let rgb = raw.to_rgb8();
        let image = if rgb.dimensions() == (width, height) {
            rgb
        } else {
            image::imageops::resize(&rgb, width, height, FilterType::Triangle)
        };
        Self { image, captured_at }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn scales_into_working_buffer() {
        let raw = DynamicImage::ImageRgba8(RgbaImage::new(640, 480));
        let frame = WorkingFrame::from_capture(raw, 320, 240, Utc::now());
        assert_eq!((frame.width(), frame.height()), (320, 240));
    }

    #[test]
    fn matching_size_is_kept() {
        let mut rgb = RgbImage::new(320, 240);
        rgb.put_pixel(10, 10, image::Rgb([200, 10, 10]));
        let frame = WorkingFrame::from_capture(DynamicImage::ImageRgb8(rgb), 320, 240, Utc::now());
        assert_eq!(frame.image.get_pixel(10, 10).0, [200, 10, 10]);
    }
}
