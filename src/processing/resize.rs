//! Redraw logic: orientation baking and aspect-fit resizing.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use tracing::debug;

use super::orientation::Orientation;

/// Size of `width`×`height` scaled to fit inside `max_width`×`max_height`.
///
/// A zero bound means "unconstrained" on that axis. Aspect ratio is kept and
/// the image is never enlarged.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }
    let (w, h) = (width as f64, height as f64);
    let max_w = if max_width > 0 { max_width as f64 } else { w };
    let max_h = if max_height > 0 { max_height as f64 } else { h };

    let mut target_w = w.min(max_w);
    let mut target_h = h * target_w / w;
    if target_h > max_h {
        target_w = w * max_h / h;
        target_h = max_h;
    }
    (to_pixels(target_w), to_pixels(target_h))
}

fn to_pixels(v: f64) -> u32 {
    (v.round() as u32).max(1)
}

/// Redraws `image` upright, optionally fitted inside `target`.
///
/// Orientation is baked in before fitting, so the box applies to the image as
/// it is displayed. Without a target the dimensions are only swapped as the
/// orientation requires.
pub fn redraw(image: DynamicImage, orientation: Orientation, target: Option<(u32, u32)>) -> DynamicImage {
    let upright = if orientation.is_upright() {
        image
    } else {
        debug!("Baking {:?} orientation into pixels", orientation);
        orientation.apply(image)
    };
    let Some((max_w, max_h)) = target else {
        return upright;
    };

    let (w, h) = upright.dimensions();
    let (target_w, target_h) = fit_within(w, h, max_w, max_h);
    if (target_w, target_h) == (w, h) {
        return upright;
    }
    debug!("Resizing {}×{} → {}×{}", w, h, target_w, target_h);
    upright.resize_exact(target_w, target_h, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn fits_by_the_tighter_axis() {
        assert_eq!(fit_within(100, 200, 50, 50), (25, 50));
        assert_eq!(fit_within(200, 100, 50, 50), (50, 25));
        assert_eq!(fit_within(400, 300, 200, 0), (200, 150));
        assert_eq!(fit_within(400, 300, 0, 150), (200, 150));
    }

    #[test]
    fn never_enlarges() {
        assert_eq!(fit_within(40, 30, 400, 300), (40, 30));
        assert_eq!(fit_within(40, 30, 0, 0), (40, 30));
    }

    #[test]
    fn tiny_results_keep_a_pixel() {
        assert_eq!(fit_within(1000, 1, 10, 0), (10, 1));
    }

    #[test]
    fn redraw_orients_then_fits() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(200, 100));
        let out = redraw(image, Orientation::Right, Some((50, 50)));
        assert_eq!(out.dimensions(), (25, 50));
    }

    #[test]
    fn redraw_without_target_keeps_size() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(120, 80));
        assert_eq!(redraw(image.clone(), Orientation::Up, None).dimensions(), (120, 80));
        assert_eq!(redraw(image, Orientation::Left, None).dimensions(), (80, 120));
    }
}
