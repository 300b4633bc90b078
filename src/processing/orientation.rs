//! EXIF orientation and how to bake it into a pixel buffer.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// The eight EXIF orientations, named by the transform that makes the
/// stored pixels display upright.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Up,
    UpMirrored,
    Down,
    DownMirrored,
    LeftMirrored,
    Right,
    RightMirrored,
    Left,
}

impl Orientation {
    /// The upright sentinel value.
    pub const UPRIGHT: i64 = 1;

    /// Maps an EXIF value; anything outside 1–8 is treated as upright.
    pub fn from_exif(value: i64) -> Self {
        match value {
            2 => Self::UpMirrored,
            3 => Self::Down,
            4 => Self::DownMirrored,
            5 => Self::LeftMirrored,
            6 => Self::Right,
            7 => Self::RightMirrored,
            8 => Self::Left,
            _ => Self::Up,
        }
    }

    pub fn to_exif(self) -> i64 {
        match self {
            Self::Up => 1,
            Self::UpMirrored => 2,
            Self::Down => 3,
            Self::DownMirrored => 4,
            Self::LeftMirrored => 5,
            Self::Right => 6,
            Self::RightMirrored => 7,
            Self::Left => 8,
        }
    }

    pub fn is_upright(self) -> bool {
        self == Self::Up
    }

    /// Whether displaying the buffer swaps width and height.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::LeftMirrored | Self::Right | Self::RightMirrored | Self::Left)
    }

    /// Dimensions of a `width`×`height` buffer once displayed.
    pub fn display_dimensions(self, width: u32, height: u32) -> (u32, u32) {
        if self.swaps_axes() { (height, width) } else { (width, height) }
    }

    /// Redraws `image` so it displays correctly without this tag.
    pub fn apply(self, image: DynamicImage) -> DynamicImage {
        match self {
            Self::Up => image,
            Self::UpMirrored => image.fliph(),
            Self::Down => image.rotate180(),
            Self::DownMirrored => image.flipv(),
            Self::LeftMirrored => image.rotate90().fliph(),
            Self::Right => image.rotate90(),
            Self::RightMirrored => image.rotate270().fliph(),
            Self::Left => image.rotate270(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};

    /// 2×1 buffer: red on the left, blue on the right.
    fn strip() -> DynamicImage {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 0, 255]));
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn exif_values_round_trip() {
        for v in 1..=8 {
            assert_eq!(Orientation::from_exif(v).to_exif(), v);
        }
        assert_eq!(Orientation::from_exif(0), Orientation::Up);
        assert_eq!(Orientation::from_exif(42), Orientation::Up);
    }

    #[test]
    fn right_rotates_clockwise() {
        let out = Orientation::Right.apply(strip());
        assert_eq!(out.dimensions(), (1, 2));
        // Clockwise turn puts the left (red) pixel on top.
        assert_eq!(out.get_pixel(0, 0).0[0], 255);
        assert_eq!(out.get_pixel(0, 1).0[2], 255);
    }

    #[test]
    fn mirrored_swaps_columns() {
        let out = Orientation::UpMirrored.apply(strip());
        assert_eq!(out.dimensions(), (2, 1));
        assert_eq!(out.get_pixel(0, 0).0[2], 255);
    }

    #[test]
    fn display_dimensions_follow_axis_swap() {
        assert_eq!(Orientation::Right.display_dimensions(200, 100), (100, 200));
        assert_eq!(Orientation::Down.display_dimensions(200, 100), (200, 100));
    }
}
