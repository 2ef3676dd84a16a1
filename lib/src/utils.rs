use crate::{geometry::Rect, Error};
use image::{imageops, GenericImageView, GrayImage, ImageBuffer, Pixel, RgbaImage};
use std::path::Path;

/// Helper type used to define the source of `ImageSource`'s data
#[derive(Clone)]
pub enum ImageSource<'a> {
    /// A raw buffer of image data, see `image::load_from_memory` for details
    /// on what is supported
    Memory(&'a [u8]),
    /// The path to an image to load from disk. The image format is inferred
    /// from the file extension, see `image::open` for details
    Path(&'a Path),
    /// An already loaded image
    Image(image::DynamicImage),
}

impl<'a> ImageSource<'a> {
    pub fn from_path(path: &'a Path) -> Self {
        Self::Path(path)
    }
}

impl<'a> From<image::DynamicImage> for ImageSource<'a> {
    fn from(img: image::DynamicImage) -> Self {
        Self::Image(img)
    }
}

impl<'a> From<RgbaImage> for ImageSource<'a> {
    fn from(img: RgbaImage) -> Self {
        Self::Image(image::DynamicImage::ImageRgba8(img))
    }
}

impl<'a, S> From<&'a S> for ImageSource<'a>
where
    S: AsRef<Path> + 'a,
{
    fn from(path: &'a S) -> Self {
        Self::Path(path.as_ref())
    }
}

pub fn load_dynamic_image(src: ImageSource<'_>) -> Result<image::DynamicImage, image::ImageError> {
    match src {
        ImageSource::Memory(data) => image::load_from_memory(data),
        ImageSource::Path(path) => image::open(path),
        ImageSource::Image(img) => Ok(img),
    }
}

/// Loads an image as 8-bit RGBA
pub fn load_image(src: ImageSource<'_>) -> Result<RgbaImage, Error> {
    Ok(load_dynamic_image(src)?.to_rgba())
}

/// Loads a selection mask, any pixel with a non-zero luma is selected.
/// Fully transparent pixels are never selected.
pub fn load_mask(src: ImageSource<'_>) -> Result<GrayImage, Error> {
    let img = load_dynamic_image(src)?;
    let mut mask = img.to_luma();

    if img.color().has_alpha() {
        for (x, y, luma) in mask.enumerate_pixels_mut() {
            if img.get_pixel(x, y)[3] == 0 {
                luma[0] = 0;
            }
        }
    }

    Ok(mask)
}

/// Copies the part of `img` covered by `rect`, which must lie within it
pub(crate) fn crop<P>(img: &ImageBuffer<P, Vec<P::Subpixel>>, rect: Rect) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel + 'static,
    P::Subpixel: 'static,
{
    imageops::crop_imm(img, rect.x as u32, rect.y as u32, rect.width, rect.height).to_image()
}

#[cfg(test)]
mod test {
    use super::*;
    use image::{Luma, Rgba};

    #[test]
    fn transparent_pixels_are_not_selected() {
        let mut img = RgbaImage::from_pixel(3, 1, Rgba([255, 255, 255, 255]));
        img.put_pixel(1, 0, Rgba([255, 255, 255, 0]));
        img.put_pixel(2, 0, Rgba([0, 0, 0, 255]));

        let mask = load_mask(ImageSource::from(img)).unwrap();
        assert_eq!(mask.as_raw(), &vec![255, 0, 0]);
    }

    #[test]
    fn crops_to_rect() {
        let mask = GrayImage::from_fn(6, 4, |x, y| Luma([(y * 6 + x) as u8]));
        let cropped = crop(&mask, Rect::new(2, 1, 3, 2));

        assert_eq!(cropped.dimensions(), (3, 2));
        assert_eq!(cropped.as_raw(), &vec![8, 9, 10, 14, 15, 16]);
    }
}
