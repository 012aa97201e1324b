use crate::device_orientation::interface::ImageOrientation;
use image::{imageops, DynamicImage};
use tract_onnx::prelude::*;

const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Turns the buffer upright according to its EXIF orientation.
pub fn orient_image(image: &DynamicImage, orientation: ImageOrientation) -> DynamicImage {
    match orientation {
        ImageOrientation::Up => image.clone(),
        ImageOrientation::UpMirrored => image.fliph(),
        ImageOrientation::Down => image.rotate180(),
        ImageOrientation::DownMirrored => image.flipv(),
        ImageOrientation::LeftMirrored => image.rotate90().fliph(),
        ImageOrientation::Right => image.rotate90(),
        ImageOrientation::RightMirrored => image.rotate270().fliph(),
        ImageOrientation::Left => image.rotate270(),
    }
}

/// Crops the largest centered region with the target aspect ratio, then scales it.
pub fn center_crop_and_scale(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let (w, h) = (image.width() as u64, image.height() as u64);
    if w * height as u64 == h * width as u64 {
        return image.resize_exact(width, height, imageops::FilterType::Triangle);
    }

    // Compare w/h against width/height without going through floats
    let (crop_w, crop_h) = if w * height as u64 > h * width as u64 {
        ((h * width as u64 / height as u64).max(1), h)
    } else {
        (w, (w * height as u64 / width as u64).max(1))
    };
    let x = (w - crop_w) / 2;
    let y = (h - crop_h) / 2;

    image
        .crop_imm(x as u32, y as u32, crop_w as u32, crop_h as u32)
        .resize_exact(width, height, imageops::FilterType::Triangle)
}

fn image_to_tensor(
    image: &DynamicImage,
) -> Result<Tensor, Box<dyn std::error::Error + Send + Sync>> {
    let rgb = image.to_rgb8();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);

    let array = tract_ndarray::Array4::from_shape_fn((1, 3, height, width), |(_, c, y, x)| {
        let pixel = rgb.get_pixel(x as u32, y as u32);
        (pixel[c] as f32 / 255.0 - IMAGENET_MEAN[c]) / IMAGENET_STD[c]
    });

    Ok(array.into_tensor())
}

pub fn prepare_input(
    image: &DynamicImage,
    orientation: ImageOrientation,
    width: u32,
    height: u32,
) -> Result<Tensor, Box<dyn std::error::Error + Send + Sync>> {
    if image.width() == 0 || image.height() == 0 {
        return Err("empty pixel buffer".into());
    }

    let upright = orient_image(image, orientation);
    let cropped = center_crop_and_scale(&upright, width, height);
    image_to_tensor(&cropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn normalized(value: u8, channel: usize) -> f32 {
        (value as f32 / 255.0 - IMAGENET_MEAN[channel]) / IMAGENET_STD[channel]
    }

    #[test]
    fn test_prepare_input_square() {
        let img = ImageBuffer::from_pixel(100, 100, Rgb([255u8, 0, 0]));
        let image = DynamicImage::ImageRgb8(img);

        let tensor = prepare_input(&image, ImageOrientation::Up, 224, 224).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);

        let slice = tensor.as_slice::<f32>().unwrap();
        assert!((slice[0] - normalized(255, 0)).abs() < 0.0001);
        assert!((slice[224 * 224] - normalized(0, 1)).abs() < 0.0001);
        assert!((slice[2 * 224 * 224] - normalized(0, 2)).abs() < 0.0001);
    }

    #[test]
    fn test_center_crop_keeps_middle_of_wide_image() {
        // 300x100: red stripes on the outer thirds, green square in the middle
        let img = ImageBuffer::from_fn(300, 100, |x, _| {
            if (100..200).contains(&x) {
                Rgb([0u8, 255, 0])
            } else {
                Rgb([255u8, 0, 0])
            }
        });
        let image = DynamicImage::ImageRgb8(img);

        let cropped = center_crop_and_scale(&image, 50, 50).to_rgb8();
        assert_eq!(cropped.dimensions(), (50, 50));
        assert_eq!(cropped.get_pixel(0, 0), &Rgb([0, 255, 0]));
        assert_eq!(cropped.get_pixel(49, 49), &Rgb([0, 255, 0]));
    }

    #[test]
    fn test_center_crop_tall_image() {
        let img = ImageBuffer::from_fn(100, 300, |_, y| {
            if (100..200).contains(&y) {
                Rgb([0u8, 0, 255])
            } else {
                Rgb([255u8, 255, 255])
            }
        });
        let image = DynamicImage::ImageRgb8(img);

        let cropped = center_crop_and_scale(&image, 20, 20).to_rgb8();
        assert_eq!(cropped.get_pixel(10, 0), &Rgb([0, 0, 255]));
    }

    #[test]
    fn test_orientation_right_rotates_landscape_buffer_to_portrait() {
        let image = DynamicImage::new_rgb8(640, 480);
        let upright = orient_image(&image, ImageOrientation::Right);
        assert_eq!((upright.width(), upright.height()), (480, 640));

        let same = orient_image(&image, ImageOrientation::Down);
        assert_eq!((same.width(), same.height()), (640, 480));
    }

    #[test]
    fn test_empty_buffer_is_rejected() {
        let image = DynamicImage::new_rgb8(0, 0);
        assert!(prepare_input(&image, ImageOrientation::Up, 224, 224).is_err());
    }
}
