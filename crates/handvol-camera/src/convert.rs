use crate::CameraError;
use handvol_base::Tensor;

/// Decode one MJPEG frame into an RGB tensor `[height, width, 3]`.
///
/// Grayscale or CMYK JPEGs are expanded to RGB so downstream code only ever
/// sees three channels.
pub fn decode_mjpeg(data: &[u8]) -> Result<Tensor<u8>, CameraError> {
    let img = crates_image::load_from_memory_with_format(data, crates_image::ImageFormat::Jpeg)?;
    let rgb = img.into_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(Tensor::from_rgb(width as usize, height as usize, rgb.into_raw())?)
}

/// Convert packed YUYV 4:2:2 (`Y0 U Y1 V`) to interleaved RGB using BT.601.
///
/// Returns `None` if `data` holds fewer than `width * height * 2` bytes.
pub fn yuyv_to_rgb(data: &[u8], width: u32, height: u32) -> Option<Vec<u8>> {
    let pixels = width as usize * height as usize;
    let needed = pixels * 2;
    if data.len() < needed {
        return None;
    }

    let mut rgb = Vec::with_capacity(pixels * 3);
    for quad in data[..needed].chunks_exact(4) {
        let u = quad[1] as f32 - 128.0;
        let v = quad[3] as f32 - 128.0;
        for y in [quad[0] as f32, quad[2] as f32] {
            rgb.push(channel(y + 1.402 * v));
            rgb.push(channel(y - 0.344 * u - 0.714 * v));
            rgb.push(channel(y + 1.772 * u));
        }
    }
    Some(rgb)
}

fn channel(value: f32) -> u8 {
    value.clamp(0.0, 255.0) as u8
}
