use crate::InferError;
use handvol_base::Tensor;

use super::types::LetterboxInfo;

/// Side length of the square landmark-model input.
pub const INPUT_SIZE: usize = 224;

/// Memory layout the models expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputLayout {
    /// `[1, 3, size, size]`
    #[default]
    Nchw,
    /// `[1, size, size, 3]`
    Nhwc,
}

impl InputLayout {
    pub(crate) fn shape(self, size: usize) -> Vec<usize> {
        match self {
            InputLayout::Nchw => vec![1, 3, size, size],
            InputLayout::Nhwc => vec![1, size, size, 3],
        }
    }

    /// Flat index of channel `ch` at `(x, y)` in a `size` x `size` input.
    pub(crate) fn index(self, size: usize, x: usize, y: usize, ch: usize) -> usize {
        match self {
            InputLayout::Nchw => ch * size * size + y * size + x,
            InputLayout::Nhwc => (y * size + x) * 3 + ch,
        }
    }
}

pub(crate) fn check_frame(frame: &Tensor<u8>) -> Result<(usize, usize), InferError> {
    if frame.shape.len() != 3 || frame.shape[2] != 3 {
        return Err(InferError::ShapeMismatch {
            expected: "[H, W, 3]".to_string(),
            got: format!("{:?}", frame.shape),
        });
    }
    let (h, w) = (frame.shape[0], frame.shape[1]);
    if h == 0 || w == 0 {
        return Err(InferError::ShapeMismatch {
            expected: "non-empty frame".to_string(),
            got: format!("{:?}", frame.shape),
        });
    }
    Ok((w, h))
}

/// Letterbox an RGB frame into a square `size` x `size` model input.
///
/// The frame is scaled to fit with its aspect ratio kept (nearest
/// neighbour), centred, padded with black and rescaled from `[0, 255]` to
/// `[0.0, 1.0]`. The returned [`LetterboxInfo`] maps model coordinates back
/// to the frame.
pub fn preprocess(
    frame: &Tensor<u8>,
    size: usize,
    layout: InputLayout,
) -> Result<(Tensor<f32>, LetterboxInfo), InferError> {
    let (w, h) = check_frame(frame)?;
    let size = size.max(1);

    let side = size as f32;
    let scale = (side / w as f32).min(side / h as f32);
    let new_w = ((w as f32 * scale) as usize).clamp(1, size);
    let new_h = ((h as f32 * scale) as usize).clamp(1, size);
    let pad_x = (size - new_w) / 2;
    let pad_y = (size - new_h) / 2;

    let mut data = vec![0.0f32; 3 * size * size];

    for y in 0..new_h {
        let src_y = ((y as f32 / scale) as usize).min(h - 1);
        for x in 0..new_w {
            let src_x = ((x as f32 / scale) as usize).min(w - 1);
            let src = (src_y * w + src_x) * 3;
            let (dst_y, dst_x) = (y + pad_y, x + pad_x);

            for ch in 0..3 {
                data[layout.index(size, dst_x, dst_y, ch)] = frame.data[src + ch] as f32 / 255.0;
            }
        }
    }

    Ok((
        Tensor::new(layout.shape(size), data)?,
        LetterboxInfo {
            scale,
            pad_x: pad_x as f32,
            pad_y: pad_y as f32,
        },
    ))
}
