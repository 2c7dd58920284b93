use hand_volume::render::{DISPLAY_HEIGHT, DISPLAY_WIDTH, draw_hand, volume_label};
use hand_volume::{GestureMapper, HandOverlay, render};
use handvol_base::Tensor;
use handvol_infer::{HAND_LANDMARK_COUNT, HandLandmarkIndex, HandLandmarks, Landmark};

const W: usize = 640;
const H: usize = 480;

fn frame(fill: u8) -> Tensor<u8> {
    Tensor::from_rgb(W, H, vec![fill; W * H * 3]).unwrap()
}

fn pixel(image: &Tensor<u8>, x: usize, y: usize) -> [u8; 3] {
    let idx = (y * image.width() + x) * 3;
    [image.data[idx], image.data[idx + 1], image.data[idx + 2]]
}

/// Hand with every landmark at the wrist except the two fingertips.
fn hand(thumb: (f32, f32), index: (f32, f32)) -> HandLandmarks {
    let mut landmarks = [Landmark::new(0.75, 0.75, 0.0); HAND_LANDMARK_COUNT];
    landmarks[usize::from(HandLandmarkIndex::ThumbTip)] = Landmark::new(thumb.0, thumb.1, 0.0);
    landmarks[usize::from(HandLandmarkIndex::IndexFingerTip)] = Landmark::new(index.0, index.1, 0.0);
    HandLandmarks {
        landmarks,
        score: 0.9,
        handedness: None,
    }
}

fn overlay(thumb: (f32, f32), index: (f32, f32)) -> HandOverlay {
    let hand = hand(thumb, index);
    let reading = GestureMapper::default().read(
        hand.pixel(HandLandmarkIndex::ThumbTip, W, H),
        hand.pixel(HandLandmarkIndex::IndexFingerTip, W, H),
    );
    HandOverlay { hand, reading }
}

#[test]
fn test_volume_label_truncates_distance() {
    assert_eq!(volume_label(120.0), "Vol: 120%");
    assert_eq!(volume_label(29.9), "Vol: 29%");
}

#[test]
fn test_no_hands_leaves_frame_unmodified() {
    let data: Vec<u8> = (0..W * H * 3).map(|i| (i % 251) as u8).collect();
    let input = Tensor::from_rgb(W, H, data).unwrap();

    let output = render(input.clone(), &[]);

    assert_eq!(output, input);
}

#[test]
fn test_output_is_display_sized() {
    let small = Tensor::from_rgb(320, 240, vec![7u8; 320 * 240 * 3]).unwrap();

    let output = render(small, &[]);

    assert_eq!(output.shape, vec![DISPLAY_HEIGHT, DISPLAY_WIDTH, 3]);
    assert_eq!(pixel(&output, 639, 479), [7, 7, 7]);
}

#[test]
fn test_overlay_draws_fingertips_and_bar() {
    // Thumb at (320, 120), index at (320, 240): 120 px apart.
    let overlay = overlay((0.5, 0.25), (0.5, 0.5));
    assert_eq!(overlay.reading.distance, 120.0);

    let output = render(frame(0), &[overlay]);

    let magenta = [255, 0, 255];
    let green = [0, 255, 0];
    // Fingertip discs and the pinch line between them.
    assert_eq!(pixel(&output, 320 + 14, 120), magenta);
    assert_eq!(pixel(&output, 320, 180), magenta);
    // Bar outline top edge and bottom fill.
    assert_eq!(pixel(&output, 67, 150), green);
    assert_eq!(pixel(&output, 67, 399), green);
    // Bar top for 120 px sits at 400 - 90 * 250 / 270 ~= 316.7, so 200 is unfilled.
    assert_eq!(pixel(&output, 67, 200), [0, 0, 0]);
    assert_eq!(pixel(&output, 67, 330), green);
}

#[test]
fn test_overlay_draws_blue_label() {
    let output = render(frame(0), &[overlay((0.5, 0.25), (0.5, 0.5))]);

    let blue = [0, 0, 255];
    let has_blue = (430..450).any(|y| (40..200).any(|x| pixel(&output, x, y) == blue));
    assert!(has_blue, "label should be drawn above (40, 450)");
}

#[test]
fn test_draw_hand_marks_landmarks_red() {
    let mut image = frame(0);
    let hand = hand((0.25, 0.25), (0.5, 0.5));

    draw_hand(&mut image.data, W, H, &hand);

    assert_eq!(pixel(&image, 160, 120), [255, 0, 0]);
    assert_eq!(pixel(&image, 480, 360), [255, 0, 0]);
}

#[test]
fn test_fingertips_off_frame_do_not_panic() {
    let output = render(frame(0), &[overlay((-0.5, 2.0), (1.5, -1.0))]);
    assert_eq!(output.shape, vec![H, W, 3]);
}

#[test]
fn test_fingertips_at_i32_extremes_do_not_panic() {
    let output = render(frame(0), &[overlay((1e12, -1e12), (-1e12, 1e12))]);
    assert_eq!(output.shape, vec![H, W, 3]);
    // The bar still fills, since the pinch reads as wide open.
    assert_eq!(pixel(&output, 60, 300), [0, 255, 0]);
}

#[test]
fn test_multiple_hands_each_drawn() {
    let hands = [overlay((0.2, 0.2), (0.2, 0.3)), overlay((0.8, 0.2), (0.8, 0.3))];

    let output = render(frame(0), &hands);

    let magenta = [255, 0, 255];
    assert_eq!(pixel(&output, 128, 96), magenta);
    assert_eq!(pixel(&output, 512, 96), magenta);
}
