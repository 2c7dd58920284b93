use handvol_base::{Rect, Vec2};

#[test]
fn test_vec2_ops() {
    let a = Vec2::new(1, 2);
    let b = Vec2::new(4, 6);
    assert_eq!(a + b, Vec2::new(5, 8));
    assert_eq!(b - a, Vec2::new(3, 4));
    assert_eq!(a * 3, Vec2::new(3, 6));
}

#[test]
fn test_pixel_distance() {
    let thumb = Vec2::new(100, 100);
    let index = Vec2::new(100, 130);
    assert_eq!(thumb.distance(index), 30.0);
    assert_eq!(Vec2::new(0, 0).distance(Vec2::new(3, 4)), 5.0);
}

#[test]
fn test_float_distance() {
    let d = Vec2::new(0.0f32, 0.0).distance(Vec2::new(300.0, 0.0));
    assert_eq!(d, 300.0);
}

#[test]
fn test_rect_bounds() {
    let r = Rect::from_min_max(Vec2::new(50, 150), Vec2::new(85, 400));
    assert_eq!(r.size, Vec2::new(35, 250));
    assert_eq!(r.max(), Vec2::new(85, 400));
}

#[test]
fn test_rect_contains_point_is_half_open() {
    let r = Rect::new(Vec2::new(10, 10), Vec2::new(20, 10));
    assert!(r.contains_point(Vec2::new(10, 10)));
    assert!(r.contains_point(Vec2::new(29, 19)));
    assert!(!r.contains_point(Vec2::new(30, 15)));
    assert!(!r.contains_point(Vec2::new(15, 20)));
    assert!(!r.contains_point(Vec2::new(9, 15)));
}

#[test]
fn test_rect_center() {
    let r = Rect::new(Vec2::new(0, 0), Vec2::new(10, 5));
    assert_eq!(r.center(), Vec2::new(5, 2));
}

#[test]
fn test_pixel_distance_at_i32_extremes() {
    let far_right = Vec2::new(i32::MAX, 240);
    let far_left = Vec2::new(i32::MIN, 240);
    let d = far_left.distance(far_right);
    assert!(d.is_finite());
    assert!((d - 4.294_967_3e9).abs() < 1e3);
}

#[test]
fn test_rect_area_and_intersection() {
    let a = Rect::new(Vec2::new(0.0f32, 0.0), Vec2::new(10.0, 10.0));
    let b = Rect::new(Vec2::new(5.0f32, 5.0), Vec2::new(10.0, 10.0));
    assert_eq!(a.area(), 100.0);

    let inter = a.intersection(b).unwrap();
    assert_eq!(inter.origin, Vec2::new(5.0, 5.0));
    assert_eq!(inter.area(), 25.0);

    let far = Rect::new(Vec2::new(20.0f32, 0.0), Vec2::new(1.0, 1.0));
    assert_eq!(a.intersection(far), None);
    // Shared edge only.
    let touching = Rect::new(Vec2::new(10.0f32, 0.0), Vec2::new(5.0, 5.0));
    assert_eq!(a.intersection(touching), None);
}
