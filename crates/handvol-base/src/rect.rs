use crate::Vec2;
use std::ops::{Add, Sub};

/// Axis-aligned rectangle given by its top-left origin and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect<T> {
    pub origin: Vec2<T>,
    pub size: Vec2<T>,
}

impl<T> Rect<T> {
    pub const fn new(origin: Vec2<T>, size: Vec2<T>) -> Self {
        Self { origin, size }
    }
}

impl<T: Add<Output = T> + Copy> Rect<T> {
    pub fn min(&self) -> Vec2<T> {
        self.origin
    }

    /// Exclusive bottom-right corner.
    pub fn max(&self) -> Vec2<T> {
        self.origin + self.size
    }
}

impl<T: Sub<Output = T> + Copy> Rect<T> {
    /// Build from two corners; `max` is exclusive.
    pub fn from_min_max(min: Vec2<T>, max: Vec2<T>) -> Self {
        Self {
            origin: min,
            size: max - min,
        }
    }
}

impl<T: Add<Output = T> + PartialOrd + Copy> Rect<T> {
    pub fn contains_point(&self, point: Vec2<T>) -> bool {
        let max = self.max();
        point.x >= self.origin.x && point.y >= self.origin.y && point.x < max.x && point.y < max.y
    }
}

impl Rect<i32> {
    /// Center rounded toward the origin.
    pub fn center(&self) -> Vec2<i32> {
        Vec2::new(
            self.origin.x + self.size.x / 2,
            self.origin.y + self.size.y / 2,
        )
    }
}

impl Rect<f32> {
    pub fn area(&self) -> f32 {
        self.size.x.max(0.0) * self.size.y.max(0.0)
    }

    /// Overlapping region, or `None` when the rectangles only touch or are
    /// disjoint.
    pub fn intersection(&self, other: Self) -> Option<Self> {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        let min = Vec2::new(a_min.x.max(b_min.x), a_min.y.max(b_min.y));
        let max = Vec2::new(a_max.x.min(b_max.x), a_max.y.min(b_max.y));
        if max.x > min.x && max.y > min.y {
            Some(Self::from_min_max(min, max))
        } else {
            None
        }
    }
}
