use std::ops::{Add, Sub};

pub use euclid::{Point2D as Point, Size2D as Extent};

/// Unit for logical screen coordinates, as reported by the platform for
/// window sizes, window positions and display bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenPx();

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect<T, U>(euclid::Box2D<T, U>);

impl<T, U> Rect<T, U> {
    pub fn new(origin: Point<T, U>, extent: Extent<T, U>) -> Self
    where
        T: Copy + Add<T, Output = T>,
    {
        Self(euclid::Box2D::from_origin_and_size(origin, extent))
    }

    pub fn top_left(&self) -> Point<T, U>
    where
        T: Copy,
    {
        self.0.min
    }

    pub fn extent(&self) -> Extent<T, U>
    where
        T: Copy + Sub<T, Output = T>,
    {
        self.0.size()
    }
}

impl Rect<i32, ScreenPx> {
    /// Returns the top-left corner at which a box of the given extent would be
    /// centered within this rect. The box may be larger than the rect, in
    /// which case the returned corner lies outside of it.
    #[must_use]
    pub fn centered(&self, extent: Extent<i32, ScreenPx>) -> Point<i32, ScreenPx> {
        let outer = self.extent();
        let origin = self.top_left();
        Point::new(
            origin.x + (outer.width - extent.width) / 2,
            origin.y + (outer.height - extent.height) / 2,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_round_trips_through_box() {
        let rect = Rect::<i32, ScreenPx>::new(Point::new(-1920, 0), Extent::new(1920, 1080));

        assert_eq!(rect.top_left(), Point::new(-1920, 0));
        assert_eq!(rect.extent(), Extent::new(1920, 1080));
    }

    #[test]
    fn centered_on_secondary_display() {
        let rect = Rect::<i32, ScreenPx>::new(Point::new(1920, 0), Extent::new(1280, 1024));

        assert_eq!(
            rect.centered(Extent::new(640, 480)),
            Point::new(1920 + 320, 272)
        );
        // Larger than the display: overhangs evenly on both sides.
        assert_eq!(
            rect.centered(Extent::new(1380, 1024)),
            Point::new(1870, 0)
        );
    }
}
