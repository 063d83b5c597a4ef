use super::vector2::*;

#[derive(Debug, PartialEq, Eq, Default, Copy, Clone)]
pub struct Bounds2<T> {
    pub min: Vector2<T>,
    pub max: Vector2<T>,
}

impl<T: Copy> Bounds2<T> {
    pub fn new(min: &Vector2<T>, max: &Vector2<T>) -> Self {
        Bounds2::<T> {
            min: *min,
            max: *max,
        }
    }
}

fn min_<T: Copy + PartialOrd>(a: T, b: T) -> T {
    return if a <= b { a } else { b };
}

fn max_<T: Copy + PartialOrd>(a: T, b: T) -> T {
    return if a >= b { a } else { b };
}

impl<T: Copy + PartialOrd + std::ops::Sub<Output = T>> Bounds2<T> {
    /// Builds the box spanned by two opposite corners given in any order.
    pub fn from_corners(a: &Vector2<T>, b: &Vector2<T>) -> Self {
        let min = Vector2::<T>::new(min_(a.x, b.x), min_(a.y, b.y));
        let max = Vector2::<T>::new(max_(a.x, b.x), max_(a.y, b.y));
        return Bounds2 { min, max };
    }

    pub fn diagonal(&self) -> Vector2<T> {
        return self.max - self.min;
    }

    pub fn inside_exclusive(&self, p: &Vector2<T>) -> bool {
        return p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y;
    }
}

impl Bounds2<i32> {
    pub fn centroid(&self) -> Vector2<i32> {
        return Vector2::<i32>::midpoint(&self.min, &self.max);
    }
}
