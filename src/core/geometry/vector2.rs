use std::ops;

#[derive(Debug, PartialEq, Eq, Hash, Default, Copy, Clone)]
pub struct Vector2<T> {
    pub x: T,
    pub y: T,
}

impl<T: Copy> Vector2<T> {
    pub fn new(x: T, y: T) -> Self {
        Vector2::<T> { x, y }
    }
}

impl<T: Default> Vector2<T> {
    #[inline]
    pub fn zero() -> Self {
        Vector2::<T> {
            x: T::default(),
            y: T::default(),
        }
    }
}

impl Vector2<i32> {
    #[inline]
    pub fn distance_squared(a: &Self, b: &Self) -> i64 {
        let dx = (a.x - b.x) as i64;
        let dy = (a.y - b.y) as i64;
        return dx * dx + dy * dy;
    }

    /// Midpoint with integer truncation, as used for area light centroids.
    #[inline]
    pub fn midpoint(a: &Self, b: &Self) -> Self {
        return Vector2::new((a.x + b.x) / 2, (a.y + b.y) / 2);
    }

    #[inline]
    pub fn to_f64(&self) -> Vector2<f64> {
        return Vector2::new(self.x as f64, self.y as f64);
    }
}

impl Vector2<f64> {
    #[inline]
    pub fn dot(&self, rhs: &Self) -> f64 {
        return self.x * rhs.x + self.y * rhs.y;
    }

    #[inline]
    pub fn distance_squared(a: &Self, b: &Self) -> f64 {
        let v = *a - *b;
        return v.dot(&v);
    }

    #[inline]
    pub fn lerp(t: f64, a: &Self, b: &Self) -> Self {
        return Vector2::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y));
    }
}

impl<T: ops::Add<Output = T>> ops::Add<Vector2<T>> for Vector2<T> {
    type Output = Vector2<T>;
    #[inline]
    fn add(self, rhs: Vector2<T>) -> Vector2<T> {
        return Vector2 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        };
    }
}

impl<T: ops::Sub<Output = T>> ops::Sub<Vector2<T>> for Vector2<T> {
    type Output = Vector2<T>;
    #[inline]
    fn sub(self, rhs: Vector2<T>) -> Vector2<T> {
        return Vector2 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        };
    }
}

impl<T: ops::Mul<Output = T> + Copy> ops::Mul<T> for Vector2<T> {
    type Output = Vector2<T>;
    #[inline]
    fn mul(self, rhs: T) -> Vector2<T> {
        return Vector2 {
            x: self.x * rhs,
            y: self.y * rhs,
        };
    }
}

impl<T> ops::Index<usize> for Vector2<T> {
    type Output = T;
    #[inline]
    fn index(&self, i: usize) -> &Self::Output {
        match i {
            0 => &self.x,
            _ => &self.y,
        }
    }
}

impl<T> ops::IndexMut<usize> for Vector2<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        match i {
            0 => &mut self.x,
            _ => &mut self.y,
        }
    }
}

impl<T: Copy> From<(T, T)> for Vector2<T> {
    #[inline]
    fn from(value: (T, T)) -> Self {
        Vector2::<T>::new(value.0, value.1)
    }
}

impl<T: Copy> From<[T; 2]> for Vector2<T> {
    #[inline]
    fn from(value: [T; 2]) -> Self {
        Vector2::<T>::new(value[0], value[1])
    }
}
