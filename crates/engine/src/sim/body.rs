use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BodyError {
    #[error("body size must be positive, got {width}x{height}")]
    NonPositiveSize { width: u32, height: u32 },
}

/// Pixel dimensions of a body. Validated once; a body never changes size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    width: u32,
    height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Result<Self, BodyError> {
        if width == 0 || height == 0 {
            return Err(BodyError::NonPositiveSize { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(self) -> u32 {
        self.width
    }

    pub fn height(self) -> u32 {
        self.height
    }
}

/// Positioned, moving, axis-aligned box. Positions are sub-pixel floats,
/// velocities are pixels per millisecond.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    size: Size,
}

impl Body {
    pub fn new(position: Vec2, size: Size) -> Self {
        Self {
            position,
            velocity: Vec2::default(),
            size,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> f32 {
        self.size.width as f32
    }

    pub fn height(&self) -> f32 {
        self.size.height as f32
    }

    pub fn is_finite(&self) -> bool {
        self.position.x.is_finite()
            && self.position.y.is_finite()
            && self.velocity.x.is_finite()
            && self.velocity.y.is_finite()
    }

    fn pixel_origin(&self) -> (i64, i64) {
        (
            (self.position.x + 0.5).floor() as i64,
            (self.position.y + 0.5).floor() as i64,
        )
    }

    /// Half-open box overlap on rounded pixel coordinates. Boxes that only
    /// share an edge do not overlap.
    pub fn overlaps(&self, other: &Body) -> bool {
        let (ax, ay) = self.pixel_origin();
        let (bx, by) = other.pixel_origin();
        let (aw, ah) = (i64::from(self.size.width), i64::from(self.size.height));
        let (bw, bh) = (i64::from(other.size.width), i64::from(other.size.height));
        ax < bx + bw && bx < ax + aw && ay < by + bh && by < ay + ah
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(x: f32, y: f32, width: u32, height: u32) -> Body {
        Body::new(Vec2::new(x, y), Size::new(width, height).expect("size"))
    }

    #[test]
    fn zero_size_is_rejected() {
        assert_eq!(
            Size::new(0, 10),
            Err(BodyError::NonPositiveSize {
                width: 0,
                height: 10
            })
        );
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = body_at(0.0, 0.0, 10, 10);
        let b = body_at(10.0, 0.0, 10, 10);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn overlap_uses_rounded_positions() {
        let a = body_at(0.0, 0.0, 10, 10);
        assert!(!a.overlaps(&body_at(9.6, 0.0, 10, 10)));
        assert!(a.overlaps(&body_at(9.4, 9.4, 10, 10)));
    }
}
