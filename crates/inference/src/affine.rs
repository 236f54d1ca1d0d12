/// 2D affine transform mapping `(x, y)` to `(a*x + c*y + tx, b*x + d*y + ty)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn scale(sx: f32, sy: f32) -> Self {
        Affine {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    pub fn translate(tx: f32, ty: f32) -> Self {
        Affine {
            tx,
            ty,
            ..Self::IDENTITY
        }
    }

    /// Mirror a `height` tall canvas top to bottom: scale Y by -1, then translate by height.
    pub fn flip_vertical(height: f32) -> Self {
        Self::scale(1.0, -1.0).then(Self::translate(0.0, height))
    }

    /// Clockwise rotation by `turns` quarter turns of a `size`-sized canvas,
    /// keeping the result in the positive quadrant.
    pub fn quarter_turns(turns: u8, width: f32, height: f32) -> Self {
        match turns % 4 {
            0 => Self::IDENTITY,
            // (x, y) -> (h - y, x)
            1 => Affine {
                a: 0.0,
                b: 1.0,
                c: -1.0,
                d: 0.0,
                tx: height,
                ty: 0.0,
            },
            // (x, y) -> (w - x, h - y)
            2 => Affine {
                a: -1.0,
                b: 0.0,
                c: 0.0,
                d: -1.0,
                tx: width,
                ty: height,
            },
            // (x, y) -> (y, w - x)
            _ => Affine {
                a: 0.0,
                b: -1.0,
                c: 1.0,
                d: 0.0,
                tx: 0.0,
                ty: width,
            },
        }
    }

    /// `other` applied after `self`.
    pub fn then(self, other: Affine) -> Self {
        Affine {
            a: other.a * self.a + other.c * self.b,
            b: other.b * self.a + other.d * self.b,
            c: other.a * self.c + other.c * self.d,
            d: other.b * self.c + other.d * self.d,
            tx: other.a * self.tx + other.c * self.ty + other.tx,
            ty: other.b * self.tx + other.d * self.ty + other.ty,
        }
    }

    /// Inverse transform, `None` when the transform collapses the plane.
    pub fn invert(&self) -> Option<Affine> {
        let det = self.a * self.d - self.b * self.c;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(Affine {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            tx: (self.c * self.ty - self.d * self.tx) / det,
            ty: (self.b * self.tx - self.a * self.ty) / det,
        })
    }

    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.tx,
            self.b * x + self.d * y + self.ty,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_vertical_maps_edges() {
        let flip = Affine::flip_vertical(10.0);
        assert_eq!(flip.apply(3.0, 0.0), (3.0, 10.0));
        assert_eq!(flip.apply(3.0, 10.0), (3.0, 0.0));
    }

    #[test]
    fn test_quarter_turn_corners() {
        // 4x2 canvas turned clockwise becomes 2x4, top-left lands top-right
        let turn = Affine::quarter_turns(1, 4.0, 2.0);
        assert_eq!(turn.apply(0.0, 0.0), (2.0, 0.0));
        assert_eq!(turn.apply(4.0, 2.0), (0.0, 4.0));
    }

    #[test]
    fn test_invert_undoes_scale_and_turn() {
        let forward = Affine::quarter_turns(3, 8.0, 4.0).then(Affine::scale(2.0, 0.5));
        let inverse = forward.invert().unwrap();
        let (x, y) = forward.apply(5.0, 1.0);
        assert_eq!(inverse.apply(x, y), (5.0, 1.0));
        assert!(Affine::scale(0.0, 1.0).invert().is_none());
    }

    #[test]
    fn test_four_turns_is_identity() {
        let one = Affine::quarter_turns(1, 4.0, 2.0);
        let two = one.then(Affine::quarter_turns(1, 2.0, 4.0));
        let three = two.then(Affine::quarter_turns(1, 4.0, 2.0));
        let four = three.then(Affine::quarter_turns(1, 2.0, 4.0));
        assert_eq!(four.apply(1.0, 1.5), (1.0, 1.5));
        assert_eq!(two, Affine::quarter_turns(2, 4.0, 2.0));
    }
}
