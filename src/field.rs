use std::{f64::consts::TAU, ops::RangeInclusive};

use glam::{vec3, EulerRot, Quat, Vec3};
use rand::Rng;

use crate::color::hsl_to_rgb;

/// Extent of the box points are scattered in, centered at the origin.
pub const FIELD_EXTENT: Vec3 = glam::const_vec3!([2000.0, 2000.0, 1000.0]);
pub const POINT_SATURATION: f32 = 0.8;
pub const POINT_LIGHTNESS: f32 = 0.6;

const ROTATION_SPEED_X: f64 = 0.05;
const ROTATION_SPEED_Y: f64 = 0.1;

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Point {
    pub position: Vec3,
    pub color: Vec3,
}

impl Point {
    fn sample(rng: &mut impl Rng, hue_range: RangeInclusive<f32>) -> Self {
        let half = FIELD_EXTENT * 0.5;
        let position = vec3(
            rng.gen_range(-half.x..=half.x),
            rng.gen_range(-half.y..=half.y),
            rng.gen_range(-half.z..=half.z),
        );
        let hue = rng.gen_range(hue_range);
        Self {
            position,
            color: hsl_to_rgb(hue, POINT_SATURATION, POINT_LIGHTNESS),
        }
    }
}

/// Field orientation in radians. Always a function of elapsed time only.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
}

impl Rotation {
    pub fn at(elapsed_seconds: f64) -> Self {
        Self {
            x: wrap_angle(elapsed_seconds * ROTATION_SPEED_X),
            y: wrap_angle(elapsed_seconds * ROTATION_SPEED_Y),
        }
    }

    pub fn to_quat(self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.x, self.y, 0.0)
    }
}

fn wrap_angle(angle: f64) -> f32 {
    angle.rem_euclid(TAU) as f32
}

#[derive(Debug, Clone)]
pub struct Field {
    points: Vec<Point>,
    pub rotation: Rotation,
    pub visible: bool,
}

impl Field {
    pub(crate) fn generate(
        rng: &mut impl Rng,
        count: usize,
        hue_range: RangeInclusive<f32>,
    ) -> Self {
        let points = (0..count)
            .map(|_| Point::sample(rng, hue_range.clone()))
            .collect();
        Self {
            points,
            rotation: Rotation::default(),
            visible: true,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    #[test]
    fn test_points_stay_in_box() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        let field = Field::generate(&mut rng, 500, 0.5..=0.8);
        let half = FIELD_EXTENT * 0.5;

        assert_eq!(field.len(), 500);
        for point in field.points() {
            assert!(point.position.abs().cmple(half).all(), "{:?}", point);
            assert!(point.color.cmpge(Vec3::ZERO).all());
            assert!(point.color.cmple(Vec3::ONE).all());
        }
    }

    #[test]
    fn test_single_hue_gives_single_color() {
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        let field = Field::generate(&mut rng, 10, 0.6..=0.6);
        let expected = hsl_to_rgb(0.6, POINT_SATURATION, POINT_LIGHTNESS);

        assert!(field.points().iter().all(|p| p.color == expected));
    }

    #[test]
    fn test_rotation_is_absolute() {
        assert_eq!(Rotation::at(12.5), Rotation::at(12.5));
        assert_eq!(Rotation::at(0.0), Rotation::default());

        let r = Rotation::at(10.0);
        assert!((r.x - 0.5).abs() < 1e-6);
        assert!((r.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_wraps() {
        // 0.1 rad/s wraps after 20π seconds
        let r = Rotation::at(20.0 * std::f64::consts::PI + 1.0);
        assert!((r.y - 0.1).abs() < 1e-5, "{:?}", r);
        assert!(r.x >= 0.0 && r.x < std::f32::consts::TAU);
    }
}
