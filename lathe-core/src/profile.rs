/// 2D profile curves swept around the vertical axis.
///
/// A profile maps `t ∈ [0, 1]` to a point `(radius, height)`. Profiles are
/// traversed with the enclosed solid on their left, so a profile climbing
/// the outer side of a solid (or a closed loop going counter-clockwise)
/// yields outward-facing normals and counter-clockwise triangles.
use nalgebra::{Point2, Vector2};
use std::f64::consts::{PI, TAU};

/// A parametric 2D curve `t -> (radius, height)`
pub trait Profile {
    fn sample(&self, t: f64) -> Point2<f64>;

    /// Closed-form `d(radius, height)/dt`, if the curve has one
    fn derivative(&self, _t: f64) -> Option<Vector2<f64>> {
        None
    }
}

impl<P: Profile + ?Sized> Profile for &P {
    fn sample(&self, t: f64) -> Point2<f64> {
        (**self).sample(t)
    }

    fn derivative(&self, t: f64) -> Option<Vector2<f64>> {
        (**self).derivative(t)
    }
}

/// Adapter turning any `Fn(f64) -> Point2<f64>` into a [`Profile`]
/// without a derivative
#[derive(Debug, Clone, Copy)]
pub struct FromFn<F>(pub F);

impl<F> Profile for FromFn<F>
where
    F: Fn(f64) -> Point2<f64>,
{
    fn sample(&self, t: f64) -> Point2<f64> {
        (self.0)(t)
    }
}

pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: Fn(f64) -> Point2<f64>,
{
    FromFn(f)
}

/// Distance from the revolution axis to the circle centre of the ring profiles
pub const RING_CENTER: f64 = 0.65;
/// Tube radius of the ring profiles
pub const RING_RADIUS: f64 = 0.35;

/// Built-in profile curves
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfileCurve {
    /// Unit half circle from the south pole (`t = 0`) to the north pole
    HalfCircle,
    /// Full circle offset from the axis, revolving into a torus
    Circle,
    /// Half circle whose distance from the origin peaks `count + 1` times,
    /// at `t = m / count`
    Spikes { count: u32, amplitude: f64 },
    /// Circle whose tube radius peaks at `t = m / count`
    SpikyRing { count: u32, amplitude: f64 },
}

impl ProfileCurve {
    pub fn spikes() -> Self {
        Self::Spikes {
            count: 8,
            amplitude: 0.35,
        }
    }

    pub fn spiky_ring() -> Self {
        Self::SpikyRing {
            count: 12,
            amplitude: 0.6,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::HalfCircle => "half circle",
            Self::Circle => "circle",
            Self::Spikes { .. } => "spikes",
            Self::SpikyRing { .. } => "spiky ring",
        }
    }
}

/// `cos⁸(π·count·t)` and its derivative: a smooth bump of height 1 at
/// every multiple of `1 / count`
fn spike(count: u32, t: f64) -> (f64, f64) {
    let k = PI * f64::from(count);
    let (s, c) = (k * t).sin_cos();
    let c7 = c.powi(7);
    (c7 * c, -8.0 * c7 * s * k)
}

impl Profile for ProfileCurve {
    fn sample(&self, t: f64) -> Point2<f64> {
        match *self {
            Self::HalfCircle => {
                let (s, c) = (PI * t).sin_cos();
                Point2::new(s, -c)
            }
            Self::Circle => {
                let (s, c) = (TAU * t).sin_cos();
                Point2::new(RING_CENTER + RING_RADIUS * c, RING_RADIUS * s)
            }
            Self::Spikes { count, amplitude } => {
                let scale = 1.0 + amplitude * spike(count, t).0;
                let (s, c) = (PI * t).sin_cos();
                Point2::new(scale * s, -scale * c)
            }
            Self::SpikyRing { count, amplitude } => {
                let tube = RING_RADIUS * (1.0 + amplitude * spike(count, t).0);
                let (s, c) = (TAU * t).sin_cos();
                Point2::new(RING_CENTER + tube * c, tube * s)
            }
        }
    }

    fn derivative(&self, t: f64) -> Option<Vector2<f64>> {
        let d = match *self {
            Self::HalfCircle => {
                let (s, c) = (PI * t).sin_cos();
                Vector2::new(PI * c, PI * s)
            }
            Self::Circle => {
                let (s, c) = (TAU * t).sin_cos();
                Vector2::new(-TAU * RING_RADIUS * s, TAU * RING_RADIUS * c)
            }
            Self::Spikes { count, amplitude } => {
                let (value, slope) = spike(count, t);
                let scale = 1.0 + amplitude * value;
                let scale_dt = amplitude * slope;
                let (s, c) = (PI * t).sin_cos();
                Vector2::new(
                    scale_dt * s + scale * PI * c,
                    -scale_dt * c + scale * PI * s,
                )
            }
            Self::SpikyRing { count, amplitude } => {
                let (value, slope) = spike(count, t);
                let tube = RING_RADIUS * (1.0 + amplitude * value);
                let tube_dt = RING_RADIUS * amplitude * slope;
                let (s, c) = (TAU * t).sin_cos();
                Vector2::new(
                    tube_dt * c - tube * TAU * s,
                    tube_dt * s + tube * TAU * c,
                )
            }
        };
        Some(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [ProfileCurve; 4] = [
        ProfileCurve::HalfCircle,
        ProfileCurve::Circle,
        ProfileCurve::Spikes {
            count: 8,
            amplitude: 0.35,
        },
        ProfileCurve::SpikyRing {
            count: 12,
            amplitude: 0.6,
        },
    ];

    #[test]
    fn test_half_circle_poles() {
        let south = ProfileCurve::HalfCircle.sample(0.0);
        let north = ProfileCurve::HalfCircle.sample(1.0);
        assert_eq!(south, Point2::new(0.0, -1.0));
        assert!(north.x.abs() < 1e-12);
        assert!((north.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_circle_is_closed() {
        let start = ProfileCurve::Circle.sample(0.0);
        let end = ProfileCurve::Circle.sample(1.0);
        assert!((start - end).norm() < 1e-12);
        assert!((start.x - (RING_CENTER + RING_RADIUS)).abs() < 1e-12);
    }

    #[test]
    fn test_derivatives_match_finite_differences() {
        let h = 1e-6;
        for curve in CURVES {
            for step in 1..20 {
                let t = step as f64 / 20.0;
                let numeric = (curve.sample(t + h) - curve.sample(t - h)) / (2.0 * h);
                let analytic = curve.derivative(t).unwrap();
                assert!(
                    (numeric - analytic).norm() < 1e-4 * (1.0 + analytic.norm()),
                    "{} at t={}: {:?} vs {:?}",
                    curve.name(),
                    t,
                    numeric,
                    analytic
                );
            }
        }
    }

    #[test]
    fn test_spikes_stay_off_axis_between_poles() {
        for curve in CURVES {
            for step in 1..100 {
                let p = curve.sample(step as f64 / 100.0);
                assert!(p.x > 0.0, "{} crosses the axis", curve.name());
            }
        }
    }

    #[test]
    fn test_closure_profile_has_no_derivative() {
        let cylinder = from_fn(|t| Point2::new(1.0, t));
        assert_eq!(cylinder.sample(0.5), Point2::new(1.0, 0.5));
        assert!(cylinder.derivative(0.5).is_none());
    }
}
