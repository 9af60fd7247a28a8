//! Per-frame animation of the primary object and the light

use std::f32::consts::{PI, TAU};

use crate::settings::AnimationKind;

/// Rotation added to the object's x and y each frame while auto-rotate is on
pub const AUTO_ROTATE_STEP: f32 = 0.02;

/// Light orbit angle added each frame while light auto-rotate is on
pub const LIGHT_ORBIT_STEP: f32 = PI * 0.005;

/// Radius of the light's orbit around the origin
pub const LIGHT_ORBIT_RADIUS: f32 = 3.0;

/// Elapsed time since startup, advanced once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationClock {
    elapsed: f64,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `delta` seconds; negative or non-finite deltas are ignored
    pub fn advance(&mut self, delta: f64) {
        if delta.is_finite() && delta > 0.0 {
            self.elapsed += delta;
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

/// Partial pose written by the animation driver; `None` fields are left alone
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationUpdate {
    pub position: [Option<f32>; 3],
    pub rotation_x: Option<f32>,
}

impl AnimationUpdate {
    pub fn is_empty(&self) -> bool {
        self.position.iter().all(Option::is_none) && self.rotation_x.is_none()
    }

    pub fn apply(&self, position: &mut [f32; 3], rotation: &mut [f32; 3]) {
        for (dst, src) in position.iter_mut().zip(self.position) {
            if let Some(v) = src {
                *dst = v;
            }
        }
        if let Some(x) = self.rotation_x {
            rotation[0] = x;
        }
    }
}

/// Pose of the primary object for `kind` at `elapsed` seconds.
///
/// `amplitude` is the bounce offset or the circle radius; `floor_y` is the
/// floor's height.
pub fn animate(kind: AnimationKind, elapsed: f64, amplitude: f32, floor_y: f32) -> AnimationUpdate {
    let t = elapsed;
    match kind {
        AnimationKind::None => AnimationUpdate::default(),
        AnimationKind::Bounce => {
            let y = 2.0 + floor_y as f64 + amplitude as f64 + (t * 3.0).sin().abs() * 2.0;
            AnimationUpdate {
                position: [None, Some(y as f32), Some((t.cos() * 4.0) as f32)],
                rotation_x: Some((t * 4.0) as f32),
            }
        }
        AnimationKind::Circle => {
            let a = amplitude as f64;
            AnimationUpdate {
                position: [Some((a * t.cos()) as f32), None, Some((a * t.sin()) as f32)],
                rotation_x: None,
            }
        }
    }
}

/// One frame of object auto-rotation (uncapped accumulation)
pub fn auto_rotate_step(rotation: &mut [f32; 3]) {
    rotation[0] += AUTO_ROTATE_STEP;
    rotation[1] += AUTO_ROTATE_STEP;
}

/// Accumulated angle of the light orbiting the origin in the x-z plane
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LightOrbit {
    angle: f32,
}

impl LightOrbit {
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Advance one frame and return the light's new `(x, z)`
    pub fn step(&mut self) -> (f32, f32) {
        self.angle = (self.angle + LIGHT_ORBIT_STEP).rem_euclid(TAU);
        (
            self.angle.sin() * LIGHT_ORBIT_RADIUS,
            self.angle.cos() * LIGHT_ORBIT_RADIUS,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_bounce_at_zero() {
        let u = animate(AnimationKind::Bounce, 0.0, 2.0, -5.0);
        assert!((u.position[1].unwrap() - (2.0 - 5.0 + 2.0)).abs() < EPS);
        assert!((u.position[2].unwrap() - 4.0).abs() < EPS);
        assert_eq!(u.rotation_x, Some(0.0));
        assert_eq!(u.position[0], None);
    }

    #[test]
    fn test_bounce_lower_bound() {
        let (amplitude, floor_y) = (1.5, -5.0);
        let lower = 2.0 + floor_y + amplitude;
        for i in 0..2000 {
            let t = i as f64 * 0.013;
            let y = animate(AnimationKind::Bounce, t, amplitude, floor_y).position[1].unwrap();
            assert!(y >= lower - EPS, "t={t}: {y} < {lower}");
            assert!(y <= lower + 2.0 + EPS);
        }
    }

    #[test]
    fn test_bounce_period() {
        let t = 0.7;
        let a = animate(AnimationKind::Bounce, t, 2.0, -5.0).position[1].unwrap();
        let b = animate(AnimationKind::Bounce, t + std::f64::consts::PI / 3.0, 2.0, -5.0).position[1].unwrap();
        assert!((a - b).abs() < EPS);
    }

    #[test]
    fn test_circle_radius() {
        for amplitude in [-10.0f32, -2.0, 0.0, 3.5, 10.0] {
            for i in 0..500 {
                let t = i as f64 * 0.05;
                let u = animate(AnimationKind::Circle, t, amplitude, -5.0);
                let (x, z) = (u.position[0].unwrap(), u.position[2].unwrap());
                let r2 = x * x + z * z;
                assert!((r2 - amplitude * amplitude).abs() < 1e-3, "t={t} a={amplitude}");
                assert_eq!(u.position[1], None);
            }
        }
    }

    #[test]
    fn test_none_freezes_pose() {
        let mut position = [1.0, 2.0, 3.0];
        let mut rotation = [0.1, 0.2, 0.3];
        for i in 0..10 {
            let u = animate(AnimationKind::None, i as f64, 5.0, -5.0);
            assert!(u.is_empty());
            u.apply(&mut position, &mut rotation);
        }
        assert_eq!(position, [1.0, 2.0, 3.0]);
        assert_eq!(rotation, [0.1, 0.2, 0.3]);

        // Auto-rotate still applies on its own
        auto_rotate_step(&mut rotation);
        assert!((rotation[0] - 0.12).abs() < EPS);
        assert!((rotation[1] - 0.22).abs() < EPS);
        assert_eq!(rotation[2], 0.3);
    }

    #[test]
    fn test_apply_leaves_unset_fields() {
        let mut position = [9.0, 9.0, 9.0];
        let mut rotation = [9.0, 9.0, 9.0];
        animate(AnimationKind::Circle, 0.0, 2.0, -5.0).apply(&mut position, &mut rotation);
        assert_eq!(position, [2.0, 9.0, 0.0]);
        assert_eq!(rotation, [9.0, 9.0, 9.0]);
    }

    #[test]
    fn test_clock_is_monotonic() {
        let mut clock = AnimationClock::new();
        clock.advance(0.016);
        clock.advance(-1.0);
        clock.advance(f64::NAN);
        clock.advance(0.016);
        assert!((clock.elapsed() - 0.032).abs() < 1e-12);
    }

    #[test]
    fn test_light_orbit_wraps() {
        let mut orbit = LightOrbit::default();
        // 400 steps of 0.005π make exactly one full turn
        for _ in 0..1000 {
            let (x, z) = orbit.step();
            assert!(orbit.angle() >= 0.0 && orbit.angle() < TAU);
            assert!(((x * x + z * z).sqrt() - LIGHT_ORBIT_RADIUS).abs() < EPS);
        }
        let expected = (1000.0 * LIGHT_ORBIT_STEP).rem_euclid(TAU);
        assert!((orbit.angle() - expected).abs() < 1e-2);
    }
}
