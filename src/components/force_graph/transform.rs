use super::simulation::Point;

pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 5.0;
pub const ZOOM_IN_FACTOR: f64 = 1.3;
pub const ZOOM_OUT_FACTOR: f64 = 0.7;
pub const ZOOM_DURATION_MS: f64 = 300.0;

/// Pan offset and uniform scale applied to the whole graph container.
/// Screen = graph * k + (x, y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl ViewTransform {
	pub const IDENTITY: ViewTransform = ViewTransform {
		x: 0.0,
		y: 0.0,
		k: 1.0,
	};

	pub fn apply(&self, p: Point) -> (f64, f64) {
		(p.x * self.k + self.x, p.y * self.k + self.y)
	}

	pub fn invert(&self, sx: f64, sy: f64) -> Point {
		Point::new((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Scales by `factor` keeping the screen point `(ax, ay)` fixed. The
	/// resulting scale is clamped to `[MIN_SCALE, MAX_SCALE]`.
	pub fn scaled_about(&self, factor: f64, ax: f64, ay: f64) -> Self {
		let k = (self.k * factor).clamp(MIN_SCALE, MAX_SCALE);
		let ratio = k / self.k;
		Self {
			x: ax - (ax - self.x) * ratio,
			y: ay - (ay - self.y) * ratio,
			k,
		}
	}

	pub fn translated(&self, dx: f64, dy: f64) -> Self {
		Self {
			x: self.x + dx,
			y: self.y + dy,
			k: self.k,
		}
	}

	fn lerp(&self, to: &ViewTransform, t: f64) -> Self {
		Self {
			x: self.x + (to.x - self.x) * t,
			y: self.y + (to.y - self.y) * t,
			k: self.k + (to.k - self.k) * t,
		}
	}
}

fn ease_in_out_cubic(t: f64) -> f64 {
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
	}
}

/// Eased transition between two transforms. The clock starts on the first
/// sample, so an animation created from an input handler begins on the
/// next frame.
#[derive(Clone, Debug)]
pub struct ZoomAnimation {
	from: ViewTransform,
	to: ViewTransform,
	start: Option<f64>,
	duration: f64,
}

impl ZoomAnimation {
	pub fn new(from: ViewTransform, to: ViewTransform) -> Self {
		Self {
			from,
			to,
			start: None,
			duration: ZOOM_DURATION_MS,
		}
	}

	/// Transform at time `now` (ms) and whether the animation has finished.
	pub fn sample(&mut self, now: f64) -> (ViewTransform, bool) {
		let start = *self.start.get_or_insert(now);
		let t = ((now - start) / self.duration).clamp(0.0, 1.0);
		if t >= 1.0 {
			return (self.to, true);
		}
		(self.from.lerp(&self.to, ease_in_out_cubic(t)), false)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn scale_stays_clamped() {
		let mut t = ViewTransform::IDENTITY;
		for _ in 0..50 {
			t = t.scaled_about(ZOOM_IN_FACTOR, 400.0, 300.0);
			assert!(t.k <= MAX_SCALE);
		}
		assert_eq!(t.k, MAX_SCALE);
		for _ in 0..50 {
			t = t.scaled_about(ZOOM_OUT_FACTOR, 400.0, 300.0);
			assert!(t.k >= MIN_SCALE);
		}
		assert_eq!(t.k, MIN_SCALE);
	}

	#[test]
	fn scaling_keeps_anchor_fixed() {
		let t = ViewTransform { x: 30.0, y: -20.0, k: 1.2 };
		let anchor = t.invert(250.0, 180.0);
		let zoomed = t.scaled_about(1.3, 250.0, 180.0);
		let (sx, sy) = zoomed.apply(anchor);
		assert!((sx - 250.0).abs() < 1e-9 && (sy - 180.0).abs() < 1e-9);
	}

	#[test]
	fn invert_undoes_apply() {
		let t = ViewTransform { x: 12.5, y: 40.0, k: 2.5 };
		let p = Point::new(-33.0, 71.0);
		let (sx, sy) = t.apply(p);
		let back = t.invert(sx, sy);
		assert!(back.distance(p) < 1e-9);
	}

	#[test]
	fn animation_runs_for_fixed_duration() {
		let to = ViewTransform::IDENTITY.scaled_about(ZOOM_IN_FACTOR, 400.0, 300.0);
		let mut anim = ZoomAnimation::new(ViewTransform::IDENTITY, to);

		let (first, done) = anim.sample(1000.0);
		assert!(!done);
		assert_eq!(first, ViewTransform::IDENTITY);

		let (mid, done) = anim.sample(1150.0);
		assert!(!done);
		assert!(mid.k > 1.0 && mid.k < ZOOM_IN_FACTOR);

		let (end, done) = anim.sample(1300.0);
		assert!(done);
		assert_eq!(end, to);
	}

	#[test]
	fn reset_animates_back_to_identity() {
		let from = ViewTransform { x: -120.0, y: 60.0, k: 3.0 };
		let mut anim = ZoomAnimation::new(from, ViewTransform::IDENTITY);
		anim.sample(0.0);
		let (end, done) = anim.sample(ZOOM_DURATION_MS + 16.0);
		assert!(done);
		assert_eq!(end, ViewTransform::IDENTITY);
	}
}
