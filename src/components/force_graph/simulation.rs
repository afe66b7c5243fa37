//! Tick-based force layout.
//!
//! The simulation exclusively owns every node's position, velocity and pin.
//! Everything else addresses nodes by index and reads positions back, and the
//! only write path is [`Simulation::pin`] / [`Simulation::unpin`].
//!
//! Each tick runs, in order: link springs and many-body charge (velocity),
//! integration with velocity decay, centering, then a positional collision
//! pass that has the final word on where unpinned nodes end up.

use std::collections::HashMap;
use std::f64::consts::PI;

use log::debug;

use super::types::{GraphData, GraphError};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	#[cfg(test)]
	pub fn distance(self, other: Point) -> f64 {
		((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
	}
}

#[derive(Clone, Debug)]
pub struct SimulationConfig {
	/// Rest length of every link spring.
	pub link_distance: f64,
	/// Many-body strength; negative repels.
	pub charge_strength: f64,
	/// Pairs further apart than this do not interact.
	pub charge_distance_max: f64,
	pub collision_radius: f64,
	/// Fraction of the centroid offset removed per tick.
	pub center_strength: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	/// Alpha target held while a node is being dragged.
	pub drag_alpha_target: f64,
	pub collision_iterations: usize,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		let alpha_min: f64 = 0.001;
		Self {
			link_distance: 150.0,
			charge_strength: -800.0,
			charge_distance_max: 350.0,
			collision_radius: 60.0,
			center_strength: 0.5,
			velocity_decay: 0.7,
			alpha_min,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			drag_alpha_target: 0.3,
			collision_iterations: 128,
		}
	}
}

const CHARGE_DISTANCE_MIN_SQ: f64 = 1.0;
const COLLISION_SLOP: f64 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RunState {
	Running,
	Idle,
	Stopped,
}

#[derive(Clone, Debug, Default)]
struct Body {
	pos: Point,
	vel: Point,
	pin: Option<Point>,
}

#[derive(Clone, Debug)]
struct Spring {
	source: usize,
	target: usize,
	strength: f64,
	bias: f64,
}

/// Positions delivered to the renderer after a tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TickSnapshot {
	pub generation: u64,
	pub alpha: f64,
	pub positions: Vec<Point>,
	pub pinned: Vec<usize>,
}

pub struct Simulation {
	config: SimulationConfig,
	bodies: Vec<Body>,
	springs: Vec<Spring>,
	center: Point,
	alpha: f64,
	alpha_target: f64,
	generation: u64,
	state: RunState,
}

impl Simulation {
	/// Lays the nodes out on a phyllotaxis spiral around `center` and starts
	/// at full energy.
	pub fn new(
		data: &GraphData,
		center: Point,
		config: SimulationConfig,
		generation: u64,
	) -> Result<Self, GraphError> {
		data.validate()?;

		let index: HashMap<&str, usize> = data
			.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.as_str(), i))
			.collect();

		let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
		let bodies = (0..data.nodes.len())
			.map(|i| {
				let (radius, angle) = (10.0 * (0.5 + i as f64).sqrt(), i as f64 * golden_angle);
				Body {
					pos: Point::new(
						center.x + radius * angle.cos(),
						center.y + radius * angle.sin(),
					),
					..Default::default()
				}
			})
			.collect();

		let mut degree = vec![0usize; data.nodes.len()];
		let pairs: Vec<(usize, usize)> = data
			.links
			.iter()
			.map(|l| (index[l.source.as_str()], index[l.target.as_str()]))
			.collect();
		for &(s, t) in &pairs {
			degree[s] += 1;
			degree[t] += 1;
		}
		let springs = pairs
			.into_iter()
			.map(|(source, target)| {
				let (ds, dt) = (degree[source] as f64, degree[target] as f64);
				Spring {
					source,
					target,
					strength: 1.0 / ds.min(dt),
					bias: ds / (ds + dt),
				}
			})
			.collect();

		debug!(
			"simulation #{generation}: {} nodes, {} links",
			data.nodes.len(),
			data.links.len()
		);

		Ok(Self {
			config,
			bodies,
			springs,
			center,
			alpha: 1.0,
			alpha_target: 0.0,
			generation,
			state: RunState::Running,
		})
	}

	pub fn len(&self) -> usize {
		self.bodies.len()
	}

	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	pub fn set_alpha(&mut self, alpha: f64) {
		self.alpha = alpha.clamp(0.0, 1.0);
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target.clamp(0.0, 1.0);
	}

	pub fn position(&self, idx: usize) -> Option<Point> {
		self.bodies.get(idx).map(|b| b.pos)
	}

	#[cfg(test)]
	pub fn velocity(&self, idx: usize) -> Option<Point> {
		self.bodies.get(idx).map(|b| b.vel)
	}

	pub fn positions(&self) -> Vec<Point> {
		self.bodies.iter().map(|b| b.pos).collect()
	}

	pub fn pinned(&self) -> Vec<usize> {
		(0..self.bodies.len())
			.filter(|&i| self.bodies[i].pin.is_some())
			.collect()
	}

	pub fn is_pinned(&self, idx: usize) -> bool {
		self.bodies.get(idx).is_some_and(|b| b.pin.is_some())
	}

	/// Fixes a node at `at` until [`Simulation::unpin`].
	pub fn pin(&mut self, idx: usize, at: Point) {
		if let Some(body) = self.bodies.get_mut(idx) {
			body.pin = Some(at);
			body.pos = at;
			body.vel = Point::default();
		}
	}

	pub fn unpin(&mut self, idx: usize) {
		if let Some(body) = self.bodies.get_mut(idx) {
			body.pin = None;
		}
	}

	#[cfg(test)]
	pub fn is_idle(&self) -> bool {
		self.state == RunState::Idle
	}

	#[cfg(test)]
	pub fn is_stopped(&self) -> bool {
		self.state == RunState::Stopped
	}

	/// Resumes ticking from the current positions and velocities.
	pub fn restart(&mut self) {
		if self.state == RunState::Idle {
			debug!("simulation #{} reheated", self.generation);
			self.state = RunState::Running;
		}
	}

	/// Halts the simulation for good; later ticks produce nothing.
	pub fn stop(&mut self) {
		if self.state != RunState::Stopped {
			debug!("simulation #{} stopped", self.generation);
			self.state = RunState::Stopped;
		}
	}

	/// Advances one step. Returns `None` once idle or stopped.
	pub fn tick(&mut self) -> Option<TickSnapshot> {
		if self.state != RunState::Running {
			return None;
		}

		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

		self.apply_links();
		self.apply_charge();
		self.integrate();
		self.apply_center();
		self.resolve_collisions();

		if self.alpha < self.config.alpha_min {
			debug!("simulation #{} idle", self.generation);
			self.state = RunState::Idle;
		}

		Some(self.snapshot())
	}

	pub fn snapshot(&self) -> TickSnapshot {
		TickSnapshot {
			generation: self.generation,
			alpha: self.alpha,
			positions: self.positions(),
			pinned: self.pinned(),
		}
	}

	fn apply_links(&mut self) {
		let (distance, alpha) = (self.config.link_distance, self.alpha);
		for (k, spring) in self.springs.iter().enumerate() {
			let (s, t) = (&self.bodies[spring.source], &self.bodies[spring.target]);
			let mut dx = t.pos.x + t.vel.x - s.pos.x - s.vel.x;
			let mut dy = t.pos.y + t.vel.y - s.pos.y - s.vel.y;
			if dx == 0.0 && dy == 0.0 {
				(dx, dy) = jiggle(spring.source, spring.target + k);
			}
			let len = (dx * dx + dy * dy).sqrt();
			let scale = (len - distance) / len * alpha * spring.strength;
			let (dx, dy) = (dx * scale, dy * scale);

			let target = &mut self.bodies[spring.target];
			target.vel.x -= dx * spring.bias;
			target.vel.y -= dy * spring.bias;
			let source = &mut self.bodies[spring.source];
			source.vel.x += dx * (1.0 - spring.bias);
			source.vel.y += dy * (1.0 - spring.bias);
		}
	}

	fn apply_charge(&mut self) {
		let n = self.bodies.len();
		let max_sq = self.config.charge_distance_max * self.config.charge_distance_max;
		let weight = self.config.charge_strength * self.alpha;

		for i in 0..n {
			let (mut ax, mut ay) = (0.0, 0.0);
			let pi = self.bodies[i].pos;
			for j in 0..n {
				if i == j {
					continue;
				}
				let pj = self.bodies[j].pos;
				let (mut dx, mut dy) = (pj.x - pi.x, pj.y - pi.y);
				let mut l = dx * dx + dy * dy;
				if l >= max_sq {
					continue;
				}
				if dx == 0.0 && dy == 0.0 {
					(dx, dy) = jiggle(i.min(j), i.max(j));
					if i > j {
						(dx, dy) = (-dx, -dy);
					}
					l = dx * dx + dy * dy;
				}
				if l < CHARGE_DISTANCE_MIN_SQ {
					l = (CHARGE_DISTANCE_MIN_SQ * l).sqrt();
				}
				ax += dx * weight / l;
				ay += dy * weight / l;
			}
			self.bodies[i].vel.x += ax;
			self.bodies[i].vel.y += ay;
		}
	}

	fn integrate(&mut self) {
		let keep = 1.0 - self.config.velocity_decay;
		for body in &mut self.bodies {
			match body.pin {
				Some(pin) => {
					body.pos = pin;
					body.vel = Point::default();
				}
				None => {
					body.vel.x *= keep;
					body.vel.y *= keep;
					body.pos.x += body.vel.x;
					body.pos.y += body.vel.y;
				}
			}
		}
	}

	fn apply_center(&mut self) {
		let n = self.bodies.len() as f64;
		if n == 0.0 {
			return;
		}
		let (sx, sy) = self
			.bodies
			.iter()
			.fold((0.0, 0.0), |(sx, sy), b| (sx + b.pos.x, sy + b.pos.y));
		let shift_x = (sx / n - self.center.x) * self.config.center_strength;
		let shift_y = (sy / n - self.center.y) * self.config.center_strength;
		for body in self.bodies.iter_mut().filter(|b| b.pin.is_none()) {
			body.pos.x -= shift_x;
			body.pos.y -= shift_y;
		}
	}

	/// Pushes overlapping discs apart until none overlap or the iteration
	/// budget runs out. Pinned nodes never move.
	fn resolve_collisions(&mut self) {
		let n = self.bodies.len();
		let min_distance = self.config.collision_radius * 2.0;

		for _ in 0..self.config.collision_iterations {
			let mut moved = false;
			for i in 0..n {
				for j in (i + 1)..n {
					let (a, b) = (self.bodies[i].pos, self.bodies[j].pos);
					let (mut dx, mut dy) = (b.x - a.x, b.y - a.y);
					let mut distance = (dx * dx + dy * dy).sqrt();
					if distance >= min_distance {
						continue;
					}
					if distance == 0.0 {
						(dx, dy) = jiggle(i, j);
						distance = (dx * dx + dy * dy).sqrt();
					}

					let (pin_a, pin_b) = (self.bodies[i].pin.is_some(), self.bodies[j].pin.is_some());
					let share_a = match (pin_a, pin_b) {
						(true, true) => continue,
						(true, false) => 0.0,
						(false, true) => 1.0,
						(false, false) => 0.5,
					};

					let push = (min_distance - distance + COLLISION_SLOP) / distance;
					let (px, py) = (dx * push, dy * push);
					self.bodies[i].pos.x -= px * share_a;
					self.bodies[i].pos.y -= py * share_a;
					self.bodies[j].pos.x += px * (1.0 - share_a);
					self.bodies[j].pos.y += py * (1.0 - share_a);
					moved = true;
				}
			}
			if !moved {
				break;
			}
		}
	}
}

/// Tiny deterministic direction for coincident points.
fn jiggle(a: usize, b: usize) -> (f64, f64) {
	let angle = ((a as f64) * 0.618_034 + (b as f64) * 0.414_214 + 0.37) * std::f64::consts::TAU;
	(angle.cos() * 1e-6, angle.sin() * 1e-6)
}
