use std::collections::HashSet;

use super::simulation::{Point, Simulation, SimulationConfig, TickSnapshot};
use super::transform::{ViewTransform, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR, ZoomAnimation};
use super::types::{GraphData, GraphError, GraphNode};

/// Card background, in graph units, relative to the node position.
pub const CARD_LEFT: f64 = -30.0;
pub const CARD_TOP: f64 = -40.0;
pub const CARD_WIDTH: f64 = 60.0;
pub const CARD_HEIGHT: f64 = 84.0;

const WHEEL_ZOOM_IN: f64 = 1.1;
const WHEEL_ZOOM_OUT: f64 = 0.9;

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<usize>,
	/// Node position minus pointer position, in graph space.
	grab_offset: Point,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start: ViewTransform,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub neighbors: HashSet<usize>,
}

/// One generation of the graph: the layout plus the interaction state laid
/// over it.
pub struct ForceGraphState {
	pub data: GraphData,
	simulation: Simulation,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	/// Last pointer position over the canvas, in screen space.
	pointer: Option<(f64, f64)>,
	zoom: Option<ZoomAnimation>,
	edges: Vec<(usize, usize)>,
	last_snapshot: Option<TickSnapshot>,
}

impl ForceGraphState {
	pub fn new(data: GraphData, width: f64, height: f64, generation: u64) -> Result<Self, GraphError> {
		let simulation = Simulation::new(
			&data,
			Point::new(width / 2.0, height / 2.0),
			SimulationConfig::default(),
			generation,
		)?;
		let edges = data
			.links
			.iter()
			.filter_map(|l| Some((data.index_of(&l.source)?, data.index_of(&l.target)?)))
			.collect();
		let last_snapshot = Some(simulation.snapshot());

		Ok(Self {
			data,
			simulation,
			edges,
			transform: ViewTransform::IDENTITY,
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			pointer: None,
			zoom: None,
			last_snapshot,
		})
	}

	pub fn generation(&self) -> u64 {
		self.simulation.generation()
	}

	#[cfg(test)]
	pub fn simulation(&self) -> &Simulation {
		&self.simulation
	}

	pub fn edges(&self) -> &[(usize, usize)] {
		&self.edges
	}

	/// Positions as of the latest tick.
	pub fn snapshot(&self) -> Option<&TickSnapshot> {
		self.last_snapshot.as_ref()
	}

	pub fn node(&self, idx: usize) -> Option<&GraphNode> {
		self.data.nodes.get(idx)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		self.transform.invert(sx, sy)
	}

	/// Topmost card under the screen point. Later nodes are drawn on top.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let p = self.screen_to_graph(sx, sy);
		(0..self.simulation.len()).rev().find(|&idx| {
			self.simulation.position(idx).is_some_and(|node| {
				let (dx, dy) = (p.x - node.x, p.y - node.y);
				(CARD_LEFT..=CARD_LEFT + CARD_WIDTH).contains(&dx)
					&& (CARD_TOP..=CARD_TOP + CARD_HEIGHT).contains(&dy)
			})
		})
	}

	/// Pointer pressed: grab the card under it, or start panning.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		self.zoom = None;
		self.pointer = Some((sx, sy));
		match self.node_at_position(sx, sy) {
			Some(idx) => self.begin_drag(idx, sx, sy),
			None => {
				self.pan = PanState {
					active: true,
					start_x: sx,
					start_y: sy,
					transform_start: self.transform,
				};
			}
		}
	}

	pub fn begin_drag(&mut self, idx: usize, sx: f64, sy: f64) {
		let Some(node) = self.simulation.position(idx) else {
			return;
		};
		let pointer = self.screen_to_graph(sx, sy);
		self.drag = DragState {
			active: true,
			node_idx: Some(idx),
			grab_offset: Point::new(node.x - pointer.x, node.y - pointer.y),
		};
		self.simulation.pin(idx, node);
		let target = self.simulation.config().drag_alpha_target;
		self.simulation.set_alpha_target(target);
		self.simulation.restart();
	}

	/// Pointer moved: follow with the dragged card or the pan.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		self.pointer = Some((sx, sy));
		if self.drag.active {
			if let Some(idx) = self.drag.node_idx {
				let pointer = self.screen_to_graph(sx, sy);
				let offset = self.drag.grab_offset;
				self.simulation
					.pin(idx, Point::new(pointer.x + offset.x, pointer.y + offset.y));
			}
		} else if self.pan.active {
			self.transform = self
				.pan
				.transform_start
				.translated(sx - self.pan.start_x, sy - self.pan.start_y);
		}
	}

	/// Pointer released. A dragged card stays pinned where it was dropped.
	pub fn pointer_up(&mut self) {
		if self.drag.active {
			self.simulation.set_alpha_target(0.0);
		}
		self.drag = DragState::default();
		self.pan.active = false;
	}

	pub fn pointer_leave(&mut self) {
		self.pointer_up();
		self.pointer = None;
		self.set_hover(None);
	}

	/// Double click: lets go of a card pinned by an earlier drag and reheats
	/// the layout so it settles back in. False if no pinned card is there.
	pub fn release_pin(&mut self, sx: f64, sy: f64) -> bool {
		let Some(idx) = self.node_at_position(sx, sy) else {
			return false;
		};
		if !self.simulation.is_pinned(idx) {
			return false;
		}
		self.simulation.unpin(idx);
		let reheat = self.simulation.config().drag_alpha_target;
		self.simulation.set_alpha(reheat);
		self.simulation.restart();
		true
	}

	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		self.zoom = None;
		let factor = if delta_y > 0.0 { WHEEL_ZOOM_OUT } else { WHEEL_ZOOM_IN };
		self.transform = self.transform.scaled_about(factor, sx, sy);
	}

	pub fn zoom_in(&mut self) {
		self.animate_to(
			self.transform
				.scaled_about(ZOOM_IN_FACTOR, self.width / 2.0, self.height / 2.0),
		);
	}

	pub fn zoom_out(&mut self) {
		self.animate_to(
			self.transform
				.scaled_about(ZOOM_OUT_FACTOR, self.width / 2.0, self.height / 2.0),
		);
	}

	pub fn reset_zoom(&mut self) {
		self.animate_to(ViewTransform::IDENTITY);
	}

	fn animate_to(&mut self, target: ViewTransform) {
		self.zoom = Some(ZoomAnimation::new(self.transform, target));
	}

	#[cfg(test)]
	pub fn is_zooming(&self) -> bool {
		self.zoom.is_some()
	}

	pub fn set_hover(&mut self, node: Option<usize>) -> bool {
		if self.hover.node == node {
			return false;
		}
		self.hover.node = node;
		self.hover.neighbors.clear();
		if let Some(idx) = node {
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
		true
	}

	/// Hit-tests the last pointer position again. Cards keep moving under a
	/// still pointer, so this runs after frames as well as pointer moves.
	/// Hover is frozen during a drag. True when the hovered card changed.
	pub fn refresh_hover(&mut self) -> bool {
		if self.drag.active {
			return false;
		}
		let hovered = self.pointer.and_then(|(sx, sy)| self.node_at_position(sx, sy));
		self.set_hover(hovered)
	}

	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.hover.node == Some(idx) || self.hover.neighbors.contains(&idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some()
	}

	/// Advances the zoom animation and the layout by one frame. Returns the
	/// new positions if the layout moved.
	pub fn frame(&mut self, now: f64) -> Option<&TickSnapshot> {
		if let Some(anim) = self.zoom.as_mut() {
			let (transform, done) = anim.sample(now);
			self.transform = transform;
			if done {
				self.zoom = None;
			}
		}

		let snapshot = self.simulation.tick()?;
		self.last_snapshot = Some(snapshot);
		self.last_snapshot.as_ref()
	}

	pub fn stop(&mut self) {
		self.simulation.stop();
	}
}
