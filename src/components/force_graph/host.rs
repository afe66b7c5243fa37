use log::debug;

use super::simulation::TickSnapshot;
use super::state::ForceGraphState;
use super::types::{GraphData, GraphError};

/// Owns at most one live graph generation.
///
/// Loading new data stops the current simulation before the next one is
/// built, so a frame only ever advances the newest generation.
#[derive(Default)]
pub struct LayoutHost {
	current: Option<ForceGraphState>,
	generation: u64,
}

impl LayoutHost {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the graph. Empty data tears down without building a
	/// simulation and yields `Ok(None)`.
	pub fn load(&mut self, data: GraphData, width: f64, height: f64) -> Result<Option<u64>, GraphError> {
		self.teardown();
		if data.is_empty() {
			return Ok(None);
		}

		self.generation += 1;
		let state = ForceGraphState::new(data, width, height, self.generation)?;
		debug!("graph generation {} loaded", self.generation);
		self.current = Some(state);
		Ok(Some(self.generation))
	}

	pub fn teardown(&mut self) {
		if let Some(mut old) = self.current.take() {
			old.stop();
			debug!("graph generation {} torn down", old.generation());
		}
	}

	#[cfg(test)]
	pub fn generation(&self) -> Option<u64> {
		self.current.as_ref().map(|s| s.generation())
	}

	pub fn state(&self) -> Option<&ForceGraphState> {
		self.current.as_ref()
	}

	pub fn state_mut(&mut self) -> Option<&mut ForceGraphState> {
		self.current.as_mut()
	}

	pub fn frame(&mut self, now: f64) -> Option<TickSnapshot> {
		self.current.as_mut()?.frame(now).cloned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::catalog::fixtures::card;
	use crate::components::force_graph::build::build_graph;

	fn graph(prefix: &str, leaves: usize) -> GraphData {
		let focal = card(&format!("{prefix}-hub"), "Hub", "Artifact", 1.0, &[], None);
		let related: Vec<_> = (0..leaves)
			.map(|i| card(&format!("{prefix}-{i}"), "Leaf", "Artifact", 2.0, &[], None))
			.collect();
		build_graph(&focal, &related)
	}

	#[test]
	fn swapping_data_never_delivers_old_generation() {
		let mut host = LayoutHost::new();
		let first = host.load(graph("a", 5), 800.0, 600.0).unwrap().unwrap();
		for i in 0..10 {
			assert_eq!(host.frame(i as f64).unwrap().generation, first);
		}

		let second = host.load(graph("b", 3), 800.0, 600.0).unwrap().unwrap();
		assert!(second > first);
		let mut now = 0.0;
		while let Some(snapshot) = host.frame(now) {
			assert_eq!(snapshot.generation, second);
			assert_eq!(snapshot.positions.len(), 4);
			now += 16.0;
		}
	}

	#[test]
	fn empty_data_skips_simulation() {
		let mut host = LayoutHost::new();
		host.load(graph("a", 2), 800.0, 600.0).unwrap();
		assert_eq!(host.load(GraphData::default(), 800.0, 600.0).unwrap(), None);
		assert!(host.state().is_none());
		assert!(host.frame(0.0).is_none());
	}

	#[test]
	fn single_card_graph_renders() {
		let mut host = LayoutHost::new();
		let generation = host.load(graph("solo", 0), 800.0, 600.0).unwrap();
		assert!(generation.is_some());
		let snapshot = host.frame(0.0).unwrap();
		assert_eq!(snapshot.positions.len(), 1);
		assert!(host.state().unwrap().edges().is_empty());
	}

	#[test]
	fn invalid_data_leaves_host_empty() {
		let mut host = LayoutHost::new();
		let mut data = graph("a", 2);
		data.links[0].target = "missing".into();
		assert!(host.load(data, 800.0, 600.0).is_err());
		assert!(host.generation().is_none());
	}
}
