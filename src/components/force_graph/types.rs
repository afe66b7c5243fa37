use std::collections::HashSet;

use thiserror::Error;

use crate::catalog::CardRecord;

/// A card placed in the graph. Identity is the card id.
///
/// Positions are not stored here: the simulation owns them and nodes are
/// addressed by their index in [`GraphData::nodes`].
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub name: String,
	pub image: Option<String>,
	/// Cosmetic only; does not affect layout.
	pub popularity: f64,
	pub card: CardRecord,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
	/// Stroke width factor. All links share the same spring.
	pub weight: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphError {
	#[error("duplicate node id {0}")]
	DuplicateNode(String),

	#[error("link {from} -> {to} references a missing node")]
	DanglingLink { from: String, to: String },
}

impl GraphData {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.nodes.iter().position(|n| n.id == id)
	}

	/// Checks that node ids are unique and every link endpoint exists.
	pub fn validate(&self) -> Result<(), GraphError> {
		let mut seen = HashSet::with_capacity(self.nodes.len());
		for node in &self.nodes {
			if !seen.insert(node.id.as_str()) {
				return Err(GraphError::DuplicateNode(node.id.clone()));
			}
		}
		for link in &self.links {
			if !seen.contains(link.source.as_str()) || !seen.contains(link.target.as_str()) {
				return Err(GraphError::DanglingLink {
					from: link.source.clone(),
					to: link.target.clone(),
				});
			}
		}
		Ok(())
	}
}
