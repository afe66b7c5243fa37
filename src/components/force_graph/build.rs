use std::collections::HashSet;

use log::warn;

use super::types::{GraphData, GraphLink, GraphNode};
use crate::catalog::CardRecord;

const FOCAL_POPULARITY: f64 = 100.0;

/// Star graph: the focal card linked to each related card.
///
/// Related cards repeating the focal id or an earlier id are dropped so the
/// node set stays uniquely keyed.
pub fn build_graph(focal: &CardRecord, related: &[CardRecord]) -> GraphData {
	let mut seen = HashSet::from([focal.id.as_str()]);
	let mut nodes = vec![node_for(focal, FOCAL_POPULARITY)];
	let mut links = Vec::with_capacity(related.len());

	for (i, card) in related.iter().enumerate() {
		if !seen.insert(card.id.as_str()) {
			warn!("dropping duplicate card {} ({})", card.name, card.id);
			continue;
		}
		nodes.push(node_for(card, rand_simple(i * 2) * 100.0));
		links.push(GraphLink {
			source: focal.id.clone(),
			target: card.id.clone(),
			weight: rand_simple(i * 2 + 1) * 5.0 + 1.0,
		});
	}

	GraphData { nodes, links }
}

fn node_for(card: &CardRecord, popularity: f64) -> GraphNode {
	GraphNode {
		id: card.id.clone(),
		name: card.name.clone(),
		image: card.image.clone(),
		popularity,
		card: card.clone(),
	}
}

/// Simple pseudo-random number in `[0, 1)` (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::catalog::filter::{self, FilterConfiguration};
	use crate::catalog::fixtures::card;
	use crate::components::force_graph::types::GraphError;

	fn catalog_results() -> Vec<CardRecord> {
		let mut cards: Vec<CardRecord> = (0..14)
			.map(|i| card(&format!("rel-{i}"), &format!("Rock {i}"), "Artifact", 2.0, &[], Some(0.5)))
			.collect();
		cards.insert(2, card("land-1", "Command Tower", "Land", 0.0, &[], Some(0.2)));
		cards.insert(5, card("land-2", "Reliquary Tower", "Land", 0.0, &[], Some(0.4)));
		cards
	}

	#[test]
	fn sol_ring_scenario() {
		let sol_ring = card("sol-ring", "Sol Ring", "Artifact", 1.0, &[], Some(1.5));
		let filter = FilterConfiguration {
			related_count: 10,
			include_lands: false,
			..Default::default()
		};
		let related = filter::apply(&catalog_results(), &filter);
		let graph = build_graph(&sol_ring, &related);

		assert_eq!(graph.nodes.len(), 11);
		assert_eq!(graph.links.len(), 10);
		assert!(graph.validate().is_ok());
		assert!(graph.links.iter().all(|l| l.source == "sol-ring"));
		assert!(graph.links.iter().all(|l| l.target != "sol-ring"));
		for link in &graph.links {
			let target = &graph.nodes[graph.index_of(&link.target).unwrap()];
			assert!(!target.card.is_land());
		}
	}

	#[test]
	fn empty_related_yields_single_node() {
		let focal = card("f", "Focal", "Creature", 3.0, &[], None);
		let graph = build_graph(&focal, &[]);
		assert_eq!(graph.nodes.len(), 1);
		assert!(graph.links.is_empty());
		assert_eq!(graph.nodes[0].popularity, 100.0);
	}

	#[test]
	fn duplicates_and_focal_echo_are_dropped() {
		let focal = card("f", "Focal", "Creature", 3.0, &[], None);
		let related = vec![
			card("a", "A", "Instant", 1.0, &[], None),
			card("f", "Focal", "Creature", 3.0, &[], None),
			card("a", "A", "Instant", 1.0, &[], None),
			card("b", "B", "Sorcery", 2.0, &[], None),
		];
		let graph = build_graph(&focal, &related);
		let ids: Vec<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["f", "a", "b"]);
		assert_eq!(graph.links.len(), 2);
		assert!(graph.validate().is_ok());
	}

	#[test]
	fn cosmetic_scalars_stay_in_range() {
		let focal = card("f", "Focal", "Creature", 3.0, &[], None);
		let related: Vec<_> = (0..20)
			.map(|i| card(&i.to_string(), "x", "Instant", 1.0, &[], None))
			.collect();
		let graph = build_graph(&focal, &related);
		assert!(graph.links.iter().all(|l| (1.0..6.0).contains(&l.weight)));
		assert!(graph.nodes[1..].iter().all(|n| (0.0..100.0).contains(&n.popularity)));
	}

	#[test]
	fn validate_rejects_bad_input() {
		let focal = card("f", "Focal", "Creature", 3.0, &[], None);
		let mut graph = build_graph(&focal, &[card("a", "A", "Instant", 1.0, &[], None)]);
		graph.links.push(GraphLink {
			source: "f".into(),
			target: "ghost".into(),
			weight: 1.0,
		});
		assert!(matches!(graph.validate(), Err(GraphError::DanglingLink { .. })));

		let mut dup = build_graph(&focal, &[]);
		dup.nodes.push(dup.nodes[0].clone());
		assert_eq!(dup.validate(), Err(GraphError::DuplicateNode("f".into())));
	}
}
