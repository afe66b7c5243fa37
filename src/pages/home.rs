use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info, warn};

use crate::catalog::{CardRecord, CatalogClient, CatalogError, FilterConfiguration, RequestTracker};
use crate::components::filters::Filters;
use crate::components::force_graph::{ForceGraphCanvas, GraphData, build_graph};
use crate::components::search_bar::SearchBar;

/// What a request needs to resolve before the graph can be built.
#[derive(Clone)]
enum Focus {
	/// A fresh search: resolve the fuzzy name first.
	Query(String),
	/// A filter change for the card already on screen.
	Card(CardRecord),
}

/// Inline message for a failed request.
fn error_message(err: &CatalogError) -> String {
	if err.is_not_found() {
		"Card not found".into()
	} else {
		"An error occurred while fetching card data".into()
	}
}

/// Everything the page shows. Only changes at request boundaries.
#[derive(Clone, Debug, Default, PartialEq)]
struct PageState {
	loading: bool,
	error: Option<String>,
	card: Option<CardRecord>,
	graph: GraphData,
}

impl PageState {
	fn begin(&mut self) {
		self.loading = true;
		self.error = None;
	}

	/// Folds a finished request into the page. A superseded request leaves
	/// everything, `loading` included, to the newer one and returns false.
	///
	/// Not-found clears the graph; any other failure keeps the last one.
	fn settle(
		&mut self,
		current: bool,
		outcome: Result<(CardRecord, Vec<CardRecord>), CatalogError>,
	) -> bool {
		if !current {
			return false;
		}

		match outcome {
			Ok((card, related)) => {
				info!("{}: {} related cards", card.name, related.len());
				self.graph = build_graph(&card, &related);
				self.card = Some(card);
				self.error = None;
			}
			Err(err) => {
				error!("catalog request failed: {err}");
				if err.is_not_found() {
					self.card = None;
					self.graph = GraphData::default();
				}
				self.error = Some(error_message(&err));
			}
		}
		self.loading = false;
		true
	}
}

async fn resolve(
	client: &CatalogClient,
	focus: Focus,
	filter: &FilterConfiguration,
) -> Result<(CardRecord, Vec<CardRecord>), CatalogError> {
	let card = match focus {
		Focus::Card(card) => card,
		Focus::Query(query) => client.fetch_card(&query).await?,
	};
	let related = client.fetch_related(&card.name, filter).await?;
	Ok((card, related))
}

/// Search page: query box, filters and the card graph.
#[component]
pub fn Home() -> impl IntoView {
	let client = StoredValue::new_local(CatalogClient::default());
	let tracker = StoredValue::new_local(RequestTracker::new());

	let page = RwSignal::new(PageState::default());
	let filters = RwSignal::new(FilterConfiguration::default());

	let loading = Memo::new(move |_| page.with(|p| p.loading));
	let error_text = Memo::new(move |_| page.with(|p| p.error.clone()));
	let graph = Memo::new(move |_| page.with(|p| p.graph.clone()));
	let has_graph = Memo::new(move |_| page.with(|p| !p.graph.is_empty()));

	let run = move |focus: Focus, filter: FilterConfiguration| {
		let token = tracker.with_value(|t| t.begin());
		page.update(PageState::begin);

		spawn_local(async move {
			let client = client.get_value();
			let outcome = resolve(&client, focus, &filter).await;

			let current = tracker.with_value(|t| t.is_current(token));
			let mut next = page.get_untracked();
			if next.settle(current, outcome) {
				page.set(next);
			} else {
				warn!("dropping response for a superseded request");
			}
		});
	};

	let on_search = move |query: String| {
		info!("searching for \"{query}\"");
		run(Focus::Query(query), filters.get_untracked());
	};

	let on_filter_change = move |next: FilterConfiguration| {
		filters.set(next.clone());
		if let Some(card) = page.with_untracked(|p| p.card.clone()) {
			run(Focus::Card(card), next);
		}
	};

	view! {
		<div class="app">
			<header class="app-header">
				<h1>"MTG Commander Visualizer"</h1>
			</header>

			<main class="app-main">
				<SearchBar on_search=on_search loading=loading />
				<Filters current=filters on_change=on_filter_change />

				<Show when=move || error_text.with(Option::is_some)>
					<div class="error-banner">{move || error_text.get()}</div>
				</Show>

				{move || {
					if loading.get() {
						view! {
							<div class="loading">
								<div class="spinner"></div>
							</div>
						}
							.into_any()
					} else if has_graph.get() {
						view! {
							<div class="graph-panel">
								<ForceGraphCanvas data=graph />
							</div>
						}
							.into_any()
					} else {
						view! {
							<div class="empty-prompt">
								"Search for any Magic card to see popular cards in Commander"
							</div>
						}
							.into_any()
					}
				}}
			</main>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::catalog::fixtures::card;

	fn sol_ring() -> CardRecord {
		card("sol-ring", "Sol Ring", "Artifact", 1.0, &[], Some(1.5))
	}

	fn related(n: usize) -> Vec<CardRecord> {
		(0..n)
			.map(|i| card(&format!("rel-{i}"), &format!("Card {i}"), "Artifact", 2.0, &[], None))
			.collect()
	}

	/// A page showing Sol Ring's graph with a request in flight.
	fn loaded_then_loading() -> PageState {
		let mut page = PageState::default();
		page.begin();
		assert!(page.settle(true, Ok((sol_ring(), related(4)))));
		page.begin();
		page
	}

	#[test]
	fn success_builds_graph_and_clears_loading() {
		let mut page = PageState::default();
		page.begin();
		assert!(page.loading);

		assert!(page.settle(true, Ok((sol_ring(), related(10)))));
		assert!(!page.loading);
		assert_eq!(page.error, None);
		assert_eq!(page.card.as_ref().map(|c| c.id.as_str()), Some("sol-ring"));
		assert_eq!(page.graph.nodes.len(), 11);
		assert_eq!(page.graph.links.len(), 10);
	}

	#[test]
	fn empty_related_result_is_not_an_error() {
		let mut page = PageState::default();
		page.begin();
		assert!(page.settle(true, Ok((sol_ring(), Vec::new()))));
		assert_eq!(page.error, None);
		assert_eq!(page.graph.nodes.len(), 1);
		assert!(page.graph.links.is_empty());
	}

	#[test]
	fn not_found_clears_graph_and_card() {
		let mut page = loaded_then_loading();
		let err = CatalogError::NotFound {
			query: "sol rnig".into(),
		};
		assert!(page.settle(true, Err(err)));

		assert!(!page.loading);
		assert_eq!(page.error.as_deref(), Some("Card not found"));
		assert_eq!(page.card, None);
		assert!(page.graph.is_empty());
	}

	#[test]
	fn other_failures_keep_prior_graph() {
		let failures = [
			CatalogError::Network("connection reset".into()),
			CatalogError::Status(503),
			CatalogError::Malformed("expected value".into()),
		];
		for err in failures {
			let mut page = loaded_then_loading();
			let (graph, card) = (page.graph.clone(), page.card.clone());

			assert!(page.settle(true, Err(err)));
			assert!(!page.loading);
			assert_eq!(page.error.as_deref(), Some("An error occurred while fetching card data"));
			assert_eq!(page.graph, graph);
			assert_eq!(page.card, card);
		}
	}

	#[test]
	fn superseded_completion_changes_nothing() {
		let tracker = RequestTracker::new();
		let mut page = PageState::default();

		let old = tracker.begin();
		page.begin();
		let new = tracker.begin();
		page.begin();

		let before = page.clone();
		assert!(!page.settle(tracker.is_current(old), Ok((sol_ring(), related(3)))));
		assert_eq!(page, before);
		assert!(page.loading);

		let err = CatalogError::NotFound { query: "x".into() };
		assert!(!page.settle(tracker.is_current(old), Err(err)));
		assert_eq!(page, before);

		assert!(page.settle(tracker.is_current(new), Ok((sol_ring(), related(2)))));
		assert!(!page.loading);
		assert_eq!(page.graph.nodes.len(), 3);
	}

	#[test]
	fn new_request_clears_previous_error() {
		let mut page = PageState::default();
		page.begin();
		page.settle(true, Err(CatalogError::Status(500)));
		assert!(page.error.is_some());
		page.begin();
		assert_eq!(page.error, None);
		assert!(page.loading);
	}
}
