use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};
use reqwest::StatusCode;
use serde::Deserialize;

use super::cache::{DEFAULT_TTL_MS, ResponseCache, now_ms};
use super::card::CardRecord;
use super::error::CatalogError;
use super::filter::{self, FilterConfiguration};

#[derive(Clone, Debug)]
pub struct CatalogConfig {
	pub base_url: String,
	pub cache_ttl_ms: f64,
	/// Upper bound on `next_page` follows for one related-card search.
	pub max_search_pages: usize,
}

impl Default for CatalogConfig {
	fn default() -> Self {
		Self {
			base_url: "https://api.scryfall.com".into(),
			cache_ttl_ms: DEFAULT_TTL_MS,
			max_search_pages: 3,
		}
	}
}

#[derive(Deserialize)]
struct SearchPage {
	#[serde(default)]
	data: Vec<CardRecord>,
	#[serde(default)]
	has_more: bool,
	next_page: Option<String>,
}

/// Scryfall-backed card catalog. Cheap to clone; clones share one cache.
#[derive(Clone)]
pub struct CatalogClient {
	http: reqwest::Client,
	config: Rc<CatalogConfig>,
	cards: Rc<RefCell<ResponseCache<CardRecord>>>,
	related: Rc<RefCell<ResponseCache<Vec<CardRecord>>>>,
}

impl CatalogClient {
	pub fn new(config: CatalogConfig) -> Self {
		let ttl = config.cache_ttl_ms;
		Self {
			http: reqwest::Client::new(),
			config: Rc::new(config),
			cards: Rc::new(RefCell::new(ResponseCache::new(ttl))),
			related: Rc::new(RefCell::new(ResponseCache::new(ttl))),
		}
	}

	/// Resolves a fuzzy card name to the canonical card.
	pub async fn fetch_card(&self, name: &str) -> Result<CardRecord, CatalogError> {
		let key = format!("search:{name}");
		if let Some(card) = self.cards.borrow_mut().get(&key, now_ms()) {
			debug!("cache hit for {key}");
			return Ok(card);
		}

		let response = self
			.http
			.get(format!("{}/cards/named", self.config.base_url))
			.query(&[("fuzzy", name)])
			.header("Accept", "application/json")
			.send()
			.await?;

		match response.status() {
			StatusCode::NOT_FOUND => {
				return Err(CatalogError::NotFound { query: name.into() });
			}
			status if !status.is_success() => return Err(CatalogError::Status(status.as_u16())),
			_ => {}
		}

		let card: CardRecord = response.json().await?;
		self.cards.borrow_mut().insert(key, card.clone(), now_ms());
		Ok(card)
	}

	/// Cards related to `name`, already filtered and truncated to
	/// `filter.related_count`, in the catalog's relevance order.
	pub async fn fetch_related(
		&self,
		name: &str,
		filter: &FilterConfiguration,
	) -> Result<Vec<CardRecord>, CatalogError> {
		let key = format!("related:{name}:{}", filter.cache_key());
		if let Some(candidates) = self.related.borrow_mut().get(&key, now_ms()) {
			debug!("cache hit for {key}");
			return Ok(filter::apply(&candidates, filter));
		}

		let focal = self.fetch_card(name).await?;
		let query = related_query(&focal);
		info!("searching related cards: {query}");

		let mut candidates = Vec::new();
		let mut next_page: Option<String> = None;
		for _ in 0..self.config.max_search_pages {
			let request = match next_page.take() {
				Some(url) => self.http.get(url),
				None => self
					.http
					.get(format!("{}/cards/search", self.config.base_url))
					.query(&[("q", query.as_str()), ("unique", "cards")]),
			};
			let response = request.header("Accept", "application/json").send().await?;

			match response.status() {
				// The search endpoint answers 404 when nothing matches.
				StatusCode::NOT_FOUND => break,
				status if !status.is_success() => {
					return Err(CatalogError::Status(status.as_u16()));
				}
				_ => {}
			}

			let page: SearchPage = response.json().await?;
			candidates.extend(page.data);

			let enough = filter::apply(&candidates, filter).len() >= filter.related_count;
			if enough || !page.has_more {
				break;
			}
			match page.next_page {
				Some(url) => next_page = Some(url),
				None => break,
			}
		}

		debug!("{} related candidates for {name}", candidates.len());
		let result = filter::apply(&candidates, filter);
		self.related.borrow_mut().insert(key, candidates, now_ms());
		Ok(result)
	}
}

impl Default for CatalogClient {
	fn default() -> Self {
		Self::new(CatalogConfig::default())
	}
}

/// Search query for commander-legal cards sharing the focal card's color
/// identity and sitting within two mana of it, by EDHREC rank.
pub fn related_query(card: &CardRecord) -> String {
	let mut parts = vec!["format:commander".to_string()];

	if !card.color_identity.is_empty() {
		let identity: String = card.color_identity.iter().map(|c| c.symbol()).collect();
		parts.push(format!("commander:{identity}"));
	}

	let (low, high) = ((card.cmc - 2.0).max(0.0), card.cmc + 2.0);
	parts.push(format!("(cmc>={low} AND cmc<={high})"));
	parts.push(format!("-!\"{}\"", card.name));
	parts.push("order:edhrec".into());

	parts.join(" ")
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::catalog::card::Color;
	use crate::catalog::card::fixtures::card;

	#[test]
	fn colorless_query_has_no_commander_clause() {
		let sol_ring = card("sr", "Sol Ring", "Artifact", 1.0, &[], Some(1.5));
		assert_eq!(
			related_query(&sol_ring),
			"format:commander (cmc>=0 AND cmc<=3) -!\"Sol Ring\" order:edhrec"
		);
	}

	#[test]
	fn query_includes_identity_and_range() {
		let atraxa = card(
			"a",
			"Atraxa, Praetors' Voice",
			"Legendary Creature — Phyrexian Angel Horror",
			4.0,
			&[Color::White, Color::Blue, Color::Black, Color::Green],
			None,
		);
		assert_eq!(
			related_query(&atraxa),
			"format:commander commander:WUBG (cmc>=2 AND cmc<=6) -!\"Atraxa, Praetors' Voice\" order:edhrec"
		);
	}

	#[test]
	fn search_page_decodes() {
		let page: SearchPage = serde_json::from_str(
			r#"{
				"object": "list",
				"has_more": true,
				"next_page": "https://api.scryfall.com/cards/search?page=2",
				"data": [
					{ "id": "1", "name": "Arcane Signet", "type_line": "Artifact", "cmc": 2.0, "color_identity": [] }
				]
			}"#,
		)
		.unwrap();
		assert!(page.has_more);
		assert_eq!(page.data.len(), 1);
		assert_eq!(page.data[0].name, "Arcane Signet");
		assert!(page.next_page.is_some());
	}
}
