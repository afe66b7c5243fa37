//! Client-side filtering of related cards.
//!
//! A [`FilterConfiguration`] is a plain value: the form replaces it wholesale
//! on every change, and [`apply`] never mutates or reorders its input.

use serde::Serialize;

use super::card::{CardRecord, Color};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
	Creature,
	Instant,
	Sorcery,
	Artifact,
	Enchantment,
	Planeswalker,
}

impl CardType {
	pub const ALL: [CardType; 6] = [
		CardType::Creature,
		CardType::Instant,
		CardType::Sorcery,
		CardType::Artifact,
		CardType::Enchantment,
		CardType::Planeswalker,
	];

	pub fn value(self) -> &'static str {
		match self {
			CardType::Creature => "creature",
			CardType::Instant => "instant",
			CardType::Sorcery => "sorcery",
			CardType::Artifact => "artifact",
			CardType::Enchantment => "enchantment",
			CardType::Planeswalker => "planeswalker",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			CardType::Creature => "Creatures",
			CardType::Instant => "Instants",
			CardType::Sorcery => "Sorceries",
			CardType::Artifact => "Artifacts",
			CardType::Enchantment => "Enchantments",
			CardType::Planeswalker => "Planeswalkers",
		}
	}

	pub fn from_value(value: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|t| t.value() == value)
	}
}

/// Mana value bucket: an exact value in `0..=7`, or eight and above.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum CmcBucket {
	Exactly(u8),
	EightOrMore,
}

impl CmcBucket {
	pub fn all() -> impl Iterator<Item = CmcBucket> {
		(0..=7).map(CmcBucket::Exactly).chain([CmcBucket::EightOrMore])
	}

	pub fn value(self) -> String {
		match self {
			CmcBucket::Exactly(n) => n.to_string(),
			CmcBucket::EightOrMore => "8+".into(),
		}
	}

	pub fn from_value(value: &str) -> Option<Self> {
		match value {
			"8+" => Some(CmcBucket::EightOrMore),
			v => v.parse::<u8>().ok().filter(|n| *n <= 7).map(CmcBucket::Exactly),
		}
	}

	pub fn contains(self, mana_value: u32) -> bool {
		match self {
			CmcBucket::Exactly(n) => mana_value == u32::from(n),
			CmcBucket::EightOrMore => mana_value >= 8,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceBucket {
	/// Under $1.
	Budget,
	/// $1 up to $5.
	Moderate,
	/// $5 up to $20.
	Expensive,
	/// $20 and over.
	Premium,
}

impl PriceBucket {
	pub const ALL: [PriceBucket; 4] = [
		PriceBucket::Budget,
		PriceBucket::Moderate,
		PriceBucket::Expensive,
		PriceBucket::Premium,
	];

	pub fn value(self) -> &'static str {
		match self {
			PriceBucket::Budget => "budget",
			PriceBucket::Moderate => "moderate",
			PriceBucket::Expensive => "expensive",
			PriceBucket::Premium => "premium",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			PriceBucket::Budget => "Under $1",
			PriceBucket::Moderate => "$1 - $5",
			PriceBucket::Expensive => "$5 - $20",
			PriceBucket::Premium => "Over $20",
		}
	}

	pub fn from_value(value: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|p| p.value() == value)
	}

	pub fn contains(self, price: f64) -> bool {
		match self {
			PriceBucket::Budget => price < 1.0,
			PriceBucket::Moderate => (1.0..5.0).contains(&price),
			PriceBucket::Expensive => (5.0..20.0).contains(&price),
			PriceBucket::Premium => price >= 20.0,
		}
	}
}

/// Choices offered for how many related cards to show.
pub const RELATED_COUNT_CHOICES: [usize; 5] = [3, 5, 10, 15, 20];

/// The six user-facing filter fields. `None` means "no constraint".
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfiguration {
	pub card_type: Option<CardType>,
	pub cmc: Option<CmcBucket>,
	pub color: Option<Color>,
	pub price: Option<PriceBucket>,
	pub include_lands: bool,
	pub related_count: usize,
}

impl Default for FilterConfiguration {
	fn default() -> Self {
		Self {
			card_type: None,
			cmc: None,
			color: None,
			price: None,
			include_lands: false,
			related_count: 10,
		}
	}
}

impl FilterConfiguration {
	/// Stable textual form used in cache keys.
	pub fn cache_key(&self) -> String {
		serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
	}
}

/// Keep/reject decision for a single card.
pub fn matches(card: &CardRecord, filter: &FilterConfiguration) -> bool {
	if !filter.include_lands && card.is_land() {
		return false;
	}

	if let Some(card_type) = filter.card_type {
		if !card.type_line.to_lowercase().contains(card_type.value()) {
			return false;
		}
	}

	if let Some(bucket) = filter.cmc {
		if !bucket.contains(card.mana_value()) {
			return false;
		}
	}

	if let Some(color) = filter.color {
		let has_color = match color {
			// Scryfall encodes colorless as an empty identity.
			Color::Colorless => {
				card.color_identity.is_empty() || card.color_identity.contains(&Color::Colorless)
			}
			c => {
				card.color_identity.contains(&c)
					|| card.colors.as_ref().is_some_and(|colors| colors.contains(&c))
			}
		};
		if !has_color {
			return false;
		}
	}

	// Unpriced cards are never rejected on price.
	if let (Some(bucket), Some(price)) = (filter.price, card.price) {
		if !bucket.contains(price) {
			return false;
		}
	}

	true
}

/// Filter then truncate to `related_count`, keeping the catalog's ordering.
pub fn apply(cards: &[CardRecord], filter: &FilterConfiguration) -> Vec<CardRecord> {
	cards
		.iter()
		.filter(|card| matches(card, filter))
		.take(filter.related_count)
		.cloned()
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::catalog::card::fixtures::card;

	fn pool() -> Vec<CardRecord> {
		vec![
			card("1", "Llanowar Elves", "Creature — Elf Druid", 1.0, &[Color::Green], Some(0.25)),
			card("2", "Counterspell", "Instant", 2.0, &[Color::Blue], Some(1.5)),
			card("3", "Command Tower", "Land", 0.0, &[], Some(0.3)),
			card("4", "Dryad Arbor", "Land Creature — Forest Dryad", 0.0, &[Color::Green], None),
			card("5", "Emrakul, the Aeons Torn", "Legendary Creature — Eldrazi", 15.0, &[], Some(25.0)),
			card("6", "Arcane Signet", "Artifact", 2.0, &[], None),
			card("7", "Demonic Tutor", "Sorcery", 2.0, &[Color::Black], Some(30.0)),
			card("8", "Rhystic Study", "Enchantment", 3.0, &[Color::Blue], Some(7.0)),
		]
	}

	fn ids(cards: &[CardRecord]) -> Vec<&str> {
		cards.iter().map(|c| c.id.as_str()).collect()
	}

	#[test]
	fn default_excludes_lands_only() {
		let result = apply(&pool(), &FilterConfiguration::default());
		assert_eq!(ids(&result), ["1", "2", "5", "6", "7", "8"]);
	}

	#[test]
	fn include_lands_keeps_everything() {
		let filter = FilterConfiguration { include_lands: true, ..Default::default() };
		assert_eq!(apply(&pool(), &filter).len(), 8);
	}

	#[test]
	fn type_filter_matches_type_line_substring() {
		let filter = FilterConfiguration {
			card_type: Some(CardType::Creature),
			include_lands: true,
			..Default::default()
		};
		assert_eq!(ids(&apply(&pool(), &filter)), ["1", "4", "5"]);
	}

	#[test]
	fn cmc_buckets() {
		let exact = FilterConfiguration { cmc: Some(CmcBucket::Exactly(2)), ..Default::default() };
		assert_eq!(ids(&apply(&pool(), &exact)), ["2", "6", "7"]);

		let high = FilterConfiguration { cmc: Some(CmcBucket::EightOrMore), ..Default::default() };
		assert_eq!(ids(&apply(&pool(), &high)), ["5"]);
	}

	#[test]
	fn colorless_matches_empty_identity() {
		let filter = FilterConfiguration { color: Some(Color::Colorless), ..Default::default() };
		assert_eq!(ids(&apply(&pool(), &filter)), ["5", "6"]);

		let blue = FilterConfiguration { color: Some(Color::Blue), ..Default::default() };
		assert_eq!(ids(&apply(&pool(), &blue)), ["2", "8"]);
	}

	#[test]
	fn printed_colors_also_match() {
		let mut hybrid = card("9", "Hybrid", "Creature", 2.0, &[], None);
		hybrid.colors = Some(vec![Color::Red]);
		let filter = FilterConfiguration { color: Some(Color::Red), ..Default::default() };
		assert!(matches(&hybrid, &filter));
	}

	#[test]
	fn price_buckets_skip_unpriced_cards() {
		let budget = FilterConfiguration { price: Some(PriceBucket::Budget), ..Default::default() };
		assert_eq!(ids(&apply(&pool(), &budget)), ["1", "6"]);

		let moderate = FilterConfiguration { price: Some(PriceBucket::Moderate), ..Default::default() };
		assert_eq!(ids(&apply(&pool(), &moderate)), ["2", "6"]);

		let expensive = FilterConfiguration { price: Some(PriceBucket::Expensive), ..Default::default() };
		assert_eq!(ids(&apply(&pool(), &expensive)), ["6", "8"]);

		let premium = FilterConfiguration { price: Some(PriceBucket::Premium), ..Default::default() };
		assert_eq!(ids(&apply(&pool(), &premium)), ["5", "6", "7"]);
	}

	#[test]
	fn truncates_to_related_count() {
		let filter = FilterConfiguration { related_count: 2, ..Default::default() };
		assert_eq!(ids(&apply(&pool(), &filter)), ["1", "2"]);
	}

	#[test]
	fn applying_twice_is_idempotent() {
		let cards = pool();
		let filter = FilterConfiguration {
			card_type: Some(CardType::Creature),
			related_count: 3,
			include_lands: true,
			..Default::default()
		};
		let first = apply(&cards, &filter);
		let second = apply(&cards, &filter);
		assert_eq!(first, second);
		assert_eq!(apply(&first, &filter), first);
	}

	#[test]
	fn form_values_parse() {
		assert_eq!(CmcBucket::from_value("8+"), Some(CmcBucket::EightOrMore));
		assert_eq!(CmcBucket::from_value("3"), Some(CmcBucket::Exactly(3)));
		assert_eq!(CmcBucket::from_value("9"), None);
		assert_eq!(CmcBucket::from_value(""), None);
		assert_eq!(CmcBucket::all().count(), 9);
		assert_eq!(CardType::from_value("sorcery"), Some(CardType::Sorcery));
		assert_eq!(PriceBucket::from_value("premium"), Some(PriceBucket::Premium));
	}

	#[test]
	fn every_mana_value_option_selects_its_bucket() {
		for bucket in CmcBucket::all() {
			assert_eq!(CmcBucket::from_value(&bucket.value()), Some(bucket));
		}
	}

	#[test]
	fn cache_key_differs_per_configuration() {
		let a = FilterConfiguration::default();
		let b = FilterConfiguration { include_lands: true, ..Default::default() };
		assert_ne!(a.cache_key(), b.cache_key());
		assert_eq!(a.cache_key(), FilterConfiguration::default().cache_key());
	}
}
