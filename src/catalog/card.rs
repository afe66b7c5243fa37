use serde::{Deserialize, Serialize};

/// A color symbol as used in a card's color identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
	#[serde(rename = "W")]
	White,
	#[serde(rename = "U")]
	Blue,
	#[serde(rename = "B")]
	Black,
	#[serde(rename = "R")]
	Red,
	#[serde(rename = "G")]
	Green,
	#[serde(rename = "C")]
	Colorless,
}

impl Color {
	/// All symbols in WUBRG order, colorless last.
	pub const ALL: [Color; 6] = [
		Color::White,
		Color::Blue,
		Color::Black,
		Color::Red,
		Color::Green,
		Color::Colorless,
	];

	pub fn symbol(self) -> &'static str {
		match self {
			Color::White => "W",
			Color::Blue => "U",
			Color::Black => "B",
			Color::Red => "R",
			Color::Green => "G",
			Color::Colorless => "C",
		}
	}

	pub fn from_symbol(symbol: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|c| c.symbol() == symbol)
	}

	pub fn label(self) -> &'static str {
		match self {
			Color::White => "White",
			Color::Blue => "Blue",
			Color::Black => "Black",
			Color::Red => "Red",
			Color::Green => "Green",
			Color::Colorless => "Colorless",
		}
	}
}

/// A card as fetched from the catalog. Never mutated after decoding.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "wire::ScryfallCard")]
pub struct CardRecord {
	pub id: String,
	pub name: String,
	pub image: Option<String>,
	pub type_line: String,
	pub oracle_text: Option<String>,
	pub color_identity: Vec<Color>,
	pub colors: Option<Vec<Color>>,
	pub cmc: f64,
	pub price: Option<f64>,
}

impl CardRecord {
	pub fn is_land(&self) -> bool {
		self.type_line.to_lowercase().contains("land")
	}

	/// Mana value with fractional costs truncated, as used by filters.
	pub fn mana_value(&self) -> u32 {
		self.cmc.max(0.0).floor() as u32
	}
}

/// Scryfall JSON shapes. Only the fields the graph needs are decoded.
mod wire {
	use serde::Deserialize;

	use super::{CardRecord, Color};

	#[derive(Deserialize)]
	pub(super) struct ImageUris {
		art_crop: Option<String>,
	}

	#[derive(Deserialize)]
	pub(super) struct CardFace {
		image_uris: Option<ImageUris>,
		oracle_text: Option<String>,
	}

	#[derive(Deserialize, Default)]
	pub(super) struct Prices {
		usd: Option<String>,
	}

	#[derive(Deserialize)]
	pub(super) struct ScryfallCard {
		id: String,
		name: String,
		#[serde(default)]
		type_line: String,
		oracle_text: Option<String>,
		image_uris: Option<ImageUris>,
		#[serde(default)]
		card_faces: Vec<CardFace>,
		#[serde(default)]
		color_identity: Vec<Color>,
		colors: Option<Vec<Color>>,
		#[serde(default)]
		cmc: f64,
		#[serde(default)]
		prices: Option<Prices>,
	}

	impl From<ScryfallCard> for CardRecord {
		fn from(card: ScryfallCard) -> Self {
			let image = card
				.image_uris
				.and_then(|uris| uris.art_crop)
				.or_else(|| {
					card.card_faces
						.iter()
						.find_map(|face| face.image_uris.as_ref()?.art_crop.clone())
				})
				.filter(|uri| !uri.is_empty());
			let oracle_text = card
				.oracle_text
				.or_else(|| card.card_faces.iter().find_map(|f| f.oracle_text.clone()));
			let price = card
				.prices
				.unwrap_or_default()
				.usd
				.and_then(|usd| usd.parse::<f64>().ok());

			CardRecord {
				id: card.id,
				name: card.name,
				image,
				type_line: card.type_line,
				oracle_text,
				color_identity: card.color_identity,
				colors: card.colors,
				cmc: card.cmc,
				price,
			}
		}
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_single_faced_card() {
		let card: CardRecord = serde_json::from_str(
			r#"{
				"id": "b4e8a4c2",
				"name": "Sol Ring",
				"type_line": "Artifact",
				"oracle_text": "{T}: Add {C}{C}.",
				"image_uris": { "small": "s.jpg", "art_crop": "art.jpg" },
				"color_identity": [],
				"colors": [],
				"cmc": 1.0,
				"prices": { "usd": "1.49", "usd_foil": null }
			}"#,
		)
		.unwrap();

		assert_eq!(card.name, "Sol Ring");
		assert_eq!(card.image.as_deref(), Some("art.jpg"));
		assert_eq!(card.price, Some(1.49));
		assert!(card.color_identity.is_empty());
		assert!(!card.is_land());
	}

	#[test]
	fn double_faced_card_falls_back_to_first_face() {
		let card: CardRecord = serde_json::from_str(
			r#"{
				"id": "dfc",
				"name": "Delver of Secrets // Insectile Aberration",
				"type_line": "Creature — Human Wizard // Creature — Human Insect",
				"card_faces": [
					{ "oracle_text": "Look at the top card.", "image_uris": { "art_crop": "front.jpg" } },
					{ "oracle_text": "Flying", "image_uris": { "art_crop": "back.jpg" } }
				],
				"color_identity": ["U"],
				"cmc": 1.0,
				"prices": { "usd": null }
			}"#,
		)
		.unwrap();

		assert_eq!(card.image.as_deref(), Some("front.jpg"));
		assert_eq!(card.oracle_text.as_deref(), Some("Look at the top card."));
		assert_eq!(card.color_identity, vec![Color::Blue]);
		assert_eq!(card.colors, None);
		assert_eq!(card.price, None);
	}

	#[test]
	fn mana_value_truncates_fractional_costs() {
		let card: CardRecord = serde_json::from_str(
			r#"{ "id": "x", "name": "Little Girl", "type_line": "Creature — Human Child", "cmc": 0.5 }"#,
		)
		.unwrap();
		assert_eq!(card.mana_value(), 0);
		assert!(card.image.is_none());
	}

	#[test]
	fn color_symbols_round_trip() {
		for color in Color::ALL {
			assert_eq!(Color::from_symbol(color.symbol()), Some(color));
		}
		assert_eq!(Color::from_symbol("X"), None);
	}
}
