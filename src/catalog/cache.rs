use std::collections::HashMap;

/// One hour, in milliseconds.
pub const DEFAULT_TTL_MS: f64 = 60.0 * 60.0 * 1000.0;

struct CacheEntry<V> {
	value: V,
	stored_at: f64,
}

/// String-keyed response cache with a fixed freshness window.
///
/// Timestamps are milliseconds supplied by the caller, so the cache itself
/// has no clock and behaves the same in the browser and in tests.
pub struct ResponseCache<V> {
	entries: HashMap<String, CacheEntry<V>>,
	ttl_ms: f64,
}

impl<V: Clone> ResponseCache<V> {
	pub fn new(ttl_ms: f64) -> Self {
		Self {
			entries: HashMap::new(),
			ttl_ms,
		}
	}

	/// Returns a fresh entry, evicting it instead if it has expired.
	pub fn get(&mut self, key: &str, now: f64) -> Option<V> {
		let expired = now - self.entries.get(key)?.stored_at > self.ttl_ms;
		if expired {
			self.entries.remove(key);
			return None;
		}
		self.entries.get(key).map(|entry| entry.value.clone())
	}

	pub fn insert(&mut self, key: impl Into<String>, value: V, now: f64) {
		self.entries.insert(
			key.into(),
			CacheEntry {
				value,
				stored_at: now,
			},
		);
	}

	#[cfg(test)]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	#[cfg(test)]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<V: Clone> Default for ResponseCache<V> {
	fn default() -> Self {
		Self::new(DEFAULT_TTL_MS)
	}
}

/// Wall-clock milliseconds.
pub fn now_ms() -> f64 {
	#[cfg(target_arch = "wasm32")]
	{
		js_sys::Date::now()
	}
	#[cfg(not(target_arch = "wasm32"))]
	{
		std::time::SystemTime::now()
			.duration_since(std::time::UNIX_EPOCH)
			.map(|d| d.as_secs_f64() * 1000.0)
			.unwrap_or_default()
	}
}
