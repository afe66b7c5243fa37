use std::cell::Cell;
use std::rc::Rc;

/// Identifies one user request; compared against the tracker on completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Hands out monotonically increasing request tokens. Starting a request
/// invalidates every token issued before it, so a late response for an old
/// query can be recognised and dropped.
#[derive(Clone, Debug, Default)]
pub struct RequestTracker {
	current: Rc<Cell<u64>>,
}

impl RequestTracker {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn begin(&self) -> RequestToken {
		let next = self.current.get() + 1;
		self.current.set(next);
		RequestToken(next)
	}

	pub fn is_current(&self, token: RequestToken) -> bool {
		self.current.get() == token.0
	}
}
