use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// A recurring `requestAnimationFrame` job.
///
/// The job reschedules itself after every frame until [`TickLoop::stop`] is
/// called or the handle is dropped. Stopping cancels the pending frame and
/// releases the callback, so nothing runs against a detached canvas.
/// `stop` must not be called from inside the frame callback.
pub struct TickLoop {
	running: Rc<Cell<bool>>,
	pending: Rc<Cell<Option<i32>>>,
	callback: FrameCallback,
}

impl TickLoop {
	/// Schedules `frame` for the next animation frame. It receives the
	/// frame timestamp in milliseconds.
	pub fn start(mut frame: impl FnMut(f64) + 'static) -> Self {
		let running = Rc::new(Cell::new(true));
		let pending = Rc::new(Cell::new(None));
		let callback: FrameCallback = Rc::new(RefCell::new(None));

		let (running_cb, pending_cb, callback_cb) = (running.clone(), pending.clone(), callback.clone());
		*callback.borrow_mut() = Some(Closure::new(move |now: f64| {
			pending_cb.set(None);
			if !running_cb.get() {
				return;
			}
			frame(now);
			if let Some(ref cb) = *callback_cb.borrow() {
				pending_cb.set(request_frame(cb));
			}
		}));
		if let Some(ref cb) = *callback.borrow() {
			pending.set(request_frame(cb));
		}

		Self {
			running,
			pending,
			callback,
		}
	}

	pub fn stop(&self) {
		if !self.running.replace(false) {
			return;
		}
		if let (Some(id), Some(window)) = (self.pending.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
		// Breaks the closure's reference to itself.
		self.callback.borrow_mut().take();
	}
}

impl Drop for TickLoop {
	fn drop(&mut self) {
		self.stop();
	}
}

fn request_frame(cb: &Closure<dyn FnMut(f64)>) -> Option<i32> {
	web_sys::window()?
		.request_animation_frame(cb.as_ref().unchecked_ref())
		.ok()
}
