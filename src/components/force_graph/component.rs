use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, MouseEvent, WheelEvent};

use super::host::LayoutHost;
use super::render;
use super::state::ForceGraphState;
use super::tick_loop::TickLoop;
use super::types::GraphData;

const DEFAULT_WIDTH: f64 = 800.0;
const DEFAULT_HEIGHT: f64 = 600.0;
const TOOLTIP_OFFSET: f64 = 10.0;

#[derive(Clone, Debug, PartialEq)]
struct TooltipContent {
	name: String,
	type_line: String,
	oracle_text: Option<String>,
}

impl TooltipContent {
	fn for_node(state: &ForceGraphState, idx: usize) -> Option<Self> {
		let node = state.node(idx)?;
		Some(Self {
			name: node.name.clone(),
			type_line: node.card.type_line.clone(),
			oracle_text: node.card.oracle_text.clone(),
		})
	}
}

/// Re-hit-tests the pointer and mirrors a hover change into the tooltip.
fn sync_hover(state: &mut ForceGraphState, tooltip: RwSignal<Option<TooltipContent>>) {
	if state.refresh_hover() {
		tooltip.set(state.hover.node.and_then(|idx| TooltipContent::for_node(state, idx)));
	}
}

fn pointer_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Force-directed card graph drawn on a canvas, with drag, pan, zoom and a
/// hover tooltip. Every change of `data` starts a fresh layout.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let host: Rc<RefCell<LayoutHost>> = Rc::new(RefCell::new(LayoutHost::new()));
	let images: Rc<RefCell<Vec<Option<HtmlImageElement>>>> = Rc::new(RefCell::new(Vec::new()));
	let tick_loop = StoredValue::new_local(None::<TickLoop>);
	let tooltip = RwSignal::new(None::<TooltipContent>);
	let tooltip_pos = RwSignal::new((0.0_f64, 0.0_f64));

	let (host_init, images_init) = (host.clone(), images.clone());
	Effect::new(move |_| {
		let data = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		// The old layout stops before the new one is built.
		tick_loop.update_value(|slot| {
			if let Some(old) = slot.take() {
				old.stop();
			}
		});
		tooltip.set(None);

		let w = canvas
			.parent_element()
			.map(|p| p.client_width() as f64)
			.filter(|w| *w > 0.0)
			.unwrap_or(DEFAULT_WIDTH);
		let h = height.unwrap_or(DEFAULT_HEIGHT);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("canvas has no 2d context");
			return;
		};

		let loaded = host_init.borrow_mut().load(data, w, h);
		match loaded {
			Ok(Some(generation)) => debug!("rendering graph generation {generation}"),
			Ok(None) => {
				images_init.borrow_mut().clear();
				render::clear(&ctx, w, h);
				return;
			}
			Err(err) => {
				error!("refusing to lay out invalid graph: {err}");
				if cfg!(debug_assertions) {
					panic!("invalid graph data: {err}");
				}
				render::clear(&ctx, w, h);
				return;
			}
		}
		if let Some(state) = host_init.borrow().state() {
			*images_init.borrow_mut() = render::load_images(&state.data);
		}

		let (host_anim, images_anim) = (host_init.clone(), images_init.clone());
		tick_loop.set_value(Some(TickLoop::start(move |now| {
			let mut host = host_anim.borrow_mut();
			host.frame(now);
			if let Some(state) = host.state_mut() {
				sync_hover(state, tooltip);
				render::render(state, &ctx, &images_anim.borrow());
			}
		})));
	});

	on_cleanup(move || {
		tick_loop.try_update_value(|slot| {
			if let Some(old) = slot.take() {
				old.stop();
			}
		});
	});

	let host_md = host.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(s) = host_md.borrow_mut().state_mut() {
			s.pointer_down(x, y);
		}
	};

	let host_mm = host.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(s) = host_mm.borrow_mut().state_mut() {
			s.pointer_move(x, y);
			sync_hover(s, tooltip);
		}
		tooltip_pos.set((
			ev.client_x() as f64 + TOOLTIP_OFFSET,
			ev.client_y() as f64 + TOOLTIP_OFFSET,
		));
	};

	let host_mu = host.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(s) = host_mu.borrow_mut().state_mut() {
			s.pointer_up();
		}
	};

	let host_ml = host.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(s) = host_ml.borrow_mut().state_mut() {
			s.pointer_leave();
		}
		tooltip.set(None);
	};

	let host_dc = host.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(s) = host_dc.borrow_mut().state_mut() {
			s.release_pin(x, y);
		}
	};

	let host_wh = host.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(s) = host_wh.borrow_mut().state_mut() {
			s.wheel(x, y, ev.delta_y());
		}
	};

	let (host_in, host_out, host_reset) = (host.clone(), host.clone(), host);
	let on_zoom_in = move |_: MouseEvent| {
		if let Some(s) = host_in.borrow_mut().state_mut() {
			s.zoom_in();
		}
	};
	let on_zoom_out = move |_: MouseEvent| {
		if let Some(s) = host_out.borrow_mut().state_mut() {
			s.zoom_out();
		}
	};
	let on_zoom_reset = move |_: MouseEvent| {
		if let Some(s) = host_reset.borrow_mut().state_mut() {
			s.reset_zoom();
		}
	};

	view! {
		<div class="card-graph" style="position: relative; width: 100%;">
			<canvas
				node_ref=canvas_ref
				class="card-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:dblclick=on_dblclick
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div class="zoom-controls">
				<button class="zoom-button" title="Zoom in" on:click=on_zoom_in>"+"</button>
				<button class="zoom-button" title="Zoom out" on:click=on_zoom_out>"-"</button>
				<button class="zoom-button zoom-reset" title="Reset zoom" on:click=on_zoom_reset>"R"</button>
			</div>
			<div
				class="card-tooltip"
				style:display=move || if tooltip.with(Option::is_some) { "block" } else { "none" }
				style:left=move || format!("{}px", tooltip_pos.get().0)
				style:top=move || format!("{}px", tooltip_pos.get().1)
			>
				<div class="card-tooltip-name">
					{move || tooltip.with(|t| t.as_ref().map(|t| t.name.clone()))}
				</div>
				<div class="card-tooltip-type">
					{move || tooltip.with(|t| t.as_ref().map(|t| t.type_line.clone()))}
				</div>
				<div
					class="card-tooltip-text"
					style:display=move || {
						if tooltip.with(|t| t.as_ref().is_some_and(|t| t.oracle_text.is_some())) {
							"block"
						} else {
							"none"
						}
					}
				>
					{move || tooltip.with(|t| t.as_ref().and_then(|t| t.oracle_text.clone()))}
				</div>
			</div>
		</div>
	}
}
