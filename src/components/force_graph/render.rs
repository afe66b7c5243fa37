use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::state::{CARD_HEIGHT, CARD_LEFT, CARD_TOP, CARD_WIDTH, ForceGraphState};
use super::types::GraphData;

const BACKGROUND: &str = "#ffffff";
const DIM_ALPHA: f64 = 0.25;
const IMAGE_INSET: f64 = 2.0;
const LABEL_OFFSET_Y: f64 = 60.0;
const LABEL_PADDING: f64 = 2.0;
const LABEL_FONT_PX: f64 = 12.0;

/// Artwork for each node of the current generation, by node index.
pub fn load_images(data: &GraphData) -> Vec<Option<HtmlImageElement>> {
	data.nodes
		.iter()
		.map(|node| {
			let src = node.image.as_deref()?;
			let img = HtmlImageElement::new().ok()?;
			img.set_src(src);
			Some(img)
		})
		.collect()
}

pub fn clear(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, width, height);
}

pub fn render(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	images: &[Option<HtmlImageElement>],
) {
	clear(ctx, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_links(state, ctx);
	draw_nodes(state, ctx, images);
	ctx.restore();
}

fn draw_links(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let Some(snapshot) = state.snapshot() else {
		return;
	};
	let has_highlight = state.has_active_highlight();

	ctx.set_stroke_style_str("#999");
	for (link, &(src, tgt)) in state.data.links.iter().zip(state.edges()) {
		let (Some(a), Some(b)) = (snapshot.positions.get(src), snapshot.positions.get(tgt)) else {
			continue;
		};
		let lit = !has_highlight || (state.is_highlighted(src) && state.is_highlighted(tgt));
		ctx.set_global_alpha(if lit { 0.6 } else { 0.6 * DIM_ALPHA });
		ctx.set_line_width(link.weight.max(0.0).sqrt());
		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	images: &[Option<HtmlImageElement>],
) {
	let Some(snapshot) = state.snapshot() else {
		return;
	};
	let has_highlight = state.has_active_highlight();

	ctx.set_font(&format!("500 {LABEL_FONT_PX}px sans-serif"));
	ctx.set_text_align("center");

	for (idx, (node, p)) in state.data.nodes.iter().zip(&snapshot.positions).enumerate() {
		let alpha = if has_highlight && !state.is_highlighted(idx) {
			DIM_ALPHA
		} else {
			1.0
		};
		ctx.set_global_alpha(alpha);

		// Placeholder background, visible even without artwork.
		rounded_rect(ctx, p.x + CARD_LEFT, p.y + CARD_TOP, CARD_WIDTH, CARD_HEIGHT, 3.0);
		ctx.set_fill_style_str("white");
		ctx.fill();
		ctx.set_stroke_style_str(if state.hover.node == Some(idx) { "#3b82f6" } else { "#ddd" });
		ctx.set_line_width(1.0);
		ctx.stroke();

		if let Some(Some(img)) = images.get(idx) {
			if img.complete() && img.natural_width() > 0 {
				let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
					img,
					p.x + CARD_LEFT + IMAGE_INSET,
					p.y + CARD_TOP + IMAGE_INSET,
					CARD_WIDTH - IMAGE_INSET * 2.0,
					CARD_HEIGHT - IMAGE_INSET * 2.0,
				);
			}
		}

		let label_y = p.y + LABEL_OFFSET_Y;
		if let Ok(metrics) = ctx.measure_text(&node.name) {
			let w = metrics.width();
			rounded_rect(
				ctx,
				p.x - w / 2.0 - LABEL_PADDING,
				label_y - LABEL_FONT_PX - LABEL_PADDING,
				w + LABEL_PADDING * 2.0,
				LABEL_FONT_PX + LABEL_PADDING * 3.0,
				2.0,
			);
			ctx.set_fill_style_str("white");
			ctx.fill();
		}
		ctx.set_fill_style_str("#111827");
		let _ = ctx.fill_text(&node.name, p.x, label_y);
	}
	ctx.set_global_alpha(1.0);
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}
