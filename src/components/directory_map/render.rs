use web_sys::CanvasRenderingContext2d;

use super::graph::{Node, NodeKind};
use super::hexagon::hexagon_vertices;
use super::palette::{self, Theme};
use super::state::MapState;

/// The drawing calls the map needs from a 2D surface.
pub trait Surface {
	fn clear(&self, width: f64, height: f64);
	fn begin_path(&self);
	fn move_to(&self, x: f64, y: f64);
	fn line_to(&self, x: f64, y: f64);
	fn close_path(&self);
	fn fill(&self);
	fn stroke(&self);
	fn set_fill(&self, style: &str);
	fn set_linear_gradient_fill(&self, from: (f64, f64), to: (f64, f64), stops: &[(f64, &str)]);
	fn set_stroke(&self, style: &str);
	fn set_line_width(&self, width: f64);
	fn set_shadow(&self, color: &str, blur: f64, offset: (f64, f64));
	fn save(&self);
	fn restore(&self);
	fn set_font(&self, font: &str);
	fn fill_text_centered(&self, text: &str, x: f64, y: f64);
}

impl Surface for CanvasRenderingContext2d {
	fn clear(&self, width: f64, height: f64) {
		self.clear_rect(0.0, 0.0, width, height);
	}

	fn begin_path(&self) {
		CanvasRenderingContext2d::begin_path(self);
	}

	fn move_to(&self, x: f64, y: f64) {
		CanvasRenderingContext2d::move_to(self, x, y);
	}

	fn line_to(&self, x: f64, y: f64) {
		CanvasRenderingContext2d::line_to(self, x, y);
	}

	fn close_path(&self) {
		CanvasRenderingContext2d::close_path(self);
	}

	fn fill(&self) {
		CanvasRenderingContext2d::fill(self);
	}

	fn stroke(&self) {
		CanvasRenderingContext2d::stroke(self);
	}

	fn set_fill(&self, style: &str) {
		self.set_fill_style_str(style);
	}

	fn set_linear_gradient_fill(&self, from: (f64, f64), to: (f64, f64), stops: &[(f64, &str)]) {
		let gradient = self.create_linear_gradient(from.0, from.1, to.0, to.1);
		for &(offset, color) in stops {
			let _ = gradient.add_color_stop(offset as f32, color);
		}
		#[allow(deprecated)]
		self.set_fill_style(&gradient);
	}

	fn set_stroke(&self, style: &str) {
		self.set_stroke_style_str(style);
	}

	fn set_line_width(&self, width: f64) {
		CanvasRenderingContext2d::set_line_width(self, width);
	}

	fn set_shadow(&self, color: &str, blur: f64, offset: (f64, f64)) {
		self.set_shadow_color(color);
		self.set_shadow_blur(blur);
		self.set_shadow_offset_x(offset.0);
		self.set_shadow_offset_y(offset.1);
	}

	fn save(&self) {
		CanvasRenderingContext2d::save(self);
	}

	fn restore(&self) {
		CanvasRenderingContext2d::restore(self);
	}

	fn set_font(&self, font: &str) {
		CanvasRenderingContext2d::set_font(self, font);
	}

	fn fill_text_centered(&self, text: &str, x: f64, y: f64) {
		self.set_text_align("center");
		let _ = self.fill_text(text, x, y);
	}
}

pub fn render<S: Surface + ?Sized>(state: &MapState, surface: &S) {
	surface.clear(state.width, state.height);
	if state.graph.is_empty() {
		return;
	}
	draw_links(state, surface);
	for (idx, node) in state.graph.nodes.iter().enumerate() {
		draw_node(node, state.is_hovered(idx), state.theme, surface);
	}
}

fn draw_links<S: Surface + ?Sized>(state: &MapState, surface: &S) {
	if state.graph.links.is_empty() {
		return;
	}
	surface.set_stroke(palette::link_stroke(state.theme));
	surface.set_line_width(1.0);
	surface.begin_path();
	for link in &state.graph.links {
		let (source, target) = (&state.graph.nodes[link.source], &state.graph.nodes[link.target]);
		surface.move_to(source.x, source.y);
		surface.line_to(target.x, target.y);
	}
	surface.stroke();
}

fn trace_hexagon<S: Surface + ?Sized>(surface: &S, x: f64, y: f64, radius: f64) {
	surface.begin_path();
	let [first, rest @ ..] = hexagon_vertices(x, y, radius);
	surface.move_to(first.0, first.1);
	for (vx, vy) in rest {
		surface.line_to(vx, vy);
	}
	surface.close_path();
}

fn draw_node<S: Surface + ?Sized>(node: &Node, hovered: bool, theme: Theme, surface: &S) {
	let (x, y, r) = (node.x, node.y, node.radius);

	trace_hexagon(surface, x, y, r);
	match node.kind {
		NodeKind::Category { .. } => {
			surface.set_linear_gradient_fill((x - r, y - r), (x + r, y + r), &palette::CATEGORY_GRADIENT)
		}
		NodeKind::Product { .. } => surface.set_fill(palette::product_fill(theme)),
	}
	surface.fill();
	surface.set_line_width(2.0);
	surface.set_stroke(palette::border(node, theme));
	surface.stroke();

	if hovered {
		surface.save();
		surface.set_shadow(palette::HOVER_SHADOW, 15.0, (0.0, 4.0));
		surface.set_stroke(palette::HOVER_OUTLINE);
		surface.set_line_width(3.0);
		trace_hexagon(surface, x, y, r + 2.0);
		surface.stroke();
		surface.restore();
	}

	match &node.kind {
		NodeKind::Category { count, .. } => {
			surface.set_fill(palette::label_fill(theme));
			surface.set_font("bold 14px Inter");
			surface.fill_text_centered(&count.to_string(), x, y + 5.0);
			surface.set_font("600 11px Inter");
			surface.fill_text_centered(&node.label, x, y + r + 14.0);
		}
		NodeKind::Product { .. } if hovered => {
			surface.set_fill(palette::label_fill(theme));
			surface.set_font("10px Inter");
			surface.fill_text_centered(&node.label, x, y + r + 14.0);
		}
		NodeKind::Product { .. } => {}
	}
}
