use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::palette::Theme;
use super::params::MatchPolicy;
use super::render;
use super::state::{DirectoryData, MapAction, MapState};
use super::types::{CategoryRecord, ProductRecord};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn canvas_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.unwrap_or((800.0, 600.0))
}

fn request_frame(window: &Window, cb: &FrameCallback) {
	if let Some(ref cb) = *cb.borrow() {
		let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
	}
}

fn pointer_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Canvas map of categories and products. Clicking a category calls
/// `on_filter` with its slug, clicking a product calls `on_search` with its
/// name. `match_policy` decides how products find their category.
#[component]
pub fn DirectoryMapCanvas(
	#[prop(into)] categories: Signal<Vec<CategoryRecord>>,
	#[prop(into)] products: Signal<Vec<ProductRecord>>,
	#[prop(into)] dark: Signal<bool>,
	#[prop(into)] on_filter: Callback<String>,
	#[prop(into)] on_search: Callback<String>,
	#[prop(optional)] match_policy: MatchPolicy,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<MapState>>> = Rc::new(RefCell::new(None));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let stopped = Arc::new(AtomicBool::new(false));
	let (state_init, animate_init, stopped_init) = (state.clone(), animate.clone(), stopped.clone());

	Effect::new(move |_| {
		let data = DirectoryData {
			categories: categories.get(),
			products: products.get(),
		};
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("no window, directory map disabled");
			return;
		};

		if state_init.borrow().is_none() {
			let ctx = match canvas.get_context("2d") {
				Ok(Some(ctx)) => ctx.dyn_into::<CanvasRenderingContext2d>().ok(),
				_ => None,
			};
			let Some(ctx) = ctx else {
				error!("canvas has no 2d context, directory map disabled");
				return;
			};

			let (w, h) = canvas_size(&canvas);
			canvas.set_width(w as u32);
			canvas.set_height(h as u32);
			let mut map = MapState::new(w, h);
			map.layout.match_policy = match_policy;
			*state_init.borrow_mut() = Some(map);

			let (state_anim, animate_inner, stopped_anim) =
				(state_init.clone(), animate_init.clone(), stopped_init.clone());
			*animate_init.borrow_mut() = Some(Closure::new(move || {
				let running = match *state_anim.borrow_mut() {
					Some(ref mut s) => {
						if stopped_anim.load(Ordering::Relaxed) {
							s.stop();
						}
						s.theme = Theme::from_dark(dark.try_get_untracked().unwrap_or(false));
						let running = s.tick();
						render::render(s, &ctx);
						running
					}
					None => false,
				};
				if !running {
					return;
				}
				if let Some(win) = web_sys::window() {
					request_frame(&win, &animate_inner);
				}
			}));
		}

		let kick = match *state_init.borrow_mut() {
			Some(ref mut s) => s.set_data(data),
			None => false,
		};
		if kick {
			request_frame(&window, &animate_init);
		}
	});

	let (state_resize, animate_resize) = (state.clone(), animate);
	let resize_handle = window_event_listener(leptos::ev::resize, move |_| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (w, h) = canvas_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		let kick = match *state_resize.borrow_mut() {
			Some(ref mut s) => s.resize(w, h),
			None => false,
		};
		if let (true, Some(win)) = (kick, web_sys::window()) {
			request_frame(&win, &animate_resize);
		}
	});

	on_cleanup(move || {
		stopped.store(true, Ordering::Relaxed);
		resize_handle.remove();
	});

	let (state_mm, state_click, state_ml) = (state.clone(), state.clone(), state);

	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = pointer_position(&canvas, &ev);

		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
			let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", s.cursor());
		}
	};

	let on_click = move |_: MouseEvent| {
		let action = state_click.borrow().as_ref().and_then(MapState::click);
		match action {
			Some(MapAction::FilterCategory(slug)) => on_filter.run(slug),
			Some(MapAction::Search(name)) => on_search.run(name),
			None => {}
		}
	};

	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.set_hover(None);
		}
		if let Some(canvas) = canvas_ref.get_untracked() {
			let canvas: HtmlCanvasElement = canvas.into();
			let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", "default");
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="directory-map-canvas"
			on:mousemove=on_mousemove
			on:click=on_click
			on:mouseleave=on_mouseleave
			style="display: block; cursor: default;"
		/>
	}
}
