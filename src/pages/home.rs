use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use leptos::prelude::*;
use log::{error, info};
use serde::Deserialize;

use crate::components::directory_map::{CategoryRecord, DirectoryMapCanvas, MatchPolicy, ProductRecord};

const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Default, Deserialize)]
struct SampleDirectory {
	categories: Vec<CategoryRecord>,
	products: Vec<ProductRecord>,
}

/// Bundled directory listing standing in for the backend.
fn sample_directory() -> SampleDirectory {
	serde_json::from_str(include_str!("sample_directory.json")).unwrap_or_else(|e| {
		error!("sample directory is not valid JSON: {e}");
		SampleDirectory::default()
	})
}

/// Same narrowing the directory API applies: exact category slug, and a
/// case-insensitive substring of name or description.
fn matches_query(product: &ProductRecord, category: &str, search: &str) -> bool {
	if !category.is_empty() && product.category_slug.as_deref() != Some(category) {
		return false;
	}
	let needle = search.trim().to_lowercase();
	needle.is_empty()
		|| product.name.to_lowercase().contains(&needle)
		|| product
			.description()
			.is_some_and(|d| d.to_lowercase().contains(&needle))
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct DirectoryQuery {
	category: String,
	search: String,
}

impl DirectoryQuery {
	fn filter_by(&mut self, slug: String) {
		self.category = slug;
	}

	/// A product search spans every category.
	fn search_for(&mut self, name: String) {
		self.category.clear();
		self.search = name;
	}

	fn matches(&self, product: &ProductRecord) -> bool {
		matches_query(product, &self.category, &self.search)
	}

	fn status(&self) -> String {
		let category = if self.category.is_empty() {
			"All categories".to_string()
		} else {
			format!("Category: {}", self.category)
		};
		match self.search.trim() {
			"" => category,
			text => format!("{category}, Search: {text}"),
		}
	}
}

/// Stamps keystrokes so a delayed search only applies if nothing was typed
/// after it.
#[derive(Clone, Debug, Default)]
struct Keystrokes(Arc<AtomicU64>);

impl Keystrokes {
	fn press(&self) -> u64 {
		self.0.fetch_add(1, Ordering::Relaxed) + 1
	}

	fn is_latest(&self, stamp: u64) -> bool {
		self.0.load(Ordering::Relaxed) == stamp
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let SampleDirectory { categories, products } = sample_directory();
	let (query, set_query) = signal(DirectoryQuery::default());
	let (search_text, set_search_text) = signal(String::new());
	let (dark, set_dark) = signal(false);
	let keystrokes = Keystrokes::default();

	let filter_buttons = categories.clone();
	let categories = Signal::derive(move || categories.clone());
	let products = Signal::derive(move || {
		let query = query.get();
		products
			.iter()
			.filter(|p| query.matches(p))
			.cloned()
			.collect::<Vec<_>>()
	});
	let filter = move || query.with(|q| q.category.clone());

	let on_filter = Callback::new(move |slug: String| {
		info!("map filter -> {slug}");
		set_query.update(|q| q.filter_by(slug));
	});
	let on_search = {
		let keystrokes = keystrokes.clone();
		Callback::new(move |name: String| {
			info!("map search -> {name}");
			keystrokes.press();
			set_search_text.set(name.clone());
			set_query.update(|q| q.search_for(name));
		})
	};
	let reset = {
		let keystrokes = keystrokes.clone();
		move |_| {
			keystrokes.press();
			set_search_text.set(String::new());
			set_query.set(DirectoryQuery::default());
		}
	};

	let pending = Arc::new(Mutex::new(None::<TimeoutHandle>));
	let on_input = move |ev: leptos::ev::Event| {
		let text = event_target_value(&ev);
		set_search_text.set(text.clone());
		let stamp = keystrokes.press();
		if let Some(handle) = pending.lock().unwrap().take() {
			handle.clear();
		}
		let latest = keystrokes.clone();
		let applied = set_timeout_with_handle(
			move || {
				if latest.is_latest(stamp) {
					set_query.update(|q| q.search = text);
				}
			},
			SEARCH_DEBOUNCE,
		);
		match applied {
			Ok(handle) => *pending.lock().unwrap() = Some(handle),
			Err(e) => error!("search debounce timer failed: {e:?}"),
		}
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="directory" class=("dark-mode", move || dark.get())>
				<div class="map-container">
					<DirectoryMapCanvas
						categories=categories
						products=products
						dark=dark
						on_filter=on_filter
						on_search=on_search
						match_policy=MatchPolicy::IgnoreCase
					/>
					<div class="map-overlay">
						<h1>"Directory Map"</h1>
						<p class="subtitle">
							"Click a category to filter, a product to search for it."
						</p>
						<p class="status">{move || query.with(DirectoryQuery::status)}</p>
						<button id="resetMapBtn" on:click=reset>"Reset"</button>
						<button id="themeToggle" on:click=move |_| set_dark.update(|d| *d = !*d)>
							{move || if dark.get() { "Light mode" } else { "Dark mode" }}
						</button>
					</div>
				</div>

				<div class="controls">
					<input
						id="searchInput"
						type="search"
						placeholder="Search products"
						prop:value=move || search_text.get()
						on:input=on_input
					/>
					<div id="categoryFilters">
						<button
							class="glass-btn"
							class:active=move || filter().is_empty()
							on:click=move |_| set_query.update(|q| q.filter_by(String::new()))
						>
							"All"
						</button>
						{filter_buttons
							.into_iter()
							.map(|cat| {
								let slug = cat.slug.clone();
								let active_slug = cat.slug.clone();
								view! {
									<button
										class="glass-btn"
										data-category=cat.slug
										class:active=move || filter() == active_slug
										on:click=move |_| set_query.update(|q| q.filter_by(slug.clone()))
									>
										{cat.name}
									</button>
								}
							})
							.collect_view()}
					</div>
				</div>
			</div>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bundled_directory_parses() {
		let dir = sample_directory();
		assert_eq!(dir.categories.len(), 5);
		assert_eq!(dir.products.len(), 11);
		assert_eq!(dir.categories[0].product_count, Some(3));
	}

	#[test]
	fn query_narrows_by_slug_and_text() {
		let dir = sample_directory();
		let count = |cat: &str, text: &str| dir.products.iter().filter(|p| matches_query(p, cat, text)).count();
		assert_eq!(count("", ""), 11);
		assert_eq!(count("cloud", ""), 3);
		assert_eq!(count("", "STORAGE"), 1);
		assert_eq!(count("", "passwordless"), 1);
		assert_eq!(count("identity", "ledger"), 0);
		assert_eq!(count("security", ""), 0);
	}

	#[test]
	fn product_search_clears_the_category_filter() {
		let mut query = DirectoryQuery::default();
		assert_eq!(query.status(), "All categories");

		query.filter_by("cloud".into());
		query.search = "nim".into();
		assert_eq!(query.status(), "Category: cloud, Search: nim");

		query.search_for("Driftwood".into());
		assert_eq!(query.category, "");
		assert_eq!(query.status(), "All categories, Search: Driftwood");
		let dir = sample_directory();
		assert_eq!(dir.products.iter().filter(|p| query.matches(p)).count(), 1);

		query.filter_by("identity".into());
		assert_eq!(query.search, "Driftwood");
	}

	#[test]
	fn only_the_last_keystroke_applies() {
		let keystrokes = Keystrokes::default();
		let timers = ["c", "cl", "clo"].map(|text| (keystrokes.press(), text));
		let mut applied = Vec::new();
		for (stamp, text) in timers {
			if keystrokes.is_latest(stamp) {
				applied.push(text);
			}
		}
		assert_eq!(applied, ["clo"]);

		let stamp = keystrokes.press();
		keystrokes.clone().press();
		assert!(!keystrokes.is_latest(stamp));
	}
}
