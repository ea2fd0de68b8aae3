use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::graph::{Graph, Node, NodeKind, build_graph, unmatched_products};
use super::palette::Theme;
use super::params::{LayoutParameters, SimulationParameters};
use super::physics;
use super::types::{CategoryRecord, ProductRecord};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopState {
	#[default]
	Idle,
	Running,
}

/// What a click on the map asks the rest of the page to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MapAction {
	FilterCategory(String),
	Search(String),
}

/// Directory data the map is built from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DirectoryData {
	pub categories: Vec<CategoryRecord>,
	pub products: Vec<ProductRecord>,
}

pub struct MapState {
	pub graph: Graph,
	pub hovered: Option<usize>,
	pub width: f64,
	pub height: f64,
	pub theme: Theme,
	pub simulation: SimulationParameters,
	pub layout: LayoutParameters,
	data: DirectoryData,
	loop_state: LoopState,
	rng: StdRng,
}

impl MapState {
	pub fn new(width: f64, height: f64) -> Self {
		Self::with_rng(width, height, StdRng::from_entropy())
	}

	pub fn with_rng(width: f64, height: f64, rng: StdRng) -> Self {
		Self {
			graph: Graph::default(),
			hovered: None,
			width,
			height,
			theme: Theme::default(),
			simulation: SimulationParameters::default(),
			layout: LayoutParameters::default(),
			data: DirectoryData::default(),
			loop_state: LoopState::Idle,
			rng,
		}
	}

	pub fn is_running(&self) -> bool {
		self.loop_state == LoopState::Running
	}

	/// Replaces the directory data and rebuilds. Identical data keeps the
	/// current layout. Returns true if the loop went from idle to running and
	/// the host must schedule frames.
	pub fn set_data(&mut self, data: DirectoryData) -> bool {
		if data == self.data && !self.graph.is_empty() {
			return self.start();
		}
		for product in unmatched_products(&data.categories, &data.products, self.layout.match_policy) {
			warn!(
				"product {} ({:?}/{:?}) matched no category, leaving it unowned",
				product.name, product.category_name, product.category_slug
			);
		}
		self.data = data;
		self.rebuild()
	}

	pub fn resize(&mut self, width: f64, height: f64) -> bool {
		self.width = width;
		self.height = height;
		self.rebuild()
	}

	/// Discards the current generation and builds a fresh one from the stored
	/// data. A running loop keeps running against the new graph.
	pub fn rebuild(&mut self) -> bool {
		self.graph = build_graph(
			&self.data.categories,
			&self.data.products,
			self.width,
			self.height,
			&self.layout,
			&mut self.rng,
		);
		self.hovered = None;
		self.start()
	}

	/// Idempotent. Stays idle while there are no categories.
	pub fn start(&mut self) -> bool {
		if self.is_running() || self.graph.category_count() == 0 {
			return false;
		}
		info!("map loop started with {} nodes", self.graph.nodes.len());
		self.loop_state = LoopState::Running;
		true
	}

	pub fn stop(&mut self) {
		if self.is_running() {
			info!("map loop stopped");
		}
		self.loop_state = LoopState::Idle;
	}

	/// Runs one physics step if the loop is running.
	pub fn tick(&mut self) -> bool {
		if !self.is_running() {
			return false;
		}
		physics::step(&mut self.graph, &self.simulation);
		true
	}

	/// Topmost node under the point. Later nodes draw over earlier ones.
	pub fn node_at_position(&self, x: f64, y: f64) -> Option<usize> {
		self.graph.nodes.iter().rposition(|node| node.contains(x, y))
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<usize> {
		self.set_hover(self.node_at_position(x, y));
		self.hovered
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hovered != node {
			debug!(
				"hover -> {:?}",
				node.and_then(|i| self.graph.nodes.get(i)).map(|n| &n.id)
			);
		}
		self.hovered = node;
	}

	pub fn hovered_node(&self) -> Option<&Node> {
		self.hovered.and_then(|i| self.graph.nodes.get(i))
	}

	pub fn is_hovered(&self, idx: usize) -> bool {
		self.hovered == Some(idx)
	}

	pub fn cursor(&self) -> &'static str {
		if self.hovered.is_some() { "pointer" } else { "default" }
	}

	pub fn click(&self) -> Option<MapAction> {
		let node = self.hovered_node()?;
		Some(match &node.kind {
			NodeKind::Category { slug, .. } => MapAction::FilterCategory(slug.clone()),
			NodeKind::Product { .. } => MapAction::Search(node.label.clone()),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::directory_map::graph::fixtures::{category, product};

	fn state_with(data: DirectoryData) -> MapState {
		let mut state = MapState::with_rng(800.0, 600.0, StdRng::seed_from_u64(11));
		state.set_data(data);
		state
	}

	fn cloud() -> DirectoryData {
		DirectoryData {
			categories: vec![category(1, "Cloud", "cloud", Some(2))],
			products: vec![
				product(10, "Nimbus", None, Some("cloud")),
				product(11, "Stratus", None, Some("cloud")),
			],
		}
	}

	#[test]
	fn loop_never_starts_without_categories() {
		let mut state = MapState::with_rng(800.0, 600.0, StdRng::seed_from_u64(0));
		let started = state.set_data(DirectoryData {
			categories: vec![],
			products: vec![product(1, "Lonely", None, None)],
		});
		assert!(!started);
		assert!(state.graph.is_empty());
		assert!(!state.start());
		assert!(!state.tick());
		assert!(!state.is_running());
	}

	#[test]
	fn start_is_idempotent() {
		let mut state = MapState::with_rng(800.0, 600.0, StdRng::seed_from_u64(0));
		assert!(state.set_data(cloud()));
		assert!(!state.start());
		assert!(state.is_running());
	}

	#[test]
	fn rebuild_keeps_a_running_loop() {
		let mut state = state_with(cloud());
		for _ in 0..5 {
			state.tick();
		}
		assert!(!state.resize(400.0, 400.0));
		assert!(state.is_running());
		assert_eq!(state.graph.nodes.len(), 3);
		let (ax, ay) = state.graph.nodes[0].anchor().unwrap();
		assert!((ax - 200.0).abs() < 1e-9 && (ay - 60.0).abs() < 1e-9);
		// products bloom from the new anchor, velocities discarded
		for node in &state.graph.nodes[1..] {
			assert!((node.x - ax).abs() <= 5.0 && (node.y - ay).abs() <= 5.0);
			assert_eq!((node.vx, node.vy), (0.0, 0.0));
		}

		assert!(!state.set_data(DirectoryData::default()));
		assert!(state.graph.is_empty());
		assert!(state.tick());
	}

	#[test]
	fn identical_data_keeps_the_settled_layout() {
		let mut lone = cloud();
		lone.products.pop();
		let mut state = state_with(lone.clone());
		for _ in 0..500 {
			state.tick();
		}
		let settled = state.graph.clone();
		let (ax, ay) = settled.nodes[0].anchor().unwrap();
		let orbit = |n: &Node| (n.x - ax).hypot(n.y - ay);
		assert!((orbit(&settled.nodes[1]) - 60.0).abs() < 0.5);

		for _ in 0..5 {
			assert!(!state.set_data(lone.clone()));
		}
		assert_eq!(state.graph, settled);
		assert!(state.is_running());

		state.set_data(cloud());
		assert_eq!(state.graph.nodes.len(), 3);
		assert!(orbit(&state.graph.nodes[1]) <= 5.0 * 2f64.sqrt());
	}

	#[test]
	fn stopped_loop_restarts_on_identical_data() {
		let mut state = state_with(cloud());
		state.stop();
		assert!(state.set_data(cloud()));
		assert!(state.is_running());
	}

	#[test]
	fn stop_then_start_again() {
		let mut state = state_with(cloud());
		state.stop();
		assert!(!state.tick());
		assert!(state.start());
		assert!(state.tick());
	}

	#[test]
	fn hit_test_prefers_the_node_drawn_last() {
		let mut state = state_with(cloud());
		let (ax, ay) = state.graph.nodes[0].anchor().unwrap();
		// both products sit inside the category hexagon
		for node in &mut state.graph.nodes[1..] {
			node.x = ax;
			node.y = ay;
		}
		assert_eq!(state.node_at_position(ax, ay), Some(2));
		state.graph.nodes[2].x = ax + 300.0;
		assert_eq!(state.node_at_position(ax, ay), Some(1));
		assert_eq!(state.node_at_position(ax + 300.0, ay), Some(2));
		state.graph.nodes[1].x = ax + 100.0;
		assert_eq!(state.node_at_position(ax, ay), Some(0));
		assert_eq!(state.node_at_position(ax + 25.0, ay), Some(0));
		assert_eq!(state.node_at_position(ax + 30.0, ay), None);
	}

	#[test]
	fn hover_drives_cursor_and_rebuild_clears_it() {
		let mut state = state_with(cloud());
		let (ax, ay) = state.graph.nodes[0].anchor().unwrap();
		for node in &mut state.graph.nodes[1..] {
			node.x = ax + 200.0;
		}
		assert_eq!(state.pointer_move(ax, ay), Some(0));
		assert_eq!(state.cursor(), "pointer");
		assert_eq!(state.pointer_move(0.0, 0.0), None);
		assert_eq!(state.cursor(), "default");

		state.pointer_move(ax, ay);
		state.rebuild();
		assert_eq!(state.hovered, None);
	}

	#[test]
	fn clicks_dispatch_by_node_kind() {
		let mut state = state_with(cloud());
		assert_eq!(state.click(), None);

		state.set_hover(Some(0));
		assert_eq!(state.click(), Some(MapAction::FilterCategory("cloud".into())));

		state.set_hover(Some(2));
		assert_eq!(state.click(), Some(MapAction::Search("Stratus".into())));
	}

	#[test]
	fn pointer_never_moves_nodes() {
		let mut state = state_with(cloud());
		let before = state.graph.clone();
		state.pointer_move(400.0, 90.0);
		state.pointer_move(10.0, 10.0);
		let _ = state.click();
		assert_eq!(state.graph, before);
	}
}
