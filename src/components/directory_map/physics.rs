use super::graph::{Graph, Node};
use super::params::SimulationParameters;

/// Advances the graph by one frame: product repulsion, spring tethers, then
/// integration. Categories are pinned to their anchors.
pub fn step(graph: &mut Graph, params: &SimulationParameters) {
	let Graph { nodes, links } = graph;

	apply_repulsion(nodes, params);

	for link in links.iter() {
		let (cx, cy) = (nodes[link.target].x, nodes[link.target].y);
		let product = &mut nodes[link.source];
		let (dx, dy) = (cx - product.x, cy - product.y);
		let dist = separation(dx, dy);
		let force = (dist - params.orbit_radius) * params.spring;
		product.vx += dx / dist * force;
		product.vy += dy / dist * force;
	}

	for node in nodes.iter_mut() {
		integrate(node, params);
	}
}

fn apply_repulsion(nodes: &mut [Node], params: &SimulationParameters) {
	for i in 0..nodes.len() {
		if nodes[i].is_category() {
			continue;
		}
		for j in i + 1..nodes.len() {
			if nodes[j].is_category() {
				continue;
			}
			let (dx, dy) = (nodes[i].x - nodes[j].x, nodes[i].y - nodes[j].y);
			let dist = separation(dx, dy);
			if dist >= params.repulsion_range {
				continue;
			}
			let force = params.repulsion / (dist * dist);
			let (fx, fy) = (dx / dist * force, dy / dist * force);
			nodes[i].vx += fx;
			nodes[i].vy += fy;
			nodes[j].vx -= fx;
			nodes[j].vy -= fy;
		}
	}
}

// Coincident points count as 1px apart.
fn separation(dx: f64, dy: f64) -> f64 {
	let dist = (dx * dx + dy * dy).sqrt();
	if dist == 0.0 { 1.0 } else { dist }
}

fn integrate(node: &mut Node, params: &SimulationParameters) {
	if let Some((fx, fy)) = node.anchor() {
		node.x = fx;
		node.y = fy;
		node.vx = 0.0;
		node.vy = 0.0;
		return;
	}

	node.x += node.vx;
	node.y += node.vy;
	node.vx *= params.damping_factor;
	node.vy *= params.damping_factor;
	if node.vx.abs() < params.rest_threshold {
		node.vx = 0.0;
	}
	if node.vy.abs() < params.rest_threshold {
		node.vy = 0.0;
	}
}
