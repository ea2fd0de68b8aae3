use std::f64::consts::PI;

use log::debug;
use rand::Rng;

use super::params::{LayoutParameters, MatchPolicy};
use super::types::{CategoryRecord, ProductRecord};

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
	Category {
		slug: String,
		count: u64,
		anchor: (f64, f64),
	},
	Product {
		/// Id of the owning category node, if one matched.
		category: Option<String>,
		record: ProductRecord,
	},
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	pub kind: NodeKind,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub radius: f64,
	pub label: String,
}

impl Node {
	pub fn is_category(&self) -> bool {
		matches!(self.kind, NodeKind::Category { .. })
	}

	pub fn anchor(&self) -> Option<(f64, f64)> {
		match self.kind {
			NodeKind::Category { anchor, .. } => Some(anchor),
			NodeKind::Product { .. } => None,
		}
	}

	pub fn category_ref(&self) -> Option<&str> {
		match &self.kind {
			NodeKind::Product { category, .. } => category.as_deref(),
			NodeKind::Category { .. } => None,
		}
	}

	pub fn contains(&self, x: f64, y: f64) -> bool {
		let (dx, dy) = (x - self.x, y - self.y);
		dx * dx + dy * dy < self.radius * self.radius
	}
}

/// Tether from a product node to its category node, by index into
/// [`Graph::nodes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
	pub source: usize,
	pub target: usize,
}

/// One graph generation. Categories come first, in input order, followed by
/// products in input order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
	pub nodes: Vec<Node>,
	pub links: Vec<Link>,
}

impl Graph {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn category_count(&self) -> usize {
		self.nodes.iter().take_while(|n| n.is_category()).count()
	}
}

/// Position of the `index`-th of `total` categories on the anchor ring.
pub fn ring_position(index: usize, total: usize, width: f64, height: f64, ring_fraction: f64) -> (f64, f64) {
	let ring_radius = (width.min(height) * ring_fraction).max(0.0);
	let angle = (index as f64 / total as f64) * PI * 2.0 - PI / 2.0;
	(
		width / 2.0 + angle.cos() * ring_radius,
		height / 2.0 + angle.sin() * ring_radius,
	)
}

/// Index of the first category the product names, by name or by slug.
pub fn resolve_owner(categories: &[CategoryRecord], product: &ProductRecord, policy: MatchPolicy) -> Option<usize> {
	categories.iter().position(|cat| {
		policy.matches(product.category_name.as_deref(), &cat.name)
			|| policy.matches(product.category_slug.as_deref(), &cat.slug)
	})
}

fn names_a_category(product: &ProductRecord) -> bool {
	product.category_name.is_some() || product.category_slug.is_some()
}

/// Products that name a category which is not in the list.
pub fn unmatched_products<'a>(
	categories: &'a [CategoryRecord],
	products: &'a [ProductRecord],
	policy: MatchPolicy,
) -> impl Iterator<Item = &'a ProductRecord> + 'a {
	products
		.iter()
		.filter(move |p| names_a_category(p) && resolve_owner(categories, p, policy).is_none())
}

pub fn build_graph<R: Rng>(
	categories: &[CategoryRecord],
	products: &[ProductRecord],
	width: f64,
	height: f64,
	layout: &LayoutParameters,
	rng: &mut R,
) -> Graph {
	if categories.is_empty() {
		debug!("no categories, leaving the map empty");
		return Graph::default();
	}

	let mut nodes = Vec::with_capacity(categories.len() + products.len());
	let mut links = Vec::new();

	for (i, cat) in categories.iter().enumerate() {
		let (x, y) = ring_position(i, categories.len(), width, height, layout.ring_fraction);
		nodes.push(Node {
			id: format!("cat-{}", cat.id),
			kind: NodeKind::Category {
				slug: cat.slug.clone(),
				count: cat.product_count.unwrap_or(0),
				anchor: (x, y),
			},
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			radius: layout.category_radius,
			label: cat.name.clone(),
		});
	}

	let center = (width / 2.0, height / 2.0);
	for prod in products {
		let owner = resolve_owner(categories, prod, layout.match_policy);
		if owner.is_none() && names_a_category(prod) {
			debug!("product {} matched no category, leaving it unowned", prod.name);
		}

		let (sx, sy) = owner.map(|i| (nodes[i].x, nodes[i].y)).unwrap_or(center);
		let (jx, jy) = if layout.jitter > 0.0 {
			(
				rng.gen_range(-layout.jitter..layout.jitter),
				rng.gen_range(-layout.jitter..layout.jitter),
			)
		} else {
			(0.0, 0.0)
		};

		let index = nodes.len();
		let category = owner.map(|i| nodes[i].id.clone());
		nodes.push(Node {
			id: format!("prod-{}", prod.id),
			kind: NodeKind::Product {
				category,
				record: prod.clone(),
			},
			x: sx + jx,
			y: sy + jy,
			vx: 0.0,
			vy: 0.0,
			radius: layout.product_radius,
			label: prod.name.clone(),
		});
		if let Some(target) = owner {
			links.push(Link {
				source: index,
				target,
			});
		}
	}

	debug!(
		"built map graph: {} nodes, {} links ({}x{})",
		nodes.len(),
		links.len(),
		width,
		height
	);
	Graph { nodes, links }
}

#[cfg(test)]
pub(super) mod fixtures {
	use super::super::types::{CategoryRecord, ProductRecord};

	pub fn category(id: i64, name: &str, slug: &str, count: Option<u64>) -> CategoryRecord {
		CategoryRecord {
			id,
			name: name.into(),
			slug: slug.into(),
			product_count: count,
		}
	}

	pub fn product(id: i64, name: &str, cat_name: Option<&str>, cat_slug: Option<&str>) -> ProductRecord {
		ProductRecord {
			id,
			name: name.into(),
			category_name: cat_name.map(Into::into),
			category_slug: cat_slug.map(Into::into),
			extra: Default::default(),
		}
	}
}
