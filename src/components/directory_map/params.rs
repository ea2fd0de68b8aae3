/// Force constants for one physics tick. Distances are canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParameters {
	/// Inverse-square numerator for product/product repulsion.
	pub repulsion: f64,
	/// Pairs at or beyond this distance do not repel.
	pub repulsion_range: f64,
	pub spring: f64,
	/// Resting distance between a product and its category.
	pub orbit_radius: f64,
	pub damping_factor: f64,
	/// Velocity components below this magnitude snap to zero.
	pub rest_threshold: f64,
}

impl Default for SimulationParameters {
	fn default() -> Self {
		Self {
			repulsion: 150.0,
			repulsion_range: 60.0,
			spring: 0.1,
			orbit_radius: 60.0,
			damping_factor: 0.80,
			rest_threshold: 0.01,
		}
	}
}

/// How a product's category fields are compared against category records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchPolicy {
	#[default]
	Exact,
	IgnoreCase,
}

impl MatchPolicy {
	pub fn matches(self, wanted: Option<&str>, actual: &str) -> bool {
		match (self, wanted) {
			(_, None) => false,
			(Self::Exact, Some(w)) => w == actual,
			(Self::IgnoreCase, Some(w)) => w.eq_ignore_ascii_case(actual),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutParameters {
	/// Ring radius as a fraction of the smaller canvas side.
	pub ring_fraction: f64,
	/// Maximum spawn offset per axis around the parent category.
	pub jitter: f64,
	pub category_radius: f64,
	pub product_radius: f64,
	pub match_policy: MatchPolicy,
}

impl Default for LayoutParameters {
	fn default() -> Self {
		Self {
			ring_fraction: 0.35,
			jitter: 5.0,
			category_radius: 30.0,
			product_radius: 12.0,
			match_policy: MatchPolicy::Exact,
		}
	}
}
