//! Colors for the map. Every choice is a function of the theme and the node
//! kind only.

use super::graph::{Node, NodeKind};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
	#[default]
	Light,
	Dark,
}

impl Theme {
	pub fn from_dark(dark: bool) -> Self {
		if dark { Self::Dark } else { Self::Light }
	}
}

pub const CATEGORY_GRADIENT: [(f64, &str); 2] = [(0.0, "#14b8a6"), (1.0, "#0f766e")];
pub const CATEGORY_BORDER: &str = "#ccfbf1";
pub const HOVER_OUTLINE: &str = "#fff";
pub const HOVER_SHADOW: &str = "rgba(0, 0, 0, 0.4)";

const UNOWNED: &str = "#9ca3af";

pub fn link_stroke(theme: Theme) -> &'static str {
	match theme {
		Theme::Dark => "rgba(20, 184, 166, 0.15)",
		Theme::Light => "rgba(13, 148, 136, 0.15)",
	}
}

pub fn product_fill(theme: Theme) -> &'static str {
	match theme {
		Theme::Dark => "rgba(30, 41, 59, 0.9)",
		Theme::Light => "rgba(255, 255, 255, 0.95)",
	}
}

pub fn label_fill(theme: Theme) -> &'static str {
	match theme {
		Theme::Dark => "#f0f9ff",
		Theme::Light => "#0f172a",
	}
}

pub fn border(node: &Node, theme: Theme) -> &'static str {
	match (&node.kind, theme) {
		(NodeKind::Category { .. }, _) => CATEGORY_BORDER,
		(NodeKind::Product { .. }, _) if node.category_ref().is_none() => UNOWNED,
		(NodeKind::Product { .. }, Theme::Dark) => "#fbbf24",
		(NodeKind::Product { .. }, Theme::Light) => "#d97706",
	}
}
