use std::f64::consts::PI;

/// Corners of a flat hexagon centered on `(x, y)`, first corner at 0 rad,
/// stepping 60 degrees.
pub fn hexagon_vertices(x: f64, y: f64, radius: f64) -> [(f64, f64); 6] {
	std::array::from_fn(|i| {
		let angle = PI / 3.0 * i as f64;
		(x + radius * angle.cos(), y + radius * angle.sin())
	})
}
