//! Geographic primitives describing the dashboard's region of interest.

/// A geographical coordinate expressed as longitude and latitude, in degrees.
///
/// Longitude comes first to match the vertex order of well-known-text (WKT)
/// geometry, so a vertex can be written straight into a `POLYGON(...)` literal.
///
/// # Examples
///
/// ```
/// use stormboard::LonLat;
///
/// let downtown_houston = LonLat(-95.3698, 29.7604);
/// assert_eq!(downtown_houston.0, -95.3698); // Longitude
/// assert_eq!(downtown_houston.1, 29.7604); // Latitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LonLat(pub f64, pub f64);

/// A polygon over geographical coordinates, stored as a single vertex ring.
///
/// The ring is expected to be closed (first vertex repeated as the last);
/// [`crate::load_config`] rejects open rings before a `Polygon` is built, so
/// holders of an instance can render it without re-checking.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<LonLat>,
}

impl Polygon {
    pub fn new(vertices: Vec<LonLat>) -> Self {
        Self { vertices }
    }

    /// Returns `true` when the ring has at least four vertices and the first
    /// vertex equals the last.
    pub fn is_closed(&self) -> bool {
        match (self.vertices.first(), self.vertices.last()) {
            (Some(first), Some(last)) => self.vertices.len() >= 4 && first == last,
            _ => false,
        }
    }

    pub fn vertices(&self) -> &[LonLat] {
        &self.vertices
    }

    /// Renders the ring as a WKT `POLYGON` literal.
    ///
    /// # Examples
    ///
    /// ```
    /// use stormboard::{LonLat, Polygon};
    ///
    /// let triangle = Polygon::new(vec![
    ///     LonLat(-95.25, 29.88),
    ///     LonLat(-95.28, 30.28),
    ///     LonLat(-95.46, 29.78),
    ///     LonLat(-95.25, 29.88),
    /// ]);
    /// assert_eq!(
    ///     triangle.wkt(),
    ///     "POLYGON((-95.25 29.88, -95.28 30.28, -95.46 29.78, -95.25 29.88))"
    /// );
    /// ```
    pub fn wkt(&self) -> String {
        let ring = self
            .vertices
            .iter()
            .map(|LonLat(lon, lat)| format!("{} {}", lon, lat))
            .collect::<Vec<_>>()
            .join(", ");
        format!("POLYGON(({}))", ring)
    }
}
