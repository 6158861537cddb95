use nalgebra::Point3;

/// Caller-supplied chemistry attributes attached to a vertex.
///
/// The graph and layout algorithms never read these fields; they travel with
/// the vertex so a host molecule model can round-trip its chemistry (element
/// symbol, formal charge, isotope label) through graph operations and copies
/// without maintaining a parallel lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VertexData {
    /// Element symbol (e.g., "C", "N", "Br"), if the host assigned one.
    pub symbol: Option<String>,
    /// Formal charge in elementary charge units.
    pub charge: i8,
    /// Isotope mass number, if the host assigned one.
    pub isotope: Option<u16>,
}

/// Represents a single node of a molecular graph.
///
/// A vertex owns its spatial position and the layout bookkeeping the
/// coordinate generator relies on. Connectivity (the neighbor list) is owned
/// by the graph itself, so a `Vertex` can be freely cloned and moved between
/// graphs without dragging adjacency state along.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// The position of the vertex. Layout writes x and y; z is preserved
    /// untouched for hosts that carry 3D coordinates alongside.
    pub position: Point3<f64>,
    /// Whether the coordinate generator considers this vertex positioned.
    /// Vertices with `placed == false` are (re)positioned by the next
    /// layout invocation; placed vertices are left where they are.
    pub placed: bool,
    /// Opaque chemistry attributes supplied by the host.
    pub data: VertexData,
}

impl Vertex {
    /// Creates an unplaced vertex at the given position.
    ///
    /// # Arguments
    ///
    /// * `position` - The initial coordinates of the vertex.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            placed: false,
            data: VertexData::default(),
        }
    }

    /// Creates a vertex that the layout pipeline will treat as already
    /// positioned.
    ///
    /// # Arguments
    ///
    /// * `position` - The fixed coordinates of the vertex.
    pub fn placed_at(position: Point3<f64>) -> Self {
        Self {
            position,
            placed: true,
            data: VertexData::default(),
        }
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self::new(Point3::origin())
    }
}
