// Test-only helpers for `campusnav-lib` unit tests
#![allow(dead_code)]
use crate::model::{Edge, EdgeId, Location, LocationId, Point};
use crate::routing::provider::InMemoryNetwork;

/// Builder to create `Edge` instances in tests with sensible defaults.
pub struct EdgeBuilder {
    edge: Edge,
}

impl EdgeBuilder {
    #[must_use]
    pub fn new(source: LocationId, target: LocationId) -> Self {
        Self {
            edge: Edge::new(0, source, target, 1.0, 1),
        }
    }

    pub fn id(mut self, id: EdgeId) -> Self {
        self.edge.id = id;
        self
    }

    pub fn distance(mut self, d: f64) -> Self {
        self.edge.distance = d;
        self
    }

    pub fn time(mut self, minutes: i32) -> Self {
        self.edge.time_cost = minutes;
        self
    }

    pub fn shade(mut self, shaded: bool) -> Self {
        self.edge.has_shade = shaded;
        self
    }

    pub fn scenic(mut self, level: i32) -> Self {
        self.edge.scenic_level = level;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.edge.is_active = false;
        self
    }

    pub fn build(self) -> Edge {
        self.edge
    }
}

/// Builder to create `Location` instances in tests.
pub struct LocationBuilder {
    location: Location,
}

impl LocationBuilder {
    #[must_use]
    pub fn new(id: LocationId, name: &str) -> Self {
        Self {
            location: Location::new(id, name, Point::default()),
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.location.position = Point::new(x, y);
        self
    }

    pub fn shade(mut self, shaded: bool) -> Self {
        self.location.has_shade = shaded;
        self
    }

    pub fn scenic(mut self, level: i32) -> Self {
        self.location.scenic_level = level;
        self
    }

    pub fn blocked(mut self) -> Self {
        self.location.is_accessible = false;
        self
    }

    pub fn build(self) -> Location {
        self.location
    }
}

/// Three locations on a line, A(1) - B(2) - C(3), with both directions stored.
pub fn line_network() -> InMemoryNetwork {
    let locations = vec![
        LocationBuilder::new(1, "A").at(0.0, 0.0).build(),
        LocationBuilder::new(2, "B").at(3.0, 0.0).shade(true).scenic(2).build(),
        LocationBuilder::new(3, "C").at(6.0, 0.0).scenic(5).build(),
    ];
    let a_b = EdgeBuilder::new(1, 2).id(1).distance(3.0).time(2).shade(true).scenic(2).build();
    let b_c = EdgeBuilder::new(2, 3).id(2).distance(3.0).time(2).scenic(5).build();
    let edges = vec![
        a_b,
        Edge { id: 3, ..a_b.reversed() },
        b_c,
        Edge { id: 4, ..b_c.reversed() },
    ];
    InMemoryNetwork::new(locations, edges)
}
