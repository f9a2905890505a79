use serde::{Deserialize, Serialize};

/// Position in the normalized `[0, 100] x [0, 100]` globe space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Visual category of a gumball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenClass {
    ClassA,
    ClassB,
}

impl TokenClass {
    /// Colour word used in utterances about this class.
    pub fn colour_name(&self) -> &'static str {
        match self {
            TokenClass::ClassA => "green",
            TokenClass::ClassB => "blue",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub position: Point,
    pub class: TokenClass,
}

/// Circular boundary tokens live in. `radius` is the effective radius for
/// token centres, not the drawn outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub center: Point,
    pub radius: f64,
}

impl Container {
    pub fn distance_from_center(&self, p: &Point) -> f64 {
        self.center.distance(p)
    }

    pub fn contains(&self, p: &Point) -> bool {
        self.distance_from_center(p) <= self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(b.distance(&a), 5.0);
    }

    #[test]
    fn container_includes_its_rim() {
        let c = Container {
            center: Point::new(50.0, 50.0),
            radius: 41.0,
        };
        assert!(c.contains(&Point::new(91.0, 50.0)));
        assert!(!c.contains(&Point::new(91.5, 50.0)));
        assert!(c.contains(&c.center));
    }
}
