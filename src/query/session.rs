//! Per-session shape store.
//!
//! An ordered name → shape mapping with a monotonic counter for auto
//! names. Names are never reused within a session and nothing persists
//! across sessions. The store is a per-session value; a hosting façade
//! that multiplexes sessions onto threads must guard each one with an
//! exclusive lock.

use crate::errors::{GeometryError, GeometryResult};
use crate::shapes::Shape;

#[derive(Debug, Clone, Default)]
pub struct Session {
    counter: u64,
    shapes: Vec<(String, Shape)>,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    /// Insert under the next auto-generated name (`shape1`, `shape2`, ...).
    pub fn insert_auto(&mut self, shape: Shape) -> String {
        self.counter += 1;
        let name = format!("shape{}", self.counter);
        self.shapes.push((name.clone(), shape));
        name
    }

    /// Insert under an explicit name; names are never reused.
    pub fn insert_named(&mut self, name: &str, shape: Shape) -> GeometryResult<()> {
        if self.get(name).is_some() {
            return Err(GeometryError::query(format!(
                "Name '{}' is already taken in this session",
                name
            ))
            .with_slot("name"));
        }
        self.shapes.push((name.to_string(), shape));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Shape> {
        self.shapes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, shape)| shape)
    }

    /// Stored shapes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Shape)> {
        self.shapes.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ShapeKind;

    fn sphere() -> Shape {
        Shape::create(ShapeKind::Sphere, 3, &[1.0]).unwrap()
    }

    #[test]
    fn test_auto_names_are_monotonic() {
        let mut session = Session::new();
        assert_eq!(session.insert_auto(sphere()), "shape1");
        assert_eq!(session.insert_auto(sphere()), "shape2");
        assert_eq!(session.insert_auto(sphere()), "shape3");
        assert_eq!(session.len(), 3);
    }

    #[test]
    fn test_named_insert_and_collision() {
        let mut session = Session::new();
        session.insert_named("probe", sphere()).unwrap();
        assert!(session.get("probe").is_some());
        assert!(session.insert_named("probe", sphere()).is_err());
    }

    #[test]
    fn test_named_insert_does_not_consume_counter() {
        let mut session = Session::new();
        session.insert_named("probe", sphere()).unwrap();
        assert_eq!(session.insert_auto(sphere()), "shape1");
    }

    #[test]
    fn test_iteration_order_is_creation_order() {
        let mut session = Session::new();
        session.insert_auto(sphere());
        session.insert_named("probe", sphere()).unwrap();
        session.insert_auto(sphere());
        let names: Vec<&str> = session.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["shape1", "probe", "shape2"]);
    }
}
