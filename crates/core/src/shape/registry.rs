//! Lookup of shapes by name.

use std::collections::HashMap;
use std::sync::Arc;

use geo::Point;
use geojson::{FeatureCollection, GeoJson};

use crate::error::ConfigurationError;
use crate::shape::{Shape, ShapeIdentifier, builtin};

/// Shapes available to sessions, shared read-only between them.
///
/// This type is cheap to clone since all shapes are stored in `Arc`s.
#[derive(Clone, Debug, Default)]
pub struct ShapeRegistry {
    shapes: HashMap<ShapeIdentifier, Arc<Shape>>,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the shapes that ship with the game.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for shape in builtin::all() {
            registry.insert(shape);
        }
        registry
    }

    /// Load shapes from a GeoJSON `FeatureCollection` of `LineString`
    /// features in longitude/latitude, each carrying a string `name`
    /// property.
    pub fn from_geojson(source: &str) -> Result<Self, ConfigurationError> {
        let invalid = |message: String| ConfigurationError::InvalidShapeFile(message);

        let geojson: GeoJson = source.parse().map_err(|e: geojson::Error| invalid(e.to_string()))?;
        let collection =
            FeatureCollection::try_from(geojson).map_err(|e| invalid(e.to_string()))?;

        let mut registry = Self::new();
        for (index, feature) in collection.features.iter().enumerate() {
            let name = feature
                .property("name")
                .and_then(|name| name.as_str())
                .ok_or_else(|| invalid(format!("feature {index} has no string `name` property")))?;

            let line = match feature.geometry.as_ref().map(|geometry| &geometry.value) {
                Some(geojson::Value::LineString(line)) => line,
                _ => return Err(invalid(format!("shape {name} is not a LineString"))),
            };

            let lon_lat = line
                .iter()
                .map(|position| match position.as_slice() {
                    [lon, lat, ..] => Ok(Point::new(*lon, *lat)),
                    _ => Err(invalid(format!("shape {name} has a malformed position"))),
                })
                .collect::<Result<Vec<_>, _>>()?;

            if registry.insert(Shape::from_lon_lat(name, &lon_lat)?).is_some() {
                tracing::warn!(shape = name, "duplicate shape name, keeping the last one");
            }
        }

        tracing::debug!(count = registry.len(), "loaded shapes from GeoJSON");
        Ok(registry)
    }

    /// Register a shape, returning the one it replaced.
    pub fn insert(&mut self, shape: Shape) -> Option<Arc<Shape>> {
        self.shapes.insert(shape.name().clone(), Arc::new(shape))
    }

    /// Add every shape of `other`, replacing same-named ones.
    pub fn extend(&mut self, other: ShapeRegistry) {
        self.shapes.extend(other.shapes);
    }

    pub fn get(&self, name: &ShapeIdentifier) -> Option<Arc<Shape>> {
        self.shapes.get(name).cloned()
    }

    pub fn resolve(&self, name: &ShapeIdentifier) -> Result<Arc<Shape>, ConfigurationError> {
        self.get(name)
            .ok_or_else(|| ConfigurationError::UnknownShape(name.clone()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<ShapeIdentifier> {
        let mut names: Vec<_> = self.shapes.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
