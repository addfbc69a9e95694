//! Stored route documents and their conversion to domain types.
//!
//! Route documents are GeoJSON feature collections with a few extra
//! top-level fields. Geometry is loosely typed on disk; it is checked here,
//! once, and turned into the tagged [`Feature`] enum. Features whose shape
//! is wrong are dropped with a warning so that one bad feature does not
//! hide the rest of its route.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domain::{Feature, FeatureId, Point, Route, RouteId, StopFeature, StopId, SubRoute};

use super::error::StoreError;

/// Name given to stops whose feature carries none.
pub const UNNAMED_STOP: &str = "Unnamed stop";

/// Why a feature was dropped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
enum FeatureError {
    #[error("point coordinates must be a [longitude, latitude] pair")]
    BadPosition,

    #[error("line vertex {0} must be a [longitude, latitude] pair")]
    BadVertex(usize),

    #[error("line coordinates must be an array of positions")]
    BadLine,

    #[error("unsupported geometry type")]
    UnsupportedGeometry,

    #[error("invalid id {0:?}")]
    BadId(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
enum CollectionTag {
    #[default]
    FeatureCollection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
enum FeatureTag {
    #[default]
    Feature,
}

/// A route as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDocument {
    pub id: RouteId,
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(default, alias = "empresa", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default = "active_by_default", alias = "activa")]
    pub active: bool,
    #[serde(rename = "type", default)]
    tag: CollectionTag,
    #[serde(default)]
    pub features: Vec<FeatureDocument>,
    #[serde(default, alias = "subRutas")]
    pub sub_routes: Vec<SubRoute>,
}

fn active_by_default() -> bool {
    true
}

/// A GeoJSON feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDocument {
    #[serde(rename = "type", default)]
    tag: FeatureTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub geometry: GeometryDocument,
    #[serde(default)]
    pub properties: PropertiesDocument,
}

/// A GeoJSON geometry. Coordinates are kept untyped until conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeometryDocument {
    Point { coordinates: Value },
    LineString { coordinates: Value },
    #[serde(other)]
    Unsupported,
}

/// The properties of a feature that this crate reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertiesDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, alias = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RouteDocument {
    /// Convert to a domain route.
    ///
    /// Malformed features are dropped and logged. Duplicate sub-route ids
    /// fail the whole route.
    pub fn into_route(self) -> Result<Route, StoreError> {
        let id = self.id;
        let mut features = Vec::with_capacity(self.features.len());

        for (index, feature) in self.features.into_iter().enumerate() {
            match feature.into_feature(&id, index) {
                Ok(feature) => features.push(feature),
                Err(e) => warn!(route = %id, index, error = %e, "dropping feature"),
            }
        }

        let route = Route::new(id, self.name, features, self.sub_routes)?;
        let route = route.with_active(self.active);
        Ok(match self.company {
            Some(company) => route.with_company(company),
            None => route,
        })
    }

    /// The stored form of a route.
    pub fn from_route(route: &Route) -> Self {
        Self {
            id: route.id.clone(),
            name: route.name.clone(),
            company: route.company.clone(),
            active: route.active,
            tag: CollectionTag::FeatureCollection,
            features: route.features.iter().map(FeatureDocument::from_feature).collect(),
            sub_routes: route.sub_routes.clone(),
        }
    }
}

impl FeatureDocument {
    fn into_feature(self, route: &RouteId, index: usize) -> Result<Feature, FeatureError> {
        let raw_id = self.id.unwrap_or_else(|| format!("{route}:{index}"));
        let feature_id = FeatureId::parse(raw_id.clone()).map_err(|_| FeatureError::BadId(raw_id))?;

        match self.geometry {
            GeometryDocument::Point { coordinates } => {
                let coordinates = position(&coordinates).ok_or(FeatureError::BadPosition)?;
                let stop_id = match self.properties.id {
                    Some(id) => StopId::parse(id.clone()).map_err(|_| FeatureError::BadId(id))?,
                    None => StopId::parse(feature_id.as_str())
                        .map_err(|_| FeatureError::BadId(feature_id.to_string()))?,
                };
                Ok(Feature::Point(StopFeature {
                    feature_id,
                    stop_id,
                    name: self
                        .properties
                        .name
                        .unwrap_or_else(|| UNNAMED_STOP.to_string()),
                    coordinates,
                }))
            }
            GeometryDocument::LineString { coordinates } => {
                let vertices = coordinates.as_array().ok_or(FeatureError::BadLine)?;
                let path = vertices
                    .iter()
                    .enumerate()
                    .map(|(i, v)| position(v).ok_or(FeatureError::BadVertex(i)))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Feature::Line {
                    id: feature_id,
                    path,
                })
            }
            GeometryDocument::Unsupported => Err(FeatureError::UnsupportedGeometry),
        }
    }

    fn from_feature(feature: &Feature) -> Self {
        match feature {
            Feature::Line { id, path } => Self {
                tag: FeatureTag::Feature,
                id: Some(id.to_string()),
                geometry: GeometryDocument::LineString {
                    coordinates: Value::Array(path.iter().map(position_value).collect()),
                },
                properties: PropertiesDocument::default(),
            },
            Feature::Point(stop) => Self {
                tag: FeatureTag::Feature,
                id: Some(stop.feature_id.to_string()),
                geometry: GeometryDocument::Point {
                    coordinates: position_value(&stop.coordinates),
                },
                properties: PropertiesDocument {
                    id: Some(stop.stop_id.to_string()),
                    name: Some(stop.name.clone()),
                },
            },
        }
    }
}

/// Read a GeoJSON position. Range is not checked, only shape.
fn position(value: &Value) -> Option<Point> {
    let numbers = value
        .as_array()?
        .iter()
        .map(Value::as_f64)
        .collect::<Option<Vec<f64>>>()?;
    Point::from_position(&numbers)
}

fn position_value(point: &Point) -> Value {
    serde_json::json!([point.longitude, point.latitude])
}
