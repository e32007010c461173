//! Decoding of the `/stops` and `/routes` feature collections into the few fields the map draws.

use geojson::{Feature, FeatureCollection, GeoJson};
use serde_json::Value as JsonValue;
use std::fmt;

/// A geographic position in the (latitude, longitude) order the renderer consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> LatLng {
        LatLng { lat, lng }
    }

    /// GeoJSON positions are `[lon, lat, ...]`
    pub fn from_position(position: &[f64]) -> Option<LatLng> {
        match position {
            [lng, lat, ..] => Some(LatLng::new(*lat, *lng)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteFeature {
    pub route_id: Option<i64>,
    pub coords: Vec<LatLng>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StopFeature {
    pub location: LatLng,
    pub name: Option<String>,
    /// raw `stop_demand`, `None` if absent or not a number
    pub demand: Option<f64>,
}

pub fn decode_collection(body: &str) -> Result<FeatureCollection, DecodeError> {
    match body.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(_) => Err(DecodeError::NotAFeatureCollection("Feature")),
        GeoJson::Geometry(_) => Err(DecodeError::NotAFeatureCollection("Geometry")),
    }
}

pub fn decode_routes(body: &str) -> Result<Vec<RouteFeature>, DecodeError> {
    routes_from_collection(&decode_collection(body)?)
}

pub fn decode_stops(body: &str) -> Result<Vec<StopFeature>, DecodeError> {
    stops_from_collection(&decode_collection(body)?)
}

/// A route with no geometry is kept with no coordinates, any geometry other than a line string is an error
pub fn routes_from_collection(
    collection: &FeatureCollection,
) -> Result<Vec<RouteFeature>, DecodeError> {
    collection
        .features
        .iter()
        .enumerate()
        .map(|(index, feature)| route_from_feature(index, feature))
        .collect()
}

fn route_from_feature(index: usize, feature: &Feature) -> Result<RouteFeature, DecodeError> {
    let coords = match feature.geometry.as_ref().map(|geometry| &geometry.value) {
        None => vec![],
        Some(geojson::Value::LineString(positions)) => positions
            .iter()
            .map(|position| {
                LatLng::from_position(position).ok_or(DecodeError::BadPosition { index })
            })
            .collect::<Result<_, _>>()?,
        Some(other) => {
            return Err(DecodeError::UnexpectedGeometry {
                index,
                expected: "LineString",
                found: geometry_name(other),
            })
        }
    };
    Ok(RouteFeature {
        route_id: feature.property("route_id").and_then(integer_property),
        coords,
    })
}

/// Only point features are stops, everything else in the collection is skipped
pub fn stops_from_collection(
    collection: &FeatureCollection,
) -> Result<Vec<StopFeature>, DecodeError> {
    let mut stops = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.iter().enumerate() {
        if let Some(geojson::Value::Point(position)) =
            feature.geometry.as_ref().map(|geometry| &geometry.value)
        {
            let location =
                LatLng::from_position(position).ok_or(DecodeError::BadPosition { index })?;
            stops.push(StopFeature {
                location,
                name: feature
                    .property("name")
                    .and_then(JsonValue::as_str)
                    .map(str::to_owned),
                demand: feature.property("stop_demand").and_then(JsonValue::as_f64),
            });
        }
    }
    Ok(stops)
}

/// Whole numbers written as floats (`2.0`) count as integers
fn integer_property(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0. && f.abs() <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        JsonValue::String(string) => string.trim().parse().ok(),
        _ => None,
    }
}

fn geometry_name(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}

#[derive(Debug)]
pub enum DecodeError {
    GeoJson(geojson::Error),
    NotAFeatureCollection(&'static str),
    UnexpectedGeometry {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
    BadPosition {
        index: usize,
    },
}

impl From<geojson::Error> for DecodeError {
    fn from(err: geojson::Error) -> Self {
        DecodeError::GeoJson(err)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use DecodeError::*;
        match self {
            GeoJson(err) => write!(f, "{}", err),
            NotAFeatureCollection(found) => {
                write!(f, "expected a FeatureCollection, found a {}", found)
            }
            UnexpectedGeometry {
                index,
                expected,
                found,
            } => write!(
                f,
                "feature {} has a {} geometry, expected {}",
                index, found, expected
            ),
            BadPosition { index } => write!(
                f,
                "feature {} has a position without both longitude and latitude",
                index
            ),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::GeoJson(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn route_coordinates_are_swapped_to_lat_lng() {
        let routes = decode_routes(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"route_id":2},
                 "geometry":{"type":"LineString","coordinates":[[36.8,-1.2],[36.9,-1.3]]}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            routes,
            vec![RouteFeature {
                route_id: Some(2),
                coords: vec![LatLng::new(-1.2, 36.8), LatLng::new(-1.3, 36.9)],
            }]
        );
    }

    #[test]
    fn route_without_geometry_or_id_is_tolerated() {
        let routes = decode_routes(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{},"geometry":null},
                {"type":"Feature","properties":{"route_id":"3"},
                 "geometry":{"type":"LineString","coordinates":[]}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(routes[0].route_id, None);
        assert!(routes[0].coords.is_empty());
        assert_eq!(routes[1].route_id, Some(3));
        assert!(routes[1].coords.is_empty());
    }

    #[test]
    fn route_id_written_as_whole_float() {
        let routes = decode_routes(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"route_id":2.0},
                 "geometry":{"type":"LineString","coordinates":[[36.8,-1.2]]}},
                {"type":"Feature","properties":{"route_id":2.5},
                 "geometry":{"type":"LineString","coordinates":[[36.8,-1.2]]}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(routes[0].route_id, Some(2));
        assert_eq!(crate::style::route_color(routes[0].route_id), crate::style::PURPLE);
        assert_eq!(routes[1].route_id, None);
    }

    #[test]
    fn route_with_point_geometry_is_malformed() {
        let err = decode_routes(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"route_id":1},
                 "geometry":{"type":"Point","coordinates":[36.8,-1.2]}}
            ]}"#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "feature 0 has a Point geometry, expected LineString"
        );
    }

    #[test]
    fn stops_keep_raw_properties() {
        let stops = decode_stops(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"name":"Kencom","stop_demand":9},
                 "geometry":{"type":"Point","coordinates":[36.82,-1.28]}},
                {"type":"Feature","properties":{"stop_demand":"lots"},
                 "geometry":{"type":"Point","coordinates":[36.83,-1.29]}},
                {"type":"Feature","properties":null,
                 "geometry":{"type":"LineString","coordinates":[[36.8,-1.2],[36.9,-1.3]]}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].name.as_deref(), Some("Kencom"));
        assert_eq!(stops[0].demand, Some(9.));
        assert_eq!(stops[0].location, LatLng::new(-1.28, 36.82));
        assert_eq!(stops[1].name, None);
        assert_eq!(stops[1].demand, None);
    }

    #[test]
    fn rejects_non_collections() {
        assert!(decode_stops("not json").is_err());
        assert!(matches!(
            decode_stops(r#"{"type":"Point","coordinates":[1.0,2.0]}"#),
            Err(DecodeError::NotAFeatureCollection("Geometry"))
        ));
    }

    #[test]
    fn short_positions_are_rejected() {
        assert_eq!(LatLng::from_position(&[36.8]), None);
        assert_eq!(
            LatLng::from_position(&[36.8, -1.2, 1650.]),
            Some(LatLng::new(-1.2, 36.8))
        );
    }
}
