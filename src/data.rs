use geojson::FeatureCollection;
use map_view::features::{self, DecodeError};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

pub const STOPS_FILE: &str = "stops.geojson";
pub const ROUTES_FILE: &str = "routes.geojson";

/// The two feature collections the map is drawn from
#[derive(Debug)]
pub struct MapData {
    pub stops: FeatureCollection,
    pub routes: FeatureCollection,
}

pub struct MapSource {
    dir_path: PathBuf,
}

impl MapSource {
    pub fn new(dir_path: &Path) -> MapSource {
        MapSource {
            dir_path: dir_path.to_owned(),
        }
    }

    fn load_collection(&self, filename: &str) -> Result<(PathBuf, FeatureCollection), DataError> {
        let path = self.dir_path.join(filename);
        let text = std::fs::read_to_string(&path).map_err(|err| DataError::Io(path.clone(), err))?;
        let collection =
            features::decode_collection(&text).map_err(|err| DataError::Decode(path.clone(), err))?;
        Ok((path, collection))
    }

    /// Loads both collections, checking they decode the same way the map will decode them
    pub fn load(&self) -> Result<MapData, DataError> {
        let (stops_path, stops) = self.load_collection(STOPS_FILE)?;
        let stop_count = features::stops_from_collection(&stops)
            .map_err(|err| DataError::Decode(stops_path, err))?
            .len();
        let (routes_path, routes) = self.load_collection(ROUTES_FILE)?;
        let route_count = features::routes_from_collection(&routes)
            .map_err(|err| DataError::Decode(routes_path, err))?
            .len();
        info!(
            dir = %self.dir_path.display(),
            stops = stop_count,
            routes = route_count,
            "loaded map data"
        );
        Ok(MapData { stops, routes })
    }
}

pub fn load_data(dir_path: &Path) -> Result<MapData, DataError> {
    MapSource::new(dir_path).load()
}

#[derive(Debug)]
pub enum DataError {
    Io(PathBuf, std::io::Error),
    Decode(PathBuf, DecodeError),
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Io(path, err) => write!(f, "couldn't read {}: {}", path.display(), err),
            DataError::Decode(path, err) => write!(f, "bad data in {}: {}", path.display(), err),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Io(_, err) => Some(err),
            DataError::Decode(_, err) => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    #[test]
    fn loads_sample_data() {
        let data = load_data(&sample_dir()).unwrap();
        let stops = features::stops_from_collection(&data.stops).unwrap();
        let routes = features::routes_from_collection(&data.routes).unwrap();
        assert!(!stops.is_empty());
        assert_eq!(
            routes.iter().map(|route| route.route_id).collect::<Vec<_>>(),
            vec![Some(1), Some(2), Some(3)]
        );
    }

    #[test]
    fn missing_directory() {
        let err = load_data(&sample_dir().join("missing")).unwrap_err();
        assert!(matches!(err, DataError::Io(ref path, _) if path.ends_with(STOPS_FILE)));
    }
}
