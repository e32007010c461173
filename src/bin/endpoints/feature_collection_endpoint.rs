use geojson::FeatureCollection;
use std::sync::Arc;
use tracing::debug;
use warp::Filter;

use transit_map::MapData;

use super::with_data;

type Select = fn(&MapData) -> &FeatureCollection;

async fn feature_collection_handler(
    data: Arc<MapData>,
    name: &'static str,
    select: Select,
) -> Result<impl warp::Reply, warp::Rejection> {
    let collection = select(&data);
    debug!(
        endpoint = name,
        features = collection.features.len(),
        "serving feature collection"
    );
    Ok(warp::reply::json(collection))
}

fn feature_collection_route(
    name: &'static str,
    data: Arc<MapData>,
    select: Select,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let cors = warp::cors().allow_any_origin().allow_method("GET");
    warp::get()
        .and(warp::path(name))
        .and(warp::path::end())
        .and(with_data(data))
        .and_then(move |data| feature_collection_handler(data, name, select))
        .with(cors)
}

/// `GET /stops`
pub fn stops_route(
    data: Arc<MapData>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    feature_collection_route("stops", data, |data| &data.stops)
}

/// `GET /routes`
pub fn routes_route(
    data: Arc<MapData>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    feature_collection_route("routes", data, |data| &data.routes)
}

#[cfg(test)]
mod test {
    use super::*;
    use map_view::features::{decode_collection, decode_routes, decode_stops};
    use warp::http::StatusCode;

    fn data() -> Arc<MapData> {
        Arc::new(MapData {
            stops: decode_collection(
                r#"{"type":"FeatureCollection","features":[
                    {"type":"Feature","properties":{"name":"Kencom","stop_demand":9},
                     "geometry":{"type":"Point","coordinates":[36.8219,-1.2864]}}
                ]}"#,
            )
            .unwrap(),
            routes: decode_collection(
                r#"{"type":"FeatureCollection","features":[
                    {"type":"Feature","properties":{"route_id":2},
                     "geometry":{"type":"LineString","coordinates":[[36.8,-1.2],[36.9,-1.3]]}}
                ]}"#,
            )
            .unwrap(),
        })
    }

    #[tokio::test]
    async fn serves_stops() {
        let response = warp::test::request()
            .path("/stops")
            .reply(&stops_route(data()))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = std::str::from_utf8(response.body()).unwrap();
        let stops = decode_stops(body).unwrap();
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].name.as_deref(), Some("Kencom"));
        assert_eq!(stops[0].demand, Some(9.));
    }

    #[tokio::test]
    async fn serves_routes() {
        let response = warp::test::request()
            .path("/routes")
            .reply(&routes_route(data()))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let routes = decode_routes(std::str::from_utf8(response.body()).unwrap()).unwrap();
        assert_eq!(routes[0].route_id, Some(2));
        assert_eq!(routes[0].coords.len(), 2);
    }

    #[tokio::test]
    async fn only_exact_paths_match() {
        let filter = stops_route(data()).or(routes_route(data()));
        for path in &["/stops/1", "/stop", "/"] {
            let response = warp::test::request().path(path).reply(&filter).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", path);
        }
        let response = warp::test::request()
            .method("POST")
            .path("/stops")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
