use std::sync::Arc;
use warp::Filter;

mod feature_collection_endpoint;

pub use feature_collection_endpoint::{routes_route, stops_route};

pub fn with_data<D: Sync + Send>(
    db: Arc<D>,
) -> impl Filter<Extract = (Arc<D>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || db.clone())
}
