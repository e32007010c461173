//! The view controller decides what is on the map.
//!
//! Switching view is split around the fetch: [`ViewController::switch_view`] hands out a [`LoadRequest`]
//! numbered with a new generation, and the response is handed back with [`ViewController::complete_load`]
//! or [`ViewController::fail_load`]. Only the response to the latest request is applied, so responses
//! arriving out of order can never overwrite a newer view.

use crate::animate::{AnimationHandle, Tick};
use crate::features::{self, DecodeError};
use crate::legend::Legend;
use crate::mode::ViewMode;
use crate::overlay::Overlay;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    pub generation: u64,
    pub mode: ViewMode,
}

impl LoadRequest {
    pub fn endpoint(&self) -> &'static str {
        self.mode.endpoint()
    }
}

/// What was on the map before a load replaced it
#[derive(Debug, Default, PartialEq)]
pub struct Detached {
    pub overlay: Option<Overlay>,
    pub legend: Option<Legend>,
}

#[derive(Debug, PartialEq)]
pub enum LoadOutcome {
    /// a newer request was made since, nothing changed
    Stale,
    Applied {
        detached: Detached,
        /// line animations to tick, each with the time its next coordinate is due
        animations: Vec<(AnimationHandle, f64)>,
    },
}

#[derive(Default)]
pub struct ViewController {
    generation: u64,
    pending: Option<LoadRequest>,
    overlay: Option<Overlay>,
    legend: Option<Legend>,
}

impl ViewController {
    pub fn new() -> ViewController {
        Default::default()
    }

    /// Requests a new view, any earlier request still in flight becomes stale
    pub fn switch_view(&mut self, mode: ViewMode) -> LoadRequest {
        self.generation += 1;
        let request = LoadRequest {
            generation: self.generation,
            mode,
        };
        self.pending = Some(request);
        request
    }

    /// Applies the body fetched for `request`.
    /// The previous overlay and legend are always detached before anything new is built, and stay
    /// detached if the body can't be decoded.
    pub fn complete_load(
        &mut self,
        request: &LoadRequest,
        body: &str,
        now: f64,
    ) -> Result<LoadOutcome, LoadError> {
        if !self.settle(request) {
            return Ok(LoadOutcome::Stale);
        }
        let detached = self.detach();
        let (overlay, animations) = match request.mode {
            ViewMode::Routes => {
                let routes = features::decode_routes(body).map_err(|err| request.error(err))?;
                Overlay::routes(request.generation, routes, now)
            }
            ViewMode::Stops => {
                let stops = features::decode_stops(body).map_err(|err| request.error(err))?;
                (Overlay::stops(request.generation, stops), vec![])
            }
        };
        debug!(
            mode = %request.mode,
            generation = request.generation,
            animations = animations.len(),
            "applied view"
        );
        self.overlay = Some(overlay);
        if request.mode.has_legend() {
            self.legend = Some(Legend::stop_demand());
        }
        Ok(LoadOutcome::Applied {
            detached,
            animations,
        })
    }

    /// Records that fetching for `request` failed.
    /// Returns the error to report, or `None` if the request was already stale.
    pub fn fail_load(&mut self, request: &LoadRequest, reason: String) -> Option<LoadError> {
        if !self.settle(request) {
            return None;
        }
        self.detach();
        Some(LoadError {
            mode: request.mode,
            kind: LoadErrorKind::Fetch(reason),
        })
    }

    /// Reveals the next coordinate of an animating line if it is due
    pub fn tick(&mut self, handle: AnimationHandle, now: f64) -> Tick {
        match &mut self.overlay {
            Some(overlay) => overlay.tick(handle, now),
            None => Tick::Cancelled,
        }
    }

    /// Freezes all route lines as they are, outstanding handles become cancelled
    pub fn cancel_animations(&mut self) {
        if let Some(overlay) = &mut self.overlay {
            overlay.freeze();
        }
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    /// The mode of the request waiting for its response
    pub fn pending(&self) -> Option<ViewMode> {
        self.pending.map(|request| request.mode)
    }

    pub fn is_animating(&self) -> bool {
        self.overlay.as_ref().map_or(false, Overlay::is_animating)
    }

    fn settle(&mut self, request: &LoadRequest) -> bool {
        if self.pending.as_ref() == Some(request) {
            self.pending = None;
            true
        } else {
            debug!(
                mode = %request.mode,
                generation = request.generation,
                latest = self.generation,
                "dropping stale response"
            );
            false
        }
    }

    fn detach(&mut self) -> Detached {
        let mut overlay = self.overlay.take();
        if let Some(overlay) = &mut overlay {
            overlay.freeze();
        }
        Detached {
            overlay,
            legend: self.legend.take(),
        }
    }
}

impl LoadRequest {
    fn error(&self, err: DecodeError) -> LoadError {
        LoadError {
            mode: self.mode,
            kind: LoadErrorKind::Decode(err),
        }
    }
}

#[derive(Debug)]
pub struct LoadError {
    pub mode: ViewMode,
    pub kind: LoadErrorKind,
}

#[derive(Debug)]
pub enum LoadErrorKind {
    Fetch(String),
    Decode(DecodeError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error loading {}: ", self.mode)?;
        match &self.kind {
            LoadErrorKind::Fetch(reason) => f.write_str(reason),
            LoadErrorKind::Decode(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            LoadErrorKind::Decode(err) => Some(err),
            LoadErrorKind::Fetch(_) => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::features::LatLng;

    const KENCOM: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"name":"Kencom","stop_demand":9},
         "geometry":{"type":"Point","coordinates":[36.8219,-1.2864]}}
    ]}"#;

    const ROUTE_2: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"route_id":2},
         "geometry":{"type":"LineString","coordinates":[[36.8,-1.2],[36.9,-1.3]]}}
    ]}"#;

    fn load(controller: &mut ViewController, mode: ViewMode, body: &str) -> LoadOutcome {
        let request = controller.switch_view(mode);
        controller.complete_load(&request, body, 0.).unwrap()
    }

    #[test]
    fn stops_view_shows_circles_and_legend() {
        let mut controller = ViewController::new();
        load(&mut controller, ViewMode::Stops, KENCOM);

        let overlay = controller.overlay().unwrap();
        assert_eq!(overlay.mode(), ViewMode::Stops);
        assert_eq!(overlay.circles().len(), 1);
        let circle = &overlay.circles()[0];
        assert_eq!(circle.radius, 12.);
        assert!(circle.popup.contains("Kencom"));
        assert!(circle.popup.contains("9"));
        assert_eq!(controller.legend(), Some(&Legend::stop_demand()));
        assert_eq!(controller.pending(), None);
    }

    #[test]
    fn routes_view_grows_line_and_places_marker() {
        let mut controller = ViewController::new();
        let outcome = load(&mut controller, ViewMode::Routes, ROUTE_2);
        assert!(controller.legend().is_none());

        let overlay = controller.overlay().unwrap();
        assert_eq!(overlay.lines().len(), 1);
        assert_eq!(overlay.lines()[0].style.color, "#beaed4");
        assert_eq!(overlay.lines()[0].visible(), &[LatLng::new(-1.2, 36.8)][..]);
        assert_eq!(overlay.markers().len(), 1);
        assert_eq!(overlay.markers()[0].location, LatLng::new(-1.2, 36.8));

        let (handle, due) = match outcome {
            LoadOutcome::Applied { animations, .. } => animations[0],
            LoadOutcome::Stale => panic!("expected the load to apply"),
        };
        assert_eq!(due, 60.);
        assert_eq!(controller.tick(handle, due), Tick::Finished);
        assert_eq!(
            controller.overlay().unwrap().lines()[0].visible(),
            &[LatLng::new(-1.2, 36.8), LatLng::new(-1.3, 36.9)][..]
        );
    }

    #[test]
    fn reveals_follow_the_interval() {
        let mut controller = ViewController::new();
        let body = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"route_id":1},
             "geometry":{"type":"LineString","coordinates":[[0,0],[1,1],[2,2],[3,3],[4,4]]}}
        ]}"#;
        let request = controller.switch_view(ViewMode::Routes);
        let start = 500.;
        let outcome = controller.complete_load(&request, body, start).unwrap();
        let (mut handle, mut due) = match outcome {
            LoadOutcome::Applied { animations, .. } => animations[0],
            LoadOutcome::Stale => panic!("expected the load to apply"),
        };

        let mut reveal_times = vec![start];
        let mut now = start;
        loop {
            now += 25.;
            match controller.tick(handle, now) {
                Tick::NotYet { due: next } => assert_eq!(next, due),
                Tick::Continue { handle: h, due: next } => {
                    reveal_times.push(now);
                    handle = h;
                    due = next;
                }
                Tick::Finished => {
                    reveal_times.push(now);
                    break;
                }
                Tick::Cancelled => panic!("animation cancelled"),
            }
        }

        let line = &controller.overlay().unwrap().lines()[0];
        assert_eq!(line.visible(), line.coords());
        assert_eq!(reveal_times.len(), 5);
        for (n, time) in reveal_times.iter().enumerate() {
            assert!(*time >= start + n as f64 * 60.);
        }
    }

    #[test]
    fn switching_detaches_stops_and_legend_first() {
        let mut controller = ViewController::new();
        load(&mut controller, ViewMode::Stops, KENCOM);
        match load(&mut controller, ViewMode::Routes, ROUTE_2) {
            LoadOutcome::Applied { detached, .. } => {
                assert_eq!(detached.overlay.unwrap().mode(), ViewMode::Stops);
                assert_eq!(detached.legend, Some(Legend::stop_demand()));
            }
            LoadOutcome::Stale => panic!("expected the load to apply"),
        }
        assert_eq!(controller.overlay().unwrap().mode(), ViewMode::Routes);
        assert!(controller.legend().is_none());
    }

    #[test]
    fn late_response_to_an_old_request_is_dropped() {
        let mut controller = ViewController::new();
        let routes = controller.switch_view(ViewMode::Routes);
        let stops = controller.switch_view(ViewMode::Stops);

        // stops answers first, routes arrives afterwards
        controller.complete_load(&stops, KENCOM, 0.).unwrap();
        assert_eq!(
            controller.complete_load(&routes, ROUTE_2, 10.).unwrap(),
            LoadOutcome::Stale
        );
        assert_eq!(controller.overlay().unwrap().mode(), ViewMode::Stops);
        assert!(controller.legend().is_some());
    }

    #[test]
    fn early_response_to_an_old_request_is_dropped() {
        let mut controller = ViewController::new();
        load(&mut controller, ViewMode::Stops, KENCOM);
        let routes = controller.switch_view(ViewMode::Routes);
        let stops = controller.switch_view(ViewMode::Stops);

        assert_eq!(
            controller.complete_load(&routes, ROUTE_2, 0.).unwrap(),
            LoadOutcome::Stale
        );
        assert_eq!(controller.overlay().unwrap().mode(), ViewMode::Stops);
        assert_eq!(controller.pending(), Some(ViewMode::Stops));
        controller.complete_load(&stops, KENCOM, 0.).unwrap();
        assert_eq!(controller.pending(), None);
    }

    #[test]
    fn replacing_routes_cancels_their_animations() {
        let mut controller = ViewController::new();
        let handle = match load(&mut controller, ViewMode::Routes, ROUTE_2) {
            LoadOutcome::Applied { animations, .. } => animations[0].0,
            LoadOutcome::Stale => panic!("expected the load to apply"),
        };
        load(&mut controller, ViewMode::Routes, ROUTE_2);
        assert_eq!(controller.tick(handle, 1_000.), Tick::Cancelled);
        assert_eq!(controller.overlay().unwrap().lines()[0].visible().len(), 1);
    }

    #[test]
    fn cancelled_animations_freeze() {
        let mut controller = ViewController::new();
        let handle = match load(&mut controller, ViewMode::Routes, ROUTE_2) {
            LoadOutcome::Applied { animations, .. } => animations[0].0,
            LoadOutcome::Stale => panic!("expected the load to apply"),
        };
        assert!(controller.is_animating());
        controller.cancel_animations();
        assert!(!controller.is_animating());
        assert_eq!(controller.tick(handle, 1_000.), Tick::Cancelled);
    }

    #[test]
    fn empty_route_draws_degenerate_line_without_marker() {
        let mut controller = ViewController::new();
        let body = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"route_id":5},
             "geometry":{"type":"LineString","coordinates":[]}}
        ]}"#;
        match load(&mut controller, ViewMode::Routes, body) {
            LoadOutcome::Applied { animations, .. } => assert!(animations.is_empty()),
            LoadOutcome::Stale => panic!("expected the load to apply"),
        }
        let overlay = controller.overlay().unwrap();
        assert_eq!(overlay.lines().len(), 1);
        assert!(overlay.lines()[0].visible().is_empty());
        assert!(overlay.markers().is_empty());
    }

    #[test]
    fn undecodable_body_leaves_the_map_blank() {
        let mut controller = ViewController::new();
        load(&mut controller, ViewMode::Stops, KENCOM);
        let request = controller.switch_view(ViewMode::Routes);
        let err = controller
            .complete_load(&request, "<html>oops</html>", 0.)
            .unwrap_err();
        assert_eq!(err.mode, ViewMode::Routes);
        assert!(err.to_string().starts_with("Error loading routes: "));
        assert!(controller.overlay().is_none());
        assert!(controller.legend().is_none());
    }

    #[test]
    fn fetch_failures() {
        let mut controller = ViewController::new();
        load(&mut controller, ViewMode::Stops, KENCOM);
        let stale = controller.switch_view(ViewMode::Routes);
        let current = controller.switch_view(ViewMode::Routes);

        assert!(controller.fail_load(&stale, "offline".to_owned()).is_none());
        assert!(controller.overlay().is_some());

        let err = controller
            .fail_load(&current, "offline".to_owned())
            .unwrap();
        assert_eq!(err.to_string(), "Error loading routes: offline");
        assert!(controller.overlay().is_none());
        assert!(controller.legend().is_none());
    }
}
