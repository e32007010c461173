use crate::animate::{AnimationHandle, Reveal, Step, Tick};
use crate::features::{LatLng, RouteFeature, StopFeature};
use crate::mode::ViewMode;
use crate::style::{self, CircleStyle, LineStyle, Popup};

/// The one layer drawn over the map, tagged with the load generation that installed it
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    generation: u64,
    animating: bool,
    content: OverlayContent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayContent {
    Routes(RouteGroup),
    Stops(Vec<StopCircle>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteGroup {
    pub lines: Vec<RouteLine>,
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteLine {
    pub route_id: Option<i64>,
    pub style: LineStyle,
    coords: Vec<LatLng>,
    reveal: Reveal,
}

impl RouteLine {
    fn start(route: RouteFeature, now: f64) -> RouteLine {
        RouteLine {
            style: style::route_style(route.route_id),
            route_id: route.route_id,
            reveal: Reveal::start(route.coords.len(), now),
            coords: route.coords,
        }
    }

    /// The part of the line revealed so far
    pub fn visible(&self) -> &[LatLng] {
        &self.coords[..self.reveal.revealed()]
    }

    pub fn coords(&self) -> &[LatLng] {
        &self.coords
    }

    pub fn reveal(&self) -> &Reveal {
        &self.reveal
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub location: LatLng,
    pub popup: Popup,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StopCircle {
    pub location: LatLng,
    pub radius: f64,
    pub style: CircleStyle,
    pub popup: Popup,
}

impl StopCircle {
    fn new(stop: StopFeature) -> StopCircle {
        StopCircle {
            location: stop.location,
            radius: style::stop_radius(stop.demand),
            style: style::STOP_STYLE,
            popup: Popup::stop(stop.name.as_deref(), stop.demand),
        }
    }
}

impl Overlay {
    /// Starts every route animating at `now` and returns handles for the lines that still have coordinates to reveal
    pub fn routes(
        generation: u64,
        routes: Vec<RouteFeature>,
        now: f64,
    ) -> (Overlay, Vec<(AnimationHandle, f64)>) {
        let mut lines = Vec::with_capacity(routes.len());
        let mut markers = vec![];
        let mut pending = vec![];
        for (line, route) in routes.into_iter().enumerate() {
            let start = route.coords.first().copied();
            let route_id = route.route_id;
            let route_line = RouteLine::start(route, now);
            if let Some(due) = route_line.reveal.next_due() {
                pending.push((AnimationHandle { generation, line }, due));
            }
            lines.push(route_line);
            if let Some(location) = start {
                markers.push(Marker {
                    location,
                    popup: Popup::route_start(route_id),
                });
            }
        }
        let overlay = Overlay {
            generation,
            animating: !pending.is_empty(),
            content: OverlayContent::Routes(RouteGroup { lines, markers }),
        };
        (overlay, pending)
    }

    pub fn stops(generation: u64, stops: Vec<StopFeature>) -> Overlay {
        Overlay {
            generation,
            animating: false,
            content: OverlayContent::Stops(stops.into_iter().map(StopCircle::new).collect()),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn mode(&self) -> ViewMode {
        match self.content {
            OverlayContent::Routes(_) => ViewMode::Routes,
            OverlayContent::Stops(_) => ViewMode::Stops,
        }
    }

    pub fn content(&self) -> &OverlayContent {
        &self.content
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Stops all line animations where they are
    pub(crate) fn freeze(&mut self) {
        self.animating = false;
    }

    pub(crate) fn tick(&mut self, handle: AnimationHandle, now: f64) -> Tick {
        if !self.animating || handle.generation != self.generation {
            return Tick::Cancelled;
        }
        let line = match &mut self.content {
            OverlayContent::Routes(group) => group.lines.get_mut(handle.line),
            OverlayContent::Stops(_) => None,
        };
        let tick = match line.map(|line| line.reveal.step(now)) {
            None => Tick::Cancelled,
            Some(Step::NotYet(due)) => Tick::NotYet { due },
            Some(Step::Revealed(Some(due))) => Tick::Continue { handle, due },
            Some(Step::Revealed(None)) | Some(Step::Done) => Tick::Finished,
        };
        if let Tick::Finished = tick {
            self.animating = self.lines().iter().any(|line| !line.reveal.is_finished());
        }
        tick
    }

    pub fn lines(&self) -> &[RouteLine] {
        match &self.content {
            OverlayContent::Routes(group) => &group.lines,
            OverlayContent::Stops(_) => &[],
        }
    }

    pub fn markers(&self) -> &[Marker] {
        match &self.content {
            OverlayContent::Routes(group) => &group.markers,
            OverlayContent::Stops(_) => &[],
        }
    }

    pub fn circles(&self) -> &[StopCircle] {
        match &self.content {
            OverlayContent::Stops(circles) => circles,
            OverlayContent::Routes(_) => &[],
        }
    }
}
