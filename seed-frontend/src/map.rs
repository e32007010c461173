use map_view::style::Popup;
use map_view::{LatLng, Overlay, ViewController};
use std::f64::consts::PI;
use web_sys::CanvasRenderingContext2d;

use super::canvasser;
use super::canvasser::draw::*;

pub const INITIAL_CENTRE: LatLng = LatLng {
    lat: -1.213,
    lng: 36.896,
};
pub const INITIAL_ZOOM: f64 = 12.;
pub const WIDTH: f64 = 1000.;
pub const HEIGHT: f64 = 700.;

const TILE_SIZE: f64 = 256.;
const BACKGROUND: &str = "#f2efe9";
const MARKER_COLOR: &str = "#2a81cb";

pub fn init() -> canvasser::App<MapCanvas> {
    canvasser::App::new(
        should_draw,
        draw,
        MapCanvas {
            controller: ViewController::new(),
            geometry: MapGeometry::new(INITIAL_CENTRE, INITIAL_ZOOM, (WIDTH, HEIGHT)),
            dirty: true,
        },
    )
}

pub struct MapCanvas {
    pub controller: ViewController,
    pub geometry: MapGeometry,
    dirty: bool,
}

impl MapCanvas {
    /// The next animation frame will redraw
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

fn should_draw(model: &mut MapCanvas, _frame_count: u64) -> bool {
    std::mem::replace(&mut model.dirty, false)
}

/// Web mercator projection of the map view onto the canvas
#[derive(Clone, Debug)]
pub struct MapGeometry {
    geographic_centre: geo::Point<f64>,
    zoom: f64,
    size: (f64, f64),
}

impl Geometry for MapGeometry {
    type Coords = LatLng;

    fn project(&self, coords: &LatLng) -> (f64, f64) {
        let (x, y) = self.world_pixels(coords.lng, coords.lat);
        let (cx, cy) = self.world_pixels(self.geographic_centre.x(), self.geographic_centre.y());
        (x - cx + self.size.0 / 2., y - cy + self.size.1 / 2.)
    }
}

impl MapGeometry {
    pub fn new(centre: LatLng, zoom: f64, size: (f64, f64)) -> MapGeometry {
        MapGeometry {
            geographic_centre: geo::Point::new(centre.lng, centre.lat),
            zoom,
            size,
        }
    }

    fn world_pixels(&self, lng: f64, lat: f64) -> (f64, f64) {
        let scale = TILE_SIZE * 2f64.powf(self.zoom);
        let lat = lat.to_radians();
        let x = (lng + 180.) / 360. * scale;
        let y = (1. - (lat.tan() + 1. / lat.cos()).ln() / PI) / 2. * scale;
        (x, y)
    }
}

fn draw(model: &MapCanvas, ctx: &CanvasRenderingContext2d) {
    ctx.set_fill_style(&wasm_bindgen::JsValue::from_str(BACKGROUND));
    ctx.fill_rect(0., 0., model.geometry.size.0, model.geometry.size.1);
    if let Some(overlay) = model.controller.overlay() {
        overlay_drawables(overlay).draw(ctx, &model.geometry);
    }
}

fn overlay_drawables(overlay: &Overlay) -> Vec<Box<dyn Drawable<MapGeometry>>> {
    let mut drawables: Vec<Box<dyn Drawable<MapGeometry>>> = vec![];
    for line in overlay.lines() {
        let mut path = Path::through(line.visible().iter().copied());
        path.set_line_width(line.style.weight);
        path.set_stroke_style(line.style.color);
        path.set_alpha(line.style.opacity);
        drawables.push(Box::new(path));
    }
    for marker in overlay.markers() {
        drawables.push(Box::new(Pin::new(marker.location, MARKER_COLOR)));
    }
    for circle in overlay.circles() {
        drawables.push(Box::new(
            Circle::new(circle.location, circle.radius)
                .fill(circle.style.fill_color, circle.style.fill_opacity)
                .stroke(circle.style.color, circle.style.weight, circle.style.opacity),
        ));
    }
    drawables
}

/// A popup opened at a point on the canvas
#[derive(Clone, Debug, PartialEq)]
pub struct OpenPopup {
    pub x: f64,
    pub y: f64,
    pub popup: Popup,
}

/// Finds the popup of the marker or circle under the point, markers first as they are drawn on top
pub fn popup_at(model: &MapCanvas, (x, y): (f64, f64)) -> Option<OpenPopup> {
    let overlay = model.controller.overlay()?;
    let geometry = &model.geometry;
    let head_offset = Pin::<MapGeometry>::HEIGHT - Pin::<MapGeometry>::HEAD_RADIUS;

    let marker = overlay.markers().iter().rev().find_map(|marker| {
        let (mx, my) = geometry.project(&marker.location);
        let hit = (x - mx).abs() <= Pin::<MapGeometry>::HEAD_RADIUS && y <= my && y >= my - Pin::<MapGeometry>::HEIGHT;
        if hit {
            Some(OpenPopup {
                x: mx,
                y: my - head_offset,
                popup: marker.popup.clone(),
            })
        } else {
            None
        }
    });

    marker.or_else(|| {
        overlay.circles().iter().rev().find_map(|circle| {
            let (cx, cy) = geometry.project(&circle.location);
            let reach = circle.radius + circle.style.weight;
            if (x - cx).powi(2) + (y - cy).powi(2) <= reach.powi(2) {
                Some(OpenPopup {
                    x: cx,
                    y: cy - circle.radius,
                    popup: circle.popup.clone(),
                })
            } else {
                None
            }
        })
    })
}
