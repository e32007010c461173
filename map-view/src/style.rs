//! Colours, sizes and popup text for everything the map draws.

pub const GREEN: &str = "#7fc97f";
pub const PURPLE: &str = "#beaed4";
pub const ORANGE: &str = "#fdc086";
pub const UNKNOWN_ROUTE_COLOR: &str = "gray";
pub const STOP_COLOR: &str = "#FF7F50";

/// Pixels of radius per square root of demand
pub const DEMAND_SCALE: f64 = 4.;

/// Demand used for sizing when a stop has none
pub const SIZING_DEFAULT_DEMAND: f64 = 1.;
/// Demand shown in a popup when a stop has none
pub const LABEL_DEFAULT_DEMAND: f64 = 0.;
pub const DEFAULT_STOP_NAME: &str = "Stop";

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: &'static str,
    pub weight: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircleStyle {
    pub fill_color: &'static str,
    pub color: &'static str,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

pub const STOP_STYLE: CircleStyle = CircleStyle {
    fill_color: STOP_COLOR,
    color: STOP_COLOR,
    weight: 1.,
    opacity: 1.,
    fill_opacity: 0.7,
};

pub fn route_color(route_id: Option<i64>) -> &'static str {
    match route_id {
        Some(1) => GREEN,
        Some(2) => PURPLE,
        Some(3) => ORANGE,
        _ => UNKNOWN_ROUTE_COLOR,
    }
}

pub fn route_style(route_id: Option<i64>) -> LineStyle {
    LineStyle {
        color: route_color(route_id),
        weight: 5.,
        opacity: 1.,
    }
}

/// A missing or zero demand counts as falsy
fn truthy(demand: Option<f64>) -> Option<f64> {
    demand.filter(|d| *d != 0. && !d.is_nan())
}

/// The demand a circle is sized by, falsy demand sizes as 1
pub fn sizing_demand(demand: Option<f64>) -> f64 {
    truthy(demand).unwrap_or(SIZING_DEFAULT_DEMAND)
}

/// The demand printed in a popup, falsy demand prints as 0.
/// This deliberately differs from [`sizing_demand`].
pub fn label_demand(demand: Option<f64>) -> f64 {
    truthy(demand).unwrap_or(LABEL_DEFAULT_DEMAND)
}

pub fn demand_radius(demand: f64) -> f64 {
    demand.sqrt() * DEMAND_SCALE
}

pub fn stop_radius(demand: Option<f64>) -> f64 {
    demand_radius(sizing_demand(demand))
}

pub fn stop_name(name: Option<&str>) -> &str {
    match name {
        Some(name) if !name.is_empty() => name,
        _ => DEFAULT_STOP_NAME,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    /// shown in bold above the text
    pub heading: Option<String>,
    pub text: String,
}

impl Popup {
    pub fn stop(name: Option<&str>, demand: Option<f64>) -> Popup {
        Popup {
            heading: Some(stop_name(name).to_owned()),
            text: format!("Demand: {}", label_demand(demand)),
        }
    }

    pub fn route_start(route_id: Option<i64>) -> Popup {
        Popup {
            heading: None,
            text: match route_id {
                Some(id) => format!("Start of Route {}", id),
                None => "Start of Route".to_owned(),
            },
        }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.heading.as_deref().map_or(false, |h| h.contains(needle)) || self.text.contains(needle)
    }
}
