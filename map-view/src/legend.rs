use crate::style::{demand_radius, CircleStyle, STOP_STYLE};

pub const LEGEND_TITLE: &str = "Stop Demand";
pub const LEGEND_DEMANDS: [f64; 3] = [1., 5., 10.];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub demand: f64,
    pub radius: f64,
}

impl LegendEntry {
    /// Width and height of the square the swatch circle fits in
    pub fn swatch_size(&self) -> f64 {
        self.radius * 2.
    }
}

/// Reference sizes for the stop-demand scale
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub title: &'static str,
    pub position: Corner,
    pub style: CircleStyle,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    pub fn stop_demand() -> Legend {
        Legend {
            title: LEGEND_TITLE,
            position: Corner::BottomRight,
            style: STOP_STYLE,
            entries: LEGEND_DEMANDS
                .iter()
                .map(|&demand| LegendEntry {
                    demand,
                    radius: demand_radius(demand),
                })
                .collect(),
        }
    }
}
