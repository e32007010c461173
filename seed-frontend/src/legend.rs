use map_view::legend::{Corner, Legend, LegendEntry};
use seed::{prelude::*, *};

pub fn view<Ms: 'static>(legend: &Legend) -> Node<Ms> {
    let (vertical, horizontal) = match legend.position {
        Corner::TopLeft => (St::Top, St::Left),
        Corner::TopRight => (St::Top, St::Right),
        Corner::BottomLeft => (St::Bottom, St::Left),
        Corner::BottomRight => (St::Bottom, St::Right),
    };
    div![
        attrs! {
            At::Class => "info legend",
        },
        style! {
            St::Position => "absolute",
            vertical => "20px",
            horizontal => "10px",
            St::Padding => "6px 8px",
            St::Background => "rgba(255, 255, 255, 0.8)",
            St::BoxShadow => "0 0 15px rgba(0, 0, 0, 0.2)",
            St::BorderRadius => "5px",
        },
        h4![legend.title],
        legend.entries.iter().map(|entry| swatch(legend, entry)),
    ]
}

fn swatch<Ms: 'static>(legend: &Legend, entry: &LegendEntry) -> Node<Ms> {
    let size = entry.swatch_size() + 2. * legend.style.weight;
    div![
        style! {
            St::Display => "flex",
            St::AlignItems => "center",
        },
        svg![
            attrs! {
                At::Width => size,
                At::Height => size,
            },
            circle![attrs! {
                At::from("cx") => size / 2.,
                At::from("cy") => size / 2.,
                At::from("r") => entry.radius,
                At::from("fill") => legend.style.fill_color,
                At::from("fill-opacity") => legend.style.fill_opacity,
                At::from("stroke") => legend.style.color,
                At::from("stroke-width") => legend.style.weight,
            }],
        ],
        span![
            style! {
                St::MarginLeft => "6px",
            },
            entry.demand.to_string(),
        ],
    ]
}
