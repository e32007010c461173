use map_view::ViewMode;
use seed::{prelude::*, *};

pub const GROUP_NAME: &str = "map_options";

#[derive(Default, Clone)]
pub struct Model {
    pub mode: ViewMode,
}

pub enum Msg {
    /// The value of the radio input that changed
    ModeChanged(String),
}

/// Returns the newly selected mode, if it changed
pub fn update(msg: Msg, model: &mut Model) -> Option<ViewMode> {
    match msg {
        Msg::ModeChanged(value) => match value.parse() {
            Ok(mode) => {
                model.mode = mode;
                Some(mode)
            }
            Err(err) => {
                error!(err.to_string());
                None
            }
        },
    }
}

pub fn view(model: &Model) -> Vec<Node<Msg>> {
    ViewMode::ALL
        .iter()
        .flat_map(|&mode| radio(mode, model.mode == mode))
        .collect()
}

fn radio(mode: ViewMode, checked: bool) -> Vec<Node<Msg>> {
    let id = format!("{}-{}", GROUP_NAME, mode);
    vec![
        input![
            attrs! {
                At::Type => "radio",
                At::Id => id.as_str(),
                At::Name => GROUP_NAME,
                At::Value => mode.as_str(),
                At::Checked => checked.as_at_value(),
            },
            input_ev(Ev::Change, Msg::ModeChanged)
        ],
        label![
            attrs! {
                At::For => id.as_str()
            },
            match mode {
                ViewMode::Stops => "Stops",
                ViewMode::Routes => "Routes",
            }
        ],
    ]
}
