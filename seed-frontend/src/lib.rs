use enclose::enclose;
use futures::prelude::*;
use map_view::{AnimationHandle, LoadOutcome, LoadRequest, Tick, ViewMode};
use seed::{prelude::*, *};

mod canvasser;
mod controls;
mod fetch;
mod legend;
mod map;
mod scheduler;

#[wasm_bindgen(start)]
pub fn render() {
    App::start("app", init, update, view);
}

fn init(_url: Url, orders: &mut impl Orders<Msg>) -> Model {
    orders.after_next_render(|_| Msg::FirstRender);

    Model {
        scheduler: scheduler::Scheduler::new(),
        map: map::init(),
        controls: controls::Model::default(),
        popup: None,
    }
}

struct Model {
    scheduler: scheduler::Scheduler,
    map: canvasser::App<map::MapCanvas>,
    controls: controls::Model,
    popup: Option<map::OpenPopup>,
}

enum Msg {
    FirstRender,
    /// When a user changes a control
    ControlsMsg(controls::Msg),
    Fetched(LoadRequest, Result<String, fetch::FetchError>),
    /// The next coordinate of a route line may be due
    Tick(AnimationHandle),
    /// Click position in canvas pixels
    CanvasClicked(f64, f64),
    ClosePopup,
}

fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::FirstRender => {
            load(model.controls.mode, model, orders);
        }

        Msg::ControlsMsg(msg) => {
            if let Some(mode) = controls::update(msg, &mut model.controls) {
                load(mode, model, orders);
            }
        }

        Msg::Fetched(request, Ok(body)) => {
            let now = js_sys::Date::now();
            let outcome = model
                .map
                .model_mut()
                .controller
                .complete_load(&request, &body, now);
            match outcome {
                Ok(LoadOutcome::Stale) => {
                    orders.skip();
                }
                Ok(LoadOutcome::Applied { animations, .. }) => {
                    clear_map(model);
                    let msg_mapper = orders.msg_mapper();
                    for (handle, due) in animations {
                        schedule_msg(
                            &model.scheduler,
                            orders.clone_app(),
                            due.ceil() as u64,
                            msg_mapper(Msg::Tick(handle)),
                        );
                    }
                }
                Err(err) => {
                    clear_map(model);
                    error!(err.to_string());
                }
            }
        }

        Msg::Fetched(request, Err(fail_reason)) => {
            let err = model
                .map
                .model_mut()
                .controller
                .fail_load(&request, fail_reason.to_string());
            match err {
                Some(err) => {
                    clear_map(model);
                    error!(err.to_string());
                }
                None => {
                    orders.skip();
                }
            }
        }

        Msg::Tick(handle) => {
            let tick = model
                .map
                .model_mut()
                .controller
                .tick(handle, js_sys::Date::now());
            let follow_up = TickFollowUp::after(handle, tick);
            if follow_up.redraw {
                model.map.model_mut().mark_dirty();
            }
            if let Some((handle, due)) = follow_up.next {
                let msg_mapper = orders.msg_mapper();
                schedule_msg(
                    &model.scheduler,
                    orders.clone_app(),
                    due.ceil() as u64,
                    msg_mapper(Msg::Tick(handle)),
                );
            }
            if !follow_up.rerender {
                orders.skip();
            }
        }

        Msg::CanvasClicked(x, y) => {
            model.popup = map::popup_at(&model.map.model(), (x, y));
        }

        Msg::ClosePopup => {
            model.popup = None;
        }
    }
}

/// What the app does once a tick has been applied to the controller
#[derive(Debug, PartialEq)]
struct TickFollowUp {
    /// tick this handle again at the due time
    next: Option<(AnimationHandle, f64)>,
    /// the canvas changed
    redraw: bool,
    /// the status line changes when a line finishes
    rerender: bool,
}

impl TickFollowUp {
    fn after(handle: AnimationHandle, tick: Tick) -> TickFollowUp {
        match tick {
            Tick::Continue { handle, due } => TickFollowUp {
                next: Some((handle, due)),
                redraw: true,
                rerender: false,
            },
            Tick::NotYet { due } => TickFollowUp {
                next: Some((handle, due)),
                redraw: false,
                rerender: false,
            },
            Tick::Finished => TickFollowUp {
                next: None,
                redraw: true,
                rerender: true,
            },
            Tick::Cancelled => TickFollowUp {
                next: None,
                redraw: false,
                rerender: false,
            },
        }
    }
}

fn load(mode: ViewMode, model: &mut Model, orders: &mut impl Orders<Msg>) {
    let request = model.map.model_mut().controller.switch_view(mode);
    orders.perform_cmd(
        fetch::fetch_text(request.endpoint()).map(move |result| Msg::Fetched(request, result)),
    );
}

/// Stops every pending animation tick and closes any popup, the map has been replaced or removed
fn clear_map(model: &mut Model) {
    model.scheduler.cancel_all();
    model.popup = None;
    model.map.model_mut().mark_dirty();
}

fn view(model: &Model) -> Node<Msg> {
    let canvas = model.map.model();
    div![
        div![controls::view(&model.controls).map_msg(Msg::ControlsMsg)],
        div![
            style! {
                St::Position => "relative",
                St::Width => px(map::WIDTH),
                St::Height => px(map::HEIGHT),
            },
            canvas![
                model.map.canvas_ref(),
                attrs![
                    At::Width => px(map::WIDTH * canvasser::PIXEL_RATIO),
                    At::Height => px(map::HEIGHT * canvasser::PIXEL_RATIO),
                ],
                style! {
                    St::Width => px(map::WIDTH),
                    St::Height => px(map::HEIGHT),
                },
                mouse_ev(Ev::Click, |event| {
                    Msg::CanvasClicked(f64::from(event.offset_x()), f64::from(event.offset_y()))
                }),
            ],
            canvas.controller.legend().map(legend::view::<Msg>),
            model.popup.as_ref().map(popup_view),
        ],
        div![status(model)],
    ]
}

fn popup_view(open: &map::OpenPopup) -> Node<Msg> {
    div![
        attrs! {
            At::Class => "popup",
        },
        style! {
            St::Position => "absolute",
            St::Left => px(open.x),
            St::Top => px(open.y),
            St::Transform => "translate(-50%, calc(-100% - 8px))",
            St::Background => "white",
            St::Padding => "6px 20px 6px 10px",
            St::BorderRadius => "6px",
            St::BoxShadow => "0 3px 14px rgba(0, 0, 0, 0.4)",
            St::WhiteSpace => "nowrap",
        },
        open.popup.heading.as_ref().map(|heading| b![heading.as_str()]),
        open.popup.heading.as_ref().map(|_| br![]),
        open.popup.text.as_str(),
        a![
            style! {
                St::Position => "absolute",
                St::Top => "2px",
                St::Right => "6px",
                St::Cursor => "pointer",
            },
            "×",
            ev(Ev::Click, |_| Msg::ClosePopup),
        ],
    ]
}

fn status(model: &Model) -> String {
    let canvas = model.map.model();
    if let Some(mode) = canvas.controller.pending() {
        format!("Loading {}", mode)
    } else if canvas.controller.is_animating() {
        match model.map.last_frame_time() {
            Some(frame_time) => format!("Animating routes, {:.0}ms per frame", frame_time),
            None => "Animating routes".to_owned(),
        }
    } else {
        match canvas.controller.overlay() {
            Some(overlay) => format!("Showing {}", overlay.mode()),
            None => "No data shown".to_owned(),
        }
    }
}

fn schedule_msg<Ms, Mdl, INodes: IntoNodes<Ms> + 'static>(
    scheduler: &scheduler::Scheduler,
    app: App<Ms, Mdl, INodes>,
    timestamp: u64,
    msg: Ms,
) {
    let f = enclose!((app => s) move || s.update(msg));
    scheduler.schedule(timestamp, f);
}
