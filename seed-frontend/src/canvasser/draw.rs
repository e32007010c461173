use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

/// Maps the coordinates a shape is described in onto canvas pixels
pub trait Geometry {
    type Coords;
    fn project(&self, coords: &Self::Coords) -> (f64, f64);
}

pub struct Cartesian;

impl Geometry for Cartesian {
    type Coords = (f64, f64);

    fn project(&self, coords: &(f64, f64)) -> (f64, f64) {
        *coords
    }
}

pub trait Drawable<G = Cartesian> {
    fn draw(&self, ctx: &CanvasRenderingContext2d, geometry: &G);
}

impl<T, G> Drawable<G> for Vec<T>
where
    T: Drawable<G>,
{
    fn draw(&self, ctx: &CanvasRenderingContext2d, geometry: &G) {
        for i in self {
            i.draw(ctx, geometry);
        }
    }
}

impl<T: ?Sized, G> Drawable<G> for Box<T>
where
    T: Drawable<G>,
{
    fn draw(&self, ctx: &CanvasRenderingContext2d, geometry: &G) {
        self.as_ref().draw(ctx, geometry);
    }
}

/// An open polyline
pub struct Path<G: Geometry> {
    line_width: f64,
    stroke_style: Option<String>,
    alpha: f64,
    ops: Vec<PathOp<G>>,
}

enum PathOp<G: Geometry> {
    MoveTo(G::Coords),
    LineTo(G::Coords),
}

impl<G: Geometry> Path<G> {
    pub fn begin_path() -> Path<G> {
        Path {
            line_width: 1.,
            stroke_style: None,
            alpha: 1.,
            ops: vec![],
        }
    }

    /// A path through every point in order
    pub fn through(points: impl IntoIterator<Item = G::Coords>) -> Path<G> {
        let mut path = Path::begin_path();
        for (i, point) in points.into_iter().enumerate() {
            if i == 0 {
                path.move_to(point);
            } else {
                path.line_to(point);
            }
        }
        path
    }

    pub fn set_line_width(&mut self, line_width: f64) {
        self.line_width = line_width;
    }

    pub fn set_stroke_style(&mut self, stroke_style: &str) {
        self.stroke_style = Some(stroke_style.to_owned());
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    pub fn move_to(&mut self, coords: G::Coords) {
        self.ops.push(PathOp::MoveTo(coords));
    }

    pub fn line_to(&mut self, coords: G::Coords) {
        self.ops.push(PathOp::LineTo(coords));
    }
}

impl<G: Geometry> Drawable<G> for Path<G> {
    fn draw(&self, ctx: &CanvasRenderingContext2d, geometry: &G) {
        let stroke_style = match &self.stroke_style {
            Some(stroke_style) => stroke_style,
            None => return,
        };
        ctx.begin_path();
        ctx.set_line_width(self.line_width);
        ctx.set_line_join("round");
        ctx.set_line_cap("round");
        ctx.set_global_alpha(self.alpha);
        ctx.set_stroke_style(&JsValue::from_str(stroke_style));

        for op in &self.ops {
            match op {
                PathOp::MoveTo(coords) => {
                    let (x, y) = geometry.project(coords);
                    ctx.move_to(x, y)
                }
                PathOp::LineTo(coords) => {
                    let (x, y) = geometry.project(coords);
                    ctx.line_to(x, y)
                }
            }
        }
        ctx.stroke();
        ctx.set_global_alpha(1.);
    }
}

pub struct Circle<G: Geometry> {
    r: f64,
    coords: G::Coords,
    fill: Option<(String, f64)>,
    stroke: Option<(String, f64, f64)>,
}

impl<G: Geometry> Circle<G> {
    pub fn new(coords: G::Coords, r: f64) -> Circle<G> {
        Circle {
            coords,
            r,
            fill: None,
            stroke: None,
        }
    }

    pub fn fill(mut self, style: &str, alpha: f64) -> Self {
        self.fill = Some((style.to_owned(), alpha));
        self
    }

    pub fn stroke(mut self, style: &str, width: f64, alpha: f64) -> Self {
        self.stroke = Some((style.to_owned(), width, alpha));
        self
    }
}

impl<G: Geometry> Drawable<G> for Circle<G> {
    fn draw(&self, ctx: &CanvasRenderingContext2d, geometry: &G) {
        let (cx, cy) = geometry.project(&self.coords);
        ctx.begin_path();
        if ctx
            .arc(cx, cy, self.r, 0., 2. * std::f64::consts::PI)
            .is_err()
        {
            return;
        }
        if let Some((style, alpha)) = &self.fill {
            ctx.set_global_alpha(*alpha);
            ctx.set_fill_style(&JsValue::from_str(style));
            ctx.fill();
        }
        if let Some((style, width, alpha)) = &self.stroke {
            ctx.set_global_alpha(*alpha);
            ctx.set_line_width(*width);
            ctx.set_stroke_style(&JsValue::from_str(style));
            ctx.stroke();
        }
        ctx.set_global_alpha(1.);
    }
}

/// A map pin whose tip sits on the point
pub struct Pin<G: Geometry> {
    coords: G::Coords,
    color: String,
}

impl<G: Geometry> Pin<G> {
    pub const HEIGHT: f64 = 24.;
    pub const HEAD_RADIUS: f64 = 7.;

    pub fn new(coords: G::Coords, color: &str) -> Pin<G> {
        Pin {
            coords,
            color: color.to_owned(),
        }
    }
}

impl<G: Geometry> Drawable<G> for Pin<G> {
    fn draw(&self, ctx: &CanvasRenderingContext2d, geometry: &G) {
        let (x, y) = geometry.project(&self.coords);
        let r = Self::HEAD_RADIUS;
        let head_y = y - Self::HEIGHT + r;
        ctx.begin_path();
        ctx.move_to(x, y);
        if ctx
            .arc(
                x,
                head_y,
                r,
                0.75 * std::f64::consts::PI,
                0.25 * std::f64::consts::PI,
            )
            .is_err()
        {
            return;
        }
        ctx.close_path();
        ctx.set_fill_style(&JsValue::from_str(&self.color));
        ctx.fill();
        ctx.set_line_width(1.5);
        ctx.set_stroke_style(&JsValue::from_str("white"));
        ctx.stroke();

        Circle::<Cartesian>::new((x, head_y), r / 2.5)
            .fill("white", 1.)
            .draw(ctx, &Cartesian);
    }
}
