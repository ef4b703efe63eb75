//! The native window, built on `eframe`/`egui`.
//!
//! Each egui frame is turned into an [`InputSnapshot`], run through [`Atlas::frame`] and painted
//! through an [`EguiCanvas`].
use crate::atlas::Atlas;
use crate::canvas::{Canvas, ScreenShape, ScreenTransform, TransformStack};
use crate::colour::Colour;
use crate::controls::InputSnapshot;
use anyhow::{Result, anyhow};
use egui::{
    Align2, Color32, Event, FontId, Key, Mesh, Painter, PointerButton, Pos2, Rect, Shape, Stroke,
};
use log::error;
use std::time::{Duration, Instant};

fn colour32(colour: Colour) -> Color32 {
    Color32::from_rgb(colour.r, colour.g, colour.b)
}

/// The input name for a keyboard key, if it is one the map responds to
fn key_name(key: Key) -> Option<&'static str> {
    match key {
        Key::ArrowLeft => Some("left"),
        Key::ArrowRight => Some("right"),
        Key::C => Some("c"),
        Key::P => Some("p"),
        _ => None,
    }
}

/// The input name for a mouse button: clicking steps the year like the arrow keys
fn button_name(button: PointerButton) -> Option<&'static str> {
    match button {
        PointerButton::Primary => Some("left"),
        PointerButton::Secondary => Some("right"),
        _ => None,
    }
}

/// Build a frame's input snapshot from egui's input state.
///
/// `origin` is the top-left corner of the canvas in window coordinates.
fn snapshot<'a>(
    events: &[Event],
    keys_down: impl IntoIterator<Item = &'a Key>,
    pointer: Option<Pos2>,
    origin: Pos2,
) -> InputSnapshot {
    let presses = events
        .iter()
        .filter_map(|event| match event {
            Event::Key {
                key,
                pressed: true,
                repeat: false,
                ..
            } => key_name(*key),
            Event::PointerButton {
                button,
                pressed: true,
                ..
            } => button_name(*button),
            _ => None,
        })
        .map(String::from)
        .collect();
    let held = keys_down
        .into_iter()
        .filter_map(|key| key_name(*key))
        .map(String::from)
        .collect();

    InputSnapshot {
        pointer: pointer.map(|p| [f64::from(p.x - origin.x), f64::from(p.y - origin.y)]),
        held,
        presses,
    }
}

/// A [`Canvas`] which paints with an egui [`Painter`]
pub struct EguiCanvas {
    painter: Painter,
    origin: Pos2,
    fill: Colour,
    stroke: Colour,
    weight: f64,
    transforms: TransformStack,
}

impl EguiCanvas {
    /// Paint onto `painter`, with the canvas's top-left corner at `origin`
    pub fn new(painter: Painter, origin: Pos2) -> Self {
        Self {
            painter,
            origin,
            fill: Colour::WHITE,
            stroke: Colour::BLACK,
            weight: 1.0,
            transforms: TransformStack::default(),
        }
    }

    fn pos(&self, point: [f64; 2]) -> Pos2 {
        to_pos(&self.transforms.current(), self.origin, point)
    }

    fn stroke(&self) -> Option<Stroke> {
        (self.weight > 0.0).then(|| Stroke::new(self.weight as f32, colour32(self.stroke)))
    }
}

/// Canvas point to window position
fn to_pos(transform: &ScreenTransform, origin: Pos2, point: [f64; 2]) -> Pos2 {
    let [x, y] = transform.apply(point);
    Pos2::new(origin.x + x as f32, origin.y + y as f32)
}

impl Canvas for EguiCanvas {
    fn clear(&mut self, colour: Colour) {
        self.painter
            .rect_filled(self.painter.clip_rect(), 0.0, colour32(colour));
    }

    fn set_fill(&mut self, colour: Colour) {
        self.fill = colour;
    }

    fn set_stroke(&mut self, colour: Colour) {
        self.stroke = colour;
    }

    fn set_stroke_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    fn draw_shape(&mut self, shape: &ScreenShape) {
        let fill = colour32(self.fill);
        let mut mesh = Mesh::default();
        for vertex in &shape.vertices {
            mesh.colored_vertex(self.pos(*vertex), fill);
        }
        for [a, b, c] in &shape.triangles {
            mesh.add_triangle(*a as u32, *b as u32, *c as u32);
        }
        self.painter.add(Shape::mesh(mesh));

        if let Some(stroke) = self.stroke() {
            for ring in &shape.rings {
                let points = ring.iter().map(|p| self.pos(*p)).collect();
                self.painter.add(Shape::closed_line(points, stroke));
            }
        }
    }

    fn draw_rect(&mut self, corner: [f64; 2], opposite: [f64; 2]) {
        let rect = Rect::from_two_pos(self.pos(corner), self.pos(opposite));
        self.painter.rect_filled(rect, 0.0, colour32(self.fill));
        if let Some(stroke) = self.stroke() {
            self.painter
                .rect_stroke(rect, 0.0, stroke, egui::StrokeKind::Middle);
        }
    }

    fn draw_line(&mut self, from: [f64; 2], to: [f64; 2]) {
        if let Some(stroke) = self.stroke() {
            self.painter
                .line_segment([self.pos(from), self.pos(to)], stroke);
        }
    }

    fn draw_text(&mut self, position: [f64; 2], size: f64, text: &str) {
        let size = size * self.transforms.current().scale;
        self.painter.text(
            self.pos(position),
            Align2::LEFT_BOTTOM,
            text,
            FontId::proportional(size as f32),
            colour32(self.fill),
        );
    }

    fn push_transform(&mut self, transform: ScreenTransform) {
        self.transforms.push(transform);
    }

    fn pop_transform(&mut self) {
        self.transforms.pop();
    }
}

/// The eframe application wrapping an [`Atlas`]
pub struct AtlasApp {
    atlas: Atlas,
    frame_interval: Duration,
    last_frame: Option<Instant>,
}

impl AtlasApp {
    /// Show `atlas`, redrawing `fps` times a second
    pub fn new(atlas: Atlas, fps: u32) -> Self {
        Self {
            atlas,
            frame_interval: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
            last_frame: None,
        }
    }
}

impl eframe::App for AtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let dt = self.last_frame.map_or(Duration::ZERO, |last| now - last);
        self.last_frame = Some(now);

        egui::CentralPanel::default()
            .frame(egui::Frame::default())
            .show(ctx, |ui| {
                let origin = ui.max_rect().min;
                let input =
                    ctx.input(|i| snapshot(&i.events, &i.keys_down, i.pointer.latest_pos(), origin));

                let mut canvas = EguiCanvas::new(ui.painter().clone(), origin);
                if let Err(err) = self.atlas.frame(&input, dt, &mut canvas) {
                    error!("Failed to draw frame: {err:?}");
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

        ctx.request_repaint_after(self.frame_interval);
    }
}

/// Open a window showing `atlas` and run until it is closed
pub fn run_window(atlas: Atlas, fps: u32) -> Result<()> {
    let config = atlas.config();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.width as f32, config.height as f32])
            .with_resizable(false)
            .with_title("Renewable Atlas"),
        ..Default::default()
    };

    eframe::run_native(
        "Renewable Atlas",
        options,
        Box::new(move |_cc| Ok(Box::new(AtlasApp::new(atlas, fps)))),
    )
    .map_err(|e| anyhow!("GUI error: {e}"))
}
