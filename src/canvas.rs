//! The drawing surface used by the frame renderer.
//!
//! The renderer only ever talks to the [`Canvas`] trait. The window backend implements it on top
//! of egui and [`RecordingCanvas`] implements it headlessly, which is what the tests draw into.
use crate::colour::Colour;
use geo::{LineString, Polygon, TriangulateEarcut};
use serde::Deserialize;

/// A screen-space transform: uniform scale about the origin followed by a translation
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScreenTransform {
    /// Offset applied after scaling, in pixels
    pub translate: [f64; 2],
    /// Uniform scale factor
    pub scale: f64,
}

impl Default for ScreenTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ScreenTransform {
    /// The transform which leaves points unchanged
    pub const IDENTITY: ScreenTransform = ScreenTransform {
        translate: [0.0, 0.0],
        scale: 1.0,
    };

    /// A pure translation
    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            translate: [x, y],
            scale: 1.0,
        }
    }

    /// Map a point through the transform
    pub fn apply(&self, [x, y]: [f64; 2]) -> [f64; 2] {
        [
            self.translate[0] + self.scale * x,
            self.translate[1] + self.scale * y,
        ]
    }

    /// The transform equivalent to applying `inner` first and then `self`
    pub fn compose(&self, inner: &ScreenTransform) -> Self {
        Self {
            translate: self.apply(inner.translate),
            scale: self.scale * inner.scale,
        }
    }
}

/// A nested stack of transforms, as maintained by push/pop calls on a canvas
#[derive(Debug, Clone, Default)]
pub struct TransformStack {
    current: ScreenTransform,
    saved: Vec<ScreenTransform>,
}

impl TransformStack {
    /// The transform applied to anything drawn now
    pub fn current(&self) -> ScreenTransform {
        self.current
    }

    /// Save the current transform and compose `transform` onto it
    pub fn push(&mut self, transform: ScreenTransform) {
        self.saved.push(self.current);
        self.current = self.current.compose(&transform);
    }

    /// Restore the transform saved by the matching [`push`](Self::push)
    pub fn pop(&mut self) {
        if let Some(previous) = self.saved.pop() {
            self.current = previous;
        } else {
            log::warn!("Transform stack popped more times than it was pushed");
        }
    }

    /// Number of transforms currently pushed
    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

/// One polygon part of a region, projected to pixels and triangulated for filling
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenShape {
    /// Closed rings in pixel space (the exterior first, then any holes)
    pub rings: Vec<Vec<[f64; 2]>>,
    /// Vertices referenced by `triangles`
    pub vertices: Vec<[f64; 2]>,
    /// Fill triangles as indices into `vertices`
    pub triangles: Vec<[usize; 3]>,
}

fn ring_points(ring: &LineString<f64>) -> Vec<[f64; 2]> {
    ring.coords().map(|c| [c.x, c.y]).collect()
}

impl ScreenShape {
    /// Triangulate a polygon which is already in pixel coordinates
    pub fn from_polygon(polygon: &Polygon<f64>) -> Self {
        let rings = std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .map(ring_points)
            .collect();

        let raw = polygon.earcut_triangles_raw();
        let vertices = raw
            .vertices
            .chunks_exact(2)
            .map(|xy| [xy[0], xy[1]])
            .collect();
        let triangles = raw
            .triangle_indices
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
            .collect();

        Self {
            rings,
            vertices,
            triangles,
        }
    }

    /// The exterior ring
    pub fn exterior(&self) -> &[[f64; 2]] {
        self.rings.first().map_or(&[], Vec::as_slice)
    }
}

/// A 2D drawing surface of fixed pixel size in the style of a sketchbook API.
///
/// Fill and stroke state persists between calls until changed. A stroke weight of zero disables
/// outlines. Texts are drawn in the fill colour with their baseline at the given position.
pub trait Canvas {
    /// Fill the whole surface with `colour`
    fn clear(&mut self, colour: Colour);
    /// Set the fill colour used by shapes, rectangles and text
    fn set_fill(&mut self, colour: Colour);
    /// Set the outline colour used by shapes, rectangles and lines
    fn set_stroke(&mut self, colour: Colour);
    /// Set the outline width in pixels
    fn set_stroke_weight(&mut self, weight: f64);
    /// Draw a filled (and outlined) polygon
    fn draw_shape(&mut self, shape: &ScreenShape);
    /// Draw a filled rectangle spanned by two opposite corners
    fn draw_rect(&mut self, corner: [f64; 2], opposite: [f64; 2]);
    /// Draw a line in the stroke colour
    fn draw_line(&mut self, from: [f64; 2], to: [f64; 2]);
    /// Draw `text` at `position` with the given font size
    fn draw_text(&mut self, position: [f64; 2], size: f64, text: &str);
    /// Compose `transform` onto the current transform until the matching pop
    fn push_transform(&mut self, transform: ScreenTransform);
    /// Undo the most recent push
    fn pop_transform(&mut self);
}

/// Something drawn onto a [`RecordingCanvas`], with positions already transformed
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// The surface was cleared
    Clear(Colour),
    /// A polygon was filled
    Shape {
        /// Fill colour
        fill: Colour,
        /// Transform in effect when drawn
        transform: ScreenTransform,
        /// First exterior vertex after transformation
        anchor: [f64; 2],
    },
    /// A rectangle was filled
    Rect {
        /// Fill colour
        fill: Colour,
        /// Transformed first corner
        corner: [f64; 2],
        /// Transformed opposite corner
        opposite: [f64; 2],
    },
    /// A line was drawn
    Line {
        /// Stroke colour
        stroke: Colour,
        /// Stroke weight
        weight: f64,
        /// Transformed start point
        from: [f64; 2],
        /// Transformed end point
        to: [f64; 2],
    },
    /// Some text was drawn
    Text {
        /// Fill colour
        fill: Colour,
        /// Transformed position
        position: [f64; 2],
        /// Font size
        size: f64,
        /// The text itself
        text: String,
    },
}

/// A canvas that records every draw call, for headless use
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    fill: Colour,
    stroke: Colour,
    weight: f64,
    transforms: TransformStack,
    commands: Vec<DrawCommand>,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self {
            fill: Colour::WHITE,
            stroke: Colour::BLACK,
            weight: 1.0,
            transforms: TransformStack::default(),
            commands: Vec::new(),
        }
    }
}

impl RecordingCanvas {
    /// Create an empty recording
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything drawn so far
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Forget everything drawn so far
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// Fill colours of the polygons drawn, in drawing order
    pub fn shape_fills(&self) -> Vec<Colour> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Shape { fill, .. } => Some(*fill),
                _ => None,
            })
            .collect()
    }

    /// Fill colours of the rectangles drawn, in drawing order
    pub fn rect_fills(&self) -> Vec<Colour> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rect { fill, .. } => Some(*fill),
                _ => None,
            })
            .collect()
    }

    /// All text drawn, in drawing order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of transforms still pushed
    pub fn transform_depth(&self) -> usize {
        self.transforms.depth()
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self, colour: Colour) {
        self.commands.push(DrawCommand::Clear(colour));
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
        let transform = self.transforms.current();
        let anchor = shape
            .exterior()
            .first()
            .map_or(transform.translate, |p| transform.apply(*p));
        self.commands.push(DrawCommand::Shape {
            fill: self.fill,
            transform,
            anchor,
        });
    }

    fn draw_rect(&mut self, corner: [f64; 2], opposite: [f64; 2]) {
        let transform = self.transforms.current();
        self.commands.push(DrawCommand::Rect {
            fill: self.fill,
            corner: transform.apply(corner),
            opposite: transform.apply(opposite),
        });
    }

    fn draw_line(&mut self, from: [f64; 2], to: [f64; 2]) {
        let transform = self.transforms.current();
        self.commands.push(DrawCommand::Line {
            stroke: self.stroke,
            weight: self.weight,
            from: transform.apply(from),
            to: transform.apply(to),
        });
    }

    fn draw_text(&mut self, position: [f64; 2], size: f64, text: &str) {
        let transform = self.transforms.current();
        self.commands.push(DrawCommand::Text {
            fill: self.fill,
            position: transform.apply(position),
            size: size * transform.scale,
            text: text.to_string(),
        });
    }

    fn push_transform(&mut self, transform: ScreenTransform) {
        self.transforms.push(transform);
    }

    fn pop_transform(&mut self) {
        self.transforms.pop();
    }
}
