use tracing::debug;

use crate::blur::BlurStrategy;
use crate::layout::{Canvas, LayoutPlan};
use crate::video::types::SourceClip;

/// What a layer is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerRole {
    /// Full-canvas blurred fill
    Background,
    /// The proportionally scaled source, never cropped
    Foreground,
}

/// How the source is resized for a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resize {
    /// Stretch to exactly the layer size, ignoring aspect ratio
    Exact,
    /// Scale to the layer width; height follows the source aspect ratio
    FitWidth,
}

/// One positioned layer of the composite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    pub role: LayerRole,
    pub width: u32,
    pub height: u32,
    pub resize: Resize,
    pub blur: Option<BlurStrategy>,

    /// Top-left corner on the canvas
    pub position: (u32, u32),
}

impl Layer {
    pub fn with_position(mut self, x: u32, y: u32) -> Self {
        self.position = (x, y);
        self
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// An ordered stack of layers to be flattened onto a canvas
///
/// Layers are drawn first to last. The canvas size is the size of the output.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeRequest {
    canvas: Canvas,
    layers: Vec<Layer>,
}

impl CompositeRequest {
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn background(&self) -> Option<&Layer> {
        self.layers.iter().find(|l| l.role == LayerRole::Background)
    }

    pub fn foreground(&self) -> Option<&Layer> {
        self.layers.iter().find(|l| l.role == LayerRole::Foreground)
    }

    /// Blur the collaborator has to perform somewhere in this request
    pub fn blur(&self) -> Option<BlurStrategy> {
        self.layers.iter().find_map(|l| l.blur)
    }
}

/// Stretch the source over the whole canvas and blur it
///
/// The layer is always exactly canvas-sized, whatever the source aspect ratio.
pub fn build_background_layer(source: &SourceClip, canvas: Canvas, blur: BlurStrategy) -> Layer {
    debug!(
        "Background: {:?} {}x{} stretched to {}x{}, {}",
        source.path, source.width, source.height, canvas.width, canvas.height, blur
    );
    Layer {
        role: LayerRole::Background,
        width: canvas.width,
        height: canvas.height,
        resize: Resize::Exact,
        blur: Some(blur),
        position: (0, 0),
    }
}

/// Scale the source to the planned width, keeping its aspect ratio
pub fn build_foreground_layer(source: &SourceClip, plan: &LayoutPlan) -> Layer {
    let (x, y) = plan.foreground_position();
    debug!(
        "Foreground: {:?} {}x{} scaled to {}x{} at ({}, {})",
        source.path, source.width, source.height, plan.scaled_width, plan.scaled_height, x, y
    );
    Layer {
        role: LayerRole::Foreground,
        width: plan.scaled_width,
        height: plan.scaled_height,
        resize: Resize::FitWidth,
        blur: None,
        position: (x, y),
    }
}

/// Stack the foreground at `(0, plan.top_pad)` over the background
pub fn compose(background: Layer, foreground: Layer, plan: &LayoutPlan, canvas: Canvas) -> CompositeRequest {
    let (x, y) = plan.foreground_position();
    CompositeRequest {
        canvas,
        layers: vec![background.with_position(0, 0), foreground.with_position(x, y)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_layout;
    use std::path::PathBuf;

    fn clip(width: u32, height: u32) -> SourceClip {
        SourceClip {
            path: PathBuf::from("clip.mp4"),
            width,
            height,
            duration: Some(5.0),
            fps: 30.0,
            has_audio: false,
        }
    }

    #[test]
    fn test_background_always_fills_canvas() {
        let canvas = Canvas::VERTICAL_HD;
        let blur = BlurStrategy::Gaussian { sigma: 50.0 };

        for (w, h) in [(1920, 1080), (1080, 1920), (640, 480), (300, 3000), (1, 1)] {
            let layer = build_background_layer(&clip(w, h), canvas, blur);
            assert_eq!(layer.size(), (1080, 1920));
            assert_eq!(layer.resize, Resize::Exact);
            assert_eq!(layer.blur, Some(blur));
        }
    }

    #[test]
    fn test_compose_orders_and_positions_layers() {
        let canvas = Canvas::VERTICAL_HD;
        let source = clip(1920, 1080);
        let plan = compute_layout(1920, 1080, canvas.width, canvas.height).unwrap();

        let background = build_background_layer(&source, canvas, BlurStrategy::Gaussian { sigma: 50.0 });
        let foreground = build_foreground_layer(&source, &plan);
        let request = compose(background, foreground, &plan, canvas);

        assert_eq!(request.canvas(), canvas);
        assert_eq!(request.layers().len(), 2);
        assert_eq!(request.layers()[0].role, LayerRole::Background);
        assert_eq!(request.layers()[1].role, LayerRole::Foreground);

        let fg = request.foreground().unwrap();
        assert_eq!(fg.position, (0, plan.top_pad));
        assert_eq!(fg.size(), (1080, 607));
        assert_eq!(fg.blur, None);
        assert_eq!(request.blur(), Some(BlurStrategy::Gaussian { sigma: 50.0 }));
    }

    #[test]
    fn test_tall_foreground_sits_at_top() {
        let canvas = Canvas::VERTICAL_HD;
        let source = clip(500, 2000);
        let plan = compute_layout(500, 2000, canvas.width, canvas.height).unwrap();

        let request = compose(
            build_background_layer(&source, canvas, BlurStrategy::FrameConvolution { sigma: 50.0 }),
            build_foreground_layer(&source, &plan),
            &plan,
            canvas,
        );

        assert_eq!(request.foreground().unwrap().position, (0, 0));
        assert_eq!(request.background().unwrap().size(), (1080, 1920));
    }
}
