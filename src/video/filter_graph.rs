//! Translation of a [`CompositeRequest`] into an FFmpeg `-filter_complex` graph.

use crate::composition::{CompositeRequest, Layer, LayerRole};

/// Label of the composited video stream
pub const OUTPUT_LABEL: &str = "vout";

/// Which ffmpeg inputs feed the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphInputs {
    /// Input index of the original source video
    pub source: usize,

    /// Input index of an already sized and blurred background, if one is streamed in
    pub prerendered_background: Option<usize>,
}

impl GraphInputs {
    /// The source is the only input; every layer is derived from it in-graph
    pub fn source_only() -> Self {
        Self { source: 0, prerendered_background: None }
    }
}

fn layer_filters(layer: &Layer) -> Vec<String> {
    // Both resize modes carry their final size; FitWidth height was planned already
    let mut filters = vec![format!("scale={}:{}", layer.width, layer.height), "setsar=1".to_string()];
    if let Some(blur) = layer.blur.and_then(|b| b.filter()) {
        filters.push(blur);
    }
    filters
}

/// Build the filter graph for `request`
///
/// Layers are overlaid in order at their positions. The first layer is the base
/// and must already be canvas-sized; anything drawn past its edges is clipped.
pub fn compile(request: &CompositeRequest, inputs: GraphInputs) -> String {
    let mut chains = Vec::new();

    let prerendered = |layer: &Layer| {
        layer.role == LayerRole::Background && inputs.prerendered_background.is_some()
    };

    let from_source: Vec<usize> = request
        .layers()
        .iter()
        .enumerate()
        .filter(|(_, layer)| !prerendered(layer))
        .map(|(i, _)| i)
        .collect();

    // Fan the source out once per layer that is derived from it
    let source_label = |i: usize| {
        if from_source.len() > 1 {
            format!("s{}", i)
        } else {
            format!("{}:v", inputs.source)
        }
    };
    if from_source.len() > 1 {
        let outs: String = from_source.iter().map(|i| format!("[s{}]", i)).collect();
        chains.push(format!("[{}:v]split={}{}", inputs.source, from_source.len(), outs));
    }

    for (i, layer) in request.layers().iter().enumerate() {
        match inputs.prerendered_background {
            Some(index) if prerendered(layer) => {
                chains.push(format!("[{}:v]setsar=1[l{}]", index, i));
            }
            _ => {
                chains.push(format!("[{}]{}[l{}]", source_label(i), layer_filters(layer).join(","), i));
            }
        }
    }

    let mut base = "l0".to_string();
    for (i, layer) in request.layers().iter().enumerate().skip(1) {
        let (x, y) = layer.position;
        let next = format!("o{}", i);
        chains.push(format!("[{}][l{}]overlay={}:{}[{}]", base, i, x, y, next));
        base = next;
    }
    chains.push(format!("[{}]format=yuv420p[{}]", base, OUTPUT_LABEL));

    chains.join(";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blur::BlurStrategy;
    use crate::composition::{build_background_layer, build_foreground_layer, compose};
    use crate::layout::{compute_layout, Canvas};
    use crate::video::types::SourceClip;
    use std::path::PathBuf;

    fn request(blur: BlurStrategy) -> CompositeRequest {
        let canvas = Canvas::VERTICAL_HD;
        let source = SourceClip {
            path: PathBuf::from("clip.mp4"),
            width: 1920,
            height: 1080,
            duration: None,
            fps: 30.0,
            has_audio: true,
        };
        let plan = compute_layout(1920, 1080, canvas.width, canvas.height).unwrap();
        compose(
            build_background_layer(&source, canvas, blur),
            build_foreground_layer(&source, &plan),
            &plan,
            canvas,
        )
    }

    #[test]
    fn test_gaussian_graph_blurs_in_graph() {
        let graph = compile(&request(BlurStrategy::Gaussian { sigma: 50.0 }), GraphInputs::source_only());

        assert_eq!(
            graph,
            "[0:v]split=2[s0][s1];\
             [s0]scale=1080:1920,setsar=1,gblur=sigma=50[l0];\
             [s1]scale=1080:607,setsar=1[l1];\
             [l0][l1]overlay=0:656[o1];\
             [o1]format=yuv420p[vout]"
        );
    }

    #[test]
    fn test_prerendered_background_skips_blur() {
        let inputs = GraphInputs { source: 1, prerendered_background: Some(0) };
        let graph = compile(&request(BlurStrategy::FrameConvolution { sigma: 50.0 }), inputs);

        assert!(!graph.contains("gblur"));
        assert!(!graph.contains("split"));
        assert!(graph.contains("[0:v]setsar=1[l0]"));
        assert!(graph.contains("[1:v]scale=1080:607,setsar=1[l1]"));
        assert!(graph.contains("overlay=0:656"));
        assert!(graph.ends_with("[vout]"));
    }
}
