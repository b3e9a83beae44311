//! Fixed colour lookups for rendering.
//!
//! Both are pure functions of their tag so that rendered output is
//! reproducible in tests.

/// Colour used for edges and ports whose data type is not in the table.
pub const DEFAULT_EDGE_COLOR: &str = "#CCCCCC";

/// Header colour used for node types that are not in the table.
pub const DEFAULT_NODE_COLOR: &str = "#2D3748";

/// Defines a `fn(&str) -> &'static str` lookup from a tag/colour table.
macro_rules! define_palette {
    ( $(#[$doc:meta])* $name:ident, $default:expr, { $( $tag:literal => $color:literal ),* $(,)? } ) => {
        $(#[$doc])*
        pub fn $name(tag: &str) -> &'static str {
            match tag {
                $( $tag => $color, )*
                _ => $default,
            }
        }
    };
}

define_palette! {
    /// Colour for a link or port carrying the given data type.
    edge_color, DEFAULT_EDGE_COLOR, {
        "MODEL" => "#FF5607",
        "CONDITIONING" => "#8338EC",
        "LATENT" => "#FB8500",
        "IMAGE" => "#3A86FF",
        "VAE" => "#FFBE0B",
        "CLIP" => "#06D6A0",
        "FLOAT" => "#0AEFFF",
        "AUDIO" => "#7209B7",
        "CLIP_VISION" => "#4CC9F0",
        "CONTROL_NET" => "#F72585",
        "MASK" => "#B5179E",
        "DTYPE" => "#560BAD",
        "SONIC_PREDATA" => "#F15BB5",
        "MODEL_SONIC" => "#9B5DE5",
        "VHS_FILENAMES" => "#00BBF9",
        "VHS_BatchManager" => "#00F5D4",
    }
}

define_palette! {
    /// Header colour for a node of the given type.
    node_color, DEFAULT_NODE_COLOR, {
        "KSampler" => "#423C5E",
        "CLIPTextEncode" => "#2F4858",
        "VAEDecode" => "#1F6582",
        "CheckpointLoaderSimple" => "#264653",
        "EmptyLatentImage" => "#287271",
        "SaveImage" => "#2A9D8F",
        "LoadImage" => "#66999B",
        "SONICTLoader" => "#542344",
        "SONICSampler" => "#8338EC",
        "LoadAudio" => "#A42CD6",
        "ImageOnlyCheckpointLoader" => "#3A86FF",
        "SONIC_PreData" => "#FB5607",
        "VHS_VideoCombine" => "#FF006E",
    }
}
