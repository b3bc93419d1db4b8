//! Texture sampling strategies.
//!
//! Video frames reach shaders in different shapes depending on the media
//! stack of the platform: a plain 2D texture, an OES external image, a pair
//! of Y and UV planes, or a pair of rectangle textures. A
//! [`SamplingStrategy`] is picked once per context and answers two
//! questions: which extra fields a 2D texture declares, and which GLSL
//! expression a `ngl_texvideo()` call turns into.

use crate::types::ValueType;

/// Runtime value of the `<texture>_sampling_mode` uniform.
///
/// The renderer writes the mode matching the layout of the frame currently
/// bound, and the general video sampling expression branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum SamplingMode {
    /// Plain 2D texture.
    Default = 1,
    /// OES external image.
    ExternalOes = 2,
    /// Y and UV planes in two 2D textures.
    Biplanar = 3,
    /// Y and UV planes in two rectangle textures.
    Rectangle = 4,
}

impl SamplingMode {
    /// Integer written into the sampling mode uniform.
    pub fn value(self) -> i32 {
        self as i32
    }
}

/// One of the uniforms a logical texture expands into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureField {
    SamplingMode,
    DefaultSampler,
    CoordinateMatrix,
    ColorMatrix,
    Dimensions,
    Timestamp,
    ExternalSampler,
    YSampler,
    UvSampler,
    YRectSampler,
    UvRectSampler,
}

impl TextureField {
    /// Number of field kinds.
    pub const COUNT: usize = 11;

    /// Every field kind, in index order.
    pub const ALL: [TextureField; Self::COUNT] = [
        Self::SamplingMode,
        Self::DefaultSampler,
        Self::CoordinateMatrix,
        Self::ColorMatrix,
        Self::Dimensions,
        Self::Timestamp,
        Self::ExternalSampler,
        Self::YSampler,
        Self::UvSampler,
        Self::YRectSampler,
        Self::UvRectSampler,
    ];

    /// Suffix appended to the texture name, `<texture>_<suffix>`.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::SamplingMode => "sampling_mode",
            Self::DefaultSampler => "sampler",
            Self::CoordinateMatrix => "coord_matrix",
            Self::ColorMatrix => "color_matrix",
            Self::Dimensions => "dimensions",
            Self::Timestamp => "ts",
            Self::ExternalSampler => "external_sampler",
            Self::YSampler => "y_sampler",
            Self::UvSampler => "uv_sampler",
            Self::YRectSampler => "y_rect_sampler",
            Self::UvRectSampler => "uv_rect_sampler",
        }
    }

    /// Position in a texture's field array.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// How video frames are sampled on the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplingStrategy {
    /// Frames are always uploaded to a plain 2D texture.
    #[default]
    Direct,
    /// Frames may arrive as OES external images.
    ExternalOes,
    /// Frames may arrive as separate Y and UV 2D planes.
    Biplanar,
    /// Frames may arrive as separate Y and UV rectangle planes.
    Rectangle,
}

impl SamplingStrategy {
    /// Runtime mode selecting the platform path, `None` for [`Self::Direct`].
    pub fn sampling_mode(&self) -> Option<SamplingMode> {
        match self {
            Self::Direct => None,
            Self::ExternalOes => Some(SamplingMode::ExternalOes),
            Self::Biplanar => Some(SamplingMode::Biplanar),
            Self::Rectangle => Some(SamplingMode::Rectangle),
        }
    }

    /// Fields a 2D texture declares on top of the common ones.
    pub fn video_fields(&self) -> &'static [(TextureField, ValueType)] {
        match self {
            Self::Direct => &[],
            Self::ExternalOes => &[
                (TextureField::SamplingMode, ValueType::Int),
                (TextureField::ExternalSampler, ValueType::SamplerExternalOes),
            ],
            Self::Biplanar => &[
                (TextureField::SamplingMode, ValueType::Int),
                (TextureField::YSampler, ValueType::Sampler2D),
                (TextureField::UvSampler, ValueType::Sampler2D),
                (TextureField::ColorMatrix, ValueType::Mat4),
            ],
            Self::Rectangle => &[
                (TextureField::SamplingMode, ValueType::Int),
                (TextureField::YRectSampler, ValueType::Sampler2DRect),
                (TextureField::UvRectSampler, ValueType::Sampler2DRect),
                (TextureField::ColorMatrix, ValueType::Mat4),
            ],
        }
    }

    /// Returns true if the OES external image extension must be enabled.
    pub fn requires_oes_extension(&self) -> bool {
        *self == Self::ExternalOes
    }

    /// GLSL expression sampling texture `name` at `coords` as a video frame.
    ///
    /// With `fast` set the runtime branch on the sampling mode is skipped and
    /// the platform path is taken unconditionally. `rg` is the swizzle that
    /// reads the two chroma components.
    pub fn video_expression(&self, name: &str, coords: &str, fast: bool, rg: &str) -> String {
        let direct = format!("ngli_tex2d({name}_sampler, {coords})");
        let platform = match self {
            Self::Direct => return format!("({direct})"),
            Self::ExternalOes => format!("ngli_tex2d({name}_external_sampler, {coords})"),
            Self::Biplanar => format!(
                "{name}_color_matrix * vec4(ngli_tex2d({name}_y_sampler, {coords}).r, \
                 ngli_tex2d({name}_uv_sampler, {coords}).{rg}, 1.0)"
            ),
            Self::Rectangle => format!(
                "{name}_color_matrix * vec4(ngli_tex2d({name}_y_rect_sampler, ({coords}) * {name}_dimensions / 2.0).r, \
                 ngli_tex2d({name}_uv_rect_sampler, ({coords}) * {name}_dimensions / 2.0).rg, 1.0)"
            ),
        };
        match self.sampling_mode() {
            Some(mode) if !fast => format!(
                "({name}_sampling_mode == {} ? {platform} : {direct})",
                mode.value()
            ),
            _ => format!("({platform})"),
        }
    }
}
