//! Shading language capability profiles.
//!
//! A [`CapabilityProfile`] is derived once from the target API and version
//! and tells the crafter which syntax it may emit. Within one API, a higher
//! version never loses a capability.

use super::SamplingStrategy;

/// Graphics API the programs are crafted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetApi {
    /// Desktop OpenGL. Versions are written as `330`, `410`, ...
    OpenGl,
    /// OpenGL ES. Versions are written as `200`, `300`, `310`, ...
    OpenGlEs,
    /// Vulkan, always targeting GLSL 450.
    Vulkan,
}

/// Media stack of the platform, which decides how video frames are sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MediaPlatform {
    #[default]
    Generic,
    Android,
    Ios,
    Linux,
    MacOs,
}

impl SamplingStrategy {
    /// Default strategy for a target API on a media platform.
    pub fn for_target(api: TargetApi, platform: MediaPlatform) -> Self {
        match (api, platform) {
            (TargetApi::Vulkan, _) => Self::Direct,
            (_, MediaPlatform::Android) => Self::ExternalOes,
            (_, MediaPlatform::Ios | MediaPlatform::Linux) => Self::Biplanar,
            (_, MediaPlatform::MacOs) => Self::Rectangle,
            (_, MediaPlatform::Generic) => Self::Direct,
        }
    }
}

/// Dialect features available for a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityProfile {
    /// Target API.
    pub api: TargetApi,
    /// API version the profile was derived from.
    pub api_version: u32,
    /// GLSL version written in the `#version` directive.
    pub glsl_version: u32,
    /// Suffix of the `#version` directive (`" es"` from GLSL ES 3.00).
    pub version_suffix: &'static str,
    /// Swizzle reading a two-component texture.
    ///
    /// Dialects without genuine two-component textures store them as
    /// luminance/alpha, read back with `ra`.
    pub rg: &'static str,
    /// `in`/`out` storage qualifiers instead of `attribute`/`varying`.
    pub has_in_out_qualifiers: bool,
    /// `highp`/`mediump`/`lowp` qualifiers.
    pub has_precision_qualifiers: bool,
    /// Overloaded `texture()` instead of `texture2D()` and friends.
    pub has_modern_texture_picking: bool,
    /// `layout(binding=N)` qualifiers.
    pub has_buffer_bindings: bool,
    /// Bindings of uniform blocks are assigned by the crafter.
    pub has_uniform_block_bindings: bool,
    /// Bindings of textures are assigned by the crafter.
    pub has_texture_bindings: bool,
    /// One binding namespace for every stage and resource kind.
    pub has_shared_bindings: bool,
    /// `layout(location=N)` on attributes, inter-stage variables and outputs.
    pub has_explicit_locations: bool,
    /// Loose uniforms are packed into one block per stage.
    pub use_uniform_block: bool,
    /// How video frames are sampled.
    pub sampling: SamplingStrategy,
}

impl CapabilityProfile {
    /// Derive the profile for `api` at `version` on a generic platform.
    pub fn new(api: TargetApi, version: u32) -> Self {
        match api {
            TargetApi::Vulkan => Self::vulkan(version),
            TargetApi::OpenGl | TargetApi::OpenGlEs => Self::opengl(api, version),
        }
    }

    fn vulkan(version: u32) -> Self {
        Self {
            api: TargetApi::Vulkan,
            api_version: version,
            glsl_version: 450,
            version_suffix: "",
            rg: "rg",
            has_in_out_qualifiers: true,
            has_precision_qualifiers: false,
            has_modern_texture_picking: true,
            has_buffer_bindings: true,
            has_uniform_block_bindings: true,
            has_texture_bindings: true,
            has_shared_bindings: true,
            has_explicit_locations: true,
            use_uniform_block: true,
            sampling: SamplingStrategy::Direct,
        }
    }

    fn opengl(api: TargetApi, version: u32) -> Self {
        let es = api == TargetApi::OpenGlEs;
        let glsl_version = match (es, version) {
            (false, 200) => 110,
            (false, 210) => 120,
            (false, 300) => 130,
            (false, 310) => 140,
            (false, 320) => 150,
            (false, v) => v,
            (true, v) if v >= 300 => v,
            (true, _) => 100,
        };

        let es_min = |min| es && glsl_version >= min;
        let gl_min = |min| !es && glsl_version >= min;

        Self {
            api,
            api_version: version,
            glsl_version,
            version_suffix: if es && glsl_version >= 300 { " es" } else { "" },
            rg: if es && version < 300 { "ra" } else { "rg" },
            has_in_out_qualifiers: es_min(300) || gl_min(150),
            has_precision_qualifiers: es,
            has_modern_texture_picking: es_min(300) || gl_min(330),
            has_buffer_bindings: (es && version >= 310) || (!es && version >= 420),
            has_uniform_block_bindings: false,
            has_texture_bindings: false,
            has_shared_bindings: false,
            has_explicit_locations: false,
            use_uniform_block: false,
            sampling: SamplingStrategy::Direct,
        }
    }

    /// Replace the sampling strategy.
    pub fn with_sampling(mut self, sampling: SamplingStrategy) -> Self {
        self.sampling = sampling;
        self
    }

    /// The `#version` line, without trailing newline.
    pub fn version_directive(&self) -> String {
        format!("#version {}{}", self.glsl_version, self.version_suffix)
    }

    /// Qualifier introducing a vertex input.
    pub fn attribute_qualifier(&self) -> &'static str {
        if self.has_in_out_qualifiers {
            "in"
        } else {
            "attribute"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::gl_210(TargetApi::OpenGl, 210, 120, "")]
    #[case::gl_300(TargetApi::OpenGl, 300, 130, "")]
    #[case::gl_310(TargetApi::OpenGl, 310, 140, "")]
    #[case::gl_320(TargetApi::OpenGl, 320, 150, "")]
    #[case::gl_330(TargetApi::OpenGl, 330, 330, "")]
    #[case::gles_200(TargetApi::OpenGlEs, 200, 100, "")]
    #[case::gles_310(TargetApi::OpenGlEs, 310, 310, " es")]
    #[case::vulkan(TargetApi::Vulkan, 110, 450, "")]
    fn test_glsl_version(
        #[case] api: TargetApi,
        #[case] version: u32,
        #[case] glsl: u32,
        #[case] suffix: &str,
    ) {
        let profile = CapabilityProfile::new(api, version);
        assert_eq!(profile.glsl_version, glsl);
        assert_eq!(profile.version_suffix, suffix);
        assert_eq!(profile.version_directive(), format!("#version {glsl}{suffix}"));
    }

    #[test]
    fn test_legacy_es_reads_luminance_alpha() {
        assert_eq!(CapabilityProfile::new(TargetApi::OpenGlEs, 200).rg, "ra");
        assert_eq!(CapabilityProfile::new(TargetApi::OpenGlEs, 300).rg, "rg");
        assert_eq!(CapabilityProfile::new(TargetApi::OpenGl, 210).rg, "rg");
    }

    fn features(p: &CapabilityProfile) -> [bool; 6] {
        [
            p.has_in_out_qualifiers,
            p.has_precision_qualifiers,
            p.has_modern_texture_picking,
            p.has_buffer_bindings,
            p.has_explicit_locations,
            p.use_uniform_block,
        ]
    }

    #[rstest]
    #[case::gl(TargetApi::OpenGl, &[210, 300, 310, 320, 330, 400, 410, 420, 430, 450, 460])]
    #[case::gles(TargetApi::OpenGlEs, &[200, 300, 310, 320])]
    fn test_features_are_monotone(#[case] api: TargetApi, #[case] versions: &[u32]) {
        for pair in versions.windows(2) {
            let lower = features(&CapabilityProfile::new(api, pair[0]));
            let higher = features(&CapabilityProfile::new(api, pair[1]));
            for (l, h) in lower.iter().zip(higher.iter()) {
                assert!(!l || *h, "{api:?} {} loses a feature at {}", pair[0], pair[1]);
            }
        }
    }

    #[test]
    fn test_opengl_thresholds() {
        let gl = CapabilityProfile::new(TargetApi::OpenGl, 330);
        assert!(gl.has_in_out_qualifiers);
        assert!(gl.has_modern_texture_picking);
        assert!(!gl.has_buffer_bindings);
        assert!(!gl.has_precision_qualifiers);
        assert_eq!(gl.attribute_qualifier(), "in");

        let gl = CapabilityProfile::new(TargetApi::OpenGl, 420);
        assert!(gl.has_buffer_bindings);
        assert!(!gl.has_texture_bindings);

        let es = CapabilityProfile::new(TargetApi::OpenGlEs, 200);
        assert!(es.has_precision_qualifiers);
        assert!(!es.has_in_out_qualifiers);
        assert_eq!(es.attribute_qualifier(), "attribute");
    }

    #[test]
    fn test_vulkan_profile() {
        let vk = CapabilityProfile::new(TargetApi::Vulkan, 110);
        assert!(vk.use_uniform_block);
        assert!(vk.has_shared_bindings);
        assert!(vk.has_explicit_locations);
        assert!(!vk.has_precision_qualifiers);
    }

    #[rstest]
    #[case::vulkan_android(TargetApi::Vulkan, MediaPlatform::Android, SamplingStrategy::Direct)]
    #[case::gles_android(TargetApi::OpenGlEs, MediaPlatform::Android, SamplingStrategy::ExternalOes)]
    #[case::gles_ios(TargetApi::OpenGlEs, MediaPlatform::Ios, SamplingStrategy::Biplanar)]
    #[case::gl_linux(TargetApi::OpenGl, MediaPlatform::Linux, SamplingStrategy::Biplanar)]
    #[case::gl_macos(TargetApi::OpenGl, MediaPlatform::MacOs, SamplingStrategy::Rectangle)]
    #[case::gl_generic(TargetApi::OpenGl, MediaPlatform::Generic, SamplingStrategy::Direct)]
    fn test_sampling_for_target(
        #[case] api: TargetApi,
        #[case] platform: MediaPlatform,
        #[case] expected: SamplingStrategy,
    ) {
        assert_eq!(SamplingStrategy::for_target(api, platform), expected);
    }
}
