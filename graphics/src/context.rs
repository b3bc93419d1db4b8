//! Crafting context configuration.

use std::sync::Arc;

use crate::program::{ProgramCache, ProgramCompiler};
use crate::shader::{CapabilityProfile, MediaPlatform, SamplingStrategy, TargetApi};

/// Target description a [`CraftContext`] is created from.
///
/// # Example
///
/// ```ignore
/// let config = CraftConfig::new(TargetApi::OpenGlEs, 300)
///     .with_platform(MediaPlatform::Android);
/// assert_eq!(config.profile().sampling, SamplingStrategy::ExternalOes);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftConfig {
    /// Target graphics API.
    pub api: TargetApi,
    /// API version, `330` for OpenGL 3.3, `300` for OpenGL ES 3.0.
    pub version: u32,
    /// Media platform, which decides how video frames are sampled.
    pub platform: MediaPlatform,
    /// Overrides the sampling strategy derived from the platform.
    pub sampling: Option<SamplingStrategy>,
}

impl CraftConfig {
    pub fn new(api: TargetApi, version: u32) -> Self {
        Self {
            api,
            version,
            platform: MediaPlatform::Generic,
            sampling: None,
        }
    }

    /// Set the media platform.
    pub fn with_platform(mut self, platform: MediaPlatform) -> Self {
        self.platform = platform;
        self
    }

    /// Force a sampling strategy.
    pub fn with_sampling(mut self, sampling: SamplingStrategy) -> Self {
        self.sampling = Some(sampling);
        self
    }

    /// Capability profile of the configured target.
    pub fn profile(&self) -> CapabilityProfile {
        let sampling = self
            .sampling
            .unwrap_or_else(|| SamplingStrategy::for_target(self.api, self.platform));
        CapabilityProfile::new(self.api, self.version).with_sampling(sampling)
    }
}

/// Shared state of every crafting session on one target.
#[derive(Debug)]
pub struct CraftContext {
    config: CraftConfig,
    profile: CapabilityProfile,
    cache: ProgramCache,
}

impl CraftContext {
    /// Create a context compiling programs with `compiler`.
    pub fn new(config: CraftConfig, compiler: Arc<dyn ProgramCompiler>) -> Arc<Self> {
        let profile = config.profile();
        log::info!(
            "Craft context: {:?} {} ({}), compiler: {}",
            config.api,
            config.version,
            profile.version_directive(),
            compiler.name()
        );
        log::debug!("Capability profile: {profile:?}");
        log::debug!("Sampling strategy: {:?}", profile.sampling);

        Arc::new(Self {
            config,
            profile,
            cache: ProgramCache::new(compiler),
        })
    }

    pub fn config(&self) -> &CraftConfig {
        &self.config
    }

    pub fn profile(&self) -> &CapabilityProfile {
        &self.profile
    }

    /// Program cache shared by the sessions of this context.
    pub fn cache(&self) -> &ProgramCache {
        &self.cache
    }
}

static_assertions::assert_impl_all!(CraftContext: Send, Sync);
