//! Common utilities for crafting integration tests.
//!
//! Provides the targets tests are parameterised over and a small context
//! wrapper that crafts programs with the GPU-less compiler.

use std::collections::HashSet;
use std::sync::Arc;

use ngl_graphics::{
    Buffer, BufferDescriptor, BufferUsage, CraftConfig, CraftContext, Declarations,
    DummyCompiler, GraphicsResult, MediaPlatform, PipelineResources, ProgramCompiler,
    ProgramCraft, ProgramSources, ShaderStage, TargetApi,
};

/// Install a test logger once.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Targets
// ============================================================================

/// Dialects the crafting tests run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// OpenGL ES 2.0, no in/out qualifiers, legacy texture picking.
    Gles2,
    /// OpenGL ES 3.0.
    Gles3,
    /// OpenGL 3.3 core.
    Gl33,
    /// OpenGL 4.3, storage blocks with explicit bindings.
    Gl43,
    /// Vulkan, explicit bindings and locations, consolidated uniforms.
    Vulkan,
}

impl Target {
    pub fn config(self) -> CraftConfig {
        match self {
            Target::Gles2 => CraftConfig::new(TargetApi::OpenGlEs, 200),
            Target::Gles3 => CraftConfig::new(TargetApi::OpenGlEs, 300),
            Target::Gl33 => CraftConfig::new(TargetApi::OpenGl, 330),
            Target::Gl43 => CraftConfig::new(TargetApi::OpenGl, 430),
            Target::Vulkan => CraftConfig::new(TargetApi::Vulkan, 110),
        }
    }
}

// ============================================================================
// Test Context
// ============================================================================

/// Crafting context of one target.
pub struct TestContext {
    pub context: Arc<CraftContext>,
}

impl TestContext {
    pub fn new(target: Target) -> Self {
        Self::with_config(target.config())
    }

    pub fn with_platform(target: Target, platform: MediaPlatform) -> Self {
        Self::with_config(target.config().with_platform(platform))
    }

    pub fn with_config(config: CraftConfig) -> Self {
        Self::with_config_and_compiler(config, Arc::new(DummyCompiler::new()))
    }

    pub fn with_compiler(target: Target, compiler: Arc<dyn ProgramCompiler>) -> Self {
        Self::with_config_and_compiler(target.config(), compiler)
    }

    fn with_config_and_compiler(config: CraftConfig, compiler: Arc<dyn ProgramCompiler>) -> Self {
        init_logging();
        Self {
            context: CraftContext::new(config, compiler),
        }
    }

    /// Start a session with `decls` declared.
    pub fn session(&self, decls: Declarations) -> ProgramCraft {
        let mut craft = ProgramCraft::new(Arc::clone(&self.context));
        craft.declare(decls).expect("declare failed");
        craft
    }

    /// Craft a graphics program in a fresh session.
    pub fn craft_graphics(
        &self,
        decls: Declarations,
        vertex: &str,
        fragment: &str,
    ) -> GraphicsResult<(ProgramCraft, PipelineResources)> {
        let mut craft = self.session(decls);
        let resources = craft.craft(ProgramSources::graphics(vertex, fragment))?;
        Ok((craft, resources))
    }

    /// Craft a compute program in a fresh session.
    pub fn craft_compute(
        &self,
        decls: Declarations,
        compute: &str,
    ) -> GraphicsResult<(ProgramCraft, PipelineResources)> {
        let mut craft = self.session(decls);
        let resources = craft.craft(ProgramSources::compute(compute))?;
        Ok((craft, resources))
    }
}

/// A vertex buffer large enough for the test attributes.
pub fn vertex_buffer() -> Arc<Buffer> {
    Arc::new(
        Buffer::new(BufferDescriptor::new(1024, BufferUsage::VERTEX).with_label("vertices"))
            .expect("buffer creation failed"),
    )
}

/// Crafted source of `stage`.
pub fn source(resources: &PipelineResources, stage: ShaderStage) -> &str {
    resources.program.source(stage).expect("stage not crafted")
}

/// Panic if two filtered elements of the same stage and kind share a
/// binding. With shared bindings every kind lives in one namespace.
pub fn assert_unique_bindings(resources: &PipelineResources, shared: bool) {
    let mut seen = HashSet::new();
    let textures = resources
        .textures
        .iter()
        .filter_map(|t| t.binding.map(|b| (t.stage, "texture", b)));
    let buffers = resources.buffers.iter().filter_map(|b| {
        let kind = match b.kind {
            ngl_graphics::BlockKind::Uniform => "uniform",
            ngl_graphics::BlockKind::Storage => "storage",
        };
        b.binding.map(|binding| (b.stage, kind, binding))
    });
    for (stage, kind, binding) in textures.chain(buffers) {
        let key = if shared {
            (ShaderStage::Vertex, "shared", binding)
        } else {
            (stage, kind, binding)
        };
        assert!(seen.insert(key), "duplicate binding {binding} for {stage} {kind}");
    }
}
