//! Program crafting sessions.
//!
//! A [`ProgramCraft`] turns declarations and raw shader bodies into complete
//! stage sources, compiles them through the context's program cache and
//! reconciles the declarations with the program reflection.
//!
//! # Lifecycle
//!
//! ```text
//! Empty -> Declaring -> Assembled -> Probed -> Released
//!               \            \          \
//!                +------------+----------+--> Failed -> Released
//! ```
//!
//! A session crafts exactly one program. Any error leaves it `Failed`; the
//! only operation left is [`ProgramCraft::release`], which also runs on drop.
//!
//! # Example
//!
//! ```ignore
//! let mut craft = ProgramCraft::new(context.clone());
//! craft.declare(
//!     Declarations::new()
//!         .with_texture(NamedTexture::new("tex0", TextureKind::Texture2D, ShaderStage::Fragment))
//!         .with_inter_stage_var(NamedInterStageVar::new("uv", ValueType::Vec2)),
//! )?;
//! let resources = craft.craft(ProgramSources::graphics(
//!     "void main() { uv = vec2(0.0); ngl_out_pos = vec4(0.0); }",
//!     "void main() { ngl_out_color = ngl_texvideo(tex0, uv); }",
//! ))?;
//! ```

mod bindings;
mod inject;
mod named;
mod probe;
mod texture_info;

use std::sync::Arc;

use ngl_core::profiling::profile_function;

pub use bindings::{BindingAllocator, BindingKind};
pub use named::{
    Declarations, NamedAttribute, NamedBlock, NamedInterStageVar, NamedTexture, NamedUniform,
    Precision, TextureKind,
};
pub use texture_info::{ResourceIndex, TextureInfo, TextureInfoField};

use crate::context::CraftContext;
use crate::error::{GraphicsError, GraphicsResult};
use crate::pipeline::{DeclaredResources, PipelineResources, PipelineUniform, UniformBlockBinding};
use crate::program::CompiledProgram;
use crate::shader::ShaderStage;

use inject::Injector;

/// Lifecycle state of a [`ProgramCraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CraftState {
    /// Nothing declared yet.
    Empty,
    /// At least one declaration batch was received.
    Declaring,
    /// The program was compiled.
    Assembled,
    /// Declarations were reconciled with the program.
    Probed,
    /// Resources were given back. Terminal.
    Released,
    /// An operation failed. Only release is allowed.
    Failed,
}

/// Raw shader bodies of a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramSources {
    Graphics {
        vertex: String,
        fragment: String,
        /// Number of fragment color outputs.
        fragment_outputs: u32,
    },
    Compute {
        compute: String,
    },
}

impl ProgramSources {
    /// A vertex/fragment program writing one color.
    pub fn graphics(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self::Graphics {
            vertex: vertex.into(),
            fragment: fragment.into(),
            fragment_outputs: 1,
        }
    }

    /// A compute program.
    pub fn compute(compute: impl Into<String>) -> Self {
        Self::Compute {
            compute: compute.into(),
        }
    }

    /// Set the number of fragment color outputs. Ignored for compute.
    pub fn with_fragment_outputs(mut self, outputs: u32) -> Self {
        if let Self::Graphics {
            fragment_outputs, ..
        } = &mut self
        {
            *fragment_outputs = outputs;
        }
        self
    }

    pub fn is_compute(&self) -> bool {
        matches!(self, Self::Compute { .. })
    }
}

/// A single-use program crafting session.
pub struct ProgramCraft {
    context: Arc<CraftContext>,
    state: CraftState,
    declarations: Declarations,
    texture_infos: Vec<TextureInfo>,
    declared: DeclaredResources,
    program: Option<Arc<CompiledProgram>>,
    uniforms: Vec<PipelineUniform>,
    uniform_blocks: Vec<UniformBlockBinding>,
}

impl ProgramCraft {
    /// Start a session on `context`.
    pub fn new(context: Arc<CraftContext>) -> Self {
        Self {
            context,
            state: CraftState::Empty,
            declarations: Declarations::new(),
            texture_infos: Vec::new(),
            declared: DeclaredResources::default(),
            program: None,
            uniforms: Vec::new(),
            uniform_blocks: Vec::new(),
        }
    }

    pub fn state(&self) -> CraftState {
        self.state
    }

    pub fn context(&self) -> &Arc<CraftContext> {
        &self.context
    }

    /// Add a batch of declarations. Batches accumulate until
    /// [`craft`](Self::craft) is called.
    pub fn declare(&mut self, batch: Declarations) -> GraphicsResult<()> {
        self.expect_state("declare", &[CraftState::Empty, CraftState::Declaring])?;
        self.declarations.append(batch);
        self.state = CraftState::Declaring;
        Ok(())
    }

    /// Craft, compile and probe the program.
    ///
    /// On failure the session is left [`CraftState::Failed`].
    pub fn craft(&mut self, sources: ProgramSources) -> GraphicsResult<PipelineResources> {
        profile_function!();

        self.expect_state("craft", &[CraftState::Empty, CraftState::Declaring])?;
        self.state = CraftState::Declaring;

        match self.run(&sources) {
            Ok(resources) => Ok(resources),
            Err(e) => {
                log::error!("Crafting failed in state {:?}: {e}", self.state);
                self.state = CraftState::Failed;
                Err(e)
            }
        }
    }

    fn run(&mut self, sources: &ProgramSources) -> GraphicsResult<PipelineResources> {
        let context = Arc::clone(&self.context);
        let profile = context.profile();
        let graphics = !sources.is_compute();

        if !graphics && !self.declarations.attributes.is_empty() {
            return Err(GraphicsError::InvalidArgument(
                "compute programs cannot declare vertex attributes".into(),
            ));
        }

        self.texture_infos.try_reserve(self.declarations.textures.len())?;
        self.texture_infos.extend(
            self.declarations
                .textures
                .iter()
                .map(|t| TextureInfo::expand(t, profile.sampling, graphics)),
        );

        let mut injector = Injector::new(profile);
        let program = match sources {
            ProgramSources::Graphics {
                vertex,
                fragment,
                fragment_outputs,
            } => {
                let vertex = injector.craft_vertex(&self.declarations, &self.texture_infos, vertex)?;
                let fragment = injector.craft_fragment(
                    &self.declarations,
                    &self.texture_infos,
                    fragment,
                    *fragment_outputs,
                )?;
                log::debug!("Crafted vertex shader:\n{vertex}");
                log::debug!("Crafted fragment shader:\n{fragment}");
                context.cache().get_graphics(&vertex, &fragment)?
            }
            ProgramSources::Compute { compute } => {
                let compute = injector.craft_compute(&self.declarations, &self.texture_infos, compute)?;
                log::debug!("Crafted compute shader:\n{compute}");
                context.cache().get_compute(&compute)?
            }
        };
        let injected = injector.finish();
        self.declared = injected.declared;
        self.uniform_blocks = injected.uniform_blocks;
        self.program = Some(Arc::clone(&program));
        self.state = CraftState::Assembled;

        let probed = probe::probe(&self.declared, program.reflection())?;
        probe::resolve_texture_infos(&mut self.texture_infos, &probed, &self.uniform_blocks);
        self.uniforms.clone_from(&probed.uniforms);
        self.state = CraftState::Probed;

        Ok(PipelineResources {
            program,
            uniforms: probed.uniforms,
            textures: probed.textures,
            buffers: probed.buffers,
            attributes: probed.attributes,
            uniform_blocks: self.uniform_blocks.clone(),
        })
    }

    /// Where the plain uniform `name` of `stage` ended up, `None` when it
    /// was eliminated or the session was not probed.
    pub fn uniform_index(&self, name: &str, stage: ShaderStage) -> Option<ResourceIndex> {
        if self.state != CraftState::Probed {
            return None;
        }
        probe::uniform_index(name, stage, &self.uniforms, &self.uniform_blocks)
    }

    /// Expanded textures, with field indices resolved once probed.
    pub fn texture_infos(&self) -> &[TextureInfo] {
        &self.texture_infos
    }

    /// Every element registered by injection, before filtering.
    pub fn declared(&self) -> &DeclaredResources {
        &self.declared
    }

    /// The compiled program, from `Assembled` until release.
    pub fn program(&self) -> Option<&Arc<CompiledProgram>> {
        self.program.as_ref()
    }

    /// Give the program back to the cache and drop the session state.
    pub fn release(&mut self) {
        if self.state == CraftState::Released {
            return;
        }
        if let Some(program) = self.program.take() {
            self.context.cache().release(program);
        }
        self.declarations = Declarations::new();
        self.texture_infos.clear();
        self.declared = DeclaredResources::default();
        self.uniforms.clear();
        self.uniform_blocks.clear();
        self.state = CraftState::Released;
    }

    fn expect_state(&self, operation: &str, allowed: &[CraftState]) -> GraphicsResult<()> {
        if allowed.contains(&self.state) {
            return Ok(());
        }
        log::error!("Cannot {operation} a session in state {:?}", self.state);
        Err(GraphicsError::InvalidState(format!(
            "cannot {operation} in state {:?}",
            self.state
        )))
    }
}

impl Drop for ProgramCraft {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for ProgramCraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgramCraft")
            .field("state", &self.state)
            .field("textures", &self.texture_infos.len())
            .field("program", &self.program.as_ref().map(|p| p.key().len()))
            .finish()
    }
}
