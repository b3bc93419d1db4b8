//! Content-addressed cache of compiled programs.

use std::collections::HashMap;
use std::sync::Arc;

use ngl_core::profiling::profile_scope;
use parking_lot::Mutex;

use super::{CompiledProgram, ProgramCompiler, ProgramReflection};
use crate::error::GraphicsResult;
use crate::shader::ShaderStage;

/// Get-or-compile cache keyed by the concatenated stage sources.
///
/// Handles are shared: crafting the same sources twice yields the same
/// [`CompiledProgram`]. A program is evicted once the last session holding
/// it releases it.
pub struct ProgramCache {
    compiler: Arc<dyn ProgramCompiler>,
    programs: Mutex<HashMap<String, Arc<CompiledProgram>>>,
}

impl ProgramCache {
    pub fn new(compiler: Arc<dyn ProgramCompiler>) -> Self {
        Self {
            compiler,
            programs: Mutex::new(HashMap::new()),
        }
    }

    /// The compiler misses are delegated to.
    pub fn compiler(&self) -> &dyn ProgramCompiler {
        self.compiler.as_ref()
    }

    /// Get or compile the program made of `vertex` and `fragment`.
    pub fn get_graphics(&self, vertex: &str, fragment: &str) -> GraphicsResult<Arc<CompiledProgram>> {
        profile_scope!("program_cache_get_graphics");

        let key = [vertex, fragment].concat();
        self.get_or_compile(key, |compiler| {
            let reflection = compiler.compile_graphics(vertex, fragment)?;
            let mut sources: [Option<String>; ShaderStage::COUNT] = Default::default();
            sources[ShaderStage::Vertex.index()] = Some(vertex.to_string());
            sources[ShaderStage::Fragment.index()] = Some(fragment.to_string());
            Ok((sources, reflection))
        })
    }

    /// Get or compile the compute program `compute`.
    pub fn get_compute(&self, compute: &str) -> GraphicsResult<Arc<CompiledProgram>> {
        profile_scope!("program_cache_get_compute");

        self.get_or_compile(compute.to_string(), |compiler| {
            let reflection = compiler.compile_compute(compute)?;
            let mut sources: [Option<String>; ShaderStage::COUNT] = Default::default();
            sources[ShaderStage::Compute.index()] = Some(compute.to_string());
            Ok((sources, reflection))
        })
    }

    fn get_or_compile<F>(&self, key: String, compile: F) -> GraphicsResult<Arc<CompiledProgram>>
    where
        F: FnOnce(
            &dyn ProgramCompiler,
        ) -> GraphicsResult<([Option<String>; ShaderStage::COUNT], ProgramReflection)>,
    {
        let mut programs = self.programs.lock();
        if let Some(program) = programs.get(&key) {
            log::trace!("program cache hit");
            return Ok(Arc::clone(program));
        }

        let (sources, reflection) = compile(self.compiler.as_ref()).inspect_err(|e| {
            log::error!("{} failed to compile program: {e}", self.compiler.name());
        })?;
        let program = Arc::new(CompiledProgram::new(key.clone(), sources, reflection));
        programs.insert(key, Arc::clone(&program));
        log::debug!(
            "compiled program with {}, {} cached",
            self.compiler.name(),
            programs.len()
        );
        Ok(program)
    }

    /// Give back a handle. The program is evicted when only the cache
    /// still refers to it.
    pub fn release(&self, program: Arc<CompiledProgram>) {
        let mut programs = self.programs.lock();
        let key = program.key().to_string();
        drop(program);
        if programs
            .get(&key)
            .is_some_and(|cached| Arc::strong_count(cached) == 1)
        {
            programs.remove(&key);
            log::trace!("evicted program, {} cached", programs.len());
        }
    }

    /// Number of cached programs.
    pub fn len(&self) -> usize {
        self.programs.lock().len()
    }

    /// Returns true if no program is cached.
    pub fn is_empty(&self) -> bool {
        self.programs.lock().is_empty()
    }
}

impl std::fmt::Debug for ProgramCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgramCache")
            .field("compiler", &self.compiler.name())
            .field("programs", &self.len())
            .finish()
    }
}

static_assertions::assert_impl_all!(ProgramCache: Send, Sync);
