//! Binding and location counters of one crafting session.

use crate::shader::{CapabilityProfile, ShaderStage};
use crate::types::BlockKind;

/// Resource kinds with their own binding namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    UniformBlock,
    StorageBlock,
    Texture,
}

impl BindingKind {
    const COUNT: usize = 3;

    fn index(&self) -> usize {
        *self as usize
    }
}

impl From<BlockKind> for BindingKind {
    fn from(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Uniform => Self::UniformBlock,
            BlockKind::Storage => Self::StorageBlock,
        }
    }
}

const SLOTS: usize = ShaderStage::COUNT * BindingKind::COUNT;

fn slot(stage: ShaderStage, kind: BindingKind) -> usize {
    stage.index() * BindingKind::COUNT + kind.index()
}

/// Hands out explicit bindings and locations in emission order.
///
/// Each `(stage, kind)` pair maps to a counter, or to none when the profile
/// lets the program compiler assign bindings of that kind. With shared
/// bindings every pair maps to the same counter.
#[derive(Debug, Clone)]
pub struct BindingAllocator {
    slots: [Option<usize>; SLOTS],
    counters: [u32; SLOTS],
    in_locations: Option<[u32; ShaderStage::COUNT]>,
    out_locations: Option<[u32; ShaderStage::COUNT]>,
}

impl BindingAllocator {
    /// Create the counters `profile` allows.
    pub fn new(profile: &CapabilityProfile) -> Self {
        let mut slots = [None; SLOTS];
        if profile.has_buffer_bindings {
            for stage in ShaderStage::ALL {
                for kind in [
                    BindingKind::UniformBlock,
                    BindingKind::StorageBlock,
                    BindingKind::Texture,
                ] {
                    let enabled = match kind {
                        BindingKind::UniformBlock => profile.has_uniform_block_bindings,
                        BindingKind::StorageBlock => true,
                        BindingKind::Texture => profile.has_texture_bindings,
                    };
                    let id = slot(stage, kind);
                    if enabled {
                        slots[id] = Some(if profile.has_shared_bindings { 0 } else { id });
                    }
                }
            }
        }

        let locations = profile
            .has_explicit_locations
            .then_some([0; ShaderStage::COUNT]);

        Self {
            slots,
            counters: [0; SLOTS],
            in_locations: locations,
            out_locations: locations,
        }
    }

    /// Next binding for `kind` in `stage`, or `None` when it is assigned by
    /// the program compiler.
    pub fn next_binding(&mut self, stage: ShaderStage, kind: BindingKind) -> Option<u32> {
        let counter = self.slots[slot(stage, kind)]?;
        let binding = self.counters[counter];
        self.counters[counter] += 1;
        Some(binding)
    }

    /// Reserve `count` consecutive input locations in `stage`.
    pub fn next_in_locations(&mut self, stage: ShaderStage, count: u32) -> Option<u32> {
        let locations = self.in_locations.as_mut()?;
        let base = locations[stage.index()];
        locations[stage.index()] += count;
        Some(base)
    }

    /// Reserve `count` consecutive output locations in `stage`.
    pub fn next_out_locations(&mut self, stage: ShaderStage, count: u32) -> Option<u32> {
        let locations = self.out_locations.as_mut()?;
        let base = locations[stage.index()];
        locations[stage.index()] += count;
        Some(base)
    }
}
