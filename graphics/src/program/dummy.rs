//! GPU-less program compiler.
//!
//! Reads the declarations of crafted sources line by line and reports
//! every declared name the stage actually refers to. Explicit `layout`
//! bindings and locations are honoured; anything else gets the lowest
//! free value, the way a driver would assign it.

use std::collections::{BTreeSet, HashMap};

use super::{ProgramCompiler, ProgramReflection, VariableInfo};
use crate::error::{GraphicsError, GraphicsResult};

/// Program compiler that needs no GPU.
#[derive(Debug, Default, Clone, Copy)]
pub struct DummyCompiler;

impl DummyCompiler {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, PartialEq, Eq)]
enum DeclKind {
    Uniform,
    Sampler,
    Block { storage: bool },
    Attribute { locations: u32 },
}

#[derive(Debug)]
struct Declaration {
    name: String,
    kind: DeclKind,
    location: Option<u32>,
    binding: Option<u32>,
    used: bool,
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn count_word(text: &str, word: &str) -> usize {
    if word.is_empty() {
        return 0;
    }
    let bytes = text.as_bytes();
    text.match_indices(word)
        .filter(|(start, _)| {
            let end = start + word.len();
            let before = *start == 0 || !is_identifier_byte(bytes[start - 1]);
            let after = end == bytes.len() || !is_identifier_byte(bytes[end]);
            before && after
        })
        .count()
}

fn parse_qualifier(qualifiers: &str, key: &str) -> GraphicsResult<Option<u32>> {
    for qualifier in qualifiers.split(',') {
        let Some((k, v)) = qualifier.split_once('=') else {
            continue;
        };
        if k.trim() == key {
            let value = v.trim().parse().map_err(|_| {
                GraphicsError::ShaderCompilationFailed(format!("invalid {key} value `{}`", v.trim()))
            })?;
            return Ok(Some(value));
        }
    }
    Ok(None)
}

fn strip_name(token: &str) -> &str {
    let token = token.trim_end_matches(';');
    token.split('[').next().unwrap_or(token)
}

const SKIPPED_QUALIFIERS: &[&str] = &[
    "readonly", "writeonly", "highp", "mediump", "lowp", "flat", "smooth",
];

/// Collect the declarations of one stage.
fn parse_stage(source: &str, vertex: bool) -> GraphicsResult<Vec<Declaration>> {
    if !source.starts_with("#version") {
        return Err(GraphicsError::ShaderCompilationFailed(
            "source does not start with a #version directive".into(),
        ));
    }
    if source.matches('{').count() != source.matches('}').count() {
        return Err(GraphicsError::ShaderCompilationFailed(
            "unbalanced braces".into(),
        ));
    }

    let mut declarations = Vec::new();
    let mut lines = source.lines();
    while let Some(line) = lines.next() {
        let mut rest = line.trim();
        let mut qualifiers = "";
        if let Some(after) = rest.strip_prefix("layout(") {
            let Some(end) = after.find(')') else {
                return Err(GraphicsError::ShaderCompilationFailed(format!(
                    "unterminated layout qualifier: {line}"
                )));
            };
            qualifiers = &after[..end];
            rest = after[end + 1..].trim();
        }

        let tokens: Vec<&str> = rest
            .split_whitespace()
            .filter(|t| !SKIPPED_QUALIFIERS.contains(t))
            .collect();
        let (storage, ty, name) = match tokens.as_slice() {
            [storage, ty, name, ..] => (*storage, *ty, *name),
            _ => continue,
        };

        let location = parse_qualifier(qualifiers, "location")?;
        let binding = parse_qualifier(qualifiers, "binding")?;

        let kind = match storage {
            "uniform" | "buffer" if name == "{" || ty.ends_with('{') => {
                let storage = storage == "buffer";
                let mut fields = Vec::new();
                let instance = loop {
                    let Some(field) = lines.next() else {
                        return Err(GraphicsError::ShaderCompilationFailed(format!(
                            "unterminated block {ty}"
                        )));
                    };
                    let field = field.trim();
                    if let Some(instance) = field.strip_prefix('}') {
                        break instance.trim().trim_end_matches(';').trim();
                    }
                    if let Some(name) = field.split_whitespace().nth(1) {
                        fields.push(strip_name(name));
                    }
                };
                let used = if instance.is_empty() {
                    fields.iter().any(|f| count_word(source, f) > 1)
                } else {
                    count_word(source, instance) > 1
                };
                declarations.push(Declaration {
                    name: ty.trim_end_matches('{').to_string(),
                    kind: DeclKind::Block { storage },
                    location: None,
                    binding,
                    used,
                });
                continue;
            }
            "uniform" if ty.starts_with("sampler") || ty.starts_with("image") || ty.starts_with("__sampler") => {
                DeclKind::Sampler
            }
            "uniform" => DeclKind::Uniform,
            "in" | "attribute" if vertex => DeclKind::Attribute {
                locations: if ty == "mat4" { 4 } else { 1 },
            },
            _ => continue,
        };

        let name = strip_name(name);
        declarations.push(Declaration {
            name: name.to_string(),
            kind,
            location,
            binding,
            used: count_word(source, name) > 1,
        });
    }
    Ok(declarations)
}

/// Lowest value not in `taken`, leaving room for `span` consecutive values.
fn first_free(taken: &BTreeSet<u32>, span: u32) -> u32 {
    let mut base = 0;
    while (base..base + span).any(|v| taken.contains(&v)) {
        base += 1;
    }
    base
}

fn reflect(stages: &[Vec<Declaration>]) -> ProgramReflection {
    let declarations = || stages.iter().flatten().filter(|d| d.used);

    let mut uniforms = HashMap::new();
    let mut next_location = 0;
    for decl in declarations().filter(|d| matches!(d.kind, DeclKind::Uniform | DeclKind::Sampler)) {
        uniforms.entry(decl.name.clone()).or_insert_with(|| {
            let location = decl.location.unwrap_or_else(|| {
                next_location += 1;
                next_location - 1
            });
            VariableInfo {
                location: Some(location),
                binding: decl.binding,
            }
        });
    }

    let mut buffer_blocks = HashMap::new();
    for storage in [false, true] {
        let blocks: Vec<_> = declarations()
            .filter(|d| d.kind == DeclKind::Block { storage })
            .collect();
        let mut taken: BTreeSet<u32> = blocks.iter().filter_map(|d| d.binding).collect();
        for decl in blocks {
            let binding = decl.binding.unwrap_or_else(|| {
                let binding = first_free(&taken, 1);
                taken.insert(binding);
                binding
            });
            buffer_blocks.insert(decl.name.clone(), VariableInfo::with_binding(binding));
        }
    }

    let mut attributes = HashMap::new();
    let inputs: Vec<_> = declarations()
        .filter_map(|d| match d.kind {
            DeclKind::Attribute { locations } => Some((d, locations)),
            _ => None,
        })
        .collect();
    let mut taken: BTreeSet<u32> = inputs
        .iter()
        .filter_map(|(d, span)| d.location.map(|l| (l, *span)))
        .flat_map(|(l, span)| l..l + span)
        .collect();
    for (decl, span) in inputs {
        let location = decl.location.unwrap_or_else(|| {
            let base = first_free(&taken, span);
            taken.extend(base..base + span);
            base
        });
        attributes.insert(decl.name.clone(), VariableInfo::with_location(location));
    }

    ProgramReflection {
        uniforms: Some(uniforms),
        buffer_blocks: Some(buffer_blocks),
        attributes: Some(attributes),
    }
}

impl ProgramCompiler for DummyCompiler {
    fn compile_graphics(&self, vertex: &str, fragment: &str) -> GraphicsResult<ProgramReflection> {
        let vertex = parse_stage(vertex, true)?;
        let fragment = parse_stage(fragment, false)?;
        log::trace!(
            "DummyCompiler: {} vertex and {} fragment declarations",
            vertex.len(),
            fragment.len()
        );
        Ok(reflect(&[vertex, fragment]))
    }

    fn compile_compute(&self, compute: &str) -> GraphicsResult<ProgramReflection> {
        let compute = parse_stage(compute, false)?;
        log::trace!("DummyCompiler: {} compute declarations", compute.len());
        Ok(reflect(&[compute]))
    }

    fn name(&self) -> &'static str {
        "Dummy Compiler"
    }
}
