//! Rewriting of texture picking pseudo-functions.
//!
//! Shader bodies sample textures through portable calls such as
//! `ngl_tex2d(tex, uv)` or `ngl_texvideo(tex, uv)`. GLSL ES forbids token
//! pasting, so these cannot be macros: they are rewritten at the text level
//! into calls on the per-texture fields declared by the crafter.
//!
//! Occurrences are found in a single scan of the untouched source. The
//! output is then built front to back into a fresh buffer; calls nested in
//! the arguments of another call are rewritten first and spliced into the
//! outer replacement.

use std::ops::Range;

use ngl_core::profiling::profile_scope;

use super::{CapabilityProfile, ShaderText};
use crate::error::{GraphicsError, GraphicsResult};

/// A recognized pseudo-function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoFunction {
    /// `ngl_img2d(img, coords)`, loads from a storage image.
    Img2d,
    /// `ngl_imgsz(img)`, size of a storage image.
    ImgSize,
    /// `ngl_texlod(tex, coords, lod)`, explicit level of detail.
    TexLod,
    /// `ngl_tex2d(tex, coords)`.
    Tex2d,
    /// `ngl_tex3d(tex, coords)`.
    Tex3d,
    /// `ngl_texcube(tex, dir)`.
    TexCube,
    /// `ngl_texvideo(tex, coords)`, branches on the sampling mode at runtime.
    TexVideo,
    /// `ngli_texvideo(tex, coords)`, always takes the platform path.
    FastTexVideo,
}

impl PseudoFunction {
    /// Every pseudo-function.
    pub const ALL: [PseudoFunction; 8] = [
        Self::Img2d,
        Self::ImgSize,
        Self::TexLod,
        Self::Tex2d,
        Self::Tex3d,
        Self::TexCube,
        Self::TexVideo,
        Self::FastTexVideo,
    ];

    /// Identifier written in shader bodies.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Img2d => "ngl_img2d",
            Self::ImgSize => "ngl_imgsz",
            Self::TexLod => "ngl_texlod",
            Self::Tex2d => "ngl_tex2d",
            Self::Tex3d => "ngl_tex3d",
            Self::TexCube => "ngl_texcube",
            Self::TexVideo => "ngl_texvideo",
            Self::FastTexVideo => "ngli_texvideo",
        }
    }

    /// Internal function a simple call is forwarded to, defined by the
    /// stage header. `None` for the video calls.
    pub fn internal_name(&self) -> Option<&'static str> {
        match self {
            Self::Img2d => Some("ngli_img2d"),
            Self::ImgSize => Some("ngli_imgsz"),
            Self::TexLod => Some("ngli_texlod"),
            Self::Tex2d => Some("ngli_tex2d"),
            Self::Tex3d => Some("ngli_tex3d"),
            Self::TexCube => Some("ngli_texcube"),
            Self::TexVideo | Self::FastTexVideo => None,
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.token() == token)
    }
}

/// A pseudo-function call site found by [`scan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub function: PseudoFunction,
    /// Byte offset of the identifier in the scanned text.
    pub offset: usize,
}

/// Result of [`preprocess`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preprocessed {
    /// Rewritten source.
    pub text: String,
    /// Number of occurrences found by the scan.
    pub scanned: usize,
    /// Number of calls replaced.
    pub rewritten: usize,
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Find every pseudo-function identifier in `text`, in ascending order.
///
/// Identifiers are matched whole: `my_ngl_tex2d` and `ngl_tex2dx` are not
/// occurrences. Comments are not skipped.
pub fn scan(text: &str) -> Vec<Occurrence> {
    let bytes = text.as_bytes();
    let mut occurrences = Vec::new();
    let mut from = 0;
    while let Some(found) = text[from..].find("ngl") {
        let start = from + found;
        let len = bytes[start..]
            .iter()
            .take_while(|b| is_identifier_byte(**b))
            .count();
        from = start + len;

        if start > 0 && is_identifier_byte(bytes[start - 1]) {
            continue;
        }
        if let Some(function) = PseudoFunction::from_token(&text[start..start + len]) {
            occurrences.push(Occurrence {
                function,
                offset: start,
            });
        }
    }
    occurrences
}

fn malformed(message: String) -> GraphicsError {
    log::error!("{message}");
    GraphicsError::InvalidArgument(message)
}

fn skip_whitespace(src: &str, p: usize) -> usize {
    p + src[p..]
        .bytes()
        .take_while(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
        .count()
}

/// Returns the offset of the `,` or `)` ending the argument starting at `p`.
///
/// Nested parentheses are balanced and comments are skipped, so a `)` or
/// `,` inside them does not end the argument.
fn skip_arg(src: &str, mut p: usize) -> GraphicsResult<usize> {
    let bytes = src.as_bytes();
    let mut depth = 0u32;
    while p < bytes.len() {
        match bytes[p] {
            b',' | b')' if depth == 0 => return Ok(p),
            b'(' => depth += 1,
            b')' => depth -= 1,
            b'/' if bytes.get(p + 1) == Some(&b'/') => {
                p = src[p..].find(['\r', '\n']).map_or(bytes.len(), |eol| p + eol);
                continue;
            }
            b'/' if bytes.get(p + 1) == Some(&b'*') => {
                let end = src[p + 2..]
                    .find("*/")
                    .ok_or_else(|| malformed("unterminated block comment in argument".into()))?;
                p += 2 + end + 2;
                continue;
            }
            _ => {}
        }
        p += 1;
    }
    Err(malformed("unterminated pseudo-function argument".into()))
}

fn trimmed(src: &str, start: usize, end: usize) -> Range<usize> {
    start..start + src[start..end].trim_end().len()
}

struct Call {
    name: Range<usize>,
    coords: Option<Range<usize>>,
    /// Offset right after the consumed text.
    end: usize,
}

fn parse_call(src: &str, offset: usize, function: PseudoFunction) -> GraphicsResult<Call> {
    let token = function.token();
    let mut p = skip_whitespace(src, offset + token.len());
    if src.as_bytes().get(p) != Some(&b'(') {
        return Err(malformed(format!("missing '(' after {token}")));
    }
    p = skip_whitespace(src, p + 1);

    let name_end = skip_arg(src, p)?;
    let name = trimmed(src, p, name_end);
    if name.is_empty() {
        return Err(malformed(format!("{token}() is missing its texture argument")));
    }

    if function.internal_name().is_some() {
        // The remaining arguments are copied verbatim but must be closed.
        let mut end = name_end;
        while src.as_bytes()[end] == b',' {
            end = skip_arg(src, end + 1)?;
        }
        return Ok(Call {
            name,
            coords: None,
            end: name_end,
        });
    }

    if src.as_bytes()[name_end] != b',' {
        return Err(malformed(format!("{token}() expects a coordinate argument")));
    }
    let p = skip_whitespace(src, name_end + 1);
    let coords_end = skip_arg(src, p)?;
    if src.as_bytes()[coords_end] != b')' {
        return Err(malformed(format!("{token}() takes exactly two arguments")));
    }
    Ok(Call {
        name,
        coords: Some(trimmed(src, p, coords_end)),
        end: coords_end + 1,
    })
}

fn within(occurrences: &[Occurrence], range: Range<usize>) -> &[Occurrence] {
    let start = occurrences.partition_point(|o| o.offset < range.start);
    let end = occurrences.partition_point(|o| o.offset < range.end);
    &occurrences[start..end]
}

/// Rewrite `src`, which starts at `base` in the scanned text, into `out`.
fn rewrite(
    src: &str,
    base: usize,
    occurrences: &[Occurrence],
    profile: &CapabilityProfile,
    out: &mut ShaderText,
) -> GraphicsResult<usize> {
    let mut cursor = 0;
    let mut rewritten = 0;

    for occurrence in occurrences {
        let offset = occurrence.offset - base;
        if offset < cursor {
            // Already rewritten as part of an enclosing call's argument.
            continue;
        }
        out.push_str(&src[cursor..offset])?;

        let call = parse_call(src, offset, occurrence.function)?;
        let mut rewrite_arg = |range: &Range<usize>| -> GraphicsResult<ShaderText> {
            let mut arg = ShaderText::new();
            let absolute = base + range.start..base + range.end;
            rewritten += rewrite(
                &src[range.clone()],
                absolute.start,
                within(occurrences, absolute),
                profile,
                &mut arg,
            )?;
            Ok(arg)
        };

        let name = rewrite_arg(&call.name)?;
        match (&call.coords, occurrence.function.internal_name()) {
            (Some(coords), _) => {
                let coords = rewrite_arg(coords)?;
                let fast = occurrence.function == PseudoFunction::FastTexVideo;
                let expr = profile.sampling.video_expression(
                    name.as_str(),
                    coords.as_str(),
                    fast,
                    profile.rg,
                );
                out.push_str(&expr)?;
            }
            (None, Some(internal)) => {
                out.push_fmt(format_args!("{internal}({name}_sampler"))?;
            }
            (None, None) => {
                return Err(malformed(format!(
                    "{}() expects a coordinate argument",
                    occurrence.function.token()
                )));
            }
        }

        rewritten += 1;
        cursor = call.end;
    }

    out.push_str(&src[cursor..])?;
    Ok(rewritten)
}

/// Rewrite every pseudo-function call in `source` for `profile`.
///
/// A malformed call (missing parenthesis, unterminated argument, wrong
/// argument count) fails with [`GraphicsError::InvalidArgument`].
pub fn preprocess(source: &str, profile: &CapabilityProfile) -> GraphicsResult<Preprocessed> {
    profile_scope!("preprocess_pseudo_functions");

    let occurrences = scan(source);
    let mut out = ShaderText::new();
    let rewritten = rewrite(source, 0, &occurrences, profile, &mut out)?;
    log::trace!(
        "rewrote {rewritten} of {} pseudo-function calls",
        occurrences.len()
    );

    Ok(Preprocessed {
        text: out.into_string(),
        scanned: occurrences.len(),
        rewritten,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{SamplingStrategy, TargetApi};

    fn gles() -> CapabilityProfile {
        CapabilityProfile::new(TargetApi::OpenGlEs, 300)
    }

    #[test]
    fn test_scan_respects_identifier_boundaries() {
        let found = scan("a = ngl_tex2d(t, uv) + my_ngl_tex2d(t) + ngl_tex2dx(t) + ngl_out_color;");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].function, PseudoFunction::Tex2d);
        assert_eq!(found[0].offset, 4);
    }

    #[test]
    fn test_simple_call() {
        let out = preprocess("c = ngl_tex2d( tex0 , uv);", &gles()).unwrap();
        assert_eq!(out.text, "c = ngli_tex2d(tex0_sampler, uv);");
        assert_eq!(out.rewritten, 1);
    }

    #[test]
    fn test_single_argument_call() {
        let out = preprocess("ivec2 s = ngl_imgsz(img);", &gles()).unwrap();
        assert_eq!(out.text, "ivec2 s = ngli_imgsz(img_sampler);");
    }

    #[test]
    fn test_video_call_direct() {
        let out = preprocess("c = ngl_texvideo(tex0, uv * 2.0);", &gles()).unwrap();
        assert_eq!(out.text, "c = (ngli_tex2d(tex0_sampler, uv * 2.0));");
    }

    #[test]
    fn test_video_call_oes() {
        let profile = gles().with_sampling(SamplingStrategy::ExternalOes);
        let out = preprocess("c = ngl_texvideo(tex0, uv);", &profile).unwrap();
        assert_eq!(
            out.text,
            "c = (tex0_sampling_mode == 2 ? ngli_tex2d(tex0_external_sampler, uv) : ngli_tex2d(tex0_sampler, uv));"
        );

        let out = preprocess("c = ngli_texvideo(tex0, uv);", &profile).unwrap();
        assert_eq!(out.text, "c = (ngli_tex2d(tex0_external_sampler, uv));");
    }

    #[test]
    fn test_nested_calls() {
        let src = "c = ngl_texvideo(a, ngl_tex2d(b, ngl_tex2d(c, uv).xy).xy) + ngl_tex3d(d, p);";
        let out = preprocess(src, &gles()).unwrap();
        assert_eq!(out.scanned, 4);
        assert_eq!(out.rewritten, 4);
        assert!(scan(&out.text).is_empty());
        assert_eq!(
            out.text,
            "c = (ngli_tex2d(a_sampler, ngli_tex2d(b_sampler, ngli_tex2d(c_sampler, uv).xy).xy)) + ngli_tex3d(d_sampler, p);"
        );
    }

    #[test]
    fn test_comments_inside_arguments() {
        let src = "c = ngl_texvideo(tex0, vec2(0.5 /* ), */, 1.0));";
        let out = preprocess(src, &gles()).unwrap();
        assert_eq!(
            out.text,
            "c = (ngli_tex2d(tex0_sampler, vec2(0.5 /* ), */, 1.0)));"
        );
    }

    #[test]
    fn test_skip_arg_ignores_line_comments() {
        let src = "a // , )
, b";
        assert_eq!(skip_arg(src, 0).unwrap(), src.find("
,").unwrap() + 1);
    }

    #[test]
    fn test_malformed_calls() {
        let cases = [
            "c = ngl_tex2d;",
            "c = ngl_tex2d(tex0",
            "c = ngl_texvideo(tex0);",
            "c = ngl_texvideo(tex0, uv, 1.0);",
            "c = ngl_tex2d(tex0 /* , uv);",
            "c = ngl_tex2d(, uv);",
            "c = ngl_tex2d(tex0, uv;",
            "c = ngl_texlod(tex0, uv, 0.0",
            "c = ngl_tex2d(tex0, ngl_tex2d(tex1, uv);",
        ];
        for src in cases {
            let err = preprocess(src, &gles()).unwrap_err();
            assert!(
                matches!(err, GraphicsError::InvalidArgument(_)),
                "{src}: {err:?}"
            );
        }
    }

    #[test]
    fn test_extra_arguments_are_kept() {
        let out = preprocess("c = ngl_texlod(tex0, uv, /* lod ) */ 0.0);", &gles()).unwrap();
        assert_eq!(out.text, "c = ngli_texlod(tex0_sampler, uv, /* lod ) */ 0.0);");
    }

    #[test]
    fn test_text_without_calls_is_unchanged() {
        let src = "void main() { ngl_out_color = vec4(1.0); }";
        let out = preprocess(src, &gles()).unwrap();
        assert_eq!(out.text, src);
        assert_eq!(out.scanned, 0);
    }
}
