//! Segment renderer: turns segments into display nodes.

use super::math::{MathMode, MathRenderer};
use super::segment::{segment, Segment, SegmentKind};
use serde::{Deserialize, Serialize};

/// Layout the caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Single-line flow; newlines collapse and math stays inline.
    Inline,
    /// Line breaks kept and `$$…$$` shown as display math.
    #[default]
    Block,
}

/// An inline display node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    Text { text: String },
    LineBreak,
    Strong { text: String },
    Emphasis { text: String },
    Code { text: String },
    Math { mode: MathMode, markup: String },
    /// Math the delegate rejected, shown as its original delimited source.
    MathFallback { source: String, error: String },
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// Render segments in order. Math failures become fallback nodes.
pub fn render_segments(
    segments: &[Segment<'_>],
    mode: RenderMode,
    math: &dyn MathRenderer,
) -> Vec<Inline> {
    let mut nodes = Vec::with_capacity(segments.len());

    for segment in segments {
        match segment.kind {
            SegmentKind::Text => push_text(segment.content, mode, &mut nodes),
            SegmentKind::Bold => push_styled(&mut nodes, segment, |text| Inline::Strong { text }),
            SegmentKind::Italic => push_styled(&mut nodes, segment, |text| Inline::Emphasis { text }),
            SegmentKind::Code => push_styled(&mut nodes, segment, |text| Inline::Code { text }),
            SegmentKind::BlockMath | SegmentKind::InlineMath => {
                nodes.push(render_math(segment, mode, math));
            }
        }
    }

    nodes
}

/// Segment and render `text` in one call.
pub fn render_inline(text: &str, mode: RenderMode, math: &dyn MathRenderer) -> Vec<Inline> {
    render_segments(&segment(text), mode, math)
}

fn push_text(text: &str, mode: RenderMode, nodes: &mut Vec<Inline>) {
    match mode {
        RenderMode::Inline => {
            if !text.is_empty() {
                nodes.push(Inline::text(text.replace('\n', " ")));
            }
        }
        RenderMode::Block => {
            for (idx, line) in text.split('\n').enumerate() {
                if idx > 0 {
                    nodes.push(Inline::LineBreak);
                }
                if !line.is_empty() {
                    nodes.push(Inline::text(line));
                }
            }
        }
    }
}

fn push_styled(nodes: &mut Vec<Inline>, segment: &Segment<'_>, wrap: impl FnOnce(String) -> Inline) {
    // Wrapper fragments around a nested span can be empty.
    if !segment.content.is_empty() {
        nodes.push(wrap(segment.content.to_string()));
    }
}

fn render_math(segment: &Segment<'_>, mode: RenderMode, math: &dyn MathRenderer) -> Inline {
    let math_mode = match (segment.kind, mode) {
        (SegmentKind::BlockMath, RenderMode::Block) => MathMode::Display,
        _ => MathMode::Inline,
    };

    match math.render(segment.content, math_mode) {
        Ok(markup) => Inline::Math {
            mode: math_mode,
            markup,
        },
        Err(error) => {
            tracing::warn!(%error, source = segment.source, "math parse error, showing source text");
            Inline::MathFallback {
                source: segment.source.to_string(),
                error: error.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MathError;
    use crate::markdown::math::UnicodeMath;
    use pretty_assertions::assert_eq;

    fn echo(tex: &str, _mode: MathMode) -> Result<String, MathError> {
        Ok(tex.to_string())
    }

    #[test]
    fn empty_text_renders_nothing() {
        assert!(render_inline("", RenderMode::Block, &echo).is_empty());
    }

    #[test]
    fn plain_text_is_passed_through() {
        assert_eq!(
            render_inline("just words", RenderMode::Block, &echo),
            vec![Inline::text("just words")]
        );
    }

    #[test]
    fn newlines_become_line_breaks() {
        assert_eq!(
            render_inline("one\ntwo\n\nthree", RenderMode::Block, &echo),
            vec![
                Inline::text("one"),
                Inline::LineBreak,
                Inline::text("two"),
                Inline::LineBreak,
                Inline::LineBreak,
                Inline::text("three"),
            ]
        );
    }

    #[test]
    fn inline_mode_collapses_newlines() {
        assert_eq!(
            render_inline("one\ntwo", RenderMode::Inline, &echo),
            vec![Inline::text("one two")]
        );
    }

    #[test]
    fn styles_map_to_nodes() {
        assert_eq!(
            render_inline("**b** *i* `c`", RenderMode::Block, &echo),
            vec![
                Inline::Strong { text: "b".into() },
                Inline::text(" "),
                Inline::Emphasis { text: "i".into() },
                Inline::text(" "),
                Inline::Code { text: "c".into() },
            ]
        );
    }

    #[test]
    fn block_math_is_display_only_in_block_mode() {
        let block = render_inline("$$x$$", RenderMode::Block, &echo);
        assert_eq!(
            block,
            vec![Inline::Math {
                mode: MathMode::Display,
                markup: "x".into()
            }]
        );

        let inline = render_inline("$$x$$", RenderMode::Inline, &echo);
        assert_eq!(
            inline,
            vec![Inline::Math {
                mode: MathMode::Inline,
                markup: "x".into()
            }]
        );
    }

    #[test]
    fn rejected_math_falls_back_to_source() {
        let nodes = render_inline(r"see $\frac{$ here", RenderMode::Block, &UnicodeMath);
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0], Inline::text("see "));
        match &nodes[1] {
            Inline::MathFallback { source, .. } => assert_eq!(source, r"$\frac{$"),
            other => panic!("expected fallback, got {other:?}"),
        }
        assert_eq!(nodes[2], Inline::text(" here"));
    }

    #[test]
    fn one_bad_expression_does_not_affect_others() {
        let reject_x = |tex: &str, _mode: MathMode| -> Result<String, MathError> {
            if tex == "x" {
                Err(MathError::TrailingBackslash)
            } else {
                Ok(tex.to_string())
            }
        };
        let nodes = render_inline("$x$ and $y$", RenderMode::Block, &reject_x);
        assert!(matches!(nodes[0], Inline::MathFallback { .. }));
        assert_eq!(
            nodes[2],
            Inline::Math {
                mode: MathMode::Inline,
                markup: "y".into()
            }
        );
    }

    #[test]
    fn split_bold_skips_empty_fragments() {
        assert_eq!(
            render_inline("**`c`**", RenderMode::Block, &echo),
            vec![Inline::Code { text: "c".into() }]
        );
    }
}
