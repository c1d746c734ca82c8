//! Text segmenter.
//!
//! Splits raw card text into an ordered, non-overlapping list of typed
//! segments: block math (`$$…$$`), inline math (`$…$`), inline code,
//! bold, italic and plain text. The segments always cover the input
//! exactly, so concatenating every [`Segment::source`] gives back the
//! original string.
//!
//! Resolution happens in two passes. Math is found first and is opaque to
//! everything else. The style pass then runs over each gap between math
//! regions with a fixed priority: code, `**bold**`, `__bold__`, `*italic*`,
//! `_italic_`. A lower-priority match that partially overlaps an accepted
//! one is dropped. One that fully wraps accepted matches is kept and split
//! into fragments around them.

use std::ops::Range;

/// Kind of a text segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    BlockMath,
    InlineMath,
    Bold,
    Italic,
    Code,
    Text,
}

/// A classified slice of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub kind: SegmentKind,
    /// Text inside the delimiters. Math content is trimmed.
    pub content: &'a str,
    /// The exact slice of the input this segment covers.
    pub source: &'a str,
    /// Byte range of `source` in the input.
    pub span: Range<usize>,
}

impl<'a> Segment<'a> {
    fn text(input: &'a str, span: Range<usize>) -> Self {
        let slice = &input[span.clone()];
        Self {
            kind: SegmentKind::Text,
            content: slice,
            source: slice,
            span,
        }
    }
}

/// Split `text` into segments. Never fails; unmatched delimiters stay text.
pub fn segment(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for math in find_math(text) {
        if cursor < math.span.start {
            style_segments(text, cursor..math.span.start, &mut segments);
        }
        cursor = math.span.end;
        segments.push(math);
    }

    if cursor < text.len() {
        style_segments(text, cursor..text.len(), &mut segments);
    }

    segments
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

fn find_from(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| from + p)
}

/// Math pass: block math first, then inline math that does not touch it.
fn find_math(text: &str) -> Vec<Segment<'_>> {
    let bytes = text.as_bytes();

    // `$$…$$`, lazy, may span lines.
    let mut blocks: Vec<Range<usize>> = Vec::new();
    let mut from = 0;
    while let Some(open) = find_from(bytes, b"$$", from) {
        let Some(close) = find_from(bytes, b"$$", open + 2) else {
            break;
        };
        blocks.push(open..close + 2);
        from = close + 2;
    }

    // `$…$`, lazy, single line. Scanning resumes after every match, even
    // one that is dropped for overlapping block math.
    let mut inlines: Vec<Range<usize>> = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }
        let close = bytes[i + 1..]
            .iter()
            .position(|&b| b == b'$' || b == b'\n')
            .map(|p| i + 1 + p)
            .filter(|&p| bytes[p] == b'$');
        match close {
            Some(close) => {
                let range = i..close + 1;
                if !blocks.iter().any(|block| overlaps(block, &range)) {
                    inlines.push(range.clone());
                }
                i = range.end;
            }
            None => i += 1,
        }
    }

    let mut math: Vec<Segment<'_>> = blocks
        .into_iter()
        .map(|span| math_segment(text, span, SegmentKind::BlockMath, 2))
        .chain(
            inlines
                .into_iter()
                .map(|span| math_segment(text, span, SegmentKind::InlineMath, 1)),
        )
        .collect();
    math.sort_by_key(|s| s.span.start);
    math
}

fn math_segment(text: &str, span: Range<usize>, kind: SegmentKind, width: usize) -> Segment<'_> {
    Segment {
        kind,
        content: text[span.start + width..span.end - width].trim(),
        source: &text[span.clone()],
        span,
    }
}

/// A style delimiter pattern: `width` copies of `delim` on each side.
struct StylePattern {
    delim: u8,
    width: usize,
    kind: SegmentKind,
}

/// Scan order doubles as priority.
const STYLE_PATTERNS: [StylePattern; 5] = [
    StylePattern { delim: b'`', width: 1, kind: SegmentKind::Code },
    StylePattern { delim: b'*', width: 2, kind: SegmentKind::Bold },
    StylePattern { delim: b'_', width: 2, kind: SegmentKind::Bold },
    StylePattern { delim: b'*', width: 1, kind: SegmentKind::Italic },
    StylePattern { delim: b'_', width: 1, kind: SegmentKind::Italic },
];

#[derive(Debug, Clone)]
struct StyleMatch {
    kind: SegmentKind,
    span: Range<usize>,
    inner: Range<usize>,
}

impl StyleMatch {
    fn wraps(&self, other: &StyleMatch) -> bool {
        other.span.start >= self.inner.start && other.span.end <= self.inner.end
    }
}

fn run_at(bytes: &[u8], at: usize, delim: u8, width: usize) -> bool {
    at + width <= bytes.len() && bytes[at..at + width].iter().all(|&b| b == delim)
}

/// Leftmost matches of `delim{w} [^delim]+ delim{w}` inside `range`.
///
/// Each candidate is offered to `accept`. Scanning resumes after an
/// accepted match and one byte further after a rejected one, so a rejected
/// opener cannot swallow a later valid span.
fn scan_delimited(
    bytes: &[u8],
    range: Range<usize>,
    pattern: &StylePattern,
    mut accept: impl FnMut(StyleMatch) -> bool,
) {
    let StylePattern { delim, width, kind } = *pattern;
    let end = range.end;
    let mut i = range.start;

    while i + 2 * width < end {
        let inner_start = i + width;
        if !run_at(bytes, i, delim, width) || bytes[inner_start] == delim {
            i += 1;
            continue;
        }
        let close = bytes[inner_start..end]
            .iter()
            .position(|&b| b == delim)
            .map(|p| inner_start + p);
        match close {
            Some(close) if close + width <= end && run_at(bytes, close, delim, width) => {
                let candidate = StyleMatch {
                    kind,
                    span: i..close + width,
                    inner: inner_start..close,
                };
                if accept(candidate) {
                    i = close + width;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
}

/// Style pass over one gap between math regions.
fn style_segments<'a>(text: &'a str, gap: Range<usize>, out: &mut Vec<Segment<'a>>) {
    let bytes = text.as_bytes();
    let mut accepted: Vec<StyleMatch> = Vec::new();

    for pattern in &STYLE_PATTERNS {
        scan_delimited(bytes, gap.clone(), pattern, |candidate| {
            let conflicts = accepted
                .iter()
                .filter(|m| overlaps(&m.span, &candidate.span))
                .any(|m| !candidate.wraps(m));
            if !conflicts {
                accepted.push(candidate);
            }
            !conflicts
        });
    }

    accepted.sort_by_key(|m| m.span.start);
    assemble(text, gap, &accepted, out);
}

/// Number of matches after `matches[0]` that sit inside it.
fn nested_len(matches: &[StyleMatch]) -> usize {
    let outer = &matches[0];
    matches[1..]
        .iter()
        .take_while(|m| m.span.start < outer.span.end)
        .count()
}

/// Emit text gaps and top-level matches of a sorted, laminar match list.
fn assemble<'a>(text: &'a str, range: Range<usize>, matches: &[StyleMatch], out: &mut Vec<Segment<'a>>) {
    let mut cursor = range.start;
    let mut idx = 0;

    while idx < matches.len() {
        let nested = nested_len(&matches[idx..]);
        let m = &matches[idx];
        if cursor < m.span.start {
            out.push(Segment::text(text, cursor..m.span.start));
        }
        emit_match(text, m, &matches[idx + 1..idx + 1 + nested], out);
        cursor = m.span.end;
        idx += 1 + nested;
    }

    if cursor < range.end {
        out.push(Segment::text(text, cursor..range.end));
    }
}

/// Emit one match, splitting it into fragments around nested matches.
fn emit_match<'a>(text: &'a str, m: &StyleMatch, nested: &[StyleMatch], out: &mut Vec<Segment<'a>>) {
    let mut fragment_start = m.span.start;
    let mut content_start = m.inner.start;
    let mut idx = 0;

    while idx < nested.len() {
        let child_nested = nested_len(&nested[idx..]);
        let child = &nested[idx];
        if fragment_start < child.span.start {
            out.push(Segment {
                kind: m.kind,
                content: &text[content_start..child.span.start],
                source: &text[fragment_start..child.span.start],
                span: fragment_start..child.span.start,
            });
        }
        emit_match(text, child, &nested[idx + 1..idx + 1 + child_nested], out);
        fragment_start = child.span.end;
        content_start = child.span.end;
        idx += 1 + child_nested;
    }

    out.push(Segment {
        kind: m.kind,
        content: &text[content_start..m.inner.end],
        source: &text[fragment_start..m.span.end],
        span: fragment_start..m.span.end,
    });
}
