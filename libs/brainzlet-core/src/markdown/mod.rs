//! Inline markdown and LaTeX rendering for card text.

pub mod blocks;
pub mod math;
pub mod render;
pub mod segment;

pub use blocks::{classify_lines, render_document, Block, Line};
pub use math::{MathMode, MathRenderer, UnicodeMath};
pub use render::{render_inline, render_segments, Inline, RenderMode};
pub use segment::{segment, Segment, SegmentKind};
