//! Splits document text into overlapping, bounded-length chunks.
//!
//! Lengths are measured in characters so cuts never land inside a UTF-8
//! sequence. Consecutive chunks share `overlap` trailing/leading characters,
//! so stitching chunks back together while trimming overlaps reconstructs
//! the original text exactly.

use uuid::Uuid;

use crate::domain::entities::{DocumentChunk, SourceRef};

/// How far below the hard limit we look for a natural boundary before
/// giving up and cutting mid-word.
fn lookback_window(max_chars: usize) -> usize {
    (max_chars / 4).max(1)
}

/// Splits `text` into chunks of at most `max_chars` characters, consecutive
/// chunks overlapping by `overlap` characters (the last chunk may be
/// shorter). Cut points prefer a paragraph break, then a sentence end, then
/// a word boundary, falling back to a hard cut at `max_chars` when no
/// boundary exists within the lookback window.
///
/// Requires `overlap < max_chars`; callers validate via their config.
pub fn chunk_text(
    document_id: Uuid,
    text: &str,
    max_chars: usize,
    overlap: usize,
    source: &SourceRef,
) -> Vec<DocumentChunk> {
    debug_assert!(overlap < max_chars);

    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut chunk_index = 0;

    loop {
        let hard_end = (start + max_chars).min(chars.len());
        let end = if hard_end == chars.len() {
            hard_end
        } else {
            pick_cut(&chars, start, hard_end, overlap, max_chars)
        };

        let content: String = chars[start..end].iter().collect();
        chunks.push(DocumentChunk::new(
            document_id,
            content,
            chunk_index,
            source.clone(),
        ));
        chunk_index += 1;

        if end == chars.len() {
            break;
        }
        start = end - overlap;
    }

    chunks
}

/// Picks the cut position for a chunk starting at `start` whose hard limit
/// is `hard_end`. A boundary cut is only taken if it leaves the next chunk
/// strictly past the overlap region, so the walk always makes progress.
fn pick_cut(
    chars: &[char],
    start: usize,
    hard_end: usize,
    overlap: usize,
    max_chars: usize,
) -> usize {
    let floor = (start + overlap + 1).max(hard_end.saturating_sub(lookback_window(max_chars)));
    if floor >= hard_end {
        return hard_end;
    }

    // Cut after a blank line, after a sentence terminator, or after any
    // whitespace, in that order of preference. Positions scan backwards so
    // the chunk stays as full as the boundary allows.
    for boundary in [is_paragraph_cut, is_sentence_cut, is_word_cut] {
        for pos in (floor..=hard_end).rev() {
            if boundary(chars, pos) {
                return pos;
            }
        }
    }

    hard_end
}

fn is_paragraph_cut(chars: &[char], pos: usize) -> bool {
    pos >= 2 && chars[pos - 1] == '\n' && chars[pos - 2] == '\n'
}

fn is_sentence_cut(chars: &[char], pos: usize) -> bool {
    pos >= 2
        && chars[pos - 1].is_whitespace()
        && matches!(chars[pos - 2], '.' | '!' | '?')
}

fn is_word_cut(chars: &[char], pos: usize) -> bool {
    pos >= 1 && chars[pos - 1].is_whitespace()
}

/// Reassembles the original text from a chunk sequence produced with the
/// given overlap. Inverse of [`chunk_text`].
pub fn stitch(chunks: &[DocumentChunk], overlap: usize) -> String {
    let mut out = String::new();
    for (i, chunk) in chunks.iter().enumerate() {
        if i == 0 {
            out.push_str(&chunk.content);
        } else {
            out.extend(chunk.content.chars().skip(overlap));
        }
    }
    out
}
