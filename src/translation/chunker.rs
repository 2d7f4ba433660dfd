/*!
 * Token-bounded chunking of extracted lines.
 *
 * Lines are grouped, in order, into chunks whose token count stays within
 * `max_tokens`. The count of a chunk is the sum of its lines plus one
 * separator per join. A line is never split: a line that on its own reaches
 * the limit becomes a chunk by itself. Chunks are produced lazily, one
 * `next()` at a time, with exactly one token count per line.
 */

use std::ops::Range;

use crate::tokenizer::TokenCounter;

/// Separator placed between the lines of one chunk
pub const CHUNK_SEPARATOR: &str = ", ";

/// Lazy iterator over chunk boundaries as line index ranges
///
/// Every yielded range is non-empty, ranges are contiguous and together cover
/// all lines exactly once.
pub struct ChunkBoundaries<'a, S, C: ?Sized> {
    lines: &'a [S],
    counter: &'a C,
    max_tokens: usize,
    /// Tokens charged for each separator between two lines
    separator_tokens: usize,
    /// Next line to count
    cursor: usize,
    /// First line not yet emitted
    start: usize,
    /// Tokens of lines `start..cursor` and the separators between them
    running: usize,
    /// Second range produced by the same line, emitted on the next call
    queued: Option<Range<usize>>,
}

impl<'a, S, C> ChunkBoundaries<'a, S, C>
where
    S: AsRef<str>,
    C: TokenCounter + ?Sized,
{
    /// Create a boundary iterator over `lines`
    pub fn new(lines: &'a [S], max_tokens: usize, counter: &'a C) -> Self {
        Self {
            lines,
            counter,
            max_tokens,
            separator_tokens: counter.count_tokens(CHUNK_SEPARATOR),
            cursor: 0,
            start: 0,
            running: 0,
            queued: None,
        }
    }

    /// Advance over one line, returning up to two closed ranges
    fn step(&mut self) -> (Option<Range<usize>>, Option<Range<usize>>) {
        let i = self.cursor;
        self.cursor += 1;
        let is_last = self.cursor == self.lines.len();
        let tokens = self.counter.count_tokens(self.lines[i].as_ref());

        if tokens >= self.max_tokens {
            // Oversized line: flush what is pending, then the line alone
            let pending = self.take_until(i);
            self.start = i + 1;
            self.running = 0;
            return (pending, Some(i..i + 1));
        }

        let joined = if i > self.start { self.separator_tokens } else { 0 };
        self.running += joined + tokens;
        let mut closed = None;
        if self.running > self.max_tokens {
            // Line `i` does not fit: it opens the next chunk
            closed = self.take_until(i);
            self.start = i;
            self.running = tokens;
        }

        if is_last {
            let tail = self.take_until(i + 1);
            return match closed {
                Some(range) => (Some(range), tail),
                None => (tail, None),
            };
        }

        (closed, None)
    }

    /// Close lines `start..end`, skipping empty ranges
    fn take_until(&mut self, end: usize) -> Option<Range<usize>> {
        let range = self.start..end;
        self.start = end;
        self.running = 0;
        if range.is_empty() { None } else { Some(range) }
    }
}

impl<S, C> Iterator for ChunkBoundaries<'_, S, C>
where
    S: AsRef<str>,
    C: TokenCounter + ?Sized,
{
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(range) = self.queued.take() {
            return Some(range);
        }

        while self.cursor < self.lines.len() {
            match self.step() {
                (Some(first), second) => {
                    self.queued = second;
                    return Some(first);
                }
                (None, Some(only)) => return Some(only),
                (None, None) => {}
            }
        }

        None
    }
}

/// Lazy iterator over joined chunk texts
pub struct Chunks<'a, S, C: ?Sized> {
    boundaries: ChunkBoundaries<'a, S, C>,
}

impl<S, C> Iterator for Chunks<'_, S, C>
where
    S: AsRef<str>,
    C: TokenCounter + ?Sized,
{
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let range = self.boundaries.next()?;
        Some(join_lines(&self.boundaries.lines[range]))
    }
}

/// Split `lines` into token-bounded chunks
///
/// Each chunk is its lines joined with [`CHUNK_SEPARATOR`]. The lines plus
/// the separators between them stay at or below `max_tokens`, unless the
/// chunk is a single line whose own count reaches the limit.
pub fn chunk_lines<'a, S, C>(lines: &'a [S], max_tokens: usize, counter: &'a C) -> Chunks<'a, S, C>
where
    S: AsRef<str>,
    C: TokenCounter + ?Sized,
{
    Chunks {
        boundaries: ChunkBoundaries::new(lines, max_tokens, counter),
    }
}

/// Join a run of lines with the chunk separator
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let parts: Vec<&str> = lines.iter().map(|line| line.as_ref()).collect();
    parts.join(CHUNK_SEPARATOR)
}
