//! Caches the byte offsets of all line breaks of a file, which allows us to
//! reconstruct the row and column of a byte offset in O(log N). Row and
//! column are only requested for diagnostics and dumps.
//!
//! ```
//! use asciifile::LineNumberCache;
//!
//! let input = "ab\nc\n\nd";
//! let linebreaks = input
//!     .char_indices()
//!     .filter(|(_, chr)| *chr == '\n')
//!     .map(|(offset, _)| offset)
//!     .collect();
//! let cache = LineNumberCache::new(linebreaks);
//!
//! let actual: Vec<_> = input
//!     .char_indices()
//!     .map(|(offset, chr)| (chr, cache.row_and_column(offset)))
//!     .collect();
//!
//! let expected = vec![
//!     ('a', (0, 0)),
//!     ('b', (0, 1)),
//!     ('\n', (0, 2)),
//!     ('c', (1, 0)),
//!     ('\n', (1, 1)),
//!     ('\n', (2, 0)),
//!     ('d', (3, 0)),
//! ];
//!
//! assert_eq!(actual, expected);
//! ```
#[derive(Debug)]
pub struct LineNumberCache {
    /// sorted byte offsets of all `\n` characters. A newline belongs to the
    /// line it terminates.
    linebreaks: Vec<usize>,
}

impl LineNumberCache {
    pub fn new(linebreaks: Vec<usize>) -> Self {
        debug_assert!(linebreaks.windows(2).all(|w| w[0] < w[1]));
        Self { linebreaks }
    }

    /// Zero based row of `byte_offset`.
    pub fn row(&self, byte_offset: usize) -> usize {
        // `Err(row)`: number of linebreaks strictly before the offset.
        // `Ok(row)`: the offset is a linebreak, which ends row `row`.
        match self.linebreaks.binary_search(&byte_offset) {
            Ok(row) | Err(row) => row,
        }
    }

    /// Identical to `row() + 1`.
    pub fn line_number(&self, byte_offset: usize) -> usize {
        self.row(byte_offset) + 1
    }

    pub fn column(&self, byte_offset: usize) -> usize {
        self.row_and_column(byte_offset).1
    }

    pub fn row_and_column(&self, byte_offset: usize) -> (usize, usize) {
        let row = self.row(byte_offset);
        let col = if row == 0 {
            byte_offset
        } else {
            byte_offset - (self.linebreaks[row - 1] + 1)
        };

        (row, col)
    }
}
