//! Read-only text access used by the caret line computation.

use crate::Buffer;
use ropey::Rope;

/// A character sequence the view can query without owning it.
///
/// Implementations must agree with `'\n'` counting: `newlines_before(n)` is
/// the number of `'\n'` characters among the first `n` chars, with `n` clamped
/// to the text length.
pub trait TextSource {
    fn newlines_before(&self, offset: usize) -> usize;
}

impl TextSource for str {
    fn newlines_before(&self, offset: usize) -> usize {
        self.chars().take(offset).filter(|&c| c == '\n').count()
    }
}

impl TextSource for String {
    fn newlines_before(&self, offset: usize) -> usize {
        self.as_str().newlines_before(offset)
    }
}

// With ropey's CR / unicode line break features disabled, `char_to_line`
// counts exactly the LF characters before the offset.
impl TextSource for Rope {
    fn newlines_before(&self, offset: usize) -> usize {
        self.char_to_line(offset.min(self.len_chars()))
    }
}

impl TextSource for Buffer {
    fn newlines_before(&self, offset: usize) -> usize {
        self.rope().newlines_before(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_counts_only_before_offset() {
        let t = "a\nb\nc";
        assert_eq!(t.newlines_before(0), 0);
        assert_eq!(t.newlines_before(1), 0);
        assert_eq!(t.newlines_before(2), 1);
        assert_eq!(t.newlines_before(3), 1);
        assert_eq!(t.newlines_before(4), 2);
        assert_eq!(t.newlines_before(99), 2);
    }

    #[test]
    fn rope_matches_str() {
        let t = "x\n\nyz\n";
        let rope = Rope::from_str(t);
        for off in 0..=t.len() + 2 {
            assert_eq!(rope.newlines_before(off), t.newlines_before(off), "offset {off}");
        }
    }

    #[test]
    fn offsets_past_the_end_clamp_to_length() {
        let buffer = Buffer::from_str("t", "one\ntwo\n");
        let text = String::from("one\ntwo\n");
        for source in [&buffer as &dyn TextSource, &text, buffer.rope()] {
            assert_eq!(source.newlines_before(usize::MAX), 2);
        }
    }

    #[test]
    fn carriage_return_is_not_a_break() {
        let t = "a\rb\n";
        let rope = Rope::from_str(t);
        assert_eq!(rope.newlines_before(3), 0);
        assert_eq!(rope.newlines_before(4), 1);
    }
}
