//! # Text Chunking
//!
//! Splits raw text into overlapping fixed-size windows for embedding.
//! The chunker is a pure function: the same inputs always produce the
//! same sequence of windows.

/// The default target size for a single text chunk, in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// The default character overlap shared between consecutive chunks.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Splits `text` into overlapping windows of at most `size` characters.
///
/// A cursor starts at zero; each step emits the window
/// `text[cursor..cursor + size]` (clamped to the text length). When the
/// emitted window reaches the end of the text the loop stops, otherwise
/// the cursor advances by `size - overlap`.
///
/// Two degenerate inputs are policy-defaulted rather than allowed to
/// misbehave: a `size` of zero falls back to [`DEFAULT_CHUNK_SIZE`], and
/// an `overlap >= size` forces the cursor to the end of the current
/// window so the loop always terminates.
///
/// Windows are counted in `char`s, so multi-byte text never splits
/// inside a code point. Empty or whitespace-only input yields an empty
/// vector.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let size = if size == 0 { DEFAULT_CHUNK_SIZE } else { size };

    let chars: Vec<char> = trimmed.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = std::cmp::min(start + size, chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        // An overlap as large as the window would stall the cursor.
        start = if overlap >= size { end } else { end - overlap };
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_windows() {
        assert_eq!(chunk_text("abcdefghij", 4, 1), vec!["abcd", "defg", "ghij"]);
    }

    #[test]
    fn test_exact_windows_without_overlap() {
        assert_eq!(chunk_text("hello world", 5, 0), vec!["hello", " worl", "d"]);
    }

    #[test]
    fn test_degenerate_overlap_terminates() {
        // overlap >= size must not stall the cursor.
        assert_eq!(chunk_text("abcdef", 3, 5), vec!["abc", "def"]);
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert!(chunk_text("", 4, 1).is_empty());
        assert!(chunk_text("   \n\t ", 4, 1).is_empty());
    }

    #[test]
    fn test_zero_size_uses_default() {
        let text = "a".repeat(DEFAULT_CHUNK_SIZE + 1);
        let chunks = chunk_text(&text, 0, 0);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn test_windows_cover_the_whole_text() {
        let text = "The quick brown fox jumps over the lazy dog";
        let size = 7;
        let overlap = 3;
        let chunks = chunk_text(text, size, overlap);

        // Reassemble by dropping each successor's leading overlap.
        let mut rebuilt = chunks[0].clone();
        for chunk in &chunks[1..] {
            rebuilt.push_str(&chunk.chars().skip(overlap).collect::<String>());
        }
        assert_eq!(rebuilt, text);
        assert!(text.ends_with(chunks.last().unwrap().as_str()));
    }

    #[test]
    fn test_multibyte_text_splits_on_char_boundaries() {
        let chunks = chunk_text("çğıöşü", 4, 1);
        assert_eq!(chunks, vec!["çğıö", "öşü"]);
    }

    #[test]
    fn test_single_window_when_text_fits() {
        assert_eq!(chunk_text("short", 100, 10), vec!["short"]);
    }
}
