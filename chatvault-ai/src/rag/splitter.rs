//! Recursive character splitting of extracted document text.
//!
//! Splits on the coarsest separator that appears in the text (paragraphs,
//! then lines, then words, then raw characters), merging pieces back into
//! chunks of at most `chunk_size` characters with `chunk_overlap` characters
//! carried between consecutive chunks.

const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

impl RecursiveSplitter {
    /// `chunk_overlap` must be smaller than `chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        assert!(chunk_overlap < chunk_size, "overlap must be below chunk size");
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        let mut chunks = self.split_text(text, &SEPARATORS);
        chunks.retain(|c| !c.trim().is_empty());
        chunks
    }

    fn split_text(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let (sep_idx, sep) = separators
            .iter()
            .enumerate()
            .find(|(_, s)| s.is_empty() || text.contains(**s))
            .map(|(i, s)| (i, *s))
            .unwrap_or((separators.len() - 1, ""));
        let remaining = &separators[sep_idx + 1..];

        if sep.is_empty() {
            return self.hard_split(text);
        }

        let mut chunks = Vec::new();
        let mut pending: Vec<&str> = Vec::new();
        for piece in text.split(sep) {
            if char_len(piece) > self.chunk_size {
                // Flush what fits so far, then descend with finer separators.
                if !pending.is_empty() {
                    chunks.extend(self.merge(&pending, sep));
                    pending.clear();
                }
                chunks.extend(self.split_text(piece, remaining));
            } else {
                pending.push(piece);
            }
        }
        if !pending.is_empty() {
            chunks.extend(self.merge(&pending, sep));
        }
        chunks
    }

    /// Greedily pack pieces into chunks, retaining a tail of up to
    /// `chunk_overlap` characters when a chunk is emitted.
    fn merge(&self, pieces: &[&str], sep: &str) -> Vec<String> {
        let sep_len = char_len(sep);
        let mut chunks: Vec<String> = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);
            let join_cost = if current.is_empty() { 0 } else { sep_len };
            if total + len + join_cost > self.chunk_size && !current.is_empty() {
                chunks.push(current.join(sep));
                while total > self.chunk_overlap
                    || (total + len + if current.is_empty() { 0 } else { sep_len } > self.chunk_size
                        && total > 0)
                {
                    let dec = char_len(current[0]) + if current.len() > 1 { sep_len } else { 0 };
                    total = total.saturating_sub(dec);
                    current.remove(0);
                    if current.is_empty() {
                        break;
                    }
                }
            }
            total += len + if current.is_empty() { 0 } else { sep_len };
            current.push(piece);
        }

        if !current.is_empty() {
            chunks.push(current.join(sep));
        }
        chunks
    }

    /// Terminal fallback: fixed-size character windows with overlap.
    fn hard_split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() <= self.chunk_size {
            return vec![text.to_string()];
        }
        let step = self.chunk_size - self.chunk_overlap;
        let mut out = Vec::new();
        let mut start = 0;
        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            out.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        let splitter = RecursiveSplitter::new(100, 20);
        let chunks = splitter.split("just a short sentence");
        assert_eq!(chunks, vec!["just a short sentence".to_string()]);
    }

    #[test]
    fn chunks_respect_size_bound() {
        let splitter = RecursiveSplitter::new(50, 10);
        let text = "one two three four five six seven eight nine ten eleven twelve \
                    thirteen fourteen fifteen sixteen seventeen eighteen";
        for chunk in splitter.split(text) {
            assert!(chunk.chars().count() <= 50, "oversized chunk: {:?}", chunk);
        }
    }

    #[test]
    fn paragraph_separator_preferred() {
        let splitter = RecursiveSplitter::new(30, 5);
        let text = "first paragraph here\n\nsecond paragraph here";
        let chunks = splitter.split(text);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "first paragraph here");
        assert_eq!(chunks[1], "second paragraph here");
    }

    #[test]
    fn consecutive_chunks_overlap() {
        let splitter = RecursiveSplitter::new(20, 8);
        let text = "aaa bbb ccc ddd eee fff ggg hhh";
        let chunks = splitter.split(text);
        assert!(chunks.len() >= 2);
        // The tail of each chunk reappears at the start of the next one.
        for pair in chunks.windows(2) {
            let tail_word = pair[0].split(' ').next_back().unwrap();
            assert!(
                pair[1].contains(tail_word),
                "no overlap between {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn no_words_are_lost() {
        let splitter = RecursiveSplitter::new(25, 5);
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        let joined = splitter.split(text).join(" ");
        for word in text.split(' ') {
            assert!(joined.contains(word), "lost word {:?}", word);
        }
    }

    #[test]
    fn unbroken_text_hard_splits_with_overlap() {
        let splitter = RecursiveSplitter::new(10, 3);
        let text = "abcdefghijklmnopqrstuvwxyz";
        let chunks = splitter.split(text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 10);
        }
        // step = 7: second window starts at 'h'
        assert!(chunks[0].starts_with("abcdefghij"));
        assert!(chunks[1].starts_with("hij"));
    }
}
