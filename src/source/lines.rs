//! Line lookup by character position.

/// Character positions where each line starts.
///
/// Line breaks are LF, CR, CRLF (one break), NEL, LS and PS.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut starts = vec![0];
        let mut chars = text.chars().enumerate().peekable();

        while let Some((position, c)) = chars.next() {
            match c {
                '\r' => {
                    if let Some(&(next, '\n')) = chars.peek() {
                        chars.next();
                        starts.push(next + 1);
                    } else {
                        starts.push(position + 1);
                    }
                }
                '\n' | '\u{85}' | '\u{2028}' | '\u{2029}' => starts.push(position + 1),
                _ => {}
            }
        }

        Self { starts }
    }

    /// 1-based line containing `position`.
    pub fn line_number(&self, position: usize) -> usize {
        self.starts.partition_point(|&start| start <= position)
    }

    /// 1-based (line, column) of `position`, columns counted in characters.
    pub fn location(&self, position: usize) -> (usize, usize) {
        let line = self.line_number(position);
        (line, position - self.starts[line - 1] + 1)
    }

    #[inline]
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }
}
