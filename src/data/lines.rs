// =============================================================================
// LINES.RS — Forward-only cursor over the structural lines of a data file
//
// Both file formats are read in a single pass with no backtracking. The only
// lookahead is `peek`, used for optional lines and blocks (e.g. `DECOR`).
// =============================================================================

use super::error::ParseError;

/// Field separator inside structural lines.
pub const FIELD_SEPARATOR: &str = "  ";

/// A significant line together with its 1-based number in the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub number: usize,
    pub text: &'a str,
}

impl<'a> Line<'a> {
    /// Split on the double-space field separator.
    pub fn fields(&self) -> Vec<&'a str> {
        self.text.split(FIELD_SEPARATOR).collect()
    }

    /// Parse one field as an integer. Surrounding whitespace is tolerated.
    pub fn int(&self, field: &str, what: &str) -> Result<i32, ParseError> {
        field.trim().parse().map_err(|_| {
            ParseError::format(self.number, format!("{what}: {field:?} is not an integer"))
        })
    }
}

/// How a raw line is cleaned before it is considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trim {
    /// Only the line terminator is removed. Level files use this because a
    /// space inside a layout row is itself a tile symbol.
    Terminator,
    /// Leading and trailing whitespace is removed.
    Whitespace,
}

/// Lines starting with `#` and empty lines are dropped up front; everything
/// else is consumed strictly in file order.
#[derive(Debug)]
pub struct LineCursor<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
    /// Number of the last physical line, reported for unexpected end of file.
    last_line: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(source: &'a str, trim: Trim) -> Self {
        let mut last_line = 0;
        let mut lines = Vec::new();

        for (index, raw) in source.lines().enumerate() {
            last_line = index + 1;
            if raw.starts_with('#') {
                continue;
            }
            let text = match trim {
                Trim::Terminator => raw,
                Trim::Whitespace => raw.trim(),
            };
            if text.is_empty() {
                continue;
            }
            lines.push(Line { number: index + 1, text });
        }

        Self { lines, pos: 0, last_line: last_line.max(1) }
    }

    pub fn peek(&self) -> Option<Line<'a>> {
        self.lines.get(self.pos).copied()
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.lines.len()
    }

    /// Consume the next line, failing with `expected` in the message at EOF.
    pub fn next_line(&mut self, expected: &str) -> Result<Line<'a>, ParseError> {
        match self.lines.get(self.pos).copied() {
            Some(line) => {
                self.pos += 1;
                Ok(line)
            }
            None => Err(ParseError::format(
                self.last_line,
                format!("unexpected end of file, expected {expected}"),
            )),
        }
    }

    /// Consume the next line and require it to equal `literal` exactly.
    pub fn expect(&mut self, literal: &str, reason: &str) -> Result<Line<'a>, ParseError> {
        let line = self.next_line(&format!("{literal:?}"))?;
        if line.text != literal {
            return Err(ParseError::format(line.number, reason));
        }
        Ok(line)
    }

    /// True when the next line equals `literal`. Nothing is consumed.
    pub fn peek_is(&self, literal: &str) -> bool {
        self.peek().is_some_and(|line| line.text == literal)
    }

    /// True when the first space-separated token of the next line is `keyword`.
    pub fn peek_keyword(&self, keyword: &str) -> bool {
        self.peek()
            .is_some_and(|line| line.text.split(' ').next() == Some(keyword))
    }

    /// Consume a mandatory `begin` ... `end` block and return its interior lines.
    pub fn block(
        &mut self,
        begin: &str,
        end: &str,
        missing: &str,
    ) -> Result<Vec<Line<'a>>, ParseError> {
        let opener = self.expect(begin, missing)?;
        let mut body = Vec::new();
        loop {
            match self.lines.get(self.pos).copied() {
                Some(line) => {
                    self.pos += 1;
                    if line.text == end {
                        return Ok(body);
                    }
                    body.push(line);
                }
                None => {
                    return Err(ParseError::format(
                        self.last_line,
                        format!("block opened on line {} is never closed by {end:?}", opener.number),
                    ));
                }
            }
        }
    }

    /// Consume a `begin` ... `end` block only if the next line opens it.
    pub fn optional_block(
        &mut self,
        begin: &str,
        end: &str,
    ) -> Result<Option<Vec<Line<'a>>>, ParseError> {
        if !self.peek_is(begin) {
            return Ok(None);
        }
        self.block(begin, end, "").map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comments_and_blank_lines_but_keeps_numbers() {
        let src = "# header comment\n\nFIRST\n# more\nSECOND\n";
        let mut cursor = LineCursor::new(src, Trim::Whitespace);
        assert_eq!(cursor.next_line("a").unwrap(), Line { number: 3, text: "FIRST" });
        assert_eq!(cursor.next_line("b").unwrap(), Line { number: 5, text: "SECOND" });
        assert!(cursor.is_at_end());
    }

    #[test]
    fn terminator_mode_keeps_whitespace_rows() {
        let src = "A\r\n   \nB\n";
        let mut cursor = LineCursor::new(src, Trim::Terminator);
        assert_eq!(cursor.next_line("a").unwrap().text, "A");
        assert_eq!(cursor.next_line("row").unwrap().text, "   ");
        assert_eq!(cursor.next_line("b").unwrap().text, "B");
    }

    #[test]
    fn whitespace_mode_drops_whitespace_rows() {
        let mut cursor = LineCursor::new("A\n   \nB", Trim::Whitespace);
        cursor.next_line("a").unwrap();
        assert_eq!(cursor.next_line("b").unwrap().text, "B");
    }

    #[test]
    fn peek_does_not_consume() {
        let mut cursor = LineCursor::new("DECOR x\nSIZE  1  1", Trim::Terminator);
        assert!(cursor.peek_keyword("DECOR"));
        assert!(!cursor.peek_keyword("SIZE"));
        assert_eq!(cursor.next_line("decor").unwrap().text, "DECOR x");
        assert!(cursor.peek_keyword("SIZE"));
    }

    #[test]
    fn unexpected_end_reports_last_line() {
        let mut cursor = LineCursor::new("ONLY\n\n", Trim::Whitespace);
        cursor.next_line("x").unwrap();
        let err = cursor.next_line("more").unwrap_err();
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn unclosed_block_is_a_format_error() {
        let mut cursor = LineCursor::new("BEGIN LAYOUT\nXX\nXX", Trim::Terminator);
        let err = cursor.block("BEGIN LAYOUT", "END LAYOUT", "missing").unwrap_err();
        assert!(matches!(err, ParseError::Format { .. }));
    }

    #[test]
    fn optional_block_absent_consumes_nothing() {
        let mut cursor = LineCursor::new("BEGIN ENTITIES\nEND ENTITIES", Trim::Terminator);
        assert_eq!(cursor.optional_block("BEGIN POWERUPS", "END POWERUPS").unwrap(), None);
        assert!(cursor.peek_is("BEGIN ENTITIES"));
    }

    #[test]
    fn fields_split_on_double_space_only() {
        let line = Line { number: 1, text: "X  0  1" };
        assert_eq!(line.fields(), vec!["X", "0", "1"]);
        let single = Line { number: 1, text: "X 0 1" };
        assert_eq!(single.fields(), vec!["X 0 1"]);
    }

    #[test]
    fn int_rejects_garbage() {
        let line = Line { number: 7, text: "" };
        assert_eq!(line.int(" 12 ", "col").unwrap(), 12);
        assert_eq!(line.int("x", "col").unwrap_err().line(), 7);
    }
}
