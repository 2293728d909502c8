//! PostCSS-style CSS parser
//!
//! Produces a `Root` holding at-rules, rules, declarations and comments,
//! each with a 1-based span. Block contents are classified by their
//! terminator: `{` opens a rule, `;` or `}` ends a declaration.

use crate::{ForeignError, ForeignKind, ForeignNode, SourcePoint, SourceSpan};

/// Parse a stylesheet
pub fn parse(css: &str) -> Result<ForeignNode, ForeignError> {
    let mut parser = CssParser::new(css);
    let nodes = parser.parse_block_contents(None)?;

    let mut root = ForeignNode::new(ForeignKind::Root, None);
    root.nodes = nodes;
    tracing::debug!("Parsed {} top-level nodes", root.nodes.len());
    Ok(root)
}

/// Cursor over the input
#[derive(Clone)]
struct CssParser<'a> {
    input: &'a str,
    pos: usize,
    line: u32,
    column: u32,
    /// Last non-whitespace character consumed
    last_visible: Option<SourcePoint>,
}

impl<'a> CssParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
            last_visible: None,
        }
    }

    fn current(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn point(&self) -> SourcePoint {
        SourcePoint {
            line: self.line,
            column: self.column,
            offset: self.pos,
        }
    }

    fn advance(&mut self) {
        if let Some(c) = self.current() {
            if !c.is_whitespace() {
                self.last_visible = Some(self.point());
            }
            self.pos += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += c.len_utf8() as u32;
            }
        }
    }

    fn advance_to(&mut self, offset: usize) {
        while self.pos < offset && self.current().is_some() {
            self.advance();
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        self.input[self.pos..].starts_with(s)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn skip_comment(&mut self) -> Result<(), ForeignError> {
        let start = self.point();
        self.advance(); // /
        self.advance(); // *
        while self.current().is_some() {
            if self.starts_with("*/") {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }
        Err(ForeignError::UnclosedComment {
            line: start.line,
            column: start.column,
        })
    }

    fn skip_string(&mut self) -> Result<(), ForeignError> {
        let start = self.point();
        let Some(quote) = self.current() else {
            return Ok(());
        };
        self.advance(); // opening quote
        while let Some(c) = self.current() {
            self.advance();
            if c == quote {
                return Ok(());
            } else if c == '\\' {
                self.advance();
            }
        }
        Err(ForeignError::UnclosedString {
            line: start.line,
            column: start.column,
        })
    }

    fn consume_ident(&mut self) -> String {
        let mut result = String::new();
        while let Some(c) = self.current() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                result.push(c);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Offset and kind of the next `{`, `;` or `}` outside strings,
    /// comments and parentheses. Does not move the cursor.
    fn find_terminator(&self) -> Result<(usize, Option<char>), ForeignError> {
        let mut ahead = self.clone();
        let mut parens = 0usize;
        while let Some(c) = ahead.current() {
            match c {
                '"' | '\'' => {
                    ahead.skip_string()?;
                    continue;
                }
                '/' if ahead.starts_with("/*") => {
                    ahead.skip_comment()?;
                    continue;
                }
                '(' => parens += 1,
                ')' => parens = parens.saturating_sub(1),
                '{' | ';' | '}' if parens == 0 => return Ok((ahead.pos, Some(c))),
                _ => {}
            }
            ahead.advance();
        }
        Ok((ahead.pos, None))
    }

    /// Parse nodes up to the closing `}` of the block opened at `open`,
    /// or to the end of input at the top level. The `}` is left in place.
    fn parse_block_contents(&mut self, open: Option<SourcePoint>) -> Result<Vec<ForeignNode>, ForeignError> {
        let mut nodes = Vec::new();
        loop {
            self.skip_whitespace();
            match self.current() {
                None => {
                    return match open {
                        Some(open) => Err(ForeignError::UnclosedBlock {
                            line: open.line,
                            column: open.column,
                        }),
                        None => Ok(nodes),
                    };
                }
                Some('}') => {
                    if open.is_some() {
                        return Ok(nodes);
                    }
                    return Err(ForeignError::UnexpectedClose {
                        line: self.line,
                        column: self.column,
                    });
                }
                Some(';') => self.advance(),
                Some('/') if self.starts_with("/*") => nodes.push(self.parse_comment()?),
                Some('@') => nodes.push(self.parse_at_rule()?),
                Some(_) => {
                    if let Some(node) = self.parse_rule_or_decl()? {
                        nodes.push(node);
                    }
                }
            }
        }
    }

    fn parse_comment(&mut self) -> Result<ForeignNode, ForeignError> {
        let start = self.point();
        self.skip_comment()?;
        let text = self.input[start.offset + 2..self.pos - 2].trim().to_string();
        let span = self.span_to_last(start);
        Ok(ForeignNode::new(ForeignKind::Comment { text }, span))
    }

    fn parse_at_rule(&mut self) -> Result<ForeignNode, ForeignError> {
        let start = self.point();
        self.advance(); // @
        let name = self.consume_ident();

        let params_start = self.pos;
        let (stop, terminator) = self.find_terminator()?;
        let params = self.input[params_start..stop].trim().to_string();
        self.advance_to(stop);

        let kind = ForeignKind::AtRule { name, params };
        match terminator {
            Some('{') => self.parse_block(kind, start),
            Some(';') => {
                self.advance();
                Ok(ForeignNode::new(kind, self.span_to_last(start)))
            }
            // `}` of the enclosing block or end of input
            _ => Ok(ForeignNode::new(kind, self.span_to_last(start))),
        }
    }

    fn parse_rule_or_decl(&mut self) -> Result<Option<ForeignNode>, ForeignError> {
        let start = self.point();
        let (stop, terminator) = self.find_terminator()?;
        let text = &self.input[start.offset..stop];

        if terminator == Some('{') {
            let selector = text.trim().to_string();
            self.advance_to(stop);
            return self.parse_block(ForeignKind::Rule { selector }, start).map(Some);
        }

        let Some(colon) = text.find(':') else {
            tracing::warn!("Skipping unknown word at {}:{}: {}", start.line, start.column, text.trim());
            self.advance_to(stop);
            if terminator == Some(';') {
                self.advance();
            }
            return Ok(None);
        };
        let prop = text[..colon].trim().to_string();
        let (value, important) = split_important(text[colon + 1..].trim());

        self.advance_to(stop);
        if terminator == Some(';') {
            self.advance();
        }
        let kind = ForeignKind::Decl { prop, value, important };
        Ok(Some(ForeignNode::new(kind, self.span_to_last(start))))
    }

    /// Parse `{ ... }` at the cursor as the body of `kind`
    fn parse_block(&mut self, kind: ForeignKind, start: SourcePoint) -> Result<ForeignNode, ForeignError> {
        let open = self.point();
        self.advance(); // {
        let nodes = self.parse_block_contents(Some(open))?;
        self.advance(); // }

        let mut node = ForeignNode::new(kind, self.span_to_last(start));
        node.nodes = nodes;
        Ok(node)
    }

    fn span_to_last(&self, start: SourcePoint) -> Option<SourceSpan> {
        let end = self.last_visible.filter(|end| end.offset >= start.offset)?;
        Some(SourceSpan { start, end })
    }
}

fn split_important(value: &str) -> (String, bool) {
    if let Some(bang) = value.rfind('!') {
        if value[bang + 1..].trim().eq_ignore_ascii_case("important") {
            return (value[..bang].trim_end().to_string(), true);
        }
    }
    (value.to_string(), false)
}
