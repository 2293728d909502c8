//! Start hints for nodes the engine reports without a location
//!
//! lightningcss only records locations on rules. Declarations and
//! function-like values are located by scanning forward through the
//! enclosing rule's text for their signature, skipping comments and
//! strings. The scan cursor only moves forward, so repeated properties
//! match in document order.

/// Text shape that marks where a node starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Signature<'a> {
    /// Property name (vendor prefix allowed) followed by `:`, directly
    /// inside the enclosing block
    Property(&'a str),
    /// Function name immediately followed by `(`
    Call(&'a str),
}

#[derive(Debug, Clone, Copy)]
struct Window {
    floor: usize,
    ceiling: usize,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct HintScanner {
    windows: Vec<Window>,
    cursor: usize,
}

impl HintScanner {
    /// Enter a rule starting at `start`
    pub fn open_block(&mut self, text: &str, start: usize) {
        let ceiling = match self.windows.last() {
            Some(outer) => block_end(text, start).min(outer.ceiling),
            None => block_end(text, start),
        };
        self.windows.push(Window { floor: start, ceiling });
        self.cursor = start;
    }

    /// Enter a rule with no location of its own
    pub fn inherit_block(&mut self, text: &str) {
        let window = self.window(text);
        self.windows.push(window);
    }

    pub fn close_block(&mut self) {
        self.windows.pop();
    }

    /// Find the start of the next node matching `signature`
    pub fn find(&mut self, text: &str, signature: Signature<'_>) -> Option<usize> {
        let window = self.window(text);
        // Important declarations are visited after the rest, so retry the
        // whole window before giving up
        let (start, end) = scan(text, window, self.cursor.max(window.floor), signature)
            .or_else(|| scan(text, window, window.floor, signature))?;
        self.cursor = self.cursor.max(end);
        Some(start)
    }

    /// Source order of a block's normal and `!important` declarations,
    /// which the engine keeps in separate lists. Returns `(important,
    /// index)` pairs. Does not move the cursor.
    pub fn source_order(&self, text: &str, normal: &[&str], important: &[&str]) -> Vec<(bool, usize)> {
        let normal_starts = self.starts_in_order(text, normal, false);
        let important_starts = self.starts_in_order(text, important, true);

        let mut order = Vec::with_capacity(normal.len() + important.len());
        for (is_important, starts) in [(false, normal_starts), (true, important_starts)] {
            // Unmatched names sort right after the previous match of their list
            let mut key = 0;
            for (index, start) in starts.into_iter().enumerate() {
                key = start.unwrap_or(key);
                order.push((key, is_important, index));
            }
        }
        order.sort_by_key(|&(key, _, _)| key);
        order.into_iter().map(|(_, is_important, index)| (is_important, index)).collect()
    }

    fn starts_in_order(&self, text: &str, names: &[&str], important: bool) -> Vec<Option<usize>> {
        let window = self.window(text);
        let mut cursor = self.cursor.max(window.floor);
        names
            .iter()
            .map(|&name| loop {
                match scan(text, window, cursor, Signature::Property(name)) {
                    Some((start, end)) => {
                        cursor = end;
                        if is_important(text, end) == important {
                            break Some(start);
                        }
                    }
                    None => break None,
                }
            })
            .collect()
    }

    fn window(&self, text: &str) -> Window {
        self.windows.last().copied().unwrap_or(Window {
            floor: 0,
            ceiling: text.len(),
        })
    }
}

/// Returns the match start and the offset just past the signature
fn scan(text: &str, window: Window, from: usize, signature: Signature<'_>) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let ceiling = window.ceiling.min(bytes.len());
    let mut pos = window.floor;
    let mut depth = 0usize;

    while pos < ceiling {
        let b = bytes[pos];
        match b {
            b'/' if bytes.get(pos + 1) == Some(&b'*') => {
                pos = skip_comment(bytes, pos);
                continue;
            }
            b'"' | b'\'' => {
                pos = skip_string(bytes, pos);
                continue;
            }
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }

        if is_ident_byte(b) && (pos == 0 || !is_ident_byte(bytes[pos - 1])) {
            let end = ident_end(bytes, pos);
            if pos >= from {
                if let Some(matched) = match_signature(text, pos, end, depth, signature) {
                    return Some((pos, matched));
                }
            }
            pos = end;
            continue;
        }
        pos += 1;
    }
    None
}

fn match_signature(text: &str, start: usize, end: usize, depth: usize, signature: Signature<'_>) -> Option<usize> {
    let bytes = text.as_bytes();
    let ident = text.get(start..end)?;
    match signature {
        Signature::Property(name) => {
            if depth != 1 || !property_matches(ident, name) {
                return None;
            }
            let colon = skip_trivia(bytes, end);
            (bytes.get(colon) == Some(&b':')).then_some(colon + 1)
        }
        Signature::Call(name) => {
            (ident.eq_ignore_ascii_case(name) && bytes.get(end) == Some(&b'(')).then_some(end + 1)
        }
    }
}

/// `-webkit-transition` matches `transition`
fn property_matches(ident: &str, name: &str) -> bool {
    if ident.eq_ignore_ascii_case(name) {
        return true;
    }
    if !ident.starts_with('-') || ident.starts_with("--") {
        return false;
    }
    match ident[1..].find('-') {
        Some(dash) => ident[dash + 2..].eq_ignore_ascii_case(name),
        None => false,
    }
}

/// Whether the value starting at `value_start` carries `!important`
fn is_important(text: &str, value_start: usize) -> bool {
    let value = text.get(value_start..block_end(text, value_start)).unwrap_or_default();
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    compact.to_ascii_lowercase().contains("!important")
}

#[inline]
fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b >= 0x80
}

fn ident_end(bytes: &[u8], start: usize) -> usize {
    let mut pos = start;
    while pos < bytes.len() && is_ident_byte(bytes[pos]) {
        pos += 1;
    }
    pos
}

fn skip_trivia(bytes: &[u8], mut pos: usize) -> usize {
    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if bytes.get(pos) == Some(&b'/') && bytes.get(pos + 1) == Some(&b'*') {
            pos = skip_comment(bytes, pos);
        } else {
            return pos;
        }
    }
}

fn skip_comment(bytes: &[u8], start: usize) -> usize {
    let mut pos = start + 2;
    while pos + 1 < bytes.len() {
        if bytes[pos] == b'*' && bytes[pos + 1] == b'/' {
            return pos + 2;
        }
        pos += 1;
    }
    bytes.len()
}

fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut pos = start + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'\n' => return pos,
            b if b == quote => return pos + 1,
            _ => pos += 1,
        }
    }
    bytes.len()
}

/// End of the rule starting at `start`: past its matching `}`, or past
/// the `;` of a statement at-rule
fn block_end(text: &str, start: usize) -> usize {
    let bytes = text.as_bytes();
    let mut pos = start;
    let mut braces = 0usize;
    let mut parens = 0usize;

    while pos < bytes.len() {
        match bytes[pos] {
            b'/' if bytes.get(pos + 1) == Some(&b'*') => {
                pos = skip_comment(bytes, pos);
                continue;
            }
            b'"' | b'\'' => {
                pos = skip_string(bytes, pos);
                continue;
            }
            b'(' => parens += 1,
            b')' => parens = parens.saturating_sub(1),
            b';' if braces == 0 && parens == 0 => return pos + 1,
            b'{' => braces += 1,
            b'}' => {
                if braces <= 1 {
                    return pos + 1;
                }
                braces -= 1;
            }
            _ => {}
        }
        pos += 1;
    }
    bytes.len()
}
