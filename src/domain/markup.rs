//! Streaming translator for the embedded markup vocabulary.
//!
//! Converts the fixed tag set (bold, italic, underline, superscript,
//! subscript, null symbol, prime) into LaTeX while collecting a tag-free
//! identifier-safe text. Superscript-like tags only render inside math mode;
//! one `$` pair wraps the outermost run of math tags (a depth counter, not a
//! toggle). The translator never errors: any violation flips `valid` to
//! false and stays false, and callers fall back to the raw text.

/// One recognized markup tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Bold,
    Italic,
    Underline,
    Superscript,
    Subscript,
    NullSymbol,
    Prime,
}

impl Tag {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "b" => Some(Self::Bold),
            "i" => Some(Self::Italic),
            "u" => Some(Self::Underline),
            "sup" => Some(Self::Superscript),
            "sub" => Some(Self::Subscript),
            "null" => Some(Self::NullSymbol),
            "bar" => Some(Self::Prime),
            _ => None,
        }
    }

    /// LaTeX opening sequence; every tag closes with `}`.
    fn tex_open(self) -> &'static str {
        match self {
            Self::Bold => "\\textbf{",
            Self::Italic => "\\textit{",
            Self::Underline => "\\underline{",
            Self::Superscript => "^{",
            Self::Subscript => "_{",
            Self::NullSymbol => "{\\O",
            Self::Prime => "^{\\prime",
        }
    }

    fn needs_math(self) -> bool {
        matches!(
            self,
            Self::Superscript | Self::Subscript | Self::NullSymbol | Self::Prime
        )
    }

    /// Word the tag contributes to the identifier-safe text.
    fn plain_word(self) -> Option<&'static str> {
        match self {
            Self::NullSymbol => Some("Null"),
            Self::Prime => Some("Bar"),
            _ => None,
        }
    }
}

/// Token stream over markup input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Open {
        name: &'a str,
        has_attrs: bool,
        self_closing: bool,
    },
    Close {
        name: &'a str,
    },
    Text(&'a str),
}

/// Scanner producing open/close/text tokens.
///
/// A `<` that does not start a well-formed tag is plain text. In streaming
/// mode a trailing `<…` without its `>` is held back (see [`Tokenizer::rest`])
/// so a tag split across feeds is not misread.
struct Tokenizer<'a> {
    rest: &'a str,
    at_end: bool,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str, at_end: bool) -> Self {
        Self {
            rest: input,
            at_end,
        }
    }

    /// Unconsumed tail (a possibly incomplete trailing tag).
    fn rest(&self) -> &'a str {
        self.rest
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.rest.is_empty() {
            return None;
        }
        match self.rest.find('<') {
            None => {
                let text = self.rest;
                self.rest = "";
                Some(Token::Text(text))
            }
            Some(0) => {
                match self.rest.find('>') {
                    Some(end) => {
                        if let Some(token) = parse_tag(&self.rest[1..end]) {
                            self.rest = &self.rest[end + 1..];
                            return Some(token);
                        }
                    }
                    None if !self.at_end => return None,
                    None => {}
                }
                // Literal '<': emit it plus the text up to the next '<'.
                let stop = self.rest[1..]
                    .find('<')
                    .map(|i| i + 1)
                    .unwrap_or(self.rest.len());
                let (text, rest) = self.rest.split_at(stop);
                self.rest = rest;
                Some(Token::Text(text))
            }
            Some(start) => {
                let (text, rest) = self.rest.split_at(start);
                self.rest = rest;
                Some(Token::Text(text))
            }
        }
    }
}

/// Parse the text between `<` and `>` into a token, or None when it is not
/// tag-shaped.
fn parse_tag(inner: &str) -> Option<Token<'_>> {
    if let Some(name) = inner.strip_prefix('/') {
        let name = name.trim();
        return is_tag_name(name).then_some(Token::Close { name });
    }
    let (inner, self_closing) = match inner.strip_suffix('/') {
        Some(stripped) => (stripped, true),
        None => (inner, false),
    };
    let name_end = inner
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(inner.len());
    let (name, attrs) = inner.split_at(name_end);
    if !is_tag_name(name) {
        return None;
    }
    Some(Token::Open {
        name,
        has_attrs: !attrs.trim().is_empty(),
        self_closing,
    })
}

fn is_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Result of translating one complete input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translation {
    /// LaTeX rendering of the input.
    pub tex: String,
    /// Tag-free text safe for identifiers; null/prime tags become words.
    pub plain: String,
    /// False as soon as one violation is seen anywhere in the input.
    pub valid: bool,
}

/// Streaming markup translator.
///
/// Reusable across inputs: [`MarkupTranslator::translate`] resets, feeds, and
/// finishes in one call; [`MarkupTranslator::feed`] and
/// [`MarkupTranslator::finish`] drive it incrementally.
#[derive(Debug)]
pub struct MarkupTranslator {
    tag_stack: Vec<Tag>,
    math_depth: usize,
    pending: String,
    tex: String,
    plain: String,
    valid: bool,
}

impl Default for MarkupTranslator {
    fn default() -> Self {
        Self {
            tag_stack: Vec::new(),
            math_depth: 0,
            pending: String::new(),
            tex: String::new(),
            plain: String::new(),
            valid: true,
        }
    }
}

impl MarkupTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all state for a fresh input.
    pub fn reset(&mut self) {
        self.tag_stack.clear();
        self.math_depth = 0;
        self.pending.clear();
        self.tex.clear();
        self.plain.clear();
        self.valid = true;
    }

    /// Feed a chunk of input. Append-only; state carries across calls.
    pub fn feed(&mut self, input: &str) {
        self.pending.push_str(input);
        let buffer = std::mem::take(&mut self.pending);
        let mut tokenizer = Tokenizer::new(&buffer, false);
        for token in &mut tokenizer {
            self.apply(token);
        }
        self.pending = tokenizer.rest().to_string();
    }

    /// Mark end of input: anything still open invalidates it.
    pub fn finish(&mut self) {
        let buffer = std::mem::take(&mut self.pending);
        for token in Tokenizer::new(&buffer, true) {
            self.apply(token);
        }
        if !self.tag_stack.is_empty() {
            self.valid = false;
        }
    }

    /// LaTeX accumulated so far.
    pub fn tex(&self) -> &str {
        &self.tex
    }

    /// Identifier-safe text accumulated so far.
    pub fn plain(&self) -> &str {
        &self.plain
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Translate one complete input from scratch.
    pub fn translate(&mut self, input: &str) -> Translation {
        self.reset();
        self.feed(input);
        self.finish();
        Translation {
            tex: self.tex.clone(),
            plain: self.plain.clone(),
            valid: self.valid,
        }
    }

    fn apply(&mut self, token: Token<'_>) {
        match token {
            Token::Text(text) => self.text(text),
            Token::Open {
                name,
                has_attrs,
                self_closing,
            } => {
                self.open_tag(name, has_attrs);
                if self_closing {
                    self.close_tag(name);
                }
            }
            Token::Close { name } => self.close_tag(name),
        }
    }

    fn text(&mut self, text: &str) {
        self.tex.push_str(text);
        self.plain.push_str(text);
    }

    fn open_tag(&mut self, name: &str, has_attrs: bool) {
        if has_attrs {
            self.valid = false;
        }
        match Tag::from_name(name) {
            None => {
                // Unrecognized tags pass through literally and poison validity.
                self.valid = false;
                self.tex.push('<');
                self.tex.push_str(name);
                self.tex.push('>');
            }
            Some(tag) => {
                self.tag_stack.push(tag);
                if tag.needs_math() {
                    if self.math_depth == 0 {
                        self.tex.push('$');
                    }
                    self.math_depth += 1;
                }
                self.tex.push_str(tag.tex_open());
                if let Some(word) = tag.plain_word() {
                    self.plain.push_str(word);
                }
            }
        }
    }

    fn close_tag(&mut self, name: &str) {
        match self.tag_stack.pop() {
            None => self.valid = false,
            Some(top) => {
                if Tag::from_name(name) != Some(top) {
                    self.valid = false;
                }
            }
        }
        match Tag::from_name(name) {
            Some(tag) => {
                self.tex.push('}');
                if tag.needs_math() && self.math_depth > 0 {
                    self.math_depth -= 1;
                    if self.math_depth == 0 {
                        self.tex.push('$');
                    }
                }
            }
            None => {
                self.tex.push_str("</");
                self.tex.push_str(name);
                self.tex.push('>');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token<'_>> {
        Tokenizer::new(input, true).collect()
    }

    #[test]
    fn test_tokenizer_text_and_tags() {
        assert_eq!(
            tokens("T<bar/>"),
            vec![
                Token::Text("T"),
                Token::Open {
                    name: "bar",
                    has_attrs: false,
                    self_closing: true
                },
            ]
        );
    }

    #[test]
    fn test_tokenizer_attrs() {
        assert_eq!(
            tokens("<b class=x>y</b>"),
            vec![
                Token::Open {
                    name: "b",
                    has_attrs: true,
                    self_closing: false
                },
                Token::Text("y"),
                Token::Close { name: "b" },
            ]
        );
    }

    #[test]
    fn test_tokenizer_literal_angle_bracket() {
        assert_eq!(tokens("a < b"), vec![Token::Text("a "), Token::Text("< b")]);
        assert_eq!(tokens("<1>"), vec![Token::Text("<1>")]);
    }

    #[test]
    fn test_feed_split_across_tag_boundary() {
        let mut translator = MarkupTranslator::new();
        translator.feed("<b");
        translator.feed(">root</b>");
        translator.finish();
        assert_eq!(translator.tex(), "\\textbf{root}");
        assert!(translator.is_valid());
    }
}
