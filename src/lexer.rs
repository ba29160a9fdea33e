use crate::error::{Error, Result, ScriptError};

/// Indentation width of a tab character, in spaces.
pub const TAB_WIDTH: usize = 4;

/// A single token on a cmdscript line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `"..."` — a quoted string (escape sequences already resolved).
    Quoted(String),
    /// Any bare word, number, operator or `%` keyword.
    Bare(String),
}

impl Token {
    pub fn as_bare(&self) -> Option<&str> {
        match self {
            Token::Bare(s) => Some(s),
            Token::Quoted(_) => None,
        }
    }

    pub fn is_bare(&self, word: &str) -> bool {
        self.as_bare() == Some(word)
    }

    /// Case-insensitive variant of [`Token::is_bare`] for `%` keywords.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.as_bare().is_some_and(|s| s.eq_ignore_ascii_case(word))
    }
}

/// A successfully tokenized non-empty, non-comment line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number in the source.
    pub number: usize,
    /// Indentation depth in whitespace units (tab = [`TAB_WIDTH`]).
    pub depth: usize,
    /// The line with surrounding whitespace removed.
    pub text: String,
    pub tokens: Vec<Token>,
}

/// Measure the indentation depth of a raw line.
pub fn depth_of(line: &str) -> usize {
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

/// Split the content of one line into tokens.
pub fn tokenize_content(content: &str) -> Result<Vec<Token>> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut chars = content.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '"' {
            chars.next(); // opening quote
            let mut s = String::new();
            let mut closed = false;
            while let Some(ch) = chars.next() {
                match ch {
                    '"' => {
                        closed = true;
                        break;
                    }
                    '\\' => match chars.next() {
                        Some('"') => s.push('"'),
                        Some('n') => s.push('\n'),
                        Some('t') => s.push('\t'),
                        Some('\\') => s.push('\\'),
                        Some(nc) => {
                            s.push('\\');
                            s.push(nc);
                        }
                        None => break,
                    },
                    _ => s.push(ch),
                }
            }
            if !closed {
                return Err(Error::syntax("missing closing quote"));
            }
            tokens.push(Token::Quoted(s));
        } else {
            let mut word = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() || ch == '"' {
                    break;
                }
                word.push(ch);
                chars.next();
            }
            tokens.push(Token::Bare(word));
        }
    }

    Ok(tokens)
}

/// Tokenize one raw source line.
/// Returns `None` for blank lines and comment lines.
pub fn tokenize_line(number: usize, line: &str) -> Result<Option<Line>> {
    let content = line.trim();
    if content.is_empty() || content.starts_with('#') {
        return Ok(None);
    }

    let tokens = tokenize_content(content)?;
    if tokens.is_empty() {
        return Ok(None);
    }

    Ok(Some(Line {
        number,
        depth: depth_of(line),
        text: content.to_string(),
        tokens,
    }))
}

/// Tokenize an entire cmdscript source string into logical lines.
///
/// A line starting with `##` is a block comment: it also swallows the line
/// right after it.
pub fn tokenize(source: &str) -> std::result::Result<Vec<Line>, ScriptError> {
    let mut lines = Vec::new();
    let mut skip_next = false;

    for (idx, raw) in source.lines().enumerate() {
        let number = idx + 1;
        if skip_next {
            skip_next = false;
            continue;
        }
        if raw.trim_start().starts_with("##") {
            skip_next = true;
            continue;
        }
        match tokenize_line(number, raw) {
            Ok(Some(line)) => lines.push(line),
            Ok(None) => {}
            Err(e) => return Err(ScriptError::new(number, raw.trim(), e)),
        }
    }
    Ok(lines)
}
