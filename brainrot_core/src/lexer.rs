//! Lexical analysis for brainrot source text: converts a source string
//! into a flat stream of `Token`s, tracking line numbers for diagnostics.
//!
//! `//` line comments are skipped. String and character literals resolve
//! `\n`, `\t`, `\\` and the matching quote escape into the owned token
//! value at lex time, so the parser never has to re-interpret escapes.

use crate::errors::LexError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(i64),
    FloatNum(f32),
    CharLit(i64),
    StringLit(String),
    Ident(String),

    // Print family
    Yapping,
    Yappin,
    Baka,

    // Control flow
    Chudail, // break
    Agar,    // if
    NahiTo,  // else
    Jabtak,  // while
    Kdegi,   // for
    Pakad,   // switch
    Keis,    // case
    Default,

    Sizeof,

    // Type modifier keywords
    KwVolatile,
    KwSigned,
    KwUnsigned,
    KwBoolean,

    // Boolean literals
    KwYes,
    KwNo,

    // Operators & punctuation
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Lt,
    Gt,
    Le,
    Ge,
    EqEq,
    Ne,
    AndAnd,
    OrOr,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Semicolon,
    Comma,
    Colon,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: i32,
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: i32,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if pred(c) {
                out.push(c);
                self.bump();
            } else {
                break;
            }
        }
        out
    }

    fn read_escaped(&mut self, terminator: char) -> Result<String, LexError> {
        let start_line = self.line;
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(LexError::UnterminatedString(start_line)),
                Some(c) if c == terminator => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('\\') => out.push('\\'),
                    Some(c) if c == terminator => out.push(c),
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => return Err(LexError::UnterminatedString(start_line)),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn two_char(&mut self, second: char, one: TokenKind, two: TokenKind) -> TokenKind {
        if self.peek() == Some(second) {
            self.bump();
            two
        } else {
            one
        }
    }

    fn keyword(word: &str) -> Option<TokenKind> {
        Some(match word {
            "yapping" => TokenKind::Yapping,
            "yappin" => TokenKind::Yappin,
            "baka" => TokenKind::Baka,
            "chudail" => TokenKind::Chudail,
            "agar" => TokenKind::Agar,
            "nahi_to" => TokenKind::NahiTo,
            "jabtak" => TokenKind::Jabtak,
            "kdegi" => TokenKind::Kdegi,
            "pakad" => TokenKind::Pakad,
            "keis" => TokenKind::Keis,
            "default" => TokenKind::Default,
            "sizeof" => TokenKind::Sizeof,
            "volatile" => TokenKind::KwVolatile,
            "signed" => TokenKind::KwSigned,
            "unsigned" => TokenKind::KwUnsigned,
            "boolean" => TokenKind::KwBoolean,
            "yes" => TokenKind::KwYes,
            "no" => TokenKind::KwNo,
            _ => return None,
        })
    }

    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        loop {
            match self.peek() {
                None => return Ok(None),
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') => {
                    let mut clone = self.chars.clone();
                    clone.next();
                    if clone.peek() == Some(&'/') {
                        self.bump();
                        self.bump();
                        while let Some(c) = self.peek() {
                            if c == '\n' {
                                break;
                            }
                            self.bump();
                        }
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }

        let line = self.line;
        let Some(c) = self.peek() else {
            return Ok(None);
        };

        let kind = match c {
            '"' => {
                self.bump();
                TokenKind::StringLit(self.read_escaped('"')?)
            }
            '\'' => {
                self.bump();
                let text = self.read_escaped('\'')?;
                let code = text.chars().next().map(|c| c as i64).unwrap_or(0);
                TokenKind::CharLit(code)
            }
            c if c.is_ascii_digit() => {
                let int_part = self.eat_while(|c| c.is_ascii_digit());
                if self.peek() == Some('.') {
                    let mut clone = self.chars.clone();
                    clone.next();
                    if clone.peek().is_some_and(|c| c.is_ascii_digit()) {
                        self.bump();
                        let frac_part = self.eat_while(|c| c.is_ascii_digit());
                        let text = format!("{int_part}.{frac_part}");
                        TokenKind::FloatNum(text.parse().unwrap_or(0.0))
                    } else {
                        TokenKind::Number(int_part.parse().unwrap_or(0))
                    }
                } else {
                    TokenKind::Number(int_part.parse().unwrap_or(0))
                }
            }
            c if c.is_alphabetic() || c == '_' => {
                let word = self.eat_while(|c| c.is_alphanumeric() || c == '_');
                Self::keyword(&word).unwrap_or(TokenKind::Ident(word))
            }
            '=' => {
                self.bump();
                self.two_char('=', TokenKind::Assign, TokenKind::EqEq)
            }
            '!' => {
                self.bump();
                if self.peek() == Some('=') {
                    self.bump();
                    TokenKind::Ne
                } else {
                    return Err(LexError::InvalidToken("!".to_string(), line));
                }
            }
            '<' => {
                self.bump();
                self.two_char('=', TokenKind::Lt, TokenKind::Le)
            }
            '>' => {
                self.bump();
                self.two_char('=', TokenKind::Gt, TokenKind::Ge)
            }
            '&' => {
                self.bump();
                if self.peek() == Some('&') {
                    self.bump();
                    TokenKind::AndAnd
                } else {
                    return Err(LexError::InvalidToken("&".to_string(), line));
                }
            }
            '|' => {
                self.bump();
                if self.peek() == Some('|') {
                    self.bump();
                    TokenKind::OrOr
                } else {
                    return Err(LexError::InvalidToken("|".to_string(), line));
                }
            }
            '+' => {
                self.bump();
                TokenKind::Plus
            }
            '-' => {
                self.bump();
                TokenKind::Minus
            }
            '*' => {
                self.bump();
                TokenKind::Star
            }
            '/' => {
                self.bump();
                TokenKind::Slash
            }
            '%' => {
                self.bump();
                TokenKind::Percent
            }
            '(' => {
                self.bump();
                TokenKind::LParen
            }
            ')' => {
                self.bump();
                TokenKind::RParen
            }
            '{' => {
                self.bump();
                TokenKind::LBrace
            }
            '}' => {
                self.bump();
                TokenKind::RBrace
            }
            ';' => {
                self.bump();
                TokenKind::Semicolon
            }
            ',' => {
                self.bump();
                TokenKind::Comma
            }
            ':' => {
                self.bump();
                TokenKind::Colon
            }
            other => {
                self.bump();
                return Err(LexError::InvalidToken(other.to_string(), line));
            }
        };

        Ok(Some(Token { kind, line }))
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}
