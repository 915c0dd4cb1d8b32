//! Argument sources accepted by [`Parser::parse`](crate::Parser::parse).

/// Something that can be turned into the token sequence the parser walks.
///
/// Sequences are taken as-is. A single string is split on whitespace with
/// shell-style quoting, see [`split_line`].
pub trait IntoArgs {
    fn into_args(self) -> Vec<String>;
}

impl IntoArgs for &str {
    fn into_args(self) -> Vec<String> {
        split_line(self)
    }
}

impl IntoArgs for &String {
    fn into_args(self) -> Vec<String> {
        split_line(self)
    }
}

impl IntoArgs for Vec<String> {
    fn into_args(self) -> Vec<String> {
        self
    }
}

impl IntoArgs for Vec<&str> {
    fn into_args(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl IntoArgs for &[String] {
    fn into_args(self) -> Vec<String> {
        self.to_vec()
    }
}

impl IntoArgs for &[&str] {
    fn into_args(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl<const N: usize> IntoArgs for [&str; N] {
    fn into_args(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

/// Split a command line into tokens.
///
/// Whitespace separates tokens. Single quotes keep their contents literally,
/// double quotes keep whitespace and honor `\"` and `\\`, and a backslash
/// outside quotes escapes the next character. An unterminated quote runs to
/// the end of the line.
pub fn split_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    // Distinguishes `""` (an empty token) from no token at all.
    let mut in_token = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_token = true;
                for q in chars.by_ref() {
                    if q == '\'' {
                        break;
                    }
                    current.push(q);
                }
            }
            '"' => {
                in_token = true;
                while let Some(q) = chars.next() {
                    match q {
                        '"' => break,
                        '\\' => match chars.next() {
                            Some(e @ ('"' | '\\')) => current.push(e),
                            Some(e) => {
                                current.push('\\');
                                current.push(e);
                            }
                            None => current.push('\\'),
                        },
                        _ => current.push(q),
                    }
                }
            }
            '\\' => {
                in_token = true;
                if let Some(e) = chars.next() {
                    current.push(e);
                }
            }
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            _ => {
                in_token = true;
                current.push(c);
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}
