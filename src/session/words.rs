use snafu::Snafu;

/// Splits a command line into words the way a POSIX shell would for plain
/// words: whitespace separates, single quotes are literal, double quotes
/// allow `\"` and `\\`, and a bare backslash escapes the next character.
pub fn split_words(line: &str) -> Result<Vec<String>, WordsError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return UnterminatedQuoteSnafu { quote: '\'' }.fail(),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(escaped @ ('"' | '\\')) => current.push(escaped),
                            Some(other) => {
                                current.push('\\');
                                current.push(other);
                            }
                            None => return UnterminatedQuoteSnafu { quote: '"' }.fail(),
                        },
                        Some(c) => current.push(c),
                        None => return UnterminatedQuoteSnafu { quote: '"' }.fail(),
                    }
                }
            }
            '\\' => {
                in_word = true;
                match chars.next() {
                    Some(escaped) => current.push(escaped),
                    None => return TrailingEscapeSnafu.fail(),
                }
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }

    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[derive(Debug, Snafu)]
pub enum WordsError {
    #[snafu(display("Missing closing {} quote", quote))]
    UnterminatedQuote { quote: char },
    #[snafu(display("Line ends with a dangling backslash"))]
    TrailingEscape,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("find -name *.txt", &["find", "-name", "*.txt"])]
    #[case("  ls   sub  ", &["ls", "sub"])]
    #[case("find -name '*.txt'", &["find", "-name", "*.txt"])]
    #[case(r#"cd "my dir""#, &["cd", "my dir"])]
    #[case(r"cd my\ dir", &["cd", "my dir"])]
    #[case(r#"find -name "say \"hi\"""#, &["find", "-name", "say \"hi\""])]
    #[case("find -name ''", &["find", "-name", ""])]
    #[case("find \\( -name a \\)", &["find", "(", "-name", "a", ")"])]
    #[case("a'b'\"c\"", &["abc"])]
    #[case("", &[])]
    fn splits(#[case] line: &str, #[case] expected: &[&str]) {
        assert_eq!(split_words(line).unwrap(), expected);
    }

    #[rstest]
    #[case("find -name 'open")]
    #[case("cd \"open")]
    fn unterminated_quotes(#[case] line: &str) {
        assert!(matches!(
            split_words(line),
            Err(WordsError::UnterminatedQuote { .. })
        ));
    }

    #[test]
    fn trailing_backslash() {
        assert!(matches!(
            split_words("cd sub\\"),
            Err(WordsError::TrailingEscape)
        ));
    }
}
