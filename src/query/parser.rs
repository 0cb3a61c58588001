use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::filesystem::NodeType;
use crate::query::{Expression, NamePattern};

const OPEN_PAREN: &str = "(";
const CLOSE_PAREN: &str = ")";
const NOT: &str = "!";
const AND: &str = "-a";
const OR: &str = "-o";

/// Parses pre-split query words into an [`Expression`].
///
/// Binding from loosest to tightest: `-o`, then `-a` (explicit or implied by
/// juxtaposition), then `!`. An empty query matches everything.
pub fn parse_query<S: AsRef<str>>(tokens: &[S]) -> Result<Expression, QueryParseError> {
    let expression = QueryParser::new(tokens).parse()?;
    debug!("Parsed query: {}", expression);
    Ok(expression)
}

struct QueryParser<'a, S> {
    tokens: &'a [S],
    position: usize,
}

impl<'a, S: AsRef<str>> QueryParser<'a, S> {
    fn new(tokens: &'a [S]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    fn parse(mut self) -> Result<Expression, QueryParseError> {
        let expression = self.parse_exprs()?;
        match self.peek() {
            None => Ok(expression),
            Some(CLOSE_PAREN) => UnbalancedParenthesesSnafu { token: CLOSE_PAREN }.fail(),
            Some(token) => UnexpectedTokenSnafu { token }.fail(),
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.position).map(AsRef::as_ref)
    }

    fn advance(&mut self) -> Option<&'a str> {
        let token = self.peek();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn argument(&mut self, option: &str) -> Result<&'a str, QueryParseError> {
        match self.advance() {
            Some(argument) => Ok(argument),
            None => MissingArgumentSnafu { option }.fail(),
        }
    }

    /// Sequence of terms up to the end of input or a closing parenthesis
    fn parse_exprs(&mut self) -> Result<Expression, QueryParseError> {
        let mut expression = None;
        while !matches!(self.peek(), None | Some(CLOSE_PAREN)) {
            let term = self.parse_or()?;
            expression = Some(match expression {
                Some(left) => Expression::and(left, term),
                None => term,
            });
        }
        Ok(expression.unwrap_or(Expression::Null))
    }

    fn parse_or(&mut self) -> Result<Expression, QueryParseError> {
        let mut left = self.parse_and()?;
        while self.peek() == Some(OR) {
            self.advance();
            let right = self.parse_and()?;
            left = Expression::or(left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expression, QueryParseError> {
        let mut left = self.parse_not()?;
        loop {
            match self.peek() {
                None | Some(OR) | Some(CLOSE_PAREN) => break,
                Some(AND) => {
                    self.advance();
                }
                Some(_) => {}
            }
            let right = self.parse_not()?;
            left = Expression::and(left, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expression, QueryParseError> {
        if self.peek() == Some(NOT) {
            self.advance();
            return Ok(Expression::negate(self.parse_not()?));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expression, QueryParseError> {
        match self.advance() {
            Some("-name") => {
                let pattern = self.argument("-name")?;
                let pattern = NamePattern::new(pattern).context(InvalidPatternSnafu { pattern })?;
                Ok(Expression::Name(pattern))
            }
            Some("-type") => match self.argument("-type")? {
                "f" => Ok(Expression::Type(NodeType::File)),
                "d" => Ok(Expression::Type(NodeType::Directory)),
                argument => InvalidTypeSnafu { argument }.fail(),
            },
            Some("-size") => parse_size(self.argument("-size")?),
            Some(OPEN_PAREN) => {
                let inner = self.parse_exprs()?;
                match self.advance() {
                    Some(CLOSE_PAREN) => Ok(inner),
                    _ => UnbalancedParenthesesSnafu { token: OPEN_PAREN }.fail(),
                }
            }
            Some(token) => UnexpectedTokenSnafu { token }.fail(),
            None => UnexpectedEndSnafu.fail(),
        }
    }
}

/// `N` compares for equality, `+N` for strictly greater, `-N` for strictly less
fn parse_size(argument: &str) -> Result<Expression, QueryParseError> {
    let (comparison, digits): (fn(u64) -> Expression, &str) =
        if let Some(digits) = argument.strip_prefix('+') {
            (Expression::SizeGt, digits)
        } else if let Some(digits) = argument.strip_prefix('-') {
            (Expression::SizeLt, digits)
        } else {
            (Expression::SizeEq, argument)
        };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return InvalidSizeSnafu { argument }.fail();
    }
    match digits.parse::<u64>() {
        Ok(size) => Ok(comparison(size)),
        Err(_) => InvalidSizeSnafu { argument }.fail(),
    }
}

#[derive(Debug, Snafu)]
pub enum QueryParseError {
    #[snafu(display("Unexpected token '{}' in query", token))]
    UnexpectedToken { token: String },
    #[snafu(display("Query ended where an expression was expected"))]
    UnexpectedEnd,
    #[snafu(display("Unmatched '{}' in query", token))]
    UnbalancedParentheses { token: String },
    #[snafu(display("Missing argument to '{}'", option))]
    MissingArgument { option: String },
    #[snafu(display("Invalid argument '{}' to -type, expected 'f' or 'd'", argument))]
    InvalidType { argument: String },
    #[snafu(display("Invalid argument '{}' to -size", argument))]
    InvalidSize { argument: String },
    #[snafu(display("Invalid pattern '{}' to -name: {}", pattern, source))]
    InvalidPattern {
        pattern: String,
        source: globset::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn parse(query: &str) -> Result<Expression, QueryParseError> {
        let tokens = query.split_whitespace().collect::<Vec<_>>();
        parse_query(&tokens)
    }

    fn name(pattern: &str) -> Expression {
        Expression::Name(NamePattern::new(pattern).unwrap())
    }

    #[test]
    fn empty_query_is_null() {
        let tokens: [&str; 0] = [];
        assert_eq!(parse_query(&tokens).unwrap(), Expression::Null);
    }

    #[rstest]
    #[case("-size 5", Expression::SizeEq(5))]
    #[case("-size +5", Expression::SizeGt(5))]
    #[case("-size -5", Expression::SizeLt(5))]
    #[case("-size 007", Expression::SizeEq(7))]
    #[case("-type f", Expression::Type(NodeType::File))]
    #[case("-type d", Expression::Type(NodeType::Directory))]
    fn primaries(#[case] query: &str, #[case] expected: Expression) {
        assert_eq!(parse(query).unwrap(), expected);
    }

    #[test]
    fn juxtaposition_is_and() {
        let expected = Expression::and(Expression::Type(NodeType::File), Expression::SizeGt(5));
        assert_eq!(parse("-type f -size +5").unwrap(), expected);
        assert_eq!(parse("-type f -a -size +5").unwrap(), expected);
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let expected = Expression::or(
            Expression::and(name("a"), name("b")),
            name("c"),
        );
        assert_eq!(parse("-name a -name b -o -name c").unwrap(), expected);
        assert_eq!(parse("-name a -a -name b -o -name c").unwrap(), expected);

        let expected = Expression::or(name("a"), Expression::and(name("b"), name("c")));
        assert_eq!(parse("-name a -o -name b -name c").unwrap(), expected);
    }

    #[test]
    fn not_binds_tightest() {
        let expected = Expression::or(
            Expression::negate(Expression::Type(NodeType::Directory)),
            name("x"),
        );
        assert_eq!(parse("! -type d -o -name x").unwrap(), expected);
        assert_eq!(
            parse("! ! -name x").unwrap(),
            Expression::negate(Expression::negate(name("x")))
        );
    }

    #[test]
    fn parentheses_group() {
        let expected = Expression::and(
            Expression::or(name("a"), name("b")),
            Expression::Type(NodeType::File),
        );
        assert_eq!(parse("( -name a -o -name b ) -a -type f").unwrap(), expected);
        assert_eq!(parse("( -name a -o -name b ) -type f").unwrap(), expected);
    }

    #[test]
    fn empty_parentheses_are_null() {
        assert_eq!(parse("( )").unwrap(), Expression::Null);
    }

    #[test]
    fn invalid_type_names_the_argument() {
        match parse("-type x") {
            Err(QueryParseError::InvalidType { argument }) => assert_eq!(argument, "x"),
            other => panic!("Expected InvalidType, got {:?}", other),
        }
    }

    #[rstest]
    #[case("-size")]
    #[case("-size +")]
    #[case("-size 5k")]
    #[case("-size +-5")]
    #[case("-size 99999999999999999999999")]
    fn invalid_sizes(#[case] query: &str) {
        let result = parse(query);
        assert!(matches!(
            result,
            Err(QueryParseError::InvalidSize { .. } | QueryParseError::MissingArgument { .. })
        ));
    }

    #[rstest]
    #[case("-mtime 3", "-mtime")]
    #[case("-name a -o -o -name b", "-o")]
    #[case("-a -name b", "-a")]
    #[case("-name a foo", "foo")]
    fn unexpected_tokens(#[case] query: &str, #[case] token: &str) {
        match parse(query) {
            Err(QueryParseError::UnexpectedToken { token: reported }) => assert_eq!(reported, token),
            other => panic!("Expected UnexpectedToken, got {:?}", other),
        }
    }

    #[rstest]
    #[case("( -name a", "(")]
    #[case("-name a )", ")")]
    #[case("( ( -name a )", "(")]
    #[case("( -name a ) )", ")")]
    fn unbalanced_parentheses_name_the_unmatched_token(#[case] query: &str, #[case] token: &str) {
        let error = parse(query).unwrap_err();
        assert_eq!(error.to_string(), format!("Unmatched '{}' in query", token));
        match error {
            QueryParseError::UnbalancedParentheses { token: reported } => assert_eq!(reported, token),
            other => panic!("Expected UnbalancedParentheses, got {:?}", other),
        }
    }

    #[rstest]
    #[case("!")]
    #[case("-name a -o")]
    #[case("-name a -a")]
    fn dangling_operators(#[case] query: &str) {
        assert!(matches!(parse(query), Err(QueryParseError::UnexpectedEnd)));
    }

    #[test]
    fn missing_name_argument() {
        assert!(matches!(
            parse("-name"),
            Err(QueryParseError::MissingArgument { option }) if option == "-name"
        ));
    }

    #[test]
    fn invalid_glob_is_reported() {
        assert!(matches!(
            parse("-name [a"),
            Err(QueryParseError::InvalidPattern { pattern, .. }) if pattern == "[a"
        ));
    }
}
