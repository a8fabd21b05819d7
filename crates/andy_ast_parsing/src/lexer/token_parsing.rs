//! nom recognizers for the lexemes of the language

use andy_tokens::token::{Literal, OperatorKind};
use nom::branch::alt;
use nom::bytes::complete::{tag, take_till, take_until, take_while_m_n};
use nom::character::complete::{alpha1, alphanumeric1, char, digit1, hex_digit1, one_of};
use nom::combinator::{consumed, map_opt, map_res, opt, recognize, value};
use nom::multi::{many0, many0_count, many1};
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::IResult;

use super::LexErrorKind;

type Result<'a, O> = IResult<&'a str, O>;

/// A symbol recognized by [parse_symbol]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Symbol {
    Operator(OperatorKind),
    Delimiter,
}

/// Recognizes `[A-Za-z_][A-Za-z0-9_]*`
pub fn recognize_identifier(input: &str) -> Result<&str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(input)
}

fn separated_digits(input: &str) -> Result<&str> {
    recognize(many1(terminated(digit1, many0(char('_')))))(input)
}

fn hex_number(input: &str) -> Result<&str> {
    recognize(preceded(
        alt((tag("0x"), tag("0X"))),
        many1(terminated(hex_digit1, many0(char('_')))),
    ))(input)
}

fn decimal_number(input: &str) -> Result<&str> {
    recognize(tuple((
        separated_digits,
        opt(pair(char('.'), separated_digits)),
        opt(tuple((one_of("eE"), opt(one_of("+-")), separated_digits))),
        opt(one_of("fF")),
    )))(input)
}

/// Recognizes a numeric literal, hex or decimal.
///
/// A `.` only belongs to the number when a digit follows it, so `1.foo` is the number `1`
/// followed by `.` and `foo`.
pub fn recognize_number(input: &str) -> Result<&str> {
    alt((hex_number, decimal_number))(input)
}

/// Decodes a lexeme produced by [recognize_number]
pub fn decode_number(lexeme: &str) -> std::result::Result<Literal, LexErrorKind> {
    let invalid = || LexErrorKind::InvalidNumber(lexeme.to_string());
    let cleaned = lexeme.replace('_', "");
    if let Some(hex) = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16)
            .map(Literal::Integer)
            .map_err(|_| invalid())
    } else if let Some(float) = cleaned.strip_suffix(['f', 'F']) {
        float.parse().map(Literal::Float).map_err(|_| invalid())
    } else if cleaned.contains(['.', 'e', 'E']) {
        cleaned.parse().map(Literal::Double).map_err(|_| invalid())
    } else {
        cleaned.parse().map(Literal::Integer).map_err(|_| invalid())
    }
}

fn operator(kind: OperatorKind) -> Symbol {
    Symbol::Operator(kind)
}

fn parse_two_char_symbol(input: &str) -> Result<Symbol> {
    alt((
        value(operator(OperatorKind::Power), tag("**")),
        value(operator(OperatorKind::Increment), tag("++")),
        value(operator(OperatorKind::Decrement), tag("--")),
        value(operator(OperatorKind::And), tag("&&")),
        value(operator(OperatorKind::Or), tag("||")),
        value(operator(OperatorKind::Equal), tag("==")),
        value(operator(OperatorKind::NotEqual), tag("!=")),
        value(operator(OperatorKind::LessEqual), tag("<=")),
        value(operator(OperatorKind::GreaterEqual), tag(">=")),
        value(
            Symbol::Delimiter,
            alt((
                tag("::"),
                tag("->"),
                tag("+="),
                tag("-="),
                tag("*="),
                tag("/="),
                tag("%="),
            )),
        ),
    ))(input)
}

fn parse_one_char_symbol(input: &str) -> Result<Symbol> {
    alt((
        value(operator(OperatorKind::Multiply), char('*')),
        value(operator(OperatorKind::Plus), char('+')),
        value(operator(OperatorKind::Minus), char('-')),
        value(operator(OperatorKind::Divide), char('/')),
        value(operator(OperatorKind::Modulo), char('%')),
        value(operator(OperatorKind::Not), char('!')),
        value(operator(OperatorKind::Less), char('<')),
        value(operator(OperatorKind::Greater), char('>')),
        value(Symbol::Delimiter, one_of("(){}[],;:.=?")),
    ))(input)
}

/// Recognizes an operator or delimiter, always preferring the longest symbol
pub fn parse_symbol(input: &str) -> Result<(&str, Symbol)> {
    consumed(alt((parse_two_char_symbol, parse_one_char_symbol)))(input)
}

/// `// ...` up to, but not including, the line feed
pub fn parse_line_comment(input: &str) -> Result<&str> {
    recognize(pair(tag("//"), take_till(|c| c == '\n')))(input)
}

/// `/* ... */`, including the closing delimiter
pub fn parse_block_comment(input: &str) -> Result<&str> {
    recognize(delimited(tag("/*"), take_until("*/"), tag("*/")))(input)
}

/// `# ...` up to, but not including, the line feed
pub fn parse_preprocessor_directive(input: &str) -> Result<&str> {
    recognize(pair(char('#'), take_till(|c| c == '\n')))(input)
}

fn parse_unicode(input: &str) -> Result<char> {
    let parse_hex = take_while_m_n(1, 6, |c: char| c.is_ascii_hexdigit());
    let parse_delimited_hex = preceded(char('u'), delimited(char('{'), parse_hex, char('}')));
    let parse_u32 = map_res(parse_delimited_hex, move |hex| u32::from_str_radix(hex, 16));
    map_opt(parse_u32, std::char::from_u32)(input)
}

/// Parses a known escape sequence, starting at the `\`
pub fn parse_escaped_char(input: &str) -> Result<char> {
    preceded(
        char('\\'),
        alt((
            parse_unicode,
            value('\n', char('n')),
            value('\r', char('r')),
            value('\t', char('t')),
            value('\0', char('0')),
            value('\u{08}', char('b')),
            value('\u{0C}', char('f')),
            value('\\', char('\\')),
            value('/', char('/')),
            value('"', char('"')),
            value('\'', char('\'')),
            value('$', char('$')),
        )),
    )(input)
}
