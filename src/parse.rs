use nom::IResult;
use nom::{
    bytes::complete::{is_not, take_while1},
    character::complete::space1,
    combinator::opt,
    multi::separated_list1,
    sequence::preceded,
};

/// A parsed command line: a verb plus zero or more positional arguments.
#[derive(Debug, PartialEq, Eq)]
pub struct Command {
    pub verb: String,
    pub args: Vec<String>,
}

/// Parse a trimmed command line into a verb and its arguments.
///
/// Verbs are the hyphenated lowercase words of the protocol
/// (`reg`, `log`, `view-profile`, `my-blogs`, ...). Arguments are
/// whitespace-separated and may contain any non-space characters,
/// so passwords with punctuation pass through untouched.
pub fn parse_command(input: &str) -> IResult<&str, Command> {
    let (input, verb) = take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-')(input)?;
    let (input, args) = opt(preceded(space1, separated_list1(space1, is_not(" \t\r\n"))))(input)?;
    let args_vec = args
        .unwrap_or_default()
        .into_iter()
        .map(|s: &str| s.to_string())
        .collect();
    Ok((
        input,
        Command {
            verb: verb.to_ascii_lowercase(),
            args: args_vec,
        },
    ))
}
