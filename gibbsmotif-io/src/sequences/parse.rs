use nom::bytes::complete::take_while1;
use nom::character::complete::space0;
use nom::sequence::preceded;
use nom::IResult;
use nom::Parser;

/// Parse the first whitespace-delimited token of a line.
pub fn token(input: &str) -> IResult<&str, &str> {
    preceded(space0, take_while1(|c: char| !c.is_whitespace())).parse(input)
}
