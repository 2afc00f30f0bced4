/*
  Zugzwang, a UCI-compatible chess engine.
  Copyright (C) 2022 The Zugzwang Authors (see AUTHORS.md file)

  Zugzwang is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  Zugzwang is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! Parsing of UCI commands.

use std::num::ParseIntError;

use log::warn;
use zugzwang_base::Move;

use super::{GoOption, UciCommand};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
/// The ways a line of UCI input can fail to parse. According to the UCI
/// protocol, these errors should generally be logged and then ignored.
pub enum UciParseError {
    /// The line held no tokens.
    #[error("line contains no tokens")]
    Empty,
    /// The first token of the line is not a command.
    #[error("unrecognized UCI command `{0}`")]
    UnknownCommand(String),
    /// `debug` was followed by something other than `on` or `off`.
    #[error("unrecognized option `{0}` for `debug`")]
    Debug(String),
    /// The line ended while a field was still expected.
    #[error("reached end of line while parsing {0}")]
    UnexpectedEol(&'static str),
    /// A token was not the keyword required in its place.
    #[error("expected token `{expected}`, got `{found}`")]
    Unexpected {
        /// The keyword which was required.
        expected: &'static str,
        /// The token which was given.
        found: String,
    },
    /// A number could not be parsed.
    #[error("could not parse int: {0}")]
    Int(#[from] ParseIntError),
}

/// The result type for processing a line from a UCI command.
pub type UciParseResult = Result<UciCommand, UciParseError>;

/// Perform a read of a single UCI instruction.
///
/// # Errors
///
/// This function will return an `Err` describing the first problem found in
/// the line.
pub fn parse_line(line: &str) -> UciParseResult {
    let mut tokens = line.split_ascii_whitespace();
    let first_tok = tokens.next().ok_or(UciParseError::Empty)?;
    match first_tok {
        "uci" => Ok(UciCommand::Uci),
        "debug" => match tokens.next() {
            Some("on") | None => Ok(UciCommand::Debug(true)),
            Some("off") => Ok(UciCommand::Debug(false)),
            Some(tok) => Err(UciParseError::Debug(tok.to_string())),
        },
        "isready" => Ok(UciCommand::IsReady),
        "setoption" => parse_set_option(&mut tokens),
        "ucinewgame" => Ok(UciCommand::NewGame),
        "position" => parse_position(&mut tokens),
        "go" => parse_go(&mut tokens),
        "stop" => Ok(UciCommand::Stop),
        "quit" => Ok(UciCommand::Quit),
        "perft" => Ok(UciCommand::Perft(parse_int(tokens.next(), "perft depth")?)),
        _ => Err(UciParseError::UnknownCommand(first_tok.to_string())),
    }
}

/// Parse a `setoption` line from a UCI string. Assumes that the `"setoption"`
/// token in the line has already been consumed (i.e. that the next token will
/// be `"name"`).
fn parse_set_option<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> UciParseResult {
    // consume `name` token
    let name_tok = tokens
        .next()
        .ok_or(UciParseError::UnexpectedEol("`name` field of `setoption`"))?;
    if name_tok != "name" {
        return Err(UciParseError::Unexpected {
            expected: "name",
            found: name_tok.to_string(),
        });
    }

    // the name runs until `value` or the end of the line
    let mut name_toks = Vec::new();
    let mut has_value = false;
    for tok in tokens.by_ref() {
        if tok == "value" {
            has_value = true;
            break;
        }
        name_toks.push(tok);
    }
    let value = match has_value {
        true => Some(tokens.collect::<Vec<_>>().join(" ")),
        false => None,
    };

    Ok(UciCommand::SetOption {
        name: name_toks.join(" "),
        value,
    })
}

/// Parse a `position` UCI command line. Assumes that the `"position"` token
/// has already been consumed, so the next token will either be `"fen"` or
/// `"startpos"`.
fn parse_position<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> UciParseResult {
    let fen = match tokens
        .next()
        .ok_or(UciParseError::UnexpectedEol("position"))?
    {
        "fen" => {
            // the FEN runs until `moves` or the end of the line
            let mut fen_toks = Vec::new();
            for tok in tokens.by_ref() {
                if tok == "moves" {
                    break;
                }
                fen_toks.push(tok);
            }
            if fen_toks.is_empty() {
                return Err(UciParseError::UnexpectedEol("FEN"));
            }
            Some(fen_toks.join(" "))
        }
        "startpos" => {
            if let Some(moves_tok) = tokens.next() {
                if moves_tok != "moves" {
                    return Err(UciParseError::Unexpected {
                        expected: "moves",
                        found: moves_tok.to_string(),
                    });
                }
            }

            None
        }
        tok => {
            return Err(UciParseError::Unexpected {
                expected: "startpos",
                found: tok.to_string(),
            })
        }
    };

    Ok(UciCommand::Position {
        fen,
        moves: tokens.map(String::from).collect(),
    })
}

/// Parse a `go` command from UCI. Assumes the token `go` has already been
/// consumed. Unknown options are logged and skipped, and the moves of a
/// `searchmoves` option are consumed without restricting the search.
fn parse_go<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> UciParseResult {
    let mut tokens = tokens.peekable();
    let mut opts = Vec::new();
    // build the options
    while let Some(opt_tok) = tokens.next() {
        opts.push(match opt_tok {
            "ponder" => GoOption::Ponder,
            "wtime" => GoOption::WhiteTime(parse_clamped(tokens.next(), "wtime", u32::MAX)?),
            "btime" => GoOption::BlackTime(parse_clamped(tokens.next(), "btime", u32::MAX)?),
            "winc" => GoOption::WhiteInc(parse_clamped(tokens.next(), "winc", u32::MAX)?),
            "binc" => GoOption::BlackInc(parse_clamped(tokens.next(), "binc", u32::MAX)?),
            "movestogo" => {
                GoOption::MovesToGo(parse_clamped(tokens.next(), "movestogo", u8::MAX)?)
            }
            "depth" => GoOption::Depth(parse_clamped(tokens.next(), "depth", u8::MAX)?),
            "nodes" => GoOption::Nodes(parse_int(tokens.next(), "nodes")?),
            "mate" => GoOption::Mate(parse_clamped(tokens.next(), "mate", u8::MAX)?),
            "movetime" => {
                GoOption::MoveTime(parse_clamped(tokens.next(), "movetime", u32::MAX)?)
            }
            "infinite" => GoOption::Infinite,
            "searchmoves" => {
                let mut count = 0;
                while tokens.next_if(|tok| Move::from_uci(tok).is_ok()).is_some() {
                    count += 1;
                }
                warn!("ignoring `searchmoves` with {count} moves");
                continue;
            }
            _ => {
                warn!("skipping unknown `go` option `{opt_tok}`");
                continue;
            }
        });
    }

    Ok(UciCommand::Go(opts))
}

/// Parse an unsigned integer field, saturating at `max` when it does not fit
/// in `T`.
fn parse_clamped<T: TryFrom<u64>>(
    x: Option<&str>,
    field: &'static str,
    max: T,
) -> Result<T, UciParseError> {
    let n: u64 = parse_int(x, field)?;
    Ok(T::try_from(n).unwrap_or(max))
}

/// A helper function which will attempt to parse an int out of a token if it
/// is `Some`, and fail if it cannot parse the int or if it is given `None`.
/// Negative clock values, which some GUIs send when a player has flagged, are
/// clamped to zero.
fn parse_int<T>(x: Option<&str>, field: &'static str) -> Result<T, UciParseError>
where
    T: std::str::FromStr<Err = ParseIntError> + Default,
{
    let s = x.ok_or(UciParseError::UnexpectedEol(field))?;
    match s.strip_prefix('-') {
        Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            Ok(T::default())
        }
        _ => Ok(s.parse()?),
    }
}
