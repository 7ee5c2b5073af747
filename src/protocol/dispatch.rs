//! Command table and dispatch of tokenized frames.
//!
//! Dispatch is a single table lookup plus an arity and terminator check.
//! Adding a command is an edit to [`COMMAND_TABLE`], not a new branch: each
//! entry carries the verb (one token, or two for compound verbs like
//! `DEF SETT`), the number of field tokens, and the builder that turns the
//! validated field span into a [`Record`].

use thiserror::Error;

use super::record::{self, Record};
use super::{END_TOKEN, START_TOKEN};

/// Why a completed frame was thrown away. Every rejection is terminal for the
/// frame: the accumulator has already cleared its buffer and the bytes are
/// gone, so recovery is simply the controller resending.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Reject {
    /// First token is not the start marker (leading junk got armed).
    #[error("frame does not begin with the start marker")]
    NotAFrame,
    /// Verb (or verb pair) not present in the command table.
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    /// Fewer tokens than the command's arity, or the terminator token is not
    /// where the arity says it must be.
    #[error("expected {expected} tokens ending in the terminator, found {found}")]
    ArityMismatch { expected: usize, found: usize },
}

/// Static descriptor of one recognized command shape.
pub struct CommandSpec {
    pub verb: &'static str,
    /// Second verb token for compound commands (`DEF SETT`).
    pub second: Option<&'static str>,
    /// Number of field tokens between the verb and the terminator.
    pub field_count: usize,
    build: fn(&[String]) -> Record,
}

impl CommandSpec {
    /// Leading tokens before the field span: start marker + verb tokens.
    fn header_len(&self) -> usize {
        2 + usize::from(self.second.is_some())
    }

    /// Total token arity including start marker and terminator.
    fn arity(&self) -> usize {
        self.header_len() + self.field_count + 1
    }
}

pub const COMMAND_TABLE: &[CommandSpec] = &[
    CommandSpec {
        verb: "PRIMARYMEAS",
        second: None,
        field_count: 6,
        build: record::primary_measurement,
    },
    CommandSpec {
        verb: "PHW",
        second: None,
        field_count: 1,
        build: record::ph_water,
    },
    CommandSpec {
        verb: "PHS",
        second: None,
        field_count: 1,
        build: record::ph_soil,
    },
    CommandSpec {
        verb: "SL",
        second: None,
        field_count: 3,
        build: record::sl,
    },
    CommandSpec {
        verb: "ST",
        second: None,
        field_count: 2,
        build: record::st,
    },
    CommandSpec {
        verb: "SF",
        second: None,
        field_count: 2,
        build: record::sf,
    },
    CommandSpec {
        verb: "CP",
        second: None,
        field_count: 1,
        build: record::cp,
    },
    CommandSpec {
        verb: "SI",
        second: None,
        field_count: 3,
        build: record::si,
    },
    CommandSpec {
        verb: "R",
        second: None,
        field_count: 0,
        build: record::reset,
    },
    CommandSpec {
        verb: "DEF",
        second: Some("SETT"),
        field_count: 0,
        build: record::default_settings,
    },
];

/// Validate a token sequence against the command table and build its record.
pub(crate) fn dispatch(tokens: &[String]) -> Result<Record, Reject> {
    if tokens.first().map(String::as_str) != Some(START_TOKEN) {
        return Err(Reject::NotAFrame);
    }
    let verb = match tokens.get(1) {
        Some(v) => v.as_str(),
        None => return Err(Reject::NotAFrame),
    };

    let spec = COMMAND_TABLE
        .iter()
        .find(|spec| {
            spec.verb == verb
                && match spec.second {
                    Some(second) => tokens.get(2).map(String::as_str) == Some(second),
                    None => true,
                }
        })
        .ok_or_else(|| Reject::UnknownCommand(verb.to_string()))?;

    let arity = spec.arity();
    if tokens.len() < arity {
        return Err(Reject::ArityMismatch {
            expected: arity,
            found: tokens.len(),
        });
    }
    let header = spec.header_len();
    let terminator = &tokens[header + spec.field_count];
    if terminator != END_TOKEN {
        return Err(Reject::ArityMismatch {
            expected: arity,
            found: tokens.len(),
        });
    }

    let fields = &tokens[header..header + spec.field_count];
    Ok((spec.build)(fields))
}
