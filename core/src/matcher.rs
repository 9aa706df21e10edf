//! Single forward pass over the word stream.
//!
//! Each word is classified (help request, flag, positional, subcommand),
//! resolved to a binding, and the binding pulls its value tokens. The first
//! problem stops the pass. After the stream is exhausted, unobserved bindings
//! either receive their default or cause a missing-value failure, checked in
//! declaration order.

use tracing::{debug, trace};

use crate::config::ParserConfig;
use crate::error::{Error, ParseError};
use crate::field::Rejection;
use crate::identifier::{is_help_token, looks_like_flag};
use crate::registry::{Binding, Registry};
use crate::router::Dispatch;

/// Why a pass stopped early.
pub(crate) enum Halt {
    /// Help token seen at this level.
    Help,
    /// Input problem at this level.
    Failed(ParseError),
    /// A subcommand's own parse stopped; passed through unchanged.
    Nested(Error),
}

impl From<ParseError> for Halt {
    fn from(error: ParseError) -> Self {
        Halt::Failed(error)
    }
}

pub(crate) fn run<'a>(
    registry: &mut Registry<'a>,
    mut router: Option<&mut (dyn Dispatch + 'a)>,
    config: &ParserConfig,
    words: &[String],
) -> Result<(), Halt> {
    let mut observed = vec![false; registry.len()];
    let mut cursor = 0;
    let mut next_positional = 0;
    let mut selected = false;

    while let Some(word) = words.get(cursor) {
        cursor += 1;

        if is_help_token(word) {
            debug!(token = %word, "Help requested");
            return Err(Halt::Help);
        }

        let is_flag = looks_like_flag(word);
        let index = if is_flag {
            registry
                .flag_index(word)
                .ok_or_else(|| ParseError::UnknownFlag(word.clone()))?
        } else if let Some(index) = registry.positional_index(next_positional) {
            next_positional += 1;
            index
        } else if let Some(router) = router.as_deref_mut() {
            let rest = &words[cursor..];
            debug!(subcommand = %word, remaining = rest.len(), "Dispatching subcommand");
            match router.dispatch(word, config, rest) {
                Some(Ok(())) => {
                    selected = true;
                    break;
                }
                Some(Err(error)) => return Err(Halt::Nested(error)),
                None => {
                    return Err(Halt::Failed(ParseError::UnknownSubcommand {
                        name: word.clone(),
                        available: router.names(),
                    }));
                }
            }
        } else {
            return Err(Halt::Failed(ParseError::ExtraPositional(word.clone())));
        };

        let binding = registry.binding_mut(index);
        let (tokens, consumed) = value_tokens(binding, word, is_flag, &words[cursor..])?;
        cursor += consumed;
        binding
            .slot
            .assign(&tokens, &binding.choices)
            .map_err(|rejection| rejected(binding, rejection))?;
        trace!(identifier = %binding.identifier, tokens = ?tokens, "Bound value");
        observed[index] = true;
    }

    for (index, binding) in registry.bindings_mut().enumerate() {
        if observed[index] {
            continue;
        }
        if !binding.has_default {
            return Err(Halt::Failed(ParseError::MissingValue(
                binding.identifier.clone(),
            )));
        }
        binding.slot.apply_default();
    }

    if let Some(router) = router {
        if !selected {
            if router.required() {
                return Err(Halt::Failed(ParseError::MissingSubcommand {
                    available: router.names(),
                }));
            }
            router.clear();
        }
    }

    Ok(())
}

/// Picks the value tokens for `binding`, which was matched by `word`.
///
/// Returns the tokens and how many words after `word` they used up. A scalar
/// value is taken verbatim unless it is the help token.
fn value_tokens<'w>(
    binding: &Binding<'_>,
    word: &'w str,
    is_flag: bool,
    rest: &'w [String],
) -> Result<(Vec<&'w str>, usize), Halt> {
    if !is_flag {
        if !binding.shape.is_list() {
            return Ok((vec![word], 0));
        }
        let run = list_run(rest);
        let tokens = std::iter::once(word)
            .chain(rest[..run].iter().map(String::as_str))
            .collect();
        return Ok((tokens, run));
    }

    if binding.is_switch() {
        return Ok((vec!["true"], 0));
    }

    if binding.shape.is_list() {
        let run = list_run(rest);
        if run == 0 {
            return Err(ParseError::MissingFlagValue(word.to_string()).into());
        }
        return Ok((rest[..run].iter().map(String::as_str).collect(), run));
    }

    match rest.first() {
        Some(value) if is_help_token(value) => {
            debug!(flag = %word, "Help requested in place of a flag value");
            Err(Halt::Help)
        }
        Some(value) => Ok((vec![value.as_str()], 1)),
        None => Err(ParseError::MissingFlagValue(word.to_string()).into()),
    }
}

/// Number of leading words up to the next flag-looking one.
fn list_run(rest: &[String]) -> usize {
    rest.iter().take_while(|word| !looks_like_flag(word)).count()
}

fn rejected(binding: &Binding<'_>, rejection: Rejection) -> ParseError {
    match rejection {
        Rejection::Malformed { expected, value } => ParseError::InvalidValue {
            identifier: binding.identifier.clone(),
            value,
            expected,
        },
        Rejection::NotAChoice { value } => ParseError::InvalidChoice {
            identifier: binding.identifier.clone(),
            value,
            choices: binding.choices.clone(),
        },
    }
}
