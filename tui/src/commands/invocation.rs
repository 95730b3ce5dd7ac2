//! Free-form command lines such as `scroll direction=up amount=3`.

use chatterm_core::Argument;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub name: String,
    pub args: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    #[error("no command given")]
    Empty,
    #[error("unbalanced quotes in command line")]
    UnbalancedQuotes,
    #[error("expected name=value, got '{0}'")]
    MalformedArgument(String),
}

/// Splits `line` with shell quoting rules. The first word names the command
/// and every later word must be `name=value`. Values stay raw text until the
/// binder parses them against the command's schema.
pub fn parse_invocation(line: &str) -> Result<Invocation, InvocationError> {
    let words = shlex::split(line).ok_or(InvocationError::UnbalancedQuotes)?;
    let mut words = words.into_iter();
    let name = words.next().ok_or(InvocationError::Empty)?;

    let args = words
        .map(|word| {
            word.split_once('=')
                .filter(|(arg_name, _)| !arg_name.is_empty())
                .map(|(arg_name, value)| Argument::raw(arg_name, value))
                .ok_or_else(|| InvocationError::MalformedArgument(word.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Invocation { name, args })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn name_and_raw_arguments() {
        let invocation =
            parse_invocation("move_cursor direction=left amount=2 words=true").expect("parse");
        assert_eq!(
            invocation,
            Invocation {
                name: "move_cursor".to_string(),
                args: vec![
                    Argument::raw("direction", "left"),
                    Argument::raw("amount", "2"),
                    Argument::raw("words", "true"),
                ],
            }
        );
    }

    #[test]
    fn quoted_values_keep_spaces() {
        let invocation =
            parse_invocation(r#"message_window "message=hello there""#).expect("parse");
        assert_eq!(
            invocation.args,
            vec![Argument::raw("message", "hello there")]
        );
    }

    #[test]
    fn bare_name_has_no_arguments() {
        let invocation = parse_invocation("  quit ").expect("parse");
        assert_eq!(invocation.name, "quit");
        assert!(invocation.args.is_empty());
    }

    #[test]
    fn rejects_bad_lines() {
        assert_eq!(parse_invocation(""), Err(InvocationError::Empty));
        assert_eq!(
            parse_invocation("scroll \"direction=up"),
            Err(InvocationError::UnbalancedQuotes)
        );
        assert_eq!(
            parse_invocation("scroll up"),
            Err(InvocationError::MalformedArgument("up".to_string()))
        );
        assert_eq!(
            parse_invocation("scroll =up"),
            Err(InvocationError::MalformedArgument("=up".to_string()))
        );
    }
}
