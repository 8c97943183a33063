/// One line of interactive input.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Query(String),
    Category(String),
    Scroll(f64),
    Top,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct InputParseError(pub String);

/// Parses `q <text>`, `category <tag>`, `scroll <offset>`, `top` and `quit`.
/// `q` and `category` with nothing after them clear that input.
pub fn parse_line(line: &str) -> Result<Option<InputEvent>, InputParseError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }

    let (command, rest) = match line.trim_start().split_once(' ') {
        Some((command, rest)) => (command, rest),
        None => (line.trim(), ""),
    };

    let event = match command {
        "q" | "query" => InputEvent::Query(rest.to_string()),
        "category" | "c" => InputEvent::Category(rest.trim().to_string()),
        "scroll" => {
            let offset = rest
                .trim()
                .parse::<f64>()
                .map_err(|_| InputParseError(format!("invalid scroll offset '{}'", rest.trim())))?;
            InputEvent::Scroll(offset)
        }
        "top" => InputEvent::Top,
        "quit" | "exit" => InputEvent::Quit,
        other => return Err(InputParseError(format!("unknown command '{other}'"))),
    };
    Ok(Some(event))
}
