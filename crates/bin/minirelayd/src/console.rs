//! Line-oriented control console.
//!
//! ```text
//! on <id> | off <id> | toggle <id>   drive a switch
//! input <id> <0|1>                   drive the virtual input of a slot
//! info [id]                          show one or all switches
//! config <id> <json>                 update a switch configuration
//! quit
//! ```

use std::num::ParseIntError;
use std::str::FromStr;

use minirelay_app::composition::Composition;
use minirelay_app::switch::Switch;
use minirelay_domain::error::MiniRelayError;
use minirelay_domain::id::SwitchId;
use serde_json::{Value, json};

use crate::board::Board;

/// Source tag for console commands.
pub const SOURCE_CONSOLE: &str = "console";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set { id: SwitchId, on: bool },
    Toggle { id: SwitchId },
    Input { id: SwitchId, level: bool },
    Info { id: Option<SwitchId> },
    Config { id: SwitchId, payload: String },
    Quit,
}

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("unknown command {0:?}")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("invalid switch id")]
    InvalidId(#[from] ParseIntError),
    #[error("no switch {0}")]
    NoSuchSwitch(SwitchId),
    #[error("switch {0} has no input")]
    NoInput(SwitchId),
    #[error(transparent)]
    Relay(#[from] MiniRelayError),
}

impl FromStr for Command {
    type Err = ConsoleError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match verb {
            "on" | "off" => Ok(Self::Set {
                id: parse_id(rest, "on|off <id>")?,
                on: verb == "on",
            }),
            "toggle" => Ok(Self::Toggle {
                id: parse_id(rest, "toggle <id>")?,
            }),
            "input" => {
                const USAGE: &str = "input <id> <0|1>";
                let (id, level) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(ConsoleError::Usage(USAGE))?;
                let level = match level.trim() {
                    "0" => false,
                    "1" => true,
                    _ => return Err(ConsoleError::Usage(USAGE)),
                };
                Ok(Self::Input {
                    id: parse_id(id, USAGE)?,
                    level,
                })
            }
            "info" if rest.is_empty() => Ok(Self::Info { id: None }),
            "info" => Ok(Self::Info {
                id: Some(parse_id(rest, "info [id]")?),
            }),
            "config" => {
                const USAGE: &str = "config <id> <json>";
                let (id, payload) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(ConsoleError::Usage(USAGE))?;
                Ok(Self::Config {
                    id: parse_id(id, USAGE)?,
                    payload: payload.trim().to_string(),
                })
            }
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(ConsoleError::Unknown(other.to_string())),
        }
    }
}

fn parse_id(raw: &str, usage: &'static str) -> Result<SwitchId, ConsoleError> {
    if raw.is_empty() {
        return Err(ConsoleError::Usage(usage));
    }
    Ok(raw.parse()?)
}

/// Run `command`, returning the JSON reply. `Quit` yields `None`.
///
/// # Errors
///
/// Returns a [`ConsoleError`] for unknown slots and rejected configuration
/// payloads.
pub fn execute(
    command: Command,
    composition: &Composition,
    board: &Board,
) -> Result<Option<Value>, ConsoleError> {
    let reply = match command {
        Command::Set { id, on } => {
            let switch = find(composition, id)?;
            switch.set_state(on, SOURCE_CONSOLE);
            to_json(switch)
        }
        Command::Toggle { id } => {
            let switch = find(composition, id)?;
            switch.set_state(!switch.state(), SOURCE_CONSOLE);
            to_json(switch)
        }
        Command::Input { id, level } => {
            let input = board.input(id).ok_or(ConsoleError::NoInput(id))?;
            input.set_level(level);
            to_json(find(composition, id)?)
        }
        Command::Info { id: Some(id) } => to_json(find(composition, id)?),
        Command::Info { id: None } => {
            let components: Vec<_> = composition.switches().iter().map(Switch::info).collect();
            json!({ "components": components })
        }
        Command::Config { id, payload } => {
            let update = find(composition, id)?.set_config_str(&payload)?;
            json!(update)
        }
        Command::Quit => return Ok(None),
    };
    Ok(Some(reply))
}

fn find(composition: &Composition, id: SwitchId) -> Result<&Switch, ConsoleError> {
    composition.switch(id).ok_or(ConsoleError::NoSuchSwitch(id))
}

fn to_json(switch: &Switch) -> Value {
    json!(switch.info())
}
