use serde_json::Value;
use thiserror::Error;

use crate::core::action::NavigationAction;
use crate::core::route::Params;

/// Shell input, one per line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // Mapped straight onto a NavigationAction
    Navigate { name: String, params: Option<Params> },
    Push { name: String, params: Option<Params> },
    Pop(usize),
    PopToTop,
    Replace { name: String, params: Option<Params> },
    Back,
    Jump { name: String, params: Option<Params> },
    Drawer(DrawerCommand),
    /// `key` is a route key, or `.` for the focused leaf route.
    Params { key: String, params: Params },

    // Handled by the shell itself
    Focus { name: String, focused: bool },
    Dogs(Option<String>),
    Adopt(String),
    Release(String),
    Adopted,
    State,
    Describe,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerCommand {
    Open,
    Close,
    Toggle,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("params must be a JSON object: {0}")]
    BadParams(String),
}

pub const HELP: &str = "\
navigate NAME [JSON]    go to NAME
push NAME [JSON]        push NAME onto the stack
pop [N]                 pop N screens (default 1)
top                     pop to the first screen
replace NAME [JSON]     replace the focused screen
back                    go back
jump NAME [JSON]        switch tab / drawer item
drawer open|close|toggle
params KEY|. JSON       merge params into a route
focus NAME true|false   set the test screen's focus intent
dogs [QUERY]            list the catalog, nearest first
adopt NAME | release NAME | adopted
state | describe | help | quit";

/// Parses one input line. Blank lines are `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = split_word(line);

    let command = match word {
        "navigate" | "nav" => {
            let (name, params) = name_and_params(rest, "navigate NAME [JSON]")?;
            Command::Navigate { name, params }
        }
        "push" => {
            let (name, params) = name_and_params(rest, "push NAME [JSON]")?;
            Command::Push { name, params }
        }
        "pop" => match rest {
            "" => Command::Pop(1),
            n => Command::Pop(n.parse().map_err(|_| CommandError::Usage("pop [N]"))?),
        },
        "top" => Command::PopToTop,
        "replace" => {
            let (name, params) = name_and_params(rest, "replace NAME [JSON]")?;
            Command::Replace { name, params }
        }
        "back" => Command::Back,
        "jump" => {
            let (name, params) = name_and_params(rest, "jump NAME [JSON]")?;
            Command::Jump { name, params }
        }
        "drawer" => match rest {
            "open" => Command::Drawer(DrawerCommand::Open),
            "close" => Command::Drawer(DrawerCommand::Close),
            "toggle" | "" => Command::Drawer(DrawerCommand::Toggle),
            _ => return Err(CommandError::Usage("drawer open|close|toggle")),
        },
        "params" => {
            let (key, json) = split_word(rest);
            if key.is_empty() || json.is_empty() {
                return Err(CommandError::Usage("params KEY|. JSON"));
            }
            Command::Params {
                key: key.to_string(),
                params: parse_params(json)?,
            }
        }
        "focus" => {
            let (name, flag) = split_word(rest);
            let focused = match flag {
                "true" | "on" => true,
                "false" | "off" => false,
                _ => return Err(CommandError::Usage("focus NAME true|false")),
            };
            Command::Focus {
                name: name.to_string(),
                focused,
            }
        }
        "dogs" => Command::Dogs((!rest.is_empty()).then(|| rest.to_string())),
        "adopt" if !rest.is_empty() => Command::Adopt(rest.to_string()),
        "adopt" => return Err(CommandError::Usage("adopt NAME")),
        "release" if !rest.is_empty() => Command::Release(rest.to_string()),
        "release" => return Err(CommandError::Usage("release NAME")),
        "adopted" => Command::Adopted,
        "state" => Command::State,
        "describe" => Command::Describe,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

impl Command {
    /// The navigation action this command stands for, if it is one.
    ///
    /// `Params` with key `.` is resolved by the caller, which knows the state.
    pub fn to_action(&self) -> Option<NavigationAction> {
        let action = match self {
            Command::Navigate { name, params } => NavigationAction::Navigate {
                name: name.clone(),
                params: params.clone(),
                merge: false,
            },
            Command::Push { name, params } => NavigationAction::Push {
                name: name.clone(),
                params: params.clone(),
            },
            Command::Pop(count) => NavigationAction::Pop { count: *count },
            Command::PopToTop => NavigationAction::PopToTop,
            Command::Replace { name, params } => NavigationAction::Replace {
                name: name.clone(),
                params: params.clone(),
            },
            Command::Back => NavigationAction::GoBack,
            Command::Jump { name, params } => NavigationAction::JumpTo {
                name: name.clone(),
                params: params.clone(),
            },
            Command::Drawer(DrawerCommand::Open) => NavigationAction::OpenDrawer,
            Command::Drawer(DrawerCommand::Close) => NavigationAction::CloseDrawer,
            Command::Drawer(DrawerCommand::Toggle) => NavigationAction::ToggleDrawer,
            Command::Params { key, params } => NavigationAction::SetParams {
                key: key.clone(),
                params: params.clone(),
            },
            _ => return None,
        };
        Some(action)
    }
}

fn split_word(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

fn name_and_params(rest: &str, usage: &'static str) -> Result<(String, Option<Params>), CommandError> {
    let (name, json) = split_word(rest);
    if name.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    let params = if json.is_empty() {
        None
    } else {
        Some(parse_params(json)?)
    };
    Ok((name.to_string(), params))
}

fn parse_params(json: &str) -> Result<Params, CommandError> {
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(CommandError::BadParams(other.to_string())),
        Err(e) => Err(CommandError::BadParams(e.to_string())),
    }
}
