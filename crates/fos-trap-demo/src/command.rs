//! Demo Commands
//!
//! One command per stdin line.

use fos_dom::Key;
use fos_focus_trap::Configuration;
use thiserror::Error;

/// Command parse error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}'")]
    Unknown(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("Unknown flag '{0}'")]
    UnknownFlag(String),
}

/// Configuration flag that `toggle` flips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Active,
    DisableOnEsc,
    FocusOnEnable,
    DisableLoop,
    BlurOnDisable,
}

impl Flag {
    /// Parse a flag by its options-file key
    pub fn parse(name: &str) -> Result<Self, CommandError> {
        match name {
            "active" => Ok(Self::Active),
            "disableOnEsc" => Ok(Self::DisableOnEsc),
            "focusOnEnable" => Ok(Self::FocusOnEnable),
            "disableLoop" => Ok(Self::DisableLoop),
            "blurOnDisable" => Ok(Self::BlurOnDisable),
            other => Err(CommandError::UnknownFlag(other.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::DisableOnEsc => "disableOnEsc",
            Self::FocusOnEnable => "focusOnEnable",
            Self::DisableLoop => "disableLoop",
            Self::BlurOnDisable => "blurOnDisable",
        }
    }

    /// Current value in a configuration
    pub fn get(self, config: &Configuration) -> bool {
        match self {
            Self::Active => config.active,
            Self::DisableOnEsc => config.disable_on_esc,
            Self::FocusOnEnable => config.focus_on_enable,
            Self::DisableLoop => config.disable_loop,
            Self::BlurOnDisable => config.blur_on_disable,
        }
    }

    /// Mutable field for every flag except `active`, which has to go
    /// through enable/disable
    pub fn field(self, config: &mut Configuration) -> Option<&mut bool> {
        match self {
            Self::Active => None,
            Self::DisableOnEsc => Some(&mut config.disable_on_esc),
            Self::FocusOnEnable => Some(&mut config.focus_on_enable),
            Self::DisableLoop => Some(&mut config.disable_loop),
            Self::BlurOnDisable => Some(&mut config.blur_on_disable),
        }
    }
}

/// `remove` argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    Index(usize),
    Selector(String),
}

/// Demo command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tab,
    ShiftTab,
    Escape,
    /// Any other key by its `KeyboardEvent.key` name
    Key(Key),
    Focus(String),
    Toggle(Flag),
    Add(String),
    Remove(Removal),
    List,
    Quit,
}

impl Command {
    /// Parse a trimmed input line
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let argument = |name: &'static str| {
            if rest.is_empty() {
                Err(CommandError::MissingArgument(name))
            } else {
                Ok(rest.to_string())
            }
        };

        match word {
            "tab" => Ok(Self::Tab),
            "shift-tab" => Ok(Self::ShiftTab),
            "esc" | "escape" => Ok(Self::Escape),
            "key" => Ok(Self::Key(Key::parse(&argument("key")?))),
            "focus" => Ok(Self::Focus(argument("focus")?.trim_start_matches('#').to_string())),
            "toggle" => Ok(Self::Toggle(Flag::parse(&argument("toggle")?)?)),
            "add" => Ok(Self::Add(argument("add")?)),
            "remove" => {
                let arg = argument("remove")?;
                Ok(Self::Remove(match arg.parse::<usize>() {
                    Ok(index) => Removal::Index(index),
                    Err(_) => Removal::Selector(arg),
                }))
            }
            "list" | "ls" => Ok(Self::List),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys() {
        assert_eq!(Command::parse("tab"), Ok(Command::Tab));
        assert_eq!(Command::parse("  shift-tab "), Ok(Command::ShiftTab));
        assert_eq!(Command::parse("esc"), Ok(Command::Escape));
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(Command::parse("focus #outside"), Ok(Command::Focus("outside".into())));
        assert_eq!(Command::parse("toggle disableLoop"), Ok(Command::Toggle(Flag::DisableLoop)));
        assert_eq!(
            Command::parse("add div[role=\"dialog\"] > a"),
            Ok(Command::Add("div[role=\"dialog\"] > a".into()))
        );
        assert_eq!(Command::parse("key ArrowDown"), Ok(Command::Key(Key::ArrowDown)));
        assert_eq!(Command::parse("remove 2"), Ok(Command::Remove(Removal::Index(2))));
        assert_eq!(
            Command::parse("remove a[href]"),
            Ok(Command::Remove(Removal::Selector("a[href]".into())))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Command::parse("jump"), Err(CommandError::Unknown("jump".into())));
        assert_eq!(Command::parse("focus"), Err(CommandError::MissingArgument("focus")));
        assert_eq!(Command::parse("toggle loud"), Err(CommandError::UnknownFlag("loud".into())));
    }

    #[test]
    fn test_flag_names_round_trip() {
        for flag in [Flag::Active, Flag::DisableOnEsc, Flag::FocusOnEnable, Flag::DisableLoop, Flag::BlurOnDisable] {
            assert_eq!(Flag::parse(flag.name()), Ok(flag));
        }
    }
}
