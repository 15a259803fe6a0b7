//! A small options database for command-line style options of the form `-name value`.
//!
//! Names are prefixed by the component they configure, e.g. `-ice_n 3` or `-cmb_ela 1500`.
//! Boolean options may omit the value, so `-dnl_dump` is the same as `-dnl_dump true`.
use crate::error::ConfigError;
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    values: HashMap<String, Option<String>>,
}

fn option_name(token: &str) -> Option<&str> {
    let name = token.strip_prefix('-')?;
    // Negative numbers are values, not names
    name.chars()
        .next()
        .filter(|c| c.is_ascii_alphabetic() || *c == '_')
        .map(|_| name)
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a sequence of arguments, not including the program name.
    ///
    /// Tokens that are neither option names nor the value of a preceding option are ignored.
    /// If an option is given more than once, the last occurrence wins.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::new();
        let mut current: Option<String> = None;
        for arg in args {
            let arg = arg.as_ref();
            match option_name(arg) {
                Some(name) => {
                    options.values.insert(name.to_string(), None);
                    current = Some(name.to_string());
                }
                None => {
                    if let Some(name) = current.take() {
                        options.values.insert(name, Some(arg.to_string()));
                    }
                }
            }
        }
        options
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(name.into(), Some(value.into()));
        self
    }

    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    fn parsed<V: FromStr>(&self, name: &str, default: V) -> Result<V, ConfigError> {
        match self.values.get(name) {
            None => Ok(default),
            Some(None) => Err(ConfigError::MalformedOption {
                option: name.to_string(),
                value: String::new(),
            }),
            Some(Some(value)) => value.parse().map_err(|_| ConfigError::MalformedOption {
                option: name.to_string(),
                value: value.clone(),
            }),
        }
    }

    pub fn real(&self, name: &str, default: f64) -> Result<f64, ConfigError> {
        self.parsed(name, default)
    }

    pub fn integer(&self, name: &str, default: usize) -> Result<usize, ConfigError> {
        self.parsed(name, default)
    }

    pub fn boolean(&self, name: &str, default: bool) -> Result<bool, ConfigError> {
        match self.values.get(name) {
            None => Ok(default),
            Some(None) => Ok(true),
            Some(Some(value)) => match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::MalformedOption {
                    option: name.to_string(),
                    value: value.clone(),
                }),
            },
        }
    }

    /// Looks up an enumerated option among named `choices`.
    pub fn choice<E: Copy>(&self, name: &str, choices: &[(&'static str, E)], default: E) -> Result<E, ConfigError> {
        match self.values.get(name) {
            None => Ok(default),
            Some(value) => {
                let value = value.as_deref().unwrap_or("");
                choices
                    .iter()
                    .find(|(choice, _)| choice.eq_ignore_ascii_case(value))
                    .map(|(_, e)| *e)
                    .ok_or_else(|| ConfigError::UnknownChoice {
                        option: name.to_string(),
                        value: value.to_string(),
                        choices: choices.iter().map(|(choice, _)| *choice).collect(),
                    })
            }
        }
    }
}
