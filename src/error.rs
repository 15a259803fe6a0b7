//! Error types reported by configuration and residual assembly.
use std::error::Error;
use std::fmt;
use std::fmt::Display;

/// Errors detected while building the immutable run configuration.
///
/// All of these are fatal: they are reported before any grid work begins.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The Glen flow law exponent must satisfy `n > 1`.
    InvalidGlenExponent(f64),
    /// The p-Laplacian exponent must satisfy `p > 1`.
    InvalidLaplacianExponent(f64),
    /// The porous-medium exponent must satisfy `q >= 0`.
    InvalidPorousExponent(f64),
    /// A parameter lies outside its admissible range.
    OutOfRange {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },
    /// An option was given a value that could not be parsed.
    MalformedOption { option: String, value: String },
    /// An enumerated option was given a value that is not among its choices.
    UnknownChoice {
        option: String,
        value: String,
        choices: Vec<&'static str>,
    },
    /// A grid needs at least two nodes in each direction.
    TooFewNodes { mx: usize, my: usize },
    /// The bounding box of a grid must have positive extent.
    EmptyDomain,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            ConfigError::InvalidGlenExponent(n) => {
                write!(f, "n = {} not allowed ... n > 1 is required", n)
            }
            ConfigError::InvalidLaplacianExponent(p) => {
                write!(f, "p = {} not allowed ... p > 1 is required", p)
            }
            ConfigError::InvalidPorousExponent(q) => {
                write!(f, "q = {} not allowed ... q >= 0 is required", q)
            }
            ConfigError::OutOfRange { name, value, expected } => {
                write!(f, "{} = {} is out of range (expected {})", name, value, expected)
            }
            ConfigError::MalformedOption { option, value } => {
                write!(f, "malformed value \"{}\" for option -{}", value, option)
            }
            ConfigError::UnknownChoice { option, value, choices } => {
                write!(
                    f,
                    "unknown value \"{}\" for option -{} (choices: {})",
                    value,
                    option,
                    choices.join(", ")
                )
            }
            ConfigError::TooFewNodes { mx, my } => {
                write!(f, "grid of {} x {} nodes is too small (at least 2 x 2 required)", mx, my)
            }
            ConfigError::EmptyDomain => write!(f, "grid bounding box has zero or negative extent"),
        }
    }
}

impl Error for ConfigError {}

/// An iterate value below its lower bound, detected by the opt-in admissibility check.
#[derive(Debug, Clone, PartialEq)]
pub struct NonAdmissibleIterate {
    pub j: usize,
    pub k: usize,
    pub value: f64,
    pub lower: f64,
}

impl Display for NonAdmissibleIterate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "non-admissible value u[k][j] = {:.3e} < {:.3e} at j,k = {},{}",
            self.value, self.lower, self.j, self.k
        )
    }
}

impl Error for NonAdmissibleIterate {}
