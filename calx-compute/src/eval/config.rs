#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use serde_repr::{Deserialize_repr, Serialize_repr};

/// The default limit on nested function calls.
pub const MAX_RECURSION_DEPTH: usize = 1 << 8;

/// The trigonometric mode of an evaluation. This affects the input of `sin`, `cos` and `tan`, and
/// the output of `asin`, `acos` and `atan`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize_repr, Deserialize_repr))]
#[repr(u8)]
pub enum TrigMode {
    /// Use radians.
    #[default]
    Radians,

    /// Use degrees.
    Degrees,
}

impl std::fmt::Display for TrigMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrigMode::Radians => write!(f, "radians"),
            TrigMode::Degrees => write!(f, "degrees"),
        }
    }
}

/// Options for compiling and evaluating a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EvalConfig {
    /// The trigonometric mode.
    pub trig_mode: TrigMode,

    /// The maximum number of nested function calls before evaluation fails with a stack
    /// overflow.
    pub max_depth: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            trig_mode: TrigMode::default(),
            max_depth: MAX_RECURSION_DEPTH,
        }
    }
}

impl EvalConfig {
    /// Returns the configuration with the given trigonometric mode.
    pub fn with_trig_mode(self, trig_mode: TrigMode) -> Self {
        Self { trig_mode, ..self }
    }

    /// Returns the configuration with the given recursion limit.
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }
}
