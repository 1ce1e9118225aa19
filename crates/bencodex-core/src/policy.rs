//! Decoding strictness policy.
//!
//! A [`Policy`] is a plain `Copy` value passed into every top-level call and
//! threaded by parameter through every nested container. Nothing is read from
//! global state.

/// How a particular non-canonical condition is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Reject the input with a typed error
    Error,
    /// Accept the input and continue decoding
    Ignore,
}

impl Strategy {
    /// Returns true for [`Strategy::Error`]
    pub fn is_error(self) -> bool {
        self == Strategy::Error
    }
}

/// Default maximum container nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Strictness toggles and resource limits for decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Policy {
    /// Dictionary keys not claimed by the target schema
    pub unknown_keys: Strategy,
    /// Integers and length prefixes with a redundant leading zero
    pub leading_zeros: Strategy,
    /// Bytes after the outermost value
    pub trailing_data: Strategy,
    /// Input dictionaries whose keys are not strictly ascending
    pub key_order: Strategy,
    /// Maximum list/dictionary nesting depth
    pub max_depth: usize,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            unknown_keys: Strategy::Ignore,
            leading_zeros: Strategy::Error,
            trailing_data: Strategy::Error,
            key_order: Strategy::Error,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Policy {
    /// Creates a policy with the recommended defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Every toggle set to [`Strategy::Error`]
    pub fn strict() -> Self {
        Self {
            unknown_keys: Strategy::Error,
            ..Self::default()
        }
    }

    /// Every toggle set to [`Strategy::Ignore`]
    pub fn lenient() -> Self {
        Self {
            unknown_keys: Strategy::Ignore,
            leading_zeros: Strategy::Ignore,
            trailing_data: Strategy::Ignore,
            key_order: Strategy::Ignore,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the unknown-key strategy
    pub fn unknown_keys(mut self, strategy: Strategy) -> Self {
        self.unknown_keys = strategy;
        self
    }

    /// Sets the leading-zero strategy
    pub fn leading_zeros(mut self, strategy: Strategy) -> Self {
        self.leading_zeros = strategy;
        self
    }

    /// Sets the trailing-data strategy
    pub fn trailing_data(mut self, strategy: Strategy) -> Self {
        self.trailing_data = strategy;
        self
    }

    /// Sets the dictionary key order strategy
    pub fn key_order(mut self, strategy: Strategy) -> Self {
        self.key_order = strategy;
        self
    }

    /// Sets the maximum nesting depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}
