//! exit codes for eligibility commands
//!
//! 0 = success (and "eligible" for `check`), non-zero = failure
//! specific codes help scripts distinguish a rejected cart from a broken invocation

/// command completed successfully, or the cart is eligible
pub const SUCCESS: i32 = 0;

/// general or unknown error
pub const ERROR: i32 = 1;

/// the cart does not satisfy the criteria
pub const NOT_ELIGIBLE: i32 = 2;

/// cart or criteria document could not be read or parsed
pub const INPUT_ERROR: i32 = 3;

/// invalid command-line arguments
pub const INVALID_ARGS: i32 = 4;

/// configuration file error
pub const CONFIG_ERROR: i32 = 5;

/// named rule is not defined in the config
pub const RULE_NOT_FOUND: i32 = 6;
