use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::decoder::{RangeValidator, DEFAULT_BOUND_BITS};
use crate::error::ConfigError;
use crate::interpolate::Strategy;

/// Files processed when none are given.
pub const DEFAULT_INPUTS: [&str; 2] = ["testcase1.json", "testcase2.json"];

pub const MAX_BOUND_BITS: u32 = 65_536;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Width of the accepted share and secret range, `(0, 2^bits - 1]`.
    pub bound_bits: u32,
    pub strategy: Strategy,
    pub inputs: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bound_bits: DEFAULT_BOUND_BITS,
            strategy: Strategy::default(),
            inputs: DEFAULT_INPUTS.iter().map(PathBuf::from).collect(),
        }
    }
}

impl Config {
    pub fn check(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_BOUND_BITS).contains(&self.bound_bits) {
            return Err(ConfigError::BoundBits {
                bits: self.bound_bits,
                max: MAX_BOUND_BITS,
            });
        }
        Ok(())
    }

    pub fn validator(&self) -> RangeValidator {
        RangeValidator::new(self.bound_bits)
    }
}
