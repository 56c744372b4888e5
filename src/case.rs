use num_bigint::BigInt;
use tracing::{debug, info};

use crate::config::Config;
use crate::decoder::ValueDecoder;
use crate::document::TestCase;
use crate::error::{ReconstructResult, ValidationError};
use crate::interpolate::{Interpolator, Share};

/// Turns one test case into its secret.
#[derive(Clone, Debug, Default)]
pub struct CaseProcessor {
    decoder: ValueDecoder,
    interpolator: Interpolator,
}

impl CaseProcessor {
    pub fn new(decoder: ValueDecoder, interpolator: Interpolator) -> Self {
        CaseProcessor {
            decoder,
            interpolator,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let validator = config.validator();
        CaseProcessor {
            decoder: ValueDecoder::new(validator.clone()),
            interpolator: Interpolator::new(config.strategy, validator),
        }
    }

    pub fn process(&self, case: &TestCase) -> ReconstructResult<BigInt> {
        let shares = self.select_shares(case)?;
        let secret = self.interpolator.interpolate(&shares)?;
        info!(k = case.keys.k, secret = %secret, "reconstructed secret");
        Ok(secret)
    }

    /// Checks the threshold, decodes every share and keeps the first `k`.
    pub fn select_shares(&self, case: &TestCase) -> ReconstructResult<Vec<Share>> {
        let (n, k) = (case.keys.n, case.keys.k);
        if n < k {
            return Err(ValidationError::ThresholdExceedsTotal { n, k }.into());
        }
        if k == 0 {
            return Err(ValidationError::ZeroThreshold.into());
        }

        let mut shares = Vec::with_capacity(case.shares.len());
        for (x, encoded) in &case.shares {
            let y = self.decoder.decode(encoded.base, &encoded.value)?;
            debug!(x, base = encoded.base, y = %y, "decoded share");
            shares.push(Share { x: *x, y });
        }

        if (shares.len() as u64) < k {
            return Err(ValidationError::InsufficientShares {
                needed: k,
                got: shares.len(),
            }
            .into());
        }
        shares.truncate(k as usize);
        Ok(shares)
    }
}
