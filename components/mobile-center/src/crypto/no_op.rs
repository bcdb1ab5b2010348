/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use super::{CryptoHandler, KeyEntry};
use crate::Result;

/// Handler that does not actually encrypt anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct CryptoNoOpHandler;

impl CryptoNoOpHandler {
    pub const ALGORITHM: &'static str = "None";
}

impl CryptoHandler for CryptoNoOpHandler {
    fn algorithm(&self) -> &str {
        Self::ALGORITHM
    }

    fn generate_key(&self, _alias: &str) -> Result<Option<KeyEntry>> {
        Ok(None)
    }

    fn encrypt(&self, _key: Option<&KeyEntry>, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn decrypt(&self, _key: Option<&KeyEntry>, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_identity() {
        let handler = CryptoNoOpHandler;
        assert_eq!(handler.algorithm(), "None");
        assert_eq!(handler.generate_key("mobile.center.None").unwrap(), None);
        let data = b"push token";
        assert_eq!(handler.encrypt(None, data).unwrap(), data);
        assert_eq!(handler.decrypt(None, data).unwrap(), data);
    }
}
