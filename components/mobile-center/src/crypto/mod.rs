/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Module providing the encryption abstraction used for locally stored data.
//!
//! Mainly exports a trait [`CryptoHandler`], one strategy per algorithm, and
//! [`CryptoUtils`] which picks a strategy and tags what it produces.
//!
//! Encrypted values are stored as `<algorithm>:<base64 data>`, so that data
//! written with one algorithm can still be read after the preferred algorithm
//! changes. [`CryptoNoOpHandler`] is always available as the last resort; it
//! is what ends up being used when the platform offers no working key store.

use std::{collections::HashMap, sync::Arc};

use base64::{engine::general_purpose::STANDARD, Engine};
use parking_lot::Mutex;

use crate::{logging::LOG_TAG, Result};

mod no_op;

pub use no_op::CryptoNoOpHandler;

/// Separates the algorithm name from the encrypted data.
pub const ALGORITHM_DATA_SEPARATOR: char = ':';

const KEY_ALIAS_PREFIX: &str = "mobile.center.";

/// Key material generated by a handler.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyEntry {
    pub alias: String,
    pub material: Vec<u8>,
}

impl std::fmt::Debug for KeyEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyEntry")
            .field("alias", &self.alias)
            .finish_non_exhaustive()
    }
}

/// One encryption algorithm.
pub trait CryptoHandler: Send + Sync {
    /// Name of the algorithm, used as the prefix of encrypted values.
    fn algorithm(&self) -> &str;

    /// Creates the key stored under `alias`. Handlers that need no key return `None`.
    fn generate_key(&self, alias: &str) -> Result<Option<KeyEntry>>;

    fn encrypt(&self, key: Option<&KeyEntry>, data: &[u8]) -> Result<Vec<u8>>;

    fn decrypt(&self, key: Option<&KeyEntry>, data: &[u8]) -> Result<Vec<u8>>;
}

pub struct CryptoUtils {
    // In order of preference, the no-op handler is always last.
    handlers: Vec<Arc<dyn CryptoHandler>>,
    keys: Mutex<HashMap<String, Option<KeyEntry>>>,
}

impl CryptoUtils {
    pub fn new() -> Self {
        Self::with_handlers(Vec::new())
    }

    pub fn with_handlers(handlers: Vec<Arc<dyn CryptoHandler>>) -> Self {
        let mut handlers: Vec<Arc<dyn CryptoHandler>> = handlers
            .into_iter()
            .filter(|h| h.algorithm() != CryptoNoOpHandler::ALGORITHM)
            .collect();
        handlers.push(Arc::new(CryptoNoOpHandler));
        Self {
            handlers,
            keys: Mutex::new(HashMap::new()),
        }
    }

    /// Algorithms in order of preference.
    pub fn algorithms(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.algorithm()).collect()
    }

    /// Encrypts `data` with the first handler that succeeds.
    pub fn encrypt(&self, data: &str) -> String {
        for handler in &self.handlers {
            let encrypted = self
                .key_for(handler.as_ref())
                .and_then(|key| handler.encrypt(key.as_ref(), data.as_bytes()));
            match encrypted {
                Ok(encrypted) => return Self::tag(handler.algorithm(), &encrypted),
                Err(e) => log::error!(
                    target: LOG_TAG,
                    "Failed to encrypt data with {}: {}",
                    handler.algorithm(),
                    e
                ),
            }
        }
        // Not reached, the no-op handler never fails.
        Self::tag(CryptoNoOpHandler::ALGORITHM, data.as_bytes())
    }

    /// Decrypts a value produced by [`CryptoUtils::encrypt`]. Values without
    /// a known algorithm prefix were stored before encryption existed and
    /// are returned as is.
    pub fn decrypt(&self, data: &str) -> Result<String> {
        let (algorithm, encoded) = match data.split_once(ALGORITHM_DATA_SEPARATOR) {
            Some(parts) => parts,
            None => return Ok(data.to_owned()),
        };
        let handler = match self.handlers.iter().find(|h| h.algorithm() == algorithm) {
            Some(handler) => handler,
            None => return Ok(data.to_owned()),
        };
        let encrypted = STANDARD.decode(encoded)?;
        let key = self.key_for(handler.as_ref())?;
        let decrypted = handler.decrypt(key.as_ref(), &encrypted)?;
        Ok(String::from_utf8(decrypted)?)
    }

    fn tag(algorithm: &str, data: &[u8]) -> String {
        format!(
            "{}{}{}",
            algorithm,
            ALGORITHM_DATA_SEPARATOR,
            STANDARD.encode(data)
        )
    }

    fn key_for(&self, handler: &dyn CryptoHandler) -> Result<Option<KeyEntry>> {
        let alias = format!("{}{}", KEY_ALIAS_PREFIX, handler.algorithm());
        let mut keys = self.keys.lock();
        if let Some(key) = keys.get(&alias) {
            return Ok(key.clone());
        }
        let key = handler.generate_key(&alias)?;
        keys.insert(alias, key.clone());
        Ok(key)
    }
}

impl Default for CryptoUtils {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// XORs with the key material. Good enough to tell handlers apart.
    #[derive(Default)]
    struct XorHandler {
        generated: AtomicUsize,
    }

    impl CryptoHandler for XorHandler {
        fn algorithm(&self) -> &str {
            "XOR"
        }

        fn generate_key(&self, alias: &str) -> Result<Option<KeyEntry>> {
            self.generated.fetch_add(1, Ordering::SeqCst);
            Ok(Some(KeyEntry {
                alias: alias.to_owned(),
                material: vec![0x5a, 0xa5],
            }))
        }

        fn encrypt(&self, key: Option<&KeyEntry>, data: &[u8]) -> Result<Vec<u8>> {
            let key = key.ok_or_else(|| Error::CryptoError("no key".into()))?;
            Ok(data
                .iter()
                .zip(key.material.iter().cycle())
                .map(|(d, k)| d ^ k)
                .collect())
        }

        fn decrypt(&self, key: Option<&KeyEntry>, data: &[u8]) -> Result<Vec<u8>> {
            self.encrypt(key, data)
        }
    }

    struct BrokenHandler;

    impl CryptoHandler for BrokenHandler {
        fn algorithm(&self) -> &str {
            "RSA/ECB/PKCS1Padding"
        }

        fn generate_key(&self, _alias: &str) -> Result<Option<KeyEntry>> {
            Err(Error::CryptoError("key store unavailable".into()))
        }

        fn encrypt(&self, _key: Option<&KeyEntry>, _data: &[u8]) -> Result<Vec<u8>> {
            unreachable!()
        }

        fn decrypt(&self, _key: Option<&KeyEntry>, _data: &[u8]) -> Result<Vec<u8>> {
            unreachable!()
        }
    }

    #[test]
    fn test_no_op_only() {
        let crypto = CryptoUtils::new();
        assert_eq!(crypto.algorithms(), vec!["None"]);
        let encrypted = crypto.encrypt("my token");
        assert_eq!(encrypted, format!("None:{}", STANDARD.encode("my token")));
        assert_eq!(crypto.decrypt(&encrypted).unwrap(), "my token");
    }

    #[test]
    fn test_preferred_handler_and_key_reuse() {
        let xor = Arc::new(XorHandler::default());
        let crypto = CryptoUtils::with_handlers(vec![xor.clone()]);
        assert_eq!(crypto.algorithms(), vec!["XOR", "None"]);

        let first = crypto.encrypt("secret");
        let second = crypto.encrypt("secret");
        assert!(first.starts_with("XOR:"));
        assert_eq!(first, second);
        assert_eq!(crypto.decrypt(&first).unwrap(), "secret");
        assert_eq!(xor.generated.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_falls_back_when_handler_fails() {
        let crypto = CryptoUtils::with_handlers(vec![Arc::new(BrokenHandler)]);
        let encrypted = crypto.encrypt("secret");
        assert!(encrypted.starts_with("None:"));
        assert_eq!(crypto.decrypt(&encrypted).unwrap(), "secret");
    }

    #[test]
    fn test_decrypt_legacy_and_unknown() {
        let crypto = CryptoUtils::new();
        assert_eq!(crypto.decrypt("plain-token").unwrap(), "plain-token");
        // The prefix is not an algorithm we know, so this is plain data too.
        assert_eq!(crypto.decrypt("https://example.com").unwrap(), "https://example.com");
        assert!(matches!(
            crypto.decrypt("None:%%%"),
            Err(Error::Base64Decode(_))
        ));
    }

    #[test]
    fn test_no_op_cannot_be_displaced() {
        let crypto = CryptoUtils::with_handlers(vec![Arc::new(CryptoNoOpHandler)]);
        assert_eq!(crypto.algorithms(), vec!["None"]);
    }
}
