//! Bundle client: turns secret files into sealed, signed requests and back.
//!
//! Nothing here talks to the network. Each operation builds the request
//! body (or reads the response body) and the caller's transport moves it.

use std::fmt;
use std::fs;
use std::path::Path;

use konbini_auth::store::write_owner_only;
use konbini_core::{ingredient, prove, ChunkedCipher, KeyPair, Proof, SecretEntry};
use zeroize::Zeroizing;

use crate::api::{
    self, FillBundleRequest, Ingredient, OrderBundleResponse, PrepareBundleRequest,
    RenameIngredientRequest, ReseasonIngredientRequest,
};
use crate::error::{KonbiniError, Result};

/// A bundle's key pair, cipher, and (once prepared) its id.
pub struct Bento {
    keys: KeyPair,
    cipher: ChunkedCipher,
    bento_id: Option<String>,
}

impl Bento {
    /// Create a client for a bundle that has not been prepared yet.
    pub fn new(keys: KeyPair, cipher: ChunkedCipher) -> Self {
        Self {
            keys,
            cipher,
            bento_id: None,
        }
    }

    pub fn with_bento_id(mut self, bento_id: impl Into<String>) -> Self {
        self.bento_id = Some(bento_id.into());
        self
    }

    pub fn bento_id(&self) -> Option<&str> {
        self.bento_id.as_deref()
    }

    pub fn keys(&self) -> &KeyPair {
        &self.keys
    }

    pub fn cipher(&self) -> &ChunkedCipher {
        &self.cipher
    }

    fn require_bento_id(&self) -> Result<&str> {
        self.bento_id().ok_or(KonbiniError::MissingBundleId)
    }

    /// Seal every entry's value under the bundle's public key.
    pub fn seal_entries(&self, entries: &[SecretEntry]) -> Result<Vec<Ingredient>> {
        entries
            .iter()
            .map(|entry| {
                let sealed = self.cipher.seal(self.keys.public_key(), entry.value())?;
                Ok(Ingredient {
                    name: entry.name().to_string(),
                    value: sealed.to_hex(),
                })
            })
            .collect()
    }

    /// Build the request that creates a bundle, optionally pre-filled from
    /// a secret file (pass an empty slice for none).
    pub fn prepare(&self, name: &str, env_text: &[u8]) -> Result<PrepareBundleRequest> {
        let entries = ingredient::parse(env_text)?;
        Ok(PrepareBundleRequest {
            name: name.to_string(),
            pub_key: self.keys.export_public()?,
            ingredients: self.seal_entries(&entries)?,
        })
    }

    /// Build the request that adds the entries of a secret file to the bundle.
    pub fn fill(&self, env_text: &[u8]) -> Result<FillBundleRequest> {
        let bento_id = self.require_bento_id()?.to_string();
        let entries = ingredient::parse(env_text)?;
        Ok(FillBundleRequest {
            bento_id,
            ingredients: self.seal_entries(&entries)?,
            proof: prove(&self.keys)?,
        })
    }

    /// A fresh proof for fetching the bundle.
    pub fn order_proof(&self) -> Result<Proof> {
        Ok(prove(&self.keys)?)
    }

    /// Endpoint path for fetching the bundle, signed with a fresh proof.
    pub fn order_path(&self) -> Result<String> {
        let bento_id = self.require_bento_id()?;
        Ok(api::order_path(bento_id, &self.order_proof()?))
    }

    pub fn throw_path(&self) -> Result<String> {
        Ok(api::throw_path(self.require_bento_id()?))
    }

    pub fn rename(&self, old_name: &str, new_name: &str) -> Result<RenameIngredientRequest> {
        Ok(RenameIngredientRequest {
            bento_id: self.require_bento_id()?.to_string(),
            proof: prove(&self.keys)?,
            old_name: old_name.to_string(),
            new_name: new_name.to_string(),
        })
    }

    /// Replace one ingredient's value.
    pub fn reseason(&self, name: &str, value: &[u8]) -> Result<ReseasonIngredientRequest> {
        let bento_id = self.require_bento_id()?.to_string();
        let sealed = self.cipher.seal(self.keys.public_key(), value)?;
        Ok(ReseasonIngredientRequest {
            bento_id,
            proof: prove(&self.keys)?,
            name: name.to_string(),
            value: sealed.to_hex(),
        })
    }

    /// Open every ingredient of a fetched bundle.
    ///
    /// The first ingredient that fails to decode or decrypt fails the whole
    /// call; no partial result is returned.
    pub fn open_entries(&self, response: &OrderBundleResponse) -> Result<Vec<SecretEntry>> {
        response
            .ingredients
            .iter()
            .map(|ingredient| {
                let plaintext = self
                    .cipher
                    .open_hex(&self.keys, &ingredient.value)
                    .map_err(|source| KonbiniError::Ingredient {
                        name: ingredient.name.clone(),
                        source,
                    })?;
                Ok(SecretEntry::new(ingredient.name.clone(), plaintext.as_slice()))
            })
            .collect()
    }

    /// Open a fetched bundle and render it as a secret file.
    pub fn unpack(&self, response: &OrderBundleResponse) -> Result<Zeroizing<Vec<u8>>> {
        Ok(ingredient::render(&self.open_entries(response)?))
    }
}

impl fmt::Debug for Bento {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bento")
            .field("keys", &self.keys)
            .field("padding", &self.cipher.padding())
            .field("bento_id", &self.bento_id)
            .finish()
    }
}

/// Read a PKCS#8 PEM private key from `path`.
pub fn load_private_key(path: impl AsRef<Path>) -> Result<KeyPair> {
    let pem = Zeroizing::new(fs::read(path)?);
    Ok(KeyPair::import_private(&pem)?)
}

/// Write the private key as PKCS#8 PEM, readable only by the owner.
pub fn write_private_key(path: impl AsRef<Path>, keys: &KeyPair) -> Result<()> {
    let pem = keys.export_private()?;
    write_owner_only(path.as_ref(), pem.as_bytes())?;
    Ok(())
}
