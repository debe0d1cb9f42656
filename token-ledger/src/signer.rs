//! Signer capability
//!
//! The ledger never touches key material. A [`Signer`] turns a
//! [`TokenCall`] into a [`SignedCall`] carrying the caller address, the
//! public key and an Ed25519 signature; the submission actor verifies it
//! before anything is applied.
//!
//! Addresses are derived from public keys: the last 20 bytes of
//! SHA-256(public key).

use crate::{
    types::{Address, Signature, TokenCall},
    Error, Result,
};
use ed25519_dalek::{Signature as DalekSignature, Signer as _, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Supplies the caller identity and authorizes calls
pub trait Signer: Send + Sync {
    /// Account this signer acts for
    fn address(&self) -> Address;

    /// Sign `call` under a fresh or caller-chosen submission id
    fn sign_call(&self, submission_id: Uuid, call: TokenCall) -> Result<SignedCall>;
}

/// A call authorized by its caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedCall {
    /// Unique id; the actor rejects replays
    pub submission_id: Uuid,
    /// The call itself
    pub call: TokenCall,
    /// Claimed caller
    pub caller: Address,
    /// Caller's Ed25519 public key
    pub public_key: [u8; 32],
    /// Signature over the canonical bytes
    pub signature: Signature,
}

impl SignedCall {
    /// Bytes covered by the signature
    pub fn canonical_bytes(
        submission_id: &Uuid,
        call: &TokenCall,
        caller: &Address,
    ) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&(submission_id, call, caller))?)
    }

    /// Check that the caller owns the key and the key signed this call
    pub fn verify(&self) -> Result<()> {
        let derived = address_from_public_key(&self.public_key);
        if derived != self.caller {
            return Err(Error::SignatureError(format!(
                "caller {} does not match public key (derives {})",
                self.caller, derived
            )));
        }

        let message = Self::canonical_bytes(&self.submission_id, &self.call, &self.caller)?;
        if !verify_signature(&message, &self.signature, &self.public_key) {
            return Err(Error::SignatureError(format!(
                "bad signature on submission {}",
                self.submission_id
            )));
        }

        Ok(())
    }
}

/// Ed25519 key pair for signing
#[derive(Debug)]
pub struct KeyPair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl KeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Self {
        Self::from_seed(&rand::random::<[u8; 32]>())
    }

    /// Create from seed (32 bytes) - deterministic generation
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let verifying_key = signing_key.verifying_key();

        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Get public key bytes
    pub fn public_key(&self) -> [u8; 32] {
        self.verifying_key.to_bytes()
    }

    /// Sign a message
    pub fn sign(&self, message: &[u8]) -> Signature {
        let signature = self.signing_key.sign(message);
        Signature::from_bytes(signature.to_bytes())
    }

    /// Verify a signature
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<()> {
        let dalek_sig = DalekSignature::from_bytes(signature.as_bytes());
        self.verifying_key
            .verify(message, &dalek_sig)
            .map_err(|e| Error::SignatureError(format!("Verification failed: {}", e)))
    }
}

impl Signer for KeyPair {
    fn address(&self) -> Address {
        address_from_public_key(&self.public_key())
    }

    fn sign_call(&self, submission_id: Uuid, call: TokenCall) -> Result<SignedCall> {
        let caller = self.address();
        let message = SignedCall::canonical_bytes(&submission_id, &call, &caller)?;
        let signature = self.sign(&message);

        Ok(SignedCall {
            submission_id,
            call,
            caller,
            public_key: self.public_key(),
            signature,
        })
    }
}

/// Derive the account address for a public key
pub fn address_from_public_key(public_key: &[u8; 32]) -> Address {
    let digest: [u8; 32] = Sha256::digest(public_key).into();
    Address::from_slice(&digest[12..])
}

/// Verify a signature with a public key
pub fn verify_signature(message: &[u8], signature: &Signature, public_key: &[u8; 32]) -> bool {
    let dalek_sig = DalekSignature::from_bytes(signature.as_bytes());

    let verifying_key = match VerifyingKey::from_bytes(public_key) {
        Ok(key) => key,
        Err(_) => return false,
    };

    verifying_key.verify(message, &dalek_sig).is_ok()
}
