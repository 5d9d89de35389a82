use std::fmt;

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand_core::OsRng;
use sha3::{Digest, Keccak256};

use klay_types::hexutil::{strip_hex_prefix, to_hex};
use klay_types::{Address, BigUint, SignatureData};

use crate::CryptoError;

pub const PRIVATE_KEY_LEN: usize = 32;

/// `v` offset of a signature that carries no chain id.
const LEGACY_V_OFFSET: u8 = 27;

fn uncompressed_point(key: &VerifyingKey) -> Vec<u8> {
    key.as_affine().to_encoded_point(false).as_bytes()[1..].to_vec()
}

/// Last 20 bytes of keccak256 over the untagged uncompressed point.
fn address_of(key: &VerifyingKey) -> Address {
    let digest = Keccak256::digest(uncompressed_point(key));
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest[12..]);
    Address::from(out)
}

/// A secp256k1 signing key.
#[derive(Clone)]
pub struct PrivateKey {
    inner: SigningKey,
}

impl PrivateKey {
    /// Fresh key from the OS random number generator.
    pub fn generate() -> Self {
        Self {
            inner: SigningKey::random(&mut OsRng),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != PRIVATE_KEY_LEN {
            return Err(CryptoError::InvalidPrivateKey);
        }
        let inner = SigningKey::from_slice(bytes).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { inner })
    }

    /// 64 hex digits, `0x` prefix optional.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let body = strip_hex_prefix(s);
        if body.len() != PRIVATE_KEY_LEN * 2 {
            return Err(CryptoError::InvalidPrivateKey);
        }
        let bytes = hex::decode(body).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Self::from_bytes(&bytes)
    }

    pub fn to_hex(&self) -> String {
        to_hex(&self.inner.to_bytes())
    }

    /// Uncompressed public key without the `0x04` tag (64 bytes).
    pub fn public_key(&self) -> Vec<u8> {
        uncompressed_point(self.inner.verifying_key())
    }

    /// Address derived from the key: last 20 bytes of keccak256(public key).
    pub fn derived_address(&self) -> Address {
        address_of(self.inner.verifying_key())
    }

    fn sign_recoverable(&self, digest: &[u8; 32]) -> Result<([u8; 64], u8), CryptoError> {
        let (sig, recid) = self
            .inner
            .sign_prehash_recoverable(digest)
            .map_err(|_| CryptoError::Signing)?;
        let mut bytes = [0u8; 64];
        bytes.copy_from_slice(&sig.to_bytes());
        Ok((bytes, u8::from(recid.is_y_odd())))
    }

    /// Signs a 32-byte digest, binding the result to `chain_id` through `v`.
    ///
    /// Nonces follow RFC 6979 and `s` is normalized to the lower half order,
    /// so the same key and digest always produce the same signature.
    pub fn sign(
        &self,
        digest: &[u8; 32],
        chain_id: &BigUint,
    ) -> Result<SignatureData, CryptoError> {
        let (bytes, recid) = self.sign_recoverable(digest)?;
        Ok(SignatureData::from_recoverable(
            &bytes[..32],
            &bytes[32..],
            recid,
            chain_id,
        ))
    }

    /// Signs a digest without chain binding: `v` is 27 or 28.
    pub fn ecsign(&self, digest: &[u8; 32]) -> Result<SignatureData, CryptoError> {
        let (bytes, recid) = self.sign_recoverable(digest)?;
        Ok(SignatureData::new(
            [LEGACY_V_OFFSET + recid],
            &bytes[..32],
            &bytes[32..],
        ))
    }
}

/// Address of the key that produced `sig` over `digest`.
///
/// Works for every `v` form [`SignatureData::recovery_id`] understands.
pub fn recover_address(digest: &[u8; 32], sig: &SignatureData) -> Result<Address, CryptoError> {
    let recid = sig
        .recovery_id()
        .and_then(RecoveryId::from_byte)
        .ok_or(CryptoError::InvalidSignature)?;
    if sig.r().len() > 32 || sig.s().len() > 32 {
        return Err(CryptoError::InvalidSignature);
    }
    let mut rs = [0u8; 64];
    rs[32 - sig.r().len()..32].copy_from_slice(sig.r());
    rs[64 - sig.s().len()..].copy_from_slice(sig.s());

    let signature = Signature::from_slice(&rs).map_err(|_| CryptoError::InvalidSignature)?;
    let key = VerifyingKey::recover_from_prehash(digest, &signature, recid)
        .map_err(|_| CryptoError::InvalidSignature)?;
    Ok(address_of(&key))
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("address", &self.derived_address())
            .finish_non_exhaustive()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for PrivateKey {}
