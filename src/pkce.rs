//! PKCE (RFC 7636) verifier and S256 challenge.
//!
//! Randomness and hashing sit behind [`RandomBytes`] and [`Sha256Digest`] so
//! the derivation can be checked with fixed inputs.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Unreserved characters allowed in a code verifier.
pub const VERIFIER_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_.-~";

pub const VERIFIER_LEN: usize = 128;

pub trait RandomBytes {
    fn fill(&mut self, dest: &mut [u8]);
}

pub trait Sha256Digest {
    fn digest(&self, data: &[u8]) -> [u8; 32];
}

/// Thread-local OS seeded generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomBytes for OsRandom {
    fn fill(&mut self, dest: &mut [u8]) {
        rand::rng().fill_bytes(dest);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Sha2;

impl Sha256Digest for Sha2 {
    fn digest(&self, data: &[u8]) -> [u8; 32] {
        Sha256::digest(data).into()
    }
}

/// Maps `len` random bytes onto [`VERIFIER_CHARSET`], byte modulo charset size.
pub fn code_verifier<R: RandomBytes + ?Sized>(rng: &mut R, len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes);
    bytes
        .iter()
        .map(|b| VERIFIER_CHARSET[*b as usize % VERIFIER_CHARSET.len()] as char)
        .collect()
}

/// base64url(sha256(verifier)) without padding.
pub fn code_challenge<H: Sha256Digest + ?Sized>(hasher: &H, verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(hasher.digest(verifier.as_bytes()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    pub fn generate() -> Self {
        let verifier = generate_code_verifier();
        let challenge = generate_code_challenge(&verifier);
        Self {
            verifier,
            challenge,
        }
    }
}

pub fn generate_code_verifier() -> String {
    code_verifier(&mut OsRandom, VERIFIER_LEN)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    code_challenge(&Sha2, verifier)
}
