use wayfinder::pkce::*;

/// Yields 0, 1, 2, ... wrapping at 256.
struct Counting(u8);

impl RandomBytes for Counting {
    fn fill(&mut self, dest: &mut [u8]) {
        for byte in dest {
            *byte = self.0;
            self.0 = self.0.wrapping_add(1);
        }
    }
}

struct Zeroes;

impl Sha256Digest for Zeroes {
    fn digest(&self, _data: &[u8]) -> [u8; 32] {
        [0; 32]
    }
}

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    assert_eq!(verifier.len(), 128);
    assert!(verifier.bytes().all(|b| VERIFIER_CHARSET.contains(&b)));

    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_verifier_maps_bytes_modulo_charset() {
    let verifier = code_verifier(&mut Counting(0), 70);

    assert_eq!(VERIFIER_CHARSET.len(), 66);
    assert!(verifier.starts_with("ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_.-~"));
    // byte 66 wraps back to the first character
    assert_eq!(&verifier[66..], "ABCD");
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    // 32 byte digest, base64url without padding
    assert_eq!(challenge.len(), 43);
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );

    assert_eq!(challenge, generate_code_challenge(verifier));
    assert_ne!(challenge, generate_code_challenge("different_verifier"));
}

#[test]
fn test_challenge_matches_rfc7636_example() {
    let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
    assert_eq!(
        generate_code_challenge(verifier),
        "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
    );
}

#[test]
fn test_challenge_encodes_injected_digest() {
    assert_eq!(
        code_challenge(&Zeroes, "anything"),
        "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"
    );
}

#[test]
fn test_pkce_pair_is_consistent() {
    let pair = PkcePair::generate();
    assert_eq!(pair.challenge, generate_code_challenge(&pair.verifier));
}
