use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Salt length in bytes. Matches the SHA-512 block size, so the salt is used
/// as the HMAC key without being pre-hashed.
pub const SALT_LEN: usize = 128;

/// Salt and keyed hash derived from one password. Always stored together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub salt: Vec<u8>,
    pub hash: Vec<u8>,
}

fn keyed(salt: &[u8]) -> HmacSha512 {
    // HMAC accepts keys of any length.
    HmacSha512::new_from_slice(salt).expect("hmac key of any size")
}

/// Compute HMAC-SHA-512 of `password` keyed with `salt`.
pub fn hash_with_salt(password: &str, salt: &[u8]) -> Vec<u8> {
    let mut mac = keyed(salt);
    mac.update(password.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Generate a fresh random salt and hash `password` with it.
pub fn derive_credential(password: &str) -> Credential {
    let mut salt = vec![0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let hash = hash_with_salt(password, &salt);
    Credential { salt, hash }
}

/// Check `password` against a stored salt and hash.
///
/// The comparison runs in constant time. Any mismatch, including a hash of
/// the wrong length, yields `false`.
pub fn verify_credential(password: &str, salt: &[u8], expected_hash: &[u8]) -> bool {
    let mut mac = keyed(salt);
    mac.update(password.as_bytes());
    mac.verify_slice(expected_hash).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let cred = derive_credential(password);
        assert_eq!(cred.salt.len(), SALT_LEN);
        assert_eq!(cred.hash.len(), 64);
        assert!(verify_credential(password, &cred.salt, &cred.hash));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let cred = derive_credential("correct-horse-battery-staple");
        assert!(!verify_credential("wrong-password", &cred.salt, &cred.hash));
    }

    #[test]
    fn same_password_gets_fresh_salt() {
        let a = derive_credential("hunter2");
        let b = derive_credential("hunter2");
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn different_passwords_differ_under_fixed_salt() {
        let salt = [7u8; SALT_LEN];
        assert_ne!(hash_with_salt("hunter2", &salt), hash_with_salt("hunter3", &salt));
        assert_eq!(hash_with_salt("hunter2", &salt), hash_with_salt("hunter2", &salt));
    }

    #[test]
    fn verify_rejects_truncated_or_corrupted_hash() {
        let cred = derive_credential("hunter2");

        assert!(!verify_credential("hunter2", &cred.salt, &cred.hash[..32]));
        assert!(!verify_credential("hunter2", &cred.salt, &[]));

        let mut corrupted = cred.hash.clone();
        corrupted[10] ^= 0x01;
        assert!(!verify_credential("hunter2", &cred.salt, &corrupted));

        let mut longer = cred.hash.clone();
        longer.push(0);
        assert!(!verify_credential("hunter2", &cred.salt, &longer));
    }

    #[test]
    fn verify_rejects_wrong_salt() {
        let cred = derive_credential("hunter2");
        assert!(!verify_credential("hunter2", &[], &cred.hash));
        assert!(!verify_credential("hunter2", &[1, 2, 3], &cred.hash));
    }

    #[test]
    fn empty_password_still_hashes() {
        let cred = derive_credential("");
        assert!(verify_credential("", &cred.salt, &cred.hash));
        assert!(!verify_credential(" ", &cred.salt, &cred.hash));
    }
}
