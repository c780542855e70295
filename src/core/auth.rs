use hex::ToHex;
use rand::Rng;
use sha2::{Digest, Sha256};

pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password);
    hasher.update(salt);
    hasher.finalize().encode_hex()
}

pub fn random_salt() -> String {
    const CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut rng = rand::thread_rng();
    (0..32).map(|_| CHARS[rng.gen_range(0..CHARS.len())] as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable_and_salted() {
        let h1 = hash_password("secret", "salt-a");
        let h2 = hash_password("secret", "salt-a");
        let h3 = hash_password("secret", "salt-b");
        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
        assert_eq!(h1.len(), 64);
    }

    #[test]
    fn test_random_salt_shape() {
        let s1 = random_salt();
        let s2 = random_salt();
        assert_eq!(s1.len(), 32);
        assert_ne!(s1, s2);
    }
}
