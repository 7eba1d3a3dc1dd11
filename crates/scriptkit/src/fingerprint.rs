//! Content fingerprinting for command batches.
//!
//! The fingerprint is the batch's externally observable identity: callers
//! persist it and compare a recomputed value against the stored one to
//! decide whether re-execution is required.

use blake3::Hasher;

/// Compute the identity digest of a command list.
///
/// Each command's raw bytes are fed to the hash in order with no delimiter,
/// so the digest is sensitive to both content and order. The result is
/// lowercase hex, stable across runs and platforms.
pub fn fingerprint(commands: &[String]) -> String {
    let mut hasher = Hasher::new();
    for command in commands {
        hasher.update(command.as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commands(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_deterministic() {
        let batch = commands(&["SELECT 1;", "SELECT 2;"]);
        assert_eq!(fingerprint(&batch), fingerprint(&batch));
    }

    #[test]
    fn test_content_sensitive() {
        assert_ne!(
            fingerprint(&commands(&["SELECT 1;"])),
            fingerprint(&commands(&["SELECT 2;"]))
        );
    }

    #[test]
    fn test_order_sensitive() {
        assert_ne!(
            fingerprint(&commands(&["SELECT 1;", "SELECT 2;"])),
            fingerprint(&commands(&["SELECT 2;", "SELECT 1;"]))
        );
    }

    #[test]
    fn test_lowercase_hex_shape() {
        let digest = fingerprint(&commands(&["SELECT 1;"]));
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(digest, digest.to_lowercase());
    }

    #[test]
    fn test_empty_batch_has_identity() {
        let digest = fingerprint(&[]);
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, fingerprint(&[]));
    }
}
