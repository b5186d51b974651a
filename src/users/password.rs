use anyhow::Context;
use tracing::error;

/// Salted bcrypt hash of `plain` at the given work factor.
pub fn hash_password(plain: &str, cost: u32) -> anyhow::Result<String> {
    bcrypt::hash(plain, cost).map_err(|e| {
        error!(error = %e, cost, "bcrypt hash error");
        anyhow::anyhow!("password hashing failed: {e}")
    })
}

/// Runs [`hash_password`] on the blocking pool; bcrypt at a real cost takes
/// tens of milliseconds and must not hold a runtime worker.
pub async fn hash_password_off_thread(plain: String, cost: u32) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&plain, cost))
        .await
        .context("password hashing task panicked")?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_salted_and_verifiable() {
        let password = "Secur3P@ssw0rd!";
        let a = hash_password(password, 4).expect("hashing should succeed");
        let b = hash_password(password, 4).expect("hashing should succeed");
        assert_ne!(a, password);
        assert_ne!(a, b, "two hashes of one secret must differ by salt");
        assert!(bcrypt::verify(password, &a).unwrap());
        assert!(!bcrypt::verify("wrong-password", &a).unwrap());
    }

    #[test]
    fn hash_records_the_cost() {
        let hash = hash_password("correct-horse-battery-staple", 10).unwrap();
        assert!(hash.starts_with("$2b$10$"), "unexpected hash prefix: {hash}");
    }

    #[test]
    fn invalid_cost_is_an_error_without_the_secret() {
        let err = hash_password("hunter22", 2).unwrap_err();
        assert!(!err.to_string().contains("hunter22"));
    }

    #[tokio::test]
    async fn off_thread_hash_matches_plain() {
        let hash = hash_password_off_thread("secret123".into(), 4).await.unwrap();
        assert!(bcrypt::verify("secret123", &hash).unwrap());
    }
}
