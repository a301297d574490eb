use rand::Rng;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const TOKEN_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const TOKEN_LENGTH: usize = 18;

/// Generate an opaque capability token: fixed length, fixed alphabet,
/// drawn from a cryptographically secure generator. Used for both
/// survey result tokens and respondent session tokens.
pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LENGTH)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

pub fn cookie(name: &str, value: &str, secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!("{name}={value}; HttpOnly; Max-Age=31536000; Path=/; SameSite=Lax{secure}")
}

/// Current time as whole Unix seconds. Whole-second resolution is used
/// on both sides of the chart staleness comparison.
pub fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
