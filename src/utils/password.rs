use hmac::Hmac;
use pbkdf2::pbkdf2;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::Sha256;
use base64::{Engine, engine::general_purpose::{STANDARD, STANDARD_NO_PAD}};

type HmacSha256 = Hmac<Sha256>;

const ITERATIONS: u32 = 600000;
const KEY_LENGTH: usize = 32;
const SALT_LENGTH: usize = 22;

/// Hash un mot de passe au format Django (compatible avec la base existante)
/// Utilise PBKDF2-HMAC-SHA256 avec 600000 itérations et un salt alphanumérique
pub fn hash_password(password: &str) -> Result<String, String> {
    // Salt alphanumérique aléatoire, stocké tel quel (les octets de la chaîne
    // servent de salt, comme le fait Django)
    let salt: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LENGTH)
        .map(char::from)
        .collect();

    // Calculer le hash PBKDF2
    let mut key = [0u8; KEY_LENGTH];
    pbkdf2::<HmacSha256>(password.as_bytes(), salt.as_bytes(), ITERATIONS, &mut key)
        .expect("PBKDF2 hash generation failed");

    // Encoder en base64 standard avec padding
    let hash_b64 = STANDARD.encode(key);

    // Format: pbkdf2_sha256$iterations$salt$hash
    Ok(format!("pbkdf2_sha256${}${}${}", ITERATIONS, salt, hash_b64))
}

/// Vérifie un mot de passe contre un hash au format Django
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, String> {
    // Parser le format: pbkdf2_sha256$iterations$salt$hash
    let parts: Vec<&str> = stored_hash.split('$').collect();
    if parts.len() != 4 {
        return Err("Invalid hash format".to_string());
    }

    let algorithm = parts[0];
    let iterations_str = parts[1];
    let salt = parts[2];
    let hash_str = parts[3];

    if algorithm != "pbkdf2_sha256" {
        return Err(format!("Unsupported algorithm: {}", algorithm));
    }

    let iterations = iterations_str
        .parse::<u32>()
        .map_err(|_| "Invalid iterations".to_string())?;

    let expected_hash = decode_flexible(hash_str)?;

    // Calculer le hash avec le même salt et iterations
    let mut computed = vec![0u8; expected_hash.len()];
    pbkdf2::<HmacSha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut computed)
        .expect("PBKDF2 hash verification failed");

    Ok(computed == expected_hash)
}

/// Décode une chaîne base64 avec ou sans padding
fn decode_flexible(input: &str) -> Result<Vec<u8>, String> {
    if let Ok(decoded) = STANDARD.decode(input) {
        return Ok(decoded);
    }
    STANDARD_NO_PAD
        .decode(input)
        .map_err(|e| format!("Base64 decode failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_et_verification() {
        let hash = hash_password("graines-sauvages-2025").unwrap();

        assert!(hash.starts_with("pbkdf2_sha256$600000$"));
        assert!(verify_password("graines-sauvages-2025", &hash).unwrap());
        assert!(!verify_password("mauvais-mot-de-passe", &hash).unwrap());
    }

    #[test]
    fn test_deux_hashs_differents() {
        // Le salt étant aléatoire, deux appels ne produisent pas le même hash
        let h1 = hash_password("identique").unwrap();
        let h2 = hash_password("identique").unwrap();
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_format_invalide() {
        assert!(verify_password("x", "pas-un-hash").is_err());
        assert!(verify_password("x", "md5$1000$salt$hash").is_err());
    }
}
