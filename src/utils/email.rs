/// Normalise une adresse email: espaces retirés, partie locale conservée,
/// domaine en minuscules (deux adresses ne différant que par la casse du
/// domaine désignent la même boîte)
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domaine_en_minuscules() {
        assert_eq!(
            normalize_email("Claire.Moreau@GMail.COM"),
            "Claire.Moreau@gmail.com"
        );
    }

    #[test]
    fn test_espaces_retires() {
        assert_eq!(normalize_email("  jean@asso.fr "), "jean@asso.fr");
    }

    #[test]
    fn test_sans_arobase() {
        // Laissée telle quelle, la validation du DTO la rejettera
        assert_eq!(normalize_email("pas-un-email"), "pas-un-email");
    }
}
