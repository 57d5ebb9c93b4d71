// Console d'administration: les mêmes opérations CRUD que l'API REST,
// servies en HTML et authentifiées à part (cookie de session, jamais le
// header Authorization).

pub mod evenements;
pub mod render;
pub mod thematiques;
pub mod utilisateurs;

use actix_web::cookie::Cookie;
use actix_web::{get, post, web, HttpResponse};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde::Deserialize;

use crate::middleware::auth::{AdminUser, ADMIN_COOKIE};
use crate::models::{evenements as evenements_model, thematiques as thematiques_model, utilisateurs as utilisateurs_model};
use crate::services::utilisateur_service::UtilisateurService;
use crate::utils::{jwt, password};

// ---------------------------------------------------------------------------
// Aides de parsing des formulaires (tout arrive en chaînes URL-encodées)
// ---------------------------------------------------------------------------

/// Champ texte optionnel: une chaîne vide vaut NULL
pub fn champ_optionnel(s: String) -> Option<String> {
    let s = s.trim().to_string();
    if s.is_empty() { None } else { Some(s) }
}

/// Les cases à cocher HTML n'envoient rien quand elles sont décochées
pub fn case_cochee(valeur: &Option<String>) -> bool {
    valeur.is_some()
}

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Date invalide: {}", s))
}

/// Format des champs <input type="datetime-local">: 2025-06-01T18:30
pub fn parse_datetime_local(s: &str) -> Result<DateTime<Utc>, String> {
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| format!("Date/heure invalide: {}", s))?;
    Ok(Utc.from_utc_datetime(&naive))
}

pub fn parse_decimal(s: &str) -> Result<Decimal, String> {
    s.trim()
        .parse::<Decimal>()
        .map_err(|_| format!("Montant invalide: {}", s))
}

pub fn parse_entier(s: &str) -> Result<i32, String> {
    s.trim()
        .parse::<i32>()
        .map_err(|_| format!("Nombre invalide: {}", s))
}

// ---------------------------------------------------------------------------
// Connexion / déconnexion
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct AdminLoginForm {
    pub email: String,
    pub password: String,
}

fn formulaire_login(message: &str) -> String {
    format!(
        r#"{message}<form method="post" action="/admin/login">
<label>Email <input type="email" name="email" required></label>
<label>Mot de passe <input type="password" name="password" required></label>
<div class="actions"><button type="submit">Se connecter</button></div>
</form>"#,
        message = message,
    )
}

/// GET /admin/login - Formulaire de connexion (PUBLIC)
#[get("/login")]
pub async fn login_form() -> HttpResponse {
    render::page("Connexion", &formulaire_login(""))
}

/// POST /admin/login - Ouvre une session admin (PUBLIC)
#[post("/login")]
pub async fn login_submit(
    form: web::Form<AdminLoginForm>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let refus = || {
        HttpResponse::Unauthorized()
            .content_type("text/html; charset=utf-8")
            .body(render::layout(
                "Connexion",
                &formulaire_login("<p>Identifiants invalides ou compte non administrateur.</p>"),
            ))
    };

    // 1. Retrouver le compte
    let user = match UtilisateurService::find_by_email(db.get_ref(), &form.email).await {
        Ok(Some(user)) => user,
        Ok(None) => return refus(),
        Err(e) => return render::erreur(&format!("Database error: {}", e)),
    };

    // 2. Seul un admin actif ouvre une session de console
    if !user.actif || user.statut != "admin" {
        return refus();
    }

    // 3. Vérifier le mot de passe
    match password::verify_password(&form.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => return refus(),
        Err(e) => return render::erreur(&format!("Password verification error: {}", e)),
    }

    // 4. Poser le cookie de session (token signé, HttpOnly)
    let token = match jwt::generate_token(user.id, &user.email, &user.statut) {
        Ok(token) => token,
        Err(e) => return render::erreur(&format!("Failed to generate token: {}", e)),
    };

    let cookie = Cookie::build(ADMIN_COOKIE, token)
        .path("/admin")
        .http_only(true)
        .finish();

    HttpResponse::Found()
        .insert_header(("Location", "/admin"))
        .cookie(cookie)
        .finish()
}

/// GET /admin/logout - Ferme la session
#[get("/logout")]
pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::new(ADMIN_COOKIE, "");
    cookie.set_path("/admin");
    cookie.make_removal();

    HttpResponse::Found()
        .insert_header(("Location", "/admin/login"))
        .cookie(cookie)
        .finish()
}

// ---------------------------------------------------------------------------
// Tableau de bord
// ---------------------------------------------------------------------------

/// GET /admin - Comptes des trois tables
#[get("")]
pub async fn dashboard(_admin: AdminUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
    let membres = utilisateurs_model::Entity::find().count(db.get_ref()).await;
    let thematiques = thematiques_model::Entity::find().count(db.get_ref()).await;
    let evenements = evenements_model::Entity::find().count(db.get_ref()).await;

    match (membres, thematiques, evenements) {
        (Ok(membres), Ok(thematiques), Ok(evenements)) => {
            let corps = format!(
                r#"<ul>
<li><a href="/admin/utilisateurs">Membres</a> : {membres}</li>
<li><a href="/admin/thematiques">Thématiques</a> : {thematiques}</li>
<li><a href="/admin/evenements">Événements</a> : {evenements}</li>
</ul>"#,
            );
            render::page("Administration", &corps)
        }
        _ => render::erreur("Database error"),
    }
}

pub fn admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(login_form)
            .service(login_submit)
            .service(logout)
            .service(dashboard)
            .configure(utilisateurs::admin_utilisateur_routes)
            .configure(thematiques::admin_thematique_routes)
            .configure(evenements::admin_evenement_routes),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_champ_optionnel() {
        assert_eq!(champ_optionnel("  ".to_string()), None);
        assert_eq!(champ_optionnel("Rennes".to_string()), Some("Rennes".to_string()));
    }

    #[test]
    fn test_parse_datetime_local() {
        let dt = parse_datetime_local("2025-06-01T18:30").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-06-01T18:30:00+00:00");

        assert!(parse_datetime_local("pas-une-date").is_err());
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("12.50").unwrap().to_string(), "12.50");
        assert!(parse_decimal("douze").is_err());
    }
}
