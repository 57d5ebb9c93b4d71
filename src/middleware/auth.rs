use actix_web::{dev::Payload, Error, FromRequest, HttpRequest, HttpResponse};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};

use crate::utils::jwt;

/// Structure qui contient les infos de l'utilisateur authentifié
/// Utilisée comme extracteur dans les routes protégées de l'API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
    pub statut: String,
}

/// Implémentation de FromRequest pour AuthUser
/// Cela permet à Actix-Web d'extraire automatiquement AuthUser des requêtes
impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // 1. Extraire le header Authorization
        let auth_header = match req.headers().get("Authorization") {
            Some(header) => header,
            None => {
                let response = HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": "Missing Authorization header"
                }));
                return ready(Err(actix_web::error::InternalError::from_response(
                    "",
                    response,
                ).into()));
            }
        };

        // 2. Convertir le header en string
        let auth_str = match auth_header.to_str() {
            Ok(s) => s,
            Err(_) => {
                let response = HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": "Invalid Authorization header"
                }));
                return ready(Err(actix_web::error::InternalError::from_response(
                    "",
                    response,
                ).into()));
            }
        };

        // 3. Extraire le token (format: "Bearer <token>")
        let token = if auth_str.starts_with("Bearer ") {
            &auth_str[7..]
        } else {
            let response = HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "Invalid Authorization format (expected: Bearer <token>)"
            }));
            return ready(Err(actix_web::error::InternalError::from_response(
                "",
                response,
            ).into()));
        };

        // 4. Vérifier le token JWT
        let claims = match jwt::verify_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                let response = HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": format!("Invalid token: {}", e)
                }));
                return ready(Err(actix_web::error::InternalError::from_response(
                    "",
                    response,
                ).into()));
            }
        };

        // 5. Créer et retourner AuthUser
        ready(Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
            statut: claims.statut,
        }))
    }
}

/// Extracteur pour la console d'administration.
/// L'authentification passe par le cookie de session posé par /admin/login
/// (jamais par le header Authorization: les deux surfaces sont indépendantes).
/// Toute requête non authentifiée est redirigée vers le formulaire de login.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub user_id: i32,
    pub email: String,
}

pub const ADMIN_COOKIE: &str = "admin_session";

fn redirect_to_login() -> Error {
    let response = HttpResponse::Found()
        .insert_header(("Location", "/admin/login"))
        .finish();
    actix_web::error::InternalError::from_response("", response).into()
}

impl FromRequest for AdminUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // 1. Extraire le cookie de session
        let cookie = match req.cookie(ADMIN_COOKIE) {
            Some(cookie) => cookie,
            None => return ready(Err(redirect_to_login())),
        };

        // 2. Vérifier le token porté par le cookie
        let claims = match jwt::verify_token(cookie.value()) {
            Ok(claims) => claims,
            Err(_) => return ready(Err(redirect_to_login())),
        };

        // 3. Seuls les admins accèdent à la console
        if claims.statut != "admin" {
            return ready(Err(redirect_to_login()));
        }

        ready(Ok(AdminUser {
            user_id: claims.sub,
            email: claims.email,
        }))
    }
}
