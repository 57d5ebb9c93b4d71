use actix_web::{get, post, web, HttpResponse};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::middleware::AuthUser;
use crate::models::utilisateurs::ActiveModel as UtilisateurActiveModel;
use crate::services::utilisateur_service::{ExtraFields, UtilisateurService};
use crate::utils::{jwt, password};

// DTO pour l'inscription
#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Adresse email invalide"))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "Le nom est requis"))]
    pub nom: String,
    #[validate(length(min = 1, max = 100, message = "Le prénom est requis"))]
    pub prenom: String,
    #[validate(length(min = 8, message = "8 caractères minimum"))]
    pub password: String,
}

// DTO pour la connexion
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// Réponse après login/register
#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i32,
    pub email: String,
}

// Réponse pour /auth/me
#[derive(Serialize)]
pub struct MeResponse {
    pub user_id: i32,
    pub email: String,
    pub statut: String,
}

/// POST /api/auth/register - Créer un compte adhérent (PUBLIC)
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Validation des champs
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    // 2. Vérifier si l'email est déjà pris
    match UtilisateurService::find_by_email(db.get_ref(), &body.email).await {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(serde_json::json!({
                "error": "Un utilisateur avec cet email existe déjà"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
        _ => {}
    }

    // 3. Créer l'utilisateur (email normalisé, mot de passe hashé,
    //    statut "adherent" par défaut)
    let user = match UtilisateurService::create_user(
        db.get_ref(),
        &body.email,
        &body.nom,
        &body.prenom,
        &body.password,
        ExtraFields::default(),
    )
    .await
    {
        Ok(user) => user,
        Err(DbErr::Custom(msg)) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "email": [msg]
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to create user: {}", e)
            }));
        }
    };

    // 4. Générer le JWT
    let token = match jwt::generate_token(user.id, &user.email, &user.statut) {
        Ok(token) => token,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to generate token: {}", e)
            }));
        }
    };

    // 5. Retourner la réponse
    HttpResponse::Created().json(AuthResponse {
        token,
        user_id: user.id,
        email: user.email,
    })
}

/// POST /api/auth/login - Se connecter (PUBLIC)
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Trouver l'utilisateur par email
    let user = match UtilisateurService::find_by_email(db.get_ref(), &body.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "Email ou mot de passe invalide"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
    };

    // 2. Un compte désactivé ne peut plus se connecter
    if !user.actif {
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Email ou mot de passe invalide"
        }));
    }

    // 3. Vérifier le mot de passe
    let is_valid = match password::verify_password(&body.password, &user.password_hash) {
        Ok(valid) => valid,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Password verification error: {}", e)
            }));
        }
    };

    if !is_valid {
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Email ou mot de passe invalide"
        }));
    }

    // 4. Mémoriser la dernière connexion
    let user_id = user.id;
    let email = user.email.clone();
    let statut = user.statut.clone();

    let mut active_model: UtilisateurActiveModel = user.into();
    active_model.derniere_connexion = Set(Some(Utc::now()));
    if let Err(e) = active_model.update(db.get_ref()).await {
        return HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {}", e)
        }));
    }

    // 5. Générer le JWT
    let token = match jwt::generate_token(user_id, &email, &statut) {
        Ok(token) => token,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to generate token: {}", e)
            }));
        }
    };

    HttpResponse::Ok().json(AuthResponse {
        token,
        user_id,
        email,
    })
}

/// GET /api/auth/me - Vérifier le token (PROTÉGÉE)
#[get("/me")]
pub async fn me(auth_user: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(MeResponse {
        user_id: auth_user.user_id,
        email: auth_user.email,
        statut: auth_user.statut,
    })
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(register)
            .service(login)
            .service(me),
    );
}
