use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set,
};
use chrono::Utc;
use validator::Validate;

use crate::models::dto::{
    CreateUtilisateurRequest, UpdateUtilisateurRequest, UtilisateurResponse,
};
use crate::models::utilisateurs::{
    ActiveModel as UtilisateurActiveModel, Column as UtilisateurColumn,
    Entity as Utilisateurs, STATUTS,
};
use crate::services::utilisateur_service::{ExtraFields, UtilisateurService};
use crate::utils::{email as email_util, password};

/// GET /api/utilisateurs - Liste des membres
#[get("")]
pub async fn list_utilisateurs(db: web::Data<DatabaseConnection>) -> HttpResponse {
    let utilisateurs = Utilisateurs::find()
        .order_by_asc(UtilisateurColumn::Id)
        .all(db.get_ref())
        .await;

    match utilisateurs {
        Ok(utilisateurs) => {
            let response: Vec<UtilisateurResponse> = utilisateurs
                .into_iter()
                .map(UtilisateurResponse::from)
                .collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {}", e)
        })),
    }
}

/// GET /api/utilisateurs/{id} - Détail d'un membre
#[get("/{id}")]
pub async fn get_utilisateur(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match Utilisateurs::find_by_id(path.into_inner()).one(db.get_ref()).await {
        Ok(Some(user)) => HttpResponse::Ok().json(UtilisateurResponse::from(user)),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Utilisateur introuvable"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {}", e)
        })),
    }
}

/// POST /api/utilisateurs - Créer un membre
#[post("")]
pub async fn create_utilisateur(
    body: web::Json<CreateUtilisateurRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Validation des champs
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    // 2. Le statut doit appartenir à la liste autorisée
    if let Some(ref statut) = body.statut {
        if !STATUTS.contains(&statut.as_str()) {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "statut": [format!("Statut inconnu: {}", statut)]
            }));
        }
    }

    // 3. Unicité de l'email
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

    // 4. Créer via le user store (normalisation + hash)
    let body = body.into_inner();
    let extra = ExtraFields {
        telephone: body.telephone,
        date_naissance: body.date_naissance,
        ville: body.ville,
        statut: body.statut,
        is_superuser: None,
        disponibilites: body.disponibilites,
        competences_partagees: body.competences_partagees,
        interets: body.interets,
        contrepartie_souhaitee: body.contrepartie_souhaitee,
        actif: body.actif,
        date_derniere_cotisation: body.date_derniere_cotisation,
        montant_derniere_cotisation: body.montant_derniere_cotisation,
    };

    match UtilisateurService::create_user(
        db.get_ref(),
        &body.email,
        &body.nom,
        &body.prenom,
        &body.password,
        extra,
    )
    .await
    {
        Ok(user) => HttpResponse::Created().json(UtilisateurResponse::from(user)),
        Err(DbErr::Custom(msg)) => HttpResponse::BadRequest().json(serde_json::json!({
            "email": [msg]
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to create user: {}", e)
        })),
    }
}

/// Cœur de la mise à jour, partagé entre PUT et PATCH: seuls les champs
/// fournis sont modifiés
async fn update_utilisateur(
    id: i32,
    body: UpdateUtilisateurRequest,
    db: &DatabaseConnection,
) -> HttpResponse {
    // 1. Validation des champs fournis
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    if let Some(ref statut) = body.statut {
        if !STATUTS.contains(&statut.as_str()) {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "statut": [format!("Statut inconnu: {}", statut)]
            }));
        }
    }

    // 2. Récupérer l'utilisateur
    let user = match Utilisateurs::find_by_id(id).one(db).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Utilisateur introuvable"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
    };

    // 3. Si l'email change, vérifier qu'il reste unique
    let nouvel_email = body.email.as_ref().map(|e| email_util::normalize_email(e));
    if let Some(ref email) = nouvel_email {
        if *email != user.email {
            match UtilisateurService::find_by_email(db, email).await {
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
        }
    }

    // 4. Appliquer les champs fournis
    let mut active_model: UtilisateurActiveModel = user.into();

    if let Some(email) = nouvel_email {
        active_model.email = Set(email);
    }
    if let Some(nom) = body.nom {
        active_model.nom = Set(nom);
    }
    if let Some(prenom) = body.prenom {
        active_model.prenom = Set(prenom);
    }
    if let Some(password_clair) = body.password {
        let hash = match password::hash_password(&password_clair) {
            Ok(hash) => hash,
            Err(e) => {
                return HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": format!("Failed to hash password: {}", e)
                }));
            }
        };
        active_model.password_hash = Set(hash);
    }
    if let Some(telephone) = body.telephone {
        active_model.telephone = Set(Some(telephone));
    }
    if let Some(date_naissance) = body.date_naissance {
        active_model.date_naissance = Set(Some(date_naissance));
    }
    if let Some(ville) = body.ville {
        active_model.ville = Set(Some(ville));
    }
    if let Some(statut) = body.statut {
        active_model.statut = Set(statut);
    }
    if let Some(disponibilites) = body.disponibilites {
        active_model.disponibilites = Set(Some(disponibilites));
    }
    if let Some(competences) = body.competences_partagees {
        active_model.competences_partagees = Set(Some(competences));
    }
    if let Some(interets) = body.interets {
        active_model.interets = Set(Some(interets));
    }
    if let Some(contrepartie) = body.contrepartie_souhaitee {
        active_model.contrepartie_souhaitee = Set(Some(contrepartie));
    }
    if let Some(actif) = body.actif {
        active_model.actif = Set(actif);
    }
    if let Some(date_cotisation) = body.date_derniere_cotisation {
        active_model.date_derniere_cotisation = Set(Some(date_cotisation));
    }
    if let Some(montant) = body.montant_derniere_cotisation {
        active_model.montant_derniere_cotisation = Set(Some(montant));
    }
    active_model.updated_at = Set(Utc::now());

    // 5. Persister
    match active_model.update(db).await {
        Ok(user) => HttpResponse::Ok().json(UtilisateurResponse::from(user)),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {}", e)
        })),
    }
}

/// PUT /api/utilisateurs/{id} - Mettre à jour un membre
#[put("/{id}")]
pub async fn put_utilisateur(
    path: web::Path<i32>,
    body: web::Json<UpdateUtilisateurRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    update_utilisateur(path.into_inner(), body.into_inner(), db.get_ref()).await
}

/// PATCH /api/utilisateurs/{id} - Mise à jour partielle
#[patch("/{id}")]
pub async fn patch_utilisateur(
    path: web::Path<i32>,
    body: web::Json<UpdateUtilisateurRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    update_utilisateur(path.into_inner(), body.into_inner(), db.get_ref()).await
}

/// DELETE /api/utilisateurs/{id} - Supprimer un membre et, en cascade,
/// les événements qu'il organise
#[delete("/{id}")]
pub async fn delete_utilisateur(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match UtilisateurService::delete(db.get_ref(), path.into_inner()).await {
        Ok(Some(_)) => HttpResponse::NoContent().finish(),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Utilisateur introuvable"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {}", e)
        })),
    }
}

pub fn utilisateur_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/utilisateurs")
            .service(list_utilisateurs)
            .service(create_utilisateur)
            .service(get_utilisateur)
            .service(put_utilisateur)
            .service(patch_utilisateur)
            .service(delete_utilisateur),
    );
}
