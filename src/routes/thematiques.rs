use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use chrono::Utc;
use validator::Validate;

use crate::models::dto::{CreateThematiqueRequest, ThematiqueResponse, UpdateThematiqueRequest};
use crate::models::thematiques::{
    ActiveModel as ThematiqueActiveModel, Column as ThematiqueColumn, Entity as Thematiques,
};
use crate::services::thematique_service::ThematiqueService;

/// GET /api/thematiques - Liste des thématiques
#[get("")]
pub async fn list_thematiques(db: web::Data<DatabaseConnection>) -> HttpResponse {
    let thematiques = Thematiques::find()
        .order_by_asc(ThematiqueColumn::Id)
        .all(db.get_ref())
        .await;

    match thematiques {
        Ok(thematiques) => {
            let response: Vec<ThematiqueResponse> = thematiques
                .into_iter()
                .map(ThematiqueResponse::from)
                .collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {}", e)
        })),
    }
}

/// GET /api/thematiques/{id} - Détail d'une thématique
#[get("/{id}")]
pub async fn get_thematique(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match Thematiques::find_by_id(path.into_inner()).one(db.get_ref()).await {
        Ok(Some(thematique)) => HttpResponse::Ok().json(ThematiqueResponse::from(thematique)),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Thématique introuvable"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {}", e)
        })),
    }
}

/// POST /api/thematiques - Créer une thématique
#[post("")]
pub async fn create_thematique(
    body: web::Json<CreateThematiqueRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Validation des champs
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    // 2. Unicité du nom
    match Thematiques::find()
        .filter(ThematiqueColumn::Nom.eq(&body.nom))
        .one(db.get_ref())
        .await
    {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(serde_json::json!({
                "error": "Une thématique avec ce nom existe déjà"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
        _ => {}
    }

    // 3. Créer
    let body = body.into_inner();
    let new_thematique = ThematiqueActiveModel {
        nom: Set(body.nom),
        description: Set(body.description),
        couleur: Set(body.couleur),
        icone: Set(body.icone),
        actif: Set(body.actif.unwrap_or(true)),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    match new_thematique.insert(db.get_ref()).await {
        Ok(thematique) => HttpResponse::Created().json(ThematiqueResponse::from(thematique)),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to create thematique: {}", e)
        })),
    }
}

/// Cœur de la mise à jour, partagé entre PUT et PATCH
async fn update_thematique(
    id: i32,
    body: UpdateThematiqueRequest,
    db: &DatabaseConnection,
) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    let thematique = match Thematiques::find_by_id(id).one(db).await {
        Ok(Some(thematique)) => thematique,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Thématique introuvable"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
    };

    // Si le nom change, vérifier qu'il reste unique
    if let Some(ref nom) = body.nom {
        if *nom != thematique.nom {
            match Thematiques::find()
                .filter(ThematiqueColumn::Nom.eq(nom))
                .one(db)
                .await
            {
                Ok(Some(_)) => {
                    return HttpResponse::Conflict().json(serde_json::json!({
                        "error": "Une thématique avec ce nom existe déjà"
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

    let mut active_model: ThematiqueActiveModel = thematique.into();

    if let Some(nom) = body.nom {
        active_model.nom = Set(nom);
    }
    if let Some(description) = body.description {
        active_model.description = Set(Some(description));
    }
    if let Some(couleur) = body.couleur {
        active_model.couleur = Set(couleur);
    }
    if let Some(icone) = body.icone {
        active_model.icone = Set(icone);
    }
    if let Some(actif) = body.actif {
        active_model.actif = Set(actif);
    }

    match active_model.update(db).await {
        Ok(thematique) => HttpResponse::Ok().json(ThematiqueResponse::from(thematique)),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {}", e)
        })),
    }
}

/// PUT /api/thematiques/{id} - Mettre à jour une thématique
#[put("/{id}")]
pub async fn put_thematique(
    path: web::Path<i32>,
    body: web::Json<UpdateThematiqueRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    update_thematique(path.into_inner(), body.into_inner(), db.get_ref()).await
}

/// PATCH /api/thematiques/{id} - Mise à jour partielle
#[patch("/{id}")]
pub async fn patch_thematique(
    path: web::Path<i32>,
    body: web::Json<UpdateThematiqueRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    update_thematique(path.into_inner(), body.into_inner(), db.get_ref()).await
}

/// DELETE /api/thematiques/{id} - Supprimer une thématique; les événements
/// qui la référencent sont conservés (référence mise à NULL)
#[delete("/{id}")]
pub async fn delete_thematique(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match ThematiqueService::delete(db.get_ref(), path.into_inner()).await {
        Ok(Some(_)) => HttpResponse::NoContent().finish(),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Thématique introuvable"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {}", e)
        })),
    }
}

pub fn thematique_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/thematiques")
            .service(list_thematiques)
            .service(create_thematique)
            .service(get_thematique)
            .service(put_thematique)
            .service(patch_thematique)
            .service(delete_thematique),
    );
}
