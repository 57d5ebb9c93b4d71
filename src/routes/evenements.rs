use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryOrder, Set,
};
use chrono::Utc;
use rust_decimal::Decimal;
use validator::Validate;

use crate::models::dto::{CreateEvenementRequest, EvenementResponse, UpdateEvenementRequest};
use crate::models::evenements::{
    ActiveModel as EvenementActiveModel, Column as EvenementColumn, Entity as Evenements,
    STATUTS_EVENEMENT, TYPES_EVENEMENT,
};
use crate::services::evenement_service::EvenementService;

/// GET /api/evenements - Liste des événements
#[get("")]
pub async fn list_evenements(db: web::Data<DatabaseConnection>) -> HttpResponse {
    let evenements = Evenements::find()
        .order_by_asc(EvenementColumn::Id)
        .all(db.get_ref())
        .await;

    match evenements {
        Ok(evenements) => {
            let response: Vec<EvenementResponse> = evenements
                .into_iter()
                .map(EvenementResponse::from)
                .collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {}", e)
        })),
    }
}

/// GET /api/evenements/{id} - Détail d'un événement
#[get("/{id}")]
pub async fn get_evenement(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match Evenements::find_by_id(path.into_inner()).one(db.get_ref()).await {
        Ok(Some(evenement)) => HttpResponse::Ok().json(EvenementResponse::from(evenement)),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Événement introuvable"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {}", e)
        })),
    }
}

/// POST /api/evenements - Créer un événement
#[post("")]
pub async fn create_evenement(
    body: web::Json<CreateEvenementRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Validation des champs
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    // 2. Type et statut dans les listes autorisées
    if !TYPES_EVENEMENT.contains(&body.type_evenement.as_str()) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "type_evenement": [format!("Type inconnu: {}", body.type_evenement)]
        }));
    }
    if let Some(ref statut) = body.statut {
        if !STATUTS_EVENEMENT.contains(&statut.as_str()) {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "statut": [format!("Statut inconnu: {}", statut)]
            }));
        }
    }

    // 3. L'organisateur doit exister
    match EvenementService::organisateur_existe(db.get_ref(), body.organisateur_id).await {
        Ok(false) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "organisateur_id": [format!("Utilisateur {} introuvable", body.organisateur_id)]
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
        _ => {}
    }

    // 4. La thématique, si fournie, doit exister
    if let Some(thematique_id) = body.thematique_id {
        match EvenementService::thematique_existe(db.get_ref(), thematique_id).await {
            Ok(false) => {
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "thematique_id": [format!("Thématique {} introuvable", thematique_id)]
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

    // 5. Créer (nombre_inscrits démarre à 0, il est géré par le serveur)
    let body = body.into_inner();
    let now = Utc::now();
    let new_evenement = EvenementActiveModel {
        titre: Set(body.titre),
        description: Set(body.description),
        date_debut: Set(body.date_debut),
        date_fin: Set(body.date_fin),
        duree_estimee: Set(body.duree_estimee),
        lieu: Set(body.lieu),
        adresse: Set(body.adresse),
        thematique_id: Set(body.thematique_id),
        type_evenement: Set(body.type_evenement),
        nombre_places_max: Set(body.nombre_places_max),
        nombre_inscrits: Set(0),
        inscription_obligatoire: Set(body.inscription_obligatoire.unwrap_or(false)),
        tarif: Set(body.tarif.unwrap_or(Decimal::ZERO)),
        frais_participation: Set(body.frais_participation),
        besoins_competences: Set(body.besoins_competences),
        materiels_necessaires: Set(body.materiels_necessaires),
        materiels_fournis: Set(body.materiels_fournis),
        organisateur_id: Set(body.organisateur_id),
        statut: Set(body.statut.unwrap_or_else(|| "planifie".to_string())),
        publique: Set(body.publique.unwrap_or(true)),
        notes_organisation: Set(body.notes_organisation),
        retour_experience: Set(body.retour_experience),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_evenement.insert(db.get_ref()).await {
        Ok(evenement) => HttpResponse::Created().json(EvenementResponse::from(evenement)),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to create evenement: {}", e)
        })),
    }
}

/// Cœur de la mise à jour, partagé entre PUT et PATCH: aucun garde-fou de
/// transition sur le statut, n'importe quelle valeur autorisée peut en
/// remplacer une autre
async fn update_evenement(
    id: i32,
    body: UpdateEvenementRequest,
    db: &DatabaseConnection,
) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    if let Some(ref type_evenement) = body.type_evenement {
        if !TYPES_EVENEMENT.contains(&type_evenement.as_str()) {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "type_evenement": [format!("Type inconnu: {}", type_evenement)]
            }));
        }
    }
    if let Some(ref statut) = body.statut {
        if !STATUTS_EVENEMENT.contains(&statut.as_str()) {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "statut": [format!("Statut inconnu: {}", statut)]
            }));
        }
    }

    let evenement = match Evenements::find_by_id(id).one(db).await {
        Ok(Some(evenement)) => evenement,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Événement introuvable"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
    };

    // Les références fournies doivent exister
    if let Some(organisateur_id) = body.organisateur_id {
        match EvenementService::organisateur_existe(db, organisateur_id).await {
            Ok(false) => {
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "organisateur_id": [format!("Utilisateur {} introuvable", organisateur_id)]
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
    if let Some(thematique_id) = body.thematique_id {
        match EvenementService::thematique_existe(db, thematique_id).await {
            Ok(false) => {
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "thematique_id": [format!("Thématique {} introuvable", thematique_id)]
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

    let mut active_model: EvenementActiveModel = evenement.into();

    if let Some(titre) = body.titre {
        active_model.titre = Set(titre);
    }
    if let Some(description) = body.description {
        active_model.description = Set(Some(description));
    }
    if let Some(date_debut) = body.date_debut {
        active_model.date_debut = Set(date_debut);
    }
    if let Some(date_fin) = body.date_fin {
        active_model.date_fin = Set(Some(date_fin));
    }
    if let Some(duree_estimee) = body.duree_estimee {
        active_model.duree_estimee = Set(Some(duree_estimee));
    }
    if let Some(lieu) = body.lieu {
        active_model.lieu = Set(Some(lieu));
    }
    if let Some(adresse) = body.adresse {
        active_model.adresse = Set(Some(adresse));
    }
    if let Some(thematique_id) = body.thematique_id {
        active_model.thematique_id = Set(Some(thematique_id));
    }
    if let Some(type_evenement) = body.type_evenement {
        active_model.type_evenement = Set(type_evenement);
    }
    if let Some(nombre_places_max) = body.nombre_places_max {
        active_model.nombre_places_max = Set(Some(nombre_places_max));
    }
    if let Some(inscription_obligatoire) = body.inscription_obligatoire {
        active_model.inscription_obligatoire = Set(inscription_obligatoire);
    }
    if let Some(tarif) = body.tarif {
        active_model.tarif = Set(tarif);
    }
    if let Some(frais_participation) = body.frais_participation {
        active_model.frais_participation = Set(Some(frais_participation));
    }
    if let Some(besoins_competences) = body.besoins_competences {
        active_model.besoins_competences = Set(Some(besoins_competences));
    }
    if let Some(materiels_necessaires) = body.materiels_necessaires {
        active_model.materiels_necessaires = Set(Some(materiels_necessaires));
    }
    if let Some(materiels_fournis) = body.materiels_fournis {
        active_model.materiels_fournis = Set(Some(materiels_fournis));
    }
    if let Some(organisateur_id) = body.organisateur_id {
        active_model.organisateur_id = Set(organisateur_id);
    }
    if let Some(statut) = body.statut {
        active_model.statut = Set(statut);
    }
    if let Some(publique) = body.publique {
        active_model.publique = Set(publique);
    }
    if let Some(notes_organisation) = body.notes_organisation {
        active_model.notes_organisation = Set(Some(notes_organisation));
    }
    if let Some(retour_experience) = body.retour_experience {
        active_model.retour_experience = Set(Some(retour_experience));
    }
    active_model.updated_at = Set(Utc::now());

    match active_model.update(db).await {
        Ok(evenement) => HttpResponse::Ok().json(EvenementResponse::from(evenement)),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {}", e)
        })),
    }
}

/// PUT /api/evenements/{id} - Mettre à jour un événement
#[put("/{id}")]
pub async fn put_evenement(
    path: web::Path<i32>,
    body: web::Json<UpdateEvenementRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    update_evenement(path.into_inner(), body.into_inner(), db.get_ref()).await
}

/// PATCH /api/evenements/{id} - Mise à jour partielle
#[patch("/{id}")]
pub async fn patch_evenement(
    path: web::Path<i32>,
    body: web::Json<UpdateEvenementRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    update_evenement(path.into_inner(), body.into_inner(), db.get_ref()).await
}

/// DELETE /api/evenements/{id} - Supprimer un événement
#[delete("/{id}")]
pub async fn delete_evenement(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let evenement = match Evenements::find_by_id(path.into_inner()).one(db.get_ref()).await {
        Ok(Some(evenement)) => evenement,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Événement introuvable"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
    };

    match evenement.delete(db.get_ref()).await {
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {}", e)
        })),
    }
}

pub fn evenement_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/evenements")
            .service(list_evenements)
            .service(create_evenement)
            .service(get_evenement)
            .service(put_evenement)
            .service(patch_evenement)
            .service(delete_evenement),
    );
}
