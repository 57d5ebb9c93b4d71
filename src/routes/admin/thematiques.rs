use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;

use crate::middleware::AdminUser;
use crate::models::thematiques::{
    self, ActiveModel as ThematiqueActiveModel, Column as ThematiqueColumn, Entity as Thematiques,
};
use crate::routes::admin::{case_cochee, champ_optionnel, render};
use crate::services::thematique_service::ThematiqueService;

#[derive(Deserialize)]
pub struct ThematiqueForm {
    pub nom: String,
    pub description: String,
    pub couleur: String,
    pub icone: String,
    pub actif: Option<String>, // case à cocher
}

fn formulaire(action: &str, thematique: Option<&thematiques::Model>) -> String {
    let nom = thematique.map(|t| t.nom.as_str()).unwrap_or("");
    let description = thematique
        .and_then(|t| t.description.as_deref())
        .unwrap_or("");
    let couleur = thematique.map(|t| t.couleur.as_str()).unwrap_or("#000000");
    let icone = thematique.map(|t| t.icone.as_str()).unwrap_or("");
    let actif = thematique.map(|t| t.actif).unwrap_or(true);

    format!(
        r#"<form method="post" action="{action}">
<label>Nom <input name="nom" value="{nom}" maxlength="100" required></label>
<label>Description <textarea name="description">{description}</textarea></label>
<label>Couleur <input name="couleur" value="{couleur}" maxlength="7" required></label>
<label>Icône <input name="icone" value="{icone}" maxlength="50" required></label>
<label><input type="checkbox" name="actif"{coche}> Active</label>
<div class="actions"><button type="submit">Enregistrer</button></div>
</form>"#,
        action = render::escape(action),
        nom = render::escape(nom),
        description = render::escape(description),
        couleur = render::escape(couleur),
        icone = render::escape(icone),
        coche = if actif { " checked" } else { "" },
    )
}

/// GET /admin/thematiques - Liste
#[get("")]
pub async fn liste(_admin: AdminUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
    let thematiques = match Thematiques::find()
        .order_by_asc(ThematiqueColumn::Id)
        .all(db.get_ref())
        .await
    {
        Ok(thematiques) => thematiques,
        Err(e) => return render::erreur(&format!("Database error: {}", e)),
    };

    let mut lignes = String::new();
    for t in &thematiques {
        lignes.push_str(&format!(
            r#"<tr><td>{id}</td><td>{nom}</td><td>{couleur}</td><td>{icone}</td><td>{actif}</td>
<td><a href="/admin/thematiques/{id}">Éditer</a>
<form class="inline" method="post" action="/admin/thematiques/{id}/delete"><button type="submit">Supprimer</button></form></td></tr>"#,
            id = t.id,
            nom = render::escape(&t.nom),
            couleur = render::escape(&t.couleur),
            icone = render::escape(&t.icone),
            actif = if t.actif { "oui" } else { "non" },
        ));
    }

    let corps = format!(
        r#"<p><a href="/admin/thematiques/new">Nouvelle thématique</a></p>
<table>
<tr><th>Id</th><th>Nom</th><th>Couleur</th><th>Icône</th><th>Active</th><th>Actions</th></tr>
{lignes}
</table>"#,
    );
    render::page("Thématiques", &corps)
}

/// GET /admin/thematiques/new - Formulaire de création
#[get("/new")]
pub async fn nouveau(_admin: AdminUser) -> HttpResponse {
    render::page(
        "Nouvelle thématique",
        &formulaire("/admin/thematiques", None),
    )
}

/// POST /admin/thematiques - Création
#[post("")]
pub async fn creer(
    _admin: AdminUser,
    form: web::Form<ThematiqueForm>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let form = form.into_inner();

    if form.nom.trim().is_empty() {
        return render::invalide("Nouvelle thématique", "Le nom est requis");
    }

    // Unicité du nom, comme sur l'API
    match Thematiques::find()
        .filter(ThematiqueColumn::Nom.eq(form.nom.trim()))
        .one(db.get_ref())
        .await
    {
        Ok(Some(_)) => {
            return render::invalide(
                "Nouvelle thématique",
                "Une thématique avec ce nom existe déjà",
            );
        }
        Err(e) => return render::erreur(&format!("Database error: {}", e)),
        _ => {}
    }

    let new_thematique = ThematiqueActiveModel {
        nom: Set(form.nom.trim().to_string()),
        description: Set(champ_optionnel(form.description)),
        couleur: Set(form.couleur.trim().to_string()),
        icone: Set(form.icone.trim().to_string()),
        actif: Set(case_cochee(&form.actif)),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    match new_thematique.insert(db.get_ref()).await {
        Ok(_) => render::rediriger("/admin/thematiques"),
        Err(e) => render::erreur(&format!("Failed to create thematique: {}", e)),
    }
}

/// GET /admin/thematiques/{id} - Formulaire d'édition
#[get("/{id}")]
pub async fn editer(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let id = path.into_inner();
    match Thematiques::find_by_id(id).one(db.get_ref()).await {
        Ok(Some(thematique)) => render::page(
            &format!("Thématique « {} »", thematique.nom),
            &formulaire(&format!("/admin/thematiques/{}", id), Some(&thematique)),
        ),
        Ok(None) => render::introuvable("Thématique introuvable"),
        Err(e) => render::erreur(&format!("Database error: {}", e)),
    }
}

/// POST /admin/thematiques/{id} - Mise à jour
#[post("/{id}")]
pub async fn modifier(
    _admin: AdminUser,
    path: web::Path<i32>,
    form: web::Form<ThematiqueForm>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let id = path.into_inner();
    let form = form.into_inner();

    let thematique = match Thematiques::find_by_id(id).one(db.get_ref()).await {
        Ok(Some(thematique)) => thematique,
        Ok(None) => return render::introuvable("Thématique introuvable"),
        Err(e) => return render::erreur(&format!("Database error: {}", e)),
    };

    if form.nom.trim().is_empty() {
        return render::invalide("Thématique", "Le nom est requis");
    }

    if form.nom.trim() != thematique.nom {
        match Thematiques::find()
            .filter(ThematiqueColumn::Nom.eq(form.nom.trim()))
            .one(db.get_ref())
            .await
        {
            Ok(Some(_)) => {
                return render::invalide(
                    "Thématique",
                    "Une thématique avec ce nom existe déjà",
                );
            }
            Err(e) => return render::erreur(&format!("Database error: {}", e)),
            _ => {}
        }
    }

    let mut active_model: ThematiqueActiveModel = thematique.into();
    active_model.nom = Set(form.nom.trim().to_string());
    active_model.description = Set(champ_optionnel(form.description));
    active_model.couleur = Set(form.couleur.trim().to_string());
    active_model.icone = Set(form.icone.trim().to_string());
    active_model.actif = Set(case_cochee(&form.actif));

    match active_model.update(db.get_ref()).await {
        Ok(_) => render::rediriger("/admin/thematiques"),
        Err(e) => render::erreur(&format!("Database error: {}", e)),
    }
}

/// POST /admin/thematiques/{id}/delete - Suppression (les événements liés
/// perdent leur référence, ils ne sont pas supprimés)
#[post("/{id}/delete")]
pub async fn supprimer(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match ThematiqueService::delete(db.get_ref(), path.into_inner()).await {
        Ok(Some(_)) => render::rediriger("/admin/thematiques"),
        Ok(None) => render::introuvable("Thématique introuvable"),
        Err(e) => render::erreur(&format!("Database error: {}", e)),
    }
}

pub fn admin_thematique_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/thematiques")
            .service(liste)
            .service(nouveau)
            .service(creer)
            .service(editer)
            .service(modifier)
            .service(supprimer),
    );
}
