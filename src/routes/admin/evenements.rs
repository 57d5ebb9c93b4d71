use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryOrder, Set};
use serde::Deserialize;

use crate::middleware::AdminUser;
use crate::models::evenements::{
    self, ActiveModel as EvenementActiveModel, Column as EvenementColumn, Entity as Evenements,
    STATUTS_EVENEMENT, TYPES_EVENEMENT,
};
use crate::models::thematiques::{self, Column as ThematiqueColumn, Entity as Thematiques};
use crate::models::utilisateurs::{self, Column as UtilisateurColumn, Entity as Utilisateurs};
use crate::routes::admin::{
    case_cochee, champ_optionnel, parse_datetime_local, parse_decimal, parse_entier, render,
};
use crate::services::evenement_service::EvenementService;

#[derive(Deserialize)]
pub struct EvenementForm {
    pub titre: String,
    pub description: String,
    pub date_debut: String,
    pub date_fin: String,
    pub duree_estimee: String,
    pub lieu: String,
    pub adresse: String,
    pub thematique_id: String, // "" = aucune
    pub type_evenement: String,
    pub nombre_places_max: String,
    pub inscription_obligatoire: Option<String>,
    pub tarif: String,
    pub frais_participation: String,
    pub besoins_competences: String,
    pub materiels_necessaires: String,
    pub materiels_fournis: String,
    pub organisateur_id: String,
    pub statut: String,
    pub publique: Option<String>,
    pub notes_organisation: String,
    pub retour_experience: String,
}

fn formulaire(
    action: &str,
    evenement: Option<&evenements::Model>,
    membres: &[utilisateurs::Model],
    liste_thematiques: &[thematiques::Model],
) -> String {
    let texte = |f: fn(&evenements::Model) -> String| -> String {
        evenement.map(f).unwrap_or_default()
    };

    let titre = texte(|e| e.titre.clone());
    let description = texte(|e| e.description.clone().unwrap_or_default());
    let date_debut = texte(|e| e.date_debut.format("%Y-%m-%dT%H:%M").to_string());
    let date_fin = texte(|e| {
        e.date_fin
            .map(|d| d.format("%Y-%m-%dT%H:%M").to_string())
            .unwrap_or_default()
    });
    let duree = texte(|e| e.duree_estimee.map(|d| d.to_string()).unwrap_or_default());
    let lieu = texte(|e| e.lieu.clone().unwrap_or_default());
    let adresse = texte(|e| e.adresse.clone().unwrap_or_default());
    let places = texte(|e| {
        e.nombre_places_max
            .map(|n| n.to_string())
            .unwrap_or_default()
    });
    let tarif = texte(|e| e.tarif.to_string());
    let frais = texte(|e| e.frais_participation.clone().unwrap_or_default());
    let besoins = texte(|e| e.besoins_competences.clone().unwrap_or_default());
    let materiels_necessaires = texte(|e| e.materiels_necessaires.clone().unwrap_or_default());
    let materiels_fournis = texte(|e| e.materiels_fournis.clone().unwrap_or_default());
    let notes = texte(|e| e.notes_organisation.clone().unwrap_or_default());
    let retour = texte(|e| e.retour_experience.clone().unwrap_or_default());

    let type_courant = evenement.map(|e| e.type_evenement.as_str()).unwrap_or("atelier");
    let statut_courant = evenement.map(|e| e.statut.as_str()).unwrap_or("planifie");
    let organisateur_courant = evenement.map(|e| e.organisateur_id).unwrap_or(0);
    let thematique_courante = evenement.and_then(|e| e.thematique_id);

    let options_type: String = TYPES_EVENEMENT
        .iter()
        .map(|t| render::option_html(t, t, type_courant))
        .collect();
    let options_statut: String = STATUTS_EVENEMENT
        .iter()
        .map(|s| render::option_html(s, s, statut_courant))
        .collect();
    let options_organisateur: String = membres
        .iter()
        .map(|m| {
            render::option_html(
                &m.id.to_string(),
                &format!("{} {} ({})", m.prenom, m.nom, m.email),
                &organisateur_courant.to_string(),
            )
        })
        .collect();
    let options_thematique: String = std::iter::once(render::option_html(
        "",
        "— aucune —",
        &thematique_courante.map(|id| id.to_string()).unwrap_or_default(),
    ))
    .chain(liste_thematiques.iter().map(|t| {
        render::option_html(
            &t.id.to_string(),
            &t.nom,
            &thematique_courante.map(|id| id.to_string()).unwrap_or_default(),
        )
    }))
    .collect();

    format!(
        r#"<form method="post" action="{action}">
<label>Titre <input name="titre" value="{titre}" maxlength="200" required></label>
<label>Description <textarea name="description">{description}</textarea></label>
<label>Début <input type="datetime-local" name="date_debut" value="{date_debut}" required></label>
<label>Fin <input type="datetime-local" name="date_fin" value="{date_fin}"></label>
<label>Durée estimée (minutes) <input type="number" name="duree_estimee" value="{duree}"></label>
<label>Lieu <input name="lieu" value="{lieu}" maxlength="200"></label>
<label>Adresse <textarea name="adresse">{adresse}</textarea></label>
<label>Thématique <select name="thematique_id">{options_thematique}</select></label>
<label>Type <select name="type_evenement">{options_type}</select></label>
<label>Places max <input type="number" name="nombre_places_max" value="{places}"></label>
<label><input type="checkbox" name="inscription_obligatoire"{inscription_coche}> Inscription obligatoire</label>
<label>Tarif <input name="tarif" value="{tarif}"></label>
<label>Frais de participation <textarea name="frais_participation">{frais}</textarea></label>
<label>Besoins en compétences <textarea name="besoins_competences">{besoins}</textarea></label>
<label>Matériels nécessaires <textarea name="materiels_necessaires">{materiels_necessaires}</textarea></label>
<label>Matériels fournis <textarea name="materiels_fournis">{materiels_fournis}</textarea></label>
<label>Organisateur <select name="organisateur_id" required>{options_organisateur}</select></label>
<label>Statut <select name="statut">{options_statut}</select></label>
<label><input type="checkbox" name="publique"{publique_coche}> Publique</label>
<label>Notes d'organisation <textarea name="notes_organisation">{notes}</textarea></label>
<label>Retour d'expérience <textarea name="retour_experience">{retour}</textarea></label>
<div class="actions"><button type="submit">Enregistrer</button></div>
</form>"#,
        action = render::escape(action),
        titre = render::escape(&titre),
        description = render::escape(&description),
        date_debut = date_debut,
        date_fin = date_fin,
        duree = duree,
        lieu = render::escape(&lieu),
        adresse = render::escape(&adresse),
        options_thematique = options_thematique,
        options_type = options_type,
        places = places,
        inscription_coche = if evenement.map(|e| e.inscription_obligatoire).unwrap_or(false) { " checked" } else { "" },
        tarif = render::escape(&tarif),
        frais = render::escape(&frais),
        besoins = render::escape(&besoins),
        materiels_necessaires = render::escape(&materiels_necessaires),
        materiels_fournis = render::escape(&materiels_fournis),
        options_organisateur = options_organisateur,
        options_statut = options_statut,
        publique_coche = if evenement.map(|e| e.publique).unwrap_or(true) { " checked" } else { "" },
        notes = render::escape(&notes),
        retour = render::escape(&retour),
    )
}

async fn charger_references(
    db: &DatabaseConnection,
) -> Result<(Vec<utilisateurs::Model>, Vec<thematiques::Model>), sea_orm::DbErr> {
    let membres = Utilisateurs::find()
        .order_by_asc(UtilisateurColumn::Nom)
        .all(db)
        .await?;
    let liste_thematiques = Thematiques::find()
        .order_by_asc(ThematiqueColumn::Nom)
        .all(db)
        .await?;
    Ok((membres, liste_thematiques))
}

/// Valeurs du formulaire converties vers leurs types colonnes
struct ChampsParses {
    date_debut: chrono::DateTime<Utc>,
    date_fin: Option<chrono::DateTime<Utc>>,
    duree_estimee: Option<i32>,
    thematique_id: Option<i32>,
    nombre_places_max: Option<i32>,
    tarif: Decimal,
    organisateur_id: i32,
}

fn parser_champs(form: &EvenementForm) -> Result<ChampsParses, String> {
    let date_debut = parse_datetime_local(&form.date_debut)?;
    let date_fin = match champ_optionnel(form.date_fin.clone()) {
        Some(s) => Some(parse_datetime_local(&s)?),
        None => None,
    };
    let duree_estimee = match champ_optionnel(form.duree_estimee.clone()) {
        Some(s) => Some(parse_entier(&s)?),
        None => None,
    };
    let thematique_id = match champ_optionnel(form.thematique_id.clone()) {
        Some(s) => Some(parse_entier(&s)?),
        None => None,
    };
    let nombre_places_max = match champ_optionnel(form.nombre_places_max.clone()) {
        Some(s) => Some(parse_entier(&s)?),
        None => None,
    };
    let tarif = match champ_optionnel(form.tarif.clone()) {
        Some(s) => parse_decimal(&s)?,
        None => Decimal::ZERO,
    };
    let organisateur_id = parse_entier(&form.organisateur_id)
        .map_err(|_| "Un organisateur est requis".to_string())?;

    Ok(ChampsParses {
        date_debut,
        date_fin,
        duree_estimee,
        thematique_id,
        nombre_places_max,
        tarif,
        organisateur_id,
    })
}

/// GET /admin/evenements - Liste
#[get("")]
pub async fn liste(_admin: AdminUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
    let evenements = match Evenements::find()
        .order_by_asc(EvenementColumn::Id)
        .all(db.get_ref())
        .await
    {
        Ok(evenements) => evenements,
        Err(e) => return render::erreur(&format!("Database error: {}", e)),
    };

    let mut lignes = String::new();
    for e in &evenements {
        lignes.push_str(&format!(
            r#"<tr><td>{id}</td><td>{titre}</td><td>{debut}</td><td>{type_evenement}</td><td>{statut}</td><td>{organisateur}</td>
<td><a href="/admin/evenements/{id}">Éditer</a>
<form class="inline" method="post" action="/admin/evenements/{id}/delete"><button type="submit">Supprimer</button></form></td></tr>"#,
            id = e.id,
            titre = render::escape(&e.titre),
            debut = e.date_debut.format("%Y-%m-%d %H:%M"),
            type_evenement = render::escape(&e.type_evenement),
            statut = render::escape(&e.statut),
            organisateur = e.organisateur_id,
        ));
    }

    let corps = format!(
        r#"<p><a href="/admin/evenements/new">Nouvel événement</a></p>
<table>
<tr><th>Id</th><th>Titre</th><th>Début</th><th>Type</th><th>Statut</th><th>Organisateur</th><th>Actions</th></tr>
{lignes}
</table>"#,
    );
    render::page("Événements", &corps)
}

/// GET /admin/evenements/new - Formulaire de création
#[get("/new")]
pub async fn nouveau(_admin: AdminUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
    let (membres, liste_thematiques) = match charger_references(db.get_ref()).await {
        Ok(references) => references,
        Err(e) => return render::erreur(&format!("Database error: {}", e)),
    };

    if membres.is_empty() {
        return render::invalide(
            "Nouvel événement",
            "Créez d'abord un membre: chaque événement a un organisateur",
        );
    }

    render::page(
        "Nouvel événement",
        &formulaire("/admin/evenements", None, &membres, &liste_thematiques),
    )
}

/// POST /admin/evenements - Création
#[post("")]
pub async fn creer(
    _admin: AdminUser,
    form: web::Form<EvenementForm>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let form = form.into_inner();

    if form.titre.trim().is_empty() {
        return render::invalide("Nouvel événement", "Le titre est requis");
    }
    if !TYPES_EVENEMENT.contains(&form.type_evenement.as_str()) {
        return render::invalide(
            "Nouvel événement",
            &format!("Type inconnu: {}", form.type_evenement),
        );
    }
    if !STATUTS_EVENEMENT.contains(&form.statut.as_str()) {
        return render::invalide(
            "Nouvel événement",
            &format!("Statut inconnu: {}", form.statut),
        );
    }

    let champs = match parser_champs(&form) {
        Ok(champs) => champs,
        Err(message) => return render::invalide("Nouvel événement", &message),
    };

    // Les références du formulaire peuvent être périmées, revérifier
    match EvenementService::organisateur_existe(db.get_ref(), champs.organisateur_id).await {
        Ok(false) => {
            return render::invalide(
                "Nouvel événement",
                &format!("Utilisateur {} introuvable", champs.organisateur_id),
            );
        }
        Err(e) => return render::erreur(&format!("Database error: {}", e)),
        _ => {}
    }
    if let Some(thematique_id) = champs.thematique_id {
        match EvenementService::thematique_existe(db.get_ref(), thematique_id).await {
            Ok(false) => {
                return render::invalide(
                    "Nouvel événement",
                    &format!("Thématique {} introuvable", thematique_id),
                );
            }
            Err(e) => return render::erreur(&format!("Database error: {}", e)),
            _ => {}
        }
    }

    let now = Utc::now();
    let new_evenement = EvenementActiveModel {
        titre: Set(form.titre.trim().to_string()),
        description: Set(champ_optionnel(form.description)),
        date_debut: Set(champs.date_debut),
        date_fin: Set(champs.date_fin),
        duree_estimee: Set(champs.duree_estimee),
        lieu: Set(champ_optionnel(form.lieu)),
        adresse: Set(champ_optionnel(form.adresse)),
        thematique_id: Set(champs.thematique_id),
        type_evenement: Set(form.type_evenement),
        nombre_places_max: Set(champs.nombre_places_max),
        nombre_inscrits: Set(0),
        inscription_obligatoire: Set(case_cochee(&form.inscription_obligatoire)),
        tarif: Set(champs.tarif),
        frais_participation: Set(champ_optionnel(form.frais_participation)),
        besoins_competences: Set(champ_optionnel(form.besoins_competences)),
        materiels_necessaires: Set(champ_optionnel(form.materiels_necessaires)),
        materiels_fournis: Set(champ_optionnel(form.materiels_fournis)),
        organisateur_id: Set(champs.organisateur_id),
        statut: Set(form.statut),
        publique: Set(case_cochee(&form.publique)),
        notes_organisation: Set(champ_optionnel(form.notes_organisation)),
        retour_experience: Set(champ_optionnel(form.retour_experience)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_evenement.insert(db.get_ref()).await {
        Ok(_) => render::rediriger("/admin/evenements"),
        Err(e) => render::erreur(&format!("Failed to create evenement: {}", e)),
    }
}

/// GET /admin/evenements/{id} - Formulaire d'édition
#[get("/{id}")]
pub async fn editer(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let id = path.into_inner();

    let evenement = match Evenements::find_by_id(id).one(db.get_ref()).await {
        Ok(Some(evenement)) => evenement,
        Ok(None) => return render::introuvable("Événement introuvable"),
        Err(e) => return render::erreur(&format!("Database error: {}", e)),
    };

    let (membres, liste_thematiques) = match charger_references(db.get_ref()).await {
        Ok(references) => references,
        Err(e) => return render::erreur(&format!("Database error: {}", e)),
    };

    render::page(
        &format!("Événement « {} »", evenement.titre),
        &formulaire(
            &format!("/admin/evenements/{}", id),
            Some(&evenement),
            &membres,
            &liste_thematiques,
        ),
    )
}

/// POST /admin/evenements/{id} - Mise à jour. Aucun garde-fou de transition
/// sur le statut.
#[post("/{id}")]
pub async fn modifier(
    _admin: AdminUser,
    path: web::Path<i32>,
    form: web::Form<EvenementForm>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let id = path.into_inner();
    let form = form.into_inner();

    if form.titre.trim().is_empty() {
        return render::invalide("Événement", "Le titre est requis");
    }
    if !TYPES_EVENEMENT.contains(&form.type_evenement.as_str()) {
        return render::invalide("Événement", &format!("Type inconnu: {}", form.type_evenement));
    }
    if !STATUTS_EVENEMENT.contains(&form.statut.as_str()) {
        return render::invalide("Événement", &format!("Statut inconnu: {}", form.statut));
    }

    let champs = match parser_champs(&form) {
        Ok(champs) => champs,
        Err(message) => return render::invalide("Événement", &message),
    };

    let evenement = match Evenements::find_by_id(id).one(db.get_ref()).await {
        Ok(Some(evenement)) => evenement,
        Ok(None) => return render::introuvable("Événement introuvable"),
        Err(e) => return render::erreur(&format!("Database error: {}", e)),
    };

    match EvenementService::organisateur_existe(db.get_ref(), champs.organisateur_id).await {
        Ok(false) => {
            return render::invalide(
                "Événement",
                &format!("Utilisateur {} introuvable", champs.organisateur_id),
            );
        }
        Err(e) => return render::erreur(&format!("Database error: {}", e)),
        _ => {}
    }
    if let Some(thematique_id) = champs.thematique_id {
        match EvenementService::thematique_existe(db.get_ref(), thematique_id).await {
            Ok(false) => {
                return render::invalide(
                    "Événement",
                    &format!("Thématique {} introuvable", thematique_id),
                );
            }
            Err(e) => return render::erreur(&format!("Database error: {}", e)),
            _ => {}
        }
    }

    let mut active_model: EvenementActiveModel = evenement.into();
    active_model.titre = Set(form.titre.trim().to_string());
    active_model.description = Set(champ_optionnel(form.description));
    active_model.date_debut = Set(champs.date_debut);
    active_model.date_fin = Set(champs.date_fin);
    active_model.duree_estimee = Set(champs.duree_estimee);
    active_model.lieu = Set(champ_optionnel(form.lieu));
    active_model.adresse = Set(champ_optionnel(form.adresse));
    active_model.thematique_id = Set(champs.thematique_id);
    active_model.type_evenement = Set(form.type_evenement);
    active_model.nombre_places_max = Set(champs.nombre_places_max);
    active_model.inscription_obligatoire = Set(case_cochee(&form.inscription_obligatoire));
    active_model.tarif = Set(champs.tarif);
    active_model.frais_participation = Set(champ_optionnel(form.frais_participation));
    active_model.besoins_competences = Set(champ_optionnel(form.besoins_competences));
    active_model.materiels_necessaires = Set(champ_optionnel(form.materiels_necessaires));
    active_model.materiels_fournis = Set(champ_optionnel(form.materiels_fournis));
    active_model.organisateur_id = Set(champs.organisateur_id);
    active_model.statut = Set(form.statut);
    active_model.publique = Set(case_cochee(&form.publique));
    active_model.notes_organisation = Set(champ_optionnel(form.notes_organisation));
    active_model.retour_experience = Set(champ_optionnel(form.retour_experience));
    active_model.updated_at = Set(Utc::now());

    match active_model.update(db.get_ref()).await {
        Ok(_) => render::rediriger("/admin/evenements"),
        Err(e) => render::erreur(&format!("Database error: {}", e)),
    }
}

/// POST /admin/evenements/{id}/delete - Suppression
#[post("/{id}/delete")]
pub async fn supprimer(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let evenement = match Evenements::find_by_id(path.into_inner()).one(db.get_ref()).await {
        Ok(Some(evenement)) => evenement,
        Ok(None) => return render::introuvable("Événement introuvable"),
        Err(e) => return render::erreur(&format!("Database error: {}", e)),
    };

    match evenement.delete(db.get_ref()).await {
        Ok(_) => render::rediriger("/admin/evenements"),
        Err(e) => render::erreur(&format!("Database error: {}", e)),
    }
}

pub fn admin_evenement_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/evenements")
            .service(liste)
            .service(nouveau)
            .service(creer)
            .service(editer)
            .service(modifier)
            .service(supprimer),
    );
}
