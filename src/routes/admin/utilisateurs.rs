use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::Deserialize;

use crate::middleware::AdminUser;
use crate::models::utilisateurs::{
    self, ActiveModel as UtilisateurActiveModel, Column as UtilisateurColumn,
    Entity as Utilisateurs, STATUTS,
};
use crate::routes::admin::{
    case_cochee, champ_optionnel, parse_date, parse_decimal, render,
};
use crate::services::utilisateur_service::{ExtraFields, UtilisateurService};
use crate::utils::{email as email_util, password};

#[derive(Deserialize)]
pub struct UtilisateurForm {
    pub email: String,
    pub nom: String,
    pub prenom: String,
    pub password: String, // vide à l'édition = inchangé
    pub telephone: String,
    pub date_naissance: String,
    pub ville: String,
    pub statut: String,
    pub is_superuser: Option<String>,
    pub disponibilites: String, // JSON libre
    pub competences_partagees: String,
    pub interets: String,
    pub contrepartie_souhaitee: String,
    pub actif: Option<String>,
    pub date_derniere_cotisation: String,
    pub montant_derniere_cotisation: String,
}

/// Valeurs optionnelles du formulaire converties vers leurs types colonnes
struct ChampsParses {
    date_naissance: Option<chrono::NaiveDate>,
    disponibilites: Option<serde_json::Value>,
    date_derniere_cotisation: Option<chrono::NaiveDate>,
    montant_derniere_cotisation: Option<rust_decimal::Decimal>,
}

fn parser_champs(form: &UtilisateurForm) -> Result<ChampsParses, String> {
    let date_naissance = match champ_optionnel(form.date_naissance.clone()) {
        Some(s) => Some(parse_date(&s)?),
        None => None,
    };
    let disponibilites = match champ_optionnel(form.disponibilites.clone()) {
        Some(s) => Some(
            serde_json::from_str(&s).map_err(|_| "Disponibilités: JSON invalide".to_string())?,
        ),
        None => None,
    };
    let date_derniere_cotisation = match champ_optionnel(form.date_derniere_cotisation.clone()) {
        Some(s) => Some(parse_date(&s)?),
        None => None,
    };
    let montant_derniere_cotisation =
        match champ_optionnel(form.montant_derniere_cotisation.clone()) {
            Some(s) => Some(parse_decimal(&s)?),
            None => None,
        };

    Ok(ChampsParses {
        date_naissance,
        disponibilites,
        date_derniere_cotisation,
        montant_derniere_cotisation,
    })
}

fn formulaire(action: &str, user: Option<&utilisateurs::Model>) -> String {
    let valeur = |f: fn(&utilisateurs::Model) -> String| -> String {
        user.map(f).unwrap_or_default()
    };

    let email = valeur(|u| u.email.clone());
    let nom = valeur(|u| u.nom.clone());
    let prenom = valeur(|u| u.prenom.clone());
    let telephone = valeur(|u| u.telephone.clone().unwrap_or_default());
    let date_naissance = valeur(|u| {
        u.date_naissance
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    });
    let ville = valeur(|u| u.ville.clone().unwrap_or_default());
    let statut_courant = user.map(|u| u.statut.as_str()).unwrap_or("adherent");
    let disponibilites = valeur(|u| {
        u.disponibilites
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_default()
    });
    let competences = valeur(|u| u.competences_partagees.clone().unwrap_or_default());
    let interets = valeur(|u| u.interets.clone().unwrap_or_default());
    let contrepartie = valeur(|u| u.contrepartie_souhaitee.clone().unwrap_or_default());
    let date_cotisation = valeur(|u| {
        u.date_derniere_cotisation
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    });
    let montant_cotisation = valeur(|u| {
        u.montant_derniere_cotisation
            .map(|m| m.to_string())
            .unwrap_or_default()
    });

    let options_statut: String = STATUTS
        .iter()
        .map(|s| render::option_html(s, s, statut_courant))
        .collect();

    format!(
        r#"<form method="post" action="{action}">
<label>Email <input type="email" name="email" value="{email}" required></label>
<label>Nom <input name="nom" value="{nom}" maxlength="100" required></label>
<label>Prénom <input name="prenom" value="{prenom}" maxlength="100" required></label>
<label>Mot de passe <input type="password" name="password" placeholder="{placeholder}"></label>
<label>Téléphone <input name="telephone" value="{telephone}" maxlength="20"></label>
<label>Date de naissance <input type="date" name="date_naissance" value="{date_naissance}"></label>
<label>Ville <input name="ville" value="{ville}" maxlength="100"></label>
<label>Statut <select name="statut">{options_statut}</select></label>
<label><input type="checkbox" name="is_superuser"{superuser_coche}> Superutilisateur</label>
<label>Disponibilités (JSON) <textarea name="disponibilites">{disponibilites}</textarea></label>
<label>Compétences partagées <textarea name="competences_partagees">{competences}</textarea></label>
<label>Intérêts <textarea name="interets">{interets}</textarea></label>
<label>Contrepartie souhaitée <textarea name="contrepartie_souhaitee">{contrepartie}</textarea></label>
<label><input type="checkbox" name="actif"{actif_coche}> Actif</label>
<label>Dernière cotisation <input type="date" name="date_derniere_cotisation" value="{date_cotisation}"></label>
<label>Montant dernière cotisation <input name="montant_derniere_cotisation" value="{montant_cotisation}"></label>
<div class="actions"><button type="submit">Enregistrer</button></div>
</form>"#,
        action = render::escape(action),
        email = render::escape(&email),
        nom = render::escape(&nom),
        prenom = render::escape(&prenom),
        placeholder = if user.is_some() { "laisser vide pour conserver" } else { "requis" },
        telephone = render::escape(&telephone),
        date_naissance = date_naissance,
        ville = render::escape(&ville),
        options_statut = options_statut,
        superuser_coche = if user.map(|u| u.is_superuser).unwrap_or(false) { " checked" } else { "" },
        disponibilites = render::escape(&disponibilites),
        competences = render::escape(&competences),
        interets = render::escape(&interets),
        contrepartie = render::escape(&contrepartie),
        actif_coche = if user.map(|u| u.actif).unwrap_or(true) { " checked" } else { "" },
        date_cotisation = date_cotisation,
        montant_cotisation = render::escape(&montant_cotisation),
    )
}

/// GET /admin/utilisateurs - Liste
#[get("")]
pub async fn liste(_admin: AdminUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
    let utilisateurs = match Utilisateurs::find()
        .order_by_asc(UtilisateurColumn::Id)
        .all(db.get_ref())
        .await
    {
        Ok(utilisateurs) => utilisateurs,
        Err(e) => return render::erreur(&format!("Database error: {}", e)),
    };

    let mut lignes = String::new();
    for u in &utilisateurs {
        lignes.push_str(&format!(
            r#"<tr><td>{id}</td><td>{email}</td><td>{nom}</td><td>{prenom}</td><td>{statut}</td><td>{ville}</td><td>{actif}</td>
<td><a href="/admin/utilisateurs/{id}">Éditer</a>
<form class="inline" method="post" action="/admin/utilisateurs/{id}/delete"><button type="submit">Supprimer</button></form></td></tr>"#,
            id = u.id,
            email = render::escape(&u.email),
            nom = render::escape(&u.nom),
            prenom = render::escape(&u.prenom),
            statut = render::escape(&u.statut),
            ville = render::escape(u.ville.as_deref().unwrap_or("")),
            actif = if u.actif { "oui" } else { "non" },
        ));
    }

    let corps = format!(
        r#"<p><a href="/admin/utilisateurs/new">Nouveau membre</a></p>
<table>
<tr><th>Id</th><th>Email</th><th>Nom</th><th>Prénom</th><th>Statut</th><th>Ville</th><th>Actif</th><th>Actions</th></tr>
{lignes}
</table>"#,
    );
    render::page("Membres", &corps)
}

/// GET /admin/utilisateurs/new - Formulaire de création
#[get("/new")]
pub async fn nouveau(_admin: AdminUser) -> HttpResponse {
    render::page("Nouveau membre", &formulaire("/admin/utilisateurs", None))
}

/// POST /admin/utilisateurs - Création via le user store (la case
/// superutilisateur passe par create_superuser, qui force le statut admin)
#[post("")]
pub async fn creer(
    _admin: AdminUser,
    form: web::Form<UtilisateurForm>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let form = form.into_inner();

    if form.password.trim().is_empty() {
        return render::invalide("Nouveau membre", "Le mot de passe est requis");
    }
    if !STATUTS.contains(&form.statut.as_str()) {
        return render::invalide("Nouveau membre", &format!("Statut inconnu: {}", form.statut));
    }

    let champs = match parser_champs(&form) {
        Ok(champs) => champs,
        Err(message) => return render::invalide("Nouveau membre", &message),
    };

    // Unicité de l'email, comme sur l'API
    match UtilisateurService::find_by_email(db.get_ref(), &form.email).await {
        Ok(Some(_)) => {
            return render::invalide(
                "Nouveau membre",
                "Un utilisateur avec cet email existe déjà",
            );
        }
        Err(e) => return render::erreur(&format!("Database error: {}", e)),
        _ => {}
    }

    let extra = ExtraFields {
        telephone: champ_optionnel(form.telephone),
        date_naissance: champs.date_naissance,
        ville: champ_optionnel(form.ville),
        statut: Some(form.statut.clone()),
        is_superuser: None,
        disponibilites: champs.disponibilites,
        competences_partagees: champ_optionnel(form.competences_partagees),
        interets: champ_optionnel(form.interets),
        contrepartie_souhaitee: champ_optionnel(form.contrepartie_souhaitee),
        actif: Some(case_cochee(&form.actif)),
        date_derniere_cotisation: champs.date_derniere_cotisation,
        montant_derniere_cotisation: champs.montant_derniere_cotisation,
    };

    let resultat = if case_cochee(&form.is_superuser) {
        UtilisateurService::create_superuser(
            db.get_ref(),
            &form.email,
            &form.nom,
            &form.prenom,
            &form.password,
            extra,
        )
        .await
    } else {
        UtilisateurService::create_user(
            db.get_ref(),
            &form.email,
            &form.nom,
            &form.prenom,
            &form.password,
            extra,
        )
        .await
    };

    match resultat {
        Ok(_) => render::rediriger("/admin/utilisateurs"),
        Err(sea_orm::DbErr::Custom(message)) => render::invalide("Nouveau membre", &message),
        Err(e) => render::erreur(&format!("Failed to create user: {}", e)),
    }
}

/// GET /admin/utilisateurs/{id} - Formulaire d'édition
#[get("/{id}")]
pub async fn editer(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let id = path.into_inner();
    match Utilisateurs::find_by_id(id).one(db.get_ref()).await {
        Ok(Some(user)) => render::page(
            &format!("Membre {} {}", user.prenom, user.nom),
            &formulaire(&format!("/admin/utilisateurs/{}", id), Some(&user)),
        ),
        Ok(None) => render::introuvable("Utilisateur introuvable"),
        Err(e) => render::erreur(&format!("Database error: {}", e)),
    }
}

/// POST /admin/utilisateurs/{id} - Mise à jour
#[post("/{id}")]
pub async fn modifier(
    _admin: AdminUser,
    path: web::Path<i32>,
    form: web::Form<UtilisateurForm>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let id = path.into_inner();
    let form = form.into_inner();

    if !STATUTS.contains(&form.statut.as_str()) {
        return render::invalide("Membre", &format!("Statut inconnu: {}", form.statut));
    }

    let champs = match parser_champs(&form) {
        Ok(champs) => champs,
        Err(message) => return render::invalide("Membre", &message),
    };

    let user = match Utilisateurs::find_by_id(id).one(db.get_ref()).await {
        Ok(Some(user)) => user,
        Ok(None) => return render::introuvable("Utilisateur introuvable"),
        Err(e) => return render::erreur(&format!("Database error: {}", e)),
    };

    let nouvel_email = email_util::normalize_email(&form.email);
    if nouvel_email != user.email {
        match UtilisateurService::find_by_email(db.get_ref(), &nouvel_email).await {
            Ok(Some(_)) => {
                return render::invalide("Membre", "Un utilisateur avec cet email existe déjà");
            }
            Err(e) => return render::erreur(&format!("Database error: {}", e)),
            _ => {}
        }
    }

    let mut active_model: UtilisateurActiveModel = user.into();
    active_model.email = Set(nouvel_email);
    active_model.nom = Set(form.nom.trim().to_string());
    active_model.prenom = Set(form.prenom.trim().to_string());
    if !form.password.trim().is_empty() {
        match password::hash_password(&form.password) {
            Ok(hash) => active_model.password_hash = Set(hash),
            Err(e) => return render::erreur(&format!("Failed to hash password: {}", e)),
        }
    }
    active_model.telephone = Set(champ_optionnel(form.telephone));
    active_model.date_naissance = Set(champs.date_naissance);
    active_model.ville = Set(champ_optionnel(form.ville));
    active_model.statut = Set(form.statut);
    active_model.is_superuser = Set(case_cochee(&form.is_superuser));
    active_model.disponibilites = Set(champs.disponibilites);
    active_model.competences_partagees = Set(champ_optionnel(form.competences_partagees));
    active_model.interets = Set(champ_optionnel(form.interets));
    active_model.contrepartie_souhaitee = Set(champ_optionnel(form.contrepartie_souhaitee));
    active_model.actif = Set(case_cochee(&form.actif));
    active_model.date_derniere_cotisation = Set(champs.date_derniere_cotisation);
    active_model.montant_derniere_cotisation = Set(champs.montant_derniere_cotisation);
    active_model.updated_at = Set(Utc::now());

    match active_model.update(db.get_ref()).await {
        Ok(_) => render::rediriger("/admin/utilisateurs"),
        Err(e) => render::erreur(&format!("Database error: {}", e)),
    }
}

/// POST /admin/utilisateurs/{id}/delete - Suppression, avec cascade sur les
/// événements organisés
#[post("/{id}/delete")]
pub async fn supprimer(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    match UtilisateurService::delete(db.get_ref(), path.into_inner()).await {
        Ok(Some(_)) => render::rediriger("/admin/utilisateurs"),
        Ok(None) => render::introuvable("Utilisateur introuvable"),
        Err(e) => render::erreur(&format!("Database error: {}", e)),
    }
}

pub fn admin_utilisateur_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/utilisateurs")
            .service(liste)
            .service(nouveau)
            .service(creer)
            .service(editer)
            .service(modifier)
            .service(supprimer),
    );
}
