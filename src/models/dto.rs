// DTOs des requêtes/réponses de l'API REST.
//
// Les champs gérés par le serveur (id, timestamps, date_inscription,
// derniere_connexion, nombre_inscrits) n'existent pas dans les DTOs de
// requête: un client qui les envoie est ignoré. Les réponses déclarent
// explicitement chaque champ exposé (pas de sérialisation directe des
// entités, le hash de mot de passe ne doit jamais sortir).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::models::{evenements, thematiques, utilisateurs};

// ---------------------------------------------------------------------------
// Utilisateurs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUtilisateurRequest {
    #[validate(
        email(message = "Adresse email invalide"),
        length(min = 1, max = 254, message = "Un email est requis")
    )]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "Le nom est requis"))]
    pub nom: String,
    #[validate(length(min = 1, max = 100, message = "Le prénom est requis"))]
    pub prenom: String,
    #[validate(length(min = 8, message = "8 caractères minimum"))]
    pub password: String,
    #[validate(length(max = 20))]
    pub telephone: Option<String>,
    pub date_naissance: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub ville: Option<String>,
    pub statut: Option<String>, // défaut: "adherent"
    pub disponibilites: Option<Value>,
    pub competences_partagees: Option<String>,
    pub interets: Option<String>,
    pub contrepartie_souhaitee: Option<String>,
    pub actif: Option<bool>,
    pub date_derniere_cotisation: Option<NaiveDate>,
    pub montant_derniere_cotisation: Option<Decimal>,
}

/// PUT comme PATCH: seuls les champs fournis sont modifiés
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUtilisateurRequest {
    #[validate(email(message = "Adresse email invalide"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub nom: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub prenom: Option<String>,
    #[validate(length(min = 8, message = "8 caractères minimum"))]
    pub password: Option<String>,
    #[validate(length(max = 20))]
    pub telephone: Option<String>,
    pub date_naissance: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub ville: Option<String>,
    pub statut: Option<String>,
    pub disponibilites: Option<Value>,
    pub competences_partagees: Option<String>,
    pub interets: Option<String>,
    pub contrepartie_souhaitee: Option<String>,
    pub actif: Option<bool>,
    pub date_derniere_cotisation: Option<NaiveDate>,
    pub montant_derniere_cotisation: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct UtilisateurResponse {
    pub id: i32,
    pub email: String,
    pub nom: String,
    pub prenom: String,
    pub telephone: Option<String>,
    pub date_naissance: Option<NaiveDate>,
    pub ville: Option<String>,
    pub statut: String,
    pub is_superuser: bool,
    pub disponibilites: Option<Value>,
    pub competences_partagees: Option<String>,
    pub interets: Option<String>,
    pub contrepartie_souhaitee: Option<String>,
    pub date_inscription: DateTime<Utc>,
    pub derniere_connexion: Option<DateTime<Utc>>,
    pub actif: bool,
    pub date_derniere_cotisation: Option<NaiveDate>,
    pub montant_derniere_cotisation: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<utilisateurs::Model> for UtilisateurResponse {
    fn from(u: utilisateurs::Model) -> Self {
        UtilisateurResponse {
            id: u.id,
            email: u.email,
            nom: u.nom,
            prenom: u.prenom,
            telephone: u.telephone,
            date_naissance: u.date_naissance,
            ville: u.ville,
            statut: u.statut,
            is_superuser: u.is_superuser,
            disponibilites: u.disponibilites,
            competences_partagees: u.competences_partagees,
            interets: u.interets,
            contrepartie_souhaitee: u.contrepartie_souhaitee,
            date_inscription: u.date_inscription,
            derniere_connexion: u.derniere_connexion,
            actif: u.actif,
            date_derniere_cotisation: u.date_derniere_cotisation,
            montant_derniere_cotisation: u.montant_derniere_cotisation,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Thématiques
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateThematiqueRequest {
    #[validate(length(min = 1, max = 100, message = "Le nom est requis"))]
    pub nom: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 7, message = "Code couleur invalide"))]
    pub couleur: String,
    #[validate(length(min = 1, max = 50, message = "L'icône est requise"))]
    pub icone: String,
    pub actif: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateThematiqueRequest {
    #[validate(length(min = 1, max = 100))]
    pub nom: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 7))]
    pub couleur: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub icone: Option<String>,
    pub actif: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ThematiqueResponse {
    pub id: i32,
    pub nom: String,
    pub description: Option<String>,
    pub couleur: String,
    pub icone: String,
    pub actif: bool,
    pub created_at: DateTime<Utc>,
}

impl From<thematiques::Model> for ThematiqueResponse {
    fn from(t: thematiques::Model) -> Self {
        ThematiqueResponse {
            id: t.id,
            nom: t.nom,
            description: t.description,
            couleur: t.couleur,
            icone: t.icone,
            actif: t.actif,
            created_at: t.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Événements
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEvenementRequest {
    #[validate(length(min = 1, max = 200, message = "Le titre est requis"))]
    pub titre: String,
    pub description: Option<String>,
    pub date_debut: DateTime<Utc>,
    pub date_fin: Option<DateTime<Utc>>,
    pub duree_estimee: Option<i32>,
    #[validate(length(max = 200))]
    pub lieu: Option<String>,
    pub adresse: Option<String>,
    pub thematique_id: Option<i32>,
    pub type_evenement: String,
    pub nombre_places_max: Option<i32>,
    pub inscription_obligatoire: Option<bool>,
    pub tarif: Option<Decimal>, // défaut: 0
    pub frais_participation: Option<String>,
    pub besoins_competences: Option<String>,
    pub materiels_necessaires: Option<String>,
    pub materiels_fournis: Option<String>,
    pub organisateur_id: i32,
    pub statut: Option<String>, // défaut: "planifie"
    pub publique: Option<bool>, // défaut: true
    pub notes_organisation: Option<String>,
    pub retour_experience: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEvenementRequest {
    #[validate(length(min = 1, max = 200))]
    pub titre: Option<String>,
    pub description: Option<String>,
    pub date_debut: Option<DateTime<Utc>>,
    pub date_fin: Option<DateTime<Utc>>,
    pub duree_estimee: Option<i32>,
    #[validate(length(max = 200))]
    pub lieu: Option<String>,
    pub adresse: Option<String>,
    pub thematique_id: Option<i32>,
    pub type_evenement: Option<String>,
    pub nombre_places_max: Option<i32>,
    pub inscription_obligatoire: Option<bool>,
    pub tarif: Option<Decimal>,
    pub frais_participation: Option<String>,
    pub besoins_competences: Option<String>,
    pub materiels_necessaires: Option<String>,
    pub materiels_fournis: Option<String>,
    pub organisateur_id: Option<i32>,
    pub statut: Option<String>,
    pub publique: Option<bool>,
    pub notes_organisation: Option<String>,
    pub retour_experience: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EvenementResponse {
    pub id: i32,
    pub titre: String,
    pub description: Option<String>,
    pub date_debut: DateTime<Utc>,
    pub date_fin: Option<DateTime<Utc>>,
    pub duree_estimee: Option<i32>,
    pub lieu: Option<String>,
    pub adresse: Option<String>,
    pub thematique_id: Option<i32>,
    pub type_evenement: String,
    pub nombre_places_max: Option<i32>,
    pub nombre_inscrits: i32,
    pub inscription_obligatoire: bool,
    pub tarif: Decimal,
    pub frais_participation: Option<String>,
    pub besoins_competences: Option<String>,
    pub materiels_necessaires: Option<String>,
    pub materiels_fournis: Option<String>,
    pub organisateur_id: i32,
    pub statut: String,
    pub publique: bool,
    pub notes_organisation: Option<String>,
    pub retour_experience: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<evenements::Model> for EvenementResponse {
    fn from(e: evenements::Model) -> Self {
        EvenementResponse {
            id: e.id,
            titre: e.titre,
            description: e.description,
            date_debut: e.date_debut,
            date_fin: e.date_fin,
            duree_estimee: e.duree_estimee,
            lieu: e.lieu,
            adresse: e.adresse,
            thematique_id: e.thematique_id,
            type_evenement: e.type_evenement,
            nombre_places_max: e.nombre_places_max,
            nombre_inscrits: e.nombre_inscrits,
            inscription_obligatoire: e.inscription_obligatoire,
            tarif: e.tarif,
            frais_participation: e.frais_participation,
            besoins_competences: e.besoins_competences,
            materiels_necessaires: e.materiels_necessaires,
            materiels_fournis: e.materiels_fournis,
            organisateur_id: e.organisateur_id,
            statut: e.statut,
            publique: e.publique,
            notes_organisation: e.notes_organisation,
            retour_experience: e.retour_experience,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utilisateur_modele() -> utilisateurs::Model {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        utilisateurs::Model {
            id: 1,
            email: "claire@cultures-sauvages.fr".to_string(),
            password_hash: "pbkdf2_sha256$600000$abc$def".to_string(),
            nom: "Moreau".to_string(),
            prenom: "Claire".to_string(),
            telephone: None,
            date_naissance: None,
            ville: Some("Rennes".to_string()),
            statut: "adherent".to_string(),
            is_superuser: false,
            disponibilites: None,
            competences_partagees: None,
            interets: None,
            contrepartie_souhaitee: None,
            date_inscription: now,
            derniere_connexion: None,
            actif: true,
            date_derniere_cotisation: None,
            montant_derniere_cotisation: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_reponse_utilisateur_sans_hash() {
        let response = UtilisateurResponse::from(utilisateur_modele());
        let json = serde_json::to_value(&response).unwrap();

        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "claire@cultures-sauvages.fr");
        assert_eq!(json["statut"], "adherent");
    }

    #[test]
    fn test_create_utilisateur_email_invalide() {
        let request = CreateUtilisateurRequest {
            email: "pas-un-email".to_string(),
            nom: "Moreau".to_string(),
            prenom: "Claire".to_string(),
            password: "correct horse".to_string(),
            telephone: None,
            date_naissance: None,
            ville: None,
            statut: None,
            disponibilites: None,
            competences_partagees: None,
            interets: None,
            contrepartie_souhaitee: None,
            actif: None,
            date_derniere_cotisation: None,
            montant_derniere_cotisation: None,
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_create_thematique_couleur_trop_longue() {
        let request = CreateThematiqueRequest {
            nom: "Permaculture".to_string(),
            description: None,
            couleur: "#00FF00FF".to_string(), // 9 caractères, max 7
            icone: "leaf".to_string(),
            actif: None,
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("couleur"));
    }

    #[test]
    fn test_statuts_et_types_connus() {
        assert!(utilisateurs::STATUTS.contains(&"adherent"));
        assert!(evenements::TYPES_EVENEMENT.contains(&"chantier"));
        assert!(evenements::STATUTS_EVENEMENT.contains(&"annule"));
        assert!(!evenements::STATUTS_EVENEMENT.contains(&"reporte"));
    }
}
