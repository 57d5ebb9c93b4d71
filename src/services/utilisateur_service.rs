use sea_orm::*;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::models::evenements::{Column as EvenementColumn, Entity as Evenements};
use crate::models::utilisateurs::{self, Column as UtilisateurColumn, Entity as Utilisateurs};
use crate::utils::{email as email_util, password};

/// Champs de profil optionnels acceptés à la création d'un compte
#[derive(Debug, Default)]
pub struct ExtraFields {
    pub telephone: Option<String>,
    pub date_naissance: Option<NaiveDate>,
    pub ville: Option<String>,
    pub statut: Option<String>,
    pub is_superuser: Option<bool>,
    pub disponibilites: Option<Value>,
    pub competences_partagees: Option<String>,
    pub interets: Option<String>,
    pub contrepartie_souhaitee: Option<String>,
    pub actif: Option<bool>,
    pub date_derniere_cotisation: Option<NaiveDate>,
    pub montant_derniere_cotisation: Option<Decimal>,
}

pub struct UtilisateurService;

impl UtilisateurService {
    /// Crée un compte: email normalisé, mot de passe hashé, statut "adherent"
    /// par défaut. Refuse un email vide avant toute requête en base.
    pub async fn create_user(
        db: &DatabaseConnection,
        email: &str,
        nom: &str,
        prenom: &str,
        password_clair: &str,
        extra: ExtraFields,
    ) -> Result<utilisateurs::Model, DbErr> {
        if email.trim().is_empty() {
            return Err(DbErr::Custom("Un email est requis".to_string()));
        }

        let email = email_util::normalize_email(email);
        let password_hash = password::hash_password(password_clair).map_err(DbErr::Custom)?;
        let now = Utc::now();

        let new_user = utilisateurs::ActiveModel {
            email: Set(email),
            password_hash: Set(password_hash),
            nom: Set(nom.to_string()),
            prenom: Set(prenom.to_string()),
            telephone: Set(extra.telephone),
            date_naissance: Set(extra.date_naissance),
            ville: Set(extra.ville),
            statut: Set(extra.statut.unwrap_or_else(|| "adherent".to_string())),
            is_superuser: Set(extra.is_superuser.unwrap_or(false)),
            disponibilites: Set(extra.disponibilites),
            competences_partagees: Set(extra.competences_partagees),
            interets: Set(extra.interets),
            contrepartie_souhaitee: Set(extra.contrepartie_souhaitee),
            date_inscription: Set(now),
            derniere_connexion: Set(None),
            actif: Set(extra.actif.unwrap_or(true)),
            date_derniere_cotisation: Set(extra.date_derniere_cotisation),
            montant_derniere_cotisation: Set(extra.montant_derniere_cotisation),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        new_user.insert(db).await
    }

    /// Même routine que create_user, mais statut "admin" et is_superuser
    /// forcés quoi que contienne extra
    pub async fn create_superuser(
        db: &DatabaseConnection,
        email: &str,
        nom: &str,
        prenom: &str,
        password_clair: &str,
        mut extra: ExtraFields,
    ) -> Result<utilisateurs::Model, DbErr> {
        extra.statut = Some("admin".to_string());
        extra.is_superuser = Some(true);
        Self::create_user(db, email, nom, prenom, password_clair, extra).await
    }

    /// Recherche par email (identifiant de connexion), après normalisation
    pub async fn find_by_email(
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<Option<utilisateurs::Model>, DbErr> {
        Utilisateurs::find()
            .filter(UtilisateurColumn::Email.eq(email_util::normalize_email(email)))
            .one(db)
            .await
    }

    /// Supprime un utilisateur et, d'abord, les événements qu'il organise
    /// (même règle que la contrainte ON DELETE CASCADE du schéma).
    /// Retourne None si l'identifiant est inconnu.
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<Option<u64>, DbErr> {
        let user = match Utilisateurs::find_by_id(id).one(db).await? {
            Some(user) => user,
            None => return Ok(None),
        };

        Evenements::delete_many()
            .filter(EvenementColumn::OrganisateurId.eq(id))
            .exec(db)
            .await?;

        let result = user.delete(db).await?;
        Ok(Some(result.rows_affected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utilisateur_fixture() -> utilisateurs::Model {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        utilisateurs::Model {
            id: 7,
            email: "claire@exemple.fr".to_string(),
            password_hash: "pbkdf2_sha256$600000$selfixe$aGFzaA==".to_string(),
            nom: "Moreau".to_string(),
            prenom: "Claire".to_string(),
            telephone: None,
            date_naissance: None,
            ville: None,
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

    #[tokio::test]
    async fn test_create_user_email_vide() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = UtilisateurService::create_user(
            &db,
            "   ",
            "Moreau",
            "Claire",
            "mot-de-passe",
            ExtraFields::default(),
        )
        .await;

        match result {
            Err(DbErr::Custom(msg)) => assert_eq!(msg, "Un email est requis"),
            other => panic!("attendu une erreur de validation, obtenu {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_user_normalise_et_hashe() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![utilisateur_fixture()]])
            .into_connection();

        let result = UtilisateurService::create_user(
            &db,
            "Claire@EXEMPLE.FR",
            "Moreau",
            "Claire",
            "graines-sauvages",
            ExtraFields::default(),
        )
        .await
        .unwrap();

        assert_eq!(result.id, 7);

        // L'INSERT émis porte l'email au domaine minuscule et un hash,
        // jamais le mot de passe en clair
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("Claire@exemple.fr"));
        assert!(log.contains("pbkdf2_sha256$"));
        assert!(!log.contains("graines-sauvages\""));
    }

    #[tokio::test]
    async fn test_delete_cascade_evenements_avant_utilisateur() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![utilisateur_fixture()]])
            .append_exec_results([
                MockExecResult { last_insert_id: 0, rows_affected: 2 }, // événements organisés
                MockExecResult { last_insert_id: 0, rows_affected: 1 }, // l'utilisateur
            ])
            .into_connection();

        let deleted = UtilisateurService::delete(&db, 7).await.unwrap();
        assert_eq!(deleted, Some(1));

        let log = format!("{:?}", db.into_transaction_log());
        let pos_evenements = log.find("evenements").expect("DELETE evenements absent");
        let pos_utilisateur = log.rfind("utilisateurs").expect("DELETE utilisateurs absent");
        assert!(pos_evenements < pos_utilisateur);
    }

    #[tokio::test]
    async fn test_delete_utilisateur_inconnu() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<utilisateurs::Model>::new()])
            .into_connection();

        let deleted = UtilisateurService::delete(&db, 999).await.unwrap();
        assert_eq!(deleted, None);
    }
}
