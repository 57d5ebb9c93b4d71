use sea_orm::*;

use crate::models::evenements::{self, Column as EvenementColumn, Entity as Evenements};
use crate::models::thematiques::Entity as Thematiques;

pub struct ThematiqueService;

impl ThematiqueService {
    /// Supprime une thématique. Les événements qui la référencent sont
    /// conservés, leur thematique_id est remis à NULL (même règle que la
    /// contrainte ON DELETE SET NULL du schéma).
    /// Retourne None si l'identifiant est inconnu.
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<Option<u64>, DbErr> {
        let thematique = match Thematiques::find_by_id(id).one(db).await? {
            Some(thematique) => thematique,
            None => return Ok(None),
        };

        Evenements::update_many()
            .set(evenements::ActiveModel {
                thematique_id: Set(None),
                ..Default::default()
            })
            .filter(EvenementColumn::ThematiqueId.eq(id))
            .exec(db)
            .await?;

        let result = thematique.delete(db).await?;
        Ok(Some(result.rows_affected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::thematiques;
    use chrono::{TimeZone, Utc};

    fn thematique_fixture() -> thematiques::Model {
        thematiques::Model {
            id: 3,
            nom: "Permaculture".to_string(),
            description: None,
            couleur: "#00FF00".to_string(),
            icone: "leaf".to_string(),
            actif: true,
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_delete_remet_les_references_a_null() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![thematique_fixture()]])
            .append_exec_results([
                MockExecResult { last_insert_id: 0, rows_affected: 4 }, // événements mis à jour
                MockExecResult { last_insert_id: 0, rows_affected: 1 }, // la thématique
            ])
            .into_connection();

        let deleted = ThematiqueService::delete(&db, 3).await.unwrap();
        assert_eq!(deleted, Some(1));

        // L'UPDATE des événements précède le DELETE de la thématique
        let log = format!("{:?}", db.into_transaction_log());
        let pos_update = log.find("UPDATE").expect("UPDATE evenements absent");
        let pos_delete = log.find("DELETE").expect("DELETE thematiques absent");
        assert!(pos_update < pos_delete);
    }

    #[tokio::test]
    async fn test_delete_thematique_inconnue() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<thematiques::Model>::new()])
            .into_connection();

        let deleted = ThematiqueService::delete(&db, 999).await.unwrap();
        assert_eq!(deleted, None);
    }
}
