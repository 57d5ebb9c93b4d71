use sea_orm::*;

use crate::models::thematiques::Entity as Thematiques;
use crate::models::utilisateurs::Entity as Utilisateurs;

pub struct EvenementService;

impl EvenementService {
    /// Vérifie qu'un organisateur existe avant de rattacher un événement
    pub async fn organisateur_existe(db: &DatabaseConnection, id: i32) -> Result<bool, DbErr> {
        Ok(Utilisateurs::find_by_id(id).one(db).await?.is_some())
    }

    /// Vérifie qu'une thématique existe avant de l'associer
    pub async fn thematique_existe(db: &DatabaseConnection, id: i32) -> Result<bool, DbErr> {
        Ok(Thematiques::find_by_id(id).one(db).await?.is_some())
    }
}
