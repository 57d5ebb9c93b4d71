use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "thematiques")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub nom: String,
    pub description: Option<String>,
    pub couleur: String, // code hexadécimal, ex: "#00FF00"
    pub icone: String,
    pub actif: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // Supprimer une thématique laisse les événements en place (référence mise à NULL)
    #[sea_orm(has_many = "super::evenements::Entity")]
    Evenements,
}

impl Related<super::evenements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evenements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
