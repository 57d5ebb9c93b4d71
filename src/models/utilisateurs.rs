use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

/// Statuts possibles pour un membre de l'association
pub const STATUTS: [&str; 4] = ["admin", "membre_actif", "benevole", "adherent"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "utilisateurs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String, // identifiant de connexion, unique
    #[serde(skip_serializing)] // Ne jamais exposer le hash en JSON
    pub password_hash: String, // Format: pbkdf2_sha256$iterations$salt$hash
    pub nom: String,
    pub prenom: String,
    pub telephone: Option<String>,
    pub date_naissance: Option<Date>,
    pub ville: Option<String>,
    pub statut: String, // 'admin', 'membre_actif', 'benevole', 'adherent'
    pub is_superuser: bool,
    pub disponibilites: Option<Json>, // créneaux libres, structure libre côté client
    pub competences_partagees: Option<String>,
    pub interets: Option<String>,
    pub contrepartie_souhaitee: Option<String>,
    pub date_inscription: DateTimeUtc,
    pub derniere_connexion: Option<DateTimeUtc>,
    pub actif: bool,
    pub date_derniere_cotisation: Option<Date>,
    pub montant_derniere_cotisation: Option<Decimal>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // Supprimer un utilisateur supprime les événements qu'il organise
    #[sea_orm(has_many = "super::evenements::Entity")]
    Evenements,
}

impl Related<super::evenements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evenements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
