use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

/// Types d'événements organisés par l'association
pub const TYPES_EVENEMENT: [&str; 6] = [
    "atelier",
    "chantier",
    "reunion",
    "formation",
    "festivite",
    "autre",
];

/// Statuts du cycle de vie d'un événement.
/// Aucune transition n'est imposée: n'importe quel statut peut remplacer
/// n'importe quel autre.
pub const STATUTS_EVENEMENT: [&str; 5] = [
    "planifie",
    "confirme",
    "en_cours",
    "termine",
    "annule",
];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "evenements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub titre: String,
    pub description: Option<String>,
    pub date_debut: DateTimeUtc,
    pub date_fin: Option<DateTimeUtc>,
    pub duree_estimee: Option<i32>, // en minutes
    pub lieu: Option<String>,
    pub adresse: Option<String>,
    pub thematique_id: Option<i32>,
    pub type_evenement: String, // 'atelier', 'chantier', 'reunion', 'formation', 'festivite', 'autre'
    pub nombre_places_max: Option<i32>,
    // Compteur stocké, jamais confronté à nombre_places_max
    pub nombre_inscrits: i32,
    pub inscription_obligatoire: bool,
    pub tarif: Decimal,
    pub frais_participation: Option<String>,
    pub besoins_competences: Option<String>,
    pub materiels_necessaires: Option<String>,
    pub materiels_fournis: Option<String>,
    pub organisateur_id: i32,
    pub statut: String, // 'planifie', 'confirme', 'en_cours', 'termine', 'annule'
    pub publique: bool,
    pub notes_organisation: Option<String>,
    pub retour_experience: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::utilisateurs::Entity",
        from = "Column::OrganisateurId",
        to = "super::utilisateurs::Column::Id",
        on_delete = "Cascade"
    )]
    Organisateur,

    #[sea_orm(
        belongs_to = "super::thematiques::Entity",
        from = "Column::ThematiqueId",
        to = "super::thematiques::Column::Id",
        on_delete = "SetNull"
    )]
    Thematique,
}

impl Related<super::utilisateurs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organisateur.def()
    }
}

impl Related<super::thematiques::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Thematique.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
