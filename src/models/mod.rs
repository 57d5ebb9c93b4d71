// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table PostgreSQL avec SeaORM.
//
// Liste des modules:
//   - utilisateurs : Membres de l'association (auth email + mot de passe)
//   - thematiques  : Catégories d'événements (nom unique, couleur, icône)
//   - evenements   : Activités planifiées (organisateur + thématique optionnelle)
//   - dto          : Data Transfer Objects des requêtes/réponses API
//
// Points d'attention:
//   - Tous les modèles utilisent SeaORM (pas de SQL brut)
//   - Les relations entre tables sont définies dans chaque modèle
//   - evenements.organisateur_id : suppression en cascade avec l'utilisateur
//   - evenements.thematique_id : mis à NULL si la thématique est supprimée
//
// ============================================================================

pub mod dto;
pub mod evenements;
pub mod thematiques;
pub mod utilisateurs;
