pub mod evenement_service;
pub mod thematique_service;
pub mod utilisateur_service;
