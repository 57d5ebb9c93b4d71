// Rendu HTML de la console d'administration.
// Pas de moteur de templates: les pages sont assemblées par format!, la
// console n'est qu'une fine couche de présentation au-dessus des mêmes
// opérations de persistance que l'API.

use actix_web::HttpResponse;

/// Échappe les caractères spéciaux HTML d'une valeur venant de la base
/// ou d'un formulaire
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Squelette commun de toutes les pages de la console
pub fn layout(titre: &str, corps: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
<meta charset="utf-8">
<title>{titre} — Administration Cultures Sauvages</title>
<style>
body {{ font-family: sans-serif; margin: 2em; color: #222; }}
nav a {{ margin-right: 1em; }}
table {{ border-collapse: collapse; margin-top: 1em; }}
th, td {{ border: 1px solid #aaa; padding: 0.3em 0.6em; text-align: left; }}
th {{ background: #e8f0e0; }}
form.inline {{ display: inline; }}
label {{ display: block; margin-top: 0.6em; }}
input, select, textarea {{ min-width: 18em; }}
.actions {{ margin-top: 1em; }}
</style>
</head>
<body>
<nav>
<a href="/admin">Accueil</a>
<a href="/admin/utilisateurs">Membres</a>
<a href="/admin/thematiques">Thématiques</a>
<a href="/admin/evenements">Événements</a>
<a href="/admin/logout">Déconnexion</a>
</nav>
<h1>{titre}</h1>
{corps}
</body>
</html>"#,
        titre = escape(titre),
        corps = corps,
    )
}

/// Page HTML 200
pub fn page(titre: &str, corps: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(layout(titre, corps))
}

/// Page d'erreur serveur
pub fn erreur(message: &str) -> HttpResponse {
    HttpResponse::InternalServerError()
        .content_type("text/html; charset=utf-8")
        .body(layout("Erreur", &format!("<p>{}</p>", escape(message))))
}

/// Page 404
pub fn introuvable(message: &str) -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(layout("Introuvable", &format!("<p>{}</p>", escape(message))))
}

/// Formulaire invalide
pub fn invalide(titre: &str, message: &str) -> HttpResponse {
    HttpResponse::BadRequest()
        .content_type("text/html; charset=utf-8")
        .body(layout(
            titre,
            &format!("<p>{}</p><p><a href=\"javascript:history.back()\">Retour</a></p>", escape(message)),
        ))
}

/// Redirection vers une page de la console
pub fn rediriger(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header(("Location", location.to_string()))
        .finish()
}

/// Une balise <option>, sélectionnée si la valeur correspond
pub fn option_html(valeur: &str, libelle: &str, courante: &str) -> String {
    format!(
        "<option value=\"{}\"{}>{}</option>",
        escape(valeur),
        if valeur == courante { " selected" } else { "" },
        escape(libelle),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
        assert_eq!(escape("Jardin & potager"), "Jardin &amp; potager");
    }

    #[test]
    fn test_option_selectionnee() {
        let html = option_html("atelier", "Atelier", "atelier");
        assert!(html.contains("selected"));

        let html = option_html("chantier", "Chantier", "atelier");
        assert!(!html.contains("selected"));
    }
}
