/// System prompt for the extraction model.
pub const EXTRACTION_SYSTEM_PROMPT: &str = "Tu es un assistant médical spécialisé en \
extraction structurée. Réponds UNIQUEMENT en JSON valide.";

/// Fixed metadata the model must reproduce verbatim in `meta`.
#[derive(Debug, Clone)]
pub struct PromptMeta {
    pub language: String,
    pub today: String,
    pub model_name: String,
    pub schema_version: String,
}

impl PromptMeta {
    pub fn new(model_name: &str, schema_version: &str) -> Self {
        Self {
            language: "fr".to_string(),
            today: chrono::Local::now().format("%Y-%m-%d").to_string(),
            model_name: model_name.to_string(),
            schema_version: schema_version.to_string(),
        }
    }
}

/// Render the extraction prompt for one source document.
///
/// Pure function of (text, schema, meta). The source text sits between
/// `<<<` / `>>>` sentinels so instructions inside the document cannot be
/// confused with ours.
pub fn build_extraction_prompt(text: &str, schema_pretty: &str, meta: &PromptMeta) -> String {
    format!(
        r#"Tu es un extracteur clinique. À partir du texte source, produis STRICTEMENT un JSON conforme au schéma.

Règles strictes :
- Sortie = JSON UNIQUEMENT (aucun commentaire, aucune prose).
- N'utilise que les caractères JSON : {{ }} [ ] , : " .
- Dates au format YYYY-MM-DD ; si inconnu -> null (si mois/jour inconnus -> 01 par défaut).
- N'invente rien ; si absent -> null ou [].
- Respecte toutes les clés/types du schéma.

Schéma JSON :
{schema}

Contraintes meta :
- meta.langue = "{language}"
- meta.date_extraction = "{today}"
- meta.modele_utilise = "{model}"
- meta.schema_version = "{schema_version}"

Texte source :
<<<
{text}
>>>

IMPORTANT :
- Un seul objet JSON valide, commençant par '{{' et finissant par '}}'.
- AUCUN TEXTE hors JSON.
"#,
        schema = schema_pretty,
        language = meta.language,
        today = meta.today,
        model = meta.model_name,
        schema_version = meta.schema_version,
        text = text,
    )
}

/// Render the repair prompt asking the model to reformat its previous reply
/// into a single valid JSON object matching the schema.
pub fn build_repair_prompt(previous_output: &str, schema_pretty: &str) -> String {
    format!(
        r#"Ta sortie précédente n'était pas un JSON pur conforme au schéma.
Reformate STRICTEMENT en un seul objet JSON valide conforme au schéma ci-dessous.
NE RAJOUTE AUCUN TEXTE HORS JSON.

Schéma :
{schema}

Sortie précédente :
<<<
{previous}
>>>
"#,
        schema = schema_pretty,
        previous = previous_output,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> PromptMeta {
        PromptMeta {
            language: "fr".into(),
            today: "2026-08-24".into(),
            model_name: "mistral-medium".into(),
            schema_version: "1.0".into(),
        }
    }

    #[test]
    fn prompt_embeds_source_text_between_sentinels() {
        let prompt = build_extraction_prompt("Patient Jean Dupont", "{}", &meta());
        let start = prompt.find("<<<").unwrap();
        let end = prompt.find(">>>").unwrap();
        assert!(start < end);
        assert!(prompt[start..end].contains("Patient Jean Dupont"));
    }

    #[test]
    fn prompt_embeds_schema_and_meta_constraints() {
        let prompt = build_extraction_prompt("texte", r#"{"type": "object"}"#, &meta());
        assert!(prompt.contains(r#"{"type": "object"}"#));
        assert!(prompt.contains(r#"meta.langue = "fr""#));
        assert!(prompt.contains(r#"meta.date_extraction = "2026-08-24""#));
        assert!(prompt.contains(r#"meta.modele_utilise = "mistral-medium""#));
        assert!(prompt.contains(r#"meta.schema_version = "1.0""#));
    }

    #[test]
    fn prompt_states_date_format_policy() {
        let prompt = build_extraction_prompt("texte", "{}", &meta());
        assert!(prompt.contains("YYYY-MM-DD"));
        assert!(prompt.contains("01 par défaut"));
    }

    #[test]
    fn prompt_is_deterministic_for_fixed_inputs() {
        let a = build_extraction_prompt("texte", "{}", &meta());
        let b = build_extraction_prompt("texte", "{}", &meta());
        assert_eq!(a, b);
    }

    #[test]
    fn repair_prompt_embeds_previous_output() {
        let prompt = build_repair_prompt("Voici le JSON: {oops", "{}");
        assert!(prompt.contains("Voici le JSON: {oops"));
        assert!(prompt.contains("Reformate STRICTEMENT"));
    }

    #[test]
    fn system_prompt_demands_json_only() {
        assert!(EXTRACTION_SYSTEM_PROMPT.contains("JSON"));
    }
}
