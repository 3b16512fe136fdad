use serde_json::Value;

use super::schema::SchemaStore;

/// Check a parsed record against the schema.
///
/// Returns `(true, None)` on conformance, `(false, Some(message))` with the
/// first violation otherwise. Invalidity is a normal return value, never an
/// error — callers surface it as advisory metadata.
pub fn validate_record(store: &SchemaStore, record: &Value) -> (bool, Option<String>) {
    match store.validator().validate(record) {
        Ok(()) => (true, None),
        Err(error) => (false, Some(error.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> SchemaStore {
        SchemaStore::builtin().unwrap()
    }

    fn full_record() -> Value {
        json!({
            "patient": {
                "id": null,
                "nom": "Jean Dupont",
                "date_naissance": "1980-05-12",
                "sexe": "Masculin",
                "adresse": null
            },
            "antecedents_medicaux": [
                {"condition": "Hypertension artérielle", "date_diagnostic": "2010-01-01",
                 "status": "active", "type": null, "gravite": null}
            ],
            "traitements_actuels": [
                {"medicament": "Ramipril", "dose": "5mg", "posologie": "1/jour",
                 "indication": "HTA", "debut_traitement": null, "fin_traitement": null}
            ],
            "consultations": [
                {"date": "2024-03-01", "motif": "suivi", "observations": null,
                 "diagnostic": "HTA contrôlée", "traitement_prescrit": null}
            ],
            "examens": [],
            "resume_structure": {
                "maladies": [
                    {"nom": "Hypertension artérielle", "premiere_mention": "2010-01-01",
                     "statut": "active", "derniere_consultation": "2024-03-01", "confiance": 0.9}
                ],
                "allergies": [],
                "traitements": ["Ramipril"]
            },
            "meta": {
                "langue": "fr",
                "source": "pdf",
                "date_extraction": "2026-08-24",
                "modele_utilise": "mistral-medium",
                "confiance_moyenne": 0.85,
                "schema_version": "1.0"
            },
            "document_source": {
                "nom_fichier": "dossier.pdf",
                "type": "pdf",
                "id_document": null
            }
        })
    }

    #[test]
    fn conforming_record_passes() {
        let (valid, error) = validate_record(&store(), &full_record());
        assert!(valid, "unexpected error: {error:?}");
        assert!(error.is_none());
    }

    #[test]
    fn missing_required_section_fails_with_message() {
        let mut record = full_record();
        record.as_object_mut().unwrap().remove("meta");
        let (valid, error) = validate_record(&store(), &record);
        assert!(!valid);
        assert!(error.is_some());
    }

    #[test]
    fn wrong_type_fails() {
        let mut record = full_record();
        record["antecedents_medicaux"] = json!("pas un tableau");
        let (valid, error) = validate_record(&store(), &record);
        assert!(!valid);
        assert!(error.unwrap().contains("pas un tableau"));
    }

    #[test]
    fn confidence_out_of_range_fails() {
        let mut record = full_record();
        record["resume_structure"]["maladies"][0]["confiance"] = json!(1.5);
        let (valid, _) = validate_record(&store(), &record);
        assert!(!valid);
    }

    #[test]
    fn partial_record_is_invalid_against_full_schema() {
        // The end-to-end stub scenario: patient alone is well-formed JSON but
        // the schema requires the other sections.
        let record = json!({"patient": {"nom": "Jean Dupont", "date_naissance": "1980-05-12"}});
        let (valid, error) = validate_record(&store(), &record);
        assert!(!valid);
        assert!(error.is_some());
    }

    #[test]
    fn validation_never_panics_on_odd_input() {
        let (valid, _) = validate_record(&store(), &json!(null));
        assert!(!valid);
        let (valid, _) = validate_record(&store(), &json!([1, 2, 3]));
        assert!(!valid);
    }
}
