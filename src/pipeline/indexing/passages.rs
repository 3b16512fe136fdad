use serde_json::{json, Map, Value};

use super::types::Passage;

/// Placeholder for an unknown patient name.
const UNKNOWN_PATIENT: &str = "Inconnu";

/// Decompose a structured record into an ordered sequence of passages.
///
/// Order is fixed regardless of map key ordering: patient summary first
/// (always emitted), then antecedents, disease summary entries, current
/// treatments and consultations, each in source array order. Absent fields
/// render as the literal `null` so passage shape is stable. Empty sections
/// produce zero passages, never an error.
pub fn build_passages(record: &Value) -> Vec<Passage> {
    let mut out = Vec::new();

    let patient = record.get("patient").cloned().unwrap_or(Value::Null);
    let nom = match patient.get("nom").and_then(Value::as_str) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => UNKNOWN_PATIENT.to_string(),
    };
    out.push(Passage {
        text: format!(
            "Patient: {nom}. Sexe: {}. Naissance: {}.",
            field(&patient, "sexe"),
            field(&patient, "date_naissance"),
        ),
        meta: meta("patient", 0, "patient_nom", json!(nom)),
    });

    for (i, ant) in section_items(record, "antecedents_medicaux").iter().enumerate() {
        out.push(Passage {
            text: format!(
                "Antécédent: {}; date diagnostic: {}.",
                field(ant, "condition"),
                field(ant, "date_diagnostic"),
            ),
            meta: meta("antecedent", i, "condition", key(ant, "condition")),
        });
    }

    let maladies = record
        .get("resume_structure")
        .and_then(|r| r.get("maladies"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    for (i, mal) in maladies.iter().enumerate() {
        out.push(Passage {
            text: format!(
                "Maladie: {}. Première mention: {}. Statut: {}. Dernière consultation: {}.",
                field(mal, "nom"),
                field(mal, "premiere_mention"),
                field(mal, "statut"),
                field(mal, "derniere_consultation"),
            ),
            meta: meta("maladie", i, "nom", key(mal, "nom")),
        });
    }

    for (i, tr) in section_items(record, "traitements_actuels").iter().enumerate() {
        out.push(Passage {
            text: format!(
                "Traitement: {}; dose: {}; posologie: {}; indication: {}.",
                field(tr, "medicament"),
                field(tr, "dose"),
                field(tr, "posologie"),
                field(tr, "indication"),
            ),
            meta: meta("traitement", i, "medicament", key(tr, "medicament")),
        });
    }

    for (i, cons) in section_items(record, "consultations").iter().enumerate() {
        out.push(Passage {
            text: format!(
                "Consultation du {}: motif {}; diagnostic {}; traitement {}.",
                field(cons, "date"),
                field(cons, "motif"),
                field(cons, "diagnostic"),
                field(cons, "traitement_prescrit"),
            ),
            meta: meta("consultation", i, "date", key(cons, "date")),
        });
    }

    out
}

/// A top-level array section, tolerating null/absent/non-array values.
fn section_items(record: &Value, section: &str) -> Vec<Value> {
    record
        .get(section)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Render a field for passage text. Strings render bare; anything absent or
/// null renders as the literal `null`.
fn field(obj: &Value, name: &str) -> String {
    match obj.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "null".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Natural-key value for passage metadata, null when absent.
fn key(obj: &Value, name: &str) -> Value {
    obj.get(name).cloned().unwrap_or(Value::Null)
}

fn meta(section: &str, idx: usize, key_name: &str, key_value: Value) -> Map<String, Value> {
    let mut m = Map::new();
    m.insert("section".into(), json!(section));
    m.insert("idx".into(), json!(idx));
    m.insert(key_name.into(), key_value);
    m
}
