use std::sync::Arc;

use serde_json::Value;

use super::parser::extract_json;
use super::prompt::{
    build_extraction_prompt, build_repair_prompt, PromptMeta, EXTRACTION_SYSTEM_PROMPT,
};
use super::schema::SchemaStore;
use super::types::{ChatModel, ExtractionOutcome};
use super::validator::validate_record;
use super::ExtractionError;

/// Text-to-record extraction pipeline.
///
/// Composes prompt building, the model call, response parsing, schema
/// validation and a bounded repair loop into one synchronous operation.
/// Validation failure is advisory; only transport failures surface as `Err`.
pub struct ExtractionPipeline {
    model: Arc<dyn ChatModel + Send + Sync>,
    schema: Arc<SchemaStore>,
    model_name: String,
    temperature: f32,
    repair_attempts: u32,
}

impl ExtractionPipeline {
    pub fn new(
        model: Arc<dyn ChatModel + Send + Sync>,
        schema: Arc<SchemaStore>,
        model_name: &str,
        temperature: f32,
        repair_attempts: u32,
    ) -> Self {
        Self {
            model,
            schema,
            model_name: model_name.to_string(),
            temperature,
            repair_attempts,
        }
    }

    pub fn schema(&self) -> &SchemaStore {
        &self.schema
    }

    /// Run one extraction over raw source text.
    ///
    /// A parse or validation failure triggers up to `repair_attempts`
    /// re-prompts asking the model to reformat its previous reply. Once the
    /// budget is spent, the best-effort parsed record is returned with
    /// `valid = false`; if nothing ever parsed, the record is `{}`.
    pub fn run(&self, text: &str) -> Result<ExtractionOutcome, ExtractionError> {
        let meta = PromptMeta::new(&self.model_name, self.schema.version());
        let prompt = build_extraction_prompt(text, self.schema.pretty(), &meta);

        let mut raw = self
            .model
            .complete(EXTRACTION_SYSTEM_PROMPT, &prompt, self.temperature)?;

        let mut best: Option<Value> = None;
        let mut last_error: Option<String> = None;

        for attempt in 0..=self.repair_attempts {
            match extract_json(&raw) {
                Ok(record) => {
                    let (valid, error) = validate_record(&self.schema, &record);
                    if valid {
                        if attempt > 0 {
                            tracing::info!(attempt, "extraction repaired successfully");
                        }
                        return Ok(ExtractionOutcome {
                            record,
                            valid: true,
                            validation_error: None,
                        });
                    }
                    tracing::warn!(attempt, error = ?error, "record fails schema validation");
                    last_error = error;
                    best = Some(record);
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "no JSON recovered from model reply");
                    last_error = Some(e.to_string());
                }
            }

            if attempt < self.repair_attempts {
                let repair = build_repair_prompt(&raw, self.schema.pretty());
                raw = self
                    .model
                    .complete(EXTRACTION_SYSTEM_PROMPT, &repair, self.temperature)?;
            }
        }

        Ok(ExtractionOutcome {
            record: best.unwrap_or_else(|| Value::Object(serde_json::Map::new())),
            valid: false,
            validation_error: last_error,
        })
    }
}
