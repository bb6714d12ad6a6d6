//! Prompt and response-schema construction for generation requests.
//!
//! The prompt describes the reference series' style (its title plus one
//! bullet per episode) and the rules new series must follow. The schema is
//! the structured-output constraint sent alongside it; every Series and
//! Episode field is marked required.

use serde_json::{json, Value};

use crate::adapters::GenerationError;
use crate::domain::Series;

/// Channel the generated content is written for
pub const CHANNEL_NAME: &str = "Finanças Pessoais e Investimentos";

/// Number of series the model is asked for (an instruction, not a bound)
pub const REQUESTED_SERIES: usize = 3;

/// Check that a series can serve as a style reference
pub fn validate_reference(reference: &Series) -> Result<(), GenerationError> {
    if reference.title.trim().is_empty() {
        return Err(GenerationError::InvalidReference(
            "reference series has an empty title".to_string(),
        ));
    }
    if reference.episodes.is_empty() {
        return Err(GenerationError::InvalidReference(format!(
            "reference series '{}' has no episodes",
            reference.title
        )));
    }
    Ok(())
}

/// Build the natural-language instruction for a reference series
pub fn build_prompt(reference: &Series) -> Result<String, GenerationError> {
    validate_reference(reference)?;

    let style = reference
        .episodes
        .iter()
        .map(|ep| format!("- {}: {}", ep.title, ep.hook))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(format!(
        "Você é um estrategista de conteúdo para o canal \"{channel}\".\n\
         Baseado no estilo da série atual: \"{title}\", crie {count} novas ideias de séries virais.\n\
         \n\
         ESTILO ATUAL:\n\
         {style}\n\
         \n\
         REGRAS:\n\
         1. Mantenha o tom dramático e educativo.\n\
         2. Cada série deve ter entre 5 a 10 episódios.\n\
         3. Cada episódio deve conter: Título, Hook (gancho inicial), Narrativa, Cena-chave e Lição Moderna.\n\
         4. O conteúdo deve ser em Português do Brasil.\n",
        channel = CHANNEL_NAME,
        title = reference.title,
        count = REQUESTED_SERIES,
        style = style,
    ))
}

/// Structured-output schema for a GenerationResult, in the service's
/// OpenAPI subset (upper-case type names)
pub fn response_schema() -> Value {
    let episode = json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "hook": { "type": "STRING" },
            "narrative": { "type": "STRING" },
            "keyScene": { "type": "STRING" },
            "modernLesson": { "type": "STRING" }
        },
        "required": ["title", "hook", "narrative", "keyScene", "modernLesson"]
    });

    let series = json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "description": { "type": "STRING" },
            "episodes": { "type": "ARRAY", "items": episode }
        },
        "required": ["title", "description", "episodes"]
    });

    json!({
        "type": "OBJECT",
        "properties": {
            "newSeries": { "type": "ARRAY", "items": series }
        },
        "required": ["newSeries"]
    })
}
