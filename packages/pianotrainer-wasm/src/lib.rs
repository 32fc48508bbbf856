use serde::Serialize;
use wasm_bindgen::prelude::*;

use pianotrainer::{MappingConfig, MappingError, MappingOutput};

#[derive(Serialize)]
struct MappingErrorJson {
    message: String,
    field: Option<String>,
}

/// One event as the audio player needs it
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlaybackEvent {
    start_seconds: f64,
    duration_seconds: f64,
    midi: Vec<u8>,
    label: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlaybackData {
    events: Vec<PlaybackEvent>,
    total_seconds: f64,
}

fn error_to_json(e: MappingError) -> String {
    let error = match e {
        MappingError::ConfigError { field, message } => MappingErrorJson {
            message: format!("{}: {}", field, message),
            field: Some(field),
        },
        MappingError::MetadataError(message) => MappingErrorJson {
            message,
            field: None,
        },
    };
    serde_json::to_string(&error).unwrap_or_else(|_| format!("{{\"message\":{:?}}}", error.message))
}

fn config_from(config_yaml: Option<&str>) -> Result<MappingConfig, MappingError> {
    match config_yaml {
        Some(yaml) => MappingConfig::from_yaml(yaml),
        None => Ok(MappingConfig::default()),
    }
}

fn run(input: &str, config_yaml: Option<&str>) -> Result<MappingOutput, String> {
    config_from(config_yaml)
        .and_then(|config| pianotrainer::map_text(input, &config))
        .map_err(error_to_json)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("{{\"message\":{:?}}}", e.to_string()))
}

fn playback(output: &MappingOutput) -> PlaybackData {
    PlaybackData {
        events: output
            .events
            .iter()
            .map(|e| PlaybackEvent {
                start_seconds: e.start_seconds,
                duration_seconds: e.duration_seconds,
                midi: e.midi_notes(),
                label: e.label.clone(),
            })
            .collect(),
        total_seconds: output.total_seconds,
    }
}

/// Map text to events; returns the full output as JSON
#[wasm_bindgen]
pub fn map_text(input: &str, config_yaml: Option<String>) -> Result<String, JsValue> {
    run(input, config_yaml.as_deref())
        .and_then(|output| to_json(&output))
        .map_err(|e| JsValue::from_str(&e))
}

/// Map text configured by its own frontmatter block
#[wasm_bindgen]
pub fn map_source(source: &str) -> Result<String, JsValue> {
    pianotrainer::map_source(source)
        .map_err(error_to_json)
        .and_then(|output| to_json(&output))
        .map_err(|e| JsValue::from_str(&e))
}

/// Same as `map_text` but hands back a JS object instead of a string
#[wasm_bindgen]
pub fn map_text_value(input: &str, config_yaml: Option<String>) -> Result<JsValue, JsValue> {
    let output = run(input, config_yaml.as_deref()).map_err(|e| JsValue::from_str(&e))?;
    serde_wasm_bindgen::to_value(&output).map_err(JsValue::from)
}

/// Start times, durations and MIDI numbers for the player
#[wasm_bindgen]
pub fn generate_playback_data(input: &str, config_yaml: Option<String>) -> Result<String, JsValue> {
    run(input, config_yaml.as_deref())
        .and_then(|output| to_json(&playback(&output)))
        .map_err(|e| JsValue::from_str(&e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_json_names_field() {
        let json = run("abc", Some("target-seconds: 0")).unwrap_err();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["field"], "target-seconds");
    }

    #[test]
    fn test_metadata_error_json() {
        let json = run("abc", Some("mode: [")).unwrap_err();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["field"].is_null());
        assert!(value["message"].is_string());
    }

    #[test]
    fn test_playback_data_carries_midi() {
        let output = run("a1", None).unwrap();
        let data = playback(&output);
        assert_eq!(data.events[0].midi, vec![57]);
        assert_eq!(data.events[1].midi, vec![57, 60, 64]);
        assert_eq!(data.events[1].start_seconds, 4.0);
    }
}
