//! gempath playground as a WASM module for browser environments.
//!
//! Every export takes strings and returns a JSON string, so the host never
//! needs to catch an exception. Options and configs are optional JSON
//! strings; pass `""` for the defaults.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { parse_map, parse_commands, simulate_program } from 'gempath-wasm';
//!
//! await init();
//!
//! const map = JSON.parse(parse_map(mapText, ""));
//! const program = JSON.parse(parse_commands(scriptText));
//! if (map.success && program.success) {
//!   const run = JSON.parse(simulate_program(JSON.stringify(map.value), JSON.stringify(program.value), ""));
//!   console.log(run.value.frames);
//! }
//! ```

use gempath_eval::SimulationConfig;
use gempath_map::MapOptions;
use gempath_playground::ValidationReport;
use gempath_types::ast::Program;
use gempath_types::map::MapModel;
use gempath_types::GempathError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Uniform result shape for every fallible export.
///
/// ```json
/// { "success": true, "value": { ... } }
/// { "success": false, "error": { "code": 101, "category": "map", "message": "..." } }
/// ```
#[derive(Serialize)]
struct Envelope<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorPayload>,
}

/// Either a pipeline error or a host-side input problem.
#[derive(Serialize)]
#[serde(untagged)]
enum ErrorPayload {
    Pipeline(GempathError),
    Input { message: String },
}

impl<T: Serialize> Envelope<T> {
    fn ok(value: T) -> Self {
        Self {
            success: true,
            value: Some(value),
            error: None,
        }
    }

    fn err(error: ErrorPayload) -> Self {
        Self {
            success: false,
            value: None,
            error: Some(error),
        }
    }

    fn from_result(result: gempath_types::Result<T>) -> Self {
        match result {
            Ok(value) => Self::ok(value),
            Err(error) => Self::err(ErrorPayload::Pipeline(error)),
        }
    }

    fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"success":false,"error":{{"message":"Serialization error: {}"}}}}"#,
                e
            )
        })
    }
}

fn input_error<T: Serialize>(what: &str, error: impl std::fmt::Display) -> String {
    Envelope::<T>::err(ErrorPayload::Input {
        message: format!("invalid {what}: {error}"),
    })
    .to_json()
}

/// Parse an optional JSON argument; blank means `T::default()`.
fn from_json_or_default<T: DeserializeOwned + Default>(json: &str) -> serde_json::Result<T> {
    if json.trim().is_empty() {
        Ok(T::default())
    } else {
        serde_json::from_str(json)
    }
}

/// Parse tab-delimited map text.
///
/// `options_json` is a `MapOptions` object such as
/// `{"allowMissingStart": true}`; blank for strict parsing.
#[wasm_bindgen]
pub fn parse_map(text: &str, options_json: &str) -> String {
    let options: MapOptions = match from_json_or_default(options_json) {
        Ok(options) => options,
        Err(e) => return input_error::<MapModel>("map options", e),
    };
    Envelope::from_result(gempath_map::parse_map(text, &options)).to_json()
}

/// Parse and validate a script into a `Program`.
#[wasm_bindgen]
pub fn parse_commands(text: &str) -> String {
    Envelope::from_result(gempath_parser::parse_commands(text)).to_json()
}

/// Simulate a parsed program on a parsed map.
///
/// `map_json` and `program_json` are the `value` payloads returned by
/// [`parse_map`] and [`parse_commands`]. The simulation itself never fails;
/// runtime faults are reported inside the result.
#[wasm_bindgen]
pub fn simulate_program(map_json: &str, program_json: &str, config_json: &str) -> String {
    let map: MapModel = match serde_json::from_str(map_json) {
        Ok(map) => map,
        Err(e) => return input_error::<()>("map", e),
    };
    let program: Program = match serde_json::from_str(program_json) {
        Ok(program) => program,
        Err(e) => return input_error::<()>("program", e),
    };
    let config: SimulationConfig = match from_json_or_default(config_json) {
        Ok(config) => config,
        Err(e) => return input_error::<()>("simulation config", e),
    };
    Envelope::ok(gempath_eval::simulate_with_config(&map, &program, &config)).to_json()
}

fn run_validation(
    map_text: &str,
    script_text: &str,
    options_json: &str,
    config_json: &str,
) -> Result<ValidationReport, String> {
    let options: MapOptions =
        from_json_or_default(options_json).map_err(|e| format!("invalid map options: {e}"))?;
    let config: SimulationConfig = from_json_or_default(config_json)
        .map_err(|e| format!("invalid simulation config: {e}"))?;
    Ok(gempath_playground::validate_with(map_text, script_text, &options, &config))
}

/// Run the whole pipeline and return a `ValidationReport` as JSON.
///
/// Parse failures are part of the report (`"status": "error"`); only
/// malformed options produce a `success: false` envelope.
#[wasm_bindgen]
pub fn validate(
    map_text: &str,
    script_text: &str,
    options_json: &str,
    config_json: &str,
) -> String {
    match run_validation(map_text, script_text, options_json, config_json) {
        Ok(report) => Envelope::ok(report).to_json(),
        Err(message) => Envelope::<()>::err(ErrorPayload::Input { message }).to_json(),
    }
}

/// Same as [`validate`], but returns the report as a JS object.
#[wasm_bindgen]
pub fn validate_object(
    map_text: &str,
    script_text: &str,
    options_json: &str,
    config_json: &str,
) -> Result<JsValue, JsValue> {
    let report = run_validation(map_text, script_text, options_json, config_json)
        .map_err(|message| JsValue::from_str(&message))?;
    serde_wasm_bindgen::to_value(&report).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Return the package version string.
#[wasm_bindgen]
pub fn version() -> String {
    gempath_playground::GEMPATH_VERSION.to_string()
}

/// Return the compact text language reference.
#[wasm_bindgen]
pub fn get_reference() -> String {
    gempath_playground::reference::generate_reference()
}

/// Return the command/predicate/legend table as JSON.
#[wasm_bindgen]
pub fn get_command_table() -> String {
    gempath_playground::reference::generate_command_table()
}

/// Return the bundled sample as `{"map": "...", "solution": "..."}`.
#[wasm_bindgen]
pub fn get_sample() -> String {
    serde_json::json!({
        "map": gempath_playground::SAMPLE_MAP,
        "solution": gempath_playground::SAMPLE_SOLUTION,
    })
    .to_string()
}
