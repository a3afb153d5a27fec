//! JSON envelopes: `{"status":"success","data":…}` or `{"status":…,"message":…}`

use crate::pipeline::error_status;
use anyhow::Result;
use hypertac_core::VisualizationResult;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Envelope<'a> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a VisualizationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

pub fn render(outcome: &Result<VisualizationResult>) -> Result<String> {
    let envelope = match outcome {
        Ok(result) => Envelope {
            status: "success",
            data: Some(result),
            message: None,
        },
        Err(error) => Envelope {
            status: error_status(error),
            data: None,
            message: Some(format!("{:#}", error)),
        },
    };
    Ok(serde_json::to_string_pretty(&envelope)?)
}
