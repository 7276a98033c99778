use serde::{Deserialize, Serialize};

/// Payload pushed by the daemon after a successful configuration pull.
#[derive(Deserialize, Debug)]
pub struct IngestRequestDto {
    #[serde(default = "unknown_device")]
    pub node: String,
    #[serde(default)]
    pub config: String,
}

fn unknown_device() -> String {
    "unknown_device".to_owned()
}

#[derive(Serialize, Debug)]
pub struct IngestResponseDto {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl IngestResponseDto {
    pub fn success() -> Self {
        Self {
            status: "success",
            message: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            status: "error",
            message: Some(message),
        }
    }
}
