use serde::{Deserialize, Serialize};

/// One unit of work, deserialized from a queue message body.
///
/// `original` and `destination` are mandatory; everything else carries a
/// default so that minimal job payloads stay valid. Strategies that resize
/// additionally require `width` and `height` — that requirement is enforced
/// at command-resolution time, not here, because `pdf` and `manual` jobs
/// legitimately omit them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    /// Source object key in the bucket.
    pub original: String,
    /// Target key/prefix used to derive the remote name of every produced file.
    pub destination: String,
    /// Per-job bucket override; falls back to the configured default bucket.
    #[serde(default)]
    pub bucket: Option<String>,
    /// Per-job region override; falls back to the client's default region.
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Output extension.
    #[serde(default = "default_format")]
    pub format: String,
    /// Named built-in strategy, or an inline `%(field)s` command template.
    #[serde(default = "default_strategy")]
    pub strategy: String,
    /// Canvas color for the `matted` strategy.
    #[serde(default = "default_background")]
    pub background: String,
    /// Output quality; 0 means unset and no quality flag is emitted.
    #[serde(default)]
    pub quality: u32,
    /// Override of the configured conversion binary.
    #[serde(default)]
    pub command: Option<String>,
    /// Opaque correlation id, echoed back in the reply.
    #[serde(default)]
    pub id: String,
    /// Reply-queue discriminator; the reply destination becomes
    /// `{queue}_{reply_suffix}` when present.
    #[serde(default)]
    pub queue: Option<String>,
    /// Callback URL notified with the job payload after a successful run.
    #[serde(default)]
    pub notify: Option<String>,
}

fn default_format() -> String {
    "png".to_string()
}

fn default_strategy() -> String {
    "pdf".to_string()
}

fn default_background() -> String {
    "black".to_string()
}

/// Completion message sent to the reply destination once all produced files
/// are uploaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyMessage {
    pub id: String,
    /// Remote keys of the uploaded files, in conversion-output order.
    pub files: Vec<String>,
    /// Decoded QR payload from the first produced file, or empty.
    pub qrcode: String,
}

/// Derive the remote key for one produced file: the destination with its
/// final extension stripped, joined with the local file name.
/// `a_small` + `0.png` -> `a_small.0.png`; `dir/photo.jpg` + `1.png` ->
/// `dir/photo.1.png`. A dot inside a directory segment is not an extension.
pub fn thumbnail_key(destination: &str, file_name: &str) -> String {
    let stem = match destination.rfind('.') {
        Some(idx) if !destination[idx..].contains('/') => &destination[..idx],
        _ => destination,
    };
    format!("{}.{}", stem, file_name)
}
