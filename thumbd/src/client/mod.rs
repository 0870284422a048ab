use crate::core::client::queue::QueueClient;
use crate::error::{ThumbdError, ThumbdResult};
use crate::types::job::JobDescription;
use crate::types::queue::QueueType;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// One entry of a thumbnail manifest: a job description minus the source
/// image, which the submitter fills in for every entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailDescription {
    pub destination: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub quality: Option<u32>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub queue: Option<String>,
    #[serde(default)]
    pub notify: Option<String>,
}

impl ThumbnailDescription {
    fn into_job(
        self,
        original: &str,
        bucket: Option<String>,
        region: Option<String>,
    ) -> JobDescription {
        JobDescription {
            original: original.to_string(),
            destination: self.destination,
            bucket,
            region,
            width: self.width,
            height: self.height,
            format: self.format.unwrap_or_else(|| "png".to_string()),
            strategy: self.strategy.unwrap_or_else(|| "pdf".to_string()),
            background: self.background.unwrap_or_else(|| "black".to_string()),
            quality: self.quality.unwrap_or(0),
            command: self.command,
            id: Uuid::new_v4().to_string(),
            queue: self.queue,
            notify: self.notify,
        }
    }
}

/// Parse a manifest file: either a single description object or an array.
pub fn parse_descriptions(content: &str) -> ThumbdResult<Vec<ThumbnailDescription>> {
    match serde_json::from_str::<Vec<ThumbnailDescription>>(content) {
        Ok(descriptions) => Ok(descriptions),
        Err(_) => serde_json::from_str::<ThumbnailDescription>(content)
            .map(|description| vec![description])
            .map_err(ThumbdError::from),
    }
}

/// Submits thumbnailing jobs to the jobs queue.
pub struct Client {
    queue: Box<dyn QueueClient>,
}

impl Client {
    pub fn new(queue: Box<dyn QueueClient>) -> Self {
        Self { queue }
    }

    /// Enqueue one job per description for the given remote image.
    ///
    /// # Returns
    /// * `Ok(ids)` - The generated correlation ids, in manifest order
    pub async fn thumbnail(
        &self,
        remote_image: &str,
        descriptions: Vec<ThumbnailDescription>,
        bucket: Option<String>,
        region: Option<String>,
    ) -> ThumbdResult<Vec<String>> {
        let mut ids = Vec::with_capacity(descriptions.len());
        for description in descriptions {
            let job = description.into_job(remote_image, bucket.clone(), region.clone());
            let payload = serde_json::to_string(&job)?;
            self.queue.send_message(QueueType::Jobs, payload).await?;
            info!(id = %job.id, destination = %job.destination, "Submitted thumbnail job");
            ids.push(job.id);
        }
        Ok(ids)
    }
}
