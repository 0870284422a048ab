use crate::core::client::storage::{StorageClient, StorageError};
use crate::types::params::StorageParams;
use async_trait::async_trait;
use aws_config::{Region, SdkConfig};
use aws_sdk_s3::types::{ObjectCannedAcl, StorageClass};
use aws_sdk_s3::Client;
use bytes::Bytes;

#[derive(Clone, Debug)]
pub struct AWSS3 {
    client: Client,
    sdk_config: SdkConfig,
    params: StorageParams,
    acl: Option<ObjectCannedAcl>,
    storage_class: Option<StorageClass>,
}

impl AWSS3 {
    /// Creates a new instance of AWSS3 with the provided AWS configuration
    /// and storage parameters.
    pub fn new(aws_config: &SdkConfig, params: StorageParams) -> Self {
        let s3_config_builder = aws_sdk_s3::config::Builder::from(aws_config).force_path_style(true);
        let client = Client::from_conf(s3_config_builder.build());

        let acl = params.acl.as_deref().map(ObjectCannedAcl::from);
        let storage_class = params.storage_class.as_deref().map(StorageClass::from);

        Self { client: client.clone(), sdk_config: aws_config.clone(), params, acl, storage_class }
    }

    /// Jobs may point at a bucket in another region; the region-bound SDK
    /// client has to be rebuilt for those requests.
    fn client_for_region(&self, region: Option<&str>) -> Client {
        match region {
            Some(region) => {
                let config = aws_sdk_s3::config::Builder::from(&self.sdk_config)
                    .region(Region::new(region.to_string()))
                    .force_path_style(true)
                    .build();
                Client::from_conf(config)
            }
            None => self.client.clone(),
        }
    }

    fn bucket<'a>(&'a self, bucket: Option<&'a str>) -> &'a str {
        bucket.unwrap_or(&self.params.bucket_name)
    }
}

#[async_trait]
impl StorageClient for AWSS3 {
    /// Get the data from the bucket with the specified key.
    async fn get_data<'a>(
        &self,
        key: &str,
        bucket: Option<&'a str>,
        region: Option<&'a str>,
    ) -> Result<Bytes, StorageError> {
        let output = self
            .client_for_region(region)
            .get_object()
            .bucket(self.bucket(bucket))
            .key(key)
            .send()
            .await?;

        let data = output.body.collect().await.map_err(|e| StorageError::ObjectStreamError(e.to_string()))?;

        Ok(data.into_bytes())
    }

    /// Put the data into the bucket with the specified key.
    async fn put_data<'a>(
        &self,
        data: Bytes,
        key: &str,
        bucket: Option<&'a str>,
        region: Option<&'a str>,
    ) -> Result<(), StorageError> {
        let mut request = self
            .client_for_region(region)
            .put_object()
            .bucket(self.bucket(bucket))
            .key(key)
            .body(data.into());

        if let Some(acl) = &self.acl {
            request = request.acl(acl.clone());
        }
        if let Some(storage_class) = &self.storage_class {
            request = request.storage_class(storage_class.clone());
        }

        request.send().await?;

        Ok(())
    }
}
