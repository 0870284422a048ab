use clap::Args;

/// Parameters used to config AWS S3.
#[derive(Debug, Clone, Args)]
pub struct AWSS3CliArgs {
    /// The default bucket holding source images and produced thumbnails.
    /// Jobs may override it per message.
    #[arg(env = "THUMBD_S3_BUCKET", long, default_value = Some("thumbd"))]
    pub s3_bucket: Option<String>,

    /// Canned ACL applied to every uploaded thumbnail.
    #[arg(env = "THUMBD_S3_ACL", long)]
    pub s3_acl: Option<String>,

    /// Storage class applied to every uploaded thumbnail.
    #[arg(env = "THUMBD_S3_STORAGE_CLASS", long)]
    pub s3_storage_class: Option<String>,
}
