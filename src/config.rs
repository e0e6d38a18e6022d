use anyhow::{Context, Result};
use std::env;

/// Bucket-side configuration, loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub region: String,
    pub profile: Option<String>,
    pub bucket: String,
}

impl Config {
    /// Load configuration from environment variables and .env file
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if it exists

        let region = env::var("AWS_REGION")
            .context("AWS_REGION not found in environment. Please set it in .env file")?;
        Self::validate_region(&region)?;

        let profile = env::var("AWS_PROFILE").ok();

        let bucket = env::var("S3_BUCKET")
            .context("S3_BUCKET not found in environment. Please set it in .env file")?;
        Self::validate_bucket_name(&bucket)?;

        Ok(Self {
            region,
            profile,
            bucket,
        })
    }

    /// Validate AWS region format
    fn validate_region(region: &str) -> Result<()> {
        if region.is_empty() {
            anyhow::bail!("AWS_REGION cannot be empty");
        }

        // Basic validation - ensure it looks like a region (contains a dash)
        if !region.contains('-') {
            anyhow::bail!(
                "AWS_REGION '{}' doesn't look like a valid region (e.g., us-west-2, eu-west-1)",
                region
            );
        }

        Ok(())
    }

    /// Validate S3 bucket name according to AWS rules
    fn validate_bucket_name(bucket: &str) -> Result<()> {
        if bucket.is_empty() {
            anyhow::bail!("S3_BUCKET cannot be empty");
        }

        if bucket.len() < 3 || bucket.len() > 63 {
            anyhow::bail!(
                "S3_BUCKET '{}' must be between 3 and 63 characters (got {})",
                bucket,
                bucket.len()
            );
        }

        // Check first and last characters
        if !bucket.chars().next().unwrap().is_ascii_lowercase()
            && !bucket.chars().next().unwrap().is_ascii_digit()
        {
            anyhow::bail!(
                "S3_BUCKET '{}' must start with a lowercase letter or number",
                bucket
            );
        }

        if !bucket.chars().last().unwrap().is_ascii_lowercase()
            && !bucket.chars().last().unwrap().is_ascii_digit()
        {
            anyhow::bail!(
                "S3_BUCKET '{}' must end with a lowercase letter or number",
                bucket
            );
        }

        // Check for invalid characters
        for c in bucket.chars() {
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' && c != '.' {
                anyhow::bail!(
                    "S3_BUCKET '{}' contains invalid character '{}'. Only lowercase letters, numbers, hyphens, and periods are allowed",
                    bucket,
                    c
                );
            }
        }

        // Check for consecutive periods
        if bucket.contains("..") {
            anyhow::bail!("S3_BUCKET '{}' cannot contain consecutive periods", bucket);
        }

        // Check for IP address format (not allowed)
        if bucket
            .split('.')
            .all(|part| part.parse::<u8>().is_ok() && !part.is_empty())
        {
            anyhow::bail!(
                "S3_BUCKET '{}' cannot be formatted as an IP address",
                bucket
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_name_validation() {
        // Valid bucket names
        assert!(Config::validate_bucket_name("my-bucket").is_ok());
        assert!(Config::validate_bucket_name("my.bucket.123").is_ok());
        assert!(Config::validate_bucket_name("abc").is_ok());
        assert!(Config::validate_bucket_name("my-bucket-name-123").is_ok());

        // Invalid bucket names
        assert!(Config::validate_bucket_name("ab").is_err()); // Too short
        assert!(Config::validate_bucket_name(&"a".repeat(64)).is_err()); // Too long
        assert!(Config::validate_bucket_name("MY-BUCKET").is_err()); // Uppercase
        assert!(Config::validate_bucket_name("my_bucket").is_err()); // Underscore
        assert!(Config::validate_bucket_name("-mybucket").is_err()); // Starts with dash
        assert!(Config::validate_bucket_name("mybucket-").is_err()); // Ends with dash
        assert!(Config::validate_bucket_name("my..bucket").is_err()); // Consecutive periods
        assert!(Config::validate_bucket_name("192.168.1.1").is_err()); // IP address format
        assert!(Config::validate_bucket_name("").is_err()); // Empty
    }

    #[test]
    fn test_region_validation() {
        // Valid regions
        assert!(Config::validate_region("us-west-2").is_ok());
        assert!(Config::validate_region("eu-west-1").is_ok());
        assert!(Config::validate_region("ap-southeast-1").is_ok());

        // Invalid regions
        assert!(Config::validate_region("").is_err()); // Empty
        assert!(Config::validate_region("uswest2").is_err()); // No dash
    }
}
