//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_SUCCESS};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "logvault.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Logvault configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(()) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set export.destination_bucket and sources.include in {}", self.output);
                println!("  2. Provide AWS credentials (AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY)");
                println!("     or reference them from the [aws] section with ${{VAR}} syntax");
                println!("  3. Validate configuration: logvault validate-config");
                println!("  4. Preview the run: logvault export --dry-run");
                println!();
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate a commented starter configuration
    fn generate_config() -> String {
        r#"# Logvault Configuration File
# Exports CloudWatch log groups to an S3 bucket, one export task per log group.

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Print the export plan without creating any tasks
dry_run = false

[aws]
region = "us-east-1"

# Credentials fall back to AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY / AWS_SESSION_TOKEN
# access_key_id = "${AWS_ACCESS_KEY_ID}"
# secret_access_key = "${AWS_SECRET_ACCESS_KEY}"

# Endpoint overrides for local stacks
# logs_endpoint = "http://localhost:4566"
# s3_endpoint = "http://localhost:4566"

request_timeout_seconds = 30

[export]
# Bucket that receives the exported objects
destination_bucket = "cw-logroup-to-s3"

# Days of logs to export, ending now (0 or unset = 90)
retention_days = 1

# Give up polling a task once the backoff exceeds this many seconds (0 or unset = 30000)
timeout_seconds = 30000

# First wait between status checks; doubles after every non-completed check
initial_backoff_seconds = 2

# Stop polling as soon as a task reports FAILED or CANCELLED
fail_fast_on_terminal_status = false

[sources]
# Log groups to export
include = [
    "/aws/ecs/app-a",
    "/aws/ecs/app-b",
]

# Also export every log group whose name starts with this prefix
# prefix = "/aws/ecs/"

[logging]
local_enabled = false
local_path = "/var/log/logvault"
local_rotation = "daily"
"#
        .to_string()
    }
}
