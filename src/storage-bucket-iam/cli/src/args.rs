// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::bail;
use clap::{Parser, Subcommand};
use humantime::parse_duration;
use std::time::Duration;

/// Configuration options for the driver.
#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = super::DESCRIPTION)]
pub struct Args {
    /// The bucket, either `my-bucket` or `b/my-bucket`.
    #[arg(long)]
    pub bucket: String,

    /// Override the Cloud Storage JSON API base path.
    #[arg(long, env = "GOOGLE_STORAGE_CUSTOM_ENDPOINT")]
    pub endpoint: Option<String>,

    /// The OAuth2 access token sent with each request.
    #[arg(long, env = "GOOGLE_OAUTH_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Bill the requests to this project.
    #[arg(long)]
    pub billing_project: Option<String>,

    /// The IAM policy version requested when fetching policies.
    #[arg(long, default_value_t = iam_updater::config::DEFAULT_IAM_POLICY_VERSION)]
    pub policy_version: i32,

    /// The deadline for policy replacements.
    #[arg(long, value_parser = parse_duration, default_value = "20m")]
    pub timeout: Duration,

    /// Log the requests and responses.
    #[arg(long, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// The operations on the bucket IAM policy.
#[derive(Clone, Debug, PartialEq, Subcommand)]
pub enum Command {
    /// Print the current policy.
    Get,
    /// Grant `role` to `member`.
    AddMember {
        #[arg(long)]
        role: String,
        #[arg(long)]
        member: String,
    },
    /// Revoke `role` from `member`.
    RemoveMember {
        #[arg(long)]
        role: String,
        #[arg(long)]
        member: String,
    },
    /// Resolve an import identifier and print the canonical form.
    Import,
}

impl Args {
    /// Validates the arguments after parsing.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.timeout.is_zero() {
            bail!("invalid timeout, should be > 0")
        }
        if self.policy_version < 0 {
            bail!("invalid policy version, should be >= 0")
        }
        if let Command::AddMember { role, member } | Command::RemoveMember { role, member } =
            &self.command
        {
            let custom = role.starts_with("projects/") || role.starts_with("organizations/");
            if !role.starts_with("roles/") && !custom {
                bail!("invalid role {role:?}, expected `roles/*` or a custom role name")
            }
            if member.is_empty() {
                bail!("the member cannot be empty")
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn defaults() -> anyhow::Result<()> {
        let args = Args::try_parse_from(["program", "--bucket=my-bucket", "get"])?;
        assert_eq!(args.bucket, "my-bucket");
        assert_eq!(args.command, Command::Get);
        assert_eq!(args.timeout, Duration::from_secs(20 * 60));
        assert_eq!(args.policy_version, 3);
        assert!(!args.verbose);
        let got = args.validate();
        assert!(got.is_ok(), "{got:?} {args:?}");
        Ok(())
    }

    #[test]
    fn add_member() -> anyhow::Result<()> {
        let args = Args::try_parse_from([
            "program",
            "--bucket=b/my-bucket",
            "--timeout=30s",
            "add-member",
            "--role=roles/storage.objectViewer",
            "--member=user:alice@example.com",
        ])?;
        assert_eq!(
            args.command,
            Command::AddMember {
                role: "roles/storage.objectViewer".to_string(),
                member: "user:alice@example.com".to_string(),
            }
        );
        assert_eq!(args.timeout, Duration::from_secs(30));
        let got = args.validate();
        assert!(got.is_ok(), "{got:?} {args:?}");
        Ok(())
    }

    #[test_case(&["program", "--bucket=my-bucket", "--timeout=0s", "get"]; "zero timeout")]
    #[test_case(&["program", "--bucket=my-bucket", "--policy-version=-1", "get"]; "negative version")]
    #[test_case(&["program", "--bucket=my-bucket", "add-member", "--role=storage.admin", "--member=user:a@example.com"]; "bad role")]
    #[test_case(&["program", "--bucket=my-bucket", "remove-member", "--role=roles/storage.admin", "--member="]; "empty member")]
    fn validate(input: &[&str]) -> anyhow::Result<()> {
        let args = Args::try_parse_from(input)?;
        let got = args.validate();
        assert!(got.is_err(), "{got:?} {args:?}");
        Ok(())
    }

    #[test_case(&["program", "get"]; "missing bucket")]
    #[test_case(&["program", "--bucket=my-bucket"]; "missing command")]
    #[test_case(&["program", "--bucket=my-bucket", "--timeout=soon", "get"]; "bad timeout")]
    fn parse_error(input: &[&str]) {
        let got = Args::try_parse_from(input);
        assert!(got.is_err(), "{got:?}");
    }
}
