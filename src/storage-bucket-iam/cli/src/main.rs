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

//! Manage the IAM policy of a Cloud Storage bucket from the command line.

mod args;
mod locks;
mod policy;

use args::{Args, Command};
use clap::Parser;
use google_cloud_storage_bucket_iam::{BUCKET_FIELD, STORAGE_BUCKET_IAM};
use iam_updater::Config;
use iam_updater::resource_data::{MemoryResourceData, ResourceData, TimeoutKind};
use iam_updater::updater::{ResourceIamUpdater, read_modify_write};
use locks::KeyedLocks;
use std::sync::Arc;

const DESCRIPTION: &str = concat!(
    "This program reads and changes the IAM policy of a Cloud Storage bucket.",
    " The bucket may be given by name or by its canonical `b/<bucket>` identifier."
);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    args.validate()?;
    enable_tracing(&args);
    tracing::info!(bucket = %args.bucket, command = ?args.command, "Configuration");

    let config = Arc::new(make_config(&args));
    if args.command == Command::Import {
        let data = MemoryResourceData::new(STORAGE_BUCKET_IAM.schema).with_id(&args.bucket);
        STORAGE_BUCKET_IAM.import(&data, &config)?;
        println!("{}", data.id());
        return Ok(());
    }

    let data = Arc::new(
        MemoryResourceData::new(STORAGE_BUCKET_IAM.schema)
            .with_field(BUCKET_FIELD, &args.bucket)
            .with_timeout(TimeoutKind::Create, args.timeout),
    );
    let updater = STORAGE_BUCKET_IAM.updater(data, config)?;
    tracing::info!(resource = %updater.resource_id(), "resolved bucket");

    let locks = KeyedLocks::new();
    let policy = match &args.command {
        Command::Get | Command::Import => updater.fetch_policy().await?,
        Command::AddMember { role, member } => {
            let _guard = locks.lock(&updater.mutex_key()).await;
            change(updater.as_ref(), |p| policy::add_member(p, role, member)).await?
        }
        Command::RemoveMember { role, member } => {
            let _guard = locks.lock(&updater.mutex_key()).await;
            change(updater.as_ref(), |p| policy::remove_member(p, role, member)).await?
        }
    };
    println!("{}", serde_json::to_string_pretty(&policy)?);
    tracing::info!("DONE");

    Ok(())
}

fn make_config(args: &Args) -> Config {
    let config = Config::new().set_iam_policy_version(args.policy_version);
    let config = args
        .endpoint
        .iter()
        .fold(config, |c, v| c.set_storage_base_path(v));
    let config = args
        .access_token
        .iter()
        .fold(config, |c, v| c.set_access_token(v));
    match &args.billing_project {
        Some(project) => config
            .set_billing_project(project)
            .set_user_project_override(true),
        None => config,
    }
}

async fn change<F>(
    updater: &dyn ResourceIamUpdater,
    modify: F,
) -> iam_updater::Result<iam_updater::model::Policy>
where
    F: FnOnce(iam_updater::model::Policy) -> Option<iam_updater::model::Policy> + Send,
{
    let description = updater.describe_resource();
    read_modify_write(updater, |p| {
        let updated = modify(p);
        if updated.is_none() {
            tracing::info!("{description} already has the requested change");
        }
        Ok(updated)
    })
    .await
}

fn enable_tracing(args: &Args) {
    use tracing_subscriber::fmt::format::FmtSpan;

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let subscriber = tracing_subscriber::fmt()
        .with_level(true)
        .with_thread_ids(true)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("setting global subscriber succeeds");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn config_from_args() -> anyhow::Result<()> {
        let args = Args::try_parse_from([
            "program",
            "--bucket=my-bucket",
            "--endpoint=https://storage.example.com/storage/v1",
            "--access-token=test-token",
            "--billing-project=billing",
            "--policy-version=1",
            "get",
        ])?;
        let config = make_config(&args);
        assert_eq!(
            config.storage_base_path(),
            "https://storage.example.com/storage/v1/"
        );
        assert_eq!(config.access_token(), Some("test-token"));
        assert_eq!(config.billing_project(), Some("billing"));
        assert!(config.user_project_override());
        assert_eq!(config.iam_policy_version(), 1);
        Ok(())
    }

    #[test]
    fn config_without_billing() -> anyhow::Result<()> {
        let args = Args::try_parse_from([
            "program",
            "--bucket=my-bucket",
            "--endpoint=https://storage.example.com/storage/v1/",
            "get",
        ])?;
        let config = make_config(&args);
        assert_eq!(config.billing_project(), None);
        assert!(!config.user_project_override());
        Ok(())
    }
}
