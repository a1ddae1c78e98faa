// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn, LevelFilter};
use simple_logger::SimpleLogger;

use findings_import_lambda::config::{log_level, Config, LOG_LEVEL};
use findings_import_lambda::database::MongoConnector;
use findings_import_lambda::event::S3Notification;
use findings_import_lambda::function_handler;
use findings_import_lambda::storage::S3ObjectStore;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let requested = std::env::var(LOG_LEVEL).ok();
    let (level, invalid) = match log_level(requested.as_deref()) {
        Ok(level) => (level, None),
        Err(name) => (LevelFilter::Info, Some(name)),
    };
    SimpleLogger::new().with_level(level).init()?;
    if let Some(name) = invalid {
        warn!("Invalid log level: {}. Using INFO.", name);
    }

    let config = Config::from_env()?;
    info!("Importing findings from bucket {}", config.s3_bucket);

    let shared_config = aws_config::load_from_env().await;
    let store = S3ObjectStore::new(aws_sdk_s3::Client::new(&shared_config));
    let connector = MongoConnector::new(aws_sdk_ssm::Client::new(&shared_config), &config);

    run(service_fn(|event: LambdaEvent<S3Notification>| {
        function_handler(event, &config, &store, &connector)
    }))
    .await
}
