// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use lambda_runtime::{Error, LambdaEvent};
use log::{debug, info, warn};

use crate::config::Config;
use crate::database::Connector;
use crate::event::{check_event, S3Notification, Trigger};
use crate::import::{import_data, ImportSummary};
use crate::storage::ObjectStore;

/// Handles one S3 notification: imports the object it announces, or
/// returns a skipped summary when the notification is not for us.
pub async fn function_handler<S, C>(
    event: LambdaEvent<S3Notification>,
    config: &Config,
    store: &S,
    connector: &C,
) -> Result<ImportSummary, Error>
where
    S: ObjectStore,
    C: Connector,
{
    let notification = event.payload;
    debug!("Event: {}", serde_json::to_string(&notification)?);
    info!("Handling request {}", event.context.request_id);

    match check_event(&notification, config)? {
        Trigger::Ignore { reason } => {
            warn!("{}", reason);
            let key = notification
                .records
                .first()
                .map(|record| record.s3.object.key.as_str())
                .unwrap_or_default();
            Ok(ImportSummary::skipped(key, reason))
        }
        Trigger::Import { key } => Ok(import_data(config, store, connector, &key).await),
    }
}
