// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::fmt::Formatter;
use std::time::Duration;

use aws_sdk_ssm::error::DisplayErrorContext;
use findings_import::Record;
use log::info;
use mongodb::bson::{self, doc, Document};
use mongodb::options::{ClientOptions, FindOneAndUpdateOptions};
use mongodb::{Client, Collection};

use crate::config::Config;
use crate::errors::{ImportError, Result};

pub const FINDINGS_COLLECTION: &str = "findings";

/// Keeps the invocation inside its time budget when the server is down.
pub const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_millis(2500);

/// Where transformed findings are written.
#[allow(async_fn_in_trait)]
pub trait FindingStore {
    /// Updates the finding matching `filter` with the fields of `finding`,
    /// inserting it when nothing matches.
    async fn upsert(&self, filter: &Record, finding: &Record) -> Result<()>;
}

/// Opens a [`FindingStore`] for one invocation.
#[allow(async_fn_in_trait)]
pub trait Connector {
    type Store: FindingStore;

    async fn connect(&self) -> Result<Self::Store>;
}

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseCredentials {
    pub db_name: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for DatabaseCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseCredentials")
            .field("db_name", &self.db_name)
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

pub fn connection_uri(hostname: &str, port: u16, credentials: &DatabaseCredentials) -> String {
    format!(
        "mongodb://{}:{}@{}:{}/{}",
        credentials.username,
        urlencoding::encode(&credentials.password),
        hostname,
        port,
        credentials.db_name
    )
}

async fn get_parameter(client: &aws_sdk_ssm::Client, name: &str) -> Result<String> {
    let output = client
        .get_parameter()
        .name(name)
        .with_decryption(true)
        .send()
        .await
        .map_err(|err| ImportError::Credentials {
            name: name.to_string(),
            message: DisplayErrorContext(&err).to_string(),
        })?;

    output
        .parameter()
        .and_then(|parameter| parameter.value())
        .map(String::from)
        .ok_or_else(|| ImportError::Credentials {
            name: name.to_string(),
            message: "parameter has no value".to_string(),
        })
}

pub struct MongoConnector {
    ssm: aws_sdk_ssm::Client,
    hostname: String,
    port: u16,
    ssm_db_name: String,
    ssm_db_user: String,
    ssm_db_password: String,
}

impl MongoConnector {
    pub fn new(ssm: aws_sdk_ssm::Client, config: &Config) -> Self {
        MongoConnector {
            ssm,
            hostname: config.db_hostname.clone(),
            port: config.db_port,
            ssm_db_name: config.ssm_db_name.clone(),
            ssm_db_user: config.ssm_db_user.clone(),
            ssm_db_password: config.ssm_db_password.clone(),
        }
    }

    pub async fn fetch_credentials(&self) -> Result<DatabaseCredentials> {
        info!("Grabbing database credentials from SSM.");
        Ok(DatabaseCredentials {
            db_name: get_parameter(&self.ssm, &self.ssm_db_name).await?,
            username: get_parameter(&self.ssm, &self.ssm_db_user).await?,
            password: get_parameter(&self.ssm, &self.ssm_db_password).await?,
        })
    }

    fn connection_error(&self, err: mongodb::error::Error) -> ImportError {
        ImportError::Connection {
            host: self.hostname.clone(),
            port: self.port,
            message: err.to_string(),
        }
    }
}

impl Connector for MongoConnector {
    type Store = MongoFindingStore;

    async fn connect(&self) -> Result<MongoFindingStore> {
        let credentials = self.fetch_credentials().await?;

        info!("Connecting to the mongo db at {} {}", self.hostname, self.port);
        let mut options = ClientOptions::parse(connection_uri(&self.hostname, self.port, &credentials))
            .await
            .map_err(|err| self.connection_error(err))?;
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);

        let client = Client::with_options(options).map_err(|err| self.connection_error(err))?;
        let collection = client
            .database(&credentials.db_name)
            .collection::<Document>(FINDINGS_COLLECTION);
        info!(
            "DB connection set up to {}:{}/{}",
            self.hostname, self.port, credentials.db_name
        );

        Ok(MongoFindingStore { collection })
    }
}

pub struct MongoFindingStore {
    collection: Collection<Document>,
}

impl FindingStore for MongoFindingStore {
    async fn upsert(&self, filter: &Record, finding: &Record) -> Result<()> {
        let filter = bson::to_document(filter).map_err(|err| ImportError::Database(err.to_string()))?;
        let fields = bson::to_document(finding).map_err(|err| ImportError::Database(err.to_string()))?;
        let options = FindOneAndUpdateOptions::builder().upsert(true).build();

        self.collection
            .find_one_and_update(filter, doc! { "$set": fields }, options)
            .await
            .map_err(|err| ImportError::Database(err.to_string()))?;
        Ok(())
    }
}
