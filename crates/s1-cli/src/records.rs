//! CSV record source for batch provisioning.
//!
//! Each row describes one account and its first administrator:
//!
//! ```text
//! account_name,account_type,expires,external_id,bundle,total_agents,modules,first_name,last_name,email_address,role
//! Acme,Trial,8760h,crm-42,complete,50,"star,rso",Jane,Doe,jane@acme.test,Admin
//! ```

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use s1_model::{AccountProvisioningRequest, UserProvisioningRequest};

use crate::error::{CliError, CliResult};

/// One row of the record source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccountRecord {
    pub account_name: String,
    #[serde(default)]
    pub account_type: String,
    pub expires: String,
    #[serde(default)]
    pub external_id: String,
    #[serde(default)]
    pub bundle: String,
    #[serde(default)]
    pub total_agents: u32,
    #[serde(default)]
    pub modules: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email_address: String,
    #[serde(default)]
    pub role: String,
}

impl AccountRecord {
    /// Module names from the comma-separated `modules` field.
    pub fn module_names(&self) -> Vec<String> {
        self.modules
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect()
    }

    /// Split the record into its account and user requests.
    pub fn into_requests(
        self,
        reactivate_account: bool,
    ) -> (AccountProvisioningRequest, UserProvisioningRequest) {
        let modules = self.module_names();
        let account = AccountProvisioningRequest::new(self.account_name, self.expires)
            .with_account_type(self.account_type)
            .with_external_id(self.external_id)
            .with_bundle(self.bundle, self.total_agents)
            .with_modules(modules)
            .with_reactivation(reactivate_account);
        let user = UserProvisioningRequest::new(
            self.first_name,
            self.last_name,
            self.email_address,
            self.role,
        );
        (account, user)
    }
}

/// Records read in file order, one at a time.
pub struct RecordReader<R> {
    path: PathBuf,
    reader: csv::Reader<R>,
}

impl RecordReader<File> {
    /// Open a CSV file with a header row.
    pub fn open(path: &Path, separator: u8) -> CliResult<Self> {
        let file = File::open(path).map_err(|e| CliError::record_source(path, e))?;
        Ok(Self::from_reader(path, file, separator))
    }
}

impl<R: Read> RecordReader<R> {
    pub fn from_reader(path: impl Into<PathBuf>, reader: R, separator: u8) -> Self {
        let reader = csv::ReaderBuilder::new()
            .delimiter(separator)
            .trim(csv::Trim::All)
            .from_reader(reader);
        Self {
            path: path.into(),
            reader,
        }
    }

    /// Where records are read from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = CliResult<AccountRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = &self.path;
        self.reader
            .deserialize::<AccountRecord>()
            .next()
            .map(|record| record.map_err(|e| CliError::record_source(path.clone(), e)))
    }
}
