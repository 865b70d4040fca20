//! `s1cli provision account`

use std::io::Read;
use std::sync::Arc;

use tracing::{error, info, instrument};

use s1_client::{Provisioner, S1Client};

use crate::config::AppConfig;
use crate::error::{CliError, CliResult};
use crate::records::RecordReader;

/// Provision every record of the configured CSV source.
///
/// Records are processed in file order and the run stops at the first
/// failure; records already provisioned stay in place.
pub async fn run(config: &AppConfig) -> CliResult<()> {
    let options = &config.provision_account;
    let Some(source) = options.csv_source.as_deref() else {
        info!("only CSV provisioning is supported at this time; nothing to do");
        return Ok(());
    };

    let client = S1Client::new(config.client_config()?)?;
    let provisioner =
        Provisioner::new(Arc::new(client)).with_password_reset(options.reset_first_user_password);

    let records = RecordReader::open(source, options.csv_separator).map_err(|err| {
        error!(csv_file = %source.display(), "{}", err);
        err
    })?;
    let count = provision_records(&provisioner, records, options.reactivate_expired_account).await?;

    info!(count, "all accounts have been provisioned");
    Ok(())
}

/// Provision records in order, stopping at the first failure.
///
/// Returns the number of records provisioned.
#[instrument(skip_all, fields(csv_file = %records.path().display()))]
pub async fn provision_records<R: Read>(
    provisioner: &Provisioner,
    records: RecordReader<R>,
    reactivate_expired_account: bool,
) -> CliResult<usize> {
    let mut count = 0;
    for record in records {
        let record = record.map_err(|err| {
            error!("{}", err);
            err
        })?;
        let (account, user) = record.into_requests(reactivate_expired_account);

        let outcome = provisioner
            .provision(&account, &user)
            .await
            .map_err(CliError::from)?;
        info!(
            account_id = %outcome.account.id,
            account_name = %outcome.account.name,
            user_id = %outcome.user.id,
            email_address = %outcome.user.email_address,
            password_reset_sent = outcome.password_reset_sent,
            "account has been provisioned"
        );
        count += 1;
    }
    Ok(count)
}
