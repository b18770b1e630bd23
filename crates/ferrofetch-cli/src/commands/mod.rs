mod fetch;
mod providers;

use std::time::Instant;

use ferrofetch_core::{Credentials, Registry, Transport};

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::output::{Envelope, EnvelopeMeta};

pub fn run(cli: &Cli) -> Result<Envelope, CliError> {
    let registry = Registry::with_transport(Transport::default().with_timeout_ms(cli.timeout_ms));
    let credentials = Credentials::from_env();
    let started = Instant::now();

    match &cli.command {
        Command::Fetch(args) => {
            let records = fetch::run(args, &registry, &credentials)?;
            let meta = EnvelopeMeta::new(elapsed_ms(started))?.for_fetch(
                args.provider,
                args.kind,
                records.len(),
            );
            Ok(Envelope {
                meta,
                data: records.into(),
            })
        }
        Command::Providers => Ok(Envelope {
            meta: EnvelopeMeta::new(elapsed_ms(started))?,
            data: providers::run(&registry, &credentials)?,
        }),
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
