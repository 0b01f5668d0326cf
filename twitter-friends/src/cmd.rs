use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use twitter_api::{
    client::Client,
    error::ApiError,
    fetcher::Fetcher,
    rate_limit,
    user::{LOOKUP_BATCH_SIZE, UserLookupRequest},
};

use crate::{config::Config, writer::Writer};

#[derive(Debug, Args)]
/// Fetch the accounts each user follows and write them to per-user files
pub struct Fetch {
    /// Ids of the users whose friend lists to fetch
    #[clap(required = true)]
    pub user_ids: Vec<String>,

    /// Expand ids into full profile records before writing
    #[clap(long)]
    pub expand: bool,

    /// Path to the config file
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Write output files into this directory instead of the configured one
    #[clap(long)]
    pub output_dir: Option<PathBuf>,
}

impl Fetch {
    pub async fn run(self) -> Result<()> {
        let mut config = Config::open(self.config.as_deref())?;
        if let Some(dir) = self.output_dir {
            config.output.dir = dir;
        }

        let client = Client::from_env().context("load api credentials")?;
        let fetcher = if self.expand {
            Fetcher::expanded(&client)
        } else {
            Fetcher::new(&client)
        };
        let writer = Writer::new(config.output.dir, config.output.prefix);

        for user_id in &self.user_ids {
            let friends = fetcher
                .fetch(user_id)
                .await
                .with_context(|| format!("fetch friends of {user_id}"))?;
            let path = writer.write(user_id, &friends)?;
            eprintln!(
                "{user_id}: wrote {} friends to {}",
                friends.len(),
                path.display()
            );
        }

        Ok(())
    }
}

#[derive(Debug, Args)]
/// Expand user ids into profile records, printed as JSON lines
pub struct Lookup {
    /// Ids of the users to look up
    #[clap(required = true)]
    pub ids: Vec<String>,
}

impl Lookup {
    pub async fn run(self) -> Result<()> {
        let client = Client::from_env().context("load api credentials")?;

        for batch in self.ids.chunks(LOOKUP_BATCH_SIZE) {
            let req = UserLookupRequest::ids(batch.iter().map(String::as_str));
            let res = loop {
                match client.send(&req).await {
                    Ok(res) => break res,
                    Err(ApiError::RateLimited { reset }) => {
                        eprintln!(
                            "rate limited, waiting {:?} for the window to reset",
                            rate_limit::duration_until(reset)
                        );
                        rate_limit::wait_until(reset).await;
                    }
                    Err(err) => return Err(err).context("look up users"),
                }
            };

            for user in res.data {
                println!("{}", serde_json::to_string(&user).context("encode user")?);
            }
        }

        Ok(())
    }
}
