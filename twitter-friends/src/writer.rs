use std::{
    fs::{self, File},
    io::Write as _,
    path::PathBuf,
};

use anyhow::{Context, Result};
use twitter_api::fetcher::FriendList;

/// Appends fetched friend lists to per-user files, one record per line:
/// bare ids, or one JSON object per line when the list was expanded.
pub struct Writer {
    output_dir: PathBuf,
    file_prefix: String,
}

impl Writer {
    pub fn new(output_dir: PathBuf, file_prefix: String) -> Self {
        Self {
            output_dir,
            file_prefix,
        }
    }

    fn file_path(&self, user_id: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}-{}.out", self.file_prefix, user_id))
    }

    pub fn write(&self, user_id: &str, friends: &FriendList) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("create output directory {}", self.output_dir.display())
        })?;

        let path = self.file_path(user_id);
        let mut file = File::options()
            .append(true)
            .create(true)
            .open(&path)
            .with_context(|| format!("open output file {}", path.display()))?;

        let mut buf = String::new();
        match friends {
            FriendList::Ids(ids) => {
                for id in ids {
                    buf.push_str(id);
                    buf.push('\n');
                }
            }
            FriendList::Profiles(users) => {
                for user in users {
                    buf.push_str(&serde_json::to_string(user).context("encode user record")?);
                    buf.push('\n');
                }
            }
        }

        file.write_all(buf.as_bytes())
            .with_context(|| format!("write output file {}", path.display()))?;

        Ok(path)
    }
}
