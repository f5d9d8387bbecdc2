//! Reassembly of part files into the final artifact.

use crate::error::{Error, Result};

use std::io;
use std::path::{Path, PathBuf};
use tokio::{
    fs,
    fs::{File, OpenOptions},
    io::AsyncWriteExt,
};
use tracing::debug;

/// Appends the part files to `destination` in the given order, removing
/// each part once consumed.
///
/// A crash mid-assembly therefore leaves the destination partially written
/// but every unconsumed part intact for a retry. A missing part fails with
/// [`Error::AssemblyIncomplete`]. Returns the size of the assembled file;
/// comparing it against the expected total is the caller's job.
pub async fn assemble(destination: &Path, parts: &[PathBuf]) -> Result<u64> {
    debug!("assembling {} parts into {:?}", parts.len(), destination);
    let mut out = OpenOptions::new()
        .create(true)
        .append(true)
        .open(destination)
        .await?;

    for part in parts {
        let mut src = match File::open(part).await {
            Ok(src) => src,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::AssemblyIncomplete(part.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        tokio::io::copy(&mut src, &mut out).await?;
        fs::remove_file(part).await?;
    }
    out.flush().await?;

    Ok(fs::metadata(destination).await?.len())
}
