mod file;

use std::io::{Read, Result, Write};

pub use file::{AtomicFile, ReadOnlyFile, TmpFile};

/// Read the latest version, compute the next content from it and swap it
/// in, retrying when another writer got there first.
pub fn modify(
    atomic_file: &AtomicFile,
    mut operator: impl FnMut(&[u8]) -> Vec<u8>,
) -> Result<()> {
    let mut buf = vec![];
    loop {
        let latest = atomic_file.load()?;
        buf.clear();
        if let Some(mut file) = latest.open()? {
            file.read_to_end(&mut buf)?;
        }
        let data = operator(&buf);
        let tmp = atomic_file.make_temp()?;
        (&tmp).write_all(&data)?;
        (&tmp).flush()?;
        match atomic_file.compare_and_swap(&latest, tmp) {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                continue
            }
            Err(err) => return Err(err),
        }
    }
}

/// Replace the whole content of `atomic_file` with `data`.
pub fn replace(atomic_file: &AtomicFile, data: &[u8]) -> Result<()> {
    modify(atomic_file, |_| data.to_vec())
}

/// Latest content, `None` when nothing was written yet.
pub fn read_latest(atomic_file: &AtomicFile) -> Result<Option<Vec<u8>>> {
    let latest = atomic_file.load()?;
    match latest.open()? {
        Some(mut file) => {
            let mut buf = vec![];
            file.read_to_end(&mut buf)?;
            Ok(Some(buf))
        }
        None => Ok(None),
    }
}
