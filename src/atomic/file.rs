use std::fs::{self, File};
use std::io::{Error, ErrorKind, Result, Write};
use std::path::{Path, PathBuf};

const MAX_VERSION_FILES: usize = 10;

pub struct TmpFile {
    file: File,
    path: PathBuf,
}

impl TmpFile {
    pub fn create_in(temp_dir: impl AsRef<Path>) -> Result<Self> {
        let filename: String = std::iter::repeat_with(fastrand::alphanumeric)
            .take(10)
            .collect();
        let path = temp_dir.as_ref().join(filename);
        let file = std::fs::File::create(&path)?;
        Ok(Self { file, path })
    }
}

impl std::io::Write for &TmpFile {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        (&self.file).write(buf)
    }

    fn flush(&mut self) -> Result<()> {
        (&self.file).flush()
    }
}

impl Drop for TmpFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[derive(Clone, Debug)]
pub struct ReadOnlyFile {
    pub version: usize,
    pub path: PathBuf,
}

impl ReadOnlyFile {
    /// Open the underlying file, which can be read from but not written to.
    /// May return `Ok(None)`, which means that no version
    /// of the `AtomicFile` has been created yet.
    pub fn open(&self) -> Result<Option<File>> {
        if self.version != 0 {
            Ok(Some(File::open(&self.path)?))
        } else {
            Ok(None)
        }
    }
}

/// A file whose every write lands as a new numbered version next to the
/// previous ones, so readers never observe a partially written state.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AtomicFile {
    pub directory: PathBuf,
    pub prefix: String,
}

fn parse_version(filename: Option<&str>) -> Option<usize> {
    let (_, version) = filename?.rsplit_once('.')?;
    version.parse().ok()
}

impl AtomicFile {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let directory = path.into();
        std::fs::create_dir_all(&directory)?;
        let filename = directory
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidInput,
                    "`path` must specify a directory name",
                )
            })?;
        let prefix = format!("{}.", filename);
        Ok(Self { directory, prefix })
    }

    /// Return the latest version, `0` when nothing was written yet.
    pub fn latest_version(&self) -> Result<usize> {
        let version = fs::read_dir(&self.directory)?
            .flatten()
            .filter_map(|entry| {
                let filename = entry.file_name();
                let filename = filename.to_str()?;
                if !filename.starts_with(&self.prefix) {
                    return None;
                }
                parse_version(Some(filename))
            })
            .max()
            .unwrap_or(0);
        Ok(version)
    }

    pub fn path(&self, version: usize) -> PathBuf {
        self.directory
            .join(format!("{}{version}", self.prefix))
    }

    pub fn load(&self) -> Result<ReadOnlyFile> {
        let version = self.latest_version()?;
        Ok(ReadOnlyFile {
            version,
            path: self.path(version),
        })
    }

    pub fn make_temp(&self) -> Result<TmpFile> {
        TmpFile::create_in(&self.directory)
    }

    /// Replace the contents of the file with the contents of `new` if the
    /// latest version is the same as `current`.
    ///
    /// # Errors
    /// If `io::ErrorKind::AlreadyExists` is returned, it means that the latest
    /// version was not the same as `current` and the operation must be retried
    /// with a fresher version of the file. Any other I/O error is forwarded as
    /// well.
    pub fn compare_and_swap(
        &self,
        current: &ReadOnlyFile,
        new: TmpFile,
    ) -> Result<()> {
        let new_path = self.path(current.version + 1);
        (new.file).sync_data()?;
        let latest_version = self.latest_version()?;
        if latest_version > current.version {
            return Err(Error::new(
                ErrorKind::AlreadyExists,
                "the `current` file is not the latest version",
            ));
        }
        // May return `EEXIST` when another writer won the race.
        std::fs::hard_link(&new.path, new_path)?;

        let number_of_removed = self.prune_old_versions(current.version + 1);
        log::debug!("pruned {} old files", number_of_removed);
        Ok(())
    }

    /// Remove every version and the directory itself.
    pub fn erase(&self) -> Result<()> {
        match fs::remove_dir_all(&self.directory) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    /// Return the number of files deleted
    fn prune_old_versions(&self, version: usize) -> usize {
        let mut deleted = 0;
        if let Ok(iterator) = fs::read_dir(&self.directory) {
            for entry in iterator.flatten() {
                let filename = entry.file_name();
                let Some(filename) = filename
                    .to_str()
                    .filter(|name| name.starts_with(&self.prefix))
                else {
                    continue;
                };
                if let Some(file_version) = parse_version(Some(filename)) {
                    if file_version + MAX_VERSION_FILES <= version
                        && fs::remove_file(entry.path()).is_ok()
                    {
                        deleted += 1;
                    }
                }
            }
        }
        deleted
    }
}
