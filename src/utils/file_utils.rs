use memmap2::Mmap;
use std::fs::File;
use std::io;
use std::ops::Deref;
use std::path::Path;

/// Read a binary file using memory mapping for improved performance
/// This is more efficient for large files as it doesn't load the entire file into RAM
pub fn read_binary_file_mmap(path: impl AsRef<Path>) -> io::Result<Mmap> {
    let file = File::open(path)?;
    // Safety: The file is not modified while the mmap is active
    unsafe { Mmap::map(&file) }
}

/// Bytes backing an open SPE file.
///
/// `Mmap` is used for files on disk; `Owned` backs `from_bytes()` and tests.
#[derive(Debug)]
pub enum DataSource {
    Owned(Vec<u8>),
    Mmap(Mmap),
}

impl DataSource {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        read_binary_file_mmap(path).map(DataSource::Mmap)
    }
}

impl Deref for DataSource {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        match self {
            DataSource::Owned(v) => v,
            DataSource::Mmap(m) => m,
        }
    }
}

impl AsRef<[u8]> for DataSource {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self
    }
}

impl From<Vec<u8>> for DataSource {
    fn from(bytes: Vec<u8>) -> Self {
        DataSource::Owned(bytes)
    }
}
