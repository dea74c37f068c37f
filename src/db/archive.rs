//! Streaming reader for pacman sync databases (`<repo>.db`)
use super::error::ExtractError;
use flate2::read::GzDecoder;
use std::io::{Cursor, Read};
use tar::{Archive, Entries};
use xz2::read::XzDecoder;

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const XZ_MAGIC: &[u8] = &[0xfd, b'7', b'z', b'X', b'Z', 0x00];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    Gzip,
    Xz,
}

impl Compression {
    pub fn detect(magic: &[u8]) -> Option<Self> {
        if magic.starts_with(GZIP_MAGIC) {
            Some(Compression::Gzip)
        } else if magic.starts_with(XZ_MAGIC) {
            Some(Compression::Xz)
        } else {
            None
        }
    }
}

/// Content of one regular file in the archive
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawBlock {
    pub path: String,
    pub content: String,
}

/// A compressed tar archive, read once from start to end
pub struct DbArchive<'r> {
    archive: Archive<Box<dyn Read + 'r>>,
    compression: Compression,
}

impl<'r> DbArchive<'r> {
    pub fn new<R: Read + 'r>(mut reader: R) -> Result<Self, ExtractError> {
        // Streams may hand out the magic a few bytes at a time
        let mut magic = Vec::with_capacity(XZ_MAGIC.len());
        reader
            .by_ref()
            .take(XZ_MAGIC.len() as u64)
            .read_to_end(&mut magic)
            .map_err(ExtractError::Header)?;
        let compression = match Compression::detect(&magic) {
            Some(c) => c,
            None => return Err(ExtractError::UnknownFormat { magic }),
        };
        // Put the magic back in front, the decoder needs it too
        let reader = Cursor::new(magic).chain(reader);

        let decoder: Box<dyn Read + 'r> = match compression {
            Compression::Gzip => Box::new(GzDecoder::new(reader)),
            Compression::Xz => Box::new(XzDecoder::new(reader)),
        };

        Ok(DbArchive {
            archive: Archive::new(decoder),
            compression,
        })
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Iterate over the regular files of the archive.
    ///
    /// The first decoding error is returned as the last item.
    pub fn blocks(&mut self) -> Result<Blocks<'_, 'r>, ExtractError> {
        let entries = self.archive.entries().map_err(ExtractError::Archive)?;
        Ok(Blocks {
            entries,
            failed: false,
        })
    }
}

pub struct Blocks<'a, 'r>
where
    'r: 'a,
{
    entries: Entries<'a, Box<dyn Read + 'r>>,
    failed: bool,
}

impl Iterator for Blocks<'_, '_> {
    type Item = Result<RawBlock, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let res = self.next_block();
        if matches!(res, Some(Err(_))) {
            self.failed = true;
        }
        res
    }
}

impl Blocks<'_, '_> {
    fn next_block(&mut self) -> Option<Result<RawBlock, ExtractError>> {
        loop {
            let mut entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(ExtractError::Archive(e))),
            };
            // Directories, links and the like carry no metadata
            if !entry.header().entry_type().is_file() {
                continue;
            }

            let path = match entry.path() {
                Ok(p) => p.display().to_string(),
                Err(e) => return Some(Err(ExtractError::Archive(e))),
            };
            let mut content = Vec::new();
            if let Err(source) = entry.read_to_end(&mut content) {
                return Some(Err(ExtractError::Entry { path, source }));
            }

            return Some(Ok(RawBlock {
                path,
                content: String::from_utf8_lossy(&content).into_owned(),
            }));
        }
    }
}
