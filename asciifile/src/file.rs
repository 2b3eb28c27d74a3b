use crate::{LineNumberCache, Position, PositionIterator};
use failure::{Error, Fail, ResultExt};
use memmap::Mmap;
use std::{
    fs::File,
    path::{Path, PathBuf},
};

pub struct AsciiFile<'m> {
    mapping: &'m [u8],
    line_cache: LineNumberCache,
}

const EMPTY_FILE: [u8; 0] = [0; 0];
const ENCODING_ERROR_MAX_CONTEXT_LENGTH: usize = 80;

#[derive(Debug, Fail)]
pub enum EncodingError {
    #[fail(
        display = "input contains non-ascii character at byte offset {}: {}<?>",
        position, prev
    )]
    NotAscii { position: usize, prev: String },
}

#[derive(Debug, Fail)]
enum AsciiFileError {
    #[fail(display = "cannot open input file {:?}", path)]
    OpenInput { path: PathBuf },
    #[fail(display = "cannot mmap input file {:?}", path)]
    Mmap { path: PathBuf },
}

impl<'m> AsciiFile<'m> {
    // cost: O(fileLen) since we need to check if all chars are ASCII
    pub fn new(mapping: &'m [u8]) -> Result<AsciiFile<'m>, EncodingError> {
        if let Some(position) = mapping.iter().position(|c| !c.is_ascii()) {
            let line_start = mapping[..position]
                .iter()
                .rposition(|&byte| byte == b'\n')
                .map(|newline| newline + 1)
                .unwrap_or(0);
            let context_start =
                line_start.max(position.saturating_sub(ENCODING_ERROR_MAX_CONTEXT_LENGTH));

            // everything before `position` is ASCII
            let prev = String::from_utf8_lossy(&mapping[context_start..position]);
            let prev = format!(
                "{dots}{context}",
                context = prev,
                dots = if context_start > line_start { "..." } else { "" }
            );
            return Err(EncodingError::NotAscii { position, prev });
        }

        let linebreaks = mapping
            .iter()
            .enumerate()
            .filter(|(_, &byte)| byte == b'\n')
            .map(|(offset, _)| offset)
            .collect();

        Ok(AsciiFile {
            mapping,
            line_cache: LineNumberCache::new(linebreaks),
        })
    }

    /// Map the file at `path` into memory. Empty files cannot be mapped
    /// on most platforms and are represented by an empty slice instead.
    pub fn mmap<P: AsRef<Path>>(path_ref: P) -> Result<Box<dyn AsRef<[u8]>>, Error> {
        let path = path_ref.as_ref().to_path_buf();
        let file = File::open(&path).context(AsciiFileError::OpenInput { path: path.clone() })?;

        let file_size = file
            .metadata()
            .map(|m| m.len())
            .context(AsciiFileError::OpenInput { path: path.clone() })?;
        if file_size == 0 {
            return Ok(Box::new(EMPTY_FILE));
        }

        match unsafe { Mmap::map(&file) } {
            Ok(mmap) => Ok(Box::new(mmap)),
            Err(e) => Err(e.context(AsciiFileError::Mmap { path }).into()),
        }
    }

    pub fn mapping(&self) -> &'m [u8] {
        self.mapping
    }

    pub fn as_str(&self) -> &'m str {
        // validated in `new`
        unsafe { std::str::from_utf8_unchecked(self.mapping) }
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    pub(crate) fn line_cache(&self) -> &LineNumberCache {
        &self.line_cache
    }

    pub fn iter(&self) -> PositionIterator<'_> {
        PositionIterator::new(Position::at_file_start(self))
    }
}

impl std::fmt::Debug for AsciiFile<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AsciiFile {{ len: {} }}", self.mapping.len())
    }
}
