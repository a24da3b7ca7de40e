use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use log::{debug, trace};

use crate::err::{ResError, Result};
use crate::langid::LangId;
use crate::res_header::ResourceHeader;
use crate::string_or_id::StringOrId;

/// One resource block: its header and a view of its payload.
#[derive(Debug, Clone)]
pub struct ResBlock<'a> {
    pub header: ResourceHeader,
    pub data: &'a [u8],
}

/// A compiled resource container (`.res`), as produced by `wrc`/`rc`.
///
/// The container is a plain concatenation of DWORD-aligned blocks, each made of a
/// [`ResourceHeader`] followed by `data_size` payload bytes. There is no index, so both
/// enumeration and lookup are a linear scan from the start of the file.
#[derive(Debug, Clone)]
pub struct ResFile {
    path: Option<PathBuf>,
    data: Vec<u8>,
}

impl ResFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| ResError::FailedToOpenFile {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Opened {} ({} bytes)", path.display(), data.len());

        Ok(ResFile {
            path: Some(path.to_path_buf()),
            data,
        })
    }

    pub fn from_buffer(data: Vec<u8>) -> Self {
        ResFile { path: None, data }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Visit every block from the start of the container.
    ///
    /// The visitor receives the decoded header and the payload offset. Returns `true` if the
    /// visitor stopped the scan with `ControlFlow::Break`, `false` if the end of the container
    /// was reached.
    pub fn enumerate<F>(&self, mut visitor: F) -> Result<bool>
    where
        F: FnMut(&ResourceHeader, usize) -> ControlFlow<()>,
    {
        let mut offset = 0;
        while offset < self.data.len() {
            let header = ResourceHeader::from_buffer(&self.data, offset)?;
            if visitor(&header, header.payload_offset()).is_break() {
                return Ok(true);
            }
            offset += header.footprint();
        }
        Ok(false)
    }

    /// Iterate over the blocks of the container. Iteration stops after the first error.
    pub fn blocks(&self) -> ResBlocks<'_> {
        ResBlocks {
            data: &self.data,
            offset: 0,
            failed: false,
        }
    }

    /// Find the block matching `res_type`, `name` and `language` exactly.
    ///
    /// Names given as strings are matched case-insensitively. There is no fallback to the
    /// neutral sublanguage here.
    pub fn lookup(
        &self,
        res_type: &StringOrId,
        name: &StringOrId,
        language: LangId,
    ) -> Result<ResBlock<'_>> {
        for block in self.blocks() {
            let block = block?;
            let header = &block.header;
            if header.res_type == *res_type
                && header.name.eq_ignore_case(name)
                && header.language == language
            {
                trace!("found {res_type}/{name}/{language} at {}", header.offset);
                return Ok(block);
            }
        }

        Err(ResError::NotFound {
            key: format!("{res_type}/{name}/{language}"),
        })
    }
}

/// Iterator over the blocks of a [`ResFile`].
pub struct ResBlocks<'a> {
    data: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> Iterator for ResBlocks<'a> {
    type Item = Result<ResBlock<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.data.len() {
            return None;
        }

        match ResourceHeader::from_buffer(self.data, self.offset) {
            Ok(header) => {
                self.offset += header.footprint();
                let start = header.payload_offset();
                // `from_buffer` has validated the payload bounds.
                let data = &self.data[start..start + header.data_size as usize];
                Some(Ok(ResBlock { header, data }))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
