// Tag reader entry point

use tracing::{debug, warn};

use crate::config::ReadOptions;
use crate::error::{ParseError, ParseResult};
use crate::id3::{read_v2, Id3v1Tag, TagHeader};
use crate::metadata::{TagKind, TagResult};
use crate::storage::{Storage, TagSource};

/// Reads ID3 tags and holds the fields of the most recent read.
///
/// Each [`read`](Id3Reader::read) starts from a clean result, so one reader
/// can be reused across files. A reader is not meant to be shared between
/// threads while reading; use one reader per thread instead.
#[derive(Debug, Default)]
pub struct Id3Reader {
    options: ReadOptions,
    result: TagResult,
}

impl Id3Reader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ReadOptions) -> Self {
        Id3Reader {
            options,
            result: TagResult::default(),
        }
    }

    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    /// Read the tag from `source`.
    ///
    /// An `ID3` header at offset 0 selects the v2 parser; otherwise the v1
    /// trailer at the end of the source is read. A malformed v2 header fails
    /// the read unless `fallback_to_v1_on_malformed` is set. On failure every
    /// field is absent.
    pub fn read<S: TagSource + ?Sized>(&mut self, source: &mut S) -> ParseResult<()> {
        self.result = TagResult::default();
        self.result = self.parse(source)?;
        Ok(())
    }

    /// Open `name` through `storage` and read its tag.
    pub fn read_file<St: Storage>(&mut self, storage: &mut St, name: &str) -> ParseResult<()> {
        self.result = TagResult::default();
        let mut file = storage.open(name).map_err(|source| ParseError::Open {
            name: name.to_string(),
            source,
        })?;
        debug!(name, size = file.size(), "opened");
        self.read(&mut file)
    }

    fn parse<S: TagSource + ?Sized>(&self, source: &mut S) -> ParseResult<TagResult> {
        match TagHeader::read(source)? {
            Some(header) => match read_v2(source, &header, &self.options) {
                Err(ParseError::MalformedHeader { major, minor, flags }) => {
                    warn!(major, minor, flags, "malformed ID3v2 header");
                    if self.options.fallback_to_v1_on_malformed {
                        self.read_v1(source)
                    } else {
                        Err(ParseError::MalformedHeader { major, minor, flags })
                    }
                }
                other => other,
            },
            None => {
                debug!("no ID3v2 header found");
                self.read_v1(source)
            }
        }
    }

    fn read_v1<S: TagSource + ?Sized>(&self, source: &mut S) -> ParseResult<TagResult> {
        Ok(Id3v1Tag::read(source, self.options.latin1, self.options.require_v1_marker)?
            .map(Id3v1Tag::into_result)
            .unwrap_or_default())
    }

    /// Classify the tag in `source` without reading any frames.
    ///
    /// A trailer only counts as ID3v1 when it starts with `TAG`.
    pub fn probe<S: TagSource + ?Sized>(source: &mut S) -> ParseResult<TagKind> {
        if let Some(header) = TagHeader::read(source)? {
            header.validate()?;
            let (major, minor) = header.version;
            return Ok(TagKind::V2 { major, minor });
        }

        match Id3v1Tag::read(source, Default::default(), true) {
            Ok(Some(_)) => Ok(TagKind::V1),
            Ok(None) | Err(ParseError::TruncatedFile { .. }) => Ok(TagKind::None),
            Err(e) => Err(e),
        }
    }

    /// Fields from the last read.
    pub fn result(&self) -> &TagResult {
        &self.result
    }

    pub fn into_result(self) -> TagResult {
        self.result
    }

    pub fn title(&self) -> Option<&str> {
        self.result.title()
    }

    pub fn artist(&self) -> Option<&str> {
        self.result.artist()
    }

    pub fn album(&self) -> Option<&str> {
        self.result.album()
    }

    pub fn genre(&self) -> Option<&str> {
        self.result.genre()
    }

    pub fn track(&self) -> Option<&str> {
        self.result.track()
    }

    pub fn year(&self) -> Option<&str> {
        self.result.year()
    }
}
