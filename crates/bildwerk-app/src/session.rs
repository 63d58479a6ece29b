// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edit session — owns the one "current image" and the file it came from.
//
// Every operation either replaces the current image wholesale or leaves it
// untouched. Files are written to a temp file in the destination directory
// and renamed into place; a failed save leaves the destination as it was.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::{ImageFormat, PixelBuffer};
use bildwerk_core::EditorConfig;
use bildwerk_raster::{HeaderInfo, HeaderInspector, ImageAdapter, ImageReport, PsaCodec, Transform, hex_dump};
use tracing::{debug, info, instrument};

/// Single-owner editing session.
#[derive(Debug)]
pub struct EditSession {
    config: EditorConfig,
    image: Option<PixelBuffer>,
    /// File the image was opened from or last saved as.
    path: Option<PathBuf>,
}

impl EditSession {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            image: None,
            path: None,
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn image(&self) -> Option<&PixelBuffer> {
        self.image.as_ref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn current(&self) -> Result<&PixelBuffer> {
        self.image.as_ref().ok_or(BildwerkError::NoImage)
    }

    fn source_path(&self) -> Result<&Path> {
        self.path.as_deref().ok_or(BildwerkError::NoPath)
    }

    // -- File operations ------------------------------------------------------

    /// Open `path`, choosing the decoder from its extension. The session is
    /// only updated when decoding succeeds.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path)?;
        let bytes = std::fs::read(path)?;
        let image = match format {
            ImageFormat::Psa => PsaCodec::decode(&bytes)?,
            _ => ImageAdapter::decode(&bytes, format)?,
        };
        info!(
            width = image.width(),
            height = image.height(),
            channels = image.channels(),
            %format,
            "Image opened"
        );
        self.image = Some(image);
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Save next to the source file as `<edited_prefix><file name>`, in the
    /// source's format. Returns the path written.
    #[instrument(skip(self))]
    pub fn save(&self) -> Result<PathBuf> {
        let image = self.current()?;
        let source = self.source_path()?;
        let file_name = source
            .file_name()
            .ok_or(BildwerkError::NoPath)?
            .to_string_lossy();
        let target = source.with_file_name(format!("{}{file_name}", self.config.edited_prefix));

        let bytes = self.encode(image, ImageFormat::from_path(&target)?)?;
        write_atomically(&target, &bytes)?;
        info!(path = %target.display(), bytes = bytes.len(), "Image saved");
        Ok(target)
    }

    /// Save to `path`, choosing the encoder from its extension, and make it
    /// the session's file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let image = self.current()?;
        let bytes = self.encode(image, ImageFormat::from_path(path)?)?;
        write_atomically(path, &bytes)?;
        info!(bytes = bytes.len(), "Image saved");
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    fn encode(&self, image: &PixelBuffer, format: ImageFormat) -> Result<Vec<u8>> {
        match format {
            ImageFormat::Psa => Ok(PsaCodec::encode(image)),
            _ => ImageAdapter::encode(image, format, self.config.jpeg_quality),
        }
    }

    // -- Editing --------------------------------------------------------------

    /// Run `transform` on the current image and replace it with the result.
    /// On error the current image is left as it was.
    #[instrument(skip_all, fields(transform = transform.name()))]
    pub fn apply(&mut self, transform: &mut dyn Transform) -> Result<()> {
        let next = transform.apply(self.current()?)?;
        info!(
            width = next.width(),
            height = next.height(),
            "Transform applied"
        );
        self.image = Some(next);
        Ok(())
    }

    // -- Inspection -----------------------------------------------------------

    /// Decoded header of the session's file.
    pub fn header_info(&self) -> Result<HeaderInfo> {
        self.header_info_of(self.source_path()?)
    }

    /// Decoded header of any file. Only the header region has to be
    /// well-formed; the pixel data may be short or missing.
    pub fn header_info_of(&self, path: &Path) -> Result<HeaderInfo> {
        let bytes = std::fs::read(path)?;
        HeaderInspector::inspect(&bytes, ImageFormat::from_path(path)?)
    }

    /// Hex view of the first `hex_dump_limit` bytes of the session's file.
    pub fn hex_dump(&self) -> Result<String> {
        self.hex_dump_of(self.source_path()?)
    }

    /// Hex view of the first `hex_dump_limit` bytes of `path`. Nothing past
    /// the limit is read.
    pub fn hex_dump_of(&self, path: &Path) -> Result<String> {
        let limit = self.config.hex_dump_limit;
        let mut head = Vec::with_capacity(limit);
        std::fs::File::open(path)?
            .take(limit as u64)
            .read_to_end(&mut head)?;
        debug!(bytes = head.len(), "Read file head for hex view");
        Ok(hex_dump(&head, limit))
    }

    /// Report for the current image and the session's file.
    pub fn report(&self) -> Result<ImageReport> {
        let image = self.current()?;
        let path = self.source_path()?;
        let bytes = std::fs::read(path)?;
        Ok(ImageReport::build(
            image,
            ImageFormat::from_path(path)?,
            Some(bytes.as_slice()),
        ))
    }
}

/// Write `bytes` to `target` via a temp file in the same directory.
fn write_atomically(target: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(target).map_err(|err| BildwerkError::Io(err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bildwerk_raster::{EdgeDetector, HeightResampler, MedianFilter};

    /// Transform that always fails, for checking the session is untouched.
    struct Broken;

    impl Transform for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn apply(&mut self, _buffer: &PixelBuffer) -> Result<PixelBuffer> {
            Err(BildwerkError::InvalidArgument("always fails".into()))
        }
    }

    /// Session around an image that has no file yet.
    fn unsaved(image: PixelBuffer) -> EditSession {
        EditSession {
            config: EditorConfig::default(),
            image: Some(image),
            path: None,
        }
    }

    fn sample_image() -> PixelBuffer {
        PixelBuffer::from_fn(6, 4, 3, |x, y, c| (x * 30 + y * 20 + c * 7) as u8).unwrap()
    }

    fn session_with_psa(dir: &Path) -> (EditSession, PathBuf) {
        let path = dir.join("photo.psa");
        std::fs::write(&path, PsaCodec::encode(&sample_image())).unwrap();
        let mut session = EditSession::new(EditorConfig::default());
        session.open(&path).unwrap();
        (session, path)
    }

    #[test]
    fn open_apply_save_writes_edited_copy() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, source) = session_with_psa(dir.path());

        session.apply(&mut HeightResampler::new(2).unwrap()).unwrap();
        let saved = session.save().unwrap();

        assert_eq!(saved, dir.path().join("edited_photo.psa"));
        let decoded = PsaCodec::decode(&std::fs::read(&saved).unwrap()).unwrap();
        assert_eq!(decoded.height(), 8);
        // The source file is not touched by save.
        let original = PsaCodec::decode(&std::fs::read(&source).unwrap()).unwrap();
        assert_eq!(original, sample_image());
    }

    #[test]
    fn apply_without_image_is_no_image() {
        let mut session = EditSession::new(EditorConfig::default());
        let err = session.apply(&mut MedianFilter::default()).unwrap_err();
        assert!(matches!(err, BildwerkError::NoImage));
    }

    #[test]
    fn failed_transform_keeps_current_image() {
        let mut session = unsaved(sample_image());
        assert!(session.apply(&mut Broken).is_err());
        assert_eq!(session.image(), Some(&sample_image()));
    }

    #[test]
    fn save_without_path_is_no_path() {
        let session = unsaved(sample_image());
        assert!(matches!(session.save().unwrap_err(), BildwerkError::NoPath));
    }

    #[test]
    fn failed_open_keeps_previous_image() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, source) = session_with_psa(dir.path());

        let broken = dir.path().join("broken.psa");
        std::fs::write(&broken, b"PSA \x09\x00\x00\x00").unwrap();
        assert!(matches!(
            session.open(&broken).unwrap_err(),
            BildwerkError::Format(_)
        ));
        assert!(matches!(
            session.open(dir.path().join("notes.txt")).unwrap_err(),
            BildwerkError::UnsupportedFormat(_)
        ));

        assert_eq!(session.image(), Some(&sample_image()));
        assert_eq!(session.path(), Some(source.as_path()));
    }

    #[test]
    fn save_as_png_round_trips_and_moves_path() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _) = session_with_psa(dir.path());
        let target = dir.path().join("out").join("photo.png");

        session.save_as(&target).unwrap();
        assert_eq!(session.path(), Some(target.as_path()));

        let mut reopened = EditSession::new(EditorConfig::default());
        reopened.open(&target).unwrap();
        assert_eq!(reopened.image(), Some(&sample_image()));
    }

    #[test]
    fn failed_encode_leaves_existing_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("keep.jpg");
        std::fs::write(&target, b"previous contents").unwrap();

        let rgba = PixelBuffer::filled(2, 2, 4, 10).unwrap();
        let mut session = unsaved(rgba);
        assert!(matches!(
            session.save_as(&target).unwrap_err(),
            BildwerkError::Encode(_)
        ));

        assert_eq!(std::fs::read(&target).unwrap(), b"previous contents");
        assert_eq!(session.path(), None);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn header_and_hex_views_read_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _) = session_with_psa(dir.path());
        session.config.hex_dump_limit = 4;

        let header = session.header_info().unwrap();
        assert_eq!(header.get("Width"), Some("6 pixels"));
        assert_eq!(session.hex_dump().unwrap(), "50 53 41 20");
    }

    #[test]
    fn header_view_of_undecodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("header_only.psa");
        let mut bytes = b"PSA ".to_vec();
        for value in [640u32, 480, 3] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        std::fs::write(&path, &bytes).unwrap();

        let mut session = EditSession::new(EditorConfig::default());
        assert!(matches!(
            session.open(&path).unwrap_err(),
            BildwerkError::TruncatedData { expected: 921_600, available: 0 }
        ));

        let header = session.header_info_of(&path).unwrap();
        assert_eq!(header.get("Width"), Some("640 pixels"));
        assert_eq!(header.get("Channels"), Some("3"));
        assert!(session.hex_dump_of(&path).unwrap().starts_with("50 53 41 20 80 02"));
    }

    #[test]
    fn report_reflects_current_image() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _) = session_with_psa(dir.path());
        session.apply(&mut EdgeDetector::new(128).unwrap()).unwrap();

        let report = session.report().unwrap();
        assert_eq!(report.file_type, "PSA");
        assert_eq!(report.color_depth_bits, 24);
        assert_eq!(report.header.unwrap().get("Channels"), Some("3"));
    }
}
