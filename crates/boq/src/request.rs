//! Analysis submissions.

use std::fmt;
use std::path::Path;

use chrono::Utc;
use rand::Rng;

use crate::error::BoqError;

/// Length of the random suffix on generated identifiers.
const ID_SUFFIX_LEN: usize = 9;

/// Drawing and document formats the service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// PDF document.
    Pdf,
    /// PNG image.
    Png,
    /// JPEG image, `.jpg`.
    Jpg,
    /// JPEG image, `.jpeg`.
    Jpeg,
    /// AutoCAD drawing.
    Dwg,
    /// Drawing exchange format.
    Dxf,
}

impl FileFormat {
    /// All accepted formats.
    pub const ALL: [Self; 6] = [
        Self::Pdf,
        Self::Png,
        Self::Jpg,
        Self::Jpeg,
        Self::Dwg,
        Self::Dxf,
    ];

    /// Match a file name's extension, ignoring case.
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        let extension = Path::new(name).extension()?.to_str()?;
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(extension))
    }

    /// Lowercase extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Dwg => "dwg",
            Self::Dxf => "dxf",
        }
    }

    /// MIME type sent with the multipart part.
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Jpg | Self::Jpeg => "image/jpeg",
            Self::Dwg => "image/vnd.dwg",
            Self::Dxf => "image/vnd.dxf",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_ascii_uppercase())
    }
}

/// One uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoqFile {
    /// File name sent to the service.
    pub name: String,
    /// Raw contents.
    pub bytes: Vec<u8>,
}

impl BoqFile {
    /// Wrap in-memory contents.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, keeping only its base name.
    ///
    /// # Errors
    ///
    /// Returns `BoqError::Io` if the file cannot be read.
    pub async fn read(path: impl AsRef<Path>) -> Result<Self, BoqError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| BoqError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self { name, bytes })
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Accepted format, from the file name's extension.
    #[must_use]
    pub fn format(&self) -> Option<FileFormat> {
        FileFormat::from_file_name(&self.name)
    }
}

/// A validated analysis submission.
///
/// Each submission carries freshly generated user and session identifiers.
#[derive(Debug, Clone)]
pub struct BoqRequest {
    user_input: String,
    user_id: String,
    session_id: String,
    files: Vec<BoqFile>,
}

impl BoqRequest {
    /// Validate a submission.
    ///
    /// # Errors
    ///
    /// Returns `BoqError::Validation` if the requirement text is blank, no
    /// file was given, or a file has an unsupported extension.
    pub fn new(user_input: impl Into<String>, files: Vec<BoqFile>) -> Result<Self, BoqError> {
        let user_input = user_input.into();
        if user_input.trim().is_empty() {
            return Err(BoqError::Validation(
                "Please enter your requirements".to_owned(),
            ));
        }
        if files.is_empty() {
            return Err(BoqError::Validation(
                "Please upload at least one file".to_owned(),
            ));
        }
        if let Some(file) = files.iter().find(|file| file.format().is_none()) {
            let supported: Vec<String> = FileFormat::ALL.iter().map(ToString::to_string).collect();
            return Err(BoqError::Validation(format!(
                "Unsupported file {}; supported formats: {}",
                file.name,
                supported.join(", ")
            )));
        }

        Ok(Self {
            user_input,
            user_id: generate_id("user"),
            session_id: generate_id("session"),
            files,
        })
    }

    /// Requirement text, as entered.
    #[must_use]
    pub fn user_input(&self) -> &str {
        &self.user_input
    }

    /// Generated `user_<millis>_<suffix>` identifier.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Generated `session_<millis>_<suffix>` identifier.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Files to upload, in submission order.
    #[must_use]
    pub fn files(&self) -> &[BoqFile] {
        &self.files
    }

    /// Total upload size in bytes.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(BoqFile::size).sum()
    }

    pub(crate) fn into_parts(self) -> (String, String, String, Vec<BoqFile>) {
        (self.user_input, self.user_id, self.session_id, self.files)
    }
}

/// `<prefix>_<unix millis>_<9 base36 chars>`.
fn generate_id(prefix: &str) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| char::from_digit(rng.random_range(0..36), 36).unwrap_or('0'))
        .collect();
    format!("{prefix}_{}_{suffix}", Utc::now().timestamp_millis())
}
