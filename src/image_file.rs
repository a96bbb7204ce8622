use crate::detection::model::ImageSize;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::ImageFormat;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

const OCTET_STREAM: &str = "application/octet-stream";
pub const RECENT_IMAGE_NAME: &str = "recent-image.jpg";

#[derive(Debug, thiserror::Error)]
pub enum ImageFileError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("not a base64 data url")]
    NotDataUrl,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("failed to probe image dimensions: {0}")]
    Probe(#[from] image::ImageError),
}

/// A file picked by the user, before anything is sent anywhere.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub mime: String,
    pub bytes: Arc<[u8]>,
}

impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// Sniffs the mime type from the name first, then from the content.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = sniff_mime(&name, &bytes);
        Self::new(name, mime, bytes)
    }

    pub fn from_path(path: &Path) -> Result<Self, ImageFileError> {
        let bytes = std::fs::read(path).map_err(|source| ImageFileError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::from_bytes(name, bytes))
    }

    pub fn from_data_url(image: &EncodedImage, name: &str) -> Result<Self, ImageFileError> {
        let mime = image.mime().ok_or(ImageFileError::NotDataUrl)?;
        let payload = image.payload().ok_or(ImageFileError::NotDataUrl)?;
        let bytes = STANDARD.decode(payload)?;
        Ok(Self::new(name, mime, bytes))
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    pub fn encode(&self) -> EncodedImage {
        EncodedImage::new(format!(
            "data:{};base64,{}",
            self.mime,
            STANDARD.encode(&self.bytes)
        ))
    }

    /// Reads only the header, the pixels are not decoded.
    pub fn probe_dimensions(&self) -> Result<ImageSize, ImageFileError> {
        let (width, height) = image::ImageReader::new(Cursor::new(&self.bytes[..]))
            .with_guessed_format()
            .map_err(image::ImageError::IoError)?
            .into_dimensions()?;
        Ok(ImageSize { width, height })
    }
}

fn sniff_mime(name: &str, bytes: &[u8]) -> String {
    ImageFormat::from_path(name)
        .or_else(|_| image::guess_format(bytes))
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| OCTET_STREAM.to_string())
}

/// An image as a `data:<mime>;base64,<payload>` url.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage(Arc<str>);

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EncodedImage({:?}, {} chars)", self.mime(), self.0.len())
    }
}

impl EncodedImage {
    pub fn new(data_url: impl Into<Arc<str>>) -> Self {
        Self(data_url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn mime(&self) -> Option<&str> {
        let (header, _) = self.0.split_once(',')?;
        header.strip_prefix("data:")?.split(';').next()
    }

    /// The base64 part without the data url prefix.
    pub fn payload(&self) -> Option<&str> {
        self.0.split_once(',').map(|(_, payload)| payload)
    }

    pub fn decode(&self) -> Result<Vec<u8>, ImageFileError> {
        let payload = self.payload().ok_or(ImageFileError::NotDataUrl)?;
        Ok(STANDARD.decode(payload)?)
    }
}
