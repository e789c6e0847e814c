//! Inline product images.
//!
//! Images are stored inside the product record as data URLs
//! (`data:image/png;base64,...`), so a product is self-contained and needs
//! no separate blob storage.

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing product images.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// The value is not a `data:` URL.
    #[error("image must be a data URL")]
    NotDataUrl,
    /// The data URL has no payload.
    #[error("image data URL has no payload")]
    EmptyPayload,
    /// One image's decoded payload exceeds [`ProductImage::MAX_BYTES`].
    #[error("each image must be less than 5MB, got {size} bytes")]
    TooLarge {
        /// Maximum allowed, in bytes.
        max: usize,
        /// Decoded size, in bytes.
        size: usize,
    },
    /// Too many images for one product.
    #[error("a product can have at most {max} images, got {count}")]
    TooMany {
        /// Maximum allowed.
        max: usize,
        /// Number supplied.
        count: usize,
    },
}

/// One inline-encoded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductImage(String);

impl ProductImage {
    /// Largest accepted image, in decoded bytes (5 MiB).
    pub const MAX_BYTES: usize = 5 * 1024 * 1024;

    /// Parse a data URL.
    ///
    /// # Errors
    ///
    /// Returns `ImageError::NotDataUrl` if the value does not start with
    /// `data:` or lacks the `,` separator, `ImageError::EmptyPayload` if
    /// nothing follows the separator, and `ImageError::TooLarge` if the
    /// decoded payload exceeds [`Self::MAX_BYTES`].
    pub fn parse(data_url: &str) -> Result<Self, ImageError> {
        let rest = data_url
            .strip_prefix("data:")
            .ok_or(ImageError::NotDataUrl)?;
        let (header, payload) = rest.split_once(',').ok_or(ImageError::NotDataUrl)?;
        if payload.is_empty() {
            return Err(ImageError::EmptyPayload);
        }
        let size = decoded_len(header, payload);
        if size > Self::MAX_BYTES {
            return Err(ImageError::TooLarge {
                max: Self::MAX_BYTES,
                size,
            });
        }
        Ok(Self(data_url.to_owned()))
    }

    /// Size of the decoded image in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.0
            .split_once(',')
            .map_or(0, |(header, payload)| decoded_len(header, payload))
    }

    /// Build a base64 data URL from an already encoded payload.
    ///
    /// # Errors
    ///
    /// Returns `ImageError::EmptyPayload` if `base64_payload` is empty.
    pub fn from_base64(mime: &str, base64_payload: &str) -> Result<Self, ImageError> {
        Self::parse(&format!("data:{mime};base64,{base64_payload}"))
    }

    /// The media type declared by the data URL, e.g. `image/png`.
    #[must_use]
    pub fn mime(&self) -> &str {
        self.0
            .strip_prefix("data:")
            .and_then(|rest| rest.split([';', ',']).next())
            .unwrap_or("")
    }

    /// The full data URL.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Decoded byte count of a data URL payload, without decoding it.
fn decoded_len(header: &str, payload: &str) -> usize {
    if !header.ends_with(";base64") {
        return payload.len();
    }
    let padding = payload.bytes().rev().take_while(|&b| b == b'=').count();
    (payload.len() * 3 / 4).saturating_sub(padding)
}

impl TryFrom<String> for ProductImage {
    type Error = ImageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProductImage> for String {
    fn from(image: ProductImage) -> Self {
        image.0
    }
}

/// The ordered images of one product, at most [`ProductImages::MAX`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<ProductImage>", into = "Vec<ProductImage>")]
pub struct ProductImages(Vec<ProductImage>);

impl ProductImages {
    /// Maximum number of images per product.
    pub const MAX: usize = 5;

    /// Create from a list of images.
    ///
    /// # Errors
    ///
    /// Returns `ImageError::TooMany` if more than [`Self::MAX`] images are given.
    pub fn new(images: Vec<ProductImage>) -> Result<Self, ImageError> {
        if images.len() > Self::MAX {
            return Err(ImageError::TooMany {
                max: Self::MAX,
                count: images.len(),
            });
        }
        Ok(Self(images))
    }

    /// Number of images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no images.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the images in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ProductImage> {
        self.0.iter()
    }
}

impl TryFrom<Vec<ProductImage>> for ProductImages {
    type Error = ImageError;

    fn try_from(value: Vec<ProductImage>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductImages> for Vec<ProductImage> {
    fn from(images: ProductImages) -> Self {
        images.0
    }
}

impl<'a> IntoIterator for &'a ProductImages {
    type Item = &'a ProductImage;
    type IntoIter = std::slice::Iter<'a, ProductImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
