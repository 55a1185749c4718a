use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose, Engine};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::id::RecordId;
use crate::{FolioError, Result};

const DATA_URL_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Complete profile content at a point in time.
///
/// Key names and order follow the persisted browser format, so the JSON
/// written to storage and the exported literal stay interchangeable with
/// data saved by earlier versions of the site.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    pub name: String,
    #[serde(rename = "profileImageUrl")]
    pub profile_image: ImageSource,
    pub headline: String,
    pub sub_headline: String,
    pub philosophy: String,
    pub philosophy_highlight: String,
    pub email: String,
    pub phone: String,
    pub expertise: Vec<MetricEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub certifications: Vec<CertificationEntry>,
    #[serde(rename = "portfolioItems")]
    pub portfolio: Vec<PortfolioEntry>,
    pub certification_images: Vec<ImageSource>,
}

impl ProfileSnapshot {
    /// Byte length of the compact JSON form, inline images included.
    pub fn serialized_size(&self) -> Result<usize> {
        Ok(serde_json::to_vec(self)?.len())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of inline images across every slot of the snapshot.
    pub fn inline_image_count(&self) -> usize {
        let profile = usize::from(self.profile_image.is_inline());
        let gallery = self
            .certification_images
            .iter()
            .filter(|image| image.is_inline())
            .count();
        let portfolio: usize = self
            .portfolio
            .iter()
            .map(|item| item.images.iter().filter(|i| i.is_inline()).count())
            .sum();
        profile + gallery + portfolio
    }
}

/// Headline figure shown in the hero section. Addressed by position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricEntry {
    pub label: String,
    pub value: String,
}

impl MetricEntry {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub id: RecordId,
    #[serde(rename = "year")]
    pub period: String,
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub id: RecordId,
    #[serde(rename = "year")]
    pub period: String,
    pub degree: String,
    pub institution: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificationEntry {
    pub id: RecordId,
    pub date: String,
    pub title: String,
    pub organization: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub id: RecordId,
    pub category: Category,
    pub title: String,
    pub description: String,
    #[serde(rename = "imageUrls")]
    pub images: Vec<ImageSource>,
    pub date: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Academic,
    Content,
    Community,
    Project,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Academic,
        Category::Content,
        Category::Community,
        Category::Project,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Academic => "academic",
            Category::Content => "content",
            Category::Community => "community",
            Category::Project => "project",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or(FolioError::Parse)
    }
}

/// Image embedded as text: a MIME-tagged base64 payload usable directly
/// as an image source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineImage {
    mime: String,
    payload: String,
}

impl InlineImage {
    pub fn from_bytes(mime: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime: mime.into(),
            payload: general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Parse a `data:<mime>;base64,<payload>` string.
    pub fn parse(data_url: &str) -> Option<Self> {
        let rest = data_url.strip_prefix(DATA_URL_PREFIX)?;
        let (mime, payload) = rest.split_once(BASE64_MARKER)?;
        if mime.is_empty() {
            return None;
        }
        Some(Self {
            mime: mime.to_owned(),
            payload: payload.to_owned(),
        })
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        general_purpose::STANDARD
            .decode(&self.payload)
            .map_err(|e| FolioError::Decode(e.to_string()))
    }

    /// Length of the data URL form in bytes.
    pub fn encoded_len(&self) -> usize {
        DATA_URL_PREFIX.len()
            + self.mime.len()
            + BASE64_MARKER.len()
            + self.payload.len()
    }
}

impl fmt::Display for InlineImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            DATA_URL_PREFIX, self.mime, BASE64_MARKER, self.payload
        )
    }
}

/// Either an embedded image or a reference to a file shipped with the
/// site (e.g. `./profile.jpg`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    Inline(InlineImage),
    External(String),
}

impl ImageSource {
    pub fn is_inline(&self) -> bool {
        matches!(self, ImageSource::Inline(_))
    }

    pub fn as_inline(&self) -> Option<&InlineImage> {
        match self {
            ImageSource::Inline(image) => Some(image),
            ImageSource::External(_) => None,
        }
    }
}

impl From<InlineImage> for ImageSource {
    fn from(image: InlineImage) -> Self {
        ImageSource::Inline(image)
    }
}

impl From<&str> for ImageSource {
    fn from(raw: &str) -> Self {
        match InlineImage::parse(raw) {
            Some(image) => ImageSource::Inline(image),
            None => ImageSource::External(raw.to_owned()),
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Inline(image) => image.fmt(f),
            ImageSource::External(reference) => f.write_str(reference),
        }
    }
}

impl Serialize for ImageSource {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ImageSource {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        struct SourceVisitor;

        impl<'de> de::Visitor<'de> for SourceVisitor {
            type Value = ImageSource;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an image data URL or file reference")
            }

            fn visit_str<E: de::Error>(
                self,
                v: &str,
            ) -> std::result::Result<ImageSource, E> {
                Ok(ImageSource::from(v))
            }
        }

        deserializer.deserialize_str(SourceVisitor)
    }
}
