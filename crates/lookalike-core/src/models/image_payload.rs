use serde::{Deserialize, Serialize};

/// An image encoded for transmission to the embedding provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    /// `data:image/jpeg;base64,...` URI.
    pub data_uri: String,
    /// Size of the encoded JPEG before base64 expansion.
    pub encoded_bytes: usize,
    pub width: u32,
    pub height: u32,
    pub quality: u8,
}

/// Image bytes fetched from the image store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub bytes: Vec<u8>,
    pub original_path: Option<String>,
}
