//! GLB container framing.

use serde_json::Value;

use meshglb_core::error::AppError;
use meshglb_core::result::AppResult;

use super::{CHUNK_TYPE_BIN, CHUNK_TYPE_JSON, GLB_HEADER_LEN, GLB_MAGIC, GLB_VERSION};

/// A glTF JSON document and its optional binary buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct GlbContainer {
    /// The glTF document.
    pub json: Value,
    /// Contents of buffer 0, if the document references one.
    pub bin: Option<Vec<u8>>,
}

impl GlbContainer {
    /// Encode as GLB bytes.
    ///
    /// The JSON chunk is padded with spaces and the BIN chunk with zeros to
    /// 4-byte boundaries. Object keys serialize in sorted order, so equal
    /// documents always produce equal bytes.
    pub fn to_bytes(&self) -> AppResult<Vec<u8>> {
        let mut json_bytes = serde_json::to_vec(&self.json)?;
        pad(&mut json_bytes, b' ');

        let bin = self.bin.as_ref().filter(|b| !b.is_empty()).map(|b| {
            let mut b = b.clone();
            pad(&mut b, 0);
            b
        });

        let mut total = GLB_HEADER_LEN + 8 + json_bytes.len();
        if let Some(bin) = &bin {
            total += 8 + bin.len();
        }
        let total_u32 = u32::try_from(total)
            .map_err(|_| AppError::export(format!("GLB of {total} bytes exceeds 4 GiB")))?;

        let mut glb = Vec::with_capacity(total);
        glb.extend_from_slice(&GLB_MAGIC.to_le_bytes());
        glb.extend_from_slice(&GLB_VERSION.to_le_bytes());
        glb.extend_from_slice(&total_u32.to_le_bytes());

        glb.extend_from_slice(&(json_bytes.len() as u32).to_le_bytes());
        glb.extend_from_slice(&CHUNK_TYPE_JSON.to_le_bytes());
        glb.extend_from_slice(&json_bytes);

        if let Some(bin) = bin {
            glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
            glb.extend_from_slice(&CHUNK_TYPE_BIN.to_le_bytes());
            glb.extend_from_slice(&bin);
        }
        Ok(glb)
    }

    /// Decode GLB bytes, checking the header and chunk framing.
    pub fn from_bytes(bytes: &[u8]) -> AppResult<Self> {
        if bytes.len() < GLB_HEADER_LEN {
            return Err(AppError::parse("GLB shorter than its header"));
        }
        if read_u32(bytes, 0) != GLB_MAGIC {
            return Err(AppError::parse("bad GLB magic"));
        }
        let version = read_u32(bytes, 4);
        if version != GLB_VERSION {
            return Err(AppError::parse(format!("unsupported GLB version {version}")));
        }
        let declared = read_u32(bytes, 8) as usize;
        if declared != bytes.len() {
            return Err(AppError::parse(format!(
                "GLB header declares {declared} bytes, file has {}",
                bytes.len()
            )));
        }

        let mut offset = GLB_HEADER_LEN;
        let mut json = None;
        let mut bin = None;
        while offset < bytes.len() {
            if offset + 8 > bytes.len() {
                return Err(AppError::parse("truncated GLB chunk header"));
            }
            let length = read_u32(bytes, offset) as usize;
            let kind = read_u32(bytes, offset + 4);
            let start = offset + 8;
            let end = start + length;
            if length % 4 != 0 || end > bytes.len() {
                return Err(AppError::parse("misaligned or truncated GLB chunk"));
            }
            let data = &bytes[start..end];
            match kind {
                CHUNK_TYPE_JSON if json.is_none() => {
                    json = Some(serde_json::from_slice::<Value>(data)?);
                }
                CHUNK_TYPE_BIN if json.is_some() && bin.is_none() => {
                    bin = Some(data.to_vec());
                }
                CHUNK_TYPE_JSON | CHUNK_TYPE_BIN => {
                    return Err(AppError::parse("unexpected GLB chunk order"));
                }
                // Unknown chunk types must be ignored.
                _ => {}
            }
            offset = end;
        }

        let json = json.ok_or_else(|| AppError::parse("GLB has no JSON chunk"))?;
        Ok(Self { json, bin })
    }
}

fn pad(bytes: &mut Vec<u8>, fill: u8) {
    while bytes.len() % 4 != 0 {
        bytes.push(fill);
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(word)
}
