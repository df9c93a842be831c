//! 本地图片读取

use gloo_file::File;
use gloo_file::futures::read_as_data_url;
use podtrack_shared::capture::EncodedImage;
use podtrack_shared::{MAX_PROOF_BYTES, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("Failed to read file: {0}")]
    Read(String),
}

/// 取 `<input type="file">` 选中的第一个文件
pub fn selected_file(input: &web_sys::HtmlInputElement) -> Option<File> {
    input.files()?.get(0).map(File::from)
}

/// 读取图片为 data URL；非图片或超过大小上限时拒绝
pub async fn read_image(file: File) -> Result<EncodedImage, FileError> {
    if !file.raw_mime_type().starts_with("image/") {
        return Err(ValidationError::NotAnImage.into());
    }
    let size = file.size() as usize;
    if size > MAX_PROOF_BYTES {
        return Err(ValidationError::ImageTooLarge {
            size,
            max: MAX_PROOF_BYTES,
        }
        .into());
    }

    let data_url = read_as_data_url(&file)
        .await
        .map_err(|e| FileError::Read(e.to_string()))?;
    log::debug!("read {} ({} bytes)", file.name(), size);

    Ok(EncodedImage::from_data_url(data_url)?)
}
