//! 从 `<input type="file">` 读取文件内容

use clinic_admin::{ApiError, ApiResult, MultipartFile};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, File, HtmlInputElement};

/// 取出输入框中选中的第一个文件
pub fn selected_file(ev: &Event) -> Option<File> {
    let input = ev.target()?.dyn_into::<HtmlInputElement>().ok()?;
    let file = input.files()?.get(0);
    // 清空以便重复选择同一文件时仍触发 change
    input.set_value("");
    file
}

/// 读取整个文件，包装为 multipart 表单字段
pub async fn read_multipart(field: &str, file: &File) -> ApiResult<MultipartFile> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| ApiError::Unexpected(format!("读取文件失败: {:?}", e)))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    Ok(MultipartFile {
        field: field.to_string(),
        file_name: file.name(),
        content_type: file.type_(),
        bytes,
    })
}
