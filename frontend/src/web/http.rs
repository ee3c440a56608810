//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现核心库的 `HttpClient` 特性。

use clinic_admin::request::HttpBody;
use clinic_admin::{ApiError, ApiResult, HttpClient, HttpRequest, HttpResponse, MultipartFile};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Headers, Request, RequestInit, Response};

/// 浏览器失去连接或被 CORS 拦截时展示的文案
const NETWORK_ERROR: &str = "Network Error";

/// 基于 `window.fetch` 的 HTTP 客户端
#[derive(Default)]
pub struct BrowserHttpClient;

#[async_trait::async_trait(?Send)]
impl HttpClient for BrowserHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let url = req.full_url();
        let request = build_request(&url, &req)?;

        let window =
            web_sys::window().ok_or_else(|| ApiError::Unexpected("无法获取 window 对象".into()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| {
                tracing::warn!(method = req.method.as_str(), %url, error = ?e, "fetch failed");
                ApiError::Transport(NETWORK_ERROR.to_string())
            })?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| ApiError::Unexpected(format!("Response 类型转换失败: {:?}", e)))?;

        let status = response.status();
        let body = read_text(&response).await?;
        Ok(HttpResponse { status, body })
    }
}

fn build_request(url: &str, req: &HttpRequest) -> ApiResult<Request> {
    let headers = Headers::new()
        .map_err(|e| ApiError::Unexpected(format!("创建 Headers 失败: {:?}", e)))?;

    for (key, value) in &req.headers {
        headers
            .set(key, value)
            .map_err(|e| ApiError::Unexpected(format!("设置 Header 失败: {:?}", e)))?;
    }

    let opts = RequestInit::new();
    opts.set_method(req.method.as_str());
    opts.set_headers(&headers.into());

    match &req.body {
        Some(HttpBody::Json(body)) => opts.set_body(&JsValue::from_str(body)),
        // 不手动设置 Content-Type，浏览器会补上 boundary
        Some(HttpBody::Multipart(file)) => opts.set_body(&form_data(file)?.into()),
        None => {}
    }

    Request::new_with_str_and_init(url, &opts)
        .map_err(|e| ApiError::Unexpected(format!("请求构建失败: {:?}", e)))
}

fn form_data(file: &MultipartFile) -> ApiResult<FormData> {
    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(file.bytes.as_slice()).into());
    let bag = BlobPropertyBag::new();
    bag.set_type(&file.content_type);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &bag)
        .map_err(|e| ApiError::Unexpected(format!("创建 Blob 失败: {:?}", e)))?;

    let form =
        FormData::new().map_err(|e| ApiError::Unexpected(format!("创建 FormData 失败: {:?}", e)))?;
    form.append_with_blob_and_filename(&file.field, &blob, &file.file_name)
        .map_err(|e| ApiError::Unexpected(format!("写入 FormData 失败: {:?}", e)))?;
    Ok(form)
}

async fn read_text(response: &Response) -> ApiResult<String> {
    let promise = response
        .text()
        .map_err(|e| ApiError::Decode(format!("{:?}", e)))?;

    let text = JsFuture::from(promise)
        .await
        .map_err(|e| ApiError::Decode(format!("{:?}", e)))?;

    text.as_string()
        .ok_or_else(|| ApiError::Decode("无法转换为字符串".to_string()))
}
