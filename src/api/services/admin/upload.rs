//! 图片上传端点
//!
//! multipart 字段 `file`，校验由 UploadService 完成；这里只负责读流并限制读取量。

use actix_multipart::Multipart;
use actix_web::{HttpResponse, Result as ActixResult, web};
use futures_util::StreamExt;
use tracing::{error, info};

use crate::errors::LinkpageError;
use crate::services::UploadService;

use super::helpers::{api_result, error_from_linkpage};

struct UploadedPart {
    file_name: String,
    content_type: String,
    data: Vec<u8>,
}

pub async fn upload_image(
    mut payload: Multipart,
    uploads: web::Data<UploadService>,
) -> ActixResult<HttpResponse> {
    let mut part: Option<UploadedPart> = None;

    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(f) => f,
            Err(e) => {
                error!("Failed to parse multipart field: {}", e);
                return Ok(error_from_linkpage(&LinkpageError::upload_rejected(
                    format!("Invalid multipart data: {}", e),
                )));
            }
        };

        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or("upload")
            .to_string();
        let content_type = field
            .content_type()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_default();

        // 多读 1 字节，超限交给 UploadService 统一报错
        let limit = uploads.max_bytes() + 1;
        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            match chunk {
                Ok(bytes) => {
                    let room = limit.saturating_sub(data.len());
                    data.extend_from_slice(&bytes[..bytes.len().min(room)]);
                    if data.len() >= limit {
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to read upload chunk: {}", e);
                    return Ok(error_from_linkpage(&LinkpageError::upload_rejected(
                        format!("Failed to read file: {}", e),
                    )));
                }
            }
        }

        part = Some(UploadedPart {
            file_name,
            content_type,
            data,
        });
        break;
    }

    let Some(part) = part else {
        return Ok(error_from_linkpage(&LinkpageError::upload_rejected(
            "No file uploaded",
        )));
    };

    let result = uploads
        .store(&part.file_name, &part.content_type, &part.data)
        .await;
    if let Ok(stored) = &result {
        info!("Admin API: image uploaded to {}", stored.url);
    }
    Ok(api_result(result))
}
