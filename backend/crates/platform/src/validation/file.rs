//! File upload policy

use kernel::error::app_error::{AppError, AppResult};
use kernel::error::codes;

use super::patterns::contains_malicious_patterns;

/// 10 MiB
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Metadata of an uploaded file, as declared by the client
#[derive(Debug, Clone, Copy)]
pub struct UploadedFile<'a> {
    pub filename: &'a str,
    pub content_type: &'a str,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct FileUploadPolicy {
    pub max_size_bytes: u64,
    pub allowed_mime_types: Vec<String>,
    /// Lower-case, without the dot
    pub allowed_extensions: Vec<String>,
}

impl Default for FileUploadPolicy {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_FILE_SIZE,
            allowed_mime_types: [
                "application/pdf",
                "application/msword",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                "application/vnd.ms-excel",
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                "text/csv",
                "image/png",
                "image/jpeg",
            ]
            .map(String::from)
            .to_vec(),
            allowed_extensions: ["pdf", "doc", "docx", "xls", "xlsx", "csv", "png", "jpg", "jpeg"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl FileUploadPolicy {
    /// Same allow-lists with a 1 MiB ceiling
    pub fn development() -> Self {
        Self {
            max_size_bytes: 1024 * 1024,
            ..Self::default()
        }
    }

    /// Size, MIME type, extension, then filename
    pub fn validate(&self, file: &UploadedFile<'_>) -> AppResult<()> {
        if file.size > self.max_size_bytes {
            return Err(AppError::validation(
                "file",
                format!(
                    "File exceeds the maximum size of {} bytes",
                    self.max_size_bytes
                ),
            )
            .with_code(codes::FILE_TOO_LARGE));
        }

        let mime = file
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if !self.allowed_mime_types.iter().any(|allowed| *allowed == mime) {
            return Err(AppError::validation("file", "File type is not allowed")
                .with_code(codes::INVALID_FILE_TYPE));
        }

        let extension = file
            .filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !self.allowed_extensions.iter().any(|allowed| *allowed == extension) {
            return Err(AppError::validation("file", "File extension is not allowed")
                .with_code(codes::INVALID_FILE_EXTENSION));
        }

        if is_malicious_filename(file.filename) {
            tracing::warn!(filename = %file.filename.escape_debug(), "Rejected malicious filename");
            return Err(AppError::validation("file", "Filename is not allowed")
                .with_code(codes::MALICIOUS_FILENAME));
        }

        Ok(())
    }
}

fn is_malicious_filename(name: &str) -> bool {
    name.chars().any(|c| c.is_control())
        || name.contains(['/', '\\'])
        || name.contains("..")
        || name.starts_with('.')
        || contains_malicious_patterns(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(filename: &str, size: u64) -> UploadedFile<'_> {
        UploadedFile {
            filename,
            content_type: "application/pdf",
            size,
        }
    }

    #[test]
    fn test_accepts_allowed_file() {
        let policy = FileUploadPolicy::default();
        assert!(policy.validate(&pdf("tender-2024.PDF", 2048)).is_ok());

        let csv = UploadedFile {
            filename: "bids.csv",
            content_type: "text/csv; charset=utf-8",
            size: 10,
        };
        assert!(policy.validate(&csv).is_ok());
    }

    #[test]
    fn test_rejections_carry_specific_codes() {
        let policy = FileUploadPolicy::default();

        let err = policy
            .validate(&pdf("big.pdf", DEFAULT_MAX_FILE_SIZE + 1))
            .unwrap_err();
        assert_eq!(err.code(), codes::FILE_TOO_LARGE);
        assert_eq!(err.status_code(), 400);

        let exe = UploadedFile {
            filename: "setup.exe",
            content_type: "application/x-msdownload",
            size: 10,
        };
        assert_eq!(
            policy.validate(&exe).unwrap_err().code(),
            codes::INVALID_FILE_TYPE
        );

        assert_eq!(
            policy.validate(&pdf("report.pdf.exe", 10)).unwrap_err().code(),
            codes::INVALID_FILE_EXTENSION
        );

        for name in ["../../etc/passwd.pdf", "a\0b.pdf", "x;rm -rf.pdf", ".hidden.pdf"] {
            assert_eq!(
                policy.validate(&pdf(name, 10)).unwrap_err().code(),
                codes::MALICIOUS_FILENAME,
                "{name}"
            );
        }
    }

    #[test]
    fn test_development_policy_is_smaller() {
        let err = FileUploadPolicy::development()
            .validate(&pdf("a.pdf", 2 * 1024 * 1024))
            .unwrap_err();
        assert_eq!(err.code(), codes::FILE_TOO_LARGE);
    }
}
