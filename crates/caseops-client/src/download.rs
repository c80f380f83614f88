//! Saving the letter Excel export to disk.

use std::path::{Path, PathBuf};

use caseops_core::panel::DEFAULT_LETTER_EXCEL_FILENAME;
use caseops_core::state::SavedDownload;

use crate::backend::DownloadedFile;
use crate::error::BackendError;

/// Filename advertised by a `Content-Disposition` header.
///
/// `filename*=UTF-8''...` wins over `filename=`; quoted and bare values are
/// both accepted.
#[must_use]
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;
    for param in split_params(header) {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();
        match key.as_str() {
            "filename*" => extended = decode_extended_value(value),
            "filename" => plain = Some(value.trim_matches('"').to_string()),
            _ => {}
        }
    }
    extended
        .or(plain)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Split on `;` outside double quotes.
fn split_params(header: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    for (idx, ch) in header.char_indices() {
        match ch {
            '"' => quoted = !quoted,
            ';' if !quoted => {
                params.push(header[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    params.push(header[start..].trim());
    params
}

/// `charset'lang'percent-encoded` per RFC 5987.
fn decode_extended_value(value: &str) -> Option<String> {
    let value = value.trim_matches('"');
    let encoded = match value.splitn(3, '\'').collect::<Vec<_>>().as_slice() {
        [_charset, _lang, encoded] => *encoded,
        _ => value,
    };
    urlencoding::decode(encoded)
        .ok()
        .map(|decoded| decoded.into_owned())
}

/// Reduce a server-supplied name to a bare file name safe to join onto the
/// downloads directory.
#[must_use]
pub fn sanitize_filename(name: &str) -> Option<String> {
    let last = name.rsplit(|c: char| c == '/' || c == '\\').next()?.trim();
    match last {
        "" | "." | ".." => None,
        other => Some(other.to_string()),
    }
}

/// Name the export is saved under.
#[must_use]
pub fn resolve_filename(content_disposition: Option<&str>) -> String {
    content_disposition
        .and_then(filename_from_content_disposition)
        .and_then(|name| sanitize_filename(&name))
        .unwrap_or_else(|| DEFAULT_LETTER_EXCEL_FILENAME.to_string())
}

/// Write the export into `dir`, creating it if needed.
pub async fn save_download(dir: &Path, file: &DownloadedFile) -> Result<SavedDownload, BackendError> {
    let name = resolve_filename(file.content_disposition.as_deref());
    tokio::fs::create_dir_all(dir).await?;
    let path: PathBuf = dir.join(name);
    tokio::fs::write(&path, &file.bytes).await?;
    Ok(SavedDownload {
        path,
        bytes: file.bytes.len() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::{filename_from_content_disposition, resolve_filename, sanitize_filename};

    #[test]
    fn quoted_and_bare_filenames() {
        assert_eq!(
            filename_from_content_disposition(r#"attachment; filename="letters_2026.xlsx""#)
                .as_deref(),
            Some("letters_2026.xlsx")
        );
        assert_eq!(
            filename_from_content_disposition("attachment; filename=letters.xlsx").as_deref(),
            Some("letters.xlsx")
        );
        assert_eq!(filename_from_content_disposition("attachment"), None);
        assert_eq!(filename_from_content_disposition(r#"attachment; filename="""#), None);
    }

    #[test]
    fn semicolon_inside_quoted_filename_is_kept() {
        assert_eq!(
            resolve_filename(Some(r#"attachment; filename="letters;2026.xlsx""#)),
            "letters;2026.xlsx"
        );
        assert_eq!(
            filename_from_content_disposition(r#"attachment; filename="a;b.xlsx"; size=10"#)
                .as_deref(),
            Some("a;b.xlsx")
        );
    }

    #[test]
    fn extended_filename_wins_and_is_decoded() {
        let header =
            r#"attachment; filename="fallback.xlsx"; filename*=UTF-8''letter%20data%C3%A9.xlsx"#;
        assert_eq!(
            filename_from_content_disposition(header).as_deref(),
            Some("letter dataé.xlsx")
        );
    }

    #[test]
    fn path_components_are_stripped() {
        assert_eq!(sanitize_filename("../../etc/passwd").as_deref(), Some("passwd"));
        assert_eq!(sanitize_filename(r"C:\tmp\x.xlsx").as_deref(), Some("x.xlsx"));
        assert_eq!(sanitize_filename(".."), None);
        assert_eq!(sanitize_filename("dir/"), None);
    }

    #[test]
    fn default_name_when_header_is_missing_or_useless() {
        assert_eq!(resolve_filename(None), "letter_generation_data.xlsx");
        assert_eq!(
            resolve_filename(Some(r#"attachment; filename="..""#)),
            "letter_generation_data.xlsx"
        );
        assert_eq!(
            resolve_filename(Some(r#"attachment; filename="out/report.xlsx""#)),
            "report.xlsx"
        );
    }
}
