//! MIME types understood by Google Drive, and the export conversions used when
//! downloading Google-native documents.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// MIME type of a Drive folder.
pub const FOLDER: &str = "application/vnd.google-apps.folder";

/// Common MIME types for Drive uploads, plus the Google-native types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GoogleMimeType {
    Xls,
    Xlsx,
    Xml,
    Ods,
    Csv,
    Pdf,
    Php,
    Jpg,
    Png,
    Gif,
    Bmp,
    Txt,
    Doc,
    Docx,
    Js,
    Swf,
    Mp3,
    Zip,
    Rar,
    Tar,
    Arj,
    Cab,
    Html,
    Default,
    Folder,
    Docs,
    Sheets,
    Slides,
}

impl GoogleMimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xls => "application/vnd.ms-excel",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Xml => "text/xml",
            Self::Ods => "application/vnd.oasis.opendocument.spreadsheet",
            Self::Csv => "text/csv",
            Self::Pdf => "application/pdf",
            Self::Php => "application/x-httpd-php",
            Self::Jpg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Txt => "text/plain",
            Self::Doc => "application/msword",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Js => "text/js",
            Self::Swf => "application/x-shockwave-flash",
            Self::Mp3 => "audio/mpeg",
            Self::Zip => "application/zip",
            Self::Rar => "application/rar",
            Self::Tar => "application/tar",
            Self::Arj => "application/arj",
            Self::Cab => "application/cab",
            Self::Html => "text/html",
            Self::Default => "application/octet-stream",
            Self::Folder => FOLDER,
            Self::Docs => "application/vnd.google-apps.document",
            Self::Sheets => "application/vnd.google-apps.spreadsheet",
            Self::Slides => "application/vnd.google-apps.presentation",
        }
    }

    /// Google-native types have no binary content and must be exported.
    pub fn is_google_native(&self) -> bool {
        matches!(self, Self::Folder | Self::Docs | Self::Sheets | Self::Slides)
    }
}

impl fmt::Display for GoogleMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoogleMimeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [GoogleMimeType; 28] = [
            GoogleMimeType::Xls,
            GoogleMimeType::Xlsx,
            GoogleMimeType::Xml,
            GoogleMimeType::Ods,
            GoogleMimeType::Csv,
            GoogleMimeType::Pdf,
            GoogleMimeType::Php,
            GoogleMimeType::Jpg,
            GoogleMimeType::Png,
            GoogleMimeType::Gif,
            GoogleMimeType::Bmp,
            GoogleMimeType::Txt,
            GoogleMimeType::Doc,
            GoogleMimeType::Docx,
            GoogleMimeType::Js,
            GoogleMimeType::Swf,
            GoogleMimeType::Mp3,
            GoogleMimeType::Zip,
            GoogleMimeType::Rar,
            GoogleMimeType::Tar,
            GoogleMimeType::Arj,
            GoogleMimeType::Cab,
            GoogleMimeType::Html,
            GoogleMimeType::Default,
            GoogleMimeType::Folder,
            GoogleMimeType::Docs,
            GoogleMimeType::Sheets,
            GoogleMimeType::Slides,
        ];

        ALL.iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown MIME type: {}", s))
    }
}

/// Target type and file extension for exporting a Google-native document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    pub mime_type: GoogleMimeType,
    pub extension: &'static str,
}

/// Maps a Google-native MIME type (as a string) to its export conversion.
pub type ConversionMap = HashMap<&'static str, Conversion>;

/// Sheets export to xlsx, Docs to docx and Slides to pdf.
pub fn default_conversion_map() -> ConversionMap {
    HashMap::from([
        (
            GoogleMimeType::Sheets.as_str(),
            Conversion {
                mime_type: GoogleMimeType::Xlsx,
                extension: "xlsx",
            },
        ),
        (
            GoogleMimeType::Docs.as_str(),
            Conversion {
                mime_type: GoogleMimeType::Docx,
                extension: "docx",
            },
        ),
        (
            GoogleMimeType::Slides.as_str(),
            Conversion {
                mime_type: GoogleMimeType::Pdf,
                extension: "pdf",
            },
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_roundtrips_known_types() {
        assert_eq!(
            "application/vnd.google-apps.spreadsheet".parse::<GoogleMimeType>(),
            Ok(GoogleMimeType::Sheets)
        );
        assert_eq!("image/png".parse::<GoogleMimeType>(), Ok(GoogleMimeType::Png));
        assert!("application/x-unknown".parse::<GoogleMimeType>().is_err());
    }

    #[test]
    fn test_default_conversion_map() {
        let map = default_conversion_map();
        let sheets = map[GoogleMimeType::Sheets.as_str()];
        assert_eq!(sheets.mime_type, GoogleMimeType::Xlsx);
        assert_eq!(sheets.extension, "xlsx");
        assert_eq!(map[GoogleMimeType::Slides.as_str()].extension, "pdf");
        assert!(!map.contains_key(GoogleMimeType::Pdf.as_str()));
    }

    #[test]
    fn test_google_native() {
        assert!(GoogleMimeType::Docs.is_google_native());
        assert!(!GoogleMimeType::Xlsx.is_google_native());
    }
}
