//! Article catalog — product code, name, and supplier lookup.
//!
//! The catalog is a CSV export of the purchasing spreadsheet. Column headers
//! are normalized (line breaks folded, trimmed, lowercased) and matched
//! against both the spreadsheet's own names and plain English ones. Codes
//! are kept as text exactly as written; they are looked up, never checked.
//!
//! Files are read as bytes: UTF-8 (with or without BOM) is preferred, and
//! anything else is decoded as Windows-1252, the encoding Excel uses for
//! "CSV (semicolon)" exports on Western European systems.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const CODE_HEADERS: &[&str] = &["code ean uvc", "code"];
const NAME_HEADERS: &[&str] = &["nom article(25car)", "name"];
const SUPPLIER_HEADERS: &[&str] = &["libellé fournisseur", "supplier"];

/// Errors from loading or querying the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("catalog CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("catalog is missing a '{0}' column")]
    MissingColumn(&'static str),
    #[error("unknown article code '{0}'")]
    UnknownCode(String),
}

/// One product line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub code: String,
    pub name: String,
    pub supplier: String,
}

/// All articles, keyed by code.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    articles: BTreeMap<String, Article>,
}

impl Catalog {
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let bytes = std::fs::read(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, CatalogError> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|source| CatalogError::Read {
                path: "<reader>".into(),
                source,
            })?;
        Self::from_bytes(&bytes)
    }

    /// Parse a catalog; the delimiter (`;` or `,`) is sniffed from the header.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CatalogError> {
        let content = decode_sheet(bytes);
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(sniff_delimiter(&content))
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = rdr.headers()?.iter().map(normalize_header).collect();
        let code_col = find_column(&headers, CODE_HEADERS).ok_or(CatalogError::MissingColumn("code"))?;
        let name_col = find_column(&headers, NAME_HEADERS).ok_or(CatalogError::MissingColumn("name"))?;
        let supplier_col = find_column(&headers, SUPPLIER_HEADERS)
            .ok_or(CatalogError::MissingColumn("supplier"))?;

        let mut articles = BTreeMap::new();
        for record in rdr.records() {
            let record = record?;
            let field = |i: usize| record.get(i).unwrap_or("").trim().to_string();
            let code = field(code_col);
            if code.is_empty() {
                continue;
            }
            // First occurrence wins, like a spreadsheet filter's first row.
            articles.entry(code.clone()).or_insert(Article {
                code,
                name: field(name_col),
                supplier: field(supplier_col),
            });
        }

        tracing::debug!(articles = articles.len(), "catalog loaded");
        Ok(Self { articles })
    }

    pub fn lookup(&self, code: &str) -> Result<&Article, CatalogError> {
        self.articles
            .get(code.trim())
            .ok_or_else(|| CatalogError::UnknownCode(code.to_string()))
    }

    /// Codes in sorted order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.articles.keys().map(|c| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Fold line breaks to spaces, trim, and lowercase a header cell.
pub fn normalize_header(raw: &str) -> String {
    raw.replace(['\r', '\n'], " ").trim().to_lowercase()
}

pub(crate) fn find_column(headers: &[String], names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| names.contains(&h.as_str()))
}

/// Decode a spreadsheet export: UTF-8 when valid, Windows-1252 otherwise.
pub(crate) fn decode_sheet(bytes: &[u8]) -> Cow<'_, str> {
    let (text, _, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return text;
    }
    let (text, encoding, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    tracing::debug!(encoding = encoding.name(), "sheet is not UTF-8, decoded as legacy encoding");
    text
}

/// Pick `;` or `,` by counting them in the header record (quotes respected).
pub(crate) fn sniff_delimiter(content: &str) -> u8 {
    let (mut semis, mut commas, mut quoted) = (0usize, 0usize, false);
    for c in content.chars() {
        match c {
            '"' => quoted = !quoted,
            '\n' if !quoted => break,
            ';' if !quoted => semis += 1,
            ',' if !quoted => commas += 1,
            _ => {}
        }
    }
    if semis > commas {
        b';'
    } else {
        b','
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spreadsheet_headers_recognized() {
        // Line breaks inside header cells must be quoted in CSV.
        let sheet = "\"Code EAN\nUVC\";Nom article(25car);\" Libellé fournisseur \";Prix\n\
3017620422003;PATE A TARTINER 400G;FERRERO;3.2\n\
3228857000166;PAIN DE MIE 500G;HARRYS;1.9\n";
        let catalog = Catalog::from_reader(sheet.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);
        let a = catalog.lookup("3017620422003").unwrap();
        assert_eq!(a.name, "PATE A TARTINER 400G");
        assert_eq!(a.supplier, "FERRERO");
    }

    #[test]
    fn plain_headers_and_comma_delimiter() {
        let csv = "code,name,supplier\nA1,Widget,Acme\nB2,Gadget,Globex\n";
        let catalog = Catalog::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.codes().collect::<Vec<_>>(), vec!["A1", "B2"]);
        assert_eq!(catalog.lookup(" B2 ").unwrap().name, "Gadget");
    }

    #[test]
    fn codes_keep_leading_zeros() {
        let csv = "code,name,supplier\n00042,Bolt,Acme\n";
        let catalog = Catalog::from_reader(csv.as_bytes()).unwrap();
        assert!(catalog.lookup("00042").is_ok());
        assert!(catalog.lookup("42").is_err());
    }

    #[test]
    fn duplicate_code_keeps_first_row() {
        let csv = "code,name,supplier\nA1,First,Acme\nA1,Second,Acme\n";
        let catalog = Catalog::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.lookup("A1").unwrap().name, "First");
    }

    #[test]
    fn unknown_code() {
        let catalog = Catalog::from_reader("code,name,supplier\nA1,W,S\n".as_bytes()).unwrap();
        assert!(matches!(
            catalog.lookup("ZZZ"),
            Err(CatalogError::UnknownCode(c)) if c == "ZZZ"
        ));
    }

    #[test]
    fn missing_column_reported() {
        let err = Catalog::from_reader("code,name\nA1,W\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingColumn("supplier")));
    }

    #[test]
    fn windows_1252_export_accepted() {
        // "Libellé" with é as the single byte 0xE9.
        let mut sheet = b"Code EAN UVC;Nom article(25car);Libell".to_vec();
        sheet.push(0xE9);
        sheet.extend_from_slice(b" fournisseur\n3017620422003;PATE A TARTINER;FERRER");
        sheet.push(0xC9);
        sheet.push(b'\n');

        let catalog = Catalog::from_bytes(&sheet).unwrap();
        let a = catalog.lookup("3017620422003").unwrap();
        assert_eq!(a.name, "PATE A TARTINER");
        assert_eq!(a.supplier, "FERRERÉ");
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let sheet = "\u{feff}code;name;supplier\nA1;Crème;Acme\n";
        let catalog = Catalog::from_bytes(sheet.as_bytes()).unwrap();
        assert_eq!(catalog.lookup("A1").unwrap().name, "Crème");
    }

    #[test]
    fn missing_file_error_names_the_path() {
        let err = Catalog::from_file(Path::new("/nonexistent/articles.csv")).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/articles.csv"));
    }

    #[test]
    fn header_normalization() {
        assert_eq!(normalize_header("  Code EAN\nUVC "), "code ean uvc");
        assert_eq!(normalize_header("Libellé Fournisseur"), "libellé fournisseur");
    }

    #[test]
    fn delimiter_sniffing() {
        assert_eq!(sniff_delimiter("a;b;c\n1,5;2;3"), b';');
        assert_eq!(sniff_delimiter("a,b,c\n"), b',');
        assert_eq!(sniff_delimiter("\"x\ny\";b;c\n"), b';');
        assert_eq!(sniff_delimiter(""), b',');
    }
}
