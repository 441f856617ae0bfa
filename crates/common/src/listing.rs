use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Recipient sentinel meaning "visible to every client"
pub const EVERYONE: &str = "Everyone";

/// One entry of the server's file listing
///
/// `name` is the opaque server-side storage id used for downloads;
/// `original_name` is what the user uploaded and what a download is saved as.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub name: String,
    pub original_name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub created: f64,
    #[serde(default)]
    pub modified: f64,
    #[serde(default)]
    pub accessed: f64,
    #[serde(default)]
    pub size_fmt: String,
    #[serde(default)]
    pub created_fmt: String,
    #[serde(default)]
    pub modified_fmt: String,
}

/// Columns the server knows how to sort the listing by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    #[default]
    Name,
    Size,
    Created,
    Modified,
    Accessed,
}

impl SortColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::Size => "size",
            SortColumn::Created => "created",
            SortColumn::Modified => "modified",
            SortColumn::Accessed => "accessed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown sort {kind}: {value}")]
pub struct ParseSortError {
    kind: &'static str,
    value: String,
}

impl FromStr for SortColumn {
    type Err = ParseSortError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(SortColumn::Name),
            "size" => Ok(SortColumn::Size),
            "created" => Ok(SortColumn::Created),
            "modified" => Ok(SortColumn::Modified),
            "accessed" => Ok(SortColumn::Accessed),
            _ => Err(ParseSortError {
                kind: "column",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ParseSortError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(ParseSortError {
                kind: "order",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort parameters for a listing request
///
/// Passed explicitly into every listing call; nothing holds a process-wide
/// "current sort".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub column: SortColumn,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(column: SortColumn, order: SortOrder) -> Self {
        Self { column, order }
    }

    /// Selecting the current column flips direction, selecting another
    /// column sorts it ascending.
    pub fn toggle(self, column: SortColumn) -> Self {
        if self.column == column {
            Self {
                column,
                order: self.order.flipped(),
            }
        } else {
            Self {
                column,
                order: SortOrder::Asc,
            }
        }
    }

    /// Query pairs for `GET /get_files`
    pub fn query(&self) -> [(&'static str, &'static str); 2] {
        [("sort", self.column.as_str()), ("order", self.order.as_str())]
    }
}

/// Candidate upload recipients
///
/// The sentinel [`EVERYONE`] is always present and always first, whatever the
/// server reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipients(Vec<String>);

impl Recipients {
    pub fn from_server(ips: Vec<String>) -> Self {
        let mut all = Vec::with_capacity(ips.len() + 1);
        all.push(EVERYONE.to_string());
        for ip in ips {
            if ip != EVERYONE && !all.contains(&ip) {
                all.push(ip);
            }
        }
        Self(all)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, recipient: &str) -> bool {
        self.0.iter().any(|r| r == recipient)
    }

    /// Keep a previous selection across a refresh if it is still offered,
    /// otherwise fall back to [`EVERYONE`].
    pub fn retain_selection(&self, current: &str) -> String {
        if current != EVERYONE && self.contains(current) {
            current.to_string()
        } else {
            EVERYONE.to_string()
        }
    }
}

/// Render a byte count the way the server's listing does (`12.3 KB`)
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB", "TB"] {
        if size < 1024.0 {
            return format!("{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1} PB", size)
}
