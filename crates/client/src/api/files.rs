use common::listing::{FileRecord, SortColumn, SortOrder, SortSpec};
use reqwest::{Client, RequestBuilder, Url};

use super::client::{endpoint, ApiError, ApiRequest};

/// `GET /get_files?sort=<column>&order=<asc|desc>`
#[derive(Debug, Clone, clap::Args)]
pub struct ListFilesRequest {
    /// Column to sort by (name, size, created, modified, accessed)
    #[arg(long, default_value_t = SortColumn::Name)]
    pub sort: SortColumn,

    /// Sort direction (asc, desc)
    #[arg(long, default_value_t = SortOrder::Asc)]
    pub order: SortOrder,
}

impl ListFilesRequest {
    pub fn spec(&self) -> SortSpec {
        SortSpec::new(self.sort, self.order)
    }
}

impl From<SortSpec> for ListFilesRequest {
    fn from(spec: SortSpec) -> Self {
        Self {
            sort: spec.column,
            order: spec.order,
        }
    }
}

impl ApiRequest for ListFilesRequest {
    type Response = Vec<FileRecord>;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = endpoint(base_url, &["get_files"])?;
        Ok(client.get(full_url).query(&self.spec().query()))
    }
}
