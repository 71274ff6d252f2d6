use std::future::Future;

use payloads::{ClientError, Cursor, PageResponse, TenorClient};

/// Where pages come from. Implemented by [`TenorClient`]; tests substitute
/// scripted sources.
pub trait GifSource {
    type Error: std::error::Error;

    fn search(
        &self,
        query: &str,
        limit: u32,
        cursor: Option<&Cursor>,
    ) -> impl Future<Output = Result<PageResponse, Self::Error>>;

    fn featured(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<PageResponse, Self::Error>>;
}

impl GifSource for TenorClient {
    type Error = ClientError;

    async fn search(
        &self,
        query: &str,
        limit: u32,
        cursor: Option<&Cursor>,
    ) -> Result<PageResponse, ClientError> {
        TenorClient::search(self, query, limit, cursor).await
    }

    async fn featured(&self, limit: u32) -> Result<PageResponse, ClientError> {
        TenorClient::featured(self, limit).await
    }
}
